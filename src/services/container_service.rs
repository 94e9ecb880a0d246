use crate::domain::{Container, ContainerRuntime, ContainerSpec, ContainerState, no_such_container};
use anyhow::{Result, bail};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct ContainerService {
    runtime: Arc<dyn ContainerRuntime>,
}

impl ContainerService {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }

    pub fn get_status(&self, name: &str) -> Result<Container> {
        self.runtime.get_container(name)
    }

    pub fn pull(&self, image: &str) -> Result<()> {
        info!("📥 Pulling {image}...");
        self.runtime.pull_image(image)
    }

    pub fn create(&self, spec: &ContainerSpec) -> Result<()> {
        info!("📦 Creating {} from {}...", spec.name, spec.image);
        debug!("env={:?} binds={:?}", spec.env, spec.binds);
        self.runtime.create_container(spec)
    }

    pub fn start(&self, name: &str) -> Result<()> {
        info!("▶️  Starting {name}...");
        self.runtime.start_container(name)
    }

    /// Stops a running container; absent or already stopped containers are errors.
    pub fn stop(&self, name: &str, timeout: Duration) -> Result<()> {
        let container = self.runtime.get_container(name)?;

        match container.state {
            ContainerState::Running => {
                info!("⏹️  Stopping {name} (grace period {}s)...", timeout.as_secs());
                self.runtime.stop_container(name, timeout)
            }
            ContainerState::Stopped => bail!("{name} is not running"),
            ContainerState::NotCreated => Err(no_such_container(name)),
        }
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        info!("🗑️  Removing {name}...");
        self.runtime.remove_container(name, true)
    }

    pub fn exec_console(&self, container: &str, command: &[String], interactive: bool) -> Result<()> {
        self.runtime.exec_console(container, command, interactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockRuntime;

    #[test]
    fn stop_refuses_stopped_container() {
        let mock = Arc::new(MockRuntime::new());
        mock.add_container("mc", ContainerState::Stopped);
        let service = ContainerService::new(mock.clone());

        let err = service.stop("mc", Duration::from_secs(10)).unwrap_err();
        assert!(err.to_string().contains("not running"));
        assert!(!mock.get_commands().iter().any(|c| c.starts_with("stop:")));
    }

    #[test]
    fn stop_missing_container_is_not_found() {
        let mock = Arc::new(MockRuntime::new());
        let service = ContainerService::new(mock.clone());

        let err = service.stop("mc", Duration::from_secs(10)).unwrap_err();
        assert_eq!(err.to_string(), "no such container: mc");
        assert_eq!(mock.get_commands(), vec!["get_container:mc".to_string()]);
    }

    #[test]
    fn remove_is_forced() {
        let mock = Arc::new(MockRuntime::new());
        mock.add_container("mc", ContainerState::Running);
        let service = ContainerService::new(mock.clone());

        service.remove("mc").unwrap();
        assert_eq!(mock.get_commands(), vec!["remove:mc:force".to_string()]);
    }
}
