use crate::domain::{
    Container, ContainerRuntime, ContainerSpec, ContainerState, container_exists,
    no_such_container,
};
use crate::infra::config::DEFAULT_CONSOLE_CLIENT;
use crate::infra::console::console_args;
use anyhow::{Result, bail};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MockContainer {
    pub name: String,
    pub state: ContainerState,
    pub spec: Option<MockContainerSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockContainerSpec {
    pub image: String,
    pub env: Vec<String>,
    pub binds: Vec<String>,
}

/// In-memory [`ContainerRuntime`] that records every call as `op:name[:detail]`.
#[derive(Debug)]
pub struct MockRuntime {
    containers: RwLock<HashMap<String, MockContainer>>,
    commands: RwLock<Vec<String>>,
    console_invocations: RwLock<Vec<Vec<String>>>,
    pulled: RwLock<Vec<String>>,
    fail_on: RwLock<Option<String>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(HashMap::new()),
            commands: RwLock::new(Vec::new()),
            console_invocations: RwLock::new(Vec::new()),
            pulled: RwLock::new(Vec::new()),
            fail_on: RwLock::new(None),
        }
    }

    pub fn add_container(&self, name: &str, state: ContainerState) {
        self.containers.write().unwrap().insert(
            name.to_string(),
            MockContainer {
                name: name.to_string(),
                state,
                spec: None,
            },
        );
    }

    pub fn set_fail_on(&self, operation: &str) {
        *self.fail_on.write().unwrap() = Some(operation.to_string());
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    /// Full argument vectors the console bridge would have executed.
    pub fn console_invocations(&self) -> Vec<Vec<String>> {
        self.console_invocations.read().unwrap().clone()
    }

    pub fn pulled_images(&self) -> Vec<String> {
        self.pulled.read().unwrap().clone()
    }

    pub fn container_exists(&self, name: &str) -> bool {
        self.containers.read().unwrap().contains_key(name)
    }

    pub fn get_state(&self, name: &str) -> Option<ContainerState> {
        self.containers
            .read()
            .unwrap()
            .get(name)
            .map(|c| c.state.clone())
    }

    pub fn get_spec(&self, name: &str) -> Option<MockContainerSpec> {
        self.containers
            .read()
            .unwrap()
            .get(name)
            .and_then(|c| c.spec.clone())
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }

    fn check_fail(&self, operation: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap() {
            if fail_on == operation {
                bail!("Mock failure on: {}", operation);
            }
        }
        Ok(())
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRuntime for MockRuntime {
    fn get_container(&self, name: &str) -> Result<Container> {
        self.record_command(&format!("get_container:{}", name));
        self.check_fail("get_container")?;

        let state = self
            .get_state(name)
            .unwrap_or(ContainerState::NotCreated);

        Ok(Container::new(name.to_string(), state))
    }

    fn pull_image(&self, image: &str) -> Result<()> {
        self.record_command(&format!("pull:{}", image));
        self.check_fail("pull")?;

        self.pulled.write().unwrap().push(image.to_string());
        Ok(())
    }

    fn create_container(&self, spec: &ContainerSpec) -> Result<()> {
        self.record_command(&format!("create:{}", spec.name));
        self.check_fail("create")?;

        let mut containers = self.containers.write().unwrap();
        if containers.contains_key(spec.name) {
            return Err(container_exists(spec.name));
        }

        containers.insert(
            spec.name.to_string(),
            MockContainer {
                name: spec.name.to_string(),
                state: ContainerState::Stopped,
                spec: Some(MockContainerSpec {
                    image: spec.image.to_string(),
                    env: spec.env.to_vec(),
                    binds: spec.binds.to_vec(),
                }),
            },
        );
        Ok(())
    }

    fn start_container(&self, name: &str) -> Result<()> {
        self.record_command(&format!("start:{}", name));
        self.check_fail("start")?;

        match self.containers.write().unwrap().get_mut(name) {
            Some(container) => {
                container.state = ContainerState::Running;
                Ok(())
            }
            None => Err(no_such_container(name)),
        }
    }

    fn stop_container(&self, name: &str, timeout: Duration) -> Result<()> {
        self.record_command(&format!("stop:{}:{}", name, timeout.as_secs()));
        self.check_fail("stop")?;

        match self.containers.write().unwrap().get_mut(name) {
            Some(container) if container.state == ContainerState::Running => {
                container.state = ContainerState::Stopped;
                Ok(())
            }
            Some(_) => bail!("{name} is not running"),
            None => Err(no_such_container(name)),
        }
    }

    fn remove_container(&self, name: &str, force: bool) -> Result<()> {
        if force {
            self.record_command(&format!("remove:{}:force", name));
        } else {
            self.record_command(&format!("remove:{}", name));
        }
        self.check_fail("remove")?;

        match self.get_state(name) {
            None => Err(no_such_container(name)),
            Some(ContainerState::Running) if !force => {
                bail!("cannot remove running container {name}")
            }
            Some(_) => {
                self.containers.write().unwrap().remove(name);
                Ok(())
            }
        }
    }

    fn exec_console(&self, container: &str, command: &[String], interactive: bool) -> Result<()> {
        if interactive {
            self.record_command(&format!("console:{}:interactive", container));
        } else {
            self.record_command(&format!("console:{}:{}", container, command.join(" ")));
        }
        self.check_fail("console")?;

        if self.get_state(container) != Some(ContainerState::Running) {
            bail!("console client exited with exit status: 1");
        }

        self.console_invocations.write().unwrap().push(console_args(
            container,
            DEFAULT_CONSOLE_CLIENT,
            command,
            interactive,
        ));
        Ok(())
    }
}
