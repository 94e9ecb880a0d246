use crate::domain::{ContainerState, LoaderKind, MemoryLimits, ServerInstance};
use crate::infra::config::ServerSettings;
use crate::services::ContainerService;
use anyhow::{Context, Result, bail};
use std::fs;
use std::sync::Arc;
use tracing::{debug, info};

const INIT_USAGE: &str = "Usage: mcsm init <version> <forge | fabric | vanilla>";

/// Lifecycle operations on the managed server container.
///
/// Every operation is a straight sequence of runtime calls; the first failure
/// aborts the sequence and nothing already done is rolled back.
pub struct Orchestrator {
    container_service: Arc<ContainerService>,
    settings: ServerSettings,
}

impl Orchestrator {
    pub fn new(container_service: Arc<ContainerService>, settings: ServerSettings) -> Self {
        Self {
            container_service,
            settings,
        }
    }

    /// Pulls the image, creates the container and starts it.
    pub fn init(&self, version: &str, loader: &str) -> Result<()> {
        let version = version.trim();
        if version.is_empty() {
            bail!("Minecraft version is required! {INIT_USAGE}");
        }
        if loader.trim().is_empty() {
            bail!("Server type is required! {INIT_USAGE}");
        }

        let loader = LoaderKind::from_arg(loader);
        debug!("Resolved loader {loader} for version {version}");

        self.container_service.pull(&self.settings.image)?;

        let data_dir = self.settings.resolve_data_dir()?;
        fs::create_dir_all(&data_dir).with_context(|| format!("creating {:?}", data_dir))?;

        let instance = ServerInstance::new(
            self.settings.container_name.clone(),
            self.settings.image.clone(),
            loader,
            version.to_string(),
            MemoryLimits {
                init: self.settings.init_memory.clone(),
                max: self.settings.max_memory.clone(),
            },
            data_dir,
            self.settings.data_mount.clone(),
        );

        self.container_service.create(&instance.to_spec())?;
        self.container_service.start(instance.name())?;

        println!("Server created and started successfully!");
        Ok(())
    }

    pub fn start(&self) -> Result<()> {
        self.container_service.start(&self.settings.container_name)?;
        println!("Server started successfully!");
        Ok(())
    }

    pub fn stop(&self) -> Result<()> {
        self.container_service
            .stop(&self.settings.container_name, self.settings.stop_timeout)?;
        println!("Server stopped successfully!");
        Ok(())
    }

    /// Force-removes the container. The bind-mounted data directory is left alone.
    pub fn discard(&self) -> Result<()> {
        self.container_service.remove(&self.settings.container_name)?;
        println!("Server discarded successfully. Run 'mcsm init' to create a new one");
        Ok(())
    }

    pub fn console(&self) -> Result<()> {
        info!("🖥️  Opening console on {}", self.settings.container_name);
        self.container_service
            .exec_console(&self.settings.container_name, &[], true)
    }

    pub fn console_oneshot(&self, command: &[String]) -> Result<()> {
        self.container_service
            .exec_console(&self.settings.container_name, command, false)
    }

    pub fn status(&self) -> Result<ContainerState> {
        let container = self
            .container_service
            .get_status(&self.settings.container_name)?;

        println!("- {:<10} | {}", container.name, container.state.label());

        if container.state == ContainerState::NotCreated {
            println!("⚠️  No server yet. Run 'mcsm init <version> <loader>'.");
        }

        Ok(container.state)
    }
}
