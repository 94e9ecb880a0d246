use anyhow::Result;
use clap::Subcommand;
use crate::domain::ContainerRuntime;
use crate::infra::DockerAdapter;
use crate::infra::config::{ServerSettings, load_settings};
use crate::services::{ContainerService, Orchestrator};
use std::path::Path;
use std::sync::Arc;

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ServerCommand {
    /// Create the server: pull the image, create the container and start it
    Init {
        /// Game version, e.g. 1.20.1
        version: String,
        /// Mod loader: forge, fabric or vanilla (anything else means vanilla)
        loader: String,
    },
    /// Delete the server instance; data in the host directory is kept
    Discard,
    /// Start the server
    Start,
    /// Stop the server
    Stop,
    /// Open an interactive console
    Console,
    /// Execute a single console command
    ConsoleOneshot {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Show whether the server is running, stopped or not created
    Status,
}

pub struct Server {
    orchestrator: Orchestrator,
}

impl Server {
    pub fn new(config_dir: &Path) -> Result<Self> {
        let settings = load_settings(config_dir)?;
        let runtime = Arc::new(DockerAdapter::new(
            &settings.docker_bin,
            &settings.console_client,
        )?);
        Ok(Self::with_runtime(settings, runtime))
    }

    pub fn with_runtime(settings: ServerSettings, runtime: Arc<dyn ContainerRuntime>) -> Self {
        let container_service = Arc::new(ContainerService::new(runtime));
        Self {
            orchestrator: Orchestrator::new(container_service, settings),
        }
    }

    pub fn dispatch(&self, cmd: ServerCommand) -> Result<()> {
        match cmd {
            ServerCommand::Init { version, loader } => self.orchestrator.init(&version, &loader),
            ServerCommand::Discard => self.orchestrator.discard(),
            ServerCommand::Start => self.orchestrator.start(),
            ServerCommand::Stop => self.orchestrator.stop(),
            ServerCommand::Console => self.orchestrator.console(),
            ServerCommand::ConsoleOneshot { args } => self.orchestrator.console_oneshot(&args),
            ServerCommand::Status => self.orchestrator.status().map(|_| ()),
        }
    }
}

pub fn run(cmd: ServerCommand, config_dir: &Path) -> Result<()> {
    Server::new(config_dir)?.dispatch(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContainerState;
    use crate::test_support::MockRuntime;

    #[test]
    fn dispatches_oneshot_arguments_unchanged() {
        let mock = Arc::new(MockRuntime::new());
        mock.add_container("mc", ContainerState::Running);
        let server = Server::with_runtime(ServerSettings::default(), mock.clone());

        server
            .dispatch(ServerCommand::ConsoleOneshot {
                args: vec!["say".into(), "hello".into()],
            })
            .unwrap();

        assert_eq!(
            mock.console_invocations(),
            vec![vec!["exec", "mc", "rcon-cli", "say", "hello"]]
        );
    }

    #[test]
    fn run_validates_init_without_reaching_the_daemon() {
        let config_dir = tempfile::tempdir().unwrap();
        let err = run(
            ServerCommand::Init {
                version: String::new(),
                loader: "fabric".into(),
            },
            config_dir.path(),
        )
        .unwrap_err();

        assert!(
            err.to_string().contains("Minecraft version is required"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn dispatches_start_to_runtime() {
        let mock = Arc::new(MockRuntime::new());
        mock.add_container("mc", ContainerState::Stopped);
        let server = Server::with_runtime(ServerSettings::default(), mock.clone());

        server.dispatch(ServerCommand::Start).unwrap();
        assert_eq!(mock.get_state("mc"), Some(ContainerState::Running));
    }
}
