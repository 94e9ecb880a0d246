use super::{Container, ContainerSpec};
use anyhow::Result;
use std::fmt::Debug;
use std::time::Duration;

/// Trait for container runtime operations
pub trait ContainerRuntime: Send + Sync + Debug {
    /// Get the current state of a container
    fn get_container(&self, name: &str) -> Result<Container>;

    /// Pull an image, reporting progress on stdout
    fn pull_image(&self, image: &str) -> Result<()>;

    /// Create a new container from a spec
    fn create_container(&self, spec: &ContainerSpec) -> Result<()>;

    /// Start a container
    fn start_container(&self, name: &str) -> Result<()>;

    /// Stop a container, letting the runtime kill it after `timeout`
    fn stop_container(&self, name: &str, timeout: Duration) -> Result<()>;

    /// Remove a container
    fn remove_container(&self, name: &str, force: bool) -> Result<()>;

    /// Run the console client inside a container with inherited stdio.
    ///
    /// An empty `command` with `interactive` set opens a session; otherwise
    /// `command` is passed to the client as a single console command.
    fn exec_console(&self, container: &str, command: &[String], interactive: bool) -> Result<()>;
}
