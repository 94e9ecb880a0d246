pub mod cli;
pub mod domain;
pub mod infra;
pub mod services;

// Make test_support available for integration tests
pub mod test_support;

pub use domain::{
    Container, ContainerRuntime, ContainerSpec, ContainerState, LoaderKind, ServerInstance,
};
pub use infra::DockerAdapter;
pub use services::{ContainerService, Orchestrator};
