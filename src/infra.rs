pub mod config;
pub mod console;
pub mod docker_adapter;

pub use docker_adapter::DockerAdapter;
