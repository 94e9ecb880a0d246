mod container_service;
mod orchestrator;

pub use container_service::ContainerService;
pub use orchestrator::Orchestrator;
