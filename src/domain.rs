mod container;
mod instance;
mod loader;
pub mod traits;

pub use container::{Container, ContainerSpec, ContainerState, container_exists, no_such_container};
pub use instance::{MemoryLimits, ServerInstance};
pub use loader::LoaderKind;
pub use traits::ContainerRuntime;
