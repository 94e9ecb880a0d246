#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Stopped,
    NotCreated,
}

impl ContainerState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::NotCreated => "not created",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Container {
    pub name: String,
    pub state: ContainerState,
}

impl Container {
    pub fn new(name: String, state: ContainerState) -> Self {
        Self { name, state }
    }
}

/// Everything the runtime needs to create a container.
#[derive(Debug, Clone)]
pub struct ContainerSpec<'a> {
    pub name: &'a str,
    pub image: &'a str,
    pub env: &'a [String],
    pub binds: &'a [String],
}

/// Error reported when an operation targets a container that does not exist.
pub fn no_such_container(name: &str) -> anyhow::Error {
    anyhow::anyhow!("no such container: {name}")
}

/// Error reported when creation collides with an existing container.
pub fn container_exists(name: &str) -> anyhow::Error {
    anyhow::anyhow!("container {name} already exists (run 'mcsm discard' to remove it)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_labels() {
        assert_eq!(ContainerState::Running.label(), "running");
        assert_eq!(ContainerState::Stopped.label(), "stopped");
        assert_eq!(ContainerState::NotCreated.label(), "not created");
    }

    #[test]
    fn not_found_message_names_the_container() {
        assert_eq!(no_such_container("mc").to_string(), "no such container: mc");
    }
}
