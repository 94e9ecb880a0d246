use super::{ContainerSpec, LoaderKind};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLimits {
    pub init: String,
    pub max: String,
}

/// The single game-server container managed by this tool.
#[derive(Debug, Clone)]
pub struct ServerInstance {
    name: String,
    image: String,
    env: Vec<String>,
    binds: Vec<String>,
}

impl ServerInstance {
    /// `data_dir` is the absolute host directory holding world and server data.
    pub fn new(
        name: String,
        image: String,
        loader: LoaderKind,
        version: String,
        memory: MemoryLimits,
        data_dir: PathBuf,
        data_mount: String,
    ) -> Self {
        let env = vec![
            "EULA=TRUE".to_string(),
            format!("TYPE={}", loader.env_value()),
            format!("VERSION={version}"),
            format!("INIT_MEMORY={}", memory.init),
            format!("MAX_MEMORY={}", memory.max),
        ];
        let binds = vec![format!("{}:{}", data_dir.display(), data_mount)];

        Self {
            name,
            image,
            env,
            binds,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &[String] {
        &self.env
    }

    pub fn binds(&self) -> &[String] {
        &self.binds
    }

    pub fn to_spec(&self) -> ContainerSpec<'_> {
        ContainerSpec {
            name: &self.name,
            image: &self.image,
            env: &self.env,
            binds: &self.binds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(loader: LoaderKind) -> ServerInstance {
        ServerInstance::new(
            "mc".into(),
            "docker.io/itzg/minecraft-server".into(),
            loader,
            "1.20.1".into(),
            MemoryLimits {
                init: "2G".into(),
                max: "4G".into(),
            },
            PathBuf::from("/srv/mc"),
            "/data".into(),
        )
    }

    #[test]
    fn env_encodes_eula_loader_version_and_memory() {
        let inst = instance(LoaderKind::Forge);
        assert_eq!(
            inst.env(),
            &[
                "EULA=TRUE".to_string(),
                "TYPE=FORGE".to_string(),
                "VERSION=1.20.1".to_string(),
                "INIT_MEMORY=2G".to_string(),
                "MAX_MEMORY=4G".to_string(),
            ]
        );
    }

    #[test]
    fn spec_carries_bind_mount() {
        let inst = instance(LoaderKind::Vanilla);
        let spec = inst.to_spec();
        assert_eq!(inst.name(), "mc");
        assert_eq!(inst.binds(), spec.binds);
        assert_eq!(spec.name, "mc");
        assert_eq!(spec.image, "docker.io/itzg/minecraft-server");
        assert_eq!(spec.binds, &["/srv/mc:/data".to_string()]);
    }
}
