use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "mcsm.toml";

pub const DEFAULT_IMAGE: &str = "docker.io/itzg/minecraft-server";
pub const DEFAULT_CONTAINER_NAME: &str = "mc";
pub const DEFAULT_DATA_DIR: &str = "~/Desktop/ServerData";
pub const DEFAULT_DATA_MOUNT: &str = "/data";
pub const DEFAULT_MEMORY: &str = "6G";
pub const DEFAULT_STOP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DOCKER_BIN: &str = "docker";
pub const DEFAULT_CONSOLE_CLIENT: &str = "rcon-cli";

pub fn default_config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/root"))
        .join(".config/mcsm")
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub image: Option<String>,
    pub container_name: Option<String>,
    pub data_dir: Option<String>,
    pub data_mount: Option<String>,
    pub init_memory: Option<String>,
    pub max_memory: Option<String>,
    pub stop_timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    pub docker_bin: Option<String>,
    pub client: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl AppConfig {
    /// Merges another AppConfig into self.
    /// Values from `other` overwrite values in `self` if present.
    pub fn merge(&mut self, other: AppConfig) {
        let server = other.server;
        if let Some(image) = server.image {
            self.server.image = Some(image);
        }
        if let Some(name) = server.container_name {
            self.server.container_name = Some(name);
        }
        if let Some(dir) = server.data_dir {
            self.server.data_dir = Some(dir);
        }
        if let Some(mount) = server.data_mount {
            self.server.data_mount = Some(mount);
        }
        if let Some(mem) = server.init_memory {
            self.server.init_memory = Some(mem);
        }
        if let Some(mem) = server.max_memory {
            self.server.max_memory = Some(mem);
        }
        if let Some(secs) = server.stop_timeout_secs {
            self.server.stop_timeout_secs = Some(secs);
        }

        if let Some(bin) = other.console.docker_bin {
            self.console.docker_bin = Some(bin);
        }
        if let Some(client) = other.console.client {
            self.console.client = Some(client);
        }
    }
}

/// Fully resolved settings with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub image: String,
    pub container_name: String,
    /// Unexpanded host data directory (may start with `~`)
    pub data_dir: String,
    pub data_mount: String,
    pub init_memory: String,
    pub max_memory: String,
    pub stop_timeout: Duration,
    pub docker_bin: String,
    pub console_client: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self::resolve(AppConfig::default())
    }
}

impl ServerSettings {
    pub fn resolve(config: AppConfig) -> Self {
        let server = config.server;
        let console = config.console;

        Self {
            image: server.image.unwrap_or_else(|| DEFAULT_IMAGE.into()),
            container_name: server
                .container_name
                .unwrap_or_else(|| DEFAULT_CONTAINER_NAME.into()),
            data_dir: server.data_dir.unwrap_or_else(|| DEFAULT_DATA_DIR.into()),
            data_mount: server
                .data_mount
                .unwrap_or_else(|| DEFAULT_DATA_MOUNT.into()),
            init_memory: server.init_memory.unwrap_or_else(|| DEFAULT_MEMORY.into()),
            max_memory: server.max_memory.unwrap_or_else(|| DEFAULT_MEMORY.into()),
            stop_timeout: Duration::from_secs(
                server
                    .stop_timeout_secs
                    .unwrap_or(DEFAULT_STOP_TIMEOUT_SECS),
            ),
            docker_bin: console
                .docker_bin
                .unwrap_or_else(|| DEFAULT_DOCKER_BIN.into()),
            console_client: console
                .client
                .unwrap_or_else(|| DEFAULT_CONSOLE_CLIENT.into()),
        }
    }

    /// Expands `~` and environment variables and makes the data directory absolute.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.data_dir)
            .with_context(|| format!("expanding {:?}", self.data_dir))?;
        let path = PathBuf::from(expanded.as_ref());

        if path.is_absolute() {
            return Ok(path);
        }

        Ok(std::env::current_dir()?.join(path))
    }
}

pub fn load_app_config(config_dir: &Path) -> Result<AppConfig> {
    let path = config_dir.join(CONFIG_FILE_NAME);

    if !path.exists() {
        debug!("No {:?} found, using defaults", path);
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
    let config: AppConfig =
        toml::from_str(&content).with_context(|| format!("parsing {:?}", path))?;

    validate(&config).with_context(|| format!("validating {:?}", path))?;

    Ok(config)
}

pub fn load_settings(config_dir: &Path) -> Result<ServerSettings> {
    let mut config = AppConfig::default();
    config.merge(load_app_config(config_dir)?);
    Ok(ServerSettings::resolve(config))
}

fn validate(config: &AppConfig) -> Result<()> {
    if let Some(name) = &config.server.container_name {
        if name.trim().is_empty() {
            bail!("container_name must not be empty");
        }

        let first_char = name.chars().next().unwrap_or('-');
        if !first_char.is_alphanumeric() {
            bail!("container_name '{}' must start with a letter or digit", name);
        }

        if let Some(c) = name
            .chars()
            .find(|c| !c.is_alphanumeric() && *c != '_' && *c != '.' && *c != '-')
        {
            bail!("container_name '{}' contains invalid character '{}'", name, c);
        }
    }

    if let Some(image) = &config.server.image {
        if image.trim().is_empty() {
            bail!("image must not be empty");
        }
    }

    if config.server.stop_timeout_secs == Some(0) {
        bail!("stop_timeout_secs must be greater than zero");
    }

    Ok(())
}
