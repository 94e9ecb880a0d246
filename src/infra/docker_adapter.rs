use crate::domain::{
    Container, ContainerRuntime, ContainerSpec, ContainerState, container_exists,
    no_such_container,
};
use crate::infra::console::{console_args, run_console};
use anyhow::{Context, Result, bail};
use bollard::Docker;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, RemoveContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use bollard::errors::Error as DockerError;
use bollard::image::CreateImageOptions;
use bollard::models::HostConfig;
use futures_util::StreamExt;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info};

/// [`ContainerRuntime`] backed by the Docker Engine API.
///
/// The client is async; every call is driven to completion on a private
/// current-thread runtime so callers stay blocking. The daemon connection is
/// opened on the first API call, so console commands never need it.
pub struct DockerAdapter {
    docker: OnceLock<Docker>,
    rt: Runtime,
    docker_bin: String,
    console_client: String,
}

impl DockerAdapter {
    pub fn new(docker_bin: &str, console_client: &str) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building tokio runtime")?;

        Ok(Self {
            docker: OnceLock::new(),
            rt,
            docker_bin: docker_bin.to_string(),
            console_client: console_client.to_string(),
        })
    }

    /// Connects using the local defaults (`DOCKER_HOST` or the unix socket) and
    /// negotiates the API version with the daemon, once.
    fn client(&self) -> Result<&Docker> {
        if let Some(docker) = self.docker.get() {
            return Ok(docker);
        }

        let docker = self.rt.block_on(async {
            let docker =
                Docker::connect_with_local_defaults().context("connecting to docker daemon")?;
            docker
                .negotiate_version()
                .await
                .context("negotiating docker API version")
        })?;

        debug!("Connected to docker daemon");
        Ok(self.docker.get_or_init(|| docker))
    }

    /// Program and arguments used to reach the console client in `container`.
    fn console_invocation(
        &self,
        container: &str,
        command: &[String],
        interactive: bool,
    ) -> (&str, Vec<String>) {
        (
            &self.docker_bin,
            console_args(container, &self.console_client, command, interactive),
        )
    }
}

impl fmt::Debug for DockerAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockerAdapter")
            .field("docker_bin", &self.docker_bin)
            .field("console_client", &self.console_client)
            .finish_non_exhaustive()
    }
}

impl ContainerRuntime for DockerAdapter {
    fn get_container(&self, name: &str) -> Result<Container> {
        let docker = self.client()?;
        let inspected = self
            .rt
            .block_on(docker.inspect_container(name, None::<InspectContainerOptions>));

        let state = match inspected {
            Ok(info) => {
                let running = info.state.and_then(|s| s.running).unwrap_or(false);
                if running {
                    ContainerState::Running
                } else {
                    ContainerState::Stopped
                }
            }
            Err(err) if status_code(&err) == Some(404) => ContainerState::NotCreated,
            Err(err) => {
                return Err(err).with_context(|| format!("inspecting container {name}"));
            }
        };

        Ok(Container::new(name.to_string(), state))
    }

    fn pull_image(&self, image: &str) -> Result<()> {
        let (from_image, tag) = split_image_ref(image);
        let docker = self.client()?;
        info!("Pulling {from_image}:{tag}...");

        self.rt.block_on(async {
            let mut stream = Box::pin(docker.create_image(
                Some(CreateImageOptions {
                    from_image,
                    tag,
                    ..Default::default()
                }),
                None,
                None,
            ));

            while let Some(item) = stream.next().await {
                let progress = item.with_context(|| format!("pulling image {image}"))?;

                if let Some(error) = progress.error {
                    bail!("pulling image {image}: {error}");
                }

                let line = [progress.id, progress.status, progress.progress]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                if !line.is_empty() {
                    println!("{line}");
                }
            }

            Ok::<(), anyhow::Error>(())
        })
    }

    fn create_container(&self, spec: &ContainerSpec) -> Result<()> {
        let config = Config {
            image: Some(spec.image.to_string()),
            env: Some(spec.env.to_vec()),
            tty: Some(false),
            host_config: Some(HostConfig {
                binds: Some(spec.binds.to_vec()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let docker = self.client()?;
        let created = self.rt.block_on(docker.create_container(
            Some(CreateContainerOptions {
                name: spec.name.to_string(),
                ..Default::default()
            }),
            config,
        ));

        match created {
            Ok(response) => {
                debug!("Created container {} ({})", spec.name, response.id);
                Ok(())
            }
            Err(err) if status_code(&err) == Some(409) => Err(container_exists(spec.name)),
            Err(err) => Err(err).with_context(|| format!("creating container {}", spec.name)),
        }
    }

    fn start_container(&self, name: &str) -> Result<()> {
        let docker = self.client()?;
        let started = self
            .rt
            .block_on(docker.start_container(name, None::<StartContainerOptions<String>>));

        map_named(started, name, || format!("starting container {name}"))
    }

    fn stop_container(&self, name: &str, timeout: Duration) -> Result<()> {
        let docker = self.client()?;
        let stopped = self.rt.block_on(docker.stop_container(
            name,
            Some(StopContainerOptions {
                t: timeout.as_secs() as i64,
            }),
        ));

        match stopped {
            Err(err) if status_code(&err) == Some(304) => bail!("{name} is not running"),
            other => map_named(other, name, || format!("stopping container {name}")),
        }
    }

    fn remove_container(&self, name: &str, force: bool) -> Result<()> {
        let docker = self.client()?;
        let removed = self.rt.block_on(docker.remove_container(
            name,
            Some(RemoveContainerOptions {
                force,
                ..Default::default()
            }),
        ));

        map_named(removed, name, || format!("removing container {name}"))
    }

    fn exec_console(&self, container: &str, command: &[String], interactive: bool) -> Result<()> {
        let (program, args) = self.console_invocation(container, command, interactive);
        run_console(program, &args)
    }
}

fn status_code(err: &DockerError) -> Option<u16> {
    match err {
        DockerError::DockerResponseServerError { status_code, .. } => Some(*status_code),
        _ => None,
    }
}

fn map_named<T, F>(result: Result<T, DockerError>, name: &str, context: F) -> Result<()>
where
    F: FnOnce() -> String,
{
    match result {
        Ok(_) => Ok(()),
        Err(err) if status_code(&err) == Some(404) => Err(no_such_container(name)),
        Err(err) => Err(err).with_context(context),
    }
}

/// Splits an image reference into repository and tag, defaulting to `latest`.
///
/// A colon only starts a tag when it comes after the last `/`, so registry
/// ports (`host:5000/img`) are left alone. Digests are passed through whole.
fn split_image_ref(image: &str) -> (String, String) {
    if image.contains('@') {
        return (image.to_string(), String::new());
    }

    let last_slash = image.rfind('/').map(|i| i + 1).unwrap_or(0);
    match image[last_slash..].rfind(':') {
        Some(i) => {
            let split = last_slash + i;
            (image[..split].to_string(), image[split + 1..].to_string())
        }
        None => (image.to_string(), "latest".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_image_defaults_to_latest() {
        assert_eq!(
            split_image_ref("docker.io/itzg/minecraft-server"),
            ("docker.io/itzg/minecraft-server".into(), "latest".into())
        );
    }

    #[test]
    fn tagged_image_is_split() {
        assert_eq!(
            split_image_ref("itzg/minecraft-server:java17"),
            ("itzg/minecraft-server".into(), "java17".into())
        );
    }

    #[test]
    fn registry_port_is_not_a_tag() {
        assert_eq!(
            split_image_ref("localhost:5000/mc"),
            ("localhost:5000/mc".into(), "latest".into())
        );
        assert_eq!(
            split_image_ref("localhost:5000/mc:1.0"),
            ("localhost:5000/mc".into(), "1.0".into())
        );
    }

    #[test]
    fn digest_reference_is_untouched() {
        let image = "itzg/minecraft-server@sha256:abcd";
        assert_eq!(split_image_ref(image), (image.into(), String::new()));
    }

    #[test]
    fn console_invocation_uses_configured_binary_and_client() {
        let adapter = DockerAdapter::new("podman", "mc-rcon").unwrap();
        let command = vec!["say".to_string(), "hi".to_string()];

        let (program, args) = adapter.console_invocation("survival", &command, false);
        assert_eq!(program, "podman");
        assert_eq!(args, vec!["exec", "survival", "mc-rcon", "say", "hi"]);

        let (_, args) = adapter.console_invocation("survival", &[], true);
        assert_eq!(args, vec!["exec", "-i", "survival", "mc-rcon"]);
    }

    #[cfg(unix)]
    #[test]
    fn console_runs_without_daemon_connection() {
        let adapter = DockerAdapter::new("true", "rcon-cli").unwrap();
        adapter
            .exec_console("mc", &["list".to_string()], false)
            .unwrap();
        assert!(adapter.docker.get().is_none());

        let adapter = DockerAdapter::new("false", "rcon-cli").unwrap();
        assert!(adapter.exec_console("mc", &[], true).is_err());
    }

    #[test]
    fn server_error_status_is_extracted() {
        let err = DockerError::DockerResponseServerError {
            status_code: 404,
            message: "No such container: mc".into(),
        };
        assert_eq!(status_code(&err), Some(404));

        let mapped = map_named::<(), _>(Err(err), "mc", || "starting".into()).unwrap_err();
        assert_eq!(mapped.to_string(), "no such container: mc");
    }
}
