use anyhow::{Context, Result, bail};
use std::process::{Command, Stdio};
use tracing::debug;

/// Builds the `exec` argument vector that runs the console client in `container`.
///
/// Interactive sessions keep stdin attached (`-i`); one-shot invocations append
/// `command` verbatim after the client name.
pub fn console_args(
    container: &str,
    client: &str,
    command: &[String],
    interactive: bool,
) -> Vec<String> {
    let mut args = vec!["exec".to_string()];

    if interactive {
        args.push("-i".into());
    }

    args.push(container.into());
    args.push(client.into());
    args.extend(command.iter().cloned());
    args
}

/// Runs `<docker_bin> <args...>` with this process's stdio and waits for it.
pub fn run_console(docker_bin: &str, args: &[String]) -> Result<()> {
    debug!("Running {} {}", docker_bin, args.join(" "));

    let status = Command::new(docker_bin)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("running console client via {docker_bin}"))?;

    if !status.success() {
        bail!("console client exited with {status}");
    }

    Ok(())
}
