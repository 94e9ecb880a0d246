use clap::Parser;
use mcsm::cli::server::{self, ServerCommand};
use mcsm::infra::config;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mcsm",
    version,
    about = "Manage a single Minecraft server container"
)]
struct Cli {
    /// Config directory (default: ~/.config/mcsm)
    #[arg(long, env = "MCSM_CONFIG_DIR", default_value_os_t = config::default_config_dir())]
    config_dir: std::path::PathBuf,

    #[command(subcommand)]
    command: ServerCommand,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Help and version output keep clap's status 0; every usage error exits 1,
/// the same as runtime failures.
fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.exit_code() == 0 { 0 } else { 1 }
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(usage_exit_code(&err));
        }
    };

    if let Err(err) = server::run(cli.command, &cli.config_dir) {
        error!("{err:#}");
        std::process::exit(1);
    }
}
