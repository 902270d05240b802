use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use clipper_core::{Dispatcher, HostConfig};
use tracing::{Level, debug, info};
use utils::logging::{self, Component, LogConfig};
use utils::messaging::stdio_channel;

mod host;
mod install;

use install::BrowserArg;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Set log file level
    #[arg(long = "log-level", value_name = "LEVEL", global = true,
          value_parser = ["trace", "debug", "info", "warn", "error"],
          default_value = "info")]
    log_level: String,

    /// Also write logs to stderr, which the browser keeps in its own log
    #[arg(long = "log-console", global = true)]
    log_console: bool,

    /// Arguments the browser appends when it launches the host
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    launch_args: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Write the native messaging manifest so the browser can find this host
    InstallManifest {
        /// Extension id allowed to talk to the host
        #[arg(long = "extension-id", value_name = "ID")]
        extension_id: String,

        /// Browser to register with
        #[arg(long, value_enum, default_value_t = BrowserArg::Chrome)]
        browser: BrowserArg,

        /// Directory to write the manifest into, instead of the browser's own
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let host_config = HostConfig::default();

    if let Some(Command::InstallManifest {
        extension_id,
        browser,
        dir,
    }) = cli.command
    {
        let path = install::install_manifest(browser.into(), &extension_id, dir)?;
        install::print_installed(&path);
        return Ok(());
    }

    let max_level = cli.log_level.parse().unwrap_or(Level::INFO);
    let log_config = LogConfig {
        log_to_console: cli.log_console,
        // RUST_LOG, when set, replaces the --log-level directives
        env_filter: std::env::var("RUST_LOG").ok().filter(|f| !f.trim().is_empty()),
        ..logging::get_native_host_config(&host_config.log_dir, max_level)
    };
    match logging::init_logging(log_config) {
        Ok(_) => {
            debug!("Logger initialized for {}", Component::NativeHost.as_str());
        }
        Err(e) => {
            // stderr ends up in the browser's log, stdout belongs to the protocol
            eprintln!("Failed to initialize logger: {}", e);
        }
    }
    info!(
        "Native host started, config {}, launched with {:?}",
        host_config.config_file.display(),
        cli.launch_args
    );

    let dispatcher = Dispatcher::new(&host_config);
    let (mut reader, mut writer) = stdio_channel();
    host::serve(&mut reader, &mut writer, &dispatcher)
        .await
        .context("Native messaging channel failed")?;

    Ok(())
}
