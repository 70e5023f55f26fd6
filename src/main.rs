use clap::Parser;
use desktidy::output::OutputFormatter;
use desktidy::server::{ServerOptions, serve};
use std::path::PathBuf;
use std::process::ExitCode;

/// Organize your Desktop into category folders over a small web interface.
#[derive(Debug, Parser)]
#[command(name = "desktidy", version, about)]
struct Args {
    /// Interface to bind the HTTP listener to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port for the HTTP listener.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let out = OutputFormatter::new();

    let options = ServerOptions {
        host: args.host,
        port: args.port,
        config_path: args.config,
    };

    if let Err(e) = serve(&options, &out) {
        out.error(&format!("Server error: {}", e));
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
