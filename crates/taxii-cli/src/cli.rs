use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taxii", about = "TAXII 2.1 threat-intelligence sharing server", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the TAXII server
    Serve(ServeArgs),
    /// Validate a configuration file and summarize it
    CheckConfig(CheckConfigArgs),
    /// Print an example configuration file
    ExampleConfig,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the configured listen address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct CheckConfigArgs {
    /// Path to the TOML configuration file
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_with_overrides() {
        let cli = Cli::parse_from(["taxii", "-v", "serve", "--config", "taxii.toml", "--bind", "0.0.0.0:8080"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.config, Some(PathBuf::from("taxii.toml")));
                assert_eq!(args.bind, Some("0.0.0.0:8080".parse().unwrap()));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn parses_check_config_json() {
        let cli = Cli::parse_from(["taxii", "check-config", "taxii.toml", "--format", "json"]);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(matches!(cli.command, Command::CheckConfig(_)));
    }

    #[test]
    fn rejects_bad_bind_address() {
        assert!(Cli::try_parse_from(["taxii", "serve", "--bind", "nowhere"]).is_err());
    }
}
