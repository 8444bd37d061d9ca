use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use taxii_server::{ApiRootConfig, ServerConfig, TaxiiServer, TAXII_CONTENT_TYPE};
use taxii_types::Collection;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::CheckConfig(args) => cmd_check_config(args, &cli.format),
        Command::ExampleConfig => cmd_example_config(),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            tracing::warn!("no configuration file given; serving defaults with no api roots");
            ServerConfig::default()
        }
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    println!(
        "{} TAXII server on {} ({} api roots)",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        config.api_roots.len()
    );
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(TaxiiServer::new(config).serve())?;
    Ok(())
}

fn cmd_check_config(args: CheckConfigArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = ServerConfig::from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    match format {
        OutputFormat::Json => {
            let roots: Vec<_> = config
                .api_roots
                .iter()
                .map(|r| {
                    json!({
                        "name": r.name,
                        "url": r.url,
                        "max_content_length": r.max_content_length,
                        "collections": r.collections.len(),
                    })
                })
                .collect();
            let summary = json!({
                "valid": true,
                "bind_addr": config.bind_addr.to_string(),
                "server_limit": config.server_limit,
                "api_roots": roots,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            println!("{} {} is valid", "✓".green().bold(), args.config.display());
            println!("  Bind: {}", config.bind_addr.to_string().cyan());
            println!("  Page size: {}", config.server_limit);
            for root in &config.api_roots {
                println!(
                    "  {} {} ({} collections, max {} bytes)",
                    "root".yellow(),
                    root.name.bold(),
                    root.collections.len(),
                    root.max_content_length
                );
                for collection in &root.collections {
                    let access = match (collection.can_read, collection.can_write) {
                        (true, true) => "rw",
                        (true, false) => "r-",
                        (false, true) => "-w",
                        (false, false) => "--",
                    };
                    println!("    {} {} {}", access.dimmed(), collection.id, collection.title);
                }
            }
        }
    }
    Ok(())
}

fn cmd_example_config() -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(&example_config())?);
    Ok(())
}

fn example_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.discovery.description = Some("Local threat-intel sharing".into());
    config.discovery.default = Some("http://127.0.0.1:6100/example1/".into());
    config.discovery.api_roots = vec!["http://127.0.0.1:6100/example1/".into()];

    let mut collection = Collection::new(
        "91a7b528-80eb-42ed-a74d-c6fbd5a26116",
        "High Value Indicator Collection",
    );
    collection.description = Some("Indicators shared with partners".into());

    config.api_roots.push(ApiRootConfig {
        name: "example1".into(),
        url: "http://127.0.0.1:6100/example1/".into(),
        title: "Example API root".into(),
        description: None,
        versions: vec![TAXII_CONTENT_TYPE.into()],
        max_content_length: 10 * 1024 * 1024,
        collections: vec![collection],
    });
    config
}
