//! ddclient-conf - edit ddclient.conf from the command line or an MCP client.

use anyhow::Context;
use clap::{Parser, Subcommand};
use ddclient_conf::config::{parse_host_list, Configuration, DomainEdit, DomainEntry, GlobalKey};
use ddclient_conf::mcp::McpServer;
use ddclient_conf::serializer::serialize;
use ddclient_conf::store::{self, FileStore, SYSTEM_CONFIG_PATH};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ddclient-conf")]
#[command(about = "Read and edit ddclient.conf")]
#[command(version)]
struct Cli {
    /// Path to ddclient.conf (default: /etc/ddclient.conf, ~/ddclient.conf, ~/.ddclient.conf)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configuration
    Show {
        /// Print as JSON instead of ddclient.conf text
        #[arg(long)]
        json: bool,
    },

    /// Set a global setting
    Set {
        /// One of daemon, ssl, use, web, protocol, server
        key: GlobalKey,
        value: String,
    },

    /// Remove a global setting
    Unset { key: GlobalKey },

    /// Append a domain entry
    AddDomain {
        /// Display name, e.g. "Home Domain"
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        login: String,
        #[arg(long, default_value = "")]
        password: String,
        /// Comma-separated host names
        #[arg(long, default_value = "")]
        hosts: String,
    },

    /// Edit the first domain entry with the given name
    EditDomain {
        name: String,
        #[arg(long)]
        rename: Option<String>,
        #[arg(long)]
        login: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Comma-separated host names
        #[arg(long)]
        hosts: Option<String>,
    },

    /// Remove the first domain entry with the given name
    RemoveDomain { name: String },

    /// Write the configuration to another file
    Export { path: PathBuf },

    /// Run MCP server over stdio
    Mcp,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (found, mut config) = store::load_or_default(&FileStore, cli.config.as_deref())?;
    // Edits go back where they came from, else to the requested or system path.
    let target = found
        .or(cli.config)
        .unwrap_or_else(|| PathBuf::from(SYSTEM_CONFIG_PATH));

    match cli.command {
        Commands::Show { json } => cmd_show(&config, json)?,
        Commands::Set { key, value } => {
            config.set_global(key, Some(value));
            save(&config, &target)?;
        }
        Commands::Unset { key } => {
            config.set_global(key, None);
            save(&config, &target)?;
        }
        Commands::AddDomain {
            name,
            login,
            password,
            hosts,
        } => {
            let domain = DomainEntry::new(name, login, password, parse_host_list(&hosts))?;
            warn_unmarked(&domain);
            config.add_domain(domain);
            save(&config, &target)?;
        }
        Commands::EditDomain {
            name,
            rename,
            login,
            password,
            hosts,
        } => {
            let index = config.domain_index(&name)?;
            let domain = config.domains[index].edited(DomainEdit {
                name: rename,
                login,
                password,
                hosts: hosts.map(|h| parse_host_list(&h)),
            })?;
            warn_unmarked(&domain);
            config.update_domain(index, domain)?;
            save(&config, &target)?;
        }
        Commands::RemoveDomain { name } => {
            let index = config.domain_index(&name)?;
            config.remove_domain(index)?;
            save(&config, &target)?;
        }
        Commands::Export { path } => save(&config, &path)?,
        Commands::Mcp => cmd_mcp(config, Some(target))?,
    }

    Ok(())
}

fn cmd_show(config: &Configuration, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", serialize(config));
    }
    Ok(())
}

fn save(config: &Configuration, path: &Path) -> anyhow::Result<()> {
    store::save(config, path)
        .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn warn_unmarked(domain: &DomainEntry) {
    if !domain.has_marker_name() {
        eprintln!(
            "warning: \"{}\" does not contain \"Domain\"; ddclient-conf will not read this block back",
            domain.name
        );
    }
}

#[tokio::main(flavor = "current_thread")]
async fn cmd_mcp(config: Configuration, path: Option<PathBuf>) -> anyhow::Result<()> {
    let server = McpServer::new(config, path);
    server.run().await?;
    Ok(())
}
