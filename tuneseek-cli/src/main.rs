//! TuneSeek CLI
//!
//! Cross-platform track metadata search from the terminal or over HTTP.

mod server;

use std::fs;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use tuneseek_core::{Metadata, PlatformRegistry};
use tuneseek_engine::{create_dispatcher, load_embedded, load_from_file, SearchOutcome};
use tuneseek_extractors::ExtractorKind;
use tuneseek_net::{FetchConfig, TlsPolicy, DEFAULT_USER_AGENT};

#[derive(Parser)]
#[command(name = "tuneseek")]
#[command(author, version, about = "TuneSeek: cross-platform track metadata search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1", global = true)]
    verbose: u8,

    #[command(flatten)]
    net: NetOptions,
}

#[derive(Args)]
struct NetOptions {
    /// Platform catalog file (defaults to the built-in catalog)
    #[arg(long, env = "TUNESEEK_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "TUNESEEK_TIMEOUT", default_value = "30", global = true)]
    timeout: u64,

    /// Proxy for outbound requests (http, https or socks5h)
    #[arg(long, env = "TUNESEEK_PROXY", global = true)]
    proxy: Option<String>,

    /// User-Agent header sent to remote sites
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    user_agent: String,

    /// Validate certificates for every host
    #[arg(long, global = true, conflicts_with = "insecure_all_hosts")]
    strict_tls: bool,

    /// Skip certificate validation for every host
    #[arg(long, global = true)]
    insecure_all_hosts: bool,

    /// Skip certificate validation for this host (repeatable; defaults to the catalog hosts)
    #[arg(long = "insecure-host", global = true)]
    insecure_hosts: Vec<String>,
}

impl NetOptions {
    fn tls_policy(&self) -> TlsPolicy {
        if self.strict_tls {
            TlsPolicy::Verify
        } else if self.insecure_all_hosts {
            TlsPolicy::AcceptInvalid
        } else {
            TlsPolicy::AcceptInvalidFor(self.insecure_hosts.clone())
        }
    }

    fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            ..FetchConfig::default()
        }
        .with_timeout(self.timeout)
        .with_proxy(self.proxy.clone())
        .with_tls(self.tls_policy())
    }

    fn registry(&self) -> Result<PlatformRegistry> {
        match &self.catalog {
            Some(path) => load_from_file(path).with_context(|| format!("loading catalog {}", path.display())),
            None => Ok(load_embedded()?),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search one or more platforms
    Search {
        /// Platform id (repeatable)
        #[arg(short, long = "platform", required = true)]
        platforms: Vec<i64>,

        /// The search query
        #[arg(short, long)]
        query: String,

        /// Print records as JSON
        #[arg(long)]
        json: bool,

        /// Maximum concurrent platform searches
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },

    /// Run an extractor over a saved page
    Extract {
        /// Extractor to use (youtube, nicovideo, bilibili, amazon)
        #[arg(short, long)]
        platform: ExtractorKind,

        /// Saved page content
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List the platform catalog
    Platforms,

    /// Run the HTTP interface
    Serve {
        /// Listen address
        #[arg(long, env = "TUNESEEK_BIND", default_value = "0.0.0.0:8080")]
        bind: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    match cli.command {
        Commands::Search {
            platforms,
            query,
            json,
            concurrency,
        } => run_search(&cli.net, &platforms, &query, json, concurrency).await?,
        Commands::Extract { platform, file } => run_extract(platform, &file)?,
        Commands::Platforms => list_platforms(&cli.net.registry()?),
        Commands::Serve { bind } => {
            let dispatcher = create_dispatcher(cli.net.registry()?, cli.net.fetch_config())?;
            server::serve(bind, dispatcher).await?;
        }
    }

    Ok(())
}

async fn run_search(net: &NetOptions, platforms: &[i64], query: &str, json: bool, concurrency: usize) -> Result<()> {
    let dispatcher = create_dispatcher(net.registry()?, net.fetch_config())?;
    let results = dispatcher.search_many(platforms, query, concurrency).await;

    let mut failures = 0;
    for (id, result) in results {
        match result {
            Ok(SearchOutcome::Records(records)) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&records)?);
                } else {
                    let name = dispatcher.registry().get(id).map(|p| p.name.as_str()).unwrap_or("?");
                    println!("== {} ({} results)", name, records.len());
                    print_records(&records);
                }
            }
            Ok(SearchOutcome::Passthrough { content_type, body }) => {
                if json {
                    io::stdout().write_all(&body)?;
                } else {
                    println!(
                        "== platform {} has no extractor; {} bytes of {}",
                        id,
                        body.len(),
                        content_type.as_deref().unwrap_or("unknown content")
                    );
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("❌ platform {}: {}", id, e);
            }
        }
    }

    if failures == platforms.len() {
        anyhow::bail!("all searches failed");
    }
    Ok(())
}

fn run_extract(kind: ExtractorKind, file: &Path) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let content = String::from_utf8_lossy(&bytes);
    let records = kind.extract(&content);
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn list_platforms(registry: &PlatformRegistry) {
    for platform in registry.iter() {
        println!(
            "{:>4}  {:<16} {:<12} {}",
            platform.id,
            platform.name,
            format!("{:?}", platform.kind),
            platform.search_template().unwrap_or("-")
        );
    }
}

fn print_records(records: &[Metadata]) {
    for (i, record) in records.iter().enumerate() {
        println!("{:>3}. {}", i + 1, record.title.as_deref().unwrap_or("(untitled)"));
        if !record.artist.is_empty() {
            println!("     artist: {}", record.artist);
        }
        if let Some(url) = &record.from_url {
            println!("     url:    {}", url);
        }
        if let Some(image) = &record.image_url {
            println!("     image:  {}", image);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from(["tuneseek", "search", "-p", "1", "-p", "3", "-q", "ado"]).unwrap();
        match cli.command {
            Commands::Search { platforms, query, .. } => {
                assert_eq!(platforms, vec![1, 3]);
                assert_eq!(query, "ado");
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_tls_policy_flags() {
        let cli = Cli::try_parse_from(["tuneseek", "platforms", "--strict-tls"]).unwrap();
        assert_eq!(cli.net.tls_policy(), TlsPolicy::Verify);

        let cli = Cli::try_parse_from(["tuneseek", "platforms", "--insecure-all-hosts"]).unwrap();
        assert_eq!(cli.net.tls_policy(), TlsPolicy::AcceptInvalid);

        let cli = Cli::try_parse_from(["tuneseek", "platforms", "--insecure-host", "example.com"]).unwrap();
        assert_eq!(cli.net.tls_policy(), TlsPolicy::AcceptInvalidFor(vec!["example.com".into()]));
    }

    #[test]
    fn test_conflicting_tls_flags_rejected() {
        assert!(Cli::try_parse_from(["tuneseek", "platforms", "--strict-tls", "--insecure-all-hosts"]).is_err());
    }

    #[test]
    fn test_extract_accepts_extractor_names() {
        let cli = Cli::try_parse_from(["tuneseek", "extract", "--platform", "NicoVideo", "--file", "page.html"]).unwrap();
        assert!(matches!(cli.command, Commands::Extract { platform: ExtractorKind::NicoVideo, .. }));
    }
}
