use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use domain_search::api::{ProxyState, create_router};
use domain_search::config::Config;
use domain_search::render::render;
use domain_search::search::{ProxyClient, SearchSession};
use domain_search::upstream::HttpUpstream;

#[derive(Parser)]
#[command(name = "domain-search", about = "Domain name search proxy")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the suggestion proxy
    Serve {
        /// Address to listen on, overrides BIND_ADDR
        #[arg(long)]
        bind: Option<String>,
    },
    /// Interactive search against a running proxy. Each stdin line replaces
    /// the query; `:tld <value>` sets the TLD filter.
    Search {
        #[arg(long, default_value = "http://localhost:3000")]
        proxy: String,
        #[arg(long, default_value = "")]
        tld: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => serve(bind).await,
        Command::Search { proxy, tld } => search(proxy, tld).await,
    }
}

async fn serve(bind: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::from_env();
    if let Some(bind) = bind {
        config.bind_addr = bind;
    }
    if config.credentials().is_err() {
        log::warn!("API credentials are not configured, searches will fail until they are");
    }

    let upstream = HttpUpstream::new(config.upstream_url.clone());
    let bind_addr = config.bind_addr.clone();
    let app = create_router(ProxyState::new(config, upstream));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    log::info!("listening on {bind_addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn search(proxy: String, tld: String) -> anyhow::Result<()> {
    let session = SearchSession::new(ProxyClient::new(proxy));
    let mut view_rx = session.subscribe();
    if !tld.is_empty() {
        session.set_tld(tld);
    }

    let printer = tokio::spawn(async move {
        let mut last = String::new();
        while view_rx.changed().await.is_ok() {
            let rendered = render(&view_rx.borrow_and_update());
            if !rendered.is_empty() && rendered != last {
                println!("{rendered}\n");
            }
            last = rendered;
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match tld_command(&line) {
            Some(tld) => session.set_tld(tld),
            None => session.set_query(line),
        }
    }

    session.settle().await;
    // give the printer a chance to show the final view
    tokio::task::yield_now().await;
    printer.abort();
    Ok(())
}

/// `:tld` clears the filter, `:tld <value>` sets it. Anything else is a query.
fn tld_command(line: &str) -> Option<&str> {
    if line == ":tld" {
        return Some("");
    }
    line.strip_prefix(":tld ").map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tld_command() {
        assert_eq!(tld_command(":tld io"), Some("io"));
        assert_eq!(tld_command(":tld  com "), Some("com"));
        assert_eq!(tld_command(":tld"), Some(""));
        assert_eq!(tld_command(":tldio"), None);
        assert_eq!(tld_command("example"), None);
    }
}
