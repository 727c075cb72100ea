use std::sync::Arc;

use clap::{Parser, Subcommand};
use wikifind::api;
use wikifind::client::WikiClient;
use wikifind::config::CONFIG;
use wikifind::session::SearchSession;

#[derive(Parser)]
#[command(name = "wikifind", about = "Search Wikipedia's opensearch API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single search and print the hits
    Search { query: String },
    /// Serve the search API and widget UI
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Search { query } => {
            let client = WikiClient::from_config();
            match client.search(&query).await {
                Ok(result) => {
                    for hit in result.hits() {
                        println!("{}", hit.title);
                        println!("  {}", hit.first_paragraph);
                        println!("  {}", hit.url);
                        println!();
                    }
                    println!("{} result(s) for {:?}", result.len(), result.query);
                }
                Err(e) => {
                    // Final catch at the top of the chain: log and exit.
                    log::error!("search failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Serve => {
            let session = Arc::new(SearchSession::new(WikiClient::from_config()));
            let router = api::create_router(session);
            let listener = tokio::net::TcpListener::bind(&CONFIG.bind_addr).await?;
            log::info!("listening on {}", CONFIG.bind_addr);
            axum::serve(listener, router).await?;
        }
    }
    Ok(())
}
