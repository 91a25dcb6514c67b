//! `gambit-server`: one chess table over WebSocket.

use clap::Parser;
use gambit::GambitServer;
use gambit_chess::{StandardChess, parse_fen};
use gambit_table::TableConfig;
use tracing_subscriber::EnvFilter;

/// Serve a single two-player chess table with spectators.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Starting position as FEN (defaults to the standard setup)
    #[arg(long)]
    fen: Option<String>,

    /// Longest chat line relayed, in characters
    #[arg(long, default_value_t = 500)]
    max_chat_len: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let start = parse_fen(args.fen.as_deref())?;
    let config = TableConfig {
        max_chat_len: args.max_chat_len,
        ..TableConfig::default()
    };

    let server = GambitServer::builder()
        .bind(&format!("{}:{}", args.host, args.port))
        .table_config(config)
        .build::<StandardChess>(start)
        .await?;

    tracing::info!(addr = %server.local_addr()?, "listening");
    server.run().await?;
    Ok(())
}
