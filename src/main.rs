//! Line chat relay - Entry Point
//!
//! Parses arguments, sets up logging and runs the acceptor.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use linechat::config::{
    ServerConfig, DEFAULT_ADDR, DEFAULT_DRAIN_TIMEOUT, DEFAULT_HANDSHAKE_TIMEOUT,
    DEFAULT_MAX_LINE_LENGTH, DEFAULT_QUEUE_CAPACITY,
};

#[derive(Parser, Debug)]
#[command(name = "linechat")]
#[command(about = "Line-oriented TCP chat relay with named rooms", long_about = None)]
struct Args {
    /// Address to listen on, e.g. 0.0.0.0:9000
    #[arg(short, long, default_value = DEFAULT_ADDR)]
    addr: String,

    /// Outbound messages buffered per client before new ones are dropped
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Seconds a new connection has to send its JOIN line
    #[arg(long, default_value_t = DEFAULT_HANDSHAKE_TIMEOUT.as_secs())]
    handshake_timeout: u64,

    /// Milliseconds a closing connection may spend flushing queued output
    #[arg(long, default_value_t = DEFAULT_DRAIN_TIMEOUT.as_millis() as u64)]
    drain_timeout: u64,

    /// Longest accepted input line in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=linechat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("linechat=info")),
        )
        .init();

    let args = Args::parse();

    let config = ServerConfig {
        addr: args.addr,
        queue_capacity: args.queue_capacity,
        handshake_timeout: Duration::from_secs(args.handshake_timeout),
        drain_timeout: Duration::from_millis(args.drain_timeout),
        max_line_length: args.max_line_length,
    };

    linechat::server::run(config).await?;
    Ok(())
}
