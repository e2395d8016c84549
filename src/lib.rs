//! Line Chat Relay Library
//!
//! A TCP chat relay built on tokio: clients connect, join a named room
//! with a nickname, and exchange newline-delimited text with everyone else
//! in that room.
//!
//! # Features
//! - `JOIN <room> <nick>` handshake with a timeout
//! - Rooms created on first join, shared by name
//! - Chat lines relayed to every other member, timestamped
//! - Slash-commands: `/list`, `/help`, `/quit`
//! - Join and leave notices
//!
//! # Architecture
//! Shared state behind reader/writer locks:
//! - `Registry` maps room names to `Room`s
//! - Each `Room` holds its joined `Client`s
//! - Every connection has a read task and a write task joined by a bounded
//!   outbound queue; broadcasts never wait on a slow reader, they drop
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use linechat::{serve, Registry, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:9000").await.unwrap();
//!     serve(listener, Arc::new(Registry::new()), Arc::new(ServerConfig::default())).await;
//! }
//! ```

pub mod client;
pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod registry;
pub mod room;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use client::Client;
pub use codec::ChatLineCodec;
pub use command::{Command, Flow};
pub use config::ServerConfig;
pub use error::{ChatError, HandshakeError};
pub use handler::{handle_connection, handle_stream};
pub use message::ServerMessage;
pub use registry::Registry;
pub use room::Room;
pub use server::{run, serve};
pub use session::{Session, SessionState};
pub use types::SessionId;
