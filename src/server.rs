//! Listener / acceptor
//!
//! Accepts TCP connections and spawns one session task per connection.
//! Each connection runs in its own task, so a failing or panicking session
//! never takes the acceptor or its neighbours down.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::error::ChatError;
use crate::handler::handle_connection;
use crate::registry::Registry;

/// Bind the configured address and serve forever
pub async fn run(config: ServerConfig) -> Result<(), ChatError> {
    let listener = TcpListener::bind(&config.addr).await?;
    info!("Chat server listening on {}", listener.local_addr()?);

    serve(listener, Arc::new(Registry::new()), Arc::new(config)).await;
    Ok(())
}

/// Connection accept loop
///
/// Accept errors are logged and the loop keeps going.
pub async fn serve(listener: TcpListener, registry: Arc<Registry>, config: Arc<ServerConfig>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let registry = Arc::clone(&registry);
                let config = Arc::clone(&config);

                // Spawn handler task for each connection
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, registry, config).await {
                        warn!("Connection {} ended with error: {}", addr, e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
