//! TCP connection handler
//!
//! Handles individual client connections: JOIN handshake, then a read task
//! and a write task running side by side until the client goes away.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info, warn};

use crate::client::Client;
use crate::codec::ChatLineCodec;
use crate::command::Flow;
use crate::config::ServerConfig;
use crate::error::{ChatError, HandshakeError};
use crate::message::ServerMessage;
use crate::registry::Registry;
use crate::session::Session;
use crate::types::SessionId;

type LineReader<R> = FramedRead<R, ChatLineCodec>;
type LineWriter<W> = FramedWrite<W, ChatLineCodec>;

/// Handle a new TCP connection
pub async fn handle_connection(
    stream: TcpStream,
    registry: Arc<Registry>,
    config: Arc<ServerConfig>,
) -> Result<(), ChatError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let (read_half, write_half) = stream.into_split();
    handle_stream(read_half, write_half, peer_addr, registry, config).await
}

/// Drive one connection given its two halves
///
/// Runs the JOIN handshake, joins the requested room, and drives the
/// session until the read side ends. Teardown (leave room, close queue,
/// close transport) happens exactly once on every path past the handshake.
pub async fn handle_stream<R, W>(
    reader: R,
    writer: W,
    peer_addr: String,
    registry: Arc<Registry>,
    config: Arc<ServerConfig>,
) -> Result<(), ChatError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    debug!("Connection from {} waiting for JOIN", peer_addr);

    let mut lines = FramedRead::new(reader, ChatLineCodec::new(config.max_line_length));
    let mut sink = FramedWrite::new(writer, ChatLineCodec::new(config.max_line_length));

    sink.send(ServerMessage::Welcome.to_string()).await?;

    let (room_name, nick) = match handshake(&mut lines, config.handshake_timeout).await {
        Ok(joined) => joined,
        Err(err) => {
            warn!("Handshake with {} failed: {}", peer_addr, err);
            // Best effort; the peer may already be gone
            let _ = sink.send(ServerMessage::from(&err).to_string()).await;
            let _ = SinkExt::<String>::close(&mut sink).await;
            return Err(err);
        }
    };

    let (msg_tx, msg_rx) = mpsc::channel::<ServerMessage>(config.queue_capacity.max(1));
    let client_id = SessionId::new();
    let client = Arc::new(Client::new(client_id, nick, msg_tx));
    let room = registry.get_or_create_room(&room_name);

    info!(
        "Client {} ({}) joined room {} as '{}'",
        client_id, peer_addr, room_name, client.nick
    );

    let mut session = Session::join(client, room, peer_addr.clone());

    // Spawn write task (outbound queue -> transport)
    let mut write_task = tokio::spawn(write_loop(sink, msg_rx, client_id));

    let result = read_loop(&session, &mut lines).await;
    if let Err(e) = &result {
        warn!("Read error for {}: {}", client_id, e);
    }

    session.leave();
    // Last sender goes with the session; the write task drains and exits
    drop(session);

    match timeout(config.drain_timeout, &mut write_task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Write task for {} failed: {}", client_id, e),
        Err(_) => {
            warn!(
                "Write task for {} still draining after {:?}, closing",
                client_id, config.drain_timeout
            );
            write_task.abort();
        }
    }
    drop(lines);

    info!("Client {} ({}) disconnected", client_id, peer_addr);

    result
}

/// Wait for the first line and parse it as a JOIN request
async fn handshake<R: AsyncRead + Unpin>(
    lines: &mut LineReader<R>,
    limit: Duration,
) -> Result<(String, String), ChatError> {
    let line = match timeout(limit, lines.next()).await {
        Err(_) => return Err(HandshakeError::Timeout.into()),
        Ok(None) => return Err(HandshakeError::Disconnected.into()),
        Ok(Some(line)) => line?,
    };

    Ok(parse_join(&line)?)
}

/// Parse `JOIN <room> <nick...>`
///
/// The keyword is case-insensitive, the room is one token and the nickname
/// is every remaining token joined by single spaces.
pub fn parse_join(line: &str) -> Result<(String, String), HandshakeError> {
    let mut tokens = line.split_whitespace();

    match (tokens.next(), tokens.next()) {
        (Some(keyword), Some(room)) if keyword.eq_ignore_ascii_case("JOIN") => {
            let nick = tokens.collect::<Vec<_>>().join(" ");
            if nick.is_empty() {
                return Err(HandshakeError::Malformed);
            }
            Ok((room.to_string(), nick))
        }
        _ => Err(HandshakeError::Malformed),
    }
}

/// Read task body (transport -> session)
///
/// Ends on EOF, on a read error, or when the session asks to quit.
async fn read_loop<R: AsyncRead + Unpin>(
    session: &Session,
    lines: &mut LineReader<R>,
) -> Result<(), ChatError> {
    while let Some(line) = lines.next().await {
        let line = line?;
        if session.handle_line(&line) == Flow::Quit {
            break;
        }
    }
    Ok(())
}

/// Write task body (outbound queue -> transport)
///
/// Writes and flushes one line per message. Stops at the first write error,
/// leaving anything still queued undelivered.
async fn write_loop<W: AsyncWrite + Unpin>(
    mut sink: LineWriter<W>,
    mut msg_rx: mpsc::Receiver<ServerMessage>,
    client_id: SessionId,
) {
    while let Some(msg) = msg_rx.recv().await {
        if let Err(e) = sink.send(msg.to_string()).await {
            debug!("Write failed for {}: {}, ending write task", client_id, e);
            break;
        }
    }
    debug!("Write task ended for {}", client_id);

    // Shut down our half of the transport
    let _ = SinkExt::<String>::close(&mut sink).await;
}
