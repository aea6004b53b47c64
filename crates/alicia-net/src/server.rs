//! The accept loop: one per listener (Lobby, Ranch, Race, Messenger).
//! Each accepted connection gets a reader task (descrambles frames off
//! the wire and forwards them to the director's inbound channel) and a
//! writer task (drains the client's outbound queue, scrambling as it
//! goes), mirroring the split-socket, task-per-direction shape used
//! throughout the reference networking stack.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::client::{ClientHandle, ClientId, ClientIdAllocator};
use crate::codec::ConnectionCodec;
use crate::frame::{drain_frames, drain_messenger_frames};

const READ_BUF_GROWTH: usize = 4096;

/// What a listener's connections are scrambled with. Lobby/Ranch/Race
/// share the rolling-code keystream; Messenger uses the fixed key.
#[derive(Debug, Clone, Copy)]
pub enum ScrambleKind {
    Rolling { scramble_outbound: bool },
    Messenger,
}

/// A frame delivered to the owning director, already descrambled.
#[derive(Debug)]
pub enum Inbound {
    Connected { client: ClientHandle },
    Command { client_id: ClientId, command_id: u16, body: Vec<u8> },
    Disconnected { client_id: ClientId },
}

/// Tracks every currently-connected client so a director can broadcast
/// by iterating, or look a specific client up by id.
#[derive(Debug, Default, Clone)]
pub struct ClientRegistry(Arc<Mutex<HashMap<ClientId, ClientHandle>>>);

impl ClientRegistry {
    pub fn get(&self, id: ClientId) -> Option<ClientHandle> {
        self.0.lock().get(&id).cloned()
    }

    pub fn iter_all(&self) -> Vec<ClientHandle> {
        self.0.lock().values().cloned().collect()
    }

    fn insert(&self, handle: ClientHandle) {
        self.0.lock().insert(handle.id(), handle);
    }

    fn remove(&self, id: ClientId) {
        self.0.lock().remove(&id);
    }
}

/// Runs the accept loop for one listener until the socket errors out.
/// Returns once `bind` fails; callers typically `tokio::spawn` this
/// per listener at startup.
pub async fn run_listener(
    bind_addr: SocketAddr,
    scramble_kind: ScrambleKind,
    inbound_tx: flume::Sender<Inbound>,
    registry: ClientRegistry,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, "listening");

    let id_alloc = Arc::new(ClientIdAllocator::default());

    loop {
        let (stream, peer_addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                warn!("failed to accept connection: {e}");
                continue;
            }
        };

        if let Err(e) = stream.set_nodelay(true) {
            debug!("failed to set TCP_NODELAY: {e}");
        }

        let client_id = id_alloc.next();
        let inbound_tx = inbound_tx.clone();
        let registry = registry.clone();

        tokio::spawn(async move {
            handle_connection(stream, peer_addr, client_id, scramble_kind, inbound_tx, registry).await;
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    client_id: ClientId,
    scramble_kind: ScrambleKind,
    inbound_tx: flume::Sender<Inbound>,
    registry: ClientRegistry,
) {
    // One rolling code is shared by both directions of a connection: the
    // reader rolls it forward on every inbound frame, and the writer
    // reads its *current* value to scramble a reply without advancing
    // it further (see `ConnectionCodec::scramble_outbound`). Two
    // independently-seeded codecs would silently diverge after the
    // first inbound frame.
    //
    // Seeded at zero, not random: the real client starts its own
    // keystream at zero and rolls once before its first command, so a
    // server seed other than zero decrypts every connection's first
    // inbound frame to garbage.
    let seed = 0;
    let codec = match scramble_kind {
        ScrambleKind::Rolling { scramble_outbound } => ConnectionCodec::rolling(seed, scramble_outbound),
        ScrambleKind::Messenger => ConnectionCodec::messenger(),
    };
    let codec = Arc::new(Mutex::new(codec));

    let (outbound_tx, outbound_rx) = flume::unbounded::<Vec<u8>>();
    let handle = ClientHandle::new(client_id, peer_addr, outbound_tx);
    registry.insert(handle.clone());

    if inbound_tx.send_async(Inbound::Connected { client: handle }).await.is_err() {
        registry.remove(client_id);
        return;
    }

    let (mut reader, mut writer) = stream.into_split();

    let writer_codec = codec.clone();
    let writer_task = tokio::spawn(async move {
        while let Ok(mut frame) = outbound_rx.recv_async().await {
            writer_codec.lock().scramble_outbound(&mut frame);
            if let Err(e) = writer.write_all(&frame).await {
                debug!("error writing to {peer_addr}: {e}");
                break;
            }
        }
    });

    let mut buf = BytesMut::with_capacity(READ_BUF_GROWTH);
    let mut scratch = vec![0u8; READ_BUF_GROWTH];

    loop {
        let n = match reader.read(&mut scratch).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!("error reading from {peer_addr}: {e}");
                break;
            }
        };
        buf.extend_from_slice(&scratch[..n]);

        let frames = match scramble_kind {
            ScrambleKind::Rolling { .. } => drain_frames(&mut buf),
            ScrambleKind::Messenger => drain_messenger_frames(&mut buf),
        };
        let frames = match frames {
            Ok(frames) => frames,
            Err(e) => {
                debug!("malformed frame from {peer_addr}: {e}");
                break;
            }
        };

        for mut frame in frames {
            let body = codec.lock().descramble_inbound(&mut frame.body);
            let event = Inbound::Command { client_id, command_id: frame.command_id, body };
            if inbound_tx.send_async(event).await.is_err() {
                break;
            }
        }
    }

    writer_task.abort();
    registry.remove(client_id);
    let _ = inbound_tx.send_async(Inbound::Disconnected { client_id }).await;
}
