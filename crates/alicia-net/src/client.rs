//! A connected client's identity and its serialized write queue.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use alicia_protocol::command::{encode_command, Command};

use crate::error::NetError;

/// Opaque per-connection identifier, unique for the lifetime of the
/// listener (never reused, unlike a world tracker's OID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(u64);

/// Hands out monotonically increasing [`ClientId`]s for one listener.
#[derive(Debug, Default)]
pub struct ClientIdAllocator(AtomicU64);

impl ClientIdAllocator {
    pub fn next(&self) -> ClientId {
        ClientId(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

/// A cloneable, thread-safe handle a director uses to queue outbound
/// frames to one connection; the actual write happens on that
/// connection's dedicated writer task, so a slow client can never
/// block the director's tick.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ClientId,
    peer_addr: SocketAddr,
    outbound: flume::Sender<Vec<u8>>,
}

impl ClientHandle {
    pub(crate) fn new(id: ClientId, peer_addr: SocketAddr, outbound: flume::Sender<Vec<u8>>) -> Self {
        Self { id, peer_addr, outbound }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Encodes `cmd` and queues the resulting frame for the writer
    /// task. The frame is not yet scrambled: that happens on the
    /// writer task, which owns the connection's rolling code.
    pub fn send_command<C: Command>(&self, cmd: &C) -> Result<(), NetError> {
        let frame = encode_command(cmd)?;
        self.outbound.try_send(frame).map_err(|_| NetError::SendFailed)
    }
}
