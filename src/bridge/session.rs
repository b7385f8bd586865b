//! Connection session - the per-peer exchange loop

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::codec;
use super::command::CommandMailbox;
use super::snapshot::SnapshotCell;

/// Why a session ended
#[derive(Debug)]
enum CloseReason {
    PeerDisconnected,
    Io(std::io::Error),
    Stopped,
    EncodeFailed(codec::CodecError),
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PeerDisconnected => write!(f, "peer disconnected"),
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Stopped => write!(f, "stopped by bridge"),
            Self::EncodeFailed(e) => write!(f, "encode failed: {e}"),
        }
    }
}

/// One accepted agent connection and its exchange loop.
///
/// Each iteration is independent: send the latest committed snapshot, read
/// at most one buffer's worth of reply, commit a successfully decoded
/// command to the mailbox, then pace. Decode failures keep the previous
/// command; only transport faults or a stop signal (bridge shutdown or
/// displacement by a newer connection) end the session. The socket
/// is owned by the session and dropped on every exit path.
pub struct ConnectionSession {
    stream: TcpStream,
    peer: SocketAddr,
    snapshot: Arc<SnapshotCell>,
    mailbox: Arc<CommandMailbox>,
    pacing: Duration,
    read_buffer_bytes: usize,
    stop: watch::Receiver<bool>,
}

impl ConnectionSession {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        snapshot: Arc<SnapshotCell>,
        mailbox: Arc<CommandMailbox>,
        pacing: Duration,
        read_buffer_bytes: usize,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            stream,
            peer,
            snapshot,
            mailbox,
            pacing,
            read_buffer_bytes,
            stop,
        }
    }

    /// Run the exchange loop until the peer goes away or the bridge stops
    pub async fn run(mut self) {
        info!(peer = %self.peer, "Agent connected");
        let reason = self.exchange_loop().await;
        match &reason {
            CloseReason::Io(e) => warn!(peer = %self.peer, error = %e, "Session closed"),
            CloseReason::EncodeFailed(e) => error!(peer = %self.peer, error = %e, "Session closed"),
            _ => info!(peer = %self.peer, reason = %reason, "Session closed"),
        }
        // Socket and buffers are released here regardless of exit path
    }

    async fn exchange_loop(&mut self) -> CloseReason {
        let mut buf = vec![0u8; self.read_buffer_bytes];

        loop {
            let line = match codec::encode(&self.snapshot.load()) {
                Ok(line) => line,
                Err(e) => return CloseReason::EncodeFailed(e),
            };

            // Both socket waits are raced against the stop signal so neither
            // shutdown nor displacement waits on a silent or stalled peer
            tokio::select! {
                result = self.stream.write_all(line.as_bytes()) => {
                    if let Err(e) = result {
                        return CloseReason::Io(e);
                    }
                }
                _ = self.stop.changed() => return CloseReason::Stopped,
            }

            let n = tokio::select! {
                result = self.stream.read(&mut buf) => match result {
                    Ok(n) => n,
                    Err(e) => return CloseReason::Io(e),
                },
                _ = self.stop.changed() => return CloseReason::Stopped,
            };

            if n == 0 {
                return CloseReason::PeerDisconnected;
            }

            match codec::decode(&buf[..n]) {
                Ok(command) => {
                    debug!(peer = %self.peer, action = command.action, force = command.interval, "Command received");
                    self.mailbox.write(command);
                }
                Err(e) => {
                    // Previous command stays in the mailbox untouched
                    warn!(peer = %self.peer, error = %e, "Discarding malformed agent payload");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.pacing) => {}
                _ = self.stop.changed() => return CloseReason::Stopped,
            }
        }
    }
}
