//! Accept loop - one agent connection at a time

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::command::CommandMailbox;
use super::session::ConnectionSession;
use super::snapshot::SnapshotCell;

/// Shared state and settings handed to each accepted session
pub struct ListenerContext {
    pub snapshot: Arc<SnapshotCell>,
    pub mailbox: Arc<CommandMailbox>,
    pub session_interval: Duration,
    pub read_buffer_bytes: usize,
    pub shutdown: watch::Receiver<bool>,
}

/// A spawned session and the signal that retires it
struct ActiveSession {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ActiveSession {
    /// Signal the session to stop and wait for it to release its socket
    async fn retire(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }
}

/// Accept agent connections until shutdown or a listener-level fault.
///
/// One peer at a time: accepting a new connection retires any prior
/// session before the replacement is spawned, so at most one live session
/// ever holds the mailbox. The latest-connection-wins behavior of the
/// original one-client design is preserved; the old session is stopped
/// explicitly instead of being left to share the socket reference. Accept
/// errors end the loop; the bridge is then non-functional until restarted,
/// while the simulation side keeps ticking.
pub async fn accept_loop(listener: TcpListener, mut ctx: ListenerContext) {
    let mut active: Option<ActiveSession> = None;

    loop {
        let (stream, peer) = tokio::select! {
            result = listener.accept() => match result {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "Accept failed, listener stopping");
                    break;
                }
            },
            _ = ctx.shutdown.changed() => {
                info!("Listener shutting down");
                break;
            }
        };

        if let Some(previous) = active.take() {
            if !previous.handle.is_finished() {
                warn!(peer = %peer, "New agent connection retires the live session");
            }
            previous.retire().await;
        }

        // Each session gets its own stop channel: fired on displacement by
        // the next accept, or on bridge shutdown below
        let (stop_tx, stop_rx) = watch::channel(false);
        let session = ConnectionSession::new(
            stream,
            peer,
            ctx.snapshot.clone(),
            ctx.mailbox.clone(),
            ctx.session_interval,
            ctx.read_buffer_bytes,
            stop_rx,
        );
        active = Some(ActiveSession {
            stop: stop_tx,
            handle: tokio::spawn(session.run()),
        });
    }

    if let Some(session) = active {
        session.retire().await;
    }
}
