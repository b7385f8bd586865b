//! Agent bridge modules

pub mod codec;
pub mod command;
pub mod listener;
pub mod sampler;
pub mod session;
pub mod snapshot;
pub mod tick;

pub use command::{Command, CommandMailbox, ACTION_APPLY_FORCE, ACTION_RELEASE};
pub use snapshot::{Snapshot, SnapshotCell};
pub use tick::TickCoordinator;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;

use listener::ListenerContext;

/// The running network half of the bridge.
///
/// Owns the listener task, the shared snapshot cell and command mailbox, and
/// the shutdown signal - explicit lifecycle instead of ambient static state.
/// The tick side holds clones of the cell and mailbox through a
/// [`TickCoordinator`] and never touches the network directly.
pub struct Bridge {
    snapshot: Arc<SnapshotCell>,
    mailbox: Arc<CommandMailbox>,
    shutdown: watch::Sender<bool>,
    accept_task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl Bridge {
    /// Bind the configured address and start accepting agent connections.
    /// Bind failures surface here; everything after is log-only.
    pub async fn start(config: &Config) -> std::io::Result<Self> {
        let listener = TcpListener::bind(config.bind_addr).await?;
        let local_addr = listener.local_addr()?;

        let snapshot = Arc::new(SnapshotCell::new());
        let mailbox = Arc::new(CommandMailbox::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(addr = %local_addr, "Bridge listening for agent");

        let ctx = ListenerContext {
            snapshot: snapshot.clone(),
            mailbox: mailbox.clone(),
            session_interval: config.session_interval,
            read_buffer_bytes: config.read_buffer_bytes,
            shutdown: shutdown_rx,
        };
        let accept_task = tokio::spawn(listener::accept_loop(listener, ctx));

        Ok(Self {
            snapshot,
            mailbox,
            shutdown: shutdown_tx,
            accept_task,
            local_addr,
        })
    }

    /// Shared snapshot cell the session encodes from
    pub fn snapshot(&self) -> Arc<SnapshotCell> {
        self.snapshot.clone()
    }

    /// Shared mailbox the session decodes into
    pub fn mailbox(&self) -> Arc<CommandMailbox> {
        self.mailbox.clone()
    }

    /// Bound listener address (useful when binding port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Build a tick coordinator wired to this bridge's shared state
    pub fn tick_coordinator(&self) -> TickCoordinator {
        TickCoordinator::new(self.snapshot(), self.mailbox())
    }

    /// Signal shutdown and wait for the listener and any live session to
    /// reach their next cancellation point
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.accept_task.await;
        info!("Bridge stopped");
    }
}
