use std::sync::Arc;

use gridwalk_grid::Direction;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

/// Input commands sent from the render loop to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the demo sprite one cell.
    Move { direction: Direction, teleport: bool },
    /// Grow the grid by one column and re-place the sprite.
    AddColumn,
    /// Grow the grid by one row and re-place the sprite.
    AddRow,
}

/// Broadcast topic with bounded capacity.
/// `T` must be `Send + Sync` because we hop across threads.
#[derive(Debug, Clone)]
pub struct Topic<T> {
    tx: broadcast::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> Topic<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, msg: T) {
        let _ = self.tx.send(Arc::new(msg));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.tx.subscribe()
    }
}

/// Takes every message currently queued on `rx` without blocking.
///
/// Returns `None` once the topic has been closed.
pub fn drain<T: Clone>(rx: &mut broadcast::Receiver<Arc<T>>) -> Option<Vec<T>> {
    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(msg) => out.push((*msg).clone()),
            Err(TryRecvError::Empty) => return Some(out),
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "Command receiver lagged; dropped oldest commands");
            }
            Err(TryRecvError::Closed) => return None,
        }
    }
}
