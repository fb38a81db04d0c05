//! Delayed loop messages
//!
//! A timer is a spawned task that sleeps and posts one message back to the
//! controller. Repeating timers re-arm from the handler of that message, which
//! is also where the "keep going?" check lives.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A pending message; aborted when cancelled or dropped
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn after<M: Send + 'static>(delay: Duration, tx: &mpsc::Sender<M>, msg: M) -> Self {
        let tx = tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(msg).await;
        });
        Self { handle }
    }

    pub fn cancel(self) {
        // Drop aborts
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
