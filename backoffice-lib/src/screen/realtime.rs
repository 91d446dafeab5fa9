//! Realtime change watchers

use std::future::Future;

use futures::StreamExt;
use futures::stream::select_all;
use log::debug;
use log::trace;
use log::warn;
use tokio::task::JoinHandle;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::StoreError;
use crate::store::ChangeEvent;
use crate::store::ChangeKind;
use crate::store::RemoteStore;

/// Runs a handler for every change event on a set of tables.
///
/// Each event spawns its own handler task; handlers may overlap and are
/// not coalesced. The watcher stops when its token is cancelled or every
/// subscription ends, then waits for running handlers to finish.
#[derive(Debug)]
pub struct Watcher {
    cancel: CancellationToken,
    handle: JoinHandle<usize>,
}

impl Watcher {
    /// Subscribes to `tables` and starts dispatching events.
    ///
    /// Fails if any subscription is refused.
    pub fn spawn<F, Fut>(
        store: &dyn RemoteStore,
        tables: &[&str],
        kinds: &[ChangeKind],
        cancel: CancellationToken,
        on_change: F,
    ) -> Result<Self, StoreError>
    where
        F: Fn(ChangeEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let streams = tables
            .iter()
            .map(|table| store.subscribe(table, kinds))
            .collect::<Result<Vec<_>, _>>()?;
        let mut events = select_all(streams);
        let token = cancel.clone();
        let watched = tables.join(", ");

        let handle = tokio::spawn(async move {
            let mut running = JoinSet::new();
            let mut dispatched = 0;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    event = events.next() => match event {
                        Some(event) => {
                            trace!("{} on {} ({:?})", event.kind, event.table, event.id);
                            running.spawn(on_change(event));
                            dispatched += 1;
                        }
                        None => {
                            debug!("Subscriptions on {watched} ended");
                            break;
                        }
                    },
                    Some(done) = running.join_next(), if !running.is_empty() => {
                        if let Err(e) = done {
                            warn!("Change handler on {watched} failed: {e}");
                        }
                    }
                }
            }
            while let Some(done) = running.join_next().await {
                if let Err(e) = done {
                    warn!("Change handler on {watched} failed: {e}");
                }
            }
            dispatched
        });

        Ok(Self { cancel, handle })
    }

    /// Returns `true` once the dispatch loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancels the watcher and waits for running handlers.
    ///
    /// Returns how many events were dispatched.
    pub async fn stop(self) -> usize {
        self.cancel.cancel();
        self.handle.await.unwrap_or_else(|e| {
            warn!("Watcher task failed: {e}");
            0
        })
    }
}
