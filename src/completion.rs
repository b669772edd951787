//! The single-resolution completion signal.

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use tokio::sync::watch;

/// Resolving side of the signal, owned by the animation.
#[derive(Debug)]
pub(crate) struct Completion {
    tx: watch::Sender<bool>,
}

impl Completion {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Resolve the signal. Returns `true` only for the call that resolved it.
    pub(crate) fn resolve(&self) -> bool {
        self.tx.send_if_modified(|done| !std::mem::replace(done, true))
    }

    pub(crate) fn subscribe(&self) -> Finished {
        Finished {
            rx: self.tx.subscribe(),
        }
    }
}

/// Awaitable that resolves once the animation has permanently stopped,
/// either through natural completion or `destroy()`.
///
/// Any number of handles may wait on the same animation. Awaiting an
/// already resolved handle returns immediately.
#[derive(Debug, Clone)]
pub struct Finished {
    rx: watch::Receiver<bool>,
}

impl Finished {
    pub fn is_resolved(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for resolution. Also returns if the animation was dropped.
    pub async fn wait(mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl IntoFuture for Finished {
    type Output = ();
    type IntoFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.wait())
    }
}
