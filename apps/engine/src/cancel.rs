use tokio::sync::watch;

/// Caller-side handle that cancels a pipeline run.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Run-side view of cancellation. Clone freely; every clone observes the same handle.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    rx: watch::Receiver<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl CancellationSignal {
    /// A connected handle/signal pair.
    pub fn pair() -> (CancelHandle, CancellationSignal) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancellationSignal { rx })
    }

    /// A signal that never fires.
    pub fn never() -> CancellationSignal {
        // A closed channel never reports cancellation.
        let (_handle, signal) = Self::pair();
        signal
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the run is cancelled. Pends forever if the handle is
    /// dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
