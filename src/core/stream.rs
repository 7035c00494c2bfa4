use std::fmt;
use std::fmt::{Debug, Formatter};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use crate::core::library::DataResult;

// Single-slot channel with overwrite-on-full semantics: if emissions outpace
// the consumer, only the newest value is retained.
pub(crate) fn channel<T: Clone>() -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = watch::channel(None);
    (Sender { tx }, Receiver { rx })
}

pub(crate) struct Sender<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> Sender<T> {
    // Returns false once every receiver is gone, so emitters can detach.
    pub fn send(&self, value: T) -> bool {
        self.tx.send(Some(value)).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub(crate) struct Receiver<T> {
    rx: watch::Receiver<Option<T>>,
}

impl<T: Clone> Receiver<T> {
    // Waits for an emission that has not been seen yet. Returns None once the
    // sender is gone and the latest emission has been consumed.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            match self.rx.changed().await {
                Ok(()) => {
                    // The slot starts empty, skip the initial placeholder.
                    if let Some(value) = self.rx.borrow_and_update().clone() {
                        return Some(value);
                    }
                }
                Err(_) => return None,
            }
        }
    }
}

/// A live, conflated sequence of store emissions. Dropping (or cancelling)
/// the feed detaches the backend listener that drives it.
pub struct Feed<T: Clone> {
    rx: Receiver<DataResult<T>>,
    guard: Option<JoinHandle<()>>,
}

impl<T: Clone> Feed<T> {
    pub(crate) fn new(rx: Receiver<DataResult<T>>, guard: Option<JoinHandle<()>>) -> Self {
        Self { rx, guard }
    }

    /// Next unseen emission; None when the feed has ended. After an Err
    /// emission the feed ends.
    pub async fn recv(&mut self) -> Option<DataResult<T>> {
        self.rx.recv().await
    }

    /// Detaches the underlying listener without waiting for it.
    pub fn cancel(&mut self) {
        if let Some(guard) = self.guard.take() {
            guard.abort();
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Feed<T> {
    // Re-emits every item through a conversion, keeping the conflation policy.
    // A conversion failure ends the downstream feed with that error.
    pub(crate) fn translate<U, F>(mut self, mut convert: F) -> Feed<U>
        where U: Clone + Send + Sync + 'static,
              F: FnMut(T) -> DataResult<U> + Send + 'static {
        let (tx, rx) = channel();
        let pump = tokio::spawn(async move {
            while let Some(item) = self.recv().await {
                let converted = match item {
                    Ok(value) => convert(value),
                    Err(err) => Err(err),
                };
                let failed = converted.is_err();
                if !tx.send(converted) || failed {
                    break;
                }
            }
        });
        Feed::new(rx, Some(pump))
    }
}

impl<T: Clone> Drop for Feed<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<T: Clone> Debug for Feed<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feed")
            .field("live", &self.guard.as_ref().map(|g| !g.is_finished()))
            .finish()
    }
}
