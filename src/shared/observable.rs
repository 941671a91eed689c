//! Observable value cell backed by a `tokio::sync::watch` channel.
//!
//! Every store and every derived output is an `Observable`. Replacing the value
//! is atomic (readers see either the old or the new value, never a partial one)
//! and marks all subscribers as changed before `replace` returns.

use futures_util::Stream;
use tokio::sync::watch;

/// A single observable value.
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the held value and notify subscribers. Returns the previous value.
    ///
    /// Succeeds even when nobody is subscribed.
    pub fn replace(&self, value: T) -> T {
        self.tx.send_replace(value)
    }

    /// Read-only subscription. The receiver starts with the current value
    /// marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Borrow the current value. Do not hold across an `.await`.
    pub fn borrow(&self) -> watch::Ref<'_, T> {
        self.tx.borrow()
    }
}

impl<T: Clone> Observable<T> {
    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Stream of values: the current one first, then one item per change.
    ///
    /// Intermediate values replaced faster than the consumer polls are skipped;
    /// the stream always converges on the latest value. Ends when the
    /// observable is dropped.
    pub fn changes(&self) -> impl Stream<Item = T> + Send + 'static {
        changes(self.tx.subscribe())
    }
}

/// Stream over an existing receiver, with the same semantics as
/// [`Observable::changes`]. Starts from the receiver's current value.
pub fn changes<T>(mut rx: watch::Receiver<T>) -> impl Stream<Item = T> + Send + 'static
where
    T: Clone + Send + Sync + 'static,
{
    async_stream::stream! {
        loop {
            let value = rx.borrow_and_update().clone();
            yield value;
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.tx.borrow())
            .field("subscribers", &self.tx.receiver_count())
            .finish()
    }
}
