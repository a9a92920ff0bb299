use futures::{stream::BoxStream, StreamExt};
use log::debug;

/// Owned handle on an async value stream.
///
/// Releasing drops the stream, so the producer sees its receiver gone and no
/// later value can be delivered. Dropping the handle releases it too.
pub struct Subscription<T> {
    stream: Option<BoxStream<'static, T>>,
}

impl<T> Subscription<T> {
    pub fn new(stream: BoxStream<'static, T>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    /// Next value; `None` once the stream ended or the subscription was released
    pub async fn next(&mut self) -> Option<T> {
        match self.stream.as_mut() {
            Some(stream) => stream.next().await,
            None => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Drops the stream; returns whether it was still held
    pub fn release(&mut self) -> bool {
        let was_active = self.stream.take().is_some();
        if was_active {
            debug!("Released subscription");
        }
        was_active
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.release();
    }
}
