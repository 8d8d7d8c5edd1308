//! A scan context that forwards the lifecycle over an async channel.
//!
//! [`ChannelContext`] bridges the synchronous scan thread to async
//! consumers: every lifecycle notification becomes a [`ScanUpdate`] sent
//! into a bounded tokio mpsc channel. A UI task can then drive rendering
//! from the receiver without touching the scan thread.

use camino::{Utf8Path, Utf8PathBuf};
use tokio::sync::mpsc;
use tracing::debug;

use crate::context::ScanContext;

/// One scan lifecycle notification, in channel form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanUpdate<T> {
    /// The scan started; accumulated state on the consumer side is stale.
    Started,
    /// One item was classified, with its source file.
    ItemFound(Box<(Utf8PathBuf, T)>),
    /// The walk completed (possibly cancelled); no further items follow.
    Finished,
}

/// Forwards scan notifications into a tokio mpsc channel.
///
/// Sends block the scan thread when the channel is full, which gives slow
/// consumers natural backpressure. Once the receiver is dropped the context
/// goes quiet: remaining notifications are discarded rather than failing
/// the scan.
///
/// # Examples
///
/// ```
/// use dcm_scanner::{ChannelContext, ScanUpdate};
/// use tokio::sync::mpsc;
///
/// let (tx, mut rx) = mpsc::channel::<ScanUpdate<String>>(64);
/// let context = ChannelContext::new(tx);
/// drop(context);
/// assert!(rx.try_recv().is_err());
/// ```
#[derive(Debug)]
pub struct ChannelContext<T> {
    tx: mpsc::Sender<ScanUpdate<T>>,
    /// Set once a send fails; suppresses further send attempts.
    disconnected: bool,
}

impl<T> ChannelContext<T> {
    /// Creates a context that sends into the given channel.
    #[must_use]
    pub const fn new(tx: mpsc::Sender<ScanUpdate<T>>) -> Self {
        Self {
            tx,
            disconnected: false,
        }
    }

    /// Returns `true` once the receiving side was observed to be gone.
    #[inline]
    #[must_use]
    pub const fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    fn send(&mut self, update: ScanUpdate<T>) {
        if self.disconnected {
            return;
        }
        if self.tx.blocking_send(update).is_err() {
            debug!("scan update receiver dropped, discarding further updates");
            self.disconnected = true;
        }
    }
}

impl<T> ScanContext<T> for ChannelContext<T>
where
    T: Clone + Send,
{
    fn on_scan_start(&mut self) {
        self.send(ScanUpdate::Started);
    }

    fn on_item_found(&mut self, file: &Utf8Path, item: &T) {
        self.send(ScanUpdate::ItemFound(Box::new((
            file.to_owned(),
            item.clone(),
        ))));
    }

    fn on_scan_finish(&mut self) {
        self.send(ScanUpdate::Finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates_arrive_in_lifecycle_order() {
        let (tx, mut rx) = mpsc::channel::<ScanUpdate<String>>(8);
        let mut context = ChannelContext::new(tx);

        context.on_scan_start();
        context.on_item_found(Utf8Path::new("/data/a.dcm"), &"item-a".to_owned());
        context.on_scan_finish();
        drop(context);

        assert_eq!(rx.blocking_recv(), Some(ScanUpdate::Started));
        let Some(ScanUpdate::ItemFound(found)) = rx.blocking_recv() else {
            panic!("expected an item update");
        };
        assert_eq!(found.0.as_str(), "/data/a.dcm");
        assert_eq!(found.1, "item-a");
        assert_eq!(rx.blocking_recv(), Some(ScanUpdate::Finished));
        assert_eq!(rx.blocking_recv(), None);
    }

    #[test]
    fn test_dropped_receiver_silences_context() {
        let (tx, rx) = mpsc::channel::<ScanUpdate<String>>(8);
        let mut context = ChannelContext::new(tx);
        drop(rx);

        context.on_scan_start();
        assert!(context.is_disconnected());

        // Further notifications are no-ops, not panics.
        context.on_item_found(Utf8Path::new("/data/a.dcm"), &"item".to_owned());
        context.on_scan_finish();
        assert!(context.is_disconnected());
    }
}
