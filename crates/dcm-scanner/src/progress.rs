//! Observable scan progress with cooperative cancellation.
//!
//! This module provides the [`Progress`] capability and its two
//! implementations:
//!
//! - [`ProgressMonitor`]: mutable observable state. The scanner drives it;
//!   an external thread (typically a UI) may observe changes and request
//!   cancellation through it. This is the only object both sides of a scan
//!   mutate.
//! - [`NullProgress`]: the zero-overhead variant for callers that do not
//!   want progress tracking. Mutators silently succeed, accessors return
//!   fixed defaults, nothing ever fires.
//!
//! # Listener latency
//!
//! Change notifications are delivered synchronously, in subscription order,
//! after the internal state lock is released (so a listener may re-enter
//! the monitor). A slow listener therefore delays the scan; no timeout is
//! enforced. Keep listener callbacks cheap.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// The observable fields of a progress monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressField {
    /// The cancelled flag.
    Cancelled,
    /// The free-form description line.
    Description,
    /// The indeterminate flag.
    Indeterminate,
    /// The upper progress bound.
    Maximum,
    /// The lower progress bound.
    Minimum,
    /// The title line.
    Title,
    /// The current progress value.
    Value,
}

impl ProgressField {
    /// Returns the canonical field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Description => "description",
            Self::Indeterminate => "indeterminate",
            Self::Maximum => "maximum",
            Self::Minimum => "minimum",
            Self::Title => "title",
            Self::Value => "value",
        }
    }
}

/// A field value carried by a change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressValue {
    /// A boolean field (cancelled, indeterminate).
    Flag(bool),
    /// A numeric field (minimum, maximum, value).
    Count(u64),
    /// A text field (title, description).
    Text(String),
}

/// One change notification: which field changed, from what, to what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// The field that changed.
    pub field: ProgressField,
    /// The value before the change.
    pub old: ProgressValue,
    /// The value after the change.
    pub new: ProgressValue,
}

/// A change-notification callback.
pub type ProgressListener = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Handle identifying one subscription, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Observable progress state with subscribe/unsubscribe and cancellation.
///
/// Implemented by [`ProgressMonitor`] (the real thing) and [`NullProgress`]
/// (the silent no-op).
pub trait Progress: Send + Sync {
    /// Returns the title line.
    fn title(&self) -> String;
    /// Sets the title line.
    fn set_title(&self, title: &str);
    /// Returns the description line.
    fn description(&self) -> String;
    /// Sets the description line.
    fn set_description(&self, description: &str);
    /// Returns the lower progress bound.
    fn minimum(&self) -> u64;
    /// Sets the lower bound; pulls the maximum up and clamps the value as needed.
    fn set_minimum(&self, minimum: u64);
    /// Returns the upper progress bound.
    fn maximum(&self) -> u64;
    /// Sets the upper bound; pulls the minimum down and clamps the value as needed.
    fn set_maximum(&self, maximum: u64);
    /// Returns the current value.
    fn value(&self) -> u64;
    /// Sets the current value, clamped into `[minimum, maximum]`.
    fn set_value(&self, value: u64);
    /// Returns `true` while the bounds are meaningless.
    fn is_indeterminate(&self) -> bool;
    /// Switches between indeterminate and determinate mode.
    fn set_indeterminate(&self, indeterminate: bool);
    /// Returns `true` if cancellation requests are honored.
    fn is_cancellable(&self) -> bool;
    /// Returns `true` once cancellation was requested.
    fn is_cancelled(&self) -> bool;
    /// Requests or clears cancellation. Setting `true` is a no-op when the
    /// monitor is not cancellable.
    fn set_cancelled(&self, cancelled: bool);
    /// Registers a change listener; it fires for every subsequent change.
    fn subscribe(&self, listener: ProgressListener) -> ListenerId;
    /// Removes a listener; returns `true` if it was registered.
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// Mutable fields, kept behind one lock so multi-field mutators (bound
/// clamping) stay consistent.
#[derive(Debug, Default)]
struct MonitorState {
    title: String,
    description: String,
    minimum: u64,
    maximum: u64,
    value: u64,
    indeterminate: bool,
    cancelled: bool,
}

/// The concrete observable progress monitor.
///
/// # Invariants
///
/// - `minimum <= value <= maximum` at all times; mutating one bound adjusts
///   the others to preserve this
/// - `cancelled` can only become `true` on a cancellable monitor
/// - every effective change fires one [`ProgressEvent`] to all listeners,
///   synchronously, in subscription order
///
/// # Examples
///
/// ```
/// use dcm_scanner::{Progress, ProgressMonitor};
///
/// let progress = ProgressMonitor::cancellable();
/// progress.set_maximum(10);
/// progress.set_value(3);
/// assert_eq!(progress.value(), 3);
///
/// progress.set_cancelled(true);
/// assert!(progress.is_cancelled());
/// ```
pub struct ProgressMonitor {
    /// Fixed at construction; gates the cancelled flag.
    cancellable: bool,
    state: Mutex<MonitorState>,
    listeners: Mutex<Vec<(ListenerId, ProgressListener)>>,
    next_listener_id: AtomicU64,
}

impl std::fmt::Debug for ProgressMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressMonitor")
            .field("cancellable", &self.cancellable)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ProgressMonitor {
    /// Creates a monitor.
    ///
    /// # Arguments
    ///
    /// * `cancellable` - Whether cancellation requests are honored
    #[must_use]
    pub fn new(cancellable: bool) -> Self {
        Self {
            cancellable,
            state: Mutex::new(MonitorState::default()),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
        }
    }

    /// Creates a cancellable monitor (the common case for scans).
    #[must_use]
    pub fn cancellable() -> Self {
        Self::new(true)
    }

    /// Delivers events to all listeners, in subscription order, outside the
    /// state lock.
    fn fire(&self, events: &[ProgressEvent]) {
        if events.is_empty() {
            return;
        }
        let listeners: Vec<ProgressListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for event in events {
            for listener in &listeners {
                listener(event);
            }
        }
    }

    /// Re-establishes `minimum <= value <= maximum` after a bound change,
    /// collecting an event for any value clamp.
    fn clamp_value(state: &mut MonitorState, events: &mut Vec<ProgressEvent>) {
        let clamped = state.value.clamp(state.minimum, state.maximum);
        if clamped != state.value {
            events.push(ProgressEvent {
                field: ProgressField::Value,
                old: ProgressValue::Count(state.value),
                new: ProgressValue::Count(clamped),
            });
            state.value = clamped;
        }
    }
}

impl Progress for ProgressMonitor {
    fn title(&self) -> String {
        self.state.lock().title.clone()
    }

    fn set_title(&self, title: &str) {
        let mut events = Vec::new();
        {
            let mut state = self.state.lock();
            if state.title != title {
                events.push(ProgressEvent {
                    field: ProgressField::Title,
                    old: ProgressValue::Text(state.title.clone()),
                    new: ProgressValue::Text(title.to_owned()),
                });
                state.title = title.to_owned();
            }
        }
        self.fire(&events);
    }

    fn description(&self) -> String {
        self.state.lock().description.clone()
    }

    fn set_description(&self, description: &str) {
        let mut events = Vec::new();
        {
            let mut state = self.state.lock();
            if state.description != description {
                events.push(ProgressEvent {
                    field: ProgressField::Description,
                    old: ProgressValue::Text(state.description.clone()),
                    new: ProgressValue::Text(description.to_owned()),
                });
                state.description = description.to_owned();
            }
        }
        self.fire(&events);
    }

    fn minimum(&self) -> u64 {
        self.state.lock().minimum
    }

    fn set_minimum(&self, minimum: u64) {
        let mut events = Vec::new();
        {
            let mut state = self.state.lock();
            if state.minimum != minimum {
                events.push(ProgressEvent {
                    field: ProgressField::Minimum,
                    old: ProgressValue::Count(state.minimum),
                    new: ProgressValue::Count(minimum),
                });
                state.minimum = minimum;
            }
            if state.maximum < minimum {
                events.push(ProgressEvent {
                    field: ProgressField::Maximum,
                    old: ProgressValue::Count(state.maximum),
                    new: ProgressValue::Count(minimum),
                });
                state.maximum = minimum;
            }
            Self::clamp_value(&mut state, &mut events);
        }
        self.fire(&events);
    }

    fn maximum(&self) -> u64 {
        self.state.lock().maximum
    }

    fn set_maximum(&self, maximum: u64) {
        let mut events = Vec::new();
        {
            let mut state = self.state.lock();
            if state.maximum != maximum {
                events.push(ProgressEvent {
                    field: ProgressField::Maximum,
                    old: ProgressValue::Count(state.maximum),
                    new: ProgressValue::Count(maximum),
                });
                state.maximum = maximum;
            }
            if state.minimum > maximum {
                events.push(ProgressEvent {
                    field: ProgressField::Minimum,
                    old: ProgressValue::Count(state.minimum),
                    new: ProgressValue::Count(maximum),
                });
                state.minimum = maximum;
            }
            Self::clamp_value(&mut state, &mut events);
        }
        self.fire(&events);
    }

    fn value(&self) -> u64 {
        self.state.lock().value
    }

    fn set_value(&self, value: u64) {
        let mut events = Vec::new();
        {
            let mut state = self.state.lock();
            let clamped = value.clamp(state.minimum, state.maximum);
            if clamped != state.value {
                events.push(ProgressEvent {
                    field: ProgressField::Value,
                    old: ProgressValue::Count(state.value),
                    new: ProgressValue::Count(clamped),
                });
                state.value = clamped;
            }
        }
        self.fire(&events);
    }

    fn is_indeterminate(&self) -> bool {
        self.state.lock().indeterminate
    }

    fn set_indeterminate(&self, indeterminate: bool) {
        let mut events = Vec::new();
        {
            let mut state = self.state.lock();
            if state.indeterminate != indeterminate {
                events.push(ProgressEvent {
                    field: ProgressField::Indeterminate,
                    old: ProgressValue::Flag(state.indeterminate),
                    new: ProgressValue::Flag(indeterminate),
                });
                state.indeterminate = indeterminate;
            }
        }
        self.fire(&events);
    }

    fn is_cancellable(&self) -> bool {
        self.cancellable
    }

    fn is_cancelled(&self) -> bool {
        self.state.lock().cancelled
    }

    fn set_cancelled(&self, cancelled: bool) {
        if cancelled && !self.cancellable {
            return;
        }
        let mut events = Vec::new();
        {
            let mut state = self.state.lock();
            if state.cancelled != cancelled {
                events.push(ProgressEvent {
                    field: ProgressField::Cancelled,
                    old: ProgressValue::Flag(state.cancelled),
                    new: ProgressValue::Flag(cancelled),
                });
                state.cancelled = cancelled;
            }
        }
        self.fire(&events);
    }

    fn subscribe(&self, listener: ProgressListener) -> ListenerId {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }
}

/// The silent progress variant.
///
/// All mutators succeed without effect, accessors return zero/false/empty,
/// and no notification ever fires. Use it when progress tracking is not
/// wanted, at zero overhead.
///
/// # Examples
///
/// ```
/// use dcm_scanner::{NullProgress, Progress};
///
/// let progress = NullProgress;
/// progress.set_maximum(100);
/// assert_eq!(progress.maximum(), 0);
/// progress.set_cancelled(true);
/// assert!(!progress.is_cancelled());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl Progress for NullProgress {
    fn title(&self) -> String {
        String::new()
    }
    fn set_title(&self, _title: &str) {}
    fn description(&self) -> String {
        String::new()
    }
    fn set_description(&self, _description: &str) {}
    fn minimum(&self) -> u64 {
        0
    }
    fn set_minimum(&self, _minimum: u64) {}
    fn maximum(&self) -> u64 {
        0
    }
    fn set_maximum(&self, _maximum: u64) {}
    fn value(&self) -> u64 {
        0
    }
    fn set_value(&self, _value: u64) {}
    fn is_indeterminate(&self) -> bool {
        false
    }
    fn set_indeterminate(&self, _indeterminate: bool) {}
    fn is_cancellable(&self) -> bool {
        false
    }
    fn is_cancelled(&self) -> bool {
        false
    }
    fn set_cancelled(&self, _cancelled: bool) {}
    fn subscribe(&self, _listener: ProgressListener) -> ListenerId {
        ListenerId(0)
    }
    fn unsubscribe(&self, _id: ListenerId) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex as PlMutex;

    fn recording_listener() -> (ProgressListener, Arc<PlMutex<Vec<ProgressEvent>>>) {
        let events = Arc::new(PlMutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let listener: ProgressListener = Arc::new(move |event: &ProgressEvent| {
            sink.lock().push(event.clone());
        });
        (listener, events)
    }

    #[test]
    fn test_value_clamped_into_bounds() {
        let progress = ProgressMonitor::cancellable();
        progress.set_maximum(10);

        progress.set_value(25);
        assert_eq!(progress.value(), 10);

        progress.set_minimum(5);
        progress.set_value(2);
        assert_eq!(progress.value(), 5);
    }

    #[test]
    fn test_lowering_maximum_pulls_minimum_and_value() {
        let progress = ProgressMonitor::cancellable();
        progress.set_maximum(100);
        progress.set_minimum(50);
        progress.set_value(75);

        progress.set_maximum(20);
        assert_eq!(progress.maximum(), 20);
        assert_eq!(progress.minimum(), 20);
        assert_eq!(progress.value(), 20);
    }

    #[test]
    fn test_raising_minimum_pushes_maximum() {
        let progress = ProgressMonitor::cancellable();
        progress.set_maximum(10);

        progress.set_minimum(30);
        assert_eq!(progress.minimum(), 30);
        assert_eq!(progress.maximum(), 30);
        assert_eq!(progress.value(), 30);
    }

    #[test]
    fn test_cancel_requires_cancellable() {
        let progress = ProgressMonitor::new(false);
        progress.set_cancelled(true);
        assert!(!progress.is_cancelled());

        let progress = ProgressMonitor::cancellable();
        progress.set_cancelled(true);
        assert!(progress.is_cancelled());
    }

    #[test]
    fn test_listener_receives_changes_only() {
        let progress = ProgressMonitor::cancellable();
        let (listener, events) = recording_listener();
        progress.subscribe(listener);

        progress.set_description("working");
        progress.set_description("working"); // unchanged, must not fire
        progress.set_maximum(5);

        let events = events.lock();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].field, ProgressField::Description);
        assert_eq!(events[0].new, ProgressValue::Text("working".to_owned()));
        assert_eq!(events[1].field, ProgressField::Maximum);
        assert_eq!(events[1].old, ProgressValue::Count(0));
        assert_eq!(events[1].new, ProgressValue::Count(5));
    }

    #[test]
    fn test_listeners_fire_in_subscription_order() {
        let progress = ProgressMonitor::cancellable();
        let order = Arc::new(PlMutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let sink = Arc::clone(&order);
            progress.subscribe(Arc::new(move |_event: &ProgressEvent| {
                sink.lock().push(tag);
            }));
        }

        progress.set_title("scan");
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let progress = ProgressMonitor::cancellable();
        let (listener, events) = recording_listener();
        let id = progress.subscribe(listener);

        progress.set_maximum(1);
        assert!(progress.unsubscribe(id));
        assert!(!progress.unsubscribe(id));
        progress.set_maximum(2);

        assert_eq!(events.lock().len(), 1);
    }

    #[test]
    fn test_listener_may_reenter_monitor() {
        // The cancellation mirror reads state from inside the callback;
        // events must be delivered outside the state lock.
        let progress = Arc::new(ProgressMonitor::cancellable());
        let observed = Arc::new(PlMutex::new(0u64));

        let monitor = Arc::clone(&progress);
        let sink = Arc::clone(&observed);
        progress.subscribe(Arc::new(move |_event: &ProgressEvent| {
            *sink.lock() = monitor.maximum();
        }));

        progress.set_maximum(7);
        assert_eq!(*observed.lock(), 7);
    }

    #[test]
    fn test_null_progress_is_inert() {
        let progress = NullProgress;
        let (listener, events) = recording_listener();
        let id = progress.subscribe(listener);

        progress.set_title("t");
        progress.set_maximum(10);
        progress.set_value(5);
        progress.set_cancelled(true);

        assert!(progress.title().is_empty());
        assert_eq!(progress.maximum(), 0);
        assert_eq!(progress.value(), 0);
        assert!(!progress.is_cancellable());
        assert!(!progress.is_cancelled());
        assert!(!progress.unsubscribe(id));
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_field_names() {
        assert_eq!(ProgressField::Cancelled.name(), "cancelled");
        assert_eq!(ProgressField::Value.name(), "value");
        assert_eq!(ProgressField::Indeterminate.name(), "indeterminate");
    }
}
