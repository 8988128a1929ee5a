//! Cooperative cancellation of decode passes.

use futures::{channel::oneshot, future::Shared, FutureExt};

/// A one-time broadcast that can be polled without blocking by many consumers. It is used to
/// request that an in-flight decode pass stops.
///
/// The decoder never waits on a [Signal]. It checks [Signal::resolved] once per line
/// boundary, so a request is observed before the next line is read.
///
/// # Example
///
/// ```rust
/// use multistream_index::signal::Signaler;
///
/// let (signaler, mut signal) = Signaler::new();
/// assert_eq!(signal.resolved(), None);
///
/// // Request cancellation
/// signaler.signal(2);
/// assert_eq!(signal.resolved(), Some(2));
/// ```
#[derive(Clone, Default)]
pub enum Signal {
    /// A signal that will resolve when the signaler marks it as resolved.
    Open(Shared<oneshot::Receiver<i32>>),
    /// A signal that has been resolved with a known value.
    Closed(i32),
    /// A signal that never resolves.
    #[default]
    Never,
}

impl Signal {
    /// Returns the value the signal resolved with, if it has resolved.
    ///
    /// Once an open signal resolves (or its [Signaler] is dropped), it is replaced by
    /// [Signal::Closed] (or [Signal::Never]) so the channel is not polled again. A signal
    /// whose [Signaler] was dropped without signaling never resolves.
    pub fn resolved(&mut self) -> Option<i32> {
        match self {
            Signal::Open(rx) => match rx.now_or_never() {
                Some(Ok(value)) => {
                    *self = Signal::Closed(value);
                    Some(value)
                }
                Some(Err(_)) => {
                    *self = Signal::Never;
                    None
                }
                None => None,
            },
            Signal::Closed(value) => Some(*value),
            Signal::Never => None,
        }
    }
}

/// Coordinates a one-time cancellation request across every holder of a [Signal].
pub struct Signaler {
    tx: oneshot::Sender<i32>,
}

impl Signaler {
    /// Create a new [Signaler].
    ///
    /// Returns a [Signaler] and a [Signal] that will resolve when [Signaler::signal] is called.
    pub fn new() -> (Self, Signal) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, Signal::Open(rx.shared()))
    }

    /// Resolve all [Signal]s associated with this [Signaler].
    pub fn signal(self, value: i32) {
        let _ = self.tx.send(value);
    }
}
