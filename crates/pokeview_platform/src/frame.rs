//! Frame tick primitive
//!
//! The host contract is the classic "run this once before the next paint"
//! pair: [`FrameHost::request_tick`] registers a one-shot callback and
//! returns a [`TickId`], [`FrameHost::cancel_tick`] withdraws it.
//!
//! Three hosts ship with this crate:
//!
//! - [`ManualFrameHost`] - ticks only when [`ManualFrameHost::advance`] is called.
//!   Deterministic, used by tests and headless tools.
//! - [`IntervalFrameHost`] - ticks from a background thread at a fixed rate.
//! - [`HeadlessFrameHost`] - has no frame primitive at all; every request fails
//!   with [`PlatformError::Unavailable`].

use crate::error::{PlatformError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// One-shot callback invoked with the host timestamp in milliseconds
pub type TickCallback = Box<dyn FnOnce(f64) + Send>;

/// Identifier of a pending tick request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(u64);

impl TickId {
    /// Convert to the raw counter value
    pub fn to_raw(self) -> u64 {
        self.0
    }

    /// Reconstruct from a raw counter value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// A host that can run a callback before its next repaint
///
/// Timestamps passed to callbacks are monotonic milliseconds on the host's
/// own clock; only differences between them are meaningful.
pub trait FrameHost: Send + Sync {
    /// Schedule `callback` to run once on the next frame
    fn request_tick(&self, callback: TickCallback) -> Result<TickId>;

    /// Withdraw a pending tick. Unknown or already-run ids are ignored.
    fn cancel_tick(&self, id: TickId);

    /// Short host name for logging
    fn name(&self) -> &'static str;
}

// ============================================================================
// Tick Queue
// ============================================================================

/// Ordered queue of pending tick callbacks shared by the bundled hosts
#[derive(Default)]
struct TickQueue {
    pending: Vec<(TickId, TickCallback)>,
    next_id: u64,
}

impl TickQueue {
    fn push(&mut self, callback: TickCallback) -> TickId {
        self.next_id += 1;
        let id = TickId(self.next_id);
        self.pending.push((id, callback));
        id
    }

    fn cancel(&mut self, id: TickId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(pending_id, _)| *pending_id != id);
        self.pending.len() != before
    }

    /// Remove the oldest callback registered before `cutoff`
    fn pop_before(&mut self, cutoff: u64) -> Option<TickCallback> {
        let index = self
            .pending
            .iter()
            .position(|(id, _)| id.to_raw() <= cutoff)?;
        Some(self.pending.remove(index).1)
    }
}

fn lock_queue(queue: &Mutex<TickQueue>) -> MutexGuard<'_, TickQueue> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run every callback that was pending when dispatch began
///
/// The queue lock is released while each callback runs, so callbacks may
/// request or cancel ticks. Requests made during dispatch wait for the next
/// frame; cancellations take effect immediately.
fn dispatch(queue: &Mutex<TickQueue>, timestamp_ms: f64) -> usize {
    let cutoff = lock_queue(queue).next_id;
    let mut ran = 0;
    loop {
        let next = lock_queue(queue).pop_before(cutoff);
        match next {
            Some(callback) => {
                callback(timestamp_ms);
                ran += 1;
            }
            None => break,
        }
    }
    ran
}

// ============================================================================
// Manual Host
// ============================================================================

/// A frame host driven explicitly by the caller
///
/// Nothing runs until [`advance`](Self::advance) is called with a timestamp.
/// Clones share the same queue.
///
/// ```ignore
/// let host = ManualFrameHost::new();
/// host.request_tick(Box::new(|ts| println!("frame at {ts}")))?;
/// host.advance(16.0);
/// ```
#[derive(Clone, Default)]
pub struct ManualFrameHost {
    queue: Arc<Mutex<TickQueue>>,
}

impl ManualFrameHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame at `timestamp_ms`
    ///
    /// Returns the number of callbacks that ran. A panic inside a callback
    /// propagates to the caller; callbacks not yet reached stay pending.
    pub fn advance(&self, timestamp_ms: f64) -> usize {
        dispatch(&self.queue, timestamp_ms)
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending_count(&self) -> usize {
        lock_queue(&self.queue).pending.len()
    }
}

impl FrameHost for ManualFrameHost {
    fn request_tick(&self, callback: TickCallback) -> Result<TickId> {
        Ok(lock_queue(&self.queue).push(callback))
    }

    fn cancel_tick(&self, id: TickId) {
        lock_queue(&self.queue).cancel(id);
    }

    fn name(&self) -> &'static str {
        "manual"
    }
}

// ============================================================================
// Interval Host
// ============================================================================

/// A frame host that ticks from its own thread at a fixed rate
///
/// All callbacks run on the tick thread, one at a time, in request order.
/// The thread stops when the host is dropped or [`stop`](Self::stop) is called.
///
/// A panicking callback is logged and the thread keeps ticking. Callbacks
/// still pending in that frame run on the next one.
pub struct IntervalFrameHost {
    queue: Arc<Mutex<TickQueue>>,
    stop_flag: Arc<AtomicBool>,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl IntervalFrameHost {
    /// Start ticking at `fps` frames per second
    pub fn start(fps: u32) -> Result<Self> {
        if fps == 0 {
            return Err(PlatformError::InitFailed(
                "frame rate must be positive".to_string(),
            ));
        }

        let queue = Arc::new(Mutex::new(TickQueue::default()));
        let stop_flag = Arc::new(AtomicBool::new(false));

        let thread_queue = Arc::clone(&queue);
        let thread_stop = Arc::clone(&stop_flag);
        let frame_duration = Duration::from_micros(1_000_000 / u64::from(fps));

        let handle = thread::Builder::new()
            .name("pokeview-frames".to_string())
            .spawn(move || {
                let origin = Instant::now();
                while !thread_stop.load(Ordering::Relaxed) {
                    let start = Instant::now();
                    let timestamp_ms = origin.elapsed().as_secs_f64() * 1000.0;
                    let frame = panic::catch_unwind(AssertUnwindSafe(|| {
                        dispatch(&thread_queue, timestamp_ms)
                    }));
                    if frame.is_err() {
                        tracing::error!(
                            "IntervalFrameHost: tick callback panicked at {:.1}ms",
                            timestamp_ms
                        );
                    }

                    let elapsed = start.elapsed();
                    if elapsed < frame_duration {
                        thread::sleep(frame_duration - elapsed);
                    }
                }
            })
            .map_err(|e| PlatformError::InitFailed(format!("tick thread: {}", e)))?;

        tracing::debug!("IntervalFrameHost: ticking at {} fps", fps);

        Ok(Self {
            queue,
            stop_flag,
            thread_handle: Mutex::new(Some(handle)),
        })
    }

    /// Stop the tick thread; pending callbacks never run
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        let handle = self
            .thread_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.thread().id() != thread::current().id() && handle.join().is_err() {
                tracing::error!("IntervalFrameHost: tick thread terminated abnormally");
            }
        }
    }

    /// Check if the tick thread is still running
    pub fn is_running(&self) -> bool {
        !self.stop_flag.load(Ordering::Relaxed)
    }
}

impl FrameHost for IntervalFrameHost {
    fn request_tick(&self, callback: TickCallback) -> Result<TickId> {
        if !self.is_running() {
            return Err(PlatformError::Unavailable(
                "interval host has been stopped".to_string(),
            ));
        }
        Ok(lock_queue(&self.queue).push(callback))
    }

    fn cancel_tick(&self, id: TickId) {
        lock_queue(&self.queue).cancel(id);
    }

    fn name(&self) -> &'static str {
        "interval"
    }
}

impl Drop for IntervalFrameHost {
    fn drop(&mut self) {
        self.stop();
    }
}

// ============================================================================
// Headless Host
// ============================================================================

/// A host with no frame primitive
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessFrameHost;

impl FrameHost for HeadlessFrameHost {
    fn request_tick(&self, _callback: TickCallback) -> Result<TickId> {
        Err(PlatformError::Unavailable(
            "headless host has no frame primitive".to_string(),
        ))
    }

    fn cancel_tick(&self, _id: TickId) {}

    fn name(&self) -> &'static str {
        "headless"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<f64>>>, impl Fn() -> TickCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let make = move || -> TickCallback {
            let sink = Arc::clone(&sink);
            Box::new(move |ts| sink.lock().unwrap().push(ts))
        };
        (seen, make)
    }

    #[test]
    fn test_manual_host_runs_once() {
        let host = ManualFrameHost::new();
        let (seen, make) = recorder();

        host.request_tick(make()).unwrap();
        assert_eq!(host.pending_count(), 1);

        assert_eq!(host.advance(16.0), 1);
        assert_eq!(host.advance(32.0), 0);
        assert_eq!(*seen.lock().unwrap(), vec![16.0]);
    }

    #[test]
    fn test_manual_host_cancel() {
        let host = ManualFrameHost::new();
        let (seen, make) = recorder();

        let id = host.request_tick(make()).unwrap();
        host.cancel_tick(id);
        host.cancel_tick(id);

        assert_eq!(host.advance(16.0), 0);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_requests_during_dispatch_wait_for_next_frame() {
        let host = ManualFrameHost::new();
        let (seen, make) = recorder();

        let inner_host = host.clone();
        let inner = make();
        host.request_tick(Box::new(move |_| {
            inner_host.request_tick(inner).unwrap();
        }))
        .unwrap();

        assert_eq!(host.advance(1.0), 1);
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(host.advance(2.0), 1);
        assert_eq!(*seen.lock().unwrap(), vec![2.0]);
    }

    #[test]
    fn test_cancel_during_dispatch_is_immediate() {
        let host = ManualFrameHost::new();
        let (seen, make) = recorder();

        let canceller = host.clone();
        let victim = Arc::new(Mutex::new(None::<TickId>));
        let victim_ref = Arc::clone(&victim);
        host.request_tick(Box::new(move |_| {
            if let Some(id) = *victim_ref.lock().unwrap() {
                canceller.cancel_tick(id);
            }
        }))
        .unwrap();
        *victim.lock().unwrap() = Some(host.request_tick(make()).unwrap());

        assert_eq!(host.advance(5.0), 1);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_headless_host_is_unavailable() {
        let host = HeadlessFrameHost;
        let result = host.request_tick(Box::new(|_| {}));
        assert!(matches!(result, Err(PlatformError::Unavailable(_))));
    }

    #[test]
    fn test_interval_host_ticks() {
        let host = IntervalFrameHost::start(240).unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        host.request_tick(Box::new(move |ts| {
            let _ = tx.send(ts);
        }))
        .unwrap();

        let ts = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(ts >= 0.0);

        host.stop();
        assert!(!host.is_running());
        assert!(host.request_tick(Box::new(|_| {})).is_err());
    }

    #[test]
    fn test_interval_host_survives_panicking_callback() {
        let host = IntervalFrameHost::start(240).unwrap();
        let (tx, rx) = std::sync::mpsc::channel();

        host.request_tick(Box::new(|_| panic!("render failed"))).unwrap();
        let first = tx.clone();
        host.request_tick(Box::new(move |_| {
            let _ = first.send(1);
        }))
        .unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 1);

        // Requests made after the panic still tick
        assert!(host.is_running());
        host.request_tick(Box::new(move |_| {
            let _ = tx.send(2);
        }))
        .unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 2);

        host.stop();
    }

    #[test]
    fn test_interval_host_rejects_zero_fps() {
        assert!(matches!(
            IntervalFrameHost::start(0),
            Err(PlatformError::InitFailed(_))
        ));
    }
}
