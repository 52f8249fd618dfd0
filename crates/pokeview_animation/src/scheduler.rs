//! Frame scheduler
//!
//! Turns the host's one-shot "before next repaint" primitive into a
//! continuous loop. Each tick runs the callback once and then requests the
//! following tick, so at most one tick is ever pending per loop.
//!
//! The loop is owned through the [`AnimationHandle`] returned by
//! [`FrameScheduler::start`]. Stopping (or dropping) the handle is the only
//! way to end a loop; there is no ambient running flag.
//!
//! # Elapsed time
//!
//! The callback receives milliseconds since the loop's *first* tick, so the
//! first invocation always sees exactly `0.0`.
//!
//! # Callback panics
//!
//! A panic inside the callback propagates out of the host's tick dispatch.
//! The loop is marked stopped before unwinding continues and never
//! schedules another tick. Other loops on the same host are unaffected.

use pokeview_platform::{FrameHost, PlatformError, TickId};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

/// Callback invoked with elapsed milliseconds on every tick
pub type FrameCallback = Box<dyn FnMut(f64) + Send>;

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared state of one running loop
struct LoopState {
    running: AtomicBool,
    /// The single tick currently requested from the host
    pending: Mutex<Option<TickId>>,
    /// Host timestamp of the first tick
    origin: Mutex<Option<f64>>,
    callback: Mutex<FrameCallback>,
    /// Thread currently inside the callback
    dispatching: Mutex<Option<ThreadId>>,
    ticks: AtomicU64,
}

impl LoopState {
    fn new(callback: FrameCallback) -> Self {
        Self {
            running: AtomicBool::new(true),
            pending: Mutex::new(None),
            origin: Mutex::new(None),
            callback: Mutex::new(callback),
            dispatching: Mutex::new(None),
            ticks: AtomicU64::new(0),
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Records the dispatching thread; marks the loop stopped if the callback unwinds
struct CallbackScope<'a>(&'a LoopState);

impl<'a> CallbackScope<'a> {
    fn enter(state: &'a LoopState) -> Self {
        *lock(&state.dispatching) = Some(thread::current().id());
        Self(state)
    }
}

impl Drop for CallbackScope<'_> {
    fn drop(&mut self) {
        lock(&self.0.dispatching).take();
        if thread::panicking() {
            self.0.running.store(false, Ordering::Release);
            lock(&self.0.pending).take();
            tracing::error!("FrameScheduler: tick callback panicked, loop stopped");
        }
    }
}

fn schedule_next(
    state: &Arc<LoopState>,
    host: &Arc<dyn FrameHost>,
) -> Result<(), PlatformError> {
    let tick_state = Arc::clone(state);
    let tick_host = Arc::clone(host);
    let id = host.request_tick(Box::new(move |timestamp_ms| {
        run_tick(tick_state, tick_host, timestamp_ms);
    }))?;
    *lock(&state.pending) = Some(id);
    Ok(())
}

fn run_tick(state: Arc<LoopState>, host: Arc<dyn FrameHost>, timestamp_ms: f64) {
    // A stop that raced with an already-dispatched tick lands here
    if !state.is_running() {
        return;
    }
    lock(&state.pending).take();

    let elapsed_ms = {
        let mut origin = lock(&state.origin);
        timestamp_ms - *origin.get_or_insert(timestamp_ms)
    };

    {
        let mut callback = lock(&state.callback);
        // Stopped from another thread since the check above
        if !state.is_running() {
            return;
        }
        let _scope = CallbackScope::enter(&state);
        (&mut *callback)(elapsed_ms);
    }
    let tick = state.ticks.fetch_add(1, Ordering::Relaxed) + 1;
    tracing::trace!("FrameScheduler: tick {} at {:.1}ms", tick, elapsed_ms);

    if !state.is_running() {
        return;
    }
    if let Err(e) = schedule_next(&state, &host) {
        state.running.store(false, Ordering::Release);
        tracing::warn!(
            "FrameScheduler: {} host refused next tick, loop stopped: {}",
            host.name(),
            e
        );
    }
}

/// Starts frame loops on a host
///
/// ```ignore
/// let host = Arc::new(ManualFrameHost::new());
/// let scheduler = FrameScheduler::new(host.clone());
///
/// let handle = scheduler.start(|elapsed_ms| println!("{elapsed_ms}"));
/// host.advance(0.0);
/// handle.stop();
/// ```
#[derive(Clone)]
pub struct FrameScheduler {
    host: Arc<dyn FrameHost>,
}

impl FrameScheduler {
    pub fn new(host: Arc<dyn FrameHost>) -> Self {
        Self { host }
    }

    /// The host ticks are requested from
    pub fn host(&self) -> &Arc<dyn FrameHost> {
        &self.host
    }

    /// Start a loop calling `callback` on every tick until stopped
    ///
    /// Returns immediately after registering the first tick. If the host has
    /// no frame primitive the loop never starts: the returned handle reports
    /// `is_running() == false` and the callback is never called.
    pub fn start<F>(&self, callback: F) -> AnimationHandle
    where
        F: FnMut(f64) + Send + 'static,
    {
        let state = Arc::new(LoopState::new(Box::new(callback)));

        match schedule_next(&state, &self.host) {
            Ok(()) => {
                tracing::debug!("FrameScheduler: loop started on {} host", self.host.name());
            }
            Err(e) => {
                state.running.store(false, Ordering::Release);
                tracing::warn!(
                    "FrameScheduler: {} host cannot tick, loop not started: {}",
                    self.host.name(),
                    e
                );
            }
        }

        AnimationHandle {
            state,
            host: Arc::clone(&self.host),
        }
    }
}

/// Owner of a running frame loop
///
/// Dropping the handle stops the loop.
pub struct AnimationHandle {
    state: Arc<LoopState>,
    host: Arc<dyn FrameHost>,
}

impl AnimationHandle {
    /// Stop the loop
    ///
    /// Cancels the pending tick; the callback is never invoked again, even if
    /// the host has already begun dispatching that tick. A callback running on
    /// another thread is waited out, so none is in flight once this returns.
    /// Safe to call any number of times, including from the callback itself.
    pub fn stop(&self) {
        if !self.state.running.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(id) = lock(&self.state.pending).take() {
            self.host.cancel_tick(id);
        }
        let from_callback = *lock(&self.state.dispatching) == Some(thread::current().id());
        if !from_callback {
            drop(lock(&self.state.callback));
        }
        tracing::debug!(
            "AnimationHandle: loop stopped after {} ticks",
            self.state.ticks.load(Ordering::Relaxed)
        );
    }

    /// Check if the loop will run again
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Number of completed callback invocations
    pub fn tick_count(&self) -> u64 {
        self.state.ticks.load(Ordering::Relaxed)
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("running", &self.is_running())
            .field("ticks", &self.tick_count())
            .finish()
    }
}
