//! One-shot broadcast signal.
//!
//! A [Wakeup] starts unfired. Firing it releases every waiter at once, blocked
//! threads and pending futures alike, and it stays fired forever after.
//! [Distributor](crate::Distributor) hands the same unfired handle to every
//! reader that asks to wait, fires it on the next submit and then forgets it;
//! the next wait gets a fresh one.

#[cfg(not(loom))]
use std::time::{Duration, Instant};
use std::fmt;
#[cfg(not(loom))]
use tokio::sync::Notify;
use crate::sync::{Arc, AtomicBool, Condvar, Mutex, Ordering};

struct Signal{
    fired : AtomicBool,
    /// Guards the fired transition against condvar waiters.
    lock  : Mutex<()>,
    cvar  : Condvar,
    #[cfg(not(loom))]
    notify: Notify,
}

/// Cloneable handle to a one-shot broadcast signal.
#[derive(Clone)]
pub struct Wakeup(Arc<Signal>);

impl Wakeup{
    pub(crate) fn new() -> Self {
        Self(Arc::new(Signal{
            fired : AtomicBool::new(false),
            lock  : Mutex::new(()),
            cvar  : Condvar::new(),
            #[cfg(not(loom))]
            notify: Notify::new(),
        }))
    }

    pub(crate) fn fired() -> Self {
        let this = Self::new();
        this.0.fired.store(true, Ordering::Relaxed);
        this
    }

    /// Idempotent.
    pub(crate) fn fire(&self){
        {
            let _guard = self.0.lock.lock();
            if self.0.fired.swap(true, Ordering::AcqRel) {
                return;
            }
            self.0.cvar.notify_all();
        }
        #[cfg(not(loom))]
        self.0.notify.notify_waiters();
    }

    /// Non-blocking check.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.0.fired.load(Ordering::Acquire)
    }

    /// Block the current thread until the signal fires.
    pub fn wait(&self){
        if self.is_ready() {
            return;
        }
        let mut guard = self.0.lock.lock();
        while !self.0.fired.load(Ordering::Acquire) {
            self.0.cvar.wait(&mut guard);
        }
    }

    /// Block for at most `timeout`. Returns `true` if the signal fired.
    #[cfg(not(loom))]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_ready() {
            return true;
        }
        // Too far out to represent: no deadline at all.
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        let mut guard = self.0.lock.lock();
        while !self.0.fired.load(Ordering::Acquire) {
            if self.0.cvar.wait_until(&mut guard, deadline).timed_out() {
                return self.0.fired.load(Ordering::Acquire);
            }
        }
        true
    }

    /// Resolve once the signal fires.
    ///
    /// Not available in loom builds.
    ///
    /// Cancel-safe: dropping the future leaves the signal untouched. Race it
    /// against your own cancellation (`tokio::select!`, a timeout) to bound the wait.
    #[cfg(not(loom))]
    pub async fn wait_async(&self){
        loop {
            // Register before checking, so a fire between the check and the
            // await is not lost.
            let notified = self.0.notify.notified();
            if self.is_ready() {
                return;
            }
            notified.await;
        }
    }

    /// `true` if both handles refer to the same signal.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }
}

impl fmt::Debug for Wakeup{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wakeup")
            .field("ready", &self.is_ready())
            .finish()
    }
}
