// Reader's claim lives on the slot at its position, or in `pending_refcount` when
// it is at the tail. Every operation below moves or releases exactly that claim.

#[cfg(not(loom))]
use std::time::{Duration, Instant};
use std::fmt;
use tracing::trace;
use crate::distributor::Shared;
use crate::error::ReadError;
use crate::sync::Arc;
use crate::wakeup::Wakeup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState{
    Active,
    Retired,
}

/// Consumer side cursor, created by [Distributor::subscribe](crate::Distributor::subscribe).
///
/// Each reader sees every event submitted after its subscription exactly once,
/// in submission order. Readers are independent: a slow one never blocks the
/// producer or other readers, it only keeps its unread events alive.
///
/// Dropping an active reader unsubscribes it.
pub struct Reader<T>{
    shared  : Arc<Shared<T>>,
    position: u64,
    state   : ReaderState,
}

impl<T> Reader<T>{
    pub(crate) fn new(shared: Arc<Shared<T>>, position: u64) -> Self {
        Self{ shared, position, state: ReaderState::Active }
    }

    #[inline]
    fn assert_active(&self){
        assert!(self.state == ReaderState::Active, "Reader used after unsubscribe!");
    }

    /// Absolute position of the next event this reader has not consumed.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == ReaderState::Active
    }

    /// Signal that is ready once this reader has an unconsumed event.
    ///
    /// Already ready if one exists now. Otherwise all waiting readers share one
    /// signal, fired by the next submit. Does not block; wait on the returned
    /// handle outside of any distributor call.
    ///
    /// # Panics
    /// After [unsubscribe](Self::unsubscribe).
    pub fn wait_chan(&self) -> Wakeup {
        self.assert_active();
        let mut state = self.shared.state.lock();
        if self.position < state.tail_position() {
            return self.shared.ready.clone();
        }
        state.wakeup.get_or_insert_with(Wakeup::new).clone()
    }

    /// `true` if [consume](Self::consume) would return an event right now.
    ///
    /// # Panics
    /// After [unsubscribe](Self::unsubscribe).
    pub fn is_ready(&self) -> bool {
        self.assert_active();
        self.position < self.shared.state.lock().tail_position()
    }

    /// Next event, or why there is none. Never blocks.
    pub fn try_consume(&mut self) -> Result<T, ReadError>
        where T: Clone
    {
        if self.state == ReaderState::Retired {
            return Err(ReadError::Retired);
        }

        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        let index = state.index_of(self.position);
        let Some(slot) = state.backlog.get_mut(index) else {
            return Err(ReadError::NotReady);
        };

        let value = slot.value.clone();
        slot.refcount -= 1;
        self.position += 1;

        // claim moves forward
        match state.backlog.get_mut(index + 1) {
            Some(next) => next.refcount += 1,
            None => state.pending_refcount += 1,
        }

        state.trim();
        Ok(value)
    }

    /// Next event.
    ///
    /// # Panics
    /// If no event is ready (check [is_ready](Self::is_ready) or wait on
    /// [wait_chan](Self::wait_chan) first), or after [unsubscribe](Self::unsubscribe).
    pub fn consume(&mut self) -> T
        where T: Clone
    {
        match self.try_consume() {
            Ok(value) => value,
            Err(err) => panic!("Reader::consume: {err}"),
        }
    }

    /// Block the current thread until an event is ready, then consume it.
    ///
    /// # Panics
    /// After [unsubscribe](Self::unsubscribe).
    pub fn recv(&mut self) -> T
        where T: Clone
    {
        loop {
            match self.try_consume() {
                Ok(value) => return value,
                Err(ReadError::NotReady) => self.wait_chan().wait(),
                Err(err) => panic!("Reader::recv: {err}"),
            }
        }
    }

    /// [recv](Self::recv) with a deadline.
    #[cfg(not(loom))]
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<T, ReadError>
        where T: Clone
    {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            match self.try_consume() {
                Err(ReadError::NotReady) => {}
                other => return other,
            }
            let wakeup = self.wait_chan();
            match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if !wakeup.wait_timeout(remaining) {
                        return Err(ReadError::Timeout);
                    }
                }
                None => wakeup.wait(),
            }
        }
    }

    /// Await the next event.
    ///
    /// Cancel-safe: if the future is dropped before completion, nothing was consumed.
    ///
    /// # Panics
    /// After [unsubscribe](Self::unsubscribe).
    #[cfg(not(loom))]
    pub async fn recv_async(&mut self) -> T
        where T: Clone
    {
        loop {
            match self.try_consume() {
                Ok(value) => return value,
                Err(ReadError::NotReady) => {
                    let wakeup = self.wait_chan();
                    wakeup.wait_async().await;
                }
                Err(err) => panic!("Reader::recv_async: {err}"),
            }
        }
    }

    /// Iterate over every event ready right now. Ends when none is left.
    ///
    /// # Panics
    /// After [unsubscribe](Self::unsubscribe).
    pub fn try_iter(&mut self) -> TryIter<'_, T> {
        self.assert_active();
        TryIter{ reader: self }
    }

    /// Release this reader's claim. Events kept only for it are reclaimed.
    ///
    /// # Panics
    /// If already unsubscribed.
    pub fn unsubscribe(&mut self){
        self.assert_active();
        self.release();
    }

    fn release(&mut self){
        // Retired before trim runs user callbacks; the claim is gone either way.
        self.state = ReaderState::Retired;
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        let index = state.index_of(self.position);
        trace!(position = self.position, "reader unsubscribed");
        match state.backlog.get_mut(index) {
            Some(slot) => {
                slot.refcount -= 1;
                if index == 0 {
                    state.trim();
                }
            }
            None => state.pending_refcount -= 1,
        }
    }
}

impl<T> Drop for Reader<T>{
    fn drop(&mut self) {
        if self.state == ReaderState::Active {
            self.release();
        }
    }
}

impl<T> fmt::Debug for Reader<T>{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("position", &self.position)
            .field("state", &self.state)
            .finish()
    }
}

/// Returned by [Reader::try_iter].
pub struct TryIter<'a, T>{
    reader: &'a mut Reader<T>,
}

impl<'a, T: Clone> Iterator for TryIter<'a, T>{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.try_consume().ok()
    }
}
