//! Distributor. Single producer, many independently paced readers.
//!
//! Events live in a FIFO backlog of slots. Each slot carries a refcount: the
//! number of readers whose next unread event is that slot. Readers sitting at the
//! tail are counted in `pending_refcount` instead, and that count seeds the next
//! appended slot.
//!
//! When a reader consumes a slot its claim moves one slot forward (or back into
//! `pending_refcount`). Whenever the head slot's refcount drops to zero, it and
//! every zero-refcount slot after it are reclaimed, in order.
//!
//! Readers never see events submitted before they subscribed.

use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, trace};
use crate::options::{Callbacks, Options};
use crate::reader::Reader;
use crate::sync::{Arc, Mutex};
use crate::wakeup::Wakeup;

pub(crate) struct Slot<T>{
    pub(crate) value   : T,
    /// Outstanding reader claims.
    pub(crate) refcount: usize,
    /// Fired on reclaim. Only set by [Distributor::submit_tracked].
    consumed: Option<Wakeup>,
}

pub(crate) struct State<T>{
    /// Absolute position of `backlog[0]`.
    pub(crate) base_position   : u64,
    pub(crate) backlog         : VecDeque<Slot<T>>,
    /// Claims on the not-yet-submitted next event.
    pub(crate) pending_refcount: usize,
    /// Present only while someone waits for the next event.
    pub(crate) wakeup          : Option<Wakeup>,
    callbacks: Callbacks<T>,
}

impl<T> State<T>{
    /// Absolute position one past the newest retained event.
    #[inline]
    pub(crate) fn tail_position(&self) -> u64 {
        self.base_position + self.backlog.len() as u64
    }

    /// Backlog index of an absolute position.
    #[inline]
    pub(crate) fn index_of(&self, position: u64) -> usize {
        debug_assert!(position >= self.base_position, "reader behind reclaimed events");
        (position - self.base_position) as usize
    }

    fn append(&mut self, value: T, consumed: Option<Wakeup>){
        self.callbacks.submitted(&value);

        if self.backlog.is_empty() && self.pending_refcount == 0 {
            debug!(position = self.base_position, "no readers, event discarded");
            self.callbacks.fully_consumed(&value);
            if let Some(consumed) = consumed {
                consumed.fire();
            }
            return;
        }

        let refcount = std::mem::take(&mut self.pending_refcount);
        self.backlog.push_back(Slot{ value, refcount, consumed });
        trace!(
            position = self.tail_position() - 1,
            readers = refcount,
            len = self.backlog.len(),
            "event appended"
        );

        if let Some(wakeup) = self.wakeup.take() {
            wakeup.fire();
        }

        let len = self.backlog.len();
        self.callbacks.bufsize_changed(len);
    }

    /// Reclaim zero-refcount slots from the front. Stops at the first claimed slot.
    ///
    /// `base_position` follows every pop before user callbacks run, so a
    /// panicking callback leaves positions and backlog in agreement.
    pub(crate) fn trim(&mut self){
        let mut dropped = 0;
        while self.backlog.front().is_some_and(|slot| slot.refcount == 0) {
            let Some(slot) = self.backlog.pop_front() else { break };
            self.base_position += 1;
            dropped += 1;
            self.callbacks.fully_consumed(&slot.value);
            if let Some(consumed) = slot.consumed {
                consumed.fire();
            }
        }

        if dropped == 0 {
            return;
        }

        trace!(
            dropped,
            base_position = self.base_position,
            len = self.backlog.len(),
            "events reclaimed"
        );
        let len = self.backlog.len();
        self.callbacks.bufsize_changed(len);
    }
}

pub(crate) struct Shared<T>{
    pub(crate) state: Mutex<State<T>>,
    /// Handed out by `wait_chan` whenever an event is already waiting.
    pub(crate) ready: Wakeup,
}

/// Producer side handle. Cheap to clone; all clones feed the same readers.
///
/// # Example
/// ```
/// use event_distributor::Distributor;
///
/// let distributor = Distributor::new();
/// let mut reader = distributor.subscribe();
///
/// distributor.submit(1);
/// distributor.submit(2);
///
/// assert!(reader.is_ready());
/// assert_eq!(reader.consume(), 1);
/// assert_eq!(reader.consume(), 2);
/// assert!(!reader.is_ready());
/// ```
pub struct Distributor<T>{
    pub(crate) shared: Arc<Shared<T>>
}

impl<T> Distributor<T>{
    #[inline]
    pub fn new() -> Self {
        Self::with_options(std::iter::empty())
    }

    /// Build from zero or more option sets. Callbacks accumulate in order;
    /// the largest requested capacity wins.
    pub fn with_options<I>(options: I) -> Self
        where I: IntoIterator<Item = Options<T>>
    {
        let mut callbacks = Callbacks::new();
        let mut capacity = 0;
        for options in options{
            capacity = capacity.max(options.capacity);
            callbacks.absorb(options);
        }

        Self{
            shared: Arc::new(Shared{
                state: Mutex::new(State{
                    base_position   : 0,
                    backlog         : VecDeque::with_capacity(capacity),
                    pending_refcount: 0,
                    wakeup          : None,
                    callbacks,
                }),
                ready: Wakeup::fired(),
            })
        }
    }

    /// Append an event for every current reader and wake waiting readers.
    ///
    /// Never blocks on readers. With no reader to receive it, the event is
    /// reported fully consumed and dropped immediately.
    pub fn submit(&self, value: T){
        self.shared.state.lock().append(value, None);
    }

    /// Same as [submit](Self::submit), but returns a signal that fires once the
    /// event is fully consumed. Already fired if nobody could receive it.
    pub fn submit_tracked(&self, value: T) -> Wakeup {
        let consumed = Wakeup::new();
        self.shared.state.lock().append(value, Some(consumed.clone()));
        consumed
    }

    /// Reader will receive events from NOW.
    /// It will not see events that were submitted BEFORE subscription.
    ///
    /// Dropping the reader (or calling [Reader::unsubscribe]) releases everything
    /// kept for it. A forgotten reader keeps the backlog growing.
    pub fn subscribe(&self) -> Reader<T> {
        let mut state = self.shared.state.lock();
        state.pending_refcount += 1;
        let position = state.tail_position();
        trace!(position, "reader subscribed");
        Reader::new(self.shared.clone(), position)
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.shared.state.lock().backlog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Distributor<T>{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Distributor<T>{
    fn clone(&self) -> Self {
        Self{ shared: self.shared.clone() }
    }
}

impl<T> fmt::Debug for Distributor<T>{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("Distributor")
            .field("base_position", &state.base_position)
            .field("len", &state.backlog.len())
            .field("pending_refcount", &state.pending_refcount)
            .finish()
    }
}
