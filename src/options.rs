//! Construction-time configuration for [Distributor](crate::Distributor).
//!
//! Everything is optional; `Options::default()` is a fully working setup.
//! Callbacks run synchronously while the distributor lock is held, so they
//! must not call back into the same distributor.

pub(crate) type BufsizeCallback = Box<dyn FnMut(usize) + Send>;
pub(crate) type ItemCallback<T> = Box<dyn FnMut(&T) + Send>;

pub struct Options<T>{
    pub(crate) on_bufsize_change: Vec<BufsizeCallback>,
    pub(crate) on_submit        : Vec<ItemCallback<T>>,
    pub(crate) on_fully_consumed: Vec<ItemCallback<T>>,
    pub(crate) capacity         : usize,
}

impl<T> Options<T>{
    pub fn new() -> Self {
        Self{
            on_bufsize_change: Vec::new(),
            on_submit        : Vec::new(),
            on_fully_consumed: Vec::new(),
            capacity         : 0,
        }
    }

    /// Called with the new backlog length whenever it changes.
    ///
    /// Fires from `submit` (after an append) and from `consume`/`unsubscribe`
    /// (after reclaiming events).
    pub fn on_bufsize_change<F>(mut self, callback: F) -> Self
        where F: FnMut(usize) + Send + 'static
    {
        self.on_bufsize_change.push(Box::new(callback));
        self
    }

    /// Called once per submitted event, before anything else happens to it.
    pub fn on_submit<F>(mut self, callback: F) -> Self
        where F: FnMut(&T) + Send + 'static
    {
        self.on_submit.push(Box::new(callback));
        self
    }

    /// Called exactly once per event, when the last reader releases it.
    ///
    /// If nobody is subscribed, this happens inside `submit`, right after `on_submit`.
    pub fn on_fully_consumed<F>(mut self, callback: F) -> Self
        where F: FnMut(&T) + Send + 'static
    {
        self.on_fully_consumed.push(Box::new(callback));
        self
    }

    /// Initial backlog capacity. Defaults to 0; the backlog grows on demand.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl<T> Default for Options<T>{
    fn default() -> Self {
        Self::new()
    }
}

/// Callback lists merged from every [Options] a distributor was built with.
pub(crate) struct Callbacks<T>{
    on_bufsize_change: Vec<BufsizeCallback>,
    on_submit        : Vec<ItemCallback<T>>,
    on_fully_consumed: Vec<ItemCallback<T>>,
}

impl<T> Callbacks<T>{
    pub(crate) fn new() -> Self {
        Self{
            on_bufsize_change: Vec::new(),
            on_submit        : Vec::new(),
            on_fully_consumed: Vec::new(),
        }
    }

    pub(crate) fn absorb(&mut self, options: Options<T>){
        self.on_bufsize_change.extend(options.on_bufsize_change);
        self.on_submit.extend(options.on_submit);
        self.on_fully_consumed.extend(options.on_fully_consumed);
    }

    #[inline]
    pub(crate) fn bufsize_changed(&mut self, len: usize){
        for callback in &mut self.on_bufsize_change{
            callback(len);
        }
    }

    #[inline]
    pub(crate) fn submitted(&mut self, value: &T){
        for callback in &mut self.on_submit{
            callback(value);
        }
    }

    #[inline]
    pub(crate) fn fully_consumed(&mut self, value: &T){
        for callback in &mut self.on_fully_consumed{
            callback(value);
        }
    }
}
