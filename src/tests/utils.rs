use std::sync::Arc;
use parking_lot::Mutex;
use crate::Options;

/// Records every callback invocation of the distributor it configures.
pub(crate) struct Recorder<T>{
    sizes    : Arc<Mutex<Vec<usize>>>,
    submitted: Arc<Mutex<Vec<T>>>,
    consumed : Arc<Mutex<Vec<T>>>,
}

impl<T: Clone + Send + 'static> Recorder<T>{
    pub fn new() -> Self {
        Self{
            sizes    : Default::default(),
            submitted: Default::default(),
            consumed : Default::default(),
        }
    }

    pub fn options(&self) -> Options<T> {
        let sizes     = self.sizes.clone();
        let submitted = self.submitted.clone();
        let consumed  = self.consumed.clone();
        Options::new()
            .on_bufsize_change(move |len| sizes.lock().push(len))
            .on_submit(move |value: &T| submitted.lock().push(value.clone()))
            .on_fully_consumed(move |value: &T| consumed.lock().push(value.clone()))
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.sizes.lock().clone()
    }

    pub fn submitted(&self) -> Vec<T> {
        self.submitted.lock().clone()
    }

    pub fn consumed(&self) -> Vec<T> {
        self.consumed.lock().clone()
    }

    pub fn consumed_len(&self) -> usize {
        self.consumed.lock().len()
    }
}
