//! Single-producer, multi-consumer broadcast buffer.
//!
//! A [Distributor] appends events; every [Reader] subscribed at the time sees each
//! of them once, in order, at its own pace. An event stays in memory only until
//! the last reader that could see it has consumed it (or unsubscribed), and is
//! then reclaimed from the front of the buffer.
//!
//! Readers that have nothing to read can wait on a [Wakeup]: blocking,
//! with a timeout, or async.
//!
//! ```
//! use event_distributor::{Distributor, Options};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let consumed = Arc::new(AtomicUsize::new(0));
//! let counter = consumed.clone();
//! let distributor = Distributor::with_options([
//!     Options::new().on_fully_consumed(move |_: &String| { counter.fetch_add(1, Ordering::Relaxed); })
//! ]);
//!
//! let mut r1 = distributor.subscribe();
//! let mut r2 = distributor.subscribe();
//! distributor.submit("hello".to_string());
//!
//! assert_eq!(r1.consume(), "hello");
//! assert_eq!(consumed.load(Ordering::Relaxed), 0);
//! assert_eq!(r2.consume(), "hello");
//! assert_eq!(consumed.load(Ordering::Relaxed), 1);
//! ```

mod sync;

mod distributor;
mod error;
mod options;
mod reader;
mod wakeup;

pub use distributor::Distributor;
pub use error::ReadError;
pub use options::Options;
pub use reader::{Reader, TryIter};
pub use wakeup::Wakeup;

#[cfg(test)]
mod tests;
