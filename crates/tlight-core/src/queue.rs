//! Unbounded blocking FIFO queue
//!
//! Producers call `send` and never block. Consumers call `receive` and
//! park on a condition variable until an item is available. Delivery is
//! competitive: every item goes to exactly one consumer.
//!
//! All structural mutations (`send`, `receive`, `clear`) go through the
//! same mutex, so a `send` can never slip between a consumer's emptiness
//! check and its wait.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Blocking multi-producer, multi-consumer queue
///
/// # Example
///
/// ```ignore
/// let queue = BlockingQueue::new();
/// queue.send(1);
/// queue.send(2);
/// assert_eq!(queue.receive(), 1);
/// assert_eq!(queue.receive(), 2);
/// ```
pub struct BlockingQueue<T> {
    /// Queued items, front is the oldest
    items: Mutex<VecDeque<T>>,

    /// Signalled whenever an item is pushed
    not_empty: Condvar,
}

impl<T> BlockingQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }

    /// Append an item and wake one waiting consumer
    pub fn send(&self, item: T) {
        {
            let mut items = self.items.lock();
            items.push_back(item);
        }
        self.not_empty.notify_one();
    }

    /// Remove and return the oldest item, blocking until one is available
    ///
    /// Blocks forever if nothing is ever sent.
    pub fn receive(&self) -> T {
        let mut items = self.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return item;
            }
            // Lock is released while parked; spurious wakeups loop back.
            self.not_empty.wait(&mut items);
        }
    }

    /// Like `receive`, but gives up after `timeout`
    ///
    /// Returns `None` if the queue stayed empty for the whole period.
    pub fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => return Some(self.receive()),
        };

        let mut items = self.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return Some(item);
            }
            if self.not_empty.wait_until(&mut items, deadline).timed_out() {
                return items.pop_front();
            }
        }
    }

    /// Remove the oldest item without blocking
    pub fn try_receive(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Discard every queued item
    ///
    /// Consumers already parked in `receive` keep waiting for the next `send`.
    pub fn clear(&self) {
        self.items.lock().clear();
    }

    /// Number of queued items (snapshot)
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Check if the queue is empty (snapshot)
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingQueue")
            .field("len", &self.len())
            .finish()
    }
}
