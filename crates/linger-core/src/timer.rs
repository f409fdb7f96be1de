//! One-shot timers.
//!
//! The detector never talks to a platform timer API directly; it goes through
//! [`TimerHost`]. Browsers use `linger-web`'s `WebTimers`. Native hosts and tests
//! use [`TimerQueue`], which fires nothing on its own: the host pumps it with
//! [`TimerQueue::run_due`] once per frame (or after advancing a `TestClock`).

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use slotmap::{SlotMap, new_key_type};
use web_time::Instant;

use crate::clock::{Clock, SystemClock};

new_key_type! {
    pub struct TimerId;
}

pub type TimerCallback = Box<dyn FnOnce()>;

pub trait TimerHost {
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerId;
    /// Cancels a pending timer. Unknown or already-fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}

/// Shared handle to whatever timer implementation the host provides.
pub type Timers = Rc<dyn TimerHost>;

struct Pending {
    deadline: Instant,
    callback: TimerCallback,
}

pub struct TimerQueue {
    clock: Box<dyn Clock>,
    pending: RefCell<SlotMap<TimerId, Pending>>,
}

impl TimerQueue {
    pub fn new(clock: impl Clock) -> Self {
        Self {
            clock: Box::new(clock),
            pending: RefCell::new(SlotMap::with_key()),
        }
    }

    pub fn system() -> Self {
        Self::new(SystemClock)
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Fires every timer whose deadline has passed, earliest first. Callbacks may
    /// schedule or clear other timers. Returns how many fired.
    pub fn run_due(&self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        loop {
            let next = {
                let mut pending = self.pending.borrow_mut();
                let due = pending
                    .iter()
                    .filter(|(_, p)| p.deadline <= now)
                    .min_by_key(|(_, p)| p.deadline)
                    .map(|(id, _)| id);
                due.and_then(|id| pending.remove(id))
            };
            // borrow released before the callback runs
            match next {
                Some(p) => {
                    (p.callback)();
                    fired += 1;
                }
                None => break,
            }
        }
        fired
    }
}

impl TimerHost for TimerQueue {
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let deadline = self.clock.now() + delay;
        self.pending
            .borrow_mut()
            .insert(Pending { deadline, callback })
    }

    fn clear_timeout(&self, id: TimerId) {
        self.pending.borrow_mut().remove(id);
    }
}
