use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::{Rc, Weak};
use std::time::Duration;

use smallvec::SmallVec;

use crate::element::{ElementHandle, ListenerId, TransitionEvent, TransitionEventKind};
use crate::timer::{TimerId, Timers};
use crate::view::NodeRef;

/// Resolves "the exit animation of one element is over" exactly once.
///
/// Completion happens when every property that reported `Run` has reported
/// `End` or `Cancel`, or when the timeout elapses without any property ever
/// starting. Listeners and the timer only hold weak references, so dropping the
/// last handle silences the detector.
#[derive(Clone)]
pub struct AnimationEndDetector {
    inner: Rc<Inner>,
}

struct Inner {
    running: RefCell<HashSet<String>>,
    any_started: Cell<bool>,
    fired: Cell<bool>,
    timer: Cell<Option<TimerId>>,
    timers: Timers,
    bound: RefCell<Option<Bound>>,
    on_done: RefCell<Option<Box<dyn FnOnce()>>>,
}

struct Bound {
    element: ElementHandle,
    listeners: SmallVec<[ListenerId; 3]>,
}

impl AnimationEndDetector {
    pub fn new(on_done: impl FnOnce() + 'static, timeout: Duration, timers: Timers) -> Self {
        let inner = Rc::new(Inner {
            running: RefCell::new(HashSet::new()),
            any_started: Cell::new(false),
            fired: Cell::new(false),
            timer: Cell::new(None),
            timers: timers.clone(),
            bound: RefCell::new(None),
            on_done: RefCell::new(Some(Box::new(on_done))),
        });

        let weak = Rc::downgrade(&inner);
        let id = timers.set_timeout(
            timeout,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.timer.set(None);
                    if !inner.any_started.get() {
                        log::trace!("no animation started within {timeout:?}; forcing completion");
                        Inner::call_handler(&inner);
                    }
                }
            }),
        );
        inner.timer.set(Some(id));

        Self { inner }
    }

    /// Points the detector at a new element (or none). Listeners on the previous
    /// element are detached first.
    pub fn bind(&self, element: Option<ElementHandle>) {
        let previous = self.inner.bound.borrow_mut().take();
        if let Some(prev) = previous {
            for id in prev.listeners {
                prev.element.unlisten(id);
            }
        }

        let Some(element) = element else {
            return;
        };

        let mut listeners = SmallVec::new();
        let weak = Rc::downgrade(&self.inner);
        listeners.push(element.listen(
            TransitionEventKind::Run,
            Rc::new(move |ev: &TransitionEvent| {
                if let Some(inner) = weak.upgrade() {
                    inner.running.borrow_mut().insert(ev.property.clone());
                    inner.any_started.set(true);
                }
            }),
        ));
        for kind in [TransitionEventKind::End, TransitionEventKind::Cancel] {
            let weak = Rc::downgrade(&self.inner);
            listeners.push(element.listen(
                kind,
                Rc::new(move |ev: &TransitionEvent| finish_property(&weak, &ev.property)),
            ));
        }

        *self.inner.bound.borrow_mut() = Some(Bound { element, listeners });
    }

    /// The ref callback handed to the host for the persisted node.
    pub fn bind_fn(&self) -> NodeRef {
        let this = self.clone();
        Rc::new(move |element| this.bind(element))
    }

    pub fn is_done(&self) -> bool {
        self.inner.fired.get()
    }

    /// Properties currently animating on the bound element.
    pub fn in_flight(&self) -> usize {
        self.inner.running.borrow().len()
    }

    pub fn is_bound(&self) -> bool {
        self.inner.bound.borrow().is_some()
    }
}

fn finish_property(weak: &Weak<Inner>, property: &str) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let settled = {
        let mut running = inner.running.borrow_mut();
        running.remove(property) && running.is_empty()
    };
    if settled {
        Inner::call_handler(&inner);
    }
}

impl Inner {
    fn call_handler(this: &Rc<Inner>) {
        if this.fired.replace(true) {
            return;
        }
        if let Some(id) = this.timer.take() {
            this.timers.clear_timeout(id);
        }
        let on_done = this.on_done.borrow_mut().take();
        if let Some(f) = on_done {
            f();
        }
    }
}
