use std::cell::RefCell;
use std::rc::Rc;

pub type SubId = usize;

/// Re-render request channel: a version counter plus subscribers.
///
/// Detectors bump it when a persist finishes; the host subscribes (or polls
/// `version()`) and renders the transition again.
#[derive(Clone, Default)]
pub struct RenderTrigger(Rc<RefCell<Inner>>);

#[derive(Default)]
struct Inner {
    version: u64,
    subs: Vec<Rc<dyn Fn(u64)>>,
}

impl RenderTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.0.borrow().version
    }

    pub fn request(&self) {
        let (v, subs) = {
            let mut inner = self.0.borrow_mut();
            inner.version = inner.version.wrapping_add(1);
            (inner.version, inner.subs.clone())
        };
        // subscribers may render (and request again) re-entrantly
        for s in subs {
            s(v);
        }
    }

    pub fn subscribe(&self, f: impl Fn(u64) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        inner.subs.push(Rc::new(f));
        inner.subs.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_request_bumps_and_notifies() {
        let t = RenderTrigger::new();
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        t.subscribe(move |v| s.set(v));
        t.request();
        t.request();
        assert_eq!(t.version(), 2);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_reentrant_request() {
        let t = RenderTrigger::new();
        let t2 = t.clone();
        t.subscribe(move |v| {
            if v == 1 {
                t2.request();
            }
        });
        t.request();
        assert_eq!(t.version(), 2);
    }
}
