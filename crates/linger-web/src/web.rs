//! DOM element and window timer adapters (wasm32).
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use slotmap::SlotMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use linger_core::{
    ElementHandle, Listener, ListenerId, TimerCallback, TimerHost, TimerId, Timers,
    TransitionEvent, TransitionEventKind, TransitionTarget,
};

/// Installs the panic hook and routes `log` to the browser console.
pub fn init_logging() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let _ = console_log::init_with_level(log::Level::Info);
}

/// DOM event names feeding each transition event kind. CSS animations are
/// tracked alongside transitions, keyed by animation name.
fn dom_events(kind: TransitionEventKind) -> [&'static str; 2] {
    match kind {
        TransitionEventKind::Run => ["transitionrun", "animationstart"],
        TransitionEventKind::End => ["transitionend", "animationend"],
        TransitionEventKind::Cancel => ["transitioncancel", "animationcancel"],
    }
}

fn property_of(ev: &web_sys::Event) -> Option<String> {
    if let Some(t) = ev.dyn_ref::<web_sys::TransitionEvent>() {
        return Some(t.property_name());
    }
    ev.dyn_ref::<web_sys::AnimationEvent>()
        .map(|a| a.animation_name())
}

type DomClosure = Closure<dyn FnMut(web_sys::Event)>;

struct Attached {
    closures: Vec<(&'static str, DomClosure)>,
}

/// A mounted DOM element as seen by the exit detector.
///
/// Listeners are owned here and detached on `unlisten` or when the wrapper
/// is dropped.
pub struct WebElement {
    element: web_sys::Element,
    attached: RefCell<SlotMap<ListenerId, Attached>>,
}

impl WebElement {
    pub fn new(element: web_sys::Element) -> Self {
        Self {
            element,
            attached: RefCell::new(SlotMap::with_key()),
        }
    }

    /// Wraps `element` as a handle ready to pass to a node ref.
    pub fn handle(element: web_sys::Element) -> ElementHandle {
        Rc::new(Self::new(element))
    }

    pub fn element(&self) -> &web_sys::Element {
        &self.element
    }

    fn detach(&self, attached: Attached) {
        for (name, closure) in attached.closures {
            let _ = self
                .element
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }
}

impl TransitionTarget for WebElement {
    fn listen(&self, kind: TransitionEventKind, listener: Listener) -> ListenerId {
        let mut closures = Vec::with_capacity(2);
        for name in dom_events(kind) {
            let listener = listener.clone();
            let closure: DomClosure = Closure::new(move |ev: web_sys::Event| {
                match property_of(&ev) {
                    Some(property) => listener(&TransitionEvent { kind, property }),
                    None => log::warn!("{name} without a property name"),
                }
            });
            if let Err(e) = self
                .element
                .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            {
                log::error!("addEventListener({name}) failed: {e:?}");
                continue;
            }
            closures.push((name, closure));
        }
        self.attached.borrow_mut().insert(Attached { closures })
    }

    fn unlisten(&self, id: ListenerId) {
        let removed = self.attached.borrow_mut().remove(id);
        if let Some(attached) = removed {
            self.detach(attached);
        }
    }
}

impl Drop for WebElement {
    fn drop(&mut self) {
        let all: Vec<Attached> = self.attached.get_mut().drain().map(|(_, a)| a).collect();
        for attached in all {
            self.detach(attached);
        }
    }
}

/// `TimerHost` on top of `window.setTimeout`.
#[derive(Clone)]
pub struct WebTimers {
    window: web_sys::Window,
    handles: Rc<RefCell<SlotMap<TimerId, i32>>>,
}

impl WebTimers {
    /// `None` outside a window context (e.g. in a worker).
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        Some(Self {
            window,
            handles: Rc::new(RefCell::new(SlotMap::with_key())),
        })
    }

    pub fn shared() -> Option<Timers> {
        Self::new().map(|t| Rc::new(t) as Timers)
    }

    pub fn pending(&self) -> usize {
        self.handles.borrow().len()
    }
}

impl TimerHost for WebTimers {
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = self.handles.borrow_mut().insert(0);
        let handles = Rc::downgrade(&self.handles);
        let cb = Closure::once_into_js(move || {
            let live = handles
                .upgrade()
                .is_some_and(|h| h.borrow_mut().remove(id).is_some());
            if live {
                callback();
            }
        });
        let ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms)
        {
            Ok(handle) => {
                if let Some(slot) = self.handles.borrow_mut().get_mut(id) {
                    *slot = handle;
                }
            }
            Err(e) => {
                log::error!("setTimeout failed: {e:?}");
                self.handles.borrow_mut().remove(id);
            }
        }
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        let handle = self.handles.borrow_mut().remove(id);
        if let Some(handle) = handle {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}
