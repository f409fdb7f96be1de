use std::rc::Rc;

use slotmap::new_key_type;

new_key_type! {
    pub struct ListenerId;
}

/// Lifecycle phase of a single animated property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionEventKind {
    /// A property started animating (`transitionrun` / `animationstart`).
    Run,
    /// A property finished normally (`transitionend` / `animationend`).
    End,
    /// A property finished abnormally (`transitioncancel` / `animationcancel`).
    Cancel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionEvent {
    pub kind: TransitionEventKind,
    /// CSS property name for transitions, animation name for keyframe animations.
    pub property: String,
}

impl TransitionEvent {
    pub fn new(kind: TransitionEventKind, property: impl Into<String>) -> Self {
        Self {
            kind,
            property: property.into(),
        }
    }
    pub fn run(property: impl Into<String>) -> Self {
        Self::new(TransitionEventKind::Run, property)
    }
    pub fn end(property: impl Into<String>) -> Self {
        Self::new(TransitionEventKind::End, property)
    }
    pub fn cancel(property: impl Into<String>) -> Self {
        Self::new(TransitionEventKind::Cancel, property)
    }
}

pub type Listener = Rc<dyn Fn(&TransitionEvent)>;

/// A rendered element that reports animation lifecycle events.
///
/// Implementations only observe; nothing in linger mutates the element.
pub trait TransitionTarget {
    fn listen(&self, kind: TransitionEventKind, listener: Listener) -> ListenerId;
    /// Detaches a listener. Unknown ids are ignored.
    fn unlisten(&self, id: ListenerId);
}

pub type ElementHandle = Rc<dyn TransitionTarget>;
