//! # Exit context
//!
//! A persisted node can carry an [`ExitContext`]: the caller-supplied
//! `exit_context` value of the transition paired with the node's detector
//! bind function. Hosts install it for the node's subtree with
//! [`Node::provide`](crate::Node::provide) (or [`with_exit_context`] directly),
//! and descendants read it with [`exit_context`]:
//!
//! ```rust
//! use linger_core::*;
//!
//! fn row_label(text: &str) -> String {
//!     if is_exiting() {
//!         format!("{text} (removing)")
//!     } else {
//!         text.to_string()
//!     }
//! }
//!
//! assert_eq!(row_label("milk"), "milk");
//! ```
//!
//! A descendant that owns the element actually doing the animation can pass it
//! to `ctx.bind` so the same detector watches it instead.
//!
//! Frames are thread-local and render-scoped: nothing stays installed after the
//! closure returns.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::NodeRef;

/// Opaque value a transition hands to the subtree of each exiting node.
pub type ExitValue = Rc<dyn Any>;

#[derive(Clone)]
pub struct ExitContext {
    pub value: ExitValue,
    /// Binds an element to the exiting node's completion detector.
    pub bind: NodeRef,
}

impl std::fmt::Debug for ExitContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExitContext")
            .field("value", &"<any>")
            .field("bind", &"<ref>")
            .finish()
    }
}

impl ExitContext {
    pub fn value_as<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

thread_local! {
    static EXIT_STACK: RefCell<Vec<ExitContext>> = const { RefCell::new(Vec::new()) };
}

pub fn with_exit_context<R>(ctx: ExitContext, f: impl FnOnce() -> R) -> R {
    // pops on unwind too
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            EXIT_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    EXIT_STACK.with(|st| st.borrow_mut().push(ctx));
    let _guard = Guard;
    f()
}

/// Innermost exit context, if composing inside an exiting node.
pub fn exit_context() -> Option<ExitContext> {
    EXIT_STACK.with(|st| st.borrow().last().cloned())
}

pub fn is_exiting() -> bool {
    EXIT_STACK.with(|st| !st.borrow().is_empty())
}
