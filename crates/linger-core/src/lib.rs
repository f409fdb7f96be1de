//! # Exit persistence for keyed lists
//!
//! When a child disappears from a rendered list, Linger keeps it on screen a
//! little longer: it is re-rendered with exit props (usually an `exiting`
//! class), placed next to its old neighbours, and removed for good once its
//! exit animation is over. There are four moving parts:
//!
//! - `compute_persists`: which removed children must stay alive.
//! - `merge_lists`: where they go in the new list ("sticky" placement).
//! - `AnimationEndDetector`: when each one is really done.
//! - `AnimatedTransition`: remembers the previous render and runs the above.
//!
//! ## Rendering
//!
//! Hand the transition your children every render and give the host the list
//! it returns:
//!
//! ```rust
//! use std::rc::Rc;
//! use linger_core::*;
//!
//! let timers: Timers = Rc::new(TimerQueue::system());
//! let mut list = AnimatedTransition::new(
//!     TransitionConfig::new().exit_class("exiting"),
//!     timers.clone(),
//! );
//!
//! let mut host = SimHost::new();
//! host.commit(&list.render(vec![Node::new("a"), Node::new("b")]));
//! host.commit(&list.render(vec![Node::new("a")]));
//!
//! assert_eq!(host.keys(), ["a", "b"]);
//! assert_eq!(host.class_of("b").as_deref(), Some("exiting"));
//! ```
//!
//! The persisted clone carries a ref callback. When the host mounts it, the
//! detector starts listening to the element's transition events.
//!
//! ## Completion
//!
//! A persist finishes when every property that started animating has ended or
//! been cancelled, or after `force_remove_timeout` (300 ms by default) if
//! nothing started at all. The detector then posts to the transition's outbox
//! and bumps its `RenderTrigger`; render again and the node is gone:
//!
//! ```rust,ignore
//! list.trigger().subscribe(move |_| schedule_frame());
//! ```
//!
//! Timers are pumped by the host (`TimerQueue::run_due`) on native targets and
//! by the browser when using `linger-web`.
//!
//! ## Re-adding
//!
//! If a key comes back before its exit finished, the real node wins: the
//! persist is dropped and its detector can no longer remove anything.

pub mod class_names;
pub mod clock;
pub mod config;
pub mod detector;
pub mod element;
pub mod error;
pub mod locals;
pub mod persist;
pub mod prelude;
pub mod sim;
pub mod sticky;
pub mod timer;
pub mod transition;
pub mod trigger;
pub mod view;

pub use class_names::*;
pub use clock::*;
pub use config::*;
pub use detector::*;
pub use element::*;
pub use error::*;
pub use locals::*;
pub use persist::*;
pub use sim::*;
pub use sticky::*;
pub use timer::*;
pub use transition::*;
pub use trigger::*;
pub use view::*;
