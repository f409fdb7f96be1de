pub use crate::class_names::merge_class_names;
pub use crate::clock::{Clock, SystemClock, TestClock};
pub use crate::config::{DEFAULT_FORCE_REMOVE_TIMEOUT, TransitionConfig, TransitionSettings};
pub use crate::detector::AnimationEndDetector;
pub use crate::element::{
    ElementHandle, TransitionEvent, TransitionEventKind, TransitionTarget,
};
pub use crate::error::ConfigError;
pub use crate::locals::{ExitContext, ExitValue, exit_context, is_exiting, with_exit_context};
pub use crate::persist::{Persist, PersistId, PersistTicket};
pub use crate::sim::{SimElement, SimHost};
pub use crate::timer::{TimerHost, TimerId, TimerQueue, Timers};
pub use crate::transition::AnimatedTransition;
pub use crate::trigger::RenderTrigger;
pub use crate::view::{Node, NodeRef, Props};
