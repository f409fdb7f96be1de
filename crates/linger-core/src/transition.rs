//! Composition root: ties the persist registry and the sticky planner to
//! render-to-render state.
//!
//! [`step`] is the pure core (state in, state and output out). [`AnimatedTransition`]
//! owns that state plus the completion outbox and is what hosts normally hold.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::TransitionConfig;
use crate::persist::{Persist, PersistOptions, PersistTicket, compute_persists};
use crate::sticky::merge_lists;
use crate::timer::Timers;
use crate::trigger::RenderTrigger;
use crate::view::Node;

/// Everything a transition remembers between renders.
#[derive(Default, Debug)]
pub struct TransitionState {
    /// Last merged output, persisted clones included.
    pub previous: Vec<Node>,
    pub persists: Vec<Persist>,
}

impl TransitionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a finished persist from both lists. Tickets from an older
    /// generation (the key was re-added meanwhile) are ignored.
    pub fn remove_persist(&mut self, ticket: &PersistTicket) -> bool {
        let active = self
            .persists
            .iter()
            .any(|p| p.id() == ticket.id && p.key() == ticket.key);
        if !active {
            log::trace!("stale completion for '{}' ignored", ticket.key);
            return false;
        }
        self.previous.retain(|n| n.key != ticket.key);
        self.persists.retain(|p| p.key() != ticket.key);
        log::debug!("persist '{}' finished", ticket.key);
        true
    }
}

/// Where detectors post completions.
///
/// Detectors only hold a weak reference, so a transition that has been dropped
/// simply stops receiving them.
#[derive(Clone)]
pub struct ExitOutbox(Rc<OutboxInner>);

struct OutboxInner {
    done: RefCell<Vec<PersistTicket>>,
    trigger: RenderTrigger,
}

impl ExitOutbox {
    pub fn new(trigger: RenderTrigger) -> Self {
        Self(Rc::new(OutboxInner {
            done: RefCell::new(Vec::new()),
            trigger,
        }))
    }

    /// Completion callback for one persist: queue the ticket, request a render.
    pub fn completion(&self, ticket: PersistTicket) -> Box<dyn FnOnce()> {
        let weak: Weak<OutboxInner> = Rc::downgrade(&self.0);
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.done.borrow_mut().push(ticket);
                inner.trigger.request();
            }
        })
    }

    pub fn drain(&self) -> Vec<PersistTicket> {
        std::mem::take(&mut *self.0.done.borrow_mut())
    }

    pub fn pending(&self) -> usize {
        self.0.done.borrow().len()
    }

    pub fn trigger(&self) -> &RenderTrigger {
        &self.0.trigger
    }
}

/// Collaborators for one render pass.
pub struct RenderEnv<'a> {
    pub config: &'a TransitionConfig,
    pub timers: &'a Timers,
    pub outbox: &'a ExitOutbox,
}

/// One render pass. Disabled transitions return the input and the state as
/// they came in.
pub fn step(
    state: TransitionState,
    children: Vec<Node>,
    env: &RenderEnv<'_>,
) -> (TransitionState, Vec<Node>) {
    if env.config.disabled {
        return (state, children);
    }

    let exit_props = env.config.effective_exit_props();
    let options = PersistOptions {
        exit_props: &exit_props,
        timeout: env.config.force_remove_timeout,
        timers: env.timers,
        exit_context: env.config.exit_context.as_ref(),
    };
    let persists = compute_persists(
        &state.previous,
        state.persists,
        &children,
        &options,
        &|ticket: PersistTicket| -> Box<dyn FnOnce()> { env.outbox.completion(ticket) },
    );

    let merged = merge_lists(&children, &persists);
    let next = TransitionState {
        previous: merged.clone(),
        persists,
    };
    (next, merged)
}

/// Keeps removed children rendered until their exit animation is over.
///
/// ```rust
/// use std::rc::Rc;
/// use linger_core::*;
///
/// let timers: Timers = Rc::new(TimerQueue::system());
/// let mut list = AnimatedTransition::new(TransitionConfig::new().exit_class("exiting"), timers);
///
/// list.render(vec![Node::new("a"), Node::new("b"), Node::new("c")]);
/// let out = list.render(vec![Node::new("a"), Node::new("c")]);
///
/// let keys: Vec<_> = out.iter().map(|n| n.key.as_str()).collect();
/// assert_eq!(keys, ["a", "b", "c"]);
/// assert_eq!(out[1].props.class_name.as_deref(), Some("exiting"));
/// ```
pub struct AnimatedTransition {
    config: TransitionConfig,
    timers: Timers,
    state: TransitionState,
    outbox: ExitOutbox,
}

impl AnimatedTransition {
    pub fn new(config: TransitionConfig, timers: Timers) -> Self {
        Self::with_trigger(config, timers, RenderTrigger::new())
    }

    pub fn with_trigger(config: TransitionConfig, timers: Timers, trigger: RenderTrigger) -> Self {
        Self {
            config,
            timers,
            state: TransitionState::new(),
            outbox: ExitOutbox::new(trigger),
        }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TransitionConfig) {
        self.config = config;
    }

    /// Bumped whenever a persist finishes and the list should be rendered again.
    pub fn trigger(&self) -> RenderTrigger {
        self.outbox.trigger().clone()
    }

    pub fn render(&mut self, children: Vec<Node>) -> Vec<Node> {
        if self.config.disabled {
            return children;
        }
        self.apply_completions();

        let env = RenderEnv {
            config: &self.config,
            timers: &self.timers,
            outbox: &self.outbox,
        };
        let state = std::mem::take(&mut self.state);
        let (state, out) = step(state, children, &env);
        self.state = state;
        out
    }

    /// Applies queued detector completions. Returns how many removed a persist.
    pub fn apply_completions(&mut self) -> usize {
        self.outbox
            .drain()
            .iter()
            .filter(|t| self.state.remove_persist(t))
            .count()
    }

    /// Drops a persist right away and asks for a re-render.
    pub fn remove_persist(&mut self, ticket: &PersistTicket) -> bool {
        let removed = self.state.remove_persist(ticket);
        if removed {
            self.outbox.trigger().request();
        }
        removed
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn persists(&self) -> &[Persist] {
        &self.state.persists
    }

    pub fn is_exiting(&self, key: &str) -> bool {
        self.state.persists.iter().any(|p| p.key() == key)
    }

    pub fn pending_completions(&self) -> usize {
        self.outbox.pending()
    }
}
