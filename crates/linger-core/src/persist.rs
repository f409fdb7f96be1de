use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::detector::AnimationEndDetector;
use crate::locals::{ExitContext, ExitValue};
use crate::timer::Timers;
use crate::view::{Node, Props};

/// Generation id of one persist. A key that is removed, re-added and removed
/// again gets a fresh id each time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersistId(u64);

static NEXT_PERSIST_ID: AtomicU64 = AtomicU64::new(1);

impl PersistId {
    fn next() -> Self {
        PersistId(NEXT_PERSIST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifies the persist a completion belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistTicket {
    pub id: PersistId,
    pub key: String,
}

/// A removed node kept alive until its exit animation completes.
pub struct Persist {
    id: PersistId,
    /// Clone of the removed node with exit props and the detector ref applied.
    pub node: Node,
    /// Neighbours at the last render the key was seen in; hints for placement only.
    pub prev_key: Option<String>,
    pub next_key: Option<String>,
    detector: AnimationEndDetector,
}

impl std::fmt::Debug for Persist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persist")
            .field("id", &self.id)
            .field("key", &self.node.key)
            .field("prev_key", &self.prev_key)
            .field("next_key", &self.next_key)
            .field("done", &self.detector.is_done())
            .finish()
    }
}

impl Persist {
    pub fn id(&self) -> PersistId {
        self.id
    }
    pub fn key(&self) -> &str {
        &self.node.key
    }
    pub fn ticket(&self) -> PersistTicket {
        PersistTicket {
            id: self.id,
            key: self.node.key.clone(),
        }
    }
    pub fn detector(&self) -> &AnimationEndDetector {
        &self.detector
    }
}

/// Per-render inputs for creating persists.
pub struct PersistOptions<'a> {
    pub exit_props: &'a Props,
    pub timeout: Duration,
    pub timers: &'a Timers,
    pub exit_context: Option<&'a ExitValue>,
}

/// Builds the persist set for this render.
///
/// Every node of `previous` whose key is missing from `current` gets a persist.
/// Persists that already exist keep their identity (and detector); only their
/// neighbour keys are refreshed. Persists whose key is back in `current` are
/// dropped. The result follows `previous` order.
pub fn compute_persists(
    previous: &[Node],
    previous_persists: Vec<Persist>,
    current: &[Node],
    options: &PersistOptions<'_>,
    on_complete: &dyn Fn(PersistTicket) -> Box<dyn FnOnce()>,
) -> Vec<Persist> {
    let current_keys: HashSet<&str> = current.iter().map(|n| n.key.as_str()).collect();
    let mut by_key: HashMap<String, Persist> = previous_persists
        .into_iter()
        .map(|p| (p.node.key.clone(), p))
        .collect();

    let mut persists = Vec::new();
    for (index, node) in previous.iter().enumerate() {
        if current_keys.contains(node.key.as_str()) {
            continue;
        }

        let prev_key = index
            .checked_sub(1)
            .and_then(|i| previous.get(i))
            .map(|n| n.key.clone());
        let next_key = previous.get(index + 1).map(|n| n.key.clone());

        match by_key.remove(&node.key) {
            Some(mut existing) => {
                existing.prev_key = prev_key;
                existing.next_key = next_key;
                persists.push(existing);
            }
            None => persists.push(create_persist(
                node,
                prev_key,
                next_key,
                options,
                on_complete,
            )),
        }
    }

    for stale in by_key.into_values() {
        if current_keys.contains(stale.key()) {
            log::debug!("persist '{}' cancelled: key is back", stale.key());
        }
    }

    persists
}

fn create_persist(
    node: &Node,
    prev_key: Option<String>,
    next_key: Option<String>,
    options: &PersistOptions<'_>,
    on_complete: &dyn Fn(PersistTicket) -> Box<dyn FnOnce()>,
) -> Persist {
    let id = PersistId::next();
    let done = on_complete(PersistTicket {
        id,
        key: node.key.clone(),
    });
    let detector = AnimationEndDetector::new(done, options.timeout, options.timers.clone());

    let overlay = Props {
        node_ref: Some(detector.bind_fn()),
        ..options.exit_props.clone()
    };
    let exit = options.exit_context.map(|value| ExitContext {
        value: value.clone(),
        bind: detector.bind_fn(),
    });
    let clone = Node {
        key: node.key.clone(),
        props: node.props.merged_with(&overlay),
        exit,
    };

    log::debug!(
        "persist '{}' created (prev={:?}, next={:?})",
        node.key,
        prev_key,
        next_key
    );

    Persist {
        id,
        node: clone,
        prev_key,
        next_key,
        detector,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TestClock;
    use crate::timer::TimerQueue;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn nodes(keys: &[&str]) -> Vec<Node> {
        keys.iter().map(|k| Node::new(*k)).collect()
    }

    struct Env {
        timers: Timers,
        exit_props: Props,
        done: Rc<RefCell<Vec<PersistTicket>>>,
    }

    impl Env {
        fn new() -> Self {
            Env {
                timers: Rc::new(TimerQueue::new(TestClock::new())),
                exit_props: Props::new().class("exiting"),
                done: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn compute(&self, prev: &[Node], persists: Vec<Persist>, cur: &[Node]) -> Vec<Persist> {
            let options = PersistOptions {
                exit_props: &self.exit_props,
                timeout: Duration::from_millis(300),
                timers: &self.timers,
                exit_context: None,
            };
            let done = self.done.clone();
            compute_persists(
                prev,
                persists,
                cur,
                &options,
                &move |ticket: PersistTicket| -> Box<dyn FnOnce()> {
                    let done = done.clone();
                    Box::new(move || done.borrow_mut().push(ticket))
                },
            )
        }
    }

    #[test]
    fn test_removed_node_gets_neighbours() {
        let env = Env::new();
        let out = env.compute(&nodes(&["a", "b", "c"]), vec![], &nodes(&["a", "c"]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key(), "b");
        assert_eq!(out[0].prev_key.as_deref(), Some("a"));
        assert_eq!(out[0].next_key.as_deref(), Some("c"));
        assert!(out[0].node.props.node_ref.is_some());
    }

    #[test]
    fn test_edges_have_no_neighbour() {
        let env = Env::new();
        let out = env.compute(&nodes(&["a", "b", "c"]), vec![], &nodes(&["b"]));
        let keys: Vec<_> = out.iter().map(|p| p.key()).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(out[0].prev_key, None);
        assert_eq!(out[1].next_key, None);
    }

    #[test]
    fn test_exit_class_merges_with_user_class() {
        let env = Env::new();
        let prev = vec![Node::new("a").class("row"), Node::new("b")];
        let out = env.compute(&prev, vec![], &[]);
        assert_eq!(out[0].node.props.class_name.as_deref(), Some("row exiting"));
        assert_eq!(out[1].node.props.class_name.as_deref(), Some("exiting"));
    }

    #[test]
    fn test_existing_persist_keeps_identity() {
        let env = Env::new();
        let first = env.compute(&nodes(&["a", "b", "c"]), vec![], &nodes(&["a", "c"]));
        let id = first[0].id();

        // "a" goes too; b's left neighbour is still "a" in the merged baseline
        let second = env.compute(&nodes(&["a", "b", "c"]), first, &nodes(&["c"]));
        let b = second.iter().find(|p| p.key() == "b").unwrap();
        assert_eq!(b.id(), id);

        let third = env.compute(&nodes(&["b", "c"]), second, &nodes(&["c"]));
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].id(), id);
        assert_eq!(third[0].prev_key, None);
        assert_eq!(third[0].next_key.as_deref(), Some("c"));
    }

    #[test]
    fn test_readded_key_drops_persist() {
        let env = Env::new();
        let first = env.compute(&nodes(&["a", "b"]), vec![], &nodes(&["a"]));
        assert_eq!(first.len(), 1);
        let second = env.compute(&nodes(&["a", "b"]), first, &nodes(&["a", "b"]));
        assert!(second.is_empty());
    }

    #[test]
    fn test_fresh_ids_per_removal() {
        let env = Env::new();
        let first = env.compute(&nodes(&["a"]), vec![], &[]);
        let second = env.compute(&nodes(&["a"]), vec![], &[]);
        assert_ne!(first[0].id(), second[0].id());
    }
}
