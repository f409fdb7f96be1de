//! In-memory host for tests and headless demos.
//!
//! [`SimElement`] stands in for a DOM element: it keeps listeners and lets the
//! caller `dispatch` transition events by hand. [`SimHost`] plays the keyed host
//! renderer: it mounts and unmounts by key and calls each node's ref callback
//! the way a browser-backed renderer would.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use slotmap::SlotMap;

use crate::element::{
    ElementHandle, Listener, ListenerId, TransitionEvent, TransitionEventKind, TransitionTarget,
};
use crate::view::{Node, NodeRef};

#[derive(Default)]
pub struct SimElement {
    listeners: RefCell<SlotMap<ListenerId, (TransitionEventKind, Listener)>>,
}

impl SimElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every listener of its kind. Listeners may detach
    /// themselves (or others) while running.
    pub fn dispatch(&self, event: &TransitionEvent) {
        let matching: Vec<Listener> = self
            .listeners
            .borrow()
            .values()
            .filter(|(kind, _)| *kind == event.kind)
            .map(|(_, l)| l.clone())
            .collect();
        for l in matching {
            l(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl TransitionTarget for SimElement {
    fn listen(&self, kind: TransitionEventKind, listener: Listener) -> ListenerId {
        self.listeners.borrow_mut().insert((kind, listener))
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(id);
    }
}

struct Mounted {
    node: Node,
    element: Rc<SimElement>,
}

/// Keyed reference renderer.
#[derive(Default)]
pub struct SimHost {
    order: Vec<String>,
    mounted: HashMap<String, Mounted>,
    mounts: usize,
    unmounts: usize,
}

fn same_ref(a: &Option<NodeRef>, b: &Option<NodeRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn call_ref(r: &Option<NodeRef>, element: Option<ElementHandle>) {
    if let Some(r) = r {
        r(element);
    }
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a rendered list: unmounts keys that vanished, updates kept keys
    /// (re-running the ref when its identity changed), mounts new keys.
    pub fn commit(&mut self, nodes: &[Node]) {
        let next: HashMap<&str, &Node> = nodes.iter().map(|n| (n.key.as_str(), n)).collect();

        let gone: Vec<String> = self
            .order
            .iter()
            .filter(|k| !next.contains_key(k.as_str()))
            .cloned()
            .collect();
        for key in gone {
            if let Some(m) = self.mounted.remove(&key) {
                call_ref(&m.node.props.node_ref, None);
                self.unmounts += 1;
            }
        }

        for node in nodes {
            let existing = self.mounted.get_mut(&node.key);
            match existing {
                Some(m) => {
                    let rebind = !same_ref(&m.node.props.node_ref, &node.props.node_ref);
                    let old = std::mem::replace(&mut m.node, node.clone());
                    if rebind {
                        let element: ElementHandle = m.element.clone();
                        call_ref(&old.props.node_ref, None);
                        call_ref(&node.props.node_ref, Some(element));
                    }
                }
                None => {
                    let element = Rc::new(SimElement::new());
                    self.mounted.insert(
                        node.key.clone(),
                        Mounted {
                            node: node.clone(),
                            element: element.clone(),
                        },
                    );
                    self.mounts += 1;
                    call_ref(&node.props.node_ref, Some(element as ElementHandle));
                }
            }
        }

        self.order = nodes.iter().map(|n| n.key.clone()).collect();
    }

    pub fn keys(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn element(&self, key: &str) -> Option<Rc<SimElement>> {
        self.mounted.get(key).map(|m| m.element.clone())
    }

    pub fn node(&self, key: &str) -> Option<&Node> {
        self.mounted.get(key).map(|m| &m.node)
    }

    pub fn class_of(&self, key: &str) -> Option<String> {
        self.node(key).and_then(|n| n.props.class_name.clone())
    }

    pub fn mounts(&self) -> usize {
        self.mounts
    }

    pub fn unmounts(&self) -> usize {
        self.unmounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_dispatch_filters_by_kind() {
        let el = SimElement::new();
        let runs = Rc::new(Cell::new(0));
        let r = runs.clone();
        el.listen(TransitionEventKind::Run, Rc::new(move |_| r.set(r.get() + 1)));
        el.dispatch(&TransitionEvent::end("opacity"));
        el.dispatch(&TransitionEvent::run("opacity"));
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_host_mounts_and_unmounts_by_key() {
        let mut host = SimHost::new();
        host.commit(&[Node::new("a"), Node::new("b")]);
        let a = host.element("a");
        host.commit(&[Node::new("b"), Node::new("a").class("moved")]);
        assert_eq!(host.keys(), vec!["b", "a"]);
        assert!(Rc::ptr_eq(&a.unwrap(), &host.element("a").unwrap()));
        assert_eq!(host.class_of("a").as_deref(), Some("moved"));

        host.commit(&[Node::new("b")]);
        assert_eq!(host.mounts(), 2);
        assert_eq!(host.unmounts(), 1);
        assert!(host.element("a").is_none());
    }

    #[test]
    fn test_host_calls_refs() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let r: NodeRef = Rc::new(move |el: Option<ElementHandle>| s.borrow_mut().push(el.is_some()));
        let mut host = SimHost::new();
        host.commit(&[Node::new("a")]);
        host.commit(&[Node::new("a").props(crate::Props::new().node_ref(r.clone()))]);
        host.commit(&[Node::new("a").props(crate::Props::new().node_ref(r))]);
        host.commit(&[]);
        assert_eq!(*seen.borrow(), vec![true, false]);
    }
}
