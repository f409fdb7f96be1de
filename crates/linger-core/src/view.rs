use std::collections::BTreeMap;
use std::rc::Rc;

use crate::ElementHandle;
use crate::class_names::merge_optional;
use crate::locals::{ExitContext, with_exit_context};

/// Element-ref callback. The host calls it with `Some(element)` once the node is
/// mounted (or its ref changes) and with `None` when it goes away.
pub type NodeRef = Rc<dyn Fn(Option<ElementHandle>)>;

#[derive(Clone, Default)]
pub struct Props {
    pub class_name: Option<String>,
    pub attrs: BTreeMap<String, String>,
    pub node_ref: Option<NodeRef>,
}

impl std::fmt::Debug for Props {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Props")
            .field("class_name", &self.class_name)
            .field("attrs", &self.attrs)
            .field("node_ref", &self.node_ref.as_ref().map(|_| "<ref>"))
            .finish()
    }
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }
    pub fn node_ref(mut self, r: NodeRef) -> Self {
        self.node_ref = Some(r);
        self
    }

    /// Layers `overlay` on top of `self`. Class lists are unioned (own classes
    /// first), attributes from `overlay` win, and a ref in `overlay` replaces ours.
    pub fn merged_with(&self, overlay: &Props) -> Props {
        let mut attrs = self.attrs.clone();
        attrs.extend(overlay.attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
        Props {
            class_name: merge_optional(
                self.class_name.as_deref(),
                overlay.class_name.as_deref(),
            ),
            attrs,
            node_ref: overlay.node_ref.clone().or_else(|| self.node_ref.clone()),
        }
    }
}

/// A keyed renderable unit. Two nodes are the same entity iff their keys match.
#[derive(Clone, Debug)]
pub struct Node {
    pub key: String,
    pub props: Props,
    /// Set on persisted clones when the transition carries an exit context.
    pub exit: Option<ExitContext>,
}

impl Node {
    pub fn new(key: impl Into<String>) -> Self {
        Node {
            key: key.into(),
            props: Props::default(),
            exit: None,
        }
    }
    pub fn props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }
    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.props.class_name = Some(class_name.into());
        self
    }
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.attrs.insert(name.into(), value.into());
        self
    }

    pub fn is_exiting(&self) -> bool {
        self.exit.is_some()
    }

    /// Runs `f` for this node's subtree with its exit context (if any) installed,
    /// so descendants can see `exit_context()`.
    pub fn provide<R>(&self, f: impl FnOnce(&Node) -> R) -> R {
        match &self.exit {
            Some(ctx) => with_exit_context(ctx.clone(), || f(self)),
            None => f(self),
        }
    }
}

pub(crate) fn index_of_key(nodes: &[Node], key: &str) -> Option<usize> {
    nodes.iter().position(|n| n.key == key)
}
