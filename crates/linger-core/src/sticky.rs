use crate::persist::Persist;
use crate::view::{Node, index_of_key};

/// Inserts every persist next to where it used to sit.
///
/// Runs placement passes until nothing is pending. A persist anchors after its
/// `prev_key`, or before its `next_key`, or at the front if it was first. A
/// pass that places nothing appends the first pending persist at the end, which
/// guarantees termination and gives the rest something to chain onto.
pub fn merge_lists(current: &[Node], persists: &[Persist]) -> Vec<Node> {
    let mut out = current.to_vec();
    let mut pending: Vec<&Persist> = persists.iter().collect();

    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|p| !try_place(&mut out, p));

        if pending.len() == before {
            let p = pending.remove(0);
            log::trace!("no anchor for persist '{}'; appending", p.key());
            out.push(p.node.clone());
        }
    }

    out
}

fn try_place(out: &mut Vec<Node>, p: &Persist) -> bool {
    // was first: stay first
    let Some(prev_key) = p.prev_key.as_deref() else {
        out.insert(0, p.node.clone());
        return true;
    };

    if let Some(i) = index_of_key(out, prev_key) {
        out.insert(i + 1, p.node.clone());
        return true;
    }

    if let Some(i) = p.next_key.as_deref().and_then(|k| index_of_key(out, k)) {
        out.insert(i, p.node.clone());
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TestClock;
    use crate::persist::{PersistOptions, PersistTicket, compute_persists};
    use crate::timer::{TimerQueue, Timers};
    use crate::view::Props;
    use std::rc::Rc;
    use std::time::Duration;

    fn nodes(keys: &[&str]) -> Vec<Node> {
        keys.iter().map(|k| Node::new(*k)).collect()
    }

    fn keys(list: &[Node]) -> String {
        list.iter()
            .map(|n| n.key.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn persists_for(prev: &[Node], cur: &[Node]) -> Vec<Persist> {
        let timers: Timers = Rc::new(TimerQueue::new(TestClock::new()));
        let props = Props::new();
        let options = PersistOptions {
            exit_props: &props,
            timeout: Duration::from_millis(300),
            timers: &timers,
            exit_context: None,
        };
        compute_persists(
            prev,
            Vec::new(),
            cur,
            &options,
            &|_: PersistTicket| -> Box<dyn FnOnce()> { Box::new(|| {}) },
        )
    }

    fn plan(prev: &[&str], cur: &[&str]) -> String {
        let cur = nodes(cur);
        let persists = persists_for(&nodes(prev), &cur);
        keys(&merge_lists(&cur, &persists))
    }

    #[test]
    fn test_single_removal_stays_in_place() {
        insta::assert_snapshot!(plan(&["a", "b", "c"], &["a", "c"]), @"a b c");
    }

    #[test]
    fn test_consecutive_removals_reassemble() {
        insta::assert_snapshot!(plan(&["a", "b", "c", "d"], &["a", "d"]), @"a b c d");
    }

    #[test]
    fn test_order_of_persists_does_not_matter() {
        let cur = nodes(&["a", "d"]);
        let mut persists = persists_for(&nodes(&["a", "b", "c", "d"]), &cur);
        persists.reverse();
        insta::assert_snapshot!(keys(&merge_lists(&cur, &persists)), @"a b c d");
    }

    #[test]
    fn test_first_and_last_edges() {
        insta::assert_snapshot!(plan(&["a", "b", "c"], &["b"]), @"a b c");
    }

    #[test]
    fn test_everything_removed() {
        insta::assert_snapshot!(plan(&["a", "b", "c"], &[]), @"a b c");
    }

    #[test]
    fn test_new_items_between() {
        insta::assert_snapshot!(plan(&["a", "b", "c"], &["a", "x", "c"]), @"a b x c");
    }

    #[test]
    fn test_no_anchor_falls_back_to_append() {
        let cur = nodes(&["x"]);
        let mut persists = persists_for(&nodes(&["a", "b", "c"]), &[]);
        persists.retain(|p| p.key() != "a");
        for p in &mut persists {
            p.prev_key = Some("gone".into());
            p.next_key = Some("also-gone".into());
        }
        insta::assert_snapshot!(keys(&merge_lists(&cur, &persists)), @"x b c");
    }

    #[test]
    fn test_forced_placement_gives_chain_an_anchor() {
        let cur = nodes(&["x"]);
        let mut persists = persists_for(&nodes(&["a", "b", "c"]), &[]);
        // a lost both anchors; b and c can only chain onto a
        persists[0].prev_key = Some("gone".into());
        persists[0].next_key = Some("also-gone".into());
        persists[1].next_key = None;
        insta::assert_snapshot!(keys(&merge_lists(&cur, &persists)), @"x a b c");
    }

    #[test]
    fn test_output_keys_unique() {
        let cur = nodes(&["c", "a", "e"]);
        let persists = persists_for(&nodes(&["a", "b", "c", "d", "e", "f"]), &cur);
        let merged = merge_lists(&cur, &persists);
        let mut seen = std::collections::HashSet::new();
        assert!(merged.iter().all(|n| seen.insert(n.key.clone())));
        assert_eq!(merged.len(), 6);
    }
}
