//! Ordered three-way merge
//!
//! Walks two ordered maps and dispatches every key to exactly one of three
//! callbacks: removed (only in `prev`), matched (in both) or added (only in
//! `next`). A context value is threaded through the callbacks and returned,
//! so the caller accumulates state without the merge knowing about it.
//!
//! Visit order is fixed: all removed keys first in ascending order, then the
//! keys of `next` in ascending order. Both passes are linear merge-joins.

use std::collections::BTreeMap;

/// Merge `prev` into `next`, threading `ctx` through the callbacks
pub fn merge<K, V, C, R, M, A>(
    prev: &BTreeMap<K, V>,
    next: &BTreeMap<K, V>,
    ctx: C,
    mut on_removed: R,
    mut on_matched: M,
    mut on_added: A,
) -> C
where
    K: Ord,
    R: FnMut(&K, &V, C) -> C,
    M: FnMut(&K, &V, &V, C) -> C,
    A: FnMut(&K, &V, C) -> C,
{
    let mut ctx = ctx;

    let mut upcoming = next.keys().peekable();
    for (key, value) in prev {
        while upcoming.next_if(|k| *k < key).is_some() {}
        if upcoming.peek() != Some(&key) {
            ctx = on_removed(key, value, ctx);
        }
    }

    let mut previous = prev.iter().peekable();
    for (key, value) in next {
        while previous.next_if(|(k, _)| *k < key).is_some() {}
        ctx = match previous.next_if(|(k, _)| *k == key) {
            Some((_, prev_value)) => on_matched(key, prev_value, value, ctx),
            None => on_added(key, value, ctx),
        };
    }

    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&'static str, u32)]) -> BTreeMap<&'static str, u32> {
        entries.iter().copied().collect()
    }

    fn trace(prev: &BTreeMap<&'static str, u32>, next: &BTreeMap<&'static str, u32>) -> Vec<String> {
        merge(
            prev,
            next,
            Vec::new(),
            |k, v, mut out| {
                out.push(format!("-{}{}", k, v));
                out
            },
            |k, p, n, mut out| {
                out.push(format!("={}{}{}", k, p, n));
                out
            },
            |k, v, mut out| {
                out.push(format!("+{}{}", k, v));
                out
            },
        )
    }

    #[test]
    fn test_merge_partitions() {
        let prev = map(&[("a", 1), ("b", 2), ("d", 4)]);
        let next = map(&[("b", 5), ("c", 6), ("d", 4), ("e", 7)]);

        assert_eq!(trace(&prev, &next), vec!["-a1", "=b25", "+c6", "=d44", "+e7"]);
    }

    #[test]
    fn test_removed_before_added() {
        let prev = map(&[("x", 1), ("z", 3)]);
        let next = map(&[("a", 9), ("y", 2)]);

        assert_eq!(trace(&prev, &next), vec!["-x1", "-z3", "+a9", "+y2"]);
    }

    #[test]
    fn test_merge_empty_sides() {
        let empty = map(&[]);
        let full = map(&[("a", 1), ("b", 2)]);

        assert_eq!(trace(&empty, &full), vec!["+a1", "+b2"]);
        assert_eq!(trace(&full, &empty), vec!["-a1", "-b2"]);
        assert!(trace(&empty, &empty).is_empty());
    }

    #[test]
    fn test_context_is_threaded() {
        let prev = map(&[("a", 1), ("b", 2)]);
        let next = map(&[("b", 3), ("c", 4)]);

        let total = merge(
            &prev,
            &next,
            0u32,
            |_, v, acc| acc + v,
            |_, p, n, acc| acc + p * n,
            |_, v, acc| acc + v * 100,
        );
        assert_eq!(total, 1 + 6 + 400);
    }
}
