//! One-to-one structural matching of recipe trees against objects.

use std::collections::BTreeSet;

use super::{ObjectLookup, RecipeNode};
use crate::ObjectId;

/// Whether `id` satisfies `node`: same kind, every state condition holds, and
/// the node's children can be matched to distinct direct content objects.
pub fn node_matches<L: ObjectLookup + ?Sized>(node: &RecipeNode, id: ObjectId, objects: &L) -> bool {
    let Some(obj) = objects.lookup(id) else {
        return false;
    };
    if obj.kind() != node.root_type {
        return false;
    }
    let conditions_hold = node
        .conditions
        .iter()
        .all(|condition| obj.food().is_some_and(|food| food.has_state(*condition)));
    if !conditions_hold {
        return false;
    }
    if node.contains.is_empty() {
        return true;
    }

    let content = obj.content_ids();
    if content.len() < node.contains.len() {
        return false;
    }
    let edges: Vec<Vec<usize>> = node
        .contains
        .iter()
        .map(|child| {
            content
                .iter()
                .enumerate()
                .filter(|(_, item)| node_matches(child, **item, objects))
                .map(|(idx, _)| idx)
                .collect()
        })
        .collect();
    maximum_matching(&edges, content.len())
        .iter()
        .all(Option::is_some)
}

/// Kuhn's augmenting-path matching. `edges[l]` lists the right vertices left
/// vertex `l` may take. Returns the right vertex assigned to each left vertex.
///
/// Left vertices are tried in order and each scans its edges in order, so the
/// result is deterministic for a given input.
pub fn maximum_matching(edges: &[Vec<usize>], right: usize) -> Vec<Option<usize>> {
    let mut owner: Vec<Option<usize>> = vec![None; right];
    for left in 0..edges.len() {
        let mut seen = vec![false; right];
        augment(left, edges, &mut seen, &mut owner);
    }

    let mut assigned = vec![None; edges.len()];
    for (r, l) in owner.iter().enumerate() {
        if let Some(l) = l {
            assigned[*l] = Some(r);
        }
    }
    assigned
}

fn augment(left: usize, edges: &[Vec<usize>], seen: &mut [bool], owner: &mut [Option<usize>]) -> bool {
    for &r in &edges[left] {
        if seen[r] {
            continue;
        }
        seen[r] = true;
        let free = match owner[r] {
            None => true,
            Some(other) => augment(other, edges, seen, owner),
        };
        if free {
            owner[r] = Some(left);
            return true;
        }
    }
    false
}

/// `pool` plus everything nested inside its members, deduplicated, in
/// first-seen order.
pub fn expand_pool<L: ObjectLookup + ?Sized>(objects: &L, pool: &[ObjectId]) -> Vec<ObjectId> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    let mut stack: Vec<ObjectId> = pool.iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        out.push(id);
        if let Some(obj) = objects.lookup(id) {
            stack.extend(obj.nested_ids().into_iter().rev());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn augmenting_path_reassigns_earlier_choice() {
        // Left 0 could take 0 or 1, left 1 only 0: greedy would strand left 1.
        let edges = vec![vec![0, 1], vec![0]];
        assert_eq!(maximum_matching(&edges, 2), vec![Some(1), Some(0)]);
    }

    #[test]
    fn shared_single_candidate_matches_once() {
        let edges = vec![vec![0], vec![0]];
        assert_eq!(maximum_matching(&edges, 1), vec![Some(0), None]);
    }
}
