//! Pure ordering primitives
//!
//! Every function here is copy-on-write: inputs are never mutated, a new sequence is
//! returned. The cache triggers re-renders on snapshot identity, so sharing a mutated
//! buffer with a previous snapshot is never acceptable.

use crate::task::Task;

/// Remove the element at `from_index` and reinsert it so that it ends up at `to_index`
/// in the **resulting** sequence.
///
/// `to_index` is therefore an index into the post-removal sequence. Callers resolving a
/// drop position against the pre-removal sequence must go through
/// [`compute_insertion_index`], which performs that adjustment in exactly one place.
///
/// Out-of-range indices are clamped; a move onto itself returns a plain copy.
pub fn move_within_sequence<T: Clone>(seq: &[T], from_index: usize, to_index: usize) -> Vec<T> {
    let mut result = seq.to_vec();
    if from_index >= result.len() {
        return result;
    }
    let element = result.remove(from_index);
    let to_index = to_index.min(result.len());
    result.insert(to_index, element);
    result
}

/// Assign `ordering_id = position + 1` to every task, in traversal order.
///
/// Idempotent: renumbering an already-contiguous sequence yields an equal sequence.
pub fn renumber_ordering_ids(seq: &[Task]) -> Vec<Task> {
    seq.iter()
        .enumerate()
        .map(|(position, task)| {
            let mut task = task.clone();
            task.set_ordering_id(position as u32 + 1);
            task
        })
        .collect()
}

/// Translate a drop position into the index to insert at, unifying the off-by-one
/// adjustments for "insert before/after the target row" and "same-section removal shift".
///
/// `to_index` is the index of the drop-target row in the destination section, counted
/// before anything is removed. `lower_half` is true when the pointer sat below the
/// vertical midpoint of that row (insert after it, else before it). The result is an
/// insertion index valid against the destination sequence *after* the dragged element
/// has been removed, i.e. directly usable as the `to_index` of [`move_within_sequence`]
/// for same-section moves, or as a plain insertion index for cross-section moves.
///
/// Truth table (`from` only relevant when `same_section`):
///
/// | same_section | lower_half | slot before shift | result              |
/// |--------------|------------|-------------------|---------------------|
/// | false        | false      | to                | to                  |
/// | false        | true       | to + 1            | to + 1              |
/// | true         | false      | to                | to - 1 if from < to |
/// | true         | true       | to + 1            | to if from <= to    |
pub fn compute_insertion_index(
    from_index: usize,
    to_index: usize,
    lower_half: bool,
    same_section: bool,
) -> usize {
    let mut slot = if lower_half { to_index + 1 } else { to_index };
    if same_section && from_index < slot {
        // Removing the dragged element shifts everything after it one slot left
        slot -= 1;
    }
    slot
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title()).collect()
    }

    fn seq(names: &[&str]) -> Vec<Task> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Task::new(name.to_string(), i as u32 + 1))
            .collect()
    }

    #[test]
    fn move_lands_at_post_removal_index() {
        let tasks = seq(&["A", "B", "C", "D"]);
        let moved = move_within_sequence(&tasks, 0, 2);
        assert_eq!(titles(&moved), vec!["B", "C", "A", "D"]);
        // input untouched
        assert_eq!(titles(&tasks), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn move_backwards() {
        let tasks = seq(&["A", "B", "C", "D"]);
        let moved = move_within_sequence(&tasks, 3, 1);
        assert_eq!(titles(&moved), vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn move_clamps_out_of_range_target() {
        let tasks = seq(&["A", "B"]);
        let moved = move_within_sequence(&tasks, 0, 10);
        assert_eq!(titles(&moved), vec!["B", "A"]);
        // out-of-range source is a plain copy
        let copy = move_within_sequence(&tasks, 10, 0);
        assert_eq!(titles(&copy), vec!["A", "B"]);
    }

    #[test]
    fn renumber_is_idempotent() {
        let mut tasks = seq(&["A", "B", "C"]);
        tasks[0].set_ordering_id(7);
        tasks[2].set_ordering_id(7);

        let once = renumber_ordering_ids(&tasks);
        let twice = renumber_ordering_ids(&once);
        assert_eq!(once, twice);
        let ids: Vec<u32> = once.iter().map(|t| t.ordering_id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn insertion_index_truth_table() {
        // cross-section: no removal shift
        assert_eq!(compute_insertion_index(0, 2, false, false), 2);
        assert_eq!(compute_insertion_index(0, 2, true, false), 3);

        // same-section, dragging downwards: removal shifts the slot left
        assert_eq!(compute_insertion_index(0, 2, false, true), 1);
        assert_eq!(compute_insertion_index(0, 2, true, true), 2);

        // same-section, dragging upwards: no shift
        assert_eq!(compute_insertion_index(3, 1, false, true), 1);
        assert_eq!(compute_insertion_index(3, 1, true, true), 2);

        // dropping on the dragged row itself resolves to its own slot
        assert_eq!(compute_insertion_index(2, 2, false, true), 2);
        assert_eq!(compute_insertion_index(2, 2, true, true), 2);
    }
}
