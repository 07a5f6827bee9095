//! Subtask sub-list engine: toggling and manual reordering.
//!
//! These are pure transformations over a task's subtask sequence; the
//! controller persists the parent task afterwards. Neither operation
//! triggers a re-sort of the parent task list.

use crate::model::Subtask;

/// Which side of the drop target the dragged subtask lands on. In the UI
/// this is determined by pointer position relative to the target's vertical
/// midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DropSide {
    Before,
    After,
}

/// Flips the completion of the subtask with `id`. Returns false if no such
/// subtask exists.
pub fn toggle(subtasks: &mut [Subtask], id: u64) -> bool {
    match subtasks.iter_mut().find(|s| s.id == id) {
        Some(subtask) => {
            subtask.completed = !subtask.completed;
            true
        }
        None => false,
    }
}

/// Moves the subtask `source_id` so it sits immediately before or after
/// `target_id`, preserving the relative order of everything else.
///
/// A self-drop is a no-op, as is any drag where either id is missing from
/// this list (which is how cross-task drags are rejected). Returns true if
/// the order changed.
pub fn reorder(subtasks: &mut Vec<Subtask>, source_id: u64, target_id: u64, side: DropSide) -> bool {
    if source_id == target_id {
        return false;
    }
    let Some(source_ix) = subtasks.iter().position(|s| s.id == source_id) else {
        return false;
    };
    if !subtasks.iter().any(|s| s.id == target_id) {
        return false;
    }
    let source = subtasks.remove(source_ix);
    // Recompute after removal: the target may have shifted left.
    let target_ix = subtasks
        .iter()
        .position(|s| s.id == target_id)
        .unwrap_or(subtasks.len());
    let insert_ix = match side {
        DropSide::Before => target_ix,
        DropSide::After => target_ix + 1,
    };
    subtasks.insert(insert_ix, source);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(ids: &[u64]) -> Vec<Subtask> {
        ids.iter()
            .map(|&id| Subtask {
                id,
                text: format!("step {id}"),
                completed: false,
            })
            .collect()
    }

    fn order(subtasks: &[Subtask]) -> Vec<u64> {
        subtasks.iter().map(|s| s.id).collect()
    }

    #[test]
    fn toggle_flips_only_the_named_subtask() {
        let mut subtasks = list(&[1, 2, 3]);
        assert!(toggle(&mut subtasks, 2));
        assert!(!subtasks[0].completed);
        assert!(subtasks[1].completed);
        assert!(!subtasks[2].completed);
        assert!(toggle(&mut subtasks, 2));
        assert!(!subtasks[1].completed);
    }

    #[test]
    fn toggle_unknown_id_is_a_noop() {
        let mut subtasks = list(&[1, 2]);
        assert!(!toggle(&mut subtasks, 9));
    }

    #[test]
    fn drop_before_places_source_immediately_before_target() {
        let mut subtasks = list(&[1, 2, 3, 4]);
        assert!(reorder(&mut subtasks, 4, 2, DropSide::Before));
        assert_eq!(order(&subtasks), vec![1, 4, 2, 3]);
    }

    #[test]
    fn drop_after_places_source_immediately_after_target() {
        let mut subtasks = list(&[1, 2, 3, 4]);
        assert!(reorder(&mut subtasks, 1, 3, DropSide::After));
        assert_eq!(order(&subtasks), vec![2, 3, 1, 4]);
    }

    #[test]
    fn dragging_forward_accounts_for_the_removal_shift() {
        let mut subtasks = list(&[1, 2, 3, 4]);
        assert!(reorder(&mut subtasks, 2, 4, DropSide::Before));
        assert_eq!(order(&subtasks), vec![1, 3, 2, 4]);
    }

    #[test]
    fn self_drop_is_a_noop() {
        let mut subtasks = list(&[1, 2, 3]);
        assert!(!reorder(&mut subtasks, 2, 2, DropSide::Before));
        assert_eq!(order(&subtasks), vec![1, 2, 3]);
    }

    #[test]
    fn missing_source_or_target_is_a_noop() {
        let mut subtasks = list(&[1, 2, 3]);
        assert!(!reorder(&mut subtasks, 9, 2, DropSide::Before));
        assert!(!reorder(&mut subtasks, 1, 9, DropSide::After));
        assert_eq!(order(&subtasks), vec![1, 2, 3]);
    }

    #[test]
    fn relative_order_of_others_is_preserved() {
        let mut subtasks = list(&[10, 20, 30, 40, 50]);
        reorder(&mut subtasks, 50, 20, DropSide::Before);
        let rest: Vec<u64> = order(&subtasks).into_iter().filter(|&id| id != 50).collect();
        assert_eq!(rest, vec![10, 20, 30, 40]);
    }
}
