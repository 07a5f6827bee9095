//! Ordering engine: total, stable, deterministic display orders.
//!
//! The comparators are reapplied after every mutation that can change a sort
//! key (create, edit, complete-toggle). They are intentionally *not* applied
//! after a pure subtask toggle, so the visible list does not jump while a
//! user works through a task's subtasks.

use crate::model::{Importance, Task, Transaction};
use std::cmp::Ordering;

/// Sorts tasks for display:
///
/// 1. incomplete before completed;
/// 2. among incomplete: ascending importance rank (high, medium, low, none);
/// 3. ties by due date ascending, dated before dateless;
/// 4. final tie-break for everyone (and the only key for completed tasks):
///    id descending, which is newest-first because ids are fixed-width and
///    creation-ordered.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    match (a.completed, b.completed) {
        (false, true) => return Ordering::Less,
        (true, false) => return Ordering::Greater,
        _ => {}
    }
    // Completed tasks skip the importance and due-date tiers entirely.
    if !a.completed {
        let by_rank = importance_rank(a).cmp(&importance_rank(b));
        if by_rank != Ordering::Equal {
            return by_rank;
        }
        let by_due = match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if by_due != Ordering::Equal {
            return by_due;
        }
    }
    b.id.cmp(&a.id)
}

fn importance_rank(task: &Task) -> u8 {
    task.importance.map(Importance::rank).unwrap_or(4)
}

/// Sorts transactions for display: date descending, newest id first on ties.
pub fn sort_transactions(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category, EntityId, Importance, Task, Transaction};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn task(id: &str, text: &str) -> Task {
        Task::new(EntityId::from(id), text).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn incomplete_before_completed_regardless_of_importance() {
        let mut done = task("0000000000000009", "done low");
        done.completed = true;
        done.importance = Some(Importance::High);
        let mut open = task("0000000000000001", "open none");

        let mut tasks = vec![done.clone(), open.clone()];
        sort_tasks(&mut tasks);
        assert_eq!(ids(&tasks), vec!["0000000000000001", "0000000000000009"]);

        // Importance and due date never pull a completed task forward.
        open.importance = None;
        open.due_date = Some(date("2030-01-01"));
        let mut tasks = vec![done, open];
        sort_tasks(&mut tasks);
        assert!(!tasks[0].completed);
    }

    #[test]
    fn importance_ranks_high_medium_low_none() {
        let mut none = task("0000000000000004", "none");
        none.importance = None;
        let mut low = task("0000000000000003", "low");
        low.importance = Some(Importance::Low);
        let mut medium = task("0000000000000002", "medium");
        medium.importance = Some(Importance::Medium);
        let mut high = task("0000000000000001", "high");
        high.importance = Some(Importance::High);

        let mut tasks = vec![none, low, medium, high];
        sort_tasks(&mut tasks);
        assert_eq!(
            ids(&tasks),
            vec![
                "0000000000000001",
                "0000000000000002",
                "0000000000000003",
                "0000000000000004"
            ]
        );
    }

    #[test]
    fn due_date_breaks_importance_ties_dated_first() {
        let mut later = task("0000000000000001", "later");
        later.due_date = Some(date("2024-07-01"));
        let mut sooner = task("0000000000000002", "sooner");
        sooner.due_date = Some(date("2024-06-01"));
        let dateless = task("0000000000000003", "dateless");

        let mut tasks = vec![dateless, later, sooner];
        sort_tasks(&mut tasks);
        assert_eq!(
            ids(&tasks),
            vec!["0000000000000002", "0000000000000001", "0000000000000003"]
        );
    }

    #[test]
    fn equal_keys_fall_back_to_newest_id_first() {
        let older = task("0000000000000001", "older");
        let newer = task("0000000000000002", "newer");
        let mut tasks = vec![older, newer];
        sort_tasks(&mut tasks);
        assert_eq!(ids(&tasks), vec!["0000000000000002", "0000000000000001"]);
    }

    #[test]
    fn sort_is_idempotent() {
        let mut a = task("0000000000000001", "a");
        a.importance = Some(Importance::Medium);
        let mut b = task("0000000000000002", "b");
        b.completed = true;
        let mut c = task("0000000000000003", "c");
        c.due_date = Some(date("2024-05-05"));
        let d = task("0000000000000004", "d");

        let mut once = vec![a, b, c, d];
        sort_tasks(&mut once);
        let mut twice = once.clone();
        sort_tasks(&mut twice);
        assert_eq!(once, twice);
    }

    fn tx(id: &str, date_str: &str) -> Transaction {
        Transaction {
            id: EntityId::from(id),
            description: "x".into(),
            amount: Amount::new(-Decimal::ONE),
            date: date(date_str),
            category: Category::Other,
            recurring: None,
        }
    }

    #[test]
    fn transactions_sort_newest_date_first() {
        let mut txs = vec![
            tx("0000000000000001", "2024-01-10"),
            tx("0000000000000002", "2024-03-01"),
            tx("0000000000000003", "2024-02-15"),
        ];
        sort_transactions(&mut txs);
        let dates: Vec<_> = txs.iter().map(|t| t.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-02-15", "2024-01-10"]);
    }

    #[test]
    fn same_day_transactions_newest_id_first() {
        let mut txs = vec![
            tx("0000000000000001", "2024-01-10"),
            tx("0000000000000002", "2024-01-10"),
        ];
        sort_transactions(&mut txs);
        assert_eq!(txs[0].id.as_str(), "0000000000000002");
    }
}
