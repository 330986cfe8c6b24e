//! Position rules for columns within a board and cards within a column.
//!
//! The policy is append-only: a new column or card, and a card moved to another column,
//! always lands after everything already there. Existing entries are never renumbered
//! and gaps left by deletions are never closed.
//!
//! `next_order` is computed from a read of the current orders without any lock, so two
//! concurrent inserts into the same column can observe the same maximum and receive the
//! same order. `order` is only a display hint; readers break ties with
//! [`display_cmp`].

use chrono::{DateTime, Utc};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Order assigned to the first entry of an empty board or column.
pub const FIRST_ORDER: i32 = 1;

/// Returns `max(existing) + 1`, or [`FIRST_ORDER`] when nothing exists yet.
pub fn next_order<I>(existing: I) -> i32
where
    I: IntoIterator,
    I::Item: Borrow<i32>,
{
    existing
        .into_iter()
        .map(|order| *order.borrow())
        .max()
        .map_or(FIRST_ORDER, |max| max.saturating_add(1))
}

/// A move whose target is the card's current column changes nothing.
pub fn is_no_op_move(current_column_id: &str, target_column_id: &str) -> bool {
    current_column_id == target_column_id
}

/// Anything that has a display position.
pub trait Ordered {
    fn order(&self) -> i32;
    fn created_at(&self) -> DateTime<Utc>;
    fn id(&self) -> &str;
}

/// Ascending by order, then creation time, then ID, so duplicate orders from the
/// insert race still read back in a stable sequence.
pub fn display_cmp<T: Ordered>(a: &T, b: &T) -> Ordering {
    a.order()
        .cmp(&b.order())
        .then_with(|| a.created_at().cmp(&b.created_at()))
        .then_with(|| a.id().cmp(b.id()))
}

pub fn sort_for_display<T: Ordered>(items: &mut [T]) {
    items.sort_by(display_cmp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    struct Item {
        id: &'static str,
        order: i32,
        created_at: DateTime<Utc>,
    }

    impl Ordered for Item {
        fn order(&self) -> i32 {
            self.order
        }
        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }
        fn id(&self) -> &str {
            self.id
        }
    }

    #[test]
    fn test_next_order_empty_is_first() {
        assert_eq!(next_order(Vec::<i32>::new()), 1);
    }

    #[test]
    fn test_next_order_appends_after_max() {
        assert_eq!(next_order(vec![1, 2, 3]), 4);
        assert_eq!(next_order(&[3, 1]), 4);
    }

    #[test]
    fn test_next_order_does_not_fill_gaps() {
        // orders 2 and 3 were deleted
        assert_eq!(next_order(vec![1, 4]), 5);
    }

    #[test]
    fn test_sequential_orders_strictly_increase() {
        let mut orders = Vec::new();
        for _ in 0..5 {
            let order = next_order(&orders);
            assert!(orders.iter().all(|existing| *existing < order));
            orders.push(order);
        }
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_is_no_op_move() {
        assert!(is_no_op_move("col-a", "col-a"));
        assert!(!is_no_op_move("col-a", "col-b"));
    }

    #[test]
    fn test_display_sort_breaks_ties_by_creation_then_id() {
        let now = Utc::now();
        let mut items = vec![
            Item { id: "c", order: 2, created_at: now },
            Item { id: "b", order: 1, created_at: now + Duration::seconds(1) },
            Item { id: "z", order: 1, created_at: now },
            Item { id: "a", order: 1, created_at: now },
        ];
        sort_for_display(&mut items);

        let ids: Vec<_> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec!["a", "z", "b", "c"]);
    }
}
