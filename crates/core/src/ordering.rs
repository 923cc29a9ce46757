//! Dense per-story ordering of sections.
//!
//! The repository layer loads the `(id, sort_order)` pairs of every section
//! in a story (under a row lock on the story), asks [`reorder`] for a plan,
//! and writes back only the slots listed in [`OrderPlan::updates`]. After the
//! writes the story's sort orders are exactly `0..n` with no gaps.

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Position of one section inside its story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSlot {
    pub id: DbId,
    pub sort_order: i32,
}

/// Result of a reorder: the final sequence and the slots that must be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderPlan {
    /// Section ids in their final order (index == new `sort_order`).
    pub order: Vec<DbId>,
    /// Slots whose `sort_order` differs from the stored value.
    pub updates: Vec<OrderSlot>,
}

#[cfg(test)]
impl OrderPlan {
    /// Final index of `id`, if it is part of the plan.
    fn position_of(&self, id: DbId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

/// Clamp a requested insertion index into `0..=len`.
pub fn clamp_target_index(target_index: Option<i64>, len: usize) -> usize {
    let requested = target_index.unwrap_or(0).max(0);
    usize::try_from(requested).map_or(len, |idx| idx.min(len))
}

/// Stored `sort_order` for a freshly inserted row, before the reorder runs.
///
/// Requested indices arrive as `i64` and are never rejected; the column is an
/// `INTEGER`, so the value is saturated into `0..=i32::MAX`.
pub fn provisional_order(requested: Option<i64>) -> i32 {
    i32::try_from(requested.unwrap_or(0).max(0)).unwrap_or(i32::MAX)
}

/// Compute a dense ordering for `siblings`.
///
/// Siblings are first sorted by `(sort_order, id)` so colliding stored values
/// still produce a deterministic base order. When `moving` is given, that
/// section is pulled out and re-inserted at `target_index` (clamped). Without
/// a moving section the existing order is simply compacted.
///
/// A `moving` id that is not among the siblings is inserted as a new element
/// with no stored order, so it always appears in the write-set.
pub fn reorder(
    siblings: &[OrderSlot],
    moving: Option<DbId>,
    target_index: Option<i64>,
) -> OrderPlan {
    let mut sorted: Vec<OrderSlot> = siblings.to_vec();
    sorted.sort_by_key(|slot| (slot.sort_order, slot.id));

    let mut sequence: Vec<(DbId, Option<i32>)> = Vec::with_capacity(sorted.len() + 1);
    let mut moving_stored = None;
    for slot in &sorted {
        if Some(slot.id) == moving {
            moving_stored = Some(slot.sort_order);
        } else {
            sequence.push((slot.id, Some(slot.sort_order)));
        }
    }

    if let Some(moving_id) = moving {
        let at = clamp_target_index(target_index, sequence.len());
        sequence.insert(at, (moving_id, moving_stored));
    }

    let mut plan = OrderPlan {
        order: Vec::with_capacity(sequence.len()),
        updates: Vec::new(),
    };
    for (idx, (id, stored)) in sequence.into_iter().enumerate() {
        let sort_order = idx as i32;
        if stored != Some(sort_order) {
            plan.updates.push(OrderSlot { id, sort_order });
        }
        plan.order.push(id);
    }
    plan
}

/// Returns `true` if `orders` is exactly the set `0..orders.len()`.
pub fn is_dense(orders: &[i32]) -> bool {
    let mut sorted = orders.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(idx, &v)| v == idx as i32)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
