//! Ordered child lists.
//!
//! A task's `children` and a project's `topChildren` are both an ordered
//! sequence of task identifiers where array position is the display order.
//! [`ChildList`] implements the positional contract both owners share:
//! insertion at a slot, removal, and relocation within the same list.
//!
//! Every mutation rewrites the whole sequence, which suits lists of a few
//! dozen entries.

use crate::task::domain::TaskId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target position of a child within a [`ChildList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    /// After the current last entry.
    #[default]
    Last,
    /// At the given slot, clamped to `[0, len]`.
    Index(usize),
    /// Directly after the given sibling.
    After(TaskId),
}

/// Errors raised while resolving a [`Position`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum OrderingError {
    /// The sibling used for positioning is not in the target list.
    #[error("sibling {0} is not present in the target list")]
    UnknownSibling(TaskId),
}

/// Ordered, duplicate-free list of child task identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TaskId>", into = "Vec<TaskId>")]
pub struct ChildList(Vec<TaskId>);

impl ChildList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a list from stored identifiers.
    ///
    /// Repeated identifiers keep their first occurrence only.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = TaskId>) -> Self {
        let mut list = Self::new();
        for id in ids {
            if !list.contains(id) {
                list.0.push(id);
            }
        }
        list
    }

    /// Returns the number of children.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the list has no children.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when `id` is in the list.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.0.contains(&id)
    }

    /// Returns the slot currently holding `id`.
    #[must_use]
    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.0.iter().position(|candidate| *candidate == id)
    }

    /// Iterates over the children in display order.
    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.0.iter().copied()
    }

    /// Returns the children as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[TaskId] {
        &self.0
    }

    /// Consumes the list, returning the identifiers in display order.
    #[must_use]
    pub fn into_vec(self) -> Vec<TaskId> {
        self.0
    }

    /// Resolves `position` to a slot in the list as it currently stands.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::UnknownSibling`] when `position` refers to a
    /// sibling that is not in the list.
    pub fn resolve(&self, position: Position) -> Result<usize, OrderingError> {
        match position {
            Position::Last => Ok(self.0.len()),
            Position::Index(index) => Ok(index.min(self.0.len())),
            Position::After(sibling) => self
                .position_of(sibling)
                .map(|index| index + 1)
                .ok_or(OrderingError::UnknownSibling(sibling)),
        }
    }

    /// Inserts `child` at `index`, or appends it when `index` is `None`.
    ///
    /// A child that is already present is taken out first, so the list never
    /// holds duplicates. The index is then clamped to `[0, len]` of the
    /// remaining list and the child ends up exactly at that slot.
    ///
    /// Returns the slot the child ends up in.
    pub fn insert(&mut self, child: TaskId, index: Option<usize>) -> usize {
        self.remove(child);
        let slot = index.map_or(self.0.len(), |requested| requested.min(self.0.len()));
        self.0.insert(slot, child);
        slot
    }

    /// Removes `child`; returns `false` when it was absent.
    pub fn remove(&mut self, child: TaskId) -> bool {
        let before = self.0.len();
        self.0.retain(|id| *id != child);
        self.0.len() != before
    }

    /// Relocates an existing child to the visual slot `to_index`.
    ///
    /// `to_index` is read against the list before the child is taken out,
    /// so a child moving towards the end lands one slot lower than the raw
    /// index. Returns the final slot, or `None` (leaving the list untouched)
    /// when `child` is absent.
    pub fn move_within(&mut self, child: TaskId, to_index: usize) -> Option<usize> {
        let from = self.position_of(child)?;
        let slot = to_index.min(self.0.len());
        let target = if from < slot { slot - 1 } else { slot };
        if target != from {
            self.0.remove(from);
            self.0.insert(target, child);
        }
        Some(target)
    }

    /// Inserts `child` at a resolved [`Position`].
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::UnknownSibling`] before mutating anything
    /// when the position names an absent sibling.
    pub fn place(&mut self, child: TaskId, position: Position) -> Result<usize, OrderingError> {
        let resolved = self.resolve(position)?;
        // A sibling behind a present child shifts down once the child is out.
        let slot = match (position, self.position_of(child)) {
            (Position::After(_), Some(from)) if from < resolved => resolved - 1,
            _ => resolved,
        };
        Ok(self.insert(child, Some(slot)))
    }

    /// Relocates an existing child to a resolved [`Position`].
    ///
    /// Returns `Ok(None)` when `child` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::UnknownSibling`] before mutating anything
    /// when the position names an absent sibling.
    pub fn reposition(
        &mut self,
        child: TaskId,
        position: Position,
    ) -> Result<Option<usize>, OrderingError> {
        let slot = self.resolve(position)?;
        Ok(self.move_within(child, slot))
    }
}

impl From<Vec<TaskId>> for ChildList {
    fn from(ids: Vec<TaskId>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<ChildList> for Vec<TaskId> {
    fn from(list: ChildList) -> Self {
        list.0
    }
}

impl FromIterator<TaskId> for ChildList {
    fn from_iter<I: IntoIterator<Item = TaskId>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChildList, OrderingError, Position};
    use crate::task::domain::TaskId;
    use rstest::{fixture, rstest};

    #[fixture]
    fn ids() -> [TaskId; 4] {
        [TaskId::new(), TaskId::new(), TaskId::new(), TaskId::new()]
    }

    fn list_of(ids: &[TaskId]) -> ChildList {
        ChildList::from_ids(ids.iter().copied())
    }

    #[rstest]
    fn insert_without_index_appends(ids: [TaskId; 4]) {
        let [a, b, c, _] = ids;
        let mut list = list_of(&[a, b]);

        let slot = list.insert(c, None);

        assert_eq!(slot, 2);
        assert_eq!(list.as_slice(), &[a, b, c]);
    }

    #[rstest]
    fn insert_places_child_at_every_valid_index(ids: [TaskId; 4]) {
        let [a, b, c, new_child] = ids;
        for index in 0..=3 {
            let mut list = list_of(&[a, b, c]);
            list.insert(new_child, Some(index));

            assert_eq!(list.position_of(new_child), Some(index));
            let others: Vec<TaskId> = list.iter().filter(|id| *id != new_child).collect();
            assert_eq!(others, vec![a, b, c], "relative order kept for index {index}");
        }
    }

    #[rstest]
    fn insert_clamps_out_of_range_index(ids: [TaskId; 4]) {
        let [a, b, c, _] = ids;
        let mut list = list_of(&[a, b]);

        let slot = list.insert(c, Some(42));

        assert_eq!(slot, 2);
        assert_eq!(list.as_slice(), &[a, b, c]);
    }

    #[rstest]
    fn insert_of_present_child_moves_instead_of_duplicating(ids: [TaskId; 4]) {
        let [a, b, c, _] = ids;
        let mut list = list_of(&[a, b, c]);

        list.insert(c, Some(0));

        assert_eq!(list.as_slice(), &[c, a, b]);
        assert_eq!(list.len(), 3);
    }

    #[rstest]
    fn insert_of_present_child_lands_exactly_at_a_later_index(ids: [TaskId; 4]) {
        let [a, b, c, _] = ids;
        let mut list = list_of(&[a, b, c]);

        let slot = list.insert(a, Some(2));

        assert_eq!(slot, 2);
        assert_eq!(list.position_of(a), Some(2));
        assert_eq!(list.as_slice(), &[b, c, a]);
    }

    #[rstest]
    fn place_of_present_child_after_a_later_sibling(ids: [TaskId; 4]) {
        let [a, b, c, _] = ids;
        let mut list = list_of(&[a, b, c]);

        let slot = list.place(a, Position::After(b)).expect("sibling is present");

        assert_eq!(slot, 1);
        assert_eq!(list.as_slice(), &[b, a, c]);
    }

    #[rstest]
    fn remove_drops_child_and_reports_absence(ids: [TaskId; 4]) {
        let [a, b, c, _] = ids;
        let mut list = list_of(&[a, b, c]);

        assert!(list.remove(b));
        assert!(!list.remove(b));
        assert_eq!(list.as_slice(), &[a, c]);
    }

    #[rstest]
    fn move_within_towards_end_lands_on_visual_slot(ids: [TaskId; 4]) {
        let [a, b, c, d] = ids;
        let mut list = list_of(&[a, b, c, d]);

        // Slot 2 sits between `b` and `c` before `a` is taken out.
        let slot = list.move_within(a, 2);

        assert_eq!(slot, Some(1));
        assert_eq!(list.as_slice(), &[b, a, c, d]);
    }

    #[rstest]
    fn move_within_towards_start(ids: [TaskId; 4]) {
        let [a, b, c, d] = ids;
        let mut list = list_of(&[a, b, c, d]);

        list.move_within(d, 1);

        assert_eq!(list.as_slice(), &[a, d, b, c]);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn move_within_onto_itself_is_stable(ids: [TaskId; 4], #[case] to_index: usize) {
        let [a, b, c, _] = ids;
        let mut list = list_of(&[a, b, c]);

        list.move_within(a, to_index);

        assert_eq!(list.as_slice(), &[a, b, c]);
    }

    #[rstest]
    fn move_within_to_end(ids: [TaskId; 4]) {
        let [a, b, c, _] = ids;
        let mut list = list_of(&[a, b, c]);

        list.move_within(a, 3);

        assert_eq!(list.as_slice(), &[b, c, a]);
    }

    #[rstest]
    fn move_within_ignores_absent_child(ids: [TaskId; 4]) {
        let [a, b, c, d] = ids;
        let mut list = list_of(&[a, b, c]);

        assert_eq!(list.move_within(d, 0), None);
        assert_eq!(list.as_slice(), &[a, b, c]);
    }

    #[rstest]
    fn place_after_sibling(ids: [TaskId; 4]) {
        let [a, b, c, d] = ids;
        let mut list = list_of(&[a, b, c]);

        let slot = list.place(d, Position::After(a)).expect("sibling is present");

        assert_eq!(slot, 1);
        assert_eq!(list.as_slice(), &[a, d, b, c]);
    }

    #[rstest]
    fn place_after_unknown_sibling_leaves_list_untouched(ids: [TaskId; 4]) {
        let [a, b, c, d] = ids;
        let mut list = list_of(&[a, b]);

        let result = list.place(c, Position::After(d));

        assert_eq!(result, Err(OrderingError::UnknownSibling(d)));
        assert_eq!(list.as_slice(), &[a, b]);
    }

    #[rstest]
    fn reposition_after_later_sibling(ids: [TaskId; 4]) {
        let [a, b, c, d] = ids;
        let mut list = list_of(&[a, b, c, d]);

        let slot = list
            .reposition(a, Position::After(c))
            .expect("sibling is present");

        assert_eq!(slot, Some(2));
        assert_eq!(list.as_slice(), &[b, c, a, d]);
    }

    #[rstest]
    fn from_ids_drops_repeated_entries(ids: [TaskId; 4]) {
        let [a, b, _, _] = ids;
        let list = ChildList::from_ids([a, b, a, b]);

        assert_eq!(list.as_slice(), &[a, b]);
    }

    #[rstest]
    fn serde_round_trip_preserves_order(ids: [TaskId; 4]) {
        let [a, b, c, _] = ids;
        let list = list_of(&[c, a, b]);

        let json = serde_json::to_value(&list).expect("serialise list");
        let decoded: ChildList = serde_json::from_value(json).expect("deserialise list");

        assert_eq!(decoded, list);
    }
}
