//! Section-level classification.
//!
//! Sections are matched by key. A matched section that changed position is
//! never reported as a move: it is deleted at its OLD position and inserted
//! at its NEW one. A matched section that kept its position is reloaded when
//! its adornment shape changed, and is otherwise stable and handed to the
//! item differ.

use crate::model::{Key, Snapshot};
use rapidhash::RapidHashMap as HashMap;
use std::collections::BTreeSet;

/// Result of classifying sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionDiff {
    /// Positions in NEW.
    pub inserted: BTreeSet<usize>,
    /// Positions in OLD.
    pub deleted: BTreeSet<usize>,
    /// Positions in OLD (equal to the NEW position by construction).
    pub updated: BTreeSet<usize>,
    /// `(old_pos, new_pos)` pairs eligible for item diffing, in OLD order.
    pub stable: Vec<(usize, usize)>,
}

impl SectionDiff {
    /// Whether no section-level edit was found. Stable pairs don't count.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty() && self.updated.is_empty()
    }
}

/// Position of every section key in a snapshot.
fn index_keys<K: Key, P>(snapshot: &Snapshot<K, P>) -> HashMap<&K, usize> {
    let mut positions = HashMap::default();
    positions.reserve(snapshot.len());
    for (pos, section) in snapshot.sections().iter().enumerate() {
        positions.insert(&section.key, pos);
    }
    positions
}

/// Classify sections of two validated snapshots.
pub fn diff_sections<K: Key, P>(old: &Snapshot<K, P>, new: &Snapshot<K, P>) -> SectionDiff {
    let old_positions = index_keys(old);
    let mut result = SectionDiff::default();

    for (new_pos, section) in new.sections().iter().enumerate() {
        if !old_positions.contains_key(&section.key) {
            trace!(new_pos, "section inserted");
            result.inserted.insert(new_pos);
        }
    }

    let new_positions = index_keys(new);
    for (old_pos, old_section) in old.sections().iter().enumerate() {
        let Some(&new_pos) = new_positions.get(&old_section.key) else {
            trace!(old_pos, "section deleted");
            result.deleted.insert(old_pos);
            continue;
        };

        if old_pos != new_pos {
            trace!(old_pos, new_pos, "section moved, expressed as delete + insert");
            result.deleted.insert(old_pos);
            result.inserted.insert(new_pos);
            continue;
        }

        let new_section = &new.sections()[new_pos];
        if old_section.shape() != new_section.shape() {
            trace!(old_pos, "section shape changed");
            result.updated.insert(old_pos);
        } else {
            result.stable.push((old_pos, new_pos));
        }
    }

    debug!(
        inserted = result.inserted.len(),
        deleted = result.deleted.len(),
        updated = result.updated.len(),
        stable = result.stable.len(),
        "diff_sections done"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, Section};
    use facet_testhelpers::test;

    type S = Section<&'static str, u32>;

    fn keyed(keys: &[&'static str]) -> Snapshot<&'static str, u32> {
        keys.iter().copied().map(S::new).collect()
    }

    fn set(values: &[usize]) -> BTreeSet<usize> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_identical_sections_are_stable() {
        let old = keyed(&["a", "b", "c"]);
        let diff = diff_sections(&old, &old);
        assert!(diff.is_empty());
        assert_eq!(diff.stable, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_appended_section() {
        let diff = diff_sections(&keyed(&["a"]), &keyed(&["a", "b"]));
        assert_eq!(diff.inserted, set(&[1]));
        assert!(diff.deleted.is_empty());
        assert!(diff.updated.is_empty());
        assert_eq!(diff.stable, vec![(0, 0)]);
    }

    #[test]
    fn test_removed_tail_section() {
        let diff = diff_sections(&keyed(&["a", "b"]), &keyed(&["a"]));
        assert_eq!(diff.deleted, set(&[1]));
        assert!(diff.inserted.is_empty());
        assert_eq!(diff.stable, vec![(0, 0)]);
    }

    #[test]
    fn test_swap_is_delete_plus_insert() {
        let diff = diff_sections(&keyed(&["a", "b"]), &keyed(&["b", "a"]));
        assert_eq!(diff.deleted, set(&[0, 1]));
        assert_eq!(diff.inserted, set(&[0, 1]));
        assert!(diff.updated.is_empty());
        assert!(diff.stable.is_empty());
    }

    #[test]
    fn test_prepend_shifts_every_matched_section() {
        let diff = diff_sections(&keyed(&["a", "b"]), &keyed(&["z", "a", "b"]));
        assert_eq!(diff.inserted, set(&[0, 1, 2]));
        assert_eq!(diff.deleted, set(&[0, 1]));
        assert!(diff.stable.is_empty());
    }

    #[test]
    fn test_replaced_section_at_same_position() {
        let diff = diff_sections(&keyed(&["a", "b"]), &keyed(&["a", "c"]));
        assert_eq!(diff.inserted, set(&[1]));
        assert_eq!(diff.deleted, set(&[1]));
        assert_eq!(diff.stable, vec![(0, 0)]);
    }

    #[test]
    fn test_shape_change_reloads_section() {
        let old: Snapshot<&str, u32> = vec![
            S::new("a")
                .with_supplementary(Role::Header, "h", 0)
                .with_supplementary(Role::Footer, "f", 0),
            S::new("b").with_supplementary(Role::Header, "h", 0),
        ]
        .into();
        let new: Snapshot<&str, u32> = vec![
            S::new("a").with_supplementary(Role::Header, "h", 0),
            S::new("b").with_supplementary(Role::Header, "other-key", 9),
        ]
        .into();

        let diff = diff_sections(&old, &new);
        assert_eq!(diff.updated, set(&[0]));
        assert_eq!(diff.stable, vec![(1, 1)]);
    }

    #[test]
    fn test_reordered_adornments_change_shape() {
        let old: Snapshot<&str, u32> = vec![
            S::new("a")
                .with_supplementary(Role::Header, "h", 0)
                .with_supplementary(Role::Footer, "f", 0),
        ]
        .into();
        let new: Snapshot<&str, u32> = vec![
            S::new("a")
                .with_supplementary(Role::Footer, "f", 0)
                .with_supplementary(Role::Header, "h", 0),
        ]
        .into();

        assert_eq!(diff_sections(&old, &new).updated, set(&[0]));
    }

    #[test]
    fn test_custom_roles_compare_by_name() {
        let old: Snapshot<&str, u32> =
            vec![S::new("a").with_supplementary(Role::custom("badge"), "x", 0)].into();
        let same: Snapshot<&str, u32> =
            vec![S::new("a").with_supplementary(Role::custom("badge"), "y", 1)].into();
        let renamed: Snapshot<&str, u32> =
            vec![S::new("a").with_supplementary(Role::custom("ribbon"), "x", 0)].into();

        assert!(diff_sections(&old, &same).is_empty());
        assert_eq!(diff_sections(&old, &renamed).updated, set(&[0]));
    }
}
