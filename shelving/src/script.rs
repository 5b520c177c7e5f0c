//! Edit script assembly.
//!
//! Merges section- and item-level results. An all-empty result is never
//! handed out: callers get `None` / [`Outcome::Unchanged`] instead so they
//! can skip the batch update entirely.

use crate::items::ItemDiff;
use crate::sections::SectionDiff;
use crate::validate::DiffError;
use core::fmt;
use facet::Facet;
use std::collections::BTreeSet;

/// Coordinate of an item: section position, then position in that section's
/// primary list. Ordered section-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Facet)]
pub struct ItemPath {
    /// Section position.
    pub section: usize,
    /// Item position within the section.
    pub item: usize,
}

impl ItemPath {
    /// Build a path.
    #[inline]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl From<(usize, usize)> for ItemPath {
    fn from((section, item): (usize, usize)) -> Self {
        Self::new(section, item)
    }
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.item)
    }
}

/// The structural edits that turn OLD into NEW.
///
/// Deletes and updates are in OLD coordinates, inserts in NEW coordinates.
/// Apply as one batch, deletes and reloads before inserts; see
/// [`EditScript::batch_steps`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    /// Section positions in NEW.
    pub inserted_sections: BTreeSet<usize>,
    /// Section positions in OLD.
    pub deleted_sections: BTreeSet<usize>,
    /// Section positions in OLD.
    pub updated_sections: BTreeSet<usize>,
    /// Section position in NEW.
    pub inserted_items: BTreeSet<ItemPath>,
    /// Section position in OLD.
    pub deleted_items: BTreeSet<ItemPath>,
    /// Section position in OLD.
    pub updated_items: BTreeSet<ItemPath>,
}

impl EditScript {
    /// Merge both levels. Returns `None` when nothing changed.
    pub fn assemble(sections: SectionDiff, items: ItemDiff) -> Option<Self> {
        let script = EditScript {
            inserted_sections: sections.inserted,
            deleted_sections: sections.deleted,
            updated_sections: sections.updated,
            inserted_items: items.inserted,
            deleted_items: items.deleted,
            updated_items: items.updated,
        };
        if script.is_empty() {
            None
        } else {
            Some(script)
        }
    }

    /// Whether every set is empty. Never true for a script returned by the differ.
    pub fn is_empty(&self) -> bool {
        self.section_changes() == 0 && self.item_changes() == 0
    }

    /// Number of section coordinates across all three section sets.
    pub fn section_changes(&self) -> usize {
        self.inserted_sections.len() + self.deleted_sections.len() + self.updated_sections.len()
    }

    /// Number of item coordinates across all three item sets.
    pub fn item_changes(&self) -> usize {
        self.inserted_items.len() + self.deleted_items.len() + self.updated_items.len()
    }

    /// Total number of coordinates.
    pub fn len(&self) -> usize {
        self.section_changes() + self.item_changes()
    }
}

impl fmt::Display for EditScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn group<T: fmt::Display>(
            f: &mut fmt::Formatter<'_>,
            first: &mut bool,
            tag: &str,
            values: &BTreeSet<T>,
        ) -> fmt::Result {
            if values.is_empty() {
                return Ok(());
            }
            if !*first {
                write!(f, " ")?;
            }
            *first = false;
            write!(f, "{}{{", tag)?;
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", value)?;
            }
            write!(f, "}}")
        }

        let mut first = true;
        group(f, &mut first, "-s", &self.deleted_sections)?;
        group(f, &mut first, "~s", &self.updated_sections)?;
        group(f, &mut first, "+s", &self.inserted_sections)?;
        group(f, &mut first, "-i", &self.deleted_items)?;
        group(f, &mut first, "~i", &self.updated_items)?;
        group(f, &mut first, "+i", &self.inserted_items)?;
        if first {
            write!(f, "(empty)")?;
        }
        Ok(())
    }
}

/// Three-way diff result, keeping "nothing changed" apart from "input rejected".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The snapshots are equivalent; no batch update needed.
    Unchanged,
    /// Edits to apply.
    Edits(EditScript),
    /// One of the snapshots broke the key contract. Callers usually fall
    /// back to a full reload.
    Invalid(DiffError),
}

impl Outcome {
    /// The edit script, if any.
    pub fn edits(&self) -> Option<&EditScript> {
        match self {
            Outcome::Edits(script) => Some(script),
            _ => None,
        }
    }

    /// Whether there is nothing to do.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Outcome::Unchanged)
    }

    /// Collapse into the `try_diff` shape.
    pub fn into_result(self) -> Result<Option<EditScript>, DiffError> {
        match self {
            Outcome::Unchanged => Ok(None),
            Outcome::Edits(script) => Ok(Some(script)),
            Outcome::Invalid(err) => Err(err),
        }
    }
}

impl From<Result<Option<EditScript>, DiffError>> for Outcome {
    fn from(result: Result<Option<EditScript>, DiffError>) -> Self {
        match result {
            Ok(None) => Outcome::Unchanged,
            Ok(Some(script)) => Outcome::Edits(script),
            Err(err) => Outcome::Invalid(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{Location, Side};
    use facet_testhelpers::test;

    #[test]
    fn test_assemble_empty_is_none() {
        assert_eq!(
            EditScript::assemble(SectionDiff::default(), ItemDiff::default()),
            None
        );
    }

    #[test]
    fn test_stable_pairs_alone_are_no_change() {
        let sections = SectionDiff {
            stable: vec![(0, 0), (1, 1)],
            ..SectionDiff::default()
        };
        assert!(EditScript::assemble(sections, ItemDiff::default()).is_none());
    }

    #[test]
    fn test_assemble_keeps_every_set() {
        let sections = SectionDiff {
            inserted: [2].into(),
            deleted: [3].into(),
            updated: [1].into(),
            stable: vec![(0, 0)],
        };
        let items = ItemDiff {
            inserted: [ItemPath::new(0, 4)].into(),
            deleted: [ItemPath::new(0, 1)].into(),
            updated: [ItemPath::new(0, 0)].into(),
        };
        let script = EditScript::assemble(sections, items).unwrap();
        assert_eq!(script.section_changes(), 3);
        assert_eq!(script.item_changes(), 3);
        assert_eq!(script.len(), 6);
        assert_eq!(script.inserted_sections, BTreeSet::from([2]));
        assert_eq!(script.updated_items, BTreeSet::from([ItemPath::new(0, 0)]));
    }

    #[test]
    fn test_item_paths_order_section_major() {
        let paths: BTreeSet<ItemPath> = [(1, 0), (0, 5), (0, 2)]
            .into_iter()
            .map(ItemPath::from)
            .collect();
        let ordered: Vec<_> = paths.into_iter().collect();
        assert_eq!(
            ordered,
            vec![ItemPath::new(0, 2), ItemPath::new(0, 5), ItemPath::new(1, 0)]
        );
    }

    #[test]
    fn test_display() {
        let script = EditScript {
            deleted_sections: [0, 1].into(),
            inserted_sections: [1].into(),
            updated_items: [ItemPath::new(2, 3)].into(),
            ..EditScript::default()
        };
        assert_eq!(script.to_string(), "-s{0,1} +s{1} ~i{2.3}");
        assert_eq!(EditScript::default().to_string(), "(empty)");
    }

    #[test]
    fn test_outcome_conversions() {
        let err = DiffError::InvalidIdentity {
            side: Side::Old,
            location: Location::Section { section: 0 },
        };
        let outcome = Outcome::from(Err::<Option<EditScript>, _>(err.clone()));
        assert_eq!(outcome, Outcome::Invalid(err.clone()));
        assert_eq!(outcome.into_result(), Err(err));

        assert!(Outcome::from(Ok::<_, DiffError>(None::<EditScript>)).is_unchanged());

        let script = EditScript {
            updated_sections: [0].into(),
            ..EditScript::default()
        };
        let outcome = Outcome::from(Ok::<_, DiffError>(Some(script.clone())));
        assert_eq!(outcome.edits(), Some(&script));
    }
}
