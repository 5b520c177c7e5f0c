//! Snapshot validation.
//!
//! Keys must be non-empty and unique: section keys within a snapshot, item
//! keys within a section's primary list. Adornments are not checked; only
//! their roles matter to the differ.

use crate::model::{Key, Section, Snapshot};
use core::fmt;
use facet::Facet;
use rapidhash::RapidHashSet as HashSet;

/// Which of the two snapshots a coordinate or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum Side {
    /// The previously rendered snapshot.
    Old,
    /// The freshly computed snapshot.
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => write!(f, "old"),
            Side::New => write!(f, "new"),
        }
    }
}

/// Where in a snapshot a violation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Facet)]
#[repr(u8)]
pub enum Location {
    /// A section's own key.
    Section { section: usize },
    /// An item key; `item` indexes the section's primary list.
    Item { section: usize, item: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Section { section } => write!(f, "section {}", section),
            Location::Item { section, item } => write!(f, "item {} of section {}", item, section),
        }
    }
}

/// Input-contract violations. Never transient: the caller built an
/// inconsistent snapshot.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum DiffError {
    /// empty key in {side} snapshot at {location}
    InvalidIdentity { side: Side, location: Location },

    /// duplicate key in {side} snapshot at {location}
    DuplicateIdentity { side: Side, location: Location },
}

impl DiffError {
    /// The snapshot the violation was found in.
    pub fn side(&self) -> Side {
        match self {
            DiffError::InvalidIdentity { side, .. } | DiffError::DuplicateIdentity { side, .. } => {
                *side
            }
        }
    }

    /// Where the violation was found.
    pub fn location(&self) -> Location {
        match self {
            DiffError::InvalidIdentity { location, .. }
            | DiffError::DuplicateIdentity { location, .. } => *location,
        }
    }
}

/// Check both snapshots, OLD first. Stops at the first violation.
pub fn validate<K: Key, P>(old: &Snapshot<K, P>, new: &Snapshot<K, P>) -> Result<(), DiffError> {
    validate_snapshot(old, Side::Old)?;
    validate_snapshot(new, Side::New)?;
    Ok(())
}

/// Check one snapshot, section by section.
pub fn validate_snapshot<K: Key, P>(snapshot: &Snapshot<K, P>, side: Side) -> Result<(), DiffError> {
    let mut section_keys: HashSet<&K> = HashSet::default();
    for (index, section) in snapshot.sections().iter().enumerate() {
        let location = Location::Section { section: index };
        if section.key.is_empty_key() {
            return Err(DiffError::InvalidIdentity { side, location });
        }
        if !section_keys.insert(&section.key) {
            return Err(DiffError::DuplicateIdentity { side, location });
        }
        validate_items(section, index, side)?;
    }
    Ok(())
}

fn validate_items<K: Key, P>(
    section: &Section<K, P>,
    section_index: usize,
    side: Side,
) -> Result<(), DiffError> {
    let mut item_keys: HashSet<&K> = HashSet::default();
    for (index, item) in section.primary_items().enumerate() {
        let location = Location::Item {
            section: section_index,
            item: index,
        };
        if item.key.is_empty_key() {
            return Err(DiffError::InvalidIdentity { side, location });
        }
        if !item_keys.insert(&item.key) {
            return Err(DiffError::DuplicateIdentity { side, location });
        }
    }
    Ok(())
}
