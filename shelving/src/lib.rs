//! # Shelving
//!
//! Keyed two-level diffing for sectioned lists.
//!
//! Given an OLD and a NEW [`Snapshot`] (ordered sections of ordered items,
//! sections optionally adorned with headers, footers or custom roles), shelving
//! computes the [`EditScript`] a table/collection view needs to go from one to
//! the other in a single batch update, instead of reloading everything.
//!
//! ## Algorithm Overview
//!
//! 1. **Validation**: keys must be non-empty and unique per snapshot (sections)
//!    and per section (items). The first violation aborts the diff.
//! 2. **Section classification**: by key. A section whose position changed is
//!    deleted at its OLD position and inserted at its NEW one; there is no
//!    section move primitive. A section that kept its position but whose
//!    adornment roles changed is reloaded.
//! 3. **Item classification**: only for the remaining stable sections. Items
//!    are inserted, deleted, or updated. An item is updated when its index
//!    moved or its payload compares unequal under its [`EqualityStrategy`].
//! 4. **Assembly**: when nothing changed the result is `None`
//!    ([`Outcome::Unchanged`]), never an empty script.
//!
//! Deletes and updates are in OLD coordinates, inserts in NEW coordinates.
//!
//! ## Usage
//!
//! ```
//! use shelving::{Section, Snapshot, EqualityStrategy, DiffConfig, ItemPath};
//!
//! let old: Snapshot<&str, u32> = vec![
//!     Section::new("fruits").with_item("apple", 1).with_item("pear", 1),
//! ]
//! .into();
//! let new: Snapshot<&str, u32> = vec![
//!     Section::new("fruits").with_item("apple", 2).with_item("pear", 1),
//!     Section::new("veggies").with_item("leek", 1),
//! ]
//! .into();
//!
//! let config = DiffConfig::new(EqualityStrategy::payload_eq());
//! let script = shelving::try_diff_with_config(&old, &new, &config)
//!     .unwrap()
//!     .expect("snapshots differ");
//!
//! assert!(script.inserted_sections.contains(&1));
//! assert!(script.updated_items.contains(&ItemPath::new(0, 0)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]

#[macro_use]
mod tracing_macros;

mod batch;
/// Item-level classification
pub mod items;
/// Snapshot data model
pub mod model;
/// Section-level classification
pub mod sections;
/// Edit script assembly
pub mod script;
/// Key validation
pub mod validate;

pub use batch::BatchStep;
pub use items::{ItemDiff, diff_items};
pub use model::{EqualityStrategy, Item, Key, Role, Section, Shape, Snapshot};
pub use script::{EditScript, ItemPath, Outcome};
pub use sections::{SectionDiff, diff_sections};
pub use validate::{DiffError, Location, Side, validate};

/// Per-call configuration for the differ.
#[derive(Debug, Clone, Copy)]
pub struct DiffConfig<P> {
    /// Comparison used for items that carry no [`EqualityStrategy`] of their own.
    pub default_equality: EqualityStrategy<P>,
}

impl<P> DiffConfig<P> {
    /// Configuration with the given collection-wide comparison.
    pub fn new(default_equality: EqualityStrategy<P>) -> Self {
        Self { default_equality }
    }
}

impl<P> Default for DiffConfig<P> {
    fn default() -> Self {
        Self {
            default_equality: EqualityStrategy::KeyOnly,
        }
    }
}

/// Run the whole pipeline and return the three-way result.
///
/// This is the main entry point; [`diff`] and [`try_diff`] are views of it.
pub fn diff_outcome_with_config<K: Key, P>(
    old: &Snapshot<K, P>,
    new: &Snapshot<K, P>,
    config: &DiffConfig<P>,
) -> Outcome {
    debug!(
        old_sections = old.len(),
        new_sections = new.len(),
        "diff start"
    );

    if let Err(err) = validate(old, new) {
        debug!(error = %err, "validation failed");
        return Outcome::Invalid(err);
    }

    let sections = diff_sections(old, new);

    let mut items = ItemDiff::default();
    for &(old_pos, new_pos) in &sections.stable {
        diff_items(
            &old.sections()[old_pos],
            &new.sections()[new_pos],
            (old_pos, new_pos),
            config.default_equality,
            &mut items,
        );
    }

    match EditScript::assemble(sections, items) {
        Some(script) => {
            debug!(
                section_changes = script.section_changes(),
                item_changes = script.item_changes(),
                "diff done"
            );
            Outcome::Edits(script)
        }
        None => {
            debug!("diff done, unchanged");
            Outcome::Unchanged
        }
    }
}

/// [`diff_outcome_with_config`] with the default configuration.
pub fn diff_outcome<K: Key, P>(old: &Snapshot<K, P>, new: &Snapshot<K, P>) -> Outcome {
    diff_outcome_with_config(old, new, &DiffConfig::default())
}

/// Diff two snapshots, propagating validation failures.
///
/// `Ok(None)` means nothing changed.
pub fn try_diff_with_config<K: Key, P>(
    old: &Snapshot<K, P>,
    new: &Snapshot<K, P>,
    config: &DiffConfig<P>,
) -> Result<Option<EditScript>, DiffError> {
    diff_outcome_with_config(old, new, config).into_result()
}

/// [`try_diff_with_config`] with the default configuration.
pub fn try_diff<K: Key, P>(
    old: &Snapshot<K, P>,
    new: &Snapshot<K, P>,
) -> Result<Option<EditScript>, DiffError> {
    try_diff_with_config(old, new, &DiffConfig::default())
}

/// Diff two snapshots without failing.
///
/// Invalid input is logged and reported as `None`, the same as "nothing
/// changed". Use [`diff_outcome`] to tell the two apart.
pub fn diff_with_config<K: Key, P>(
    old: &Snapshot<K, P>,
    new: &Snapshot<K, P>,
    config: &DiffConfig<P>,
) -> Option<EditScript> {
    match diff_outcome_with_config(old, new, config) {
        Outcome::Unchanged => None,
        Outcome::Edits(script) => Some(script),
        Outcome::Invalid(_err) => {
            warn!(error = %_err, "invalid snapshots, reporting no change");
            None
        }
    }
}

/// [`diff_with_config`] with the default configuration.
pub fn diff<K: Key, P>(old: &Snapshot<K, P>, new: &Snapshot<K, P>) -> Option<EditScript> {
    diff_with_config(old, new, &DiffConfig::default())
}
