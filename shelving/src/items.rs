//! Item-level classification inside stable sections.
//!
//! Only primary items take part; adornment changes already reloaded the
//! whole section. An item present on both sides is "updated" when its index
//! moved or its payload compares unequal. Both cases are reported as a
//! reload at the OLD coordinate.

use crate::model::{EqualityStrategy, Item, Key, Section};
use crate::script::ItemPath;
use rapidhash::RapidHashMap as HashMap;
use std::collections::BTreeSet;

/// Item edits accumulated across stable sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDiff {
    /// Section position in NEW.
    pub inserted: BTreeSet<ItemPath>,
    /// Section position in OLD.
    pub deleted: BTreeSet<ItemPath>,
    /// Section position in OLD, item position in OLD.
    pub updated: BTreeSet<ItemPath>,
}

impl ItemDiff {
    /// Whether no item-level edit was found.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty() && self.updated.is_empty()
    }
}

/// Pick the comparison for a matched pair: NEW item's, then OLD item's,
/// then the collection default.
#[inline]
fn resolve_equality<K, P>(
    old: &Item<K, P>,
    new: &Item<K, P>,
    default: EqualityStrategy<P>,
) -> EqualityStrategy<P> {
    new.equality.or(old.equality).unwrap_or(default)
}

/// Classify the primary items of one stable section pair, adding results to `out`.
pub fn diff_items<K: Key, P>(
    old: &Section<K, P>,
    new: &Section<K, P>,
    (old_section, new_section): (usize, usize),
    default_equality: EqualityStrategy<P>,
    out: &mut ItemDiff,
) {
    let old_items: Vec<&Item<K, P>> = old.primary_items().collect();
    let new_items: Vec<&Item<K, P>> = new.primary_items().collect();

    let mut old_positions: HashMap<&K, usize> = HashMap::default();
    old_positions.reserve(old_items.len());
    for (pos, item) in old_items.iter().enumerate() {
        old_positions.insert(&item.key, pos);
    }

    let mut new_positions: HashMap<&K, usize> = HashMap::default();
    new_positions.reserve(new_items.len());
    for (pos, item) in new_items.iter().enumerate() {
        new_positions.insert(&item.key, pos);
        if !old_positions.contains_key(&item.key) {
            trace!(section = new_section, item = pos, "item inserted");
            out.inserted.insert(ItemPath::new(new_section, pos));
        }
    }

    for (old_pos, old_item) in old_items.iter().enumerate() {
        let Some(&new_pos) = new_positions.get(&old_item.key) else {
            trace!(section = old_section, item = old_pos, "item deleted");
            out.deleted.insert(ItemPath::new(old_section, old_pos));
            continue;
        };

        let new_item = new_items[new_pos];
        let moved = old_pos != new_pos;
        let changed = !resolve_equality(old_item, new_item, default_equality)
            .payloads_equal(&old_item.payload, &new_item.payload);
        if moved || changed {
            trace!(
                section = old_section,
                item = old_pos,
                moved,
                changed,
                "item updated"
            );
            out.updated.insert(ItemPath::new(old_section, old_pos));
        }
    }
}
