//! Snapshot data model: keys, roles, items, sections and equality strategies.
//!
//! Everything here is plain caller-owned data. The differ only ever borrows a
//! [`Snapshot`]; it never mutates one.

use core::fmt;
use core::hash::Hash;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// Identity of a section or item, unique within one snapshot.
///
/// An "empty" key is never valid; snapshots containing one are rejected by
/// [`validate`](crate::validate()).
pub trait Key: Eq + Hash + fmt::Debug {
    /// Whether this key is the empty/null identity.
    fn is_empty_key(&self) -> bool;
}

impl Key for String {
    fn is_empty_key(&self) -> bool {
        self.is_empty()
    }
}

impl Key for str {
    fn is_empty_key(&self) -> bool {
        self.is_empty()
    }
}

impl<K: Key + ?Sized> Key for &K {
    fn is_empty_key(&self) -> bool {
        (**self).is_empty_key()
    }
}

impl<K: Key + ?Sized> Key for Box<K> {
    fn is_empty_key(&self) -> bool {
        (**self).is_empty_key()
    }
}

impl<K: Key + ?Sized> Key for Rc<K> {
    fn is_empty_key(&self) -> bool {
        (**self).is_empty_key()
    }
}

impl<K: Key + ?Sized> Key for Arc<K> {
    fn is_empty_key(&self) -> bool {
        (**self).is_empty_key()
    }
}

impl Key for Cow<'_, str> {
    fn is_empty_key(&self) -> bool {
        self.is_empty()
    }
}

impl<K: Key> Key for Option<K> {
    fn is_empty_key(&self) -> bool {
        self.as_ref().is_none_or(Key::is_empty_key)
    }
}

macro_rules! never_empty_keys {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Key for $ty {
                #[inline]
                fn is_empty_key(&self) -> bool {
                    false
                }
            }
        )*
    };
}

never_empty_keys!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char
);

/// What an item is within its section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// An ordinary row/cell.
    Primary,
    /// Section header adornment.
    Header,
    /// Section footer adornment.
    Footer,
    /// Any other named adornment.
    Custom(Cow<'static, str>),
}

impl Role {
    /// A named custom adornment role.
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        Role::Custom(name.into())
    }

    /// Whether this is an ordinary item rather than an adornment.
    #[inline]
    pub fn is_primary(&self) -> bool {
        matches!(self, Role::Primary)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Primary => write!(f, "primary"),
            Role::Header => write!(f, "header"),
            Role::Footer => write!(f, "footer"),
            Role::Custom(name) => write!(f, "custom:{}", name),
        }
    }
}

/// How two payloads sharing a key are compared for change detection.
pub enum EqualityStrategy<P> {
    /// Same key means unchanged; payloads are never looked at.
    KeyOnly,
    /// Payloads are equal when the predicate returns `true`.
    Predicate(fn(&P, &P) -> bool),
}

fn payload_partial_eq<P: PartialEq>(a: &P, b: &P) -> bool {
    a == b
}

impl<P> EqualityStrategy<P> {
    /// Compare with a plain function.
    pub fn predicate(f: fn(&P, &P) -> bool) -> Self {
        EqualityStrategy::Predicate(f)
    }

    /// Whether `old` and `new` count as the same content.
    #[inline]
    pub fn payloads_equal(&self, old: &P, new: &P) -> bool {
        match self {
            EqualityStrategy::KeyOnly => true,
            EqualityStrategy::Predicate(f) => f(old, new),
        }
    }
}

impl<P: PartialEq> EqualityStrategy<P> {
    /// Compare payloads with their `PartialEq` impl.
    pub fn payload_eq() -> Self {
        EqualityStrategy::Predicate(payload_partial_eq::<P>)
    }
}

impl<P> Clone for EqualityStrategy<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for EqualityStrategy<P> {}

impl<P> Default for EqualityStrategy<P> {
    fn default() -> Self {
        EqualityStrategy::KeyOnly
    }
}

impl<P> fmt::Debug for EqualityStrategy<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EqualityStrategy::KeyOnly => write!(f, "KeyOnly"),
            EqualityStrategy::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// A row or adornment inside a section.
#[derive(Debug, Clone)]
pub struct Item<K, P> {
    /// Identity within the section.
    pub key: K,
    /// Primary item or adornment role.
    pub role: Role,
    /// Content compared for change detection.
    pub payload: P,
    /// Per-item comparison; falls back to [`DiffConfig::default_equality`](crate::DiffConfig).
    pub equality: Option<EqualityStrategy<P>>,
}

impl<K, P> Item<K, P> {
    /// A primary item.
    pub fn new(key: K, payload: P) -> Self {
        Self {
            key,
            role: Role::Primary,
            payload,
            equality: None,
        }
    }

    /// An adornment with the given role.
    pub fn supplementary(role: Role, key: K, payload: P) -> Self {
        Self {
            key,
            role,
            payload,
            equality: None,
        }
    }

    /// Attach a comparison strategy to this item.
    pub fn with_equality(mut self, equality: EqualityStrategy<P>) -> Self {
        self.equality = Some(equality);
        self
    }
}

/// The ordered roles of a section's adornments.
pub type Shape<'a> = SmallVec<[&'a Role; 2]>;

/// A keyed group of items, optionally adorned by headers, footers and the like.
#[derive(Debug, Clone)]
pub struct Section<K, P> {
    /// Identity within the snapshot.
    pub key: K,
    /// Ordered items. Entries whose role is not [`Role::Primary`] are
    /// skipped by validation and item diffing.
    pub items: Vec<Item<K, P>>,
    /// Ordered adornments, at most one per role.
    pub supplementaries: Vec<Item<K, P>>,
}

impl<K, P> Section<K, P> {
    /// An empty section.
    pub fn new(key: K) -> Self {
        Self {
            key,
            items: Vec::new(),
            supplementaries: Vec::new(),
        }
    }

    /// Append an item, routing adornments to `supplementaries`.
    pub fn push(&mut self, item: Item<K, P>) {
        if item.role.is_primary() {
            self.items.push(item);
        } else {
            self.supplementaries.push(item);
        }
    }

    /// Builder form of [`Section::push`].
    pub fn with(mut self, item: Item<K, P>) -> Self {
        self.push(item);
        self
    }

    /// Builder shortcut for a primary item.
    pub fn with_item(self, key: K, payload: P) -> Self {
        self.with(Item::new(key, payload))
    }

    /// Builder shortcut for an adornment.
    pub fn with_supplementary(self, role: Role, key: K, payload: P) -> Self {
        self.with(Item::supplementary(role, key, payload))
    }

    /// Items taking part in item-level diffing, in order.
    pub fn primary_items(&self) -> impl Iterator<Item = &Item<K, P>> + '_ {
        self.items.iter().filter(|item| item.role.is_primary())
    }

    /// Ordered roles of the adornments.
    pub fn shape(&self) -> Shape<'_> {
        self.supplementaries.iter().map(|item| &item.role).collect()
    }
}

/// One complete, immutable state of a sectioned collection.
#[derive(Debug, Clone)]
pub struct Snapshot<K, P> {
    sections: Vec<Section<K, P>>,
}

impl<K, P> Snapshot<K, P> {
    /// Wrap an ordered list of sections.
    pub fn new(sections: Vec<Section<K, P>>) -> Self {
        Self { sections }
    }

    /// A snapshot with no sections.
    pub fn empty() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Sections in order.
    pub fn sections(&self) -> &[Section<K, P>] {
        &self.sections
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section at `index`.
    pub fn get(&self, index: usize) -> Option<&Section<K, P>> {
        self.sections.get(index)
    }

    /// Give the sections back.
    pub fn into_sections(self) -> Vec<Section<K, P>> {
        self.sections
    }
}

impl<K, P> Default for Snapshot<K, P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K, P> From<Vec<Section<K, P>>> for Snapshot<K, P> {
    fn from(sections: Vec<Section<K, P>>) -> Self {
        Self::new(sections)
    }
}

impl<K, P> FromIterator<Section<K, P>> for Snapshot<K, P> {
    fn from_iter<I: IntoIterator<Item = Section<K, P>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
