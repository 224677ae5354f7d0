//! Item stacks and their metadata.
//!
//! An [`ItemStack`] is an immutable value: an item type, auxiliary metadata,
//! and a quantity. Quantity changes always produce a new stack. Two stacks
//! are *similar* when type and metadata are equal, regardless of quantity.
//! A stack with amount zero is treated as empty everywhere.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ItemComparison;

/// Default maximum stack size for item types that do not declare one.
pub const DEFAULT_MAX_STACK_SIZE: u32 = 64;

/// Generation of a written book.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum BookGeneration {
    /// The signed original.
    #[default]
    Original,
    /// A copy of the original.
    CopyOfOriginal,
    /// A copy of a copy.
    CopyOfCopy,
    /// A worn copy that can no longer be copied.
    Tattered,
}

impl BookGeneration {
    /// Whether a book of this generation is a copy.
    pub const fn is_copy(self) -> bool {
        !matches!(self, Self::Original)
    }
}

/// Written book data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BookMeta {
    /// Book title, absent for unsigned books.
    #[serde(default)]
    pub title: Option<String>,
    /// Book author.
    #[serde(default)]
    pub author: Option<String>,
    /// Copy generation.
    #[serde(default)]
    pub generation: BookGeneration,
}

/// Auxiliary descriptive metadata of an item stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ItemMeta {
    /// Custom display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Lore lines shown under the name.
    #[serde(default)]
    pub lore: Vec<String>,
    /// Enchantment id to level.
    #[serde(default)]
    pub enchantments: BTreeMap<String, u32>,
    /// Written book data.
    #[serde(default)]
    pub book: Option<BookMeta>,
    /// Free-form tags, for example plugin markers.
    #[serde(default)]
    pub custom: BTreeMap<String, String>,
}

impl ItemMeta {
    /// Whether `self` (offered) carries every core component `required`
    /// declares.
    ///
    /// Core components are the display name, enchantments, and the book
    /// title and generation. Lore, custom tags and the book author are not
    /// core and are ignored.
    pub fn covers(&self, required: &Self) -> bool {
        let name_ok = required.display_name.is_none() || self.display_name == required.display_name;
        let enchantments_ok = required
            .enchantments
            .iter()
            .all(|(id, level)| self.enchantments.get(id) == Some(level));
        let book_ok = match (&required.book, &self.book) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(want), Some(have)) => {
                (want.title.is_none() || want.title == have.title)
                    && want.generation == have.generation
            }
        };
        name_ok && enchantments_ok && book_ok
    }
}

/// An item type, its metadata, and a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ItemStack {
    /// Item type identifier, for example `emerald`.
    pub item_type: String,
    /// Auxiliary metadata.
    #[serde(default)]
    pub meta: ItemMeta,
    /// Number of items in the stack.
    pub amount: u32,
    /// Largest amount a single slot can hold for this item type.
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: u32,
}

const fn default_max_stack_size() -> u32 {
    DEFAULT_MAX_STACK_SIZE
}

impl ItemStack {
    /// Create a stack without metadata.
    pub fn new(item_type: impl Into<String>, amount: u32) -> Self {
        Self {
            item_type: item_type.into(),
            meta: ItemMeta::default(),
            amount,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
        }
    }

    /// Replace the metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: ItemMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Replace the maximum stack size.
    #[must_use]
    pub const fn with_max_stack_size(mut self, max_stack_size: u32) -> Self {
        self.max_stack_size = max_stack_size;
        self
    }

    /// A copy of this stack holding `amount` items.
    #[must_use]
    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }

    /// Whether the stack holds no items.
    pub const fn is_empty(&self) -> bool {
        self.amount == 0
    }

    /// Whether type and metadata are equal, ignoring quantity.
    pub fn is_similar(&self, other: &Self) -> bool {
        self.item_type == other.item_type && self.meta == other.meta
    }

    /// Whether `self` (offered) satisfies the identity of `required`.
    ///
    /// Quantity is not considered.
    pub fn satisfies(&self, required: &Self, comparison: ItemComparison) -> bool {
        match comparison {
            ItemComparison::Strict => self.is_similar(required),
            ItemComparison::Lenient => {
                self.item_type == required.item_type && self.meta.covers(&required.meta)
            }
        }
    }

    /// The stack left after removing `amount` items, or `None` if nothing
    /// remains.
    pub fn decreased_by(&self, amount: u32) -> Option<Self> {
        let remaining = self.amount.saturating_sub(amount);
        if remaining == 0 {
            None
        } else {
            Some(self.with_amount(remaining))
        }
    }

    /// How many more items of this stack's kind fit on top of it.
    pub const fn free_space(&self) -> u32 {
        self.max_stack_size.saturating_sub(self.amount)
    }
}

/// The amount of an optional stack, zero when absent.
pub fn stack_amount(stack: Option<&ItemStack>) -> u32 {
    stack.map_or(0, |s| s.amount)
}

/// Normalize an optional stack: empty stacks become `None`.
pub fn non_empty(stack: Option<ItemStack>) -> Option<ItemStack> {
    stack.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(item_type: &str, name: &str, amount: u32) -> ItemStack {
        ItemStack::new(item_type, amount).with_meta(ItemMeta {
            display_name: Some(name.to_owned()),
            ..ItemMeta::default()
        })
    }

    #[test]
    fn similarity_ignores_amount() {
        assert!(ItemStack::new("emerald", 3).is_similar(&ItemStack::new("emerald", 40)));
        assert!(!ItemStack::new("emerald", 3).is_similar(&ItemStack::new("diamond", 3)));
    }

    #[test]
    fn strict_requires_equal_metadata() {
        let required = named("sword", "Excalibur", 1);
        let mut offered = named("sword", "Excalibur", 1);
        offered.meta.lore.push("Slightly used".to_owned());
        assert!(!offered.satisfies(&required, ItemComparison::Strict));
        assert!(offered.satisfies(&required, ItemComparison::Lenient));
    }

    #[test]
    fn lenient_requires_declared_core_components() {
        let required = named("sword", "Excalibur", 1);
        let plain = ItemStack::new("sword", 1);
        assert!(!plain.satisfies(&required, ItemComparison::Lenient));
        // A plain requirement accepts a renamed offer.
        assert!(required.satisfies(&plain, ItemComparison::Lenient));
    }

    #[test]
    fn lenient_checks_enchantment_levels() {
        let mut required = ItemStack::new("book", 1);
        required.meta.enchantments.insert("mending".to_owned(), 1);
        let mut offered = ItemStack::new("book", 1);
        offered.meta.enchantments.insert("mending".to_owned(), 2);
        assert!(!offered.satisfies(&required, ItemComparison::Lenient));
        offered.meta.enchantments.insert("mending".to_owned(), 1);
        offered.meta.enchantments.insert("unbreaking".to_owned(), 3);
        assert!(offered.satisfies(&required, ItemComparison::Lenient));
    }

    #[test]
    fn lenient_ignores_book_author() {
        let book = |author: &str| {
            ItemStack::new("written_book", 1).with_meta(ItemMeta {
                book: Some(BookMeta {
                    title: Some("Atlas".to_owned()),
                    author: Some(author.to_owned()),
                    generation: BookGeneration::CopyOfOriginal,
                }),
                ..ItemMeta::default()
            })
        };
        assert!(book("ann").satisfies(&book("bob"), ItemComparison::Lenient));
        assert!(!book("ann").satisfies(&book("bob"), ItemComparison::Strict));
    }

    #[test]
    fn decreased_by_produces_new_stack() {
        let stack = ItemStack::new("emerald", 5);
        let left = stack.decreased_by(3);
        assert_eq!(left.map(|s| s.amount), Some(2));
        assert_eq!(stack.amount, 5);
        assert_eq!(stack.decreased_by(5), None);
        assert_eq!(stack.decreased_by(9), None);
    }

    #[test]
    fn empty_stacks_normalize_to_none() {
        assert_eq!(non_empty(Some(ItemStack::new("emerald", 0))), None);
        assert_eq!(stack_amount(None), 0);
        assert_eq!(stack_amount(Some(&ItemStack::new("emerald", 7))), 7);
    }

    #[test]
    fn deserializes_with_defaults() {
        let stack: ItemStack =
            serde_json::from_str(r#"{"item_type":"emerald","amount":4}"#).unwrap_or_else(|_| {
                ItemStack::new("invalid", 0)
            });
        assert_eq!(stack.item_type, "emerald");
        assert_eq!(stack.max_stack_size, DEFAULT_MAX_STACK_SIZE);
        assert_eq!(stack.meta, ItemMeta::default());
    }
}
