//! The external item container backing a player shop.
//!
//! The engine only ever reads the full contents and writes a full
//! replacement. [`ItemContainer::write_contents`] must be atomic: either the
//! new contents are stored completely or the call fails and the old contents
//! stay in place.

use std::cell::Cell;

use merchant_types::ItemStack;

use crate::error::StorageError;
use crate::inventory;

/// Shopkeeper-owned storage consumed by the exchange engine.
pub trait ItemContainer {
    /// Snapshot of every slot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unreachable`] if the container cannot be read.
    fn read_contents(&self) -> Result<Vec<Option<ItemStack>>, StorageError>;

    /// Replace every slot with `contents`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write was rejected; the previous
    /// contents are then unchanged.
    fn write_contents(&mut self, contents: Vec<Option<ItemStack>>) -> Result<(), StorageError>;

    /// Add `stack`, returning the amount that did not fit.
    ///
    /// # Errors
    ///
    /// Propagates read and write failures.
    fn add_items(&mut self, stack: &ItemStack) -> Result<u32, StorageError> {
        let mut contents = self.read_contents()?;
        let leftover = inventory::add_items(&mut contents, stack);
        if leftover < stack.amount {
            self.write_contents(contents)?;
        }
        Ok(leftover)
    }

    /// Remove up to `count` items matching `predicate`, returning how many
    /// were removed.
    ///
    /// # Errors
    ///
    /// Propagates read and write failures.
    fn remove_items(
        &mut self,
        predicate: &dyn Fn(&ItemStack) -> bool,
        count: u32,
    ) -> Result<u32, StorageError> {
        let mut contents = self.read_contents()?;
        let shortfall = inventory::remove_items(&mut contents, predicate, count);
        let removed = count.saturating_sub(shortfall);
        if removed > 0 {
            self.write_contents(contents)?;
        }
        Ok(removed)
    }
}

/// An in-memory container, used by the replay binary and by tests.
///
/// Counts reads and writes and can be told to fail, which lets callers
/// observe exactly when storage is touched.
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    contents: Vec<Option<ItemStack>>,
    reads: Cell<u32>,
    writes: u32,
    reject_writes: bool,
    unreachable: bool,
}

impl MemoryContainer {
    /// A container with `slots` empty slots.
    pub fn new(slots: usize) -> Self {
        Self::with_contents(vec![None; slots])
    }

    /// A container holding `contents`.
    pub fn with_contents(contents: Vec<Option<ItemStack>>) -> Self {
        Self {
            contents,
            ..Self::default()
        }
    }

    /// Current contents.
    pub fn contents(&self) -> &[Option<ItemStack>] {
        &self.contents
    }

    /// Make every following write fail.
    pub const fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    /// Make every following read and write fail as unreachable.
    pub const fn set_unreachable(&mut self, unreachable: bool) {
        self.unreachable = unreachable;
    }

    /// Number of reads so far.
    pub fn read_count(&self) -> u32 {
        self.reads.get()
    }

    /// Number of successful writes so far.
    pub const fn write_count(&self) -> u32 {
        self.writes
    }
}

impl ItemContainer for MemoryContainer {
    fn read_contents(&self) -> Result<Vec<Option<ItemStack>>, StorageError> {
        self.reads.set(self.reads.get().saturating_add(1));
        if self.unreachable {
            return Err(StorageError::Unreachable {
                reason: String::from("container is unloaded"),
            });
        }
        Ok(self.contents.clone())
    }

    fn write_contents(&mut self, contents: Vec<Option<ItemStack>>) -> Result<(), StorageError> {
        if self.unreachable {
            return Err(StorageError::Unreachable {
                reason: String::from("container is unloaded"),
            });
        }
        if self.reject_writes {
            return Err(StorageError::WriteRejected {
                reason: String::from("container is locked"),
            });
        }
        self.contents = contents;
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_through_the_trait() {
        let mut container = MemoryContainer::new(2);
        assert_eq!(container.add_items(&ItemStack::new("emerald", 70)), Ok(0));
        assert_eq!(container.write_count(), 1);

        let removed = container.remove_items(&|s: &ItemStack| s.item_type == "emerald", 80);
        assert_eq!(removed, Ok(70));
        assert!(container.contents().iter().all(Option::is_none));
    }

    #[test]
    fn nothing_added_means_no_write() {
        let mut container = MemoryContainer::with_contents(vec![Some(ItemStack::new("dirt", 64))]);
        assert_eq!(container.add_items(&ItemStack::new("emerald", 3)), Ok(3));
        assert_eq!(container.write_count(), 0);
        assert_eq!(container.read_count(), 1);
    }

    #[test]
    fn rejected_write_keeps_contents() {
        let mut container = MemoryContainer::new(1);
        container.set_reject_writes(true);
        let result = container.write_contents(vec![Some(ItemStack::new("emerald", 1))]);
        assert!(matches!(result, Err(StorageError::WriteRejected { .. })));
        assert!(container.contents().iter().all(Option::is_none));
    }

    #[test]
    fn unreachable_container_fails_reads() {
        let mut container = MemoryContainer::new(1);
        container.set_unreachable(true);
        assert!(matches!(
            container.read_contents(),
            Err(StorageError::Unreachable { .. })
        ));
    }
}
