//! In-process store for tests and throwaway sessions.

use super::{Store, StoreResult};
use crate::state::StateTree;

/// Keeps the last saved tree in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<StateTree>,
    save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that loads `tree` as if it had been saved earlier.
    pub fn with_tree(tree: StateTree) -> Self {
        Self {
            saved: Some(tree),
            save_count: 0,
        }
    }

    pub fn saved(&self) -> Option<&StateTree> {
        self.saved.as_ref()
    }

    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl Store for MemoryStore {
    fn load(&mut self) -> StoreResult<StateTree> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, tree: &StateTree) -> StoreResult<()> {
        self.saved = Some(tree.clone());
        self.save_count += 1;
        Ok(())
    }
}
