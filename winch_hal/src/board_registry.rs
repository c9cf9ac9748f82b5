//! Name → constructor table for winch boards.
//!
//! `openwinch` builds one table at boot, looks up `[board] driver` in it and
//! hands the resulting board to the controller. Tests build their own table
//! with scripted boards.

use std::collections::HashMap;
use tracing::info;
use winch_common::config::BoardConfig;
use winch_common::hal::board::{Board, BoardError, BoardFactory};

/// Boards `openwinch` can drive, keyed by their `[board] driver` name.
pub struct BoardRegistry {
    factories: HashMap<&'static str, BoardFactory>,
}

impl BoardRegistry {
    /// Empty table, for tests that register scripted boards.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Table with the emulator and the sysfs board.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        crate::drivers::register_builtin_boards(&mut registry);
        registry
    }

    /// Add `factory` under `name`.
    ///
    /// # Panics
    /// Two boards under one name is a wiring bug, so a duplicate panics.
    pub fn register(&mut self, name: &'static str, factory: BoardFactory) {
        if self.factories.contains_key(name) {
            panic!("Board '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    /// Constructor registered under `name`.
    pub fn get_factory(&self, name: &str) -> Option<BoardFactory> {
        self.factories.get(name).copied()
    }

    /// Build the board selected by `config.driver` (surrounding blanks
    /// ignored) and log its name.
    ///
    /// # Errors
    /// `BoardError::DriverNotFound` for an unknown driver, otherwise whatever
    /// the board constructor reports (missing sysfs tree, bad pins).
    pub fn create_board(&self, config: &BoardConfig) -> Result<Box<dyn Board>, BoardError> {
        let name = config.driver.trim();
        let factory = self
            .get_factory(name)
            .ok_or_else(|| BoardError::DriverNotFound(name.to_string()))?;
        let board = factory(config)?;
        info!("Board : {}", board.name());
        Ok(board)
    }

    /// Driver names accepted by [`create_board`](Self::create_board), sorted.
    pub fn list_boards(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for BoardRegistry {
    fn default() -> Self {
        Self::new()
    }
}
