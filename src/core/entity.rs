//! Board item identification.
//!
//! Every square on the board (estate, project, public square) is addressed by
//! an `ItemId`, which is its position on the track. Positions are stable once
//! an item has been added to a board, so the id doubles as the index into the
//! board's item list.
//!
//! Estates are additionally grouped into blocks, addressed by `BlockId`.
//!
//! ```
//! use richman::core::ItemId;
//!
//! let start = ItemId::new(0);
//! assert_eq!(start.index(), 0);
//! assert_eq!(format!("{}", start), "Item(0)");
//! ```

use serde::{Deserialize, Serialize};

/// Identifier (and position) of a board item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u16);

impl ItemId {
    /// Create an item ID from a board position.
    #[must_use]
    pub const fn new(position: u16) -> Self {
        Self(position)
    }

    /// Create an item ID from a `usize` board index.
    ///
    /// Panics if the index does not fit the id range.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        assert!(index <= u16::MAX as usize, "Board position {} out of range", index);
        Self(index as u16)
    }

    /// Board position of the item.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Item({})", self.0)
    }
}

/// Identifier of an estate block (a colour group).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Create a new block ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Index into the board's block list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Block({})", self.0)
    }
}
