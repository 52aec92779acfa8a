//! Map files.
//!
//! A map file stores the layout of a board: its name, its blocks and its
//! items in order, bincode-encoded behind a magic tag and a format version.
//! Players are not part of a map, and neither is anything they did: items
//! are stored and loaded unowned, at level 0, with an empty prison.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{GameConfig, GameError, Result};
use crate::places::{Block, Item};

use super::Board;

/// Tag at the start of every map file.
pub const MAP_MAGIC: [u8; 4] = *b"RMAP";

/// Current map file format.
pub const MAP_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct MapFile {
    magic: [u8; 4],
    version: u32,
    name: String,
    blocks: Vec<String>,
    items: Vec<Item>,
}

impl Board {
    /// Write the board layout to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = MapFile {
            magic: MAP_MAGIC,
            version: MAP_VERSION,
            name: self.name.clone(),
            blocks: self.blocks.iter().map(|block| block.name().to_owned()).collect(),
            items: self.items.iter().map(Item::layout).collect(),
        };
        let bytes = bincode::serialize(&file)?;
        fs::write(path, bytes)?;
        info!(board = %self.name, path = %path.display(), items = file.items.len(), "map saved");
        Ok(())
    }

    /// Read a layout from `path` into this board.
    ///
    /// The board must be fresh: no items and no players yet.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        assert!(
            self.items.is_empty() && self.players.is_empty(),
            "Board {} must be empty to load a map",
            self.name
        );
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let file: MapFile = bincode::deserialize(&bytes).map_err(|_| GameError::NotAMapFile {
            path: path.display().to_string(),
        })?;
        if file.magic != MAP_MAGIC {
            return Err(GameError::NotAMapFile {
                path: path.display().to_string(),
            });
        }
        if file.version != MAP_VERSION {
            return Err(GameError::VersionMismatch {
                found: file.version,
                expected: MAP_VERSION,
            });
        }

        self.name = file.name;
        self.blocks = file.blocks.into_iter().map(Block::new).collect();
        let count = file.items.len();
        self.add_items(file.items.iter().map(Item::layout));
        info!(board = %self.name, path = %path.display(), items = count, "map loaded");
        Ok(())
    }

    /// A fresh board with the layout stored at `path`.
    pub fn from_file(path: impl AsRef<Path>, config: GameConfig) -> Result<Self> {
        let mut board = Board::new(String::new(), config);
        board.load(path)?;
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BlockId, PlayerId};
    use crate::places::{Estate, Project, ProjectKind, PublicSquare};

    fn board() -> Board {
        let mut board = Board::new("Saved", GameConfig::new());
        let block = board.add_block("East");
        board.add_item(PublicSquare::start("Start"));
        board.add_item(Estate::new("A", vec![10, 20, 30, 40], 1000, 500, 200, block));
        board.add_item(Project::new("Rail", ProjectKind::Transportation, 2000, 1000));
        board.add_item(PublicSquare::prison("Prison"));
        board
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.bin");
        let original = board();
        original.save(&path).unwrap();

        let loaded = Board::from_file(&path, GameConfig::new()).unwrap();
        assert_eq!(loaded.name(), "Saved");
        assert_eq!(loaded.len(), original.len());
        assert!(loaded.items().eq(original.items()));
        assert_eq!(loaded.block(BlockId::new(0)).name(), "East");
        assert_eq!(loaded.block(BlockId::new(0)).members(), original.block(BlockId::new(0)).members());
    }

    #[test]
    fn test_saved_items_are_unowned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("owned.bin");
        let mut original = board();
        for item in original.items.iter_mut() {
            match item {
                Item::Estate(estate) => {
                    estate.buy(PlayerId::new(3));
                    estate.upgrade();
                    estate.pledge();
                }
                Item::Project(project) => project.buy(PlayerId::new(3)),
                Item::Public(square) => {
                    if let Some(record) = square.prison_record_mut() {
                        record.admit(PlayerId::new(3), 1);
                    }
                }
            }
        }
        original.save(&path).unwrap();

        let loaded = Board::from_file(&path, GameConfig::new()).unwrap();
        assert!(loaded.items().eq(board().items()));
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.bin");
        fs::write(&path, b"definitely not a map").unwrap();

        let err = Board::from_file(&path, GameConfig::new()).unwrap_err();
        assert!(matches!(err, GameError::NotAMapFile { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Board::from_file(dir.path().join("missing.bin"), GameConfig::new()).unwrap_err();
        assert!(matches!(err, GameError::Io(_)));
    }

    #[test]
    fn test_version_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.bin");
        let file = MapFile {
            magic: MAP_MAGIC,
            version: MAP_VERSION + 1,
            name: "Future".into(),
            blocks: vec![],
            items: vec![],
        };
        fs::write(&path, bincode::serialize(&file).unwrap()).unwrap();

        let err = Board::from_file(&path, GameConfig::new()).unwrap_err();
        assert!(matches!(err, GameError::VersionMismatch { found: 2, expected: 1 }));
    }

    #[test]
    #[should_panic(expected = "must be empty")]
    fn test_load_into_used_board() {
        let mut used = board();
        let _ = used.load("whatever.bin");
    }
}
