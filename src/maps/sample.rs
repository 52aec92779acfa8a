//! A 29-square board with three estate blocks, every project kind and every
//! public square.

use crate::board::Board;
use crate::core::{BlockId, GameConfig};
use crate::places::{Estate, Item, Project, ProjectKind, PublicKind, PublicSquare};

/// Position of the prison on the sample board.
pub const SAMPLE_PRISON: usize = 5;

fn estate(name: &str, fees: [i64; 4], buy: i64, pledge: i64, upgrade: i64, block: BlockId) -> Item {
    Estate::new(name, fees.to_vec(), buy, pledge, upgrade, block).into()
}

fn public(name: &str, kind: PublicKind) -> Item {
    PublicSquare::new(name, kind).into()
}

fn project(name: &str, kind: ProjectKind, buy: i64, sell: i64) -> Item {
    Project::new(name, kind, buy, sell).into()
}

/// Build the sample board.
pub fn sample_board(config: GameConfig) -> Board {
    let mut board = Board::new("sample", config);
    let north = board.add_block("north");
    let west = board.add_block("west");
    let south = board.add_block("south");

    board.add_items([
        public("Start", PublicKind::Start),
        estate("Shenyang", [400, 1000, 2500, 5500], 2400, 1200, 600, north),
        estate("Tianjin", [500, 1100, 3000, 6000], 2600, 1300, 600, north),
        public("News", PublicKind::News),
        estate("Beijing", [400, 1000, 2500, 5500], 2300, 1100, 600, north),
        PublicSquare::prison("Prison").into(),
        estate("Dalian", [200, 500, 1000, 3000], 1200, 600, 300, north),
        project("Railway station", ProjectKind::Transportation, 3000, 1500),
        estate("Guiyang", [200, 400, 1000, 2500], 1000, 500, 300, west),
        estate("Changsha", [300, 600, 1500, 3500], 1500, 700, 300, west),
        public("Luck", PublicKind::Luck),
        estate("Yinchuan", [300, 700, 1500, 3500], 1800, 900, 300, west),
        project("Nuclear plant", ProjectKind::Nuclear, 3000, 1500),
        estate("Lanzhou", [400, 1000, 2500, 5500], 2400, 1200, 600, west),
        estate("Lhasa", [400, 900, 2000, 5000], 2000, 1000, 600, west),
        public("Park", PublicKind::Park),
        estate("Hangzhou", [400, 1000, 2500, 5500], 2200, 1100, 600, south),
        project("Airport", ProjectKind::Transportation, 3000, 1500),
        estate("Nanjing", [700, 1600, 4500, 9000], 3800, 1900, 900, south),
        project("Builder", ProjectKind::Builder, 2500, 1200),
        estate("Suzhou", [700, 1500, 4000, 8500], 3500, 1700, 900, south),
        PublicSquare::goto_prison("Go to prison", SAMPLE_PRISON).into(),
        estate("Xiamen", [800, 1900, 5000, 10500], 4000, 2000, 1200, south),
        project("TV station", ProjectKind::TvStation, 2000, 1000),
        estate("Taipei", [800, 1900, 5000, 10500], 4000, 2000, 1200, south),
        public("Stock", PublicKind::Stock),
        project("Sewerage", ProjectKind::Sewerage, 2500, 1200),
        public("Tax", PublicKind::Tax),
        project("Seaport", ProjectKind::Transportation, 3000, 1500),
    ]);
    board
}
