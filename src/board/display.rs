//! Tables for the display sink.
//!
//! The engine never prints. It publishes `RenderTable` events and whoever
//! subscribes (the CLI logs them) decides how to show them.

use crate::core::{ItemId, PlayerId};
use crate::events::GameEvent;

use super::Board;

const PLAYER_HEADER: [&str; 7] = ["Player", "Cash", "Assets", "Square", "Estates", "Projects", "Status"];

fn player_row(board: &Board, id: PlayerId) -> Vec<String> {
    let player = board.player(id);
    let estates: Vec<String> = player
        .estates()
        .iter()
        .map(|&estate| {
            let estate = board.estate(estate);
            if estate.is_pledged() {
                format!("{}(L{}, pledged)", estate.name(), estate.level())
            } else {
                format!("{}(L{})", estate.name(), estate.level())
            }
        })
        .collect();
    let projects: Vec<&str> = player
        .projects()
        .iter()
        .map(|&project| board.project(project).name())
        .collect();
    let status = if player.is_bankrupt() {
        "bankrupt"
    } else if player.delayed_moves().is_empty() {
        "playing"
    } else {
        "jump queued"
    };

    vec![
        player.name().to_owned(),
        player.money().to_string(),
        board.total_assets(id).to_string(),
        board.item(ItemId::from_index(player.position())).name().to_owned(),
        estates.join(", "),
        projects.join(", "),
        status.to_owned(),
    ]
}

fn header() -> Vec<String> {
    PLAYER_HEADER.iter().map(|column| (*column).to_owned()).collect()
}

/// Publish the table of players still in the game.
pub(crate) fn render_players(board: &mut Board) {
    let rows = board
        .players_in_game()
        .iter()
        .map(|&id| player_row(board, id))
        .collect();
    let title = format!("{}: round {}", board.name(), board.round());
    board.publish(GameEvent::RenderTable { title, header: header(), rows });
}

/// Publish every registered player, richest first.
pub(crate) fn render_standings(board: &mut Board) {
    let mut ids: Vec<PlayerId> = board.players().map(|player| player.id()).collect();
    ids.sort_by_key(|&id| std::cmp::Reverse(board.total_assets(id)));
    let rows = ids.into_iter().map(|id| player_row(board, id)).collect();
    let title = format!("{}: final standings after {} rounds", board.name(), board.round());
    board.publish(GameEvent::RenderTable { title, header: header(), rows });
}

/// Lay a table out as aligned text.
#[must_use]
pub fn format_table(title: &str, header: &[String], rows: &[Vec<String>]) -> String {
    let columns = header.len().max(rows.iter().map(Vec::len).max().unwrap_or(0));
    let mut widths = vec![0; columns];
    for row in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let cell = cells.get(i).map_or("", String::as_str);
                format!("{:<width$}", cell, width = width)
            })
            .collect();
        padded.join(" | ").trim_end().to_owned()
    };

    let rule_len = widths.iter().sum::<usize>() + 3 * columns.saturating_sub(1);
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&line(header));
    out.push('\n');
    out.push_str(&"-".repeat(rule_len));
    for row in rows {
        out.push('\n');
        out.push_str(&line(row));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_owned()).collect()
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let header = strings(&["Name", "Cash"]);
        let rows = vec![strings(&["Alice", "100"]), strings(&["Bo", "20000"])];
        let table = format_table("Round 1", &header, &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Round 1");
        assert_eq!(lines[1], "Name  | Cash");
        assert_eq!(lines[2], "-------------");
        assert_eq!(lines[3], "Alice | 100");
        assert_eq!(lines[4], "Bo    | 20000");
    }

    #[test]
    fn test_format_table_ragged_rows() {
        let header = strings(&["A"]);
        let rows = vec![strings(&["x", "extra"])];
        let table = format_table("T", &header, &rows);
        assert!(table.ends_with("x | extra"));
    }
}
