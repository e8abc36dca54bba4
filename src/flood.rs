use alloc::collections::VecDeque;

use crate::{Board, CellCount, Coord2};

/// Reveals `start` and, when it has no adjacent mines, its entire
/// connected zero-adjacency region plus the bordering cells, using an
/// explicit frontier rather than recursion. Flagged cells act as
/// barriers and are never auto-revealed. Returns the number of cells
/// newly revealed.
///
/// The caller guarantees `start` is in bounds, not a mine, not revealed,
/// and not flagged.
pub fn flood_reveal(board: &mut Board, start: Coord2) -> CellCount {
    let mut revealed = 0;
    let mut frontier = VecDeque::from([start]);

    while let Some(coords) = frontier.pop_front() {
        let cell = board[coords];
        if cell.is_revealed || cell.is_flagged || cell.is_mine {
            continue;
        }

        board[coords].is_revealed = true;
        revealed += 1;
        log::trace!(
            "revealed {:?}, {} adjacent mines",
            coords,
            cell.adjacent_mines
        );

        if cell.adjacent_mines == 0 {
            frontier.extend(
                board
                    .neighbors(coords)
                    .filter(|&pos| board[pos].can_reveal()),
            );
        }
    }

    revealed
}
