use alloc::vec::Vec;
use rand::Rng;
use rand::RngExt;

use crate::{Board, CellCount, Coord2, adjacency};

/// Turns `mine_count` cells of `board` into mines, never `safe`.
///
/// Collects every coordinate except `safe` and applies an in-place
/// Fisher-Yates shuffle driven by `rng`, then takes the leading
/// coordinates of the permutation, so every placement excluding `safe`
/// is equally likely. The request is clamped to the number of available
/// cells. Returns how many mines were actually placed.
pub fn place_mines<R: Rng + ?Sized>(
    board: &mut Board,
    mine_count: CellCount,
    safe: Coord2,
    rng: &mut R,
) -> CellCount {
    let mut candidates: Vec<Coord2> = board
        .iter()
        .map(|cell| cell.coords())
        .filter(|&coords| coords != safe)
        .collect();

    for i in (1..candidates.len()).rev() {
        let j = rng.random_range(0..=i);
        candidates.swap(i, j);
    }

    let placed = usize::from(mine_count).min(candidates.len());
    if placed < usize::from(mine_count) {
        log::warn!(
            "requested {} mines but only {} cells are available, clamping",
            mine_count,
            placed
        );
    }
    for &coords in &candidates[..placed] {
        board[coords].is_mine = true;
    }
    log::debug!("placed {} mines, keeping {:?} clear", placed, safe);

    placed.try_into().unwrap()
}

/// Recomputes `adjacent_mines` for every cell from the current mine
/// layout. Must run after placement, before any reveal inspects the
/// counts.
pub fn calculate_adjacency(board: &mut Board) {
    let size = board.size();
    for row in 0..size.0 {
        for col in 0..size.1 {
            let count = adjacency::neighbors(size, (row, col))
                .filter(|&pos| board[pos].is_mine)
                .count()
                .try_into()
                .unwrap();
            board[(row, col)].adjacent_mines = count;
        }
    }
}
