use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Overall state of one game session.
///
/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
///
/// Both end states are terminal until the next reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Indicates the game has ended and no moves are accepted anymore.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    /// Fixed status line for the player.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Playing => "Find all the safe tiles without detonating a mine.",
            Self::Won => "You cleared the minefield!",
            Self::Lost => "Boom! You hit a mine.",
        }
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Playing
    }
}

/// Owns all game state and logic for one session at a time.
///
/// Mine placement is deferred to the first reveal, which is therefore
/// always safe. Win detection compares a running counter against a
/// precomputed target and never re-scans the board.
#[derive(Clone, Debug)]
pub struct Engine {
    config: BoardConfig,
    board: Board,
    status: GameStatus,
    remaining_flags: CellCount,
    revealed_safe_count: CellCount,
    safe_target: CellCount,
    mines_placed: bool,
    triggered_mine: Option<Coord2>,
    rng: SmallRng,
}

impl Engine {
    /// Starts a game seeded from system entropy.
    pub fn new(config: impl Into<BoardConfig>) -> Self {
        let mut seed = [0u8; 8];
        getrandom::fill(&mut seed).expect("system entropy should be available");
        Self::with_seed(config, u64::from_le_bytes(seed))
    }

    /// Starts a game with a deterministic placement stream.
    pub fn with_seed(config: impl Into<BoardConfig>, seed: u64) -> Self {
        let config = config.into();
        Self {
            config,
            board: Board::new(config.size),
            status: Default::default(),
            remaining_flags: config.mines,
            revealed_safe_count: 0,
            safe_target: config.safe_cells(),
            mines_placed: false,
            triggered_mine: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Starts a game over an explicit mine layout, skipping deferred
    /// placement. The first reveal carries no safety guarantee here.
    pub fn with_mines(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut board = Board::new(size);
        for &coords in mine_coords {
            board.validate_coords(coords)?;
            board[coords].is_mine = true;
        }
        calculate_adjacency(&mut board);

        let mines = board.mine_count();
        let config = BoardConfig::new_unchecked(board.size(), mines);
        Ok(Self {
            config,
            board,
            status: Default::default(),
            remaining_flags: mines,
            revealed_safe_count: 0,
            safe_target: config.safe_cells(),
            mines_placed: true,
            triggered_mine: None,
            rng: SmallRng::seed_from_u64(0),
        })
    }

    /// Replaces the board and session state for `config`; the placement
    /// RNG stream carries over.
    pub fn reset(&mut self, config: impl Into<BoardConfig>) {
        let config = config.into();
        self.config = config;
        self.board = Board::new(config.size);
        self.status = Default::default();
        self.remaining_flags = config.mines;
        self.revealed_safe_count = 0;
        self.safe_target = config.safe_cells();
        self.mines_placed = false;
        self.triggered_mine = None;
    }

    /// Starts a new game with the current configuration.
    pub fn restart(&mut self) {
        self.reset(self.config);
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn status_message(&self) -> &'static str {
        self.status.message()
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    /// Configured mine count; before placement the board itself holds
    /// fewer (zero) mines.
    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.config.safe_cells()
    }

    pub fn remaining_flags(&self) -> CellCount {
        self.remaining_flags
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords]
    }

    /// Coordinates of the mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Reveals the cell at `coords`.
    ///
    /// Placement happens lazily on the first reveal of a game, excluding
    /// `coords`, so that reveal is always safe. Finished games and
    /// flagged or already revealed cells are left untouched.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }
        if !self.board[coords].can_reveal() {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.mines_placed {
            self.place_mines_excluding(coords);
        }

        if self.board[coords].is_mine {
            return Ok(self.trigger_mine(coords));
        }

        self.revealed_safe_count += flood_reveal(&mut self.board, coords);
        log::debug!(
            "revealed {:?}, {}/{} safe cells open",
            coords,
            self.revealed_safe_count,
            self.safe_target
        );

        if self.revealed_safe_count == self.safe_target {
            self.status = GameStatus::Won;
            self.reveal_all_mines();
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Flags or unflags the cell at `coords`.
    ///
    /// Flagging draws from the configured flag budget and is silently
    /// rejected once the budget is exhausted. Permitted before mines are
    /// placed: the budget tracks the configured count, not the layout.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() {
            return Ok(FlagOutcome::NoChange);
        }

        let cell = &mut self.board[coords];
        Ok(if cell.is_revealed {
            FlagOutcome::NoChange
        } else if cell.is_flagged {
            cell.is_flagged = false;
            self.remaining_flags += 1;
            FlagOutcome::Changed
        } else if self.remaining_flags > 0 {
            cell.is_flagged = true;
            self.remaining_flags -= 1;
            FlagOutcome::Changed
        } else {
            FlagOutcome::NoChange
        })
    }

    fn place_mines_excluding(&mut self, safe: Coord2) {
        let placed = place_mines(&mut self.board, self.config.mines, safe, &mut self.rng);
        calculate_adjacency(&mut self.board);
        self.safe_target = self.board.total_cells() - placed;
        self.mines_placed = true;
    }

    fn trigger_mine(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = &mut self.board[coords];
        cell.is_exploded = true;
        cell.is_revealed = true;
        self.triggered_mine = Some(coords);
        self.status = GameStatus::Lost;
        self.reveal_all_mines();
        log::debug!("mine detonated at {:?}", coords);
        RevealOutcome::HitMine
    }

    /// Uncovers the whole minefield once the game ends, win or lose.
    /// Mine reveals never count toward the safe-cell tally.
    fn reveal_all_mines(&mut self) {
        for cell in self.board.iter_mut() {
            if cell.is_mine {
                cell.is_revealed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord2, mines: &[Coord2]) -> Engine {
        Engine::with_mines(size, mines).unwrap()
    }

    #[test]
    fn reveal_hits_mine_and_uncovers_the_minefield() {
        let mut game = engine((2, 2), &[(0, 0), (1, 1)]);

        let outcome = game.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.triggered_mine(), Some((0, 0)));
        assert!(game.cell_at((0, 0)).is_exploded);
        assert!(game.cell_at((1, 1)).is_revealed);
        assert!(!game.cell_at((1, 1)).is_exploded);
    }

    #[test]
    fn flood_reveal_can_win_in_one_move() {
        let mut game = engine((3, 3), &[(2, 2)]);

        let outcome = game.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(game.status(), GameStatus::Won);
        assert!(game.cell_at((2, 2)).is_revealed);
        assert!(!game.cell_at((2, 2)).is_exploded);
        assert_eq!(game.triggered_mine(), None);
    }

    #[test]
    fn deferred_placement_keeps_the_first_reveal_safe() {
        for seed in 0..16 {
            let mut game = Engine::with_seed(Difficulty::Beginner, seed);
            assert!(!game.mines_placed());

            game.reveal((4, 4)).unwrap();

            assert!(game.mines_placed());
            assert!(!game.cell_at((4, 4)).is_mine);
            assert!(game.cell_at((4, 4)).is_revealed);
            assert_eq!(game.board().mine_count(), 10);
        }
    }

    #[test]
    fn revealing_a_flagged_cell_is_a_no_op() {
        let mut game = engine((2, 2), &[(0, 0)]);

        game.toggle_flag((0, 0)).unwrap();
        let outcome = game.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::NoChange);
        assert!(game.cell_at((0, 0)).is_flagged);
        assert!(!game.cell_at((0, 0)).is_revealed);
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn flag_budget_never_goes_negative() {
        let mut game = engine((2, 2), &[(0, 0)]);
        assert_eq!(game.remaining_flags(), 1);

        assert_eq!(game.toggle_flag((0, 0)).unwrap(), FlagOutcome::Changed);
        assert_eq!(game.remaining_flags(), 0);

        // budget exhausted, the second flag is rejected
        assert_eq!(game.toggle_flag((0, 1)).unwrap(), FlagOutcome::NoChange);
        assert!(!game.cell_at((0, 1)).is_flagged);

        assert_eq!(game.toggle_flag((0, 0)).unwrap(), FlagOutcome::Changed);
        assert_eq!(game.remaining_flags(), 1);
    }

    #[test]
    fn flagging_before_placement_is_pure_bookkeeping() {
        let mut game = Engine::with_seed(Difficulty::Beginner, 8);

        assert_eq!(game.toggle_flag((3, 3)).unwrap(), FlagOutcome::Changed);
        assert_eq!(game.remaining_flags(), 9);
        assert!(!game.mines_placed());
        assert_eq!(game.board().mine_count(), 0);
    }

    #[test]
    fn finished_games_ignore_further_moves() {
        let mut game = engine((2, 1), &[(0, 0)]);
        assert_eq!(game.reveal((1, 0)).unwrap(), RevealOutcome::Won);

        assert_eq!(game.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.toggle_flag((1, 0)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn out_of_bounds_coordinates_are_rejected() {
        let mut game = engine((2, 2), &[(0, 0)]);

        assert_eq!(game.reveal((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(game.toggle_flag((0, 2)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn with_mines_rejects_out_of_bounds_layouts() {
        assert_eq!(
            Engine::with_mines((2, 2), &[(0, 0), (2, 1)]).unwrap_err(),
            GameError::InvalidCoords
        );
    }

    #[test]
    fn reset_rebuilds_the_session() {
        let mut game = Engine::with_seed(Difficulty::Beginner, 3);
        game.reveal((0, 0)).unwrap();
        game.toggle_flag((8, 8)).unwrap();

        game.reset(Difficulty::Intermediate);

        assert_eq!(game.size(), (16, 16));
        assert_eq!(game.mine_count(), 40);
        assert_eq!(game.remaining_flags(), 40);
        assert_eq!(game.revealed_safe_count(), 0);
        assert_eq!(game.status(), GameStatus::Playing);
        assert!(!game.mines_placed());
        assert_eq!(game.board().mine_count(), 0);
        assert!(
            game.board()
                .iter()
                .all(|cell| !cell.is_revealed && !cell.is_flagged)
        );
    }
}
