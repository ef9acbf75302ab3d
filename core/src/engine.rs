use core::num::Saturating;
use core::time::Duration;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Init -> Play
/// - Play -> Pause
/// - Pause -> Play
/// - Play -> End
/// - any -> Init, through a new game, a restart, or a difficulty change
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Board is set up and nothing is revealed, the clock is reset
    Init,
    /// Game started, the clock is running
    Play,
    /// Clock is stopped and tile actions are ignored
    Pause,
    /// Game was won or lost
    End,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::Init)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::End)
    }

    /// Whether tile actions are accepted in this state.
    pub const fn accepts_actions(self) -> bool {
        matches!(self, Self::Init | Self::Play)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Init
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum TileAction {
    Open,
    Chord,
}

impl TileAction {
    const fn event(self) -> GameEvent {
        match self {
            Self::Open => GameEvent::TileOpened,
            Self::Chord => GameEvent::TileChorded,
        }
    }
}

/// A game of minesweeper, from setting up the board to winning or losing it.
pub struct Minesweeper {
    board: Board,
    state: GameState,
    seed: u64,
    seed_source: SmallRng,
    rng: SmallRng,
    stopwatch: Stopwatch,
    listeners: Listeners,
    cleared: Saturating<CellCount>,
    flags_used: Saturating<CellCount>,
    clicks: u32,
    actions: u32,
    restarted: bool,
    no_flagging: bool,
    losing_tile: Option<Coord2>,
}

impl Minesweeper {
    /// Creates a beginner game, `seed` drives every generated board.
    pub fn new(seed: u64) -> Self {
        Self::with_clock(seed, SystemClock::new())
    }

    pub fn with_clock(seed: u64, clock: impl Clock + 'static) -> Self {
        let config = Difficulty::default().config();
        let mut game = Self {
            board: Board::new(config),
            state: GameState::Init,
            seed: 0,
            seed_source: SmallRng::seed_from_u64(seed),
            rng: SmallRng::seed_from_u64(0),
            stopwatch: Stopwatch::new(clock),
            listeners: Listeners::default(),
            cleared: Saturating(0),
            flags_used: Saturating(0),
            clicks: 0,
            actions: 0,
            restarted: false,
            no_flagging: false,
            losing_tile: None,
        };
        game.new_game();
        game
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.set_config(difficulty.config());
    }

    /// Sets a custom board, each parameter is clamped into its supported range.
    pub fn set_custom_difficulty(&mut self, width: Coord, height: Coord, mines: CellCount) {
        self.set_config(BoardConfig::new(width, height, mines));
    }

    /// Replaces the board and starts a new game on it.
    pub fn set_config(&mut self, config: BoardConfig) {
        let config = BoardConfig::new(config.width, config.height, config.mines);
        log::debug!(
            "Difficulty set to {}x{} with {} mines",
            config.width,
            config.height,
            config.mines
        );
        self.board = Board::new(config);
        self.notify(GameEvent::DifficultyChanged, None);
        self.new_game();
    }

    /// Starts a new game with a seed drawn from the seed source.
    pub fn new_game(&mut self) {
        let seed = self.seed_source.random();
        self.new_game_with_seed(seed);
    }

    /// Starts a new game, the same seed always yields the same board.
    pub fn new_game_with_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self.board.reset();
        let mines = self.board.mine_count();
        self.board.place_mines(&mut self.rng, mines, &[]);
        log::debug!("New game with seed {}", seed);
        self.reset_counters(false);
        self.notify(GameEvent::NewGame, None);
    }

    /// Starts a new game on the current board size with mines at exactly `mine_coords`.
    ///
    /// The seed is kept, it still drives the first click relocation. Nothing changes if the layout is rejected.
    /// A layout with a different mine count emits `DifficultyChanged` before `NewGame`.
    pub fn load_layout(&mut self, mine_coords: &[Coord2]) -> Result<()> {
        let board = Board::from_mine_coords(self.width(), self.height(), mine_coords)?;
        let changed = board.config() != self.board.config();
        self.board = board;
        self.rng = SmallRng::seed_from_u64(self.seed);
        log::debug!("Loaded layout with {} mines", mine_coords.len());
        self.reset_counters(false);
        if changed {
            self.notify(GameEvent::DifficultyChanged, None);
        }
        self.notify(GameEvent::NewGame, None);
        Ok(())
    }

    /// Replays the current mines from the start, without moving mines on the first click.
    pub fn restart_game(&mut self) {
        self.board.restart();
        self.reset_counters(true);
        self.notify(GameEvent::RestartGame, None);
    }

    /// Pauses a running game or resumes a paused one.
    pub fn pause_game(&mut self) {
        match self.state {
            GameState::Play => self.set_state(GameState::Pause),
            GameState::Pause => self.set_state(GameState::Play),
            _ => return,
        }
        self.notify(GameEvent::GamePaused, None);
    }

    /// Disallows flagging, changing the setting starts a new game.
    pub fn set_no_flagging(&mut self, no_flagging: bool) {
        if self.no_flagging == no_flagging {
            return;
        }
        self.no_flagging = no_flagging;
        self.new_game();
    }

    pub fn add_listener(&mut self, listener: impl GameEventListener + 'static) -> ListenerId {
        self.listeners.add(alloc::boxed::Box::new(listener))
    }

    /// Registers a closure as a listener.
    pub fn on_event<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(GameEvent, &Minesweeper, Option<&Tile>) + 'static,
    {
        self.add_listener(FnListener(listener))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Toggles the flag of a closed tile, returns whether it changed.
    pub fn flag(&mut self, x: Coord, y: Coord) -> bool {
        let coords = (x, y);
        if !self.state.accepts_actions() || self.no_flagging || !self.board.contains(coords) {
            return false;
        }

        let toggled = self.board.flag(coords);
        self.clicks += 1;
        if !toggled {
            return false;
        }

        self.actions += 1;
        if self.board[coords].has_flag() {
            self.flags_used += 1;
        } else {
            self.flags_used -= 1;
        }
        self.notify(GameEvent::TileFlagged, Some(coords));
        true
    }

    /// Opens a tile, flooding through zero tiles.
    pub fn open(&mut self, x: Coord, y: Coord) -> OpenResult {
        self.do_action((x, y), TileAction::Open)
    }

    /// Opens all neighbors of an open number whose flags match it, never valid as the first move.
    pub fn chord(&mut self, x: Coord, y: Coord) -> OpenResult {
        self.do_action((x, y), TileAction::Chord)
    }

    fn do_action(&mut self, coords: Coord2, action: TileAction) -> OpenResult {
        if !self.state.accepts_actions() || !self.board.contains(coords) {
            return OpenResult::NONE;
        }

        if self.state.is_initial() {
            let tile = &self.board[coords];
            if action == TileAction::Chord || tile.is_open() || tile.has_flag() {
                return OpenResult::NONE;
            }
            self.set_state(GameState::Play);
            if !self.restarted {
                let moved = self.board.relocate_mines(coords, &mut self.rng);
                if moved > 0 {
                    log::debug!("Relocated {} mines away from first click {:?}", moved, coords);
                }
            }
        }

        let result = match action {
            TileAction::Open => self.board.open(coords),
            TileAction::Chord => self.board.chord(coords),
        };
        self.clicks += 1;
        self.cleared += result.opened;

        if result.has_update() {
            self.actions += 1;
            self.notify(action.event(), Some(coords));
        }

        if result.hit_mine {
            self.set_state(GameState::End);
            self.losing_tile = self.board.reveal_all();
            log::debug!("Game lost at {:?}", coords);
            self.notify(GameEvent::GameLost, Some(coords));
        } else if self.cleared.0 == self.board.win_condition() {
            self.set_state(GameState::End);
            log::debug!("Game won at {:?} after {:?}", coords, self.elapsed());
            self.notify(GameEvent::GameWon, Some(coords));
        }

        result
    }

    fn reset_counters(&mut self, restarted: bool) {
        self.cleared = Saturating(0);
        self.flags_used = Saturating(0);
        self.clicks = 0;
        self.actions = 0;
        self.losing_tile = None;
        self.restarted = restarted;
        self.set_state(GameState::Init);
    }

    fn set_state(&mut self, state: GameState) {
        if self.state == state {
            return;
        }
        log::debug!("Game state {:?} -> {:?}", self.state, state);
        self.state = state;
        match state {
            GameState::Init => self.stopwatch.reset(),
            GameState::Play => self.stopwatch.start(),
            GameState::Pause | GameState::End => self.stopwatch.stop(),
        }
    }

    fn notify(&mut self, event: GameEvent, at: Option<Coord2>) {
        debug_assert_eq!(event.has_tile(), at.is_some());
        let mut listeners = core::mem::take(&mut self.listeners);
        let tile = at.and_then(|coords| self.board.tile(coords));
        listeners.dispatch(event, self, tile);
        self.listeners = listeners;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn width(&self) -> Coord {
        self.board.width()
    }

    pub fn height(&self) -> Coord {
        self.board.height()
    }

    pub fn mine_count(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn win_condition(&self) -> CellCount {
        self.board.win_condition()
    }

    /// Tile at `(x, y)`, `None` when out of bounds.
    pub fn tile(&self, x: Coord, y: Coord) -> Option<&Tile> {
        self.board.tile((x, y))
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Safe tiles opened so far.
    pub fn cleared(&self) -> CellCount {
        self.cleared.0
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    /// Clicks that changed the board.
    pub fn actions(&self) -> u32 {
        self.actions
    }

    pub fn flags_used(&self) -> CellCount {
        self.flags_used.0
    }

    /// How many mines have not been flagged yet, negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.mine_count() as isize) - (self.flags_used.0 as isize)
    }

    /// Time spent playing, pauses excluded.
    pub fn elapsed(&self) -> Duration {
        self.stopwatch.elapsed()
    }

    /// The mine that ended the game, only set after a loss.
    pub fn losing_tile(&self) -> Option<&Tile> {
        self.losing_tile.and_then(|coords| self.board.tile(coords))
    }

    pub fn is_won(&self) -> bool {
        self.state.is_final() && self.losing_tile.is_none()
    }

    pub fn is_restarted(&self) -> bool {
        self.restarted
    }

    pub fn is_no_flagging(&self) -> bool {
        self.no_flagging
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn count_openings(&self) -> CellCount {
        self.board.count_openings()
    }

    pub fn count_3bv(&self) -> CellCount {
        self.board.count_3bv()
    }
}

impl core::fmt::Debug for Minesweeper {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Minesweeper")
            .field("config", &self.board.config())
            .field("state", &self.state)
            .field("seed", &self.seed)
            .field("cleared", &self.cleared.0)
            .field("clicks", &self.clicks)
            .field("actions", &self.actions)
            .field("flags_used", &self.flags_used.0)
            .field("restarted", &self.restarted)
            .field("losing_tile", &self.losing_tile)
            .field("stopwatch", &self.stopwatch)
            .finish_non_exhaustive()
    }
}
