use proptest::prelude::*;
use sweeper_core::*;

fn adjacency_holds(board: &Board) -> bool {
    board.tiles().all(|tile| {
        let mines = tile
            .neighbors()
            .iter()
            .filter(|&&pos| board[pos].is_mine())
            .count();
        usize::from(tile.adjacent_mines()) == mines
    })
}

fn mine_total(board: &Board) -> usize {
    board.tiles().filter(|tile| tile.is_mine()).count()
}

#[derive(Clone, Debug)]
enum Action {
    Open(Coord, Coord),
    Chord(Coord, Coord),
    Flag(Coord, Coord),
    Pause,
    Restart,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0..12u8, 0..12u8).prop_map(|(x, y)| Action::Open(x, y)),
        2 => (0..12u8, 0..12u8).prop_map(|(x, y)| Action::Chord(x, y)),
        2 => (0..12u8, 0..12u8).prop_map(|(x, y)| Action::Flag(x, y)),
        1 => Just(Action::Pause),
        1 => Just(Action::Restart),
    ]
}

proptest! {
    #[test]
    fn new_game_places_exact_mine_count(
        seed in any::<u64>(),
        width in 5..=20u8,
        height in 5..=20u8,
        mines in 5..=120u16,
    ) {
        let mut game = Minesweeper::with_clock(seed, ManualClock::new());
        game.set_custom_difficulty(width, height, mines);

        prop_assert_eq!(mine_total(game.board()), usize::from(game.mine_count()));
        prop_assert!(game.mine_count() <= u16::from(width) * u16::from(height) - 10);
        prop_assert!(adjacency_holds(game.board()));
    }

    #[test]
    fn first_open_is_never_a_mine(seed in any::<u64>(), x in 0..16u8, y in 0..16u8, mines in 5..=246u16) {
        let mut game = Minesweeper::with_clock(seed, ManualClock::new());
        game.set_custom_difficulty(16, 16, mines);

        let result = game.open(x, y);

        prop_assert!(!result.hit_mine);
        prop_assert!(result.opened >= 1);
        prop_assert_eq!(game.tile(x, y).unwrap().adjacent_mines(), 0);
        prop_assert_eq!(mine_total(game.board()), usize::from(game.mine_count()));
        prop_assert!(adjacency_holds(game.board()));
    }

    #[test]
    fn invariants_hold_across_random_play(
        seed in any::<u64>(),
        actions in proptest::collection::vec(action(), 1..60),
    ) {
        let mut game = Minesweeper::with_clock(seed, ManualClock::new());
        game.set_custom_difficulty(10, 10, 15);

        for action in actions {
            let clicks = game.clicks();
            match action {
                Action::Open(x, y) => {
                    let open_before = game.tile(x, y).map(|tile| tile.is_open() || tile.has_flag());
                    let result = game.open(x, y);
                    if open_before == Some(true) {
                        prop_assert_eq!(result, OpenResult::NONE);
                    }
                }
                Action::Chord(x, y) => {
                    let chordable = game.board().is_chordable((x, y));
                    let result = game.chord(x, y);
                    if !chordable {
                        prop_assert_eq!(result, OpenResult::NONE);
                    }
                }
                Action::Flag(x, y) => {
                    game.flag(x, y);
                }
                Action::Pause => game.pause_game(),
                Action::Restart => game.restart_game(),
            }

            prop_assert!(adjacency_holds(game.board()));
            prop_assert_eq!(mine_total(game.board()), 15);
            prop_assert!(game.actions() <= game.clicks());
            prop_assert!(game.clicks() <= clicks + 1);

            let open_safe = game
                .board()
                .tiles()
                .filter(|tile| tile.is_open() && !tile.is_mine())
                .count();
            let flags = game.board().tiles().filter(|tile| tile.has_flag()).count();
            match game.state() {
                GameState::End if game.is_won() => {
                    prop_assert_eq!(game.cleared(), game.win_condition());
                }
                GameState::End => {
                    let losing = game.losing_tile().unwrap();
                    prop_assert!(losing.is_mine() && losing.is_open());
                    prop_assert!(game.board().tiles().all(Tile::is_open));
                }
                _ => {
                    prop_assert_eq!(usize::from(game.cleared()), open_safe);
                    prop_assert_eq!(usize::from(game.flags_used()), flags);
                }
            }
        }
    }
}
