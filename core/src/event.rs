use alloc::boxed::Box;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// State transitions reported to listeners.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    NewGame,
    RestartGame,
    /// A tile was opened, carries the clicked tile.
    TileOpened,
    /// A chord opened tiles, carries the chorded tile.
    TileChorded,
    /// A flag was placed or removed, carries the tile.
    TileFlagged,
    /// The game was paused or resumed.
    GamePaused,
    /// Carries the tile whose opening won the game.
    GameWon,
    /// Carries the tile whose action revealed a mine.
    GameLost,
    DifficultyChanged,
}

impl GameEvent {
    /// Whether listeners receive a tile along with this event.
    pub const fn has_tile(self) -> bool {
        matches!(
            self,
            Self::TileOpened | Self::TileChorded | Self::TileFlagged | Self::GameWon | Self::GameLost
        )
    }
}

/// Observer of a [`Minesweeper`] game.
///
/// Listeners run synchronously on the caller's thread, in registration order, after the engine is in its new state.
pub trait GameEventListener {
    fn on_game_event(&mut self, event: GameEvent, game: &Minesweeper, tile: Option<&Tile>);
}

/// Adapts a closure into a listener.
pub struct FnListener<F>(pub F);

impl<F> GameEventListener for FnListener<F>
where
    F: FnMut(GameEvent, &Minesweeper, Option<&Tile>),
{
    fn on_game_event(&mut self, event: GameEvent, game: &Minesweeper, tile: Option<&Tile>) {
        (self.0)(event, game, tile)
    }
}

/// Handle returned on registration, used to remove the listener again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(u32);

impl ListenerId {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

/// Ordered list of listeners.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<(ListenerId, Box<dyn GameEventListener>)>,
    next_id: u32,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Box<dyn GameEventListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn dispatch(&mut self, event: GameEvent, game: &Minesweeper, tile: Option<&Tile>) {
        for (_, listener) in self.entries.iter_mut() {
            listener.on_game_event(event, game, tile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<(&'static str, GameEvent)>>>,
    }

    impl GameEventListener for Recorder {
        fn on_game_event(&mut self, event: GameEvent, _game: &Minesweeper, _tile: Option<&Tile>) {
            self.log.borrow_mut().push((self.name, event));
        }
    }

    #[test]
    fn dispatches_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();
        for name in ["first", "second", "third"] {
            listeners.add(Box::new(Recorder {
                name,
                log: log.clone(),
            }));
        }
        let game = Minesweeper::new(1);

        listeners.dispatch(GameEvent::NewGame, &game, None);

        assert_eq!(
            *log.borrow(),
            vec![
                ("first", GameEvent::NewGame),
                ("second", GameEvent::NewGame),
                ("third", GameEvent::NewGame),
            ]
        );
    }

    #[test]
    fn removed_listener_is_not_called() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();
        let first = listeners.add(Box::new(Recorder {
            name: "first",
            log: log.clone(),
        }));
        listeners.add(Box::new(Recorder {
            name: "second",
            log: log.clone(),
        }));
        let game = Minesweeper::new(1);

        assert!(listeners.remove(first));
        assert!(!listeners.remove(first));
        listeners.dispatch(GameEvent::GamePaused, &game, None);

        assert_eq!(listeners.len(), 1);
        assert_eq!(*log.borrow(), vec![("second", GameEvent::GamePaused)]);
    }

    #[test]
    fn closures_adapt_to_listeners() {
        let count = Rc::new(RefCell::new(0));
        let seen = count.clone();
        let mut listeners = Listeners::default();
        listeners.add(Box::new(FnListener(
            move |_: GameEvent, _: &Minesweeper, _: Option<&Tile>| *seen.borrow_mut() += 1,
        )));
        let game = Minesweeper::new(1);

        listeners.dispatch(GameEvent::NewGame, &game, None);
        listeners.dispatch(GameEvent::RestartGame, &game, None);

        assert_eq!(*count.borrow(), 2);
    }
}
