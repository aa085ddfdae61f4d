//! The game manager: the [`Model`] that ties input, engine, storage and
//! rendering together.

use rand::{SeedableRng, rngs::StdRng};
use twenty48_core::{Direction, GameState};
use twenty48_ui::{Effect, Model, Msg, Screen};

use crate::config::Config;
use crate::input::{Action, InputMap};
use crate::render::{Actuator, Snapshot};
use crate::storage::Storage;

/// UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Playing,
    Help,
}

/// Runs one session of 2048 against a [`Storage`].
pub struct GameManager<S: Storage> {
    config: Config,
    storage: S,
    rng: StdRng,
    game: GameState,
    input: InputMap,
    actuator: Actuator,
    snapshot: Snapshot,
    /// Score at the previous actuation, for the "+points" display.
    last_score: u64,
    mode: Mode,
}

impl<S: Storage> GameManager<S> {
    /// Create a manager and set up the first game: the saved one if it fits
    /// the configured rules, otherwise a fresh one.
    pub fn new(config: Config, storage: S) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let game = GameState::new(config.rules, &mut rng);
        let mut manager = Self {
            input: InputMap::new(config.swipe_threshold),
            actuator: Actuator::new(config.rules.size, config.rules.win_value),
            config,
            storage,
            rng,
            game,
            snapshot: Snapshot::default(),
            last_score: 0,
            mode: Mode::Playing,
        };
        manager.setup();
        manager
    }

    fn setup(&mut self) {
        if let Some(game) = self.restore() {
            log::info!("resumed saved game at score {}", game.score);
            self.game = game;
        } else {
            log::info!(
                "new {0}x{0} game, playing to {1}",
                self.config.rules.size,
                self.config.rules.win_value
            );
        }
        self.last_score = self.game.score;
        self.actuate();
    }

    fn restore(&self) -> Option<GameState> {
        if self.config.new_game {
            return None;
        }
        let saved = self.storage.game_state()?;
        match GameState::restore(self.config.rules, &saved) {
            Ok(game) => Some(game),
            Err(e) => {
                log::warn!("not resuming saved game: {e}");
                None
            }
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Screen dimensions needed to draw this game.
    pub fn screen_size(&self) -> (i32, i32) {
        self.actuator.screen_size()
    }

    /// Slide the board. Nothing is saved or redrawn unless a tile moved.
    pub fn move_tiles(&mut self, dir: Direction) {
        let outcome = self.game.move_tiles(dir, &mut self.rng);
        if !outcome.moved {
            return;
        }
        log::debug!(
            "{dir}: +{} from {} merges, score {}",
            outcome.points,
            outcome.merges,
            self.game.score
        );
        if self.game.over {
            log::info!(
                "game over at score {}, largest tile {}",
                self.game.score,
                self.game.grid.max_value()
            );
        }
        self.actuate();
    }

    /// Throw the current game away and start a fresh one.
    pub fn restart(&mut self) {
        log::info!("restarting at score {}", self.game.score);
        self.storage.clear_game_state();
        self.game = GameState::new(self.config.rules, &mut self.rng);
        self.last_score = 0;
        self.actuate();
    }

    /// Continue after winning. Has no effect before a win.
    pub fn keep_playing(&mut self) {
        if !self.game.won || self.game.keep_playing {
            return;
        }
        log::info!("continuing past {}", self.config.rules.win_value);
        self.game.keep_playing();
        self.actuate();
    }

    /// Persist the game and refresh what the renderer shows.
    fn actuate(&mut self) {
        if self.storage.best_score() < self.game.score {
            self.storage.set_best_score(self.game.score);
        }
        if self.game.over {
            self.storage.clear_game_state();
        } else {
            self.storage.set_game_state(&self.game.serialize());
        }

        let added = self.game.score.saturating_sub(self.last_score);
        self.last_score = self.game.score;
        self.snapshot = Snapshot::capture(&self.game, self.storage.best_score(), added);
    }

    fn perform(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Move(dir) => self.move_tiles(dir),
            Action::Restart => self.restart(),
            Action::KeepPlaying => self.keep_playing(),
            Action::Help => self.mode = Mode::Help,
            Action::Quit => return Some(Effect::End),
        }
        None
    }
}

impl<S: Storage> Model for GameManager<S> {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        let action = self.input.action(&msg);
        match self.mode {
            Mode::Playing => self.perform(action?),
            Mode::Help => {
                if action == Some(Action::Quit) {
                    return Some(Effect::End);
                }
                if matches!(msg, Msg::KeyDown { .. }) {
                    self.mode = Mode::Playing;
                }
                None
            }
        }
    }

    fn draw(&self, screen: &mut Screen) {
        screen.fill(Default::default());
        match self.mode {
            Mode::Playing => self.actuator.draw(screen, &self.snapshot),
            Mode::Help => self.actuator.draw_help(screen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twenty48_core::{Grid, Rules};
    use twenty48_ui::{Key, ModMask};

    use crate::storage::MemoryStorage;

    fn config(seed: u64) -> Config {
        Config {
            seed: Some(seed),
            storage_path: None,
            ..Config::default()
        }
    }

    fn saved(rows: &[&[u32]], score: u64) -> twenty48_core::SavedGame {
        let mut g = GameState::with_grid(Rules::default(), Grid::from_rows(rows));
        g.score = score;
        g.serialize()
    }

    fn key(m: &mut GameManager<MemoryStorage>, k: Key) -> Option<Effect> {
        m.update(Msg::key(k))
    }

    #[test]
    fn fresh_game_has_start_tiles_and_is_saved() {
        let m = GameManager::new(config(1), MemoryStorage::new());
        assert_eq!(m.game().grid.tile_count(), 2);
        assert_eq!(m.game().score, 0);
        assert_eq!(m.storage().game_state(), Some(m.game().serialize()));
        assert_eq!(m.snapshot().meta.score, 0);
    }

    #[test]
    fn resumes_saved_game() {
        let mut storage = MemoryStorage::new();
        storage.set_game_state(&saved(&[&[2, 4, 0, 0], &[0; 4], &[0; 4], &[0; 4]], 12));
        let m = GameManager::new(config(1), storage);
        assert_eq!(m.game().score, 12);
        assert_eq!(m.game().grid.rows()[0], vec![2, 4, 0, 0]);
        assert_eq!(m.snapshot().score_added, 0);
    }

    #[test]
    fn new_flag_and_size_mismatch_skip_the_saved_game() {
        let mut storage = MemoryStorage::new();
        storage.set_game_state(&saved(&[&[2, 4, 0, 0], &[0; 4], &[0; 4], &[0; 4]], 12));

        let cfg = Config {
            new_game: true,
            ..config(1)
        };
        let m = GameManager::new(cfg, storage.clone());
        assert_eq!(m.game().score, 0);

        let mut cfg = config(1);
        cfg.rules.size = 5;
        let m = GameManager::new(cfg, storage);
        assert_eq!(m.game().grid.size(), 5);
        assert_eq!(m.game().score, 0);
    }

    #[test]
    fn moves_update_score_best_and_storage() {
        let mut storage = MemoryStorage::new();
        storage.set_game_state(&saved(&[&[2, 2, 0, 0], &[0; 4], &[0; 4], &[0; 4]], 0));
        let mut m = GameManager::new(config(3), storage);

        assert_eq!(key(&mut m, Key::ArrowLeft), None);
        assert_eq!(m.game().score, 4);
        assert_eq!(m.storage().best_score(), 4);
        assert_eq!(m.snapshot().score_added, 4);
        assert_eq!(m.snapshot().meta.best_score, 4);
        assert_eq!(m.storage().game_state(), Some(m.game().serialize()));
    }

    #[test]
    fn blocked_move_changes_nothing() {
        let mut storage = MemoryStorage::new();
        storage.set_game_state(&saved(&[&[2, 0, 0, 0], &[0; 4], &[0; 4], &[0; 4]], 8));
        let mut m = GameManager::new(config(3), storage);
        let before = m.game().clone();
        key(&mut m, Key::Char('h'));
        key(&mut m, Key::Char('k'));
        assert_eq!(m.game(), &before);
    }

    #[test]
    fn game_over_clears_saved_state_but_keeps_best() {
        // One legal move left: the two 2s in the last row merge, and the
        // spawned tile lands in the only gap with nothing left to match.
        let rows: &[&[u32]] = &[
            &[8, 16, 32, 64],
            &[16, 32, 64, 128],
            &[8, 16, 32, 64],
            &[128, 256, 2, 2],
        ];
        let mut storage = MemoryStorage::new();
        storage.set_game_state(&saved(rows, 100));
        let mut m = GameManager::new(config(9), storage);

        key(&mut m, Key::ArrowRight);
        assert!(m.game().over);
        assert_eq!(m.storage().game_state(), None);
        assert_eq!(m.storage().best_score(), 104);
        assert!(m.snapshot().meta.terminated);
    }

    #[test]
    fn win_then_keep_playing() {
        let mut storage = MemoryStorage::new();
        storage.set_game_state(&saved(
            &[&[1024, 1024, 0, 0], &[0; 4], &[0; 4], &[0; 4]],
            0,
        ));
        let mut m = GameManager::new(config(4), storage);

        key(&mut m, Key::ArrowLeft);
        assert!(m.game().won);
        assert!(m.snapshot().meta.terminated);
        let frozen = m.game().clone();
        key(&mut m, Key::ArrowRight);
        assert_eq!(m.game(), &frozen);

        key(&mut m, Key::Char('c'));
        assert!(m.game().keep_playing);
        assert!(!m.snapshot().meta.terminated);
        assert_eq!(m.storage().game_state(), Some(m.game().serialize()));
    }

    #[test]
    fn keep_playing_before_a_win_does_nothing() {
        let mut m = GameManager::new(config(2), MemoryStorage::new());
        key(&mut m, Key::Char('c'));
        assert!(!m.game().keep_playing);
    }

    #[test]
    fn restart_starts_fresh_and_keeps_best() {
        let mut storage = MemoryStorage::new();
        storage.set_best_score(900);
        storage.set_game_state(&saved(&[&[2, 2, 0, 0], &[0; 4], &[0; 4], &[0; 4]], 300));
        let mut m = GameManager::new(config(6), storage);
        key(&mut m, Key::Char('r'));
        assert_eq!(m.game().score, 0);
        assert_eq!(m.game().grid.tile_count(), 2);
        assert_eq!(m.storage().best_score(), 900);
        assert_eq!(m.storage().game_state(), Some(m.game().serialize()));
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let a = GameManager::new(config(77), MemoryStorage::new());
        let b = GameManager::new(config(77), MemoryStorage::new());
        assert_eq!(a.game(), b.game());
    }

    #[test]
    fn help_overlay_and_quit() {
        let mut m = GameManager::new(config(1), MemoryStorage::new());
        let before = m.game().clone();
        assert_eq!(key(&mut m, Key::Char('?')), None);
        let (w, h) = m.screen_size();
        let mut screen = Screen::new(w, h);
        m.draw(&mut screen);
        assert!(screen.contains_text("How to play"));

        // The key that closes help is not acted on.
        assert_eq!(key(&mut m, Key::Char('r')), None);
        assert_eq!(m.game(), &before);
        m.draw(&mut screen);
        assert!(screen.contains_text("Score: 0"));

        assert_eq!(key(&mut m, Key::Char('q')), Some(Effect::End));
        assert_eq!(
            m.update(Msg::key_mod(Key::Char('c'), ModMask::CTRL)),
            Some(Effect::End)
        );
        assert_eq!(m.update(Msg::Init), None);
    }
}
