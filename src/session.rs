use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crossterm::event::KeyCode;
use log::{error, info, warn};
use rand::Rng;

use crate::food;
use crate::grid::{Board, Cell, Direction};
use crate::snake::Snake;
use crate::ui::Palette;

/// Points awarded per food item.
pub const FOOD_POINTS: u32 = 10;
/// Score at which a session wins the match.
pub const TARGET_SCORE: u32 = 100;

pub type PlayerId = u8;

/// One integer high score per player slot, kept in a small file like a
/// browser's local storage would. Absent or unreadable files read as 0; IO
/// failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn for_player(player: PlayerId) -> Self {
        Self::at_path(PathBuf::from(format!(".snake_duel_high_score_{player}.txt")))
    }

    pub fn at_path(path: PathBuf) -> Self {
        HighScoreStore { path }
    }

    pub fn load(&self) -> u32 {
        match fs::read_to_string(&self.path) {
            Ok(contents) => contents.trim().parse().unwrap_or(0),
            Err(e) => {
                warn!("No stored high score at {:?}: {}", self.path, e);
                0
            }
        }
    }

    pub fn save(&self, score: u32) {
        if let Err(e) = fs::write(&self.path, score.to_string()) {
            error!("Error saving high score to {:?}: {}", self.path, e);
        }
    }
}

/// Everything a session needs at construction: which player slot it is, that
/// player's key bindings, the colors its snake is drawn with, and where its
/// high score lives.
pub struct SessionConfig {
    pub player: PlayerId,
    pub controls: HashMap<KeyCode, Direction>,
    pub palette: Palette,
    pub store: HighScoreStore,
}

/// What one simulation tick did to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused or not running; nothing happened.
    Skipped,
    /// Normal movement.
    Moved,
    /// Ate food and scored.
    Ate,
    /// Hit a wall or itself; the session is over.
    Died { score: u32 },
    /// Ate food and reached the target score. The match controller decides
    /// what happens next.
    TargetReached { score: u32 },
}

/// One player's independent game: snake, food, score, and lifecycle flags.
///
/// `ticking` stands in for an interval timer handle; stopping an already
/// stopped session is a no-op, so the game-over and win paths can both try.
pub struct Session {
    player: PlayerId,
    board: Board,
    snake: Snake,
    food: Option<Cell>,
    score: u32,
    high_score: u32,
    store: HighScoreStore,
    controls: HashMap<KeyCode, Direction>,
    palette: Palette,
    paused: bool,
    ticking: bool,
    over: bool,
    won: bool,
}

impl Session {
    pub fn new(config: SessionConfig, board: Board, rng: &mut impl Rng) -> Self {
        let snake = Snake::new(board);
        let food = food::spawn(board, &snake, rng);
        let high_score = config.store.load();
        Session {
            player: config.player,
            board,
            snake,
            food,
            score: 0,
            high_score,
            store: config.store,
            controls: config.controls,
            palette: config.palette,
            paused: false,
            ticking: false,
            over: false,
            won: false,
        }
    }

    /// One simulation step: advance, then collision, then food and score.
    pub fn tick(&mut self, rng: &mut impl Rng) -> TickOutcome {
        if !self.ticking || self.paused {
            return TickOutcome::Skipped;
        }

        // The dropped tail matters only in that grow() re-adds a duplicate
        self.snake.advance();

        if self.snake.hit_wall_or_self(self.board) {
            self.game_over();
            return TickOutcome::Died { score: self.score };
        }

        if self.food == Some(self.snake.head()) {
            self.snake.grow();
            self.score += FOOD_POINTS;
            self.food = food::spawn(self.board, &self.snake, rng);
            if self.food.is_none() {
                warn!("Player {}: board is full, ending session", self.player);
                self.game_over();
                return TickOutcome::Died { score: self.score };
            }
            if self.score >= TARGET_SCORE {
                return TickOutcome::TargetReached { score: self.score };
            }
            return TickOutcome::Ate;
        }

        TickOutcome::Moved
    }

    /// Terminal for this session until restarted. Idempotent.
    pub fn game_over(&mut self) {
        if self.over {
            return;
        }
        self.ticking = false;
        self.over = true;
        info!(
            "Player {} game over with score {} at length {}",
            self.player,
            self.score,
            self.snake.len()
        );
        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.save(self.high_score);
        }
    }

    pub fn start(&mut self) {
        if !self.over {
            self.ticking = true;
        }
    }

    pub fn stop(&mut self) {
        self.ticking = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Back to a fresh board, stopped. The match controller uses this before
    /// re-running the shared countdown.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.stop();
        self.score = 0;
        self.paused = false;
        self.over = false;
        self.won = false;
        self.snake.reset(self.board);
        self.food = food::spawn(self.board, &self.snake, rng);
    }

    /// Fresh board and an immediately running loop, for restarting a single
    /// session outside the shared countdown.
    pub fn restart(&mut self, rng: &mut impl Rng) {
        self.reset(rng);
        self.ticking = true;
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        if let Some(&direction) = self.controls.get(&key) {
            self.snake.change_direction(direction);
        }
    }

    pub fn mark_won(&mut self) {
        self.won = true;
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, cell: Cell) {
        self.food = Some(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GRID_SIZE;
    use crate::ui;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicU32, Ordering};

    static STORE_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> HighScoreStore {
        let n = STORE_COUNTER.fetch_add(1, Ordering::SeqCst);
        HighScoreStore::at_path(std::env::temp_dir().join(format!(
            "snake_duel_test_{}_{n}.txt",
            std::process::id()
        )))
    }

    fn test_session(store: HighScoreStore, rng: &mut StdRng) -> Session {
        let config = SessionConfig {
            player: 1,
            controls: HashMap::from([
                (KeyCode::Char('w'), Direction::Up),
                (KeyCode::Char('s'), Direction::Down),
                (KeyCode::Char('a'), Direction::Left),
                (KeyCode::Char('d'), Direction::Right),
            ]),
            palette: ui::PLAYER_ONE_PALETTE,
            store,
        };
        Session::new(config, Board::default(), rng)
    }

    #[test]
    fn test_tick_is_noop_until_started() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = test_session(temp_store(), &mut rng);

        assert_eq!(session.tick(&mut rng), TickOutcome::Skipped);
        assert_eq!(session.snake().head(), Cell::new(300, 200));

        session.start();
        session.place_food(Cell::new(0, 0));
        assert_eq!(session.tick(&mut rng), TickOutcome::Moved);
        assert_eq!(session.snake().head(), Cell::new(320, 200));
    }

    #[test]
    fn test_pause_suspends_the_simulation() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = test_session(temp_store(), &mut rng);
        session.start();
        session.place_food(Cell::new(0, 0));

        session.toggle_pause();
        assert_eq!(session.tick(&mut rng), TickOutcome::Skipped);
        assert!(session.is_ticking(), "pause leaves the loop scheduled");

        session.toggle_pause();
        assert_eq!(session.tick(&mut rng), TickOutcome::Moved);
    }

    #[test]
    fn test_eating_scores_grows_and_respawns_food() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = test_session(temp_store(), &mut rng);
        session.start();
        session.place_food(Cell::new(320, 200));

        assert_eq!(session.tick(&mut rng), TickOutcome::Ate);
        assert_eq!(session.score(), FOOD_POINTS);
        assert_eq!(session.snake().len(), 4);
        let food = session.food().expect("food respawned");
        assert_ne!(food, Cell::new(320, 200));
        assert!(!session.snake().occupies(food));

        // Next tick with no food ahead moves without scoring
        session.place_food(Cell::new(0, 0));
        assert_eq!(session.tick(&mut rng), TickOutcome::Moved);
        assert_eq!(session.score(), FOOD_POINTS);
    }

    #[test]
    fn test_reaching_target_score_is_reported() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = test_session(temp_store(), &mut rng);
        session.start();
        session.set_score(TARGET_SCORE - FOOD_POINTS);
        session.place_food(Cell::new(320, 200));

        assert_eq!(
            session.tick(&mut rng),
            TickOutcome::TargetReached { score: TARGET_SCORE }
        );
        assert!(!session.is_over(), "winning is not a game over");
    }

    #[test]
    fn test_wall_death_is_game_over_exactly_once() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = test_session(temp_store(), &mut rng);
        session.start();
        session.place_food(Cell::new(0, 0));

        // Head starts at x=300 moving right; the wall is 15 cells away
        for _ in 0..14 {
            assert_eq!(session.tick(&mut rng), TickOutcome::Moved);
        }
        assert_eq!(session.tick(&mut rng), TickOutcome::Died { score: 0 });
        assert!(session.is_over());
        assert!(!session.is_ticking());

        // The stopped loop no longer advances anything
        assert_eq!(session.tick(&mut rng), TickOutcome::Skipped);
        session.game_over();
        assert!(session.is_over());
    }

    #[test]
    fn test_high_score_persists_across_sessions() {
        let mut rng = StdRng::seed_from_u64(6);
        let store = temp_store();
        let path = store.path.clone();

        let mut session = test_session(store, &mut rng);
        assert_eq!(session.high_score(), 0);
        session.start();
        session.set_score(50);
        session.place_food(Cell::new(0, 0));
        // Drive into the right wall
        for _ in 0..20 {
            session.tick(&mut rng);
        }
        assert!(session.is_over());
        assert_eq!(session.high_score(), 50);

        let fresh = test_session(HighScoreStore::at_path(path.clone()), &mut rng);
        assert_eq!(fresh.high_score(), 50);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_high_score_is_monotonic() {
        let mut rng = StdRng::seed_from_u64(7);
        let store = temp_store();
        let path = store.path.clone();
        store.save(80);

        let mut session = test_session(HighScoreStore::at_path(path.clone()), &mut rng);
        assert_eq!(session.high_score(), 80);
        session.start();
        session.set_score(30);
        session.place_food(Cell::new(0, 0));
        for _ in 0..20 {
            session.tick(&mut rng);
        }
        assert!(session.is_over());
        assert_eq!(session.high_score(), 80);
        assert_eq!(HighScoreStore::at_path(path.clone()).load(), 80);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_restart_yields_a_fresh_running_session() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut session = test_session(temp_store(), &mut rng);
        session.start();
        session.set_score(40);
        session.place_food(Cell::new(0, 0));
        for _ in 0..20 {
            session.tick(&mut rng);
        }
        assert!(session.is_over());

        session.restart(&mut rng);
        assert!(session.is_ticking());
        assert!(!session.is_over());
        assert!(!session.is_paused());
        assert_eq!(session.score(), 0);
        assert_eq!(session.snake().head(), Cell::new(300, 200));
        assert_eq!(session.snake().len(), 3);
        assert!(session.food().is_some());
    }

    #[test]
    fn test_mapped_and_unmapped_keys() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut session = test_session(temp_store(), &mut rng);
        session.start();

        session.handle_key(KeyCode::Char('w'));
        session.tick(&mut rng);
        assert_eq!(
            session.snake().head(),
            Cell::new(300, 200 - GRID_SIZE),
            "mapped key turned the snake"
        );

        // Arrow keys belong to the other player and must be ignored here
        session.handle_key(KeyCode::Left);
        session.handle_key(KeyCode::Char('x'));
        session.tick(&mut rng);
        assert_eq!(session.snake().head(), Cell::new(300, 200 - 2 * GRID_SIZE));
    }
}
