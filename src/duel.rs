use crossterm::event::KeyCode;
use log::info;
use rand::Rng;

use crate::grid::Board;
use crate::session::{PlayerId, Session, SessionConfig, TickOutcome};

/// Seconds shown on the shared countdown before both games start.
const COUNTDOWN_SECONDS: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Winner {
    pub player: PlayerId,
    pub score: u32,
}

/// Coordinates the player sessions: shared countdown, shared pause, shared
/// restart, and the first-to-target win that freezes every session.
///
/// Sessions never reach into each other; a winning session reports
/// [`TickOutcome::TargetReached`] and the controller stops the rest. The
/// session count is open-ended even though the game wires up exactly two.
pub struct Duel {
    sessions: Vec<Session>,
    countdown: Option<u8>,
    winner: Option<Winner>,
}

impl Duel {
    pub fn new(configs: Vec<SessionConfig>, board: Board, rng: &mut impl Rng) -> Self {
        Duel {
            sessions: configs
                .into_iter()
                .map(|config| Session::new(config, board, rng))
                .collect(),
            countdown: None,
            winner: None,
        }
    }

    /// Begins the shared countdown. Ignored while one is already running;
    /// returns whether a new countdown started so the caller can arm its
    /// one-second timer.
    pub fn start(&mut self) -> bool {
        if self.countdown.is_some() {
            return false;
        }
        self.countdown = Some(COUNTDOWN_SECONDS);
        true
    }

    /// One second of countdown. At zero, every session starts simultaneously.
    pub fn countdown_tick(&mut self) {
        match self.countdown {
            Some(n) if n > 1 => self.countdown = Some(n - 1),
            Some(_) => {
                self.countdown = None;
                for session in &mut self.sessions {
                    session.start();
                }
                info!("Countdown finished, games running");
            }
            None => {}
        }
    }

    /// One simulation tick for every session.
    pub fn tick(&mut self, rng: &mut impl Rng) {
        for i in 0..self.sessions.len() {
            if let TickOutcome::TargetReached { score } = self.sessions[i].tick(rng) {
                self.announce_winner(i, score);
            }
        }
    }

    fn announce_winner(&mut self, index: usize, score: u32) {
        if self.winner.is_some() {
            return;
        }
        let player = self.sessions[index].player();
        info!("Player {player} wins with score {score}");
        self.winner = Some(Winner { player, score });
        self.sessions[index].mark_won();
        self.stop_all();
    }

    pub fn stop_all(&mut self) {
        for session in &mut self.sessions {
            session.stop();
        }
    }

    /// Session 0's flag is the reference state; all sessions stay
    /// pause-synchronized because they are only ever toggled together.
    pub fn toggle_pause(&mut self) {
        for session in &mut self.sessions {
            session.toggle_pause();
        }
    }

    pub fn pause_label(&self) -> &'static str {
        if self.sessions.first().is_some_and(Session::is_paused) {
            "Resume"
        } else {
            "Pause"
        }
    }

    /// Stops and resets every session and panel, clears any winner, and
    /// re-runs the shared countdown. Returns whether the countdown started.
    pub fn restart(&mut self, rng: &mut impl Rng) -> bool {
        for session in &mut self.sessions {
            session.reset(rng);
        }
        self.winner = None;
        self.start()
    }

    /// Routes a key press to whichever session has it mapped.
    pub fn handle_key(&mut self, key: KeyCode) {
        for session in &mut self.sessions {
            session.handle_key(key);
        }
    }

    pub fn countdown(&self) -> Option<u8> {
        self.countdown
    }

    pub fn counting_down(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }
}
