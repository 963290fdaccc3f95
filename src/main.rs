use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

mod duel;
mod food;
mod grid;
mod session;
mod snake;
mod ui;

use duel::Duel;
use grid::{Board, Direction};
use session::{HighScoreStore, PlayerId, SessionConfig};

/// One simulation step per 100ms.
const TICK_RATE: Duration = Duration::from_millis(100);
/// The shared countdown advances once per second.
const COUNTDOWN_RATE: Duration = Duration::from_secs(1);

fn main() -> Result<(), io::Error> {
    // Set up logging before anything else
    WriteLogger::init(
        LevelFilter::Info,
        Config::default(),
        File::create("snake-duel.log")?,
    )
    .expect("Failed to initialize logger");

    info!("Starting snake duel");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut rng = rand::thread_rng();
    let mut duel = Duel::new(
        vec![player_one_config(), player_two_config()],
        Board::default(),
        &mut rng,
    );

    // Run the cooperative loop: both timers live here, the game objects only
    // ever see discrete ticks
    let mut last_tick = Instant::now();
    let mut last_countdown = Instant::now();

    'game: loop {
        terminal.draw(|f| ui::render(f, &duel))?;

        // Handle input
        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break 'game,
                    KeyCode::Enter => {
                        if duel.start() {
                            last_countdown = Instant::now();
                        }
                    }
                    KeyCode::Char(' ') => duel.toggle_pause(),
                    KeyCode::Char('r') => {
                        if duel.restart(&mut rng) {
                            last_countdown = Instant::now();
                        }
                    }
                    code => duel.handle_key(code),
                }
            }
        }

        if duel.counting_down() && last_countdown.elapsed() >= COUNTDOWN_RATE {
            duel.countdown_tick();
            last_countdown = Instant::now();
        }

        if last_tick.elapsed() >= TICK_RATE {
            duel.tick(&mut rng);
            last_tick = Instant::now();
        }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn player_one_config() -> SessionConfig {
    session_config(
        1,
        [
            (KeyCode::Char('w'), Direction::Up),
            (KeyCode::Char('s'), Direction::Down),
            (KeyCode::Char('a'), Direction::Left),
            (KeyCode::Char('d'), Direction::Right),
        ],
        ui::PLAYER_ONE_PALETTE,
    )
}

fn player_two_config() -> SessionConfig {
    session_config(
        2,
        [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Right, Direction::Right),
        ],
        ui::PLAYER_TWO_PALETTE,
    )
}

fn session_config(
    player: PlayerId,
    controls: [(KeyCode, Direction); 4],
    palette: ui::Palette,
) -> SessionConfig {
    SessionConfig {
        player,
        controls: HashMap::from(controls),
        palette,
        store: HighScoreStore::for_player(player),
    }
}
