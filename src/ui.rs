use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use crate::duel::Duel;
use crate::grid::GRID_SIZE;
use crate::session::{Session, TARGET_SCORE};

/// Two-tone snake colors, injected per player at session construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub head: Color,
    pub body: Color,
}

/// Player 1: gold head, orange body.
pub const PLAYER_ONE_PALETTE: Palette = Palette {
    head: Color::Rgb(255, 215, 0),
    body: Color::Rgb(255, 165, 0),
};

/// Player 2: lime head, forest-green body.
pub const PLAYER_TWO_PALETTE: Palette = Palette {
    head: Color::Rgb(50, 205, 50),
    body: Color::Rgb(34, 139, 34),
};

/// Purple accent for the food marker.
const FOOD_COLOR: Color = Color::Rgb(138, 43, 226);

pub fn render(frame: &mut Frame, duel: &Duel) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title + shared controls state
            Constraint::Min(0),    // One board panel per player
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new(header_line(duel))
            .alignment(Alignment::Left)
            .block(Block::default().borders(Borders::ALL)),
        layout[0],
    );

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, duel.sessions().len() as u32);
            duel.sessions().len()
        ])
        .split(layout[1]);

    let idle_hint = duel.winner().is_none() && !duel.counting_down();
    for (session, &panel) in duel.sessions().iter().zip(panels.iter()) {
        render_panel(frame, panel, session, idle_hint);
    }

    frame.render_widget(
        Paragraph::new("Enter: start   Space: pause   r: restart   q: quit   P1: wasd   P2: arrows")
            .alignment(Alignment::Center),
        layout[2],
    );

    if let Some(n) = duel.countdown() {
        render_countdown(frame, layout[1], n);
    }
}

fn header_line(duel: &Duel) -> Line<'static> {
    match duel.winner() {
        Some(winner) => Line::from(format!(
            "SNAKE DUEL    Player {} wins! Score: {}    [r] rematch",
            winner.player, winner.score
        ))
        .bold(),
        None => Line::from(format!(
            "SNAKE DUEL    First to {TARGET_SCORE}    [{}]",
            duel.pause_label()
        )),
    }
}

fn render_panel(frame: &mut Frame, area: Rect, session: &Session, idle_hint: bool) {
    let title = format!(
        " Player {}  Score: {}  High Score: {} ",
        session.player(),
        session.score(),
        session.high_score()
    );
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);

    frame.render_widget(block, area);
    frame.render_widget(BoardView { session }, inner);

    if session.has_won() {
        overlay(
            frame,
            inner,
            format!("WINNER!\nFinal Score: {}", session.score()),
        );
    } else if session.is_over() {
        overlay(
            frame,
            inner,
            format!("GAME OVER\nFinal Score: {}\nPress r to play again", session.score()),
        );
    } else if session.is_paused() {
        overlay(frame, inner, "Paused".to_string());
    } else if !session.is_ticking() && idle_hint {
        overlay(frame, inner, "Press Enter to start".to_string());
    }
}

fn overlay(frame: &mut Frame, area: Rect, text: String) {
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center),
        centered(area, 4),
    );
}

fn render_countdown(frame: &mut Frame, area: Rect, seconds: u8) {
    let popup = centered(area, 3);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(format!("Starting in {seconds}"))
            .alignment(Alignment::Center)
            .bold()
            .block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

/// A horizontally-centered strip of the given height in the middle of `area`.
fn centered(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let width = area.width.min(24).max(area.width / 3);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

/// Draws one session's board: circle segments in the player's palette with a
/// distinct head shade, and the triangle food marker in the accent color.
/// One grid cell maps to one terminal cell.
struct BoardView<'a> {
    session: &'a Session,
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let board = self.session.board();
        let palette = self.session.palette();

        for (i, cell) in self.session.snake().segments().enumerate() {
            // A dead snake's head can sit outside the board
            if !board.contains(cell) {
                continue;
            }
            let x = area.x + (cell.x / GRID_SIZE) as u16;
            let y = area.y + (cell.y / GRID_SIZE) as u16;
            if x >= area.right() || y >= area.bottom() {
                continue;
            }
            let color = if i == 0 { palette.head } else { palette.body };
            buf[(x, y)].set_symbol("●").set_style(Style::new().fg(color));
        }

        if let Some(food) = self.session.food() {
            let x = area.x + (food.x / GRID_SIZE) as u16;
            let y = area.y + (food.y / GRID_SIZE) as u16;
            if x < area.right() && y < area.bottom() {
                buf[(x, y)].set_symbol("▲").set_style(Style::new().fg(FOOD_COLOR));
            }
        }
    }
}
