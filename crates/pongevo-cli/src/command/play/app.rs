use std::mem;

use crossterm::event::{Event, KeyCode};
use pongevo_controller::{controller::Controller, observation::Observation};
use pongevo_engine::{Direction, Game, PaddleAction, Side};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::tui::{ArenaView, EventLoop, LoopEvent, Palette, is_quit_key};

/// The human always plays the left paddle.
const HUMAN: Side = Side::Left;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayState {
    Playing,
    Paused,
    Over { winner: Side },
}

#[derive(Debug)]
pub struct PlayApp {
    game: Game,
    opponent: Box<dyn Controller>,
    caption: String,
    point_cap: u32,
    /// Move requested since the last tick.
    pending: PaddleAction,
    state: PlayState,
    palette: Palette,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(
        game: Game,
        opponent: Box<dyn Controller>,
        opponent_name: &str,
        point_cap: u32,
    ) -> Self {
        Self {
            game,
            opponent,
            caption: format!("you vs {opponent_name}"),
            point_cap,
            pending: PaddleAction::Hold,
            state: PlayState::Playing,
            palette: Palette::random(&mut rand::rng()),
            is_exiting: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal, tick_rate: u32) -> anyhow::Result<()> {
        let mut events = EventLoop::with_tick_rate(tick_rate);
        while !self.is_exiting {
            match events.next()? {
                LoopEvent::Tick => self.update(),
                LoopEvent::Render => {
                    terminal.draw(|f| self.draw(f))?;
                }
                LoopEvent::Input(event) => self.handle_event(&event),
            }
        }
        Ok(())
    }

    fn restart(&mut self) {
        self.game.reset();
        self.pending = PaddleAction::Hold;
        self.state = PlayState::Playing;
        self.palette = Palette::random(&mut rand::rng());
    }

    fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_press_event() else {
            return;
        };
        if is_quit_key(&key) {
            self.is_exiting = true;
            return;
        }

        let is_playing = self.state == PlayState::Playing;
        match key.code {
            KeyCode::Char('w') | KeyCode::Up if is_playing => {
                self.pending = PaddleAction::Move(Direction::Up);
            }
            KeyCode::Char('s') | KeyCode::Down if is_playing => {
                self.pending = PaddleAction::Move(Direction::Down);
            }
            KeyCode::Char('p') => {
                self.state = match self.state {
                    PlayState::Playing => PlayState::Paused,
                    PlayState::Paused => PlayState::Playing,
                    over @ PlayState::Over { .. } => over,
                };
            }
            KeyCode::Char('r') => self.restart(),
            _ => {}
        }
    }

    fn update(&mut self) {
        if self.state != PlayState::Playing {
            return;
        }
        let observation = Observation::of(&self.game, HUMAN.opponent());
        let opponent = self.opponent.decide(&observation).action();
        // A rejected move at the edge just leaves the paddle where it is
        let report = self.game.step(mem::take(&mut self.pending), opponent);
        if let Some(winner) = Side::ALL
            .into_iter()
            .find(|&side| report.state.score(side) >= self.point_cap)
        {
            self.state = PlayState::Over { winner };
        }
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let first_to = format!("first to {}", self.point_cap);
        let (status, border, help) = match self.state {
            PlayState::Playing => (
                first_to.as_str(),
                Color::White,
                "Controls: W/S or ↑/↓ (Move) | P (Pause) | R (Restart) | Q (Quit)",
            ),
            PlayState::Paused => ("PAUSED", Color::Yellow, "Controls: P (Resume) | Q (Quit)"),
            PlayState::Over { winner } if winner == HUMAN => {
                ("YOU WIN", Color::Green, "Controls: R (Restart) | Q (Quit)")
            }
            PlayState::Over { .. } => ("YOU LOSE", Color::Red, "Controls: R (Restart) | Q (Quit)"),
        };
        let view = ArenaView::new(&self.game, self.palette.border(border))
            .caption(&self.caption)
            .status(status);
        let help = Text::from(help)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(&view, main_area);
        frame.render_widget(help, help_area);
    }
}
