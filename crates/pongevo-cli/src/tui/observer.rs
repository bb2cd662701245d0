use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;
use pongevo_training::observer::{MatchFrame, MatchObserver};
use ratatui::DefaultTerminal;
use tracing::warn;

use crate::tui::{ArenaView, Palette, is_quit_key};

/// Shows training matches in the terminal.
///
/// Frames are throttled to `fps`, except that a frame in which a point is
/// scored is always drawn. `q`, `Esc` and `Ctrl-C` request an interrupt; once
/// requested it stays requested.
#[derive(Debug)]
pub struct TerminalObserver<'a> {
    terminal: &'a mut DefaultTerminal,
    frame_interval: Duration,
    last_draw: Option<Instant>,
    palette: Palette,
    caption: String,
    stop_requested: bool,
}

impl<'a> TerminalObserver<'a> {
    pub fn new(terminal: &'a mut DefaultTerminal, fps: u32) -> Self {
        Self {
            terminal,
            frame_interval: Duration::from_secs(1) / fps.max(1),
            last_draw: None,
            palette: Palette::default(),
            caption: String::new(),
            stop_requested: false,
        }
    }

    fn read_quit_key() -> io::Result<bool> {
        while event::poll(Duration::ZERO)? {
            if let Some(key) = event::read()?.as_key_press_event()
                && is_quit_key(&key)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl MatchObserver for TerminalObserver<'_> {
    fn poll_interrupt(&mut self) -> bool {
        if !self.stop_requested {
            match Self::read_quit_key() {
                Ok(quit) => self.stop_requested = quit,
                Err(e) => warn!(error = %e, "failed to read terminal input"),
            }
        }
        self.stop_requested
    }

    fn draw(&mut self, frame: &MatchFrame<'_>) {
        if self.caption != frame.caption {
            // New match, new colors
            self.caption = frame.caption.to_owned();
            self.palette = Palette::random(&mut rand::rng());
            self.last_draw = None;
        }

        let now = Instant::now();
        let scored = frame.report.events.point.is_some();
        if !scored
            && self
                .last_draw
                .is_some_and(|last| now.duration_since(last) < self.frame_interval)
        {
            return;
        }
        self.last_draw = Some(now);

        let view = ArenaView::new(frame.game, self.palette)
            .caption(&self.caption)
            .status("q: stop");
        if let Err(e) = self.terminal.draw(|f| f.render_widget(&view, f.area())) {
            warn!(error = %e, "failed to draw match");
        }
    }
}
