use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone)]
pub enum LoopEvent {
    /// Time to advance the simulation by one tick.
    Tick,
    /// State changed since the last frame.
    Render,
    Input(Event),
}

/// Fixed-rate tick source interleaved with terminal input.
///
/// A render is requested after every tick and every input event, and only
/// then.
#[derive(Debug)]
pub struct EventLoop {
    tick_interval: Duration,
    last_tick: Instant,
    dirty: bool,
}

impl EventLoop {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            last_tick: Instant::now(),
            dirty: true,
        }
    }

    /// Sets the tick rate in ticks per second.
    pub fn with_tick_rate(rate: u32) -> Self {
        Self::new(Duration::from_secs(1) / rate.max(1))
    }

    /// Blocks until the next tick, render or input event.
    pub fn next(&mut self) -> io::Result<LoopEvent> {
        loop {
            let now = Instant::now();
            if now.duration_since(self.last_tick) >= self.tick_interval {
                self.last_tick = now;
                self.dirty = true;
                return Ok(LoopEvent::Tick);
            }
            if self.dirty {
                self.dirty = false;
                return Ok(LoopEvent::Render);
            }

            let timeout = (self.last_tick + self.tick_interval).saturating_duration_since(now);
            if event::poll(timeout)? {
                self.dirty = true;
                return Ok(LoopEvent::Input(event::read()?));
            }
        }
    }
}

/// `q`, `Esc` or `Ctrl-C`.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
