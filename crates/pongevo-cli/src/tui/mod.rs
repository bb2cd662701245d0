//! Terminal rendering shared by `train --tui` and `play`.

pub use self::{
    arena_view::{ArenaView, Palette},
    event_loop::{EventLoop, LoopEvent, is_quit_key},
    observer::TerminalObserver,
};

mod arena_view;
mod event_loop;
mod observer;
