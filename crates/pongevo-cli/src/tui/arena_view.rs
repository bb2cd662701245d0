use pongevo_engine::{Game, Side};
use rand::{Rng, seq::IndexedRandom as _};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        Block, Widget,
        canvas::{Canvas, Circle, Line as Stroke, Rectangle},
    },
};

const PADDLE_COLORS: [Color; 8] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::LightRed,
    Color::LightGreen,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub left: Color,
    pub right: Color,
    pub ball: Color,
    pub border: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            left: Color::White,
            right: Color::White,
            ball: Color::White,
            border: Color::White,
        }
    }
}

impl Palette {
    /// Random paddle colors. Purely cosmetic.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            left: PADDLE_COLORS.choose(rng).copied().unwrap_or(Color::White),
            right: PADDLE_COLORS.choose(rng).copied().unwrap_or(Color::White),
            ..Self::default()
        }
    }

    pub fn paddle(&self, side: Side) -> Color {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[must_use]
    pub fn border(self, border: Color) -> Self {
        Self { border, ..self }
    }
}

/// Draws the arena of a [`Game`] with scores, hit counters and elapsed time.
///
/// Engine coordinates grow downwards; the canvas grows upwards, so every `y`
/// is flipped against the arena height.
#[derive(Debug)]
pub struct ArenaView<'a> {
    game: &'a Game,
    palette: Palette,
    caption: Option<&'a str>,
    status: Option<&'a str>,
}

impl<'a> ArenaView<'a> {
    pub fn new(game: &'a Game, palette: Palette) -> Self {
        Self {
            game,
            palette,
            caption: None,
            status: None,
        }
    }

    pub fn caption(self, caption: &'a str) -> Self {
        Self {
            caption: Some(caption),
            ..self
        }
    }

    pub fn status(self, status: &'a str) -> Self {
        Self {
            status: Some(status),
            ..self
        }
    }

    fn score_line(&self) -> Line<'static> {
        let state = self.game.state();
        let sides = Side::ALL.map(|side| {
            format!(
                "{side} {} (hits {})",
                state.score(side),
                state.hits(side)
            )
        });
        Line::from(format!(
            " {}  |  {}  |  {:.1}s ",
            sides[0],
            sides[1],
            self.game.elapsed().as_secs_f64()
        ))
        .centered()
    }
}

impl Widget for ArenaView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &ArenaView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let game = self.game;
        let palette = self.palette;
        let arena = game.arena();
        let width = f64::from(arena.width);
        let height = f64::from(arena.height);

        let mut block = Block::bordered()
            .border_style(Style::default().fg(palette.border))
            .title_bottom(self.score_line());
        if let Some(caption) = self.caption {
            block = block.title(Line::from(format!(" {caption} ")).centered());
        }
        if let Some(status) = self.status {
            block = block.title(Line::from(format!(" {status} ")).right_aligned());
        }

        Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                ctx.draw(&Stroke {
                    x1: width / 2.0,
                    y1: 0.0,
                    x2: width / 2.0,
                    y2: height,
                    color: Color::DarkGray,
                });
                for side in Side::ALL {
                    let paddle = game.paddle(side);
                    let paddle_height = f64::from(paddle.height());
                    ctx.draw(&Rectangle {
                        x: f64::from(paddle.x()),
                        y: height - f64::from(paddle.y()) - paddle_height,
                        width: f64::from(paddle.width()),
                        height: paddle_height,
                        color: palette.paddle(side),
                    });
                }
                let ball = game.ball();
                ctx.draw(&Circle {
                    x: f64::from(ball.x()),
                    y: height - f64::from(ball.y()),
                    radius: f64::from(ball.radius()),
                    color: palette.ball,
                });
            })
            .render(area, buf);
    }
}
