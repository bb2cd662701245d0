//! Arena geometry and the two moving bodies.
//!
//! Coordinates follow screen conventions: the origin is the top-left corner of
//! the arena, `x` grows to the right and `y` grows downwards. A paddle's `(x, y)`
//! is its top-left corner, the ball's `(x, y)` is its center.

pub use self::{arena::*, ball::*, paddle::*};

pub(crate) mod arena;
pub(crate) mod ball;
pub(crate) mod paddle;
