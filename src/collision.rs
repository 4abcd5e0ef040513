//! Termination checks for a bird against the screen and the pipes.
//!
//! Every comparison is strict: a bird exactly touching a gap edge or the
//! screen edge survives.

use crate::bird::Bird;
use crate::pipe::Pipe;

/// Why a bird's attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    OutOfBounds,
    Collision,
}

pub fn out_of_bounds(bird: &Bird, screen_height: f32) -> bool {
    bird.bottom() > screen_height || bird.y < 0.0
}

/// Horizontal overlap plus the bird's box reaching outside the gap.
pub fn collides(bird: &Bird, pipe: &Pipe, screen_height: f32) -> bool {
    bird.right() > pipe.x
        && bird.x < pipe.x + pipe.width
        && (bird.y < pipe.top_height || bird.bottom() > pipe.bottom_y(screen_height))
}

/// Bounds first, then every pipe in order.
pub fn check(bird: &Bird, pipes: &[Pipe], screen_height: f32) -> Option<Termination> {
    if out_of_bounds(bird, screen_height) {
        return Some(Termination::OutOfBounds);
    }
    if pipes.iter().any(|pipe| collides(bird, pipe, screen_height)) {
        return Some(Termination::Collision);
    }
    None
}
