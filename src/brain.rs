use crate::bird::Bird;
use crate::pipe::Pipe;

/// Number of sensor values handed to a brain each tick.
pub const INPUT_COUNT: usize = 3;

/// A brain output strictly above this makes the bird jump.
pub const JUMP_THRESHOLD: f32 = 0.5;

/// A decision function: one scalar out of a fixed-size sensor vector.
///
/// The game loop only feeds sensors in and reads the jump decision back; the
/// representation behind it is up to the implementor.
pub trait Brain {
    fn activate(&self, inputs: &[f32; INPUT_COUNT]) -> f32;

    fn wants_jump(&self, sensors: &Sensors) -> bool {
        self.activate(&sensors.to_array()) > JUMP_THRESHOLD
    }
}

impl<F> Brain for F
where
    F: Fn(&[f32; INPUT_COUNT]) -> f32,
{
    fn activate(&self, inputs: &[f32; INPUT_COUNT]) -> f32 {
        self(inputs)
    }
}

/// What a bird sees of the pipe ahead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensors {
    pub bird_y: f32,
    /// Vertical distance to the bottom edge of the top segment.
    pub top_distance: f32,
    /// Vertical distance to the top edge of the bottom segment.
    pub bottom_distance: f32,
}

impl Sensors {
    pub fn read(bird: &Bird, pipe: &Pipe, screen_height: f32) -> Self {
        Sensors {
            bird_y: bird.y,
            top_distance: (bird.y - pipe.top_height).abs(),
            bottom_distance: (bird.y - pipe.bottom_y(screen_height)).abs(),
        }
    }

    pub fn to_array(&self) -> [f32; INPUT_COUNT] {
        [self.bird_y, self.top_distance, self.bottom_distance]
    }
}
