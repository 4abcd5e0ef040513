use crate::config::GameConfig;

/// The actor: a box that falls under gravity and jumps on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub velocity: f32,
}

impl Bird {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Bird {
            x,
            y,
            width,
            height,
            velocity: 0.0,
        }
    }

    /// A bird at the configured start position, at rest.
    pub fn spawn(config: &GameConfig) -> Self {
        Bird::new(
            config.bird_x,
            config.bird_start_y(),
            config.bird_width,
            config.bird_height,
        )
    }

    /// Integrates one tick: gravity into velocity, velocity into position.
    pub fn update(&mut self, gravity: f32) {
        self.velocity += gravity;
        self.y += self.velocity;
    }

    /// Replaces the current velocity, it does not add to it.
    pub fn jump(&mut self, strength: f32) {
        self.velocity = strength;
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_tick_from_rest() {
        let mut bird = Bird::new(100.0, 0.0, 40.0, 30.0);
        bird.update(0.3);
        assert_eq!(bird.velocity, 0.3);
        assert_eq!(bird.y, 0.3);
    }

    #[test]
    fn test_velocity_grows_by_gravity_each_tick() {
        let mut bird = Bird::new(100.0, 300.0, 40.0, 30.0);
        bird.velocity = -2.5;
        for _ in 0..50 {
            let before = bird.velocity;
            bird.update(0.3);
            assert_eq!(bird.velocity, before + 0.3);
        }
    }

    #[test]
    fn test_jump_overrides_velocity() {
        let mut bird = Bird::new(100.0, 300.0, 40.0, 30.0);
        bird.velocity = 12.0;
        bird.jump(-8.0);
        assert_eq!(bird.velocity, -8.0);
        bird.jump(-8.0);
        assert_eq!(bird.velocity, -8.0);
    }

    #[test]
    fn test_spawn_uses_config() {
        let bird = Bird::spawn(&GameConfig::default());
        assert_eq!((bird.x, bird.y), (100.0, 300.0));
        assert_eq!((bird.width, bird.height), (40.0, 30.0));
        assert_eq!(bird.velocity, 0.0);
    }
}
