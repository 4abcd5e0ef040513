use crate::config::GameConfig;
use rand::Rng;

/// A pair of pipe segments with a passable gap between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: f32,
    pub width: f32,
    /// Height of the segment hanging from the top of the screen.
    pub top_height: f32,
    /// Height of the segment standing on the bottom of the screen.
    pub bottom_height: f32,
}

impl Pipe {
    /// Creates a pipe at `x` with a random split.
    ///
    /// `top_height` is a whole number drawn uniformly from
    /// `[margin, screen_height - gap - margin]`, so both segments keep at
    /// least `margin` pixels and `top + gap + bottom == screen_height`.
    pub fn new<R: Rng>(x: f32, config: &GameConfig, rng: &mut R) -> Self {
        // Whole pixels that stay inside the margin on both sides.
        let low = config.pipe_margin.ceil() as i64;
        let high = config.max_top_height().floor() as i64;
        let top_height = if high > low {
            rng.random_range(low..=high) as f32
        } else {
            config.pipe_margin
        };
        Pipe::with_top_height(x, top_height, config)
    }

    /// Creates a pipe with a fixed split.
    pub fn with_top_height(x: f32, top_height: f32, config: &GameConfig) -> Self {
        Pipe {
            x,
            width: config.pipe_width,
            top_height,
            bottom_height: config.screen_height - top_height - config.pipe_gap,
        }
    }

    /// Spawn position for fresh pipes, just past the right edge.
    pub fn spawn_x(config: &GameConfig) -> f32 {
        config.screen_width + config.spawn_offset
    }

    pub fn update(&mut self, speed: f32) {
        self.x -= speed;
    }

    /// True once the right edge has passed the left screen boundary.
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }

    /// Y coordinate where the bottom segment starts.
    pub fn bottom_y(&self, screen_height: f32) -> f32 {
        screen_height - self.bottom_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_split_always_fills_screen() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let pipe = Pipe::new(600.0, &config, &mut rng);
            assert_eq!(
                pipe.top_height + config.pipe_gap + pipe.bottom_height,
                config.screen_height
            );
            assert!(pipe.top_height >= 50.0 && pipe.top_height <= 400.0);
            assert!(pipe.bottom_height >= 50.0);
            assert_eq!(pipe.top_height.fract(), 0.0);
        }
    }

    #[test]
    fn test_moves_left_at_constant_speed() {
        let config = GameConfig::default();
        let mut pipe = Pipe::with_top_height(600.0, 200.0, &config);
        for _ in 0..200 {
            pipe.update(3.0);
        }
        assert_eq!(pipe.x, 0.0);
        assert!(!pipe.is_off_screen());
    }

    #[test]
    fn test_off_screen_only_when_right_edge_passes_zero() {
        let config = GameConfig::default();
        let pipe = Pipe::with_top_height(-50.0, 200.0, &config);
        assert!(!pipe.is_off_screen());
        let pipe = Pipe::with_top_height(-50.5, 200.0, &config);
        assert!(pipe.is_off_screen());
    }

    #[test]
    fn test_fractional_margin_is_respected() {
        let mut config = GameConfig::default();
        config.pipe_margin = 50.5;
        assert!(config.validate().is_ok());
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..5_000 {
            let pipe = Pipe::new(600.0, &config, &mut rng);
            assert!(pipe.top_height >= 50.5, "top {} below margin", pipe.top_height);
            assert!(pipe.bottom_height >= 50.5, "bottom {} below margin", pipe.bottom_height);
            assert_eq!(pipe.top_height.fract(), 0.0);
        }
    }

    #[test]
    fn test_degenerate_range_uses_margin() {
        let mut config = GameConfig::default();
        config.pipe_gap = 500.0;
        let mut rng = StdRng::seed_from_u64(1);
        let pipe = Pipe::new(0.0, &config, &mut rng);
        assert_eq!(pipe.top_height, 50.0);
        assert_eq!(pipe.bottom_height, 50.0);
    }
}
