use crate::config::GameConfig;
use crate::simulation::GameState;
use ggez::glam::Vec2;
use ggez::graphics::{self, Canvas, Color, DrawMode, DrawParam, Image, Mesh, Rect, Text};
use ggez::{Context, GameResult};

/// Resource directory searched for sprites, relative to the working directory.
pub const ASSET_DIR: &str = "assets";

const BACKGROUND_SPRITE: &str = "/background.png";
const BIRD_SPRITE: &str = "/bird.png";
const PIPE_SPRITE: &str = "/pipe_top.png";

/// Optional images. Anything missing is drawn as a flat rectangle instead.
#[derive(Default)]
struct Sprites {
    background: Option<Image>,
    bird: Option<Image>,
    // Drawn as is for top segments and flipped for bottom ones.
    pipe: Option<Image>,
}

impl Sprites {
    fn load(ctx: &mut Context) -> GameResult<Self> {
        Ok(Sprites {
            background: load_sprite(ctx, BACKGROUND_SPRITE)?,
            bird: load_sprite(ctx, BIRD_SPRITE)?,
            pipe: load_sprite(ctx, PIPE_SPRITE)?,
        })
    }
}

fn load_sprite(ctx: &mut Context, path: &str) -> GameResult<Option<Image>> {
    if !ctx.fs.exists(path) {
        log::debug!("No sprite at {}, drawing a rectangle", path);
        return Ok(None);
    }
    let image = Image::from_path(ctx, path)?;
    log::info!("Loaded sprite {}", path);
    Ok(Some(image))
}

/// Scale that stretches an image of `image_w` x `image_h` pixels over a
/// `w` x `h` rectangle. Zero for an empty image.
pub fn stretch_scale(image_w: u32, image_h: u32, w: f32, h: f32) -> Vec2 {
    if image_w == 0 || image_h == 0 {
        return Vec2::ZERO;
    }
    Vec2::new(w / image_w as f32, h / image_h as f32)
}

/// Drawing resources shared by every frame, built once by the app that owns
/// the window and passed to each draw call.
pub struct RenderContext {
    // Unit square scaled and tinted for every rectangle on screen.
    unit: Mesh,
    sprites: Sprites,
    screen_width: f32,
    screen_height: f32,
    sky: Color,
    pipe: Color,
    bird: Color,
}

impl RenderContext {
    pub fn new(ctx: &mut Context, config: &GameConfig) -> GameResult<Self> {
        let unit = Mesh::new_rectangle(
            ctx,
            DrawMode::fill(),
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Color::WHITE,
        )?;
        Ok(RenderContext {
            unit,
            sprites: Sprites::load(ctx)?,
            screen_width: config.screen_width,
            screen_height: config.screen_height,
            sky: Color::from_rgb(112, 197, 206),
            pipe: Color::from_rgb(100, 170, 40),
            bird: Color::from_rgb(245, 200, 66),
        })
    }

    /// Starts a frame cleared to the sky colour, with the background
    /// sprite stretched over the screen when there is one.
    pub fn begin_frame(&self, ctx: &mut Context) -> Canvas {
        let mut canvas = Canvas::from_frame(ctx, self.sky);
        if let Some(background) = &self.sprites.background {
            let scale = stretch_scale(
                background.width(),
                background.height(),
                self.screen_width,
                self.screen_height,
            );
            canvas.draw(background, DrawParam::new().scale(scale));
        }
        canvas
    }

    fn draw_rect(&self, canvas: &mut Canvas, x: f32, y: f32, w: f32, h: f32, color: Color) {
        canvas.draw(
            &self.unit,
            DrawParam::new()
                .dest(Vec2::new(x, y))
                .scale(Vec2::new(w, h))
                .color(color),
        );
    }

    fn draw_pipe_segment(&self, canvas: &mut Canvas, x: f32, y: f32, w: f32, h: f32, flip: bool) {
        let Some(image) = &self.sprites.pipe else {
            self.draw_rect(canvas, x, y, w, h, self.pipe);
            return;
        };
        let mut scale = stretch_scale(image.width(), image.height(), w, h);
        let mut dest = Vec2::new(x, y);
        if flip {
            // A negative y scale draws upwards from the segment's lower edge.
            scale.y = -scale.y;
            dest.y += h;
        }
        canvas.draw(image, DrawParam::new().dest(dest).scale(scale));
    }

    /// Draws the pipes and every live bird.
    pub fn draw_world<B>(&self, canvas: &mut Canvas, state: &GameState<B>) {
        for pipe in &state.pipes {
            self.draw_pipe_segment(canvas, pipe.x, 0.0, pipe.width, pipe.top_height, false);
            self.draw_pipe_segment(
                canvas,
                pipe.x,
                pipe.bottom_y(self.screen_height),
                pipe.width,
                pipe.bottom_height,
                true,
            );
        }

        for agent in &state.agents {
            let bird = &agent.bird;
            let Some(image) = &self.sprites.bird else {
                self.draw_rect(canvas, bird.x, bird.y, bird.width, bird.height, self.bird);
                continue;
            };
            let scale = stretch_scale(image.width(), image.height(), bird.width, bird.height);
            let dest = Vec2::new(bird.x, bird.y);
            canvas.draw(image, DrawParam::new().dest(dest).scale(scale));
        }
    }

    /// Draws text in the top left corner.
    pub fn draw_hud(&self, canvas: &mut Canvas, text: String) {
        let mut text = Text::new(text);
        text.set_scale(24.0);
        canvas.draw(
            &text,
            graphics::DrawParam::new()
                .dest(Vec2::new(10.0, 10.0))
                .color(Color::BLACK),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stretch_scale_fits_sprite_to_rect() {
        // A 34x24 bird sprite over the default 40x30 bird.
        let scale = stretch_scale(34, 24, 40.0, 30.0);
        assert!((scale.x * 34.0 - 40.0).abs() < 1e-4);
        assert!((scale.y * 24.0 - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_stretch_scale_of_empty_image_is_zero() {
        assert_eq!(stretch_scale(0, 24, 40.0, 30.0), Vec2::ZERO);
        assert_eq!(stretch_scale(34, 0, 40.0, 30.0), Vec2::ZERO);
    }
}
