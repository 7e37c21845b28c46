use anyhow::{Context, Result};

use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::gfx::{GraphicsContext, WgpuContext, WgpuTexture};
use tessera_engine::input::{InputFrame, Key};
use tessera_engine::paint::Color;
use tessera_engine::quad::AtlasQuad;
use tessera_engine::scene::{self, Projection, SpinState};
use tessera_engine::texture::TextureData;

use crate::config::DemoConfig;

/// Speed change per arrow-key press.
const SPEED_STEP: f32 = 0.25;

/// The spinning atlas quad.
///
/// Keys: Up/Down change speed, Left/Right step through atlas tiles,
/// R shows the whole texture again, Space pauses, Escape quits.
pub struct SpinDemo {
    config: DemoConfig,
    spin: SpinState,
    projection: Projection,
    paused: bool,

    /// Built on the first frame, once a device exists.
    scene: Option<Scene>,
}

struct Scene {
    quad: AtlasQuad<WgpuContext>,
    texture: WgpuTexture,
}

impl SpinDemo {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            spin: SpinState::new(config.rotation_speed),
            projection: Projection::default(),
            paused: false,
            scene: None,
            config,
        }
    }

    /// Speed and pause keys. Returns `true` when the speed changed.
    fn apply_spin_keys(&mut self, input: &InputFrame) -> bool {
        if input.keys_pressed.contains(&Key::Space) {
            self.paused = !self.paused;
            log::info!("{}", if self.paused { "paused" } else { "resumed" });
        }

        let before = self.spin.speed();
        if input.key_hit(Key::ArrowUp) {
            self.spin.nudge(SPEED_STEP);
        }
        if input.key_hit(Key::ArrowDown) {
            self.spin.nudge(-SPEED_STEP);
        }
        self.spin.speed() != before
    }

    fn advance(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        if self.config.fixed_step {
            self.spin.advance();
        } else {
            self.spin.advance_by(dt);
        }
    }
}

impl Scene {
    fn build(gfx: &mut WgpuContext, config: &DemoConfig) -> Result<Self> {
        let data = load_texture(config);

        let mut quad = AtlasQuad::new(gfx, config.atlas_size, config.atlas_size)
            .context("failed to build atlas quad")?;

        if let Some(tile) = config.initial_tile {
            if let Err(e) = quad.set_tile_uvs(gfx, tile) {
                log::warn!("{e}; showing the full texture");
            }
        }

        let texture = upload_atlas(gfx, &data, config.atlas_size)?;
        log::info!("atlas {}x{} tiles", config.atlas_size, config.atlas_size);

        Ok(Self { quad, texture })
    }

    /// Tile keys. Arrow keys wrap around the atlas.
    fn apply_tile_keys(&mut self, gfx: &mut WgpuContext, input: &InputFrame) {
        if input.keys_pressed.contains(&Key::R) {
            self.quad.reset_uvs(gfx);
            log::info!("showing full texture");
            return;
        }

        let delta = i64::from(input.key_hit(Key::ArrowRight)) - i64::from(input.key_hit(Key::ArrowLeft));
        if delta == 0 {
            return;
        }

        let count = self.quad.grid().tile_count();
        let Some(next) = step_tile(self.quad.current_tile(), delta, count) else {
            return;
        };
        match self.quad.set_tile_uvs(gfx, next) {
            Ok(()) => log::info!("tile {next}"),
            Err(e) => log::warn!("{e}"),
        }
    }
}

impl App for SpinDemo {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }

        // ── Lazy GPU setup ────────────────────────────────────────────────
        if self.scene.is_none() {
            match Scene::build(ctx.gpu.graphics(), &self.config) {
                Ok(s) => self.scene = Some(s),
                Err(e) => {
                    log::error!("{e:#}");
                    return AppControl::Exit;
                }
            }
        }

        // ── Input ─────────────────────────────────────────────────────────
        if self.apply_spin_keys(ctx.input_frame) {
            let speed = self.spin.speed();
            log::info!("rotation speed {speed:.2}");
            ctx.window
                .set_title(&format!("{} (speed {speed:.2})", self.config.title));
        }

        // ── Update ────────────────────────────────────────────────────────
        self.advance(ctx.time.dt);

        let projection = self.projection.matrix(ctx.aspect());
        let mvp = scene::mvp(&projection, &self.spin.model_matrix());

        let Some(active) = self.scene.as_mut() else {
            return AppControl::Continue;
        };
        active.apply_tile_keys(ctx.gpu.graphics(), ctx.input_frame);

        // ── Render ────────────────────────────────────────────────────────
        ctx.render(Color::BACKGROUND, |gfx| {
            active.quad.set_transform(gfx, &mvp);
            active.quad.render(gfx, &active.texture);
        })
    }
}

/// Next tile index after moving `delta` from `current`, wrapping.
///
/// With nothing selected, forward starts at the first tile and backward at
/// the last.
fn step_tile(current: Option<u32>, delta: i64, count: u64) -> Option<u32> {
    if count == 0 {
        return None;
    }
    let count = i64::try_from(count).ok()?;
    let next = match current {
        Some(i) => (i64::from(i) + delta).rem_euclid(count),
        None if delta >= 0 => (delta - 1).rem_euclid(count),
        None => delta.rem_euclid(count),
    };
    u32::try_from(next).ok()
}

fn load_texture(config: &DemoConfig) -> TextureData {
    let Some(path) = &config.atlas_path else {
        return TextureData::checkerboard(config.atlas_size);
    };

    let loaded = std::fs::read(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .and_then(|bytes| {
            TextureData::from_image_bytes(&bytes)
                .with_context(|| format!("failed to decode {}", path.display()))
        });

    match loaded {
        Ok(data) => data,
        Err(e) => {
            log::warn!("{e:#}; using a checkerboard");
            TextureData::checkerboard(config.atlas_size)
        }
    }
}

/// Uploads the atlas image, or a checkerboard if the device rejects it
/// (for example, an image larger than the device's texture size limit).
fn upload_atlas<C: GraphicsContext>(
    gfx: &mut C,
    data: &TextureData,
    fallback_size: u32,
) -> Result<C::Texture> {
    match gfx.create_texture(data, "tessera atlas") {
        Ok(texture) => {
            log::info!("atlas texture {}x{} px", data.width(), data.height());
            Ok(texture)
        }
        Err(e) => {
            log::warn!("{e}; using a checkerboard");
            let fallback = TextureData::checkerboard(fallback_size);
            gfx.create_texture(&fallback, "tessera atlas")
                .context("failed to create the fallback atlas texture")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tessera_engine::gfx::{GfxCall, RecordingContext};

    // ── tile stepping ─────────────────────────────────────────────────────

    #[test]
    fn steps_wrap_around() {
        assert_eq!(step_tile(Some(15), 1, 16), Some(0));
        assert_eq!(step_tile(Some(0), -1, 16), Some(15));
        assert_eq!(step_tile(Some(5), 1, 16), Some(6));
    }

    #[test]
    fn first_step_from_full_texture() {
        assert_eq!(step_tile(None, 1, 16), Some(0));
        assert_eq!(step_tile(None, -1, 16), Some(15));
    }

    #[test]
    fn empty_grid_has_no_tiles() {
        assert_eq!(step_tile(Some(0), 1, 0), None);
    }

    // ── spin keys ─────────────────────────────────────────────────────────

    fn pressed(keys: &[Key]) -> InputFrame {
        InputFrame {
            keys_pressed: keys.iter().copied().collect::<HashSet<_>>(),
            ..InputFrame::default()
        }
    }

    #[test]
    fn arrow_keys_nudge_speed() {
        let mut demo = SpinDemo::new(DemoConfig::default());
        assert!(demo.apply_spin_keys(&pressed(&[Key::ArrowUp])));
        assert_eq!(demo.spin.speed(), 1.25);
        assert!(demo.apply_spin_keys(&pressed(&[Key::ArrowDown])));
        assert_eq!(demo.spin.speed(), 1.0);
    }

    #[test]
    fn speed_change_reported_only_when_clamp_allows() {
        let config = DemoConfig {
            rotation_speed: 0.0,
            ..DemoConfig::default()
        };
        let mut demo = SpinDemo::new(config);
        assert!(!demo.apply_spin_keys(&pressed(&[Key::ArrowDown])));
    }

    #[test]
    fn paused_spin_does_not_advance() {
        let mut demo = SpinDemo::new(DemoConfig::default());
        demo.apply_spin_keys(&pressed(&[Key::Space]));
        demo.advance(0.5);
        assert_eq!(demo.spin.angle, 0.0);

        demo.apply_spin_keys(&pressed(&[Key::Space]));
        demo.advance(0.5);
        assert!(demo.spin.angle > 0.0);
    }

    #[test]
    fn fixed_step_ignores_dt() {
        let config = DemoConfig {
            fixed_step: true,
            ..DemoConfig::default()
        };
        let mut demo = SpinDemo::new(config);
        demo.advance(10.0);
        assert!((demo.spin.angle - 0.01).abs() < 1e-7);
    }

    // ── texture loading ───────────────────────────────────────────────────

    #[test]
    fn default_texture_is_checkerboard() {
        let data = load_texture(&DemoConfig::default());
        assert_eq!((data.width(), data.height()), (4, 4));
        assert_eq!(data.texel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(data.texel(1, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn unreadable_atlas_falls_back() {
        let config = DemoConfig {
            atlas_path: Some("/nonexistent/tessera-atlas.png".into()),
            atlas_size: 8,
            ..DemoConfig::default()
        };
        let data = load_texture(&config);
        assert_eq!(data.width(), 8);
    }

    fn created_textures(ctx: &RecordingContext) -> Vec<(u32, u32)> {
        ctx.calls()
            .into_iter()
            .filter_map(|c| match c {
                GfxCall::CreateTexture { width, height, .. } => Some((width, height)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn atlas_within_device_limit_is_uploaded() {
        let mut ctx = RecordingContext::new();
        ctx.limit_texture_dimension(16);

        let texture = upload_atlas(&mut ctx, &TextureData::checkerboard(16), 4);
        assert!(texture.is_ok());
        assert_eq!(created_textures(&ctx), vec![(16, 16)]);
    }

    #[test]
    fn oversized_atlas_falls_back_to_checkerboard() {
        let mut ctx = RecordingContext::new();
        ctx.limit_texture_dimension(8);

        let texture = upload_atlas(&mut ctx, &TextureData::checkerboard(9), 4);
        assert!(texture.is_ok());
        assert_eq!(created_textures(&ctx), vec![(4, 4)]);
    }

    #[test]
    fn rejected_fallback_is_an_error() {
        let mut ctx = RecordingContext::new();
        ctx.limit_texture_dimension(2);

        assert!(upload_atlas(&mut ctx, &TextureData::checkerboard(9), 4).is_err());
        assert!(created_textures(&ctx).is_empty());
    }
}
