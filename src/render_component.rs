//! The drawable family registered with the render manager.
//!
//! Every drawable shares the same transform parameters (`RenderParams`) and
//! differs only in what it puts on screen: a static sprite, an animation, a
//! named set of animations, a flat debug rectangle, or the screen-space
//! lifebar overlay.

use std::collections::HashMap;

use glam::Vec2;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;

use crate::animation::Animation;
use crate::assets::{AssetCache, TextureId};
use crate::engine::GameTime;
use crate::render::{draw_sprite, Camera, ViewMode};

/// Transform and appearance shared by every drawable.
#[derive(Debug, Clone)]
pub struct RenderParams {
    /// Draw-order hint; higher draws later (on top). Not depth testing.
    pub z_index: i32,
    /// World-space center.
    pub world_position: Vec2,
    /// On-screen size in world units, independent of texel size.
    pub world_size: Vec2,
    pub flip_x: bool,
    pub flip_y: bool,
    pub tint: Color,
    pub visible: bool,
}

impl RenderParams {
    pub fn new(world_size: Vec2) -> Self {
        RenderParams {
            z_index: 0,
            world_position: Vec2::ZERO,
            world_size,
            flip_x: false,
            flip_y: false,
            tint: Color::RGBA(255, 255, 255, 255),
            visible: true,
        }
    }
}

pub struct RenderEntry {
    pub params: RenderParams,
    pub kind: RenderKind,
}

pub enum RenderKind {
    Sprite(SpriteRender),
    Animated(AnimationRender),
    AnimationSet(AnimationSetRender),
    Rect(RectRender),
    Lifebar(LifebarRender),
}

/// A fixed sub-rectangle of a texture.
pub struct SpriteRender {
    pub texture: TextureId,
    pub src: Rect,
}

/// A single animation, advanced every tick.
pub struct AnimationRender {
    pub animation: Animation,
}

/// Named animations with one active at a time.
pub struct AnimationSetRender {
    animations: HashMap<String, Animation>,
    active: Option<String>,
}

impl AnimationSetRender {
    pub fn new() -> Self {
        AnimationSetRender {
            animations: HashMap::new(),
            active: None,
        }
    }

    pub fn add_animation(&mut self, name: &str, animation: Animation) {
        self.animations.insert(name.to_string(), animation);
    }

    /// Switches the active animation, restarting the new one from frame 0.
    /// Re-setting the already-active name is a no-op; unknown names are
    /// ignored.
    pub fn set_animation(&mut self, name: &str) {
        if self.active.as_deref() == Some(name) {
            return;
        }
        if let Some(animation) = self.animations.get_mut(name) {
            animation.reset();
            self.active = Some(name.to_string());
        }
    }

    #[allow(dead_code)] // Reserved for state inspection
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    fn active_animation(&self) -> Option<&Animation> {
        self.animations.get(self.active.as_deref()?)
    }

    fn active_animation_mut(&mut self) -> Option<&mut Animation> {
        let name = self.active.clone()?;
        self.animations.get_mut(&name)
    }
}

impl Default for AnimationSetRender {
    fn default() -> Self {
        Self::new()
    }
}

/// Flat-colored rectangle, used to visualize collision shapes.
pub struct RectRender {
    pub color: Color,
}

/// Screen-space health/shield bar drawn under the overlay view. The fill
/// factors are pushed in by the owning object's health component each tick.
pub struct LifebarRender {
    pub health_factor: f32,
    pub shield_factor: f32,
    style: LifebarStyle,
}

#[derive(Debug, Clone)]
pub struct LifebarStyle {
    /// Offset of the bar block from the top-left corner of the screen.
    pub offset: (i32, i32),
    /// Size of each of the two bars.
    pub bar_width: u32,
    pub bar_height: u32,
    /// Gap between the health and shield bars.
    pub gap: u32,
    pub background_color: Color,
    pub health_color: Color,
    pub shield_color: Color,
    pub border_color: Color,
}

impl Default for LifebarStyle {
    fn default() -> Self {
        LifebarStyle {
            offset: (30, 20),
            bar_width: 150,
            bar_height: 24,
            gap: 10,
            background_color: Color::RGB(40, 40, 40),
            health_color: Color::RGB(200, 40, 40),
            shield_color: Color::RGB(60, 120, 220),
            border_color: Color::RGB(0, 0, 0),
        }
    }
}

impl LifebarRender {
    pub fn new() -> Self {
        LifebarRender {
            health_factor: 1.0,
            shield_factor: 1.0,
            style: LifebarStyle::default(),
        }
    }

    #[allow(dead_code)] // Reserved for boss/enemy bar variants
    pub fn with_style(style: LifebarStyle) -> Self {
        LifebarRender {
            health_factor: 1.0,
            shield_factor: 1.0,
            style,
        }
    }

    fn draw(&self, canvas: &mut Canvas<Window>) -> Result<(), String> {
        let style = &self.style;
        let (x, y) = style.offset;
        let shield_x = x + style.bar_width as i32 + style.gap as i32;

        for bar_x in [x, shield_x] {
            canvas.set_draw_color(style.background_color);
            canvas.fill_rect(Rect::new(bar_x, y, style.bar_width, style.bar_height))?;
        }

        let health = self.health_factor.clamp(0.0, 1.0);
        let health_width = (style.bar_width as f32 * health) as u32;
        if health_width > 0 {
            canvas.set_draw_color(style.health_color);
            canvas.fill_rect(Rect::new(x, y, health_width, style.bar_height))?;
        }

        let shield = self.shield_factor.clamp(0.0, 1.0);
        let shield_width = (style.bar_width as f32 * shield) as u32;
        if shield_width > 0 {
            canvas.set_draw_color(style.shield_color);
            canvas.fill_rect(Rect::new(shield_x, y, shield_width, style.bar_height))?;
        }

        canvas.set_draw_color(style.border_color);
        for bar_x in [x, shield_x] {
            canvas.draw_rect(Rect::new(bar_x, y, style.bar_width, style.bar_height))?;
        }
        Ok(())
    }
}

impl Default for LifebarRender {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderEntry {
    /// Adopts the owning object's position and advances any owned animation.
    pub fn sync(&mut self, position: Vec2, time: GameTime) {
        self.params.world_position = position;
        match &mut self.kind {
            RenderKind::Animated(render) => render.animation.update(time.delta_seconds()),
            RenderKind::AnimationSet(set) => {
                if let Some(animation) = set.active_animation_mut() {
                    animation.update(time.delta_seconds());
                }
            }
            _ => {}
        }
    }

    /// True when this drawable plays a non-looping animation that finished.
    pub fn animation_finished(&self) -> bool {
        match &self.kind {
            RenderKind::Animated(render) => render.animation.is_finished(),
            RenderKind::AnimationSet(set) => set
                .active_animation()
                .map(|animation| animation.is_finished())
                .unwrap_or(false),
            _ => false,
        }
    }

    pub fn draw(
        &self,
        canvas: &mut Canvas<Window>,
        assets: &mut AssetCache,
        camera: Camera,
        view: ViewMode,
    ) -> Result<(), String> {
        let params = &self.params;
        match &self.kind {
            RenderKind::Sprite(sprite) => draw_sprite(
                canvas,
                assets,
                sprite.texture,
                sprite.src,
                params.world_position,
                params.world_size,
                params.flip_x,
                params.flip_y,
                params.tint,
                camera,
                view,
            ),
            RenderKind::Animated(render) => {
                let Some(frame) = render.animation.current_subimage() else {
                    return Ok(());
                };
                draw_sprite(
                    canvas,
                    assets,
                    frame.texture,
                    frame.rect,
                    params.world_position,
                    params.world_size,
                    params.flip_x,
                    params.flip_y,
                    params.tint,
                    camera,
                    view,
                )
            }
            RenderKind::AnimationSet(set) => {
                let Some(frame) = set
                    .active_animation()
                    .and_then(|animation| animation.current_subimage())
                else {
                    return Ok(());
                };
                draw_sprite(
                    canvas,
                    assets,
                    frame.texture,
                    frame.rect,
                    params.world_position,
                    params.world_size,
                    params.flip_x,
                    params.flip_y,
                    params.tint,
                    camera,
                    view,
                )
            }
            RenderKind::Rect(rect) => {
                let screen = match view {
                    ViewMode::Camera => camera.world_to_screen(params.world_position),
                    ViewMode::Overlay => params.world_position,
                };
                let dest = Rect::new(
                    (screen.x - params.world_size.x * 0.5).round() as i32,
                    (screen.y - params.world_size.y * 0.5).round() as i32,
                    params.world_size.x.round() as u32,
                    params.world_size.y.round() as u32,
                );
                canvas.set_blend_mode(BlendMode::Blend);
                canvas.set_draw_color(rect.color);
                let result = canvas.fill_rect(dest);
                canvas.set_blend_mode(BlendMode::None);
                result
            }
            RenderKind::Lifebar(lifebar) => lifebar.draw(canvas),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SubImage;

    fn animation(frame_count: usize, looping: bool) -> Animation {
        let frames = (0..frame_count)
            .map(|i| SubImage {
                texture: TextureId::for_tests(0),
                rect: Rect::new(i as i32 * 16, 0, 16, 16),
            })
            .collect();
        Animation::new(frames, 0.1, looping)
    }

    #[test]
    fn animation_set_switch_restarts_from_frame_zero() {
        let mut set = AnimationSetRender::new();
        set.add_animation("walking", animation(4, true));
        set.add_animation("attacking", animation(3, false));

        set.set_animation("walking");
        if let Some(walking) = set.active_animation_mut() {
            walking.update(0.25);
        }
        assert_eq!(set.active_animation().map(|a| a.current_frame()), Some(2));

        set.set_animation("attacking");
        assert_eq!(set.active(), Some("attacking"));
        assert_eq!(set.active_animation().map(|a| a.current_frame()), Some(0));
    }

    #[test]
    fn animation_set_same_name_switch_does_not_restart() {
        let mut set = AnimationSetRender::new();
        set.add_animation("walking", animation(4, true));
        set.set_animation("walking");
        if let Some(walking) = set.active_animation_mut() {
            walking.update(0.15);
        }

        set.set_animation("walking");
        assert_eq!(set.active_animation().map(|a| a.current_frame()), Some(1));
    }

    #[test]
    fn animation_set_unknown_name_keeps_current() {
        let mut set = AnimationSetRender::new();
        set.add_animation("walking", animation(4, true));
        set.set_animation("walking");

        set.set_animation("swimming");
        assert_eq!(set.active(), Some("walking"));
    }

    #[test]
    fn entry_reports_finished_only_for_non_looping_end() {
        let mut entry = RenderEntry {
            params: RenderParams::new(Vec2::new(32.0, 32.0)),
            kind: RenderKind::Animated(AnimationRender {
                animation: animation(3, false),
            }),
        };
        assert!(!entry.animation_finished());

        let step = std::time::Duration::from_secs_f64(1.0);
        entry.sync(
            Vec2::ZERO,
            GameTime {
                elapsed: step,
                total: step,
            },
        );
        assert!(entry.animation_finished());
    }

    #[test]
    fn sync_adopts_parent_position() {
        let mut entry = RenderEntry {
            params: RenderParams::new(Vec2::new(8.0, 8.0)),
            kind: RenderKind::Rect(RectRender {
                color: Color::RGBA(255, 0, 0, 100),
            }),
        };
        let step = std::time::Duration::from_secs_f64(1.0 / 60.0);
        entry.sync(
            Vec2::new(12.0, 34.0),
            GameTime {
                elapsed: step,
                total: step,
            },
        );
        assert_eq!(entry.params.world_position, Vec2::new(12.0, 34.0));
    }
}
