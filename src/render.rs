//! Render manager: camera/overlay views, registered drawables, draw pass.
//!
//! Drawables live in a generational slot arena. The owning game object keeps
//! the `RenderKey` as one of its components; the manager's draw list is the
//! arena itself, so nothing has to deregister in any particular order. A
//! freed slot simply stops resolving and the stale key goes inert.

use glam::Vec2;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

use crate::assets::{AssetCache, TextureId};
use crate::engine::GameTime;
use crate::render_component::{RenderEntry, RenderKind};

/// Handle to a registered drawable. Copyable; stale after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderKey {
    index: u32,
    generation: u32,
}

struct RenderSlot {
    generation: u32,
    entry: Option<RenderEntry>,
}

/// Which transform the draw pass applies to world positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// World space, relative to the camera center.
    Camera,
    /// Raw screen space, for HUD-style overlays.
    Overlay,
}

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    center: Vec2,
    viewport: Vec2,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let viewport = Vec2::new(width as f32, height as f32);
        Camera {
            center: viewport * 0.5,
            viewport,
        }
    }

    #[allow(dead_code)] // Reserved for camera-aware AI queries
    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.center + self.viewport * 0.5
    }
}

/// Restores the camera view when dropped, so overlay drawing cannot leave the
/// view state dirty even on an error return.
pub struct OverlayGuard<'a> {
    view: &'a mut ViewMode,
}

impl<'a> OverlayGuard<'a> {
    pub fn new(view: &'a mut ViewMode) -> Self {
        *view = ViewMode::Overlay;
        OverlayGuard { view }
    }
}

impl Drop for OverlayGuard<'_> {
    fn drop(&mut self) {
        *self.view = ViewMode::Camera;
    }
}

pub struct RenderManager {
    slots: Vec<RenderSlot>,
    free: Vec<u32>,
    camera: Camera,
    view: ViewMode,
}

impl RenderManager {
    pub fn new(width: u32, height: u32) -> Self {
        RenderManager {
            slots: Vec::new(),
            free: Vec::new(),
            camera: Camera::new(width, height),
            view: ViewMode::Camera,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[allow(dead_code)]
    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Explicit view switches for drawables managed outside the arena. The
    /// draw pass itself scopes its overlay excursions with [`OverlayGuard`].
    #[allow(dead_code)]
    pub fn set_overlay_view(&mut self) {
        self.view = ViewMode::Overlay;
    }

    #[allow(dead_code)]
    pub fn set_camera_view(&mut self) {
        self.view = ViewMode::Camera;
    }

    /// Registers a drawable and returns its key.
    pub fn insert(&mut self, entry: RenderEntry) -> RenderKey {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            RenderKey {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(RenderSlot {
                generation: 0,
                entry: Some(entry),
            });
            RenderKey {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    /// Frees the slot behind `key`. Stale keys are ignored.
    pub fn remove(&mut self, key: RenderKey) {
        if let Some(slot) = self.slots.get_mut(key.index as usize) {
            if slot.generation == key.generation && slot.entry.is_some() {
                slot.entry = None;
                slot.generation += 1;
                self.free.push(key.index);
            }
        }
    }

    pub fn entry(&self, key: RenderKey) -> Option<&RenderEntry> {
        let slot = self.slots.get(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    pub fn entry_mut(&mut self, key: RenderKey) -> Option<&mut RenderEntry> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    /// Per-tick sync for a drawable owned by a game object: adopts the
    /// parent's position and advances any owned animation.
    pub fn sync(&mut self, key: RenderKey, position: Vec2, time: GameTime) {
        if let Some(entry) = self.entry_mut(key) {
            entry.sync(position, time);
        }
    }

    /// True when the drawable behind `key` plays a non-looping animation that
    /// has finished. Stale keys report false.
    pub fn animation_finished(&self, key: RenderKey) -> bool {
        self.entry(key)
            .map(|entry| entry.animation_finished())
            .unwrap_or(false)
    }

    /// Switches the active animation of an animation-set drawable by name,
    /// restarting it from frame 0. No-op for other kinds or stale keys.
    pub fn set_active_animation(&mut self, key: RenderKey, name: &str) {
        if let Some(entry) = self.entry_mut(key) {
            if let RenderKind::AnimationSet(set) = &mut entry.kind {
                set.set_animation(name);
            }
        }
    }

    /// Writes the fill factors of a lifebar drawable. No-op otherwise.
    pub fn set_lifebar_factors(&mut self, key: RenderKey, health: f32, shield: f32) {
        if let Some(entry) = self.entry_mut(key) {
            if let RenderKind::Lifebar(lifebar) = &mut entry.kind {
                lifebar.health_factor = health;
                lifebar.shield_factor = shield;
            }
        }
    }

    /// Draw order for the current frame: occupied, visible slots sorted by
    /// z-index (stable, so equal z keeps registration order).
    fn draw_order(&self) -> Vec<u32> {
        let mut order: Vec<(i32, u32)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let entry = slot.entry.as_ref()?;
                entry.params.visible.then_some((entry.params.z_index, index as u32))
            })
            .collect();
        order.sort_by_key(|&(z_index, _)| z_index);
        order.into_iter().map(|(_, index)| index).collect()
    }

    /// Draws every registered visible drawable through the camera transform,
    /// back to front by z-index. The pass always ends in camera view: the
    /// lifebar's overlay excursion is scoped by a guard.
    pub fn render(
        &mut self,
        canvas: &mut Canvas<Window>,
        assets: &mut AssetCache,
    ) -> Result<(), String> {
        let camera = self.camera;
        for index in self.draw_order() {
            let Some(entry) = self.slots[index as usize].entry.as_ref() else {
                continue;
            };
            if let RenderKind::Lifebar(_) = entry.kind {
                let _overlay = OverlayGuard::new(&mut self.view);
                entry.draw(canvas, assets, camera, ViewMode::Overlay)?;
            } else {
                entry.draw(canvas, assets, camera, self.view)?;
            }
        }
        Ok(())
    }
}

/// The one primitive every sprite-like drawable funnels into: a textured quad
/// at a world-space center with an explicit on-screen size (independent of
/// texel size), optional flips, and a tint.
pub fn draw_sprite(
    canvas: &mut Canvas<Window>,
    assets: &mut AssetCache,
    texture_id: TextureId,
    src: Rect,
    world_center: Vec2,
    world_size: Vec2,
    flip_x: bool,
    flip_y: bool,
    tint: Color,
    camera: Camera,
    view: ViewMode,
) -> Result<(), String> {
    let screen = match view {
        ViewMode::Camera => camera.world_to_screen(world_center),
        ViewMode::Overlay => world_center,
    };
    let dest = Rect::new(
        (screen.x - world_size.x * 0.5).round() as i32,
        (screen.y - world_size.y * 0.5).round() as i32,
        world_size.x.round() as u32,
        world_size.y.round() as u32,
    );

    {
        let texture = assets.texture_mut(texture_id);
        texture.set_color_mod(tint.r, tint.g, tint.b);
        texture.set_alpha_mod(tint.a);
    }
    canvas
        .copy_ex(
            assets.texture(texture_id),
            Some(src),
            Some(dest),
            0.0,
            None,
            flip_x,
            flip_y,
        )
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_component::{LifebarRender, RectRender, RenderParams};

    fn rect_entry(z_index: i32) -> RenderEntry {
        let mut params = RenderParams::new(Vec2::new(10.0, 10.0));
        params.z_index = z_index;
        RenderEntry {
            params,
            kind: RenderKind::Rect(RectRender {
                color: Color::RGBA(255, 0, 0, 100),
            }),
        }
    }

    #[test]
    fn draw_order_sorts_by_z_with_stable_ties() {
        let mut render = RenderManager::new(640, 360);
        let background = render.insert(rect_entry(-5));
        let first_at_ten = render.insert(rect_entry(10));
        let second_at_ten = render.insert(rect_entry(10));
        let foreground = render.insert(rect_entry(100));

        let order = render.draw_order();
        let position = |key: RenderKey| {
            order
                .iter()
                .position(|&index| index == key.index)
                .expect("key in order")
        };
        assert!(position(background) < position(first_at_ten));
        // Equal z keeps registration order.
        assert!(position(first_at_ten) < position(second_at_ten));
        assert!(position(second_at_ten) < position(foreground));
    }

    #[test]
    fn invisible_entries_are_skipped() {
        let mut render = RenderManager::new(640, 360);
        let key = render.insert(rect_entry(0));
        assert_eq!(render.draw_order().len(), 1);

        if let Some(entry) = render.entry_mut(key) {
            entry.params.visible = false;
        }
        assert!(render.draw_order().is_empty());
    }

    #[test]
    fn stale_keys_are_skipped_and_slots_reused() {
        let mut render = RenderManager::new(640, 360);
        let key = render.insert(rect_entry(0));
        render.remove(key);

        assert!(render.entry(key).is_none());
        assert!(render.draw_order().is_empty());

        // Reuse does not resurrect the old key.
        let reused = render.insert(rect_entry(1));
        assert!(render.entry(key).is_none());
        assert!(render.entry(reused).is_some());
        assert_eq!(reused.index, key.index);

        // Removing through the stale key must not free the new occupant.
        render.remove(key);
        assert!(render.entry(reused).is_some());
    }

    #[test]
    fn overlay_guard_restores_camera_view() {
        let mut view = ViewMode::Camera;
        {
            let _overlay = OverlayGuard::new(&mut view);
        }
        assert_eq!(view, ViewMode::Camera);

        // The guard restores even when the scope unwinds through an error.
        fn draw_that_fails(view: &mut ViewMode) -> Result<(), String> {
            let _overlay = OverlayGuard::new(view);
            Err("mid-bar failure".to_string())
        }
        let mut view = ViewMode::Camera;
        assert!(draw_that_fails(&mut view).is_err());
        assert_eq!(view, ViewMode::Camera);
    }

    #[test]
    fn lifebar_factors_reach_the_entry() {
        let mut render = RenderManager::new(640, 360);
        let key = render.insert(RenderEntry {
            params: RenderParams::new(Vec2::ZERO),
            kind: RenderKind::Lifebar(LifebarRender::new()),
        });

        render.set_lifebar_factors(key, 0.7, 0.0);
        match &render.entry(key).expect("entry").kind {
            RenderKind::Lifebar(lifebar) => {
                assert_eq!(lifebar.health_factor, 0.7);
                assert_eq!(lifebar.shield_factor, 0.0);
            }
            _ => panic!("expected lifebar"),
        }
    }

    #[test]
    fn camera_projection_is_relative_to_center() {
        let mut camera = Camera::new(640, 360);
        camera.set_center(Vec2::new(1000.0, 500.0));
        let screen = camera.world_to_screen(Vec2::new(1000.0, 500.0));
        // The camera center lands mid-viewport.
        assert_eq!(screen, Vec2::new(320.0, 180.0));
    }
}
