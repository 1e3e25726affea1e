//! Minimal physics backend: AABB bodies, integration, contact reporting.
//!
//! Gameplay code talks to this module only through body handles and the
//! properties on [`Body`]; everything else (integration order, resolution
//! details) is private to the step. Bodies live in a generational slot arena
//! so a handle to a destroyed body goes quietly stale instead of aliasing a
//! recycled slot.

use glam::Vec2;

use crate::object::{GameObject, GameObjectId, UpdateContext};

/// Collision category bits, used both as a body's own category and as the
/// mask of categories it interacts with.
pub mod category {
    pub const PLAYER: u16 = 1 << 0;
    pub const ENEMY: u16 = 1 << 1;
    pub const MAP: u16 = 1 << 2;
    pub const ALL: u16 = u16::MAX;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Immovable level geometry.
    Static,
    /// Moved by setting velocity directly; ignores forces and resolution.
    Kinematic,
    /// Fully simulated: gravity, damping, push-out against static geometry.
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
pub struct Body {
    /// Center of the body's AABB.
    pub position: Vec2,
    pub velocity: Vec2,
    pub half_extents: Vec2,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    pub gravity_scale: f32,
    pub linear_damping: f32,
    /// Sensors report contacts but are never pushed out of geometry.
    pub is_sensor: bool,
    pub body_type: BodyType,
    pub category: u16,
    pub mask: u16,
    pub owner: GameObjectId,
    grounded: bool,
}

/// Two bodies whose AABBs overlapped during the last step, reported by the
/// objects that own them.
#[derive(Debug, Clone, Copy)]
pub struct ContactEvent {
    pub a: GameObjectId,
    pub b: GameObjectId,
}

struct BodySlot {
    generation: u32,
    body: Option<Body>,
}

pub struct PhysicsManager {
    slots: Vec<BodySlot>,
    free: Vec<u32>,
    gravity: Vec2,
    contacts: Vec<ContactEvent>,
}

impl PhysicsManager {
    pub fn new() -> Self {
        PhysicsManager {
            slots: Vec::new(),
            free: Vec::new(),
            gravity: Vec2::new(0.0, 1200.0),
            contacts: Vec::new(),
        }
    }

    pub fn create_body(
        &mut self,
        owner: GameObjectId,
        position: Vec2,
        width: f32,
        height: f32,
        category: u16,
        mask: u16,
        body_type: BodyType,
    ) -> BodyHandle {
        let body = Body {
            position,
            velocity: Vec2::ZERO,
            half_extents: Vec2::new(width * 0.5, height * 0.5),
            mass: 1.0,
            friction: 0.0,
            restitution: 0.0,
            gravity_scale: 1.0,
            linear_damping: 0.0,
            is_sensor: false,
            body_type,
            category,
            mask,
            owner,
            grounded: false,
        };

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.body = Some(body);
            BodyHandle {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(BodySlot {
                generation: 0,
                body: Some(body),
            });
            BodyHandle {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    pub fn destroy_body(&mut self, handle: BodyHandle) {
        if let Some(slot) = self.slots.get_mut(handle.index as usize) {
            if slot.generation == handle.generation && slot.body.is_some() {
                slot.body = None;
                slot.generation += 1;
                self.free.push(handle.index);
            }
        }
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.body.as_ref()
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.body.as_mut()
    }

    pub fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.body(handle).map(|body| body.position)
    }

    pub fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.body(handle).map(|body| body.velocity)
    }

    /// True while the body rested on static geometry during the last step.
    pub fn grounded(&self, handle: BodyHandle) -> bool {
        self.body(handle).map(|body| body.grounded).unwrap_or(false)
    }

    /// Instant velocity change scaled by the body's mass.
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec2) {
        if let Some(body) = self.body_mut(handle) {
            if body.mass > 0.0 {
                body.velocity += impulse / body.mass;
            }
        }
    }

    /// Contact pairs reported by the last [`PhysicsManager::step`].
    pub fn contacts(&self) -> &[ContactEvent] {
        &self.contacts
    }

    /// Advances every body by `dt` seconds, resolves dynamic bodies against
    /// static geometry, and records category/mask-filtered overlap pairs.
    pub fn step(&mut self, dt: f32) {
        self.contacts.clear();

        // Integrate.
        for slot in &mut self.slots {
            let Some(body) = slot.body.as_mut() else {
                continue;
            };
            match body.body_type {
                BodyType::Dynamic => {
                    body.velocity += self.gravity * body.gravity_scale * dt;
                    body.velocity /= 1.0 + body.linear_damping * dt;
                    body.position += body.velocity * dt;
                    body.grounded = false;
                }
                BodyType::Kinematic => {
                    body.position += body.velocity * dt;
                }
                BodyType::Static => {}
            }
        }

        // Static geometry does not move, so snapshot it once and push the
        // dynamic bodies out along the axis of least overlap.
        let statics: Vec<(Vec2, Vec2, u16, f32)> = self
            .slots
            .iter()
            .filter_map(|slot| slot.body.as_ref())
            .filter(|body| body.body_type == BodyType::Static && !body.is_sensor)
            .map(|body| (body.position, body.half_extents, body.category, body.friction))
            .collect();

        for slot in &mut self.slots {
            let Some(body) = slot.body.as_mut() else {
                continue;
            };
            if body.body_type != BodyType::Dynamic || body.is_sensor {
                continue;
            }
            for &(static_position, static_half, static_category, static_friction) in &statics {
                if body.mask & static_category == 0 {
                    continue;
                }
                let delta = body.position - static_position;
                let overlap_x = body.half_extents.x + static_half.x - delta.x.abs();
                let overlap_y = body.half_extents.y + static_half.y - delta.y.abs();
                if overlap_x <= 0.0 || overlap_y <= 0.0 {
                    continue;
                }

                if overlap_x < overlap_y {
                    let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
                    body.position.x += sign * overlap_x;
                    if body.velocity.x * sign < 0.0 {
                        body.velocity.x = -body.velocity.x * body.restitution;
                    }
                } else {
                    let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
                    body.position.y += sign * overlap_y;
                    if body.velocity.y * sign < 0.0 {
                        body.velocity.y = -body.velocity.y * body.restitution;
                    }
                    if sign < 0.0 {
                        // Pushed up: the body rests on this surface.
                        body.grounded = true;
                        let friction = (body.friction + static_friction) * 0.5;
                        body.velocity.x /= 1.0 + friction * dt;
                    }
                }
            }
        }

        // Contact reporting over every remaining pair (skipping pairs of
        // static bodies), filtered by both masks.
        for i in 0..self.slots.len() {
            for j in (i + 1)..self.slots.len() {
                let (Some(a), Some(b)) = (self.slots[i].body.as_ref(), self.slots[j].body.as_ref())
                else {
                    continue;
                };
                if a.body_type == BodyType::Static && b.body_type == BodyType::Static {
                    continue;
                }
                if a.mask & b.category == 0 || b.mask & a.category == 0 {
                    continue;
                }
                if aabb_overlap(a.position, a.half_extents, b.position, b.half_extents) {
                    self.contacts.push(ContactEvent {
                        a: a.owner,
                        b: b.owner,
                    });
                }
            }
        }
    }
}

impl Default for PhysicsManager {
    fn default() -> Self {
        Self::new()
    }
}

fn aabb_overlap(a_position: Vec2, a_half: Vec2, b_position: Vec2, b_half: Vec2) -> bool {
    let delta = a_position - b_position;
    delta.x.abs() < a_half.x + b_half.x && delta.y.abs() < a_half.y + b_half.y
}

/// Mirrors the body position into the owning object every tick, keeping
/// `GameObject::position` the single source of truth for other components.
pub struct PhysicsComponent {
    pub handle: BodyHandle,
}

impl PhysicsComponent {
    pub fn update(&mut self, parent: &mut GameObject, ctx: &mut UpdateContext) {
        if let Some(position) = ctx.physics.position(self.handle) {
            parent.position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_without_gravity() -> PhysicsManager {
        let mut physics = PhysicsManager::new();
        physics.gravity = Vec2::ZERO;
        physics
    }

    #[test]
    fn aabb_overlap_detection() {
        let half = Vec2::new(16.0, 16.0);
        assert!(aabb_overlap(
            Vec2::new(0.0, 0.0),
            half,
            Vec2::new(20.0, 0.0),
            half
        ));
        // Touching edges do not count as overlap.
        assert!(!aabb_overlap(
            Vec2::new(0.0, 0.0),
            half,
            Vec2::new(32.0, 0.0),
            half
        ));
    }

    #[test]
    fn contacts_respect_category_masks() {
        let mut physics = manager_without_gravity();
        let player = physics.create_body(
            GameObjectId(1),
            Vec2::ZERO,
            32.0,
            32.0,
            category::PLAYER,
            category::ENEMY,
            BodyType::Dynamic,
        );
        // Overlapping body the player does not mask against.
        physics.create_body(
            GameObjectId(2),
            Vec2::new(4.0, 0.0),
            32.0,
            32.0,
            category::MAP,
            category::ALL,
            BodyType::Kinematic,
        );
        physics.step(1.0 / 60.0);
        assert!(physics.contacts().is_empty());

        // An enemy in the same spot is reported.
        physics.create_body(
            GameObjectId(3),
            Vec2::new(4.0, 0.0),
            32.0,
            32.0,
            category::ENEMY,
            category::PLAYER,
            BodyType::Dynamic,
        );
        physics.step(1.0 / 60.0);
        assert_eq!(physics.contacts().len(), 1);
        let contact = physics.contacts()[0];
        assert!(contact.a == GameObjectId(1) || contact.b == GameObjectId(1));
        assert!(contact.a == GameObjectId(3) || contact.b == GameObjectId(3));
        let _ = player;
    }

    #[test]
    fn dynamic_body_lands_on_static_ground() {
        let mut physics = PhysicsManager::new();
        // Ground top edge at y = 0.
        physics.create_body(
            GameObjectId(1),
            Vec2::new(0.0, 50.0),
            400.0,
            100.0,
            category::MAP,
            category::ALL,
            BodyType::Static,
        );
        let faller = physics.create_body(
            GameObjectId(2),
            Vec2::new(0.0, -40.0),
            20.0,
            20.0,
            category::PLAYER,
            category::ALL,
            BodyType::Dynamic,
        );

        for _ in 0..120 {
            physics.step(1.0 / 60.0);
        }

        assert!(physics.grounded(faller));
        let body = physics.body(faller).expect("body exists");
        // Resting with its bottom edge on the ground top.
        assert!((body.position.y - -10.0).abs() < 0.5);
        assert!(body.velocity.y.abs() < 1.0);
    }

    #[test]
    fn impulse_is_scaled_by_mass() {
        let mut physics = manager_without_gravity();
        let handle = physics.create_body(
            GameObjectId(1),
            Vec2::ZERO,
            10.0,
            10.0,
            category::PLAYER,
            category::ALL,
            BodyType::Dynamic,
        );
        if let Some(body) = physics.body_mut(handle) {
            body.mass = 4.0;
        }
        physics.apply_impulse(handle, Vec2::new(8.0, 0.0));
        assert_eq!(physics.velocity(handle), Some(Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn stale_handles_resolve_to_nothing() {
        let mut physics = manager_without_gravity();
        let handle = physics.create_body(
            GameObjectId(1),
            Vec2::ZERO,
            10.0,
            10.0,
            category::PLAYER,
            category::ALL,
            BodyType::Dynamic,
        );
        physics.destroy_body(handle);
        assert!(physics.body(handle).is_none());

        // The slot can be reused without the old handle resolving to it.
        let reused = physics.create_body(
            GameObjectId(2),
            Vec2::ZERO,
            10.0,
            10.0,
            category::ENEMY,
            category::ALL,
            BodyType::Dynamic,
        );
        assert!(physics.body(handle).is_none());
        assert!(physics.body(reused).is_some());
    }
}
