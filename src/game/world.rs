//! The live object collection and the per-step update pass.
//!
//! Removal is two-phase: components only ever mark an object dead (through
//! `Invalidate`), and the world strips dead objects after the whole pass, so
//! the collection is never mutated while it is being iterated. Entities
//! spawned by components queue up the same way and join the world at the end
//! of the pass.

use crate::engine::GameTime;
use crate::game::factory::SpawnRequest;
use crate::input::InputManager;
use crate::object::{
    Component, Envelope, GameObject, GameObjectId, Message, MessageKind, UpdateContext,
};
use crate::physics::{BodyHandle, PhysicsManager};
use crate::render::RenderManager;

pub struct GameWorld {
    objects: Vec<GameObject>,
    outbox: Vec<Envelope>,
    spawns: Vec<SpawnRequest>,
}

impl GameWorld {
    pub fn new() -> Self {
        GameWorld {
            objects: Vec::new(),
            outbox: Vec::new(),
            spawns: Vec::new(),
        }
    }

    pub fn add(&mut self, object: GameObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    /// The physics body of an object, if it has one.
    pub fn body_handle(&self, id: GameObjectId) -> Option<BodyHandle> {
        self.objects
            .iter()
            .find(|object| object.id == id)?
            .components()
            .iter()
            .find_map(|component| match component {
                Component::Physics(physics) => Some(physics.handle),
                _ => None,
            })
    }

    /// Spawn requests accumulated during the last update pass. The caller
    /// feeds them through the factory.
    pub fn take_spawns(&mut self) -> Vec<SpawnRequest> {
        std::mem::take(&mut self.spawns)
    }

    /// Advances the world by one fixed step.
    ///
    /// Order per step: physics first, then collision messages, then every
    /// live object's components in registration order (draining queued
    /// messages after each object), and finally compaction of dead objects.
    pub fn update(
        &mut self,
        time: GameTime,
        input: &InputManager,
        physics: &mut PhysicsManager,
        render: &mut RenderManager,
    ) {
        physics.step(time.delta_seconds());
        let contacts = physics.contacts().to_vec();

        let objects = &mut self.objects;
        let mut ctx = UpdateContext {
            time,
            input,
            physics: &mut *physics,
            render: &mut *render,
            outbox: &mut self.outbox,
            spawns: &mut self.spawns,
        };

        // Both participants of a contact hear about it before anyone updates.
        for contact in contacts {
            ctx.send(
                contact.a,
                Message {
                    sender: contact.b,
                    kind: MessageKind::Collision { other: contact.b },
                },
            );
            ctx.send(
                contact.b,
                Message {
                    sender: contact.a,
                    kind: MessageKind::Collision { other: contact.a },
                },
            );
        }
        deliver_queued(objects, &mut ctx);

        for index in 0..objects.len() {
            if !objects[index].alive {
                continue;
            }
            objects[index].update(&mut ctx);
            deliver_queued(objects, &mut ctx);
        }
        drop(ctx);

        // Compaction: free the handles dead objects own, then drop them.
        for object in &self.objects {
            if object.alive {
                continue;
            }
            for component in object.components() {
                match component {
                    Component::Physics(body) => physics.destroy_body(body.handle),
                    Component::Render(key) => render.remove(*key),
                    _ => {}
                }
            }
        }
        self.objects.retain(|object| object.alive);
    }
}

impl Default for GameWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Delivers queued messages in send order until the queue is quiet. Handlers
/// may queue further messages; a message to an id that no longer exists is
/// dropped silently.
fn deliver_queued(objects: &mut [GameObject], ctx: &mut UpdateContext) {
    while !ctx.outbox.is_empty() {
        let batch: Vec<Envelope> = ctx.outbox.drain(..).collect();
        for envelope in batch {
            if let Some(target) = objects
                .iter_mut()
                .find(|object| object.id == envelope.target)
            {
                target.handle_message(&envelope.message, ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::health::HealthComponent;
    use crate::object::Component;
    use glam::Vec2;
    use std::time::Duration;

    fn step_time() -> GameTime {
        let step = Duration::from_secs_f64(crate::engine::FIXED_STEP_SECONDS);
        GameTime {
            elapsed: step,
            total: step,
        }
    }

    fn managers() -> (InputManager, PhysicsManager, RenderManager) {
        (
            InputManager::new(),
            PhysicsManager::new(),
            RenderManager::new(640, 360),
        )
    }

    fn health_of(world: &GameWorld, id: GameObjectId) -> Option<(f32, f32)> {
        world
            .objects()
            .iter()
            .find(|object| object.id == id)?
            .components()
            .iter()
            .find_map(|component| match component {
                Component::Health(health) => {
                    Some((health.current_health, health.current_shield))
                }
                _ => None,
            })
    }

    #[test]
    fn shield_absorbs_before_health() {
        let (input, mut physics, mut render) = managers();
        let mut world = GameWorld::new();

        let id = GameObjectId(1);
        let mut object = GameObject::new(id, Vec2::ZERO);
        object.add_component(Component::Health(HealthComponent::new(100.0, 50.0)));
        world.add(object);

        // Queue damage the way a component would, then run a pass.
        world.spawns.clear();
        world.outbox.push(Envelope {
            target: id,
            message: Message {
                sender: GameObjectId(99),
                kind: MessageKind::Damage(80.0),
            },
        });
        world.update(step_time(), &input, &mut physics, &mut render);

        assert_eq!(health_of(&world, id), Some((70.0, 0.0)));
    }

    #[test]
    fn lethal_damage_removes_object_after_the_tick() {
        let (input, mut physics, mut render) = managers();
        let mut world = GameWorld::new();

        let id = GameObjectId(2);
        let mut object = GameObject::new(id, Vec2::ZERO);
        object.add_component(Component::Health(HealthComponent::new(10.0, 0.0)));
        world.add(object);

        world.outbox.push(Envelope {
            target: id,
            message: Message {
                sender: GameObjectId(99),
                kind: MessageKind::Damage(25.0),
            },
        });

        // Damage lands this tick; the health component notices health <= 0
        // during its update, invalidates the owner, and compaction strips it.
        world.update(step_time(), &input, &mut physics, &mut render);
        assert!(world.objects().is_empty());
    }

    #[test]
    fn messages_to_unknown_targets_are_dropped() {
        let (input, mut physics, mut render) = managers();
        let mut world = GameWorld::new();
        world.outbox.push(Envelope {
            target: GameObjectId(404),
            message: Message {
                sender: GameObjectId(1),
                kind: MessageKind::Damage(5.0),
            },
        });
        world.update(step_time(), &input, &mut physics, &mut render);
        assert!(world.outbox.is_empty());
    }

    #[test]
    fn body_handle_lookup_tolerates_absence() {
        let mut world = GameWorld::new();
        world.add(GameObject::new(GameObjectId(5), Vec2::ZERO));
        assert!(world.body_handle(GameObjectId(5)).is_none());
        assert!(world.body_handle(GameObjectId(6)).is_none());
    }
}
