//! Game object model: component containers and message dispatch.
//!
//! A `GameObject` is little more than an identity, a world position, and an
//! ordered list of components. All behavior lives in the components, which
//! communicate through short-lived messages instead of reaching into each
//! other. Components never hold references to siblings; anything shared is
//! reached through a manager handle (`BodyHandle`, `RenderKey`) so ownership
//! stays single and explicit.

use glam::Vec2;

use crate::engine::GameTime;
use crate::game::controllers::{
    CharacterController, FlyingBugAi, FlyingBugController, JabController,
};
use crate::game::factory::SpawnRequest;
use crate::game::health::HealthComponent;
use crate::game::weapons::{
    Attack, ExplodeOnCollision, GunWeapon, InvalidateOnAnimationEnd, MeleeWeapon,
};
use crate::input::InputManager;
use crate::physics::{PhysicsComponent, PhysicsManager};
use crate::render::{RenderKey, RenderManager};

/// Stable identity of a game object for the lifetime of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameObjectId(pub u64);

/// A message delivered to a game object and broadcast to its components.
#[derive(Debug, Clone)]
pub struct Message {
    pub sender: GameObjectId,
    pub kind: MessageKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageKind {
    /// Apply damage to the receiver. A receiver without a health component
    /// ignores this.
    Damage(f32),
    /// The receiver's physics body overlapped another object's body.
    Collision { other: GameObjectId },
    /// Mark the receiver dead. Removal happens at the end of the update
    /// pass, never mid-iteration.
    Invalidate,
}

/// A message addressed to a specific object, queued for delivery at the next
/// safe point of the current tick.
#[derive(Debug)]
pub struct Envelope {
    pub target: GameObjectId,
    pub message: Message,
}

/// Services available to components during update and message handling.
pub struct UpdateContext<'a> {
    pub time: GameTime,
    pub input: &'a InputManager,
    pub physics: &'a mut PhysicsManager,
    pub render: &'a mut RenderManager,
    pub outbox: &'a mut Vec<Envelope>,
    pub spawns: &'a mut Vec<SpawnRequest>,
}

impl UpdateContext<'_> {
    /// Queues a message for delivery later this tick.
    pub fn send(&mut self, target: GameObjectId, message: Message) {
        self.outbox.push(Envelope { target, message });
    }

    /// Queues a new entity to be created after the update pass.
    pub fn spawn(&mut self, request: SpawnRequest) {
        self.spawns.push(request);
    }
}

/// Every behavior a game object can carry, as a closed set of variants.
/// Unhandled messages fall through silently; extending the game means adding
/// a variant and letting the compiler point at the dispatch sites.
pub enum Component {
    Physics(PhysicsComponent),
    Render(RenderKey),
    Health(HealthComponent),
    CharacterController(CharacterController),
    FlyingBugController(FlyingBugController),
    FlyingBugAi(FlyingBugAi),
    MeleeWeapon(MeleeWeapon),
    GunWeapon(GunWeapon),
    JabController(JabController),
    Attack(Attack),
    ExplodeOnCollision(ExplodeOnCollision),
    InvalidateOnAnimationEnd(InvalidateOnAnimationEnd),
}

impl Component {
    fn update(&mut self, parent: &mut GameObject, ctx: &mut UpdateContext) {
        match self {
            Component::Physics(physics) => physics.update(parent, ctx),
            Component::Render(key) => ctx.render.sync(*key, parent.position, ctx.time),
            Component::Health(health) => health.update(parent, ctx),
            Component::CharacterController(controller) => controller.update(parent, ctx),
            Component::FlyingBugController(controller) => controller.update(parent, ctx),
            Component::FlyingBugAi(ai) => ai.update(parent, ctx),
            Component::MeleeWeapon(weapon) => weapon.update(parent, ctx),
            Component::GunWeapon(weapon) => weapon.update(parent, ctx),
            Component::JabController(controller) => controller.update(parent, ctx),
            Component::InvalidateOnAnimationEnd(watcher) => watcher.update(parent, ctx),
            Component::Attack(_) | Component::ExplodeOnCollision(_) => {}
        }
    }

    fn handle_message(
        &mut self,
        parent: &mut GameObject,
        message: &Message,
        ctx: &mut UpdateContext,
    ) {
        match self {
            Component::Health(health) => health.handle_message(parent, message, ctx),
            Component::Attack(attack) => attack.handle_message(parent, message, ctx),
            Component::ExplodeOnCollision(explode) => {
                explode.handle_message(parent, message, ctx)
            }
            Component::CharacterController(controller) => {
                controller.handle_message(parent, message, ctx)
            }
            Component::FlyingBugController(controller) => {
                controller.handle_message(parent, message, ctx)
            }
            _ => {}
        }
    }
}

/// Container of components with a position and a liveness flag.
///
/// Position is the single source of truth that physics writes and rendering
/// reads every tick. The `alive` flag is the mark half of mark-and-compact
/// removal: components flip it (via `Invalidate`), the owning world strips
/// dead objects once the update pass is over.
pub struct GameObject {
    pub id: GameObjectId,
    pub position: Vec2,
    pub alive: bool,
    components: Vec<Component>,
}

impl GameObject {
    pub fn new(id: GameObjectId, position: Vec2) -> Self {
        GameObject {
            id,
            position,
            alive: true,
            components: Vec::new(),
        }
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Updates every component in registration order.
    ///
    /// The component list is detached for the duration of the pass so each
    /// component can borrow the rest of the object mutably; sibling state is
    /// reached through manager handles, never through this list.
    pub fn update(&mut self, ctx: &mut UpdateContext) {
        let mut components = std::mem::take(&mut self.components);
        for component in &mut components {
            component.update(self, ctx);
        }
        self.components = components;
    }

    /// Delivers a message to this object: the base `Invalidate` behavior
    /// flags the object dead, then every component sees the message in
    /// registration order.
    pub fn handle_message(&mut self, message: &Message, ctx: &mut UpdateContext) {
        if matches!(message.kind, MessageKind::Invalidate) {
            self.alive = false;
        }
        let mut components = std::mem::take(&mut self.components);
        for component in &mut components {
            component.handle_message(self, message, ctx);
        }
        self.components = components;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::world::GameWorld;
    use crate::render::RenderManager;

    fn managers() -> (InputManager, PhysicsManager, RenderManager) {
        (
            InputManager::new(),
            PhysicsManager::new(),
            RenderManager::new(640, 360),
        )
    }

    fn step_time() -> GameTime {
        let step = std::time::Duration::from_secs_f64(crate::engine::FIXED_STEP_SECONDS);
        GameTime {
            elapsed: step,
            total: step,
        }
    }

    #[test]
    fn invalidate_flags_object_dead() {
        let (input, mut physics, mut render) = managers();
        let mut outbox = Vec::new();
        let mut spawns = Vec::new();
        let mut ctx = UpdateContext {
            time: step_time(),
            input: &input,
            physics: &mut physics,
            render: &mut render,
            outbox: &mut outbox,
            spawns: &mut spawns,
        };

        let id = GameObjectId(1);
        let mut object = GameObject::new(id, Vec2::ZERO);
        assert!(object.alive);

        object.handle_message(
            &Message {
                sender: id,
                kind: MessageKind::Invalidate,
            },
            &mut ctx,
        );
        assert!(!object.alive);
    }

    #[test]
    fn damage_without_health_component_is_a_no_op() {
        let (input, mut physics, mut render) = managers();
        let mut outbox = Vec::new();
        let mut spawns = Vec::new();
        let mut ctx = UpdateContext {
            time: step_time(),
            input: &input,
            physics: &mut physics,
            render: &mut render,
            outbox: &mut outbox,
            spawns: &mut spawns,
        };

        let mut object = GameObject::new(GameObjectId(7), Vec2::ZERO);
        object.handle_message(
            &Message {
                sender: GameObjectId(8),
                kind: MessageKind::Damage(25.0),
            },
            &mut ctx,
        );

        // Still alive, nothing queued.
        assert!(object.alive);
        assert!(outbox.is_empty());
        assert!(spawns.is_empty());
    }

    #[test]
    fn dead_object_is_removed_after_world_update() {
        let (input, mut physics, mut render) = managers();
        let mut world = GameWorld::new();

        let id = GameObjectId(3);
        let mut object = GameObject::new(id, Vec2::ZERO);
        object.alive = false;
        world.add(object);
        world.add(GameObject::new(GameObjectId(4), Vec2::ZERO));

        world.update(step_time(), &input, &mut physics, &mut render);

        assert_eq!(world.objects().len(), 1);
        assert!(world.objects().iter().all(|object| object.id != id));
    }
}
