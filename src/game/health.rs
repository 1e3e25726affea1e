//! Health and shield for damageable entities.

use crate::game::factory::SpawnRequest;
use crate::object::{GameObject, Message, MessageKind, UpdateContext};
use crate::render::RenderKey;

/// Two-tier damage pool: the shield absorbs incoming damage first, health
/// takes whatever is left. When health reaches zero the component asks the
/// owner to invalidate itself, every tick, until removal happens.
pub struct HealthComponent {
    pub max_health: f32,
    pub current_health: f32,
    pub max_shield: f32,
    pub current_shield: f32,
    lifebar: Option<RenderKey>,
}

impl HealthComponent {
    pub fn new(max_health: f32, max_shield: f32) -> Self {
        HealthComponent {
            max_health,
            current_health: max_health,
            max_shield,
            current_shield: max_shield,
            lifebar: None,
        }
    }

    /// Wires a lifebar drawable; the component pushes its fill factors into
    /// it every tick.
    pub fn set_lifebar(&mut self, key: RenderKey) {
        self.lifebar = Some(key);
    }

    pub fn update(&mut self, parent: &mut GameObject, ctx: &mut UpdateContext) {
        if self.current_health <= 0.0 {
            ctx.send(
                parent.id,
                Message {
                    sender: parent.id,
                    kind: MessageKind::Invalidate,
                },
            );
        }

        // Clamped down only; negative health may persist until removal.
        if self.current_health > self.max_health {
            self.current_health = self.max_health;
        }

        if let Some(key) = self.lifebar {
            let health = if self.max_health > 0.0 {
                (self.current_health / self.max_health).max(0.0)
            } else {
                0.0
            };
            let shield = if self.max_shield > 0.0 {
                (self.current_shield / self.max_shield).max(0.0)
            } else {
                0.0
            };
            ctx.render.set_lifebar_factors(key, health, shield);
        }
    }

    pub fn handle_message(
        &mut self,
        parent: &mut GameObject,
        message: &Message,
        ctx: &mut UpdateContext,
    ) {
        if let MessageKind::Damage(damage) = message.kind {
            if self.current_shield > 0.0 {
                if damage > self.current_shield {
                    let health_damage = damage - self.current_shield;
                    self.current_shield = 0.0;
                    self.current_health -= health_damage;
                } else {
                    self.current_shield -= damage;
                }
                ctx.spawn(SpawnRequest::ShieldDamageEffect {
                    position: parent.position,
                });
            } else {
                self.current_health -= damage;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputManager;
    use crate::object::GameObjectId;
    use crate::physics::PhysicsManager;
    use crate::render::RenderManager;
    use glam::Vec2;
    use std::time::Duration;

    struct Fixture {
        input: InputManager,
        physics: PhysicsManager,
        render: RenderManager,
        outbox: Vec<crate::object::Envelope>,
        spawns: Vec<SpawnRequest>,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                input: InputManager::new(),
                physics: PhysicsManager::new(),
                render: RenderManager::new(640, 360),
                outbox: Vec::new(),
                spawns: Vec::new(),
            }
        }

        fn ctx(&mut self) -> UpdateContext<'_> {
            let step = Duration::from_secs_f64(crate::engine::FIXED_STEP_SECONDS);
            UpdateContext {
                time: crate::engine::GameTime {
                    elapsed: step,
                    total: step,
                },
                input: &self.input,
                physics: &mut self.physics,
                render: &mut self.render,
                outbox: &mut self.outbox,
                spawns: &mut self.spawns,
            }
        }
    }

    fn damage(amount: f32) -> Message {
        Message {
            sender: GameObjectId(99),
            kind: MessageKind::Damage(amount),
        }
    }

    #[test]
    fn overflow_damage_spills_from_shield_into_health() {
        let mut fixture = Fixture::new();
        let mut parent = GameObject::new(GameObjectId(1), Vec2::ZERO);
        let mut health = HealthComponent::new(100.0, 50.0);

        let mut ctx = fixture.ctx();
        health.handle_message(&mut parent, &damage(80.0), &mut ctx);
        assert_eq!(health.current_shield, 0.0);
        assert_eq!(health.current_health, 70.0);

        // With the shield gone, damage hits health directly.
        health.handle_message(&mut parent, &damage(70.0), &mut ctx);
        assert_eq!(health.current_health, 0.0);
    }

    #[test]
    fn partial_shield_hit_leaves_health_untouched() {
        let mut fixture = Fixture::new();
        let mut parent = GameObject::new(GameObjectId(1), Vec2::ZERO);
        let mut health = HealthComponent::new(100.0, 50.0);

        let mut ctx = fixture.ctx();
        health.handle_message(&mut parent, &damage(20.0), &mut ctx);
        assert_eq!(health.current_shield, 30.0);
        assert_eq!(health.current_health, 100.0);
    }

    #[test]
    fn shield_absorption_spawns_an_effect() {
        let mut fixture = Fixture::new();
        let mut parent = GameObject::new(GameObjectId(1), Vec2::new(5.0, 6.0));
        let mut health = HealthComponent::new(100.0, 50.0);

        let mut ctx = fixture.ctx();
        health.handle_message(&mut parent, &damage(10.0), &mut ctx);
        drop(ctx);

        assert_eq!(fixture.spawns.len(), 1);
        assert!(matches!(
            fixture.spawns[0],
            SpawnRequest::ShieldDamageEffect { .. }
        ));

        // No shield left: plain health damage spawns nothing further.
        let mut ctx = fixture.ctx();
        health.current_shield = 0.0;
        health.handle_message(&mut parent, &damage(10.0), &mut ctx);
        drop(ctx);
        assert_eq!(fixture.spawns.len(), 1);
    }

    #[test]
    fn zero_health_invalidates_owner_each_tick() {
        let mut fixture = Fixture::new();
        let mut parent = GameObject::new(GameObjectId(1), Vec2::ZERO);
        let mut health = HealthComponent::new(10.0, 0.0);
        health.current_health = 0.0;

        let mut ctx = fixture.ctx();
        health.update(&mut parent, &mut ctx);
        health.update(&mut parent, &mut ctx);
        drop(ctx);

        // One invalidate per tick; delivery is idempotent.
        assert_eq!(fixture.outbox.len(), 2);
        assert!(fixture
            .outbox
            .iter()
            .all(|envelope| matches!(envelope.message.kind, MessageKind::Invalidate)));
    }

    #[test]
    fn health_above_max_is_clamped_down() {
        let mut fixture = Fixture::new();
        let mut parent = GameObject::new(GameObjectId(1), Vec2::ZERO);
        let mut health = HealthComponent::new(100.0, 0.0);
        health.current_health = 150.0;

        let mut ctx = fixture.ctx();
        health.update(&mut parent, &mut ctx);
        assert_eq!(health.current_health, 100.0);

        // Negative health is not clamped up.
        health.current_health = -5.0;
        health.update(&mut parent, &mut ctx);
        assert_eq!(health.current_health, -5.0);
    }
}
