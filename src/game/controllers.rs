//! Controller components: player character, flying bug, and jab sweep.

use glam::Vec2;

use crate::game::factory::SpawnRequest;
use crate::object::{GameObject, Message, MessageKind, UpdateContext};
use crate::physics::BodyHandle;
use crate::render::RenderKey;

/// Horizontal speed below which a character counts as standing still.
const WALK_ANIMATION_THRESHOLD: f32 = 5.0;

/// Player movement and animation-state selection.
///
/// Reads input, applies walk/jump impulses through the body handle, switches
/// the animation-set state by priority (attacking > airborne > walking >
/// idle), and keeps the camera centered on the player.
pub struct CharacterController {
    body: BodyHandle,
    render: RenderKey,
    pub walk_impulse: f32,
    pub in_air_impulse: f32,
    pub jump_impulse: f32,
    pub walking_damping: f32,
    pub in_air_damping: f32,
    facing: f32,
    attacking: bool,
    death_effect_spawned: bool,
}

impl CharacterController {
    pub fn new(body: BodyHandle, render: RenderKey) -> Self {
        CharacterController {
            body,
            render,
            walk_impulse: 0.0,
            in_air_impulse: 0.0,
            jump_impulse: 0.0,
            walking_damping: 0.0,
            in_air_damping: 0.0,
            facing: 1.0,
            attacking: false,
            death_effect_spawned: false,
        }
    }

    pub fn update(&mut self, parent: &mut GameObject, ctx: &mut UpdateContext) {
        let grounded = ctx.physics.grounded(self.body);

        let axis = ctx.input.move_axis();
        if axis != 0.0 {
            let impulse = if grounded {
                self.walk_impulse
            } else {
                self.in_air_impulse
            };
            ctx.physics
                .apply_impulse(self.body, Vec2::new(axis * impulse, 0.0));
            self.facing = axis.signum();
        }

        if grounded && ctx.input.jump_pressed() {
            ctx.physics
                .apply_impulse(self.body, Vec2::new(0.0, -self.jump_impulse));
        }

        if let Some(body) = ctx.physics.body_mut(self.body) {
            body.linear_damping = if grounded {
                self.walking_damping
            } else {
                self.in_air_damping
            };
        }

        if ctx.input.melee_pressed() {
            self.attacking = true;
        }
        if self.attacking && ctx.render.animation_finished(self.render) {
            self.attacking = false;
        }

        let velocity = ctx.physics.velocity(self.body).unwrap_or(Vec2::ZERO);
        let state = if self.attacking {
            "attacking"
        } else if !grounded && velocity.y < 0.0 {
            "jumping"
        } else if !grounded && velocity.y > 0.0 {
            "falling"
        } else if velocity.x.abs() > WALK_ANIMATION_THRESHOLD {
            "walking"
        } else {
            "idle"
        };
        ctx.render.set_active_animation(self.render, state);
        if let Some(entry) = ctx.render.entry_mut(self.render) {
            entry.params.flip_x = self.facing < 0.0;
        }

        ctx.render.camera_mut().set_center(parent.position);
    }

    pub fn handle_message(
        &mut self,
        parent: &mut GameObject,
        message: &Message,
        ctx: &mut UpdateContext,
    ) {
        if matches!(message.kind, MessageKind::Invalidate) && !self.death_effect_spawned {
            self.death_effect_spawned = true;
            ctx.spawn(SpawnRequest::DeadPlayer {
                position: parent.position,
            });
        }
    }
}

/// Keeps the bug's sprite facing its direction of travel and leaves a corpse
/// effect behind when the bug dies.
pub struct FlyingBugController {
    body: BodyHandle,
    render: RenderKey,
    death_effect_spawned: bool,
}

impl FlyingBugController {
    pub fn new(body: BodyHandle, render: RenderKey) -> Self {
        FlyingBugController {
            body,
            render,
            death_effect_spawned: false,
        }
    }

    pub fn update(&mut self, _parent: &mut GameObject, ctx: &mut UpdateContext) {
        let velocity = ctx.physics.velocity(self.body).unwrap_or(Vec2::ZERO);
        if velocity.x.abs() > 1.0 {
            if let Some(entry) = ctx.render.entry_mut(self.render) {
                entry.params.flip_x = velocity.x < 0.0;
            }
        }
    }

    pub fn handle_message(
        &mut self,
        parent: &mut GameObject,
        message: &Message,
        ctx: &mut UpdateContext,
    ) {
        if matches!(message.kind, MessageKind::Invalidate) && !self.death_effect_spawned {
            self.death_effect_spawned = true;
            ctx.spawn(SpawnRequest::DeadFlyingBug {
                position: parent.position,
            });
        }
    }
}

/// Hover-around-home steering plus periodic stinger fire at the player.
///
/// The player is tracked through its body handle; once that handle goes
/// stale (the player died) the bug keeps hovering and stops firing.
pub struct FlyingBugAi {
    body: BodyHandle,
    home: Vec2,
    player_body: Option<BodyHandle>,
    pub movement_impulse: f32,
    pub fire_interval: f32,
    steer_timer: f32,
    fire_timer: f32,
}

/// Seconds between hover steering corrections.
const STEER_INTERVAL: f32 = 0.8;

impl FlyingBugAi {
    pub fn new(body: BodyHandle, home: Vec2, player_body: Option<BodyHandle>) -> Self {
        FlyingBugAi {
            body,
            home,
            player_body,
            movement_impulse: 0.0,
            fire_interval: 2.5,
            steer_timer: 0.0,
            fire_timer: 1.0,
        }
    }

    pub fn update(&mut self, parent: &mut GameObject, ctx: &mut UpdateContext) {
        let delta = ctx.time.delta_seconds();

        self.steer_timer -= delta;
        if self.steer_timer <= 0.0 {
            self.steer_timer = STEER_INTERVAL;
            let to_home = self.home - parent.position;
            let mut impulse = to_home.normalize_or_zero() * self.movement_impulse;
            // Gentle vertical bob so the hover does not look frozen.
            impulse.y += (ctx.time.total_seconds() * 2.0).sin() * self.movement_impulse * 0.4;
            ctx.physics.apply_impulse(self.body, impulse);
        }

        self.fire_timer -= delta;
        if self.fire_timer <= 0.0 {
            self.fire_timer = self.fire_interval;
            let player_position = self
                .player_body
                .and_then(|handle| ctx.physics.position(handle));
            match player_position {
                Some(target) => {
                    let direction = (target - parent.position).normalize_or_zero();
                    if direction != Vec2::ZERO {
                        ctx.spawn(SpawnRequest::Stinger {
                            attacker: parent.id,
                            position: parent.position,
                            direction,
                        });
                    }
                }
                None => {
                    // Stale handle: the target is gone for good.
                    self.player_body = None;
                }
            }
        }
    }
}

/// Kinematic melee sweep: out along `forward` for `forward_time`, back along
/// `backward` for `backward_time`, then the jab object invalidates itself.
pub struct JabController {
    body: BodyHandle,
    forward: Vec2,
    backward: Vec2,
    forward_time: f32,
    backward_time: f32,
    elapsed: f32,
}

impl JabController {
    pub fn new(
        body: BodyHandle,
        forward: Vec2,
        backward: Vec2,
        forward_time: f32,
        backward_time: f32,
    ) -> Self {
        JabController {
            body,
            forward,
            backward,
            forward_time,
            backward_time,
            elapsed: 0.0,
        }
    }

    pub fn update(&mut self, parent: &mut GameObject, ctx: &mut UpdateContext) {
        self.elapsed += ctx.time.delta_seconds();

        let velocity = if self.elapsed <= self.forward_time {
            self.forward / self.forward_time.max(f32::EPSILON)
        } else if self.elapsed <= self.forward_time + self.backward_time {
            self.backward / self.backward_time.max(f32::EPSILON)
        } else {
            ctx.send(
                parent.id,
                Message {
                    sender: parent.id,
                    kind: MessageKind::Invalidate,
                },
            );
            Vec2::ZERO
        };

        if let Some(body) = ctx.physics.body_mut(self.body) {
            body.velocity = velocity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GameTime;
    use crate::input::InputManager;
    use crate::object::{Envelope, GameObjectId};
    use crate::physics::{category, BodyType, PhysicsManager};
    use crate::render::RenderManager;
    use std::time::Duration;

    struct Fixture {
        input: InputManager,
        physics: PhysicsManager,
        render: RenderManager,
        outbox: Vec<Envelope>,
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
                time: GameTime {
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

    fn kinematic_body(physics: &mut PhysicsManager, owner: GameObjectId) -> BodyHandle {
        physics.create_body(
            owner,
            Vec2::ZERO,
            20.0,
            20.0,
            category::PLAYER,
            category::ALL,
            BodyType::Kinematic,
        )
    }

    #[test]
    fn jab_sweeps_forward_then_back_then_invalidates() {
        let mut fixture = Fixture::new();
        let id = GameObjectId(1);
        let body = kinematic_body(&mut fixture.physics, id);
        let mut parent = GameObject::new(id, Vec2::ZERO);
        let mut jab = JabController::new(
            body,
            Vec2::new(36.0, 0.0),
            Vec2::new(-36.0, 0.0),
            0.1,
            0.1,
        );

        let mut ctx = fixture.ctx();
        jab.update(&mut parent, &mut ctx);
        let forward_velocity = ctx.physics.velocity(body).unwrap_or(Vec2::ZERO);
        assert!(forward_velocity.x > 0.0);

        // Past the forward phase, it retracts.
        jab.elapsed = 0.15;
        jab.update(&mut parent, &mut ctx);
        let backward_velocity = ctx.physics.velocity(body).unwrap_or(Vec2::ZERO);
        assert!(backward_velocity.x < 0.0);

        // Past both phases, it asks to be removed.
        jab.elapsed = 0.25;
        jab.update(&mut parent, &mut ctx);
        drop(ctx);
        assert!(fixture
            .outbox
            .iter()
            .any(|envelope| matches!(envelope.message.kind, MessageKind::Invalidate)));
    }

    #[test]
    fn bug_death_effect_spawns_once() {
        let mut fixture = Fixture::new();
        let id = GameObjectId(2);
        let body = kinematic_body(&mut fixture.physics, id);
        let render_key = {
            use crate::render_component::{RectRender, RenderEntry, RenderKind, RenderParams};
            fixture.render.insert(RenderEntry {
                params: RenderParams::new(Vec2::new(8.0, 8.0)),
                kind: RenderKind::Rect(RectRender {
                    color: sdl2::pixels::Color::RGBA(255, 0, 0, 100),
                }),
            })
        };
        let mut parent = GameObject::new(id, Vec2::new(40.0, 40.0));
        let mut controller = FlyingBugController::new(body, render_key);

        let invalidate = Message {
            sender: id,
            kind: MessageKind::Invalidate,
        };
        let mut ctx = fixture.ctx();
        controller.handle_message(&mut parent, &invalidate, &mut ctx);
        controller.handle_message(&mut parent, &invalidate, &mut ctx);
        drop(ctx);

        let corpse_count = fixture
            .spawns
            .iter()
            .filter(|request| matches!(request, SpawnRequest::DeadFlyingBug { .. }))
            .count();
        assert_eq!(corpse_count, 1);
    }

    #[test]
    fn bug_ai_stops_firing_once_the_player_handle_goes_stale() {
        let mut fixture = Fixture::new();
        let bug_id = GameObjectId(3);
        let player_id = GameObjectId(4);
        let bug_body = kinematic_body(&mut fixture.physics, bug_id);
        let player_body = kinematic_body(&mut fixture.physics, player_id);

        let mut parent = GameObject::new(bug_id, Vec2::new(100.0, 0.0));
        let mut ai = FlyingBugAi::new(bug_body, parent.position, Some(player_body));
        ai.fire_timer = 0.0;

        let mut ctx = fixture.ctx();
        ai.update(&mut parent, &mut ctx);
        drop(ctx);
        assert!(fixture
            .spawns
            .iter()
            .any(|request| matches!(request, SpawnRequest::Stinger { .. })));

        // Destroying the player's body makes the handle stale; the next fire
        // window passes quietly.
        fixture.spawns.clear();
        fixture.physics.destroy_body(player_body);
        ai.fire_timer = 0.0;
        let mut ctx = fixture.ctx();
        ai.update(&mut parent, &mut ctx);
        drop(ctx);
        assert!(fixture.spawns.is_empty());
        assert!(ai.player_body.is_none());
    }
}
