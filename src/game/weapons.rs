//! Weapon components and the collision-reaction components that ride on
//! projectiles and melee attacks.

use glam::Vec2;

use crate::game::factory::SpawnRequest;
use crate::object::{GameObject, GameObjectId, Message, MessageKind, UpdateContext};
use crate::render::RenderKey;

/// Melee weapon carried by the player: spawns a jab in front of the wielder
/// when the attack key is pressed and the cooldown has elapsed.
pub struct MeleeWeapon {
    pub attack_delay: f32,
    pub offset: Vec2,
    cooldown: f32,
    facing: f32,
}

impl MeleeWeapon {
    pub fn new(attack_delay: f32, offset: Vec2) -> Self {
        MeleeWeapon {
            attack_delay,
            offset,
            cooldown: 0.0,
            facing: 1.0,
        }
    }

    pub fn update(&mut self, parent: &mut GameObject, ctx: &mut UpdateContext) {
        self.cooldown = (self.cooldown - ctx.time.delta_seconds()).max(0.0);

        let axis = ctx.input.move_axis();
        if axis != 0.0 {
            self.facing = axis.signum();
        }

        if ctx.input.melee_pressed() && self.cooldown <= 0.0 {
            self.cooldown = self.attack_delay;
            let position =
                parent.position + Vec2::new(self.offset.x * self.facing, self.offset.y);
            ctx.spawn(SpawnRequest::Jab {
                attacker: parent.id,
                position,
                direction: self.facing as i32,
            });
        }
    }
}

/// Gun carried by the player: fires a bullet (plus a muzzle flash effect)
/// when the shoot key is pressed and the cooldown has elapsed.
pub struct GunWeapon {
    pub attack_delay: f32,
    pub offset: Vec2,
    cooldown: f32,
    facing: f32,
}

impl GunWeapon {
    pub fn new(attack_delay: f32, offset: Vec2) -> Self {
        GunWeapon {
            attack_delay,
            offset,
            cooldown: 0.0,
            facing: 1.0,
        }
    }

    pub fn update(&mut self, parent: &mut GameObject, ctx: &mut UpdateContext) {
        self.cooldown = (self.cooldown - ctx.time.delta_seconds()).max(0.0);

        let axis = ctx.input.move_axis();
        if axis != 0.0 {
            self.facing = axis.signum();
        }

        if ctx.input.shoot_pressed() && self.cooldown <= 0.0 {
            self.cooldown = self.attack_delay;
            let muzzle =
                parent.position + Vec2::new(self.offset.x * self.facing, self.offset.y);
            ctx.spawn(SpawnRequest::Bullet {
                attacker: parent.id,
                position: muzzle,
                direction: self.facing as i32,
            });
            ctx.spawn(SpawnRequest::GunFlash { position: muzzle });
        }
    }
}

/// Deals damage to whatever the parent's body touches. Each target is hit at
/// most once per attack instance, and the attacker is never hit by its own
/// attack.
pub struct Attack {
    pub attacker: GameObjectId,
    pub damage: f32,
    already_hit: Vec<GameObjectId>,
}

impl Attack {
    pub fn new(attacker: GameObjectId, damage: f32) -> Self {
        Attack {
            attacker,
            damage,
            already_hit: Vec::new(),
        }
    }

    pub fn handle_message(
        &mut self,
        parent: &mut GameObject,
        message: &Message,
        ctx: &mut UpdateContext,
    ) {
        if let MessageKind::Collision { other } = message.kind {
            if other == self.attacker || self.already_hit.contains(&other) {
                return;
            }
            self.already_hit.push(other);
            ctx.send(
                other,
                Message {
                    sender: parent.id,
                    kind: MessageKind::Damage(self.damage),
                },
            );
        }
    }
}

/// On first contact, spawns an explosion effect and invalidates the parent.
/// Used by projectiles.
pub struct ExplodeOnCollision {
    triggered: bool,
}

impl ExplodeOnCollision {
    pub fn new() -> Self {
        ExplodeOnCollision { triggered: false }
    }

    pub fn handle_message(
        &mut self,
        parent: &mut GameObject,
        message: &Message,
        ctx: &mut UpdateContext,
    ) {
        if matches!(message.kind, MessageKind::Collision { .. }) && !self.triggered {
            self.triggered = true;
            ctx.spawn(SpawnRequest::Explosion {
                position: parent.position,
            });
            ctx.send(
                parent.id,
                Message {
                    sender: parent.id,
                    kind: MessageKind::Invalidate,
                },
            );
        }
    }
}

impl Default for ExplodeOnCollision {
    fn default() -> Self {
        Self::new()
    }
}

/// Invalidates the parent once its non-looping animation has finished.
/// This is what makes one-shot effects clean themselves up.
pub struct InvalidateOnAnimationEnd {
    render: RenderKey,
}

impl InvalidateOnAnimationEnd {
    pub fn new(render: RenderKey) -> Self {
        InvalidateOnAnimationEnd { render }
    }

    pub fn update(&mut self, parent: &mut GameObject, ctx: &mut UpdateContext) {
        if ctx.render.animation_finished(self.render) {
            ctx.send(
                parent.id,
                Message {
                    sender: parent.id,
                    kind: MessageKind::Invalidate,
                },
            );
        }
    }
}
