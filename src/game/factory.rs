//! Data-driven construction of gameplay entities.
//!
//! The factory resolves every config file, texture, and animation template it
//! needs when it is built, so spawning later in the game never touches the
//! filesystem and cannot fail. Components queue [`SpawnRequest`]s during the
//! update pass; the play state feeds them back through [`GameObjectFactory::process`]
//! once the pass is over.

use glam::Vec2;
use sdl2::pixels::Color;
use sdl2::rect::Rect;

use crate::animation::Animation;
use crate::assets::{AssetCache, AssetError, TextureId};
use crate::game::controllers::{
    CharacterController, FlyingBugAi, FlyingBugController, JabController,
};
use crate::game::health::HealthComponent;
use crate::game::weapons::{
    Attack, ExplodeOnCollision, GunWeapon, InvalidateOnAnimationEnd, MeleeWeapon,
};
use crate::game::world::GameWorld;
use crate::object::{Component, GameObject, GameObjectId};
use crate::physics::{category, BodyHandle, BodyType, PhysicsComponent, PhysicsManager};
use crate::render::RenderManager;
use crate::render_component::{
    AnimationRender, AnimationSetRender, LifebarRender, RectRender, RenderEntry, RenderKind,
    RenderParams, SpriteRender,
};

/// Entity creations queued from component code, executed after the update
/// pass so the object collection is never grown mid-iteration.
#[derive(Debug, Clone, Copy)]
pub enum SpawnRequest {
    Bullet {
        attacker: GameObjectId,
        position: Vec2,
        direction: i32,
    },
    Stinger {
        attacker: GameObjectId,
        position: Vec2,
        direction: Vec2,
    },
    Jab {
        attacker: GameObjectId,
        position: Vec2,
        direction: i32,
    },
    Explosion { position: Vec2 },
    ShieldDamageEffect { position: Vec2 },
    GunFlash { position: Vec2 },
    DeadPlayer { position: Vec2 },
    DeadFlyingBug { position: Vec2 },
}

/// Translucent red, matching the collision debug overlay.
const COLLISION_RECT_COLOR: Color = Color::RGBA(255, 0, 0, 100);
const JAB_Z_INDEX: i32 = 100;
const LIFEBAR_Z_INDEX: i32 = 1000;
const MAP_Z_INDEX: i32 = -10;

struct PlayerConfig {
    sprite_size: Vec2,
    z_index: i32,
    collision: Vec2,
    friction: f32,
    gravity_scale: f32,
    mass: f32,
    restitution: f32,
    walk_impulse: f32,
    in_air_impulse: f32,
    jump_impulse: f32,
    walking_damping: f32,
    in_air_damping: f32,
    max_health: f32,
    max_shield: f32,
    animations: Vec<(&'static str, Animation)>,
}

struct FlyingBugConfig {
    sprite_size: Vec2,
    z_index: i32,
    collision: Vec2,
    health: f32,
    mass: f32,
    gravity_scale: f32,
    linear_damping: f32,
    movement_impulse: f32,
    fire_interval: f32,
    animation: Animation,
}

struct BulletConfig {
    sprite_size: Vec2,
    z_index: i32,
    collision: Vec2,
    speed: f32,
    gravity_scale: f32,
    damage: f32,
    animation: Animation,
}

struct StingerConfig {
    sprite_size: Vec2,
    z_index: i32,
    collision: Vec2,
    speed: f32,
    damage: f32,
    texture: TextureId,
    src: Rect,
}

struct JabConfig {
    collision: Vec2,
    damage: f32,
    forward_x: f32,
    backward_x: f32,
    forward_time: f32,
    backward_time: f32,
    texture: TextureId,
    src: Rect,
}

struct WeaponConfig {
    offset: Vec2,
    attack_delay: f32,
}

struct EffectConfig {
    sprite_size: Vec2,
    z_index: i32,
    animation: Animation,
}

pub struct GameObjectFactory {
    next_id: u64,
    player: PlayerConfig,
    flying_bug: FlyingBugConfig,
    bullet: BulletConfig,
    stinger: StingerConfig,
    jab: JabConfig,
    melee_weapon: WeaponConfig,
    gun_weapon: WeaponConfig,
    explosion: EffectConfig,
    shield_damage: EffectConfig,
    gun_flash: EffectConfig,
    dead_player: EffectConfig,
    dead_flying_bug: EffectConfig,
}

impl GameObjectFactory {
    /// Resolves every config, texture, and animation template up front.
    pub fn new(assets: &mut AssetCache) -> Result<Self, AssetError> {
        let config = assets.config("assets/config/player.json")?;
        let player = PlayerConfig {
            sprite_size: Vec2::new(
                config.get_f32("sprite_width")?,
                config.get_f32("sprite_height")?,
            ),
            z_index: config.get_i32("z_index")?,
            collision: Vec2::new(
                config.get_f32("collision_width")?,
                config.get_f32("collision_height")?,
            ),
            friction: config.get_f32("friction")?,
            gravity_scale: config.get_f32("gravity_scale")?,
            mass: config.get_f32("mass")?,
            restitution: config.get_f32("restitution")?,
            walk_impulse: config.get_f32("walk_impulse")?,
            in_air_impulse: config.get_f32("in_air_impulse")?,
            jump_impulse: config.get_f32("jump_impulse")?,
            walking_damping: config.get_f32("walking_linear_damping")?,
            in_air_damping: config.get_f32("in_air_linear_damping")?,
            max_health: config.get_f32("max_health")?,
            max_shield: config.get_f32("max_shield")?,
            animations: vec![
                (
                    "walking",
                    assets.animation("assets/config/player_walking_anim.json")?,
                ),
                (
                    "attacking",
                    assets.animation("assets/config/player_attacking_anim.json")?,
                ),
                (
                    "idle",
                    assets.animation("assets/config/player_idle_anim.json")?,
                ),
                (
                    "jumping",
                    assets.animation("assets/config/player_jumping_anim.json")?,
                ),
                (
                    "falling",
                    assets.animation("assets/config/player_falling_anim.json")?,
                ),
            ],
        };

        let config = assets.config("assets/config/flying_bug.json")?;
        let flying_bug = FlyingBugConfig {
            sprite_size: Vec2::new(
                config.get_f32("sprite_width")?,
                config.get_f32("sprite_height")?,
            ),
            z_index: config.get_i32("z_index")?,
            collision: Vec2::new(
                config.get_f32("collision_width")?,
                config.get_f32("collision_height")?,
            ),
            health: config.get_f32("health")?,
            mass: config.get_f32("mass")?,
            gravity_scale: config.get_f32("gravity_scale")?,
            linear_damping: config.get_f32("linear_damping")?,
            movement_impulse: config.get_f32("movement_impulse")?,
            fire_interval: config.get_f32("fire_interval")?,
            animation: assets.animation("assets/config/flying_bug_flying_anim.json")?,
        };

        let config = assets.config("assets/config/bullet.json")?;
        let bullet = BulletConfig {
            sprite_size: Vec2::new(
                config.get_f32("sprite_width")?,
                config.get_f32("sprite_height")?,
            ),
            z_index: config.get_i32("z_index")?,
            collision: Vec2::new(
                config.get_f32("collision_width")?,
                config.get_f32("collision_height")?,
            ),
            speed: config.get_f32("speed")?,
            gravity_scale: config.get_f32("gravity_scale")?,
            damage: config.get_f32("damage")?,
            animation: assets.animation("assets/config/bullet_anim.json")?,
        };

        let config = assets.config("assets/config/stinger.json")?;
        let stinger_texture = assets.load_texture("assets/sprites/stinger.png")?;
        let (stinger_width, stinger_height) = assets.texture_size(stinger_texture);
        let stinger = StingerConfig {
            sprite_size: Vec2::new(
                config.get_f32("sprite_width")?,
                config.get_f32("sprite_height")?,
            ),
            z_index: config.get_i32("z_index")?,
            collision: Vec2::new(
                config.get_f32("collision_width")?,
                config.get_f32("collision_height")?,
            ),
            speed: config.get_f32("speed")?,
            damage: config.get_f32("damage")?,
            texture: stinger_texture,
            src: Rect::new(0, 0, stinger_width, stinger_height),
        };

        let config = assets.config("assets/config/jab.json")?;
        let sword_texture = assets.load_texture("assets/sprites/sword.png")?;
        let (sword_width, sword_height) = assets.texture_size(sword_texture);
        let jab = JabConfig {
            collision: Vec2::new(
                config.get_f32("collision_width")?,
                config.get_f32("collision_height")?,
            ),
            damage: config.get_f32("damage")?,
            forward_x: config.get_f32("forward_x")?,
            backward_x: config.get_f32("backward_x")?,
            forward_time: config.get_f32("forward_time")?,
            backward_time: config.get_f32("backward_time")?,
            texture: sword_texture,
            src: Rect::new(0, 0, sword_width, sword_height),
        };

        let melee_weapon = Self::weapon_config(assets, "assets/config/melee_weapon.json")?;
        let gun_weapon = Self::weapon_config(assets, "assets/config/gun_weapon.json")?;

        let explosion = Self::effect_config(assets, "assets/config/bullet_hit_effect.json")?;
        let shield_damage =
            Self::effect_config(assets, "assets/config/shield_damage_effect.json")?;
        let gun_flash = Self::effect_config(assets, "assets/config/gun_flash_effect.json")?;
        let dead_player = Self::effect_config(assets, "assets/config/dead_player.json")?;
        let dead_flying_bug =
            Self::effect_config(assets, "assets/config/dead_flying_bug.json")?;

        Ok(GameObjectFactory {
            next_id: 1,
            player,
            flying_bug,
            bullet,
            stinger,
            jab,
            melee_weapon,
            gun_weapon,
            explosion,
            shield_damage,
            gun_flash,
            dead_player,
            dead_flying_bug,
        })
    }

    fn weapon_config(assets: &mut AssetCache, path: &str) -> Result<WeaponConfig, AssetError> {
        let config = assets.config(path)?;
        Ok(WeaponConfig {
            offset: Vec2::new(config.get_f32("offset_x")?, config.get_f32("offset_y")?),
            attack_delay: config.get_f32("attack_delay")?,
        })
    }

    fn effect_config(assets: &mut AssetCache, path: &str) -> Result<EffectConfig, AssetError> {
        let config = assets.config(path)?;
        let animation_path = config.get_str("animation")?.to_string();
        Ok(EffectConfig {
            sprite_size: Vec2::new(
                config.get_f32("sprite_width")?,
                config.get_f32("sprite_height")?,
            ),
            z_index: config.get_i32("z_index")?,
            animation: assets.animation(&animation_path)?,
        })
    }

    fn next_id(&mut self) -> GameObjectId {
        let id = GameObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Executes one queued spawn request.
    pub fn process(
        &mut self,
        request: SpawnRequest,
        world: &mut GameWorld,
        render: &mut RenderManager,
        physics: &mut PhysicsManager,
    ) {
        match request {
            SpawnRequest::Bullet {
                attacker,
                position,
                direction,
            } => {
                self.create_bullet(world, render, physics, attacker, position, direction);
            }
            SpawnRequest::Stinger {
                attacker,
                position,
                direction,
            } => {
                self.create_stinger(world, render, physics, attacker, position, direction);
            }
            SpawnRequest::Jab {
                attacker,
                position,
                direction,
            } => {
                self.create_jab(world, render, physics, attacker, position, direction);
            }
            SpawnRequest::Explosion { position } => {
                self.create_explosion(world, render, position);
            }
            SpawnRequest::ShieldDamageEffect { position } => {
                self.create_shield_damage_effect(world, render, position);
            }
            SpawnRequest::GunFlash { position } => {
                self.create_gun_flash(world, render, position);
            }
            SpawnRequest::DeadPlayer { position } => {
                self.create_dead_player(world, render, position);
            }
            SpawnRequest::DeadFlyingBug { position } => {
                self.create_dead_flying_bug(world, render, position);
            }
        }
    }

    /// The player: animation set, physics body, debug rect, controller,
    /// health with shield and lifebar, and both weapons.
    pub fn create_player(
        &mut self,
        world: &mut GameWorld,
        render: &mut RenderManager,
        physics: &mut PhysicsManager,
        position: Vec2,
    ) -> GameObjectId {
        let id = self.next_id();
        let mut player = GameObject::new(id, position);
        let config = &self.player;

        let mut set = AnimationSetRender::new();
        for (name, template) in &config.animations {
            set.add_animation(name, template.clone_frames());
        }
        let mut params = RenderParams::new(config.sprite_size);
        params.z_index = config.z_index;
        params.world_position = position;
        let sprite_key = render.insert(RenderEntry {
            params,
            kind: RenderKind::AnimationSet(set),
        });
        render.set_active_animation(sprite_key, "walking");
        player.add_component(Component::Render(sprite_key));

        let handle = physics.create_body(
            id,
            position,
            config.collision.x,
            config.collision.y,
            category::PLAYER,
            category::ENEMY | category::MAP,
            BodyType::Dynamic,
        );
        if let Some(body) = physics.body_mut(handle) {
            body.friction = config.friction;
            body.gravity_scale = config.gravity_scale;
            body.mass = config.mass;
            body.restitution = config.restitution;
        }
        player.add_component(Component::Physics(PhysicsComponent { handle }));

        player.add_component(Component::Render(self.collision_rect(
            render,
            config.collision,
            position,
        )));

        let mut controller = CharacterController::new(handle, sprite_key);
        controller.walk_impulse = config.walk_impulse;
        controller.in_air_impulse = config.in_air_impulse;
        controller.jump_impulse = config.jump_impulse;
        controller.walking_damping = config.walking_damping;
        controller.in_air_damping = config.in_air_damping;
        player.add_component(Component::CharacterController(controller));

        let mut health = HealthComponent::new(config.max_health, config.max_shield);
        let mut lifebar_params = RenderParams::new(Vec2::ZERO);
        lifebar_params.z_index = LIFEBAR_Z_INDEX;
        let lifebar_key = render.insert(RenderEntry {
            params: lifebar_params,
            kind: RenderKind::Lifebar(LifebarRender::new()),
        });
        health.set_lifebar(lifebar_key);
        player.add_component(Component::Render(lifebar_key));
        player.add_component(Component::Health(health));

        player.add_component(Component::MeleeWeapon(MeleeWeapon::new(
            self.melee_weapon.attack_delay,
            self.melee_weapon.offset,
        )));
        player.add_component(Component::GunWeapon(GunWeapon::new(
            self.gun_weapon.attack_delay,
            self.gun_weapon.offset,
        )));

        world.add(player);
        id
    }

    /// A hovering enemy that fires stingers at the player.
    pub fn create_flying_bug(
        &mut self,
        world: &mut GameWorld,
        render: &mut RenderManager,
        physics: &mut PhysicsManager,
        position: Vec2,
        player_body: Option<BodyHandle>,
    ) -> GameObjectId {
        let id = self.next_id();
        let mut enemy = GameObject::new(id, position);
        let config = &self.flying_bug;

        let mut set = AnimationSetRender::new();
        set.add_animation("flying", config.animation.clone_frames());
        let mut params = RenderParams::new(config.sprite_size);
        params.z_index = config.z_index;
        params.world_position = position;
        let sprite_key = render.insert(RenderEntry {
            params,
            kind: RenderKind::AnimationSet(set),
        });
        render.set_active_animation(sprite_key, "flying");
        enemy.add_component(Component::Render(sprite_key));

        enemy.add_component(Component::Health(HealthComponent::new(config.health, 0.0)));

        let handle = physics.create_body(
            id,
            position,
            config.collision.x,
            config.collision.y,
            category::ENEMY,
            category::PLAYER | category::MAP,
            BodyType::Dynamic,
        );
        if let Some(body) = physics.body_mut(handle) {
            body.mass = config.mass;
            body.gravity_scale = config.gravity_scale;
            body.linear_damping = config.linear_damping;
        }
        enemy.add_component(Component::Physics(PhysicsComponent { handle }));

        enemy.add_component(Component::FlyingBugController(FlyingBugController::new(
            handle, sprite_key,
        )));

        let mut ai = FlyingBugAi::new(handle, position, player_body);
        ai.movement_impulse = config.movement_impulse;
        ai.fire_interval = config.fire_interval;
        enemy.add_component(Component::FlyingBugAi(ai));

        enemy.add_component(Component::Render(self.collision_rect(
            render,
            config.collision,
            position,
        )));

        world.add(enemy);
        id
    }

    /// A player projectile that explodes on its first contact.
    pub fn create_bullet(
        &mut self,
        world: &mut GameWorld,
        render: &mut RenderManager,
        physics: &mut PhysicsManager,
        attacker: GameObjectId,
        position: Vec2,
        direction: i32,
    ) -> GameObjectId {
        let id = self.next_id();
        let mut bullet = GameObject::new(id, position);
        let config = &self.bullet;

        let handle = physics.create_body(
            id,
            position,
            config.collision.x,
            config.collision.y,
            category::PLAYER,
            category::ENEMY | category::MAP,
            BodyType::Dynamic,
        );
        if let Some(body) = physics.body_mut(handle) {
            body.velocity = Vec2::new(direction as f32 * config.speed, 0.0);
            body.gravity_scale = config.gravity_scale;
            body.linear_damping = 0.0;
        }
        bullet.add_component(Component::Physics(PhysicsComponent { handle }));

        bullet.add_component(Component::Attack(Attack::new(attacker, config.damage)));

        let mut params = RenderParams::new(config.sprite_size);
        params.z_index = config.z_index;
        params.world_position = position;
        params.flip_x = direction < 0;
        let sprite_key = render.insert(RenderEntry {
            params,
            kind: RenderKind::Animated(AnimationRender {
                animation: config.animation.clone_frames(),
            }),
        });
        bullet.add_component(Component::Render(sprite_key));

        bullet.add_component(Component::ExplodeOnCollision(ExplodeOnCollision::new()));

        bullet.add_component(Component::Render(self.collision_rect(
            render,
            config.collision,
            position,
        )));

        world.add(bullet);
        id
    }

    /// An enemy projectile aimed at the player; ignores gravity.
    pub fn create_stinger(
        &mut self,
        world: &mut GameWorld,
        render: &mut RenderManager,
        physics: &mut PhysicsManager,
        attacker: GameObjectId,
        position: Vec2,
        direction: Vec2,
    ) -> GameObjectId {
        let id = self.next_id();
        let mut stinger = GameObject::new(id, position);
        let config = &self.stinger;

        let handle = physics.create_body(
            id,
            position,
            config.collision.x,
            config.collision.y,
            category::ENEMY,
            category::PLAYER | category::MAP,
            BodyType::Dynamic,
        );
        if let Some(body) = physics.body_mut(handle) {
            body.velocity = direction * config.speed;
            body.linear_damping = 0.0;
            body.gravity_scale = 0.0;
        }
        stinger.add_component(Component::Physics(PhysicsComponent { handle }));

        stinger.add_component(Component::Attack(Attack::new(attacker, config.damage)));

        let mut params = RenderParams::new(config.sprite_size);
        params.z_index = config.z_index;
        params.world_position = position;
        params.flip_x = direction.x < 0.0;
        let sprite_key = render.insert(RenderEntry {
            params,
            kind: RenderKind::Sprite(SpriteRender {
                texture: config.texture,
                src: config.src,
            }),
        });
        stinger.add_component(Component::Render(sprite_key));

        stinger.add_component(Component::ExplodeOnCollision(ExplodeOnCollision::new()));

        stinger.add_component(Component::Render(self.collision_rect(
            render,
            config.collision,
            position,
        )));

        world.add(stinger);
        id
    }

    /// One melee strike: a short-lived sensor that sweeps out and back.
    pub fn create_jab(
        &mut self,
        world: &mut GameWorld,
        render: &mut RenderManager,
        physics: &mut PhysicsManager,
        attacker: GameObjectId,
        position: Vec2,
        direction: i32,
    ) -> GameObjectId {
        let id = self.next_id();
        let mut jab = GameObject::new(id, position);
        let config = &self.jab;

        let handle = physics.create_body(
            id,
            position,
            config.collision.x,
            config.collision.y,
            category::PLAYER,
            category::ENEMY | category::MAP,
            BodyType::Kinematic,
        );
        if let Some(body) = physics.body_mut(handle) {
            body.gravity_scale = 0.0;
            body.is_sensor = true;
        }
        jab.add_component(Component::Physics(PhysicsComponent { handle }));

        jab.add_component(Component::Attack(Attack::new(attacker, config.damage)));

        let mut params = RenderParams::new(config.collision);
        params.z_index = JAB_Z_INDEX;
        params.world_position = position;
        params.flip_x = direction < 0;
        let sprite_key = render.insert(RenderEntry {
            params,
            kind: RenderKind::Sprite(SpriteRender {
                texture: config.texture,
                src: config.src,
            }),
        });
        jab.add_component(Component::Render(sprite_key));

        let direction = direction as f32;
        jab.add_component(Component::JabController(JabController::new(
            handle,
            Vec2::new(config.forward_x * direction, 0.0),
            Vec2::new(config.backward_x * direction, 0.0),
            config.forward_time,
            config.backward_time,
        )));

        jab.add_component(Component::Render(self.collision_rect(
            render,
            config.collision,
            position,
        )));

        world.add(jab);
        id
    }

    pub fn create_explosion(
        &mut self,
        world: &mut GameWorld,
        render: &mut RenderManager,
        position: Vec2,
    ) -> GameObjectId {
        self.create_effect(world, render, |factory| &factory.explosion, position)
    }

    pub fn create_shield_damage_effect(
        &mut self,
        world: &mut GameWorld,
        render: &mut RenderManager,
        position: Vec2,
    ) -> GameObjectId {
        self.create_effect(world, render, |factory| &factory.shield_damage, position)
    }

    pub fn create_gun_flash(
        &mut self,
        world: &mut GameWorld,
        render: &mut RenderManager,
        position: Vec2,
    ) -> GameObjectId {
        self.create_effect(world, render, |factory| &factory.gun_flash, position)
    }

    pub fn create_dead_player(
        &mut self,
        world: &mut GameWorld,
        render: &mut RenderManager,
        position: Vec2,
    ) -> GameObjectId {
        self.create_effect(world, render, |factory| &factory.dead_player, position)
    }

    pub fn create_dead_flying_bug(
        &mut self,
        world: &mut GameWorld,
        render: &mut RenderManager,
        position: Vec2,
    ) -> GameObjectId {
        self.create_effect(world, render, |factory| &factory.dead_flying_bug, position)
    }

    /// A one-shot animation that plays once and removes itself.
    fn create_effect(
        &mut self,
        world: &mut GameWorld,
        render: &mut RenderManager,
        config: fn(&Self) -> &EffectConfig,
        position: Vec2,
    ) -> GameObjectId {
        let id = self.next_id();
        let config = config(self);
        let mut effect = GameObject::new(id, position);

        let mut animation = config.animation.clone_frames();
        animation.set_looping(false);
        let mut params = RenderParams::new(config.sprite_size);
        params.z_index = config.z_index;
        params.world_position = position;
        let key = render.insert(RenderEntry {
            params,
            kind: RenderKind::Animated(AnimationRender { animation }),
        });
        effect.add_component(Component::Render(key));
        effect.add_component(Component::InvalidateOnAnimationEnd(
            InvalidateOnAnimationEnd::new(key),
        ));

        world.add(effect);
        id
    }

    /// Static level geometry: ground and side walls with flat rendering.
    pub fn create_map(
        &mut self,
        world: &mut GameWorld,
        render: &mut RenderManager,
        physics: &mut PhysicsManager,
    ) {
        let platforms = [
            // Ground across the bottom of the arena.
            (Vec2::new(640.0, 680.0), Vec2::new(1280.0, 80.0)),
            // Side walls.
            (Vec2::new(-20.0, 360.0), Vec2::new(40.0, 720.0)),
            (Vec2::new(1300.0, 360.0), Vec2::new(40.0, 720.0)),
            // A floating platform to jump onto.
            (Vec2::new(420.0, 480.0), Vec2::new(240.0, 30.0)),
        ];

        for (position, size) in platforms {
            let id = self.next_id();
            let mut platform = GameObject::new(id, position);

            let handle = physics.create_body(
                id,
                position,
                size.x,
                size.y,
                category::MAP,
                category::ALL,
                BodyType::Static,
            );
            if let Some(body) = physics.body_mut(handle) {
                body.friction = 0.4;
            }
            platform.add_component(Component::Physics(PhysicsComponent { handle }));

            let mut params = RenderParams::new(size);
            params.z_index = MAP_Z_INDEX;
            params.world_position = position;
            let key = render.insert(RenderEntry {
                params,
                kind: RenderKind::Rect(RectRender {
                    color: Color::RGB(70, 62, 52),
                }),
            });
            platform.add_component(Component::Render(key));

            world.add(platform);
        }
    }

    /// The translucent box every collidable entity carries for debugging.
    fn collision_rect(
        &self,
        render: &mut RenderManager,
        size: Vec2,
        position: Vec2,
    ) -> crate::render::RenderKey {
        let mut params = RenderParams::new(size);
        params.world_position = position;
        render.insert(RenderEntry {
            params,
            kind: RenderKind::Rect(RectRender {
                color: COLLISION_RECT_COLOR,
            }),
        })
    }
}
