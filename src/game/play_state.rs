//! The playable scene: arena, player, and a handful of flying bugs.

use glam::Vec2;
use sdl2::render::Canvas;
use sdl2::video::Window;

use crate::engine::{EngineContext, GameState};
use crate::game::factory::GameObjectFactory;
use crate::game::world::GameWorld;

/// Fixed enemy spawn points spread across the arena.
const BUG_SPAWNS: [Vec2; 3] = [
    Vec2::new(900.0, 260.0),
    Vec2::new(1050.0, 420.0),
    Vec2::new(700.0, 180.0),
];

const PLAYER_SPAWN: Vec2 = Vec2::new(300.0, 400.0);

pub struct PlayState {
    world: GameWorld,
    factory: Option<GameObjectFactory>,
}

impl PlayState {
    pub fn new() -> Self {
        PlayState {
            world: GameWorld::new(),
            factory: None,
        }
    }
}

impl Default for PlayState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for PlayState {
    fn on_push(&mut self, ctx: &mut EngineContext) -> Result<(), String> {
        let mut factory = GameObjectFactory::new(ctx.assets).map_err(|e| e.to_string())?;

        factory.create_map(&mut self.world, ctx.render, ctx.physics);
        let player =
            factory.create_player(&mut self.world, ctx.render, ctx.physics, PLAYER_SPAWN);
        let player_body = self.world.body_handle(player);
        for position in BUG_SPAWNS {
            factory.create_flying_bug(
                &mut self.world,
                ctx.render,
                ctx.physics,
                position,
                player_body,
            );
        }
        self.factory = Some(factory);

        println!("Controls:");
        println!("A/D   - Move");
        println!("Space - Jump");
        println!("M     - Melee attack");
        println!("N     - Shoot");
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        self.world
            .update(ctx.time, ctx.input, ctx.physics, ctx.render);

        // Entities queued by components join the world now, once the pass is
        // over; they first update on the next step.
        if let Some(factory) = &mut self.factory {
            for request in self.world.take_spawns() {
                factory.process(request, &mut self.world, ctx.render, ctx.physics);
            }
        }
    }

    fn render(
        &mut self,
        ctx: &mut EngineContext,
        canvas: &mut Canvas<Window>,
    ) -> Result<(), String> {
        ctx.render.render(canvas, ctx.assets)
    }
}
