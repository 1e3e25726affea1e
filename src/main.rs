mod animation;
mod assets;
mod engine;
mod game;
mod input;
mod object;
mod physics;
mod render;
mod render_component;

use assets::AssetCache;
use engine::GameEngine;
use game::play_state::PlayState;

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

fn main() -> Result<(), String> {
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let _image_context = sdl2::image::init(sdl2::image::InitFlag::PNG)?;

    let window = video_subsystem
        .window("Hornet", WINDOW_WIDTH, WINDOW_HEIGHT)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let event_pump = sdl_context.event_pump()?;

    let mut assets = AssetCache::new(&texture_creator);
    let mut engine = GameEngine::new(canvas, event_pump);
    engine.push_state(Box::new(PlayState::new()), &mut assets)?;
    engine.run(&mut assets)
}
