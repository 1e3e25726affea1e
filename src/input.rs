//! Input manager shared by every game state.
//!
//! Polls the SDL event pump once per outer loop iteration and exposes the
//! results as game-level queries, so gameplay code never touches raw events.

use std::collections::HashSet;

use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::EventPump;

pub struct InputManager {
    held: HashSet<Scancode>,
    pressed: HashSet<Scancode>,
}

impl InputManager {
    pub fn new() -> Self {
        InputManager {
            held: HashSet::new(),
            pressed: HashSet::new(),
        }
    }

    /// Drains pending window events. Returns true when the window was closed.
    pub fn poll(&mut self, event_pump: &mut EventPump) -> bool {
        let mut quit = false;
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => quit = true,
                Event::KeyDown {
                    scancode: Some(scancode),
                    repeat: false,
                    ..
                } => {
                    self.held.insert(scancode);
                    self.pressed.insert(scancode);
                }
                Event::KeyUp {
                    scancode: Some(scancode),
                    ..
                } => {
                    self.held.remove(&scancode);
                }
                _ => {}
            }
        }
        quit
    }

    /// Clears edge-triggered presses. Called by the engine once the presses
    /// have been seen by at least one fixed step.
    pub fn clear_pressed(&mut self) {
        self.pressed.clear();
    }

    /// Horizontal movement axis: -1.0 (left), 0.0, or 1.0 (right).
    pub fn move_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.held.contains(&Scancode::A) {
            axis -= 1.0;
        }
        if self.held.contains(&Scancode::D) {
            axis += 1.0;
        }
        axis
    }

    pub fn jump_pressed(&self) -> bool {
        self.pressed.contains(&Scancode::Space)
    }

    pub fn melee_pressed(&self) -> bool {
        self.pressed.contains(&Scancode::M)
    }

    pub fn shoot_pressed(&self) -> bool {
        self.pressed.contains(&Scancode::N)
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
