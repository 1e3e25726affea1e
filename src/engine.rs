//! Engine core: fixed-timestep run loop, game state stack, per-step time
//!
//! The engine drives the whole game. Each outer loop iteration polls window
//! events, converts the wall-clock delta into whole fixed steps (1/60 s),
//! advances the top game state once per owed step, then renders exactly once.
//! Simulation therefore always moves in constant increments no matter how
//! irregularly frames arrive, and a long stall is paid back as a burst of
//! catch-up steps before the next present.

use std::time::{Duration, Instant};

use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::EventPump;

use crate::assets::AssetCache;
use crate::input::InputManager;
use crate::physics::PhysicsManager;
use crate::render::RenderManager;

/// Simulation step length in seconds.
pub const FIXED_STEP_SECONDS: f64 = 1.0 / 60.0;

/// Immutable snapshot of simulation time for one fixed step.
///
/// A new value is created for every step; consumers never mutate it.
#[derive(Debug, Clone, Copy)]
pub struct GameTime {
    /// Time advanced by this step (always the fixed step).
    pub elapsed: Duration,
    /// Total simulated time since the engine started.
    pub total: Duration,
}

impl GameTime {
    pub fn delta_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn total_seconds(&self) -> f32 {
        self.total.as_secs_f32()
    }
}

/// Wall-clock accumulator that doles out whole fixed steps.
///
/// There is no cap on the number of steps returned from a single call: after
/// a stall every owed step runs before the next render, and simulated time
/// may lag arbitrarily far behind wall time.
#[derive(Debug)]
pub struct FixedTimestep {
    step: f64,
    accumulated: f64,
}

impl FixedTimestep {
    pub fn new(step: f64) -> Self {
        FixedTimestep {
            step,
            accumulated: 0.0,
        }
    }

    /// Feeds `frame_seconds` of wall time into the accumulator and returns
    /// how many whole steps it now owes. The fractional remainder carries
    /// over to the next call.
    pub fn advance(&mut self, frame_seconds: f64) -> u32 {
        self.accumulated += frame_seconds;
        let mut steps = 0;
        while self.accumulated > self.step {
            self.accumulated -= self.step;
            steps += 1;
        }
        steps
    }
}

/// Engine services handed to a game state for one call.
pub struct EngineContext<'a, 'tex> {
    pub time: GameTime,
    pub input: &'a InputManager,
    pub physics: &'a mut PhysicsManager,
    pub render: &'a mut RenderManager,
    pub assets: &'a mut AssetCache<'tex>,
}

/// One entry of the engine's state stack. Only the top state is updated and
/// rendered each frame.
pub trait GameState {
    /// Called once when the state is pushed, before it first updates. Asset
    /// or config failures here abort startup.
    fn on_push(&mut self, ctx: &mut EngineContext) -> Result<(), String>;

    /// Advances the state by exactly one fixed step.
    fn update(&mut self, ctx: &mut EngineContext);

    /// Draws the state. Runs once per outer loop iteration, after all owed
    /// fixed steps for that iteration have completed.
    fn render(&mut self, ctx: &mut EngineContext, canvas: &mut Canvas<Window>)
        -> Result<(), String>;
}

pub struct GameEngine {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    input: InputManager,
    physics: PhysicsManager,
    render: RenderManager,
    states: Vec<Box<dyn GameState>>,
    timestep: FixedTimestep,
    total: Duration,
}

impl GameEngine {
    pub fn new(canvas: Canvas<Window>, event_pump: EventPump) -> Self {
        let (width, height) = canvas.window().size();
        GameEngine {
            canvas,
            event_pump,
            input: InputManager::new(),
            physics: PhysicsManager::new(),
            render: RenderManager::new(width, height),
            states: Vec::new(),
            timestep: FixedTimestep::new(FIXED_STEP_SECONDS),
            total: Duration::ZERO,
        }
    }

    /// Wires the state to the shared engine services and places it on top of
    /// the stack.
    pub fn push_state(
        &mut self,
        mut state: Box<dyn GameState>,
        assets: &mut AssetCache,
    ) -> Result<(), String> {
        let mut ctx = EngineContext {
            time: GameTime {
                elapsed: Duration::ZERO,
                total: self.total,
            },
            input: &self.input,
            physics: &mut self.physics,
            render: &mut self.render,
            assets,
        };
        state.on_push(&mut ctx)?;
        self.states.push(state);
        Ok(())
    }

    /// Removes the top state if the stack is non-empty; no-op otherwise.
    /// No transition hook is invoked on the popped state.
    #[allow(dead_code)] // Reserved for menu/pause states
    pub fn pop_state(&mut self) {
        self.states.pop();
    }

    /// Blocks until the window closes or the state stack empties.
    pub fn run(&mut self, assets: &mut AssetCache) -> Result<(), String> {
        let step = Duration::from_secs_f64(FIXED_STEP_SECONDS);
        let mut last = Instant::now();

        'running: loop {
            if self.input.poll(&mut self.event_pump) {
                break 'running;
            }

            let now = Instant::now();
            let frame = now.duration_since(last);
            last = now;

            let steps = self.timestep.advance(frame.as_secs_f64());
            for _ in 0..steps {
                self.total += step;
                let time = GameTime {
                    elapsed: step,
                    total: self.total,
                };
                let Some(state) = self.states.last_mut() else {
                    break 'running;
                };
                let mut ctx = EngineContext {
                    time,
                    input: &self.input,
                    physics: &mut self.physics,
                    render: &mut self.render,
                    assets: &mut *assets,
                };
                state.update(&mut ctx);
            }
            if steps > 0 {
                // Edge-triggered presses stay visible until a step consumed
                // them; several steps in one iteration share the same edges.
                self.input.clear_pressed();
            }

            // An empty stack means there is nothing left to run.
            let Some(state) = self.states.last_mut() else {
                break 'running;
            };

            self.canvas.set_draw_color(Color::RGB(0, 0, 0));
            self.canvas.clear();
            let mut ctx = EngineContext {
                time: GameTime {
                    elapsed: step,
                    total: self.total,
                },
                input: &self.input,
                physics: &mut self.physics,
                render: &mut self.render,
                assets: &mut *assets,
            };
            state.render(&mut ctx, &mut self.canvas)?;
            self.canvas.present();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_timestep_consumes_whole_steps() {
        let mut timestep = FixedTimestep::new(1.0 / 60.0);

        // A frame shorter than one step owes nothing.
        assert_eq!(timestep.advance(0.010), 0);
        // The remainder carries over: 10ms + 10ms > 16.6ms.
        assert_eq!(timestep.advance(0.010), 1);
    }

    #[test]
    fn fixed_timestep_total_matches_step_multiples() {
        let step = 1.0 / 60.0;
        let mut timestep = FixedTimestep::new(step);

        // Irregular frame pacing: jittery, tiny, and one long stall.
        let frames = [0.017, 0.002, 0.031, 0.0001, 0.25, 0.016, 0.009];
        let mut total_steps: u64 = 0;
        for frame in frames {
            total_steps += u64::from(timestep.advance(frame));
        }

        let simulated = total_steps as f64 * step;
        let wall: f64 = frames.iter().sum();
        // Simulated time is an exact multiple of the step and never exceeds
        // the wall time fed in.
        assert!(simulated <= wall);
        assert!(wall - simulated < step + 1e-9);
    }

    #[test]
    fn fixed_timestep_stall_produces_catch_up_burst() {
        let mut timestep = FixedTimestep::new(1.0 / 60.0);
        // A half-second stall owes a burst of updates, uncapped.
        let steps = timestep.advance(0.508);
        assert_eq!(steps, 30);
    }

    #[test]
    fn game_time_delta_seconds() {
        let time = GameTime {
            elapsed: Duration::from_secs_f64(FIXED_STEP_SECONDS),
            total: Duration::from_secs(2),
        };
        assert!((time.delta_seconds() - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(time.total_seconds(), 2.0);
    }
}
