// main game loop: menus suspend on the next event, a running game
// drains pending input, ticks, draws and sleeps out the rest of the frame
use std::thread;
use std::time::Instant;

use log::info;
use rand::Rng;

use crate::config::GameConfig;
use crate::error::Result;
use crate::game::{GamePhase, GameState};
use crate::input::EventSource;
use crate::render::Renderer;

pub fn run<E, D, R>(
    config: GameConfig,
    events: &mut E,
    renderer: &mut D,
    rng: &mut R,
) -> Result<GameState>
where
    E: EventSource,
    D: Renderer,
    R: Rng + ?Sized,
{
    let mut state = GameState::new(config, rng);
    let tick = config.tick();
    info!("game loop started at {} fps", config.fps);
    loop {
        let phase = state.phase();
        if phase == GamePhase::Quit {
            break;
        }
        if phase.waits_for_input() {
            renderer.render(&state.frame())?;
            let event = events.wait();
            state = state.on_event(event, rng);
            continue;
        }

        let frame_start = Instant::now();
        // receive input until the queue is empty or the game left the running phase
        while let Some(event) = events.poll() {
            state = state.on_event(event, rng);
            if state.phase() != GamePhase::Running {
                break;
            }
        }
        if state.phase() != GamePhase::Running {
            continue;
        }
        state = state.tick(rng);
        // drawn even when this tick ended the game, the overlay follows next round
        renderer.render(&state.playfield())?;
        // wait for next frame
        if let Some(rest) = tick.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }
    info!("quitting with score {}", state.score());
    Ok(state)
}
