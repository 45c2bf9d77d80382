use std::fs::File;
use std::io;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{Config, WriteLogger};
use structopt::StructOpt;

use config::{GameConfig, Options};
use input::{RawTerminal, TerminalInput};
use render::TerminalCanvas;

mod config;
mod error;
mod food;
mod game;
mod input;
mod render;
mod runner;
mod snake;

fn main() -> error::Result<()> {
    let options = Options::from_args();
    let config = GameConfig::from_options(&options)?;

    // Set up logging before anything else, the terminal is the drawing surface
    WriteLogger::init(
        options.log_level(),
        Config::default(),
        File::create(&options.log_file)?,
    )?;
    info!("starting gridsnake with {:?}", config);

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // restored when dropped, also on error
    let _terminal = RawTerminal::enable()?;
    let mut events = TerminalInput::spawn();
    let mut canvas = TerminalCanvas::new(io::stdout(), &config);
    runner::run(config, &mut events, &mut canvas, &mut rng)?;
    Ok(())
}
