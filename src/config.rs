use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;
use structopt::StructOpt;

use crate::error::{Error, Result};

#[derive(StructOpt, Debug)]
#[structopt(name = "gridsnake", about = "Classic snake, played in the terminal")]
pub struct Options {
    /// Width of the playing surface in logical units
    #[structopt(long, default_value = "800")]
    pub width: i32,
    /// Height of the playing surface in logical units
    #[structopt(long, default_value = "600")]
    pub height: i32,
    /// Size of one grid cell in logical units
    #[structopt(long, default_value = "10")]
    pub block: i32,
    /// Food coordinates are rounded to multiples of this value
    #[structopt(long, default_value = "10")]
    pub granularity: i32,
    /// Ticks per second
    #[structopt(long, default_value = "30")]
    pub fps: u32,
    /// Seed for food placement, random when omitted
    #[structopt(long)]
    pub seed: Option<u64>,
    #[structopt(long, parse(from_os_str), default_value = "gridsnake.log")]
    pub log_file: PathBuf,
    /// Raise the log level (-v debug, -vv trace)
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,
}

impl Options {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Geometry and pacing of one game, checked once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub block: i32,
    pub granularity: i32,
    pub fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 800,
            height: 600,
            block: 10,
            granularity: 10,
            fps: 30,
        }
    }
}

impl GameConfig {
    pub fn from_options(options: &Options) -> Result<Self> {
        let config = GameConfig {
            width: options.width,
            height: options.height,
            block: options.block,
            granularity: options.granularity,
            fps: options.fps,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.block <= 0 {
            return Err(Error::InvalidConfig("block must be positive"));
        }
        if self.granularity <= 0 {
            return Err(Error::InvalidConfig("granularity must be positive"));
        }
        if self.fps == 0 {
            return Err(Error::InvalidConfig("fps must be positive"));
        }
        // food is drawn from [0, dimension - block), which must not be empty
        if self.width <= self.block || self.height <= self.block {
            return Err(Error::InvalidConfig("surface must be larger than one block"));
        }
        if self.width % self.block != 0 || self.height % self.block != 0 {
            return Err(Error::InvalidConfig("width and height must be multiples of block"));
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }

    /// Number of grid cells along x and y.
    pub fn cells(&self) -> (usize, usize) {
        (
            (self.width / self.block) as usize,
            (self.height / self.block) as usize,
        )
    }
}
