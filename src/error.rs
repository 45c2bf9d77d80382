use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Terminal setup, stdin or stdout failed.
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    /// A command line value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
