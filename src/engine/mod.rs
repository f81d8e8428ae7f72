mod command_engine;
mod commands;
mod errors;

pub use command_engine::CommandEngine;
pub use commands::{Command, Operation};
pub use errors::CommandError;
