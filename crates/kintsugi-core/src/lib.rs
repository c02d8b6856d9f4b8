pub mod engine;
pub mod error;
pub mod io;
pub mod merge;
pub mod messages;
pub mod paths;
pub mod profile;
pub mod types;
pub mod vessel;

pub use error::{KintsugiError, Result};
