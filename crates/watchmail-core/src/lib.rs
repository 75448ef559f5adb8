pub mod ansi;
pub mod diff;
pub mod duration;
mod error;
pub mod highlight;

pub use error::{Error, Result};
