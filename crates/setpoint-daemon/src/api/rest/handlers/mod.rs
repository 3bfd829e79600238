//! API request handlers

mod health;
mod model;
mod ws;

pub use health::*;
pub use model::*;
pub use ws::*;
