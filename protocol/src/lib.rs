//! Boundary between a chat transport and the skirmish engine: what comes in,
//! what goes out, and how it looks on screen.

pub use callback::*;
pub use dispatch::*;
pub use error::*;
pub use message::*;

pub mod render;

mod callback;
mod command;
mod dispatch;
mod error;
mod message;
