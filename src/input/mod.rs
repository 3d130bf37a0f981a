//! Pointer input sources
//!
//! Everything that produces pointer samples for the joystick: the sample
//! types themselves, CSV trace replay, and the interactive command parser.

pub mod command;
pub mod pointer;
pub mod replay;

pub use command::ReplCommand;
pub use pointer::{PointerPhase, PointerSample};
pub use replay::{load_trace, replay_trace, ReplaySummary};
