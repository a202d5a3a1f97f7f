//! CLI module for gadget-advisor
//!
//! Handles command-line argument parsing, terminal rendering and chat input.

pub mod args;
pub mod display;
pub mod input;

pub use args::{join_query, Args, Commands, NewsCommand, SummarizeArgs, TrackCommand, Verbosity};
pub use display::DisplayManager;
pub use input::{ChatInput, InputHandler};
