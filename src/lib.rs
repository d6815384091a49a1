//! Chatreveal renders chat replies as if they were being typed live.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`text`] tokenizes the inline markup (bold, italic, code,
//!   strikethrough, links) and slices token lists at a visible-character
//!   budget without breaking formatting.
//! - [`core`] owns the reveal state machine, the timer that drives it, and
//!   the chain scheduler that turns queued follow-on blocks into separate
//!   bubbles revealed one after another.
//! - [`ui`] converts span snapshots into styled terminal lines.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod cli;
pub mod core;
pub mod text;
pub mod ui;
