//! Terminal rendering for revealed messages.
//!
//! [`render`] turns span snapshots from the reveal core into ratatui lines;
//! [`theme`] holds the styles they are drawn with.

pub mod render;
pub mod theme;
