//! Pure text core: tokenizing inline markup and measuring/slicing the result.
//!
//! Data flows one way: [`tokenize`] produces spans, [`plain_length`] and
//! [`word_boundaries`] measure them, and [`slice_at`] cuts a visible prefix
//! for a given reveal position.

pub mod slice;
pub mod span;
pub mod tokenizer;
pub mod words;

pub use slice::{plain_length, plain_text, slice_at};
pub use span::{LinkMeta, Span, SpanKind};
pub use tokenizer::tokenize;
pub use words::word_boundaries;
