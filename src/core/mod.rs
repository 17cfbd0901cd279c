//! Collection runtime: the `unbound-control` collector and stats parser,
//! the payload model, the JSON emitter, and the single-pass pipeline tying
//! them together.

pub mod collectors;
pub mod emitter;
pub mod error;
pub mod payload;
pub mod pipeline;
