//! Result Presentation
//!
//! Turns a prediction into the message shown to the user, alongside the
//! auto-calculated values and the full feature table.

mod presenter;

pub use presenter::{format_probability, present, DisplayPayload, Tone};
