//! Feature Engineering Engine
//!
//! Turns a raw order submission into the 35-column feature vector the
//! return-risk classifier was trained on.

mod derived;
mod features;
mod schema;

pub use derived::{compute_derived, DerivedValues};
pub use features::{FeatureBuilder, FeatureVector};
pub use schema::{Column, FEATURE_DIMENSION};
