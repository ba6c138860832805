//! Order Input Collection
//!
//! Provides the raw order form fields, their closed option lists, the static
//! state-to-region table, and range/step validation at the collection boundary.

mod error;
mod order;
mod region;
mod validator;

pub use error::ValidationError;
pub use order::{Brand, Category, Choice, Gender, PaymentMode, RawOrderInput, State};
pub use region::{Region, RegionTable};
pub use validator::{parse_number, ValidationConfig, ValidationResult, Validator};
