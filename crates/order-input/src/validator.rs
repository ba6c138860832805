//! Order Validator for Range Checking

use crate::error::ValidationError;
use crate::order::RawOrderInput;
use crate::region::RegionTable;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Customer age valid range (years)
    pub age_range: (u32, u32),
    /// Quantity valid range
    pub quantity_range: (f64, f64),
    /// Quantity step
    pub quantity_step: f64,
    /// Unit price valid range
    pub price_range: (f64, f64),
    /// Discount valid range (%)
    pub discount_range: (f64, f64),
    /// Product rating valid range
    pub rating_range: (f64, f64),
    /// Product rating step
    pub rating_step: f64,
    /// Accept states missing from the region table
    pub allow_unlisted_states: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            age_range: (18, 99),
            quantity_range: (0.0, 10.0),
            quantity_step: 0.1,
            price_range: (0.0, f64::MAX),
            discount_range: (0.0, 100.0),
            rating_range: (0.0, 5.0),
            rating_step: 0.5,
            allow_unlisted_states: false,
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }

    /// First error, if any
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Slack allowed when checking that a value lies on a step grid
const STEP_TOLERANCE: f64 = 1e-6;

/// Validator for order form submissions
pub struct Validator {
    config: ValidationConfig,
    regions: RegionTable,
}

impl Validator {
    /// Create a new validator with given config and region table
    pub fn new(config: ValidationConfig, regions: RegionTable) -> Self {
        Self { config, regions }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Region table used for state checks
    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() || value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate that `value` is `origin + k * step` for some integer k
    pub fn validate_step(
        &self,
        field: &'static str,
        value: f64,
        origin: f64,
        step: f64,
    ) -> Result<(), ValidationError> {
        if step <= 0.0 {
            return Ok(());
        }
        let steps = (value - origin) / step;
        if (steps - steps.round()).abs() > STEP_TOLERANCE {
            Err(ValidationError::OffStep { field, value, step })
        } else {
            Ok(())
        }
    }

    /// Validate age
    pub fn validate_age(&self, age: u32) -> Result<(), ValidationError> {
        let (min, max) = self.config.age_range;
        self.validate_range("age", age as f64, (min as f64, max as f64))
    }

    /// Validate quantity
    pub fn validate_quantity(&self, quantity: f64) -> Result<(), ValidationError> {
        let range = self.config.quantity_range;
        self.validate_range("quantity", quantity, range)?;
        self.validate_step("quantity", quantity, range.0, self.config.quantity_step)
    }

    /// Validate unit price
    pub fn validate_price(&self, price: f64) -> Result<(), ValidationError> {
        self.validate_range("price", price, self.config.price_range)
    }

    /// Validate discount percentage
    pub fn validate_discount(&self, discount_pct: f64) -> Result<(), ValidationError> {
        self.validate_range("discount", discount_pct, self.config.discount_range)
    }

    /// Validate product rating
    pub fn validate_rating(&self, rating: f64) -> Result<(), ValidationError> {
        let range = self.config.rating_range;
        self.validate_range("rating", rating, range)?;
        self.validate_step("rating", rating, range.0, self.config.rating_step)
    }

    /// Validate that the order totals stay representable.
    ///
    /// Each factor may be in range while `quantity * price` overflows, and a
    /// 100% discount would then turn the effective price into NaN. Non-finite
    /// inputs are left to their own field checks.
    pub fn validate_amounts(
        &self,
        quantity: f64,
        price: f64,
        discount_pct: f64,
    ) -> Result<(), ValidationError> {
        if !(quantity.is_finite() && price.is_finite() && discount_pct.is_finite()) {
            return Ok(());
        }
        let total_amount = quantity * price;
        let effective_price = total_amount * (1.0 - discount_pct / 100.0);
        self.validate_range("total amount", total_amount, (f64::MIN, f64::MAX))?;
        self.validate_range("effective price", effective_price, (f64::MIN, f64::MAX))
    }

    /// Validate that the state is listed in a region
    pub fn validate_state(&self, state: &str) -> Result<(), ValidationError> {
        if self.config.allow_unlisted_states || self.regions.region_of(state).is_some() {
            Ok(())
        } else {
            Err(ValidationError::UnlistedState(state.to_string()))
        }
    }

    /// Validate every field of a submission
    pub fn validate(&self, input: &RawOrderInput) -> ValidationResult {
        let checks = [
            self.validate_age(input.age),
            self.validate_quantity(input.quantity),
            self.validate_price(input.price),
            self.validate_discount(input.discount_pct),
            self.validate_rating(input.rating),
            self.validate_amounts(input.quantity, input.price, input.discount_pct),
            self.validate_state(input.state.as_str()),
        ];
        let fields_checked = checks.len();
        let errors: Vec<ValidationError> = checks.into_iter().filter_map(Result::err).collect();

        if errors.is_empty() {
            ValidationResult::valid(fields_checked)
        } else {
            debug!("Order input rejected: {} invalid field(s)", errors.len());
            ValidationResult::invalid(errors, fields_checked)
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default(), RegionTable::standard())
    }
}

/// Parse a numeric form field
pub fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    text: &str,
) -> Result<T, ValidationError>
where
    T::Err: std::fmt::Display,
{
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    text.parse::<T>().map_err(|e| ValidationError::InvalidFormat {
        field,
        reason: format!("'{text}': {e}"),
    })
}
