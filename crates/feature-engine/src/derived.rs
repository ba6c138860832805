//! Derived Order Values

use serde::{Deserialize, Serialize};

/// Values computed from quantity, price and discount
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedValues {
    /// Line total before discount
    pub total_amount: f64,
    /// Line total after the percentage discount
    pub effective_price: f64,
}

/// Compute the line total and the discounted price.
///
/// Inputs are not range-checked here; the form boundary does that.
pub fn compute_derived(quantity: f64, price: f64, discount_pct: f64) -> DerivedValues {
    let total_amount = quantity * price;
    let effective_price = total_amount * (1.0 - discount_pct / 100.0);
    DerivedValues {
        total_amount,
        effective_price,
    }
}

impl From<DerivedValues> for (f64, f64) {
    fn from(values: DerivedValues) -> Self {
        (values.total_amount, values.effective_price)
    }
}
