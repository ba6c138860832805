//! Feature Vector Assembly

use crate::derived::{compute_derived, DerivedValues};
use crate::schema::{Column, FEATURE_DIMENSION};
use order_input::{Gender, PaymentMode, RawOrderInput, Region, RegionTable};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use tracing::debug;

/// Feature vector for ML inference.
///
/// Always holds every schema column in schema order. Flags are stored as
/// `0.0`/`1.0`. Serializes as an ordered `{column name: value}` map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_DIMENSION],
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            values: [0.0; FEATURE_DIMENSION],
        }
    }
}

impl FeatureVector {
    /// Value of one column
    pub fn get(&self, column: Column) -> f64 {
        self.values[column.index()]
    }

    /// Set one column
    pub fn set(&mut self, column: Column, value: f64) {
        self.values[column.index()] = value;
    }

    /// Set a flag column to 1 or 0
    pub fn set_flag(&mut self, column: Column, on: bool) {
        self.set(column, if on { 1.0 } else { 0.0 });
    }

    /// Raw values in schema order
    pub fn values(&self) -> &[f64; FEATURE_DIMENSION] {
        &self.values
    }

    /// `(column name, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Column::ALL
            .iter()
            .map(move |column| (column.name(), self.get(*column)))
    }

    /// Number of columns in `group` that are set
    pub fn count_set(&self, group: &[Column]) -> usize {
        group.iter().filter(|column| self.get(**column) != 0.0).count()
    }

    /// Values narrowed to `f32`, for runtimes that take single precision
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|v| *v as f32).collect()
    }

    /// Build a vector from arbitrary named values.
    ///
    /// Schema columns missing from `pairs` stay 0 and names outside the
    /// schema are dropped.
    pub fn from_named<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut vector = Self::default();
        for (name, value) in pairs {
            match Column::from_name(name) {
                Some(column) => vector.set(column, value),
                None => debug!("Dropping column outside schema: {}", name),
            }
        }
        vector
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_DIMENSION))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeatureVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let named = HashMap::<String, f64>::deserialize(deserializer)?;
        Ok(Self::from_named(
            named.iter().map(|(name, value)| (name.as_str(), *value)),
        ))
    }
}

/// Encodes order submissions into feature vectors
pub struct FeatureBuilder {
    /// State membership used for the region flags
    regions: RegionTable,
}

impl FeatureBuilder {
    /// Create a new builder over the given region table
    pub fn new(regions: RegionTable) -> Self {
        Self { regions }
    }

    /// Encode a submission together with its derived values.
    ///
    /// A state missing from the region table leaves every region flag at 0.
    pub fn build_features(
        &self,
        raw: &RawOrderInput,
        total_amount: f64,
        effective_price: f64,
    ) -> FeatureVector {
        let mut features = FeatureVector::default();

        features.set(Column::Age, raw.age as f64);
        features.set(Column::Quantity, raw.quantity);
        features.set(Column::Price, raw.price);
        features.set(Column::Discount, raw.discount_pct);
        features.set(Column::ProductRating, raw.rating);
        features.set(Column::TotalAmount, total_amount);
        features.set(Column::EffectivePrice, effective_price);

        features.set_flag(Column::Gender, raw.gender == Gender::Male);

        for column in Column::category_columns() {
            features.set_flag(*column, Column::for_category(raw.category) == *column);
        }
        for column in Column::brand_columns() {
            features.set_flag(*column, Column::for_brand(raw.brand) == *column);
        }

        features.set_flag(
            Column::PaymentModeOnline,
            raw.payment_mode == PaymentMode::OnlinePayment,
        );

        let state = raw.state.as_str();
        for region in Region::ALL {
            features.set_flag(Column::for_region(region), self.regions.is_member(region, state));
        }
        if self.regions.region_of(state).is_none() {
            debug!("State '{}' is in no region; region flags left at 0", state);
        }

        features
    }

    /// Compute derived values and encode the submission in one pass
    pub fn build(&self, raw: &RawOrderInput) -> (DerivedValues, FeatureVector) {
        let derived = compute_derived(raw.quantity, raw.price, raw.discount_pct);
        let features = self.build_features(raw, derived.total_amount, derived.effective_price);
        debug!(
            "Built feature vector: total_amount={:.2}, effective_price={:.2}",
            derived.total_amount, derived.effective_price
        );
        (derived, features)
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(RegionTable::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_input::{Brand, Category, Choice, State};
    use proptest::prelude::*;

    fn order() -> RawOrderInput {
        RawOrderInput::default()
    }

    #[test]
    fn test_numeric_fields_copied() {
        let builder = FeatureBuilder::default();
        let (derived, features) = builder.build(&order());

        assert_eq!(features.get(Column::Age), 30.0);
        assert_eq!(features.get(Column::Gender), 0.0);
        assert_eq!(features.get(Column::Quantity), 1.0);
        assert_eq!(features.get(Column::Price), 500.0);
        assert_eq!(features.get(Column::Discount), 0.0);
        assert_eq!(features.get(Column::ProductRating), 3.5);
        assert_eq!(features.get(Column::TotalAmount), 500.0);
        assert_eq!(features.get(Column::EffectivePrice), 500.0);
        assert_eq!(derived.total_amount, 500.0);
    }

    #[test]
    fn test_gender_and_payment_flags() {
        let builder = FeatureBuilder::default();
        let raw = RawOrderInput {
            gender: Gender::Male,
            payment_mode: PaymentMode::OnlinePayment,
            ..order()
        };
        let (_, features) = builder.build(&raw);
        assert_eq!(features.get(Column::Gender), 1.0);
        assert_eq!(features.get(Column::PaymentModeOnline), 1.0);
    }

    #[test]
    fn test_jeans_sets_single_category_flag() {
        let builder = FeatureBuilder::default();
        let raw = RawOrderInput {
            category: Category::Jeans,
            ..order()
        };
        let (_, features) = builder.build(&raw);
        assert_eq!(features.get(Column::CategoryJeans), 1.0);
        assert_eq!(features.count_set(Column::category_columns()), 1);
    }

    #[test]
    fn test_levies_column_keeps_apostrophe() {
        let builder = FeatureBuilder::default();
        let raw = RawOrderInput {
            brand: Brand::Levies,
            ..order()
        };
        let (_, features) = builder.build(&raw);
        let (name, value) = features
            .iter()
            .find(|(name, _)| name.starts_with("Brand_L"))
            .unwrap();
        assert_eq!(name, "Brand_Levie's");
        assert_eq!(value, 1.0);
        assert_eq!(features.count_set(Column::brand_columns()), 1);
    }

    #[test]
    fn test_maharashtra_is_west() {
        let builder = FeatureBuilder::default();
        let raw = RawOrderInput {
            state: State::new("Maharashtra"),
            ..order()
        };
        let (_, features) = builder.build(&raw);
        assert_eq!(features.get(Column::RegionWest), 1.0);
        assert_eq!(features.count_set(Column::region_columns()), 1);
    }

    #[test]
    fn test_unlisted_state_sets_no_region() {
        let builder = FeatureBuilder::default();
        let raw = RawOrderInput {
            state: State::new("Andhra Pradesh"),
            ..order()
        };
        let (_, features) = builder.build(&raw);
        assert_eq!(features.count_set(Column::region_columns()), 0);
    }

    #[test]
    fn test_iter_follows_schema() {
        let (_, features) = FeatureBuilder::default().build(&order());
        let names: Vec<&str> = features.iter().map(|(name, _)| name).collect();
        assert_eq!(names.len(), FEATURE_DIMENSION);
        assert_eq!(names[0], "Age");
        assert_eq!(names[FEATURE_DIMENSION - 1], "Region_North");
    }

    #[test]
    fn test_from_named_pads_and_drops() {
        let features = FeatureVector::from_named([
            ("Age", 44.0),
            ("Region_South", 1.0),
            ("Customer_ID", 12345.0),
        ]);
        assert_eq!(features.get(Column::Age), 44.0);
        assert_eq!(features.get(Column::RegionSouth), 1.0);
        assert_eq!(features.get(Column::Price), 0.0);
        assert_eq!(features.values().iter().filter(|v| **v != 0.0).count(), 2);
    }

    #[test]
    fn test_json_keeps_column_order() {
        let (_, features) = FeatureBuilder::default().build(&order());
        let json = serde_json::to_string(&features).unwrap();
        assert!(json.starts_with("{\"Age\":30.0,\"Gender\":0.0,"));
        let back: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, features);
    }

    fn any_order() -> impl Strategy<Value = RawOrderInput> {
        let states = RegionTable::standard().states();
        (
            18u32..=99,
            prop::sample::select(Gender::ALL.to_vec()),
            0u32..=100,
            0.0f64..=5_000.0,
            0.0f64..=100.0,
            0u32..=10,
            prop::sample::select(Category::ALL.to_vec()),
            prop::sample::select(Brand::ALL.to_vec()),
            prop::sample::select(PaymentMode::ALL.to_vec()),
            prop::sample::select(states),
        )
            .prop_map(
                |(age, gender, tenths, price, discount_pct, halves, category, brand, payment_mode, state)| {
                    RawOrderInput {
                        age,
                        gender,
                        quantity: tenths as f64 / 10.0,
                        price,
                        discount_pct,
                        rating: halves as f64 * 0.5,
                        category,
                        brand,
                        payment_mode,
                        state: State::new(state),
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn prop_one_hot_groups_have_single_flag(raw in any_order()) {
            let (_, features) = FeatureBuilder::default().build(&raw);
            prop_assert_eq!(features.count_set(Column::category_columns()), 1);
            prop_assert_eq!(features.count_set(Column::brand_columns()), 1);
            prop_assert_eq!(features.count_set(Column::region_columns()), 1);
            prop_assert_eq!(features.get(Column::for_category(raw.category)), 1.0);
            prop_assert_eq!(features.get(Column::for_brand(raw.brand)), 1.0);
        }

        #[test]
        fn prop_build_is_idempotent(raw in any_order()) {
            let builder = FeatureBuilder::default();
            let first = builder.build(&raw);
            let second = builder.build(&raw);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_values_are_finite(raw in any_order()) {
            let (_, features) = FeatureBuilder::default().build(&raw);
            prop_assert_eq!(features.values().len(), FEATURE_DIMENSION);
            prop_assert!(features.values().iter().all(|v| v.is_finite()));
        }
    }
}
