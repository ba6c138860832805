//! Order Form Fields

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A closed set of options offered by a single form field
pub trait Choice: Sized + Copy + PartialEq + 'static {
    /// Field name used in messages
    const FIELD: &'static str;
    /// Every option, in the order the form lists them
    const ALL: &'static [Self];

    /// Display name, also used as the feature column suffix
    fn label(&self) -> &'static str;

    /// Resolve free text to an option.
    ///
    /// Matching ignores case, whitespace and punctuation, so `"t-shirts"`,
    /// `"T Shirts"` and `"T-shirts"` all select the same category.
    fn parse_choice(input: &str) -> Result<Self, ValidationError> {
        let wanted = normalize(input);
        Self::ALL
            .iter()
            .copied()
            .find(|option| !wanted.is_empty() && normalize(option.label()) == wanted)
            .ok_or_else(|| ValidationError::UnknownOption {
                field: Self::FIELD,
                value: input.trim().to_string(),
                options: Self::ALL
                    .iter()
                    .map(|option| option.label())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Lowercased alphanumeric skeleton of a name
pub(crate) fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Customer gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Female,
    Male,
}

impl Choice for Gender {
    const FIELD: &'static str = "gender";
    const ALL: &'static [Self] = &[Gender::Female, Gender::Male];

    fn label(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Dresses,
    #[serde(rename = "Ethnic Wear")]
    EthnicWear,
    #[serde(rename = "Formal Wear")]
    FormalWear,
    Jackets,
    Jeans,
    Shirts,
    Shorts,
    Skirts,
    Sleepwear,
    Suits,
    Sweaters,
    #[serde(rename = "T-shirts")]
    TShirts,
    Trousers,
    Undergarments,
}

impl Choice for Category {
    const FIELD: &'static str = "category";
    const ALL: &'static [Self] = &[
        Category::Dresses,
        Category::EthnicWear,
        Category::FormalWear,
        Category::Jackets,
        Category::Jeans,
        Category::Shirts,
        Category::Shorts,
        Category::Skirts,
        Category::Sleepwear,
        Category::Suits,
        Category::Sweaters,
        Category::TShirts,
        Category::Trousers,
        Category::Undergarments,
    ];

    fn label(&self) -> &'static str {
        match self {
            Category::Dresses => "Dresses",
            Category::EthnicWear => "Ethnic Wear",
            Category::FormalWear => "Formal Wear",
            Category::Jackets => "Jackets",
            Category::Jeans => "Jeans",
            Category::Shirts => "Shirts",
            Category::Shorts => "Shorts",
            Category::Skirts => "Skirts",
            Category::Sleepwear => "Sleepwear",
            Category::Suits => "Suits",
            Category::Sweaters => "Sweaters",
            Category::TShirts => "T-shirts",
            Category::Trousers => "Trousers",
            Category::Undergarments => "Undergarments",
        }
    }
}

/// Product brand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Brand {
    #[default]
    #[serde(rename = "H&M")]
    HAndM,
    /// Spelled `Levie's` in the training data; the apostrophe is kept
    #[serde(rename = "Levie's")]
    Levies,
    Nike,
    Pantaloons,
    Puma,
    Raymond,
    Zudio,
}

impl Choice for Brand {
    const FIELD: &'static str = "brand";
    const ALL: &'static [Self] = &[
        Brand::HAndM,
        Brand::Levies,
        Brand::Nike,
        Brand::Pantaloons,
        Brand::Puma,
        Brand::Raymond,
        Brand::Zudio,
    ];

    fn label(&self) -> &'static str {
        match self {
            Brand::HAndM => "H&M",
            Brand::Levies => "Levie's",
            Brand::Nike => "Nike",
            Brand::Pantaloons => "Pantaloons",
            Brand::Puma => "Puma",
            Brand::Raymond => "Raymond",
            Brand::Zudio => "Zudio",
        }
    }
}

/// How the order is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentMode {
    #[default]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
    #[serde(rename = "Online Payment")]
    OnlinePayment,
}

impl Choice for PaymentMode {
    const FIELD: &'static str = "payment mode";
    const ALL: &'static [Self] = &[PaymentMode::CashOnDelivery, PaymentMode::OnlinePayment];

    fn label(&self) -> &'static str {
        match self {
            PaymentMode::CashOnDelivery => "Cash on Delivery",
            PaymentMode::OnlinePayment => "Online Payment",
        }
    }
}

macro_rules! choice_text_impls {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_choice(s)
            }
        }
    )*};
}

choice_text_impls!(Gender, Category, Brand, PaymentMode);

/// Shipping state, as entered.
///
/// States are kept as names rather than a closed enum so that a name outside
/// the region table can still flow through the pipeline (it sets no region
/// flag). See [`crate::RegionTable::resolve`] for canonical spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(String);

impl State {
    /// Wrap a state name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The state name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new("Arunachal Pradesh")
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for State {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("state"));
        }
        Ok(Self::new(name))
    }
}

/// One submission of the order form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOrderInput {
    /// Customer age in years
    pub age: u32,
    pub gender: Gender,
    /// Units ordered (fractional quantities are allowed)
    pub quantity: f64,
    /// Unit price
    pub price: f64,
    /// Discount in percent
    pub discount_pct: f64,
    /// Product rating (0 to 5 stars)
    pub rating: f64,
    pub category: Category,
    pub brand: Brand,
    pub payment_mode: PaymentMode,
    pub state: State,
}

impl Default for RawOrderInput {
    fn default() -> Self {
        Self {
            age: 30,
            gender: Gender::default(),
            quantity: 1.0,
            price: 500.0,
            discount_pct: 0.0,
            rating: 3.5,
            category: Category::default(),
            brand: Brand::default(),
            payment_mode: PaymentMode::default(),
            state: State::default(),
        }
    }
}
