//! Classifier Input Schema
//!
//! The column set and order are fixed by the training data. Every column is a
//! variant of [`Column`], and the variant's discriminant is its position in
//! the vector.

use order_input::{Brand, Category, Region};

/// Number of columns in the feature vector
pub const FEATURE_DIMENSION: usize = 35;

/// Columns in schema order, with a fixed address for slicing
static SCHEMA: [Column; FEATURE_DIMENSION] = Column::ALL;

/// One column of the classifier input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(usize)]
pub enum Column {
    Age,
    Gender,
    Quantity,
    Price,
    Discount,
    ProductRating,
    CategoryDresses,
    CategoryEthnicWear,
    CategoryFormalWear,
    CategoryJackets,
    CategoryJeans,
    CategoryShirts,
    CategoryShorts,
    CategorySkirts,
    CategorySleepwear,
    CategorySuits,
    CategorySweaters,
    CategoryTShirts,
    CategoryTrousers,
    CategoryUndergarments,
    BrandHAndM,
    BrandLevies,
    BrandNike,
    BrandPantaloons,
    BrandPuma,
    BrandRaymond,
    BrandZudio,
    TotalAmount,
    EffectivePrice,
    PaymentModeOnline,
    RegionEast,
    RegionWest,
    RegionCentral,
    RegionSouth,
    RegionNorth,
}

impl Column {
    /// All columns in schema order
    pub const ALL: [Column; FEATURE_DIMENSION] = [
        Column::Age,
        Column::Gender,
        Column::Quantity,
        Column::Price,
        Column::Discount,
        Column::ProductRating,
        Column::CategoryDresses,
        Column::CategoryEthnicWear,
        Column::CategoryFormalWear,
        Column::CategoryJackets,
        Column::CategoryJeans,
        Column::CategoryShirts,
        Column::CategoryShorts,
        Column::CategorySkirts,
        Column::CategorySleepwear,
        Column::CategorySuits,
        Column::CategorySweaters,
        Column::CategoryTShirts,
        Column::CategoryTrousers,
        Column::CategoryUndergarments,
        Column::BrandHAndM,
        Column::BrandLevies,
        Column::BrandNike,
        Column::BrandPantaloons,
        Column::BrandPuma,
        Column::BrandRaymond,
        Column::BrandZudio,
        Column::TotalAmount,
        Column::EffectivePrice,
        Column::PaymentModeOnline,
        Column::RegionEast,
        Column::RegionWest,
        Column::RegionCentral,
        Column::RegionSouth,
        Column::RegionNorth,
    ];

    /// Position in the feature vector
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name exactly as the classifier was trained with
    pub fn name(self) -> &'static str {
        match self {
            Column::Age => "Age",
            Column::Gender => "Gender",
            Column::Quantity => "Quantity",
            Column::Price => "Price",
            Column::Discount => "Discount",
            Column::ProductRating => "Product Rating",
            Column::CategoryDresses => "Category_Dresses",
            Column::CategoryEthnicWear => "Category_Ethnic Wear",
            Column::CategoryFormalWear => "Category_Formal Wear",
            Column::CategoryJackets => "Category_Jackets",
            Column::CategoryJeans => "Category_Jeans",
            Column::CategoryShirts => "Category_Shirts",
            Column::CategoryShorts => "Category_Shorts",
            Column::CategorySkirts => "Category_Skirts",
            Column::CategorySleepwear => "Category_Sleepwear",
            Column::CategorySuits => "Category_Suits",
            Column::CategorySweaters => "Category_Sweaters",
            Column::CategoryTShirts => "Category_T-shirts",
            Column::CategoryTrousers => "Category_Trousers",
            Column::CategoryUndergarments => "Category_Undergarments",
            Column::BrandHAndM => "Brand_H&M",
            Column::BrandLevies => "Brand_Levie's",
            Column::BrandNike => "Brand_Nike",
            Column::BrandPantaloons => "Brand_Pantaloons",
            Column::BrandPuma => "Brand_Puma",
            Column::BrandRaymond => "Brand_Raymond",
            Column::BrandZudio => "Brand_Zudio",
            Column::TotalAmount => "Total_Amount",
            Column::EffectivePrice => "Effective_Price",
            Column::PaymentModeOnline => "payment_mode_Online Payment",
            Column::RegionEast => "Region_East",
            Column::RegionWest => "Region_West",
            Column::RegionCentral => "Region_Central",
            Column::RegionSouth => "Region_South",
            Column::RegionNorth => "Region_North",
        }
    }

    /// Whether the column holds a 0/1 flag
    pub fn is_flag(self) -> bool {
        !matches!(
            self,
            Column::Age
                | Column::Quantity
                | Column::Price
                | Column::Discount
                | Column::ProductRating
                | Column::TotalAmount
                | Column::EffectivePrice
        )
    }

    /// Look a column up by its exact name
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// One-hot column for a category
    pub fn for_category(category: Category) -> Column {
        match category {
            Category::Dresses => Column::CategoryDresses,
            Category::EthnicWear => Column::CategoryEthnicWear,
            Category::FormalWear => Column::CategoryFormalWear,
            Category::Jackets => Column::CategoryJackets,
            Category::Jeans => Column::CategoryJeans,
            Category::Shirts => Column::CategoryShirts,
            Category::Shorts => Column::CategoryShorts,
            Category::Skirts => Column::CategorySkirts,
            Category::Sleepwear => Column::CategorySleepwear,
            Category::Suits => Column::CategorySuits,
            Category::Sweaters => Column::CategorySweaters,
            Category::TShirts => Column::CategoryTShirts,
            Category::Trousers => Column::CategoryTrousers,
            Category::Undergarments => Column::CategoryUndergarments,
        }
    }

    /// One-hot column for a brand
    pub fn for_brand(brand: Brand) -> Column {
        match brand {
            Brand::HAndM => Column::BrandHAndM,
            Brand::Levies => Column::BrandLevies,
            Brand::Nike => Column::BrandNike,
            Brand::Pantaloons => Column::BrandPantaloons,
            Brand::Puma => Column::BrandPuma,
            Brand::Raymond => Column::BrandRaymond,
            Brand::Zudio => Column::BrandZudio,
        }
    }

    /// Flag column for a region
    pub fn for_region(region: Region) -> Column {
        match region {
            Region::East => Column::RegionEast,
            Region::West => Column::RegionWest,
            Region::Central => Column::RegionCentral,
            Region::South => Column::RegionSouth,
            Region::North => Column::RegionNorth,
        }
    }

    /// The `Category_*` columns in schema order
    pub fn category_columns() -> &'static [Column] {
        &SCHEMA[Column::CategoryDresses as usize..=Column::CategoryUndergarments as usize]
    }

    /// The `Brand_*` columns in schema order
    pub fn brand_columns() -> &'static [Column] {
        &SCHEMA[Column::BrandHAndM as usize..=Column::BrandZudio as usize]
    }

    /// The `Region_*` columns in schema order
    pub fn region_columns() -> &'static [Column] {
        &SCHEMA[Column::RegionEast as usize..=Column::RegionNorth as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_input::Choice;

    const TRAINING_COLUMNS: [&str; FEATURE_DIMENSION] = [
        "Age",
        "Gender",
        "Quantity",
        "Price",
        "Discount",
        "Product Rating",
        "Category_Dresses",
        "Category_Ethnic Wear",
        "Category_Formal Wear",
        "Category_Jackets",
        "Category_Jeans",
        "Category_Shirts",
        "Category_Shorts",
        "Category_Skirts",
        "Category_Sleepwear",
        "Category_Suits",
        "Category_Sweaters",
        "Category_T-shirts",
        "Category_Trousers",
        "Category_Undergarments",
        "Brand_H&M",
        "Brand_Levie's",
        "Brand_Nike",
        "Brand_Pantaloons",
        "Brand_Puma",
        "Brand_Raymond",
        "Brand_Zudio",
        "Total_Amount",
        "Effective_Price",
        "payment_mode_Online Payment",
        "Region_East",
        "Region_West",
        "Region_Central",
        "Region_South",
        "Region_North",
    ];

    #[test]
    fn test_schema_matches_training_columns() {
        let names: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, TRAINING_COLUMNS);
    }

    #[test]
    fn test_index_matches_position() {
        for (i, column) in Column::ALL.iter().enumerate() {
            assert_eq!(column.index(), i);
            assert_eq!(Column::from_name(column.name()), Some(*column));
        }
        assert_eq!(Column::from_name("Region_Northeast"), None);
    }

    #[test]
    fn test_one_hot_names_follow_labels() {
        for category in Category::ALL {
            let column = Column::for_category(*category);
            assert_eq!(column.name(), format!("Category_{}", category.label()));
        }
        for brand in Brand::ALL {
            let column = Column::for_brand(*brand);
            assert_eq!(column.name(), format!("Brand_{}", brand.label()));
        }
        for region in Region::ALL {
            let column = Column::for_region(region);
            assert_eq!(column.name(), format!("Region_{}", region.as_str()));
        }
    }

    #[test]
    fn test_flag_columns() {
        let flags = Column::ALL.iter().filter(|c| c.is_flag()).count();
        assert_eq!(flags, 1 + 14 + 7 + 1 + 5);
        assert!(!Column::EffectivePrice.is_flag());
        assert!(Column::Gender.is_flag());
    }

    #[test]
    fn test_group_slices() {
        assert_eq!(Column::category_columns().len(), 14);
        assert_eq!(Column::brand_columns().len(), 7);
        assert_eq!(Column::region_columns().len(), 5);
    }
}
