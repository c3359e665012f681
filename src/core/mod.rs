// Core query-construction exports
pub mod criteria;
pub mod query;

pub use criteria::{
    Criteria, CriteriaError, KEY_BRAND, KEY_CATEGORY, KEY_ENERGY_MAX, KEY_ENERGY_MIN, KEY_FAT_MAX,
    KEY_FAT_MIN, KEY_GRADE, KEY_NAME,
};
pub use query::{build_product_query, BindValue, ProductQuery, MAX_RESULTS};
