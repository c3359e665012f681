use std::collections::HashMap;
use thiserror::Error;

/// Filter criteria for a product lookup: map from supported filter key to
/// raw string value. Unrecognized keys are ignored by the query builder.
pub type Criteria = HashMap<String, String>;

/// Exact product name.
pub const KEY_NAME: &str = "PDT_NOM";
/// Category reference id.
pub const KEY_CATEGORY: &str = "PDT_CATEGORIE";
/// Brand reference id.
pub const KEY_BRAND: &str = "PDT_MARQUE";
/// Nutrition grade letter.
pub const KEY_GRADE: &str = "PDT_NUTRITIONGRADE";
/// Lower bound of the energy range. Active only together with [`KEY_ENERGY_MAX`].
pub const KEY_ENERGY_MIN: &str = "PDT_ENERGIE_MIN";
/// Upper bound of the energy range. Active only together with [`KEY_ENERGY_MIN`].
pub const KEY_ENERGY_MAX: &str = "PDT_ENERGIE_MAX";
/// Lower bound of the fat range. Active only together with [`KEY_FAT_MAX`].
pub const KEY_FAT_MIN: &str = "PDT_GRAISSE_MIN";
/// Upper bound of the fat range. Active only together with [`KEY_FAT_MIN`].
pub const KEY_FAT_MAX: &str = "PDT_GRAISSE_MAX";

/// Errors raised while translating criteria values into typed bind values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("Invalid numeric value for {key}: {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Invalid reference id for {key}: {value:?}")]
    InvalidId { key: &'static str, value: String },
}

/// Parse a numeric range bound. The value is never spliced into SQL, so a
/// value that does not parse is an error rather than a malformed query.
pub(crate) fn parse_number(key: &'static str, value: &str) -> Result<f64, CriteriaError> {
    value.trim().parse::<f64>().map_err(|_| CriteriaError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}

/// Parse a reference-table id (category or brand).
pub(crate) fn parse_id(key: &'static str, value: &str) -> Result<i32, CriteriaError> {
    value.trim().parse::<i32>().map_err(|_| CriteriaError::InvalidId {
        key,
        value: value.to_string(),
    })
}
