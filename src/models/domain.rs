use serde::{Deserialize, Serialize};

/// Product record, denormalized by join from the brand and category
/// reference tables at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub category: String,
    /// Single-letter nutrition grade, when the product has one.
    #[serde(rename = "nutritionGrade")]
    pub nutrition_grade: Option<String>,
    pub brand: String,
    pub energy: Option<f64>,
    pub fat: Option<f64>,
}
