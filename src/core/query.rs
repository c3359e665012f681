use crate::core::criteria::{
    self, Criteria, CriteriaError, KEY_BRAND, KEY_CATEGORY, KEY_ENERGY_MAX, KEY_ENERGY_MIN,
    KEY_FAT_MAX, KEY_FAT_MIN, KEY_GRADE, KEY_NAME,
};

/// Hard cap on the number of rows a product query may return.
pub const MAX_RESULTS: i64 = 100;

/// A value bound to a `$n` placeholder in a generated query.
///
/// Criteria values never appear in the query text itself; they travel as
/// bind values so the store treats them as literal data.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Number(f64),
    Id(i32),
}

/// A built product query: SQL text plus bind values in placeholder order.
#[derive(Debug, Clone)]
pub struct ProductQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

const SELECT_BASE: &str = "SELECT pro.pdt_id, pro.pdt_nom, pro.pdt_nutritiongrade, \
     pro.pdt_energie, pro.pdt_graisse, mar.mrq_nom, cat.ctg_nom \
     FROM produit pro \
     INNER JOIN marque mar ON pro.pdt_marque = mar.mrq_id \
     INNER JOIN categorie cat ON pro.pdt_categorie = cat.ctg_id \
     WHERE ";

/// Translate filter criteria into a bounded product query.
///
/// Each present, supported criterion contributes one AND clause, in order:
/// name, category, brand, grade, energy range, fat range. A range clause
/// activates only when both its min and max keys are present; a lone bound
/// is silently ignored. Unrecognized keys never affect the query. The
/// fixed `pdt_fibre >= 0` baseline predicate closes the WHERE clause, so
/// an empty criteria map still builds a valid query.
pub fn build_product_query(filters: &Criteria) -> Result<ProductQuery, CriteriaError> {
    let mut sql = String::from(SELECT_BASE);
    let mut binds: Vec<BindValue> = Vec::new();

    if let Some(name) = filters.get(KEY_NAME) {
        binds.push(BindValue::Text(name.clone()));
        sql.push_str(&format!("pro.pdt_nom = ${} AND ", binds.len()));
    }
    if let Some(category) = filters.get(KEY_CATEGORY) {
        binds.push(BindValue::Id(criteria::parse_id(KEY_CATEGORY, category)?));
        sql.push_str(&format!("pro.pdt_categorie = ${} AND ", binds.len()));
    }
    if let Some(brand) = filters.get(KEY_BRAND) {
        binds.push(BindValue::Id(criteria::parse_id(KEY_BRAND, brand)?));
        sql.push_str(&format!("pro.pdt_marque = ${} AND ", binds.len()));
    }
    if let Some(grade) = filters.get(KEY_GRADE) {
        binds.push(BindValue::Text(grade.clone()));
        sql.push_str(&format!("pro.pdt_nutritiongrade = ${} AND ", binds.len()));
    }
    if let (Some(min), Some(max)) = (filters.get(KEY_ENERGY_MIN), filters.get(KEY_ENERGY_MAX)) {
        binds.push(BindValue::Number(criteria::parse_number(KEY_ENERGY_MIN, min)?));
        let low = binds.len();
        binds.push(BindValue::Number(criteria::parse_number(KEY_ENERGY_MAX, max)?));
        sql.push_str(&format!(
            "(pro.pdt_energie BETWEEN ${} AND ${}) AND ",
            low,
            binds.len()
        ));
    }
    if let (Some(min), Some(max)) = (filters.get(KEY_FAT_MIN), filters.get(KEY_FAT_MAX)) {
        binds.push(BindValue::Number(criteria::parse_number(KEY_FAT_MIN, min)?));
        let low = binds.len();
        binds.push(BindValue::Number(criteria::parse_number(KEY_FAT_MAX, max)?));
        sql.push_str(&format!(
            "(pro.pdt_graisse BETWEEN ${} AND ${}) AND ",
            low,
            binds.len()
        ));
    }

    sql.push_str(&format!("pro.pdt_fibre >= 0 LIMIT {}", MAX_RESULTS));

    Ok(ProductQuery { sql, binds })
}
