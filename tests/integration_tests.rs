// Integration tests for the catalog data-access layer

use catalog_data::core::criteria::{
    Criteria, KEY_BRAND, KEY_CATEGORY, KEY_ENERGY_MAX, KEY_ENERGY_MIN, KEY_FAT_MAX, KEY_FAT_MIN,
    KEY_GRADE, KEY_NAME,
};
use catalog_data::core::query::{build_product_query, BindValue};
use catalog_data::{CatalogClient, Settings};

fn full_criteria() -> Criteria {
    [
        (KEY_NAME, "Crunchy Muesli"),
        (KEY_CATEGORY, "4"),
        (KEY_BRAND, "12"),
        (KEY_GRADE, "b"),
        (KEY_ENERGY_MIN, "100"),
        (KEY_ENERGY_MAX, "500"),
        (KEY_FAT_MIN, "1"),
        (KEY_FAT_MAX, "25"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[test]
fn test_end_to_end_query_shape_with_all_criteria() {
    let query = build_product_query(&full_criteria()).unwrap();

    assert_eq!(
        query.sql,
        "SELECT pro.pdt_id, pro.pdt_nom, pro.pdt_nutritiongrade, \
         pro.pdt_energie, pro.pdt_graisse, mar.mrq_nom, cat.ctg_nom \
         FROM produit pro \
         INNER JOIN marque mar ON pro.pdt_marque = mar.mrq_id \
         INNER JOIN categorie cat ON pro.pdt_categorie = cat.ctg_id \
         WHERE pro.pdt_nom = $1 AND \
         pro.pdt_categorie = $2 AND \
         pro.pdt_marque = $3 AND \
         pro.pdt_nutritiongrade = $4 AND \
         (pro.pdt_energie BETWEEN $5 AND $6) AND \
         (pro.pdt_graisse BETWEEN $7 AND $8) AND \
         pro.pdt_fibre >= 0 LIMIT 100"
    );

    assert_eq!(
        query.binds,
        vec![
            BindValue::Text("Crunchy Muesli".to_string()),
            BindValue::Id(4),
            BindValue::Id(12),
            BindValue::Text("b".to_string()),
            BindValue::Number(100.0),
            BindValue::Number(500.0),
            BindValue::Number(1.0),
            BindValue::Number(25.0),
        ]
    );
}

#[test]
fn test_dropping_one_criterion_shifts_placeholders() {
    let mut criteria = full_criteria();
    criteria.remove(KEY_NAME);

    let query = build_product_query(&criteria).unwrap();

    // Category takes over $1 and every later clause renumbers with it.
    assert!(query.sql.contains("pro.pdt_categorie = $1"));
    assert!(query.sql.contains("(pro.pdt_graisse BETWEEN $6 AND $7)"));
    assert_eq!(query.binds.len(), 7);
}

#[test]
fn test_range_pairs_degrade_independently() {
    let mut criteria = full_criteria();
    criteria.remove(KEY_ENERGY_MAX);

    let query = build_product_query(&criteria).unwrap();

    // The orphaned energy bound drops out; the complete fat pair stays.
    assert!(!query.sql.contains("pdt_energie"));
    assert!(query.sql.contains("pdt_graisse BETWEEN"));
    assert_eq!(query.binds.len(), 6);
}

// Live-database roundtrip. Needs a reachable PostgreSQL with DATABASE_URL
// set; migrations run on connect.
#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_live_catalog_roundtrip() {
    let settings = Settings::load().expect("settings");
    settings.logging.init();
    let client = CatalogClient::from_settings(&settings.database)
        .await
        .expect("connect");

    assert!(client.health_check().await.expect("health check"));

    // Products: empty criteria stay within the cap.
    let products = client.fetch_products(&Criteria::new()).await.expect("fetch");
    assert!(products.len() <= 100);

    // Grades: ascending, duplicate-free.
    let grades = client.nutrition_grades().await.expect("grades");
    let mut sorted = grades.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(grades, sorted);

    // Ingredients: insert a unique batch, then resolve it back.
    let marker = format!("it-ingredient-{}", std::process::id());
    let names = std::collections::HashSet::from([marker.clone()]);
    let inserted = client.insert_ingredients(&names).await.expect("insert");
    assert_eq!(inserted, 1);

    let id = client
        .ingredient_id(&marker)
        .await
        .expect("lookup")
        .expect("id present");
    assert_eq!(client.ingredient_ids().await.expect("map")[&marker], id);
}
