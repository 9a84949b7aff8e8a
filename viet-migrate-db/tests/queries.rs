use serde_json::{Value, json};
use viet_migrate_catalog::Record;
use viet_migrate_db::*;

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

#[test]
fn count_rows_on_empty_table() {
    let conn = open_memory().unwrap();
    assert_eq!(count_rows(&conn, "news").unwrap(), 0);
    assert!(matches!(
        count_rows(&conn, "alumni"),
        Err(StoreError::UnknownTable(_))
    ));
}

#[test]
fn bracketed_text_stays_a_string() {
    let conn = open_memory().unwrap();
    conn.upsert(
        "pages",
        &record(json!({ "slug": "draft", "content": "[1, 2]", "title": "{}" })),
        "slug",
    )
    .unwrap();

    let rows = fetch_rows(&conn, "pages").unwrap();
    assert_eq!(rows[0]["content"], json!("[1, 2]"));
    assert_eq!(rows[0]["title"], json!("{}"));
}

#[test]
fn transport_stops_are_decoded() {
    let conn = open_memory().unwrap();
    conn.insert(
        "transport_routes",
        &record(json!({
            "route_name": "Route 4",
            "stops": [{ "stop_name": "Gajuwaka", "time": "7:30" }],
            "timings": { "morning": "7:00" },
        })),
    )
    .unwrap();

    let rows = fetch_rows(&conn, "transport_routes").unwrap();
    assert_eq!(rows[0]["stops"], json!([{ "stop_name": "Gajuwaka", "time": "7:30" }]));
    assert_eq!(rows[0]["timings"], json!({ "morning": "7:00" }));
    assert_eq!(rows[0]["route_name"], json!("Route 4"));
}

#[test]
fn null_columns_are_included() {
    let conn = open_memory().unwrap();
    conn.insert("recruiters", &record(json!({ "name": "TCS", "logo": null })))
        .unwrap();
    let rows = fetch_rows(&conn, "recruiters").unwrap();
    assert_eq!(rows[0]["logo"], json!(null));
    assert!(rows[0].contains_key("link"));
}
