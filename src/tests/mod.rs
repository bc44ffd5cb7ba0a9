use chrono::NaiveDate;

use crate::model::{Offer, OfferDraft};
use crate::query::{select_params, Filters, InsuranceSelector, ORDER_CLAUSE};
use crate::session::Session;
use crate::store::{StoreClient, StoreConfig, StoreError};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn offer(id: i64, date: &str, volume: Option<i64>, rate: Option<f64>, insurance: bool) -> Offer {
    Offer {
        id,
        date: Some(day(date)),
        title: None,
        vertical: None,
        settle: None,
        rate,
        volume,
        insurance,
    }
}

fn offline_session() -> Session {
    let client = StoreClient::new(&StoreConfig {
        endpoint: "http://127.0.0.1:1/rest/v1/".to_string(),
        api_key: "test-key".to_string(),
        table: "offers".to_string(),
        timeout_seconds: 1,
        proxy: None,
    })
    .unwrap();
    Session::new(client)
}

#[test]
fn translation_is_conjunctive_never_a_union() {
    // every combination of two active constraints yields exactly two
    // clauses on distinct columns, plus the ordering clause
    let filters = Filters {
        vertical: Some("gambling".to_string()),
        volume_min: Some(100),
        ..Filters::default()
    };
    let params = select_params(&filters);
    assert_eq!(params.len(), 3);
    let columns: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
    assert!(columns.contains(&"vertical"));
    assert!(columns.contains(&"volume"));
    // no clause merges two fields into an or-group
    assert!(!columns.contains(&"or"));
}

#[test]
fn ordering_clause_is_on_every_read() {
    let empty = select_params(&Filters::default());
    let filtered = select_params(&Filters {
        title: Some("acme".to_string()),
        ..Filters::default()
    });
    for params in [empty, filtered] {
        assert_eq!(params[0], ("order".to_string(), ORDER_CLAUSE.to_string()));
    }
}

#[test]
fn two_record_scenario_matches_reference_figures() {
    let rows = vec![
        offer(2, "2024-01-02", Some(200), Some(20.0), false),
        offer(1, "2024-01-01", Some(100), Some(10.0), false),
    ];
    let totals = crate::summary::totals(&rows);
    assert_eq!(totals.total, 2);
    assert_eq!(totals.total_volume, 300);
    assert_eq!(
        crate::output::totals_line(&totals),
        "found=2 total_volume=300 avg_rate=15.00"
    );
    // store-side ordering contract: newest date first
    let rendered = crate::output::render_table(&crate::output::build_rows(&rows));
    let first_data_line = rendered.lines().nth(1).unwrap();
    assert!(first_data_line.contains("2024-01-02"));
}

#[test]
fn insurance_yes_keeps_exactly_the_insured_rows() {
    let filters = Filters {
        insurance: InsuranceSelector::Yes,
        ..Filters::default()
    };
    let params = select_params(&filters);
    assert!(params.contains(&("insurance".to_string(), "eq.true".to_string())));

    // the equality clause, applied to {true, false, true}, keeps two rows
    let rows = vec![
        offer(1, "2024-01-01", None, None, true),
        offer(2, "2024-01-02", None, None, false),
        offer(3, "2024-01-03", None, None, true),
    ];
    let kept: Vec<&Offer> = rows.iter().filter(|o| o.insurance).collect();
    assert_eq!(kept.len(), 2);
    assert!(kept.iter().all(|o| o.insurance));
}

#[test]
fn create_with_blank_numerics_stores_absent_not_zero() {
    let draft = OfferDraft {
        title: "Acme".to_string(),
        rate: String::new(),
        volume: String::new(),
        ..OfferDraft::default()
    };
    let payload = draft.parse(day("2024-03-01")).unwrap();
    let json = serde_json::to_value(&payload).unwrap();
    assert!(json.get("rate").is_none());
    assert!(json.get("volume").is_none());
    assert_eq!(json["title"], "Acme");
}

#[test]
fn read_failure_empties_the_view_and_surfaces_a_message() {
    let mut session = offline_session();
    let ticket = session.begin_read();
    session.apply_read(ticket, Ok(vec![offer(1, "2024-01-01", Some(100), Some(10.0), false)]));
    assert_eq!(session.totals().total, 1);

    let ticket = session.begin_read();
    session.apply_read(
        ticket,
        Err(StoreError::Rejected {
            status: 503,
            body: "upstream unavailable".to_string(),
        }),
    );
    assert!(session.offers().is_empty());
    assert_eq!(session.totals().total, 0);
    assert_eq!(session.totals().avg_rate, 0.0);
    assert!(!session.read_error().unwrap_or_default().is_empty());
}

#[test]
fn store_rows_deserialize_with_null_columns() {
    let body = r#"[
        {"id": 7, "date": "2024-02-20", "title": null, "vertical": "Nutra",
         "settle": null, "rate": 12.5, "volume": null, "insurance": true},
        {"id": 6, "date": null, "title": "Legacy row", "vertical": null,
         "settle": "Net15", "rate": null, "volume": 500}
    ]"#;
    let rows: Vec<Offer> = serde_json::from_str(body).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].vertical.as_deref(), Some("Nutra"));
    assert_eq!(rows[0].volume, None);
    assert!(rows[0].insurance);
    // insurance column absent falls back to false
    assert!(!rows[1].insurance);
    assert_eq!(rows[1].date, None);
}

#[test]
fn filter_summary_round_trips_through_kv_rendering() {
    let filters = Filters {
        settle: Some("net7".to_string()),
        volume_min: Some(1000),
        date_from: Some(day("2024-01-01")),
        ..Filters::default()
    };
    let summary = filters.summary().unwrap();
    assert!(summary.contains("settle~net7"));
    assert!(summary.contains("volume=1000.."));
    assert!(summary.contains("date=2024-01-01.."));
}
