//! Integration tests for the dashboard revenue series.
//!
//! The daily series must always cover exactly the trailing thirty days,
//! dense and ascending, no matter how sparse the underlying order data is.

use chrono::NaiveDate;
use echo_ember_admin::db::dashboard::fill_daily_series;
use echo_ember_integration_tests::dec;
use rust_decimal::Decimal;

fn date(s: &str) -> NaiveDate {
    s.parse().expect("date literal")
}

#[test]
fn test_series_is_dense_and_ascending() {
    let today = date("2026-08-30");
    let series = fill_daily_series(today, &[]);

    assert_eq!(series.len(), 30);
    assert_eq!(series[0].date, date("2026-08-01"));
    assert_eq!(series[29].date, today);
    for pair in series.windows(2) {
        assert_eq!(pair[1].date, pair[0].date + chrono::Duration::days(1));
    }
}

#[test]
fn test_quiet_days_are_zero_filled() {
    let today = date("2026-08-30");
    let rows = [(date("2026-08-15"), dec("57.00"), 2_i64)];
    let series = fill_daily_series(today, &rows);

    let busy = series.iter().find(|p| p.date == date("2026-08-15")).expect("busy day");
    assert_eq!(busy.revenue, dec("57.00"));
    assert_eq!(busy.order_count, 2);

    let quiet_days = series.iter().filter(|p| p.revenue == Decimal::ZERO).count();
    assert_eq!(quiet_days, 29);
}

#[test]
fn test_rows_outside_the_window_are_dropped() {
    let today = date("2026-08-30");
    let rows = [
        (date("2026-07-01"), dec("999.00"), 9_i64),
        (date("2026-08-30"), dec("12.50"), 1_i64),
    ];
    let series = fill_daily_series(today, &rows);

    assert!(series.iter().all(|p| p.revenue != dec("999.00")));
    assert_eq!(series[29].revenue, dec("12.50"));
}

#[test]
fn test_series_spans_month_boundaries() {
    let today = date("2026-01-15");
    let series = fill_daily_series(today, &[]);
    assert_eq!(series[0].date, date("2025-12-17"));
    assert_eq!(series[29].date, today);
}

#[test]
fn test_points_serialize_camel_case_for_the_chart() {
    let today = date("2026-08-30");
    let rows = [(today, dec("25.00"), 1_i64)];
    let series = fill_daily_series(today, &rows);

    let json = serde_json::to_value(&series[29]).expect("serializes");
    assert_eq!(json["orderCount"], 1);
    assert_eq!(json["revenue"], "25.00");
}
