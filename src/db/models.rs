//! Row types for the read-only `polymarket` dimension tables.
//! Field order is the JSON key order; nullable columns stay `None` and
//! serialize as `null` (never coerced to zero).

use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct MarketRow {
    pub market_id: i64,
    pub question: Option<String>,
    pub category: Option<String>,
    pub liquidity: Option<f64>,
    pub volume: Option<f64>,
    pub active: Option<bool>,
    pub closed: Option<bool>,
    pub event_id: Option<i64>,
    pub end_ts: Option<NaiveDateTime>,
}

/// Market as listed under its event: the event columns are implied.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct EventMarketRow {
    pub market_id: i64,
    pub question: Option<String>,
    pub liquidity: Option<f64>,
    pub volume: Option<f64>,
    pub active: Option<bool>,
    pub closed: Option<bool>,
    pub end_ts: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct EventRow {
    pub event_id: i64,
    pub title: Option<String>,
    pub category: Option<String>,
    pub end_ts: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TagRow {
    pub tag_id: i64,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub parent_tag_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct KpiSummary {
    pub markets: i64,
    pub events: i64,
    pub tags: i64,
    /// Rows in the time dimension (one per calendar day).
    pub days: i64,
    pub closed_markets: i64,
    pub open_markets: i64,
    pub max_liquidity: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn market_row_serializes_nulls_in_column_order() {
        let row = MarketRow {
            market_id: 42,
            question: Some("Will the Warriors win?".to_string()),
            category: Some("NBA".to_string()),
            liquidity: None,
            volume: Some(0.0),
            active: Some(true),
            closed: Some(false),
            event_id: Some(7),
            end_ts: NaiveDate::from_ymd_opt(2025, 6, 1).and_then(|d| d.and_hms_opt(18, 30, 0)),
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"market_id":42,"question":"Will the Warriors win?","category":"NBA","liquidity":null,"volume":0.0,"active":true,"closed":false,"event_id":7,"end_ts":"2025-06-01T18:30:00"}"#
        );
    }

    #[test]
    fn kpi_summary_keeps_missing_max_as_null() {
        let kpi = KpiSummary {
            markets: 0,
            events: 0,
            tags: 0,
            days: 0,
            closed_markets: 0,
            open_markets: 0,
            max_liquidity: None,
        };
        let value = serde_json::to_value(&kpi).unwrap();
        assert!(value["max_liquidity"].is_null());
        assert_eq!(value["days"], 0);
    }
}
