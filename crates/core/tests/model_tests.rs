// ═══════════════════════════════════════════════════════════════════
// Model Tests — wire payload decoding, labels, settings, logging config
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use carteira_core::logging::LoggingConfig;
use carteira_core::models::dividend::Dividend;
use carteira_core::models::patrimony::PatrimonyEntry;
use carteira_core::models::period::{MonthKey, PeriodKey};
use carteira_core::models::position::PortfolioPositionEntry;
use carteira_core::models::rebalancing::RebalancingResponse;
use carteira_core::models::series::{series_label, sorted_by_date, PortfolioReturns, TimePoint};
use carteira_core::models::settings::{ApiSettings, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  Series
// ═══════════════════════════════════════════════════════════════════

mod series {
    use super::*;

    #[test]
    fn returns_payload_decodes() {
        let json = r#"{
            "categories": {
                "portfolio": [{"date": "2024-01-01", "value": 0.1}],
                "FII": [{"date": "2024-01-01", "value": 0.05}]
            },
            "assets": {
                "HGLG11": [{"date": "2024-01-02", "value": -0.01}]
            }
        }"#;
        let returns: PortfolioReturns = serde_json::from_str(json).unwrap();
        assert_eq!(returns.categories.len(), 2);
        assert_eq!(returns.portfolio().unwrap()[0].value, 0.1);
        assert_eq!(returns.assets["HGLG11"][0].date, d(2024, 1, 2));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let returns: PortfolioReturns = serde_json::from_str("{}").unwrap();
        assert!(returns.categories.is_empty());
        assert!(returns.portfolio().is_none());
    }

    #[test]
    fn portfolio_label() {
        assert_eq!(series_label("portfolio"), "Carteira");
        assert_eq!(series_label("IBOV"), "IBOV");
    }

    #[test]
    fn sort_is_stable_on_same_day() {
        let series = vec![
            TimePoint::new(d(2024, 1, 2), 2.0),
            TimePoint::new(d(2024, 1, 1), 1.0),
            TimePoint::new(d(2024, 1, 2), 3.0),
        ];
        let sorted = sorted_by_date(&series);
        let values: Vec<f64> = sorted.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  API payloads
// ═══════════════════════════════════════════════════════════════════

mod payloads {
    use super::*;

    #[test]
    fn position_with_optional_fields_missing() {
        let json = r#"[{"ticker": "ITSA4", "quantity": 100, "price": 10.5,
                        "value": 1050, "category": "Ações"}]"#;
        let positions: Vec<PortfolioPositionEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(positions[0].value, 1050.0);
        assert_eq!(positions[0].twelve_months_return, None);
    }

    #[test]
    fn patrimony_flattens_category_keys() {
        let json = r#"{"date": "2024-03-01", "acc_aported": 5000, "FII": 2500.5, "Ações": 3000}"#;
        let entry: PatrimonyEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.acc_aported, 5000.0);
        assert_eq!(entry.categories.len(), 2);
        assert_eq!(entry.total(), 5500.5);
    }

    #[test]
    fn dividend_decodes() {
        let json = r#"{"date": "2024-01-15", "amount": 100, "category": "FII", "ticker": "HGLG11"}"#;
        let dividend: Dividend = serde_json::from_str(json).unwrap();
        assert_eq!(dividend.ticker.as_deref(), Some("HGLG11"));
    }

    #[test]
    fn rebalancing_with_null_targets() {
        let json = r##"{
            "total_value": 2000,
            "categories": [{
                "category_id": 1, "category_name": "FII", "color": "#123456",
                "current_value": 1000, "current_pct": 50,
                "target_pct": null, "target_value": null, "diff_pct": null, "diff_value": null,
                "assets": [{
                    "asset_id": 10, "ticker": "HGLG11", "name": "CSHG",
                    "current_value": 1000, "current_pct_in_category": 100,
                    "target_pct_in_category": 100
                }]
            }]
        }"##;
        let state: RebalancingResponse = serde_json::from_str(json).unwrap();
        let fii = state.category(1).unwrap();
        assert_eq!(fii.target_pct, None);
        assert_eq!(fii.assets[0].target_pct_in_category, Some(100.0));
        assert_eq!(fii.assets[0].diff_value, None);

        let back = serde_json::to_value(&state).unwrap();
        assert!(back["categories"][0]["target_pct"].is_null());
    }

    #[test]
    fn period_key_display() {
        assert_eq!(PeriodKey::Month(MonthKey { year: 2024, month: 1 }).to_string(), "2024-01");
        assert_eq!(PeriodKey::Day(d(2024, 1, 5)).to_string(), "2024-01-05");
        assert_eq!(PeriodKey::Year(2024).to_string(), "2024");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings & logging config
// ═══════════════════════════════════════════════════════════════════

mod config {
    use super::*;

    #[test]
    fn api_settings_defaults() {
        let settings = ApiSettings::default();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(settings.token.is_none());
        assert_eq!(settings.with_token("abc").token.as_deref(), Some("abc"));
    }

    #[test]
    fn api_settings_timeout_defaults_when_absent_in_json() {
        let settings: ApiSettings =
            serde_json::from_str(r#"{"base_url": "https://api.example.com"}"#).unwrap();
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    // The only test touching CARTEIRA_* variables, so no cross-test races.
    #[test]
    fn api_settings_from_env() {
        std::env::set_var("CARTEIRA_API_URL", "https://carteira.test");
        std::env::set_var("CARTEIRA_API_TOKEN", "secret");
        std::env::set_var("CARTEIRA_API_TIMEOUT_SECS", "5");
        let settings = ApiSettings::from_env().unwrap();
        assert_eq!(settings.base_url, "https://carteira.test");
        assert_eq!(settings.token.as_deref(), Some("secret"));
        assert_eq!(settings.timeout_secs, 5);

        std::env::set_var("CARTEIRA_API_TIMEOUT_SECS", "soon");
        assert!(ApiSettings::from_env().is_err());

        std::env::remove_var("CARTEIRA_API_URL");
        std::env::remove_var("CARTEIRA_API_TOKEN");
        std::env::remove_var("CARTEIRA_API_TIMEOUT_SECS");
        assert_eq!(ApiSettings::from_env().unwrap(), ApiSettings::default());
    }

    #[test]
    fn logging_config_validation() {
        assert!(LoggingConfig::default().validate().is_ok());

        let debug = LoggingConfig {
            log_level: "carteira_core=debug,warn".into(),
            ..LoggingConfig::default()
        };
        assert!(debug.validate().is_ok());

        let empty = LoggingConfig {
            log_level: "  ".into(),
            ..LoggingConfig::default()
        };
        assert!(empty.validate().is_err());
    }
}
