use chrono::{NaiveDate, NaiveDateTime};
use asset_tracker_core::errors::CoreError;
use asset_tracker_core::models::chart::{ChartData, DeltaPoint, FirstDeltaPolicy, SeriesPoint, SeriesRow};
use asset_tracker_core::models::grouping::{BucketKey, GroupingMode};
use asset_tracker_core::models::ledger::Ledger;
use asset_tracker_core::models::observation::{Observation, UpsertOutcome};
use asset_tracker_core::models::settings::{Settings, DEFAULT_DAILY_WINDOW_DAYS, DEFAULT_RECENT_ROWS_LIMIT};
use uuid::Uuid;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dt(y: i32, m: u32, day: u32, h: u32, min: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(h, min, 0).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  GroupingMode
// ═══════════════════════════════════════════════════════════════════

mod grouping_mode {
    use super::*;

    #[test]
    fn display_labels() {
        assert_eq!(GroupingMode::Daily.to_string(), "Daily");
        assert_eq!(GroupingMode::Monthly.to_string(), "Monthly");
        assert_eq!(GroupingMode::Yearly.to_string(), "Annually");
    }

    #[test]
    fn default_is_daily() {
        assert_eq!(GroupingMode::default(), GroupingMode::Daily);
    }

    #[test]
    fn all_in_navigation_order() {
        assert_eq!(
            GroupingMode::ALL,
            [GroupingMode::Daily, GroupingMode::Monthly, GroupingMode::Yearly]
        );
        assert!(GroupingMode::Daily < GroupingMode::Monthly);
        assert!(GroupingMode::Monthly < GroupingMode::Yearly);
    }

    // ── successor / predecessor ───────────────────────────────────

    #[test]
    fn successor_steps_coarser() {
        assert_eq!(GroupingMode::Daily.successor(), GroupingMode::Monthly);
        assert_eq!(GroupingMode::Monthly.successor(), GroupingMode::Yearly);
    }

    #[test]
    fn successor_clamped_at_yearly() {
        assert_eq!(GroupingMode::Yearly.successor(), GroupingMode::Yearly);
    }

    #[test]
    fn predecessor_steps_finer() {
        assert_eq!(GroupingMode::Yearly.predecessor(), GroupingMode::Monthly);
        assert_eq!(GroupingMode::Monthly.predecessor(), GroupingMode::Daily);
    }

    #[test]
    fn predecessor_clamped_at_daily() {
        assert_eq!(GroupingMode::Daily.predecessor(), GroupingMode::Daily);
    }

    #[test]
    fn successor_then_predecessor_returns_for_inner_mode() {
        assert_eq!(GroupingMode::Monthly.successor().predecessor(), GroupingMode::Monthly);
    }

    // ── FromStr ───────────────────────────────────────────────────

    #[test]
    fn parse_case_insensitive() {
        assert_eq!("daily".parse::<GroupingMode>().unwrap(), GroupingMode::Daily);
        assert_eq!("MONTHLY".parse::<GroupingMode>().unwrap(), GroupingMode::Monthly);
        assert_eq!(" Yearly ".parse::<GroupingMode>().unwrap(), GroupingMode::Yearly);
    }

    #[test]
    fn parse_annually_alias() {
        assert_eq!("Annually".parse::<GroupingMode>().unwrap(), GroupingMode::Yearly);
    }

    #[test]
    fn parse_display_round_trip() {
        for mode in GroupingMode::ALL {
            assert_eq!(mode.to_string().parse::<GroupingMode>().unwrap(), mode);
        }
    }

    #[test]
    fn parse_unknown_fails() {
        let err = "weekly".parse::<GroupingMode>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownGrouping(ref s) if s == "weekly"));
    }

    #[test]
    fn serde_roundtrip_json() {
        for mode in GroupingMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            let back: GroupingMode = serde_json::from_str(&json).unwrap();
            assert_eq!(mode, back);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
//  BucketKey
// ═══════════════════════════════════════════════════════════════════

mod bucket_key {
    use super::*;

    #[test]
    fn daily_key_is_calendar_day() {
        let key = GroupingMode::Daily.bucket_key(dt(2024, 3, 20, 23, 59));
        assert_eq!(key, BucketKey::Day(d(2024, 3, 20)));
        assert_eq!(key.start_date(), d(2024, 3, 20));
    }

    #[test]
    fn monthly_key_normalizes_to_first_of_month() {
        let key = GroupingMode::Monthly.bucket_key(dt(2024, 3, 20, 8, 0));
        assert_eq!(key, BucketKey::Month(d(2024, 3, 1)));
    }

    #[test]
    fn monthly_key_on_first_day_is_unchanged() {
        let key = GroupingMode::Monthly.bucket_key(dt(2024, 3, 1, 0, 0));
        assert_eq!(key.start_date(), d(2024, 3, 1));
    }

    #[test]
    fn monthly_key_leap_day() {
        let key = GroupingMode::Monthly.bucket_key(dt(2024, 2, 29, 12, 0));
        assert_eq!(key.start_date(), d(2024, 2, 1));
    }

    #[test]
    fn yearly_key_normalizes_to_january_first() {
        let key = GroupingMode::Yearly.bucket_key(dt(2023, 12, 31, 23, 59));
        assert_eq!(key, BucketKey::Year(d(2023, 1, 1)));
    }

    #[test]
    fn yearly_key_last_day_of_leap_year() {
        let key = GroupingMode::Yearly.bucket_key(dt(2024, 12, 31, 12, 0));
        assert_eq!(key.start_date(), d(2024, 1, 1));
    }

    #[test]
    fn same_month_different_days_share_key() {
        let a = GroupingMode::Monthly.bucket_key(dt(2024, 5, 2, 9, 0));
        let b = GroupingMode::Monthly.bucket_key(dt(2024, 5, 31, 18, 0));
        assert_eq!(a, b);
    }

    #[test]
    fn keys_order_chronologically() {
        let a = GroupingMode::Monthly.bucket_key(dt(2023, 12, 5, 0, 0));
        let b = GroupingMode::Monthly.bucket_key(dt(2024, 1, 5, 0, 0));
        assert!(a < b);
    }

    #[test]
    fn display_per_granularity() {
        let ts = dt(2024, 7, 9, 10, 30);
        assert_eq!(GroupingMode::Daily.bucket_key(ts).to_string(), "2024-07-09");
        assert_eq!(GroupingMode::Monthly.bucket_key(ts).to_string(), "2024-07");
        assert_eq!(GroupingMode::Yearly.bucket_key(ts).to_string(), "2024");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Observation
// ═══════════════════════════════════════════════════════════════════

mod observation {
    use super::*;

    #[test]
    fn new_assigns_unique_ids() {
        let a = Observation::new(dt(2024, 1, 1, 0, 0), 1.0);
        let b = Observation::new(dt(2024, 1, 1, 0, 0), 1.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn day_drops_time_of_day() {
        let o = Observation::new(dt(2024, 1, 5, 17, 45), 100.0);
        assert_eq!(o.day(), d(2024, 1, 5));
    }

    #[test]
    fn same_day_ignores_time() {
        let o = Observation::new(dt(2024, 1, 5, 0, 1), 100.0);
        assert!(o.is_same_day(dt(2024, 1, 5, 23, 59)));
        assert!(!o.is_same_day(dt(2024, 1, 6, 0, 0)));
    }

    #[test]
    fn negative_amount_allowed() {
        let o = Observation::new(dt(2024, 1, 5, 0, 0), -2_500_000.0);
        assert_eq!(o.amount, -2_500_000.0);
    }

    #[test]
    fn serde_roundtrip_json() {
        let o = Observation::new(dt(2024, 1, 5, 9, 15), 1_012_000_000.0);
        let json = serde_json::to_string(&o).unwrap();
        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(o, back);
    }

    #[test]
    fn upsert_outcome_id() {
        let id = Uuid::new_v4();
        assert_eq!(UpsertOutcome::Inserted(id).id(), id);
        assert_eq!(UpsertOutcome::Updated(id).id(), id);
        assert_ne!(UpsertOutcome::Inserted(id), UpsertOutcome::Updated(id));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Chart models
// ═══════════════════════════════════════════════════════════════════

mod chart_models {
    use super::*;

    #[test]
    fn first_delta_policy_default_is_drop() {
        assert_eq!(FirstDeltaPolicy::default(), FirstDeltaPolicy::Drop);
    }

    #[test]
    fn chart_data_serializes() {
        let chart = ChartData {
            mode: GroupingMode::Monthly,
            series: vec![SeriesPoint::new(d(2024, 1, 1), 100.0)],
            deltas: vec![DeltaPoint::new(d(2024, 2, 1), 50.0)],
            max_value: Some(100.0),
        };
        let json = serde_json::to_string(&chart).unwrap();
        assert!(json.contains("\"Monthly\""));
        assert!(json.contains("2024-01-01"));
        let back: ChartData = serde_json::from_str(&json).unwrap();
        assert_eq!(chart, back);
    }

    #[test]
    fn series_row_serializes_missing_delta_as_null() {
        let row = SeriesRow {
            date: d(2024, 1, 1),
            value: 100.0,
            delta: None,
            deviation_from_max: -50.0,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"delta\":null"));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings & Ledger
// ═══════════════════════════════════════════════════════════════════

mod settings_and_ledger {
    use super::*;

    #[test]
    fn settings_defaults() {
        let s = Settings::default();
        assert_eq!(s.default_grouping, GroupingMode::Daily);
        assert_eq!(s.first_delta_policy, FirstDeltaPolicy::Drop);
        assert_eq!(s.daily_window_days, DEFAULT_DAILY_WINDOW_DAYS);
        assert_eq!(s.recent_rows_limit, DEFAULT_RECENT_ROWS_LIMIT);
        assert_eq!(DEFAULT_DAILY_WINDOW_DAYS, 365);
        assert_eq!(DEFAULT_RECENT_ROWS_LIMIT, 13);
    }

    #[test]
    fn settings_missing_fields_use_defaults() {
        let s: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn settings_partial_json() {
        let s: Settings =
            serde_json::from_str(r#"{"default_grouping":"Yearly","daily_window_days":30}"#).unwrap();
        assert_eq!(s.default_grouping, GroupingMode::Yearly);
        assert_eq!(s.daily_window_days, 30);
        assert_eq!(s.recent_rows_limit, DEFAULT_RECENT_ROWS_LIMIT);
    }

    #[test]
    fn ledger_default_empty() {
        let l = Ledger::default();
        assert!(l.observations.is_empty());
        assert_eq!(l.settings, Settings::default());
    }

    #[test]
    fn ledger_serde_roundtrip() {
        let mut l = Ledger::default();
        l.observations.push(Observation::new(dt(2024, 1, 5, 0, 0), 100.0));
        l.settings.first_delta_policy = FirstDeltaPolicy::ZeroSentinel;
        let json = serde_json::to_string(&l).unwrap();
        let back: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(l, back);
    }
}
