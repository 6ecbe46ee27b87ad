use asset_tracker_core::models::chart::FirstDeltaPolicy;
use asset_tracker_core::models::grouping::GroupingMode;
use asset_tracker_core::models::observation::Observation;
use asset_tracker_core::services::chart_service::{diff_with_policy, ChartService};
use asset_tracker_core::services::grouping_service::GroupingService;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Twenty thousand observations spread over ~55 years, in scrambled order.
fn observations(count: i64) -> Vec<Observation> {
    (0..count)
        .map(|i| {
            let offset = (i * 7919) % count;
            Observation::new(now() - Duration::days(offset), (i % 1000) as f64 * 1_000_000.0)
        })
        .collect()
}

fn bench_group_each_mode(c: &mut Criterion) {
    let snapshot = observations(20_000);
    let svc = GroupingService::new();

    for mode in GroupingMode::ALL {
        c.bench_function(&format!("group_{mode}_20k"), |b| {
            b.iter(|| svc.group(black_box(&snapshot), mode, now()));
        });
    }
}

fn bench_diff_daily_series(c: &mut Criterion) {
    let snapshot = observations(20_000);
    let series = GroupingService::new().group(&snapshot, GroupingMode::Daily, now());

    c.bench_function("diff_daily_series", |b| {
        b.iter(|| diff_with_policy(black_box(&series), FirstDeltaPolicy::Drop));
    });
}

fn bench_full_chart_monthly(c: &mut Criterion) {
    let snapshot = observations(20_000);
    let svc = ChartService::new();

    c.bench_function("chart_monthly_20k", |b| {
        b.iter(|| svc.generate_chart(black_box(&snapshot), GroupingMode::Monthly, now()));
    });
}

criterion_group!(
    benches,
    bench_group_each_mode,
    bench_diff_daily_series,
    bench_full_chart_monthly
);
criterion_main!(benches);
