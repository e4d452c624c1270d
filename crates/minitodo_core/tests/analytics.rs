use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use minitodo_core::{
    AnalyticsAggregator, InMemoryTaskStore, NewTask, Priority, TaskPatch, TaskStats, TaskStore,
};

fn ms(year: i32, month: u32, day: u32, hour: u32) -> i64 {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .unwrap()
        .timestamp_millis()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn seed(store: &InMemoryTaskStore, owner: &str, created_at: i64, completed: bool) {
    let id = store
        .create(&NewTask::new(owner, "task", Priority::Medium, created_at).unwrap())
        .unwrap();
    if completed {
        store.update(id, &TaskPatch::completed(true)).unwrap();
    }
}

#[test]
fn empty_collection_has_zero_rate_and_no_days() {
    let store = InMemoryTaskStore::new();
    let stats = AnalyticsAggregator::new(&store).summarize("u1", &Utc).unwrap();
    assert_eq!(stats, TaskStats::default());
    assert_eq!(stats.completion_rate(), 0.0);
}

#[test]
fn two_completed_three_pending_is_forty_percent() {
    let store = InMemoryTaskStore::new();
    for completed in [true, true, false, false, false] {
        seed(&store, "u1", ms(2024, 3, 1, 12), completed);
    }

    let stats = AnalyticsAggregator::new(&store).summarize("u1", &Utc).unwrap();
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.pending, 3);
    assert_eq!(stats.total(), 5);
    assert_eq!(stats.completion_rate(), 0.4);
    assert_eq!(stats.completion_rate_label(), "40.0%");
}

#[test]
fn histogram_groups_by_date_without_gap_filling() {
    let store = InMemoryTaskStore::new();
    seed(&store, "u1", ms(2024, 3, 1, 9), false);
    seed(&store, "u1", ms(2024, 3, 1, 17), true);
    seed(&store, "u1", ms(2024, 3, 4, 8), false);
    seed(&store, "u2", ms(2024, 3, 2, 8), false);

    let stats = AnalyticsAggregator::new(&store).summarize("u1", &Utc).unwrap();
    let days: Vec<(NaiveDate, usize)> = stats.daily_created.into_iter().collect();
    assert_eq!(days, vec![(date(2024, 3, 1), 2), (date(2024, 3, 4), 1)]);
}

#[test]
fn histogram_uses_viewer_time_zone() {
    let store = InMemoryTaskStore::new();
    seed(&store, "u1", ms(2024, 3, 1, 23), false);

    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    let stats = AnalyticsAggregator::new(&store).summarize("u1", &tokyo).unwrap();
    assert_eq!(stats.daily_created.get(&date(2024, 3, 2)), Some(&1));
    assert!(!stats.daily_created.contains_key(&date(2024, 3, 1)));

    let honolulu = FixedOffset::west_opt(10 * 3600).unwrap();
    let stats = AnalyticsAggregator::new(&store).summarize("u1", &honolulu).unwrap();
    assert_eq!(stats.daily_created.get(&date(2024, 3, 1)), Some(&1));
}

#[test]
fn out_of_range_timestamp_is_counted_but_not_bucketed() {
    let store = InMemoryTaskStore::new();
    seed(&store, "u1", i64::MAX, false);

    let stats = AnalyticsAggregator::new(&store).summarize("u1", &Utc).unwrap();
    assert_eq!(stats.pending, 1);
    assert!(stats.daily_created.is_empty());
}

#[test]
fn timestamp_pushed_out_of_range_by_zone_offset_is_not_bucketed() {
    let store = InMemoryTaskStore::new();
    let edge = DateTime::<Utc>::MAX_UTC.timestamp_millis();
    seed(&store, "u1", edge, true);
    seed(&store, "u1", ms(2024, 3, 1, 12), false);

    let plus_fourteen = FixedOffset::east_opt(14 * 3600).unwrap();
    let stats = AnalyticsAggregator::new(&store)
        .summarize("u1", &plus_fourteen)
        .unwrap();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.daily_created.len(), 1);
    assert_eq!(stats.daily_created[&date(2024, 3, 2)], 1);

    let utc_stats = AnalyticsAggregator::new(&store).summarize("u1", &Utc).unwrap();
    assert_eq!(utc_stats.daily_created.len(), 2);
}

#[test]
fn stats_serialize_with_iso_date_keys() {
    let store = InMemoryTaskStore::new();
    seed(&store, "u1", ms(2024, 3, 1, 9), true);

    let stats = AnalyticsAggregator::new(&store).summarize("u1", &Utc).unwrap();
    let value = serde_json::to_value(&stats).unwrap();
    assert_eq!(value["completed"], 1);
    assert_eq!(value["dailyCreated"]["2024-03-01"], 1);
}
