//! Integration tests for the public events list: visibility windows,
//! request parameters and role filtering combined over a small board.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use eventboard_core::listing::{my_events, LifecycleFilter, OwnershipFilter};
use eventboard_core::{
    build_listing, Config, EventDraft, EventId, EventRecord, Lifecycle, ListingQuery,
    Relationship, Snapshot, TagId, UserId, VisibilityPolicy,
};

const HOST: UserId = UserId(1);
const GUEST: UserId = UserId(2);

fn draft(title: &str, day: u32, tags: &[u64]) -> EventDraft {
    serde_json::from_value(serde_json::json!({
        "title": title,
        "interest": "community",
        "location": "Town hall",
        "date": format!("2024-01-{day:02}"),
        "start_time": "10:00:00",
        "end_time": "12:00:00",
        "tags": tags,
    }))
    .unwrap()
}

fn board() -> Vec<EventRecord> {
    let mut records = vec![
        EventRecord::create(EventId(1), &draft("Finished workshop", 1, &[1]), HOST).unwrap(),
        EventRecord::create(EventId(2), &draft("Old workshop", 2, &[1]), HOST).unwrap(),
        EventRecord::create(EventId(3), &draft("Cancelled picnic", 9, &[2]), HOST).unwrap(),
        EventRecord::create(EventId(4), &draft("Live coding", 10, &[1, 2]), HOST).unwrap(),
        EventRecord::create(EventId(5), &draft("Future hackathon", 20, &[2]), GUEST).unwrap(),
    ];

    let before = Snapshot::at(at(8, 9, 0));
    records[2].cancel(HOST, "rain", &before).unwrap();
    records[3].join(GUEST, &before).unwrap();
    records
}

fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn ids(entries: &[eventboard_core::ListingEntry<'_>]) -> Vec<u64> {
    entries.iter().map(|e| e.record.id().0).collect()
}

#[test]
fn test_default_policy_hides_stale_closed_events() {
    let records = board();
    // 2024-01-10 11:00: #1 and #2 ended more than 7 days ago, #3 was
    // cancelled and started a day ago, #4 is ongoing, #5 upcoming.
    let now = Snapshot::at(at(10, 11, 0));
    let entries = build_listing(
        &records,
        None,
        &ListingQuery::default(),
        &VisibilityPolicy::default(),
        &now,
    );

    assert_eq!(ids(&entries), vec![3, 4, 5]);
    let lifecycles: Vec<Lifecycle> = entries.iter().map(|e| e.lifecycle).collect();
    assert_eq!(
        lifecycles,
        vec![Lifecycle::Cancelled, Lifecycle::Ongoing, Lifecycle::Upcoming]
    );
}

#[test]
fn test_missing_settings_hide_all_closed_events() {
    let records = board();
    let now = Snapshot::at(at(10, 11, 0));
    let policy = VisibilityPolicy::or_hide_immediately(None);
    let entries = build_listing(&records, None, &ListingQuery::default(), &policy, &now);
    assert_eq!(ids(&entries), vec![4, 5]);
}

#[test]
fn test_config_policy_drives_listing() {
    let records = board();
    let now = Snapshot::at(at(10, 11, 0));
    let mut config = Config::default();
    config.set("visibility.hide_completed_after_days", "9").unwrap();

    let entries = build_listing(
        &records,
        None,
        &ListingQuery::default(),
        &config.visibility,
        &now,
    );
    assert_eq!(ids(&entries), vec![1, 2, 3, 4, 5]);

    let just_past = Snapshot::at(now.now() + Duration::hours(2));
    let entries = build_listing(
        &records,
        None,
        &ListingQuery::default(),
        &config.visibility,
        &just_past,
    );
    assert_eq!(ids(&entries), vec![2, 3, 4, 5]);
}

#[test]
fn test_params_combine_as_intersection() {
    let records = board();
    let now = Snapshot::at(at(10, 11, 0));
    let query = ListingQuery::from_params([
        ("q", "o"),
        ("tag", "2"),
        ("lifecycle", "ongoing"),
        ("role", "joined"),
        ("sort", "popular"),
    ]);
    let entries = build_listing(
        &records,
        Some(GUEST),
        &query,
        &VisibilityPolicy::default(),
        &now,
    );
    assert_eq!(ids(&entries), vec![4]);
    assert_eq!(entries[0].relationship, Relationship::Member);
    assert_eq!(entries[0].join_count, 2);
}

#[test]
fn test_unknown_lifecycle_label_matches_nothing() {
    let records = board();
    let now = Snapshot::at(at(10, 11, 0));
    let query = ListingQuery::from_params([("lifecycle", "archived")]);
    assert_eq!(query.lifecycle, LifecycleFilter::Unmatched);
    let entries = build_listing(&records, None, &query, &VisibilityPolicy::default(), &now);
    assert!(entries.is_empty());
}

#[test]
fn test_tag_filter() {
    let records = board();
    let now = Snapshot::at(at(10, 11, 0));
    let query = ListingQuery {
        tag: Some(TagId(1)),
        ..Default::default()
    };
    let entries = build_listing(&records, None, &query, &VisibilityPolicy::new(30, 30), &now);
    assert_eq!(ids(&entries), vec![1, 2, 4]);
}

#[test]
fn test_my_events_ignores_visibility() {
    let records = board();
    let now = Snapshot::at(at(31, 23, 0));
    let created = my_events(&records, HOST, OwnershipFilter::Created, &now);
    assert_eq!(ids(&created), vec![1, 2, 3, 4]);
    assert!(created
        .iter()
        .all(|e| e.relationship == Relationship::Creator));

    let joined = my_events(&records, GUEST, OwnershipFilter::Joined, &now);
    assert_eq!(ids(&joined), vec![4]);
    assert_eq!(joined[0].lifecycle, Lifecycle::Completed);

    let all = my_events(&records, GUEST, OwnershipFilter::All, &now);
    assert_eq!(ids(&all), vec![4, 5]);
}
