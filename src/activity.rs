// Post-processing over fetched event feeds.
// Filtering by event type and per-day aggregation for charts.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::github::EventRecord;

/// Keep only events whose type tag equals `event_type`, preserving order.
pub fn filter_by_type<'a>(events: &'a [EventRecord], event_type: &str) -> Vec<&'a EventRecord> {
    events
        .iter()
        .filter(|event| event.event_type == event_type)
        .collect()
}

/// Count events per UTC date, oldest date first.
pub fn group_by_date<'a, I>(events: I) -> BTreeMap<NaiveDate, usize>
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    let mut counts = BTreeMap::new();
    for event in events {
        *counts.entry(event.date()).or_insert(0) += 1;
    }
    counts
}

/// Apply an optional type filter.
pub fn select<'a>(events: &'a [EventRecord], event_type: Option<&str>) -> Vec<&'a EventRecord> {
    match event_type.filter(|t| !t.is_empty()) {
        Some(event_type) => filter_by_type(events, event_type),
        None => events.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(event_type: &str, created_at: &str) -> EventRecord {
        serde_json::from_value(json!({
            "type": event_type,
            "created_at": created_at,
        }))
        .unwrap()
    }

    fn feed() -> Vec<EventRecord> {
        vec![
            event("PushEvent", "2024-05-02T09:00:00Z"),
            event("WatchEvent", "2024-05-02T08:00:00Z"),
            event("PushEvent", "2024-05-01T23:59:59Z"),
            event("IssuesEvent", "2024-04-30T00:00:00Z"),
        ]
    }

    #[test]
    fn test_filter_by_type_keeps_order() {
        let events = feed();
        let pushes = filter_by_type(&events, "PushEvent");

        assert_eq!(pushes.len(), 2);
        assert_eq!(pushes[0].created_at, events[0].created_at);
        assert_eq!(pushes[1].created_at, events[2].created_at);
        assert!(filter_by_type(&events, "pushevent").is_empty());
    }

    #[test]
    fn test_group_by_date() {
        let events = feed();
        let counts = group_by_date(&events);

        let days: Vec<_> = counts.iter().map(|(d, c)| (d.to_string(), *c)).collect();
        assert_eq!(
            days,
            vec![
                ("2024-04-30".to_string(), 1),
                ("2024-05-01".to_string(), 1),
                ("2024-05-02".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_select_without_filter() {
        let events = feed();
        assert_eq!(select(&events, None).len(), 4);
        assert_eq!(select(&events, Some("")).len(), 4);
        assert_eq!(select(&events, Some("WatchEvent")).len(), 1);
    }

    #[test]
    fn test_group_empty() {
        assert!(group_by_date(&Vec::<EventRecord>::new()).is_empty());
    }
}
