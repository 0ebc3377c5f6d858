//! Collision layout for a day's calendar events
//!
//! Two pure passes: overlapping events are grouped into collision groups, then each
//! group is packed into left-to-right columns of non-overlapping events. Both passes
//! are order-sensitive and cheap enough to re-run in full whenever the event list
//! changes; there is no incremental update.

use crate::event::CalendarEvent;

/// Events connected by a transitive time-overlap relation.
/// Members are not necessarily all pairwise overlapping.
pub type CollisionGroup<'a> = Vec<&'a CalendarEvent>;

/// An ordered list of non-overlapping events within one collision group,
/// used purely for horizontal placement.
pub type Column<'a> = Vec<&'a CalendarEvent>;

/// Half-open interval overlap: touching endpoints do not count as overlapping
pub fn overlaps(a: &CalendarEvent, b: &CalendarEvent) -> bool {
    a.datetime_start() < b.datetime_end() && a.datetime_end() > b.datetime_start()
}

/// Group events into collision groups, in a single greedy pass.
///
/// Each event joins the first existing group containing at least one event it overlaps
/// with, or starts a new group. Transitive closure emerges because a later event can
/// bridge two earlier events that do not overlap each other. O(n·g·k) with g groups of
/// average size k, which is fine for a single day's events.
pub fn find_collision_groups(events: &[CalendarEvent]) -> Vec<CollisionGroup<'_>> {
    let mut groups: Vec<CollisionGroup> = Vec::new();

    for event in events {
        let home = groups
            .iter_mut()
            .find(|group| group.iter().any(|member| overlaps(member, event)));
        match home {
            Some(group) => group.push(event),
            None => groups.push(vec![event]),
        }
    }

    groups
}

/// Pack one collision group into columns.
///
/// Each event (in input order) joins the first column none of whose events it overlaps,
/// or opens a new column. This is a deterministic, cheap approximation of
/// minimum-column interval coloring, not necessarily optimal.
pub fn create_event_columns<'a>(group: &[&'a CalendarEvent]) -> Vec<Column<'a>> {
    let mut columns: Vec<Column> = Vec::new();

    for &event in group {
        let home = columns
            .iter_mut()
            .find(|column| column.iter().all(|member| !overlaps(member, event)));
        match home {
            Some(column) => column.push(event),
            None => columns.push(vec![event]),
        }
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(id: &str, start: (u32, u32), end: (u32, u32)) -> CalendarEvent {
        CalendarEvent::new(
            id.to_string(),
            Utc.ymd(2021, 3, 1).and_hms(start.0, start.1, 0),
            Utc.ymd(2021, 3, 1).and_hms(end.0, end.1, 0),
            format!("event {}", id),
            None,
        )
    }

    fn ids(events: &[&CalendarEvent]) -> Vec<String> {
        events.iter().map(|e| e.id().to_string()).collect()
    }

    #[test]
    fn overlap_is_half_open() {
        let morning = event("a", (9, 0), (10, 0));
        let nested = event("b", (9, 30), (9, 45));
        let touching = event("c", (10, 0), (11, 0));

        assert!(overlaps(&morning, &nested));
        assert!(overlaps(&nested, &morning));
        // touching endpoints do not overlap
        assert!(!overlaps(&morning, &touching));
        assert!(!overlaps(&touching, &morning));
    }

    #[test]
    fn grouping_separates_isolated_events() {
        let events = vec![
            event("1", (9, 0), (10, 0)),
            event("2", (9, 30), (9, 45)),
            event("3", (11, 0), (12, 0)),
        ];
        let groups = find_collision_groups(&events);

        assert_eq!(groups.len(), 2);
        assert_eq!(ids(&groups[0]), vec!["1", "2"]);
        assert_eq!(ids(&groups[1]), vec!["3"]);
    }

    #[test]
    fn later_event_bridges_a_group() {
        // b and c do not overlap each other, but a bridges them transitively
        let events = vec![
            event("b", (9, 0), (9, 30)),
            event("a", (9, 15), (10, 15)),
            event("c", (10, 0), (10, 30)),
        ];
        let groups = find_collision_groups(&events);

        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec!["b", "a", "c"]);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(find_collision_groups(&[]).is_empty());
    }

    #[test]
    fn column_packing_reuses_freed_columns() {
        let e1 = event("1", (9, 0), (10, 0));
        let e2 = event("2", (9, 15), (9, 45));
        // starts exactly when e1 ends: shares e1's column
        let e3 = event("3", (10, 0), (10, 30));
        let group = vec![&e1, &e2, &e3];

        let columns = create_event_columns(&group);
        assert_eq!(columns.len(), 2);
        assert_eq!(ids(&columns[0]), vec!["1", "3"]);
        assert_eq!(ids(&columns[1]), vec!["2"]);
    }

    #[test]
    fn column_packing_is_order_sensitive() {
        // overlap chain a-b-c-d (each event only overlaps its neighbours)
        let a = event("a", (9, 0), (9, 20));
        let b = event("b", (9, 10), (9, 40));
        let c = event("c", (9, 30), (10, 0));
        let d = event("d", (9, 50), (10, 10));

        // in start order, two columns suffice
        let columns = create_event_columns(&[&a, &b, &c, &d]);
        assert_eq!(columns.len(), 2);
        assert_eq!(ids(&columns[0]), vec!["a", "c"]);
        assert_eq!(ids(&columns[1]), vec!["b", "d"]);

        // a different input order makes the greedy pass open a third column
        let columns = create_event_columns(&[&a, &d, &b, &c]);
        assert_eq!(columns.len(), 3);
        assert_eq!(ids(&columns[0]), vec!["a", "d"]);
    }
}
