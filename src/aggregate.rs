use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::cache::{CacheEntry, EnabledSet};
use crate::config::CalendarSource;
use crate::datemath;
use crate::event::Event;

/// Per-day sets of source ids with at least one overlapping event,
/// keyed by `date_only_key` strings.
pub type DayMarkerMap = BTreeMap<String, BTreeSet<String>>;

/// An event intersecting the selected day, with its source attached.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedEvent {
    pub event: Event,
    pub source: CalendarSource,
}

/// Day markers and the selected-day event list for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub day_markers: DayMarkerMap,
    pub selected_events: Vec<SelectedEvent>,
}

/// Walks every cached event once, collecting which enabled sources touch
/// each grid day and which events intersect the selected day. With no
/// cache entry the result is empty.
pub fn aggregate(
    entry: Option<&CacheEntry>,
    sources: &[CalendarSource],
    enabled: &EnabledSet,
    selected_day: NaiveDate,
) -> Aggregate {
    let mut day_markers = DayMarkerMap::new();
    let mut selected_events = Vec::new();

    let Some(entry) = entry else {
        return Aggregate {
            day_markers,
            selected_events,
        };
    };

    let grid_start = entry.range.start_dt();
    let grid_end = entry.range.end_dt();
    let selected_start = datemath::local_midnight(selected_day);
    let selected_end = datemath::add_days(selected_start, 1);

    // Sources iterate in declared order, so events with equal start
    // times keep a stable order in the selected list.
    for source in sources {
        if !enabled.contains(&source.id) {
            continue;
        }
        let Some(events) = entry.events_by_source.get(&source.id) else {
            continue;
        };

        for event in events {
            // Zero-duration events never match any day window.
            if event.start == event.end {
                continue;
            }

            // Events may extend past the visible grid on either side.
            let clamp_start = event.start.max(grid_start);
            let clamp_end = event.end.min(grid_end);

            let mut day = datemath::start_of_day(clamp_start);
            while day < clamp_end {
                let day_end = datemath::add_days(day, 1);
                if datemath::intervals_overlap(event.start, event.end, day, day_end) {
                    day_markers
                        .entry(datemath::date_only_key(day.date_naive()))
                        .or_default()
                        .insert(source.id.clone());
                }
                day = day_end;
            }

            if datemath::intervals_overlap(event.start, event.end, selected_start, selected_end)
            {
                selected_events.push(SelectedEvent {
                    event: event.clone(),
                    source: source.clone(),
                });
            }
        }
    }

    selected_events.sort_by_key(|s| s.event.start);

    Aggregate {
        day_markers,
        selected_events,
    }
}

/// Picks at most `cap` marker sources for one day: enabled sources that
/// mark the day, ascending priority, absent priority last. Equal
/// priorities keep the configured order.
pub fn top_sources_for_day<'a>(
    day_key: &str,
    markers: &DayMarkerMap,
    sources: &'a [CalendarSource],
    enabled: &EnabledSet,
    cap: usize,
) -> Vec<&'a CalendarSource> {
    let Some(set) = markers.get(day_key) else {
        return Vec::new();
    };

    let mut top: Vec<&CalendarSource> = sources
        .iter()
        .filter(|s| enabled.contains(&s.id) && set.contains(&s.id))
        .collect();
    top.sort_by_key(|s| s.priority.unwrap_or(i64::MAX));
    top.truncate(cap);
    top
}
