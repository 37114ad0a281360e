use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::aggregate::{self, Aggregate, DayMarkerMap, SelectedEvent};
use crate::cache::{cache_key, CacheEntry, EnabledSet, RangeCache};
use crate::config::{CalendarSource, Config};
use crate::datemath;
use crate::error::Result;
use crate::fetch::EventFetcher;
use crate::grid::GridRange;

/// Selected-day event list shaped for display: all-day entries first,
/// then timed ones, each group in start order, truncated to the
/// configured cap.
#[derive(Debug, Clone, PartialEq)]
pub struct EventList {
    pub events: Vec<SelectedEvent>,
    pub total: usize,
    pub hidden: usize,
}

/// One render pass worth of derived data.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub range: GridRange,
    pub day_markers: DayMarkerMap,
    pub events: EventList,
}

/// Widget controller. Owns the immutable configuration, the view state,
/// and the insert-only range cache. Every state change replaces the
/// affected value wholesale, so a render always sees a complete
/// snapshot.
#[derive(Debug)]
pub struct MonthCard<F> {
    config: Config,
    enabled: EnabledSet,
    /// First day of the visible month.
    view_month: NaiveDate,
    selected_day: NaiveDate,
    cache: RangeCache,
    pending: HashSet<String>,
    last_error: Option<String>,
    fetcher: F,
}

impl<F: EventFetcher> MonthCard<F> {
    /// Validates the configuration and starts on `today` with every
    /// configured source enabled.
    pub fn new(config: Config, fetcher: F, today: NaiveDate) -> Result<Self> {
        let config = config.validated()?;
        let enabled = config.all_source_ids();
        Ok(Self {
            enabled,
            view_month: first_of_month(today),
            selected_day: today,
            config,
            cache: RangeCache::new(),
            pending: HashSet::new(),
            last_error: None,
            fetcher,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn enabled(&self) -> &EnabledSet {
        &self.enabled
    }

    pub fn view_month(&self) -> NaiveDate {
        self.view_month
    }

    pub fn selected_day(&self) -> NaiveDate {
        self.selected_day
    }

    /// Message from the most recent failed fetch, cleared by the next
    /// successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn cache(&self) -> &RangeCache {
        &self.cache
    }

    /// Grid range for the visible month.
    pub fn grid_range(&self) -> GridRange {
        GridRange::for_month(
            self.view_month.year(),
            self.view_month.month(),
            self.config.week_start,
        )
    }

    pub fn next_month(&mut self) {
        self.shift_month(1);
    }

    pub fn prev_month(&mut self) {
        self.shift_month(-1);
    }

    fn shift_month(&mut self, delta: i32) {
        let months = self.view_month.year() * 12 + self.view_month.month() as i32 - 1 + delta;
        let (year, month) = (months.div_euclid(12), months.rem_euclid(12) as u32 + 1);
        self.view_month = NaiveDate::from_ymd_opt(year, month, 1).expect("valid date");
    }

    /// Jumps the view month and the selection back to `today`.
    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.view_month = first_of_month(today);
        self.selected_day = today;
    }

    pub fn select_day(&mut self, day: NaiveDate) {
        self.selected_day = day;
    }

    /// Toggles one source on or off. Unknown ids are ignored. The set is
    /// replaced rather than mutated, so an in-flight fetch keeps the
    /// snapshot it started from.
    pub fn toggle_source(&mut self, id: &str) {
        if self.config.source(id).is_none() {
            return;
        }
        let mut next = self.enabled.clone();
        if !next.remove(id) {
            next.insert(id.to_string());
        }
        self.enabled = next;
    }

    /// Fetches events for the visible range unless an entry for the
    /// current key is already cached or in flight. Returns whether a
    /// fetch was performed.
    ///
    /// A failure records the message and leaves every cached range
    /// intact; the next call for the same key attempts a fresh fetch.
    pub async fn refresh(&mut self) -> Result<bool> {
        let range = self.grid_range();
        let key = cache_key(&range, &self.enabled);
        if self.cache.get(&key).is_some() || self.pending.contains(&key) {
            return Ok(false);
        }

        self.pending.insert(key.clone());
        let sources = self.enabled.clone();
        let ids: Vec<String> = sources.iter().cloned().collect();
        let (start, end) = (range.start_dt(), range.end_dt());
        debug!(
            start = %datemath::iso_with_offset(start),
            end = %datemath::iso_with_offset(end),
            sources = ids.len(),
            "fetching events for visible range"
        );

        let result = self.fetcher.fetch_events(&ids, start, end).await;
        self.pending.remove(&key);

        match result {
            Ok(events_by_source) => {
                self.last_error = None;
                self.cache.put(
                    key,
                    CacheEntry {
                        range,
                        sources,
                        events_by_source,
                    },
                );
                Ok(true)
            }
            Err(err) => {
                warn!(error = %err, "event fetch failed");
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Derives the render data for the current snapshot. With no cached
    /// entry for the active key this yields empty markers and an empty
    /// event list.
    pub fn view(&self) -> CardView {
        let range = self.grid_range();
        let key = cache_key(&range, &self.enabled);
        let Aggregate {
            day_markers,
            selected_events,
        } = aggregate::aggregate(
            self.cache.get(&key),
            &self.config.sources,
            &self.enabled,
            self.selected_day,
        );
        CardView {
            range,
            day_markers,
            events: self.event_list(selected_events),
        }
    }

    /// Marker sources for one grid day under the configured cap.
    pub fn top_markers_for_day<'a>(
        &'a self,
        day: NaiveDate,
        markers: &DayMarkerMap,
    ) -> Vec<&'a CalendarSource> {
        aggregate::top_sources_for_day(
            &datemath::date_only_key(day),
            markers,
            &self.config.sources,
            &self.enabled,
            self.config.marker_cap,
        )
    }

    fn event_list(&self, selected: Vec<SelectedEvent>) -> EventList {
        let total = selected.len();
        let (mut events, timed): (Vec<_>, Vec<_>) =
            selected.into_iter().partition(|s| s.event.all_day);
        events.extend(timed);

        let hidden = match self.config.max_events {
            Some(cap) if events.len() > cap => {
                let hidden = events.len() - cap;
                events.truncate(cap);
                hidden
            }
            _ => 0,
        };

        EventList {
            events,
            total,
            hidden,
        }
    }
}

fn first_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(1).expect("valid date")
}
