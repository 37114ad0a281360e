use std::collections::HashMap;

use chrono::{DateTime, Local};

/// A single, already-expanded calendar event. `start <= end` is assumed;
/// an event with `start == end` has zero duration and never marks a day.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub all_day: bool,
    pub summary: String,
}

/// Fetched events grouped by source id, each list in the order the
/// transport returned it.
pub type EventsBySource = HashMap<String, Vec<Event>>;
