use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone};

/// Canonical `YYYY-MM-DD` key for a calendar day. Lexicographic order
/// on keys equals chronological order on days.
pub fn date_only_key(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Local midnight at the start of the given calendar day.
pub fn local_midnight(d: NaiveDate) -> DateTime<Local> {
    resolve_local(d.and_hms_opt(0, 0, 0).expect("valid time"))
}

/// Truncates an instant to local midnight of its calendar day.
pub fn start_of_day(dt: DateTime<Local>) -> DateTime<Local> {
    local_midnight(dt.date_naive())
}

/// Adds `n` whole calendar days (`n` may be negative). The date is
/// stepped by calendar fields and the time-of-day re-resolved in the
/// local zone, so the result does not drift by an hour across
/// daylight-saving transitions.
pub fn add_days(dt: DateTime<Local>, n: i64) -> DateTime<Local> {
    let date = dt.date_naive() + Duration::days(n);
    resolve_local(date.and_time(dt.time()))
}

/// `YYYY-MM-DDTHH:mm:ss±HH:MM` using the local UTC offset at that
/// instant. Canonical wire rendering for fetch range bounds.
pub fn iso_with_offset(dt: DateTime<Local>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap iff `a_start < b_end && a_end > b_start`. Touching endpoints
/// do not count.
pub fn intervals_overlap(
    a_start: DateTime<Local>,
    a_end: DateTime<Local>,
    b_start: DateTime<Local>,
    b_end: DateTime<Local>,
) -> bool {
    a_start < b_end && a_end > b_start
}

fn resolve_local(naive: NaiveDateTime) -> DateTime<Local> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        // Fall-back repeats this wall-clock time; take the earlier instant.
        LocalResult::Ambiguous(earlier, _) => earlier,
        // Spring-forward skipped this wall-clock time; step past the gap
        // to the first valid instant.
        LocalResult::None => {
            let mut probe = naive;
            loop {
                probe += Duration::minutes(15);
                if let Some(dt) = Local.from_local_datetime(&probe).earliest() {
                    return dt;
                }
            }
        }
    }
}
