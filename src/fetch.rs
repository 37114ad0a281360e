use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::error::Result;
use crate::event::EventsBySource;

/// Transport collaborator that loads events for a half-open local-time
/// range. The canonical wire rendering of the bounds is
/// [`crate::datemath::iso_with_offset`].
///
/// Implementations return, per requested source id, a possibly empty
/// event list covering `[start, end)`. The core never retries; a
/// rejected fetch surfaces as [`crate::Error::FetchFailed`] and an
/// absent transport as [`crate::Error::FetchUnavailable`].
#[async_trait]
pub trait EventFetcher: Send + Sync {
    async fn fetch_events(
        &self,
        source_ids: &[String],
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<EventsBySource>;
}
