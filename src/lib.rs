//! Core logic for a compact month-calendar widget.
//!
//! The crate derives the week-aligned day grid for a month plus filler
//! days from the adjacent months, caches fetched events per grid range
//! and enabled-source set, and aggregates per-day markers and the
//! selected day's events from possibly overlapping calendar feeds.
//!
//! Rendering, the event transport, and the host UI lifecycle are
//! external collaborators; the transport is injected via
//! [`EventFetcher`] and driven by the [`MonthCard`] controller.

pub mod aggregate;
pub mod cache;
pub mod card;
pub mod config;
pub mod datemath;
pub mod error;
pub mod event;
pub mod fetch;
pub mod grid;

pub use aggregate::{Aggregate, DayMarkerMap, SelectedEvent};
pub use cache::{cache_key, CacheEntry, EnabledSet, RangeCache};
pub use card::{CardView, EventList, MonthCard};
pub use config::{CalendarSource, Config, WeekStart};
pub use error::{Error, Result};
pub use event::{Event, EventsBySource};
pub use fetch::EventFetcher;
pub use grid::GridRange;
