//! Live-tracking state kept per client connection.
//!
//! [`LocationUpdateFilter`] throttles device positions and [`RefreshTracker`]
//! orders concurrent lookups so only the newest request may replace the
//! visible results.

use crate::domain::geo::Coordinate;
use crate::domain::ports::NearbyParkingRequest;

/// Minimum movement before a new position triggers a refresh, in metres.
pub const MIN_LOCATION_DELTA_M: f64 = 10.0;

/// Drops location lookups that repeat the last accepted one.
///
/// A lookup repeats the previous one when the radius and name filter are
/// unchanged and the position moved less than the threshold.
#[derive(Debug, Clone)]
pub struct LocationUpdateFilter {
    min_delta_m: f64,
    last_accepted: Option<NearbyParkingRequest>,
}

impl Default for LocationUpdateFilter {
    fn default() -> Self {
        Self::new(MIN_LOCATION_DELTA_M)
    }
}

impl LocationUpdateFilter {
    pub fn new(min_delta_m: f64) -> Self {
        Self {
            min_delta_m,
            last_accepted: None,
        }
    }

    /// Record `request` and report whether it should trigger a refresh.
    ///
    /// The first request is always accepted.
    pub fn accept(&mut self, request: &NearbyParkingRequest) -> bool {
        let changed = self.last_accepted.as_ref().is_none_or(|last| {
            last.radius != request.radius
                || last.name_filter != request.name_filter
                || last.origin.distance_to(&request.origin) >= self.min_delta_m
        });
        if changed {
            self.last_accepted = Some(request.clone());
        }
        changed
    }

    /// Forget the last accepted request so the next one always refreshes.
    ///
    /// Called when the visible results stop reflecting that request, e.g.
    /// after a text search replaced them or the lookup failed.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }

    pub fn last_position(&self) -> Option<&Coordinate> {
        self.last_accepted.as_ref().map(|request| &request.origin)
    }
}

/// Generation number handed out for each started lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// What happened to a completed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome<E> {
    /// The result replaced the current list.
    Applied,
    /// A newer lookup was started after this one; the result was dropped.
    Stale,
    /// The newest lookup failed; the previous list is kept.
    Failed(E),
}

/// Last-known-good results plus the generation counter guarding them.
///
/// # Examples
/// ```
/// use spark_backend::domain::{RefreshOutcome, RefreshTracker};
///
/// let mut tracker: RefreshTracker<&str, ()> = RefreshTracker::default();
/// let first = tracker.begin();
/// let second = tracker.begin();
/// assert_eq!(tracker.complete(second, Ok("new")), RefreshOutcome::Applied);
/// assert_eq!(tracker.complete(first, Ok("old")), RefreshOutcome::Stale);
/// assert_eq!(tracker.current(), Some(&"new"));
/// ```
#[derive(Debug)]
pub struct RefreshTracker<T, E> {
    issued: u64,
    current: Option<T>,
    _error: std::marker::PhantomData<fn() -> E>,
}

impl<T, E> Default for RefreshTracker<T, E> {
    fn default() -> Self {
        Self {
            issued: 0,
            current: None,
            _error: std::marker::PhantomData,
        }
    }
}

impl<T, E> RefreshTracker<T, E> {
    /// Start a lookup; every earlier ticket becomes stale.
    pub fn begin(&mut self) -> RefreshTicket {
        self.issued = self.issued.saturating_add(1);
        RefreshTicket(self.issued)
    }

    /// Feed back the result of the lookup identified by `ticket`.
    pub fn complete(&mut self, ticket: RefreshTicket, result: Result<T, E>) -> RefreshOutcome<E> {
        if ticket.0 != self.issued {
            return RefreshOutcome::Stale;
        }
        match result {
            Ok(value) => {
                self.current = Some(value);
                RefreshOutcome::Applied
            }
            Err(error) => RefreshOutcome::Failed(error),
        }
    }

    /// Most recently applied result.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Whether `ticket` is still the newest issued.
    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        ticket.0 == self.issued
    }
}
