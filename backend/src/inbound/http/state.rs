//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see driving ports, so they
//! stay testable with mocks.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, NearbyParkingQuery, ParkingRecordsCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub nearby: Arc<dyn NearbyParkingQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub records: Arc<dyn ParkingRecordsCommand>,
}

impl HttpState {
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use spark_backend::domain::ports::{AccountCommand, NearbyParkingQuery, ParkingRecordsCommand};
    /// use spark_backend::inbound::http::state::HttpState;
    ///
    /// fn wire(
    ///     nearby: Arc<dyn NearbyParkingQuery>,
    ///     accounts: Arc<dyn AccountCommand>,
    ///     records: Arc<dyn ParkingRecordsCommand>,
    /// ) -> HttpState {
    ///     HttpState::new(nearby, accounts, records)
    /// }
    /// ```
    pub fn new(
        nearby: Arc<dyn NearbyParkingQuery>,
        accounts: Arc<dyn AccountCommand>,
        records: Arc<dyn ParkingRecordsCommand>,
    ) -> Self {
        Self {
            nearby,
            accounts,
            records,
        }
    }
}
