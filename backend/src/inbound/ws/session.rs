//! Per-connection WebSocket handler.
//!
//! Each accepted `locationUpdate` or `search` starts a refresh on its own
//! task and takes the next generation from a [`RefreshTracker`]. Answers are
//! applied in generation order only: a slow lookup finishing after a newer
//! one is discarded, and a failed lookup leaves the client's previous list
//! in place. Position updates under [`MIN_LOCATION_DELTA_M`] are dropped.
//!
//! The connection is pinged every 5s and considered idle after 10s without
//! client traffic. Tests shorten both intervals.
//!
//! [`MIN_LOCATION_DELTA_M`]: crate::domain::MIN_LOCATION_DELTA_M

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::task::{JoinError, JoinSet};
use tokio::time;
use tracing::{debug, warn};

use crate::domain::ports::{NearbyParkingQuery, NearbyParkingRequest, ParkingSearchRequest};
use crate::domain::{
    Error, LocationUpdateFilter, NearbyParking, RefreshOutcome, RefreshTicket, RefreshTracker,
    TraceId,
};
use crate::inbound::http::schemas::NearbyParkingBody;
use crate::inbound::http::validation::{normalise_filter, parse_coordinate, parse_radius};
use crate::inbound::ws::messages::{ClientMessage, ServerMessage};

#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    nearby: Arc<dyn NearbyParkingQuery>,
    session: Session,
    stream: MessageStream,
) {
    WsSession::new(nearby).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

/// Result of one spawned lookup.
struct Completed {
    ticket: RefreshTicket,
    trace_id: TraceId,
    result: Result<NearbyParking, Error>,
}

enum Lookup {
    Nearby(NearbyParkingRequest),
    Search(ParkingSearchRequest),
}

type InFlight = JoinSet<Completed>;

struct WsSession {
    nearby: Arc<dyn NearbyParkingQuery>,
    filter: LocationUpdateFilter,
    tracker: RefreshTracker<NearbyParking, Error>,
}

impl WsSession {
    fn new(nearby: Arc<dyn NearbyParkingQuery>) -> Self {
        Self {
            nearby,
            filter: LocationUpdateFilter::default(),
            tracker: RefreshTracker::default(),
        }
    }

    async fn run(&mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);
        let mut in_flight = InFlight::new();

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, &mut in_flight, message)
                        .await
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    self.handle_completed(&mut session, joined).await
                }
            };

            if let Err(error) = result {
                in_flight.abort_all();
                log_shutdown_reason(&error);
                close_session_if_needed(session, close_action_for(&error)).await;
                return;
            }
        }
    }

    async fn handle_stream_message(
        &mut self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        in_flight: &mut InFlight,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => {
                self.handle_message(session, last_heartbeat, in_flight, message)
                    .await
            }
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &mut self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        in_flight: &mut InFlight,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session.pong(&payload).await.map_err(SessionError::Network)
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, in_flight, text.as_ref())
                    .await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(
        &mut self,
        session: &mut Session,
        in_flight: &mut InFlight,
        text: &str,
    ) -> Result<(), SessionError> {
        let message = match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => message,
            Err(error) => {
                warn!(error = %error, "Rejected malformed WebSocket payload");
                return Err(SessionError::InvalidPayload);
            }
        };
        let trace_id = message.trace_id();

        let lookup = match self.lookup_for(message) {
            Ok(Some(lookup)) => lookup,
            Ok(None) => return Ok(()),
            Err(error) => {
                let reply = ServerMessage::refresh_failed(trace_id, None, &error);
                return send_json(session, &reply).await.map_err(SessionError::Network);
            }
        };

        let ticket = self.tracker.begin();
        let nearby = Arc::clone(&self.nearby);
        in_flight.spawn(TraceId::scope(trace_id, async move {
            let result = match &lookup {
                Lookup::Nearby(request) => nearby.nearby(request).await,
                Lookup::Search(request) => nearby.search(request).await,
            };
            Completed {
                ticket,
                trace_id,
                result,
            }
        }));
        Ok(())
    }

    /// Validate a client request; `Ok(None)` when it repeats the last location lookup.
    fn lookup_for(&mut self, message: ClientMessage) -> Result<Option<Lookup>, Error> {
        match message {
            ClientMessage::LocationUpdate {
                latitude,
                longitude,
                radius_meters,
                name_filter,
                ..
            } => {
                let request = NearbyParkingRequest {
                    origin: parse_coordinate(latitude, longitude)?,
                    radius: parse_radius(radius_meters)?,
                    name_filter: normalise_filter(name_filter),
                };
                if !self.filter.accept(&request) {
                    debug!("ignoring location update below movement threshold");
                    return Ok(None);
                }
                Ok(Some(Lookup::Nearby(request)))
            }
            ClientMessage::Search {
                query,
                radius_meters,
                name_filter,
                ..
            } => {
                let request = ParkingSearchRequest {
                    query,
                    radius: parse_radius(radius_meters)?,
                    name_filter: normalise_filter(name_filter),
                };
                self.filter.reset();
                Ok(Some(Lookup::Search(request)))
            }
        }
    }

    async fn handle_completed(
        &mut self,
        session: &mut Session,
        joined: Result<Completed, JoinError>,
    ) -> Result<(), SessionError> {
        let Completed {
            ticket,
            trace_id,
            result,
        } = match joined {
            Ok(completed) => completed,
            Err(error) => {
                warn!(error = %error, "parking lookup task did not complete");
                return Ok(());
            }
        };
        let generation = ticket.generation();

        let reply = match self.tracker.complete(ticket, result) {
            RefreshOutcome::Applied => match self.tracker.current() {
                Some(current) => ServerMessage::ParkingUpdated {
                    trace_id: *trace_id.as_uuid(),
                    generation,
                    parking: NearbyParkingBody::from(current),
                },
                None => return Ok(()),
            },
            RefreshOutcome::Stale => {
                debug!(generation, %trace_id, "discarding stale parking refresh");
                return Ok(());
            }
            RefreshOutcome::Failed(error) => {
                self.filter.reset();
                ServerMessage::refresh_failed(trace_id, Some(generation), &error)
            }
        };
        send_json(session, &reply)
            .await
            .map_err(SessionError::Network)
    }
}

async fn handle_heartbeat_tick(
    session: &mut Session,
    last_heartbeat: &Instant,
) -> Result<(), SessionError> {
    if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
        return Err(SessionError::HeartbeatTimeout);
    }

    session.ping(b"").await.map_err(SessionError::Network)
}

async fn send_json(session: &mut Session, payload: &ServerMessage) -> Result<(), Closed> {
    match serde_json::to_string(payload) {
        Ok(body) => session.text(body).await,
        Err(error) => {
            warn!(error = %error, "Failed to serialize WebSocket payload");
            Ok(())
        }
    }
}

fn log_shutdown_reason(error: &SessionError) {
    match error {
        SessionError::HeartbeatTimeout => {
            warn!("WebSocket heartbeat timeout; closing connection");
        }
        SessionError::Protocol(error) => {
            warn!(error = %error, "WebSocket protocol error");
        }
        SessionError::Network(error) => {
            warn!(error = %error, "WebSocket send failed; closing connection");
        }
        SessionError::InvalidPayload | SessionError::ClientClosed(_) | SessionError::StreamClosed => {}
    }
}

fn close_action_for(error: &SessionError) -> CloseAction {
    match error {
        SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionError::InvalidPayload => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Policy,
            description: Some("invalid payload".to_owned()),
        })),
        SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
        SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
    }
}

async fn close_session_if_needed(session: Session, close_action: CloseAction) {
    if let CloseAction::Close(reason) = close_action {
        if let Err(error) = session.close(reason).await {
            warn!(error = %error, "Failed to close WebSocket session");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
