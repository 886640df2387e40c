//! Inbound adapters translating external requests into domain port calls.
//!
//! REST handlers live under [`http`]; live parking updates over WebSocket
//! live under [`ws`]. Both keep framework details at the edge.

pub mod http;
pub mod ws;
