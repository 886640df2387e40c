//! Supabase outbound adapters.
//!
//! `SupabaseAuthProvider` talks to GoTrue under `/auth/v1`; the REST
//! repository writes rows through PostgREST under `/rest/v1`. Both share one
//! [`SupabaseClient`] carrying the project URL and anon key.

mod auth_client;
mod client;
mod dto;
mod rest_client;

pub use auth_client::SupabaseAuthProvider;
pub use client::{SupabaseClient, SupabaseConfig};
pub use rest_client::SupabaseRestRepository;
