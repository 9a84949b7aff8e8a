//! Hosted Supabase destination, written through its PostgREST interface.

pub mod client;
pub mod credentials;
pub mod error;

pub use client::SupabaseClient;
pub use credentials::{KEY_VAR, SupabaseConfig, URL_VAR};
pub use error::SupabaseError;
