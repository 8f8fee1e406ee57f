//! HTTP routes.
//!
//! - `inquiries`: intake and dashboard endpoints, mounted under the
//!   configured API prefix
//! - `health`: liveness check at `/health`

pub mod health;
pub mod inquiries;
