//! Source normalizers: each turns one management subsystem's records into
//! the canonical inventory shape.
//!
//! `cabinet` and `bmc` read descriptor files; `switches` and `noderole`
//! query live services. Fetching and normalizing are kept separate so the
//! reconciliation logic is testable without a network. Normalization order
//! matters only for `noderole`, which consults the partially merged
//! inventory built from the other sources.

pub mod bmc;
pub mod cabinet;
pub mod noderole;
pub mod switches;

use std::time::Duration;

use crate::error::CaptureResult;

/// Shared HTTP client settings for the management-service mesh. The mesh
/// gateway presents a self-signed certificate, so verification is off,
/// matching the transports used by the surrounding tooling.
pub(crate) fn http_client() -> CaptureResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .danger_accept_invalid_certs(true)
        .build()?;
    Ok(client)
}
