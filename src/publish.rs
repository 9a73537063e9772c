//! System-layout registry boundary: per-record upload and state dump.
//!
//! Publishing iterates the final inventory and issues one write per
//! record, no transactional grouping. A conflict means the registry
//! already holds the record and is not a failure; any other non-success
//! status is collected per xname and reported after the phase completes.
//! Nothing is retried.

use std::fs;
use std::path::Path;

use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::error::CaptureResult;
use crate::model::{HardwareRecord, Inventory};
use crate::sources::http_client;

/// At most this much of the public key file is sent with the dump request.
const PUBLIC_KEY_MAX_BYTES: usize = 10 * 1024;

/// Outcome of uploading a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    /// The registry already holds this xname; non-fatal.
    AlreadyPresent,
    Failed { status: u16, body: String },
}

/// Per-record outcomes of a publish pass.
#[derive(Debug, Default)]
pub struct PublishReport {
    pub created: usize,
    pub already_present: usize,
    /// Failed uploads, keyed by xname, in upload order.
    pub failures: Vec<(String, PublishOutcome)>,
}

impl PublishReport {
    pub fn record(&mut self, xname: &str, outcome: PublishOutcome) {
        match outcome {
            PublishOutcome::Created => self.created += 1,
            PublishOutcome::AlreadyPresent => self.already_present += 1,
            failed => self.failures.push((xname.to_string(), failed)),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Map a registry response onto an upload outcome.
pub fn classify(status: StatusCode, body: String) -> PublishOutcome {
    if status.is_success() {
        PublishOutcome::Created
    } else if status == StatusCode::CONFLICT {
        PublishOutcome::AlreadyPresent
    } else {
        PublishOutcome::Failed {
            status: status.as_u16(),
            body,
        }
    }
}

/// Client for the system-layout registry.
pub struct RegistryClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl RegistryClient {
    pub fn new(base: impl Into<String>, token: impl Into<String>) -> CaptureResult<Self> {
        Ok(Self {
            http: http_client()?,
            base: base.into(),
            token: token.into(),
        })
    }

    async fn post_record(&self, record: &HardwareRecord) -> CaptureResult<PublishOutcome> {
        let url = format!("{}/hardware", self.base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(record)
            .send()
            .await?;

        let status = response.status();
        let body = if status.is_success() {
            String::new()
        } else {
            response.text().await.unwrap_or_default()
        };
        Ok(classify(status, body))
    }

    /// Upload every record. Failed uploads do not halt the remaining ones.
    pub async fn publish(&self, inventory: &Inventory) -> CaptureResult<PublishReport> {
        let mut report = PublishReport::default();
        for (xname, record) in inventory {
            let outcome = self.post_record(record).await?;
            match &outcome {
                PublishOutcome::Created => debug!(%xname, "record uploaded"),
                PublishOutcome::AlreadyPresent => info!(%xname, "already present in registry"),
                PublishOutcome::Failed { status, .. } => {
                    warn!(%xname, status, "record upload failed")
                }
            }
            report.record(xname, outcome);
        }
        info!(
            created = report.created,
            already_present = report.already_present,
            failed = report.failures.len(),
            "publish phase complete"
        );
        Ok(report)
    }

    /// Dump the registry state: POST the public key and persist the
    /// textual response to `out_file`.
    pub async fn dump_state(&self, public_key: &Path, out_file: &Path) -> CaptureResult<()> {
        let mut raw = fs::read(public_key)?;
        raw.truncate(PUBLIC_KEY_MAX_BYTES);
        let key = String::from_utf8_lossy(&raw).into_owned();

        let part = reqwest::multipart::Part::text(key).file_name("public_key");
        let form = reqwest::multipart::Form::new().part("public_key", part);

        let url = format!("{}/dumpstate", self.base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        fs::write(out_file, &body)?;
        info!(
            out_file = %out_file.display(),
            bytes = body.len(),
            "registry state dump written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_success() {
        assert_eq!(
            classify(StatusCode::OK, String::new()),
            PublishOutcome::Created
        );
        assert_eq!(
            classify(StatusCode::CREATED, String::new()),
            PublishOutcome::Created
        );
    }

    #[test]
    fn test_classify_conflict_is_not_a_failure() {
        let mut report = PublishReport::default();
        report.record("x9c0", classify(StatusCode::CONFLICT, "exists".to_string()));

        assert_eq!(report.already_present, 1);
        assert!(!report.has_failures());
    }

    #[test]
    fn test_classify_other_statuses_collected() {
        let mut report = PublishReport::default();
        report.record(
            "x9c0",
            classify(
                StatusCode::INTERNAL_SERVER_ERROR,
                "database gone".to_string(),
            ),
        );
        report.record("x9c1", classify(StatusCode::OK, String::new()));

        assert_eq!(report.created, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.failures[0],
            (
                "x9c0".to_string(),
                PublishOutcome::Failed {
                    status: 500,
                    body: "database gone".to_string(),
                }
            )
        );
    }
}
