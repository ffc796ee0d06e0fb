// results.rs - Result lines
// Purpose: Turn a candidate's probe outcome and listing into the ordered
//          group of lines it contributes to the output stream

use colored::*;
use std::fmt;

use crate::config::ScanConfig;
use crate::lister::ListingError;
use crate::prober::ProbeOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultLine {
    Exists { url: String },
    Listable { bucket: String },
    Object { name: String },
    Error { message: String },
    Unknown { url: String, status: u16 },
}

impl fmt::Display for ResultLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultLine::Exists { url } => write!(f, "EXISTS: {}", url),
            ResultLine::Listable { bucket } => write!(f, "    LISTABLE: {}", bucket),
            ResultLine::Object { name } => write!(f, "        - {}", name),
            ResultLine::Error { message } => write!(f, "ERROR: {}", message),
            ResultLine::Unknown { url, status } => write!(f, "UNKNOWN RESPONSE for {}: {}", url, status),
        }
    }
}

impl ResultLine {
    /// Console rendering
    pub fn colored(&self) -> String {
        let text = self.to_string();
        match self {
            ResultLine::Exists { .. } => text.green().bold().to_string(),
            ResultLine::Listable { .. } => text.yellow().bold().to_string(),
            ResultLine::Object { .. } => text.white().to_string(),
            ResultLine::Error { .. } => text.red().to_string(),
            ResultLine::Unknown { .. } => text.dimmed().to_string(),
        }
    }
}

/// Everything learned about one candidate
#[derive(Debug, Clone)]
pub struct CandidateReport {
    pub bucket: String,
    pub outcome: ProbeOutcome,
    /// Present only when the outcome was `ExistsListable`
    pub listing: Option<Result<Vec<String>, ListingError>>,
}

impl CandidateReport {
    /// Lines for this candidate, in emission order. Empty for misses and,
    /// outside verbose mode, for unknown status codes.
    pub fn lines(&self, config: &ScanConfig) -> Vec<ResultLine> {
        let bucket = &self.bucket;
        let mut lines = Vec::new();

        match &self.outcome {
            ProbeOutcome::NotFound => {}
            ProbeOutcome::TransportError(error) => lines.push(ResultLine::Error {
                message: format!(
                    "Could not connect to {} - {}",
                    config
                        .metadata_url(bucket)
                        .map_or_else(|_| bucket.clone(), |url| url.to_string()),
                    error
                ),
            }),
            ProbeOutcome::Unknown(status) => {
                if config.verbose {
                    lines.push(ResultLine::Unknown {
                        url: config.public_url(bucket),
                        status: *status,
                    });
                }
            }
            ProbeOutcome::ExistsRestricted | ProbeOutcome::ExistsListable => {
                lines.push(ResultLine::Exists { url: config.public_url(bucket) });

                match &self.listing {
                    None => {}
                    Some(Ok(objects)) => {
                        lines.push(ResultLine::Listable { bucket: bucket.clone() });
                        lines.extend(objects.iter().map(|name| ResultLine::Object { name: name.clone() }));
                    }
                    Some(Err(ListingError::Decode(error))) => lines.push(ResultLine::Error {
                        message: format!("Could not parse object list for {} - {}", bucket, error),
                    }),
                    Some(Err(error)) => lines.push(ResultLine::Error {
                        message: format!("Could not list objects in {} - {}", bucket, error),
                    }),
                }
            }
        }

        lines
    }
}
