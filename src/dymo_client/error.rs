use std::fmt::{Display, Formatter};

use serde::Serialize;
use snafu::Snafu;

/// Errors raised while talking to the label printing service.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ServiceError {
    #[snafu(display("Invalid DYMO service URI '{uri}': {source}"))]
    InvalidUri { uri: String, source: url::ParseError },

    #[snafu(display("Could not build HTTP client: {source}"))]
    BuildClient { source: reqwest::Error },

    #[snafu(display("Request to {endpoint} failed: {source}"))]
    Request { endpoint: String, source: reqwest::Error },

    #[snafu(display("{endpoint} returned HTTP {status}: {body}"))]
    Status { endpoint: String, status: u16, body: String },

    #[snafu(display("Printer '{printer}' rejected the label"))]
    PrintRejected { printer: String },

    #[snafu(display("Label XML is not well-formed: {source}"))]
    MalformedLabel { source: roxmltree::Error },

    #[snafu(display("Label XML root is <{root}>, expected <DieCutLabel>"))]
    UnexpectedRoot { root: String },

    #[snafu(display("Could not read printer list: {source}"))]
    InvalidPrinterList { source: roxmltree::Error },
}

/// What went wrong, for callers that branch instead of reading messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceErrorKind {
    Configuration,
    Connection,
    Timeout,
    Rejected,
    InvalidDocument,
    InvalidResponse,
}

impl ServiceError {
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            ServiceError::InvalidUri { .. } | ServiceError::BuildClient { .. } => ServiceErrorKind::Configuration,
            ServiceError::Request { source, .. } if source.is_timeout() => ServiceErrorKind::Timeout,
            ServiceError::Request { .. } => ServiceErrorKind::Connection,
            ServiceError::Status { .. } | ServiceError::PrintRejected { .. } => ServiceErrorKind::Rejected,
            ServiceError::MalformedLabel { .. } | ServiceError::UnexpectedRoot { .. } => ServiceErrorKind::InvalidDocument,
            ServiceError::InvalidPrinterList { .. } => ServiceErrorKind::InvalidResponse,
        }
    }
}

impl Display for ServiceErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServiceErrorKind::Configuration => "configuration",
            ServiceErrorKind::Connection => "connection",
            ServiceErrorKind::Timeout => "timeout",
            ServiceErrorKind::Rejected => "rejected",
            ServiceErrorKind::InvalidDocument => "invalid document",
            ServiceErrorKind::InvalidResponse => "invalid response",
        };
        f.write_str(name)
    }
}
