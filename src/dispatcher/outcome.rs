use serde::Serialize;

use crate::dymo_client::{PrinterInfo, ServiceError, ServiceErrorKind};

const SERVICE_HINT: &str = "Make sure DYMO Connect software is installed and running.";

/// Result of one print attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PrintOutcome {
    Success { printer_name: String },
    NoFrameworkLoaded,
    NoPrinterFound,
    PrintError { kind: ServiceErrorKind, message: String },
}

impl PrintOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PrintOutcome::Success { .. })
    }

    /// Whether later labels of the same batch would fail the same way.
    pub fn stops_batch(&self) -> bool {
        matches!(self, PrintOutcome::NoFrameworkLoaded | PrintOutcome::NoPrinterFound)
    }

    /// Text shown to the person at the check-in desk.
    pub fn user_message(&self, subject_name: &str) -> String {
        match self {
            PrintOutcome::Success { printer_name } => format!("Label for {} sent to {}", subject_name, printer_name),
            PrintOutcome::NoFrameworkLoaded => format!("DYMO Label Framework not loaded. {}", SERVICE_HINT),
            PrintOutcome::NoPrinterFound => "No DYMO printer detected. Please connect a DYMO LabelWriter printer.".to_string(),
            PrintOutcome::PrintError { message, .. } => format!("Error printing label: {}\n\n{}", message, SERVICE_HINT),
        }
    }
}

impl From<ServiceError> for PrintOutcome {
    fn from(err: ServiceError) -> Self {
        PrintOutcome::PrintError { kind: err.kind(), message: err.to_string() }
    }
}

/// Pre-flight view of the printing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrinterStatus {
    pub ready: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printers: Option<Vec<PrinterInfo>>,
}

impl PrinterStatus {
    pub fn not_ready(message: impl Into<String>) -> Self {
        PrinterStatus { ready: false, message: message.into(), printers: None }
    }

    pub fn ready(printers: Vec<PrinterInfo>) -> Self {
        PrinterStatus { ready: true, message: "DYMO printer ready".to_string(), printers: Some(printers) }
    }
}
