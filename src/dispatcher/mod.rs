//! Renders check-in labels and hands them to the printing service.
//!
//! Every failure is converted into a [`PrintOutcome`] here; nothing past this
//! point returns an error to the caller.

use log::{debug, info, warn};

use crate::dymo_client::{LabelPrintService, PrinterInfo};
use crate::label::{render_markup, select_layout, LabelRequest};

pub mod outcome;
pub mod reporting;

pub use outcome::{PrintOutcome, PrinterStatus};
pub use reporting::{LogReporter, Reporter, SentryReporter};

/// Picks the first LabelWriter, or the first printer of any kind when there is none.
pub fn select_printer(printers: &[PrinterInfo]) -> Option<&PrinterInfo> {
    printers.iter().find(|p| p.is_label_writer()).or_else(|| printers.first())
}

pub struct LabelDispatcher<S, R> {
    service: S,
    reporter: R,
}

impl<S: LabelPrintService, R: Reporter> LabelDispatcher<S, R> {
    pub fn new(service: S, reporter: R) -> Self {
        Self { service, reporter }
    }

    pub fn print_label(&self, request: &LabelRequest) -> PrintOutcome {
        let outcome = self.try_print(request);
        let message = outcome.user_message(request.subject_name());
        if outcome.is_success() {
            self.reporter.report_success(&message);
        } else {
            self.reporter.report_failure(&message);
        }
        outcome
    }

    /// Prints labels in order. Stops early once the service or printer is known to be missing.
    pub fn print_batch(&self, requests: &[LabelRequest]) -> Vec<PrintOutcome> {
        let mut outcomes = Vec::with_capacity(requests.len());
        for request in requests {
            let outcome = self.print_label(request);
            let stop = outcome.stops_batch();
            outcomes.push(outcome);
            if stop {
                warn!("Skipping {} remaining label(s)", requests.len() - outcomes.len());
                break;
            }
        }
        outcomes
    }

    fn try_print(&self, request: &LabelRequest) -> PrintOutcome {
        if !self.service.is_present() {
            return PrintOutcome::NoFrameworkLoaded;
        }

        let layout = select_layout(request.label_size());
        let markup = render_markup(request, layout);
        debug!("Rendered {} label ({} bytes)", layout.size, markup.len());

        let printers = match self.service.printers() {
            Ok(printers) => printers,
            Err(e) => return e.into(),
        };
        let Some(printer) = select_printer(&printers) else {
            return PrintOutcome::NoPrinterFound;
        };
        if !printer.is_label_writer() {
            warn!("No LabelWriter found, using '{}' ({})", printer.name, printer.kind);
        }

        let result = self
            .service
            .load_label(&markup)
            .and_then(|label| self.service.print_label(&label, &printer.name));

        match result {
            Ok(()) => {
                info!("Printed {} label on '{}'", layout.size, printer.name);
                PrintOutcome::Success { printer_name: printer.name.clone() }
            }
            Err(e) => e.into(),
        }
    }

    /// Same checks as printing, without printing.
    pub fn check_status(&self) -> PrinterStatus {
        if !self.service.is_present() {
            return PrinterStatus::not_ready("DYMO framework not loaded");
        }

        match self.service.printers() {
            Ok(printers) if printers.is_empty() => PrinterStatus::not_ready("No DYMO printers detected"),
            Ok(printers) => PrinterStatus::ready(printers),
            Err(e) => PrinterStatus::not_ready(format!("DYMO error: {}", e)),
        }
    }
}
