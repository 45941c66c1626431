use log::{error, info};

/// Receives user-facing notifications about print attempts. Fire and forget.
pub trait Reporter {
    fn report_success(&self, message: &str);
    fn report_failure(&self, message: &str);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report_success(&self, message: &str) {
        (**self).report_success(message)
    }

    fn report_failure(&self, message: &str) {
        (**self).report_failure(message)
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report_success(&self, message: &str) {
        (**self).report_success(message)
    }

    fn report_failure(&self, message: &str) {
        (**self).report_failure(message)
    }
}

impl<R: Reporter> Reporter for Vec<R> {
    fn report_success(&self, message: &str) {
        self.iter().for_each(|r| r.report_success(message));
    }

    fn report_failure(&self, message: &str) {
        self.iter().for_each(|r| r.report_failure(message));
    }
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report_success(&self, message: &str) {
        info!("{}", message);
    }

    fn report_failure(&self, message: &str) {
        error!("{}", message);
    }
}

/// Sends failures to Sentry. Successes are not interesting there.
#[derive(Debug, Default, Clone, Copy)]
pub struct SentryReporter;

impl Reporter for SentryReporter {
    fn report_success(&self, _message: &str) {}

    fn report_failure(&self, message: &str) {
        sentry::capture_message(message, sentry::Level::Error);
    }
}
