use serde::Deserialize;
use snafu::{ensure, OptionExt, Snafu};

use super::layout::LabelSizeId;

/// Content of one check-in label. Only obtainable through validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRequest {
    subject_name: String,
    event_name: String,
    event_date: String,
    checkin_time: String,
    checkout_code: String,
    label_size: LabelSizeId,
}

impl LabelRequest {
    pub fn new(
        subject_name: impl Into<String>,
        event_name: impl Into<String>,
        event_date: impl Into<String>,
        checkin_time: impl Into<String>,
        checkout_code: impl Into<String>,
        label_size: LabelSizeId,
    ) -> Result<Self, ValidationError> {
        let request = LabelRequest {
            subject_name: subject_name.into(),
            event_name: event_name.into(),
            event_date: event_date.into(),
            checkin_time: checkin_time.into(),
            checkout_code: checkout_code.into(),
            label_size,
        };

        validate_text("subject_name", &request.subject_name)?;
        validate_text("event_name", &request.event_name)?;
        validate_text("event_date", &request.event_date)?;
        validate_text("checkin_time", &request.checkin_time)?;
        validate_text("checkout_code", &request.checkout_code)?;

        Ok(request)
    }

    /// One label for several children checked in together, names joined by `, `.
    pub fn combined<S: AsRef<str>>(
        subject_names: &[S],
        event_name: impl Into<String>,
        event_date: impl Into<String>,
        checkin_time: impl Into<String>,
        checkout_code: impl Into<String>,
        label_size: LabelSizeId,
    ) -> Result<Self, ValidationError> {
        let names: Vec<&str> = subject_names.iter().map(|n| n.as_ref().trim()).filter(|n| !n.is_empty()).collect();
        LabelRequest::new(names.join(", "), event_name, event_date, checkin_time, checkout_code, label_size)
    }

    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn event_date(&self) -> &str {
        &self.event_date
    }

    pub fn checkin_time(&self) -> &str {
        &self.checkin_time
    }

    pub fn checkout_code(&self) -> &str {
        &self.checkout_code
    }

    pub fn label_size(&self) -> LabelSizeId {
        self.label_size
    }
}

fn validate_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    ensure!(!value.trim().is_empty(), MissingFieldSnafu { field });
    // XML 1.0 has no escape for these.
    ensure!(value.chars().all(is_xml_char), InvalidCharacterSnafu { field });
    Ok(())
}

/// The XML 1.0 `Char` production. Surrogates cannot occur in a `char`.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Label fields as sent by the check-in endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelFields {
    #[serde(alias = "kid_name")]
    pub subject_name: Option<String>,
    pub event_name: Option<String>,
    pub event_date: Option<String>,
    pub checkin_time: Option<String>,
    pub checkout_code: Option<String>,
}

impl LabelFields {
    pub fn into_request(self, label_size: LabelSizeId) -> Result<LabelRequest, ValidationError> {
        LabelRequest::new(
            self.subject_name.context(MissingFieldSnafu { field: "subject_name" })?,
            self.event_name.context(MissingFieldSnafu { field: "event_name" })?,
            self.event_date.context(MissingFieldSnafu { field: "event_date" })?,
            self.checkin_time.context(MissingFieldSnafu { field: "checkin_time" })?,
            self.checkout_code.context(MissingFieldSnafu { field: "checkout_code" })?,
            label_size,
        )
    }
}

/// The `labels` / `label_size` part of a check-in response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckinLabels {
    #[serde(default)]
    pub labels: Vec<LabelFields>,
    #[serde(default)]
    pub label_size: Option<LabelSizeId>,
}

impl CheckinLabels {
    pub fn into_requests(self) -> Result<Vec<LabelRequest>, ValidationError> {
        let size = self.label_size.unwrap_or_default();
        self.labels.into_iter().map(|fields| fields.into_request(size)).collect()
    }
}

// ////// //
// Errors //
// ////// //

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ValidationError {
    #[snafu(display("Label field '{field}' is missing or empty"))]
    MissingField { field: &'static str },

    #[snafu(display("Label field '{field}' contains a character that cannot appear in a label document"))]
    InvalidCharacter { field: &'static str },
}
