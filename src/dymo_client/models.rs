use log::warn;
use serde::Serialize;
use snafu::{ensure, ResultExt};

use super::error::{InvalidPrinterListSnafu, MalformedLabelSnafu, ServiceError, UnexpectedRootSnafu};

/// Printer element name the DYMO service uses for LabelWriter models.
pub const LABEL_WRITER_KIND: &str = "LabelWriterPrinter";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrinterInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub model_name: Option<String>,
    pub is_connected: bool,
    pub is_local: bool,
    pub is_twin_turbo: bool,
}

impl PrinterInfo {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        PrinterInfo {
            name: name.into(),
            kind: kind.into(),
            model_name: None,
            is_connected: true,
            is_local: true,
            is_twin_turbo: false,
        }
    }

    pub fn is_label_writer(&self) -> bool {
        self.kind == LABEL_WRITER_KIND
    }
}

/// A label the service accepted for printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDocument {
    xml: String,
}

impl LabelDocument {
    /// Checks that `xml` is a well-formed `DieCutLabel` document.
    pub fn parse(xml: &str) -> Result<Self, ServiceError> {
        let doc = roxmltree::Document::parse(xml).context(MalformedLabelSnafu)?;
        let root = doc.root_element();
        ensure!(root.has_tag_name("DieCutLabel"), UnexpectedRootSnafu { root: root.tag_name().name() });

        Ok(LabelDocument { xml: xml.to_string() })
    }

    pub fn xml(&self) -> &str {
        &self.xml
    }
}

/// DYMO Connect answers either with raw text or with a JSON encoded string.
pub fn unwrap_service_text(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.starts_with('"') {
        if let Ok(text) = serde_json::from_str::<String>(trimmed) {
            return text;
        }
    }
    trimmed.to_string()
}

pub fn parse_service_bool(body: &str) -> bool {
    unwrap_service_text(body).trim().eq_ignore_ascii_case("true")
}

/// Parses the `<Printers>` document returned by `GetPrinters`.
pub fn parse_printers(xml: &str) -> Result<Vec<PrinterInfo>, ServiceError> {
    if xml.trim().is_empty() {
        return Ok(Vec::new());
    }

    let doc = roxmltree::Document::parse(xml).context(InvalidPrinterListSnafu)?;
    let mut printers = Vec::new();

    for node in doc.root_element().children().filter(|n| n.is_element()) {
        let child_text = |tag: &str| {
            node.children()
                .find(|c| c.has_tag_name(tag))
                .and_then(|c| c.text())
                .map(|t| t.trim().to_string())
        };
        let flag = |tag: &str| child_text(tag).is_some_and(|v| v.eq_ignore_ascii_case("true"));

        let Some(name) = child_text("Name").filter(|n| !n.is_empty()) else {
            warn!("Skipping unnamed {} in printer list", node.tag_name().name());
            continue;
        };

        printers.push(PrinterInfo {
            name,
            kind: node.tag_name().name().to_string(),
            model_name: child_text("ModelName"),
            is_connected: flag("IsConnected"),
            is_local: flag("IsLocal"),
            is_twin_turbo: flag("IsTwinTurbo"),
        });
    }

    Ok(printers)
}
