pub mod client;
pub mod error;
pub mod models;

pub use client::{DymoClient, LabelPrintService};
pub use error::{ServiceError, ServiceErrorKind};
pub use models::{LabelDocument, PrinterInfo, LABEL_WRITER_KIND};
