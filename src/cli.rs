use std::path::PathBuf;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use label2dymo::label::{LabelRequest, LabelSizeId, ValidationError};

// ///////////// //
// CLI interface //
// ///////////// //

/// label2dymo - Renders check-in labels and prints them through the local DYMO Connect service.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prints one check-in label.
    Print(LabelArgs),
    /// Prints every label of a check-in response (JSON file, `-` for stdin).
    Batch {
        file: PathBuf,
    },
    /// Writes the label document instead of printing it.
    Render {
        #[command(flatten)]
        label: LabelArgs,
        /// Output file, stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Checks whether the DYMO service and a printer are available.
    Status {
        /// Keep checking with backoff until a printer is ready.
        #[arg(long)]
        wait: bool,
        /// How many times to check before giving up (with --wait).
        #[arg(long, default_value_t = 5)]
        attempts: usize,
        /// Print the status as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Lists the supported label sizes.
    Layouts,
}

#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Name on the label. Repeat for siblings sharing one label.
    #[arg(short, long = "name", required = true)]
    pub names: Vec<String>,
    #[arg(short, long)]
    pub event: String,
    /// Event date, today when omitted.
    #[arg(long)]
    pub date: Option<String>,
    /// Check-in time, now when omitted.
    #[arg(long)]
    pub time: Option<String>,
    #[arg(short, long)]
    pub code: String,
    /// DYMO stock number (e.g. 30336). Defaults to the configured size.
    #[arg(short, long)]
    pub size: Option<String>,
}

impl LabelArgs {
    pub fn to_request(&self, configured_size: &str) -> Result<LabelRequest, ValidationError> {
        let now = Local::now();
        let date = self.date.clone().unwrap_or_else(|| now.format("%Y-%m-%d").to_string());
        let time = self.time.clone().unwrap_or_else(|| now.format("%I:%M %p").to_string());
        let size = LabelSizeId::from_setting(self.size.as_deref().unwrap_or(configured_size));

        LabelRequest::combined(self.names.as_slice(), self.event.as_str(), date, time, self.code.as_str(), size)
    }
}
