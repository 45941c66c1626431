use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use backon::BlockingRetryable;
use backon::ExponentialBuilder;
use clap::Parser;
use log::{error, info, warn};

use cli::{Cli, Commands};
use label2dymo::config::loading::load_config;
use label2dymo::config::models::Settings;
use label2dymo::dispatcher::{LabelDispatcher, LogReporter, PrinterStatus, Reporter, SentryReporter};
use label2dymo::dymo_client::DymoClient;
use label2dymo::label::{render_markup, select_layout, CheckinLabels, LabelSizeId};
use label2dymo::mqtt_client::MqttReporter;

mod cli;

type Dispatcher = LabelDispatcher<DymoClient, Vec<Box<dyn Reporter>>>;

fn main() -> ExitCode {
    colog::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let settings = load_config().context("Could not load settings")?;
    let _sentry = init_sentry(&settings);

    match cli.command {
        Commands::Layouts => {
            print_layouts(&settings);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Render { label, output } => {
            let request = label.to_request(&settings.label.size)?;
            let markup = render_markup(&request, select_layout(request.label_size()));
            match output {
                Some(path) => fs::write(&path, markup).with_context(|| format!("Could not write {}", path.display()))?,
                None => print!("{}", markup),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Print(label) => {
            let request = label.to_request(&settings.label.size)?;
            let outcome = build_dispatcher(&settings)?.print_label(&request);
            Ok(exit_code(outcome.is_success()))
        }
        Commands::Batch { file } => {
            let labels: CheckinLabels = serde_json::from_str(&read_input(&file)?).context("Invalid check-in labels JSON")?;
            let requests = labels.into_requests()?;
            if requests.is_empty() {
                info!("No labels to print.");
                return Ok(ExitCode::SUCCESS);
            }

            let outcomes = build_dispatcher(&settings)?.print_batch(&requests);
            let printed = outcomes.iter().filter(|o| o.is_success()).count();
            info!("Printed {} of {} label(s).", printed, requests.len());
            Ok(exit_code(printed == requests.len()))
        }
        Commands::Status { wait, attempts, json } => {
            let dispatcher = build_dispatcher(&settings)?;
            let status = match wait {
                true => wait_for_printer(&dispatcher, attempts),
                false => dispatcher.check_status(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{}", status.message);
                for printer in status.printers.iter().flatten() {
                    println!("  {} ({})", printer.name, printer.kind);
                }
            }
            Ok(exit_code(status.ready))
        }
    }
}

fn build_dispatcher(settings: &Settings) -> Result<Dispatcher> {
    let client = DymoClient::new(&settings.dymo).context("Could not set up DYMO service client")?;

    let mut reporters: Vec<Box<dyn Reporter>> = vec![Box::new(LogReporter)];
    if sentry_dsn(settings).is_some() {
        reporters.push(Box::new(SentryReporter));
    }
    if settings.mqtt.enabled {
        reporters.push(Box::new(MqttReporter::new(&settings.mqtt)));
    }

    Ok(LabelDispatcher::new(client, reporters))
}

fn wait_for_printer(dispatcher: &Dispatcher, attempts: usize) -> PrinterStatus {
    poll_until_ready(|| dispatcher.check_status(), status_backoff(attempts))
}

/// Backoff for `status --wait`. `attempts` counts checks, the builder counts retries.
fn status_backoff(attempts: usize) -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_max_times(attempts.saturating_sub(1))
        .with_max_delay(Duration::from_secs(10))
}

fn poll_until_ready(mut check_status: impl FnMut() -> PrinterStatus, backoff: ExponentialBuilder) -> PrinterStatus {
    let check = || {
        let status = check_status();
        match status.ready {
            true => Ok(status),
            false => Err(status),
        }
    };

    check
        .retry(backoff)
        .notify(|status: &PrinterStatus, delay: Duration| {
            warn!("{}, checking again in {}", status.message, humantime::format_duration(delay));
        })
        .call()
        .unwrap_or_else(|status| status)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input).context("Could not read stdin")?;
        return Ok(input);
    }
    fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))
}

fn print_layouts(settings: &Settings) {
    let configured = LabelSizeId::from_setting(&settings.label.size);
    for id in LabelSizeId::ALL {
        let layout = select_layout(id);
        println!(
            "{} {:<6} {:<22} {:<20} {:<10} event name <= {} chars",
            if id == configured { "*" } else { " " },
            id.setting(),
            id.name(),
            layout.description,
            layout.orientation.as_str(),
            layout.event_name_max_chars,
        );
    }
}

fn sentry_dsn(settings: &Settings) -> Option<&str> {
    settings.sentry_dsn.as_deref().map(str::trim).filter(|dsn| !dsn.is_empty())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = match sentry_dsn(settings)?.parse::<sentry::types::Dsn>() {
        Ok(dsn) => dsn,
        Err(e) => {
            warn!("Ignoring invalid Sentry DSN: {}", e);
            return None;
        }
    };

    Some(sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        ..Default::default()
    }))
}

fn exit_code(success: bool) -> ExitCode {
    match success {
        true => ExitCode::SUCCESS,
        false => ExitCode::FAILURE,
    }
}
