use std::io::Read;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use label2dymo::config::models::Dymo;
use label2dymo::dispatcher::{LabelDispatcher, LogReporter, PrintOutcome};
use label2dymo::dymo_client::{DymoClient, LabelPrintService, ServiceErrorKind};
use label2dymo::label::{render_markup, select_layout, LabelRequest, LabelSizeId};
use tiny_http::{Response, Server};

const PRINTERS_XML: &str = r#"<Printers>
  <TapePrinter>
    <Name>DYMO LabelManager PnP</Name>
    <ModelName>DYMO LabelManager PnP</ModelName>
    <IsConnected>True</IsConnected>
    <IsLocal>True</IsLocal>
  </TapePrinter>
  <LabelWriterPrinter>
    <Name>DYMO LabelWriter 450</Name>
    <ModelName>DYMO LabelWriter 450</ModelName>
    <IsConnected>True</IsConnected>
    <IsLocal>True</IsLocal>
    <IsTwinTurbo>False</IsTwinTurbo>
  </LabelWriterPrinter>
</Printers>"#;

#[derive(Debug, Clone)]
struct Received {
    method: String,
    url: String,
    body: String,
}

/// Serves the DYMO Connect endpoints from a background thread.
struct FakeDymo {
    uri: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl FakeDymo {
    fn start(printers_xml: &'static str, print_status: u16, print_body: &'static str) -> FakeDymo {
        let server = Server::http("127.0.0.1:0").unwrap();
        let uri = format!("http://{}/DYMO/DLS/Printing/", server.server_addr());
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = received.clone();

        std::thread::spawn(move || {
            for mut req in server.incoming_requests() {
                let mut body = String::new();
                let _ = req.as_reader().read_to_string(&mut body);
                let url = req.url().to_string();
                log.lock().unwrap().push(Received { method: req.method().to_string(), url: url.clone(), body });

                let response = match url.rsplit('/').next().unwrap_or_default() {
                    "StatusConnected" => Response::from_string("true"),
                    // DYMO Connect wraps XML in a JSON string.
                    "GetPrinters" => Response::from_string(serde_json::to_string(printers_xml).unwrap()),
                    "PrintLabel" => Response::from_string(print_body).with_status_code(print_status),
                    _ => Response::from_string("not found").with_status_code(404),
                };
                let _ = req.respond(response);
            }
        });

        FakeDymo { uri, received }
    }

    fn client(&self) -> DymoClient {
        DymoClient::new(&Dymo { uri: self.uri.clone(), ignore_tls_errors: false, timeout: Duration::from_secs(5) }).unwrap()
    }

    fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

fn ada() -> LabelRequest {
    LabelRequest::new("Ada", "Fall Festival", "2024-10-01", "09:00", "7492", LabelSizeId::default()).unwrap()
}

#[test]
fn reports_presence_and_printers() {
    let dymo = FakeDymo::start(PRINTERS_XML, 200, "true");
    let client = dymo.client();

    assert!(client.is_present());
    let printers = client.printers().unwrap();
    assert_eq!(printers.len(), 2);
    assert_eq!(printers[1].name, "DYMO LabelWriter 450");
    assert!(printers[1].is_label_writer());
}

#[test]
fn prints_through_the_service() {
    let dymo = FakeDymo::start(PRINTERS_XML, 200, "true");
    let dispatcher = LabelDispatcher::new(dymo.client(), LogReporter);

    let outcome = dispatcher.print_label(&ada());
    assert_eq!(outcome, PrintOutcome::Success { printer_name: "DYMO LabelWriter 450".to_string() });

    let received = dymo.received();
    let endpoints: Vec<&str> = received.iter().map(|r| r.url.rsplit('/').next().unwrap()).collect();
    assert_eq!(endpoints, ["StatusConnected", "GetPrinters", "PrintLabel"]);

    let print = &received[2];
    assert_eq!(print.method, "POST");
    let form: Vec<(String, String)> = url::form_urlencoded::parse(print.body.as_bytes()).into_owned().collect();
    let field = |name: &str| form.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone());
    assert_eq!(field("printerName").as_deref(), Some("DYMO LabelWriter 450"));
    assert_eq!(field("printParamsXml").as_deref(), Some(""));

    let label_xml = field("labelXml").unwrap();
    let doc = roxmltree::Document::parse(&label_xml).unwrap();
    assert!(doc.root_element().has_tag_name("DieCutLabel"));
    assert!(label_xml.contains("<String>7492</String>"));
}

#[test]
fn empty_printer_list_stops_before_printing() {
    let dymo = FakeDymo::start("<Printers />", 200, "true");
    let dispatcher = LabelDispatcher::new(dymo.client(), LogReporter);

    assert_eq!(dispatcher.print_label(&ada()), PrintOutcome::NoPrinterFound);
    let received = dymo.received();
    assert_eq!(received.iter().filter(|r| r.url.ends_with("GetPrinters")).count(), 1);
    assert!(received.iter().all(|r| !r.url.ends_with("PrintLabel")));

    let status = dispatcher.check_status();
    assert!(!status.ready);
    assert_eq!(status.message, "No DYMO printers detected");
}

#[test]
fn failed_print_keeps_service_message() {
    let dymo = FakeDymo::start(PRINTERS_XML, 500, "Printer is offline");
    let dispatcher = LabelDispatcher::new(dymo.client(), LogReporter);

    match dispatcher.print_label(&ada()) {
        PrintOutcome::PrintError { kind, message } => {
            assert_eq!(kind, ServiceErrorKind::Rejected);
            assert!(message.contains("HTTP 500"));
            assert!(message.contains("Printer is offline"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn refused_print_is_rejected() {
    let dymo = FakeDymo::start(PRINTERS_XML, 200, "false");
    let client = dymo.client();
    let label = client.load_label(&render_markup(&ada(), select_layout(LabelSizeId::default()))).unwrap();

    let err = client.print_label(&label, "DYMO LabelWriter 450").unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Rejected);
    assert!(err.to_string().contains("DYMO LabelWriter 450"));

    match LabelDispatcher::new(dymo.client(), LogReporter).print_label(&ada()) {
        PrintOutcome::PrintError { kind, .. } => assert_eq!(kind, ServiceErrorKind::Rejected),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn missing_service_is_reported_without_printing() {
    // Nothing listens on the discard port.
    let client = DymoClient::new(&Dymo {
        uri: "http://127.0.0.1:9/DYMO/DLS/Printing/".to_string(),
        ignore_tls_errors: true,
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let dispatcher = LabelDispatcher::new(client, LogReporter);

    assert_eq!(dispatcher.print_label(&ada()), PrintOutcome::NoFrameworkLoaded);
    assert_eq!(dispatcher.check_status().message, "DYMO framework not loaded");
}
