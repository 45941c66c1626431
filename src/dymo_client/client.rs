use log::debug;
use reqwest::blocking::{Client, Response};
use snafu::ResultExt;
use url::Url;

use crate::config::models::Dymo;

use super::error::{BuildClientSnafu, InvalidUriSnafu, PrintRejectedSnafu, RequestSnafu, ServiceError, StatusSnafu};
use super::models::{parse_printers, parse_service_bool, unwrap_service_text, LabelDocument, PrinterInfo};

/// The capabilities of a locally installed label printing service.
pub trait LabelPrintService {
    /// Whether the service is installed and answering.
    fn is_present(&self) -> bool;

    fn printers(&self) -> Result<Vec<PrinterInfo>, ServiceError>;

    fn load_label(&self, label_xml: &str) -> Result<LabelDocument, ServiceError> {
        LabelDocument::parse(label_xml)
    }

    fn print_label(&self, label: &LabelDocument, printer_name: &str) -> Result<(), ServiceError>;
}

impl<T: LabelPrintService + ?Sized> LabelPrintService for &T {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }

    fn printers(&self) -> Result<Vec<PrinterInfo>, ServiceError> {
        (**self).printers()
    }

    fn load_label(&self, label_xml: &str) -> Result<LabelDocument, ServiceError> {
        (**self).load_label(label_xml)
    }

    fn print_label(&self, label: &LabelDocument, printer_name: &str) -> Result<(), ServiceError> {
        (**self).print_label(label, printer_name)
    }
}

/// Base URL of the DYMO Connect web service. Always ends with `/` so endpoints can be joined.
pub fn build_service_url(dymo_settings: &Dymo) -> Result<Url, ServiceError> {
    let mut url = Url::parse(&dymo_settings.uri).context(InvalidUriSnafu { uri: dymo_settings.uri.as_str() })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Client for the DYMO Connect web service (`/DYMO/DLS/Printing/...`).
pub struct DymoClient {
    base: Url,
    http: Client,
}

impl DymoClient {
    pub fn new(dymo_settings: &Dymo) -> Result<Self, ServiceError> {
        let base = build_service_url(dymo_settings)?;
        let http = Client::builder()
            .danger_accept_invalid_certs(dymo_settings.ignore_tls_errors)
            .timeout(dymo_settings.timeout)
            .build()
            .context(BuildClientSnafu)?;

        debug!(
            "DYMO service at {} (timeout {})",
            base,
            humantime::format_duration(dymo_settings.timeout)
        );
        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, name: &str) -> Result<Url, ServiceError> {
        self.base.join(name).context(InvalidUriSnafu { uri: name })
    }

    fn get_text(&self, name: &str) -> Result<String, ServiceError> {
        let url = self.endpoint(name)?;
        debug!("GET {}", url);
        let resp = self.http.get(url).send().context(RequestSnafu { endpoint: name })?;
        read_body(name, resp)
    }
}

fn read_body(endpoint: &str, resp: Response) -> Result<String, ServiceError> {
    let status = resp.status();
    let body = resp.text().context(RequestSnafu { endpoint })?;
    if !status.is_success() {
        return StatusSnafu { endpoint, status: status.as_u16(), body: body.trim() }.fail();
    }
    Ok(body)
}

impl LabelPrintService for DymoClient {
    fn is_present(&self) -> bool {
        match self.get_text("StatusConnected") {
            Ok(body) => parse_service_bool(&body),
            Err(e) => {
                debug!("DYMO service not available: {}", e);
                false
            }
        }
    }

    fn printers(&self) -> Result<Vec<PrinterInfo>, ServiceError> {
        let body = self.get_text("GetPrinters")?;
        let printers = parse_printers(&unwrap_service_text(&body))?;
        debug!("DYMO service reports {} printer(s)", printers.len());
        Ok(printers)
    }

    fn print_label(&self, label: &LabelDocument, printer_name: &str) -> Result<(), ServiceError> {
        let url = self.endpoint("PrintLabel")?;
        debug!("POST {} (printer '{}')", url, printer_name);

        let form = [
            ("printerName", printer_name),
            ("printParamsXml", ""),
            ("labelXml", label.xml()),
            ("labelSetXml", ""),
        ];
        let resp = self.http.post(url).form(&form).send().context(RequestSnafu { endpoint: "PrintLabel" })?;
        let body = read_body("PrintLabel", resp)?;

        if !parse_service_bool(&body) {
            return PrintRejectedSnafu { printer: printer_name }.fail();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn settings(uri: &str) -> Dymo {
        Dymo { uri: uri.to_string(), ignore_tls_errors: true, timeout: Duration::from_secs(1) }
    }

    #[test]
    fn service_url_gets_trailing_slash() {
        let url = build_service_url(&settings("https://127.0.0.1:41951/DYMO/DLS/Printing")).unwrap();
        assert_eq!(url.as_str(), "https://127.0.0.1:41951/DYMO/DLS/Printing/");
        assert_eq!(url.join("GetPrinters").unwrap().path(), "/DYMO/DLS/Printing/GetPrinters");
    }

    #[test]
    fn invalid_uri_is_configuration_error() {
        let err = build_service_url(&settings("not a url")).unwrap_err();
        assert_eq!(err.kind(), crate::dymo_client::ServiceErrorKind::Configuration);
    }

    #[test]
    fn unreachable_service_is_not_present() {
        // Port 9 (discard) is not expected to run an HTTP server.
        let client = DymoClient::new(&settings("http://127.0.0.1:9/DYMO/DLS/Printing/")).unwrap();
        assert!(!client.is_present());
        let err = client.printers().unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::dymo_client::ServiceErrorKind::Connection | crate::dymo_client::ServiceErrorKind::Timeout
        ));
    }
}
