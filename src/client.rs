//!
//! IPP client facade: a thin, transport-agnostic wrapper over the four
//! supported operations (spec §4.3 / §6). Transport is a caller-supplied
//! trait so this crate never owns a connection pool or an event loop; the
//! default implementation posts over HTTP with `ureq`, the same blocking
//! client the teacher crate's `client` feature is built on.
//!
use std::io::Cursor;
use std::sync::atomic::{AtomicI32, Ordering};

use bytes::Bytes;
use http::Uri;

use crate::attribute::IppAttribute;
use crate::error::ClientError;
use crate::model::StatusCode;
use crate::operation::job::{GetJobAttributes, PrintJob, ValidateJob};
use crate::operation::printer::GetPrinterAttributes;
use crate::operation::IppOperation;
use crate::parser::IppParser;
use crate::reader::IppReader;
use crate::request::IppRequestResponse;
use crate::value::IppValue;
use crate::FromPrimitive as _;

/// Delivers an encoded IPP message to a printer and returns its encoded
/// reply. Implementors own whatever connection machinery (HTTP client,
/// TLS config, retries) the caller needs; this crate only calls `send`.
pub trait Transport {
    fn send(&self, uri: &Uri, body: Bytes) -> Result<Bytes, ClientError>;
}

/// Default [`Transport`] built on a blocking `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        UreqTransport { agent: ureq::Agent::new_with_defaults() }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, uri: &Uri, body: Bytes) -> Result<Bytes, ClientError> {
        let mut response = self
            .agent
            .post(&uri.to_string())
            .header("content-type", "application/ipp")
            .send(&body[..])
            .map_err(|e| ClientError::TransportFailure(e.to_string()))?;

        let mut out = Vec::new();
        response
            .body_mut()
            .as_reader()
            .read_to_end(&mut out)
            .map_err(|e| ClientError::TransportFailure(e.to_string()))?;
        Ok(Bytes::from(out))
    }
}

/// A transport-agnostic IPP client bound to one printer URI.
///
/// Request ids are assigned from a monotonically increasing counter
/// seeded at construction time, per RFC 8011 §4.1.1's requirement that a
/// client not reuse a request id within a connection's lifetime.
pub struct IppClient<T: Transport = UreqTransport> {
    printer_uri: Uri,
    version: (u8, u8),
    requesting_user_name: String,
    next_request_id: AtomicI32,
    transport: T,
}

impl IppClient<UreqTransport> {
    pub fn new(printer_uri: Uri, requesting_user_name: impl Into<String>) -> Self {
        Self::with_transport(printer_uri, requesting_user_name, UreqTransport::new())
    }
}

impl<T: Transport> IppClient<T> {
    pub fn with_transport(printer_uri: Uri, requesting_user_name: impl Into<String>, transport: T) -> Self {
        IppClient {
            printer_uri,
            version: (2, 0),
            requesting_user_name: requesting_user_name.into(),
            next_request_id: AtomicI32::new(1),
            transport,
        }
    }

    pub fn with_request_id_seed(mut self, seed: i32) -> Self {
        self.next_request_id = AtomicI32::new(seed);
        self
    }

    fn allocate_request_id(&self) -> i32 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    fn execute(&self, request: IppRequestResponse) -> Result<IppRequestResponse, ClientError> {
        let body = request.to_bytes()?;
        let response_bytes = self.transport.send(&self.printer_uri, body)?;
        let response = IppParser::new(IppReader::new(Cursor::new(response_bytes.to_vec()))).parse()?;
        Ok(response)
    }

    pub fn get_printer_attributes(
        &self,
        requested_attributes: impl IntoIterator<Item = String>,
    ) -> Result<IppRequestResponse, ClientError> {
        let op = GetPrinterAttributes::new(self.printer_uri.clone(), self.requesting_user_name.clone())
            .with_requested_attributes(requested_attributes);
        self.execute(op.into_ipp_request(self.allocate_request_id()))
    }

    pub fn validate_job(&self, document_format: Option<String>) -> Result<IppRequestResponse, ClientError> {
        let mut op = ValidateJob::new(self.printer_uri.clone(), self.requesting_user_name.clone());
        if let Some(format) = document_format {
            op = op.with_document_format(format);
        }
        self.execute(op.into_ipp_request(self.allocate_request_id()))
    }

    pub fn print_job(
        &self,
        document: Bytes,
        job_name: Option<String>,
        document_format: Option<String>,
    ) -> Result<IppRequestResponse, ClientError> {
        let mut op = PrintJob::new(self.printer_uri.clone(), self.requesting_user_name.clone(), document);
        if let Some(name) = job_name {
            op = op.with_job_name(name);
        }
        if let Some(format) = document_format {
            op = op.with_document_format(format);
        }
        self.execute(op.into_ipp_request(self.allocate_request_id()))
    }

    pub fn get_job_attributes(&self, job_id: i32) -> Result<IppRequestResponse, ClientError> {
        let op = GetJobAttributes::new(self.printer_uri.clone(), self.requesting_user_name.clone(), job_id);
        self.execute(op.into_ipp_request(self.allocate_request_id()))
    }
}

/// Convenience accessors over a decoded response's attribute tree,
/// covering the fields a caller checks after almost every operation.
pub trait IppResponseExt {
    fn status(&self) -> Option<StatusCode>;
    fn status_message(&self) -> Option<String>;
    fn job_id(&self) -> Option<i32>;
    fn job_state_reasons(&self) -> Vec<String>;
}

impl IppResponseExt for IppRequestResponse {
    fn status(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.header())
    }

    fn status_message(&self) -> Option<String> {
        self.attributes()
            .groups()
            .iter()
            .find_map(|g| g.get(IppAttribute::STATUS_MESSAGE))
            .map(|a| a.value().to_string())
    }

    fn job_id(&self) -> Option<i32> {
        self.attributes().groups().iter().find_map(|g| match g.get(IppAttribute::JOB_ID).map(|a| a.value()) {
            Some(IppValue::Integer(id)) => Some(*id),
            _ => None,
        })
    }

    fn job_state_reasons(&self) -> Vec<String> {
        self.attributes()
            .groups()
            .iter()
            .find_map(|g| g.get(IppAttribute::JOB_STATE_REASONS).map(|a| a.value()))
            .map(|value| value.into_iter().map(|v| v.to_string()).collect())
            .unwrap_or_default()
    }
}
