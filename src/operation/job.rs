//!
//! Job-scoped IPP operations: Print-Job, Validate-Job, Get-Job-Attributes.
//!
use bytes::Bytes;
use http::Uri;

use crate::attribute::IppAttribute;
use crate::model::{DelimiterTag, Operation};
use crate::operation::IppOperation;
use crate::request::IppRequestResponse;
use crate::value::IppValue;

fn operation_attributes(
    req: &mut IppRequestResponse,
    printer_uri: &Uri,
    requesting_user_name: &str,
) {
    req.attributes_mut().add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new(IppAttribute::ATTRIBUTES_CHARSET, IppValue::Charset("utf-8".try_into().unwrap())),
    );
    req.attributes_mut().add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new(
            IppAttribute::ATTRIBUTES_NATURAL_LANGUAGE,
            IppValue::NaturalLanguage("en".try_into().unwrap()),
        ),
    );
    req.attributes_mut().add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new(IppAttribute::PRINTER_URI, IppValue::Uri(printer_uri.to_string().try_into().unwrap())),
    );
    req.attributes_mut().add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new(
            IppAttribute::REQUESTING_USER_NAME,
            IppValue::NameWithoutLanguage(requesting_user_name.try_into().unwrap()),
        ),
    );
}

/// Print-Job (RFC 8011 §4.2.1): submits a document for printing in a
/// single request.
pub struct PrintJob {
    printer_uri: Uri,
    requesting_user_name: String,
    job_name: Option<String>,
    document_format: Option<String>,
    document: Bytes,
}

impl PrintJob {
    pub fn new(printer_uri: Uri, requesting_user_name: impl Into<String>, document: impl Into<Bytes>) -> Self {
        PrintJob {
            printer_uri,
            requesting_user_name: requesting_user_name.into(),
            job_name: None,
            document_format: None,
            document: document.into(),
        }
    }

    pub fn with_job_name(mut self, name: impl Into<String>) -> Self {
        self.job_name = Some(name.into());
        self
    }

    pub fn with_document_format(mut self, format: impl Into<String>) -> Self {
        self.document_format = Some(format.into());
        self
    }
}

impl IppOperation for PrintJob {
    fn operation(&self) -> Operation {
        Operation::PrintJob
    }

    fn into_ipp_request(self, request_id: i32) -> IppRequestResponse {
        let mut req = IppRequestResponse::new_request(self.version(), self.operation(), request_id);
        operation_attributes(&mut req, &self.printer_uri, &self.requesting_user_name);

        if let Some(format) = &self.document_format {
            req.attributes_mut().add(
                DelimiterTag::OperationAttributes,
                IppAttribute::new(IppAttribute::DOCUMENT_FORMAT, IppValue::MimeMediaType(format.as_str().try_into().unwrap())),
            );
        }
        if let Some(name) = &self.job_name {
            req.attributes_mut().add(
                DelimiterTag::JobAttributes,
                IppAttribute::new(IppAttribute::JOB_NAME, IppValue::NameWithoutLanguage(name.as_str().try_into().unwrap())),
            );
        }

        req.set_data(self.document);
        req
    }
}

/// Validate-Job (RFC 8011 §4.2.3): checks whether the printer would
/// accept a Print-Job with the given attributes, without submitting
/// document data.
pub struct ValidateJob {
    printer_uri: Uri,
    requesting_user_name: String,
    document_format: Option<String>,
}

impl ValidateJob {
    pub fn new(printer_uri: Uri, requesting_user_name: impl Into<String>) -> Self {
        ValidateJob {
            printer_uri,
            requesting_user_name: requesting_user_name.into(),
            document_format: None,
        }
    }

    pub fn with_document_format(mut self, format: impl Into<String>) -> Self {
        self.document_format = Some(format.into());
        self
    }
}

impl IppOperation for ValidateJob {
    fn operation(&self) -> Operation {
        Operation::ValidateJob
    }

    fn into_ipp_request(self, request_id: i32) -> IppRequestResponse {
        let mut req = IppRequestResponse::new_request(self.version(), self.operation(), request_id);
        operation_attributes(&mut req, &self.printer_uri, &self.requesting_user_name);
        if let Some(format) = &self.document_format {
            req.attributes_mut().add(
                DelimiterTag::OperationAttributes,
                IppAttribute::new(IppAttribute::DOCUMENT_FORMAT, IppValue::MimeMediaType(format.as_str().try_into().unwrap())),
            );
        }
        req
    }
}

/// Get-Job-Attributes (RFC 8011 §4.3.4): queries the current state of a
/// previously submitted job.
pub struct GetJobAttributes {
    printer_uri: Uri,
    requesting_user_name: String,
    job_id: i32,
    requested_attributes: Vec<String>,
}

impl GetJobAttributes {
    pub fn new(printer_uri: Uri, requesting_user_name: impl Into<String>, job_id: i32) -> Self {
        GetJobAttributes {
            printer_uri,
            requesting_user_name: requesting_user_name.into(),
            job_id,
            requested_attributes: Vec::new(),
        }
    }

    pub fn with_requested_attributes(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.requested_attributes = names.into_iter().collect();
        self
    }
}

impl IppOperation for GetJobAttributes {
    fn operation(&self) -> Operation {
        Operation::GetJobAttributes
    }

    fn into_ipp_request(self, request_id: i32) -> IppRequestResponse {
        let mut req = IppRequestResponse::new_request(self.version(), self.operation(), request_id);
        operation_attributes(&mut req, &self.printer_uri, &self.requesting_user_name);
        req.attributes_mut().add(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(IppAttribute::JOB_ID, IppValue::Integer(self.job_id)),
        );
        if !self.requested_attributes.is_empty() {
            let values: Vec<IppValue> = self
                .requested_attributes
                .iter()
                .map(|n| IppValue::Keyword(n.as_str().try_into().unwrap()))
                .collect();
            req.attributes_mut().add(
                DelimiterTag::OperationAttributes,
                IppAttribute::new(IppAttribute::REQUESTED_ATTRIBUTES, IppValue::Array(values)),
            );
        }
        req
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DelimiterTag as Tag;

    #[test]
    fn print_job_carries_document_data() {
        let op = PrintJob::new("ipp://localhost/printers/q1".parse().unwrap(), "alice", Bytes::from_static(b"%PDF"))
            .with_document_format("application/pdf");
        let req = op.into_ipp_request(1);
        assert_eq!(req.data(), &Bytes::from_static(b"%PDF"));
        let group = req.attributes().groups_of(Tag::OperationAttributes).next().unwrap();
        assert!(group.get(IppAttribute::DOCUMENT_FORMAT).is_some());
    }

    #[test]
    fn get_job_attributes_sets_job_id() {
        let op = GetJobAttributes::new("ipp://localhost/printers/q1".parse().unwrap(), "alice", 42);
        let req = op.into_ipp_request(2);
        let group = req.attributes().groups_of(Tag::OperationAttributes).next().unwrap();
        assert_eq!(group.get(IppAttribute::JOB_ID).unwrap().value(), &IppValue::Integer(42));
    }
}
