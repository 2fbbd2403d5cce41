//!
//! Printer-scoped IPP operations: Get-Printer-Attributes.
//!
use http::Uri;

use crate::attribute::IppAttribute;
use crate::model::{DelimiterTag, Operation};
use crate::operation::IppOperation;
use crate::request::IppRequestResponse;
use crate::value::IppValue;

/// Get-Printer-Attributes (RFC 8011 §4.2.5): queries a printer's
/// capabilities and current state.
pub struct GetPrinterAttributes {
    printer_uri: Uri,
    requesting_user_name: String,
    requested_attributes: Vec<String>,
}

impl GetPrinterAttributes {
    pub fn new(printer_uri: Uri, requesting_user_name: impl Into<String>) -> Self {
        GetPrinterAttributes {
            printer_uri,
            requesting_user_name: requesting_user_name.into(),
            requested_attributes: Vec::new(),
        }
    }

    pub fn with_requested_attributes(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.requested_attributes = names.into_iter().collect();
        self
    }
}

impl IppOperation for GetPrinterAttributes {
    fn operation(&self) -> Operation {
        Operation::GetPrinterAttributes
    }

    fn into_ipp_request(self, request_id: i32) -> IppRequestResponse {
        let mut req = IppRequestResponse::new_request(self.version(), self.operation(), request_id);
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
            IppAttribute::new(IppAttribute::PRINTER_URI, IppValue::Uri(self.printer_uri.to_string().try_into().unwrap())),
        );
        req.attributes_mut().add(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(
                IppAttribute::REQUESTING_USER_NAME,
                IppValue::NameWithoutLanguage(self.requesting_user_name.as_str().try_into().unwrap()),
            ),
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
    fn requested_attributes_become_a_keyword_array() {
        let op = GetPrinterAttributes::new("ipp://localhost/printers/q1".parse().unwrap(), "alice")
            .with_requested_attributes(["printer-state".to_string(), "printer-name".to_string()]);
        let req = op.into_ipp_request(3);
        let group = req.attributes().groups_of(Tag::OperationAttributes).next().unwrap();
        let attr = group.get(IppAttribute::REQUESTED_ATTRIBUTES).unwrap();
        assert!(matches!(attr.value(), IppValue::Array(v) if v.len() == 2));
    }
}
