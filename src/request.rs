//!
//! The IPP message envelope: version, operation-id/status-code,
//! request-id, attribute groups and optional trailing document data.
//!
use bytes::{BufMut, Bytes, BytesMut};

use crate::attribute::IppAttributes;
use crate::error::IppParseError;
use crate::model::{Operation, StatusCode};

/// A parsed or to-be-encoded IPP message.
///
/// The second header field means different things depending on
/// direction: in a request it is the operation id, in a response it is
/// the status code. Both are transmitted as the same two-byte field
/// (RFC 8010 §3.1.1), so this type stores the raw `u16` and exposes
/// typed accessors for each direction.
#[derive(Clone, Debug)]
pub struct IppRequestResponse {
    version: (u8, u8),
    header: u16,
    request_id: i32,
    attributes: IppAttributes,
    data: Bytes,
}

impl IppRequestResponse {
    /// Build a new request envelope.
    pub fn new_request(version: (u8, u8), operation: Operation, request_id: i32) -> Self {
        IppRequestResponse {
            version,
            header: operation as u16,
            request_id,
            attributes: IppAttributes::new(),
            data: Bytes::new(),
        }
    }

    /// Build a new response envelope.
    pub fn new_response(version: (u8, u8), status: StatusCode, request_id: i32) -> Self {
        IppRequestResponse {
            version,
            header: status as u16,
            request_id,
            attributes: IppAttributes::new(),
            data: Bytes::new(),
        }
    }

    /// Construct directly from decoded wire fields. Used by the parser,
    /// which does not know in advance whether it decoded a request or a
    /// response.
    pub fn from_parts(version: (u8, u8), header: u16, request_id: i32, attributes: IppAttributes, data: Bytes) -> Self {
        IppRequestResponse {
            version,
            header,
            request_id,
            attributes,
            data,
        }
    }

    pub fn version(&self) -> (u8, u8) {
        self.version
    }

    /// The raw header field: an operation id on a request, a status code
    /// on a response.
    pub fn header(&self) -> u16 {
        self.header
    }

    pub fn request_id(&self) -> i32 {
        self.request_id
    }

    pub fn attributes(&self) -> &IppAttributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut IppAttributes {
        &mut self.attributes
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn set_data(&mut self, data: impl Into<Bytes>) {
        self.data = data.into();
    }

    /// Encode the full message: version, header, request-id, attribute
    /// groups terminated by end-of-attributes, then trailing data.
    pub fn to_bytes(&self) -> Result<Bytes, IppParseError> {
        let mut buffer = BytesMut::new();
        buffer.put_u8(self.version.0);
        buffer.put_u8(self.version.1);
        buffer.put_u16(self.header);
        buffer.put_i32(self.request_id);
        buffer.put(self.attributes.to_bytes()?);
        buffer.put(self.data.clone());
        Ok(buffer.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DelimiterTag;
    use crate::value::IppValue;
    use crate::IppAttribute;

    #[test]
    fn request_round_trips_through_bytes() {
        let mut req = IppRequestResponse::new_request((2, 0), Operation::GetPrinterAttributes, 7);
        req.attributes_mut().add(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(IppAttribute::ATTRIBUTES_CHARSET, IppValue::Charset("utf-8".try_into().unwrap())),
        );
        let bytes = req.to_bytes().unwrap();
        assert_eq!(&bytes[0..2], &[2, 0]);
        assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]), Operation::GetPrinterAttributes as u16);
        assert_eq!(i32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 7);
    }
}
