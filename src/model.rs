//!
//! Wire-level tag tables: delimiter tags, value tags, operation ids and
//! status codes.
//!
//! Driving the decoder from a table (rather than a branch chain) documents
//! the full tag space and makes reserved ranges explicit, per the IPP
//! binary grammar in RFC 8010.
use enum_primitive_derive::Primitive;
use num_traits::{FromPrimitive, ToPrimitive};

/// Attribute-group delimiter tags. Occupy the `0x00..=0x0F` range; never
/// overlap with a [`ValueTag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Primitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DelimiterTag {
    Reserved = 0x00,
    OperationAttributes = 0x01,
    JobAttributes = 0x02,
    EndOfAttributes = 0x03,
    PrinterAttributes = 0x04,
    UnsupportedAttributes = 0x05,
}

/// Attribute value tags. Occupy the `0x10..=0xFF` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Primitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueTag {
    Unsupported = 0x10,
    // 0x11 is reserved for future "default" out-of-band use by RFC 8010.
    Unknown = 0x12,
    NoValue = 0x13,
    NotSettable = 0x15,
    DeleteAttribute = 0x16,
    AdminDefine = 0x17,
    Integer = 0x21,
    Boolean = 0x22,
    Enum = 0x23,
    OctetStringUnspecified = 0x30,
    DateTime = 0x31,
    Resolution = 0x32,
    RangeOfInteger = 0x33,
    BegCollection = 0x34,
    TextWithLanguage = 0x35,
    NameWithLanguage = 0x36,
    EndCollection = 0x37,
    TextWithoutLanguage = 0x41,
    NameWithoutLanguage = 0x42,
    Keyword = 0x44,
    Uri = 0x45,
    UriScheme = 0x46,
    Charset = 0x47,
    NaturalLanguage = 0x48,
    MimeMediaType = 0x49,
    MemberAttrName = 0x4A,
}

impl ValueTag {
    /// Category used to drive parsing decisions without a branch chain
    /// per value. Mirrors the taxonomy in spec §4.2 ("Numeric tag dispatch").
    pub fn category(self) -> ValueCategory {
        match self {
            ValueTag::Unsupported | ValueTag::Unknown | ValueTag::NoValue => ValueCategory::OutOfBand,
            ValueTag::NotSettable | ValueTag::DeleteAttribute | ValueTag::AdminDefine => ValueCategory::OutOfBand,
            ValueTag::Integer | ValueTag::Boolean | ValueTag::Enum => ValueCategory::IntegerFamily,
            ValueTag::RangeOfInteger | ValueTag::Resolution | ValueTag::DateTime => ValueCategory::IntegerFamily,
            ValueTag::BegCollection => ValueCategory::CollectionOpen,
            ValueTag::EndCollection => ValueCategory::CollectionClose,
            ValueTag::OctetStringUnspecified
            | ValueTag::TextWithLanguage
            | ValueTag::NameWithLanguage
            | ValueTag::TextWithoutLanguage
            | ValueTag::NameWithoutLanguage
            | ValueTag::Keyword
            | ValueTag::Uri
            | ValueTag::UriScheme
            | ValueTag::Charset
            | ValueTag::NaturalLanguage
            | ValueTag::MimeMediaType
            | ValueTag::MemberAttrName => ValueCategory::OctetFamily,
        }
    }
}

/// The category a [`ValueTag`] belongs to, per spec §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCategory {
    IntegerFamily,
    OctetFamily,
    CollectionOpen,
    CollectionClose,
    OutOfBand,
}

/// IPP operation ids used by the client facade (spec §4.3). Only the
/// minimum set required to validate a job, submit a job, query job status,
/// and query printer attributes — per spec §1 Non-goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Primitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    PrintJob = 0x0002,
    ValidateJob = 0x0004,
    GetJobAttributes = 0x0009,
    GetPrinterAttributes = 0x000B,
}

/// IPP status codes, per RFC 8011 §13. Not exhaustive; covers the codes a
/// client driving the four supported operations will observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Primitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusCode {
    SuccessfulOk = 0x0000,
    SuccessfulOkIgnoredOrSubstituted = 0x0001,
    SuccessfulOkConflicting = 0x0002,
    ClientErrorBadRequest = 0x0400,
    ClientErrorForbidden = 0x0401,
    ClientErrorNotAuthenticated = 0x0402,
    ClientErrorNotAuthorized = 0x0403,
    ClientErrorNotPossible = 0x0404,
    ClientErrorTimeout = 0x0405,
    ClientErrorNotFound = 0x0406,
    ClientErrorGone = 0x0407,
    ClientErrorRequestEntityTooLarge = 0x0408,
    ClientErrorRequestValueTooLong = 0x0409,
    ClientErrorDocumentFormatNotSupported = 0x040A,
    ClientErrorAttributesOrValuesNotSupported = 0x040B,
    ClientErrorUriSchemeNotSupported = 0x040C,
    ClientErrorCharsetNotSupported = 0x040D,
    ClientErrorConflictingAttributes = 0x040E,
    ServerErrorInternalError = 0x0500,
    ServerErrorOperationNotSupported = 0x0501,
    ServerErrorServiceUnavailable = 0x0502,
    ServerErrorVersionNotSupported = 0x0503,
    ServerErrorDeviceError = 0x0504,
    ServerErrorTemporaryError = 0x0505,
    ServerErrorNotAcceptingJobs = 0x0506,
    ServerErrorBusy = 0x0507,
    ServerErrorJobCanceled = 0x0508,
}

impl StatusCode {
    pub fn is_successful(self) -> bool {
        (self.to_i32().unwrap_or(0) & 0xFF00) == 0x0000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_and_value_tags_do_not_overlap() {
        // Delimiter tags occupy 0x00-0x0F, value tags occupy 0x10-0xFF (spec Invariants).
        for d in [
            DelimiterTag::Reserved,
            DelimiterTag::OperationAttributes,
            DelimiterTag::JobAttributes,
            DelimiterTag::EndOfAttributes,
            DelimiterTag::PrinterAttributes,
            DelimiterTag::UnsupportedAttributes,
        ] {
            assert!(d.to_u8().unwrap() <= 0x0F);
        }
        assert!(ValueTag::Integer.to_u8().unwrap() >= 0x10);
    }

    #[test]
    fn tag_round_trips() {
        assert_eq!(ValueTag::from_u8(0x21), Some(ValueTag::Integer));
        assert_eq!(Operation::from_i32(0x000B), Some(Operation::GetPrinterAttributes));
        assert_eq!(DelimiterTag::from_u8(0x02), Some(DelimiterTag::JobAttributes));
    }

    #[test]
    fn status_code_success_range() {
        assert!(StatusCode::SuccessfulOk.is_successful());
        assert!(!StatusCode::ClientErrorBadRequest.is_successful());
    }
}
