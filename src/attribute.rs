//!
//! Attribute-related structs
//!
use bytes::{BufMut, Bytes, BytesMut};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::IppParseError;
use crate::{model::DelimiterTag, value::IppValue};

fn is_header_attr(attr: &str) -> bool {
    IppAttribute::HEADER_ATTRS.contains(&attr)
}

/// `IppAttribute` represents a single IPP attribute: a name paired with
/// one value. An attribute whose RFC 8011 type is `1setOf` is represented
/// with an [`IppValue::Array`] value rather than as several attributes of
/// the same name, matching how the wire format itself groups repeated
/// values under one name/tag pair.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct IppAttribute {
    /// Attribute name
    name: String,
    /// Attribute value
    value: IppValue,
}

impl IppAttribute {
    // Required by RFC 8011 section 4.1.4: the first two attributes of
    // every request/response's operation-attributes group.
    pub const ATTRIBUTES_CHARSET: &'static str = "attributes-charset";
    pub const ATTRIBUTES_NATURAL_LANGUAGE: &'static str = "attributes-natural-language";
    pub const CHARSET_CONFIGURED: &'static str = "charset-configured";
    pub const CHARSET_SUPPORTED: &'static str = "charset-supported";
    pub const COMPRESSION: &'static str = "compression";
    pub const COMPRESSION_SUPPORTED: &'static str = "compression-supported";
    pub const COPIES: &'static str = "copies";
    pub const COPIES_DEFAULT: &'static str = "copies-default";
    pub const COPIES_SUPPORTED: &'static str = "copies-supported";
    pub const DOCUMENT_FORMAT: &'static str = "document-format";
    pub const DOCUMENT_FORMAT_DEFAULT: &'static str = "document-format-default";
    pub const DOCUMENT_FORMAT_SUPPORTED: &'static str = "document-format-supported";
    pub const DOCUMENT_NAME: &'static str = "document-name";
    pub const GENERATED_NATURAL_LANGUAGE_SUPPORTED: &'static str = "generated-natural-language-supported";
    pub const IPP_ATTRIBUTE_FIDELITY: &'static str = "ipp-attribute-fidelity";
    pub const IPP_VERSIONS_SUPPORTED: &'static str = "ipp-versions-supported";
    pub const JOB_ID: &'static str = "job-id";
    pub const JOB_NAME: &'static str = "job-name";
    pub const JOB_STATE: &'static str = "job-state";
    pub const JOB_STATE_REASONS: &'static str = "job-state-reasons";
    pub const JOB_STATE_MESSAGE: &'static str = "job-state-message";
    pub const JOB_URI: &'static str = "job-uri";
    pub const LAST_DOCUMENT: &'static str = "last-document";
    // media-col family: nested collection attributes (spec scenario S5).
    pub const MEDIA_COL: &'static str = "media-col";
    pub const MEDIA_COL_DEFAULT: &'static str = "media-col-default";
    pub const MEDIA_COL_READY: &'static str = "media-col-ready";
    pub const MEDIA_DEFAULT: &'static str = "media-default";
    pub const MEDIA_SIZE: &'static str = "media-size";
    pub const MEDIA_SOURCE: &'static str = "media-source";
    pub const MEDIA_SUPPORTED: &'static str = "media-supported";
    pub const MEDIA_TYPE: &'static str = "media-type";
    pub const NATURAL_LANGUAGE_CONFIGURED: &'static str = "natural-language-configured";
    pub const OPERATIONS_SUPPORTED: &'static str = "operations-supported";
    pub const ORIENTATION_REQUESTED: &'static str = "orientation-requested";
    pub const PRINTER_INFO: &'static str = "printer-info";
    pub const PRINTER_IS_ACCEPTING_JOBS: &'static str = "printer-is-accepting-jobs";
    pub const PRINTER_LOCATION: &'static str = "printer-location";
    pub const PRINTER_MAKE_AND_MODEL: &'static str = "printer-make-and-model";
    pub const PRINTER_NAME: &'static str = "printer-name";
    pub const PRINTER_STATE: &'static str = "printer-state";
    pub const PRINTER_STATE_MESSAGE: &'static str = "printer-state-message";
    pub const PRINTER_STATE_REASONS: &'static str = "printer-state-reasons";
    pub const PRINTER_UP_TIME: &'static str = "printer-up-time";
    pub const PRINTER_URI: &'static str = "printer-uri";
    pub const PRINTER_URI_SUPPORTED: &'static str = "printer-uri-supported";
    pub const PRINT_COLOR_MODE: &'static str = "print-color-mode";
    pub const PRINT_COLOR_MODE_SUPPORTED: &'static str = "print-color-mode-supported";
    pub const PRINT_QUALITY: &'static str = "print-quality";
    pub const PRINT_QUALITY_DEFAULT: &'static str = "print-quality-default";
    pub const PRINT_QUALITY_SUPPORTED: &'static str = "print-quality-supported";
    pub const QUEUED_JOB_COUNT: &'static str = "queued-job-count";
    pub const REQUESTED_ATTRIBUTES: &'static str = "requested-attributes";
    pub const REQUESTING_USER_NAME: &'static str = "requesting-user-name";
    pub const SIDES: &'static str = "sides";
    pub const SIDES_DEFAULT: &'static str = "sides-default";
    pub const SIDES_SUPPORTED: &'static str = "sides-supported";
    pub const STATUS_MESSAGE: &'static str = "status-message";
    pub const URI_AUTHENTICATION_SUPPORTED: &'static str = "uri-authentication-supported";
    pub const URI_SECURITY_SUPPORTED: &'static str = "uri-security-supported";

    // Per RFC 8011 section 4.1.4 ("Character Set and Natural Language
    // Operation Attributes"), "attributes-charset" and
    // "attributes-natural-language" MUST be the first two attributes in
    // every IPP request and response. Per section 4.1.5, the sole
    // operation-target attribute MUST be the third.
    const HEADER_ATTRS: [&'static str; 3] = [
        IppAttribute::ATTRIBUTES_CHARSET,
        IppAttribute::ATTRIBUTES_NATURAL_LANGUAGE,
        IppAttribute::PRINTER_URI,
    ];

    /// Create new instance of the attribute
    ///
    /// * `name` - Attribute name<br/>
    /// * `value` - Attribute value<br/>
    pub fn new<S>(name: S, value: IppValue) -> IppAttribute
    where
        S: AsRef<str>,
    {
        IppAttribute {
            name: name.as_ref().to_owned(),
            value,
        }
    }

    /// Return attribute name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return attribute value
    pub fn value(&self) -> &IppValue {
        &self.value
    }

    /// Replace this attribute's value wholesale.
    pub fn set(&mut self, value: IppValue) {
        self.value = value;
    }

    /// Append an additional value to this attribute, converting a
    /// single-valued attribute into an [`IppValue::Array`] on first use.
    /// Mirrors RFC 8011's `1setOf` semantics, where repeated values share
    /// one name/tag pair on the wire.
    pub fn add_value(&mut self, value: IppValue) {
        match &mut self.value {
            IppValue::Array(values) => values.push(value),
            existing => {
                let first = std::mem::replace(existing, IppValue::NoValue);
                *existing = IppValue::Array(vec![first, value]);
            }
        }
    }

    /// Consume this attribute and return the value
    pub fn into_value(self) -> IppValue {
        self.value
    }

    /// Write attribute to byte array
    pub fn to_bytes(&self) -> Result<Bytes, IppParseError> {
        let mut buffer = BytesMut::new();

        let name_len: u16 = self
            .name
            .len()
            .try_into()
            .map_err(|_| IppParseError::NameTooLong { len: self.name.len() })?;

        buffer.put_u8(self.value.to_tag());
        buffer.put_u16(name_len);
        buffer.put_slice(self.name.as_bytes());
        buffer.put(self.value.to_bytes()?);
        Ok(buffer.freeze())
    }
}

/// Attribute group: an ordered list of attributes under one delimiter
/// tag. Attribute and group order is preserved on a parse/encode
/// round-trip (spec testable property 1), so this stores attributes in a
/// `Vec` rather than the hash map an unordered attribute bag would use.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct IppAttributeGroup {
    tag: DelimiterTag,
    attributes: Vec<IppAttribute>,
}

impl IppAttributeGroup {
    /// Create new attribute group of a given type
    pub fn new(tag: DelimiterTag) -> IppAttributeGroup {
        IppAttributeGroup {
            tag,
            attributes: Vec::new(),
        }
    }

    /// Return group type tag
    pub fn tag(&self) -> DelimiterTag {
        self.tag
    }

    /// Return attributes in wire order
    pub fn attributes(&self) -> &[IppAttribute] {
        &self.attributes
    }

    /// Return mutable attributes in wire order
    pub fn attributes_mut(&mut self) -> &mut Vec<IppAttribute> {
        &mut self.attributes
    }

    /// Consume this group and return its attributes in wire order
    pub fn into_attributes(self) -> Vec<IppAttribute> {
        self.attributes
    }

    /// Look up an attribute by name
    pub fn get(&self, name: &str) -> Option<&IppAttribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Replace all values of a named attribute, or append it if absent.
    pub fn set(&mut self, name: &str, value: IppValue) {
        match self.attributes.iter_mut().find(|a| a.name() == name) {
            Some(attr) => attr.set(value),
            None => self.attributes.push(IppAttribute::new(name, value)),
        }
    }

    /// Append an additional value to a named attribute, or create it if
    /// absent.
    pub fn add_value(&mut self, name: &str, value: IppValue) {
        match self.attributes.iter_mut().find(|a| a.name() == name) {
            Some(attr) => attr.add_value(value),
            None => self.attributes.push(IppAttribute::new(name, value)),
        }
    }
}

/// Attribute list
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct IppAttributes {
    groups: Vec<IppAttributeGroup>,
}

impl IppAttributes {
    /// Create attribute list
    pub fn new() -> IppAttributes {
        IppAttributes { ..Default::default() }
    }

    /// Get all groups, in wire order
    pub fn groups(&self) -> &[IppAttributeGroup] {
        &self.groups
    }

    /// Get all mutable groups
    pub fn groups_mut(&mut self) -> &mut Vec<IppAttributeGroup> {
        &mut self.groups
    }

    /// Consume this attribute list and return all attribute groups
    pub fn into_groups(self) -> Vec<IppAttributeGroup> {
        self.groups
    }

    /// Get a list of attribute groups matching a given delimiter tag, in
    /// the order they appeared on the wire.
    pub fn groups_of(&self, tag: DelimiterTag) -> impl Iterator<Item = &IppAttributeGroup> {
        self.groups.iter().filter(move |g| g.tag == tag)
    }

    /// Append a new attribute group, preserving its position in the
    /// overall group order.
    pub fn push_group(&mut self, group: IppAttributeGroup) {
        self.groups.push(group);
    }

    /// Add an attribute to the last group with the given tag, opening a
    /// new group (in append position) if none exists yet.
    pub fn add(&mut self, tag: DelimiterTag, attribute: IppAttribute) {
        if let Some(group) = self.groups_mut().iter_mut().rev().find(|g| g.tag() == tag) {
            group.attributes_mut().push(attribute);
        } else {
            let mut new_group = IppAttributeGroup::new(tag);
            new_group.attributes_mut().push(attribute);
            self.groups_mut().push(new_group);
        }
    }

    /// Write attribute list to byte array
    pub fn to_bytes(&self) -> Result<Bytes, IppParseError> {
        let mut buffer = BytesMut::new();

        // put the required attributes first as described in section 4.1.4 of RFC8011
        if let Some(group) = self.groups_of(DelimiterTag::OperationAttributes).next() {
            buffer.put_u8(DelimiterTag::OperationAttributes as u8);

            for hdr in &IppAttribute::HEADER_ATTRS {
                if let Some(attr) = group.get(hdr) {
                    buffer.put(attr.to_bytes()?);
                }
            }

            // now the other operation attributes, in their original order
            for attr in group.attributes().iter().filter(|a| !is_header_attr(a.name())) {
                buffer.put(attr.to_bytes()?);
            }
        }

        // now the rest, group and attribute order preserved
        for group in self
            .groups()
            .iter()
            .filter(|group| group.tag() != DelimiterTag::OperationAttributes)
        {
            buffer.put_u8(group.tag() as u8);

            for attr in group.attributes() {
                buffer.put(attr.to_bytes()?);
            }
        }
        buffer.put_u8(DelimiterTag::EndOfAttributes as u8);

        Ok(buffer.freeze())
    }
}
