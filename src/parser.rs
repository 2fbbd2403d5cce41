//!
//! IPP message decoder.
//!
//! Collections are parsed with an explicit stack of scope frames rather
//! than recursive descent, so the nesting depth can be capped without
//! risking native stack exhaustion on a hostile or corrupt message.
use std::io::Read;

use crate::attribute::{IppAttribute, IppAttributeGroup, IppAttributes};
use crate::error::IppParseError;
use crate::model::{DelimiterTag, ValueTag};
use crate::reader::IppReader;
use crate::request::IppRequestResponse;
use crate::value::IppValue;
use crate::FromPrimitive as _;

/// Maximum collection nesting depth, per the Design Notes' recommended
/// bound: deep enough for any real media-col/finishings-col attribute,
/// shallow enough to reject a pathological or hostile message cheaply.
pub const MAX_COLLECTION_DEPTH: usize = 16;

/// Where a just-decoded value (or a just-closed collection) attaches.
enum Attachment {
    /// Directly under a delimiter group, optionally under a name (a
    /// `None` name means "this is an additional value for the previous
    /// attribute", matching how IPP encodes `1setOf` continuations).
    TopLevel { tag: DelimiterTag, name: Option<String> },
    /// A member of the collection one level up the stack.
    Member { name: String },
}

struct CollectionFrame {
    attachment: Attachment,
    map: Vec<(crate::value::IppName, IppValue)>,
    pending_member: Option<String>,
}

/// Decodes a single IPP message from a byte stream.
pub struct IppParser<R> {
    reader: IppReader<R>,
}

impl<R: Read> IppParser<R> {
    pub fn new(reader: IppReader<R>) -> Self {
        IppParser { reader }
    }

    pub fn parse(mut self) -> Result<IppRequestResponse, IppParseError> {
        let major = self.reader.read_u8()?;
        let minor = self.reader.read_u8()?;
        let header = self.reader.read_u16()?;
        let request_id = self.reader.read_i32()?;

        let mut attributes = IppAttributes::new();
        let mut current_tag: Option<DelimiterTag> = None;
        let mut stack: Vec<CollectionFrame> = Vec::new();

        loop {
            let tag = self.reader.read_u8()?;

            if tag <= 0x0F {
                let delim = DelimiterTag::from_u8(tag).ok_or(IppParseError::UnknownDelimiterTag { tag, offset: 0 })?;
                if delim == DelimiterTag::EndOfAttributes {
                    if !stack.is_empty() {
                        return Err(IppParseError::CollectionUnderflow);
                    }
                    break;
                }
                attributes.push_group(IppAttributeGroup::new(delim));
                current_tag = Some(delim);
                continue;
            }

            let name_len = self.reader.read_u16()? as usize;
            let name = if name_len > 0 {
                let bytes = self.reader.read_bytes(name_len)?;
                Some(String::from_utf8_lossy(&bytes).into_owned())
            } else {
                None
            };
            let value_len = self.reader.read_u16()? as usize;
            let value_bytes = self.reader.read_bytes(value_len)?;

            if tag == ValueTag::MemberAttrName as u8 {
                let member_name = String::from_utf8_lossy(&value_bytes).into_owned();
                let frame = stack.last_mut().ok_or(IppParseError::CollectionUnderflow)?;
                frame.pending_member = Some(member_name);
                continue;
            }

            if tag == ValueTag::BegCollection as u8 {
                if stack.len() >= MAX_COLLECTION_DEPTH {
                    return Err(IppParseError::CollectionOverflow { max: MAX_COLLECTION_DEPTH });
                }
                let attachment = match stack.last_mut() {
                    Some(parent) => Attachment::Member {
                        name: parent.pending_member.take().ok_or(IppParseError::CollectionUnderflow)?,
                    },
                    None => Attachment::TopLevel {
                        tag: current_tag.unwrap_or(DelimiterTag::OperationAttributes),
                        name,
                    },
                };
                stack.push(CollectionFrame {
                    attachment,
                    map: Vec::new(),
                    pending_member: None,
                });
                continue;
            }

            if tag == ValueTag::EndCollection as u8 {
                let frame = stack.pop().ok_or(IppParseError::CollectionUnderflow)?;
                let value = IppValue::Collection(frame.map);
                self.attach(&mut stack, &mut attributes, frame.attachment, value)?;
                continue;
            }

            let value = IppValue::parse(tag, value_bytes)?;
            if let Some(frame) = stack.last_mut() {
                let member_name = frame.pending_member.take().ok_or(IppParseError::CollectionUnderflow)?;
                frame.map.push((member_name.try_into()?, value));
            } else {
                let tag = current_tag.unwrap_or(DelimiterTag::OperationAttributes);
                self.attach(&mut stack, &mut attributes, Attachment::TopLevel { tag, name }, value)?;
            }
        }

        let data = self.reader.read_to_end()?;
        Ok(IppRequestResponse::from_parts((major, minor), header, request_id, attributes, data))
    }

    fn attach(
        &self,
        stack: &mut [CollectionFrame],
        attributes: &mut IppAttributes,
        attachment: Attachment,
        value: IppValue,
    ) -> Result<(), IppParseError> {
        match attachment {
            Attachment::Member { name } => {
                let frame = stack.last_mut().ok_or(IppParseError::CollectionUnderflow)?;
                frame.map.push((name.try_into()?, value));
                Ok(())
            }
            Attachment::TopLevel { tag, name } => {
                match name {
                    Some(name) => attributes.add(tag, IppAttribute::new(name, value)),
                    None => {
                        if let Some(group) = attributes.groups_mut().iter_mut().rev().find(|g| g.tag() == tag) {
                            if let Some(last) = group.attributes_mut().last_mut() {
                                last.add_value(value);
                            }
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
