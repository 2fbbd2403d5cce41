//!
//! IPP value
//!
#![allow(unused_assignments)]
use std::{borrow::Cow, fmt, ops::Deref, str::FromStr};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use enum_as_inner::EnumAsInner;

use http::Uri;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::IppParseError, model::ValueTag, FromPrimitive as _};

/// A UTF-8 string whose length is bounded by a compile-time maximum (in bytes).
///
/// This type is primarily used to enforce IPP `text(*)`, `name(*)`,
/// `keyword`, and related value length limits defined by the IPP specification.
///
/// The length constraint is measured in UTF-8 encoded bytes,
/// not Unicode scalar values.
///
/// # Type Parameter
/// - `MAX`: Maximum allowed length in bytes.
///
/// # Errors
/// Returns [`IppParseError::InvalidStringLength`] if the input exceeds `MAX`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoundedString<const MAX: u16 = 1023> {
    inner: String,
}

pub type IppString = BoundedString;
pub type IppShortString = BoundedString<127>;
pub type IppKeyword = BoundedString<255>;
pub type IppMimeMediaType = BoundedString<255>;
pub type IppCharset = BoundedString<63>;
pub type IppLanguage = BoundedString<63>;
pub type IppName = BoundedString<255>;

impl<const MAX: u16> BoundedString<MAX> {
    /// attempts to create a bounded string from the given value returning an error if the strings length exceeds the const generic
    /// defined for the type.
    pub fn new(s: impl Into<String>) -> Result<Self, IppParseError> {
        let s = s.into();
        let len_usize = s.len();
        let len: u16 = len_usize.try_into().map_err(|_| IppParseError::InvalidStringLength {
            len: len_usize,
            max: MAX,
        })?;

        if len > MAX {
            return Err(IppParseError::InvalidStringLength {
                len: len_usize,
                max: MAX,
            });
        }

        Ok(Self { inner: s })
    }

    pub const fn max() -> u16 {
        MAX
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn into_inner(self) -> String {
        self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Widen the max size of the bounded string.
    /// Infallible because all strings of length <= MAX are valid for any larger MAX2.
    /// if attempting to expand to a smaller `MAX2` the assertion will fail causing a panic.
    pub fn expand<const MAX2: u16>(self) -> BoundedString<MAX2> {
        assert!(MAX2 >= MAX);
        BoundedString::<MAX2> { inner: self.inner }
    }

    /// Attempt to shrink a bounded string to a smaller MAX.
    /// Returns an error if the actual string is too long for the target size.
    pub fn shrink<const MAX2: u16>(self) -> Result<BoundedString<MAX2>, IppParseError> {
        if self.len() > MAX2 as usize {
            return Err(IppParseError::InvalidStringLength {
                len: self.len(),
                max: MAX2,
            });
        }
        Ok(BoundedString::<MAX2> { inner: self.inner })
    }
}

impl<const MAX: u16, const CAP: usize> From<&[u8; CAP]> for BoundedString<MAX> {
    fn from(value: &[u8; CAP]) -> BoundedString<MAX> {
        Self::from_array(value)
    }
}

const fn capacity_assertion(max: u16, capacity: usize) -> usize {
    assert!(max as usize == capacity);
    capacity
}

pub trait FromArray<const CAP: usize> {
    const CAPACITY: usize;
    fn from_array(value: &[u8; CAP]) -> Self;
}

impl<const MAX: u16, const CAP: usize> FromArray<CAP> for BoundedString<MAX> {
    const CAPACITY: usize = capacity_assertion(MAX, CAP);
    fn from_array(value: &[u8; CAP]) -> Self {
        assert_eq!(MAX as usize, CAP);
        String::from_utf8_lossy(value).try_into().unwrap()
    }
}

impl<const MAX: u16> From<BoundedString<MAX>> for String {
    fn from(value: BoundedString<MAX>) -> Self {
        value.inner
    }
}

impl<const MAX: u16> std::borrow::Borrow<str> for BoundedString<MAX> {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl<const MAX: u16> AsRef<str> for BoundedString<MAX> {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl<const MAX: u16> Deref for BoundedString<MAX> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<const MAX: u16> FromStr for BoundedString<MAX> {
    type Err = IppParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<const MAX: u16> TryFrom<&str> for BoundedString<MAX> {
    type Error = IppParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl<const MAX: u16> TryFrom<String> for BoundedString<MAX> {
    type Error = IppParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl<const MAX: u16> TryFrom<Cow<'_, str>> for BoundedString<MAX> {
    type Error = IppParseError;
    fn try_from(s: Cow<'_, str>) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl<const MAX: u16> fmt::Display for BoundedString<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl<const MAX: u16> TryFrom<Uri> for BoundedString<MAX> {
    type Error = IppParseError;
    fn try_from(u: Uri) -> Result<Self, Self::Error> {
        u.to_string().try_into()
    }
}

/// Represents an IPP `text(*)` value with length-tiered encoding.
///
/// IPP defines multiple text encodings depending on maximum length:
/// - 0–127 bytes
/// - 128–255 bytes
/// - 256–1023 bytes
///
/// This enum selects the smallest valid representation automatically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IppTextValue {
    Short(IppShortString),
    Medium(BoundedString<255>),
    Long(IppString),
}

impl IppTextValue {
    pub fn new(s: impl Into<String>) -> Result<Self, IppParseError> {
        let string = s.into();
        let len = string.len();
        match len {
            0..=127 => Ok(Self::Short(IppShortString::new(string)?)),
            128..=255 => Ok(Self::Medium(BoundedString::<255>::new(string)?)),
            256..=1023 => Ok(Self::Long(IppString::new(string)?)),
            _ => Err(IppParseError::InvalidStringLength { len, max: 1023 }),
        }
    }
    pub fn len(&self) -> usize {
        self.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_ref().is_empty()
    }
}

impl From<IppShortString> for IppTextValue {
    fn from(value: IppShortString) -> Self {
        Self::Short(value)
    }
}

impl From<BoundedString<255>> for IppTextValue {
    fn from(value: BoundedString<255>) -> Self {
        Self::Medium(value)
    }
}

impl From<IppString> for IppTextValue {
    fn from(value: IppString) -> Self {
        Self::Long(value)
    }
}

impl AsRef<str> for IppTextValue {
    fn as_ref(&self) -> &str {
        match self {
            IppTextValue::Short(s) => s.as_ref(),
            IppTextValue::Medium(s) => s.as_ref(),
            IppTextValue::Long(s) => s.as_ref(),
        }
    }
}

impl Deref for IppTextValue {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_ref()
    }
}

impl TryFrom<&str> for IppTextValue {
    type Error = IppParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<String> for IppTextValue {
    type Error = IppParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<Cow<'_, str>> for IppTextValue {
    type Error = IppParseError;
    fn try_from(s: Cow<'_, str>) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl fmt::Display for IppTextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// Take exactly `len` bytes off the front of `data`, or a typed parse
/// error rather than the panic `Buf::copy_to_bytes` would raise on a
/// short buffer.
#[inline]
fn checked_take(data: &mut Bytes, len: usize) -> Result<Bytes, IppParseError> {
    if data.remaining() < len {
        return Err(IppParseError::TruncatedInput {
            needed: len,
            available: data.remaining(),
        });
    }
    Ok(data.copy_to_bytes(len))
}

#[inline]
fn checked_u8(data: &mut Bytes) -> Result<u8, IppParseError> {
    Ok(checked_take(data, 1)?[0])
}

#[inline]
fn checked_i8(data: &mut Bytes) -> Result<i8, IppParseError> {
    Ok(checked_u8(data)? as i8)
}

#[inline]
fn checked_u16(data: &mut Bytes) -> Result<u16, IppParseError> {
    let b = checked_take(data, 2)?;
    Ok(u16::from_be_bytes([b[0], b[1]]))
}

#[inline]
fn checked_i32(data: &mut Bytes) -> Result<i32, IppParseError> {
    let b = checked_take(data, 4)?;
    Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

#[inline]
fn get_len_string(data: &mut Bytes) -> Result<String, IppParseError> {
    let len = checked_u16(data)? as usize;
    let bytes = checked_take(data, len)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// IPP attribute values as defined in [RFC 8010](https://tools.ietf.org/html/rfc8010).
///
/// The length for `TextWithoutLanguage`, `TextWithLanguage`, and
/// `OctetString` values is heavily attribute dependent; usual values are
/// 127, 255, and 1023, but since these are attribute dependent, an
/// [`IppTextValue`] is used to let the calling routine pick the expected
/// text length tier.
///
/// The four out-of-band variants (`Unsupported`, `Unknown`, `NoValue`,
/// `Default`) carry no payload on the wire: a zero-length value always
/// follows their tag.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, EnumAsInner)]
pub enum IppValue {
    Integer(i32),
    Enum(i32),
    OctetString(IppTextValue),
    TextWithoutLanguage(IppTextValue),
    NameWithoutLanguage(IppName),
    TextWithLanguage {
        language: IppLanguage,
        text: IppTextValue,
    },
    NameWithLanguage {
        language: IppLanguage,
        name: IppName,
    },
    Charset(IppCharset),
    NaturalLanguage(IppLanguage),
    Uri(IppString),
    UriScheme(IppString),
    RangeOfInteger {
        min: i32,
        max: i32,
    },
    Boolean(bool),
    Keyword(IppKeyword),
    Array(Vec<IppValue>),
    /// A recursive, ordered list of named sub-attributes. Backed by a
    /// `Vec` rather than a map so a collection preserves member order on
    /// a decode/encode round-trip, the same way a top-level attribute
    /// group does (spec §3, testable property 1: value order within an
    /// attribute — a collection is itself a value).
    Collection(Vec<(IppName, IppValue)>),
    MimeMediaType(IppMimeMediaType),
    DateTime {
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minutes: u8,
        seconds: u8,
        deci_seconds: u8,
        utc_dir: char,
        utc_hours: u8,
        utc_mins: u8,
    },
    MemberAttrName(IppKeyword),
    Resolution {
        cross_feed: i32,
        feed: i32,
        units: i8,
    },
    /// `unsupported` out-of-band value (0x10): the requested attribute or
    /// value is not supported by the responder.
    Unsupported,
    /// `unknown` out-of-band value (0x12): the responder knows the
    /// attribute exists but does not know its value.
    Unknown,
    /// `no-value` out-of-band value (0x13): the attribute exists but has
    /// no value assigned.
    NoValue,
    /// `unknown-default` style out-of-band value (0x17, "admin-define"
    /// tag reused by some responders to signal an administrator-supplied
    /// default); carried through rather than dropped.
    Default,
    Other {
        tag: u8,
        data: Bytes,
    },
}

impl IppValue {
    /// Convert to binary tag
    pub fn to_tag(&self) -> u8 {
        match *self {
            IppValue::Integer(_) => ValueTag::Integer as u8,
            IppValue::Enum(_) => ValueTag::Enum as u8,
            IppValue::RangeOfInteger { .. } => ValueTag::RangeOfInteger as u8,
            IppValue::Boolean(_) => ValueTag::Boolean as u8,
            IppValue::Keyword(_) => ValueTag::Keyword as u8,
            IppValue::OctetString(_) => ValueTag::OctetStringUnspecified as u8,
            IppValue::TextWithoutLanguage(_) => ValueTag::TextWithoutLanguage as u8,
            IppValue::NameWithoutLanguage(_) => ValueTag::NameWithoutLanguage as u8,
            IppValue::TextWithLanguage { .. } => ValueTag::TextWithLanguage as u8,
            IppValue::NameWithLanguage { .. } => ValueTag::NameWithLanguage as u8,
            IppValue::Charset(_) => ValueTag::Charset as u8,
            IppValue::NaturalLanguage(_) => ValueTag::NaturalLanguage as u8,
            IppValue::Uri(_) => ValueTag::Uri as u8,
            IppValue::UriScheme(_) => ValueTag::UriScheme as u8,
            IppValue::MimeMediaType(_) => ValueTag::MimeMediaType as u8,
            IppValue::Array(ref array) => array.first().map(|v| v.to_tag()).unwrap_or(ValueTag::Unknown as u8),
            IppValue::Collection(_) => ValueTag::BegCollection as u8,
            IppValue::DateTime { .. } => ValueTag::DateTime as u8,
            IppValue::MemberAttrName(_) => ValueTag::MemberAttrName as u8,
            IppValue::Resolution { .. } => ValueTag::Resolution as u8,
            IppValue::Other { tag, .. } => tag,
            IppValue::Unsupported => ValueTag::Unsupported as u8,
            IppValue::Unknown => ValueTag::Unknown as u8,
            IppValue::NoValue => ValueTag::NoValue as u8,
            IppValue::Default => ValueTag::AdminDefine as u8,
        }
    }

    /// Parse value from a byte array which does not include the value length field
    pub fn parse(value_tag: u8, mut data: Bytes) -> Result<IppValue, IppParseError> {
        let ipp_tag = match ValueTag::from_u8(value_tag) {
            Some(x) => x,
            None => {
                return Ok(IppValue::Other { tag: value_tag, data });
            }
        };

        let value = match ipp_tag {
            ValueTag::Integer => IppValue::Integer(checked_i32(&mut data)?),
            ValueTag::Enum => IppValue::Enum(checked_i32(&mut data)?),
            ValueTag::OctetStringUnspecified => IppValue::OctetString(String::from_utf8_lossy(&data).try_into()?),
            ValueTag::TextWithoutLanguage => IppValue::TextWithoutLanguage(String::from_utf8_lossy(&data).try_into()?),
            ValueTag::NameWithoutLanguage => IppValue::NameWithoutLanguage(String::from_utf8_lossy(&data).try_into()?),
            ValueTag::TextWithLanguage => IppValue::TextWithLanguage {
                language: get_len_string(&mut data)?.try_into()?,
                text: get_len_string(&mut data)?.try_into()?,
            },
            ValueTag::NameWithLanguage => IppValue::NameWithLanguage {
                language: get_len_string(&mut data)?.try_into()?,
                name: get_len_string(&mut data)?.try_into()?,
            },
            ValueTag::Charset => IppValue::Charset(String::from_utf8_lossy(&data).try_into()?),
            ValueTag::NaturalLanguage => IppValue::NaturalLanguage(String::from_utf8_lossy(&data).try_into()?),
            ValueTag::Uri => IppValue::Uri(String::from_utf8_lossy(&data).try_into()?),
            ValueTag::UriScheme => IppValue::UriScheme(String::from_utf8_lossy(&data).try_into()?),
            ValueTag::RangeOfInteger => IppValue::RangeOfInteger {
                min: checked_i32(&mut data)?,
                max: checked_i32(&mut data)?,
            },
            ValueTag::Boolean => IppValue::Boolean(checked_u8(&mut data)? != 0),
            ValueTag::Keyword => IppValue::Keyword(String::from_utf8_lossy(&data).try_into()?),
            ValueTag::MimeMediaType => IppValue::MimeMediaType(String::from_utf8_lossy(&data).try_into()?),
            ValueTag::DateTime => IppValue::DateTime {
                year: checked_u16(&mut data)?,
                month: checked_u8(&mut data)?,
                day: checked_u8(&mut data)?,
                hour: checked_u8(&mut data)?,
                minutes: checked_u8(&mut data)?,
                seconds: checked_u8(&mut data)?,
                deci_seconds: checked_u8(&mut data)?,
                utc_dir: checked_u8(&mut data)? as char,
                utc_hours: checked_u8(&mut data)?,
                utc_mins: checked_u8(&mut data)?,
            },
            ValueTag::MemberAttrName => IppValue::MemberAttrName(String::from_utf8_lossy(&data).try_into()?),
            ValueTag::Resolution => IppValue::Resolution {
                cross_feed: checked_i32(&mut data)?,
                feed: checked_i32(&mut data)?,
                units: checked_i8(&mut data)?,
            },
            ValueTag::Unsupported => IppValue::Unsupported,
            ValueTag::Unknown => IppValue::Unknown,
            ValueTag::NoValue => IppValue::NoValue,
            ValueTag::AdminDefine => IppValue::Default,
            _ => IppValue::Other { tag: value_tag, data },
        };
        Ok(value)
    }

    /// Write value to byte array, including leading value length field, excluding value tag.
    ///
    /// Fails with [`IppParseError::ValueLengthOverflow`] if the encoded
    /// payload for a single value exceeds the 16-bit wire length field.
    pub fn to_bytes(&self) -> Result<Bytes, IppParseError> {
        let mut buffer = BytesMut::new();

        match *self {
            IppValue::Integer(i) | IppValue::Enum(i) => {
                buffer.put_u16(4);
                buffer.put_i32(i);
            }
            IppValue::RangeOfInteger { min, max } => {
                buffer.put_u16(8);
                buffer.put_i32(min);
                buffer.put_i32(max);
            }
            IppValue::Boolean(b) => {
                buffer.put_u16(1);
                buffer.put_u8(b as u8);
            }
            IppValue::Keyword(ref s) | IppValue::NameWithoutLanguage(ref s) => {
                put_len_prefixed(&mut buffer, s.as_bytes())?;
            }
            IppValue::OctetString(ref s) => {
                put_len_prefixed(&mut buffer, s.as_bytes())?;
            }
            IppValue::TextWithoutLanguage(ref s) => {
                put_len_prefixed(&mut buffer, s.as_bytes())?;
            }
            IppValue::Charset(ref s) | IppValue::NaturalLanguage(ref s) => {
                put_len_prefixed(&mut buffer, s.as_bytes())?;
            }
            IppValue::Uri(ref s) | IppValue::UriScheme(ref s) => {
                put_len_prefixed(&mut buffer, s.as_bytes())?;
            }
            IppValue::MimeMediaType(ref s) | IppValue::MemberAttrName(ref s) => {
                put_len_prefixed(&mut buffer, s.as_bytes())?;
            }
            IppValue::TextWithLanguage { ref language, ref text } => {
                let total = language.len() + text.len() + 4;
                let total: u16 = total.try_into().map_err(|_| IppParseError::ValueLengthOverflow { len: total })?;
                buffer.put_u16(total);
                buffer.put_u16(language.len() as u16);
                buffer.put_slice(language.as_bytes());
                buffer.put_u16(text.len() as u16);
                buffer.put_slice(text.as_bytes());
            }
            IppValue::NameWithLanguage { ref language, ref name } => {
                let total = language.len() + name.len() + 4;
                let total: u16 = total.try_into().map_err(|_| IppParseError::ValueLengthOverflow { len: total })?;
                buffer.put_u16(total);
                buffer.put_u16(language.len() as u16);
                buffer.put_slice(language.as_bytes());
                buffer.put_u16(name.len() as u16);
                buffer.put_slice(name.as_bytes());
            }
            IppValue::Array(ref list) => {
                for (i, item) in list.iter().enumerate() {
                    buffer.put(item.to_bytes()?);
                    if i < list.len() - 1 {
                        buffer.put_u8(self.to_tag());
                        buffer.put_u16(0);
                    }
                }
            }
            IppValue::Collection(ref list) => {
                // begin collection: value size is 0
                buffer.put_u16(0);

                for item in list.iter() {
                    let atr_name: IppValue = IppValue::MemberAttrName(item.0.clone());
                    // item tag
                    buffer.put_u8(atr_name.to_tag());
                    // name size is zero, this is a collection
                    buffer.put_u16(0);

                    buffer.put(atr_name.to_bytes()?);

                    // item tag
                    buffer.put_u8(item.1.to_tag());
                    // name size is zero, this is a collection
                    buffer.put_u16(0);

                    buffer.put(item.1.to_bytes()?);
                }
                // write end collection attribute
                buffer.put_u8(ValueTag::EndCollection as u8);
                buffer.put_u32(0);
            }
            IppValue::DateTime {
                year,
                month,
                day,
                hour,
                minutes,
                seconds,
                deci_seconds,
                utc_dir,
                utc_hours,
                utc_mins,
            } => {
                buffer.put_u16(11);
                buffer.put_u16(year);
                buffer.put_u8(month);
                buffer.put_u8(day);
                buffer.put_u8(hour);
                buffer.put_u8(minutes);
                buffer.put_u8(seconds);
                buffer.put_u8(deci_seconds);
                buffer.put_u8(utc_dir as u8);
                buffer.put_u8(utc_hours);
                buffer.put_u8(utc_mins);
            }
            IppValue::Resolution {
                cross_feed,
                feed,
                units,
            } => {
                buffer.put_u16(9);
                buffer.put_i32(cross_feed);
                buffer.put_i32(feed);
                buffer.put_u8(units as u8);
            }
            IppValue::Unsupported | IppValue::Unknown | IppValue::NoValue | IppValue::Default => buffer.put_u16(0),
            IppValue::Other { ref data, .. } => {
                put_len_prefixed(&mut buffer, data)?;
            }
        }
        Ok(buffer.freeze())
    }
}

#[inline]
fn put_len_prefixed(buffer: &mut BytesMut, bytes: &[u8]) -> Result<(), IppParseError> {
    let len: u16 = bytes
        .len()
        .try_into()
        .map_err(|_| IppParseError::ValueLengthOverflow { len: bytes.len() })?;
    buffer.put_u16(len);
    buffer.put_slice(bytes);
    Ok(())
}

/// Implement Display trait to print the value
impl fmt::Display for IppValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            IppValue::Integer(i) | IppValue::Enum(i) => write!(f, "{i}"),
            IppValue::RangeOfInteger { min, max } => write!(f, "{min}..{max}"),
            IppValue::Boolean(b) => write!(f, "{}", if b { "true" } else { "false" }),
            IppValue::Keyword(ref s) | IppValue::NameWithoutLanguage(ref s) => {
                write!(f, "{s}")
            }
            IppValue::OctetString(ref s) | IppValue::TextWithoutLanguage(ref s) => {
                write!(f, "{s}")
            }
            IppValue::Charset(ref s) | IppValue::NaturalLanguage(ref s) => {
                write!(f, "{s}")
            }
            IppValue::Uri(ref s) | IppValue::UriScheme(ref s) => {
                write!(f, "{s}")
            }
            IppValue::MimeMediaType(ref s) | IppValue::MemberAttrName(ref s) => write!(f, "{s}"),
            IppValue::TextWithLanguage { ref language, ref text } => write!(f, "{language}:{text}"),
            IppValue::NameWithLanguage { ref language, ref name } => write!(f, "{language}:{name}"),
            IppValue::Array(ref array) => {
                let s: Vec<String> = array.iter().map(|v| format!("{v}")).collect();
                write!(f, "[{}]", s.join(", "))
            }
            IppValue::Collection(ref coll) => {
                let s: Vec<String> = coll.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "<{}>", s.join(", "))
            }
            IppValue::DateTime {
                year,
                month,
                day,
                hour,
                minutes,
                seconds,
                deci_seconds,
                utc_dir,
                utc_hours,
                ..
            } => write!(
                f,
                "{year}-{month}-{day},{hour}:{minutes}:{seconds}.{deci_seconds},{utc_dir}{utc_hours}utc"
            ),
            IppValue::Resolution {
                cross_feed,
                feed,
                units,
            } => {
                write!(f, "{cross_feed}x{feed}{}", if units == 3 { "in" } else { "cm" })
            }
            IppValue::Unsupported => write!(f, "unsupported"),
            IppValue::Unknown => write!(f, "unknown"),
            IppValue::NoValue => write!(f, "no-value"),
            IppValue::Default => write!(f, "default"),
            IppValue::Other { tag, ref data } => write!(f, "{tag:0x}: {data:?}"),
        }
    }
}

impl FromStr for IppValue {
    type Err = IppParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = match s {
            "true" => IppValue::Boolean(true),
            "false" => IppValue::Boolean(false),
            other => {
                if let Ok(iv) = other.parse::<i32>() {
                    IppValue::Integer(iv)
                } else {
                    IppValue::Keyword(other.try_into()?)
                }
            }
        };
        Ok(value)
    }
}

impl<'a> IntoIterator for &'a IppValue {
    type Item = &'a IppValue;
    type IntoIter = IppValueIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        IppValueIterator { value: self, index: 0 }
    }
}

pub struct IppValueIterator<'a> {
    value: &'a IppValue,
    index: usize,
}

impl<'a> Iterator for IppValueIterator<'a> {
    type Item = &'a IppValue;

    fn next(&mut self) -> Option<Self::Item> {
        match self.value {
            IppValue::Array(array) => {
                if self.index < array.len() {
                    self.index += 1;
                    Some(&array[self.index - 1])
                } else {
                    None
                }
            }
            IppValue::Collection(map) => {
                if let Some(entry) = map.iter().nth(self.index) {
                    self.index += 1;
                    Some(entry.1)
                } else {
                    None
                }
            }
            _ => {
                if self.index == 0 {
                    self.index += 1;
                    Some(self.value)
                } else {
                    None
                }
            }
        }
    }
}
