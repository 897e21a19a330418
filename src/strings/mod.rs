/*!
 * Strings Module
 * Static string references shipped as dependencies and dynamic strings copied by value
 */

pub mod table;

use crate::core::ObjectId;
use crate::queue::{get_string, put_string, string_size, WireField, WireFormat};
use crate::queue::{reflect_members, UserDefinedType};
use bytes::{Buf, BufMut, BytesMut};
use std::fmt;

pub use table::{string_table, StringTable};

/// Encoding of string bytes on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StringCodec {
    Ansi = 0,
    Wide = 1,
    Utf8 = 2,
    /// Entry of a host name table
    NameTable = 3,
}

impl StringCodec {
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(StringCodec::Ansi),
            1 => Some(StringCodec::Wide),
            2 => Some(StringCodec::Utf8),
            3 => Some(StringCodec::NameTable),
            _ => None,
        }
    }
}

// ============================================================================
// Static Strings
// ============================================================================

/// Handle to a process-lifetime string
///
/// Encoded in events as its id only; the text travels once per block in a
/// [`StaticStringDependency`]. Equal content means equal id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticStringRef {
    id: ObjectId,
    value: &'static str,
}

impl StaticStringRef {
    /// Reference a string literal or other `'static` text without copying it
    pub fn from_static(value: &'static str) -> Self {
        let id = string_table().register_static(value);
        Self { id, value }
    }

    /// Reference runtime text, copying it into the string table on first sight
    pub fn intern(value: &str) -> Self {
        let (id, value) = string_table().intern(value);
        Self { id, value }
    }

    /// Resolve an id read back from a queue
    ///
    /// # Panics
    /// If the id was never handed out by the string table.
    pub fn resolve(id: ObjectId) -> Self {
        match string_table().lookup(id) {
            Some(value) => Self { id, value },
            None => panic!("static string {} is not in the string table", id),
        }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.value
    }
}

impl fmt::Debug for StaticStringRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StaticStringRef({}, {:?})", self.id, self.value)
    }
}

impl From<&'static str> for StaticStringRef {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl WireField for StaticStringRef {
    const STATIC_SIZE: Option<usize> = Some(std::mem::size_of::<u64>());
    const TYPE_NAME: &'static str = "StaticStringRef";
    const IS_REFERENCE: bool = true;

    fn wire_size(&self) -> usize {
        std::mem::size_of::<u64>()
    }

    fn put(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.id.as_u64());
    }

    fn get(buf: &mut &[u8]) -> Self {
        Self::resolve(ObjectId(buf.get_u64_le()))
    }
}

/// Out-of-band description of a static string: id, codec and bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticStringDependency {
    pub id: ObjectId,
    pub codec: StringCodec,
    pub bytes: Vec<u8>,
}

impl StaticStringDependency {
    pub fn new(string: StaticStringRef) -> Self {
        Self {
            id: string.id(),
            codec: StringCodec::Utf8,
            bytes: string.as_str().as_bytes().to_vec(),
        }
    }

    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl WireFormat for StaticStringDependency {
    const IS_SIZE_STATIC: bool = false;

    fn size(&self) -> usize {
        std::mem::size_of::<u64>() + string_size(self.bytes.len())
    }

    fn write(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.id.as_u64());
        put_string(buf, self.codec as u8, &self.bytes);
    }

    fn read(buf: &mut &[u8]) -> Self {
        let id = ObjectId(buf.get_u64_le());
        let (codec, bytes) = get_string(buf);
        let codec = StringCodec::from_value(codec)
            .unwrap_or_else(|| panic!("unknown string codec {}", codec));
        Self { id, codec, bytes }
    }

    fn reflect() -> UserDefinedType {
        reflect_members("StaticStringDependency", false, &[])
    }
}

// ============================================================================
// Dynamic Strings
// ============================================================================

/// Transient text copied into the queue at push time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DynamicString(pub String);

impl DynamicString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DynamicString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DynamicString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for DynamicString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl WireField for DynamicString {
    const STATIC_SIZE: Option<usize> = None;
    const TYPE_NAME: &'static str = "DynamicString";

    fn wire_size(&self) -> usize {
        string_size(self.0.len())
    }

    fn put(&self, buf: &mut BytesMut) {
        put_string(buf, StringCodec::Utf8 as u8, self.0.as_bytes());
    }

    fn get(buf: &mut &[u8]) -> Self {
        let (_codec, bytes) = get_string(buf);
        match String::from_utf8(bytes) {
            Ok(text) => Self(text),
            Err(err) => Self(String::from_utf8_lossy(err.as_bytes()).into_owned()),
        }
    }
}
