/*!
 * Queue Codec
 * Per-type binary layout of the records stored in tagged queues
 *
 * Fields are written little-endian, back to back, without alignment.
 * Reads go through `bytes::Buf`, which panics on a truncated buffer: a queue
 * is only ever decoded by the process that encoded it, so a short read is an
 * internal consistency violation.
 */

use super::reflect::{UdtMember, UserDefinedType};
use bytes::{Buf, BufMut, BytesMut};

// ============================================================================
// Field Layer
// ============================================================================

/// A value that can appear as a member of a queue record
pub trait WireField: Sized {
    /// Encoded size when it does not depend on the value
    const STATIC_SIZE: Option<usize>;
    /// Type name published in the reflection manifest
    const TYPE_NAME: &'static str;
    /// True when the encoded value is the id of an out-of-band dependency
    const IS_REFERENCE: bool = false;

    fn wire_size(&self) -> usize;
    fn put(&self, buf: &mut BytesMut);
    fn get(buf: &mut &[u8]) -> Self;
}

macro_rules! impl_wire_primitive {
    ($ty:ty, $name:literal, $put:ident, $get:ident) => {
        impl WireField for $ty {
            const STATIC_SIZE: Option<usize> = Some(std::mem::size_of::<$ty>());
            const TYPE_NAME: &'static str = $name;

            #[inline]
            fn wire_size(&self) -> usize {
                std::mem::size_of::<$ty>()
            }

            #[inline]
            fn put(&self, buf: &mut BytesMut) {
                buf.$put(*self);
            }

            #[inline]
            fn get(buf: &mut &[u8]) -> Self {
                buf.$get()
            }
        }
    };
}

impl_wire_primitive!(u8, "uint8", put_u8, get_u8);
impl_wire_primitive!(u32, "uint32", put_u32_le, get_u32_le);
impl_wire_primitive!(u64, "uint64", put_u64_le, get_u64_le);
impl_wire_primitive!(i64, "int64", put_i64_le, get_i64_le);
impl_wire_primitive!(f64, "f64", put_f64_le, get_f64_le);

// ============================================================================
// Record Layer
// ============================================================================

/// A record type storable in a tagged queue
pub trait WireFormat: Sized {
    /// Whether every value of the type encodes to the same number of bytes.
    /// Variable-size records get a 4-byte length prefix in the queue.
    const IS_SIZE_STATIC: bool;

    /// Encoded payload size in bytes
    fn size(&self) -> usize;
    fn write(&self, buf: &mut BytesMut);
    fn read(buf: &mut &[u8]) -> Self;

    /// Manifest entry describing the encoded layout
    fn reflect() -> UserDefinedType;
}

/// Build a manifest entry from a list of `(name, type, static size, is_reference)`
pub fn reflect_members(
    type_name: &str,
    is_size_static: bool,
    fields: &[(&str, &str, Option<usize>, bool)],
) -> UserDefinedType {
    let mut members = Vec::with_capacity(fields.len());
    let mut offset = 0;
    for (name, field_type, size, is_reference) in fields {
        let size = size.unwrap_or(0);
        members.push(UdtMember {
            name: (*name).to_string(),
            type_name: (*field_type).to_string(),
            offset,
            size,
            is_reference: *is_reference,
        });
        offset += size;
    }
    UserDefinedType {
        name: type_name.to_string(),
        size: if is_size_static { offset } else { 0 },
        is_reference: false,
        members,
    }
}

/// Implement [`WireFormat`] for a struct whose fields are all [`WireField`]s
///
/// Fields are encoded in the listed order; the string literal is the member
/// name published in the manifest.
#[macro_export]
macro_rules! wire_record {
    ($ty:ident { $($field:ident : $fty:ty => $wire_name:literal),* $(,)? }) => {
        impl $crate::queue::WireFormat for $ty {
            const IS_SIZE_STATIC: bool =
                true $(&& <$fty as $crate::queue::WireField>::STATIC_SIZE.is_some())*;

            #[inline]
            fn size(&self) -> usize {
                0 $(+ $crate::queue::WireField::wire_size(&self.$field))*
            }

            #[inline]
            fn write(&self, buf: &mut ::bytes::BytesMut) {
                $($crate::queue::WireField::put(&self.$field, buf);)*
            }

            #[inline]
            fn read(buf: &mut &[u8]) -> Self {
                Self {
                    $($field: <$fty as $crate::queue::WireField>::get(buf),)*
                }
            }

            fn reflect() -> $crate::queue::UserDefinedType {
                $crate::queue::reflect_members(
                    stringify!($ty),
                    <Self as $crate::queue::WireFormat>::IS_SIZE_STATIC,
                    &[$((
                        $wire_name,
                        <$fty as $crate::queue::WireField>::TYPE_NAME,
                        <$fty as $crate::queue::WireField>::STATIC_SIZE,
                        <$fty as $crate::queue::WireField>::IS_REFERENCE,
                    )),*],
                )
            }
        }
    };
}

/// Write a length-prefixed byte string (codec byte, u32 length, bytes)
pub fn put_string(buf: &mut BytesMut, codec: u8, bytes: &[u8]) {
    buf.put_u8(codec);
    buf.put_u32_le(bytes.len() as u32);
    buf.put_slice(bytes);
}

/// Read back what [`put_string`] wrote
pub fn get_string(buf: &mut &[u8]) -> (u8, Vec<u8>) {
    let codec = buf.get_u8();
    let len = buf.get_u32_le() as usize;
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    (codec, bytes)
}

/// Size of what [`put_string`] writes
#[inline]
pub fn string_size(len: usize) -> usize {
    1 + std::mem::size_of::<u32>() + len
}
