/*!
 * Reflection Manifest
 * Layout description of every record type a queue may contain
 */

use crate::core::serde::usize_as_string;
use serde::Serialize;

/// One field of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UdtMember {
    pub name: String,
    pub type_name: String,
    #[serde(serialize_with = "usize_as_string")]
    pub offset: usize,
    #[serde(serialize_with = "usize_as_string")]
    pub size: usize,
    pub is_reference: bool,
}

/// A record type; `size` is 0 for variable-size records, which the reader
/// decodes with type-specific logic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDefinedType {
    pub name: String,
    #[serde(serialize_with = "usize_as_string")]
    pub size: usize,
    pub is_reference: bool,
    pub members: Vec<UdtMember>,
}

impl UserDefinedType {
    pub fn member(&self, name: &str) -> Option<&UdtMember> {
        self.members.iter().find(|m| m.name == name)
    }
}
