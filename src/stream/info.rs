/*!
 * Stream Info
 * Registration snapshot of a stream sent to sinks before its first block
 */

use crate::queue::UserDefinedType;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub process_id: String,
    pub stream_id: String,
    pub tags: Vec<String>,
    pub properties: BTreeMap<String, String>,
    pub dependencies_metadata: Vec<UserDefinedType>,
    pub objects_metadata: Vec<UserDefinedType>,
}

impl StreamInfo {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
