/*!
 * Ingestion Requests
 * CBOR envelopes for process, stream and block registration
 *
 * Block payloads are the raw queue bytes, LZ4 frame compressed, carried as
 * CBOR byte strings.
 */

use crate::core::serde::{as_byte_string, from_byte_string};
use crate::core::{TelemetryError, TelemetryResult};
use crate::dependencies::ExtractDependencies;
use crate::process_info::ProcessInfo;
use crate::queue::UserDefinedType;
use crate::stream::{EventBlock, StreamInfo};
use lz4_flex::frame::{FrameDecoder, FrameEncoder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use tracing::error;

// ============================================================================
// Compression
// ============================================================================

/// LZ4 frame compression of a payload
pub fn compress(bytes: &[u8]) -> TelemetryResult<Vec<u8>> {
    let mut encoder = FrameEncoder::new(Vec::with_capacity(bytes.len() / 2));
    encoder.write_all(bytes)?;
    encoder
        .finish()
        .map_err(|e| TelemetryError::Compression(std::io::Error::new(std::io::ErrorKind::Other, e)))
}

pub fn decompress(bytes: &[u8]) -> TelemetryResult<Vec<u8>> {
    let mut decoded = Vec::with_capacity(bytes.len() * 2);
    FrameDecoder::new(bytes).read_to_end(&mut decoded)?;
    Ok(decoded)
}

/// A payload that fails to compress is shipped empty; its events are lost
fn compress_or_empty(bytes: &[u8], what: &'static str) -> Vec<u8> {
    match compress(bytes) {
        Ok(compressed) => compressed,
        Err(e) => {
            error!(error = %e, payload = what, "failed to compress block payload");
            Vec::new()
        }
    }
}

fn to_cbor<T: Serialize>(value: &T, context: &'static str) -> TelemetryResult<Vec<u8>> {
    let mut buffer = Vec::new();
    ciborium::into_writer(value, &mut buffer).map_err(|e| TelemetryError::encoding(context, e))?;
    Ok(buffer)
}

// ============================================================================
// Process
// ============================================================================

#[derive(Debug, Serialize)]
struct InsertProcessRequest<'a> {
    process_id: &'a str,
    parent_process_id: &'a str,
    exe: &'a str,
    username: &'a str,
    realname: &'a str,
    computer: &'a str,
    distro: &'a str,
    cpu_brand: &'a str,
    tsc_frequency: i64,
    start_time: String,
    start_ticks: i64,
    properties: &'a BTreeMap<String, String>,
}

pub fn format_insert_process_request(process: &ProcessInfo) -> TelemetryResult<Vec<u8>> {
    let request = InsertProcessRequest {
        process_id: &process.process_id,
        parent_process_id: &process.parent_process_id,
        exe: &process.exe,
        username: &process.username,
        realname: &process.realname,
        computer: &process.computer,
        distro: &process.distro,
        cpu_brand: &process.cpu_brand,
        tsc_frequency: process.tsc_frequency,
        start_time: process.start_time.format_iso8601(),
        start_ticks: process.start_time.ticks,
        properties: &process.properties,
    };
    to_cbor(&request, "process request")
}

// ============================================================================
// Stream
// ============================================================================

#[derive(Debug, Serialize)]
struct InsertStreamRequest<'a> {
    stream_id: &'a str,
    process_id: &'a str,
    dependencies_metadata: &'a [UserDefinedType],
    objects_metadata: &'a [UserDefinedType],
    tags: &'a [String],
    properties: &'a BTreeMap<String, String>,
}

pub fn format_insert_stream_request(stream: &StreamInfo) -> TelemetryResult<Vec<u8>> {
    let request = InsertStreamRequest {
        stream_id: &stream.stream_id,
        process_id: &stream.process_id,
        dependencies_metadata: &stream.dependencies_metadata,
        objects_metadata: &stream.objects_metadata,
        tags: &stream.tags,
        properties: &stream.properties,
    };
    to_cbor(&request, "stream request")
}

// ============================================================================
// Block
// ============================================================================

/// Compressed queues of one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPayload {
    #[serde(serialize_with = "as_byte_string", deserialize_with = "from_byte_string")]
    pub dependencies: Vec<u8>,
    #[serde(serialize_with = "as_byte_string", deserialize_with = "from_byte_string")]
    pub objects: Vec<u8>,
}

/// Envelope of one sealed block, as uploaded to `insert_block`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertBlockRequest {
    pub block_id: String,
    pub stream_id: String,
    pub process_id: String,
    pub begin_time: String,
    pub begin_ticks: i64,
    pub end_time: String,
    pub end_ticks: i64,
    pub payload: BlockPayload,
    pub nb_objects: u64,
    pub object_offset: u64,
}

impl InsertBlockRequest {
    /// Extract the dependencies of a closed block and compress both queues
    ///
    /// # Panics
    /// If the block is still open.
    pub fn new<E: ExtractDependencies>(process_id: &str, block_id: String, block: &EventBlock<E>) -> Self {
        let end = block.end();
        let dependencies = E::extract(block.events());
        Self {
            block_id,
            stream_id: block.stream_id().to_string(),
            process_id: process_id.to_string(),
            begin_time: block.begin().format_iso8601(),
            begin_ticks: block.begin().ticks,
            end_time: end.format_iso8601(),
            end_ticks: end.ticks,
            payload: BlockPayload {
                dependencies: compress_or_empty(dependencies.as_bytes(), "dependencies"),
                objects: compress_or_empty(block.events().as_bytes(), "objects"),
            },
            nb_objects: block.nb_events() as u64,
            object_offset: block.object_offset() as u64,
        }
    }

    pub fn encode(&self) -> TelemetryResult<Vec<u8>> {
        to_cbor(self, "block request")
    }

    pub fn decode(bytes: &[u8]) -> TelemetryResult<Self> {
        ciborium::from_reader(bytes).map_err(|e| TelemetryError::encoding("block request", e))
    }
}

/// Binary envelope of a closed block
pub fn format_block_request<E: ExtractDependencies>(
    process_id: &str,
    block_id: String,
    block: &EventBlock<E>,
) -> TelemetryResult<Vec<u8>> {
    InsertBlockRequest::new(process_id, block_id, block).encode()
}
