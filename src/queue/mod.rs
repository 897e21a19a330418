/*!
 * Queue Module
 * Tagged heterogeneous record queues and their binary codec
 */

pub mod codec;
pub mod heterogeneous;
mod macros;
pub mod reflect;

pub use codec::{get_string, put_string, reflect_members, string_size, WireField, WireFormat};
pub use heterogeneous::{read_member, HeterogeneousQueue, QueueEvents, QueueIter, QueueMember};
pub use reflect::{UdtMember, UserDefinedType};
