//! Codec for encoding streaming messages.

use crate::update::{ChannelUpdate, MAX_CHANNELS};
use bytes::{BufMut, Bytes, BytesMut};

/// ASCII protocol tag opening every message.
const PROTOCOL_TAG: &[u8; 9] = b"HueStream";

/// Protocol version 2.0 (major, minor).
const VERSION: [u8; 2] = [0x02, 0x00];

/// Fixed header length, excluding the area identifier.
pub const HEADER_SIZE: usize = 16;

/// Bytes per channel record: id plus three 16-bit components.
pub const RECORD_SIZE: usize = 7;

/// Error type for codec operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// More channels than one message may carry
    #[error("Maximum number of channels is {MAX_CHANNELS}, got {count}")]
    TooManyChannels {
        /// Number of channels in the rejected update
        count: usize,
    },
}

/// Encode one streaming message for an entertainment area.
///
/// The message is a fixed header followed by one record per channel in
/// the update's insertion order; the bridge does not require sorted
/// channel ids. The area identifier is appended raw, with no length
/// prefix, its extent is implied by the total message size.
///
/// Pure and stateless, safe to call from any number of threads.
///
/// # Errors
///
/// Returns [`CodecError::TooManyChannels`] if the update exceeds
/// [`MAX_CHANNELS`] entries. No bytes are produced on failure.
pub fn encode(area_id: &str, update: &ChannelUpdate) -> Result<Bytes, CodecError> {
    if update.len() > MAX_CHANNELS {
        return Err(CodecError::TooManyChannels {
            count: update.len(),
        });
    }

    let mut buf =
        BytesMut::with_capacity(HEADER_SIZE + area_id.len() + RECORD_SIZE * update.len());

    buf.put_slice(PROTOCOL_TAG); // Protocol name.
    buf.put_slice(&VERSION); // Version 2.0.
    buf.put_u8(0x00); // Sequence id, ignored by the bridge.
    buf.put_bytes(0x00, 2); // Reserved.
    buf.put_u8(0x00); // Color space: RGB.
    buf.put_u8(0x00); // Reserved.
    buf.put_slice(area_id.as_bytes()); // Entertainment configuration id.

    for (channel, color) in update.iter() {
        buf.put_u8(channel);
        buf.put_u16(color.red);
        buf.put_u16(color.green);
        buf.put_u16(color.blue);
    }

    Ok(buf.freeze())
}
