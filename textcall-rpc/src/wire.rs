//! Frame layout for textcall connections.
//!
//! Every frame starts with a `u32` length of the bytes that follow it.
//! A request frame carries the call id, the method's wire name, and the
//! payload the method's request codec produced. A response frame carries the
//! call id, a status byte, and the payload the serving side produced. The
//! payload body is whatever the installed codec emits - for `textcall-json`
//! that is UTF-8 JSON text, not a binary message encoding.
//!
//! All integers are big-endian.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::Status;

// call id + method name length
const REQUEST_HEADER_LENGTH: usize = 8 + 2;
// call id + status byte
const RESPONSE_HEADER_LENGTH: usize = 8 + 1;

/// One rpc request on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFrame {
    /// Correlates this request with its response.
    pub call_id: u64,
    /// The wire name the serving side routes on, like `"Greeter/SayHello"`.
    pub method: String,
    /// The encoded request record.
    pub payload: Bytes,
}

/// One rpc response on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    /// The call id of the request this responds to.
    pub call_id: u64,
    /// Outcome of the call attempt.
    pub status: Status,
    /// The encoded response record. Empty for non-success statuses.
    pub payload: Bytes,
}

/// Why a frame could not be read. Frame errors are not recoverable; the
/// connection that produced them is dropped.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The frame is longer than the configured limit.
    #[error("frame of {length} bytes exceeds the {limit} byte limit")]
    Oversized {
        /// Claimed length of the offending frame.
        length: usize,
        /// The configured maximum frame length.
        limit: usize,
    },
    /// The frame is structurally invalid.
    #[error("frame is structurally corrupt")]
    Corrupt,
}

/// Append a request frame to `buffer`.
pub fn encode_request(frame: &RequestFrame, buffer: &mut BytesMut) {
    let method = frame.method.as_bytes();
    let length = REQUEST_HEADER_LENGTH + method.len() + frame.payload.len();
    buffer.reserve(4 + length);
    buffer.put_u32(length as u32);
    buffer.put_u64(frame.call_id);
    buffer.put_u16(method.len() as u16);
    buffer.put_slice(method);
    buffer.put_slice(&frame.payload);
}

/// Append a response frame to `buffer`.
pub fn encode_response(frame: &ResponseFrame, buffer: &mut BytesMut) {
    let length = RESPONSE_HEADER_LENGTH + frame.payload.len();
    buffer.reserve(4 + length);
    buffer.put_u32(length as u32);
    buffer.put_u64(frame.call_id);
    buffer.put_u8(frame.status.as_u8());
    buffer.put_slice(&frame.payload);
}

/// Take one request frame off the front of `buffer`.
///
/// `Ok(None)` means the buffer does not yet hold a complete frame; the bytes
/// are retained and you call again when more arrive.
pub fn decode_request(
    buffer: &mut BytesMut,
    max_frame_length: usize,
) -> Result<Option<RequestFrame>, FrameError> {
    let Some(mut frame) = take_frame(buffer, REQUEST_HEADER_LENGTH, max_frame_length)? else {
        return Ok(None);
    };
    let call_id = frame.get_u64();
    let method_length = frame.get_u16() as usize;
    if frame.remaining() < method_length {
        return Err(FrameError::Corrupt);
    }
    let method =
        String::from_utf8(frame.split_to(method_length).to_vec()).map_err(|_| FrameError::Corrupt)?;
    Ok(Some(RequestFrame {
        call_id,
        method,
        payload: frame.freeze(),
    }))
}

/// Take one response frame off the front of `buffer`.
///
/// `Ok(None)` means the buffer does not yet hold a complete frame; the bytes
/// are retained and you call again when more arrive.
pub fn decode_response(
    buffer: &mut BytesMut,
    max_frame_length: usize,
) -> Result<Option<ResponseFrame>, FrameError> {
    let Some(mut frame) = take_frame(buffer, RESPONSE_HEADER_LENGTH, max_frame_length)? else {
        return Ok(None);
    };
    let call_id = frame.get_u64();
    let status = Status::from_u8(frame.get_u8());
    Ok(Some(ResponseFrame {
        call_id,
        status,
        payload: frame.freeze(),
    }))
}

fn take_frame(
    buffer: &mut BytesMut,
    header_length: usize,
    max_frame_length: usize,
) -> Result<Option<BytesMut>, FrameError> {
    if buffer.len() < 4 {
        return Ok(None);
    }
    let mut peek = &buffer[..];
    let length = peek.get_u32() as usize;
    if length > max_frame_length {
        return Err(FrameError::Oversized {
            length,
            limit: max_frame_length,
        });
    }
    if length < header_length {
        return Err(FrameError::Corrupt);
    }
    if buffer.len() < 4 + length {
        return Ok(None);
    }
    buffer.advance(4);
    Ok(Some(buffer.split_to(length)))
}
