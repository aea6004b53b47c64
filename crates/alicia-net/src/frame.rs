//! Partial-frame tolerant byte-level framing: turns an accumulating
//! receive buffer into zero-or-more complete `(command id, body)`
//! frames, leaving unconsumed trailing bytes in place for the next
//! read.

use bytes::{Buf, BytesMut};

use alicia_protocol::error::CodecError;
use alicia_protocol::magic;
use alicia_protocol::scramble::MESSENGER_XOR_KEY;

/// The Messenger frame header is a plain `[length:u16][command_id:u16]`
/// pair (unlike Lobby/Ranch/Race's obfuscated magic), but it is itself
/// XORed with the fixed Messenger key, so it must be decrypted before
/// its fields can be read.
const MESSENGER_HEADER_LEN: usize = 4;

/// One fully-received frame, with the magic header already stripped
/// and decoded but the body left scrambled (the caller applies the
/// connection's keystream, since that requires mutable rolling state
/// this module doesn't own).
#[derive(Debug, PartialEq, Eq)]
pub struct RawFrame {
    pub command_id: u16,
    pub body: Vec<u8>,
}

/// Attempts to extract one frame from the front of `buf`.
///
/// Returns `Ok(None)` if `buf` doesn't yet hold a complete frame (the
/// caller should read more bytes and retry with the same, unmodified
/// buffer). Returns `Ok(Some((frame, consumed)))` on success, where
/// `consumed` is the number of bytes to drop from the front of `buf`.
pub fn try_extract_frame(buf: &[u8]) -> Result<Option<(RawFrame, usize)>, CodecError> {
    if buf.len() < magic::FRAME_HEADER_LEN {
        return Ok(None);
    }

    let magic_bytes: [u8; 4] = buf[..magic::FRAME_HEADER_LEN].try_into().expect("checked above");
    let magic_value = u32::from_le_bytes(magic_bytes);
    let (command_id, total_length) = magic::decode_magic(magic_value)?;

    if buf.len() < total_length as usize {
        return Ok(None);
    }

    let body = buf[magic::FRAME_HEADER_LEN..total_length as usize].to_vec();
    Ok(Some((RawFrame { command_id, body }, total_length as usize)))
}

/// As [`try_extract_frame`], but for the Messenger listener's distinct
/// wire shape (see §4.1.3): a plain `length`/`command_id` header rather
/// than an obfuscated magic, with the header itself (not just the
/// payload) XORed under the fixed Messenger key. `length` covers the
/// whole frame, header included, same as the magic format.
pub fn try_extract_messenger_frame(buf: &[u8]) -> Result<Option<(RawFrame, usize)>, CodecError> {
    if buf.len() < MESSENGER_HEADER_LEN {
        return Ok(None);
    }

    let mut header = [0u8; MESSENGER_HEADER_LEN];
    header.copy_from_slice(&buf[..MESSENGER_HEADER_LEN]);
    for (i, byte) in header.iter_mut().enumerate() {
        *byte ^= MESSENGER_XOR_KEY[i % 4];
    }
    let total_length = u16::from_le_bytes([header[0], header[1]]);
    let command_id = u16::from_le_bytes([header[2], header[3]]);

    if (total_length as usize) < MESSENGER_HEADER_LEN {
        return Err(CodecError::FrameTooLarge { length: total_length as u32, max: magic::MAX_FRAME_LEN as u32 });
    }
    if buf.len() < total_length as usize {
        return Ok(None);
    }

    // The payload stays under the fixed key's keystream; the caller's
    // `ConnectionCodec` continues the phase from offset 4 so it
    // descrambles as one contiguous stream with the header.
    let body = buf[MESSENGER_HEADER_LEN..total_length as usize].to_vec();
    Ok(Some((RawFrame { command_id, body }, total_length as usize)))
}

/// Drains every complete frame currently buffered in `buf`, leaving
/// any leftover partial frame in place at the front. Returns the
/// frames in arrival order.
pub fn drain_frames(buf: &mut BytesMut) -> Result<Vec<RawFrame>, CodecError> {
    drain_with(buf, try_extract_frame)
}

/// As [`drain_frames`], but using the Messenger listener's distinct
/// frame shape.
pub fn drain_messenger_frames(buf: &mut BytesMut) -> Result<Vec<RawFrame>, CodecError> {
    drain_with(buf, try_extract_messenger_frame)
}

fn drain_with(
    buf: &mut BytesMut,
    extract: impl Fn(&[u8]) -> Result<Option<(RawFrame, usize)>, CodecError>,
) -> Result<Vec<RawFrame>, CodecError> {
    let mut frames = Vec::new();

    loop {
        match extract(&buf[..])? {
            Some((frame, consumed)) => {
                buf.advance(consumed);
                frames.push(frame);
            }
            None => break,
        }
    }

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alicia_protocol::magic::encode_magic;

    fn frame_bytes(id: u16, body: &[u8]) -> Vec<u8> {
        let total_len = (body.len() + magic::FRAME_HEADER_LEN) as u16;
        let magic_value = encode_magic(id, total_len).unwrap();
        let mut out = magic_value.to_le_bytes().to_vec();
        out.extend_from_slice(body);
        out
    }

    #[test]
    fn single_frame_fully_buffered() {
        let bytes = frame_bytes(7, b"hello");
        let (frame, consumed) = try_extract_frame(&bytes).unwrap().unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(frame.command_id, 7);
        assert_eq!(frame.body, b"hello");
    }

    #[test]
    fn partial_frame_returns_none() {
        let bytes = frame_bytes(7, b"hello world");
        assert!(try_extract_frame(&bytes[..bytes.len() - 1]).unwrap().is_none());
        assert!(try_extract_frame(&bytes[..2]).unwrap().is_none());
    }

    #[test]
    fn drain_frames_leaves_partial_tail() {
        let mut raw = frame_bytes(1, b"first");
        raw.extend(frame_bytes(2, b"second"));
        let mut tail = frame_bytes(3, b"third-partial-body");
        tail.truncate(tail.len() - 3);
        raw.extend_from_slice(&tail);

        let mut buf = BytesMut::from(&raw[..]);
        let frames = drain_frames(&mut buf).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].command_id, 1);
        assert_eq!(frames[1].command_id, 2);
        assert_eq!(&buf[..], &tail[..]);
    }

    fn messenger_frame_bytes(id: u16, body: &[u8]) -> Vec<u8> {
        let total_len = (body.len() + MESSENGER_HEADER_LEN) as u16;
        let mut header = [
            total_len.to_le_bytes()[0],
            total_len.to_le_bytes()[1],
            id.to_le_bytes()[0],
            id.to_le_bytes()[1],
        ];
        for (i, byte) in header.iter_mut().enumerate() {
            *byte ^= MESSENGER_XOR_KEY[i % 4];
        }
        let mut out = header.to_vec();
        out.extend_from_slice(body);
        out
    }

    #[test]
    fn messenger_single_frame_fully_buffered() {
        let bytes = messenger_frame_bytes(42, b"hello");
        let (frame, consumed) = try_extract_messenger_frame(&bytes).unwrap().unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(frame.command_id, 42);
        assert_eq!(frame.body, b"hello");
    }

    #[test]
    fn messenger_partial_frame_returns_none() {
        let bytes = messenger_frame_bytes(42, b"hello world");
        assert!(try_extract_messenger_frame(&bytes[..bytes.len() - 1]).unwrap().is_none());
        assert!(try_extract_messenger_frame(&bytes[..2]).unwrap().is_none());
    }

    #[test]
    fn drain_messenger_frames_leaves_partial_tail() {
        let mut raw = messenger_frame_bytes(1, b"first");
        raw.extend(messenger_frame_bytes(2, b"second"));
        let mut tail = messenger_frame_bytes(3, b"third-partial-body");
        tail.truncate(tail.len() - 3);
        raw.extend_from_slice(&tail);

        let mut buf = BytesMut::from(&raw[..]);
        let frames = drain_messenger_frames(&mut buf).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].command_id, 1);
        assert_eq!(frames[1].command_id, 2);
        assert_eq!(&buf[..], &tail[..]);
    }
}
