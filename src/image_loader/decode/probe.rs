//! Signature and IHDR inspection ahead of the decoder.
//!
//! The bytes consumed here are kept so the decoder can be fed the complete stream.

use std::io::{self, Read};

use tracing::debug;

use crate::image_loader::common::error::{LoadError, Result};
use crate::image_loader::decode::types::ColorKind;

/// The 8-byte magic every PNG stream starts with
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Chunk length (4) + chunk type (4) + IHDR payload (13)
const IHDR_PREFIX_LEN: usize = 21;

/// Offset of the color type byte inside the IHDR prefix
const COLOR_TYPE_OFFSET: usize = 17;

/// Result of a successful probe
#[derive(Debug)]
pub struct Probe {
    prefix: Vec<u8>,
    color: ColorKind,
}

impl Probe {
    pub fn color(&self) -> ColorKind {
        self.color
    }

    /// Everything read from the source so far, signature included.
    pub fn into_prefix(self) -> Vec<u8> {
        self.prefix
    }
}

pub fn is_png_signature(bytes: &[u8]) -> bool {
    bytes.len() >= PNG_SIGNATURE.len() && bytes[..PNG_SIGNATURE.len()] == PNG_SIGNATURE
}

/// Reads and validates the signature, then peeks the IHDR color type.
pub fn probe(source: &mut dyn Read) -> Result<Probe> {
    let mut prefix = vec![0u8; PNG_SIGNATURE.len() + IHDR_PREFIX_LEN];

    let (signature, ihdr) = prefix.split_at_mut(PNG_SIGNATURE.len());
    source.read_exact(signature).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            LoadError::InvalidFormat("stream is shorter than the PNG signature".to_string())
        }
        _ => LoadError::DecodeError(e.to_string()),
    })?;

    if !is_png_signature(signature) {
        return Err(LoadError::InvalidFormat(format!(
            "bad signature {:02X?}",
            signature
        )));
    }

    source.read_exact(ihdr).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            LoadError::DecodeError("stream ends inside the IHDR chunk".to_string())
        }
        _ => LoadError::DecodeError(e.to_string()),
    })?;

    if &ihdr[4..8] != b"IHDR" {
        return Err(LoadError::DecodeError(format!(
            "first chunk is {:?}, expected IHDR",
            String::from_utf8_lossy(&ihdr[4..8])
        )));
    }

    let color = ColorKind::from_code(ihdr[COLOR_TYPE_OFFSET])?;
    debug!("Probed PNG header, color type {:?}", color);

    Ok(Probe { prefix, color })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header_bytes(color_type: u8) -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&[8, color_type, 0, 0, 0]);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes
    }

    #[test]
    fn keeps_consumed_bytes() {
        let bytes = header_bytes(2);
        let probe = probe(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(probe.color(), ColorKind::Rgb);
        assert_eq!(probe.into_prefix(), bytes[..29].to_vec());
    }

    #[test]
    fn flipped_signature_byte() {
        let mut bytes = header_bytes(2);
        bytes[1] ^= 0xFF;
        let result = probe(&mut Cursor::new(&bytes));
        assert!(matches!(result.unwrap_err(), LoadError::InvalidFormat(_)));
    }

    #[test]
    fn short_stream() {
        let result = probe(&mut Cursor::new(&PNG_SIGNATURE[..5]));
        assert!(matches!(result.unwrap_err(), LoadError::InvalidFormat(_)));
    }

    #[test]
    fn reserved_color_type() {
        let result = probe(&mut Cursor::new(header_bytes(7)));
        assert!(matches!(result.unwrap_err(), LoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_ihdr() {
        let mut bytes = header_bytes(2);
        bytes[12..16].copy_from_slice(b"IDAT");
        let result = probe(&mut Cursor::new(&bytes));
        assert!(matches!(result.unwrap_err(), LoadError::DecodeError(_)));
    }
}
