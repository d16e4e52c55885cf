//! Decoding markup files that were not necessarily written by us.
//!
//! Tried in order: a BOM (UTF-8, UTF-16LE, UTF-16BE), plain UTF-8, then
//! windows-1252 (which also covers ISO-8859-1 text). Single-byte decoding
//! never reports errors, so text containing NUL is what marks a file as
//! unreadable.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::path::Path;

use super::ExportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMarkup {
    pub text: String,
    pub encoding: &'static Encoding,
}

pub fn decode_markup(bytes: &[u8]) -> Option<DecodedMarkup> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if !had_errors && !text.contains('\0') {
            return Some(DecodedMarkup {
                text: text.into_owned(),
                encoding,
            });
        }
    }

    for encoding in [UTF_8, WINDOWS_1252] {
        let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
        if !had_errors && !text.contains('\0') {
            return Some(DecodedMarkup {
                text: text.into_owned(),
                encoding,
            });
        }
    }
    None
}

pub fn read_markup(path: &Path) -> Result<DecodedMarkup, ExportError> {
    let bytes = std::fs::read(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded =
        decode_markup(&bytes).ok_or_else(|| ExportError::Unreadable(path.to_path_buf()))?;
    if decoded.encoding != UTF_8 {
        log::info!(
            "Decoded {} as {}",
            path.display(),
            decoded.encoding.name()
        );
    }
    Ok(decoded)
}
