//! WOFF container unwrapping
//!
//! WOFF 1.0 wraps each sfnt table in an optional zlib stream. Unwrapping
//! rebuilds a plain sfnt that fontdue and rustybuzz can read.
//! WOFF 2.0 needs Brotli plus glyf/loca reconstruction and is reported as
//! unsupported.
//!
//! Layout reference: <https://www.w3.org/TR/WOFF/>

use flate2::read::ZlibDecoder;
use log::debug;
use std::io::Read;
use thiserror::Error;

const WOFF_SIGNATURE: u32 = 0x774F_4646; // "wOFF"
const WOFF2_SIGNATURE: u32 = 0x774F_4632; // "wOF2"
const WOFF_HEADER_LEN: usize = 44;
const WOFF_ENTRY_LEN: usize = 20;
const SFNT_HEADER_LEN: usize = 12;
const SFNT_ENTRY_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WoffError {
    #[error("WOFF data truncated")]
    Truncated,
    #[error("WOFF2 fonts are not supported")]
    Woff2Unsupported,
    #[error("table {0} failed to decompress")]
    Decompress(String),
    #[error("table {tag}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        tag: String,
        expected: usize,
        actual: usize,
    },
}

/// Container format detected from the leading signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Sfnt,
    Woff,
    Woff2,
}

/// Detect the container from the first four bytes
pub fn detect(data: &[u8]) -> Container {
    match read_u32(data, 0) {
        Some(WOFF_SIGNATURE) => Container::Woff,
        Some(WOFF2_SIGNATURE) => Container::Woff2,
        _ => Container::Sfnt,
    }
}

/// Return sfnt bytes, unwrapping WOFF 1.0 when needed.
pub fn to_sfnt(data: Vec<u8>) -> Result<Vec<u8>, WoffError> {
    match detect(&data) {
        Container::Sfnt => Ok(data),
        Container::Woff => unwrap_woff(&data),
        Container::Woff2 => Err(WoffError::Woff2Unsupported),
    }
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    let b = data.get(at..at + 2)?;
    Some(u16::from_be_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let b = data.get(at..at + 4)?;
    Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

struct TableEntry {
    tag: [u8; 4],
    offset: usize,
    comp_length: usize,
    orig_length: usize,
    orig_checksum: u32,
}

fn unwrap_woff(data: &[u8]) -> Result<Vec<u8>, WoffError> {
    if data.len() < WOFF_HEADER_LEN {
        return Err(WoffError::Truncated);
    }
    let flavor = read_u32(data, 4).ok_or(WoffError::Truncated)?;
    let num_tables = read_u16(data, 12).ok_or(WoffError::Truncated)? as usize;

    let mut entries = Vec::with_capacity(num_tables);
    for i in 0..num_tables {
        let at = WOFF_HEADER_LEN + i * WOFF_ENTRY_LEN;
        let raw = data.get(at..at + WOFF_ENTRY_LEN).ok_or(WoffError::Truncated)?;
        entries.push(TableEntry {
            tag: [raw[0], raw[1], raw[2], raw[3]],
            offset: read_u32(raw, 4).ok_or(WoffError::Truncated)? as usize,
            comp_length: read_u32(raw, 8).ok_or(WoffError::Truncated)? as usize,
            orig_length: read_u32(raw, 12).ok_or(WoffError::Truncated)? as usize,
            orig_checksum: read_u32(raw, 16).ok_or(WoffError::Truncated)?,
        });
    }

    // sfnt offset table
    let mut out = Vec::new();
    out.extend_from_slice(&flavor.to_be_bytes());
    out.extend_from_slice(&(num_tables as u16).to_be_bytes());
    let entry_selector = if num_tables == 0 {
        0
    } else {
        (usize::BITS - 1 - num_tables.leading_zeros()) as u16
    };
    let search_range = 16u16 << entry_selector;
    let range_shift = (num_tables as u16 * 16).saturating_sub(search_range);
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());

    // Table records, then padded table data
    let mut tables = Vec::with_capacity(num_tables);
    let mut offset = SFNT_HEADER_LEN + SFNT_ENTRY_LEN * num_tables;
    for entry in &entries {
        let table = inflate_table(data, entry)?;
        out.extend_from_slice(&entry.tag);
        out.extend_from_slice(&entry.orig_checksum.to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(table.len() as u32).to_be_bytes());
        offset += (table.len() + 3) & !3;
        tables.push(table);
    }
    for table in tables {
        out.extend_from_slice(&table);
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }

    debug!(
        "WOFF unwrapped: {} tables, {} -> {} bytes",
        num_tables,
        data.len(),
        out.len()
    );
    Ok(out)
}

fn inflate_table(data: &[u8], entry: &TableEntry) -> Result<Vec<u8>, WoffError> {
    let tag = String::from_utf8_lossy(&entry.tag).into_owned();
    let raw = data
        .get(entry.offset..entry.offset + entry.comp_length)
        .ok_or(WoffError::Truncated)?;

    // Equal lengths mean the table is stored uncompressed
    if entry.comp_length >= entry.orig_length {
        if entry.comp_length != entry.orig_length {
            return Err(WoffError::LengthMismatch {
                tag,
                expected: entry.orig_length,
                actual: entry.comp_length,
            });
        }
        return Ok(raw.to_vec());
    }

    let mut table = Vec::with_capacity(entry.orig_length);
    ZlibDecoder::new(raw)
        .read_to_end(&mut table)
        .map_err(|_| WoffError::Decompress(tag.clone()))?;
    if table.len() != entry.orig_length {
        return Err(WoffError::LengthMismatch {
            tag,
            expected: entry.orig_length,
            actual: table.len(),
        });
    }
    Ok(table)
}
