//! Request and ROM Content Loaders.
//!
//! This module reads the two input files of a simulation run: the request
//! file (CSV, one memory request per row) and the optional ROM content file
//! (one word per line). Request addresses and data are always hexadecimal,
//! with or without a `0x` prefix. Malformed lines are skipped rather than
//! aborting the run; only missing files and oversized ROM content are fatal.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::common::{LoadError, MemoryRequest, WORD_BYTES};
use crate::config::parse_number;

/// Requests parsed from a request file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTrace {
    /// Well-formed requests in file order.
    pub requests: Vec<MemoryRequest>,
    /// Rows that could not be parsed.
    pub skipped: usize,
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the ROM content file at `path`.
///
/// # Arguments
///
/// * `path` - File with one decimal or `0x` hexadecimal word per line
/// * `rom_size` - ROM size in bytes
///
/// # Returns
///
/// The words in file order; word `i` belongs at byte offset `4 * i`.
///
/// # Errors
///
/// [`LoadError::Io`] if the file cannot be read, [`LoadError::RomOverflow`]
/// if it holds more words than the ROM.
pub fn load_rom_content(path: &Path, rom_size: u32) -> Result<Vec<u32>, LoadError> {
    let words = parse_rom_content(&read_file(path)?);
    let capacity = (rom_size / WORD_BYTES) as usize;
    if words.len() > capacity {
        return Err(LoadError::RomOverflow {
            words: words.len(),
            capacity,
        });
    }
    info!("loaded {} ROM words from {}", words.len(), path.display());
    Ok(words)
}

/// Parses ROM content text, skipping lines that are not numbers.
pub fn parse_rom_content(text: &str) -> Vec<u32> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match parse_number::<u32>(line) {
            Ok(word) => Some(word),
            Err(_) => {
                debug!("skipping ROM content line '{line}'");
                None
            }
        })
        .collect()
}

/// Loads the request file at `path`.
///
/// # Errors
///
/// [`LoadError::Io`] if the file cannot be read,
/// [`LoadError::EmptyRequestFile`] if it has no header row.
pub fn load_requests(path: &Path) -> Result<RequestTrace, LoadError> {
    let text = read_file(path)?;
    if text.trim().is_empty() {
        return Err(LoadError::EmptyRequestFile(path.to_path_buf()));
    }
    let trace = parse_requests(&text);
    info!(
        "loaded {} requests from {} ({} rows skipped)",
        trace.requests.len(),
        path.display(),
        trace.skipped
    );
    Ok(trace)
}

/// Parses request file text. The first line is a header and is ignored.
pub fn parse_requests(text: &str) -> RequestTrace {
    let mut trace = RequestTrace::default();
    for (lineno, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Some(req) => trace.requests.push(req),
            None => {
                debug!("skipping malformed request row {}: '{}'", lineno + 1, line);
                trace.skipped += 1;
            }
        }
    }
    trace
}

/// Parses one `type,addr,data,user,wide` row.
fn parse_row(line: &str) -> Option<MemoryRequest> {
    let fields: Vec<&str> = line
        .split(',')
        .map(|f| f.trim().trim_matches('"').trim())
        .collect();
    let [kind, addr, data, user, wide] = fields.as_slice() else {
        return None;
    };

    let address = parse_hex(addr)?;
    let user = parse_number::<u8>(user).ok()?;
    let wide = parse_flag(wide)?;

    match kind.to_ascii_uppercase().as_str() {
        "R" => Some(MemoryRequest::read(address, wide, user)),
        "W" => {
            let data = parse_hex(data)?;
            Some(MemoryRequest::write(address, data, wide, user))
        }
        _ => None,
    }
}

/// Parses a base-16 field; `1000` and `0x1000` are the same value.
fn parse_hex(field: &str) -> Option<u32> {
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

fn parse_flag(field: &str) -> Option<bool> {
    match field.to_ascii_uppercase().as_str() {
        "T" | "TRUE" => Some(true),
        "F" | "FALSE" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_requests, parse_rom_content};
    use crate::common::MemoryRequest;

    #[test]
    fn parses_quoted_hex_rows() {
        let trace = parse_requests(
            "\"type\",\"addr\",\"data\",\"user\",\"wide\"\n\
             \"W\",\"0x1000\",\"0xAABBCCDD\",\"5\",\"T\"\n\
             \"r\",\"1000\",\"\",\"6\",\"t\"\n",
        );
        assert_eq!(trace.skipped, 0);
        assert_eq!(
            trace.requests,
            vec![
                MemoryRequest::write(0x1000, 0xAABB_CCDD, true, 5),
                MemoryRequest::read(0x1000, true, 6),
            ]
        );
    }

    #[test]
    fn bare_address_and_data_are_hex() {
        let trace = parse_requests(
            "type,address,data,user,wide\n\
             R,1000,0,5,T\n\
             W,ff,AB,5,F\n",
        );
        assert_eq!(trace.skipped, 0);
        assert_eq!(
            trace.requests,
            vec![
                MemoryRequest::read(0x1000, true, 5),
                MemoryRequest::write(0xff, 0xAB, false, 5),
            ]
        );
    }

    #[test]
    fn signed_or_oversized_hex_is_rejected() {
        let trace = parse_requests(
            "type,addr,data,user,wide\n\
             R,+10,0,1,T\n\
             W,10,-1,1,T\n\
             R,100000000,0,1,T\n",
        );
        assert_eq!(trace.skipped, 3);
        assert!(trace.requests.is_empty());
    }

    #[test]
    fn malformed_rows_are_counted_and_skipped() {
        let trace = parse_requests(
            "type,addr,data,user,wide\n\
             X,0,0,1,T\n\
             W,0x10,zz,1,F\n\
             R,0x10,0,300,F\n\
             R,0x10,0,1\n\
             \n\
             R,0x10,0,1,F\n",
        );
        assert_eq!(trace.skipped, 4);
        assert_eq!(trace.requests, vec![MemoryRequest::read(0x10, false, 1)]);
    }

    #[test]
    fn rom_content_skips_unparsable_lines() {
        assert_eq!(
            parse_rom_content("0x12345678\n\nnot a number\n42\n"),
            vec![0x1234_5678, 42]
        );
    }
}
