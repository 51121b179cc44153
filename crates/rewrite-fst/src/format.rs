// Rule archive binary format: header parsing, validation

use crate::FstError;

/// Archive header magic constants (little-endian).
pub(crate) const COOKIE1: u32 = 0x5257_4641;
pub(crate) const COOKIE2: u32 = 0x0001_F57A;

/// Size of the archive header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Weight type code for tropical (`f32`, min/+) archives.
pub const WEIGHT_TYPE_TROPICAL: u8 = 1;

/// Format version written by this crate.
pub const FORMAT_VERSION: u8 = 1;

/// Parsed archive header.
///
/// The header occupies the first 16 bytes of an archive:
/// - bytes 0..4: cookie1 (magic number)
/// - bytes 4..8: cookie2 (magic number)
/// - byte 8: weight type (`1` = tropical)
/// - byte 9: format version
/// - bytes 10..16: reserved (written as zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub weight_type: u8,
    pub version: u8,
}

/// Parses and validates the 16-byte archive header.
pub fn parse_header(data: &[u8]) -> Result<ArchiveHeader, FstError> {
    if data.len() < HEADER_SIZE {
        return Err(FstError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    let cookie1 = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let cookie2 = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if cookie1 != COOKIE1 || cookie2 != COOKIE2 {
        return Err(FstError::InvalidMagic);
    }

    let header = ArchiveHeader {
        weight_type: data[8],
        version: data[9],
    };
    if header.weight_type != WEIGHT_TYPE_TROPICAL {
        return Err(FstError::UnsupportedWeightType(header.weight_type));
    }
    if header.version != FORMAT_VERSION {
        return Err(FstError::UnsupportedVersion(header.version));
    }
    Ok(header)
}

/// Append a tropical, current-version header to `buf`.
pub fn write_header(buf: &mut Vec<u8>) {
    buf.extend_from_slice(&COOKIE1.to_le_bytes());
    buf.extend_from_slice(&COOKIE2.to_le_bytes());
    buf.push(WEIGHT_TYPE_TROPICAL);
    buf.push(FORMAT_VERSION);
    buf.extend_from_slice(&[0u8; HEADER_SIZE - 10]);
}
