// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cartridge image inspection
//!
//! Cartridge dumps come in three byte orders, distinguished by the 32-bit
//! big-endian magic at offset 0:
//!
//! | Magic        | Format | Byte order                        |
//! |--------------|--------|-----------------------------------|
//! | `0x80371240` | z64    | Big-endian (native)               |
//! | `0x40123780` | n64    | Little-endian (4-byte groups)     |
//! | `0x37804012` | v64    | Byte-swapped (16-bit pairs)       |
//!
//! Images are normalized to big-endian before they are mapped.
//!
//! # Header Layout (normalized)
//!
//! ```text
//! 0x00-0x03: Magic
//! 0x04-0x07: Clock rate
//! 0x08-0x0B: Boot address
//! 0x0C-0x0F: Release
//! 0x10-0x17: CRC1, CRC2
//! 0x20-0x33: Image name (ASCII, 20 bytes)
//! 0x38-0x3B: Manufacturer ID
//! 0x3C-0x3D: Cartridge ID
//! 0x3E:      Country code
//! 0x3F:      Version
//! ```
//!
//! # Example
//!
//! ```
//! use mipsemu::core::cartridge::{Cartridge, Endianness};
//!
//! let mut image = vec![0u8; 0x1000];
//! image[0..4].copy_from_slice(&0x8037_1240u32.to_be_bytes());
//! image[0x08..0x0C].copy_from_slice(&0x8000_0400u32.to_be_bytes());
//! image[0x20..0x24].copy_from_slice(b"DEMO");
//!
//! let cart = Cartridge::load(image).unwrap();
//! assert_eq!(cart.header.endianness, Endianness::Big);
//! assert_eq!(cart.header.boot_address, 0x8000_0400);
//! assert_eq!(cart.header.name, "DEMO");
//! ```

use super::error::{EmulatorError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Byte order of a cartridge dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endianness {
    /// z64: already big-endian
    Big,
    /// n64: little-endian words
    Little,
    /// v64: byte-swapped half-words
    ByteSwapped,
}

impl Endianness {
    /// Magic of a big-endian (z64) image
    pub const MAGIC_BIG: u32 = 0x8037_1240;
    /// Magic of a little-endian (n64) image
    pub const MAGIC_LITTLE: u32 = 0x4012_3780;
    /// Magic of a byte-swapped (v64) image
    pub const MAGIC_BYTE_SWAPPED: u32 = 0x3780_4012;

    /// Detect the byte order from the raw magic word
    pub fn detect(magic: u32) -> Option<Self> {
        match magic {
            Self::MAGIC_BIG => Some(Self::Big),
            Self::MAGIC_LITTLE => Some(Self::Little),
            Self::MAGIC_BYTE_SWAPPED => Some(Self::ByteSwapped),
            _ => None,
        }
    }

    /// Convert `data` from this byte order to big-endian
    ///
    /// A trailing partial group (fewer than 4 bytes for `Little`, a single
    /// byte for `ByteSwapped`) is copied unchanged.
    pub fn to_big_endian(self, data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        match self {
            Self::Big => {}
            Self::Little => {
                for word in out.chunks_exact_mut(4) {
                    word.reverse();
                }
            }
            Self::ByteSwapped => {
                for pair in out.chunks_exact_mut(2) {
                    pair.swap(0, 1);
                }
            }
        }
        out
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Big => "big",
            Self::Little => "little",
            Self::ByteSwapped => "byteswap",
        };
        f.write_str(name)
    }
}

/// Parsed cartridge header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RomHeader {
    /// Byte order of the original dump
    pub endianness: Endianness,
    /// Clock rate override
    pub clock_rate: u32,
    /// Boot address (initial PC)
    pub boot_address: u32,
    /// Release field
    pub release: u32,
    /// First checksum word
    pub crc1: u32,
    /// Second checksum word
    pub crc2: u32,
    /// Image name, trailing NULs and spaces removed
    pub name: String,
    /// Manufacturer ID
    pub manufacturer: u32,
    /// Cartridge ID
    pub cartridge_id: u16,
    /// Country code character
    pub country_code: char,
    /// Country name looked up from the code
    pub country: String,
    /// Version byte
    pub version: u8,
    /// Four-character game ID (0x3B-0x3E)
    pub game_id: String,
    /// SHA-256 of the first 0x100 normalized bytes, lowercase hex
    pub fingerprint: String,
    /// Normalized header bytes (first 0x40 bytes)
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl RomHeader {
    /// Minimum image size holding a complete header
    pub const HEADER_SIZE: usize = 0x40;

    /// Number of bytes covered by the fingerprint
    const FINGERPRINT_LEN: usize = 0x100;

    /// Parse a header from a raw (not yet normalized) image prefix
    ///
    /// # Errors
    ///
    /// - [`EmulatorError::RomTooSmall`] if fewer than 0x40 bytes are given
    /// - [`EmulatorError::InvalidRomMagic`] if the magic is not recognized
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let endianness = detect_endianness(raw)?;
        let prefix_len = raw.len().min(Self::FINGERPRINT_LEN);
        let normalized = endianness.to_big_endian(&raw[..prefix_len]);
        Ok(Self::from_normalized(endianness, &normalized))
    }

    /// Build the header from already-normalized bytes
    ///
    /// `data` must hold at least [`HEADER_SIZE`](Self::HEADER_SIZE) bytes.
    fn from_normalized(endianness: Endianness, data: &[u8]) -> Self {
        let name = data[0x20..0x34]
            .iter()
            .filter(|b| b.is_ascii())
            .map(|&b| b as char)
            .collect::<String>()
            .trim_end_matches(['\0', ' '])
            .trim_start_matches('\0')
            .to_string();

        let game_id = data[0x3B..0x3F]
            .iter()
            .filter(|b| b.is_ascii())
            .map(|&b| b as char)
            .collect();

        let country_code = data[0x3E] as char;

        let fingerprint_len = data.len().min(Self::FINGERPRINT_LEN);
        let digest = Sha256::digest(&data[..fingerprint_len]);
        let fingerprint = digest.iter().map(|b| format!("{:02x}", b)).collect();

        Self {
            endianness,
            clock_rate: be_u32(data, 0x04),
            boot_address: be_u32(data, 0x08),
            release: be_u32(data, 0x0C),
            crc1: be_u32(data, 0x10),
            crc2: be_u32(data, 0x14),
            name,
            manufacturer: be_u32(data, 0x38),
            cartridge_id: u16::from_be_bytes([data[0x3C], data[0x3D]]),
            country_code,
            country: country_name(country_code).to_string(),
            version: data[0x3F],
            game_id,
            fingerprint,
            bytes: data[..Self::HEADER_SIZE].to_vec(),
        }
    }
}

/// A validated, normalized cartridge image
#[derive(Debug, Clone)]
pub struct Cartridge {
    /// Parsed header
    pub header: RomHeader,
    /// Full image in big-endian byte order
    pub image: Vec<u8>,
}

impl Cartridge {
    /// Validate and normalize a raw cartridge dump
    ///
    /// Nothing is mapped here; the caller hands `image` to the bus once the
    /// load succeeded.
    pub fn load(raw: Vec<u8>) -> Result<Self> {
        let endianness = detect_endianness(&raw)?;
        let image = match endianness {
            Endianness::Big => raw,
            other => other.to_big_endian(&raw),
        };
        let header = RomHeader::from_normalized(endianness, &image);

        log::info!(
            "Cartridge: \"{}\" ({}), {} bytes, boot=0x{:08X}, country={}",
            header.name,
            header.endianness,
            image.len(),
            header.boot_address,
            header.country
        );

        Ok(Self { header, image })
    }
}

/// Map a country code to its display name
pub fn country_name(code: char) -> &'static str {
    match code {
        'A' => "All/Demo",
        'D' => "Germany",
        'E' => "USA",
        'F' => "France",
        'I' => "Italy",
        'J' => "Japan",
        'S' => "Spain",
        'U' => "Australia",
        'P' => "Europe",
        'N' => "Canada",
        'X' => "Europe (X)",
        'Y' => "Europe (Y)",
        'Z' => "Europe (Z)",
        _ => "Unknown",
    }
}

fn detect_endianness(raw: &[u8]) -> Result<Endianness> {
    if raw.len() < RomHeader::HEADER_SIZE {
        return Err(EmulatorError::RomTooSmall {
            expected: RomHeader::HEADER_SIZE,
            got: raw.len(),
        });
    }
    let magic = be_u32(raw, 0);
    Endianness::detect(magic).ok_or(EmulatorError::InvalidRomMagic { magic })
}

#[inline]
fn be_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a big-endian header with a name and boot address
    fn z64_header(name: &[u8], boot: u32) -> Vec<u8> {
        let mut data = vec![0u8; 0x1000];
        data[0..4].copy_from_slice(&Endianness::MAGIC_BIG.to_be_bytes());
        data[0x04..0x08].copy_from_slice(&0x0000_000Fu32.to_be_bytes());
        data[0x08..0x0C].copy_from_slice(&boot.to_be_bytes());
        data[0x10..0x14].copy_from_slice(&0x1234_5678u32.to_be_bytes());
        data[0x14..0x18].copy_from_slice(&0x9ABC_DEF0u32.to_be_bytes());
        data[0x20..0x20 + name.len()].copy_from_slice(name);
        data[0x3B..0x3F].copy_from_slice(b"NSME");
        data[0x3F] = 2;
        data
    }

    fn to_n64(data: &[u8]) -> Vec<u8> {
        data.chunks(4)
            .flat_map(|w| w.iter().rev().copied().collect::<Vec<_>>())
            .collect()
    }

    fn to_v64(data: &[u8]) -> Vec<u8> {
        data.chunks(2).flat_map(|p| [p[1], p[0]]).collect()
    }

    #[test]
    fn test_parse_big_endian() {
        let data = z64_header(b"SUPER DEMO          ", 0x8000_0400);
        let header = RomHeader::parse(&data).unwrap();

        assert_eq!(header.endianness, Endianness::Big);
        assert_eq!(header.clock_rate, 0x0F);
        assert_eq!(header.boot_address, 0x8000_0400);
        assert_eq!(header.crc1, 0x1234_5678);
        assert_eq!(header.crc2, 0x9ABC_DEF0);
        assert_eq!(header.name, "SUPER DEMO");
        assert_eq!(header.game_id, "NSME");
        assert_eq!(header.country_code, 'E');
        assert_eq!(header.country, "USA");
        assert_eq!(header.version, 2);
        assert_eq!(header.bytes, data[..0x40].to_vec());
    }

    #[test]
    fn test_little_endian_is_reordered() {
        let native = z64_header(b"LITTLE", 0x8000_1000);
        let raw = to_n64(&native);
        assert_eq!(&raw[0..4], &[0x40, 0x12, 0x37, 0x80]);

        let header = RomHeader::parse(&raw).unwrap();
        assert_eq!(header.endianness, Endianness::Little);
        assert_eq!(header.name, "LITTLE");
        assert_eq!(header.boot_address, 0x8000_1000);
        // Reordered in 4-byte groups relative to the raw input
        for (i, chunk) in raw[..0x40].chunks(4).enumerate() {
            let mut reversed = chunk.to_vec();
            reversed.reverse();
            assert_eq!(&header.bytes[i * 4..i * 4 + 4], reversed.as_slice());
        }
    }

    #[test]
    fn test_byte_swapped_is_reordered() {
        let native = z64_header(b"SWAPPED", 0x8000_2000);
        let raw = to_v64(&native);
        assert_eq!(&raw[0..4], &[0x37, 0x80, 0x40, 0x12]);

        let header = RomHeader::parse(&raw).unwrap();
        assert_eq!(header.endianness, Endianness::ByteSwapped);
        assert_eq!(header.name, "SWAPPED");
        assert_eq!(header.bytes, native[..0x40].to_vec());
    }

    #[test]
    fn test_fingerprint_independent_of_dump_format() {
        let native = z64_header(b"FINGER", 0x8000_0000);
        let a = RomHeader::parse(&native).unwrap();
        let b = RomHeader::parse(&to_n64(&native)).unwrap();
        let c = RomHeader::parse(&to_v64(&native)).unwrap();

        assert_eq!(a.fingerprint.len(), 64);
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.fingerprint, c.fingerprint);
    }

    #[test]
    fn test_invalid_magic() {
        let mut data = z64_header(b"BAD", 0);
        data[0..4].copy_from_slice(&0xDEAD_BEEFu32.to_be_bytes());

        match RomHeader::parse(&data) {
            Err(EmulatorError::InvalidRomMagic { magic }) => assert_eq!(magic, 0xDEAD_BEEF),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(Cartridge::load(data).is_err());
    }

    #[test]
    fn test_too_small() {
        let result = RomHeader::parse(&[0x80, 0x37, 0x12, 0x40]);
        assert!(matches!(
            result,
            Err(EmulatorError::RomTooSmall { expected: 0x40, got: 4 })
        ));
    }

    #[test]
    fn test_cartridge_load_normalizes_whole_image() {
        let mut native = z64_header(b"WHOLE", 0x8000_0400);
        native[0x800..0x804].copy_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);

        let cart = Cartridge::load(to_n64(&native)).unwrap();
        assert_eq!(cart.image, native);

        let cart = Cartridge::load(to_v64(&native)).unwrap();
        assert_eq!(cart.image, native);
    }

    #[test]
    fn test_trailing_partial_group_kept() {
        let data = [1u8, 2, 3, 4, 5, 6, 7];
        assert_eq!(
            Endianness::Little.to_big_endian(&data),
            vec![4, 3, 2, 1, 5, 6, 7]
        );
        assert_eq!(
            Endianness::ByteSwapped.to_big_endian(&data),
            vec![2, 1, 4, 3, 6, 5, 7]
        );
    }

    #[test]
    fn test_country_table() {
        assert_eq!(country_name('J'), "Japan");
        assert_eq!(country_name('P'), "Europe");
        assert_eq!(country_name('Y'), "Europe (Y)");
        assert_eq!(country_name('?'), "Unknown");
    }

    #[test]
    fn test_endianness_display() {
        assert_eq!(Endianness::Big.to_string(), "big");
        assert_eq!(Endianness::Little.to_string(), "little");
        assert_eq!(Endianness::ByteSwapped.to_string(), "byteswap");
    }
}
