//! Conversion between Unicode and the JIS X 0213 character set, with
//! shrinking transliteration onto JIS X 0208.
//!
//! The mapping tables come from the National Tax Agency shrinking map,
//! which assigns every JIS X 0213 cell a character class and, for cells
//! outside JIS X 0208, a sequence of up to four JIS X 0208 stand-ins
//! (`㉑` → `２１`, `ゔ` → `ヴ`). Encoders emit two printable bytes per
//! cell; in [`ConversionMode::Siso`] plane 2 is reached through the
//! shift bytes `0x0e`/`0x0f`.
//!
//! ```
//! use jntajis::ConversionMode;
//!
//! let bytes = jntajis::encode("ジャンク", ConversionMode::Men1)?;
//! assert_eq!(bytes, [0x25, 0x38, 0x25, 0x63, 0x25, 0x73, 0x25, 0x2f]);
//! assert_eq!(jntajis::decode(&bytes)?, "ジャンク");
//! # Ok::<(), jntajis::Error>(())
//! ```

use std::fmt;

mod data;
mod decoder;
mod encoder;
mod error;
mod tables;

pub use data::CharClass;
pub use decoder::Decoder;
pub use encoder::{Encoder, IncrementalEncoder};
pub use error::Error;

/// How JIS codes are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionMode {
	/// Both planes, with shift-in/shift-out bytes selecting the plane.
	/// Stateful; only the incremental encoder supports it.
	Siso,
	/// Plane 1 only; plane-2 cells are unconvertible.
	Men1,
	/// JIS X 0208 only; cells added by JIS X 0213 are unconvertible.
	Jisx0208,
	/// JIS X 0208, shrinking other cells through their transliteration.
	Translit,
}

impl fmt::Display for ConversionMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ConversionMode::Siso => "SISO",
			ConversionMode::Men1 => "Men1",
			ConversionMode::Jisx0208 => "JISX0208",
			ConversionMode::Translit => "Translit",
		})
	}
}

// The conventional substitute, GETA MARK at 1-2-14.
const GETA: u32 = data::kt(1, 2, 14) as u32;

/// Encodes a string, failing on the first unconvertible scalar.
pub fn encode(input: &str, mode: ConversionMode) -> Result<Vec<u8>, Error> {
	let mut enc = IncrementalEncoder::new(mode, None);
	let mut out = Vec::with_capacity(input.len());
	enc.encode_to(&mut out, input)?;
	enc.flush_to(&mut out)?;
	Ok(out)
}

/// Encodes a string, substituting `〓` for unconvertible scalars.
pub fn encode_lossy(input: &str, mode: ConversionMode) -> Vec<u8> {
	let mut enc = IncrementalEncoder::new(mode, Some(GETA));
	let mut out = Vec::with_capacity(input.len());
	// a configured replacement makes encoding total
	let _ = enc.encode_to(&mut out, input);
	let _ = enc.flush_to(&mut out);
	out
}

/// Decodes a byte slice, honoring shift bytes and failing on the first
/// invalid sequence.
pub fn decode(input: &[u8]) -> Result<String, Error> {
	Decoder::new(None, true).decode(input)
}

/// Decodes a byte slice, substituting `〓` for invalid sequences and
/// unassigned cells.
pub fn decode_lossy(input: &[u8]) -> String {
	let mut dec = Decoder::new(Some('〓'), true);
	let mut out = String::new();
	for &b in input {
		if dec.decode_to(&mut out, &[b]).is_err() {
			out.push('〓');
		}
	}
	if dec.has_carry() {
		out.push('〓');
	}
	out
}
