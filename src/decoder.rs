//! JIS → Unicode streaming decoder with split-byte carry and SISO
//! shift-state tracking.

use crate::error::Error;
use crate::tables;

/// JIS → Unicode decoder.
///
/// Input may arrive in arbitrary pieces: a lead byte without its trail
/// byte is carried over and combined with the first byte of the next
/// call. In SISO mode the shift bytes `0x0e`/`0x0f` select plane 1 or
/// plane 2; otherwise they are an error like any other control byte.
pub struct Decoder {
	replacement: Option<char>,
	siso: bool,
	shift_offset: u32,
	upper: Option<u8>,
}

impl Decoder {
	/// Creates a decoder. `replacement` is substituted for unassigned
	/// cells; `None` makes them an error.
	pub fn new(replacement: Option<char>, siso: bool) -> Decoder {
		Decoder {
			replacement,
			siso,
			shift_offset: 0,
			upper: None,
		}
	}

	/// Decodes `input`, appending to `out`. Output already appended
	/// survives an error.
	pub fn decode_to(&mut self, out: &mut String, input: &[u8]) -> Result<(), Error> {
		out.reserve(input.len());
		let mut i = 0;
		while i < input.len() {
			let c0 = match self.upper.take() {
				Some(b) => b,
				None => {
					let b = input[i];
					i += 1;
					b
				}
			};
			if (0x21..=0x7e).contains(&c0) {
				if i >= input.len() {
					self.upper = Some(c0);
					return Ok(());
				}
				let c1 = input[i];
				i += 1;
				if !(0x21..=0x7e).contains(&c1) {
					return Err(Error::UnexpectedTrailByte {
						lead: c0,
						byte: c1,
						offset: i.saturating_sub(2),
					});
				}
				let jis = self.shift_offset + (c0 as u32 - 0x21) * 94 + (c1 as u32 - 0x21);
				match tables::mapping(jis).primary() {
					Some((first, second)) => {
						out.push(first);
						if let Some(second) = second {
							out.push(second);
						}
					}
					None => self.append_replacement(out, i.saturating_sub(2))?,
				}
			} else if self.siso && c0 == 0x0e {
				self.shift_offset = 0;
			} else if self.siso && c0 == 0x0f {
				self.shift_offset = 94 * 94;
			} else {
				return Err(Error::UnexpectedByte { byte: c0, offset: i });
			}
		}
		Ok(())
	}

	/// Whether half of a two-byte sequence is buffered from an earlier
	/// call.
	pub fn has_carry(&self) -> bool {
		self.upper.is_some()
	}

	/// Decodes `input` into a fresh string.
	pub fn decode(&mut self, input: &[u8]) -> Result<String, Error> {
		let mut out = String::with_capacity(input.len());
		self.decode_to(&mut out, input)?;
		Ok(out)
	}

	fn append_replacement(&self, out: &mut String, offset: usize) -> Result<(), Error> {
		match self.replacement {
			None => Err(Error::Inconvertible { offset }),
			Some(ch) => {
				out.push(ch);
				Ok(())
			}
		}
	}
}
