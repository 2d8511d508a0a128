//! Unicode → JIS encoders: the single-call batch encoder and the
//! chunked incremental encoder with SISO shift state.

use crate::error::Error;
use crate::tables::{self, qualifies_jisx0208};
use crate::ConversionMode;

const SHIFT_IN: u8 = 0x0e;
const SHIFT_OUT: u8 = 0x0f;
const PLANE_CELLS: u32 = 94 * 94;

fn put_raw(out: &mut Vec<u8>, jis: u32) {
	out.push(0x21 + (jis / 94 % 94) as u8);
	out.push(0x21 + (jis % 94) as u8);
}

/// Plane-1 writer: rejects plane-2 cells.
fn put_men1(out: &mut Vec<u8>, jis: u32) -> bool {
	if jis / PLANE_CELLS != 0 {
		return false;
	}
	put_raw(out, jis);
	true
}

/// JIS X 0208 writer: rejects cells outside the 0208 classes.
fn put_jisx0208(out: &mut Vec<u8>, jis: u32) -> bool {
	if jis as usize >= tables::JIS_CELLS || !qualifies_jisx0208(tables::mapping(jis).class) {
		return false;
	}
	put_raw(out, jis);
	true
}

/// Transliterating writer: JIS X 0208 cells pass through, everything
/// else shrinks through its transliteration sequence.
fn put_translit(out: &mut Vec<u8>, jis: u32) -> bool {
	if jis as usize >= tables::JIS_CELLS {
		return false;
	}
	let m = tables::mapping(jis);
	if qualifies_jisx0208(m.class) {
		put_raw(out, jis);
		return true;
	}
	if m.tx_len == 0 {
		return false;
	}
	for (i, &t) in m.tx_jis[..m.tx_len as usize].iter().enumerate() {
		// the generated scalar mirror stays in sync with the target cells
		debug_assert_eq!(m.tx_runes[i], tables::mapping(t).runes[0]);
		put_raw(out, t);
	}
	true
}

/// Chunked Unicode → JIS encoder.
///
/// Input may arrive in arbitrary pieces; a combining-pair lead is
/// buffered across calls until the next scalar resolves it or
/// [`flush_to`](Self::flush_to) drains it. In [`ConversionMode::Siso`]
/// the encoder tracks the shift state and `flush_to` returns the
/// stream to plane 1.
pub struct IncrementalEncoder {
	mode: ConversionMode,
	replacement: Option<u32>,
	shift_state: u32,
	lookahead: Vec<char>,
	state: i32,
}

impl IncrementalEncoder {
	/// Creates an encoder. `replacement` is the plane-1 cell substituted
	/// for unconvertible scalars; `None` makes them an error.
	pub fn new(mode: ConversionMode, replacement: Option<u32>) -> IncrementalEncoder {
		IncrementalEncoder {
			mode,
			replacement,
			shift_state: 0,
			lookahead: Vec::with_capacity(2),
			state: 0,
		}
	}

	/// Encodes `input`, appending to `out`. Output already appended
	/// survives an error.
	pub fn encode_to(&mut self, out: &mut Vec<u8>, input: &str) -> Result<(), Error> {
		out.reserve(input.len());
		for ch in input.chars() {
			self.push_char(out, ch)?;
		}
		Ok(())
	}

	/// Encodes `input` into a fresh byte vec.
	pub fn encode(&mut self, input: &str) -> Result<Vec<u8>, Error> {
		let mut out = Vec::with_capacity(input.len());
		self.encode_to(&mut out, input)?;
		Ok(out)
	}

	/// Drains any buffered lead through the single-scalar path and, in
	/// SISO mode, shifts back to plane 1.
	pub fn flush_to(&mut self, out: &mut Vec<u8>) -> Result<(), Error> {
		self.flush_lookahead(out)?;
		if self.shift_state != 0 {
			out.push(SHIFT_IN);
			self.shift_state = 0;
		}
		Ok(())
	}

	/// [`flush_to`](Self::flush_to) into a fresh byte vec.
	pub fn flush(&mut self) -> Result<Vec<u8>, Error> {
		let mut out = Vec::new();
		self.flush_to(&mut out)?;
		Ok(out)
	}

	fn push_char(&mut self, out: &mut Vec<u8>, ch: char) -> Result<(), Error> {
		loop {
			let (next, jis) = tables::pair_step(self.state, ch);
			if next < 0 {
				self.state = 0;
				self.lookahead.clear();
				if !self.put(out, jis) {
					self.append_replacement(out, ch)?;
				}
				return Ok(());
			}
			if next > 0 {
				self.state = next;
				self.lookahead.push(ch);
				return Ok(());
			}
			if self.state != 0 {
				// Failed follow: the buffered lead goes out as a
				// single scalar and the current one is re-processed
				// from the initial state.
				self.flush_lookahead(out)?;
				continue;
			}
			return self.encode_single(out, ch);
		}
	}

	fn encode_single(&mut self, out: &mut Vec<u8>, ch: char) -> Result<(), Error> {
		if let Some(jis) = tables::lookup_single(ch) {
			if self.put(out, jis) {
				return Ok(());
			}
		}
		self.append_replacement(out, ch)
	}

	fn flush_lookahead(&mut self, out: &mut Vec<u8>) -> Result<(), Error> {
		self.state = 0;
		while !self.lookahead.is_empty() {
			let ch = self.lookahead.remove(0);
			self.encode_single(out, ch)?;
		}
		Ok(())
	}

	fn put(&mut self, out: &mut Vec<u8>, jis: u32) -> bool {
		match self.mode {
			ConversionMode::Men1 => put_men1(out, jis),
			ConversionMode::Jisx0208 => put_jisx0208(out, jis),
			ConversionMode::Translit => put_translit(out, jis),
			ConversionMode::Siso => {
				if jis as usize >= tables::JIS_CELLS {
					return false;
				}
				let plane = jis / PLANE_CELLS;
				if plane != self.shift_state {
					out.push(if plane == 0 { SHIFT_IN } else { SHIFT_OUT });
					self.shift_state = plane;
				}
				put_raw(out, jis);
				true
			}
		}
	}

	fn append_replacement(&self, out: &mut Vec<u8>, ch: char) -> Result<(), Error> {
		append_replacement(out, ch, self.replacement)
	}
}

fn append_replacement(out: &mut Vec<u8>, ch: char, replacement: Option<u32>) -> Result<(), Error> {
	match replacement {
		None => Err(Error::Unconvertible { text: ch.to_string() }),
		Some(jis) => {
			if !put_men1(out, jis) {
				panic!("replacement cell {jis} is not encodable in plane 1");
			}
			Ok(())
		}
	}
}

/// Single-call Unicode → JIS encoder.
///
/// Thin wrapper over [`IncrementalEncoder`] that encodes a whole
/// string and flushes in one call. [`ConversionMode::Siso`] needs the
/// incremental interface and is rejected here.
pub struct Encoder {
	mode: ConversionMode,
	replacement: Option<u32>,
}

impl Encoder {
	/// Creates a batch encoder.
	///
	/// # Panics
	///
	/// Panics if `mode` is [`ConversionMode::Siso`].
	pub fn new(mode: ConversionMode, replacement: Option<u32>) -> Encoder {
		assert!(
			mode != ConversionMode::Siso,
			"SISO output is stateful; use IncrementalEncoder"
		);
		Encoder { mode, replacement }
	}

	/// Encodes `input`, appending to `out`. Output already appended
	/// survives an error.
	pub fn encode_to(&self, out: &mut Vec<u8>, input: &str) -> Result<(), Error> {
		let mut inc = IncrementalEncoder::new(self.mode, self.replacement);
		inc.encode_to(out, input)?;
		inc.flush_to(out)
	}

	/// Encodes `input` into a fresh byte vec.
	pub fn encode(&self, input: &str) -> Result<Vec<u8>, Error> {
		let mut out = Vec::with_capacity(input.len());
		self.encode_to(&mut out, input)?;
		Ok(out)
	}
}
