/// An encoding or decoding failure.
///
/// Every variant carries enough context for a log line: the offending
/// scalar or byte values, and for decoding errors the byte offset into
/// the input of the call that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// A scalar has no JIS mapping (in the requested mode) and no
	/// replacement is configured on the encoder.
	#[error("{text} is not convertible to JISX0208")]
	Unconvertible {
		/// The unconvertible text, as it appeared in the input.
		text: String,
	},

	/// A two-byte sequence selected an unassigned cell and no
	/// replacement is configured on the decoder.
	#[error("inconvertible character found at offset {offset}")]
	Inconvertible { offset: usize },

	/// The second byte of a two-byte sequence was outside `0x21..=0x7e`.
	#[error("unexpected byte \\x{byte:02x} after \\x{lead:02x} at offset {offset}")]
	UnexpectedTrailByte { lead: u8, byte: u8, offset: usize },

	/// A byte that is neither printable nor a recognized shift byte.
	#[error("unexpected byte \\x{byte:02x} at offset {offset}")]
	UnexpectedByte { byte: u8, offset: usize },
}
