//! Lookup structures materialized from the generated mapping data:
//! the dense forward table (cell → Unicode), the reverse range table
//! (scalar → cell), and the combining-pair automaton.

use once_cell::sync::Lazy;

use crate::data::{self, CharClass};

/// Sentinel for an absent Unicode scalar slot.
pub(crate) const INVALID_RUNE: u32 = 0x7fff_ffff;
/// Sentinel for an absent JIS cell.
pub(crate) const INVALID_JIS: u32 = 0xffff_ffff;
/// Total number of cells across both planes.
pub(crate) const JIS_CELLS: usize = 2 * 94 * 94;

// Gaps shorter than this between mapped scalars are absorbed into a
// single reverse-table range.
const GAP_THRESHOLD: u32 = 256;

/// One forward cell.
#[derive(Debug, Clone)]
pub(crate) struct Mapping {
	pub class: CharClass,
	/// Primary scalars; the second slot is `INVALID_RUNE` unless the
	/// cell decodes to a combining sequence.
	pub runes: [u32; 2],
	/// Visually-similar variant scalar; widens the reverse map only.
	pub secondary: u32,
	/// Shrinking transliteration, as cells and as scalars.
	pub tx_len: u8,
	pub tx_jis: [u32; 4],
	pub tx_runes: [u32; 4],
}

impl Mapping {
	const RESERVED: Mapping = Mapping {
		class: CharClass::Reserved,
		runes: [INVALID_RUNE; 2],
		secondary: INVALID_RUNE,
		tx_len: 0,
		tx_jis: [0; 4],
		tx_runes: [0; 4],
	};

	pub fn is_assigned(&self) -> bool {
		self.class != CharClass::Reserved
	}

	/// Decoded primary scalars, `None` for a reserved cell. The
	/// sentinel is not a valid scalar, so `char::from_u32` screens it.
	pub fn primary(&self) -> Option<(char, Option<char>)> {
		let first = char::from_u32(self.runes[0])?;
		Some((first, char::from_u32(self.runes[1])))
	}
}

/// Whether a cell of this class may be written as JIS X 0208.
pub(crate) fn qualifies_jisx0208(class: CharClass) -> bool {
	matches!(
		class,
		CharClass::KanjiLevel1 | CharClass::KanjiLevel2 | CharClass::Jisx0208NonKanji
	)
}

pub(crate) static MAPPINGS: Lazy<Vec<Mapping>> = Lazy::new(build_mappings);

pub(crate) fn mapping(jis: u32) -> &'static Mapping {
	&MAPPINGS[jis as usize]
}

fn build_mappings() -> Vec<Mapping> {
	let mut cells = vec![Mapping::RESERVED; JIS_CELLS];
	for &(first, scalars) in data::ROWS {
		for (i, &r) in scalars.iter().enumerate() {
			if r == 0 {
				continue;
			}
			let jis = first as usize + i;
			cells[jis].class = class_of(jis);
			cells[jis].runes[0] = r;
		}
	}
	for &(jis, lead, follow) in data::PAIRS {
		let cell = &mut cells[jis as usize];
		cell.class = class_of(jis as usize);
		cell.runes = [lead as u32, follow as u32];
	}
	// JIS X 0208 cells carry the workbook's one-to-one conversion entry,
	// which points back at the cell itself.
	for (jis, cell) in cells.iter_mut().enumerate() {
		if qualifies_jisx0208(cell.class) {
			cell.tx_len = 1;
			cell.tx_jis[0] = jis as u32;
			cell.tx_runes[0] = cell.runes[0];
		}
	}
	for &(jis, targets) in data::TRANSLITS {
		let mut tx_jis = [0u32; 4];
		let mut tx_runes = [0u32; 4];
		for (i, &t) in targets.iter().enumerate() {
			tx_jis[i] = t as u32;
			tx_runes[i] = cells[t as usize].runes[0];
		}
		let cell = &mut cells[jis as usize];
		cell.tx_len = targets.len() as u8;
		cell.tx_jis = tx_jis;
		cell.tx_runes = tx_runes;
	}
	for &(jis, ch) in data::SECONDARY {
		cells[jis as usize].secondary = ch as u32;
	}
	cells
}

/// Character class of an assigned cell, derived from its coordinates.
/// JIS X 0208 membership splits the kanji levels at row 48; assigned
/// cells outside JIS X 0208 are level-3 kanji from row 14 on, level-4
/// kanji on plane 2, and added non-kanji below row 14.
fn class_of(jis: usize) -> CharClass {
	let in_0208 = data::JISX0208_RUNS
		.iter()
		.any(|&(s, e)| (s as usize..=e as usize).contains(&jis));
	let ku = jis / 94 % 94 + 1;
	if in_0208 {
		if ku >= 48 {
			CharClass::KanjiLevel2
		} else if ku >= 16 {
			CharClass::KanjiLevel1
		} else {
			CharClass::Jisx0208NonKanji
		}
	} else if jis >= 94 * 94 {
		CharClass::KanjiLevel4
	} else if ku >= 14 {
		CharClass::KanjiLevel3
	} else {
		CharClass::Jisx0213NonKanji
	}
}

/// One reverse-table entry covering the scalars `start..=end`.
pub(crate) struct RuneRange {
	start: u32,
	end: u32,
	/// `jis[r - start]`, with `INVALID_JIS` marking absorbed gaps.
	jis: Vec<u32>,
}

pub(crate) static RANGES: Lazy<Vec<RuneRange>> = Lazy::new(build_ranges);

fn build_ranges() -> Vec<RuneRange> {
	let mut singles: Vec<(u32, u32)> = Vec::new();
	for (jis, cell) in MAPPINGS.iter().enumerate() {
		if !cell.is_assigned() || cell.runes[1] != INVALID_RUNE {
			continue;
		}
		singles.push((cell.runes[0], jis as u32));
		if cell.secondary != INVALID_RUNE {
			singles.push((cell.secondary, jis as u32));
		}
	}
	singles.sort_unstable();
	let mut ranges: Vec<RuneRange> = Vec::new();
	for (r, jis) in singles {
		match ranges.last_mut() {
			Some(range) if r - range.end < GAP_THRESHOLD => {
				debug_assert!(r > range.end, "duplicate reverse mapping for U+{r:04X}");
				for _ in range.end + 1..r {
					range.jis.push(INVALID_JIS);
				}
				range.jis.push(jis);
				range.end = r;
			}
			_ => ranges.push(RuneRange { start: r, end: r, jis: vec![jis] }),
		}
	}
	ranges
}

/// Resolves a single scalar to its JIS cell by binary search over the
/// range table.
pub(crate) fn lookup_single(ch: char) -> Option<u32> {
	let r = ch as u32;
	let ranges = &*RANGES;
	let i = ranges.partition_point(|m| m.end < r);
	let m = ranges.get(i)?;
	if r < m.start {
		return None;
	}
	let jis = m.jis[(r - m.start) as usize];
	(jis != INVALID_JIS).then_some(jis)
}

/// Advances the combining-pair automaton by one scalar.
///
/// State 0 is initial. A positive state means the lead with that index
/// has been buffered; `-1` commits the returned JIS code. Any other
/// scalar from a lead state returns to state 0, and the caller must
/// re-process that scalar from state 0 after flushing the buffered
/// lead through the single-scalar path.
pub(crate) fn pair_step(state: i32, ch: char) -> (i32, u32) {
	if state <= 0 {
		for (i, &(_, lead, _)) in data::PAIRS.iter().enumerate() {
			if lead == ch {
				return (i as i32 + 1, 0);
			}
		}
		return (0, 0);
	}
	let (_, lead, _) = data::PAIRS[state as usize - 1];
	for &(jis, l, follow) in data::PAIRS {
		if l == lead && follow == ch {
			return (-1, jis as u32);
		}
	}
	(0, 0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::kt;

	#[test]
	fn ranges_are_sorted_and_disjoint() {
		let ranges = &*RANGES;
		for w in ranges.windows(2) {
			assert!(w[0].start <= w[0].end);
			assert!(w[0].end < w[1].start);
		}
		for m in ranges {
			assert_eq!(m.jis.len() as u32, m.end - m.start + 1);
		}
	}

	#[test]
	fn reverse_inverts_single_scalar_cells() {
		for (jis, cell) in MAPPINGS.iter().enumerate() {
			if !cell.is_assigned() || cell.runes[1] != INVALID_RUNE {
				continue;
			}
			let (first, second) = cell.primary().unwrap();
			assert_eq!(second, None);
			assert_eq!(lookup_single(first), Some(jis as u32), "U+{:04X}", cell.runes[0]);
		}
	}

	#[test]
	fn secondary_scalars_resolve_to_their_cell() {
		assert_eq!(lookup_single('髙'), Some(kt(1, 25, 66) as u32));
		assert_eq!(lookup_single('𠮷'), Some(kt(1, 21, 40) as u32));
	}

	#[test]
	fn reserved_cells_are_empty() {
		for cell in MAPPINGS.iter() {
			if !cell.is_assigned() {
				assert_eq!(cell.runes, [INVALID_RUNE; 2]);
				assert_eq!(cell.secondary, INVALID_RUNE);
				assert_eq!(cell.tx_len, 0);
			}
		}
	}

	#[test]
	fn transliterations_target_jisx0208_plane1() {
		for cell in MAPPINGS.iter() {
			for &t in &cell.tx_jis[..cell.tx_len as usize] {
				assert!(t < 94 * 94);
				assert!(qualifies_jisx0208(MAPPINGS[t as usize].class));
			}
		}
	}

	#[test]
	fn transliteration_scalars_mirror_their_cells() {
		for cell in MAPPINGS.iter() {
			for i in 0..cell.tx_len as usize {
				assert_eq!(cell.tx_runes[i], MAPPINGS[cell.tx_jis[i] as usize].runes[0]);
			}
		}
	}

	#[test]
	fn well_known_cells() {
		assert_eq!(lookup_single('，'), Some(kt(1, 1, 4) as u32));
		assert_eq!(lookup_single('ー'), Some(kt(1, 1, 28) as u32));
		assert_eq!(lookup_single('あ'), Some(kt(1, 4, 2) as u32));
		assert_eq!(lookup_single('ヶ'), Some(kt(1, 5, 86) as u32));
		assert_eq!(lookup_single('亜'), Some(kt(1, 16, 1) as u32));
		assert_eq!(lookup_single('日'), Some(kt(1, 38, 92) as u32));
		assert_eq!(lookup_single('\u{20089}'), Some(kt(2, 1, 1) as u32));
		assert_eq!(lookup_single('\u{309a}'), None);
		assert_eq!(lookup_single('✋'), None);
	}

	#[test]
	fn classes_follow_the_row_layout() {
		assert_eq!(MAPPINGS[kt(1, 1, 1) as usize].class, CharClass::Jisx0208NonKanji);
		assert_eq!(MAPPINGS[kt(1, 4, 84) as usize].class, CharClass::Jisx0213NonKanji);
		assert_eq!(MAPPINGS[kt(1, 13, 1) as usize].class, CharClass::Jisx0213NonKanji);
		assert_eq!(MAPPINGS[kt(1, 16, 1) as usize].class, CharClass::KanjiLevel1);
		assert_eq!(MAPPINGS[kt(1, 47, 51) as usize].class, CharClass::KanjiLevel1);
		assert_eq!(MAPPINGS[kt(1, 47, 52) as usize].class, CharClass::KanjiLevel3);
		assert_eq!(MAPPINGS[kt(1, 48, 1) as usize].class, CharClass::KanjiLevel2);
		assert_eq!(MAPPINGS[kt(1, 84, 6) as usize].class, CharClass::KanjiLevel2);
		assert_eq!(MAPPINGS[kt(1, 94, 94) as usize].class, CharClass::KanjiLevel3);
		assert_eq!(MAPPINGS[kt(2, 1, 1) as usize].class, CharClass::KanjiLevel4);
	}

	#[test]
	fn pair_automaton_steps() {
		// not a lead
		assert_eq!(pair_step(0, 'あ'), (0, 0));
		// lead, then the matching follow
		let (state, none) = pair_step(0, 'か');
		assert!(state > 0);
		assert_eq!(none, 0);
		assert_eq!(pair_step(state, '\u{309a}'), (-1, kt(1, 4, 87) as u32));
		// lead, then an unrelated scalar
		assert_eq!(pair_step(state, 'あ'), (0, 0));
	}
}
