//! Block compression.
//!
//! A greedy matcher: at every position the longest match inside the window is
//! taken if it reaches [`constants::MIN_MATCH`], otherwise a literal is emitted.
//! Output always decodes with [`super::decompress`] to the original bytes.

use super::constants;

/// Accumulates items for one control byte.
struct GroupWriter {
	output: Vec<u8>,
	control_pos: usize,
	items: usize,
}

impl GroupWriter {
	fn new(capacity: usize) -> Self {
		Self {
			output: Vec::with_capacity(capacity),
			control_pos: 0,
			items: constants::GROUP_SIZE,
		}
	}

	fn begin_item(&mut self) {
		if self.items == constants::GROUP_SIZE {
			self.control_pos = self.output.len();
			self.output.push(0);
			self.items = 0;
		}
	}

	fn literal(&mut self, byte: u8) {
		self.begin_item();
		self.output.push(byte);
		self.items += 1;
	}

	fn reference(&mut self, length: usize, offset: usize) {
		self.begin_item();
		self.output[self.control_pos] |= 1 << self.items;
		let length_code = (length - constants::MIN_MATCH) as u8;
		let offset_code = offset - 1;
		self.output.push((length_code << 4) | ((offset_code >> 8) as u8 & 0xF));
		self.output.push((offset_code & 0xFF) as u8);
		self.items += 1;
	}
}

/// Finds the longest match for `data[pos..]`, returning `(length, offset)`.
fn longest_match(data: &[u8], pos: usize) -> (usize, usize) {
	let max_len = constants::MAX_MATCH.min(data.len() - pos);
	if max_len < constants::MIN_MATCH {
		return (0, 0);
	}

	let window_start = pos.saturating_sub(constants::WINDOW_SIZE);
	let mut best = (0, 0);
	for candidate in (window_start..pos).rev() {
		let mut length = 0;
		// candidate + length may run past pos; the decoder copies byte by byte
		while length < max_len && data[candidate + length] == data[pos + length] {
			length += 1;
		}
		if length > best.0 {
			best = (length, pos - candidate);
			if length == max_len {
				break;
			}
		}
	}
	best
}

/// Compresses a block.
pub fn compress(data: &[u8]) -> Vec<u8> {
	let mut writer = GroupWriter::new(data.len() + data.len() / 8 + 1);
	let mut pos = 0;

	while pos < data.len() {
		let (length, offset) = longest_match(data, pos);
		if length >= constants::MIN_MATCH {
			writer.reference(length, offset);
			pos += length;
		} else {
			writer.literal(data[pos]);
			pos += 1;
		}
	}

	writer.output
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::lz::decompress;

	#[test]
	fn test_compress_empty() {
		assert!(compress(&[]).is_empty());
	}

	#[test]
	fn test_compress_run() {
		let data = vec![0x42u8; 200];
		let packed = compress(&data);
		assert!(packed.len() < 40);
		assert_eq!(decompress(&packed).unwrap(), data);
	}

	#[test]
	fn test_compress_mixed() {
		let mut data = Vec::new();
		for i in 0..2000u32 {
			data.push((i * 7 % 13) as u8);
			if i % 5 == 0 {
				data.extend_from_slice(b"tile");
			}
		}
		let packed = compress(&data);
		assert!(packed.len() < data.len());
		assert_eq!(decompress(&packed).unwrap(), data);
	}

	#[test]
	fn test_far_reference_within_window() {
		let mut data: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
		let head = data[..18].to_vec();
		data.extend_from_slice(&head);
		assert_eq!(decompress(&compress(&data)).unwrap(), data);
	}
}
