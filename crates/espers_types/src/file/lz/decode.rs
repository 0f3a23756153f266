//! Block decompression.

use crate::file::DecompressError;

use super::constants;

/// Decompresses a block.
///
/// Decoding is stateless and may run concurrently from any number of callers.
/// Input that ends in the middle of a group (missing control byte, literal or
/// back-reference operand) stops decoding and returns what was produced so far.
///
/// # Errors
///
/// Returns [`DecompressError::InvalidBackReference`] if a back-reference would
/// read before the start of the output.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, DecompressError> {
	let mut output = Vec::with_capacity(input.len() * 2);
	let mut pos = 0;

	'groups: while let Some(&control) = input.get(pos) {
		pos += 1;

		for bit in 0..constants::GROUP_SIZE {
			if control & (1 << bit) == 0 {
				let Some(&literal) = input.get(pos) else {
					break 'groups;
				};
				output.push(literal);
				pos += 1;
				continue;
			}

			let (Some(&b1), Some(&b2)) = (input.get(pos), input.get(pos + 1)) else {
				break 'groups;
			};
			pos += 2;

			let length = usize::from(b1 >> 4) + constants::MIN_MATCH;
			let offset = ((usize::from(b1 & 0xF) << 8) | usize::from(b2)) + 1;
			if offset > output.len() {
				return Err(DecompressError::InvalidBackReference {
					offset,
					position: output.len(),
				});
			}

			// Byte by byte: the source may overlap bytes written by this copy
			let start = output.len() - offset;
			for i in 0..length {
				let byte = output[start + i];
				output.push(byte);
			}
		}
	}

	Ok(output)
}
