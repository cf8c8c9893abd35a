//! Word-aligned calldata buffers
//!
//! [`CalldataWriter`] builds one encoding region: a head of fixed size written
//! in member order, followed by a heap (tail) that dynamic members append to.
//! [`CalldataCursor`] reads a region back, resolving offsets against the base
//! of the enclosing region.

use std::cell::Cell;
use std::rc::Rc;

use abikit_primitives::{H256, U256, WORD_SIZE};

use crate::error::AbiError;

/// Words a decode may read per word of input.
///
/// Offsets may alias, so one region can be read many times over; this caps
/// the total work a single buffer can cause.
pub const MAX_READ_FACTOR: usize = 64;

/// Round `len` up to a whole number of words
pub fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD_SIZE) * WORD_SIZE
}

/// Word holding `value` as a big-endian integer
pub fn usize_word(value: usize) -> H256 {
    H256::from_u256(U256::from(value as u64))
}

/// Interpret a word as a length or offset
pub fn word_to_usize(word: &H256) -> Result<usize, AbiError> {
    let value = word.to_u256();
    if value.bits() > 64 {
        return Err(AbiError::decoding(format!("word {} is not a valid length or offset", word)));
    }
    usize::try_from(value.low_u64())
        .map_err(|_| AbiError::decoding(format!("word {} does not fit into usize", word)))
}

/// Encoding side of one composite region
#[derive(Debug)]
pub struct CalldataWriter {
    head: Vec<u8>,
    head_size: usize,
    heap: Vec<u8>,
    /// `(offset, len)` of every heap payload, for reuse when optimizing
    segments: Vec<(usize, usize)>,
    optimize: bool,
}

impl CalldataWriter {
    /// Create a writer whose head occupies `head_size` bytes
    pub fn new(head_size: usize) -> Self {
        Self {
            head: Vec::with_capacity(head_size),
            head_size,
            heap: Vec::new(),
            segments: Vec::new(),
            optimize: false,
        }
    }

    /// Reuse identical heap payloads instead of appending them again
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Bytes written to the head so far
    pub fn head_len(&self) -> usize {
        self.head.len()
    }

    /// Append a word to the head
    pub fn write_word(&mut self, word: &H256) {
        self.head.extend_from_slice(word.as_bytes());
    }

    /// Reserve a zeroed head word, returning its slot for [`Self::patch_word`]
    pub fn reserve_word(&mut self) -> usize {
        let slot = self.head.len();
        self.head.extend_from_slice(&[0u8; WORD_SIZE]);
        slot
    }

    /// Overwrite a previously reserved head word
    pub fn patch_word(&mut self, slot: usize, word: &H256) {
        self.head[slot..slot + WORD_SIZE].copy_from_slice(word.as_bytes());
    }

    /// Append a payload to the heap.
    ///
    /// Returns the payload offset relative to the start of this region, i.e.
    /// the value the head word pointing at it must hold.
    pub fn append_heap_bytes(&mut self, bytes: &[u8]) -> usize {
        if self.optimize {
            let existing = self
                .segments
                .iter()
                .find(|(offset, len)| *len == bytes.len() && &self.heap[*offset..*offset + *len] == bytes);
            if let Some((offset, _)) = existing {
                return self.head_size + offset;
            }
        }
        let offset = self.heap.len();
        self.heap.extend_from_slice(bytes);
        self.segments.push((offset, bytes.len()));
        self.head_size + offset
    }

    /// Finish the region: head followed by heap
    pub fn into_bytes(self) -> Vec<u8> {
        debug_assert_eq!(self.head.len(), self.head_size, "head size mismatch");
        let mut out = self.head;
        out.extend_from_slice(&self.heap);
        out
    }
}

/// Decoding side: reads words relative to the base of the enclosing region.
///
/// Cursors derived through [`Self::follow_offset`] and [`Self::enter_region`]
/// share one read budget of [`MAX_READ_FACTOR`] words per input word.
#[derive(Debug, Clone)]
pub struct CalldataCursor<'a> {
    data: &'a [u8],
    base: usize,
    pos: usize,
    /// Words left to read across every cursor of this decode
    budget: Rc<Cell<usize>>,
}

impl<'a> CalldataCursor<'a> {
    /// Cursor over `data` with base and position 0
    pub fn new(data: &'a [u8]) -> Self {
        let words = data.len() / WORD_SIZE + 1;
        Self {
            data,
            base: 0,
            pos: 0,
            budget: Rc::new(Cell::new(words.saturating_mul(MAX_READ_FACTOR))),
        }
    }

    /// Cursor whose region starts at `base` (4 for selector-prefixed calldata)
    pub fn with_base(data: &'a [u8], base: usize) -> Result<Self, AbiError> {
        if base > data.len() {
            return Err(AbiError::decoding(format!(
                "region start {} is past the end of {} bytes",
                base,
                data.len()
            )));
        }
        Ok(Self { base, pos: base, ..Self::new(data) })
    }

    /// Start of the enclosing region
    pub fn base(&self) -> usize {
        self.base
    }

    /// Absolute read position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the read position
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Read the word at an absolute position
    pub fn read_word_at(&self, pos: usize) -> Result<H256, AbiError> {
        let bytes = self.read_bytes_at(pos, WORD_SIZE)?;
        H256::from_slice(bytes).map_err(|e| AbiError::decoding(e.to_string()))
    }

    /// Read `len` bytes at an absolute position
    pub fn read_bytes_at(&self, pos: usize, len: usize) -> Result<&'a [u8], AbiError> {
        let end = pos.checked_add(len).filter(|end| *end <= self.data.len()).ok_or_else(|| {
            AbiError::decoding(format!(
                "need {} bytes at position {}, have {}",
                len,
                pos,
                self.data.len().saturating_sub(pos)
            ))
        })?;
        self.charge(len)?;
        Ok(&self.data[pos..end])
    }

    /// Words left in the shared read budget
    pub fn budget(&self) -> usize {
        self.budget.get()
    }

    fn charge(&self, len: usize) -> Result<(), AbiError> {
        let words = len.div_ceil(WORD_SIZE);
        let left = self.budget.get().checked_sub(words).ok_or_else(|| {
            AbiError::decoding(format!(
                "aliased offsets expand {} bytes of input past {} word reads",
                self.data.len(),
                (self.data.len() / WORD_SIZE + 1).saturating_mul(MAX_READ_FACTOR)
            ))
        })?;
        self.budget.set(left);
        Ok(())
    }

    /// Read the word at the read position and advance past it
    pub fn read_word(&mut self) -> Result<H256, AbiError> {
        let word = self.read_word_at(self.pos)?;
        self.pos += WORD_SIZE;
        Ok(word)
    }

    /// Read a length word and advance past it
    pub fn read_length(&mut self) -> Result<usize, AbiError> {
        let word = self.read_word()?;
        word_to_usize(&word)
    }

    /// Read `len` bytes at the read position and advance past their padding
    pub fn read_padded_bytes(&mut self, len: usize) -> Result<&'a [u8], AbiError> {
        let bytes = self.read_bytes_at(self.pos, len)?;
        self.pos = self.pos.saturating_add(padded_len(len)).min(self.data.len());
        Ok(bytes)
    }

    /// Resolve an offset word against this region's base.
    ///
    /// The returned cursor starts a new region at the target position.
    pub fn follow_offset(&self, word: &H256) -> Result<CalldataCursor<'a>, AbiError> {
        let offset = word_to_usize(word)?;
        let target = self.base.checked_add(offset).filter(|t| *t < self.data.len()).ok_or_else(|| {
            AbiError::decoding(format!(
                "offset {} from region start {} points outside {} bytes",
                offset,
                self.base,
                self.data.len()
            ))
        })?;
        Ok(Self {
            data: self.data,
            base: target,
            pos: target,
            budget: Rc::clone(&self.budget),
        })
    }

    /// Start a new region at the current read position
    pub fn enter_region(&self) -> CalldataCursor<'a> {
        Self {
            data: self.data,
            base: self.pos,
            pos: self.pos,
            budget: Rc::clone(&self.budget),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Writer tests ====================

    #[test]
    fn test_writer_head_then_heap() {
        let mut writer = CalldataWriter::new(64);
        writer.write_word(&usize_word(7));
        let slot = writer.reserve_word();
        let offset = writer.append_heap_bytes(&[0xaa; 32]);
        writer.patch_word(slot, &usize_word(offset));

        let out = writer.into_bytes();
        assert_eq!(out.len(), 96);
        assert_eq!(out[31], 7);
        assert_eq!(out[63], 64);
        assert_eq!(&out[64..], &[0xaa; 32]);
    }

    #[test]
    fn test_writer_optimize_reuses_payload() {
        let mut writer = CalldataWriter::new(64).with_optimize(true);
        let a = writer.append_heap_bytes(&[1u8; 32]);
        let b = writer.append_heap_bytes(&[1u8; 32]);
        assert_eq!(a, b);

        let mut plain = CalldataWriter::new(64);
        let a = plain.append_heap_bytes(&[1u8; 32]);
        let b = plain.append_heap_bytes(&[1u8; 32]);
        assert_eq!(b, a + 32);
    }

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(1), 32);
        assert_eq!(padded_len(32), 32);
        assert_eq!(padded_len(33), 64);
    }

    // ==================== Cursor tests ====================

    #[test]
    fn test_cursor_read_word_advances() {
        let mut data = vec![0u8; 64];
        data[31] = 1;
        data[63] = 2;
        let mut cursor = CalldataCursor::new(&data);
        assert_eq!(cursor.read_word().unwrap().as_bytes()[31], 1);
        assert_eq!(cursor.read_word().unwrap().as_bytes()[31], 2);
        assert!(cursor.read_word().is_err());
    }

    #[test]
    fn test_cursor_short_buffer() {
        let data = vec![0u8; 29];
        let mut cursor = CalldataCursor::new(&data);
        match cursor.read_word() {
            Err(AbiError::Decoding { .. }) => {}
            other => panic!("Expected Decoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_follow_offset_is_base_relative() {
        let data = vec![0u8; 4 + 96];
        let cursor = CalldataCursor::with_base(&data, 4).unwrap();
        let inner = cursor.follow_offset(&usize_word(32)).unwrap();
        assert_eq!(inner.base(), 36);
        assert_eq!(inner.position(), 36);
    }

    #[test]
    fn test_follow_offset_out_of_bounds() {
        let data = vec![0u8; 64];
        let cursor = CalldataCursor::new(&data);
        assert!(cursor.follow_offset(&usize_word(64)).is_err());
        assert!(cursor.follow_offset(&H256::from_u256(U256::MAX)).is_err());
    }

    #[test]
    fn test_derived_cursors_share_budget() {
        let data = vec![0u8; 64];
        let cursor = CalldataCursor::new(&data);
        let start = cursor.budget();
        assert_eq!(start, 3 * MAX_READ_FACTOR);

        let mut inner = cursor.follow_offset(&usize_word(32)).unwrap();
        inner.read_word().unwrap();
        let mut region = inner.enter_region();
        region.read_word_at(0).unwrap();
        assert_eq!(cursor.budget(), start - 2);
    }

    #[test]
    fn test_budget_exhaustion() {
        let data = vec![0u8; 32];
        let cursor = CalldataCursor::new(&data);
        for _ in 0..cursor.budget() {
            cursor.read_word_at(0).unwrap();
        }
        match cursor.read_word_at(0) {
            Err(AbiError::Decoding { reason, .. }) => assert!(reason.contains("aliased offsets")),
            other => panic!("Expected Decoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_with_base_past_end() {
        assert!(CalldataCursor::with_base(&[0u8; 3], 4).is_err());
    }
}
