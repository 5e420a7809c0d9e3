//! Bounds-described views over contiguous runs of fixed-size records.
//!
//! Every indexed access into the untrusted image goes through [`Table::get`];
//! no other component computes record offsets by hand. The same abstraction
//! describes the section-header table, a symbol table, a string table
//! (record size 1) and a relocation table.

use crate::{Error, Result};

/// A view over a contiguous run of fixed-size records in the image.
///
/// `start` is the address of the first record, `end` is one past the last
/// byte, and every valid index `i` satisfies `start + i * entry_size < end`.
#[derive(Clone, Copy)]
pub(crate) struct Table {
    start: usize,
    end: usize,
    entry_size: usize,
}

impl Table {
    /// Creates a table over `size` bytes of `entry_size`-byte records.
    ///
    /// Callers are responsible for rejecting a zero entry size beforehand
    /// (it comes from an untrusted `sh_entsize` field).
    pub(crate) fn new(start: usize, size: usize, entry_size: usize) -> Self {
        debug_assert!(entry_size != 0);
        Self {
            start,
            end: start + size,
            entry_size,
        }
    }

    /// Creates a byte-granular table, as used for string tables.
    pub(crate) fn bytes(start: usize, size: usize) -> Self {
        Self::new(start, size, 1)
    }

    /// One past the address of the table's last byte.
    pub(crate) fn end(&self) -> usize {
        self.end
    }

    /// The number of whole records the table holds.
    pub(crate) fn limit(&self) -> usize {
        (self.end - self.start) / self.entry_size
    }

    /// Returns the address of the record at `index`, or `IndexOutOfRange`.
    pub(crate) fn get(&self, index: usize) -> Result<usize> {
        let record = index
            .checked_mul(self.entry_size)
            .and_then(|offset| self.start.checked_add(offset))
            .filter(|&record| record < self.end);
        record.ok_or(Error::IndexOutOfRange {
            index,
            limit: self.limit(),
        })
    }

    /// Returns the address of the record at `index`, additionally requiring
    /// `len` bytes from that address to lie inside the table.
    ///
    /// Used for patch sites, where the write is wider than the one-byte
    /// records of the table describing the patched section.
    pub(crate) fn get_span(&self, index: usize, len: usize) -> Result<usize> {
        let record = self.get(index)?;
        record
            .checked_add(len)
            .filter(|&end| end <= self.end)
            .ok_or(Error::IndexOutOfRange {
                index,
                limit: self.limit(),
            })?;
        Ok(record)
    }

    /// Iterates over the record addresses from start to end.
    ///
    /// The iterator is lazy, finite and restartable; it never steps past
    /// `end` even when the last record is truncated.
    pub(crate) fn iter(&self) -> TableIter {
        TableIter {
            cursor: self.start,
            end: self.end,
            stride: self.entry_size,
        }
    }
}

pub(crate) struct TableIter {
    cursor: usize,
    end: usize,
    stride: usize,
}

impl Iterator for TableIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.cursor >= self.end {
            return None;
        }
        let record = self.cursor;
        self.cursor += self.stride;
        Some(record)
    }
}
