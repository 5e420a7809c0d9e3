//! Error taxonomy of the linker.
//!
//! Every failure is fatal to the stage that raised it: the error propagates
//! to the stage boundary and the remaining work of that stage is abandoned.
//! Variants carry small numeric context instead of formatted messages so the
//! crate stays allocation-free.

use core::fmt;

/// An error raised while linking a relocatable module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A table was accessed with an index or offset beyond its bound.
    ///
    /// Raised for a malformed layout or a truncated image: an out-of-range
    /// section, symbol, string or relocation reference, or a section whose
    /// declared extent does not fit inside the image.
    IndexOutOfRange {
        /// The offending index or byte offset.
        index: usize,
        /// The number of valid entries (or bytes) in the table.
        limit: usize,
    },
    /// A structure's placement or stride violates the natural alignment of
    /// its record type, so it cannot be parsed in place.
    Misaligned {
        /// The offending address, offset or stride.
        value: usize,
        /// The required alignment in bytes.
        align: usize,
    },
    /// A zero-fill (`SHT_NOBITS`) section declared a non-zero size.
    NonEmptyZeroFillSection {
        /// Index of the offending section header.
        section: usize,
        /// The declared size.
        size: u64,
    },
    /// A section referenced through a `sh_link`/`sh_info` field did not have
    /// the type required by context.
    BadSectionType {
        /// Index of the offending section header.
        section: usize,
        /// The section type required by context.
        expected: u32,
        /// The section type actually found.
        found: u32,
    },
    /// A fixed-record section declared zero-size records.
    NullEntrySize {
        /// Index of the offending section header.
        section: usize,
    },
    /// A relocation referenced symbol index zero.
    NullSymbolIndex {
        /// Index of the offending relocation record.
        entry: usize,
    },
    /// A relocation referenced a symbol whose resolved address is zero,
    /// which is indistinguishable from "unresolved".
    NullSymbolAddress {
        /// Index of the offending symbol record.
        symbol: usize,
    },
    /// An unrecognized relocation kind.
    BadRelocationType {
        /// The relocation kind code.
        kind: u32,
    },
    /// A computed relocation value does not fit the patch width.
    RelocationValueOverflow {
        /// The relocation kind code.
        kind: u32,
        /// The patch width in bits.
        width: u32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IndexOutOfRange { index, limit } => {
                write!(f, "table index {index} out of range (limit {limit})")
            }
            Error::Misaligned { value, align } => {
                write!(f, "value {value:#x} violates {align}-byte alignment")
            }
            Error::NonEmptyZeroFillSection { section, size } => {
                write!(
                    f,
                    "zero-fill section {section} declares {size} bytes of file content"
                )
            }
            Error::BadSectionType {
                section,
                expected,
                found,
            } => {
                write!(
                    f,
                    "section {section} has type {found}, expected {expected}"
                )
            }
            Error::NullEntrySize { section } => {
                write!(f, "section {section} declares zero-size records")
            }
            Error::NullSymbolIndex { entry } => {
                write!(f, "relocation {entry} references symbol index 0")
            }
            Error::NullSymbolAddress { symbol } => {
                write!(f, "relocation references symbol {symbol} with no resolved address")
            }
            Error::BadRelocationType { kind } => {
                write!(f, "unsupported relocation kind {kind}")
            }
            Error::RelocationValueOverflow { kind, width } => {
                write!(
                    f,
                    "relocation kind {kind} value overflows its {width}-bit patch"
                )
            }
        }
    }
}

impl core::error::Error for Error {}
