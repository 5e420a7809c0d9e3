//! Per-load session state and shared table-derivation internals.

use crate::{
    Error, Result,
    elf::{EHDR_SIZE, ElfEhdr, ElfShdr},
    table::Table,
};
use core::marker::PhantomData;

/// The context of one load: the image base, the derived section-header
/// table, and nothing else.
///
/// A session exclusively borrows the caller's image for its whole lifetime;
/// the three pipeline stages ([`map_sections`](Session::map_sections),
/// [`resolve_symbols`](Session::resolve_symbols),
/// [`apply_relocations`](Session::apply_relocations)) must be run in order,
/// and a failed stage leaves the session unusable: the image may be
/// partially rewritten and must not be executed.
pub struct Session<'image> {
    base: usize,
    len: usize,
    shtable: Table,
    _image: PhantomData<&'image mut [u8]>,
}

impl<'image> Session<'image> {
    /// Begins a session over a relocatable object image.
    ///
    /// Reads the file header at the image's start and derives the
    /// section-header table from it. The section-table range declared by the
    /// header must lie entirely inside the image; a header describing
    /// records beyond the image fails fast with [`Error::IndexOutOfRange`]
    /// here rather than on first access. A zero `e_shentsize` with a
    /// non-zero section count is reported as [`Error::NullEntrySize`] for
    /// section 0.
    ///
    /// The image must be at least 8-byte aligned (the natural alignment of
    /// the ELF64 structures parsed in place); memory obtained from a page
    /// mapping always is. The section-table offset and entry size declared
    /// by the header must preserve that alignment, since the headers are
    /// read through references; a violation fails with
    /// [`Error::Misaligned`].
    pub fn new(image: &'image mut [u8]) -> Result<Self> {
        let base = image.as_mut_ptr() as usize;
        let len = image.len();
        check_aligned(base, align_of::<ElfEhdr>())?;

        if len < EHDR_SIZE {
            return Err(Error::IndexOutOfRange {
                index: EHDR_SIZE,
                limit: len,
            });
        }
        let ehdr = unsafe { &*(base as *const ElfEhdr) };

        let shoff = ehdr.e_shoff as usize;
        let shnum = ehdr.e_shnum as usize;
        let mut shentsize = ehdr.e_shentsize as usize;
        if shentsize == 0 {
            if shnum != 0 {
                return Err(Error::NullEntrySize { section: 0 });
            }
            shentsize = size_of::<ElfShdr>();
        }
        check_aligned(shoff, align_of::<ElfShdr>())?;
        check_aligned(shentsize, align_of::<ElfShdr>())?;

        let table_size = shentsize
            .checked_mul(shnum)
            .ok_or(Error::IndexOutOfRange {
                index: shnum,
                limit: len,
            })?;
        shoff
            .checked_add(table_size)
            .filter(|&end| end <= len)
            .ok_or(Error::IndexOutOfRange {
                index: shoff.saturating_add(table_size),
                limit: len,
            })?;

        #[cfg(feature = "log")]
        log::debug!(
            "beginning session: image at {:#x}, {} section headers",
            base,
            shnum
        );

        Ok(Self {
            base,
            len,
            shtable: Table::new(base + shoff, table_size, shentsize),
            _image: PhantomData,
        })
    }

    /// The run-time address of the image's first byte.
    pub fn base(&self) -> usize {
        self.base
    }

    pub(crate) fn shtable(&self) -> &Table {
        &self.shtable
    }

    /// Looks up a section header by index, optionally requiring its type.
    pub(crate) fn section_header(
        &self,
        index: usize,
        expected_type: Option<u32>,
    ) -> Result<*mut ElfShdr> {
        let shdr = self.shtable.get(index)? as *mut ElfShdr;
        if let Some(expected) = expected_type {
            let found = unsafe { (*shdr).sh_type };
            if found != expected {
                return Err(Error::BadSectionType {
                    section: index,
                    expected,
                    found,
                });
            }
        }
        Ok(shdr)
    }

    /// Derives the record table held by a section.
    ///
    /// The section's declared extent must lie inside the image. A zero
    /// record size fails with `NullEntrySize`, except for byte-granular
    /// tables (string tables), where it defaults to 1. Record tables are
    /// read through references, so their offset and stride must keep the
    /// records 8-byte aligned.
    pub(crate) fn section_table(
        &self,
        shdr: *const ElfShdr,
        section: usize,
        byte_table: bool,
    ) -> Result<Table> {
        let offset = unsafe { (*shdr).sh_offset } as usize;
        let size = unsafe { (*shdr).sh_size } as usize;
        offset
            .checked_add(size)
            .filter(|&end| end <= self.len)
            .ok_or(Error::IndexOutOfRange {
                index: offset.saturating_add(size),
                limit: self.len,
            })?;

        let mut entry_size = unsafe { (*shdr).sh_entsize } as usize;
        if entry_size == 0 {
            if !byte_table {
                return Err(Error::NullEntrySize { section });
            }
            entry_size = 1;
        }
        if !byte_table {
            check_aligned(offset, align_of::<u64>())?;
            check_aligned(entry_size, align_of::<u64>())?;
        }

        Ok(Table::new(self.base + offset, size, entry_size))
    }
}

fn check_aligned(value: usize, align: usize) -> Result<()> {
    if value % align == 0 {
        Ok(())
    } else {
        Err(Error::Misaligned { value, align })
    }
}
