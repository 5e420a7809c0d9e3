//! Symbol binding and resolution.
//!
//! The resolver walks every symbol table in the image. Symbols the image
//! leaves undefined are matched against the caller's definitions; symbols
//! the image defines get their run-time address computed from their owning
//! section and are published back through the caller's query list. A symbol
//! that ends up with address zero is simply "unresolved", never an error
//! at this stage.

use crate::{
    Result,
    elf::{ElfShdr, ElfSym},
    session::Session,
    table::Table,
};
use elf::abi::{SHN_LORESERVE, SHN_UNDEF, SHT_PROGBITS, SHT_STRTAB, SHT_SYMTAB};

/// One caller-side symbol: either an external definition offered to the
/// module, or a query the module's own definitions may answer.
///
/// Bindings live in plain insertion-ordered slices; match order is the
/// slice order and the first match wins.
#[derive(Debug, Clone)]
pub struct SymbolBinding<'name> {
    name: &'name str,
    addr: usize,
    defined: bool,
}

impl<'name> SymbolBinding<'name> {
    /// An externally provided definition the module may reference.
    pub fn definition(name: &'name str, addr: usize) -> Self {
        Self {
            name,
            addr,
            defined: true,
        }
    }

    /// A query for an address the module is expected to define.
    pub fn query(name: &'name str) -> Self {
        Self {
            name,
            addr: 0,
            defined: false,
        }
    }

    /// The symbol's name.
    pub fn name(&self) -> &'name str {
        self.name
    }

    /// The symbol's address; meaningful for a query only once
    /// [`is_defined`](Self::is_defined) returns `true`.
    pub fn addr(&self) -> usize {
        self.addr
    }

    /// Whether the binding carries a resolved address.
    pub fn is_defined(&self) -> bool {
        self.defined
    }
}

/// Section indices that do not denote an ordinary section.
fn reserved_index(index: u16) -> bool {
    index == SHN_UNDEF || index >= SHN_LORESERVE
}

/// First-match-wins search of the definitions list; zero if absent.
fn find_definition(definitions: &[SymbolBinding], name: &[u8]) -> usize {
    for def in definitions {
        if def.defined && def.name.as_bytes() == name {
            return def.addr;
        }
    }
    0
}

impl<'image> Session<'image> {
    /// Resolves every symbol table in the image.
    ///
    /// Must run after [`map_sections`](Session::map_sections) succeeded.
    /// `definitions` is only read; `queries` entries are marked defined (at
    /// most once each) as matching module symbols are encountered.
    ///
    /// Unresolved symbols keep address zero and unmatched queries stay
    /// undefined; the caller checks [`SymbolBinding::is_defined`]
    /// afterwards. Errors mean the image itself is malformed and abort the
    /// whole pass.
    pub fn resolve_symbols(
        &mut self,
        definitions: &[SymbolBinding],
        queries: &mut [SymbolBinding],
    ) -> Result<()> {
        #[cfg(feature = "log")]
        log::debug!("resolving symbols");

        for (index, entry) in self.shtable().iter().enumerate() {
            let shdr = entry as *const ElfShdr;
            if unsafe { (*shdr).sh_type } != SHT_SYMTAB {
                continue;
            }
            self.resolve_symbol_table(index, shdr, definitions, queries)?;
        }

        #[cfg(feature = "log")]
        log::debug!("done resolving symbols");

        Ok(())
    }

    fn resolve_symbol_table(
        &self,
        section: usize,
        shdr: *const ElfShdr,
        definitions: &[SymbolBinding],
        queries: &mut [SymbolBinding],
    ) -> Result<()> {
        let symtab = self.section_table(shdr, section, false)?;

        let link = unsafe { (*shdr).sh_link } as usize;
        let str_hdr = self.section_header(link, Some(SHT_STRTAB))?;
        let strtab = self.section_table(str_hdr, link, true)?;

        for record in symtab.iter() {
            let sym = record as *mut ElfSym;
            let name = self.symbol_name(&strtab, unsafe { (*sym).st_name } as usize)?;

            let shndx = unsafe { (*sym).st_shndx };
            let value = if shndx == SHN_UNDEF {
                find_definition(definitions, name)
            } else {
                self.defined_symbol_address(sym)?
            };

            unsafe { (*sym).st_value = value as u64 };

            #[cfg(feature = "log")]
            log::trace!(
                "symbol {:?} assigned {:#x}",
                core::str::from_utf8(name).unwrap_or("<non-utf8>"),
                value
            );

            // An address-less symbol cannot satisfy a query.
            if value == 0 {
                continue;
            }

            for query in queries.iter_mut() {
                if query.defined || query.name.as_bytes() != name {
                    continue;
                }
                query.defined = true;
                query.addr = value;
                break;
            }
        }

        Ok(())
    }

    /// Computes the run-time address of a symbol the image defines.
    ///
    /// Symbols owned by a reserved section index, or by a section that does
    /// not hold program data, get no address (zero). This mirrors the host
    /// format's convention that not every section index denotes ordinary
    /// program data; no storage is synthesized for zero-fill data here.
    fn defined_symbol_address(&self, sym: *const ElfSym) -> Result<usize> {
        let shndx = unsafe { (*sym).st_shndx };
        if reserved_index(shndx) {
            return Ok(0);
        }

        let shdr = self.section_header(shndx as usize, None)?;
        if unsafe { (*shdr).sh_type } != SHT_PROGBITS {
            return Ok(0);
        }
        let addr = unsafe { (*shdr).sh_addr as usize };
        Ok(addr.wrapping_add(unsafe { (*sym).st_value } as usize))
    }

    /// Reads a symbol name: a NUL-terminated byte run at `offset` in the
    /// string table, with the scan capped at the table's own end.
    fn symbol_name(&self, strtab: &Table, offset: usize) -> Result<&'image [u8]> {
        let start = strtab.get(offset)?;
        let end = strtab.end();
        let mut cursor = start;
        unsafe {
            while cursor < end && *(cursor as *const u8) != 0 {
                cursor += 1;
            }
            Ok(core::slice::from_raw_parts(
                start as *const u8,
                cursor - start,
            ))
        }
    }
}
