//! Section mapping: file offsets become resident run-time addresses.

use crate::{Error, Result, elf::ElfShdr, session::Session};
use elf::abi::SHT_NOBITS;

impl Session<'_> {
    /// Assigns every section its run-time address.
    ///
    /// Each section's `sh_addr` is overwritten with `image_base +
    /// sh_offset`. A zero-fill (`SHT_NOBITS`) section must occupy zero file
    /// bytes; one declaring a non-zero size fails the whole pass with
    /// [`Error::NonEmptyZeroFillSection`] and leaves the session unusable.
    ///
    /// The pass has no ordering requirement across sections and is
    /// idempotent: running it twice yields identical addresses.
    pub fn map_sections(&mut self) -> Result<()> {
        #[cfg(feature = "log")]
        log::debug!("mapping sections");

        for (index, entry) in self.shtable().iter().enumerate() {
            let shdr = entry as *mut ElfShdr;
            unsafe {
                if (*shdr).sh_type == SHT_NOBITS && (*shdr).sh_size != 0 {
                    return Err(Error::NonEmptyZeroFillSection {
                        section: index,
                        size: (*shdr).sh_size,
                    });
                }

                let address = self.base().wrapping_add((*shdr).sh_offset as usize);
                (*shdr).sh_addr = address as u64;

                #[cfg(feature = "log")]
                log::trace!("section {} mapped at {:#x}", index, address);
            }
        }

        #[cfg(feature = "log")]
        log::debug!("done mapping sections");

        Ok(())
    }
}
