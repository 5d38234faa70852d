use std::{fs::File, path::Path};

use memmap2::Mmap;
use readidx_common::{Result, error::Error};

use crate::{ByteSource, SharedSource};

/// A read-only, memory-mapped file.
///
/// The mapping stays valid for the lifetime of the value; share it through
/// [`SharedSource`] so that every reader keeps it alive.
pub struct MappedFile {
    path: String,
    map: Option<Mmap>,
}

impl MappedFile {
    /// Maps the file at `path` into memory.
    ///
    /// Zero-length files produce an empty source without creating a mapping.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<MappedFile> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let file = File::open(path).map_err(|e| Error::io(display.clone(), e))?;
        let size = file
            .metadata()
            .map_err(|e| Error::io(display.clone(), e))?
            .len();
        if size == 0 {
            log::debug!("{display} is empty, skipping mapping");
            return Ok(MappedFile {
                path: display,
                map: None,
            });
        }
        // SAFETY: the mapping is read-only and owned by `MappedFile`; callers must not
        // truncate the file while it is mapped.
        let map = unsafe { Mmap::map(&file) }.map_err(|e| Error::io(display.clone(), e))?;
        #[cfg(unix)]
        {
            let _ = map.advise(memmap2::Advice::Sequential);
        }
        log::debug!("mapped {display} ({size} bytes)");
        Ok(MappedFile {
            path: display,
            map: Some(map),
        })
    }

    /// Maps the file at `path` and wraps it into a [`SharedSource`].
    pub fn open_shared<P: AsRef<Path>>(path: P) -> Result<SharedSource> {
        Ok(crate::share(MappedFile::open(path)?))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ByteSource for MappedFile {
    fn as_bytes(&self) -> &[u8] {
        match &self.map {
            Some(map) => &map[..],
            None => &[],
        }
    }

    fn name(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Debug for MappedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedFile")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish()
    }
}
