use crate::error::{AppError, Result};
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::path::Path;

/// An opened input file.
///
/// Only non-empty regular files are mapped. Pipes, character devices and
/// procfs entries report a length of 0 whatever they hold, so they are
/// streamed instead.
pub enum FileInput {
    Mapped(Mmap),
    Streamed(File),
}

impl FileInput {
    pub fn open(path: &Path) -> Result<Self> {
        let file_access = |source| AppError::FileAccess {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(file_access)?;
        let metadata = file.metadata().map_err(file_access)?;

        if !metadata.is_file() || metadata.len() == 0 {
            return Ok(Self::Streamed(file));
        }

        // 内存映射文件
        let mmap = unsafe { MmapOptions::new().map(&file).map_err(file_access)? };

        Ok(Self::Mapped(mmap))
    }
}
