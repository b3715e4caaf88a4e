pub mod file;
pub mod generator;

pub use file::FileInput;

use crate::core::{FrequencyCounter, FrequencyTable};
use crate::error::Result;
use rand::RngCore;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

/// Where the bytes to be sampled come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
    Generated(usize),
}

impl InputSource {
    /// Count the whole input. `stdin` is only read for [`InputSource::Stdin`];
    /// `rng` is only consumed for [`InputSource::Generated`].
    pub fn count<R: Read>(
        &self,
        counter: &FrequencyCounter,
        stdin: R,
        rng: &mut dyn RngCore,
    ) -> Result<FrequencyTable> {
        match self {
            Self::Stdin => counter.count(stdin),
            Self::File(path) => match FileInput::open(path)? {
                FileInput::Mapped(mmap) => {
                    debug!(path = %path.display(), len = mmap.len(), "file mapped");
                    Ok(counter.count_slice(&mmap))
                }
                FileInput::Streamed(file) => {
                    debug!(path = %path.display(), "file streamed");
                    counter.count(file)
                }
            },
            Self::Generated(len) => {
                let data = generator::generate(*len, rng);
                debug!(len, "input generated");
                Ok(counter.count_slice(&data))
            }
        }
    }
}
