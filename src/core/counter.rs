use crate::config::Config;
use crate::core::frequency::FrequencyTable;
use crate::error::{AppError, Result};
use rayon::prelude::*;
use std::io::{ErrorKind, Read};
use tracing::debug;

pub struct FrequencyCounter {
    read_buffer_size: usize,
    parallel_threshold: usize,
    chunk_size: usize,
}

impl FrequencyCounter {
    pub fn new(read_buffer_size: usize, parallel_threshold: usize, chunk_size: usize) -> Self {
        Self {
            read_buffer_size: read_buffer_size.max(1),
            parallel_threshold,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.read_buffer_size,
            config.parallel_threshold,
            config.chunk_size,
        )
    }

    /// Drain `source` and count every byte it yields.
    ///
    /// Any read fault aborts the count; no partial table escapes.
    pub fn count<R: Read>(&self, mut source: R) -> Result<FrequencyTable> {
        let mut table = FrequencyTable::new();
        let mut buf = vec![0u8; self.read_buffer_size];

        loop {
            match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => table.record_slice(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(AppError::ReadFailure(e)),
            }
        }

        debug!(total = table.total(), distinct = table.distinct(), "stream counted");
        Ok(table)
    }

    /// Count an in-memory buffer, fanning out over chunks once it is large enough.
    pub fn count_slice(&self, data: &[u8]) -> FrequencyTable {
        if data.len() <= self.parallel_threshold {
            let mut table = FrequencyTable::new();
            table.record_slice(data);
            return table;
        }

        debug!(
            len = data.len(),
            chunk_size = self.chunk_size,
            "counting buffer in parallel"
        );

        // 按块并行计数，再逐值求和合并
        data.par_chunks(self.chunk_size)
            .map(|chunk| {
                let mut partial = FrequencyTable::new();
                partial.record_slice(chunk);
                partial
            })
            .reduce(FrequencyTable::new, |mut acc, partial| {
                acc.merge(&partial);
                acc
            })
    }
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
