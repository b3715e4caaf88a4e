use crate::core::frequency::FrequencyTable;
use crate::error::Result;
use rand::RngCore;
use serde::Serialize;

pub trait Sampler: Send + Sync {
    fn sample(
        &self,
        table: &FrequencyTable,
        sample_size: usize,
        rng: &mut dyn RngCore,
    ) -> Result<SampleResult>;
}

#[derive(Debug, Clone)]
pub struct SampleResult {
    pub data: Vec<u8>,
    pub metadata: SampleMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleMetadata {
    pub original_size: u64,
    pub distinct_values: usize,
    pub sample_size: usize,
    pub method: String,
}
