pub mod counter;
pub mod frequency;
pub mod sampler;

pub use counter::FrequencyCounter;
pub use frequency::{FrequencyTable, TableStats};
pub use sampler::{SampleMetadata, SampleResult, Sampler};
