use crate::cli::Request;
use crate::config::Config;
use crate::core::{FrequencyCounter, SampleResult, Sampler, TableStats};
use crate::error::{AppError, Result};
use crate::sampling::RepresentativeSampler;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io::{Read, Write};
use tracing::info;

/// Count the input, sample it and write the sample to `out`.
///
/// Nothing is written unless counting and sampling both succeed.
pub fn run<R: Read, W: Write>(
    request: &Request,
    config: &Config,
    stdin: R,
    mut out: W,
) -> Result<SampleResult> {
    // 未指定种子时随机选取，并记录以便复现
    let seed = request.seed.unwrap_or_else(rand::random);
    info!(seed, explicit = request.seed.is_some(), "random number generator seeded");
    let mut rng = StdRng::seed_from_u64(seed);

    let counter = FrequencyCounter::from_config(config);
    let table = request.source.count(&counter, stdin, &mut rng)?;
    info!(stats = %to_json(&TableStats::from(&table)), "input counted");

    let result = RepresentativeSampler.sample(&table, request.sample_size, &mut rng)?;

    out.write_all(&result.data).map_err(AppError::WriteFailure)?;
    out.flush().map_err(AppError::WriteFailure)?;

    info!(metadata = %to_json(&result.metadata), "sample written");

    Ok(result)
}

/// Render a log summary as JSON; an unserializable value logs as `null`.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}
