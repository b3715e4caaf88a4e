use crate::config::Config;
use crate::error::{AppError, Result};
use crate::input::InputSource;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "stream-sampler",
    version,
    about = "Creates a random representative sample of length SIZE out of the input.",
    long_about = "Creates a random representative sample of length SIZE out of the input.\n\
                  Input is either STDIN, a file, or randomly generated within application.\n\
                  If SEED is specified, then it's used for both - sample creation and input generation.",
    override_usage = "cat file.txt | stream-sampler -n SIZE"
)]
pub struct Cli {
    /// Sample size
    #[arg(short = 'n', long = "size", value_name = "SIZE", allow_negative_numbers = true)]
    pub size: i64,

    /// Seed for random number generator
    #[arg(short, long, value_name = "SEED", allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Size of random input to generate out of 'abcdefghijklmnoprstuwxyz'
    #[arg(short, long, value_name = "INPUT_SIZE", conflicts_with = "input")]
    pub generate: Option<u64>,

    /// Read input from a file instead of STDIN
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,
}

/// A validated invocation. Building one performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub sample_size: usize,
    pub seed: Option<u64>,
    pub source: InputSource,
}

impl Request {
    pub fn from_cli(cli: &Cli, config: &Config) -> Result<Self> {
        let sample_size = usize::try_from(cli.size).map_err(|_| {
            AppError::InvalidArgument(format!("sample size must not be negative: {}", cli.size))
        })?;
        if sample_size > config.max_sample_size {
            return Err(AppError::InvalidArgument(format!(
                "sample size {} exceeds limit {}",
                sample_size, config.max_sample_size
            )));
        }

        let source = match (&cli.generate, &cli.input) {
            (Some(len), _) => {
                if *len > config.max_generate_size {
                    return Err(AppError::InvalidArgument(format!(
                        "generated input size {} exceeds limit {}",
                        len, config.max_generate_size
                    )));
                }
                let len = usize::try_from(*len).map_err(|_| {
                    AppError::InvalidArgument(format!("generated input size too large: {}", len))
                })?;
                InputSource::Generated(len)
            }
            (None, Some(path)) => InputSource::File(path.clone()),
            (None, None) => InputSource::Stdin,
        };

        Ok(Self {
            sample_size,
            // 保留位模式，负数种子同样可复现
            seed: cli.seed.map(|seed| seed as u64),
            source,
        })
    }
}
