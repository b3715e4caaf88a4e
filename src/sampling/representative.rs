use crate::core::{FrequencyTable, SampleMetadata, SampleResult, Sampler};
use crate::error::{AppError, Result};
use rand::{Rng, RngCore};
use tracing::debug;

/// The span of offsets `[start, end)` owned by one byte value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CumulativeRange {
    pub value: u8,
    pub start: u64,
    pub end: u64,
}

/// Byte values laid end to end in descending-count order (ties by ascending
/// value), so that every offset in `[0, total)` belongs to exactly one value.
#[derive(Debug, Clone)]
pub struct CumulativeRanks {
    ranges: Vec<CumulativeRange>,
    total: u64,
}

impl CumulativeRanks {
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        let ranges = table
            .ranked()
            .into_iter()
            .scan(0u64, |before, (value, count)| {
                let start = *before;
                *before += count;
                Some(CumulativeRange {
                    value,
                    start,
                    end: *before,
                })
            })
            .collect();

        let ranks = Self {
            ranges,
            total: table.total(),
        };
        ranks.check_partition()?;
        Ok(ranks)
    }

    fn check_partition(&self) -> Result<()> {
        let covered = self.ranges.iter().try_fold(0u64, |expected, range| {
            if range.start == expected && range.end > range.start {
                Ok(range.end)
            } else {
                Err(AppError::InvariantViolation(format!(
                    "range {:?} does not continue at offset {}",
                    range, expected
                )))
            }
        })?;

        if covered != self.total {
            return Err(AppError::InvariantViolation(format!(
                "ranges cover {} offsets, table holds {}",
                covered, self.total
            )));
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn ranges(&self) -> &[CumulativeRange] {
        &self.ranges
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// The value occupying `offset`, or `None` past the end of the stream.
    pub fn resolve(&self, offset: u64) -> Option<u8> {
        if offset >= self.total {
            return None;
        }
        let idx = self.ranges.partition_point(|r| r.end <= offset);
        self.ranges.get(idx).map(|r| r.value)
    }
}

/// Draw one offset uniformly from `[0, total)`, as `floor(total * u)`.
/// `total` must be positive.
pub fn draw_offset(total: u64, rng: &mut dyn RngCore) -> u64 {
    let u: f64 = rng.gen();
    // total 很大时 f64 舍入可能恰好得到 total
    ((total as f64 * u) as u64).min(total.saturating_sub(1))
}

/// Map each offset to its byte value, keeping the order of `offsets`.
///
/// Offsets are pulled one at a time, so a lazy iterator of draws is never
/// materialized. An empty table pulls nothing.
pub fn resolve_offsets<I>(table: &FrequencyTable, offsets: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = u64>,
{
    if table.is_empty() {
        return Ok(Vec::new());
    }

    let ranks = CumulativeRanks::build(table)?;
    offsets
        .into_iter()
        .map(|offset| {
            ranks.resolve(offset).ok_or_else(|| {
                AppError::InvariantViolation(format!(
                    "offset {} outside [0, {})",
                    offset,
                    ranks.total()
                ))
            })
        })
        .collect()
}

pub struct RepresentativeSampler;

impl Sampler for RepresentativeSampler {
    fn sample(
        &self,
        table: &FrequencyTable,
        sample_size: usize,
        rng: &mut dyn RngCore,
    ) -> Result<SampleResult> {
        let total = table.total();

        // 边抽取边解析；空输入时不抽取偏移，样本为空
        let draws = (0..sample_size).map(|_| draw_offset(total, &mut *rng));
        let data = resolve_offsets(table, draws)?;
        debug!(total, drawn = data.len(), "offsets resolved");

        let sample_len = data.len();

        Ok(SampleResult {
            data,
            metadata: SampleMetadata {
                original_size: total,
                distinct_values: table.distinct(),
                sample_size: sample_len,
                method: "representative".to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Replays a fixed list of raw 64-bit draws, cycling when exhausted.
    struct FixedDraws {
        values: Vec<u64>,
        next: usize,
    }

    impl FixedDraws {
        fn new(values: Vec<u64>) -> Self {
            Self { values, next: 0 }
        }

        /// Draws whose `gen::<f64>()` lands in the middle of each offset.
        fn hitting(offsets: &[u64], total: u64) -> Self {
            let raw = offsets
                .iter()
                .map(|&o| {
                    let u = (o as f64 + 0.5) / total as f64;
                    ((u * (1u64 << 53) as f64) as u64) << 11
                })
                .collect();
            Self::new(raw)
        }
    }

    impl RngCore for FixedDraws {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            let v = self.values[self.next % self.values.len()];
            self.next += 1;
            v
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn weighted_table() -> FrequencyTable {
        FrequencyTable::from_pairs([(b'a', 1), (b'b', 2), (b'c', 3), (b'd', 4), (b'e', 5)])
    }

    #[test]
    fn single_value_collapses() {
        let table = FrequencyTable::from_pairs([(b'f', 1)]);
        assert_eq!(resolve_offsets(&table, [0, 0, 0]).unwrap(), b"fff".to_vec());

        let mut rng = StdRng::seed_from_u64(7);
        let result = RepresentativeSampler.sample(&table, 3, &mut rng).unwrap();
        assert_eq!(result.data, b"fff".to_vec());
    }

    #[test]
    fn weighted_offsets_resolve() {
        let table = weighted_table();
        let ranks = CumulativeRanks::build(&table).unwrap();
        let bounds: Vec<(u8, u64, u64)> = ranks
            .ranges()
            .iter()
            .map(|r| (r.value, r.start, r.end))
            .collect();
        assert_eq!(
            bounds,
            vec![
                (b'e', 0, 5),
                (b'd', 5, 9),
                (b'c', 9, 12),
                (b'b', 12, 14),
                (b'a', 14, 15)
            ]
        );

        let sample = resolve_offsets(&table, [4, 8, 11, 13, 14]).unwrap();
        assert_eq!(sample, b"edcba".to_vec());
    }

    #[test]
    fn output_follows_draw_order() {
        let table = weighted_table();
        let sample = resolve_offsets(&table, [14, 0, 9, 14, 5]).unwrap();
        assert_eq!(sample, b"aecad".to_vec());
    }

    #[test]
    fn every_offset_resolved_exactly_once() {
        let table = FrequencyTable::from_pairs([
            (0, 3),
            (b'x', 7),
            (b'y', 7),
            (200, 1),
            (255, 12),
            (b'k', 2),
        ]);
        let ranks = CumulativeRanks::build(&table).unwrap();

        let mut seen = FrequencyTable::new();
        for offset in 0..table.total() {
            let value = ranks.resolve(offset).expect("offset inside stream");
            seen.record_slice(&[value]);
        }

        assert_eq!(seen, table);
        assert_eq!(ranks.resolve(table.total()), None);
    }

    #[test]
    fn equal_counts_order_by_value() {
        let table = FrequencyTable::from_pairs([(b'q', 2), (b'b', 2)]);
        assert_eq!(resolve_offsets(&table, [0, 1, 2, 3]).unwrap(), b"bbqq".to_vec());
    }

    #[test]
    fn out_of_range_offset_is_invariant_violation() {
        let table = weighted_table();
        let err = resolve_offsets(&table, [15]).unwrap_err();
        assert!(matches!(err, AppError::InvariantViolation(_)));
    }

    #[test]
    fn sampler_uses_draws_in_order() {
        let table = weighted_table();
        let mut rng = FixedDraws::hitting(&[4, 8, 11, 13, 14], table.total());

        let result = RepresentativeSampler.sample(&table, 5, &mut rng).unwrap();

        assert_eq!(result.data, b"edcba".to_vec());
        assert_eq!(result.metadata.original_size, 15);
        assert_eq!(result.metadata.distinct_values, 5);
        assert_eq!(result.metadata.sample_size, 5);
    }

    #[test]
    fn zero_draw_maps_to_first_offset() {
        let mut rng = FixedDraws::new(vec![0]);
        let offsets: Vec<u64> = (0..3).map(|_| draw_offset(15, &mut rng)).collect();
        assert_eq!(offsets, vec![0, 0, 0]);
    }

    #[test]
    fn largest_draw_stays_in_range() {
        let mut rng = FixedDraws::new(vec![u64::MAX]);
        assert_eq!(draw_offset(15, &mut rng), 14);

        let total = (1u64 << 53) + 1;
        assert!(draw_offset(total, &mut rng) < total);
    }

    #[test]
    fn one_draw_per_sampled_byte() {
        let table = weighted_table();
        let mut rng = FixedDraws::hitting(&[0, 14], table.total());

        let result = RepresentativeSampler.sample(&table, 5, &mut rng).unwrap();

        assert_eq!(result.data, b"eaeae".to_vec());
        assert_eq!(rng.next, 5);
    }

    #[test]
    fn empty_table_gives_empty_sample() {
        let table = FrequencyTable::new();
        let mut rng = StdRng::seed_from_u64(1);

        let result = RepresentativeSampler.sample(&table, 5, &mut rng).unwrap();

        assert!(result.data.is_empty());
        assert!(resolve_offsets(&table, [0, 3]).unwrap().is_empty());

        let mut draws = FixedDraws::new(vec![0]);
        RepresentativeSampler.sample(&table, 5, &mut draws).unwrap();
        assert_eq!(draws.next, 0);
    }

    #[test]
    fn zero_sample_size_gives_empty_sample() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = RepresentativeSampler
            .sample(&weighted_table(), 0, &mut rng)
            .unwrap();
        assert!(result.data.is_empty());
    }

    #[test]
    fn sample_only_contains_input_values() {
        let input = b"THEQUICKBROWNFOXJUMPEDOVERTHELAZYDOG";
        let table = FrequencyTable::from_pairs(input.iter().map(|&b| (b, 1)));

        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = RepresentativeSampler.sample(&table, 5, &mut rng).unwrap();
            assert_eq!(result.data.len(), 5);
            for b in result.data {
                assert!(input.contains(&b), "Unexpected byte {}", b);
            }
        }
    }

    #[test]
    fn same_seed_same_sample() {
        let table = weighted_table();
        let mut first = StdRng::seed_from_u64(12345);
        let mut second = StdRng::seed_from_u64(12345);

        let a = RepresentativeSampler.sample(&table, 64, &mut first).unwrap();
        let b = RepresentativeSampler.sample(&table, 64, &mut second).unwrap();

        assert_eq!(a.data, b.data);
    }

    #[test]
    fn sample_tracks_frequencies() {
        let table = FrequencyTable::from_pairs([(b'a', 900), (b'b', 100)]);
        let mut rng = StdRng::seed_from_u64(42);

        let result = RepresentativeSampler.sample(&table, 10_000, &mut rng).unwrap();
        let a_share =
            result.data.iter().filter(|&&b| b == b'a').count() as f64 / result.data.len() as f64;

        assert!((a_share - 0.9).abs() < 0.02, "share of 'a' was {}", a_share);
    }
}
