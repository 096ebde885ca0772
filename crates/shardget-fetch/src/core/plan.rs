use std::sync::Arc;

use crate::data::{ByteRange, Resource, Shard};
use crate::error::{Error, Result};

/// Split a resource into `concurrency` contiguous, non-overlapping shards.
///
/// Every shard but the last is exactly `length / concurrency` bytes; the last
/// absorbs the remainder, so together they cover `[0, length)` exactly.
/// Shards are returned in index order and `shards[i].index == i`.
///
/// # Errors
///
/// Returns [`Error::InvalidConcurrency`] if `concurrency` is 0.
pub fn plan_shards(resource: &Resource, concurrency: usize) -> Result<Vec<Shard>> {
    if concurrency == 0 {
        return Err(Error::InvalidConcurrency(concurrency));
    }

    let url: Arc<str> = Arc::from(resource.url.as_str());
    let shard_length = resource.length / concurrency as u64;

    let shards = (0..concurrency)
        .map(|index| {
            let start = index as u64 * shard_length;
            let end = if index == concurrency - 1 {
                resource.length
            } else {
                start + shard_length
            };

            Shard {
                url: Arc::clone(&url),
                index,
                range: ByteRange::new(start, end),
            }
        })
        .collect();

    Ok(shards)
}

/// Clamp a requested shard count so that no shard is empty.
///
/// Returns `requested` unchanged when `1 <= requested <= length`. A zero
/// request is passed through so the planner can reject it.
pub fn effective_concurrency(length: u64, requested: usize) -> usize {
    match usize::try_from(length) {
        Ok(length) if length > 0 => requested.min(length),
        Ok(_) => requested.min(1),
        Err(_) => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(length: u64) -> Resource {
        Resource::new("http://example.test/blob", length)
    }

    fn spans(shards: &[Shard]) -> Vec<(u64, u64)> {
        shards.iter().map(|s| (s.range.start, s.range.end)).collect()
    }

    #[test]
    fn even_split() {
        let shards = plan_shards(&resource(1000), 4).unwrap();

        assert_eq!(spans(&shards), vec![(0, 250), (250, 500), (500, 750), (750, 1000)]);
    }

    #[test]
    fn remainder_goes_to_last_shard() {
        let shards = plan_shards(&resource(1003), 4).unwrap();

        assert_eq!(shards[..3].iter().map(Shard::len).collect::<Vec<_>>(), vec![250, 250, 250]);
        assert_eq!(shards[3].len(), 1003 - 3 * 250);
    }

    #[test]
    fn single_shard_spans_everything() {
        let shards = plan_shards(&resource(77), 1).unwrap();

        assert_eq!(shards.len(), 1);
        assert_eq!(shards[0].range, ByteRange::new(0, 77));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        assert!(matches!(
            plan_shards(&resource(10), 0),
            Err(Error::InvalidConcurrency(0))
        ));
    }

    #[test]
    fn shards_partition_the_resource() {
        for length in [1u64, 2, 7, 100, 1000, 4097] {
            for concurrency in 1..=length.min(40) as usize {
                let shards = plan_shards(&resource(length), concurrency).unwrap();

                assert_eq!(shards.len(), concurrency);
                assert_eq!(shards[0].range.start, 0);
                assert_eq!(shards.last().unwrap().range.end, length);

                for (position, shard) in shards.iter().enumerate() {
                    assert_eq!(shard.index, position);
                    assert!(!shard.is_empty(), "empty shard for L={length} N={concurrency}");
                }
                for pair in shards.windows(2) {
                    assert_eq!(pair[0].range.end, pair[1].range.start);
                }

                let total: u64 = shards.iter().map(Shard::len).sum();
                assert_eq!(total, length);
            }
        }
    }

    #[test]
    fn planning_is_deterministic() {
        let first = plan_shards(&resource(12_345), 7).unwrap();
        let second = plan_shards(&resource(12_345), 7).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn shards_share_the_resource_url() {
        let shards = plan_shards(&resource(10), 3).unwrap();

        assert!(shards.iter().all(|s| &*s.url == "http://example.test/blob"));
    }

    #[test]
    fn concurrency_is_clamped_to_length() {
        assert_eq!(effective_concurrency(1000, 16), 16);
        assert_eq!(effective_concurrency(5, 16), 5);
        assert_eq!(effective_concurrency(1, 16), 1);
        assert_eq!(effective_concurrency(1000, 0), 0);
    }
}
