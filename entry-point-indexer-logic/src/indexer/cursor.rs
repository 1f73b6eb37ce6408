//! Scan cursor for a single (chain, entry point) stream.
//!
//! Logs and transactions are fetched by independent streams, each with its own
//! persisted maximum block. Every cycle re-requests the last `rewind` blocks below
//! that maximum, so blocks reorganized within the window are picked up again.
//! The overlap produces duplicates which the writer absorbs through upserts.

use alloy::primitives::BlockNumber;

/// First block to request from the explorer.
///
/// `persisted_max` is the highest block already stored for the stream, `None`
/// when nothing has been stored yet.
pub fn next_from_block(
    start_block: BlockNumber,
    persisted_max: Option<BlockNumber>,
    rewind: u64,
) -> BlockNumber {
    match persisted_max {
        Some(max) if start_block < max.saturating_sub(rewind) => max - rewind,
        _ => start_block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::nothing_persisted(100, None, 100)]
    #[case::behind_start_block(100, Some(50), 100)]
    #[case::inside_rewind_window(100, Some(105), 100)]
    #[case::exactly_at_window(100, Some(110), 100)]
    #[case::past_window(100, Some(111), 101)]
    #[case::far_ahead(0, Some(18_000_000), 17_999_990)]
    #[case::max_below_rewind(0, Some(5), 0)]
    fn computes_from_block(
        #[case] start_block: BlockNumber,
        #[case] persisted_max: Option<BlockNumber>,
        #[case] expected: BlockNumber,
    ) {
        assert_eq!(next_from_block(start_block, persisted_max, 10), expected);
    }

    #[test]
    fn covers_rewind_window() {
        for max in 0..100u64 {
            for start in 0..100u64 {
                let from = next_from_block(start, Some(max), 10);
                assert!(from >= start);
                if max.saturating_sub(10) > start {
                    assert!(from <= max - 10);
                }
            }
        }
    }
}
