//! Cursor arithmetic.
//!
//! Record identities and the persisted cursor are 1-based; positions in the
//! fetched record sequence are 0-based. [`position_of`] and [`identity_of`]
//! are the only places that convert between the two.

use std::ops::Range;

/// 0-based position of the record with the given 1-based identity.
/// A cursor of 0 (never persisted, but tolerated) maps to position 0.
pub fn position_of(identity: u64) -> usize {
    usize::try_from(identity.saturating_sub(1)).unwrap_or(usize::MAX)
}

/// 1-based identity of the record at the given 0-based position.
pub fn identity_of(position: usize) -> u64 {
    position as u64 + 1
}

/// Positions processed by one run: up to `max_per_run` records starting at
/// the cursor, clamped to the record count. Empty when the cursor is past
/// the last record.
pub fn select_window(total: usize, cursor: u64, max_per_run: usize) -> Range<usize> {
    let start = position_of(cursor).min(total);
    let end = start.saturating_add(max_per_run).min(total);
    start..end
}

/// Cursor value for the next run.
///
/// - at least one success: one past the last successful identity
/// - attempts made but all failed: unchanged, so the window is retried
/// - nothing to attempt: one past the last record, so later runs short-circuit
pub fn next_cursor(
    cursor: u64,
    window_was_empty: bool,
    last_success: Option<u64>,
    total: usize,
) -> u64 {
    match last_success {
        Some(last) => last + 1,
        None if window_was_empty => identity_of(total),
        None => cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_identity_conversion() {
        assert_eq!(position_of(1), 0);
        assert_eq!(position_of(6), 5);
        assert_eq!(position_of(0), 0);
        assert_eq!(identity_of(0), 1);
        assert_eq!(identity_of(9), 10);
        for id in 1..50 {
            assert_eq!(identity_of(position_of(id)), id);
        }
    }

    #[test]
    fn test_window_from_start() {
        assert_eq!(select_window(3, 1, 5), 0..3);
        assert_eq!(select_window(10, 1, 2), 0..2);
    }

    #[test]
    fn test_window_mid_sequence_clamped_to_end() {
        assert_eq!(select_window(10, 6, 5), 5..10);
        assert_eq!(select_window(10, 8, 5), 7..10);
    }

    #[test]
    fn test_window_empty_past_end() {
        assert!(select_window(10, 11, 5).is_empty());
        assert!(select_window(10, 500, 5).is_empty());
        assert!(select_window(0, 1, 5).is_empty());
    }

    #[test]
    fn test_window_zero_cursor_clamps_to_start() {
        assert_eq!(select_window(4, 0, 2), 0..2);
    }

    #[test]
    fn test_window_huge_max_per_run_does_not_overflow() {
        assert_eq!(select_window(4, 2, usize::MAX), 1..4);
    }

    #[test]
    fn test_next_cursor_after_success() {
        assert_eq!(next_cursor(6, false, Some(8), 10), 9);
        assert_eq!(next_cursor(1, false, Some(3), 3), 4);
    }

    #[test]
    fn test_next_cursor_all_failed_stalls() {
        assert_eq!(next_cursor(6, false, None, 10), 6);
    }

    #[test]
    fn test_next_cursor_empty_window_skips_to_end() {
        assert_eq!(next_cursor(11, true, None, 10), 11);
        assert_eq!(next_cursor(1, true, None, 0), 1);
    }
}
