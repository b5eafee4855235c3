use std::time::Instant;

use super::{common_prefix, common_suffix, find, Symbol};

/// A shared block that covers at least half of the longer text, together
/// with the fragments on either side of it in both texts.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct HalfMatch<'a, T> {
    pub old_a: &'a [T],
    pub old_b: &'a [T],
    pub new_a: &'a [T],
    pub new_b: &'a [T],
    pub common: &'a [T],
}

/// Same shape as [`HalfMatch`], but oriented by length rather than by side
struct Split<'a, T> {
    long_a: &'a [T],
    long_b: &'a [T],
    short_a: &'a [T],
    short_b: &'a [T],
    common: &'a [T],
}

/// Do the two texts share a substring which is at least half the length of
/// the longer text?
///
/// This speedup can produce non-minimal diffs, so it never runs without a
/// deadline.
pub(crate) fn half_match<'a, T: Symbol>(
    old: &'a [T],
    new: &'a [T],
    deadline: Option<Instant>,
) -> Option<HalfMatch<'a, T>> {
    deadline?;

    let old_longer = old.len() > new.len();
    let (long, short) = if old_longer { (old, new) } else { (new, old) };
    if long.len() < 4 || short.len() * 2 < long.len() {
        return None;
    }

    // Seed on the second and third quarters of the long text
    let first = split_at_seed(long, short, long.len().div_ceil(4));
    let second = split_at_seed(long, short, long.len().div_ceil(2));
    let split = match (first, second) {
        (None, None) => return None,
        (Some(split), None) | (None, Some(split)) => split,
        (Some(first), Some(second)) => {
            if first.common.len() > second.common.len() {
                first
            } else {
                second
            }
        }
    };

    let hm = if old_longer {
        HalfMatch {
            old_a: split.long_a,
            old_b: split.long_b,
            new_a: split.short_a,
            new_b: split.short_b,
            common: split.common,
        }
    } else {
        HalfMatch {
            old_a: split.short_a,
            old_b: split.short_b,
            new_a: split.long_a,
            new_b: split.long_b,
            common: split.common,
        }
    };
    Some(hm)
}

/// Grow every occurrence of the quarter-length seed at `start` into the
/// largest block shared by both texts, keeping the best one if it covers at
/// least half of the long text.
fn split_at_seed<'a, T: Symbol>(long: &'a [T], short: &'a [T], start: usize) -> Option<Split<'a, T>> {
    let seed = &long[start..start + long.len() / 4];
    let mut best: Option<Split<'a, T>> = None;
    let mut best_len = 0;
    let mut from = 0;

    while let Some(j) = find(short, seed, from) {
        let prefix_len = common_prefix(&long[start..], &short[j..]);
        let suffix_len = common_suffix(&long[..start], &short[..j]);
        if best_len < prefix_len + suffix_len {
            best_len = prefix_len + suffix_len;
            best = Some(Split {
                long_a: &long[..start - suffix_len],
                long_b: &long[start + prefix_len..],
                short_a: &short[..j - suffix_len],
                short_b: &short[j + prefix_len..],
                common: &short[j - suffix_len..j + prefix_len],
            });
        }
        from = j + 1;
    }

    best.filter(|split| split.common.len() * 2 >= long.len())
}
