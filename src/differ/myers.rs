use std::time::Instant;

use tracing::{debug, trace};

use super::{common_prefix, common_suffix, deadline_exceeded, find, half_match, Symbol};
use crate::cleanup::cleanup_merge;
use crate::{Diff, Ops};

/// Inputs longer than this on both sides are eligible for line-mode
const LINE_MODE_THRESHOLD: usize = 100;

/// Find the differences between two sequences.
///
/// Common prefix and suffix are trimmed before the middle is handed to
/// [`compute`]; the result is always normalized by a merge pass.
pub(crate) fn diff_main<T: Symbol>(
    old: &[T],
    new: &[T],
    line_mode: bool,
    deadline: Option<Instant>,
) -> Vec<Diff<T>> {
    if old == new {
        if old.is_empty() {
            return Vec::new();
        }
        return vec![Diff::new(Ops::Equal, old)];
    }

    let prefix = common_prefix(old, new);
    let (old_rest, new_rest) = (&old[prefix..], &new[prefix..]);
    let suffix = common_suffix(old_rest, new_rest);
    let old_mid = &old_rest[..old_rest.len() - suffix];
    let new_mid = &new_rest[..new_rest.len() - suffix];

    let mut diffs = compute(old_mid, new_mid, line_mode, deadline);

    if prefix > 0 {
        diffs.insert(0, Diff::new(Ops::Equal, &old[..prefix]));
    }
    if suffix > 0 {
        diffs.push(Diff::new(Ops::Equal, &old_rest[old_rest.len() - suffix..]));
    }

    cleanup_merge(&mut diffs);
    diffs
}

/// Diff two sequences that share no common prefix or suffix and are not equal
fn compute<T: Symbol>(
    old: &[T],
    new: &[T],
    line_mode: bool,
    deadline: Option<Instant>,
) -> Vec<Diff<T>> {
    if old.is_empty() {
        return vec![Diff::new(Ops::Insert, new)];
    }
    if new.is_empty() {
        return vec![Diff::new(Ops::Delete, old)];
    }

    let old_longer = old.len() > new.len();
    let (long, short) = if old_longer { (old, new) } else { (new, old) };

    // Shorter text is inside the longer one
    if let Some(idx) = find(long, short, 0) {
        let op = if old_longer { Ops::Delete } else { Ops::Insert };
        let mut diffs = Vec::with_capacity(3);
        if idx > 0 {
            diffs.push(Diff::new(op, &long[..idx]));
        }
        diffs.push(Diff::new(Ops::Equal, short));
        if idx + short.len() < long.len() {
            diffs.push(Diff::new(op, &long[idx + short.len()..]));
        }
        return diffs;
    }

    // After the containment check a single symbol cannot be an equality
    if short.len() == 1 {
        return vec![Diff::new(Ops::Delete, old), Diff::new(Ops::Insert, new)];
    }

    if let Some(hm) = half_match(old, new, deadline) {
        trace!(common = hm.common.len(), "splitting on half-match");
        let mut diffs = diff_main(hm.old_a, hm.new_a, line_mode, deadline);
        diffs.push(Diff::new(Ops::Equal, hm.common));
        diffs.extend(diff_main(hm.old_b, hm.new_b, line_mode, deadline));
        return diffs;
    }

    if line_mode && old.len() > LINE_MODE_THRESHOLD && new.len() > LINE_MODE_THRESHOLD {
        if let Some(diffs) = T::diff_lines(old, new, deadline) {
            return diffs;
        }
    }

    bisect(old, new, deadline)
}

/// Find the middle snake of the edit graph and split the problem there.
///
/// Walks the forward and reverse frontiers one depth at a time. If the
/// deadline passes or no overlap is found, the whole range is reported as a
/// single deletion followed by a single insertion.
pub(crate) fn bisect<T: Symbol>(old: &[T], new: &[T], deadline: Option<Instant>) -> Vec<Diff<T>> {
    let old_len = old.len() as isize;
    let new_len = new.len() as isize;
    let max_d = (old_len + new_len + 1) / 2;
    let v_offset = max_d;
    let v_length = 2 * max_d;

    // Furthest reaching x per diagonal; -1 marks an unreached diagonal
    let mut v1 = vec![-1isize; v_length as usize];
    let mut v2 = vec![-1isize; v_length as usize];
    v1[(v_offset + 1) as usize] = 0;
    v2[(v_offset + 1) as usize] = 0;

    let delta = old_len - new_len;
    // With an odd delta the forward path collides with the reverse one
    let front = delta % 2 != 0;

    // Offsets for the start and end of the k loops, used to skip diagonals
    // that already ran off the grid
    let mut k1start = 0;
    let mut k1end = 0;
    let mut k2start = 0;
    let mut k2end = 0;

    for d in 0..max_d {
        if deadline_exceeded(deadline) {
            debug!(old_len, new_len, depth = d, "deadline exceeded during bisection");
            break;
        }

        // Forward path
        let mut k1 = -d + k1start;
        while k1 <= d - k1end {
            let k1_offset = (v_offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1]) {
                v1[k1_offset + 1]
            } else {
                v1[k1_offset - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < old_len && y1 < new_len && old[x1 as usize] == new[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            v1[k1_offset] = x1;

            if x1 > old_len {
                // Ran off the right of the graph
                k1end += 2;
            } else if y1 > new_len {
                // Ran off the bottom of the graph
                k1start += 2;
            } else if front {
                let k2_offset = v_offset + delta - k1;
                if k2_offset >= 0 && k2_offset < v_length && v2[k2_offset as usize] != -1 {
                    // Mirror x2 onto the top-left coordinate system
                    let x2 = old_len - v2[k2_offset as usize];
                    if x1 >= x2 {
                        return bisect_split(old, new, x1 as usize, y1 as usize, deadline);
                    }
                }
            }
            k1 += 2;
        }

        // Reverse path
        let mut k2 = -d + k2start;
        while k2 <= d - k2end {
            let k2_offset = (v_offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1]) {
                v2[k2_offset + 1]
            } else {
                v2[k2_offset - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < old_len
                && y2 < new_len
                && old[(old_len - x2 - 1) as usize] == new[(new_len - y2 - 1) as usize]
            {
                x2 += 1;
                y2 += 1;
            }
            v2[k2_offset] = x2;

            if x2 > old_len {
                // Ran off the left of the graph
                k2end += 2;
            } else if y2 > new_len {
                // Ran off the top of the graph
                k2start += 2;
            } else if !front {
                let k1_offset = v_offset + delta - k2;
                if k1_offset >= 0 && k1_offset < v_length && v1[k1_offset as usize] != -1 {
                    let x1 = v1[k1_offset as usize];
                    let y1 = v_offset + x1 - k1_offset;
                    let x2 = old_len - x2;
                    if x1 >= x2 {
                        return bisect_split(old, new, x1 as usize, y1 as usize, deadline);
                    }
                }
            }
            k2 += 2;
        }
    }

    // Out of time, or the texts share nothing
    vec![Diff::new(Ops::Delete, old), Diff::new(Ops::Insert, new)]
}

/// Diff both halves around the middle snake and concatenate the results.
/// The caller's merge pass cleans up the seam.
fn bisect_split<T: Symbol>(
    old: &[T],
    new: &[T],
    x: usize,
    y: usize,
    deadline: Option<Instant>,
) -> Vec<Diff<T>> {
    let mut diffs = diff_main(&old[..x], &new[..y], false, deadline);
    diffs.extend(diff_main(&old[x..], &new[y..], false, deadline));
    diffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn diff(old: &str, new: &str) -> Vec<Diff> {
        diff_main(&chars(old), &chars(new), false, None)
    }

    #[test]
    fn test_trivial_cases() {
        assert_eq!(diff("", ""), vec![]);
        assert_eq!(diff("abc", "abc"), vec![Diff::equal("abc")]);
        assert_eq!(diff("a", "b"), vec![Diff::delete("a"), Diff::insert("b")]);
    }

    #[test]
    fn test_simple_insertions_and_deletions() {
        assert_eq!(
            diff("abc", "ab123c"),
            vec![Diff::equal("ab"), Diff::insert("123"), Diff::equal("c")]
        );
        assert_eq!(
            diff("a123bc", "abc"),
            vec![Diff::equal("a"), Diff::delete("123"), Diff::equal("bc")]
        );
        assert_eq!(
            diff("abc", "a123b456c"),
            vec![
                Diff::equal("a"),
                Diff::insert("123"),
                Diff::equal("b"),
                Diff::insert("456"),
                Diff::equal("c"),
            ]
        );
    }

    #[test]
    fn test_real_diffs() {
        assert_eq!(
            diff("Apples are a fruit.", "Bananas are also fruit."),
            vec![
                Diff::delete("Apple"),
                Diff::insert("Banana"),
                Diff::equal("s are a"),
                Diff::insert("lso"),
                Diff::equal(" fruit."),
            ]
        );
        assert_eq!(
            diff("1ayb2", "abxab"),
            vec![
                Diff::delete("1"),
                Diff::equal("a"),
                Diff::delete("y"),
                Diff::equal("b"),
                Diff::delete("2"),
                Diff::insert("xab"),
            ]
        );
        assert_eq!(
            diff("abcy", "xaxcxabc"),
            vec![Diff::insert("xaxcx"), Diff::equal("abc"), Diff::delete("y")]
        );
    }

    #[test]
    fn test_bisect() {
        let (old, new) = (chars("cat"), chars("map"));
        assert_eq!(
            bisect(&old, &new, None),
            vec![
                Diff::delete("c"),
                Diff::insert("m"),
                Diff::equal("a"),
                Diff::delete("t"),
                Diff::insert("p"),
            ]
        );
    }

    #[test]
    fn test_bisect_expired_deadline() {
        let (old, new) = (chars("cat"), chars("map"));
        let expired = Instant::now() - Duration::from_secs(1);
        assert_eq!(
            bisect(&old, &new, Some(expired)),
            vec![Diff::delete("cat"), Diff::insert("map")]
        );
    }

    #[test]
    fn test_expired_deadline_returns_full_replacement() {
        let mut rng = fastrand::Rng::with_seed(7);
        let old: Vec<char> = (0..5000).map(|_| rng.char('a'..='m')).collect();
        let new: Vec<char> = (0..5000).map(|_| rng.char('n'..='z')).collect();
        let expired = Instant::now() - Duration::from_secs(1);

        let started = Instant::now();
        for line_mode in [false, true] {
            let diffs = diff_main(&old, &new, line_mode, Some(expired));
            assert_eq!(
                diffs,
                vec![Diff::new(Ops::Delete, &old), Diff::new(Ops::Insert, &new)]
            );
        }
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_generic_over_line_codes() {
        let diffs = diff_main(&[1usize, 2, 3], &[1usize, 4, 3], true, None);
        assert_eq!(
            diffs,
            vec![
                Diff::new(Ops::Equal, &[1usize]),
                Diff::new(Ops::Delete, &[2]),
                Diff::new(Ops::Insert, &[4]),
                Diff::new(Ops::Equal, &[3]),
            ]
        );
    }
}
