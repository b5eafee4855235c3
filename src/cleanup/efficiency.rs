use tracing::trace;

use super::cleanup_merge;
use crate::{Diff, Ops};

/// Default cost of an extra edit operation, in characters
pub const DEFAULT_EDIT_COST: usize = 4;

/// Reduce the number of edits by eliminating operationally trivial
/// equalities: those short enough that folding them into the surrounding
/// edits is cheaper than keeping an extra edit operation.
pub fn cleanup_efficiency<T: Copy + Eq>(diffs: &mut Vec<Diff<T>>, edit_cost: usize) {
    let mut changes = false;
    // Indices of candidate equalities, most recent last
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<usize> = None;
    // Is there an insertion/deletion before the last equality?
    let mut pre_ins = false;
    let mut pre_del = false;
    // Is there an insertion/deletion after the last equality?
    let mut post_ins = false;
    let mut post_del = false;
    let mut pointer = 0;

    while pointer < diffs.len() {
        let diff = &diffs[pointer];
        if diff.op == Ops::Equal {
            if diff.data.len() < edit_cost && (post_ins || post_del) {
                // Candidate found
                equalities.push(pointer);
                pre_ins = post_ins;
                pre_del = post_del;
                last_equality = Some(diff.data.len());
            } else {
                // Not a candidate, and can never become one
                equalities.clear();
                last_equality = None;
            }
            post_ins = false;
            post_del = false;
        } else {
            if diff.op == Ops::Delete {
                post_del = true;
            } else {
                post_ins = true;
            }

            // Split when both edit kinds sit on both sides, as in
            // <ins>A</ins><del>B</del>XY<ins>C</ins><del>D</del>, or when a very
            // short equality has three of the four, as in
            // <ins>A</ins>X<ins>C</ins><del>D</del>
            let flags = [pre_ins, pre_del, post_ins, post_del];
            let set = flags.iter().filter(|&&flag| flag).count();

            if let Some(len) = last_equality {
                let surrounded = pre_ins && pre_del && post_ins && post_del;
                if surrounded || (len * 2 < edit_cost && set == 3) {
                    if let Some(idx) = equalities.pop() {
                        let text = diffs[idx].data.clone();
                        diffs.insert(idx, Diff { op: Ops::Delete, data: text });
                        diffs[idx + 1].op = Ops::Insert;
                    }
                    last_equality = None;
                    changes = true;

                    if pre_ins && pre_del {
                        // No changes made which could affect previous entries, keep going
                        post_ins = true;
                        post_del = true;
                        equalities.clear();
                    } else {
                        equalities.pop();
                        post_ins = false;
                        post_del = false;
                        // Rescan from the previous candidate, or from the
                        // start so earlier edits count towards the flags
                        pointer = equalities.last().map_or(0, |&idx| idx + 1);
                        continue;
                    }
                }
            }
        }
        pointer += 1;
    }

    if changes {
        trace!(records = diffs.len(), "efficiency cleanup eliminated equalities");
        cleanup_merge(diffs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::test_support::{random_pair, raw_diff};

    fn efficiency(mut diffs: Vec<Diff>, edit_cost: usize) -> Vec<Diff> {
        cleanup_efficiency(&mut diffs, edit_cost);
        diffs
    }

    #[test]
    fn test_null_case() {
        assert_eq!(efficiency(vec![], DEFAULT_EDIT_COST), vec![]);
    }

    #[test]
    fn test_no_elimination() {
        let diffs = vec![
            Diff::delete("ab"),
            Diff::insert("12"),
            Diff::equal("wxyz"),
            Diff::delete("cd"),
            Diff::insert("34"),
        ];
        assert_eq!(efficiency(diffs.clone(), DEFAULT_EDIT_COST), diffs);
    }

    #[test]
    fn test_four_edit_elimination() {
        assert_eq!(
            efficiency(
                vec![
                    Diff::delete("ab"),
                    Diff::insert("12"),
                    Diff::equal("xyz"),
                    Diff::delete("cd"),
                    Diff::insert("34"),
                ],
                DEFAULT_EDIT_COST
            ),
            vec![Diff::delete("abxyzcd"), Diff::insert("12xyz34")]
        );
    }

    #[test]
    fn test_three_edit_elimination() {
        assert_eq!(
            efficiency(
                vec![
                    Diff::insert("12"),
                    Diff::equal("x"),
                    Diff::delete("cd"),
                    Diff::insert("34"),
                ],
                DEFAULT_EDIT_COST
            ),
            vec![Diff::delete("xcd"), Diff::insert("12x34")]
        );
    }

    #[test]
    fn test_backpass_elimination() {
        assert_eq!(
            efficiency(
                vec![
                    Diff::delete("ab"),
                    Diff::insert("12"),
                    Diff::equal("xy"),
                    Diff::insert("34"),
                    Diff::equal("z"),
                    Diff::delete("cd"),
                    Diff::insert("56"),
                ],
                DEFAULT_EDIT_COST
            ),
            vec![Diff::delete("abxyzcd"), Diff::insert("12xy34z56")]
        );
    }

    #[test]
    fn test_high_cost_elimination() {
        assert_eq!(
            efficiency(
                vec![
                    Diff::delete("ab"),
                    Diff::insert("12"),
                    Diff::equal("wxyz"),
                    Diff::delete("cd"),
                    Diff::insert("34"),
                ],
                5
            ),
            vec![Diff::delete("abwxyzcd"), Diff::insert("12wxyz34")]
        );
    }

    #[test]
    fn test_elimination_rescans_earlier_edits() {
        let diffs = vec![
            Diff::delete("a"),
            Diff::insert("b"),
            Diff::equal("xy"),
            Diff::insert("d"),
            Diff::delete("c"),
            Diff::equal("pq"),
            Diff::insert("e"),
            Diff::equal("z"),
            Diff::delete("f"),
            Diff::insert("g"),
        ];
        let once = efficiency(diffs, DEFAULT_EDIT_COST);
        assert_eq!(
            once,
            vec![Diff::delete("axycpqzf"), Diff::insert("bxydpqezg")]
        );
        assert_eq!(efficiency(once.clone(), DEFAULT_EDIT_COST), once);
    }

    #[test]
    fn test_efficiency_is_idempotent() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..500 {
            let (old, new) = random_pair(&mut rng);
            for edit_cost in [1, 2, DEFAULT_EDIT_COST, 6] {
                let once = efficiency(raw_diff(&old, &new), edit_cost);
                assert_eq!(crate::text_old(&once), old);
                assert_eq!(crate::text_new(&once), new);
                assert_eq!(efficiency(once.clone(), edit_cost), once, "{old:?} -> {new:?}");
            }
        }
    }

    #[test]
    fn test_idempotent_on_results() {
        let once = efficiency(
            vec![
                Diff::delete("ab"),
                Diff::insert("12"),
                Diff::equal("xyz"),
                Diff::delete("cd"),
                Diff::insert("34"),
            ],
            DEFAULT_EDIT_COST,
        );
        assert_eq!(efficiency(once.clone(), DEFAULT_EDIT_COST), once);
    }
}
