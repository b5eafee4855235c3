use tracing::trace;

use super::{cleanup_efficiency, cleanup_semantic};
use crate::{Diff, Ops};

/// Letters and digits form words
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Grow every replacement out to whole words.
///
/// A negative `edit_cost` runs semantic cleanup first, a positive one runs
/// efficiency cleanup with that cost, zero runs neither. Afterwards each
/// adjacent deletion/insertion pair borrows the word characters it cuts
/// into from the neighbouring equalities, so that no word is only partly
/// replaced. Partial-word replacements look fine left-to-right but break
/// apart once bidirectional text is laid out.
///
/// Widened edits can make further equalities trivial, so both steps repeat
/// until the sequence stops changing.
pub fn cleanup_word_semantic<F>(diffs: &mut Vec<Diff>, edit_cost: i32, is_word: F)
where
    F: Fn(char) -> bool,
{
    loop {
        let before = diffs.clone();
        match edit_cost {
            cost if cost < 0 => cleanup_semantic(diffs),
            cost if cost > 0 => cleanup_efficiency(diffs, cost.unsigned_abs() as usize),
            _ => {}
        }
        extend_to_words(diffs, &is_word);
        if *diffs == before {
            break;
        }
    }
}

fn extend_to_words<F>(diffs: &mut Vec<Diff>, is_word: &F)
where
    F: Fn(char) -> bool,
{
    let mut removed = false;
    let mut pointer = 0;

    while pointer + 1 < diffs.len() {
        let pair = (diffs[pointer].op, diffs[pointer + 1].op);
        if !matches!(pair, (Ops::Delete, Ops::Insert) | (Ops::Insert, Ops::Delete)) {
            pointer += 1;
            continue;
        }

        // Borrow the tail of a word from the preceding equality
        if pointer > 0 && diffs[pointer - 1].op == Ops::Equal {
            let starts_in_word = diffs[pointer..pointer + 2]
                .iter()
                .any(|edit| edit.data.first().is_some_and(|&c| is_word(c)));
            let previous = &diffs[pointer - 1].data;
            let run = previous.iter().rev().take_while(|&&c| is_word(c)).count();

            if starts_in_word && run > 0 {
                let at = previous.len() - run;
                let borrowed = diffs[pointer - 1].data.split_off(at);
                for edit in &mut diffs[pointer..pointer + 2] {
                    edit.data.splice(0..0, borrowed.iter().copied());
                }
                if diffs[pointer - 1].data.is_empty() {
                    diffs.remove(pointer - 1);
                    pointer -= 1;
                    removed = true;
                }
            }
        }

        // Borrow the head of a word from the following equality
        if pointer + 2 < diffs.len() && diffs[pointer + 2].op == Ops::Equal {
            let ends_in_word = diffs[pointer..pointer + 2]
                .iter()
                .any(|edit| edit.data.last().is_some_and(|&c| is_word(c)));
            let run = diffs[pointer + 2]
                .data
                .iter()
                .take_while(|&&c| is_word(c))
                .count();

            if ends_in_word && run > 0 {
                let borrowed: Vec<char> = diffs[pointer + 2].data.drain(..run).collect();
                for edit in &mut diffs[pointer..pointer + 2] {
                    edit.data.extend_from_slice(&borrowed);
                }
                if diffs[pointer + 2].data.is_empty() {
                    diffs.remove(pointer + 2);
                    removed = true;
                }
            }
        }

        pointer += 2;
    }

    if removed {
        trace!("word cleanup consumed whole equalities");
        join_edit_runs(diffs);
    }
}

/// Fold each run of consecutive edits into one deletion followed by one
/// insertion. Unlike a full merge this leaves shared prefixes and suffixes
/// inside the edits, where the word pass just put them.
fn join_edit_runs(diffs: &mut Vec<Diff>) {
    let mut joined: Vec<Diff> = Vec::with_capacity(diffs.len());
    let mut text_delete: Vec<char> = Vec::new();
    let mut text_insert: Vec<char> = Vec::new();

    for diff in diffs.drain(..) {
        match diff.op {
            Ops::Delete => text_delete.extend(diff.data),
            Ops::Insert => text_insert.extend(diff.data),
            Ops::Equal => {
                flush_edits(&mut joined, &mut text_delete, &mut text_insert);
                joined.push(diff);
            }
        }
    }
    flush_edits(&mut joined, &mut text_delete, &mut text_insert);

    *diffs = joined;
}

fn flush_edits(joined: &mut Vec<Diff>, text_delete: &mut Vec<char>, text_insert: &mut Vec<char>) {
    if !text_delete.is_empty() {
        joined.push(Diff {
            op: Ops::Delete,
            data: std::mem::take(text_delete),
        });
    }
    if !text_insert.is_empty() {
        joined.push(Diff {
            op: Ops::Insert,
            data: std::mem::take(text_insert),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::test_support::{random_pair, raw_diff};
    use crate::{text_new, text_old};

    fn word_semantic(mut diffs: Vec<Diff>, edit_cost: i32) -> Vec<Diff> {
        cleanup_word_semantic(&mut diffs, edit_cost, is_word_char);
        diffs
    }

    #[test]
    fn test_whole_word_replacement() {
        assert_eq!(
            word_semantic(
                vec![Diff::delete("Exi"), Diff::insert("Tes"), Diff::equal("t")],
                0
            ),
            vec![Diff::delete("Exit"), Diff::insert("Test")]
        );
    }

    #[test]
    fn test_borrows_from_both_sides() {
        let diffs = vec![
            Diff::equal("foo ba"),
            Diff::delete("r"),
            Diff::insert("z"),
            Diff::equal("ooka end"),
        ];
        assert_eq!(
            word_semantic(diffs, 0),
            vec![
                Diff::equal("foo "),
                Diff::delete("barooka"),
                Diff::insert("bazooka"),
                Diff::equal(" end"),
            ]
        );
    }

    #[test]
    fn test_leaves_word_boundaries_alone() {
        let diffs = vec![
            Diff::equal("one "),
            Diff::delete("two"),
            Diff::insert("three"),
            Diff::equal(" four"),
        ];
        assert_eq!(word_semantic(diffs.clone(), 0), diffs);

        // A lone insertion has nothing to pair with
        let diffs = vec![Diff::equal("ab"), Diff::insert("cd"), Diff::equal("ef")];
        assert_eq!(word_semantic(diffs.clone(), 0), diffs);
    }

    #[test]
    fn test_consumed_equality_joins_edits() {
        let diffs = vec![
            Diff::delete("a"),
            Diff::insert("b"),
            Diff::equal("c"),
            Diff::delete("d"),
            Diff::insert("e"),
        ];
        let cleaned = word_semantic(diffs.clone(), 0);
        assert_eq!(cleaned, vec![Diff::delete("acd"), Diff::insert("bce")]);
        assert_eq!(text_old(&cleaned), text_old(&diffs));
        assert_eq!(text_new(&cleaned), text_new(&diffs));
    }

    #[test]
    fn test_custom_word_predicate() {
        let diffs = vec![Diff::equal("x-"), Diff::delete("a"), Diff::insert("b"), Diff::equal("-y")];
        assert_eq!(word_semantic(diffs.clone(), 0), diffs);

        let mut with_dashes = diffs;
        cleanup_word_semantic(&mut with_dashes, 0, |c| c.is_alphanumeric() || c == '-');
        assert_eq!(
            with_dashes,
            vec![Diff::delete("x-a-y"), Diff::insert("x-b-y")]
        );
    }

    #[test]
    fn test_word_cleanup_is_idempotent() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..500 {
            let (old, new) = random_pair(&mut rng);
            for edit_cost in [-1, 0, 4] {
                let once = word_semantic(raw_diff(&old, &new), edit_cost);
                assert_eq!(text_old(&once), old);
                assert_eq!(text_new(&once), new);
                assert!(once.iter().all(|diff| !diff.is_empty()));
                assert_eq!(
                    word_semantic(once.clone(), edit_cost),
                    once,
                    "{old:?} -> {new:?}"
                );
            }
        }
    }

    #[test]
    fn test_runs_semantic_first_when_cost_negative() {
        let diffs = vec![
            Diff::delete("Wo"),
            Diff::insert("Ami"),
            Diff::equal("r"),
            Diff::delete("ld"),
        ];
        assert_eq!(
            word_semantic(diffs, -1),
            vec![Diff::delete("World"), Diff::insert("Amir")]
        );
    }
}
