use tracing::trace;

use super::cleanup_merge;
use crate::differ::{common_overlap, common_suffix};
use crate::{Diff, Ops};

/// Reduce the number of edits by eliminating semantically trivial
/// equalities, then align the remaining edits to natural boundaries and pull
/// out overlaps between neighbouring deletions and insertions.
///
/// Rounds repeat until one leaves the sequence unchanged, since aligning
/// edits can expose equalities that have become trivial.
pub fn cleanup_semantic(diffs: &mut Vec<Diff>) {
    loop {
        let before = diffs.clone();
        semantic_round(diffs);
        if *diffs == before {
            break;
        }
    }
}

fn semantic_round(diffs: &mut Vec<Diff>) {
    if eliminate_trivial_equalities(diffs) {
        trace!(records = diffs.len(), "semantic cleanup eliminated equalities");
        cleanup_merge(diffs);
    }
    cleanup_semantic_lossless(diffs);
    extract_overlaps(diffs);
}

/// An equality is dropped when it is no longer than the edits on both of its
/// sides. Returns whether anything was eliminated.
fn eliminate_trivial_equalities(diffs: &mut Vec<Diff>) -> bool {
    let mut changes = false;
    // Indices of candidate equalities, most recent last
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<usize> = None;
    // Edit sizes before and after the most recent equality
    let mut insertions_before = 0;
    let mut deletions_before = 0;
    let mut insertions_after = 0;
    let mut deletions_after = 0;
    let mut pointer = 0;

    while pointer < diffs.len() {
        let diff = &diffs[pointer];
        if diff.op == Ops::Equal {
            equalities.push(pointer);
            insertions_before = insertions_after;
            deletions_before = deletions_after;
            insertions_after = 0;
            deletions_after = 0;
            last_equality = Some(diff.data.len()).filter(|&len| len > 0);
        } else {
            if diff.op == Ops::Insert {
                insertions_after += diff.data.len();
            } else {
                deletions_after += diff.data.len();
            }

            if let Some(len) = last_equality {
                if len <= insertions_before.max(deletions_before)
                    && len <= insertions_after.max(deletions_after)
                {
                    if let Some(idx) = equalities.pop() {
                        // Duplicate the equality as a deletion followed by an insertion
                        let text = diffs[idx].data.clone();
                        diffs.insert(idx, Diff { op: Ops::Delete, data: text });
                        diffs[idx + 1].op = Ops::Insert;
                    }
                    // The previous equality needs to be re-evaluated as well
                    equalities.pop();

                    insertions_before = 0;
                    deletions_before = 0;
                    insertions_after = 0;
                    deletions_after = 0;
                    last_equality = None;
                    changes = true;

                    pointer = equalities.last().map_or(0, |&idx| idx + 1);
                    continue;
                }
            }
        }
        pointer += 1;
    }

    changes
}

/// Where a deletion and an insertion overlap, pull the overlap out as an
/// equality: `<del>abcxxx</del><ins>xxxdef</ins>` becomes
/// `<del>abc</del>xxx<ins>def</ins>`. Only done when the overlap is at least
/// half of one of the edits.
fn extract_overlaps(diffs: &mut Vec<Diff>) {
    let mut pointer = 1;
    while pointer < diffs.len() {
        if diffs[pointer - 1].op == Ops::Delete && diffs[pointer].op == Ops::Insert {
            let deletion = diffs[pointer - 1].data.clone();
            let insertion = diffs[pointer].data.clone();
            let overlap1 = common_overlap(&deletion, &insertion);
            let overlap2 = common_overlap(&insertion, &deletion);

            if overlap1 >= overlap2 {
                if overlap1 * 2 >= deletion.len() || overlap1 * 2 >= insertion.len() {
                    diffs.insert(pointer, Diff::new(Ops::Equal, &insertion[..overlap1]));
                    diffs[pointer - 1].data = deletion[..deletion.len() - overlap1].to_vec();
                    diffs[pointer + 1].data = insertion[overlap1..].to_vec();
                    pointer += 1;
                }
            } else if overlap2 * 2 >= deletion.len() || overlap2 * 2 >= insertion.len() {
                // Reverse overlap: swap the edits around the shared text
                diffs.insert(pointer, Diff::new(Ops::Equal, &deletion[..overlap2]));
                diffs[pointer - 1] =
                    Diff::new(Ops::Insert, &insertion[..insertion.len() - overlap2]);
                diffs[pointer + 1] = Diff::new(Ops::Delete, &deletion[overlap2..]);
                pointer += 1;
            }
            pointer += 1;
        }
        pointer += 1;
    }
}

/// Slide single edits surrounded by equalities sideways so that their edges
/// land on logical boundaries, e.g. `The c<ins>at c</ins>ame.` becomes
/// `The <ins>cat </ins>came.`
pub fn cleanup_semantic_lossless(diffs: &mut Vec<Diff>) {
    let mut pointer = 1;

    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op == Ops::Equal && diffs[pointer + 1].op == Ops::Equal {
            let mut equality1 = diffs[pointer - 1].data.clone();
            let mut edit = diffs[pointer].data.clone();
            let mut equality2 = diffs[pointer + 1].data.clone();

            // First, shift the edit as far left as possible
            let offset = common_suffix(&equality1, &edit);
            if offset > 0 {
                let common = edit[edit.len() - offset..].to_vec();
                equality1.truncate(equality1.len() - offset);
                edit.truncate(edit.len() - offset);
                edit.splice(0..0, common.iter().copied());
                equality2.splice(0..0, common);
            }

            // Second, step right one character at a time looking for the best fit
            let mut best_equality1 = equality1.clone();
            let mut best_edit = edit.clone();
            let mut best_equality2 = equality2.clone();
            let mut best_score =
                boundary_score(&equality1, &edit) + boundary_score(&edit, &equality2);

            while !edit.is_empty() && !equality2.is_empty() && edit[0] == equality2[0] {
                equality1.push(edit[0]);
                edit.remove(0);
                edit.push(equality2.remove(0));
                let score = boundary_score(&equality1, &edit) + boundary_score(&edit, &equality2);
                // The >= encourages trailing rather than leading whitespace on edits
                if score >= best_score {
                    best_score = score;
                    best_equality1.clone_from(&equality1);
                    best_edit.clone_from(&edit);
                    best_equality2.clone_from(&equality2);
                }
            }

            if diffs[pointer - 1].data != best_equality1 {
                // An improvement was found
                if best_equality1.is_empty() {
                    diffs.remove(pointer - 1);
                    pointer -= 1;
                } else {
                    diffs[pointer - 1].data = best_equality1;
                }
                diffs[pointer].data = best_edit;
                if best_equality2.is_empty() {
                    diffs.remove(pointer + 1);
                    pointer -= 1;
                } else {
                    diffs[pointer + 1].data = best_equality2;
                }
            }
        }
        pointer += 1;
    }
}

/// Score how natural it is to cut between `one` and `two`, from 6 (an edge
/// of the text) down to 0 (inside a word).
fn boundary_score(one: &[char], two: &[char]) -> u8 {
    let (Some(&char1), Some(&char2)) = (one.last(), two.first()) else {
        return 6;
    };

    let non_alphanumeric1 = !char1.is_alphanumeric();
    let non_alphanumeric2 = !char2.is_alphanumeric();
    let whitespace1 = non_alphanumeric1 && char1.is_whitespace();
    let whitespace2 = non_alphanumeric2 && char2.is_whitespace();
    let line_break1 = whitespace1 && (char1 == '\r' || char1 == '\n');
    let line_break2 = whitespace2 && (char2 == '\r' || char2 == '\n');
    let blank_line1 = line_break1 && ends_with_blank_line(one);
    let blank_line2 = line_break2 && starts_with_blank_line(two);

    if blank_line1 || blank_line2 {
        5
    } else if line_break1 || line_break2 {
        4
    } else if non_alphanumeric1 && !whitespace1 && whitespace2 {
        // End of sentence
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alphanumeric1 || non_alphanumeric2 {
        1
    } else {
        0
    }
}

/// `\n\n` or `\n\r\n` at the end
fn ends_with_blank_line(text: &[char]) -> bool {
    text.ends_with(&['\n', '\n']) || text.ends_with(&['\n', '\r', '\n'])
}

/// Two line breaks (`\n` or `\r\n` each) at the start
fn starts_with_blank_line(text: &[char]) -> bool {
    let rest = match text {
        ['\r', '\n', rest @ ..] | ['\n', rest @ ..] => rest,
        _ => return false,
    };
    matches!(rest, ['\r', '\n', ..] | ['\n', ..])
}
