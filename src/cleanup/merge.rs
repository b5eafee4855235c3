use crate::differ::{common_prefix, common_suffix};
use crate::{Diff, Ops};

/// Reorder and merge like edit sections, then factor out commonalities.
///
/// Any edit section can move as long as it doesn't cross an equality. Runs
/// until no single edit can be slid over a neighbouring equality.
pub fn cleanup_merge<T: Copy + Eq>(diffs: &mut Vec<Diff<T>>) {
    loop {
        coalesce(diffs);
        if !shift_edits(diffs) {
            break;
        }
    }
}

/// Collapse each run of edits between two equalities into at most one
/// deletion and one insertion, moving any shared prefix or suffix into the
/// surrounding equalities.
fn coalesce<T: Copy + Eq>(diffs: &mut Vec<Diff<T>>) {
    // Trailing empty equality flushes the final run
    diffs.push(Diff::new(Ops::Equal, &[]));
    let mut pointer = 0;
    let mut count_delete = 0;
    let mut count_insert = 0;
    let mut text_delete: Vec<T> = Vec::new();
    let mut text_insert: Vec<T> = Vec::new();

    while pointer < diffs.len() {
        if pointer + 1 < diffs.len() && diffs[pointer].data.is_empty() {
            diffs.remove(pointer);
            continue;
        }

        match diffs[pointer].op {
            Ops::Insert => {
                count_insert += 1;
                text_insert.extend_from_slice(&diffs[pointer].data);
                pointer += 1;
            }
            Ops::Delete => {
                count_delete += 1;
                text_delete.extend_from_slice(&diffs[pointer].data);
                pointer += 1;
            }
            Ops::Equal => {
                if count_delete + count_insert > 1 {
                    let mut start = pointer - count_delete - count_insert;
                    if count_delete != 0 && count_insert != 0 {
                        let prefix = common_prefix(&text_insert, &text_delete);
                        if prefix != 0 {
                            if start > 0 {
                                let previous = &mut diffs[start - 1];
                                assert_eq!(
                                    previous.op,
                                    Ops::Equal,
                                    "previous diff should have been an equality"
                                );
                                previous.data.extend_from_slice(&text_insert[..prefix]);
                            } else {
                                diffs.insert(0, Diff::new(Ops::Equal, &text_insert[..prefix]));
                                start += 1;
                                pointer += 1;
                            }
                            text_insert.drain(..prefix);
                            text_delete.drain(..prefix);
                        }

                        let suffix = common_suffix(&text_insert, &text_delete);
                        if suffix != 0 {
                            let tail = text_insert.split_off(text_insert.len() - suffix);
                            text_delete.truncate(text_delete.len() - suffix);
                            diffs[pointer].data.splice(0..0, tail);
                        }
                    }

                    let mut merged = Vec::with_capacity(2);
                    if !text_delete.is_empty() {
                        merged.push(Diff::new(Ops::Delete, &text_delete));
                    }
                    if !text_insert.is_empty() {
                        merged.push(Diff::new(Ops::Insert, &text_insert));
                    }
                    let merged_len = merged.len();
                    diffs.splice(start..pointer, merged);
                    // Revisit the equality: if the whole run factored out it
                    // now sits next to the previous equality
                    pointer = start + merged_len;
                } else if pointer != 0 && diffs[pointer - 1].op == Ops::Equal {
                    // Merge this equality with the previous one
                    let current = diffs.remove(pointer);
                    diffs[pointer - 1].data.extend(current.data);
                } else {
                    pointer += 1;
                }
                count_delete = 0;
                count_insert = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
    }

    if diffs.last().is_some_and(|last| last.data.is_empty()) {
        diffs.pop();
    }
}

/// Look for single edits surrounded on both sides by equalities which can
/// be shifted sideways to eliminate an equality, e.g. `A<ins>BA</ins>C`
/// becomes `<ins>AB</ins>AC`. Returns whether anything moved.
fn shift_edits<T: Copy + Eq>(diffs: &mut Vec<Diff<T>>) -> bool {
    let mut changes = false;
    let mut pointer = 1;

    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op == Ops::Equal && diffs[pointer + 1].op == Ops::Equal {
            let prev_len = diffs[pointer - 1].data.len();
            let next_len = diffs[pointer + 1].data.len();
            let edit = &diffs[pointer].data;

            if edit.ends_with(&diffs[pointer - 1].data) {
                // Shift the edit over the previous equality
                let previous = diffs.remove(pointer - 1);
                let edit = &mut diffs[pointer - 1].data;
                edit.truncate(edit.len() - prev_len);
                edit.splice(0..0, previous.data.iter().copied());
                diffs[pointer].data.splice(0..0, previous.data);
                changes = true;
            } else if edit.starts_with(&diffs[pointer + 1].data) {
                // Shift the edit over the next equality
                let next = diffs.remove(pointer + 1);
                diffs[pointer - 1].data.extend_from_slice(&next.data);
                let edit = &mut diffs[pointer].data;
                edit.drain(..next_len);
                edit.extend(next.data);
                changes = true;
            }
        }
        pointer += 1;
    }

    changes
}
