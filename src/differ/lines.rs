use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use super::{diff_main, find};
use crate::cleanup::cleanup_semantic;
use crate::{Diff, Ops};

/// Code budget while encoding the old text
const MAX_LINES_OLD: usize = 40_000;
/// Code budget while encoding the new text
const MAX_LINES_NEW: usize = 65_535;

/// Bidirectional mapping between distinct lines and small integer codes.
/// Code 0 is reserved and never handed out.
pub(crate) struct LineTable<'a> {
    lines: Vec<&'a [char]>,
    codes: HashMap<&'a [char], usize>,
}

impl<'a> LineTable<'a> {
    fn new() -> Self {
        let reserved: &'a [char] = &[];
        Self {
            lines: vec![reserved],
            codes: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Encode `text` one line (newline included) at a time. Once the table
    /// holds `max_lines` entries the rest of the text becomes a single line.
    fn encode(&mut self, text: &'a [char], max_lines: usize) -> Vec<usize> {
        let mut codes = Vec::new();
        let mut start = 0;

        while start < text.len() {
            let mut end = find(text, &['\n'], start).map_or(text.len(), |nl| nl + 1);
            let mut line = &text[start..end];

            match self.codes.get(line) {
                Some(&code) => codes.push(code),
                None => {
                    if self.lines.len() >= max_lines {
                        line = &text[start..];
                        end = text.len();
                    }
                    let code = self.lines.len();
                    self.lines.push(line);
                    self.codes.insert(line, code);
                    codes.push(code);
                }
            }
            start = end;
        }

        codes
    }
}

/// Split both texts into lines and replace each line with its code
pub(crate) fn lines_to_codes<'a>(
    old: &'a [char],
    new: &'a [char],
) -> (Vec<usize>, Vec<usize>, LineTable<'a>) {
    lines_to_codes_capped(old, new, MAX_LINES_OLD, MAX_LINES_NEW)
}

fn lines_to_codes_capped<'a>(
    old: &'a [char],
    new: &'a [char],
    max_old: usize,
    max_new: usize,
) -> (Vec<usize>, Vec<usize>, LineTable<'a>) {
    let mut table = LineTable::new();
    let old_codes = table.encode(old, max_old);
    let new_codes = table.encode(new, max_new);
    (old_codes, new_codes, table)
}

/// Expand line codes in a diff sequence back into the original text
pub(crate) fn codes_to_lines(diffs: Vec<Diff<usize>>, table: &LineTable<'_>) -> Vec<Diff> {
    diffs
        .into_iter()
        .map(|diff| Diff {
            op: diff.op,
            data: diff
                .data
                .iter()
                .flat_map(|&code| table.lines[code].iter().copied())
                .collect(),
        })
        .collect()
}

/// Quick line-level diff followed by a character-level pass over every
/// changed block. Faster on large texts, but the result can be less optimal.
pub(crate) fn diff_line_mode(old: &[char], new: &[char], deadline: Option<Instant>) -> Vec<Diff> {
    let (old_codes, new_codes, table) = lines_to_codes(old, new);
    debug!(
        old_lines = old_codes.len(),
        new_lines = new_codes.len(),
        distinct = table.len() - 1,
        "diffing in line mode"
    );

    let coarse = diff_main(&old_codes, &new_codes, false, deadline);
    let mut diffs = codes_to_lines(coarse, &table);

    // Drop spurious matches on common lines such as blank ones
    cleanup_semantic(&mut diffs);

    // Re-diff each replacement block character by character. A trailing
    // empty equality flushes the last block.
    diffs.push(Diff::new(Ops::Equal, &[]));
    let mut pointer = 0;
    let mut count_delete = 0;
    let mut count_insert = 0;
    let mut text_delete: Vec<char> = Vec::new();
    let mut text_insert: Vec<char> = Vec::new();

    while pointer < diffs.len() {
        match diffs[pointer].op {
            Ops::Insert => {
                count_insert += 1;
                text_insert.extend_from_slice(&diffs[pointer].data);
            }
            Ops::Delete => {
                count_delete += 1;
                text_delete.extend_from_slice(&diffs[pointer].data);
            }
            Ops::Equal => {
                if count_delete >= 1 && count_insert >= 1 {
                    let start = pointer - count_delete - count_insert;
                    let refined = diff_main(&text_delete, &text_insert, false, deadline);
                    let refined_len = refined.len();
                    diffs.splice(start..pointer, refined);
                    pointer = start + refined_len;
                }
                count_delete = 0;
                count_insert = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
        pointer += 1;
    }
    diffs.pop();

    diffs
}
