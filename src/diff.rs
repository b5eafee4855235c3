use std::fmt;

/// The kind of an edit record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ops {
    Delete,
    Equal,
    Insert,
}

/// A single edit record: a span of symbols tagged with the operation that
/// produced it. Character diffs use the default `T = char`; line-mode runs
/// the same algorithms over line codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diff<T = char> {
    pub(crate) op: Ops,
    pub(crate) data: Vec<T>,
}

impl<T: Copy> Diff<T> {
    /// Create a new record from an operation and a slice of symbols
    pub fn new(op: Ops, data: &[T]) -> Self {
        Self {
            op,
            data: data.to_vec(),
        }
    }

    pub fn op(&self) -> Ops {
        self.op
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Number of symbols in this record
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Diff<char> {
    pub fn delete(text: &str) -> Self {
        Self::from_text(Ops::Delete, text)
    }

    pub fn insert(text: &str) -> Self {
        Self::from_text(Ops::Insert, text)
    }

    pub fn equal(text: &str) -> Self {
        Self::from_text(Ops::Equal, text)
    }

    fn from_text(op: Ops, text: &str) -> Self {
        Self {
            op,
            data: text.chars().collect(),
        }
    }

    /// The text of this record as an owned string
    pub fn text(&self) -> String {
        self.data.iter().collect()
    }
}

impl fmt::Display for Diff<char> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.op {
            Ops::Delete => '-',
            Ops::Equal => ' ',
            Ops::Insert => '+',
        };
        write!(f, "{}{}", sign, self.text())
    }
}

/// Rebuild the old text from a diff sequence (all `Equal` and `Delete` records).
pub fn text_old(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .filter(|d| d.op != Ops::Insert)
        .flat_map(|d| d.data.iter())
        .collect()
}

/// Rebuild the new text from a diff sequence (all `Equal` and `Insert` records).
pub fn text_new(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .filter(|d| d.op != Ops::Delete)
        .flat_map(|d| d.data.iter())
        .collect()
}

/// Edit distance implied by a diff sequence, counted in characters.
///
/// Each run of deletions and insertions between two equalities costs the
/// larger of the two, since a deleted and an inserted character pair up as
/// one substitution.
pub fn levenshtein<T>(diffs: &[Diff<T>]) -> usize {
    let mut distance = 0;
    let mut insertions = 0;
    let mut deletions = 0;

    for diff in diffs {
        match diff.op {
            Ops::Insert => insertions += diff.data.len(),
            Ops::Delete => deletions += diff.data.len(),
            Ops::Equal => {
                distance += insertions.max(deletions);
                insertions = 0;
                deletions = 0;
            }
        }
    }

    distance + insertions.max(deletions)
}

/// Translate an offset in the old text into the equivalent offset in the new
/// text. A location inside a deletion maps to the start of that deletion.
pub fn x_index<T>(diffs: &[Diff<T>], loc: usize) -> usize {
    let mut chars1 = 0;
    let mut chars2 = 0;
    let mut last_chars1 = 0;
    let mut last_chars2 = 0;
    let mut hit: Option<&Diff<T>> = None;

    for diff in diffs {
        if diff.op != Ops::Insert {
            chars1 += diff.data.len();
        }
        if diff.op != Ops::Delete {
            chars2 += diff.data.len();
        }
        if chars1 > loc {
            hit = Some(diff);
            break;
        }
        last_chars1 = chars1;
        last_chars2 = chars2;
    }

    match hit {
        Some(diff) if diff.op == Ops::Delete => last_chars2,
        _ => last_chars2 + (loc - last_chars1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstruct_texts() {
        let diffs = vec![
            Diff::equal("jump"),
            Diff::delete("s"),
            Diff::insert("ed"),
            Diff::equal(" over "),
            Diff::delete("the"),
            Diff::insert("a"),
            Diff::equal(" lazy"),
        ];
        assert_eq!(text_old(&diffs), "jumps over the lazy");
        assert_eq!(text_new(&diffs), "jumped over a lazy");
    }

    #[test]
    fn test_levenshtein() {
        let trailing_equal = vec![Diff::delete("abc"), Diff::insert("1234"), Diff::equal("xyz")];
        assert_eq!(levenshtein(&trailing_equal), 4);

        let leading_equal = vec![Diff::equal("xyz"), Diff::delete("abc"), Diff::insert("1234")];
        assert_eq!(levenshtein(&leading_equal), 4);

        let middle_equal = vec![Diff::delete("abc"), Diff::equal("xyz"), Diff::insert("1234")];
        assert_eq!(levenshtein(&middle_equal), 7);
    }

    #[test]
    fn test_x_index() {
        let translation = vec![Diff::delete("a"), Diff::insert("1234"), Diff::equal("xyz")];
        assert_eq!(x_index(&translation, 2), 5);

        let inside_delete = vec![Diff::equal("a"), Diff::delete("1234"), Diff::equal("xyz")];
        assert_eq!(x_index(&inside_delete, 3), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Diff::delete("old").to_string(), "-old");
        assert_eq!(Diff::insert("new").to_string(), "+new");
        assert_eq!(Diff::equal("same").to_string(), " same");
    }
}
