/// Length of the longest common prefix of two sequences
pub fn common_prefix<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Length of the longest common suffix of two sequences
pub fn common_suffix<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Length of the longest suffix of `a` that is also a prefix of `b`
pub fn common_overlap<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0;
    }
    // Only the tail of `a` and the head of `b` can take part in the overlap
    let a = &a[a.len() - len..];
    let b = &b[..len];
    if a == b {
        return len;
    }

    let mut best = 0;
    let mut length = 1;
    loop {
        let pattern = &a[len - length..];
        let found = match find(b, pattern, 0) {
            Some(found) => found,
            None => return best,
        };
        length += found;
        if found == 0 || a[len - length..] == b[..length] {
            best = length;
            length += 1;
        }
    }
}

/// Index of the first occurrence of `needle` in `haystack`, starting the
/// search at `from`
pub fn find<T: PartialEq>(haystack: &[T], needle: &[T], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    if needle.is_empty() {
        return Some(from);
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}
