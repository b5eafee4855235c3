mod common;
mod half_match;
mod lines;
mod myers;

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::cleanup::Cleanup;
use crate::{Diff, Error};

pub use common::{common_overlap, common_prefix, common_suffix};
pub(crate) use common::find;
pub(crate) use half_match::half_match;
pub(crate) use lines::diff_line_mode;
pub(crate) use myers::diff_main;

/// Default time budget for a single comparison
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// A symbol the differ can operate on.
///
/// Characters are the public unit. Line-mode encodes whole lines as integer
/// codes and runs the same algorithms over them, so the core is generic.
pub(crate) trait Symbol: Copy + Eq {
    /// Coarse line-granularity pass for large inputs. Only meaningful for
    /// text; other symbol types never take the line-mode path.
    fn diff_lines(
        _old: &[Self],
        _new: &[Self],
        _deadline: Option<Instant>,
    ) -> Option<Vec<Diff<Self>>> {
        None
    }
}

impl Symbol for char {
    fn diff_lines(
        old: &[char],
        new: &[char],
        deadline: Option<Instant>,
    ) -> Option<Vec<Diff<char>>> {
        Some(diff_line_mode(old, new, deadline))
    }
}

impl Symbol for usize {}

/// Checks if a deadline was exceeded. `None` never expires.
pub(crate) fn deadline_exceeded(deadline: Option<Instant>) -> bool {
    match deadline {
        Some(deadline) => Instant::now() > deadline,
        None => false,
    }
}

/// Converts an optional time budget into an absolute deadline.
pub(crate) fn timeout_to_deadline(timeout: Option<Duration>) -> Option<Instant> {
    timeout.and_then(|timeout| Instant::now().checked_add(timeout))
}

/// The Differ holds two texts plus the knobs that control how they are compared
#[derive(Debug, Clone)]
pub struct Differ {
    pub(crate) old: String,
    pub(crate) new: String,
    pub(crate) timeout: Option<Duration>,
    pub(crate) line_mode: bool,
    pub(crate) cleanup: Cleanup,
}

impl Differ {
    /// Create a new Differ with the default one second timeout, line-mode
    /// enabled and no cleanup.
    pub fn new(old: &str, new: &str) -> Self {
        Self {
            old: old.to_string(),
            new: new.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            line_mode: true,
            cleanup: Cleanup::None,
        }
    }

    /// Create a Differ from the contents of two files
    pub fn from_paths(old: impl AsRef<Path>, new: impl AsRef<Path>) -> Result<Self, Error> {
        let old = read_file(old.as_ref())?;
        let new = read_file(new.as_ref())?;
        Ok(Self::new(&old, &new))
    }

    /// Set the time budget. A zero duration removes the deadline entirely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() { None } else { Some(timeout) };
        self
    }

    /// Compute the optimal diff no matter how long it takes
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Allow or forbid the line-level speedup for large inputs
    pub fn line_mode(mut self, enabled: bool) -> Self {
        self.line_mode = enabled;
        self
    }

    /// Select the cleanup pass applied to the raw diff
    pub fn cleanup(mut self, cleanup: Cleanup) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Compare the two texts and return the cleaned-up diff sequence
    pub fn generate(&self) -> Vec<Diff> {
        let deadline = timeout_to_deadline(self.timeout);
        let old: Vec<char> = self.old.chars().collect();
        let new: Vec<char> = self.new.chars().collect();

        let mut diffs = diff_main(&old, &new, self.line_mode, deadline);
        self.cleanup.apply(&mut diffs);
        diffs
    }
}

fn read_file(path: &Path) -> Result<String, Error> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Compare two texts.
///
/// `timeout_secs` bounds the time spent searching for a minimal diff; zero or
/// a negative value means no limit. Once the deadline passes the result is
/// still valid but may be less compact.
pub fn compare(
    old: &str,
    new: &str,
    line_mode: bool,
    timeout_secs: f64,
) -> Result<Vec<Diff>, Error> {
    if timeout_secs.is_nan() {
        return Err(Error::InvalidTimeout(timeout_secs));
    }
    let timeout = if timeout_secs <= 0.0 {
        None
    } else {
        // Budgets too large to represent are as good as unbounded
        Duration::try_from_secs_f64(timeout_secs).ok()
    };

    let differ = Differ {
        old: old.to_string(),
        new: new.to_string(),
        timeout,
        line_mode,
        cleanup: Cleanup::None,
    };
    Ok(differ.generate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{text_new, text_old, Ops};

    #[test]
    fn test_compare_identity() {
        assert!(compare("", "", true, 1.0).unwrap().is_empty());
        assert_eq!(compare("abc", "abc", true, 1.0).unwrap(), vec![Diff::equal("abc")]);
    }

    #[test]
    fn test_compare_rejects_nan_timeout() {
        assert!(matches!(
            compare("a", "b", false, f64::NAN),
            Err(Error::InvalidTimeout(_))
        ));
    }

    #[test]
    fn test_compare_unbounded_timeouts() {
        for timeout in [0.0, -1.0, f64::INFINITY] {
            let diffs = compare("abc", "ab123c", false, timeout).unwrap();
            assert_eq!(
                diffs,
                vec![Diff::equal("ab"), Diff::insert("123"), Diff::equal("c")]
            );
        }
    }

    #[test]
    fn test_hello_world() {
        let diffs = compare("Hello World.", "Goodbye World.", false, 1.0).unwrap();
        assert_eq!(diffs.last(), Some(&Diff::equal(" World.")));
        assert_ne!(diffs[0].op(), Ops::Equal);
        assert_eq!(text_old(&diffs), "Hello World.");
        assert_eq!(text_new(&diffs), "Goodbye World.");
    }

    #[test]
    fn test_differ_builder() {
        let differ = Differ::new("a", "b")
            .timeout(Duration::ZERO)
            .line_mode(false)
            .cleanup(Cleanup::Semantic);
        assert!(differ.timeout.is_none());
        assert!(!differ.line_mode);
        assert_eq!(differ.generate(), vec![Diff::delete("a"), Diff::insert("b")]);
    }

    #[test]
    fn test_from_paths_missing_file() {
        let err = Differ::from_paths("does/not/exist.txt", "nor/this.txt").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
