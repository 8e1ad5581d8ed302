//! Comparison entry points.
//!
//! A comparison walks `got` and `want` together, depth first, and records a
//! [`Mismatch`](crate::Mismatch) for every place where they diverge instead of
//! stopping at the first one. Sibling subtrees are always visited, so the
//! report shows every difference at once.

mod cycle;
mod engine;

use log::debug;

use crate::config::Config;
use crate::mismatch::Mismatches;
use crate::reflect::Reflect;

use engine::{root_path, Comparison, Mode};

impl Config {
    /// Collect every mismatch between `got` and `want`.
    ///
    /// `None` stands for an absent value. Two absent values are equal.
    pub fn diff(&self, got: Option<&dyn Reflect>, want: Option<&dyn Reflect>) -> Mismatches {
        let mut comparison = Comparison::new(self, root_path(want));
        comparison.compare(got, want, Mode::Full);
        let mismatches = comparison.finish();
        debug!(
            "Compared {}: {} mismatch(es)",
            want.map_or("<nil>", |w| w.type_name()),
            mismatches.len()
        );
        mismatches
    }

    /// Compare `got` against `want`, failing with every mismatch found.
    ///
    /// ```
    /// use deep_compare::Config;
    ///
    /// let err = Config::new().compare(&vec![1, 2, 3], &vec![1, 2]).unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "(Vec<i32>): Length mismatch; got=3, want=2, kind=slice"
    /// );
    /// ```
    pub fn compare(&self, got: &dyn Reflect, want: &dyn Reflect) -> Result<(), Mismatches> {
        self.diff(Some(got), Some(want)).into_result()
    }

    /// Whether `got` and `want` compare without a single mismatch.
    pub fn equal(&self, got: &dyn Reflect, want: &dyn Reflect) -> bool {
        self.diff(Some(got), Some(want)).is_empty()
    }
}

/// [`Config::diff`] with the default configuration.
pub fn diff(got: Option<&dyn Reflect>, want: Option<&dyn Reflect>) -> Mismatches {
    Config::default_ref().diff(got, want)
}

/// [`Config::compare`] with the default configuration.
pub fn compare(got: &dyn Reflect, want: &dyn Reflect) -> Result<(), Mismatches> {
    Config::default_ref().compare(got, want)
}

/// [`Config::equal`] with the default configuration.
pub fn equal(got: &dyn Reflect, want: &dyn Reflect) -> bool {
    Config::default_ref().equal(got, want)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mismatch::MismatchKind;

    #[test]
    fn test_absent_values() {
        assert!(diff(None, None).is_empty());

        let mismatches = diff(Some(&1u8), None);
        assert_eq!(mismatches.kinds(), [MismatchKind::Validity]);
        assert_eq!(
            mismatches.to_string(),
            "<nil>: Validity mismatch; got=1, want=<absent>"
        );
    }

    #[test]
    fn test_type_mismatch_is_terminal() {
        let mismatches = diff(Some(&1i32), Some(&1i64));
        assert_eq!(
            mismatches.to_string(),
            "(i64): Type mismatch; got=i32, want=i64"
        );
    }

    #[test]
    fn test_free_functions_use_default_config() {
        assert!(equal(&vec![1, 2], &vec![1, 2]));
        assert!(!equal(&vec![1, 2], &vec![2, 1]));
        assert!(compare(&"x", &"x").is_ok());
    }
}
