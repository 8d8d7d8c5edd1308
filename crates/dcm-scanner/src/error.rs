//! Error types for the dcm-scanner crate.
//!
//! # Error Recovery Strategy
//!
//! - **Malformed input** ([`ClassifyError::Malformed`]): recoverable - the
//!   file is treated as unclassified, the scan continues
//! - **Fatal classifier failure** ([`ClassifyError::Fatal`]): unrecoverable -
//!   the scan aborts mid-walk and registered contexts never receive the
//!   finish notification
//! - **Unreadable directories and invalid roots**: never errors at all; the
//!   walker degrades gracefully and logs at `warn`

use camino::Utf8PathBuf;

/// Errors a classifier can report for a single file.
///
/// The two variants carry the scan-abort policy: malformed input is an
/// expected, per-file condition, while a fatal failure (resource
/// exhaustion, a broken decoder) poisons the whole scan.
///
/// # Examples
///
/// ```
/// use dcm_scanner::ClassifyError;
///
/// let err = ClassifyError::malformed("a.dcm", "truncated header");
/// assert!(err.is_recoverable());
///
/// let err = ClassifyError::fatal("b.dcm", std::io::Error::other("decoder OOM"));
/// assert!(err.is_fatal());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The file looked like a candidate but its contents are malformed.
    ///
    /// Scanning continues by treating the file as unclassified.
    #[error("malformed input in {path}: {reason}")]
    Malformed {
        /// The file that could not be decoded.
        path: Utf8PathBuf,
        /// Decoder-supplied description of the problem.
        reason: String,
    },

    /// The classifier failed in a way that makes further results untrustworthy.
    ///
    /// Aborts the scan; the caller must treat any partially-built results
    /// as incomplete.
    #[error("fatal classifier failure on {path}: {source}")]
    Fatal {
        /// The file being classified when the failure occurred.
        path: Utf8PathBuf,
        /// The underlying failure.
        source: anyhow::Error,
    },
}

impl ClassifyError {
    /// Creates a new [`ClassifyError::Malformed`] error.
    #[inline]
    pub fn malformed(path: impl Into<Utf8PathBuf>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new [`ClassifyError::Fatal`] error.
    #[inline]
    pub fn fatal(path: impl Into<Utf8PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Self::Fatal {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Returns `true` if this error is recoverable (scanning can continue).
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    /// Returns `true` if this error aborts the scan.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the file path this error refers to.
    #[must_use]
    pub const fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Malformed { path, .. } | Self::Fatal { path, .. } => path,
        }
    }
}

/// Errors surfaced by [`PathScanner::scan`](crate::PathScanner::scan).
///
/// Only fatal classifier failures reach the caller. An invalid or
/// unreadable scan root is deliberately a silent empty-result scan, and
/// unreadable subtrees merely contribute no files.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A classifier failure aborted the scan mid-walk.
    ///
    /// Contexts that received the start notification did not receive the
    /// finish notification; the partially-built results are not
    /// trustworthy.
    #[error("scan aborted: {source}")]
    Classifier {
        /// The file being classified when the scan aborted.
        path: Utf8PathBuf,
        /// The fatal classifier error.
        #[source]
        source: ClassifyError,
    },
}

impl ScanError {
    /// Creates a new [`ScanError::Classifier`] error.
    #[inline]
    pub fn classifier(path: impl Into<Utf8PathBuf>, source: ClassifyError) -> Self {
        Self::Classifier {
            path: path.into(),
            source,
        }
    }

    /// Returns the file path associated with this error.
    #[must_use]
    pub const fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Classifier { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_is_recoverable() {
        let err = ClassifyError::malformed("scans/a.dcm", "bad preamble");
        assert!(err.is_recoverable());
        assert!(!err.is_fatal());
        assert_eq!(err.path().as_str(), "scans/a.dcm");
        assert!(err.to_string().contains("bad preamble"));
    }

    #[test]
    fn test_fatal_is_not_recoverable() {
        let err = ClassifyError::fatal("scans/b.dcm", std::io::Error::other("out of memory"));
        assert!(err.is_fatal());
        assert!(!err.is_recoverable());
        assert_eq!(err.path().as_str(), "scans/b.dcm");
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::classifier(
            "scans/b.dcm",
            ClassifyError::fatal("scans/b.dcm", std::io::Error::other("boom")),
        );
        assert_eq!(err.path().as_str(), "scans/b.dcm");
        assert!(err.to_string().starts_with("scan aborted"));
    }
}
