//! Full-collection evaluation

use serde::Serialize;
use std::fmt;

/// True when every entry of a non-empty catalog has been acquired
///
/// An empty catalog is never complete, so nothing celebrates before data
/// has loaded.
pub fn is_complete(acquired_count: usize, catalog_size: usize) -> bool {
    catalog_size > 0 && acquired_count == catalog_size
}

/// Acquired count against catalog size, rendered as `N / M`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub acquired: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(acquired: usize, total: usize) -> Self {
        Self { acquired, total }
    }

    pub fn is_complete(&self) -> bool {
        is_complete(self.acquired, self.total)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.acquired, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_complete() {
        assert!(is_complete(24, 24));
        assert!(!is_complete(0, 0));
        assert!(!is_complete(3, 24));
        assert!(is_complete(1, 1));
    }

    #[test]
    fn test_progress_display() {
        let progress = Progress::new(3, 24);
        assert_eq!(progress.to_string(), "3 / 24");
        assert!(!progress.is_complete());
        assert!(!Progress::default().is_complete());
        assert!(Progress::new(24, 24).is_complete());
    }
}
