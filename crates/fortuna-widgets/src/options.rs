//! Ordered prize labels that are never empty.

use serde::{Deserialize, Serialize};

/// Prize labels shown on a wheel, one per sector.
///
/// Construction and removal substitute a placeholder label rather than
/// leaving the list empty, so a wheel always has at least one sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeOptions {
    labels: Vec<String>,
}

impl PrizeOptions {
    /// Build from labels, falling back to `placeholder` when none are given.
    pub fn new<I, S>(labels: I, placeholder: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            labels.push(placeholder.to_string());
        }
        Self { labels }
    }

    /// Number of options (always at least one).
    #[must_use]
    pub fn count(&self) -> usize {
        self.labels.len()
    }

    /// Label at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// All labels in sector order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Remove the label at `index`, substituting `placeholder` if the list empties.
    ///
    /// Returns the removed label, or `None` when `index` is out of range.
    pub fn remove(&mut self, index: usize, placeholder: &str) -> Option<String> {
        if index >= self.labels.len() {
            return None;
        }
        let removed = self.labels.remove(index);
        if self.labels.is_empty() {
            self.labels.push(placeholder.to_string());
        }
        Some(removed)
    }
}
