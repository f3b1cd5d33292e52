//! Requester matching.
//!
//! A policy's `matcher` pattern decides which requesters may use it. The
//! default backend is shell-style globbing over the requester identity;
//! the trait seam exists so deployments can plug in a different scheme.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("invalid matcher pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The matching backend could not be consulted at all.
    #[error("matcher backend failure: {0}")]
    Backend(String),
}

/// Decides whether a requester identity satisfies a matcher pattern
pub trait RequesterMatcher: Send + Sync {
    fn matches(&self, pattern: &str, requester: &str) -> Result<bool, MatcherError>;
}

/// Shell-style glob matching with `*` and `?`
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobMatcher;

impl RequesterMatcher for GlobMatcher {
    fn matches(&self, pattern: &str, requester: &str) -> Result<bool, MatcherError> {
        Ok(glob_match(pattern.as_bytes(), requester.as_bytes()))
    }
}

/// Iterative glob match with single-star backtracking.
fn glob_match(pattern: &[u8], input: &[u8]) -> bool {
    let (mut p, mut i) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while i < input.len() {
        if p < pattern.len() && (pattern[p] == b'?' || pattern[p] == input[i]) {
            p += 1;
            i += 1;
        } else if p < pattern.len() && pattern[p] == b'*' {
            star = Some((p, i));
            p += 1;
        } else if let Some((star_p, star_i)) = star {
            p = star_p + 1;
            i = star_i + 1;
            star = Some((star_p, star_i + 1));
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == b'*' {
        p += 1;
    }
    p == pattern.len()
}
