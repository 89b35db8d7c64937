//! Layout engine for edge-constrained control trees
//!
//! Controls live in a [`ControlTree`] arena. Each carries a
//! [`ConstraintSet`] binding its edges to edges of other controls or of the
//! viewport; [`ControlTree::layout`] resolves those constraints top-down in a
//! single ordered pass and propagates draw positions through children and
//! decorations.

pub mod config;
pub mod constraint;
pub mod control;
pub mod edge;
pub mod engine;
pub mod error;
pub mod lint;
pub mod resolver;
pub mod transform;
pub mod tree;
pub mod types;
pub mod viewport;

pub use config::{ConfigError, LayoutConfig};
pub use constraint::{Constraint, ConstraintSet};
pub use control::{
    Control, ControlId, ControlKind, KindTag, Measurable, Owner, Relation, ScrollRestriction, Scrollable,
};
pub use edge::{ConstraintCategory, Edge};
pub use error::{ConstraintError, LayoutError};
pub use tree::ControlTree;
pub use types::*;
pub use viewport::{SharedViewport, Viewport};

use std::collections::HashSet;

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut dp = vec![vec![0usize; n + 1]; m + 1];

    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=n {
        dp[0][j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }

    dp[m][n]
}

/// Find similar names within a maximum edit distance, closest first
pub(crate) fn find_similar(defined: &HashSet<String>, target: &str, max_distance: usize) -> Vec<String> {
    let mut candidates: Vec<(String, usize)> = defined
        .iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            if dist <= max_distance && dist > 0 {
                Some((name.clone(), dist))
            } else {
                None
            }
        })
        .collect();

    candidates.sort_by(|(a, da), (b, db)| da.cmp(db).then_with(|| a.cmp(b)));
    candidates
        .into_iter()
        .map(|(name, _)| name)
        .take(3)
        .collect()
}
