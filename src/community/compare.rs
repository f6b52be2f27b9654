//! Membership comparison between two results

use serde::Serialize;

use super::{Community, CommunitySet};

/// How one community of the left result lines up with the right result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityMatch {
    pub community: String,
    pub size: usize,
    /// Right-hand community sharing the most members, if any share one
    pub best_match: Option<String>,
    pub shared: usize,
    pub jaccard: f64,
}

/// Per-community overlap report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub matches: Vec<CommunityMatch>,
    /// Both results hold the same groups of members
    pub identical: bool,
}

impl Comparison {
    /// Mean Jaccard overlap over the left communities
    pub fn mean_jaccard(&self) -> f64 {
        if self.matches.is_empty() {
            return 0.0;
        }
        self.matches.iter().map(|m| m.jaccard).sum::<f64>() / self.matches.len() as f64
    }

    pub fn to_lines(&self) -> Vec<String> {
        self.matches
            .iter()
            .map(|m| match &m.best_match {
                Some(other) => format!(
                    "{} ({}) ~ {}: {} shared, jaccard {:.3}",
                    m.community, m.size, other, m.shared, m.jaccard
                ),
                None => format!("{} ({}) has no counterpart", m.community, m.size),
            })
            .collect()
    }
}

fn jaccard(a: &Community, b: &Community) -> (usize, f64) {
    let shared = a.members().intersection(b.members()).count();
    let union = a.len() + b.len() - shared;
    if union == 0 {
        (0, 0.0)
    } else {
        (shared, shared as f64 / union as f64)
    }
}

/// Match every community of `left` to its closest community in `right`.
///
/// Closest means most shared members, then highest Jaccard overlap, then
/// first in order.
pub fn compare(left: &CommunitySet, right: &CommunitySet) -> Comparison {
    let matches = left
        .communities()
        .iter()
        .map(|community| {
            let mut best: Option<(&Community, usize, f64)> = None;
            for candidate in right.communities() {
                let (shared, score) = jaccard(community, candidate);
                if shared == 0 {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some((_, s, j)) => shared > s || (shared == s && score > j),
                };
                if better {
                    best = Some((candidate, shared, score));
                }
            }

            CommunityMatch {
                community: community.name().to_string(),
                size: community.len(),
                best_match: best.map(|(c, _, _)| c.name().to_string()),
                shared: best.map_or(0, |(_, s, _)| s),
                jaccard: best.map_or(0.0, |(_, _, j)| j),
            }
        })
        .collect();

    Comparison {
        matches,
        identical: left.same_partition(right),
    }
}
