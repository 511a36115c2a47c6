//! Cover tables: `(node_id, community_id, member_prob)` rows.
//!
//! A cover is validated once, when it is constructed. Everything
//! downstream assumes ids are non-negative, probabilities are finite
//! and in `[0, 1]`, and no `(node, community)` pair repeats.

use crate::error::{NmiError, NmiResult};
use fnv::FnvHashSet as HashSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverRow {
    pub node_id: u64,
    pub community_id: u64,
    pub member_prob: f64,
}

/// A possibly overlapping, weighted assignment of nodes to communities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cover {
    rows: Vec<CoverRow>,
}

/// Counts and id ranges of a cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverSummary {
    pub num_rows: usize,
    pub num_communities: usize,
    pub num_nodes: usize,
    /// `(min, max)` community id, `None` for an empty cover
    pub community_range: Option<(u64, u64)>,
    /// `(min, max)` node id, `None` for an empty cover
    pub node_range: Option<(u64, u64)>,
}

impl Cover {
    /// Build a cover from `(node_id, community_id, member_prob)` triplets.
    ///
    /// Fails on the first row with a negative id, a probability outside
    /// `[0, 1]` (NaN included), or a `(node, community)` pair already seen.
    pub fn from_triplets<I>(triplets: I) -> NmiResult<Self>
    where
        I: IntoIterator<Item = (i64, i64, f64)>,
    {
        let triplets = triplets.into_iter();
        let mut rows = Vec::with_capacity(triplets.size_hint().0);
        let mut seen: HashSet<(u64, u64)> = HashSet::default();

        for (row, (node_id, community_id, member_prob)) in triplets.enumerate() {
            let invalid = |reason: &str| NmiError::InvalidCover {
                row,
                node_id,
                community_id,
                reason: reason.to_string(),
            };

            if node_id < 0 {
                return Err(invalid("negative node id"));
            }
            if community_id < 0 {
                return Err(invalid("negative community id"));
            }
            if !(0.0..=1.0).contains(&member_prob) {
                return Err(invalid(&format!(
                    "membership probability {} is outside [0, 1]",
                    member_prob
                )));
            }

            let (node_id, community_id) = (node_id as u64, community_id as u64);
            if !seen.insert((node_id, community_id)) {
                return Err(invalid("duplicate (node, community) pair"));
            }

            rows.push(CoverRow {
                node_id,
                community_id,
                member_prob,
            });
        }

        Ok(Self { rows })
    }

    /// Binary cover: every listed pair has membership 1
    pub fn from_pairs<I>(pairs: I) -> NmiResult<Self>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        Self::from_triplets(pairs.into_iter().map(|(n, c)| (n, c, 1.0)))
    }

    pub fn rows(&self) -> &[CoverRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.rows.iter().map(|r| r.node_id)
    }

    pub fn summary(&self) -> CoverSummary {
        let communities: HashSet<u64> = self.rows.iter().map(|r| r.community_id).collect();
        let nodes: HashSet<u64> = self.node_ids().collect();

        fn range(ids: &HashSet<u64>) -> Option<(u64, u64)> {
            let lb = ids.iter().min()?;
            let ub = ids.iter().max()?;
            Some((*lb, *ub))
        }

        CoverSummary {
            num_rows: self.rows.len(),
            num_communities: communities.len(),
            num_nodes: nodes.len(),
            community_range: range(&communities),
            node_range: range(&nodes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_rows() {
        let cover = Cover::from_triplets(vec![(0, 0, 1.0), (0, 1, 0.75), (1, 1, 0.0)]).unwrap();
        assert_eq!(cover.len(), 3);
        assert_eq!(cover.rows()[1].community_id, 1);
        assert_eq!(cover.rows()[1].member_prob, 0.75);
    }

    #[test]
    fn test_probability_out_of_range() {
        let err = Cover::from_triplets(vec![(0, 0, 1.0), (3, 7, 1.5)]).unwrap_err();
        match err {
            NmiError::InvalidCover {
                row,
                node_id,
                community_id,
                ..
            } => {
                assert_eq!(row, 1);
                assert_eq!(node_id, 3);
                assert_eq!(community_id, 7);
            }
            other => panic!("unexpected error {:?}", other),
        }

        assert!(Cover::from_triplets(vec![(0, 0, f64::NAN)]).is_err());
        assert!(Cover::from_triplets(vec![(0, 0, -0.1)]).is_err());
    }

    #[test]
    fn test_negative_ids() {
        assert!(Cover::from_triplets(vec![(-1, 0, 1.0)]).is_err());
        assert!(Cover::from_triplets(vec![(0, -2, 1.0)]).is_err());
    }

    #[test]
    fn test_duplicate_pair_rejected() {
        let err = Cover::from_triplets(vec![(0, 0, 1.0), (1, 0, 0.5), (0, 0, 0.25)]).unwrap_err();
        assert!(matches!(err, NmiError::InvalidCover { row: 2, .. }));
    }

    #[test]
    fn test_summary() {
        let cover = Cover::from_pairs(vec![(4, 2), (9, 2), (4, 11)]).unwrap();
        let summary = cover.summary();
        assert_eq!(summary.num_rows, 3);
        assert_eq!(summary.num_communities, 2);
        assert_eq!(summary.num_nodes, 2);
        assert_eq!(summary.community_range, Some((2, 11)));
        assert_eq!(summary.node_range, Some((4, 9)));

        let empty = Cover::default().summary();
        assert_eq!(empty.num_nodes, 0);
        assert_eq!(empty.node_range, None);
    }
}
