//! Indexed, weighted membership tables built from a pair of covers.
//!
//! Both covers share one node index space (the sorted union of their
//! node ids) so that membership of the same node can be compared
//! across covers. Communities are renumbered densely after empty and
//! universal communities have been dropped.

use crate::config::{NmiConfig, Normalization};
use crate::cover::{Cover, CoverRow};
use crate::entropy::binary_entropy;
use crate::error::NmiResult;
use fnv::FnvHashMap as HashMap;
use log::{debug, info};
use std::collections::BTreeMap;

/// Bijection between node ids and dense indices `0..num_nodes`
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    ids: Vec<u64>,
    index: HashMap<u64, usize>,
}

impl NodeIndex {
    /// Sorted union of the node ids of both covers
    pub fn from_covers(a: &Cover, b: &Cover) -> Self {
        let mut ids: Vec<u64> = a.node_ids().chain(b.node_ids()).collect();
        ids.sort_unstable();
        ids.dedup();

        let index = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        Self { ids, index }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn index_of(&self, node_id: u64) -> Option<usize> {
        self.index.get(&node_id).copied()
    }
}

/// Why a community was left out of the tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// no membership mass, or too little to have a nonzero marginal
    Empty,
    /// every node with full weight
    Universal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Community {
    /// original community id
    pub id: u64,
    /// `(node index, weight)` sorted by node index, weights in `(0, 1]`
    pub members: Vec<(usize, f64)>,
    /// sum of the member weights
    pub mass: f64,
}

/// Membership structure of one cover over the shared node index
#[derive(Debug, Clone)]
pub struct MembershipTable {
    num_nodes: usize,
    communities: Vec<Community>,
    /// per node index: `(community index, weight)`
    node_communities: Vec<Vec<(usize, f64)>>,
    dropped: Vec<(u64, Degeneracy)>,
}

impl MembershipTable {
    /// Build the table of `cover` over `nodes`.
    ///
    /// * weighted: every row with a positive (normalized) weight is a member
    /// * unweighted: rows with (normalized) weight `>= threshold` are
    ///   members with weight 1
    pub fn build(cover: &Cover, nodes: &NodeIndex, config: &NmiConfig) -> NmiResult<Self> {
        config.validate()?;

        let num_nodes = nodes.len();
        let scale = max_weights(cover.rows(), config.normalization);

        // every community id shows up, even if none of its rows survive
        let mut grouped: BTreeMap<u64, Vec<(usize, f64)>> = BTreeMap::new();

        for row in cover.rows() {
            let members = grouped.entry(row.community_id).or_default();

            let w = match scale.get(&group_key(row, config.normalization)) {
                Some(&max_w) if max_w > 0.0 => row.member_prob / max_w,
                _ => row.member_prob,
            };

            let weight = if config.weighted {
                if w > 0.0 {
                    Some(w.min(1.0))
                } else {
                    None
                }
            } else if w >= config.threshold {
                Some(1.0)
            } else {
                None
            };

            if let Some(weight) = weight {
                if let Some(node) = nodes.index_of(row.node_id) {
                    members.push((node, weight));
                }
            }
        }

        let mut communities = Vec::with_capacity(grouped.len());
        let mut dropped = vec![];

        for (id, mut members) in grouped {
            members.sort_unstable_by_key(|&(node, _)| node);
            let mass: f64 = members.iter().map(|&(_, w)| w).sum();

            match classify(mass, num_nodes) {
                Some(reason) => {
                    debug!("dropping community {} ({:?}, mass {})", id, reason, mass);
                    dropped.push((id, reason));
                }
                None => communities.push(Community { id, members, mass }),
            }
        }

        let mut node_communities = vec![vec![]; num_nodes];
        for (k, com) in communities.iter().enumerate() {
            for &(node, w) in com.members.iter() {
                node_communities[node].push((k, w));
            }
        }

        Ok(Self {
            num_nodes,
            communities,
            node_communities,
            dropped,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_communities(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    pub fn community(&self, k: usize) -> &Community {
        &self.communities[k]
    }

    pub fn community_ids(&self) -> Vec<u64> {
        self.communities.iter().map(|c| c.id).collect()
    }

    pub fn masses(&self) -> Vec<f64> {
        self.communities.iter().map(|c| c.mass).collect()
    }

    /// Communities (index, weight) that `node` belongs to
    pub fn memberships_of(&self, node: usize) -> &[(usize, f64)] {
        &self.node_communities[node]
    }

    /// Weight of `node` in community `k`, 0 for non-members
    #[cfg(test)]
    pub(crate) fn weight(&self, node: usize, k: usize) -> f64 {
        let members = &self.communities[k].members;
        members
            .binary_search_by_key(&node, |&(n, _)| n)
            .map(|i| members[i].1)
            .unwrap_or(0.0)
    }

    pub fn dropped(&self) -> &[(u64, Degeneracy)] {
        &self.dropped
    }
}

/// Membership tables of two covers sharing one node index
#[derive(Debug, Clone)]
pub struct Memberships {
    pub nodes: NodeIndex,
    pub a: MembershipTable,
    pub b: MembershipTable,
}

impl Memberships {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

/// Build both membership tables over the shared node index
pub fn build_memberships(a: &Cover, b: &Cover, config: &NmiConfig) -> NmiResult<Memberships> {
    let nodes = NodeIndex::from_covers(a, b);
    let table_a = MembershipTable::build(a, &nodes, config)?;
    let table_b = MembershipTable::build(b, &nodes, config)?;

    info!(
        "{} nodes, {} + {} communities ({} + {} dropped)",
        nodes.len(),
        table_a.num_communities(),
        table_b.num_communities(),
        table_a.dropped().len(),
        table_b.dropped().len()
    );

    Ok(Memberships {
        nodes,
        a: table_a,
        b: table_b,
    })
}

/// Degenerate when the marginal `mass / n` carries no entropy
fn classify(mass: f64, num_nodes: usize) -> Option<Degeneracy> {
    let p = mass / num_nodes as f64;
    if p > 0.0 && p < 1.0 && binary_entropy(p) > 0.0 {
        None
    } else if p >= 0.5 {
        Some(Degeneracy::Universal)
    } else {
        Some(Degeneracy::Empty)
    }
}

fn group_key(row: &CoverRow, normalization: Normalization) -> u64 {
    match normalization {
        Normalization::PerNode => row.node_id,
        _ => row.community_id,
    }
}

/// Maximum raw weight per normalization group (empty map for `None`)
fn max_weights(rows: &[CoverRow], normalization: Normalization) -> HashMap<u64, f64> {
    let mut ret: HashMap<u64, f64> = HashMap::default();
    if normalization == Normalization::None {
        return ret;
    }
    for row in rows {
        let max_w = ret.entry(group_key(row, normalization)).or_insert(0.0);
        if row.member_prob > *max_w {
            *max_w = row.member_prob;
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cover_a() -> Cover {
        Cover::from_triplets(vec![(0, 0, 1.0), (0, 1, 0.75), (1, 1, 1.0)]).unwrap()
    }

    fn cover_b() -> Cover {
        Cover::from_triplets(vec![(0, 0, 0.75), (0, 1, 0.5), (1, 0, 0.25), (1, 1, 0.75)]).unwrap()
    }

    #[test]
    fn test_shared_node_index() {
        let a = Cover::from_pairs(vec![(10, 0), (30, 0)]).unwrap();
        let b = Cover::from_pairs(vec![(20, 5), (30, 5)]).unwrap();
        let nodes = NodeIndex::from_covers(&a, &b);
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes.index_of(10), Some(0));
        assert_eq!(nodes.index_of(20), Some(1));
        assert_eq!(nodes.index_of(30), Some(2));
        assert_eq!(nodes.index_of(40), None);
    }

    #[test]
    fn test_weights_without_normalization() {
        let config = NmiConfig::weighted(Normalization::None);
        let m = build_memberships(&cover_a(), &cover_b(), &config).unwrap();

        assert_eq!(m.num_nodes(), 2);
        assert_eq!(m.a.community(0).members, vec![(0, 1.0)]);
        assert_eq!(m.a.community(1).members, vec![(0, 0.75), (1, 1.0)]);
        assert_eq!(m.b.community(0).members, vec![(0, 0.75), (1, 0.25)]);
        assert_eq!(m.b.community(1).members, vec![(0, 0.5), (1, 0.75)]);

        assert_eq!(m.a.weight(1, 0), 0.0);
        assert_eq!(m.a.weight(1, 1), 1.0);
        assert_eq!(m.b.memberships_of(1), &[(0, 0.25), (1, 0.75)]);
        assert_eq!(m.a.masses(), vec![1.0, 1.75]);
        assert!(m.a.dropped().is_empty());
    }

    #[test]
    fn test_per_community_normalization() {
        let config = NmiConfig::weighted(Normalization::PerCommunity);
        let m = build_memberships(&cover_a(), &cover_b(), &config).unwrap();
        // community 0 of B: max 0.75
        assert_eq!(m.b.community(0).members, vec![(0, 1.0), (1, 0.25 / 0.75)]);
        // community 1 of B: max 0.75
        assert_eq!(m.b.community(1).members, vec![(0, 0.5 / 0.75), (1, 1.0)]);
    }

    #[test]
    fn test_per_node_normalization() {
        let config = NmiConfig::weighted(Normalization::PerNode);
        let m = build_memberships(&cover_a(), &cover_b(), &config).unwrap();
        // node 0 of B: max 0.75, node 1 of B: max 0.75
        assert_eq!(m.b.community(0).members, vec![(0, 1.0), (1, 0.25 / 0.75)]);
        assert_eq!(m.b.community(1).members, vec![(0, 0.5 / 0.75), (1, 1.0)]);
        // node 0 of A: max 1.0, so unchanged
        assert_eq!(m.a.community(1).members, vec![(0, 0.75), (1, 1.0)]);
    }

    #[test]
    fn test_zero_maximum_left_alone() {
        let a = Cover::from_triplets(vec![(0, 0, 0.0), (1, 0, 0.0), (0, 1, 0.5)]).unwrap();
        let config = NmiConfig::weighted(Normalization::PerCommunity);
        let nodes = NodeIndex::from_covers(&a, &a);
        let table = MembershipTable::build(&a, &nodes, &config).unwrap();
        assert_eq!(table.dropped(), &[(0, Degeneracy::Empty)]);
        assert_eq!(table.community_ids(), vec![1]);
        assert_eq!(table.community(0).members, vec![(0, 1.0)]);
    }

    #[test]
    fn test_zero_node_maximum_left_alone() {
        // node 1 has only zero weights; node 0 is rescaled by 0.5
        let a = Cover::from_triplets(vec![(0, 0, 0.5), (1, 0, 0.0), (0, 1, 0.25), (1, 1, 0.0)])
            .unwrap();
        let config = NmiConfig::weighted(Normalization::PerNode);
        let nodes = NodeIndex::from_covers(&a, &a);
        let table = MembershipTable::build(&a, &nodes, &config).unwrap();
        assert!(table.dropped().is_empty());
        assert_eq!(table.community(0).members, vec![(0, 1.0)]);
        assert_eq!(table.community(1).members, vec![(0, 0.5)]);
        assert!(table.memberships_of(1).is_empty());
    }

    #[test]
    fn test_vanishing_marginal_is_empty() {
        let a = Cover::from_triplets(vec![(0, 0, 5e-324), (1, 1, 1.0)]).unwrap();
        let nodes = NodeIndex::from_covers(&a, &a);
        let table =
            MembershipTable::build(&a, &nodes, &NmiConfig::weighted(Normalization::None)).unwrap();
        assert_eq!(table.dropped(), &[(0, Degeneracy::Empty)]);
        assert_eq!(table.community_ids(), vec![1]);

        assert_eq!(classify(0.0, 3), Some(Degeneracy::Empty));
        assert_eq!(classify(3.0, 3), Some(Degeneracy::Universal));
        assert_eq!(classify(1.5, 3), None);
    }

    #[test]
    fn test_unweighted_threshold() {
        let a = Cover::from_triplets(vec![(0, 0, 1.0), (1, 0, 0.6), (2, 0, 0.2), (2, 3, 1.0)])
            .unwrap();
        let nodes = NodeIndex::from_covers(&a, &a);

        let table = MembershipTable::build(&a, &nodes, &NmiConfig::unweighted(0.5)).unwrap();
        assert_eq!(table.community(0).members, vec![(0, 1.0), (1, 1.0)]);
        assert_eq!(table.community(0).mass, 2.0);

        let table = MembershipTable::build(&a, &nodes, &NmiConfig::unweighted(1.0)).unwrap();
        assert_eq!(table.community(0).members, vec![(0, 1.0)]);
        assert_eq!(table.community_ids(), vec![0, 3]);
    }

    #[test]
    fn test_degenerate_communities_dropped() {
        // community 2 spans all three nodes
        let a = Cover::from_pairs(vec![(0, 0), (1, 0), (0, 1), (2, 1)]).unwrap();
        let b = Cover::from_pairs(vec![(0, 7), (1, 7), (0, 2), (1, 2), (2, 2), (2, 9)]).unwrap();
        let m = build_memberships(&a, &b, &NmiConfig::default()).unwrap();

        assert_eq!(m.a.num_communities(), 2);
        assert_eq!(m.b.community_ids(), vec![7, 9]);
        assert_eq!(m.b.dropped(), &[(2, Degeneracy::Universal)]);
        assert_eq!(m.b.memberships_of(2), &[(1, 1.0)]);
    }

    #[test]
    fn test_universal_by_mass_only() {
        // spans both nodes but with less than full weight
        let a = cover_a();
        let nodes = NodeIndex::from_covers(&a, &a);
        let table =
            MembershipTable::build(&a, &nodes, &NmiConfig::weighted(Normalization::None)).unwrap();
        assert_eq!(table.num_communities(), 2);
    }
}
