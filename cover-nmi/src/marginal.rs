use crate::membership::MembershipTable;
use ndarray::Array1;

/// P(node in community k): total membership mass of `k` over `num_nodes`
pub fn marginal(table: &MembershipTable) -> Array1<f64> {
    let n = table.num_nodes() as f64;
    table.communities().iter().map(|c| c.mass / n).collect()
}
