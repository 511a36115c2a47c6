//! Planted overlapping covers for benchmarking.
//!
//! The ground truth gives every node between one and `max_overlap`
//! communities; its first community has weight 1 and the others draw
//! a weight from `Beta(a, b)`. The discovered cover copies the truth,
//! moving each membership to a random community with probability
//! `noise` and perturbing its weight by multiplicative Gaussian noise.

use crate::cover::Cover;
use fnv::FnvHashSet as HashSet;
use log::info;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Distribution, Normal};

pub struct SimArgs {
    pub nodes: usize,
    pub communities: usize,
    pub max_overlap: usize,
    /// probability of reassigning each membership, and the scale of
    /// the weight perturbation
    pub noise: f64,
    /// `(a, b)` of the Beta distribution of secondary weights
    pub beta: (f64, f64),
    pub rseed: u64,
}

impl Default for SimArgs {
    fn default() -> Self {
        Self {
            nodes: 1000,
            communities: 20,
            max_overlap: 3,
            noise: 0.1,
            beta: (2.0, 2.0),
            rseed: 42,
        }
    }
}

pub struct SimOut {
    pub truth: Cover,
    pub discovered: Cover,
}

/// Sample a ground-truth cover and a noisy copy of it
pub fn simulate_covers(args: &SimArgs) -> anyhow::Result<SimOut> {
    if args.nodes == 0 || args.communities == 0 {
        anyhow::bail!("need at least one node and one community");
    }
    if args.max_overlap == 0 || args.max_overlap > args.communities {
        anyhow::bail!(
            "max overlap {} must be in [1, {}]",
            args.max_overlap,
            args.communities
        );
    }
    if !(0.0..=1.0).contains(&args.noise) {
        anyhow::bail!("noise {} is outside [0, 1]", args.noise);
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(args.rseed);
    let beta = Beta::new(args.beta.0, args.beta.1)?;
    let jitter = Normal::new(0.0, args.noise)?;

    let kk = args.communities;
    let mut truth = vec![];

    for node in 0..args.nodes {
        let m = rng.random_range(1..=args.max_overlap);
        let coms = rand::seq::index::sample(&mut rng, kk, m);
        for (j, k) in coms.iter().enumerate() {
            let w = if j == 0 { 1.0 } else { beta.sample(&mut rng) };
            truth.push((node as i64, k as i64, w));
        }
    }

    let mut discovered = Vec::with_capacity(truth.len());
    let mut seen: HashSet<(i64, i64)> = HashSet::default();

    for &(node, k, w) in truth.iter() {
        let k = if args.noise > 0.0 && rng.random::<f64>() < args.noise {
            rng.random_range(0..kk) as i64
        } else {
            k
        };
        if !seen.insert((node, k)) {
            continue;
        }
        let w = if args.noise > 0.0 {
            (w * (1.0 + jitter.sample(&mut rng))).clamp(0.0, 1.0)
        } else {
            w
        };
        discovered.push((node, k, w));
    }

    info!(
        "simulated {} true and {} discovered memberships over {} nodes",
        truth.len(),
        discovered.len(),
        args.nodes
    );

    Ok(SimOut {
        truth: Cover::from_triplets(truth)?,
        discovered: Cover::from_triplets(discovered)?,
    })
}
