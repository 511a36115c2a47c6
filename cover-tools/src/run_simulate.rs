use crate::common::*;
use cover_nmi::simulate::{simulate_covers, SimArgs};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[arg(
        short,
        long,
        required = true,
        help = "Output header",
        long_help = "Output header; writes `{out}.truth.csv.gz` \n\
		     and `{out}.discovered.csv.gz`."
    )]
    out: Box<str>,

    #[arg(long, default_value_t = 1000, help = "Number of nodes")]
    nodes: usize,

    #[arg(long, default_value_t = 20, help = "Number of communities")]
    communities: usize,

    #[arg(
        long,
        default_value_t = 3,
        help = "Maximum number of communities per node"
    )]
    max_overlap: usize,

    #[arg(
        long,
        default_value_t = 0.1,
        help = "Perturbation level of the discovered cover",
        long_help = "Probability of moving each membership to a random community, \n\
		     also the standard deviation of the multiplicative noise \n\
		     on membership probabilities. In [0, 1]."
    )]
    noise: f64,

    #[arg(long, default_value_t = 2.0, help = "Beta(a, .) of secondary memberships")]
    beta_a: f64,

    #[arg(long, default_value_t = 2.0, help = "Beta(., b) of secondary memberships")]
    beta_b: f64,

    #[arg(long, default_value_t = 42, help = "Random seed")]
    rseed: u64,

    #[arg(
        long,
        short,
        help = "verbosity",
        long_help = "Enable verbose output `RUST_LOG=info`"
    )]
    verbose: bool,
}

/// Simulate a pair of covers and write them next to each other
pub fn run_simulate(args: &SimulateArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);

    let sim = simulate_covers(&SimArgs {
        nodes: args.nodes,
        communities: args.communities,
        max_overlap: args.max_overlap,
        noise: args.noise,
        beta: (args.beta_a, args.beta_b),
        rseed: args.rseed,
    })?;

    let truth_file = format!("{}.truth.csv.gz", args.out);
    let discovered_file = format!("{}.discovered.csv.gz", args.out);

    mkdir_parent(&truth_file)?;
    io::write_cover(&sim.truth, &truth_file)?;
    io::write_cover(&sim.discovered, &discovered_file)?;

    info!("wrote {} and {}", truth_file, discovered_file);
    Ok(())
}
