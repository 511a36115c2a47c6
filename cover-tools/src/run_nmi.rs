use crate::common::*;
use crate::progress::BarProgress;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizationArg {
    None,
    PerCommunity,
    PerNode,
}

impl From<NormalizationArg> for Normalization {
    fn from(arg: NormalizationArg) -> Self {
        match arg {
            NormalizationArg::None => Normalization::None,
            NormalizationArg::PerCommunity => Normalization::PerCommunity,
            NormalizationArg::PerNode => Normalization::PerNode,
        }
    }
}

#[derive(Args, Debug)]
pub struct NmiArgs {
    #[arg(
        required = true,
        help = "Discovered (test) cover file",
        long_help = "Cover to evaluate: a `.csv` or `.csv.gz` table with the header \n\
		     `node_id,community_id,member_prob` (columns in any order)."
    )]
    test: Box<str>,

    #[arg(
        required = true,
        help = "Ground-truth cover file",
        long_help = "Reference cover in the same format as the test cover. \n\
		     The score is symmetric, so the two files can be swapped."
    )]
    truth: Box<str>,

    #[arg(
        long,
        default_value_t = false,
        help = "Threshold memberships into binary ones",
        long_help = "Treat a node as a member of a community iff its (normalized) \n\
		     membership probability is at least `--threshold`."
    )]
    unweighted: bool,

    #[arg(
        short = 't',
        long,
        default_value_t = cover_nmi::config::DEFAULT_THRESHOLD,
        help = "Membership threshold for `--unweighted`",
        long_help = "Minimum membership probability, in [0, 1], for a row \n\
		     to count as a membership in unweighted mode."
    )]
    threshold: f64,

    #[arg(
        long,
        value_enum,
        help = "How membership probabilities are rescaled",
        long_help = "Divide each weight by the maximum weight of its community \n\
		     (`per-community`) or of its node (`per-node`), or keep the raw \n\
		     weights (`none`). Defaults to `per-community` for weighted and \n\
		     `none` for unweighted evaluation."
    )]
    normalization: Option<NormalizationArg>,

    #[arg(
        long,
        default_value_t = false,
        help = "Print the full report as JSON",
        long_help = "Print the NMI together with the conditional entropies \n\
		     and community counts as a JSON object."
    )]
    json: bool,

    #[arg(
        long,
        default_value_t = num_cpus::get(),
        help = "Maximum number of threads"
    )]
    threads: usize,

    #[arg(
        long,
        short,
        help = "verbosity",
        long_help = "Enable verbose output `RUST_LOG=info`"
    )]
    verbose: bool,

    #[arg(long, default_value_t = false, help = "Hide progress bars")]
    no_progress: bool,
}

impl NmiArgs {
    pub fn to_config(&self) -> NmiConfig {
        if self.unweighted {
            let normalization = self
                .normalization
                .map(Normalization::from)
                .unwrap_or(Normalization::None);
            NmiConfig::unweighted(self.threshold).with_normalization(normalization)
        } else {
            let normalization = self
                .normalization
                .map(Normalization::from)
                .unwrap_or_default();
            NmiConfig::weighted(normalization)
        }
    }
}

/// Evaluate the NMI of two cover files and print it
pub fn run_nmi(args: &NmiArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);

    let max_threads = num_cpus::get().min(args.threads).max(1);

    ThreadPoolBuilder::new()
        .num_threads(max_threads)
        .build_global()?;

    info!("will use {} threads", rayon::current_num_threads());

    let config = args.to_config();
    config.validate()?;

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            warn!("Interrupt received, stopping the evaluation");
            cancel.cancel();
        })?;
    }

    let test = io::read_cover(&args.test)?;
    let truth = io::read_cover(&args.truth)?;

    let progress = BarProgress::new(!args.no_progress && !args.verbose);

    let report = NmiEvaluator::new(config)
        .with_observer(&progress)
        .with_cancel_token(cancel)
        .evaluate(&test, &truth)?;

    if report.dropped_a > 0 || report.dropped_b > 0 {
        info!(
            "ignored {} + {} empty or all-node communities",
            report.dropped_a, report.dropped_b
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("NMI: {}", report.nmi);
    }

    Ok(())
}
