use crate::common::*;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[arg(required = true, help = "Cover file (`.csv` or `.csv.gz`)")]
    cover: Box<str>,

    #[arg(
        long,
        short,
        help = "verbosity",
        long_help = "Enable verbose output `RUST_LOG=info`"
    )]
    verbose: bool,
}

/// Print the number of communities and nodes of a cover
pub fn run_summary(args: &SummaryArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);

    let cover = io::read_cover(&args.cover)?;
    for line in summary_lines(&cover.summary()) {
        println!("{}", line);
    }
    Ok(())
}

fn range_str(range: Option<(u64, u64)>) -> String {
    match range {
        Some((lb, ub)) => format!("[{}, {}]", lb, ub),
        None => "-".to_string(),
    }
}

fn summary_lines(summary: &CoverSummary) -> Vec<String> {
    vec![
        format!("rows: {}", summary.num_rows),
        format!(
            "communities: {} {}",
            summary.num_communities,
            range_str(summary.community_range)
        ),
        format!(
            "nodes: {} {}",
            summary.num_nodes,
            range_str(summary.node_range)
        ),
    ]
}
