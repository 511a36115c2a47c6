mod common;
mod progress;
mod run_nmi;
mod run_reformat;
mod run_simulate;
mod run_summary;

use crate::common::*;
use run_nmi::*;
use run_reformat::*;
use run_simulate::*;
use run_summary::*;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Compare overlapping community covers",
    long_about = "Normalized mutual information between overlapping, weighted covers\n\
		  (Lancichinetti, Fortunato & Kertész 2009).\n\
		  A cover is a table of `node_id,community_id,member_prob` rows.",
    term_width = 80
)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "NMI between a discovered (test) cover and the ground truth",
        long_about = "Estimate the overlapping NMI in three stages: \n\
		      (1) Build membership tables over the union of nodes\n\
		      (2) Estimate joint membership distributions of community pairs\n\
		      (3) Match each community to its best feasible partner.\n"
    )]
    Nmi(NmiArgs),

    /// Count communities and nodes of a cover
    Summary(SummaryArgs),

    #[command(
        about = "Rewrite a delimited table as a cover file",
        long_about = "Pick the node, community and (optional) membership columns\n\
		      of a comma, tab or space separated table by header name\n\
		      and write them as `node_id,community_id,member_prob`.\n\
		      Without a membership column every row gets 1.0."
    )]
    Reformat(ReformatArgs),

    /// Simulate a ground-truth cover and a perturbed copy of it
    Simulate(SimulateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.commands {
        Commands::Nmi(args) => {
            run_nmi(args)?;
        }
        Commands::Summary(args) => {
            run_summary(args)?;
        }
        Commands::Reformat(args) => {
            run_reformat(args)?;
        }
        Commands::Simulate(args) => {
            run_simulate(args)?;
        }
    }

    info!("Done");
    Ok(())
}
