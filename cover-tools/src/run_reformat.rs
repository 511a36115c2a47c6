use crate::common::*;

#[derive(Args, Debug)]
pub struct ReformatArgs {
    #[arg(
        required = true,
        help = "Input table",
        long_help = "Delimited text table (comma, tab or whitespace; optionally gzipped) \n\
		     with a header line naming its columns."
    )]
    input: Box<str>,

    #[arg(long, default_value = io::NODE_COLUMN, help = "Header of the node id column")]
    node_col: Box<str>,

    #[arg(
        long,
        default_value = io::COMMUNITY_COLUMN,
        help = "Header of the community id column"
    )]
    community_col: Box<str>,

    #[arg(
        long,
        help = "Header of the membership probability column",
        long_help = "Header of the membership probability column. \n\
		     If omitted, every row is a full membership (1.0)."
    )]
    prob_col: Option<Box<str>>,

    #[arg(
        short,
        long,
        default_value = "stdout",
        help = "Output cover file",
        long_help = "Output file; `.gz` extension compresses it. \n\
		     By default the cover is written to stdout."
    )]
    output: Box<str>,

    #[arg(
        long,
        short,
        help = "verbosity",
        long_help = "Enable verbose output `RUST_LOG=info`"
    )]
    verbose: bool,
}

/// Rewrite an arbitrary table into a canonical cover file
pub fn run_reformat(args: &ReformatArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);
    reformat(args)
}

fn reformat(args: &ReformatArgs) -> anyhow::Result<()> {
    let columns = io::CoverColumns {
        node: &args.node_col,
        community: &args.community_col,
        prob: args.prob_col.as_deref(),
    };

    let cover = io::read_cover_columns(&args.input, &columns)?;

    if args.output.as_ref() != "stdout" {
        mkdir_parent(&args.output)?;
    }
    io::write_cover(&cover, &args.output)?;

    info!("wrote {} rows to {}", cover.len(), args.output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reformat_without_probabilities() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("raw.tsv");
        let output = dir.path().join("out").join("cover.csv.gz");

        let mut f = std::fs::File::create(&input)?;
        writeln!(f, "cluster\tgene\tscore")?;
        writeln!(f, "7\t1\t0.3")?;
        writeln!(f, "7\t2\t0.9")?;
        writeln!(f, "8\t2\t0.1")?;
        drop(f);

        let args = ReformatArgs {
            input: input.to_string_lossy().into(),
            node_col: "gene".into(),
            community_col: "cluster".into(),
            prob_col: None,
            output: output.to_string_lossy().into(),
            verbose: false,
        };
        reformat(&args)?;

        let cover = io::read_cover(&output.to_string_lossy())?;
        let expected = Cover::from_pairs(vec![(1, 7), (2, 7), (2, 8)])?;
        assert_eq!(cover, expected);
        Ok(())
    }
}
