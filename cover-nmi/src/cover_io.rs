//! Reading and writing cover tables.
//!
//! A cover file is a delimited text table (`,`, tab or whitespace),
//! optionally gzipped, whose header names the columns `node_id`,
//! `community_id` and `member_prob` in any order. Lines starting with
//! `#` or `%` are skipped.

use crate::cover::Cover;
use flate2::read::GzDecoder;
use log::info;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub const NODE_COLUMN: &str = "node_id";
pub const COMMUNITY_COLUMN: &str = "community_id";
pub const PROB_COLUMN: &str = "member_prob";

/// Which header columns hold the three cover fields
#[derive(Debug, Clone)]
pub struct CoverColumns<'a> {
    pub node: &'a str,
    pub community: &'a str,
    /// `None`: every row has membership 1
    pub prob: Option<&'a str>,
}

impl Default for CoverColumns<'_> {
    fn default() -> Self {
        Self {
            node: NODE_COLUMN,
            community: COMMUNITY_COLUMN,
            prob: Some(PROB_COLUMN),
        }
    }
}

///
/// Open a file for reading, and return a buffered reader
/// * `input_file` - file name--either gzipped or not
///
pub fn open_buf_reader(input_file: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let file = File::open(input_file)
        .map_err(|e| anyhow::anyhow!("failed to open {}: {}", input_file, e))?;

    match Path::new(input_file).extension().and_then(|x| x.to_str()) {
        Some("gz") => Ok(Box::new(BufReader::new(GzDecoder::new(file)))),
        _ => Ok(Box::new(BufReader::new(file))),
    }
}

///
/// Open a file for writing, and return a buffered writer
/// * `output_file` - file name--either gzipped or not, or `stdout`
///
pub fn open_buf_writer(output_file: &str) -> anyhow::Result<Box<dyn Write>> {
    if output_file.eq_ignore_ascii_case("stdout") {
        return Ok(Box::new(BufWriter::new(std::io::stdout())));
    }

    let file = File::create(output_file)?;
    match Path::new(output_file).extension().and_then(|x| x.to_str()) {
        Some("gz") => {
            let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            Ok(Box::new(BufWriter::new(encoder)))
        }
        _ => Ok(Box::new(BufWriter::new(file))),
    }
}

/// Read a cover file with the canonical column names
pub fn read_cover(input_file: &str) -> anyhow::Result<Cover> {
    read_cover_columns(input_file, &CoverColumns::default())
}

/// Read a cover from any delimited table, picking the columns by name
pub fn read_cover_columns(input_file: &str, columns: &CoverColumns) -> anyhow::Result<Cover> {
    let buf = open_buf_reader(input_file)?;

    let mut lines = vec![];
    for (line_no, line) in buf.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
            continue;
        }
        lines.push((line_no + 1, line));
    }

    let Some(((_, header), body)) = lines.split_first() else {
        anyhow::bail!("no header line in {}", input_file);
    };

    let delim = Delim::detect(header);
    let header: Vec<&str> = delim.split(header).collect();

    let find = |name: &str| -> anyhow::Result<usize> {
        header
            .iter()
            .position(|h| h.trim_matches('"').eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow::anyhow!("column `{}` not found in {}", name, input_file))
    };

    let node_col = find(columns.node)?;
    let community_col = find(columns.community)?;
    let prob_col = columns.prob.map(find).transpose()?;

    // Parsing takes more time, so split them into parallel jobs
    let triplets = body
        .par_iter()
        .map(|(line_no, line)| -> anyhow::Result<(i64, i64, f64)> {
            let words: Vec<&str> = delim.split(line).collect();
            let field = |j: usize| {
                words.get(j).map(|w| w.trim_matches('"')).ok_or_else(|| {
                    anyhow::anyhow!("{}:{}: missing column #{}", input_file, line_no, j + 1)
                })
            };

            let node_id = parse_id(field(node_col)?)
                .map_err(|e| anyhow::anyhow!("{}:{}: node id {}", input_file, line_no, e))?;
            let community_id = parse_id(field(community_col)?)
                .map_err(|e| anyhow::anyhow!("{}:{}: community id {}", input_file, line_no, e))?;
            let member_prob = match prob_col {
                Some(j) => field(j)?.parse::<f64>().map_err(|e| {
                    anyhow::anyhow!("{}:{}: membership probability {}", input_file, line_no, e)
                })?,
                None => 1.0,
            };
            Ok((node_id, community_id, member_prob))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let cover = Cover::from_triplets(triplets)
        .map_err(|e| anyhow::anyhow!("{}: {}", input_file, e))?;

    info!("read {} rows from {}", cover.len(), input_file);
    Ok(cover)
}

/// Write a cover as `node_id,community_id,member_prob` CSV
pub fn write_cover(cover: &Cover, output_file: &str) -> anyhow::Result<()> {
    let mut buf = open_buf_writer(output_file)?;
    writeln!(buf, "{},{},{}", NODE_COLUMN, COMMUNITY_COLUMN, PROB_COLUMN)?;
    for row in cover.rows() {
        if let Err(e) = writeln!(
            buf,
            "{},{},{}",
            row.node_id, row.community_id, row.member_prob
        ) {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                return Ok(());
            }
            return Err(e.into());
        }
    }
    buf.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Delim {
    Comma,
    Tab,
    Whitespace,
}

impl Delim {
    fn detect(header: &str) -> Self {
        if header.contains(',') {
            Delim::Comma
        } else if header.contains('\t') {
            Delim::Tab
        } else {
            Delim::Whitespace
        }
    }

    fn split<'a>(&self, line: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match self {
            Delim::Comma => Box::new(line.split(',').map(str::trim)),
            Delim::Tab => Box::new(line.split('\t').map(str::trim)),
            Delim::Whitespace => Box::new(line.split_whitespace()),
        }
    }
}

/// Integer id; integral floats such as `12.0` are accepted
fn parse_id(word: &str) -> anyhow::Result<i64> {
    if let Ok(id) = word.parse::<i64>() {
        return Ok(id);
    }
    let x = word
        .parse::<f64>()
        .map_err(|_| anyhow::anyhow!("`{}` is not an integer", word))?;
    if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        Ok(x as i64)
    } else {
        anyhow::bail!("`{}` is not an integer", word)
    }
}
