//! Command line front end for tileshard.
//!
//! Parses a dataset partition descriptor and resolves tiles against it.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tileshard-cli -- --descriptor 0_12_9_4094_868_2216_3999_1 --table
//! cargo run -p tileshard-cli -- -d 0_12_9_4094_868_2216_3999_1 12/1006/1539 11/503/769
//! cargo run -p tileshard-cli -- -d 0_12_9_4094_868_2216_3999_1 --filter 12/1006/1539
//! ```

use std::io::{self, Write};

use anyhow::{bail, Context};
use tileshard_core::TileCoord;
use tileshard_partition::{PartitionSpace, SpatialFilter};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

const USAGE: &str = "\
Usage: tileshard --descriptor <DESCRIPTOR> [OPTIONS] [TILE...]

Resolve z/x/y tiles to partitions of a dataset described by
zmin_zmax_xmin_xmax_ymin_ymax_partitions_zstep.

Options:
  -d, --descriptor <D>  Partition descriptor (required)
  -t, --table           Print the partition range of every zoom level
  -f, --filter          Print a query predicate instead of the bare partition
  -c, --column <NAME>   Partition column used by --filter (default: carto_partition)
      --help            Show this help message";

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    descriptor: Option<String>,
    table: bool,
    filter: bool,
    column: Option<String>,
    tiles: Vec<String>,
    help: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let options = parse_args(std::env::args().skip(1))?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    let stdout = io::stdout();
    run(&options, &mut stdout.lock())
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--descriptor" | "-d" => {
                options.descriptor = Some(args.next().context("--descriptor needs a value")?);
            }
            "--column" | "-c" => {
                options.column = Some(args.next().context("--column needs a value")?);
            }
            "--table" | "-t" => options.table = true,
            "--filter" | "-f" => options.filter = true,
            "--help" | "-h" => options.help = true,
            flag if flag.starts_with('-') => bail!("unknown option {flag}\n\n{USAGE}"),
            _ => options.tiles.push(arg),
        }
    }

    Ok(options)
}

fn run(options: &Options, out: &mut impl Write) -> anyhow::Result<()> {
    let descriptor = options
        .descriptor
        .as_deref()
        .with_context(|| format!("missing --descriptor\n\n{USAGE}"))?;
    let space: PartitionSpace = descriptor
        .parse()
        .with_context(|| format!("invalid partition descriptor {descriptor:?}"))?;
    info!(%space, "loaded partition space");

    if options.table {
        for (z, range) in space.allocation() {
            writeln!(
                out,
                "z{z:<3} {:>10} ..= {:<10} ({} partitions)",
                range.min,
                range.max,
                range.len()
            )?;
        }
    }

    for tile in &options.tiles {
        let tile: TileCoord = tile.parse()?;
        let partition = space
            .partition(tile)
            .with_context(|| format!("failed to resolve tile {tile}"))?;
        debug!(%tile, partition, "resolved");

        if options.filter {
            let mut filter = SpatialFilter::new(tile, partition);
            if let Some(column) = &options.column {
                filter = filter.with_column(column.as_str())?;
            }
            writeln!(out, "{filter}")?;
        } else {
            writeln!(out, "{tile} {partition}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = "0_12_9_4094_868_2216_3999_1";

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn output(list: &[&str]) -> anyhow::Result<String> {
        let options = parse_args(args(list))?;
        let mut out = Vec::new();
        run(&options, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn parses_flags_and_tiles() {
        let options = parse_args(args(&["-d", DESCRIPTOR, "--filter", "12/1006/1539", "-t"])).unwrap();
        assert_eq!(options.descriptor.as_deref(), Some(DESCRIPTOR));
        assert!(options.filter && options.table);
        assert_eq!(options.tiles, vec!["12/1006/1539".to_string()]);
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["--descriptor"])).is_err());
    }

    #[test]
    fn resolves_tiles() {
        let out = output(&["-d", DESCRIPTOR, "12/1006/1539", "13/0/0"]).unwrap();
        assert_eq!(out, "12/1006/1539 1563\n13/0/0 0\n");
    }

    #[test]
    fn prints_filters() {
        let out = output(&["-d", DESCRIPTOR, "-f", "-c", "shard", "12/1006/1539"]).unwrap();
        assert_eq!(out, "z=12 AND y=1539 AND x=1006 AND shard=1563\n");
    }

    #[test]
    fn prints_allocation_table() {
        let out = output(&["-d", DESCRIPTOR, "--table"]).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[12].starts_with("z12"));
        assert!(lines[12].contains("1001 ..= 3999"));
        assert!(lines[12].contains("(2999 partitions)"));
    }

    #[test]
    fn reports_bad_input() {
        assert!(output(&["12/1006/1539"]).is_err());
        assert!(output(&["-d", "0_12_9", "12/1006/1539"]).is_err());
        assert!(output(&["-d", DESCRIPTOR, "12/1006"]).is_err());
    }
}
