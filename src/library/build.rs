//! Partitioning of the reference data set into the sharded library.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use rustc_hash::FxHashSet;
use thousands::Separable;

use super::record::{parse_pos, split_locus};
use super::{manifest, ShardKey, DEFAULT_LIBRARY_DIR};
use crate::common::io::std::{open_read_maybe_gz, read_line_trimmed};

/// Command line arguments for `library build` sub command.
#[derive(Parser, Debug)]
#[command(about = "Split a reference VCF into a sharded library", long_about = None)]
pub struct Args {
    /// Path to the reference VCF file, sorted by chromosome and position.
    #[arg(long)]
    pub path_reference: PathBuf,
    /// Path to the library directory to create; must not exist yet.
    #[arg(long, default_value = DEFAULT_LIBRARY_DIR)]
    pub path_library: PathBuf,
}

/// Statistics of a library build.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of reference records written.
    pub records: usize,
    /// Number of shard files opened.
    pub shards: usize,
    /// Number of times a shard was re-opened, i.e., the input was not sorted.
    pub reopened: usize,
}

/// The shard currently being written to.
struct ShardWriter {
    key: ShardKey,
    writer: BufWriter<File>,
}

impl ShardWriter {
    fn create(library: &Path, key: ShardKey) -> Result<Self, anyhow::Error> {
        let path = key.path_in(library);
        tracing::trace!("Opening shard {}", path.display());
        let file = File::create(&path)
            .map_err(|e| anyhow::anyhow!("could not create shard {}: {}", path.display(), e))?;
        Ok(Self {
            key,
            writer: BufWriter::new(file),
        })
    }

    fn finish(mut self) -> Result<(), anyhow::Error> {
        self.writer
            .flush()
            .map_err(|e| anyhow::anyhow!("problem flushing shard {:?}: {}", self.key, e))
    }
}

/// Create the library directory, refusing to touch an existing one.
fn create_library_dir(library: &Path) -> Result<(), anyhow::Error> {
    if library.exists() {
        anyhow::bail!(
            "library directory {} already exists; please remove it first",
            library.display()
        );
    }
    std::fs::create_dir_all(library).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => anyhow::anyhow!(
            "permission to create library directory {} was denied",
            library.display()
        ),
        _ => anyhow::anyhow!(
            "unable to create library directory {}: {}",
            library.display(),
            e
        ),
    })
}

/// Write the records from `reader` into shards below `library` and write the manifest.
///
/// The input must be sorted by chromosome and position.  Each switch to a new shard key
/// (re-)creates the shard file, so a key that shows up again after another key truncates
/// the records written before.
pub fn build_library<R: BufRead>(
    mut reader: R,
    library: &Path,
) -> Result<BuildStats, anyhow::Error> {
    create_library_dir(library)?;

    let mut stats = BuildStats::default();
    let mut seen: FxHashSet<ShardKey> = FxHashSet::default();
    let mut current: Option<ShardWriter> = None;

    let mut prev = Instant::now();
    let mut line = String::new();
    let mut line_no = 0usize;
    while read_line_trimmed(&mut reader, &mut line)? {
        line_no += 1;
        if line.starts_with('#') || line.is_empty() {
            continue;
        }

        let (chrom, pos) = split_locus(&line)
            .ok_or_else(|| anyhow::anyhow!("line {}: not a tab-separated record", line_no))?;
        let pos = parse_pos(pos).map_err(|e| anyhow::anyhow!("line {}: {}", line_no, e))?;
        let key = ShardKey::from_locus(chrom, pos);

        if current.as_ref().map(|shard| &shard.key) != Some(&key) {
            if let Some(shard) = current.take() {
                shard.finish()?;
            }
            if !seen.insert(key.clone()) {
                tracing::warn!(
                    "line {}: shard {} re-opened, input is not sorted and records will be lost",
                    line_no,
                    key.file_name()
                );
                stats.reopened += 1;
            }
            current = Some(ShardWriter::create(library, key)?);
            stats.shards += 1;
        }

        if let Some(shard) = current.as_mut() {
            writeln!(shard.writer, "{}", &line)
                .map_err(|e| anyhow::anyhow!("problem writing library file: {}", e))?;
        }
        stats.records += 1;

        if prev.elapsed().as_secs() >= 5 {
            tracing::info!(
                "at {}:{} ({} records)",
                chrom,
                pos,
                stats.records.separate_with_commas()
            );
            prev = Instant::now();
        }
    }
    if let Some(shard) = current.take() {
        shard.finish()?;
    }

    manifest::write_manifest(library)?;

    Ok(stats)
}

/// Main entry point for `library build` sub command.
pub fn run(common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!(
        "Building reference library\ncommon args: {:#?}\nargs: {:#?}",
        common,
        args
    );

    let start = Instant::now();
    let reader = open_read_maybe_gz(&args.path_reference).map_err(|e| {
        anyhow::anyhow!(
            "could not open reference {}: {}",
            args.path_reference.display(),
            e
        )
    })?;
    let stats = build_library(reader, &args.path_library)?;

    tracing::info!(
        "... wrote {} records into {} shards in {:?}",
        stats.records.separate_with_commas(),
        stats.shards.separate_with_commas(),
        start.elapsed()
    );
    if stats.reopened > 0 {
        tracing::warn!(
            "{} shards were re-opened; sort the reference by chromosome and position and rebuild",
            stats.reopened
        );
    }
    crate::common::trace_rss_now();

    tracing::info!("Done building reference library");
    Ok(())
}
