//! Resolution of loci to reference records.

use std::path::{Path, PathBuf};

use crate::common::contig::name_without_chr;
use crate::library::record::{split_locus, ReferenceRecord};
use crate::library::{manifest, ShardKey};

/// Looks up reference records in a library, keeping the last loaded shard in memory.
///
/// Lookups of neighbouring loci hit the same shard, so sorted input loads each shard once.
#[derive(Debug)]
pub struct LocusResolver {
    library: PathBuf,
    cached: Option<(ShardKey, String)>,
    loads: usize,
}

impl LocusResolver {
    /// Open the library at `library` after checking its integrity.
    pub fn open(library: &Path) -> Result<Self, anyhow::Error> {
        if !library.is_dir() {
            anyhow::bail!(
                "no library found at {}; build one with `popfreq library build`",
                library.display()
            );
        }
        if !manifest::check_integrity(library) {
            anyhow::bail!(
                "check of library {} not passed; please be sure no files have been added, \
                 removed, or renamed in the library directory",
                library.display()
            );
        }
        tracing::debug!("library {} passed integrity check", library.display());

        Ok(Self {
            library: library.to_path_buf(),
            cached: None,
            loads: 0,
        })
    }

    /// Number of shard files read from disk so far.
    pub fn shard_loads(&self) -> usize {
        self.loads
    }

    /// Return the body of the shard with the given key, loading it if necessary.
    ///
    /// Returns `None` if there is no such shard.
    fn shard(&mut self, key: ShardKey) -> Result<Option<&str>, anyhow::Error> {
        let is_cached = matches!(&self.cached, Some((cached, _)) if *cached == key);
        if !is_cached {
            let path = key.path_in(&self.library);
            if !path.exists() {
                return Ok(None);
            }
            tracing::trace!("loading shard {}", path.display());
            let body = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("could not read shard {}: {}", path.display(), e))?;
            self.loads += 1;
            self.cached = Some((key, body));
        }
        Ok(self.cached.as_ref().map(|(_, body)| body.as_str()))
    }

    /// Find the reference record at the given locus.
    ///
    /// Returns `None` if the library has no record there, i.e., the locus is novel.
    pub fn lookup(
        &mut self,
        chrom: &str,
        pos: u64,
    ) -> Result<Option<ReferenceRecord>, anyhow::Error> {
        let chrom = name_without_chr(chrom);
        let Some(body) = self.shard(ShardKey::from_locus(chrom, pos))? else {
            return Ok(None);
        };

        let line = body.lines().find(|line| {
            split_locus(line).is_some_and(|(line_chrom, line_pos)| {
                name_without_chr(line_chrom) == chrom && line_pos.parse::<u64>().ok() == Some(pos)
            })
        });
        line.map(ReferenceRecord::from_line).transpose()
    }
}
