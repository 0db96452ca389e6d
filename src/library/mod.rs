//! The sharded reference library.
//!
//! A library is a directory of plain-text shard files plus a manifest.  Each shard holds the
//! reference records of one chromosome in one bucket of [`BUCKET_SIZE`] positions and is named
//! `<chromosome>c<bucket start>.subvcf`, e.g., `1c1000000.subvcf`.

use std::path::{Path, PathBuf};

use crate::common::contig::name_without_chr;

pub mod build;
pub mod manifest;
pub mod record;

/// Width of the position buckets that records are grouped into.
pub const BUCKET_SIZE: u64 = 100_000;

/// Default name of the library directory.
pub const DEFAULT_LIBRARY_DIR: &str = "subvcfs";

/// File extension of shard files.
pub const SHARD_EXTENSION: &str = "subvcf";

/// Name of the manifest file within the library directory.
pub const MANIFEST_FILE: &str = "hashsum";

/// Key of a shard: the normalized chromosome and the first position of the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShardKey {
    /// Chromosome name without `chr` prefix.
    pub chrom: String,
    /// Start of the bucket, a multiple of [`BUCKET_SIZE`].
    pub bucket_start: u64,
}

impl ShardKey {
    /// Compute the key of the shard that contains the given locus.
    pub fn from_locus(chrom: &str, pos: u64) -> Self {
        Self {
            chrom: name_without_chr(chrom).to_string(),
            bucket_start: pos - pos % BUCKET_SIZE,
        }
    }

    /// The shard's file name.
    pub fn file_name(&self) -> String {
        format!("{}c{}.{}", self.chrom, self.bucket_start, SHARD_EXTENSION)
    }

    /// Path of the shard file within the library directory `library`.
    pub fn path_in(&self, library: &Path) -> PathBuf {
        library.join(self.file_name())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[rstest::rstest]
    #[case("1", 1_000_000, "1", 1_000_000)]
    #[case("1", 1_099_999, "1", 1_000_000)]
    #[case("chr1", 1_100_000, "1", 1_100_000)]
    #[case("X", 99_999, "X", 0)]
    #[case("CHRMT", 16_569, "MT", 0)]
    fn from_locus(
        #[case] chrom: &str,
        #[case] pos: u64,
        #[case] expected_chrom: &str,
        #[case] expected_start: u64,
    ) {
        let key = ShardKey::from_locus(chrom, pos);
        assert_eq!(key.chrom, expected_chrom);
        assert_eq!(key.bucket_start, expected_start);
        assert_eq!(key.bucket_start, (pos / BUCKET_SIZE) * BUCKET_SIZE);
    }

    #[test]
    fn file_name() {
        insta::assert_snapshot!(
            ShardKey::from_locus("chr1", 1_000_000).file_name(),
            @"1c1000000.subvcf"
        );
        insta::assert_snapshot!(
            ShardKey::from_locus("22", 12).file_name(),
            @"22c0.subvcf"
        );
    }

    #[test]
    fn path_in() {
        let key = ShardKey::from_locus("2", 250_000);
        assert_eq!(
            key.path_in(Path::new("lib")),
            Path::new("lib").join("2c200000.subvcf")
        );
    }
}
