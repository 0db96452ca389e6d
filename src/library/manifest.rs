//! Library manifest and integrity checking.
//!
//! The manifest is a fingerprint of the shard file names, not of their content.  It detects
//! added, removed, or renamed shards between library creation and use.

use std::path::{Path, PathBuf};

use clap::Parser;
use md5::{Digest, Md5};

use super::{DEFAULT_LIBRARY_DIR, MANIFEST_FILE};

/// Command line arguments for `library rehash` sub command.
#[derive(Parser, Debug)]
#[command(about = "Rebuild the integrity manifest of a library", long_about = None)]
pub struct RehashArgs {
    /// Path to the library directory.
    #[arg(long, default_value = DEFAULT_LIBRARY_DIR)]
    pub path_library: PathBuf,
}

/// Command line arguments for `library check` sub command.
#[derive(Parser, Debug)]
#[command(about = "Check the integrity manifest of a library", long_about = None)]
pub struct CheckArgs {
    /// Path to the library directory.
    #[arg(long, default_value = DEFAULT_LIBRARY_DIR)]
    pub path_library: PathBuf,
}

/// Compute the fingerprint of the library directory.
///
/// This is the hex MD5 digest of the concatenated, sorted names of all entries except the
/// manifest itself.
pub fn fingerprint(library: &Path) -> Result<String, anyhow::Error> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(library)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name != MANIFEST_FILE {
            names.push(name);
        }
    }
    names.sort();

    let mut hasher = Md5::new();
    for name in &names {
        hasher.update(name.as_bytes());
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compute the fingerprint and persist it to the manifest file.
pub fn write_manifest(library: &Path) -> Result<String, anyhow::Error> {
    let checksum = fingerprint(library).map_err(|e| {
        anyhow::anyhow!("could not fingerprint library {}: {}", library.display(), e)
    })?;
    std::fs::write(library.join(MANIFEST_FILE), &checksum)
        .map_err(|e| anyhow::anyhow!("could not write manifest: {}", e))?;
    tracing::debug!("wrote manifest {} for {}", &checksum, library.display());
    Ok(checksum)
}

/// Compare the persisted manifest with a freshly computed fingerprint.
fn verify(library: &Path) -> Result<bool, anyhow::Error> {
    let recorded = std::fs::read_to_string(library.join(MANIFEST_FILE))?;
    let recorded = recorded.trim_end_matches(['\n', '\r']);
    Ok(!recorded.is_empty() && recorded == fingerprint(library)?)
}

/// Check the integrity of the library.
///
/// Any I/O problem (missing manifest, unreadable directory) counts as a failed check.
pub fn check_integrity(library: &Path) -> bool {
    match verify(library) {
        Ok(passed) => passed,
        Err(e) => {
            tracing::warn!("integrity check of {} failed: {}", library.display(), e);
            false
        }
    }
}

/// Main entry point for `library rehash` sub command.
pub fn run_rehash(common: &crate::common::Args, args: &RehashArgs) -> Result<(), anyhow::Error> {
    tracing::info!(
        "Rebuilding library manifest\ncommon args: {:#?}\nargs: {:#?}",
        common,
        args
    );
    if !args.path_library.is_dir() {
        anyhow::bail!(
            "library directory {} does not exist",
            args.path_library.display()
        );
    }
    let checksum = write_manifest(&args.path_library)?;
    tracing::info!("Done, new fingerprint is {}", checksum);
    Ok(())
}

/// Main entry point for `library check` sub command.
pub fn run_check(common: &crate::common::Args, args: &CheckArgs) -> Result<(), anyhow::Error> {
    tracing::info!(
        "Checking library manifest\ncommon args: {:#?}\nargs: {:#?}",
        common,
        args
    );
    if check_integrity(&args.path_library) {
        tracing::info!("Library {} passed the check", args.path_library.display());
        Ok(())
    } else {
        anyhow::bail!(
            "library {} did not pass the integrity check; were files added, removed, or renamed?",
            args.path_library.display()
        )
    }
}
