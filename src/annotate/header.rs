//! Detection of the table header and its key columns.

/// Number of preamble lines from which on an input is considered VCF-like.
pub const VCF_LIKE_PREAMBLE_LINES: usize = 10;

/// Whether `line` looks like the header of a variant table.
///
/// A header is not a `##` line, contains a tab or comma, and mentions "chr" and "ref" in any
/// capitalization.
pub fn looks_like_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    !line.starts_with("##")
        && (line.contains('\t') || line.contains(','))
        && lower.contains("chr")
        && lower.contains("ref")
}

/// The roles of the key columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum KeyRole {
    Chromosome,
    Position,
    Reference,
    Observed,
}

impl KeyRole {
    /// Accepted (normalized) column names for this role.
    fn names(&self) -> &'static [&'static str] {
        match self {
            KeyRole::Chromosome => &["chr", "chromosome", "chrom"],
            KeyRole::Position => &["start", "position", "pos"],
            KeyRole::Reference => &["ref", "referencebase", "reference"],
            KeyRole::Observed => &["obs", "samplealleles", "alt", "alternate"],
        }
    }
}

/// Normalize a header name by removing surrounding non-word characters and lowercasing.
fn normalize(name: &str) -> String {
    name.trim_matches(|c: char| !(c.is_alphanumeric() || c == '_'))
        .to_lowercase()
}

/// Indices of the key columns in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyColumns {
    pub chrom: usize,
    pub pos: usize,
    pub reference: usize,
    pub observed: usize,
}

impl KeyColumns {
    /// Locate the key columns in `header`.
    ///
    /// The first matching column is used for each role and no column serves two roles.
    pub fn find(header: &[String]) -> Result<Self, anyhow::Error> {
        let normalized = header.iter().map(|name| normalize(name)).collect::<Vec<_>>();
        let mut taken = vec![false; header.len()];
        let mut locate = |role: KeyRole| -> Result<usize, anyhow::Error> {
            let idx = normalized
                .iter()
                .enumerate()
                .position(|(idx, name)| !taken[idx] && role.names().contains(&name.as_str()))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "unable to find the {} column in header (accepted names: {})",
                        role,
                        role.names().join(", ")
                    )
                })?;
            taken[idx] = true;
            Ok(idx)
        };

        Ok(Self {
            chrom: locate(KeyRole::Chromosome)?,
            pos: locate(KeyRole::Position)?,
            reference: locate(KeyRole::Reference)?,
            observed: locate(KeyRole::Observed)?,
        })
    }

    /// The smallest number of fields a row needs to contain all key columns.
    pub fn min_fields(&self) -> usize {
        1 + self.chrom.max(self.pos).max(self.reference).max(self.observed)
    }
}
