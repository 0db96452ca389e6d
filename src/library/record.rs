//! Reference records as stored in the shards.

/// Index of the INFO column in a reference line.
const INFO_COLUMN: usize = 7;

/// One record from the reference data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    /// Chromosome name as written in the reference.
    pub chrom: String,
    /// 1-based position.
    pub pos: u64,
    /// Reference allele.
    pub reference: String,
    /// Alternate alleles, in the order of the per-allele INFO values.
    pub alternatives: Vec<String>,
    /// The raw `key=value;...` INFO column.
    pub info: String,
}

impl ReferenceRecord {
    /// Parse a tab-separated reference line.
    pub fn from_line(line: &str) -> Result<Self, anyhow::Error> {
        let fields = line.split('\t').collect::<Vec<_>>();
        if fields.len() <= INFO_COLUMN {
            anyhow::bail!(
                "reference line has {} columns, need at least {}: {:?}",
                fields.len(),
                INFO_COLUMN + 1,
                line
            );
        }
        let pos = parse_pos(fields[1])?;

        Ok(Self {
            chrom: fields[0].to_string(),
            pos,
            reference: fields[3].to_string(),
            alternatives: fields[4].split(',').map(str::to_string).collect(),
            info: fields[INFO_COLUMN].to_string(),
        })
    }

    /// Index of `allele` among the alternate alleles, if any.
    pub fn alt_index(&self, allele: &str) -> Option<usize> {
        self.alternatives.iter().position(|alt| alt == allele)
    }
}

/// Parse a 1-based position column.
pub fn parse_pos(value: &str) -> Result<u64, anyhow::Error> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| anyhow::anyhow!("invalid position {:?}: {}", value, e))
}

/// Return chromosome and position column of a tab-separated line without a full parse.
pub fn split_locus(line: &str) -> Option<(&str, &str)> {
    let mut it = line.splitn(3, '\t');
    Some((it.next()?, it.next()?))
}
