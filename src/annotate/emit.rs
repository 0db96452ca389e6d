//! Rendering of the derived output columns.

use std::io::Write;

use itertools::iproduct;
use strum::IntoEnumIterator;

use super::freqs::{AlleleStats, AnnotationResult, Population, Statistic, Value};
use crate::common::tokenize::Delimiter;

/// Name of the rarest allele summary column.
pub const RAREST_ALLELE_COLUMN: &str = "F_rarest_allele";

/// Name of the combined frequency summary column.
pub const COMBINED_COLUMN: &str = "Combo_max";

/// Label of the maximum column in each statistic block.
const MAX_LABEL: &str = "max";

/// Number of alleles that output columns are reserved for.
const ALLELE_SLOTS: usize = 2;

/// The per-row result of the annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Frequencies derived from a matching reference record.
    Annotated(AnnotationResult),
    /// No reference record at the locus.
    Novel(AnnotationResult),
    /// The reference bases of row and library differ.
    RefMismatch,
    /// Reference and alternate alleles appear to be swapped between row and library.
    RefAltSwapped,
    /// More than two alleles were reported.
    ExtraAlleles,
}

impl Outcome {
    /// The text filled into all derived columns if no values were derived.
    pub fn fill_text(&self) -> Option<&'static str> {
        match self {
            Outcome::Annotated(_) | Outcome::Novel(_) => None,
            Outcome::RefMismatch => Some("Mismatched reference"),
            Outcome::RefAltSwapped => {
                Some("Swapped reference and alternate alleles (likely common).")
            }
            Outcome::ExtraAlleles => Some("Too many observed alleles"),
        }
    }
}

/// Names of the derived columns, in output order.
pub fn derived_header() -> Vec<String> {
    let mut result = iproduct!(1..=ALLELE_SLOTS, Statistic::iter())
        .flat_map(|(allele, statistic)| {
            Population::iter()
                .map(|population| population.to_string())
                .chain(std::iter::once(MAX_LABEL.to_string()))
                .map(move |group| format!("A{}_{}_{}", allele, statistic, group))
        })
        .collect::<Vec<_>>();
    result.push(RAREST_ALLELE_COLUMN.to_string());
    result.push(COMBINED_COLUMN.to_string());
    result
}

/// Number of derived columns.
pub fn derived_column_count() -> usize {
    ALLELE_SLOTS * 2 * (Population::iter().count() + 1) + 2
}

/// Write `##` lines describing the derived columns, as used in VCF-like preambles.
pub fn write_descriptions<W: Write + ?Sized>(writer: &mut W) -> Result<(), anyhow::Error> {
    for (allele, statistic, population) in
        iproduct!(1..=ALLELE_SLOTS, Statistic::iter(), Population::iter())
    {
        writeln!(
            writer,
            "## A{}_{}_{}\t: Allele{} {} in {} from popfreq",
            allele,
            statistic,
            population,
            allele,
            statistic.description(),
            population.description()
        )?;
    }
    writeln!(
        writer,
        "## {}\t: Highest population frequency of the rarest allele observed at locus from popfreq",
        RAREST_ALLELE_COLUMN
    )?;
    writeln!(
        writer,
        "## {}\t: Maximum expected frequency of the allele combination from popfreq",
        COMBINED_COLUMN
    )?;
    Ok(())
}

/// Push the columns of one allele's statistics, or placeholders if not assessed.
fn push_allele(columns: &mut Vec<String>, allele: Option<&AlleleStats>) {
    for statistic in Statistic::iter() {
        match allele.map(|allele| allele.block(statistic)) {
            Some(block) => {
                columns.extend(block.values.iter().map(Value::to_string));
                columns.push(Value::Applicable(block.max).to_string());
            }
            None => columns.extend(
                std::iter::repeat(Value::NotApplicable.to_string())
                    .take(Population::iter().count() + 1),
            ),
        }
    }
}

/// Render the derived columns of the given outcome.
pub fn derived_columns(outcome: &Outcome) -> Vec<String> {
    let result = match outcome {
        Outcome::Annotated(result) | Outcome::Novel(result) => result,
        _ => {
            let fill = outcome.fill_text().unwrap_or_default();
            return vec![fill.to_string(); derived_column_count()];
        }
    };

    let mut columns = Vec::with_capacity(derived_column_count());
    for allele in &result.alleles {
        push_allele(&mut columns, allele.as_ref());
    }
    columns.push(Value::Applicable(result.rarest_allele).to_string());
    columns.push(result.combined.to_string());
    columns
}

/// The fields that identify a row for the purpose of memoization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocusKey {
    /// Chromosome without `chr` prefix.
    pub chrom: String,
    /// The position column as given.
    pub pos: String,
    /// The reference column as given.
    pub reference: String,
    /// The observed allele column as given.
    pub observed: String,
}

/// The derived columns of the previous row, reused for identical consecutive rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub key: LocusKey,
    pub derived: Vec<String>,
}

impl Snapshot {
    /// Return the memoized columns if `key` equals the snapshot's key.
    pub fn reuse(&self, key: &LocusKey) -> Option<&[String]> {
        (self.key == *key).then_some(self.derived.as_slice())
    }
}

/// Assemble an output line from the row's fields and the derived columns.
///
/// Fields beyond `header_len` have no header and are placed after the derived columns.
pub fn output_line(
    delimiter: Delimiter,
    fields: &[String],
    header_len: usize,
    derived: &[String],
) -> String {
    let split = header_len.min(fields.len());
    let (headed, trailing) = fields.split_at(split);
    delimiter.join(headed.iter().chain(derived).chain(trailing))
}
