//! Derivation of population frequencies from reference INFO columns.
//!
//! The reference INFO column carries `AC_<POP>`, `AN_<POP>`, and `Hom_<POP>` entries for each
//! population.  `AN` is shared by all alternate alleles of a locus, `AC` and `Hom` carry one
//! comma-separated value per alternate allele.  From these, allele frequency (`AF = AC / AN`)
//! and homozygote frequency (`HOMOF = Hom / (AN / 2)`) are derived per population, together
//! with the maximum across populations.

use std::str::FromStr;

use strum::{EnumCount, IntoEnumIterator};

use crate::common::contig::ContigClass;

/// Frequency floor approximating one allele in a panel of 65,000 chromosomes.
pub const PANEL_FLOOR: f64 = 1.0 / 65_000.0;

/// Number of populations.
pub const POPULATION_COUNT: usize = Population::COUNT;

/// Continental populations of the reference panel, in output order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Population {
    Afr,
    Amr,
    Eas,
    Fin,
    Nfe,
    Sas,
    Oth,
}

impl Population {
    /// Human-readable name of the population.
    pub fn description(&self) -> &'static str {
        match self {
            Population::Afr => "African/African American",
            Population::Amr => "American",
            Population::Eas => "East Asian",
            Population::Fin => "Finnish",
            Population::Nfe => "Non-Finnish European",
            Population::Sas => "South Asian",
            Population::Oth => "Other",
        }
    }
}

/// The count types read from the INFO column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
enum CountKind {
    #[strum(serialize = "AC")]
    AlleleCount,
    #[strum(serialize = "AN")]
    AlleleNumber,
    #[strum(serialize = "Hom")]
    Homozygotes,
}

/// The statistics derived for each allele.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum Statistic {
    #[strum(to_string = "AF")]
    AlleleFrequency,
    #[strum(to_string = "HOMOF")]
    HomozygoteFrequency,
}

impl Statistic {
    /// Human-readable name of the statistic.
    pub fn description(&self) -> &'static str {
        match self {
            Statistic::AlleleFrequency => "Allele frequency (Allele observed/chromosomes counted)",
            Statistic::HomozygoteFrequency => {
                "Homozygote Frequency (Homozygotes observed/[chromosomes counted/2])"
            }
        }
    }
}

/// Non-zero values smaller than this are written in exponent notation.
const EXPONENT_BELOW: f64 = 1e-4;

/// A derived value that may not be applicable, e.g., for lack of coverage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Applicable(f64),
    NotApplicable,
}

impl Value {
    /// The numeric value, if applicable.
    pub fn applicable(&self) -> Option<f64> {
        match self {
            Value::Applicable(value) => Some(*value),
            Value::NotApplicable => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Applicable(value) if *value != 0.0 && value.abs() < EXPONENT_BELOW => {
                write!(f, "{:e}", value)
            }
            Value::Applicable(value) => write!(f, "{}", value),
            Value::NotApplicable => write!(f, "NA"),
        }
    }
}

/// Per-population counts of one allele.
///
/// `None` marks entries that are missing from the INFO column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlleleCounts {
    /// Alternate allele counts.
    pub ac: [Option<u64>; POPULATION_COUNT],
    /// Total number of called chromosomes.
    pub an: [Option<u64>; POPULATION_COUNT],
    /// Number of homozygous carriers.
    pub hom: [Option<u64>; POPULATION_COUNT],
}

impl AlleleCounts {
    /// Counts for an allele the reference has never seen.
    ///
    /// `AN` is set to 1 so that the frequencies come out as 0 rather than not applicable.
    pub fn unseen() -> Self {
        Self {
            ac: [Some(0); POPULATION_COUNT],
            an: [Some(1); POPULATION_COUNT],
            hom: [Some(0); POPULATION_COUNT],
        }
    }

    /// Extract the counts of the alternate allele with index `alt_index` from `info`.
    pub fn from_info(info: &str, alt_index: usize) -> Self {
        let mut result = Self {
            ac: [None; POPULATION_COUNT],
            an: [None; POPULATION_COUNT],
            hom: [None; POPULATION_COUNT],
        };

        for entry in info.split(';') {
            let Some((key, value)) = entry.split_once('=') else {
                continue;
            };
            let Some((kind, population)) = key.split_once('_') else {
                continue;
            };
            let (Ok(kind), Ok(population)) =
                (CountKind::from_str(kind), Population::from_str(population))
            else {
                continue;
            };

            let idx = population as usize;
            match kind {
                CountKind::AlleleNumber => result.an[idx] = value.trim().parse().ok(),
                CountKind::AlleleCount => result.ac[idx] = nth_count(value, alt_index),
                CountKind::Homozygotes => result.hom[idx] = nth_count(value, alt_index),
            }
        }

        result
    }
}

/// Pick the per-allele count at `idx` from a comma-separated list.
fn nth_count(value: &str, idx: usize) -> Option<u64> {
    value.split(',').nth(idx).and_then(|v| v.trim().parse().ok())
}

/// Compute `count / (an / divisor)` with the policy for missing and zero coverage.
///
/// Missing counts mean the allele was not seen, giving 0.  Zero coverage gives not applicable.
fn ratio(count: Option<u64>, an: Option<u64>, divisor: f64) -> Value {
    match (count, an) {
        (Some(_), Some(0)) => Value::NotApplicable,
        (Some(count), Some(an)) => Value::Applicable(count as f64 / (an as f64 / divisor)),
        _ => Value::Applicable(0.0),
    }
}

/// One statistic of one allele across all populations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatBlock {
    /// The value for each population, indexed by `Population as usize`.
    pub values: [Value; POPULATION_COUNT],
    /// Maximum of the applicable values, 0 if there is none.
    pub max: f64,
}

impl StatBlock {
    /// Construct from per-population values, computing the maximum.
    pub fn new(values: [Value; POPULATION_COUNT]) -> Self {
        let max = values
            .iter()
            .filter_map(Value::applicable)
            .fold(0.0, f64::max);
        Self { values, max }
    }

    /// Value for the given population.
    pub fn get(&self, population: Population) -> Value {
        self.values[population as usize]
    }
}

/// Derived statistics of one observed allele.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlleleStats {
    pub af: StatBlock,
    pub homof: StatBlock,
}

impl AlleleStats {
    /// Derive statistics from the allele's counts.
    ///
    /// Homozygote frequencies are not applicable on gonosomes and mitochondrial DNA.
    pub fn compute(counts: &AlleleCounts, contig: ContigClass) -> Self {
        let mut af = [Value::NotApplicable; POPULATION_COUNT];
        let mut homof = [Value::NotApplicable; POPULATION_COUNT];
        for population in Population::iter() {
            let idx = population as usize;
            af[idx] = ratio(counts.ac[idx], counts.an[idx], 1.0);
            if contig.is_diploid() {
                homof[idx] = ratio(counts.hom[idx], counts.an[idx], 2.0);
            }
        }
        Self {
            af: StatBlock::new(af),
            homof: StatBlock::new(homof),
        }
    }

    /// Access the block of the given statistic.
    pub fn block(&self, statistic: Statistic) -> &StatBlock {
        match statistic {
            Statistic::AlleleFrequency => &self.af,
            Statistic::HomozygoteFrequency => &self.homof,
        }
    }
}

/// Result of annotating one locus with up to two assessed alleles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationResult {
    /// Statistics of the first and, if assessed, the second allele.
    pub alleles: [Option<AlleleStats>; 2],
    /// Highest population frequency of the rarest assessed allele.
    pub rarest_allele: f64,
    /// Expected frequency of the observed allele combination.
    pub combined: Value,
}

/// Replace a zero maximum frequency by the panel floor.
fn floored(max: f64) -> f64 {
    if max == 0.0 {
        PANEL_FLOOR
    } else {
        max
    }
}

impl AnnotationResult {
    /// One reference and one alternate allele; no combined estimate.
    pub fn single_non_reference(allele: AlleleStats) -> Self {
        Self {
            alleles: [Some(allele), None],
            rarest_allele: allele.af.max,
            combined: Value::NotApplicable,
        }
    }

    /// Homozygous for one alternate allele.
    pub fn homozygous_rare(allele: AlleleStats) -> Self {
        let rarest_allele = allele.af.max;
        let combined = if rarest_allele > 0.0 {
            rarest_allele * rarest_allele
        } else {
            PANEL_FLOOR * PANEL_FLOOR
        };
        Self {
            alleles: [Some(allele), None],
            rarest_allele,
            combined: Value::Applicable(combined),
        }
    }

    /// Two distinct alternate alleles.
    pub fn heterozygous_double_alt(first: AlleleStats, second: AlleleStats) -> Self {
        Self {
            alleles: [Some(first), Some(second)],
            rarest_allele: first.af.max.min(second.af.max),
            combined: Value::Applicable(floored(first.af.max) * floored(second.af.max)),
        }
    }

    /// A locus without any reference data, treated as a never-seen homozygous allele.
    pub fn novel(contig: ContigClass) -> Self {
        Self::homozygous_rare(AlleleStats::compute(&AlleleCounts::unseen(), contig))
    }
}
