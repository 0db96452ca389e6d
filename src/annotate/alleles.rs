//! Reconciliation of observed alleles with a reference record.

use crate::library::record::ReferenceRecord;

/// Split the observed allele column into alleles.
///
/// `/` separates alleles if present, `,` otherwise; double quotes are ignored.
pub fn parse_observed(field: &str) -> Vec<String> {
    let field = field.replace('"', "");
    let separator = if field.contains('/') {
        '/'
    } else if field.contains(',') {
        ','
    } else {
        return vec![field.trim().to_string()];
    };
    field
        .split(separator)
        .map(|allele| allele.trim().to_string())
        .collect()
}

/// Zygosity of the observed alleles relative to the reference base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Zygosity {
    /// The reference allele and one other allele.
    SingleNonReference(String),
    /// The same non-reference allele on both chromosomes.
    HomozygousRare(String),
    /// Two distinct non-reference alleles.
    HeterozygousDoubleAlt(String, String),
    /// More than two alleles were reported.
    ExtraAlleles,
}

impl Zygosity {
    /// Determine the zygosity of `observed` given the row's reference base.
    pub fn classify(observed: &[String], reference: &str) -> Self {
        if let Some(ref_idx) = observed.iter().position(|allele| allele == reference) {
            // Only one copy of the reference base is removed.
            let mut remaining = observed
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != ref_idx)
                .map(|(_, allele)| allele);
            return match (remaining.next(), remaining.next()) {
                (Some(allele), None) => Zygosity::SingleNonReference(allele.clone()),
                // Only the reference base was reported.
                (None, _) => Zygosity::SingleNonReference(reference.to_string()),
                (Some(_), Some(_)) => Zygosity::ExtraAlleles,
            };
        }

        match observed {
            [] => Zygosity::HomozygousRare(String::new()),
            [allele] => Zygosity::HomozygousRare(allele.clone()),
            [first, second, rest @ ..] if first == second => {
                if rest.is_empty() {
                    Zygosity::HomozygousRare(first.clone())
                } else {
                    Zygosity::ExtraAlleles
                }
            }
            [first, second] => Zygosity::HeterozygousDoubleAlt(first.clone(), second.clone()),
            _ => Zygosity::ExtraAlleles,
        }
    }
}

/// Outcome of comparing a row's alleles to its reference record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The alleles can be annotated.
    Annotate(Zygosity),
    /// The reference bases of row and record differ.
    ///
    /// `swapped` is set if all observed alleles are known to the record, i.e., the
    /// reference and alternate alleles are likely swapped between genome builds.
    RefMismatch { swapped: bool },
    /// More than two alleles were reported.
    ExtraAlleles,
}

/// Reconcile the observed alleles and reference base of a row with `record`.
pub fn reconcile(observed: &[String], reference: &str, record: &ReferenceRecord) -> Reconciliation {
    if record.reference != reference {
        let known = |allele: &String| {
            *allele == record.reference || record.alternatives.contains(allele)
        };
        let swapped = observed.contains(&record.reference) && observed.iter().all(known);
        return Reconciliation::RefMismatch { swapped };
    }

    match Zygosity::classify(observed, reference) {
        Zygosity::ExtraAlleles => Reconciliation::ExtraAlleles,
        zygosity => Reconciliation::Annotate(zygosity),
    }
}
