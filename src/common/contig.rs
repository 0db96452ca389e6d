//! Contig name harmonization.
//!
//! Reference libraries and annotation inputs do not agree on whether chromosomes carry
//! a `chr` prefix.  Both sides are normalized to the prefix-less name before shard keys
//! are computed or records are compared.

/// Strip a leading `chr` prefix, ignoring case (e.g., `chr1`, `CHR1`, `Chr1` become `1`).
pub fn name_without_chr(name: &str) -> &str {
    match name.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chr") => &name[3..],
        _ => name,
    }
}

/// Coarse classification of a contig by its ploidy behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContigClass {
    /// Chromosomes 1-22 and anything else not listed below.
    Autosomal,
    /// chrX or chrY.
    Gonosomal,
    /// Mitochondrial DNA.
    Mitochondrial,
}

impl ContigClass {
    /// Classify the given (possibly `chr`-prefixed) contig name.
    pub fn from_name(name: &str) -> Self {
        let name = name_without_chr(name);
        if name.eq_ignore_ascii_case("x") || name.eq_ignore_ascii_case("y") {
            ContigClass::Gonosomal
        } else if name.eq_ignore_ascii_case("mt") {
            ContigClass::Mitochondrial
        } else {
            ContigClass::Autosomal
        }
    }

    /// Whether homozygosity frequencies can be interpreted on this contig.
    ///
    /// Hemizygous (chrX/chrY) and mitochondrial calls are not diploid.
    pub fn is_diploid(&self) -> bool {
        matches!(self, ContigClass::Autosomal)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[rstest::rstest]
    #[case("chr1", "1")]
    #[case("CHR1", "1")]
    #[case("Chrx", "x")]
    #[case("1", "1")]
    #[case("ch", "ch")]
    #[case("chr", "")]
    #[case("MT", "MT")]
    fn name_without_chr(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(super::name_without_chr(name), expected);
    }

    #[rstest::rstest]
    #[case("1", ContigClass::Autosomal)]
    #[case("chr22", ContigClass::Autosomal)]
    #[case("X", ContigClass::Gonosomal)]
    #[case("x", ContigClass::Gonosomal)]
    #[case("chrY", ContigClass::Gonosomal)]
    #[case("MT", ContigClass::Mitochondrial)]
    #[case("Mt", ContigClass::Mitochondrial)]
    #[case("mT", ContigClass::Mitochondrial)]
    #[case("chrMT", ContigClass::Mitochondrial)]
    #[case("M", ContigClass::Autosomal)]
    fn contig_class(#[case] name: &str, #[case] expected: ContigClass) {
        assert_eq!(ContigClass::from_name(name), expected);
    }

    #[test]
    fn is_diploid() {
        assert!(ContigClass::Autosomal.is_diploid());
        assert!(!ContigClass::Gonosomal.is_diploid());
        assert!(!ContigClass::Mitochondrial.is_diploid());
    }
}
