//! Annotation of variant tables with population frequencies.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use thousands::Separable;

use self::alleles::{parse_observed, reconcile, Reconciliation, Zygosity};
use self::emit::{derived_columns, derived_header, output_line, LocusKey, Outcome, Snapshot};
use self::freqs::{AlleleCounts, AlleleStats, AnnotationResult};
use self::header::{looks_like_header, KeyColumns, VCF_LIKE_PREAMBLE_LINES};
use self::resolve::LocusResolver;
use crate::common::contig::{name_without_chr, ContigClass};
use crate::common::io::std::{open_read_maybe_gz, open_write_maybe_gz, read_line_trimmed};
use crate::common::tokenize::Delimiter;
use crate::library::record::{parse_pos, ReferenceRecord};
use crate::library::DEFAULT_LIBRARY_DIR;

pub mod alleles;
pub mod emit;
pub mod freqs;
pub mod header;
pub mod resolve;

/// Suffix appended to the input path to obtain the default output path.
pub const OUTPUT_SUFFIX: &str = ".popfreq.txt";

/// Selection of the input's field delimiter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, clap::ValueEnum,
)]
#[strum(serialize_all = "lowercase")]
pub enum DelimiterChoice {
    /// Tab if the header contains a tab, comma otherwise.
    #[default]
    Auto,
    Tab,
    Comma,
}

impl DelimiterChoice {
    /// Determine the delimiter to use for the table with the given header line.
    pub fn resolve(&self, header: &str) -> Result<Delimiter, anyhow::Error> {
        match self {
            DelimiterChoice::Auto => Delimiter::guess(header).ok_or_else(|| {
                anyhow::anyhow!("header is neither tab- nor comma-delimited: {:?}", header)
            }),
            DelimiterChoice::Tab => Ok(Delimiter::Tab),
            DelimiterChoice::Comma => Ok(Delimiter::Comma),
        }
    }
}

/// Command line arguments for `annotate` sub command.
#[derive(Parser, Debug)]
#[command(about = "Annotate a variant table with population frequencies", long_about = None)]
pub struct Args {
    /// Path to the input TSV or CSV file.
    #[arg(long)]
    pub path_input: PathBuf,
    /// Path to the output file, defaults to the input path with `.popfreq.txt` appended.
    #[arg(long)]
    pub path_output: Option<PathBuf>,
    /// Path to the library directory.
    #[arg(long, default_value = DEFAULT_LIBRARY_DIR)]
    pub path_library: PathBuf,
    /// Field delimiter of the input.
    #[arg(long, value_enum, default_value_t = DelimiterChoice::Auto)]
    pub delimiter: DelimiterChoice,

    /// For debug purposes, maximal number of rows to annotate.
    #[arg(long)]
    pub max_var_count: Option<usize>,
}

/// Configuration of the annotation.
#[derive(Debug, Clone, Default, derive_builder::Builder)]
#[builder(pattern = "immutable")]
pub struct Config {
    /// Field delimiter of the input.
    #[builder(default)]
    pub delimiter: DelimiterChoice,
    /// Stop after this many data rows.
    #[builder(default)]
    pub max_var_count: Option<usize>,
}

/// Counters of an annotation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AnnotateStats {
    /// Data rows written.
    pub rows: usize,
    /// Rows whose columns were derived.
    pub unique_loci: usize,
    /// Rows that reused the derived columns of the previous row.
    pub repeated_rows: usize,
    /// Rows without reference data.
    pub novel: usize,
    /// Rows whose reference base does not match the library.
    pub ref_mismatch: usize,
    /// Rows with reference and alternate alleles swapped.
    pub ref_alt_swapped: usize,
    /// Rows with more than two alleles.
    pub extra_alleles: usize,
    /// Comment lines copied from the data section.
    pub comment_lines: usize,
}

impl AnnotateStats {
    fn count(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Annotated(_) => (),
            Outcome::Novel(_) => self.novel += 1,
            Outcome::RefMismatch => self.ref_mismatch += 1,
            Outcome::RefAltSwapped => self.ref_alt_swapped += 1,
            Outcome::ExtraAlleles => self.extra_alleles += 1,
        }
    }
}

/// Statistics of `allele`, using zero counts if the record does not list it.
fn allele_stats(record: &ReferenceRecord, allele: &str, contig: ContigClass) -> AlleleStats {
    let counts = match record.alt_index(allele) {
        Some(idx) => AlleleCounts::from_info(&record.info, idx),
        None => AlleleCounts::unseen(),
    };
    AlleleStats::compute(&counts, contig)
}

/// Derive the outcome of one row.
fn annotate_row(
    resolver: &mut LocusResolver,
    key: &LocusKey,
    line_no: usize,
) -> Result<Outcome, anyhow::Error> {
    let pos = parse_pos(&key.pos).map_err(|e| anyhow::anyhow!("line {}: {}", line_no, e))?;
    let contig = ContigClass::from_name(&key.chrom);

    let Some(record) = resolver.lookup(&key.chrom, pos)? else {
        tracing::debug!("line {}: no reference data, variant is novel", line_no);
        return Ok(Outcome::Novel(AnnotationResult::novel(contig)));
    };

    let observed = parse_observed(&key.observed);
    let outcome = match reconcile(&observed, &key.reference, &record) {
        Reconciliation::RefMismatch { swapped: true } => {
            tracing::debug!(
                "line {}: reference and alternate alleles swapped with library",
                line_no
            );
            Outcome::RefAltSwapped
        }
        Reconciliation::RefMismatch { swapped: false } => {
            tracing::warn!(
                "line {}: reference base {} does not match library base {}",
                line_no,
                &key.reference,
                &record.reference
            );
            Outcome::RefMismatch
        }
        Reconciliation::ExtraAlleles | Reconciliation::Annotate(Zygosity::ExtraAlleles) => {
            tracing::warn!(
                "line {}: more than two alleles observed ({})",
                line_no,
                &key.observed
            );
            Outcome::ExtraAlleles
        }
        Reconciliation::Annotate(Zygosity::SingleNonReference(allele)) => Outcome::Annotated(
            AnnotationResult::single_non_reference(allele_stats(&record, &allele, contig)),
        ),
        Reconciliation::Annotate(Zygosity::HomozygousRare(allele)) => Outcome::Annotated(
            AnnotationResult::homozygous_rare(allele_stats(&record, &allele, contig)),
        ),
        Reconciliation::Annotate(Zygosity::HeterozygousDoubleAlt(first, second)) => {
            Outcome::Annotated(AnnotationResult::heterozygous_double_alt(
                allele_stats(&record, &first, contig),
                allele_stats(&record, &second, contig),
            ))
        }
    };
    Ok(outcome)
}

/// Copy the preamble and return the header line.
///
/// Writes the descriptions of the derived columns if the preamble is VCF-like.
fn copy_preamble<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    line_no: &mut usize,
) -> Result<String, anyhow::Error> {
    let mut preamble_lines = 0;
    let mut line = String::new();
    loop {
        if !read_line_trimmed(reader, &mut line)? {
            anyhow::bail!("no header line found; need a tab- or comma-delimited line naming chromosome and reference columns");
        }
        *line_no += 1;
        if looks_like_header(&line) {
            break;
        }
        writeln!(writer, "{}", &line)?;
        preamble_lines += 1;
    }

    if preamble_lines >= VCF_LIKE_PREAMBLE_LINES {
        tracing::debug!("input looks VCF-like, writing column descriptions");
        emit::write_descriptions(writer)?;
    }
    Ok(line)
}

/// Annotate the table from `reader` and write the result to `writer`.
pub fn annotate<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    resolver: &mut LocusResolver,
    config: &Config,
) -> Result<AnnotateStats, anyhow::Error> {
    let mut line_no = 0;
    let header = copy_preamble(&mut reader, &mut writer, &mut line_no)?;

    let delimiter = config.delimiter.resolve(&header)?;
    tracing::debug!("using {} as delimiter", delimiter);
    let header_fields = delimiter.split(&header);
    let key_columns = KeyColumns::find(&header_fields)?;
    writeln!(
        writer,
        "{}",
        delimiter.join(header_fields.iter().chain(derived_header().iter()))
    )?;

    let mut stats = AnnotateStats::default();
    let mut snapshot: Option<Snapshot> = None;
    let mut prev = Instant::now();
    let mut line = String::new();
    while read_line_trimmed(&mut reader, &mut line)? {
        line_no += 1;
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            writeln!(writer, "{}", &line)?;
            stats.comment_lines += 1;
            continue;
        }

        let fields = delimiter.split(&line);
        // Derived columns go right after the headed fields, so every headed field must be present.
        let min_fields = header_fields.len().max(key_columns.min_fields());
        if fields.len() < min_fields {
            anyhow::bail!(
                "line {}: expected at least {} fields, found {}",
                line_no,
                min_fields,
                fields.len()
            );
        }
        let key = LocusKey {
            chrom: name_without_chr(&fields[key_columns.chrom]).to_string(),
            pos: fields[key_columns.pos].clone(),
            reference: fields[key_columns.reference].clone(),
            observed: fields[key_columns.observed].clone(),
        };

        let derived = match snapshot.as_ref().and_then(|snapshot| snapshot.reuse(&key)) {
            Some(derived) => {
                stats.repeated_rows += 1;
                derived.to_vec()
            }
            None => {
                let outcome = annotate_row(resolver, &key, line_no)?;
                stats.count(&outcome);
                stats.unique_loci += 1;
                derived_columns(&outcome)
            }
        };
        writeln!(
            writer,
            "{}",
            output_line(delimiter, &fields, header_fields.len(), &derived)
        )?;
        stats.rows += 1;

        if prev.elapsed().as_secs() >= 5 {
            tracing::info!(
                "at {}:{} ({} rows)",
                &key.chrom,
                &key.pos,
                stats.rows.separate_with_commas()
            );
            prev = Instant::now();
        }
        snapshot = Some(Snapshot { key, derived });

        if let Some(max_var_count) = config.max_var_count {
            if stats.rows >= max_var_count {
                tracing::warn!("stopping after {} rows as requested", max_var_count);
                break;
            }
        }
    }
    writer.flush()?;

    Ok(stats)
}

/// The default output path for `path_input`.
pub fn default_output_path(path_input: &Path) -> PathBuf {
    let mut result = path_input.as_os_str().to_owned();
    result.push(OUTPUT_SUFFIX);
    PathBuf::from(result)
}

/// Main entry point for `annotate` sub command.
pub fn run(common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!(
        "Annotating variant table\ncommon args: {:#?}\nargs: {:#?}",
        common,
        args
    );

    let path_output = args
        .path_output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.path_input));
    if path_output.exists() {
        anyhow::bail!(
            "output file {} already exists; please move, delete, or rename it",
            path_output.display()
        );
    }

    let config = ConfigBuilder::default()
        .delimiter(args.delimiter)
        .max_var_count(args.max_var_count)
        .build()?;
    let mut resolver = LocusResolver::open(&args.path_library)?;

    let start = Instant::now();
    let reader = open_read_maybe_gz(&args.path_input).map_err(|e| {
        anyhow::anyhow!("could not open input {}: {}", args.path_input.display(), e)
    })?;
    let writer = open_write_maybe_gz(&path_output).map_err(|e| {
        anyhow::anyhow!("could not create output {}: {}", path_output.display(), e)
    })?;
    let stats = annotate(reader, writer, &mut resolver, &config)?;

    tracing::info!(
        "Annotated {} unique loci and {} duplicated lines in {:?}",
        stats.unique_loci.separate_with_commas(),
        stats.repeated_rows.separate_with_commas(),
        start.elapsed()
    );
    tracing::info!(
        "... novel: {}, mismatched reference: {}, swapped alleles: {}, too many alleles: {}",
        stats.novel.separate_with_commas(),
        stats.ref_mismatch.separate_with_commas(),
        stats.ref_alt_swapped.separate_with_commas(),
        stats.extra_alleles.separate_with_commas()
    );
    tracing::debug!("... loaded {} shards", resolver.shard_loads());
    crate::common::trace_rss_now();

    tracing::info!("Output written to {}", path_output.display());
    Ok(())
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;
    use temp_testdir::TempDir;

    use super::*;
    use crate::library::build::build_library;

    const INPUT_TSV: &str = "tests/data/annotate/variants.tsv";

    fn make_library(tmp_dir: &TempDir) -> Result<PathBuf, anyhow::Error> {
        let library = tmp_dir.join("subvcfs");
        build_library(
            open_read_maybe_gz("tests/data/library/reference.vcf")?,
            &library,
        )?;
        Ok(library)
    }

    fn annotate_str(
        library: &Path,
        input: &str,
        config: &Config,
    ) -> Result<(AnnotateStats, String), anyhow::Error> {
        let mut resolver = LocusResolver::open(library)?;
        let mut output = Vec::new();
        let stats = annotate(Cursor::new(input), &mut output, &mut resolver, config)?;
        Ok((stats, String::from_utf8(output)?))
    }

    /// The derived columns of an output line of the variants fixture.
    fn derived(line: &str) -> Vec<&str> {
        line.split('\t').skip(6).take(34).collect()
    }

    #[test]
    fn annotate_tsv() -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let library = make_library(&tmp_dir)?;
        let input = std::fs::read_to_string(INPUT_TSV)?;

        let (stats, output) = annotate_str(&library, &input, &Config::default())?;

        assert_eq!(
            stats,
            AnnotateStats {
                rows: 11,
                unique_loci: 10,
                repeated_rows: 1,
                novel: 1,
                ref_mismatch: 1,
                ref_alt_swapped: 1,
                extra_alleles: 1,
                comment_lines: 1,
            }
        );

        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0], "# variants of sample S1");
        assert!(lines[1].starts_with("chromosome\tposition\treferenceBase\tsampleAlleles\t"));
        assert!(lines[1].ends_with("\tfunctionGVS\tA1_AF_AFR\tA1_AF_AMR\tA1_AF_EAS\tA1_AF_FIN\tA1_AF_NFE\tA1_AF_SAS\tA1_AF_OTH\tA1_AF_max\tA1_HOMOF_AFR\tA1_HOMOF_AMR\tA1_HOMOF_EAS\tA1_HOMOF_FIN\tA1_HOMOF_NFE\tA1_HOMOF_SAS\tA1_HOMOF_OTH\tA1_HOMOF_max\tA2_AF_AFR\tA2_AF_AMR\tA2_AF_EAS\tA2_AF_FIN\tA2_AF_NFE\tA2_AF_SAS\tA2_AF_OTH\tA2_AF_max\tA2_HOMOF_AFR\tA2_HOMOF_AMR\tA2_HOMOF_EAS\tA2_HOMOF_FIN\tA2_HOMOF_NFE\tA2_HOMOF_SAS\tA2_HOMOF_OTH\tA2_HOMOF_max\tF_rarest_allele\tCombo_max"));
        assert_eq!(lines[3], "# second transcript");

        Ok(())
    }

    #[test]
    fn annotate_tsv_values() -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let library = make_library(&tmp_dir)?;
        let input = std::fs::read_to_string(INPUT_TSV)?;

        let (_, output) = annotate_str(&library, &input, &Config::default())?;
        let lines = output.lines().collect::<Vec<_>>();

        // heterozygous T/G
        let het = derived(lines[2]);
        insta::assert_snapshot!(het[..33].join(" "), @"0.05 0 0.05 NA 0.05 0 0 0.05 0.02 0 0 NA 0.02 0 0 0.02 0.02 0 0 NA 0.005 0 0 0.02 0 0 0 NA 0 0 0 0 0.02");
        assert_eq!(het[33], (0.05f64 * 0.02).to_string());
        assert!(lines[2].starts_with("chr1\t1000000\tA\tT/G\tNM_000001.1\tmissense\t"));

        // repeated row keeps its own pass-through columns
        assert!(lines[4].starts_with("1\t1000000\tA\tT/G\tNM_000002.1\tintron\t"));
        assert_eq!(derived(lines[4]), het);

        // single non-reference A/T
        let single = derived(lines[5]);
        assert_eq!(&single[..8], &het[..8]);
        assert!(single[16..32].iter().all(|value| *value == "NA"));
        assert_eq!(single[32], "0.05");
        assert_eq!(single[33], "NA");

        // homozygous rare T/T
        let hom = derived(lines[6]);
        assert_eq!(hom[32], "0.05");
        assert_eq!(hom[33], (0.05f64 * 0.05).to_string());

        // novel
        let novel = derived(lines[7]);
        assert!(novel[..16].iter().all(|value| *value == "0"));
        assert!(novel[16..32].iter().all(|value| *value == "NA"));
        assert_eq!(novel[32], "0");
        assert_eq!(novel[33], "2.3668639053254434e-10");

        // fill texts
        assert!(derived(lines[8])
            .iter()
            .all(|value| *value == "Mismatched reference"));
        assert!(derived(lines[9])
            .iter()
            .all(|value| *value == "Swapped reference and alternate alleles (likely common)."));
        assert!(derived(lines[10])
            .iter()
            .all(|value| *value == "Too many observed alleles"));

        // chrX: no homozygote frequencies
        let x = derived(lines[11]);
        assert_eq!(x[0], "0.05");
        assert!(x[8..15].iter().all(|value| *value == "NA"));
        assert_eq!(x[15], "0");

        // MT
        let mt = derived(lines[12]);
        assert_eq!(mt[7], "0.02");
        assert!(mt[8..15].iter().all(|value| *value == "NA"));

        // no coverage, trailing unheaded column
        let fields = lines[13].split('\t').collect::<Vec<_>>();
        assert_eq!(fields.len(), 6 + 34 + 1);
        assert!(fields[6..13].iter().all(|value| *value == "NA"));
        assert_eq!(fields[13], "0");
        assert_eq!(fields[38], "0");
        assert_eq!(fields[39], "NA");
        assert_eq!(fields[40], "unheaded");

        Ok(())
    }

    #[test]
    fn annotate_csv() -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let library = make_library(&tmp_dir)?;
        let input = "Chr,Start,End,Ref,Alt,Gene\n\
                     1,1050000,1050000,G,G/A,\"GENE1,GENE2\"\n";

        let (stats, output) = annotate_str(&library, input, &Config::default())?;

        assert_eq!(stats.unique_loci, 1);
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Chr,Start,End,Ref,Alt,Gene,A1_AF_AFR,"));
        insta::assert_snapshot!(lines[1], @r#"1,1050000,1050000,G,G/A,"GENE1,GENE2",0.3,0,0,0,0,0,0,0.3,0.1,0,0,0,0,0,0,0.1,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,NA,0.3,NA"#);

        Ok(())
    }

    #[test]
    fn annotate_vcf_like_preamble() -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let library = make_library(&tmp_dir)?;
        let mut input = String::new();
        for i in 0..VCF_LIKE_PREAMBLE_LINES {
            input.push_str(&format!("##meta{}=value\n", i));
        }
        input.push_str("#CHROM\tPOS\tID\tREF\tALT\n1\t1099999\t.\tT\tC\n");

        let (_, output) = annotate_str(&library, &input, &Config::default())?;

        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 10 + 30 + 2);
        assert_eq!(lines[9], "##meta9=value");
        assert!(lines[10].starts_with("## A1_AF_AFR\t: "));
        assert!(lines[39].starts_with("## Combo_max\t: "));
        assert!(lines[40].starts_with("#CHROM\tPOS\tID\tREF\tALT\tA1_AF_AFR"));
        assert!(lines[41].starts_with("1\t1099999\t.\tT\tC\t0.01\t"));

        Ok(())
    }

    #[test]
    fn annotate_short_preamble_has_no_descriptions() -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let library = make_library(&tmp_dir)?;
        let input = "##fileformat=VCFv4.1\n#CHROM\tPOS\tID\tREF\tALT\n1\t1099999\t.\tT\tC\n";

        let (_, output) = annotate_str(&library, input, &Config::default())?;

        assert_eq!(output.lines().count(), 3);
        assert!(!output.contains("## A1_AF_AFR"));

        Ok(())
    }

    #[test]
    fn annotate_max_var_count() -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let library = make_library(&tmp_dir)?;
        let input = std::fs::read_to_string(INPUT_TSV)?;
        let config = ConfigBuilder::default().max_var_count(Some(3)).build()?;

        let (stats, _) = annotate_str(&library, &input, &config)?;

        assert_eq!(stats.rows, 3);

        Ok(())
    }

    #[rstest::rstest]
    #[case::no_header("just some text\nmore text\n")]
    #[case::missing_observed("chr\tpos\tref\tgenotype\n1\t1\tA\tA/T\n")]
    #[case::short_row("chr\tpos\tref\talt\n1\t1000000\tA\n")]
    #[case::row_shorter_than_header("chr\tpos\tref\talt\tgene\tnote\n1\t1099999\tT\tC\n")]
    #[case::bad_position("chr\tpos\tref\talt\n1\tfirst\tA\tT\n")]
    fn annotate_fails(#[case] input: &str) -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let library = make_library(&tmp_dir)?;

        assert!(annotate_str(&library, input, &Config::default()).is_err());

        Ok(())
    }

    #[test]
    fn annotate_row_shorter_than_header() -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let library = make_library(&tmp_dir)?;
        let input = "chr\tpos\tref\talt\tgene\tnote\n\
                     1\t1099999\tT\tC\tGENE1\tx\n\
                     1\t1099999\tT\tC\n";

        let err = annotate_str(&library, input, &Config::default())
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default();

        assert_eq!(err, "line 3: expected at least 6 fields, found 4");

        Ok(())
    }

    #[test]
    fn annotate_forced_delimiter()-> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let library = make_library(&tmp_dir)?;
        let input = "chr\tpos\tref\talt\n1\t1099999\tT\tC\n";
        let config = ConfigBuilder::default()
            .delimiter(DelimiterChoice::Comma)
            .build()?;

        assert!(annotate_str(&library, input, &config).is_err());

        Ok(())
    }

    #[rstest::rstest]
    #[case(DelimiterChoice::Auto, "a\tb", Delimiter::Tab)]
    #[case(DelimiterChoice::Auto, "a,b", Delimiter::Comma)]
    #[case(DelimiterChoice::Tab, "a,b", Delimiter::Tab)]
    #[case(DelimiterChoice::Comma, "a\tb", Delimiter::Comma)]
    fn delimiter_choice(
        #[case] choice: DelimiterChoice,
        #[case] header: &str,
        #[case] expected: Delimiter,
    ) -> Result<(), anyhow::Error> {
        assert_eq!(choice.resolve(header)?, expected);
        Ok(())
    }

    #[test]
    fn delimiter_choice_auto_fails() {
        assert!(DelimiterChoice::Auto.resolve("a b").is_err());
    }

    #[test]
    fn default_output_path() {
        assert_eq!(
            super::default_output_path(Path::new("data/variants.tsv")),
            PathBuf::from("data/variants.tsv.popfreq.txt")
        );
    }

    #[test]
    fn run_smoke() -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let library = make_library(&tmp_dir)?;
        let path_output = tmp_dir.join("variants.tsv.popfreq.txt");
        let args = Args {
            path_input: PathBuf::from(INPUT_TSV),
            path_output: Some(path_output.clone()),
            path_library: library,
            delimiter: DelimiterChoice::Auto,
            max_var_count: None,
        };

        run(&crate::common::Args::default(), &args)?;

        let output = std::fs::read_to_string(&path_output)?;
        assert_eq!(output.lines().count(), 14);

        // a second run must not overwrite the output
        assert!(run(&crate::common::Args::default(), &args).is_err());

        Ok(())
    }

    #[test]
    fn run_tampered_library() -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let library = make_library(&tmp_dir)?;
        std::fs::write(library.join("extra.subvcf"), "")?;
        let path_output = tmp_dir.join("out.txt");
        let args = Args {
            path_input: PathBuf::from(INPUT_TSV),
            path_output: Some(path_output.clone()),
            path_library: library,
            delimiter: DelimiterChoice::Auto,
            max_var_count: None,
        };

        assert!(run(&crate::common::Args::default(), &args).is_err());
        assert!(!path_output.exists());

        Ok(())
    }
}
