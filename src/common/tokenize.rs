//! Splitting of delimited table rows.
//!
//! Tab-separated rows are split verbatim.  Comma-separated rows may wrap fields in double
//! quotes so that they can embed commas, e.g., `1,"c.123A>G,p.K41E",A`.
//!
//! Known limitation: quoting is not validated.  A field with an odd number of quote characters
//! absorbs all following pieces of the row.

/// The field delimiter of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Delimiter {
    #[strum(to_string = "tab")]
    Tab,
    #[strum(to_string = "comma")]
    Comma,
}

impl Delimiter {
    /// The delimiter character.
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Tab => '\t',
            Delimiter::Comma => ',',
        }
    }

    /// Guess the delimiter from a header line, preferring tabs.
    pub fn guess(header: &str) -> Option<Self> {
        if header.contains('\t') {
            Some(Delimiter::Tab)
        } else if header.contains(',') {
            Some(Delimiter::Comma)
        } else {
            None
        }
    }

    /// Split `line` into its fields.
    pub fn split(&self, line: &str) -> Vec<String> {
        match self {
            Delimiter::Tab => line.split('\t').map(str::to_string).collect(),
            Delimiter::Comma => quoted_split(line, ','),
        }
    }

    /// Render one field, quoting it if it contains the delimiter.
    pub fn quote<'a>(&self, field: &'a str) -> std::borrow::Cow<'a, str> {
        if field.contains(self.as_char()) {
            std::borrow::Cow::Owned(format!("\"{}\"", field))
        } else {
            std::borrow::Cow::Borrowed(field)
        }
    }

    /// Join fields into a line, quoting as necessary.
    pub fn join<I, S>(&self, fields: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = String::new();
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                result.push(self.as_char());
            }
            result.push_str(&self.quote(field.as_ref()));
        }
        result
    }
}

/// Whether the cell opened a quote that has not been closed yet.
fn is_open(cell: &str) -> bool {
    cell.len() >= 2 && cell.starts_with('"') && !cell.ends_with('"')
}

/// Split on `delimiter`, keeping quoted delimiters as data and stripping the quotes.
pub fn quoted_split(line: &str, delimiter: char) -> Vec<String> {
    let mut cells: Vec<String> = Vec::new();
    for piece in line.split(delimiter) {
        match cells.last_mut() {
            Some(cell) if is_open(cell) => {
                cell.push(delimiter);
                cell.push_str(piece);
            }
            _ => cells.push(piece.to_string()),
        }
    }

    cells
        .into_iter()
        .map(|cell| cell.trim_matches('"').to_string())
        .collect()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[rstest::rstest]
    #[case("a,b,c", vec!["a", "b", "c"])]
    #[case("\"a,b\",c", vec!["a,b", "c"])]
    #[case("x,\"a,b,c\",y", vec!["x", "a,b,c", "y"])]
    #[case("x,\"a,b,c\"", vec!["x", "a,b,c"])]
    #[case("\"x\",\"y\"", vec!["x", "y"])]
    #[case("a,,b", vec!["a", "", "b"])]
    #[case("\"\",a", vec!["", "a"])]
    #[case("\",a", vec!["", "a"])]
    #[case("", vec![""])]
    fn quoted_split(#[case] line: &str, #[case] expected: Vec<&str>) {
        assert_eq!(super::quoted_split(line, ','), expected);
    }

    #[test]
    fn quoted_split_unclosed_absorbs_rest() {
        assert_eq!(
            super::quoted_split("a,\"b,c,d", ','),
            vec!["a", "b,c,d"]
        );
    }

    #[test]
    fn split_tab_ignores_quotes() {
        assert_eq!(
            Delimiter::Tab.split("\"a\tb\"\tc"),
            vec!["\"a", "b\"", "c"]
        );
    }

    #[rstest::rstest]
    #[case("a\tb,c", Some(Delimiter::Tab))]
    #[case("a,b", Some(Delimiter::Comma))]
    #[case("a b", None)]
    fn guess(#[case] header: &str, #[case] expected: Option<Delimiter>) {
        assert_eq!(Delimiter::guess(header), expected);
    }

    #[test]
    fn join_quotes_embedded_delimiter() {
        assert_eq!(
            Delimiter::Comma.join(["1", "c.1A>G,p.K1E", "x\ty"]),
            "1,\"c.1A>G,p.K1E\",x\ty"
        );
        assert_eq!(
            Delimiter::Tab.join(["1", "a,b", "x\ty"]),
            "1\ta,b\t\"x\ty\""
        );
    }

    #[test]
    fn split_join_comma() {
        let line = "chr1,\"NM_1,NM_2\",A";
        let fields = Delimiter::Comma.split(line);
        assert_eq!(Delimiter::Comma.join(&fields), line);
    }

    #[test]
    fn display() {
        insta::assert_snapshot!(Delimiter::Tab.to_string(), @"tab");
        insta::assert_snapshot!(Delimiter::Comma.to_string(), @"comma");
    }
}
