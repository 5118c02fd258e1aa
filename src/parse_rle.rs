use thiserror::Error;
use tracing::warn;

use crate::Cell;
use crate::Coord;
use crate::parse_util;
pub use crate::parse_util::ConvertError;
pub use crate::parse_util::ParseError;
use crate::rule_set::RuleError;
use crate::rule_set::RuleSet;

/// A life pattern, as read from an RLE file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Pattern {
    pub name: Option<String>,
    pub author: Option<String>,
    pub comments: Vec<String>,

    /// Bounding box declared in the header, `(x, y)`
    pub size: Option<(u64, u64)>,

    pub rule: RuleSet,

    /// Live cells, with y growing downward
    pub cells: Vec<Cell>,
}

impl Pattern {
    /// The acorn methuselah: seven cells that take 5206 generations to stabilize.
    pub fn acorn() -> Self {
        Self {
            name: Some("Acorn".to_string()),
            size: Some((7, 3)),
            cells: vec![(1, 0), (3, 1), (0, 2), (1, 2), (4, 2), (5, 2), (6, 2)],
            ..Self::default()
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RleError {
    #[error("Comment line error: {0}")]
    CommentLine(#[from] RleCommentLineError),

    #[error("Header line error: {0}")]
    HeaderLine(#[from] RleHeaderLineError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] RleEncodingError),
}

/// Parse the RLE file format. Assumes the bytes are valid Ascii.
///
/// See: https://conwaylife.com/wiki/Run_Length_Encoded
pub fn read_rle(mut bytes: &[u8]) -> Result<Pattern, RleError> {
    let mut pattern = Pattern::default();
    let mut offset: Option<(Coord, Coord)> = None;

    // Parse as many comment lines as possible
    loop {
        bytes = parse_util::take_ws(bytes);

        let (Some(line), rest) = read_line_comment(bytes)? else {
            break;
        };

        match line {
            RleCommentLine::Comment { text } => pattern.comments.push(text),
            RleCommentLine::Name { name } => {
                if pattern.name.is_some() {
                    warn!("RLE file name already defined. Using latest");
                }

                pattern.name = Some(name);
            }
            RleCommentLine::Author { author } => {
                if pattern.author.is_some() {
                    warn!("RLE author already defined. Using latest");
                }

                pattern.author = Some(author);
            }
            RleCommentLine::Offset { x, y } => {
                if offset.is_some() {
                    warn!("RLE offset already defined. Using latest");
                }

                offset = Some((x, y));
            }
            RleCommentLine::RuleSet { set } => {
                pattern.rule = set;
            }
        }

        bytes = rest;
    }

    // Parse header line, if it's present
    let (header, rest) = read_line_header(bytes)?;
    if let Some(RleHeaderLine { x, y, set }) = header {
        pattern.size = Some((x, y));

        if let Some(set) = set {
            pattern.rule = set;
        }

        bytes = rest;
    }

    let (dx, dy) = offset.unwrap_or_default();

    // Parse encoding
    read_encoding(bytes, |x, y| {
        let cell = dx.checked_add(x).zip(dy.checked_add(y));
        pattern.cells.push(cell.ok_or(RleEncodingError::OutOfRange)?);

        Ok(())
    })?;

    Ok(pattern)
}

enum RleCommentLine {
    Comment { text: String },
    Name { name: String },
    Author { author: String },
    Offset { x: Coord, y: Coord },
    RuleSet { set: RuleSet },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RleCommentLineError {
    #[error("No comment type")]
    NoType,

    #[error("Empty name line")]
    EmptyName,

    #[error("Empty author line")]
    EmptyAuthor,

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Invalid coordinates: {0}")]
    InvalidCoord(#[from] ConvertError),

    #[error("Expected two coordinates")]
    MissingCoord,

    #[error("Invalid comment type, found '{got}'")]
    InvalidType { got: char },
}

fn text(line: &[u8]) -> String {
    let line = parse_util::trim_end_ws(parse_util::take_ws(line));

    String::from_utf8_lossy(line).to_string()
}

/// Attempt to parse a comment line, otherwise leaves `bytes` as-is.
fn read_line_comment(bytes: &[u8]) -> Result<(Option<RleCommentLine>, &[u8]), RleCommentLineError> {
    let Ok(bytes) = parse_util::expect(b'#', bytes) else {
        return Ok((None, bytes));
    };

    let (Some(b), bytes) = parse_util::take_1(bytes) else {
        return Err(RleCommentLineError::NoType);
    };

    let (line, bytes) = parse_util::take_line(bytes);

    let line = match b {
        // Comment line
        b'C' | b'c' => RleCommentLine::Comment { text: text(line) },

        // Pattern name
        b'N' => {
            let name = text(line);
            if name.is_empty() {
                return Err(RleCommentLineError::EmptyName);
            }

            RleCommentLine::Name { name }
        }

        // Pattern author
        b'O' => {
            let author = text(line);
            if author.is_empty() {
                return Err(RleCommentLineError::EmptyAuthor);
            }

            RleCommentLine::Author { author }
        }

        // Pattern offset
        b'R' | b'P' => {
            let mut coords = line
                .split(u8::is_ascii_whitespace)
                .filter(|s| !s.is_empty())
                .map(parse_util::convert::<Coord>);

            let (Some(x), Some(y)) = (coords.next(), coords.next()) else {
                return Err(RleCommentLineError::MissingCoord);
            };

            RleCommentLine::Offset { x: x?, y: y? }
        }

        // Pattern rules
        b'r' => {
            let set = text(line).parse()?;

            RleCommentLine::RuleSet { set }
        }

        b => return Err(RleCommentLineError::InvalidType { got: b as char }),
    };

    Ok((Some(line), bytes))
}

struct RleHeaderLine {
    x: u64,
    y: u64,
    set: Option<RuleSet>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RleHeaderLineError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid value: {0}")]
    Convert(#[from] ConvertError),

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Header field without a name")]
    EmptyField,

    #[error("Missing '{0}' in header")]
    Missing(char),
}

/// Attempt to parse a header line (`x = m, y = n, rule = abc`), otherwise leaves `bytes` as-is.
fn read_line_header(bytes: &[u8]) -> Result<(Option<RleHeaderLine>, &[u8]), RleHeaderLineError> {
    if parse_util::peek_1(bytes) != Some(b'x') {
        return Ok((None, bytes));
    }

    let (line, rest) = parse_util::take_line(bytes);

    let (mut x, mut y, mut set): (Option<u64>, Option<u64>, Option<RuleSet>) = (None, None, None);

    for field in line.split(|&b| b == b',') {
        let field = parse_util::take_ws(field);
        let (Some(key), field) = parse_util::take_until_fn(|b| b == b'=', field) else {
            return Err(RleHeaderLineError::EmptyField);
        };

        let field = parse_util::expect(b'=', field)?;
        let value = parse_util::trim_end_ws(parse_util::take_ws(field));

        match parse_util::trim_end_ws(key) {
            b"x" => x = Some(parse_util::convert(value)?),
            b"y" => y = Some(parse_util::convert(value)?),
            b"rule" => set = Some(text(value).parse()?),
            key => warn!(key = %String::from_utf8_lossy(key), "ignoring unknown RLE header field"),
        }
    }

    let x = x.ok_or(RleHeaderLineError::Missing('x'))?;
    let y = y.ok_or(RleHeaderLineError::Missing('y'))?;

    Ok((Some(RleHeaderLine { x, y, set }), rest))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RleEncodingError {
    #[error("Unexpected end of input, expected '!'")]
    UnexpectedEof,

    #[error("Unrecognized character '{0}'")]
    UnrecognizedChar(char),

    #[error("Repeat count cannot be cut off by a new line")]
    SplitCount,

    #[error("Failed to convert run length: {0}")]
    Convert(#[from] ConvertError),

    #[error("Run of {0} live cells is longer than {max}", max = MAX_LIVE_RUN)]
    RunTooLong(Coord),

    #[error("Cell position does not fit in a coordinate")]
    OutOfRange,
}

/// Longest run of live cells accepted from a single count
pub const MAX_LIVE_RUN: Coord = 1 << 16;

fn advance(pos: Coord, rep: Coord) -> Result<Coord, RleEncodingError> {
    pos.checked_add(rep).ok_or(RleEncodingError::OutOfRange)
}

fn read_encoding<F>(mut bytes: &[u8], mut f: F) -> Result<(), RleEncodingError>
where
    F: FnMut(Coord, Coord) -> Result<(), RleEncodingError>,
{
    let mut rep: Coord = 1;

    let (mut x, mut y) = (0, 0);

    loop {
        let Some(b) = parse_util::peek_1(bytes) else {
            return Err(RleEncodingError::UnexpectedEof);
        };

        match b {
            // End of input
            b'!' => break,

            w if w.is_ascii_whitespace() => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;
            }

            // Dead cell
            b'b' | b'.' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                x = advance(x, rep)?;
                rep = 1;
            }

            // End of line
            b'$' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                y = advance(y, rep)?;
                x = 0;
                rep = 1;
            }

            n if n.is_ascii_digit() => {
                let (Some(n), rest) = parse_util::take_until_fn(|b| !b.is_ascii_digit(), bytes)
                else {
                    unreachable!("We peeked and found a digit")
                };
                bytes = rest;

                if let Some(b'\n' | b'\r') = parse_util::peek_1(bytes) {
                    return Err(RleEncodingError::SplitCount);
                };

                rep = parse_util::convert(n)?;
            }

            // Live cell. Multi-state patterns use other letters, which we treat as alive.
            l if l.is_ascii_alphabetic() => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                if rep > MAX_LIVE_RUN {
                    return Err(RleEncodingError::RunTooLong(rep));
                }

                let end = advance(x, rep)?;
                for cx in x..end {
                    f(cx, y)?;
                }

                x = end;
                rep = 1;
            }

            b => return Err(RleEncodingError::UnrecognizedChar(b as char)),
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rule_set::B3S23;

    const GLIDER: &[u8] = b"#N Glider
#O Richard K. Guy
#C The smallest, most common, and first discovered spaceship.
x = 3, y = 3, rule = B3/S23
bob$2bo$3o!
";

    #[test]
    fn read_glider() {
        let pattern = read_rle(GLIDER).unwrap();

        assert_eq!(pattern.name.as_deref(), Some("Glider"));
        assert_eq!(pattern.author.as_deref(), Some("Richard K. Guy"));
        assert_eq!(pattern.comments.len(), 1);
        assert_eq!(pattern.size, Some((3, 3)));
        assert_eq!(pattern.rule, B3S23);
        assert_eq!(
            pattern.cells,
            [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]
        );
    }

    #[test]
    fn header_rule_and_runs() {
        let pattern = read_rle(b"x = 6, y = 2, rule = B36/S23\n2o2b2o$\n6o!").unwrap();

        assert_eq!(pattern.rule.to_string(), "B36/S23");
        assert_eq!(
            pattern.cells,
            [
                (0, 0),
                (1, 0),
                (4, 0),
                (5, 0),
                (0, 1),
                (1, 1),
                (2, 1),
                (3, 1),
                (4, 1),
                (5, 1)
            ]
        );
    }

    #[test]
    fn blank_rows_and_offset() {
        let pattern = read_rle(b"#P -1 5\r\no2$o!").unwrap();

        assert_eq!(pattern.size, None);
        assert_eq!(pattern.cells, [(-1, 5), (-1, 7)]);
    }

    #[test]
    fn comment_rule() {
        let pattern = read_rle(b"#r 23/3\nx = 1, y = 1\no!");

        assert_eq!(
            pattern,
            Err(RleError::CommentLine(RleCommentLineError::InvalidRule(
                RuleError::MissingSection('2')
            )))
        );

        let pattern = read_rle(b"#r B2/S\nx = 1, y = 1\no!").unwrap();
        assert_eq!(pattern.rule, RuleSet::new(0b100, 0));
    }

    #[test]
    fn read_coordinates() {
        let (header, rest) = read_line_header(b"x = 1, y = 1\n").unwrap();
        let header = header.unwrap();

        assert_eq!((header.x, header.y), (1, 1));
        assert!(header.set.is_none());
        assert_eq!(rest, b"");
    }

    #[test]
    fn header_field_without_name() {
        assert_eq!(
            read_rle(b"x = 1, = 2\no!"),
            Err(RleError::HeaderLine(RleHeaderLineError::EmptyField))
        );
    }

    #[test]
    fn header_needs_both_sizes() {
        assert_eq!(
            read_rle(b"x = 1\no!"),
            Err(RleError::HeaderLine(RleHeaderLineError::Missing('y')))
        );
    }

    #[test]
    fn missing_terminator() {
        assert_eq!(
            read_rle(b"x = 1, y = 1\no"),
            Err(RleError::Encoding(RleEncodingError::UnexpectedEof))
        );
    }

    #[test]
    fn split_run_count() {
        assert_eq!(
            read_rle(b"x = 3, y = 1\n3\no!"),
            Err(RleError::Encoding(RleEncodingError::SplitCount))
        );
    }

    #[test]
    fn huge_run_counts() {
        assert_eq!(
            read_rle(b"x = 1, y = 1\n9223372036854775807b2o!"),
            Err(RleError::Encoding(RleEncodingError::OutOfRange))
        );
        assert_eq!(
            read_rle(b"x = 1, y = 1\n9223372036854775807$9223372036854775807$o!"),
            Err(RleError::Encoding(RleEncodingError::OutOfRange))
        );
        assert_eq!(
            read_rle(b"x = 1, y = 1\n1000000000000o!"),
            Err(RleError::Encoding(RleEncodingError::RunTooLong(1_000_000_000_000)))
        );
        assert!(matches!(
            read_rle(b"x = 1, y = 1\n99999999999999999999o!"),
            Err(RleError::Encoding(RleEncodingError::Convert(_)))
        ));
    }

    #[test]
    fn offset_at_the_edge() {
        assert_eq!(
            read_rle(b"#P 9223372036854775807 0\nbo!"),
            Err(RleError::Encoding(RleEncodingError::OutOfRange))
        );

        let pattern = read_rle(b"#P 9223372036854775806 0\nbo!").unwrap();
        assert_eq!(pattern.cells, [(Coord::MAX, 0)]);
    }

    #[test]
    fn unknown_character() {
        assert_eq!(
            read_rle(b"x = 3, y = 1\no*o!"),
            Err(RleError::Encoding(RleEncodingError::UnrecognizedChar('*')))
        );
    }

    #[test]
    fn acorn() {
        let pattern = Pattern::acorn();
        let parsed = read_rle(b"x = 7, y = 3\nbo5b$3bo3b$2o2b3o!").unwrap();

        assert_eq!(pattern.cells, parsed.cells);
        assert_eq!(pattern.size, parsed.size);
    }
}
