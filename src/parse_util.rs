use std::str::FromStr;

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of file, expected '{exp}'")]
    UnexpectedEof { exp: char },

    #[error("Expected '{exp}', but got '{got}'")]
    UnexpectedToken { exp: char, got: char },
}

/// Consumes the slice until a non-ascii whitespace character is reached.
pub fn take_ws(bytes: &[u8]) -> &[u8] {
    let i = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());

    &bytes[i..]
}

/// Drops trailing ascii whitespace.
pub fn trim_end_ws(bytes: &[u8]) -> &[u8] {
    let i = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);

    &bytes[..i]
}

/// Takes the next character from the slice. If none is found, the slice is left as-is.
pub const fn take_1(bytes: &[u8]) -> (Option<u8>, &[u8]) {
    let [b, bytes @ ..] = bytes else {
        return (None, bytes);
    };

    (Some(*b), bytes)
}

/// Like `take_1`, but doesn't consume the token
pub fn peek_1(bytes: &[u8]) -> Option<u8> {
    bytes.first().copied()
}

/// Splits off the current line, without its line break. The line break is consumed.
///
/// A linebreak is any of
/// * `\n`
/// * `\r\n`
pub fn take_line(bytes: &[u8]) -> (&[u8], &[u8]) {
    let (line, rest) = match bytes.iter().position(|&b| b == b'\n') {
        Some(i) => (&bytes[..i], &bytes[i + 1..]),
        None => (bytes, &bytes[bytes.len()..]),
    };

    let line = line.strip_suffix(b"\r").unwrap_or(line);

    (line, rest)
}

/// Advance the slice until `P` is satisfied, without consuming the byte that satisfied it.
///
/// Returns `None` if nothing was consumed.
pub fn take_until_fn<P>(p: P, bytes: &[u8]) -> (Option<&[u8]>, &[u8])
where
    P: Fn(u8) -> bool,
{
    let i = bytes.iter().position(|&b| p(b)).unwrap_or(bytes.len());

    if i == 0 {
        return (None, bytes);
    }

    let (res, bytes) = bytes.split_at(i);

    (Some(res), bytes)
}

/// Expects the next character in `bytes` to be `b`.
pub fn expect(b: u8, bytes: &[u8]) -> ParseResult<&[u8]> {
    let (Some(a), bytes) = take_1(bytes) else {
        return Err(ParseError::UnexpectedEof { exp: b as char });
    };

    if a != b {
        return Err(ParseError::UnexpectedToken {
            exp: b as char,
            got: a as char,
        });
    }

    Ok(bytes)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Invalid UTF-8 in \"{str}\"")]
    InvalidUtf8 { str: String },

    #[error("Failed to convert \"{str}\"")]
    ParseError { str: String },
}

/// Converts `&[u8]` to `T` if `T: FromStr`.
pub fn convert<T: FromStr>(bytes: &[u8]) -> Result<T, ConvertError> {
    let Ok(str) = std::str::from_utf8(bytes) else {
        return Err(ConvertError::InvalidUtf8 {
            str: String::from_utf8_lossy(bytes).to_string(),
        });
    };

    str.parse::<T>().map_err(|_| ConvertError::ParseError {
        str: str.to_string(),
    })
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_take_ws_full_ws() {
        let bytes = b"  ";

        let res = super::take_ws(bytes);

        assert_eq!(res, b"")
    }

    #[test]
    fn test_take_line_crlf() {
        let (line, rest) = super::take_line(b"x = 1\r\nbo!");

        assert_eq!(line, b"x = 1");
        assert_eq!(rest, b"bo!");
    }

    #[test]
    fn test_take_until_fn() {
        let (res, rest) = super::take_until_fn(|b| b == b'=', b"rule = B3");
        assert_eq!(res, Some(b"rule ".as_slice()));
        assert_eq!(rest, b"= B3");

        let (res, rest) = super::take_until_fn(|b| b == b'=', b"= B3");
        assert_eq!(res, None);
        assert_eq!(rest, b"= B3");
    }

    #[test]
    fn test_convert() {
        assert_eq!(super::convert::<i64>(b"-12"), Ok(-12));
        assert!(super::convert::<u64>(b"1a").is_err());
    }

    #[test]
    fn test_trim_end_ws() {
        assert_eq!(super::trim_end_ws(b"B3/S23 \t"), b"B3/S23");
        assert_eq!(super::trim_end_ws(b"  "), b"");
    }
}
