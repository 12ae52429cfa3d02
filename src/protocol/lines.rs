//! Line splitting for raw client chunks.
//!
//! Clients may terminate lines with `\n`, `\r\n` or a bare `\r`. Each read
//! chunk is normalized to `\n` and split independently; a line spanning two
//! reads is seen as two separate lines. Bytes are never decoded, so a line
//! holding invalid UTF-8 reaches the caller unchanged.

/// Normalize every line ending in `chunk` to `\n` and split on it.
///
/// A trailing delimiter yields a trailing empty line. Empty lines are kept
/// so the caller decides what to ignore.
pub fn split_lines(chunk: &[u8]) -> Vec<Vec<u8>> {
    normalize_line_endings(chunk)
        .split(|&b| b == b'\n')
        .map(<[u8]>::to_vec)
        .collect()
}

/// Replace `\r\n` and bare `\r` with `\n`.
pub fn normalize_line_endings(chunk: &[u8]) -> Vec<u8> {
    let mut normalized = Vec::with_capacity(chunk.len());
    let mut bytes = chunk.iter().copied().peekable();
    while let Some(b) = bytes.next() {
        if b == b'\r' {
            bytes.next_if_eq(&b'\n');
            normalized.push(b'\n');
        } else {
            normalized.push(b);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(chunk: &[u8]) -> Vec<String> {
        split_lines(chunk)
            .iter()
            .map(|line| String::from_utf8(line.clone()).unwrap())
            .collect()
    }

    #[test]
    fn splits_on_newline_with_trailing_empty_line() {
        assert_eq!(lines(b"hello\nworld\n"), vec!["hello", "world", ""]);
    }

    #[test]
    fn mixed_endings_match_pre_normalized_input() {
        let mixed = b"one\r\ntwo\rthree\nfour";
        let normalized = b"one\ntwo\nthree\nfour";
        assert_eq!(split_lines(mixed), split_lines(normalized));
        assert_eq!(lines(mixed), vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn crlf_is_a_single_line_ending() {
        assert_eq!(lines(b"a\r\n\r\nb"), vec!["a", "", "b"]);
    }

    #[test]
    fn lf_before_cr_is_two_line_endings() {
        assert_eq!(lines(b"a\n\rb"), vec!["a", "", "b"]);
    }

    #[test]
    fn no_delimiter_is_one_line() {
        assert_eq!(lines(b"partial command"), vec!["partial command"]);
    }

    #[test]
    fn empty_chunk_is_one_empty_line() {
        assert_eq!(lines(b""), vec![""]);
    }

    #[test]
    fn whitespace_is_preserved() {
        assert_eq!(lines(b"  quit \n"), vec!["  quit ", ""]);
    }

    #[test]
    fn invalid_utf8_passes_through() {
        let split = split_lines(b"caf\xe9\r\n\xff\xfe");
        assert_eq!(split, vec![b"caf\xe9".to_vec(), b"\xff\xfe".to_vec()]);
    }

    #[test]
    fn partial_multibyte_char_is_kept_raw() {
        assert_eq!(split_lines(b"caf\xc3"), vec![b"caf\xc3".to_vec()]);
        assert_eq!(split_lines(b"\xa9\n"), vec![b"\xa9".to_vec(), Vec::new()]);
    }

    #[test]
    fn trailing_cr_becomes_line_ending() {
        assert_eq!(normalize_line_endings(b"x\r"), b"x\n");
    }
}
