//! Framing of the block written back for each forwarded command.

const INPUT_PREFIX: &[u8] = b"\ninput: ";
const RETURN_HEADER: &[u8] = b"\nreturn: \n";

/// Build the echo block for `line` followed by the upstream `body`.
///
/// Layout: `\ninput: <line>\nreturn: \n<body>\n`. Both `line` and `body`
/// are copied verbatim.
pub fn frame_response(line: &[u8], body: &[u8]) -> Vec<u8> {
    let mut framed =
        Vec::with_capacity(INPUT_PREFIX.len() + line.len() + RETURN_HEADER.len() + body.len() + 1);
    framed.extend_from_slice(INPUT_PREFIX);
    framed.extend_from_slice(line);
    framed.extend_from_slice(RETURN_HEADER);
    framed.extend_from_slice(body);
    framed.push(b'\n');
    framed
}
