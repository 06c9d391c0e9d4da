//! Source-level rewrite of assignments used as conditions.
//!
//! GML tolerates `if (x = y)` and treats the `=` as a comparison. Downstream
//! passes only want one spelling, so the guard rewrites it to `if (x == y)`
//! before lexing and records where the extra characters went. After the tree
//! is built, every location is projected back through [`Sanitized::map_index`]
//! so diagnostics and trivia refer to the text the author actually wrote.
//!
//! All indices are byte offsets. Every structural character the state
//! machine cares about is ASCII, so multi-byte sequences pass through
//! untouched.

/// Result of sanitizing one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub text: String,
    /// Strictly increasing indices in `text` where a synthetic `=` was
    /// inserted. `None` when the source was returned unchanged.
    pub insert_positions: Option<Vec<usize>>,
}

impl Sanitized {
    /// Maps an index in the sanitized text back to the original text.
    ///
    /// Counts the insertions at positions strictly below `i` by binary
    /// search and subtracts them.
    pub fn map_index(&self, i: usize) -> usize {
        match &self.insert_positions {
            None => i,
            Some(positions) => i - positions.partition_point(|&p| p < i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    LineComment,
    BlockComment,
    Str(u8),
}

/// Characters that, seen before a `=`, mean the `=` belongs to a compound
/// operator and must not be doubled. `:` keeps `:=` intact.
const ASSIGN_GUARD: &[u8] = b"*+-/%|&^<>!=:";

/// Rewrites `if (x = y)` to `if (x == y)` outside strings and comments.
///
/// Total: any input comes back out, worst case unchanged.
pub fn sanitize(source: &str) -> Sanitized {
    let bytes = source.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut inserts: Vec<usize> = Vec::new();

    let mut mode = Mode::Normal;
    // Paren depth while inside an `if (...)` condition; 0 means outside.
    let mut condition_depth = 0usize;
    // Seen `if`, waiting for the first non-whitespace character.
    let mut awaiting_paren = false;

    let mut i = 0usize;
    while i < bytes.len() {
        let c = bytes[i];
        let next = bytes.get(i + 1).copied();

        match mode {
            Mode::LineComment => {
                if c == b'\n' {
                    mode = Mode::Normal;
                }
            }
            Mode::BlockComment => {
                if c == b'*' && next == Some(b'/') {
                    mode = Mode::Normal;
                    out.push(b'*');
                    out.push(b'/');
                    i += 2;
                    continue;
                }
            }
            Mode::Str(quote) => {
                if c == b'\\' && next.is_some() {
                    out.push(c);
                    out.push(bytes[i + 1]);
                    i += 2;
                    continue;
                }
                if c == quote {
                    mode = Mode::Normal;
                }
            }
            Mode::Normal => {
                match c {
                    b'/' if next == Some(b'/') => mode = Mode::LineComment,
                    b'/' if next == Some(b'*') => mode = Mode::BlockComment,
                    b'"' | b'\'' | b'`' => mode = Mode::Str(c),
                    _ => {}
                }

                if mode == Mode::Normal {
                    if awaiting_paren && !c.is_ascii_whitespace() {
                        awaiting_paren = false;
                        if c == b'(' {
                            condition_depth = 1;
                            out.push(c);
                            i += 1;
                            continue;
                        }
                    }

                    if condition_depth > 0 {
                        match c {
                            b'(' => condition_depth += 1,
                            b')' => condition_depth -= 1,
                            b'=' => {
                                let prev = i.checked_sub(1).map(|p| bytes[p]);
                                let lone = next != Some(b'=')
                                    && !prev.is_some_and(|p| ASSIGN_GUARD.contains(&p));
                                if lone {
                                    out.push(b'=');
                                    inserts.push(out.len());
                                    out.push(b'=');
                                    i += 1;
                                    continue;
                                }
                            }
                            _ => {}
                        }
                    } else if is_if_keyword(bytes, i) {
                        awaiting_paren = true;
                        out.push(b'i');
                        out.push(b'f');
                        i += 2;
                        continue;
                    }
                }
            }
        }

        out.push(c);
        i += 1;
    }

    // Only ASCII was inserted into a valid UTF-8 input.
    let text = String::from_utf8(out).expect("sanitizer preserves UTF-8");
    let insert_positions = if inserts.is_empty() { None } else { Some(inserts) };
    Sanitized { text, insert_positions }
}

/// `if` at `i`, bounded on both sides by non-word characters.
fn is_if_keyword(bytes: &[u8], i: usize) -> bool {
    if bytes[i] != b'i' || bytes.get(i + 1) != Some(&b'f') {
        return false;
    }
    let before_ok = i == 0 || !is_word_byte(bytes[i - 1]);
    let after_ok = bytes.get(i + 2).is_none_or(|&c| !is_word_byte(c));
    before_ok && after_ok
}

fn is_word_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}
