//! Localizable-properties support: a span-preserving `.properties` parser
//! and the reconciliation of property keys against `Constants`/`Messages`
//! style interfaces.
//!
//! The parser favors tooling robustness over full spec compliance: it never
//! panics on malformed input, and every reported span is safe to slice in
//! the original text.

mod keys;

pub use keys::{method_name_for_key, method_names_for_keys, reconcile, I18nReport};

/// A byte-span into the original `.properties` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    pub key: String,
    pub value: String,
    /// Span of the raw (escaped) key in the original text.
    pub key_span: Span,
    /// Span of the raw (escaped) value; empty when no value was written.
    pub value_span: Span,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesFile {
    pub entries: Vec<PropertyEntry>,
}

impl PropertiesFile {
    /// First entry for `key`, mirroring `java.util.Properties` load order
    /// semantics where the last write wins at runtime but tooling flags the
    /// first occurrence.
    pub fn get(&self, key: &str) -> Option<&PropertyEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }
}

// One logical line: raw bytes with the original offset of each byte,
// continuations already spliced out.
struct LogicalLine {
    bytes: Vec<u8>,
    offsets: Vec<usize>,
}

/// Parse `.properties` text into entries.
pub fn parse(text: &str) -> PropertiesFile {
    let bytes = text.as_bytes();
    let mut offset = 0usize;
    let mut entries = Vec::new();

    while offset < bytes.len() {
        let line_start = offset;
        if let Some(logical) = read_logical_line(bytes, &mut offset) {
            if let Some(entry) = split_entry(&logical, text) {
                entries.push(entry);
            }
        }
        // Guarantee progress on pathological inputs.
        if offset == line_start {
            offset += 1;
        }
    }

    PropertiesFile { entries }
}

// Returns `None` for blank and comment lines.
fn read_logical_line(bytes: &[u8], offset: &mut usize) -> Option<LogicalLine> {
    // Skip leading whitespace on the first physical line.
    while *offset < bytes.len() && matches!(bytes[*offset], b' ' | b'\t' | b'\x0c') {
        *offset += 1;
    }

    if *offset < bytes.len() && matches!(bytes[*offset], b'\n' | b'\r') {
        *offset += 1;
        return None;
    }
    if *offset < bytes.len() && matches!(bytes[*offset], b'#' | b'!') {
        // Comment: consume through end of line, no continuation handling.
        while *offset < bytes.len() && bytes[*offset] != b'\n' {
            *offset += 1;
        }
        if *offset < bytes.len() {
            *offset += 1;
        }
        return None;
    }
    if *offset >= bytes.len() {
        return None;
    }

    let mut out = Vec::new();
    let mut offsets = Vec::new();

    loop {
        let segment_start = *offset;
        let mut line_end = segment_start;
        while line_end < bytes.len() && bytes[line_end] != b'\n' {
            line_end += 1;
        }
        let mut content_end = line_end;
        if content_end > segment_start && bytes[content_end - 1] == b'\r' {
            content_end -= 1;
        }

        let continues = ends_with_unescaped_backslash(&bytes[segment_start..content_end]);
        let copy_end = if continues {
            content_end - 1
        } else {
            content_end
        };

        for idx in segment_start..copy_end {
            out.push(bytes[idx]);
            offsets.push(idx);
        }

        *offset = if line_end < bytes.len() {
            line_end + 1
        } else {
            line_end
        };

        if !continues {
            break;
        }

        // Continuation: leading whitespace of the next physical line is not
        // part of the value.
        while *offset < bytes.len() && matches!(bytes[*offset], b' ' | b'\t' | b'\x0c') {
            *offset += 1;
        }
        if *offset >= bytes.len() {
            break;
        }
    }

    Some(LogicalLine { bytes: out, offsets })
}

fn ends_with_unescaped_backslash(line: &[u8]) -> bool {
    let trailing = line.iter().rev().take_while(|&&b| b == b'\\').count();
    trailing % 2 == 1
}

fn split_entry(line: &LogicalLine, text: &str) -> Option<PropertyEntry> {
    let bytes = &line.bytes;
    if bytes.is_empty() {
        return None;
    }

    // Find the first unescaped separator.
    let mut sep = bytes.len();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'=' | b':' | b' ' | b'\t' | b'\x0c' => {
                sep = i;
                break;
            }
            _ => i += 1,
        }
    }

    let key_end = sep.min(bytes.len());
    if key_end == 0 {
        return None;
    }

    // Skip whitespace, at most one '='/':' separator, then whitespace again.
    let mut value_start = key_end;
    while value_start < bytes.len()
        && matches!(bytes[value_start], b' ' | b'\t' | b'\x0c')
    {
        value_start += 1;
    }
    if value_start < bytes.len() && matches!(bytes[value_start], b'=' | b':') {
        value_start += 1;
        while value_start < bytes.len()
            && matches!(bytes[value_start], b' ' | b'\t' | b'\x0c')
        {
            value_start += 1;
        }
    }

    let key = unescape(&bytes[..key_end]);
    let value = unescape(&bytes[value_start..]);

    let key_span = span_of(line, 0, key_end, text);
    let value_span = span_of(line, value_start, bytes.len(), text);

    Some(PropertyEntry {
        key,
        value,
        key_span,
        value_span,
    })
}

fn span_of(line: &LogicalLine, start: usize, end: usize, text: &str) -> Span {
    if start >= end {
        // Empty region: anchor at the offset just past the previous byte,
        // which is always a char boundary in the original text.
        let anchor = if start > 0 && start <= line.offsets.len() {
            line.offsets[start - 1] + 1
        } else if let Some(&first) = line.offsets.first() {
            first
        } else {
            text.len()
        };
        return Span::new(anchor, anchor);
    }
    Span::new(line.offsets[start], line.offsets[end - 1] + 1)
}

fn unescape(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            // Copy the full UTF-8 sequence through unchanged.
            let len = utf8_len(b);
            let end = (i + len).min(bytes.len());
            out.push_str(&String::from_utf8_lossy(&bytes[i..end]));
            i = end;
            continue;
        }

        i += 1;
        if i >= bytes.len() {
            break;
        }
        match bytes[i] {
            b't' => out.push('\t'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b'f' => out.push('\x0c'),
            b'u' => {
                let hex = bytes.get(i + 1..i + 5);
                let code = hex
                    .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|h| u32::from_str_radix(&String::from_utf8_lossy(h), 16).ok())
                    .and_then(char::from_u32);
                match code {
                    Some(c) => {
                        out.push(c);
                        i += 4;
                    }
                    // Malformed escape: keep the 'u' literally.
                    None => out.push('u'),
                }
            }
            other => {
                let len = utf8_len(other);
                let end = (i + len).min(bytes.len());
                out.push_str(&String::from_utf8_lossy(&bytes[i..end]));
                i = end;
                continue;
            }
        }
        i += 1;
    }
    out
}

fn utf8_len(first: u8) -> usize {
    match first {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        _ => 4,
    }
}
