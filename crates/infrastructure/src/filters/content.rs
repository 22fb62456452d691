use listwarden_domain::{ContentStats, DomainError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Bytes of the body inspected before the rest is trusted.
pub const SNIFF_LEN: usize = 4 * 1024;

const TITLE_PREFIX: &[u8] = b"! Title:";

// ---------------------------------------------------------------------------
// Content sniffing
// ---------------------------------------------------------------------------

/// Printable text plus CR, LF and TAB. Bytes above 0x7f pass so UTF-8
/// titles are accepted.
pub fn is_printable_text(data: &[u8]) -> bool {
    data.iter()
        .all(|&c| (c >= b' ' && c != 0x7f) || c == b'\n' || c == b'\r' || c == b'\t')
}

/// Case-insensitive search for an HTML document start.
pub fn looks_like_html(data: &[u8]) -> bool {
    let lower = data.to_ascii_lowercase();
    contains(&lower, b"<html") || contains(&lower, b"<!doctype")
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

pub fn validate_sample(sample: &[u8]) -> Result<(), DomainError> {
    if !is_printable_text(sample) {
        return Err(DomainError::NonPrintableContent);
    }
    if looks_like_html(sample) {
        return Err(DomainError::HtmlContent);
    }
    Ok(())
}

/// Collects the first `SNIFF_LEN` bytes of a stream and validates them
/// exactly once: when the sample is full, or at end of stream.
#[derive(Debug, Default)]
pub struct ContentSniffer {
    sample: Vec<u8>,
    checked: bool,
}

impl ContentSniffer {
    pub fn new() -> Self {
        Self {
            sample: Vec::with_capacity(SNIFF_LEN),
            checked: false,
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), DomainError> {
        if self.checked {
            return Ok(());
        }

        let take = chunk.len().min(SNIFF_LEN - self.sample.len());
        self.sample.extend_from_slice(&chunk[..take]);

        if self.sample.len() == SNIFF_LEN {
            return self.check();
        }
        Ok(())
    }

    pub fn finish(&mut self) -> Result<(), DomainError> {
        if self.checked {
            return Ok(());
        }
        self.check()
    }

    fn check(&mut self) -> Result<(), DomainError> {
        self.checked = true;
        let sample = std::mem::take(&mut self.sample);
        validate_sample(&sample)
    }
}

// ---------------------------------------------------------------------------
// Rule counting
// ---------------------------------------------------------------------------

/// Counts rule lines and picks up the first `! Title:` header.
///
/// A rule is any non-empty line (after trimming) not starting with `!`.
#[derive(Debug, Default)]
pub struct RuleScanner {
    rule_count: usize,
    title: Option<String>,
    seen_title: bool,
}

impl RuleScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan_line(&mut self, line: &[u8]) {
        let line = line.trim_ascii();
        if line.is_empty() {
            return;
        }

        if line[0] != b'!' {
            self.rule_count += 1;
            return;
        }

        if self.seen_title {
            return;
        }
        if let Some(title) = parse_title(line) {
            self.seen_title = true;
            if !title.is_empty() {
                self.title = Some(title);
            }
        }
    }

    pub fn finish(self, checksum: u32) -> ContentStats {
        ContentStats {
            rule_count: self.rule_count,
            checksum,
            title: self.title,
        }
    }
}

/// Matches `^! Title: +(.*)$`.
fn parse_title(line: &[u8]) -> Option<String> {
    let rest = line.strip_prefix(TITLE_PREFIX)?;
    if rest.first() != Some(&b' ') {
        return None;
    }
    let start = rest.iter().position(|&b| b != b' ').unwrap_or(rest.len());
    Some(String::from_utf8_lossy(&rest[start..]).into_owned())
}

/// Scan a complete in-memory body.
pub fn scan_bytes(data: &[u8]) -> ContentStats {
    let mut scanner = RuleScanner::new();
    for line in data.split(|&b| b == b'\n') {
        scanner.scan_line(line);
    }
    scanner.finish(crc32fast::hash(data))
}

/// Scan a stream line by line; the checksum covers every byte read.
pub async fn scan_reader<R>(mut reader: R) -> std::io::Result<ContentStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut scanner = RuleScanner::new();
    let mut hasher = crc32fast::Hasher::new();
    let mut line = Vec::with_capacity(256);

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        hasher.update(&line);
        scanner.scan_line(&line);
    }

    Ok(scanner.finish(hasher.finalize()))
}
