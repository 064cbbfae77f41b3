//! HTTP Range request parsing module
//!
//! Single byte-range support (RFC 9110 section 14). Multi-range requests are
//! answered with the full representation.

/// Inclusive byte range already clamped to the file length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub const fn length(self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for this range
    pub fn content_range(self, total: u64) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// What to do with a request's `Range` header
#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Serve 206 with this slice
    Partial(ByteRange),
    /// Serve 416
    Unsatisfiable,
    /// No usable Range header; serve the whole file
    Full,
}

/// Evaluate a `Range` header against a file of `len` bytes
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
///
/// # Examples
/// ```
/// use devserve::http::range::{evaluate_range, ByteRange, RangeOutcome};
///
/// assert_eq!(
///     evaluate_range(Some("bytes=0-99"), 1000),
///     RangeOutcome::Partial(ByteRange { start: 0, end: 99 })
/// );
/// assert_eq!(evaluate_range(None, 1000), RangeOutcome::Full);
/// ```
pub fn evaluate_range(header: Option<&str>, len: u64) -> RangeOutcome {
    let Some(ranges) = header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };
    if ranges.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((first, last)) = ranges.split_once('-') else {
        return RangeOutcome::Full;
    };

    match (first.trim(), last.trim()) {
        ("", suffix) => suffix_range(suffix, len),
        (first, last) => bounded_range(first, last, len),
    }
}

/// `-500`: the final 500 bytes
fn suffix_range(suffix: &str, len: u64) -> RangeOutcome {
    let Ok(suffix) = suffix.parse::<u64>() else {
        return RangeOutcome::Full;
    };
    if suffix == 0 || len == 0 {
        return RangeOutcome::Unsatisfiable;
    }
    RangeOutcome::Partial(ByteRange {
        start: len.saturating_sub(suffix),
        end: len - 1,
    })
}

/// `100-` or `100-199`
fn bounded_range(first: &str, last: &str, len: u64) -> RangeOutcome {
    let Ok(start) = first.parse::<u64>() else {
        return RangeOutcome::Full;
    };
    let end = if last.is_empty() {
        None
    } else {
        match last.parse::<u64>() {
            Ok(end) => Some(end),
            Err(_) => return RangeOutcome::Full,
        }
    };

    if let Some(end) = end {
        // Syntactically invalid per RFC, so the header is ignored
        if end < start {
            return RangeOutcome::Full;
        }
    }
    if start >= len {
        return RangeOutcome::Unsatisfiable;
    }

    let last_byte = len - 1;
    RangeOutcome::Partial(ByteRange {
        start,
        end: end.map_or(last_byte, |e| e.min(last_byte)),
    })
}
