//! URL path translation
//!
//! Turns the path component of a request URI into a path relative to the
//! served root that can never climb above it.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::PathBuf;

/// Bytes escaped in listing links: everything except `/` and the unreserved set
const HREF_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Request path mapped onto the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPath {
    /// Relative to the served root; empty for `/`
    pub relative: PathBuf,
    /// Whether the raw URL path ended in `/` (an encoded `%2F` does not count)
    pub trailing_slash: bool,
}

/// Translate a URL path (query already stripped) into a root-relative path.
///
/// Percent-escapes are decoded first, so `%2e%2e` is treated like `..`.
/// Empty and `.` segments are dropped, `..` pops the previous segment and is
/// a no-op at the top, and segments containing a backslash are skipped.
pub fn translate_path(url_path: &str) -> TranslatedPath {
    let trailing_slash = url_path.trim_end().ends_with('/');
    let decoded = percent_decode(url_path);

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains('\\') => {}
            s => segments.push(s),
        }
    }

    TranslatedPath {
        relative: segments.iter().collect(),
        trailing_slash,
    }
}

/// Decode `%XX` escapes; malformed escapes are kept verbatim and invalid
/// UTF-8 is replaced.
pub fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

/// Percent-encode a name for use in an `href`
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, HREF_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_translate_simple() {
        let t = translate_path("/css/site.css");
        assert_eq!(t.relative, Path::new("css/site.css"));
        assert!(!t.trailing_slash);
    }

    #[test]
    fn test_translate_root() {
        let t = translate_path("/");
        assert_eq!(t.relative, PathBuf::new());
        assert!(t.trailing_slash);
    }

    #[test]
    fn test_parent_segments_cannot_escape() {
        assert_eq!(translate_path("/../../etc/passwd").relative, Path::new("etc/passwd"));
        assert_eq!(translate_path("/a/b/../c").relative, Path::new("a/c"));
        assert_eq!(
            translate_path("/%2e%2e/%2E%2E/etc/passwd").relative,
            Path::new("etc/passwd")
        );
        assert_eq!(translate_path("/a/%2e%2e%2f%2e%2e%2fsecret").relative, Path::new("secret"));
    }

    #[test]
    fn test_dot_and_empty_segments_dropped() {
        assert_eq!(translate_path("//a/./b//").relative, Path::new("a/b"));
        assert!(translate_path("//a/./b//").trailing_slash);
    }

    #[test]
    fn test_backslash_segments_skipped() {
        assert_eq!(translate_path("/..\\..\\x/ok").relative, Path::new("ok"));
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("my%20file.txt"), "my file.txt");
        assert_eq!(percent_decode("caf%C3%A9"), "café");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz%4"), "%zz%4");
        assert_eq!(percent_decode("a+b"), "a+b");
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("my file.txt"), "my%20file.txt");
        assert_eq!(percent_encode("dir/"), "dir/");
        assert_eq!(percent_encode("café"), "caf%C3%A9");
        assert_eq!(percent_encode("a#b?c"), "a%23b%3Fc");
    }

    #[test]
    fn test_encoded_slash_is_not_a_trailing_slash() {
        let t = translate_path("/script.js%2F");
        assert_eq!(t.relative, Path::new("script.js"));
        assert!(!t.trailing_slash);

        assert!(translate_path("/data%2F/").trailing_slash);
    }
}
