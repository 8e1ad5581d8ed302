//! Locating where two strings diverge.

use std::fmt;
use std::ops::Range;

/// Byte range of the first divergence, measured in the first string.
///
/// Both ends fall on UTF-8 character boundaries of that string, so the span
/// can be used to slice it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// An empty span marks a difference that lies only in the longer tail.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Find the first differing span of `a` when compared to `b`.
///
/// The span starts at the first differing byte and ends where the two
/// strings agree again, or at the end of the shorter one. When one string is
/// a prefix of the other the span is empty and sits at the shorter length.
/// Returns `None` for identical strings.
pub fn locate(a: &str, b: &str) -> Option<Span> {
    if a == b {
        return None;
    }

    let (ab, bb) = (a.as_bytes(), b.as_bytes());
    let overlap = ab.len().min(bb.len());

    let Some(mut start) = (0..overlap).find(|&i| ab[i] != bb[i]) else {
        return Some(Span::new(overlap, overlap));
    };
    let mut end = (start + 1..overlap)
        .find(|&i| ab[i] == bb[i])
        .unwrap_or(overlap);

    while !a.is_char_boundary(start) {
        start -= 1;
    }
    let width = a[start..].chars().next().map_or(1, char::len_utf8);
    end = end.max(start + width);
    while end < a.len() && !a.is_char_boundary(end) {
        end += 1;
    }

    Some(Span::new(start, end.min(a.len())))
}

/// Window of at most `max` bytes of `s` around byte position `pos`.
///
/// The window is centered on `pos` and shifted left when it would run past
/// the end. Strings no longer than `max` are returned whole.
pub fn excerpt(s: &str, pos: usize, max: usize) -> &str {
    excerpt_range(s, pos, max).map_or(s, |range| &s[range])
}

/// Byte range chosen by [`excerpt`], or `None` when `s` fits in `max`.
pub(crate) fn excerpt_range(s: &str, pos: usize, max: usize) -> Option<Range<usize>> {
    let len = s.len();
    if len <= max {
        return None;
    }

    let half = max / 2;
    let (mut lo, mut hi) = if pos > half {
        (pos - half, pos + half)
    } else {
        (0, max)
    };
    if hi > len {
        let overrun = hi - len;
        lo = lo.saturating_sub(overrun);
        hi = len;
    }

    while lo < hi && !s.is_char_boundary(lo) {
        lo += 1;
    }
    while hi > lo && !s.is_char_boundary(hi) {
        hi -= 1;
    }
    Some(lo..hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(a: &str, b: &str) -> Option<(usize, usize)> {
        locate(a, b).map(|s| (s.start, s.end))
    }

    #[test]
    fn test_locate() {
        assert_eq!(span("a", "b"), Some((0, 1)));
        assert_eq!(span("abc", "adc"), Some((1, 2)));
        assert_eq!(span("hello world", "hell0\tWorld"), Some((4, 7)));
        assert_eq!(span("hello worlb", "hello world!!"), Some((10, 11)));
        assert_eq!(span("abcd", "axyz"), Some((1, 4)));
    }

    #[test]
    fn test_locate_identical() {
        assert_eq!(span("a", "a"), None);
        assert_eq!(span("", ""), None);
    }

    #[test]
    fn test_locate_prefix() {
        assert_eq!(span("hello world", "hello world!!"), Some((11, 11)));
        assert_eq!(span("hello world!!", "hello world"), Some((11, 11)));
        assert_eq!(span("", "x"), Some((0, 0)));
        assert!(locate("ab", "abc").unwrap().is_empty());
    }

    #[test]
    fn test_locate_multibyte() {
        assert_eq!(span("日木語", "日本語"), Some((3, 6)));
        // Differing first bytes of characters of different widths.
        assert_eq!(span("é", "e"), Some((0, 2)));
        assert_eq!(span("xé", "xè"), Some((1, 3)));

        let a = "日木語";
        let s = locate(a, "日本語").unwrap();
        assert_eq!(&a[s.range()], "木");
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("lorem ipsum", 6, 5), "m ip");
        assert_eq!(excerpt("lorem ipsum", 8, 5), "ipsu");
        assert_eq!(excerpt("lorem ipsum", 10, 5), "psum");
        assert_eq!(excerpt("lorem ipsum", 15, 5), "psum");
        assert_eq!(excerpt("lorem ipsum", 0, 5), "lorem");
        assert_eq!(excerpt("", 0, 5), "");
        assert_eq!(excerpt("short", 2, 10), "short");
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let s = "日本語の文章";
        let window = excerpt(s, 7, 7);
        assert!(window.len() <= 7);
        assert!(s.contains(window));
    }

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(3, 6).to_string(), "3..6");
        assert_eq!(Span::new(3, 6).len(), 3);
    }
}
