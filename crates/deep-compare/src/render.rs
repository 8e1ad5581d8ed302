//! Presentation of mismatch reports.
//!
//! All decoration goes through a [`ColorBackend`], so the plain and colored
//! renderings only differ in escape sequences.

use std::fmt;
use std::io::IsTerminal;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

use crate::config::ConfigError;
use crate::string_diff::{excerpt_range, Span};

const RESET: &str = "\x1b[0m";
const ELLIPSIS: &str = "…";

/// What a piece of rendered text stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Got,
    Want,
    /// Differing part of the `got` string.
    GotSpan,
    /// Differing part of the `want` string.
    WantSpan,
    Nil,
}

/// Applies decoration for a [`Role`].
pub trait ColorBackend {
    fn paint(&self, role: Role, text: &str) -> String;
}

/// Emits text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainBackend;

impl ColorBackend for PlainBackend {
    fn paint(&self, _role: Role, text: &str) -> String {
        text.to_string()
    }
}

/// Wraps text in ANSI escape sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiBackend;

impl AnsiBackend {
    fn code(role: Role) -> &'static str {
        match role {
            Role::Got => "\x1b[91m",
            Role::Want => "\x1b[96m",
            Role::GotSpan => "\x1b[46m\x1b[30m",
            Role::WantSpan => "\x1b[41m\x1b[30m",
            Role::Nil => "\x1b[95m",
        }
    }
}

impl ColorBackend for AnsiBackend {
    fn paint(&self, role: Role, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        format!("{}{text}{RESET}", Self::code(role))
    }
}

/// When to emit colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stderr is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(&self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
                !no_color && std::io::stderr().is_terminal()
            }
        }
    }

    pub fn backend(&self) -> &'static dyn ColorBackend {
        if self.enabled() {
            &AnsiBackend
        } else {
            &PlainBackend
        }
    }
}

impl FromStr for ColorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            _ => Err(ConfigError::UnknownColorMode {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Auto => write!(f, "auto"),
            ColorMode::Always => write!(f, "always"),
            ColorMode::Never => write!(f, "never"),
        }
    }
}

/// Options for [`Mismatches::render`](crate::Mismatches::render).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub color: ColorMode,
    /// Show at most this many bytes of each string around the divergence.
    pub max_string_len: Option<NonZeroUsize>,
    /// Append a line diff with this much context under multi-line strings.
    pub context_lines: Option<usize>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uncolored output, identical to `Display`.
    pub fn plain() -> Self {
        Self::default().with_color(ColorMode::Never)
    }

    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    pub fn with_max_string_len(mut self, max: usize) -> Result<Self, ConfigError> {
        let max = NonZeroUsize::new(max).ok_or(ConfigError::EmptyStringWindow)?;
        self.max_string_len = Some(max);
        Ok(self)
    }

    pub fn with_context_lines(mut self, lines: usize) -> Self {
        self.context_lines = Some(lines);
        self
    }

    pub fn backend(&self) -> &'static dyn ColorBackend {
        self.color.backend()
    }
}

/// `<word>` with the word painted as nil.
pub(crate) fn placeholder(backend: &dyn ColorBackend, word: &str) -> String {
    format!("<{}>", backend.paint(Role::Nil, word))
}

/// Render both sides of a string mismatch with the differing span marked.
///
/// Returns the quoted `got` and `want` texts.
pub(crate) fn string_pair(
    backend: &dyn ColorBackend,
    options: &RenderOptions,
    got: &str,
    want: &str,
    span: Option<Span>,
) -> (String, String) {
    let overlap = got.len().min(want.len());
    let got_text = highlighted(backend, options, got, span, overlap, Role::Got, Role::GotSpan);
    let want_text = highlighted(backend, options, want, span, overlap, Role::Want, Role::WantSpan);
    (got_text, want_text)
}

fn highlighted(
    backend: &dyn ColorBackend,
    options: &RenderOptions,
    s: &str,
    span: Option<Span>,
    overlap: usize,
    base: Role,
    accent: Role,
) -> String {
    let mark = span.map_or(s.len()..s.len(), |span| side_range(s, span, overlap));
    let window = options
        .max_string_len
        .and_then(|max| excerpt_range(s, mark.start, max.get()))
        .unwrap_or(0..s.len());

    let lo = window.start;
    let hi = window.end;
    let mark_start = mark.start.clamp(lo, hi);
    let mark_end = mark.end.clamp(mark_start, hi);

    let mut out = String::new();
    let mut head = String::from("\"");
    if lo > 0 {
        head.push_str(ELLIPSIS);
    }
    head.push_str(&escape(slice(s, lo..mark_start)));
    out.push_str(&backend.paint(base, &head));
    out.push_str(&backend.paint(accent, &escape(slice(s, mark_start..mark_end))));
    let mut tail = escape(slice(s, mark_end..hi));
    if hi < s.len() {
        tail.push_str(ELLIPSIS);
    }
    tail.push('"');
    out.push_str(&backend.paint(base, &tail));
    out
}

/// The span as it applies to one side, widened to the side's end when the
/// divergence reaches the end of the shorter string.
fn side_range(s: &str, span: Span, overlap: usize) -> Range<usize> {
    let start = span.start.min(s.len());
    let mut end = if span.end >= overlap {
        s.len()
    } else {
        span.end.min(s.len())
    };
    while end < s.len() && !s.is_char_boundary(end) {
        end += 1;
    }
    start..end.max(start)
}

fn slice(s: &str, range: Range<usize>) -> &str {
    s.get(range).unwrap_or_default()
}

fn escape(s: &str) -> String {
    let quoted = format!("{s:?}");
    quoted[1..quoted.len() - 1].to_string()
}

/// Unified line diff from `want` to `got`, for multi-line strings only.
pub(crate) fn line_diff(
    backend: &dyn ColorBackend,
    got: &str,
    want: &str,
    context_lines: usize,
) -> Option<String> {
    if !got.contains('\n') && !want.contains('\n') {
        return None;
    }

    let diff = TextDiff::from_lines(want, got);
    let mut lines = Vec::new();
    for (i, group) in diff.grouped_ops(context_lines).iter().enumerate() {
        if i > 0 {
            lines.push("    ...".to_string());
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let line = change.value().trim_end_matches('\n');
                let text = match change.tag() {
                    ChangeTag::Delete => backend.paint(Role::Want, &format!("-{line}")),
                    ChangeTag::Insert => backend.paint(Role::Got, &format!("+{line}")),
                    ChangeTag::Equal => format!(" {line}"),
                };
                lines.push(format!("    {text}"));
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
