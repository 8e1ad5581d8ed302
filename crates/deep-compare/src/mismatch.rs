//! Typed mismatch records and their collector.

use std::fmt;

use crate::path::Path;
use crate::reflect::Kind;
use crate::render::{self, ColorBackend, PlainBackend, RenderOptions, Role};
use crate::string_diff::Span;

/// Category of a [`Mismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MismatchKind {
    Validity,
    Type,
    Nil,
    Length,
    Func,
    Value,
    Zero,
    String,
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MismatchKind::Validity => "Validity",
            MismatchKind::Type => "Type",
            MismatchKind::Nil => "Nil",
            MismatchKind::Length => "Length",
            MismatchKind::Func => "Func",
            MismatchKind::Value => "Value",
            MismatchKind::Zero => "Zero",
            MismatchKind::String => "String",
        };
        f.write_str(name)
    }
}

/// One point where `got` diverges from `want`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// One side is absent.
    Validity {
        path: Path,
        got: Option<String>,
        want: Option<String>,
    },
    /// Runtime types differ. Carries short type names.
    Type {
        path: Path,
        got: String,
        want: String,
    },
    /// Exactly one side is nil.
    Nil {
        path: Path,
        got: Option<String>,
        want: Option<String>,
    },
    Length {
        path: Path,
        got: usize,
        want: usize,
        kind: Kind,
    },
    /// Callables never match unless both are nil.
    Func {
        path: Path,
        got: Option<String>,
        want: Option<String>,
    },
    Value {
        path: Path,
        got: String,
        want: String,
    },
    /// Zero-ness differs for a field compared in zero-only mode.
    Zero {
        path: Path,
        got_is_zero: bool,
        want_is_zero: bool,
    },
    String {
        path: Path,
        got: String,
        want: String,
        span: Option<Span>,
    },
}

impl Mismatch {
    pub fn kind(&self) -> MismatchKind {
        match self {
            Mismatch::Validity { .. } => MismatchKind::Validity,
            Mismatch::Type { .. } => MismatchKind::Type,
            Mismatch::Nil { .. } => MismatchKind::Nil,
            Mismatch::Length { .. } => MismatchKind::Length,
            Mismatch::Func { .. } => MismatchKind::Func,
            Mismatch::Value { .. } => MismatchKind::Value,
            Mismatch::Zero { .. } => MismatchKind::Zero,
            Mismatch::String { .. } => MismatchKind::String,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Mismatch::Validity { path, .. }
            | Mismatch::Type { path, .. }
            | Mismatch::Nil { path, .. }
            | Mismatch::Length { path, .. }
            | Mismatch::Func { path, .. }
            | Mismatch::Value { path, .. }
            | Mismatch::Zero { path, .. }
            | Mismatch::String { path, .. } => path,
        }
    }

    /// Render as a single diagnostic line, followed by a line diff for
    /// multi-line strings when requested.
    pub fn render(&self, options: &RenderOptions) -> String {
        self.render_with(options.backend(), options)
    }

    fn render_with(&self, backend: &dyn ColorBackend, options: &RenderOptions) -> String {
        let got = |text: &str| backend.paint(Role::Got, text);
        let want = |text: &str| backend.paint(Role::Want, text);
        let or_placeholder = |text: &Option<String>, role: Role, word: &str| match text {
            Some(text) => backend.paint(role, text),
            None => render::placeholder(backend, word),
        };

        let (got_text, want_text, extra) = match self {
            Mismatch::Validity { got: g, want: w, .. } => (
                or_placeholder(g, Role::Got, "absent"),
                or_placeholder(w, Role::Want, "absent"),
                None,
            ),
            Mismatch::Type { got: g, want: w, .. } | Mismatch::Value { got: g, want: w, .. } => {
                (got(g), want(w), None)
            }
            Mismatch::Nil { got: g, want: w, .. } => (
                or_placeholder(g, Role::Got, "nil"),
                or_placeholder(w, Role::Want, "nil"),
                None,
            ),
            Mismatch::Length {
                got: g,
                want: w,
                kind,
                ..
            } => (
                got(&g.to_string()),
                want(&w.to_string()),
                Some(format!("kind={kind}")),
            ),
            Mismatch::Func { got: g, want: w, .. } => (
                or_placeholder(g, Role::Got, "nil"),
                or_placeholder(w, Role::Want, "nil"),
                Some("can only match if both are <nil>".to_string()),
            ),
            Mismatch::Zero {
                got_is_zero,
                want_is_zero,
                ..
            } => (
                render::placeholder(backend, zero_word(*got_is_zero)),
                render::placeholder(backend, zero_word(*want_is_zero)),
                Some("both values must be either zero or non-zero".to_string()),
            ),
            Mismatch::String {
                got: g,
                want: w,
                span,
                ..
            } => {
                let (got_text, want_text) = render::string_pair(backend, options, g, w, *span);
                (got_text, want_text, span.map(|span| format!("span={span}")))
            }
        };

        let mut line = format!(
            "{}: {} mismatch; got={}, want={}",
            self.path().render(backend),
            self.kind(),
            got_text,
            want_text
        );
        if let Some(extra) = extra {
            line.push_str(", ");
            line.push_str(&extra);
        }
        if let (Mismatch::String { got, want, .. }, Some(context)) = (self, options.context_lines) {
            if let Some(diff) = render::line_diff(backend, got, want, context) {
                line.push('\n');
                line.push_str(&diff);
            }
        }
        line
    }
}

fn zero_word(is_zero: bool) -> &'static str {
    if is_zero {
        "zero"
    } else {
        "non-zero"
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(&PlainBackend, &RenderOptions::plain()))
    }
}

impl std::error::Error for Mismatch {}

/// Mismatches of one comparison, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mismatches(Vec<Mismatch>);

impl Mismatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, mismatch: Mismatch) {
        self.0.push(mismatch);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mismatch> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Mismatch] {
        &self.0
    }

    pub fn kinds(&self) -> Vec<MismatchKind> {
        self.0.iter().map(Mismatch::kind).collect()
    }

    /// `Ok` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// One rendered record per line.
    pub fn render(&self, options: &RenderOptions) -> String {
        let backend = options.backend();
        self.0
            .iter()
            .map(|mismatch| mismatch.render_with(backend, options))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Mismatches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RenderOptions::plain()))
    }
}

impl std::error::Error for Mismatches {}

impl IntoIterator for Mismatches {
    type Item = Mismatch;
    type IntoIter = std::vec::IntoIter<Mismatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mismatches {
    type Item = &'a Mismatch;
    type IntoIter = std::slice::Iter<'a, Mismatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
