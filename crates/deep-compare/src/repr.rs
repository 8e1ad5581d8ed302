//! Compact textual representation of reflected values for diagnostics.
//!
//! Output is bounded in both depth and width so that huge or cyclic values
//! still produce a one-line description. Pointers and polymorphic holders do
//! not count towards depth, so a holder already being described prints as
//! `<cycle>`.

use std::fmt::Write;

use crate::reflect::{Identity, Reflect, Sequence, TypeInfo, View};

const MAX_DEPTH: usize = 3;
const MAX_ITEMS: usize = 8;
const ELIDED: &str = "…";

/// Describe `value` on a single line.
///
/// Queues are described by their buffered count and are never drained.
pub fn describe(value: &dyn Reflect) -> String {
    let mut writer = Writer::default();
    writer.value(value, 0);
    writer.out
}

#[derive(Default)]
struct Writer {
    out: String,
    /// Pointers and holders on the current descent. A pointer shares its
    /// address with its pointee, so entries are keyed by type as well.
    entered: Vec<(Identity, TypeInfo)>,
}

impl Writer {
    fn value(&mut self, value: &dyn Reflect, depth: usize) {
        match value.view() {
            View::Scalar(scalar) => {
                let _ = write!(self.out, "{scalar}");
            }
            View::Str(s) => {
                let _ = write!(self.out, "{s:?}");
            }
            View::Array(seq) => self.seq(seq, depth),
            View::Slice(seq) if seq.is_nil() => self.out.push_str("<nil>"),
            View::Slice(seq) => self.seq(seq, depth),
            View::Map(map) if map.is_nil() => self.out.push_str("<nil>"),
            View::Map(map) => {
                if depth >= MAX_DEPTH && map.len() > 0 {
                    let _ = write!(self.out, "{{{ELIDED}}}");
                    return;
                }
                self.out.push('{');
                for (i, key) in map.keys().into_iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    if i == MAX_ITEMS {
                        self.out.push_str(ELIDED);
                        break;
                    }
                    self.value(key, depth + 1);
                    self.out.push_str(": ");
                    match map.get(key) {
                        Some(item) => self.value(item, depth + 1),
                        None => self.out.push_str("<absent>"),
                    }
                }
                self.out.push('}');
            }
            View::Struct(record) => {
                self.out.push_str(&TypeInfo::of(value).short_name());
                if let Some(variant) = record.variant_name() {
                    let _ = write!(self.out, "::{variant}");
                }
                let fields = record.fields();
                if fields.is_empty() {
                    return;
                }
                if depth >= MAX_DEPTH {
                    let _ = write!(self.out, " {{ {ELIDED} }}");
                    return;
                }
                self.out.push_str(" { ");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    if i == MAX_ITEMS {
                        self.out.push_str(ELIDED);
                        break;
                    }
                    let _ = write!(self.out, "{}: ", field.name);
                    self.value(field.value, depth + 1);
                }
                self.out.push_str(" }");
            }
            View::Timestamp(ts) => self.out.push_str(&ts.to_rfc3339()),
            View::Pointer(ptr) => match ptr.target {
                Some(target) => {
                    self.out.push('&');
                    self.holder(value, ptr.identity, target, depth);
                }
                None => self.out.push_str("<nil>"),
            },
            View::Dynamic(dynamic) => match dynamic.inner {
                Some(inner) => self.holder(value, dynamic.identity, inner, depth),
                None => self.out.push_str("<nil>"),
            },
            View::Func { is_nil: true } => self.out.push_str("<nil>"),
            View::Func { is_nil: false } => {
                let _ = write!(self.out, "<{}>", TypeInfo::of(value).short_name());
            }
            View::Chan(queue) => {
                let _ = write!(self.out, "<chan len={}>", queue.len());
            }
        }
    }

    /// Describe the target of a pointer or holder at the holder's own depth.
    fn holder(
        &mut self,
        holder: &dyn Reflect,
        identity: Option<Identity>,
        target: &dyn Reflect,
        depth: usize,
    ) {
        let Some(identity) = identity else {
            self.value(target, depth);
            return;
        };
        let key = (identity, TypeInfo::of(holder));
        if self.entered.contains(&key) {
            self.out.push_str("<cycle>");
            return;
        }
        self.entered.push(key);
        self.value(target, depth);
        self.entered.pop();
    }

    fn seq(&mut self, seq: &dyn Sequence, depth: usize) {
        let len = seq.len();
        if depth >= MAX_DEPTH && len > 0 {
            let _ = write!(self.out, "[{ELIDED}]");
            return;
        }
        self.out.push('[');
        for i in 0..len.min(MAX_ITEMS) {
            if i > 0 {
                self.out.push_str(", ");
            }
            match seq.get(i) {
                Some(item) => self.value(item, depth + 1),
                None => self.out.push_str("<absent>"),
            }
        }
        if len > MAX_ITEMS {
            self.out.push_str(", ");
            self.out.push_str(ELIDED);
        }
        self.out.push(']');
    }
}
