use log::{debug, trace};

use crate::compare::cycle::CycleGuard;
use crate::config::{Config, FieldRule};
use crate::mismatch::{Mismatch, Mismatches};
use crate::path::{Path, PathNode};
use crate::reflect::{
    Dynamic, Kind, Mapping, Pointer, Queue, Record, Reflect, Sequence, TypeInfo, View,
};
use crate::repr::describe;
use crate::string_diff;

/// How the next comparison step treats its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Full,
    /// Compare zero-ness only. Applies to exactly one step.
    ZeroOnly,
}

/// State of a single comparison call.
pub(crate) struct Comparison<'c> {
    config: &'c Config,
    mismatches: Mismatches,
    guard: CycleGuard,
    path: Path,
    /// Values received from queues. Kept alive until the call returns so that
    /// the identities recorded by the guard stay unique.
    retained: Vec<Box<dyn Reflect>>,
}

impl<'c> Comparison<'c> {
    pub(crate) fn new(config: &'c Config, path: Path) -> Self {
        Self {
            config,
            mismatches: Mismatches::new(),
            guard: CycleGuard::new(),
            path,
            retained: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Mismatches {
        self.mismatches
    }

    pub(crate) fn compare(
        &mut self,
        got: Option<&dyn Reflect>,
        want: Option<&dyn Reflect>,
        mode: Mode,
    ) {
        let (got, want) = match (got, want) {
            (Some(got), Some(want)) => (got, want),
            (None, None) => return,
            (got, want) => {
                self.record(|path| Mismatch::Validity {
                    path,
                    got: got.map(describe),
                    want: want.map(describe),
                });
                return;
            }
        };

        let ty = TypeInfo::of(want);
        if TypeInfo::of(got) != ty {
            self.record(|path| Mismatch::Type {
                path,
                got: TypeInfo::of(got).short_name(),
                want: ty.short_name(),
            });
            return;
        }

        let got_view = got.view();
        let want_view = want.view();
        trace!("Comparing {} at {}", ty.name(), self.path);

        if !self.guard.enter(&got_view, &want_view, ty) {
            return;
        }

        if mode == Mode::ZeroOnly {
            let (got_is_zero, want_is_zero) = (got_view.is_zero(), want_view.is_zero());
            if got_is_zero != want_is_zero {
                self.record(|path| Mismatch::Zero {
                    path,
                    got_is_zero,
                    want_is_zero,
                });
            }
            return;
        }

        match (got_view, want_view) {
            (View::Scalar(g), View::Scalar(w)) => {
                if g != w {
                    self.record(|path| Mismatch::Value {
                        path,
                        got: g.to_string(),
                        want: w.to_string(),
                    });
                }
            }
            (View::Str(g), View::Str(w)) => {
                if g != w {
                    self.record(|path| Mismatch::String {
                        path,
                        got: g.to_string(),
                        want: w.to_string(),
                        span: string_diff::locate(g, w),
                    });
                }
            }
            (View::Array(g), View::Array(w)) => self.compare_sequence(g, w, Kind::Array),
            (View::Slice(g), View::Slice(w)) => self.compare_slice(got, want, g, w),
            (View::Map(g), View::Map(w)) => self.compare_map(got, want, g, w),
            (View::Struct(g), View::Struct(w)) => self.compare_record(got, want, &g, &w),
            (View::Timestamp(g), View::Timestamp(w)) => {
                if g != w {
                    self.record(|path| Mismatch::Value {
                        path,
                        got: g.to_rfc3339(),
                        want: w.to_rfc3339(),
                    });
                }
            }
            (View::Pointer(g), View::Pointer(w)) => self.compare_pointer(g, w),
            (View::Dynamic(g), View::Dynamic(w)) => self.compare_dynamic(g, w),
            (View::Func { is_nil: g }, View::Func { is_nil: w }) => {
                if !(g && w) {
                    let name = ty.short_name();
                    self.record(|path| Mismatch::Func {
                        path,
                        got: (!g).then(|| name.clone()),
                        want: (!w).then_some(name),
                    });
                }
            }
            (View::Chan(g), View::Chan(w)) => self.compare_queue(g, w),
            (g, w) => {
                self.record(|path| Mismatch::Type {
                    path,
                    got: g.kind().to_string(),
                    want: w.kind().to_string(),
                });
            }
        }
    }

    fn record(&mut self, build: impl FnOnce(Path) -> Mismatch) {
        let mismatch = build(self.path.clone());
        debug!("Recorded {} mismatch at {}", mismatch.kind(), mismatch.path());
        self.mismatches.push(mismatch);
    }

    fn descend(&mut self, node: PathNode, step: impl FnOnce(&mut Self)) {
        self.path.push(node);
        step(self);
        self.path.pop();
    }

    fn compare_slice(
        &mut self,
        got: &dyn Reflect,
        want: &dyn Reflect,
        got_seq: &dyn Sequence,
        want_seq: &dyn Sequence,
    ) {
        let same = got_seq.identity().is_some()
            && got_seq.identity() == want_seq.identity()
            && got_seq.len() == want_seq.len();
        if same {
            return;
        }
        if got_seq.is_nil() != want_seq.is_nil() {
            self.record_nil(got, got_seq.is_nil(), want, want_seq.is_nil());
            return;
        }
        self.compare_sequence(got_seq, want_seq, Kind::Slice);
    }

    fn compare_sequence(&mut self, got: &dyn Sequence, want: &dyn Sequence, kind: Kind) {
        if got.len() != want.len() {
            self.record(|path| Mismatch::Length {
                path,
                got: got.len(),
                want: want.len(),
                kind,
            });
            return;
        }

        if self.config.ignore_array_order {
            self.compare_unordered(got, want);
            return;
        }

        for i in 0..want.len() {
            self.descend(PathNode::Index(i), |cmp| {
                cmp.compare(got.get(i), want.get(i), Mode::Full)
            });
        }
    }

    /// Greedy multiset match: each `want` element takes the first remaining
    /// `got` element that compares equal on its own.
    fn compare_unordered(&mut self, got: &dyn Sequence, want: &dyn Sequence) {
        let mut pool: Vec<usize> = (0..got.len()).collect();
        for i in 0..want.len() {
            let item = want.get(i);
            let found = pool
                .iter()
                .position(|&j| self.config.equals(got.get(j), item));
            match found {
                Some(pos) => {
                    pool.remove(pos);
                }
                None => self.descend(PathNode::Index(i), |cmp| {
                    cmp.record(|path| Mismatch::Nil {
                        path,
                        got: None,
                        want: item.map(describe),
                    })
                }),
            }
        }
    }

    fn compare_map(
        &mut self,
        got: &dyn Reflect,
        want: &dyn Reflect,
        got_map: &dyn Mapping,
        want_map: &dyn Mapping,
    ) {
        if got_map.identity().is_some() && got_map.identity() == want_map.identity() {
            return;
        }
        if got_map.is_nil() != want_map.is_nil() {
            self.record_nil(got, got_map.is_nil(), want, want_map.is_nil());
            return;
        }
        if got_map.len() != want_map.len() {
            self.record(|path| Mismatch::Length {
                path,
                got: got_map.len(),
                want: want_map.len(),
                kind: Kind::Map,
            });
            return;
        }

        for key in want_map.keys() {
            let (got_item, want_item) = (got_map.get(key), want_map.get(key));
            self.descend(PathNode::Key(describe(key)), |cmp| match (got_item, want_item) {
                (Some(_), Some(_)) => cmp.compare(got_item, want_item, Mode::Full),
                _ => cmp.record(|path| Mismatch::Validity {
                    path,
                    got: got_item.map(describe),
                    want: want_item.map(describe),
                }),
            });
        }
    }

    fn compare_record(
        &mut self,
        got: &dyn Reflect,
        want: &dyn Reflect,
        got_record: &Record<'_>,
        want_record: &Record<'_>,
    ) {
        if got_record.variant_name() != want_record.variant_name() {
            self.record(|path| Mismatch::Value {
                path,
                got: describe(got),
                want: describe(want),
            });
            return;
        }

        for (i, field) in want_record.fields().iter().enumerate() {
            let mode = match self.config.field_rule(field) {
                FieldRule::Skip => continue,
                FieldRule::ZeroOnly => Mode::ZeroOnly,
                FieldRule::Compare => Mode::Full,
            };
            let got_field = got_record
                .fields()
                .get(i)
                .filter(|f| f.name == field.name)
                .or_else(|| got_record.fields().iter().find(|f| f.name == field.name));
            self.descend(PathNode::Field(field.name), |cmp| {
                cmp.compare(got_field.map(|f| f.value), Some(field.value), mode)
            });
        }
    }

    fn compare_pointer(&mut self, got: Pointer<'_>, want: Pointer<'_>) {
        if got.identity.is_some() && got.identity == want.identity {
            return;
        }
        self.compare(got.target, want.target, Mode::Full);
    }

    fn compare_dynamic(&mut self, got: Dynamic<'_>, want: Dynamic<'_>) {
        match (got.inner, want.inner) {
            (Some(_), None) | (None, Some(_)) => {
                self.record(|path| Mismatch::Nil {
                    path,
                    got: got.inner.map(describe),
                    want: want.inner.map(describe),
                });
            }
            (got, want) => self.compare(got, want, Mode::Full),
        }
    }

    /// Receives from both queues, so comparing drains them.
    fn compare_queue(&mut self, got: &dyn Queue, want: &dyn Queue) {
        let len = want.len();
        if got.len() != len {
            self.record(|path| Mismatch::Length {
                path,
                got: got.len(),
                want: len,
                kind: Kind::Chan,
            });
            return;
        }

        for i in 0..len {
            let got_item = got.recv();
            let want_item = want.recv();
            self.descend(PathNode::ChannelPosition(i + 1), |cmp| {
                cmp.compare(got_item.as_deref(), want_item.as_deref(), Mode::Full)
            });
            self.retained.extend(got_item);
            self.retained.extend(want_item);
        }
    }

    fn record_nil(&mut self, got: &dyn Reflect, got_nil: bool, want: &dyn Reflect, want_nil: bool) {
        self.record(|path| Mismatch::Nil {
            path,
            got: (!got_nil).then(|| describe(got)),
            want: (!want_nil).then(|| describe(want)),
        });
    }
}

impl Config {
    /// Independent comparison with a fresh collector and cycle guard.
    pub(crate) fn equals(&self, got: Option<&dyn Reflect>, want: Option<&dyn Reflect>) -> bool {
        let mut cmp = Comparison::new(self, Path::new());
        cmp.compare(got, want, Mode::Full);
        cmp.finish().is_empty()
    }
}

/// Path root for a top-level comparison, named after the `want` type.
pub(crate) fn root_path(want: Option<&dyn Reflect>) -> Path {
    Path::root(want.map(|w| TypeInfo::of(w).short_name()))
}
