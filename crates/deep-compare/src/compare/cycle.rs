use std::collections::HashSet;

use log::trace;

use crate::reflect::{Identity, TypeInfo, View};

/// Identity pairs already entered during one comparison.
///
/// Revisiting a pair is assumed equal, which is what stops the walk on
/// cyclic values. Pairs are stored in canonical order so that operand order
/// does not matter.
#[derive(Debug, Default)]
pub(crate) struct CycleGuard {
    visits: HashSet<(Identity, Identity, TypeInfo)>,
}

impl CycleGuard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a visit of `(got, want)`.
    ///
    /// Returns `false` when the pair was visited before. Views without a
    /// storage identity on both sides are always entered.
    pub(crate) fn enter(&mut self, got: &View<'_>, want: &View<'_>, ty: TypeInfo) -> bool {
        let (Some(a), Some(b)) = (got.identity(), want.identity()) else {
            return true;
        };
        let key = if a <= b { (a, b, ty) } else { (b, a, ty) };
        if self.visits.insert(key) {
            true
        } else {
            trace!("Revisiting {} pair, assuming equal", ty.name());
            false
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.visits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::Reflect;
    use std::rc::Rc;

    #[test]
    fn test_repeat_visit_is_rejected() {
        let a = Rc::new(1u32);
        let b = Rc::new(1u32);
        let ty = TypeInfo::of(&a);
        let mut guard = CycleGuard::new();

        assert!(guard.enter(&a.view(), &b.view(), ty));
        assert!(!guard.enter(&a.view(), &b.view(), ty));
        // Operand order is irrelevant.
        assert!(!guard.enter(&b.view(), &a.view(), ty));
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn test_type_distinguishes_pairs() {
        let a = Rc::new(1u32);
        let b = Rc::new(1u32);
        let mut guard = CycleGuard::new();

        assert!(guard.enter(&a.view(), &b.view(), TypeInfo::of(&a)));
        assert!(guard.enter(&a.view(), &b.view(), TypeInfo::of(&1u32)));
    }

    #[test]
    fn test_values_without_identity_always_enter() {
        let mut guard = CycleGuard::new();
        let ty = TypeInfo::of(&1u8);
        assert!(guard.enter(&1u8.view(), &1u8.view(), ty));
        assert!(guard.enter(&1u8.view(), &1u8.view(), ty));
        assert_eq!(guard.len(), 0);
    }
}
