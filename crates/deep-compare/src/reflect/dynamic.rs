use std::fmt;

use super::{Dynamic, Identity, Reflect, View};

/// Nullable holder for a value of any reflected type.
///
/// Two `Dyn`s always have the same static type; comparison unwraps them and
/// checks the concrete types they hold.
#[derive(Default)]
pub struct Dyn(Option<Box<dyn Reflect>>);

impl Dyn {
    pub fn new(value: impl Reflect) -> Self {
        Self(Some(Box::new(value)))
    }

    pub fn nil() -> Self {
        Self(None)
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<&dyn Reflect> {
        self.0.as_deref()
    }
}

impl fmt::Debug for Dyn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => write!(f, "Dyn({})", crate::repr::describe(value)),
            None => f.write_str("Dyn(<nil>)"),
        }
    }
}

impl Reflect for Dyn {
    fn view(&self) -> View<'_> {
        View::Dynamic(Dynamic {
            identity: Identity::of(self),
            inner: self.get(),
        })
    }
}
