//! [`Reflect`] implementations for std and ecosystem types.

use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use chrono::{DateTime, FixedOffset, Local, Utc};
use tokio::sync::mpsc;

use super::{Dynamic, Identity, Mapping, Pointer, Queue, Reflect, Scalar, Sequence, View};

macro_rules! reflect_scalar {
    ($($ty:ty => $variant:ident($as:ty)),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn view(&self) -> View<'_> {
                    View::Scalar(Scalar::$variant(*self as $as))
                }
            }
        )*
    };
}

reflect_scalar! {
    i8 => Int(i128),
    i16 => Int(i128),
    i32 => Int(i128),
    i64 => Int(i128),
    i128 => Int(i128),
    isize => Int(i128),
    u8 => Uint(u128),
    u16 => Uint(u128),
    u32 => Uint(u128),
    u64 => Uint(u128),
    u128 => Uint(u128),
    usize => Uint(u128),
    f32 => F32(f32),
    f64 => F64(f64),
}

impl Reflect for bool {
    fn view(&self) -> View<'_> {
        View::Scalar(Scalar::Bool(*self))
    }
}

impl Reflect for char {
    fn view(&self) -> View<'_> {
        View::Scalar(Scalar::Char(*self))
    }
}

impl Reflect for () {
    fn view(&self) -> View<'_> {
        View::Scalar(Scalar::Unit)
    }
}

impl Reflect for String {
    fn view(&self) -> View<'_> {
        View::Str(self)
    }
}

impl Reflect for &'static str {
    fn view(&self) -> View<'_> {
        View::Str(self)
    }
}

impl Reflect for Box<str> {
    fn view(&self) -> View<'_> {
        View::Str(self)
    }
}

// Sequences

impl<T: Reflect> Sequence for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|item| item as &dyn Reflect)
    }

    fn identity(&self) -> Option<Identity> {
        Identity::of(self.as_slice())
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn view(&self) -> View<'_> {
        View::Slice(self)
    }
}

impl<T: Reflect> Sequence for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        VecDeque::get(self, index).map(|item| item as &dyn Reflect)
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn view(&self) -> View<'_> {
        View::Slice(self)
    }
}

impl<T: Reflect, const N: usize> Sequence for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|item| item as &dyn Reflect)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn view(&self) -> View<'_> {
        View::Array(self)
    }
}

// Maps

impl<K, V, S> Mapping for HashMap<K, V, S>
where
    K: Reflect + Eq + Hash,
    V: Reflect,
    S: BuildHasher + 'static,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn keys(&self) -> Vec<&dyn Reflect> {
        HashMap::keys(self).map(|k| k as &dyn Reflect).collect()
    }

    fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect> {
        let key: &dyn std::any::Any = key;
        let key = key.downcast_ref::<K>()?;
        HashMap::get(self, key).map(|v| v as &dyn Reflect)
    }

    fn identity(&self) -> Option<Identity> {
        Identity::of(self)
    }
}

impl<K, V, S> Reflect for HashMap<K, V, S>
where
    K: Reflect + Eq + Hash,
    V: Reflect,
    S: BuildHasher + 'static,
{
    fn view(&self) -> View<'_> {
        View::Map(self)
    }
}

impl<K: Reflect + Ord, V: Reflect> Mapping for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn keys(&self) -> Vec<&dyn Reflect> {
        BTreeMap::keys(self).map(|k| k as &dyn Reflect).collect()
    }

    fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect> {
        let key: &dyn std::any::Any = key;
        let key = key.downcast_ref::<K>()?;
        BTreeMap::get(self, key).map(|v| v as &dyn Reflect)
    }

    fn identity(&self) -> Option<Identity> {
        Identity::of(self)
    }
}

impl<K: Reflect + Ord, V: Reflect> Reflect for BTreeMap<K, V> {
    fn view(&self) -> View<'_> {
        View::Map(self)
    }
}

// Pointers

impl<T: Reflect> Reflect for Option<T> {
    fn view(&self) -> View<'_> {
        View::Pointer(Pointer {
            identity: None,
            target: self.as_ref().map(|v| v as &dyn Reflect),
        })
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn view(&self) -> View<'_> {
        View::Pointer(Pointer::to(self.as_ref()))
    }
}

impl<T: Reflect> Reflect for Rc<T> {
    fn view(&self) -> View<'_> {
        View::Pointer(Pointer::to(self.as_ref()))
    }
}

impl<T: Reflect> Reflect for Arc<T> {
    fn view(&self) -> View<'_> {
        View::Pointer(Pointer::to(self.as_ref()))
    }
}

impl<T: Reflect> Reflect for &'static T {
    fn view(&self) -> View<'_> {
        View::Pointer(Pointer::to(*self))
    }
}

impl<T: Reflect> Reflect for OnceCell<T> {
    fn view(&self) -> View<'_> {
        View::Pointer(Pointer {
            identity: Identity::of(self),
            target: self.get().map(|v| v as &dyn Reflect),
        })
    }
}

impl<T: Reflect> Reflect for OnceLock<T> {
    fn view(&self) -> View<'_> {
        View::Pointer(Pointer {
            identity: Identity::of(self),
            target: self.get().map(|v| v as &dyn Reflect),
        })
    }
}

impl Reflect for Box<dyn Reflect> {
    fn view(&self) -> View<'_> {
        View::Dynamic(Dynamic {
            identity: Identity::of(self),
            inner: Some(self.as_ref()),
        })
    }
}

// Callables

macro_rules! reflect_fn {
    ($($arg:ident),*) => {
        impl<R: 'static, $($arg: 'static),*> Reflect for fn($($arg),*) -> R {
            fn view(&self) -> View<'_> {
                View::Func { is_nil: false }
            }
        }
    };
}

reflect_fn!();
reflect_fn!(A);
reflect_fn!(A, B);
reflect_fn!(A, B, C);

// Timestamps

macro_rules! reflect_datetime {
    ($($tz:ty),*) => {
        $(
            impl Reflect for DateTime<$tz> {
                fn view(&self) -> View<'_> {
                    View::Timestamp(self.fixed_offset())
                }
            }
        )*
    };
}

reflect_datetime!(Utc, FixedOffset, Local);

// Queues

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Reflect> Queue for Mutex<VecDeque<T>> {
    fn len(&self) -> usize {
        lock(self).len()
    }

    fn recv(&self) -> Option<Box<dyn Reflect>> {
        lock(self)
            .pop_front()
            .map(|item| Box::new(item) as Box<dyn Reflect>)
    }
}

impl<T: Reflect> Reflect for Mutex<VecDeque<T>> {
    fn view(&self) -> View<'_> {
        View::Chan(self)
    }
}

impl<T: Reflect> Queue for Mutex<mpsc::Receiver<T>> {
    fn len(&self) -> usize {
        lock(self).len()
    }

    fn recv(&self) -> Option<Box<dyn Reflect>> {
        lock(self)
            .try_recv()
            .ok()
            .map(|item| Box::new(item) as Box<dyn Reflect>)
    }
}

impl<T: Reflect> Reflect for Mutex<mpsc::Receiver<T>> {
    fn view(&self) -> View<'_> {
        View::Chan(self)
    }
}

impl<T: Reflect> Queue for Mutex<mpsc::UnboundedReceiver<T>> {
    fn len(&self) -> usize {
        lock(self).len()
    }

    fn recv(&self) -> Option<Box<dyn Reflect>> {
        lock(self)
            .try_recv()
            .ok()
            .map(|item| Box::new(item) as Box<dyn Reflect>)
    }
}

impl<T: Reflect> Reflect for Mutex<mpsc::UnboundedReceiver<T>> {
    fn view(&self) -> View<'_> {
        View::Chan(self)
    }
}
