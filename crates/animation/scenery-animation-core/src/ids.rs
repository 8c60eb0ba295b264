//! Opaque handles for clips, bindings and playing instances.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

macro_rules! engine_id {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.0)
            }
        }
    };
}

engine_id!(
    /// A clip registered by some binding. Clips are never shared between bindings.
    ClipId,
    "clip"
);
engine_id!(BindingId, "binding");
engine_id!(
    /// One running playback of a clip.
    InstanceId,
    "inst"
);

/// Hands out ids of one kind in increasing order.
#[derive(Debug)]
pub struct IdSeq<T> {
    next: u32,
    _kind: PhantomData<T>,
}

impl<T> Default for IdSeq<T> {
    fn default() -> Self {
        Self {
            next: 0,
            _kind: PhantomData,
        }
    }
}

impl<T: From<u32>> IdSeq<T> {
    #[inline]
    pub fn next_id(&mut self) -> T {
        let raw = self.next;
        self.next = self.next.wrapping_add(1);
        T::from(raw)
    }
}
