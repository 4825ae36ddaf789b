use crate::graph::index_store::Index;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! index_type {
    ($name:ident, $prefix:literal) => {
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
        pub struct $name(pub usize);

        impl From<usize> for $name {
            fn from(n: usize) -> Self {
                $name(n)
            }
        }

        impl From<$name> for usize {
            fn from(i: $name) -> usize {
                i.0
            }
        }

        impl Index for $name {}

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

index_type!(VertexI, "v");
index_type!(EdgeI, "e");
index_type!(FaceI, "f");
