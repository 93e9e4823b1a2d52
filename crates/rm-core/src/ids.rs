//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are zero-based, `Copy + Ord + Hash`, and index directly into the
//! roster `Vec`s that own the corresponding state.  Workload files number
//! tasks and resources from 1; the loader converts on the way in and
//! `Display` converts back on the way out, so log lines and reports match the
//! input file.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $label:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The 1-based number used in workload files and reports.
            #[inline]
            pub fn number(self) -> u64 {
                self.0 as u64 + 1
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", $label, self.number())
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a task in the task roster.
    pub struct TaskId(u32) => "task";
}

typed_id! {
    /// Index of a resource type in the resource roster.
    pub struct ResourceId(u32) => "resource";
}

typed_id! {
    /// Position of a step in the program arena (file order).
    pub struct StepId(u32) => "step";
}
