//! Emptiness test used by the legacy cache acceptance policy.
//!
//! A loaded value is "falsy" when it is empty, zero, `false` or `None`.
//! Memoized values only need this when the wrapper is asked to treat such
//! values as a cache miss.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Values that can be empty
pub trait Truthy {
    /// `false` for empty or zero values
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for () {
    fn is_truthy(&self) -> bool {
        false
    }
}

macro_rules! impl_truthy_int {
    ($($t:ty),*) => {
        $(impl Truthy for $t {
            fn is_truthy(&self) -> bool {
                *self != 0
            }
        })*
    };
}

impl_truthy_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Truthy for f32 {
    fn is_truthy(&self) -> bool {
        *self != 0.0
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for [T] {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for VecDeque<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V, S> Truthy for HashMap<K, V, S> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V> Truthy for BTreeMap<K, V> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T, S> Truthy for HashSet<T, S> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for BTreeSet<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T: Truthy + ?Sized> Truthy for Box<T> {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_are_falsy() {
        assert!(!Vec::<u8>::new().is_truthy());
        assert!(!String::new().is_truthy());
        assert!(!0i32.is_truthy());
        assert!(!0.0f64.is_truthy());
        assert!(!false.is_truthy());
        assert!(!HashMap::<String, u8>::new().is_truthy());
        assert!(!None::<u8>.is_truthy());
        assert!(!Some(0u8).is_truthy());
    }

    #[test]
    fn test_non_empty_values_are_truthy() {
        assert!(vec![1, 2, 3].is_truthy());
        assert!("Hello, World!".is_truthy());
        assert!((-1i64).is_truthy());
        assert!(Some(vec![0u8]).is_truthy());
        assert!(Box::new(true).is_truthy());
    }
}
