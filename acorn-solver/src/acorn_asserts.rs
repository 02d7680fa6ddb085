#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const ACORN_ASSERT_LEVEL_DEFINITION: u8 = ACORN_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const ACORN_ASSERT_LEVEL_DEFINITION: u8 = ACORN_ASSERT_MODERATE;

pub const ACORN_ASSERT_SIMPLE: u8 = 1;
pub const ACORN_ASSERT_MODERATE: u8 = 2;

/// Cheap preconditions, always compiled in.
#[macro_export]
#[doc(hidden)]
macro_rules! acorn_assert_simple {
    ($($arg:tt)*) => {
        if $crate::ACORN_ASSERT_LEVEL_DEFINITION >= $crate::ACORN_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

/// Whole-structure invariant rechecks, active in tests and with the
/// `debug-checks` feature.
#[macro_export]
#[doc(hidden)]
macro_rules! acorn_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::ACORN_ASSERT_LEVEL_DEFINITION >= $crate::ACORN_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}
