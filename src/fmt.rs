//! Logging shims.
//!
//! Each macro forwards to `defmt` when the `defmt` feature is enabled and
//! expands to nothing otherwise, so call sites never need their own `cfg`.

#![allow(unused)]

macro_rules! trace {
    ($($tt:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($tt)*);
    };
}

macro_rules! debug {
    ($($tt:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($tt)*);
    };
}

macro_rules! warning {
    ($($tt:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($tt)*);
    };
}

macro_rules! error {
    ($($tt:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::error!($($tt)*);
    };
}

pub(crate) use {debug, error, trace, warning};
