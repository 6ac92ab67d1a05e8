//! Time sources used by the HTTP client.
//!
//! Two notions of time are involved in an exchange. A monotonic millisecond
//! clock bounds how long a request may run, and the wall-clock epoch is handed
//! to the TLS layer so certificate validity can be checked. The client never
//! acquires either one itself.

/// Earliest wall-clock time (2020-09-13) accepted as synchronised.
///
/// Devices boot with their RTC near the epoch until SNTP completes; anything
/// below this floor is treated as "no clock".
pub const MIN_VALID_EPOCH: u64 = 1_600_000_000;

/// A monotonic millisecond counter.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed point.
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Returns `true` if `epoch` looks like a synchronised wall-clock reading.
pub fn is_plausible_epoch(epoch: u64) -> bool {
    epoch > MIN_VALID_EPOCH
}

#[cfg(feature = "std")]
mod std_clock {
    use super::Clock;
    use std::time::Instant;

    /// [`Clock`] backed by [`std::time::Instant`].
    #[derive(Debug, Clone, Copy)]
    pub struct StdClock {
        origin: Instant,
    }

    impl StdClock {
        /// Start a clock at the current instant.
        pub fn new() -> Self {
            Self {
                origin: Instant::now(),
            }
        }
    }

    impl Default for StdClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for StdClock {
        fn now_ms(&self) -> u64 {
            self.origin.elapsed().as_millis() as u64
        }
    }
}

#[cfg(feature = "std")]
pub use std_clock::StdClock;
