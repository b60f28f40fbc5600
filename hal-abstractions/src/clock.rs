//! Monotonic millisecond clock capability

/// Free-running millisecond counter
///
/// The counter must never go backwards, but it may wrap at `u32::MAX`.
/// Consumers compute elapsed time with `wrapping_sub`, so a wrap between two
/// readings still yields the right difference.
pub trait MonotonicClock {
    /// Milliseconds since an arbitrary, fixed origin
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `earlier`, tolerant of one wrap
    fn elapsed_since(&self, earlier: u32) -> u32 {
        self.now_ms().wrapping_sub(earlier)
    }
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
