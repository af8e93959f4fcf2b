/*!
Monotonic cycle counter shared by the interpreter and the picture unit.

The counter advances in T-cycles (the finest hardware tick); one machine
cycle is four T-cycles. Only the interpreter advances it, once per executed
instruction, by the instruction's declared cost. Everything downstream
(picture timing, frame totals) reads elapsed time from here so the whole
machine agrees on a single notion of "now".
*/

/// T-cycles per machine cycle.
pub const T_PER_M: u64 = 4;

/// Monotonic counter of elapsed emulated time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    t: u64,
}

impl Clock {
    /// A clock at power-on (zero elapsed cycles).
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `t_cycles` T-cycles.
    #[inline]
    pub fn step(&mut self, t_cycles: u32) {
        self.t += u64::from(t_cycles);
    }

    /// Elapsed T-cycles since power-on.
    #[inline]
    pub fn t_cycles(&self) -> u64 {
        self.t
    }

    /// Elapsed machine cycles since power-on.
    #[inline]
    pub fn m_cycles(&self) -> u64 {
        self.t / T_PER_M
    }

    /// Reset to zero elapsed cycles.
    #[inline]
    pub fn reset(&mut self) {
        self.t = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_accumulate() {
        let mut c = Clock::new();
        c.step(4);
        c.step(12);
        assert_eq!(c.t_cycles(), 16);
        assert_eq!(c.m_cycles(), 4);
    }

    #[test]
    fn machine_cycles_are_quarter_rate() {
        let mut c = Clock::new();
        c.step(6);
        assert_eq!(c.m_cycles(), 1);
        c.step(2);
        assert_eq!(c.m_cycles(), 2);
    }

    #[test]
    fn reset_zeroes() {
        let mut c = Clock::new();
        c.step(100);
        c.reset();
        assert_eq!(c.t_cycles(), 0);
    }
}
