//! Structured elapsed time and the arithmetic the stopwatch and totals rely on.

use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Elapsed time split into hours, minutes and seconds.
///
/// Values produced by ticking, deducting or adding keep `min` and `sec` below 60.
/// Values parsed from a duration phrase keep the phrase's minutes as written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Duration {
    pub hour: u32,
    pub min: u32,
    pub sec: u32,
}

/// Unit to round to in [`Duration::rounded`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundTo {
    Minute,
    Hour,
}

/// Which unit boundaries a single tick crossed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Carry {
    pub minute: bool,
    pub hour: bool,
}

/// Which fields a deduction changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Changed {
    pub sec: bool,
    pub min: bool,
    pub hour: bool,
}

impl Duration {
    pub const ZERO: Duration = Duration {
        hour: 0,
        min: 0,
        sec: 0,
    };

    pub const fn new(hour: u32, min: u32, sec: u32) -> Self {
        Self { hour, min, sec }
    }

    pub fn from_seconds(total: u64) -> Self {
        let hours = total / 3600;
        Self {
            hour: u32::try_from(hours).unwrap_or(u32::MAX),
            min: ((total % 3600) / 60) as u32,
            sec: (total % 60) as u32,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hour) * 3600 + u64::from(self.min) * 60 + u64::from(self.sec)
    }

    pub fn is_zero(&self) -> bool {
        self.hour == 0 && self.min == 0 && self.sec == 0
    }

    /// Advances by one second, carrying sec -> min -> hour.
    pub fn tick(&mut self) -> Carry {
        let mut carry = Carry::default();
        self.sec += 1;
        if self.sec >= 60 {
            self.sec = 0;
            self.min += 1;
            carry.minute = true;
        }
        if self.min >= 60 {
            self.min = 0;
            self.hour = self.hour.saturating_add(1);
            carry.hour = true;
        }
        carry
    }

    /// Round-half-up copy; the receiver is left untouched.
    pub fn rounded(&self, to: RoundTo) -> Self {
        let mut time = *self;
        match to {
            RoundTo::Minute => {
                let seconds = time.sec;
                time.sec = 0;
                if seconds >= 30 {
                    time.min += 1;
                    if time.min >= 60 {
                        time.min -= 60;
                        time.hour = time.hour.saturating_add(1);
                    }
                }
            }
            RoundTo::Hour => {
                let minutes = time.min;
                time.min = 0;
                time.sec = 0;
                if minutes >= 30 {
                    time.hour = time.hour.saturating_add(1);
                }
            }
        }
        time
    }

    /// Subtracts `amount` unit by unit, seconds first.
    ///
    /// A unit that goes negative borrows from the next larger unit only; when that unit
    /// has nothing left to lend the field clamps to zero. No field ever goes negative.
    pub fn deduct(&mut self, amount: &Duration) -> Changed {
        let mut changed = Changed::default();
        let mut sec = i64::from(self.sec);
        let mut min = i64::from(self.min);
        let mut hour = i64::from(self.hour);

        if amount.sec > 0 {
            sec -= i64::from(amount.sec);
            changed.sec = true;
            while sec < 0 && min > 0 {
                sec += 60;
                min -= 1;
                changed.min = true;
            }
            sec = sec.max(0);
        }
        if amount.min > 0 {
            min -= i64::from(amount.min);
            changed.min = true;
            while min < 0 && hour > 0 {
                min += 60;
                hour -= 1;
                changed.hour = true;
            }
            min = min.max(0);
        }
        if amount.hour > 0 {
            hour -= i64::from(amount.hour);
            changed.hour = true;
            hour = hour.max(0);
        }

        self.sec = sec as u32;
        self.min = min as u32;
        self.hour = u32::try_from(hour).unwrap_or(u32::MAX);
        changed
    }

    /// Same value with every carry applied.
    pub fn normalized(&self) -> Self {
        Self::from_seconds(self.total_seconds())
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, other: Duration) -> Duration {
        Duration::from_seconds(self.total_seconds() + other.total_seconds())
    }
}
