//! Wall-clock capability and time-of-day buckets.

use chrono::{NaiveDateTime, Timelike};

use super::Language;

/// Source of the current local time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// The system's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Part of the day used to flavor the cheer prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Bucket an hour: [5,12) morning, [12,17) afternoon, [17,21) evening,
    /// everything else night.
    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    /// Bucket for a local timestamp.
    #[must_use]
    pub fn at(time: NaiveDateTime) -> Self {
        Self::from_hour(time.hour())
    }

    #[must_use]
    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Morning, Language::Ja) => "朝",
            (Self::Afternoon, Language::Ja) => "昼",
            (Self::Evening, Language::Ja) => "夕方",
            (Self::Night, Language::Ja) => "夜",
            (Self::Morning, Language::En) => "morning",
            (Self::Afternoon, Language::En) => "afternoon",
            (Self::Evening, Language::En) => "evening",
            (Self::Night, Language::En) => "night",
        }
    }
}
