//! Core types for wristband commands.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Size of a command payload on the wire.
pub const COMMAND_LEN: usize = 3;

/// Smallest repeat count the band accepts.
pub const MIN_REPEATS: u8 = 1;

/// Largest repeat count the band accepts.
pub const MAX_REPEATS: u8 = 5;

/// Largest vibration strength the band accepts.
pub const MAX_STRENGTH: u8 = 3;

/// Vibration waveform played by the band.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new waveforms
/// in future firmware versions without breaking downstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
#[repr(u8)]
pub enum Pattern {
    /// Medication is due now.
    AlarmDue = 1,
    /// Dose is late.
    Late = 2,
    /// Dose was missed.
    Missed = 3,
    /// Short nudge, used for snooze.
    Short = 4,
}

impl Pattern {
    /// Raw byte sent to the band.
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Pattern {
    type Error = ParseError;

    /// Convert a byte value to a `Pattern`.
    ///
    /// # Examples
    ///
    /// ```
    /// use guardian_types::Pattern;
    ///
    /// assert_eq!(Pattern::try_from(1), Ok(Pattern::AlarmDue));
    /// assert_eq!(Pattern::try_from(4), Ok(Pattern::Short));
    /// assert!(Pattern::try_from(0).is_err());
    /// ```
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Pattern::AlarmDue),
            2 => Ok(Pattern::Late),
            3 => Ok(Pattern::Missed),
            4 => Ok(Pattern::Short),
            _ => Err(ParseError::UnknownPattern(value)),
        }
    }
}

impl FromStr for Pattern {
    type Err = ParseError;

    /// Parse a pattern from its name or its numeric value.
    ///
    /// ```
    /// use guardian_types::Pattern;
    ///
    /// assert_eq!("due".parse(), Ok(Pattern::AlarmDue));
    /// assert_eq!("NUDGE".parse(), Ok(Pattern::Short));
    /// assert_eq!("3".parse(), Ok(Pattern::Missed));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "due" | "alarm" | "alarm_due" | "alarm-due" => Ok(Pattern::AlarmDue),
            "late" => Ok(Pattern::Late),
            "missed" => Ok(Pattern::Missed),
            "short" | "nudge" | "snooze" => Ok(Pattern::Short),
            other => match other.parse::<u8>() {
                Ok(value) => Pattern::try_from(value),
                Err(_) => Err(ParseError::UnknownPatternName(s.to_string())),
            },
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::AlarmDue => write!(f, "alarm due"),
            Pattern::Late => write!(f, "late"),
            Pattern::Missed => write!(f, "missed"),
            Pattern::Short => write!(f, "short nudge"),
        }
    }
}

/// A single vibration command: `(pattern, repeats, strength)`.
///
/// Construction always clamps `repeats` into `[1, 5]` and `strength`
/// into `[0, 3]`, so every `Command` value is safe to put on the wire.
///
/// ```
/// use guardian_types::{Command, Pattern};
///
/// let cmd = Command::new(Pattern::Late, 9, 7);
/// assert_eq!(cmd.repeats(), 5);
/// assert_eq!(cmd.strength(), 3);
/// assert_eq!(cmd.to_bytes(), [2, 5, 3]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Command {
    pattern: Pattern,
    repeats: u8,
    strength: u8,
}

impl Command {
    /// Build a command, clamping `repeats` and `strength` into range.
    #[must_use]
    pub fn new(pattern: Pattern, repeats: u8, strength: u8) -> Self {
        Self {
            pattern,
            repeats: clamp_repeats(repeats),
            strength: clamp_strength(strength),
        }
    }

    /// Vibration waveform.
    #[must_use]
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Number of times the waveform is played.
    #[must_use]
    pub fn repeats(&self) -> u8 {
        self.repeats
    }

    /// Motor strength level.
    #[must_use]
    pub fn strength(&self) -> u8 {
        self.strength
    }

    /// Encode as the 3-byte payload `[pattern, repeats, strength]`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; COMMAND_LEN] {
        [self.pattern.as_u8(), self.repeats, self.strength]
    }

    /// Decode a payload. Extra trailing bytes are ignored.
    ///
    /// Out-of-range `repeats`/`strength` bytes are clamped the same way
    /// [`Command::new`] clamps them.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < COMMAND_LEN {
            return Err(ParseError::InsufficientBytes {
                expected: COMMAND_LEN,
                actual: data.len(),
            });
        }
        let pattern = Pattern::try_from(data[0])?;
        Ok(Self::new(pattern, data[1], data[2]))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x{} @ strength {}",
            self.pattern, self.repeats, self.strength
        )
    }
}

/// Clamp a repeat count into `[MIN_REPEATS, MAX_REPEATS]`.
#[must_use]
pub fn clamp_repeats(repeats: u8) -> u8 {
    repeats.clamp(MIN_REPEATS, MAX_REPEATS)
}

/// Clamp a strength level into `[0, MAX_STRENGTH]`.
#[must_use]
pub fn clamp_strength(strength: u8) -> u8 {
    strength.min(MAX_STRENGTH)
}

/// Medication alert that maps to a fixed band command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Alert {
    /// Dose is due.
    Due,
    /// Dose is late.
    Late,
    /// Dose was missed.
    Missed,
    /// Reminder was snoozed.
    Snooze,
}

impl Alert {
    /// All alerts, in escalation order.
    pub const ALL: [Alert; 4] = [Alert::Due, Alert::Late, Alert::Missed, Alert::Snooze];

    /// The fixed command this alert sends.
    ///
    /// | Alert | Command |
    /// |-------|---------|
    /// | Due | `(1, 2, 2)` |
    /// | Late | `(2, 2, 1)` |
    /// | Missed | `(3, 3, 2)` |
    /// | Snooze | `(4, 1, 1)` |
    #[must_use]
    pub fn command(self) -> Command {
        match self {
            Alert::Due => Command::new(Pattern::AlarmDue, 2, 2),
            Alert::Late => Command::new(Pattern::Late, 2, 1),
            Alert::Missed => Command::new(Pattern::Missed, 3, 2),
            Alert::Snooze => Command::new(Pattern::Short, 1, 1),
        }
    }

    /// Lowercase name used on the command line and in config files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Alert::Due => "due",
            Alert::Late => "late",
            Alert::Missed => "missed",
            Alert::Snooze => "snooze",
        }
    }
}

impl FromStr for Alert {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "due" | "alarm" => Ok(Alert::Due),
            "late" => Ok(Alert::Late),
            "missed" => Ok(Alert::Missed),
            "snooze" | "short" | "nudge" => Ok(Alert::Snooze),
            _ => Err(ParseError::UnknownAlert(s.to_string())),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


/// Property-based checks for command clamping.
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_pattern() -> impl Strategy<Value = Pattern> {
        prop_oneof![
            Just(Pattern::AlarmDue),
            Just(Pattern::Late),
            Just(Pattern::Missed),
            Just(Pattern::Short),
        ]
    }

    proptest! {
        /// Every command puts in-range values on the wire.
        #[test]
        fn command_always_in_range(pattern in any_pattern(), repeats: u8, strength: u8) {
            let cmd = Command::new(pattern, repeats, strength);
            prop_assert!((MIN_REPEATS..=MAX_REPEATS).contains(&cmd.repeats()));
            prop_assert!(cmd.strength() <= MAX_STRENGTH);
        }

        /// Values already in range pass through unchanged.
        #[test]
        fn in_range_values_preserved(pattern in any_pattern(), repeats in 1u8..=5, strength in 0u8..=3) {
            let cmd = Command::new(pattern, repeats, strength);
            prop_assert_eq!(cmd.to_bytes(), [pattern.as_u8(), repeats, strength]);
        }

        /// Decoding arbitrary bytes never panics.
        #[test]
        fn from_bytes_never_panics(data: Vec<u8>) {
            let _ = Command::from_bytes(&data);
        }
    }
}
