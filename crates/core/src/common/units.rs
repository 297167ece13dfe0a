//! Unit-suffixed quantities.
//!
//! Component options are written the way simulator configuration scripts write them
//! (`"32KiB"`, `"5GHz"`, `"256GiB/s"`, `"1ms"`). Each quantity type parses its string
//! form at construction time, so a malformed value is a `ValidationError` long before
//! the backend sees it. All types also deserialize from a bare integer in base units.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::ValidationError;

/// Backend time unit. One tick is one picosecond.
pub type Tick = u64;

/// Number of ticks in one simulated second.
pub const TICKS_PER_SECOND: u64 = 1_000_000_000_000;

/// Display-only; parsing goes through `parse_size`.
const BINARY_BYTE_UNITS: &[(&str, u128)] = &[
    ("B", 1),
    ("KiB", 1 << 10),
    ("MiB", 1 << 20),
    ("GiB", 1 << 30),
    ("TiB", 1 << 40),
];

const FREQUENCY_UNITS: &[(&str, u128)] = &[
    ("Hz", 1),
    ("kHz", 1_000),
    ("MHz", 1_000_000),
    ("GHz", 1_000_000_000),
];

const TIME_UNITS: &[(&str, u128)] = &[
    ("ps", 1),
    ("ns", 1_000),
    ("us", 1_000_000),
    ("ms", 1_000_000_000),
    ("s", 1_000_000_000_000),
];

/// Parses `<decimal><suffix>` against a frequency or time unit table.
///
/// Fractions are allowed as long as the result is a whole number of base units.
fn parse_scaled(
    text: &str,
    units: &[(&str, u128)],
    expected: &'static str,
) -> Result<u64, ValidationError> {
    let invalid = || ValidationError::InvalidQuantity {
        text: text.to_string(),
        expected,
    };

    let trimmed = text.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(split);
    let scale = units
        .iter()
        .find(|(unit, _)| *unit == suffix.trim())
        .map(|(_, scale)| *scale)
        .ok_or_else(invalid)?;

    let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };

    let mut total = whole.checked_mul(scale).ok_or_else(invalid)?;
    if !frac.is_empty() {
        if frac.len() > 18 {
            return Err(invalid());
        }
        let digits: u128 = frac.parse().map_err(|_| invalid())?;
        let denom = 10u128.pow(frac.len() as u32);
        let scaled = digits.checked_mul(scale).ok_or_else(invalid)?;
        if scaled % denom != 0 {
            return Err(invalid());
        }
        total = total.checked_add(scaled / denom).ok_or_else(invalid)?;
    }

    u64::try_from(total).map_err(|_| invalid())
}

/// Formats `value` with the largest unit that divides it exactly.
fn format_scaled(f: &mut fmt::Formatter<'_>, value: u64, units: &[(&str, u128)]) -> fmt::Result {
    let value = value as u128;
    let best = units
        .iter()
        .filter(|(unit, scale)| !unit.is_empty() && *scale <= value.max(1) && value % scale == 0)
        .max_by_key(|(_, scale)| *scale);
    match best {
        Some((unit, scale)) => write!(f, "{}{}", value / scale, unit),
        None => write!(f, "{value}"),
    }
}

/// Serde visitor accepting either a bare integer (base units) or a unit string.
struct QuantityVisitor<T>(PhantomData<T>);

impl<T> Visitor<'_> for QuantityVisitor<T>
where
    T: FromStr<Err = ValidationError> + TryFrom<u64, Error = ValidationError>,
{
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an integer or a unit-suffixed string")
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        T::try_from(value).map_err(E::custom)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let value =
            u64::try_from(value).map_err(|_| E::custom(format!("negative quantity {value}")))?;
        self.visit_u64(value)
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value.parse().map_err(E::custom)
    }
}

macro_rules! quantity_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(QuantityVisitor::<$ty>(PhantomData))
            }
        }
    };
}

/// A capacity or address in bytes.
///
/// # Examples
///
/// ```
/// use memtest_core::common::ByteSize;
///
/// let size: ByteSize = "32KiB".parse().unwrap();
/// assert_eq!(size.bytes(), 32 * 1024);
/// assert_eq!(size.to_string(), "32KiB");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteSize(u64);

impl ByteSize {
    /// Creates a size from a raw byte count.
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Creates a size of `n` KiB, saturating at `u64::MAX` bytes.
    pub const fn kib(n: u64) -> Self {
        Self(n.saturating_mul(1 << 10))
    }

    /// Creates a size of `n` MiB, saturating at `u64::MAX` bytes.
    pub const fn mib(n: u64) -> Self {
        Self(n.saturating_mul(1 << 20))
    }

    /// Creates a size of `n` GiB, saturating at `u64::MAX` bytes.
    pub const fn gib(n: u64) -> Self {
        Self(n.saturating_mul(1 << 30))
    }

    /// Returns the size in bytes.
    pub const fn bytes(self) -> u64 {
        self.0
    }
}

impl FromStr for ByteSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_size::parse_size(s.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidQuantity {
                text: s.to_string(),
                expected: "byte size",
            })
    }
}

impl TryFrom<u64> for ByteSize {
    type Error = ValidationError;

    fn try_from(bytes: u64) -> Result<Self, Self::Error> {
        Ok(Self(bytes))
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0B");
        }
        format_scaled(f, self.0, BINARY_BYTE_UNITS)
    }
}

quantity_serde!(ByteSize);

/// A clock frequency in hertz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u64);

impl Frequency {
    /// Creates a frequency of `n` GHz; `n` must be non-zero.
    pub(crate) const fn ghz(n: u64) -> Self {
        Self(n * 1_000_000_000)
    }

    /// Returns the frequency in hertz.
    pub const fn hz(self) -> u64 {
        self.0
    }

    /// Returns the clock period in ticks, rounded to the nearest tick.
    pub const fn period(self) -> Tick {
        (TICKS_PER_SECOND + self.0 / 2) / self.0
    }
}

impl TryFrom<u64> for Frequency {
    type Error = ValidationError;

    fn try_from(hz: u64) -> Result<Self, Self::Error> {
        if hz == 0 || hz > TICKS_PER_SECOND {
            return Err(ValidationError::InvalidQuantity {
                text: format!("{hz}Hz"),
                expected: "frequency",
            });
        }
        Ok(Self(hz))
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hz = parse_scaled(s, FREQUENCY_UNITS, "frequency")?;
        Self::try_from(hz).map_err(|_| ValidationError::InvalidQuantity {
            text: s.to_string(),
            expected: "frequency",
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_scaled(f, self.0, FREQUENCY_UNITS)
    }
}

quantity_serde!(Frequency);

/// A transfer rate in bytes per second, written `<size>/s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bandwidth(u64);

impl Bandwidth {
    /// Creates a rate without the non-zero check; for compile-time defaults.
    pub(crate) const fn from_raw(bytes_per_second: u64) -> Self {
        Self(bytes_per_second)
    }

    /// Returns the rate in bytes per second.
    pub const fn bytes_per_second(self) -> u64 {
        self.0
    }

    /// Ticks needed to move `bytes` at this rate, rounded up.
    pub const fn transfer_ticks(self, bytes: u64) -> Tick {
        let numerator = bytes as u128 * TICKS_PER_SECOND as u128;
        let ticks = numerator.div_ceil(self.0 as u128);
        if ticks > u64::MAX as u128 {
            u64::MAX
        } else {
            ticks as u64
        }
    }
}

impl TryFrom<u64> for Bandwidth {
    type Error = ValidationError;

    fn try_from(rate: u64) -> Result<Self, Self::Error> {
        if rate == 0 {
            return Err(ValidationError::InvalidQuantity {
                text: "0B/s".to_string(),
                expected: "bandwidth",
            });
        }
        Ok(Self(rate))
    }
}

impl FromStr for Bandwidth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidQuantity {
            text: s.to_string(),
            expected: "bandwidth",
        };
        let size = s.trim().strip_suffix("/s").ok_or_else(invalid)?;
        let rate: ByteSize = size.parse().map_err(|_| invalid())?;
        Self::try_from(rate.bytes()).map_err(|_| invalid())
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/s", ByteSize(self.0))
    }
}

quantity_serde!(Bandwidth);

/// A span of simulated time, stored in ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimTime(Tick);

impl SimTime {
    /// Creates a duration from a tick count.
    pub const fn from_ticks(ticks: Tick) -> Self {
        Self(ticks)
    }

    /// Creates a duration of `n` nanoseconds, saturating at `u64::MAX` ticks.
    pub const fn ns(n: u64) -> Self {
        Self(n.saturating_mul(1_000))
    }

    /// Creates a duration of `n` milliseconds, saturating at `u64::MAX` ticks.
    pub const fn ms(n: u64) -> Self {
        Self(n.saturating_mul(1_000_000_000))
    }

    /// Returns the duration in ticks.
    pub const fn ticks(self) -> Tick {
        self.0
    }

    /// Returns the duration in simulated seconds.
    pub fn seconds(self) -> f64 {
        self.0 as f64 / TICKS_PER_SECOND as f64
    }
}

impl FromStr for SimTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled(s, TIME_UNITS, "duration").map(Self)
    }
}

impl TryFrom<u64> for SimTime {
    type Error = ValidationError;

    fn try_from(ticks: u64) -> Result<Self, Self::Error> {
        Ok(Self(ticks))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0ps");
        }
        format_scaled(f, self.0, TIME_UNITS)
    }
}

quantity_serde!(SimTime);
