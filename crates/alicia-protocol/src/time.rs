//! The two server time encodings that appear on the wire: the Windows-style
//! file-time pair used by the login reply, and the compact packed
//! date-time used everywhere else (storage items, horse birthdays, egg
//! hatch display, item expiry).

use chrono::{DateTime, Datelike, Timelike, Utc};

/// 100-nanosecond ticks between the Windows epoch (1601-01-01 UTC) and
/// the Unix epoch (1970-01-01 UTC).
const TICKS_TO_UNIX_EPOCH: i64 = 116_444_736_000_000_000;

/// A 64-bit tick count since 1601-01-01 UTC, carried on the wire as two
/// little-endian `u32` halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileTime {
    pub low: u32,
    pub high: u32,
}

impl FileTime {
    pub fn from_ticks(ticks: u64) -> Self {
        Self {
            low: (ticks & 0xFFFF_FFFF) as u32,
            high: (ticks >> 32) as u32,
        }
    }

    pub fn ticks(self) -> u64 {
        ((self.high as u64) << 32) | self.low as u64
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let unix_100ns = dt.timestamp_nanos_opt().unwrap_or(0) / 100;
        let ticks = unix_100ns + TICKS_TO_UNIX_EPOCH;
        Self::from_ticks(ticks.max(0) as u64)
    }
}

/// A calendar date-time decomposed from a packed 32-bit wire value.
///
/// Field widths, low to high: minutes(6) hours(5) days(5) months(4)
/// years(12). Out-of-range subfields are saturated at the field's
/// maximum representable value rather than silently wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedDateTime {
    pub years: u16,
    pub months: u8,
    pub days: u8,
    pub hours: u8,
    pub minutes: u8,
}

const MINUTES_BITS: u32 = 6;
const HOURS_BITS: u32 = 5;
const DAYS_BITS: u32 = 5;
const MONTHS_BITS: u32 = 4;
const YEARS_BITS: u32 = 12;

const MINUTES_MAX: u8 = (1 << MINUTES_BITS) - 1;
const HOURS_MAX: u8 = (1 << HOURS_BITS) - 1;
const DAYS_MAX: u8 = (1 << DAYS_BITS) - 1;
const MONTHS_MAX: u8 = (1 << MONTHS_BITS) - 1;
const YEARS_MAX: u16 = (1 << YEARS_BITS) - 1;

const MINUTES_SHIFT: u32 = 0;
const HOURS_SHIFT: u32 = MINUTES_SHIFT + MINUTES_BITS;
const DAYS_SHIFT: u32 = HOURS_SHIFT + HOURS_BITS;
const MONTHS_SHIFT: u32 = DAYS_SHIFT + DAYS_BITS;
const YEARS_SHIFT: u32 = MONTHS_SHIFT + MONTHS_BITS;

impl PackedDateTime {
    pub fn new(years: u16, months: u8, days: u8, hours: u8, minutes: u8) -> Self {
        Self {
            years: years.min(YEARS_MAX),
            months: months.min(MONTHS_MAX),
            days: days.min(DAYS_MAX),
            hours: hours.min(HOURS_MAX),
            minutes: minutes.min(MINUTES_MAX),
        }
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::new(
            dt.year().max(0) as u16,
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
        )
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn to_u32(self) -> u32 {
        ((self.minutes as u32) << MINUTES_SHIFT)
            | ((self.hours as u32) << HOURS_SHIFT)
            | ((self.days as u32) << DAYS_SHIFT)
            | ((self.months as u32) << MONTHS_SHIFT)
            | ((self.years as u32) << YEARS_SHIFT)
    }

    pub fn from_u32(packed: u32) -> Self {
        let minutes = ((packed >> MINUTES_SHIFT) & ((1 << MINUTES_BITS) - 1)) as u8;
        let hours = ((packed >> HOURS_SHIFT) & ((1 << HOURS_BITS) - 1)) as u8;
        let days = ((packed >> DAYS_SHIFT) & ((1 << DAYS_BITS) - 1)) as u8;
        let months = ((packed >> MONTHS_SHIFT) & ((1 << MONTHS_BITS) - 1)) as u8;
        let years = ((packed >> YEARS_SHIFT) & ((1 << YEARS_BITS) - 1)) as u16;
        Self { years, months, days, hours, minutes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_date_time_round_trip() {
        let dt = PackedDateTime::new(2024, 6, 15, 13, 45);
        let packed = dt.to_u32();
        assert_eq!(PackedDateTime::from_u32(packed), dt);
    }

    #[test]
    fn packed_date_time_saturates_out_of_range_fields() {
        // Months only has 4 bits (max 15); 200 should saturate, not wrap.
        let dt = PackedDateTime::new(9999, 200, 40, 30, 70);
        assert_eq!(dt.years, YEARS_MAX);
        assert_eq!(dt.months, MONTHS_MAX);
        assert_eq!(dt.days, DAYS_MAX);
        assert_eq!(dt.hours, HOURS_MAX);
        assert_eq!(dt.minutes, MINUTES_MAX);

        // And the saturated value is still a stable fixed point under
        // one more round trip.
        assert_eq!(PackedDateTime::from_u32(dt.to_u32()), dt);
    }

    #[test]
    fn file_time_round_trip() {
        let ticks: u64 = 133_600_123_456_789_00;
        let ft = FileTime::from_ticks(ticks);
        assert_eq!(ft.ticks(), ticks);
    }
}
