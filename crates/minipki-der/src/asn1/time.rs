//! UTCTime and GeneralizedTime, restricted to the forms DER and RFC 5280
//! permit: seconds always present, Zulu suffix always present, no fractional
//! seconds.

use core::fmt::{self, Debug};

use Error::InvalidDateTime;

use crate::codec::{FromDer, ToDer};
use crate::cursor::{DecodeCursor, EncodeCursor};
use crate::error::Error;
use crate::header::Header;
use crate::tag::Tag;

/// A calendar date-time with second resolution, always UTC
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl DateTime {
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, Error> {
        if year > 9999
            || month == 0
            || month > 12
            || day == 0
            || day > days_in_month(year, month)
            || hour > 23
            || minute > 59
            || second > 59
        {
            return Err(InvalidDateTime);
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    /// Seconds since the Unix epoch. Dates before 1970 come out negative.
    pub fn unix_secs(&self) -> i64 {
        let days = days_from_civil(i64::from(self.year), self.month, self.day);
        days * 86_400
            + i64::from(self.hour) * 3_600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }
}

impl Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days from 1970-01-01 to the given civil date (proleptic Gregorian)
fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (i64::from(month) + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn two_digits(bytes: &[u8]) -> Result<u8, Error> {
    match bytes {
        [a @ b'0'..=b'9', b @ b'0'..=b'9'] => Ok((a - b'0') * 10 + (b - b'0')),
        _ => Err(InvalidDateTime),
    }
}

fn decode_body(bytes: &[u8], year: u16) -> Result<DateTime, Error> {
    if bytes.len() != 10 || bytes[9] != b'Z' {
        return Err(InvalidDateTime);
    }
    DateTime::new(
        year,
        two_digits(&bytes[0..2])?,
        two_digits(&bytes[2..4])?,
        two_digits(&bytes[4..6])?,
        two_digits(&bytes[6..8])?,
        two_digits(&bytes[8..10])?,
    )
}

fn encode_digits(cursor: &mut EncodeCursor<'_>, value: u16, width: usize) -> Result<(), Error> {
    let mut divisor = 10u16.pow(width as u32 - 1);
    for _ in 0..width {
        cursor.try_put_u8(b'0' + ((value / divisor) % 10) as u8)?;
        divisor = (divisor / 10).max(1);
    }
    Ok(())
}

fn encode_body(cursor: &mut EncodeCursor<'_>, dt: &DateTime) -> Result<(), Error> {
    encode_digits(cursor, u16::from(dt.month), 2)?;
    encode_digits(cursor, u16::from(dt.day), 2)?;
    encode_digits(cursor, u16::from(dt.hour), 2)?;
    encode_digits(cursor, u16::from(dt.minute), 2)?;
    encode_digits(cursor, u16::from(dt.second), 2)?;
    cursor.try_put_u8(b'Z')
}

/// UTCTime: `YYMMDDHHMMSSZ`.
///
/// RFC 5280 4.1.2.5.1: two-digit years 50..=99 mean 19YY, 00..=49 mean 20YY,
/// so the representable range is 1950..=2049.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcTime(DateTime);

impl UtcTime {
    pub const CONTENT_LEN: u32 = 13;

    pub fn new(dt: DateTime) -> Result<Self, Error> {
        if !(1950..=2049).contains(&dt.year) {
            return Err(InvalidDateTime);
        }
        Ok(Self(dt))
    }

    pub fn date_time(&self) -> DateTime {
        self.0
    }
}

impl Debug for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UTCTime({:?})", self.0)
    }
}

impl ToDer for UtcTime {
    fn der_size(&self) -> usize {
        Header::encoded_size(Self::CONTENT_LEN) + Self::CONTENT_LEN as usize
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        Header::new(Tag::UTC_TIME, Self::CONTENT_LEN).encode(cursor)?;
        encode_digits(cursor, self.0.year % 100, 2)?;
        encode_body(cursor, &self.0)
    }
}

impl FromDer<'_> for UtcTime {
    fn from_der(cursor: &mut DecodeCursor<'_>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::UTC_TIME)?;
        if header.length != Self::CONTENT_LEN {
            return Err(InvalidDateTime);
        }
        let bytes = cursor.try_get_slice(Self::CONTENT_LEN as usize)?;
        let yy = two_digits(&bytes[0..2])?;
        let year = if yy >= 50 {
            1900 + u16::from(yy)
        } else {
            2000 + u16::from(yy)
        };
        Ok(Self(decode_body(&bytes[2..], year)?))
    }
}

/// GeneralizedTime: `YYYYMMDDHHMMSSZ`, four-digit year
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GeneralizedTime(DateTime);

impl GeneralizedTime {
    pub const CONTENT_LEN: u32 = 15;

    pub fn new(dt: DateTime) -> Self {
        Self(dt)
    }

    pub fn date_time(&self) -> DateTime {
        self.0
    }
}

impl Debug for GeneralizedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeneralizedTime({:?})", self.0)
    }
}

impl ToDer for GeneralizedTime {
    fn der_size(&self) -> usize {
        Header::encoded_size(Self::CONTENT_LEN) + Self::CONTENT_LEN as usize
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        Header::new(Tag::GENERALIZED_TIME, Self::CONTENT_LEN).encode(cursor)?;
        encode_digits(cursor, self.0.year, 4)?;
        encode_body(cursor, &self.0)
    }
}

impl FromDer<'_> for GeneralizedTime {
    fn from_der(cursor: &mut DecodeCursor<'_>) -> Result<Self, Error> {
        let header = Header::decode_expecting(cursor, Tag::GENERALIZED_TIME)?;
        if header.length != Self::CONTENT_LEN {
            return Err(InvalidDateTime);
        }
        let bytes = cursor.try_get_slice(Self::CONTENT_LEN as usize)?;
        let year = u16::from(two_digits(&bytes[0..2])?) * 100 + u16::from(two_digits(&bytes[2..4])?);
        Ok(Self(decode_body(&bytes[4..], year)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_time_round_trip() {
        let dt = DateTime::new(2024, 3, 15, 12, 30, 45).unwrap();
        let utc = UtcTime::new(dt).unwrap();

        let mut buf = [0u8; 15];
        let mut cursor = EncodeCursor::new(&mut buf);
        utc.to_der(&mut cursor).unwrap();
        assert_eq!(&buf[..2], &[0x17, 0x0d]);
        assert_eq!(&buf[2..], b"240315123045Z");

        let decoded = UtcTime::from_der_complete(&buf).unwrap();
        assert_eq!(decoded.date_time(), dt);
    }

    #[test]
    fn utc_time_pivot() {
        // 500101000000Z is 1950, 491231235959Z is 2049
        let fifty = UtcTime::from_der_complete(b"\x17\x0d500101000000Z").unwrap();
        assert_eq!(fifty.date_time().year(), 1950);

        let fortynine = UtcTime::from_der_complete(b"\x17\x0d491231235959Z").unwrap();
        assert_eq!(fortynine.date_time().year(), 2049);
    }

    #[test]
    fn utc_time_range_enforced() {
        let dt = DateTime::new(2050, 1, 1, 0, 0, 0).unwrap();
        assert!(UtcTime::new(dt).is_err(), "2050 is out of UTCTime range");
    }

    #[test]
    fn generalized_time_round_trip() {
        let dt = DateTime::new(2055, 12, 31, 23, 59, 59).unwrap();
        let gt = GeneralizedTime::new(dt);

        let mut buf = [0u8; 17];
        let mut cursor = EncodeCursor::new(&mut buf);
        gt.to_der(&mut cursor).unwrap();
        assert_eq!(&buf[2..], b"20551231235959Z");

        let decoded = GeneralizedTime::from_der_complete(&buf).unwrap();
        assert_eq!(decoded.date_time(), dt);
    }

    #[test]
    fn missing_seconds_or_zone_rejected() {
        // 11-char form without seconds is valid BER UTCTime, not DER
        assert!(UtcTime::from_der_complete(b"\x17\x0b2403151230Z").is_err());
        // offset instead of Z
        assert!(UtcTime::from_der_complete(b"\x17\x11240315123045+0100").is_err());
        // fractional seconds on GeneralizedTime
        assert!(GeneralizedTime::from_der_complete(b"\x18\x1220240315123045.5Z").is_err());
    }

    #[test]
    fn calendar_validation() {
        assert!(DateTime::new(2023, 2, 29, 0, 0, 0).is_err(), "not a leap year");
        assert!(DateTime::new(2024, 2, 29, 0, 0, 0).is_ok(), "leap year");
        assert!(DateTime::new(2000, 2, 29, 0, 0, 0).is_ok(), "divisible by 400");
        assert!(DateTime::new(1900, 2, 29, 0, 0, 0).is_err(), "centurial non-leap");
        assert!(DateTime::new(2024, 4, 31, 0, 0, 0).is_err());
        assert!(DateTime::new(2024, 13, 1, 0, 0, 0).is_err());
        assert!(DateTime::new(2024, 1, 1, 24, 0, 0).is_err());
    }

    #[test]
    fn unix_seconds() {
        let epoch = DateTime::new(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(epoch.unix_secs(), 0);

        let y2k = DateTime::new(2000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(y2k.unix_secs(), 946_684_800);

        let recent = DateTime::new(2024, 3, 15, 12, 30, 45).unwrap();
        assert_eq!(recent.unix_secs(), 1_710_505_845);
    }
}
