//! Certificate validity windows and the RFC 5280 `Time` CHOICE.

use core::fmt::{self, Debug};

use minipki_der::asn1::{DateTime, GeneralizedTime, UtcTime};
use minipki_der::fields::{framed_size, read_sequence, write_sequence};
use minipki_der::{DecodeCursor, EncodeCursor, FromDer, Header, Tag, ToDer};

/// `Time ::= CHOICE { utcTime UTCTime, generalTime GeneralizedTime }`.
///
/// RFC 5280 4.1.2.5: dates through 2049 MUST use UTCTime, dates in 2050 or
/// later MUST use GeneralizedTime. [`Time::from_date_time`] applies the rule;
/// decoding accepts either branch and remembers which was used so re-encoding
/// is exact.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Time {
    Utc(UtcTime),
    Generalized(GeneralizedTime),
}

impl Time {
    /// Pick the encoding RFC 5280 mandates for this date
    pub fn from_date_time(dt: DateTime) -> Self {
        match UtcTime::new(dt) {
            Ok(utc) => Time::Utc(utc),
            Err(_) => Time::Generalized(GeneralizedTime::new(dt)),
        }
    }

    pub fn date_time(&self) -> DateTime {
        match self {
            Time::Utc(t) => t.date_time(),
            Time::Generalized(t) => t.date_time(),
        }
    }

    pub fn unix_secs(&self) -> i64 {
        self.date_time().unix_secs()
    }
}

impl Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Time::Utc(t) => Debug::fmt(t, f),
            Time::Generalized(t) => Debug::fmt(t, f),
        }
    }
}

impl ToDer for Time {
    fn der_size(&self) -> usize {
        match self {
            Time::Utc(t) => t.der_size(),
            Time::Generalized(t) => t.der_size(),
        }
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        match self {
            Time::Utc(t) => t.to_der(cursor),
            Time::Generalized(t) => t.to_der(cursor),
        }
    }
}

impl FromDer<'_> for Time {
    fn from_der(cursor: &mut DecodeCursor<'_>) -> Result<Self, minipki_der::Error> {
        let header = Header::peek(cursor)?;
        match header.tag {
            Tag::GENERALIZED_TIME => Ok(Time::Generalized(GeneralizedTime::from_der(cursor)?)),
            _ => Ok(Time::Utc(UtcTime::from_der(cursor)?)),
        }
    }
}

/// `Validity ::= SEQUENCE { notBefore Time, notAfter Time }`
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Validity {
    pub not_before: Time,
    pub not_after: Time,
}

impl Validity {
    pub fn new(not_before: DateTime, not_after: DateTime) -> Self {
        Self {
            not_before: Time::from_date_time(not_before),
            not_after: Time::from_date_time(not_after),
        }
    }

    /// True when `at` (Unix seconds) falls within the window, inclusive on
    /// both ends per RFC 5280 4.1.2.5.
    pub fn is_valid_at(&self, at: i64) -> bool {
        self.not_before.unix_secs() <= at && at <= self.not_after.unix_secs()
    }

    fn value_size(&self) -> usize {
        self.not_before.der_size() + self.not_after.der_size()
    }
}

impl ToDer for Validity {
    fn der_size(&self) -> usize {
        framed_size(self.value_size())
    }

    fn to_der(&self, cursor: &mut EncodeCursor<'_>) -> Result<(), minipki_der::Error> {
        write_sequence(cursor, self.value_size(), |cursor| {
            self.not_before.to_der(cursor)?;
            self.not_after.to_der(cursor)
        })
    }
}

impl FromDer<'_> for Validity {
    fn from_der(cursor: &mut DecodeCursor<'_>) -> Result<Self, minipki_der::Error> {
        read_sequence(cursor, |inner| {
            Ok(Validity {
                not_before: Time::from_der(inner)?,
                not_after: Time::from_der(inner)?,
            })
        })
    }
}
