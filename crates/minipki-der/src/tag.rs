use core::fmt::{self, Debug};

use crate::cursor::{DecodeCursor, EncodeCursor};
use crate::error::Error;

/// X.690 8.1.2.2: the class of an ASN.1 tag, taken from the two high bits of
/// the identifier octet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Class {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

/// A DER identifier octet: class, constructed bit, and tag number.
///
/// Only single-octet identifiers are supported (tag numbers 0..=30). The
/// multi-octet "high tag number" form never appears in the PKI structures this
/// workspace handles and is rejected on decode.
#[derive(PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct Tag(u8);

impl Tag {
    pub const BOOLEAN: Tag = Tag(0x01);
    pub const INTEGER: Tag = Tag(0x02);
    pub const BIT_STRING: Tag = Tag(0x03);
    pub const OCTET_STRING: Tag = Tag(0x04);
    pub const NULL: Tag = Tag(0x05);
    pub const OBJECT_IDENTIFIER: Tag = Tag(0x06);
    pub const UTF8_STRING: Tag = Tag(0x0c);
    pub const PRINTABLE_STRING: Tag = Tag(0x13);
    pub const IA5_STRING: Tag = Tag(0x16);
    pub const UTC_TIME: Tag = Tag(0x17);
    pub const GENERALIZED_TIME: Tag = Tag(0x18);
    pub const SEQUENCE: Tag = Tag(0x30);
    pub const SET: Tag = Tag(0x31);

    /// The high-tag-number escape value in the low five identifier bits.
    const HIGH_TAG_FORM: u8 = 0x1f;

    /// Build a context-specific tag `[n]`. DER encodes EXPLICIT wrappers and
    /// IMPLICIT retags of constructed types with the constructed bit set.
    pub const fn context_specific(number: u8, constructed: bool) -> Tag {
        debug_assert!(number < Self::HIGH_TAG_FORM);
        if constructed {
            Tag(0x80 | 0x20 | number)
        } else {
            Tag(0x80 | number)
        }
    }

    /// The raw identifier octet as it appears on the wire.
    pub const fn octet(&self) -> u8 {
        self.0
    }

    pub const fn number(&self) -> u8 {
        self.0 & 0x1f
    }

    pub const fn is_constructed(&self) -> bool {
        self.0 & 0x20 != 0
    }

    pub const fn class(&self) -> Class {
        match self.0 >> 6 {
            0 => Class::Universal,
            1 => Class::Application,
            2 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }

    pub const fn is_context_specific(&self, number: u8) -> bool {
        matches!(self.class(), Class::ContextSpecific) && self.number() == number
    }

    /// Return `Ok(())` when this tag equals `expected`, an `UnexpectedTag`
    /// error otherwise.
    pub fn expect(self, expected: Tag) -> Result<(), Error> {
        if self == expected {
            Ok(())
        } else {
            Err(Error::UnexpectedTag(expected, self))
        }
    }

    pub fn from_der(cursor: &mut DecodeCursor<'_>) -> Result<Self, Error> {
        let octet = cursor.try_get_u8()?;
        if octet & Self::HIGH_TAG_FORM == Self::HIGH_TAG_FORM {
            return Err(Error::UnsupportedTagNumber(octet));
        }
        Ok(Tag(octet))
    }

    pub fn to_der(self, cursor: &mut EncodeCursor<'_>) -> Result<(), Error> {
        cursor.try_put_u8(self.0)
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OBJECT_IDENTIFIER => write!(f, "OBJECT IDENTIFIER"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            _ => match self.class() {
                Class::Universal => write!(f, "UNIVERSAL [{}]", self.number()),
                Class::Application => write!(f, "APPLICATION [{}]", self.number()),
                Class::ContextSpecific => write!(f, "[{}]", self.number()),
                Class::Private => write!(f, "PRIVATE [{}]", self.number()),
            },
        }
    }
}
