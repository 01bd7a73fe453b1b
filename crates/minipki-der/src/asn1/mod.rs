pub mod any;
pub mod bit_string;
pub mod integer;
pub mod oid;
pub mod simple;
pub mod string;
pub mod time;

pub use any::AnyRef;
pub use bit_string::BitStringRef;
pub use integer::{IntRef, UintRef};
pub use oid::ObjectIdentifier;
pub use simple::{Null, OctetStringRef};
pub use string::{Ia5StringRef, PrintableStringRef, Utf8StringRef};
pub use time::{DateTime, GeneralizedTime, UtcTime};
