pub mod deserialise;
pub mod rdata;
#[cfg(any(feature = "test-util", test))]
pub mod serialise;
pub mod types;

pub use self::deserialise::{decode, DecodeError};
