//! Interpretation of RDATA.  Decoding a message leaves every record's
//! RDATA as opaque octets tagged with its type: turning those into
//! something more useful is done here, after the fact, by an
//! `RdataInterpreter`.
//!
//! Only address records are interpreted out of the box.  Other types
//! can be handled by implementing `RdataInterpreter`.

use bytes::Bytes;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::protocol::types::*;

/// Something which can make sense of the RDATA of some record types.
pub trait RdataInterpreter {
    type Output;

    /// # Errors
    ///
    /// If the RDATA is not valid for the record type.
    fn interpret(&self, rtype: RecordType, rdata: &Bytes) -> Result<Self::Output, RdataError>;
}

/// RDATA interpreted by the `AddressInterpreter`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum RecordData {
    /// ```text
    ///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    ///     |                    ADDRESS                    |
    ///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /// ```
    ///
    /// Where `ADDRESS` is a 32 bit Internet address.
    A(Ipv4Addr),

    /// ```text
    ///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    ///     |                    ADDRESS                    |
    ///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /// ```
    ///
    /// Where `ADDRESS` is a 128 bit Internet address.
    AAAA(Ipv6Addr),

    /// Any other record.
    Opaque { rtype: RecordType, octets: Bytes },
}

impl fmt::Display for RecordData {
    /// Addresses in their usual textual form, anything else in the
    /// generic `\# <length> <hex>` form of RFC 3597.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordData::A(address) => write!(f, "{address}"),
            RecordData::AAAA(address) => write!(f, "{address}"),
            RecordData::Opaque { octets, .. } => {
                write!(f, "\\# {}", octets.len())?;
                if !octets.is_empty() {
                    write!(f, " ")?;
                    for octet in octets {
                        write!(f, "{octet:02x}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Interprets `A` and `AAAA` records, leaving everything else opaque.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct AddressInterpreter;

impl RdataInterpreter for AddressInterpreter {
    type Output = RecordData;

    fn interpret(&self, rtype: RecordType, rdata: &Bytes) -> Result<RecordData, RdataError> {
        match rtype {
            RecordType::A => fixed_len_octets::<4>(rtype, rdata)
                .map(Ipv4Addr::from)
                .map(RecordData::A),
            RecordType::AAAA => fixed_len_octets::<16>(rtype, rdata)
                .map(Ipv6Addr::from)
                .map(RecordData::AAAA),
            _ => Ok(RecordData::Opaque {
                rtype,
                octets: rdata.clone(),
            }),
        }
    }
}

fn fixed_len_octets<const N: usize>(rtype: RecordType, rdata: &Bytes) -> Result<[u8; N], RdataError> {
    rdata[..].try_into().map_err(|_| RdataError::LengthMismatch {
        rtype,
        expected: N,
        actual: rdata.len(),
    })
}

impl ResourceRecord {
    /// # Errors
    ///
    /// If the RDATA is not valid for the record type.
    pub fn interpret_with<I: RdataInterpreter>(&self, interpreter: &I) -> Result<I::Output, RdataError> {
        interpreter.interpret(self.rtype, &self.rdata)
    }

    /// # Errors
    ///
    /// If this is an address record with the wrong length of RDATA.
    pub fn interpret(&self) -> Result<RecordData, RdataError> {
        self.interpret_with(&AddressInterpreter)
    }

    /// # Errors
    ///
    /// If this is not an `A` record, or if it has the wrong length of
    /// RDATA.
    pub fn ipv4_address(&self) -> Result<Ipv4Addr, RdataError> {
        match self.interpret()? {
            RecordData::A(address) => Ok(address),
            _ => Err(RdataError::TypeMismatch {
                expected: RecordType::A,
                actual: self.rtype,
            }),
        }
    }

    /// # Errors
    ///
    /// If this is not an `AAAA` record, or if it has the wrong length
    /// of RDATA.
    pub fn ipv6_address(&self) -> Result<Ipv6Addr, RdataError> {
        match self.interpret()? {
            RecordData::AAAA(address) => Ok(address),
            _ => Err(RdataError::TypeMismatch {
                expected: RecordType::AAAA,
                actual: self.rtype,
            }),
        }
    }
}

/// Errors encountered when interpreting RDATA.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RdataError {
    /// The RDATA is the wrong size for its type.
    LengthMismatch {
        rtype: RecordType,
        expected: usize,
        actual: usize,
    },

    /// The record is not of the type asked for.
    TypeMismatch {
        expected: RecordType,
        actual: RecordType,
    },
}

impl fmt::Display for RdataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RdataError::LengthMismatch {
                rtype,
                expected,
                actual,
            } => write!(
                f,
                "{rtype} record needs {expected} octets of RDATA but has {actual}"
            ),
            RdataError::TypeMismatch { expected, actual } => {
                write!(f, "expected {expected} record but got {actual}")
            }
        }
    }
}

impl std::error::Error for RdataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::test_util::*;

    #[test]
    fn interprets_a_record() {
        let rr = a_record("www.example.com.", Ipv4Addr::new(192, 168, 0, 125));

        assert_eq!(
            Ok(RecordData::A(Ipv4Addr::new(192, 168, 0, 125))),
            rr.interpret()
        );
        assert_eq!(Ok(Ipv4Addr::new(192, 168, 0, 125)), rr.ipv4_address());
        assert_eq!("192.168.0.125", rr.interpret().unwrap().to_string());
    }

    #[test]
    fn interprets_aaaa_record() {
        let address = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1);
        let rr = aaaa_record("www.example.com.", address);

        assert_eq!(Ok(RecordData::AAAA(address)), rr.interpret());
        assert_eq!(Ok(address), rr.ipv6_address());
        assert_eq!("2001:db8::1", rr.interpret().unwrap().to_string());
    }

    #[test]
    fn a_record_with_wrong_length() {
        let rr = record("www.example.com.", RecordType::A, &[1, 2, 3]);

        assert_eq!(
            Err(RdataError::LengthMismatch {
                rtype: RecordType::A,
                expected: 4,
                actual: 3
            }),
            rr.interpret()
        );
    }

    #[test]
    fn aaaa_record_with_a_sized_rdata() {
        let rr = record("www.example.com.", RecordType::AAAA, &[1, 2, 3, 4]);

        assert_eq!(
            Err(RdataError::LengthMismatch {
                rtype: RecordType::AAAA,
                expected: 16,
                actual: 4
            }),
            rr.ipv6_address()
        );
    }

    #[test]
    fn address_of_wrong_type() {
        let rr = aaaa_record("www.example.com.", Ipv6Addr::LOCALHOST);

        assert_eq!(
            Err(RdataError::TypeMismatch {
                expected: RecordType::A,
                actual: RecordType::AAAA
            }),
            rr.ipv4_address()
        );
    }

    #[test]
    fn other_types_are_opaque() {
        let rr = unknown_record("www.example.com.", &[0xde, 0xad, 0xbe, 0xef]);

        assert_eq!(
            Ok(RecordData::Opaque {
                rtype: RecordType::from(100),
                octets: Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef])
            }),
            rr.interpret()
        );
        assert_eq!("\\# 4 deadbeef", rr.interpret().unwrap().to_string());
    }

    #[test]
    fn empty_opaque_rdata_display() {
        let rr = record("www.example.com.", RecordType::NULL, &[]);
        assert_eq!("\\# 0", rr.interpret().unwrap().to_string());
    }

    #[test]
    fn custom_interpreter() {
        struct MxPreference;

        impl RdataInterpreter for MxPreference {
            type Output = Option<u16>;

            fn interpret(&self, rtype: RecordType, rdata: &Bytes) -> Result<Option<u16>, RdataError> {
                if rtype != RecordType::MX {
                    return Ok(None);
                }
                match rdata.get(..2) {
                    Some(&[hi, lo]) => Ok(Some(u16::from_be_bytes([hi, lo]))),
                    _ => Err(RdataError::LengthMismatch {
                        rtype,
                        expected: 2,
                        actual: rdata.len(),
                    }),
                }
            }
        }

        let mx = record("example.com.", RecordType::MX, &[0, 10, 0]);
        assert_eq!(Ok(Some(10)), mx.interpret_with(&MxPreference));

        let a = a_record("example.com.", Ipv4Addr::LOCALHOST);
        assert_eq!(Ok(None), a.interpret_with(&MxPreference));
    }
}
