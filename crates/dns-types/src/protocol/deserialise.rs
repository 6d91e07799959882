//! Deserialisation of DNS messages from the network.  See the `types`
//! module for details of the format.

use bytes::Bytes;
use std::fmt;

use crate::protocol::types::*;

/// Smallest possible question: the root name, QTYPE, and QCLASS.
pub const QUESTION_MIN_LEN: usize = 5;

/// Smallest possible resource record: the root name, TYPE, CLASS,
/// TTL, and RDLENGTH, with no RDATA.
pub const RESOURCE_RECORD_MIN_LEN: usize = 11;

/// Octet mask for a compression pointer: the top two bits of the
/// length octet are set.
pub const NAME_POINTER_MASK: u8 = 0b1100_0000;

/// Decode a complete message.  Either every section is decoded, or
/// the first problem encountered is returned.
///
/// # Errors
///
/// If the message cannot be parsed.
pub fn decode(octets: &[u8]) -> Result<Message, DecodeError> {
    Message::from_octets(octets)
}

impl Message {
    /// # Errors
    ///
    /// If the message cannot be parsed.
    pub fn from_octets(octets: &[u8]) -> Result<Self, DecodeError> {
        let result = Self::deserialise(&mut ConsumableBuffer::new(octets));
        if let Err(error) = &result {
            tracing::debug!(%error, length = %octets.len(), "could not decode message");
        }
        result
    }

    /// # Errors
    ///
    /// If the message cannot be parsed.
    pub fn deserialise(buffer: &mut ConsumableBuffer) -> Result<Self, DecodeError> {
        let header = Header::deserialise(buffer)?;
        let id = header.id;
        let _span = tracing::error_span!("decode", id).entered();

        let questions = read_section(
            buffer,
            id,
            Section::Question,
            header.qdcount,
            QUESTION_MIN_LEN,
            |b| Question::deserialise(id, b),
        )?;
        let answers = read_section(
            buffer,
            id,
            Section::Answer,
            header.ancount,
            RESOURCE_RECORD_MIN_LEN,
            |b| ResourceRecord::deserialise(id, b),
        )?;
        let authority = read_section(
            buffer,
            id,
            Section::Authority,
            header.nscount,
            RESOURCE_RECORD_MIN_LEN,
            |b| ResourceRecord::deserialise(id, b),
        )?;
        let additional = read_section(
            buffer,
            id,
            Section::Additional,
            header.arcount,
            RESOURCE_RECORD_MIN_LEN,
            |b| ResourceRecord::deserialise(id, b),
        )?;

        if buffer.remaining() > 0 {
            tracing::trace!(trailing = %buffer.remaining(), "ignoring trailing octets");
        }

        Ok(Self {
            header,
            questions,
            answers,
            authority,
            additional,
        })
    }
}

/// Read `count` entries of one section, after checking that the rest
/// of the buffer could possibly hold them.
fn read_section<'a, T, F>(
    buffer: &mut ConsumableBuffer<'a>,
    id: u16,
    section: Section,
    count: u16,
    entry_min_len: usize,
    mut read: F,
) -> Result<Vec<T>, DecodeError>
where
    F: FnMut(&mut ConsumableBuffer<'a>) -> Result<T, DecodeError>,
{
    let remaining = buffer.remaining();
    if usize::from(count) * entry_min_len > remaining {
        return Err(DecodeError::CountMismatch {
            id,
            section,
            declared: count,
            remaining,
        });
    }

    tracing::trace!(%section, %count, offset = %buffer.position, "reading section");

    let mut entries = Vec::with_capacity(count.into());
    for _ in 0..count {
        entries.push(read(buffer)?);
    }
    Ok(entries)
}

impl Header {
    /// # Errors
    ///
    /// If the header is too short.
    pub fn deserialise(buffer: &mut ConsumableBuffer) -> Result<Self, DecodeError> {
        let id = buffer.next_u16().ok_or_else(|| buffer.truncated(None))?;
        let flags = buffer.next_u16().ok_or_else(|| buffer.truncated(Some(id)))?;
        let qdcount = buffer.next_u16().ok_or_else(|| buffer.truncated(Some(id)))?;
        let ancount = buffer.next_u16().ok_or_else(|| buffer.truncated(Some(id)))?;
        let nscount = buffer.next_u16().ok_or_else(|| buffer.truncated(Some(id)))?;
        let arcount = buffer.next_u16().ok_or_else(|| buffer.truncated(Some(id)))?;

        Ok(Self {
            id,
            flags,
            qdcount,
            ancount,
            nscount,
            arcount,
        })
    }
}

impl Question {
    /// # Errors
    ///
    /// If the question cannot be parsed.
    pub fn deserialise(id: u16, buffer: &mut ConsumableBuffer) -> Result<Self, DecodeError> {
        let name = DomainName::deserialise(id, buffer)?;
        let qtype = QueryType::deserialise(id, buffer)?;
        let qclass = QueryClass::deserialise(id, buffer)?;

        Ok(Self {
            name,
            qtype,
            qclass,
        })
    }
}

impl ResourceRecord {
    /// The RDATA is not interpreted here, only delimited: see the
    /// `rdata` module.
    ///
    /// # Errors
    ///
    /// If the record cannot be parsed.
    pub fn deserialise(id: u16, buffer: &mut ConsumableBuffer) -> Result<Self, DecodeError> {
        let name = DomainName::deserialise(id, buffer)?;
        let rtype = RecordType::deserialise(id, buffer)?;
        let rclass = RecordClass::deserialise(id, buffer)?;
        let ttl = buffer.next_i32().ok_or_else(|| buffer.truncated(Some(id)))?;
        let rdlength = buffer.next_u16().ok_or_else(|| buffer.truncated(Some(id)))?;
        let rdata = buffer
            .take(rdlength.into())
            .ok_or_else(|| buffer.truncated(Some(id)))?;

        Ok(Self {
            name,
            rtype,
            rclass,
            ttl,
            rdata: Bytes::copy_from_slice(rdata),
        })
    }
}

impl DomainName {
    /// Decode a name starting at the current position, leaving the
    /// buffer just after the name's own encoding.  When the name ends
    /// in a compression pointer, the rest of the name is read from a
    /// separate cursor at the target, so the buffer only moves past
    /// the two pointer octets.
    ///
    /// # Errors
    ///
    /// If the domain cannot be parsed.
    pub fn deserialise(id: u16, buffer: &mut ConsumableBuffer) -> Result<Self, DecodeError> {
        let start = buffer.position;
        let mut labels = Vec::<Label>::with_capacity(5);
        // the terminating zero octet
        let mut len = 1;
        let mut reader = buffer.at_offset(start);
        let mut followed_pointer = false;
        let mut hops = 0;

        loop {
            let offset = reader.position;
            let size = reader.next_u8().ok_or_else(|| reader.truncated(Some(id)))?;

            if size == 0 {
                break;
            } else if usize::from(size) <= LABEL_MAX_LEN {
                let os = reader
                    .take(size.into())
                    .ok_or_else(|| reader.truncated(Some(id)))?;

                len += 1 + os.len();
                if len > DOMAINNAME_MAX_LEN {
                    return Err(DecodeError::NameTooLong { id, offset: start });
                }

                let label = Label::try_from(os).map_err(|_| DecodeError::InvalidLabel {
                    id,
                    offset,
                    octet: size,
                })?;
                labels.push(label);
            } else if size & NAME_POINTER_MASK == NAME_POINTER_MASK {
                let lo = reader.next_u8().ok_or_else(|| reader.truncated(Some(id)))?;
                let target = usize::from(u16::from_be_bytes([size & !NAME_POINTER_MASK, lo]));

                // pointer must be to somewhere earlier in the message
                // (RFC 1035 section 4.1.4), which also means every
                // chain of pointers ends: the hop bound is never
                // reached while that holds.
                hops += 1;
                if target >= offset || target >= reader.octets.len() || hops > reader.octets.len()
                {
                    return Err(DecodeError::InvalidPointer { id, offset, target });
                }

                if !followed_pointer {
                    buffer.position = reader.position;
                    followed_pointer = true;
                }

                tracing::trace!(%offset, %target, "following name pointer");
                reader = reader.at_offset(target);
            } else {
                // 0b01 and 0b10 prefixes are extended label types
                // (RFC 6891 section 5), which are not supported.
                return Err(DecodeError::InvalidLabel {
                    id,
                    offset,
                    octet: size,
                });
            }
        }

        if !followed_pointer {
            buffer.position = reader.position;
        }

        Ok(DomainName { labels, len })
    }
}

impl QueryType {
    /// # Errors
    ///
    /// If the query type is too short.
    pub fn deserialise(id: u16, buffer: &mut ConsumableBuffer) -> Result<Self, DecodeError> {
        let value = buffer.next_u16().ok_or_else(|| buffer.truncated(Some(id)))?;
        Ok(Self::from(value))
    }
}

impl QueryClass {
    /// # Errors
    ///
    /// If the query class is too short.
    pub fn deserialise(id: u16, buffer: &mut ConsumableBuffer) -> Result<Self, DecodeError> {
        let value = buffer.next_u16().ok_or_else(|| buffer.truncated(Some(id)))?;
        Ok(Self::from(value))
    }
}

impl RecordType {
    /// # Errors
    ///
    /// If the record type is too short.
    pub fn deserialise(id: u16, buffer: &mut ConsumableBuffer) -> Result<Self, DecodeError> {
        let value = buffer.next_u16().ok_or_else(|| buffer.truncated(Some(id)))?;
        Ok(Self::from(value))
    }
}

impl RecordClass {
    /// # Errors
    ///
    /// If the record class is too short.
    pub fn deserialise(id: u16, buffer: &mut ConsumableBuffer) -> Result<Self, DecodeError> {
        let value = buffer.next_u16().ok_or_else(|| buffer.truncated(Some(id)))?;
        Ok(Self::from(value))
    }
}

/// The sections of a message which hold a counted list of entries.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Section {
    Question,
    Answer,
    Authority,
    Additional,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Section::Question => write!(f, "question"),
            Section::Answer => write!(f, "answer"),
            Section::Authority => write!(f, "authority"),
            Section::Additional => write!(f, "additional"),
        }
    }
}

/// Errors encountered when parsing a datagram.  Wherever the header
/// got far enough to have an ID, the error carries it - so that an
/// error response can be sent.  Offsets are from the start of the
/// message.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DecodeError {
    /// Fewer octets remain than a field, or a declared length,
    /// requires.  The ID is missing if the datagram is not even 2
    /// octets long.
    Truncated { id: Option<u16>, offset: usize },

    /// A compression pointer at `offset` points to itself, to
    /// somewhere after itself, or outside the message.
    InvalidPointer {
        id: u16,
        offset: usize,
        target: usize,
    },

    /// The name starting at `offset` is over 255 octets in size.
    NameTooLong { id: u16, offset: usize },

    /// A section claims more entries than the rest of the message
    /// could possibly hold.
    CountMismatch {
        id: u16,
        section: Section,
        declared: u16,
        remaining: usize,
    },

    /// A label length octet is longer than 63, but not a pointer.
    InvalidLabel { id: u16, offset: usize, octet: u8 },
}

impl DecodeError {
    pub fn id(self) -> Option<u16> {
        match self {
            DecodeError::Truncated { id, .. } => id,
            DecodeError::InvalidPointer { id, .. } => Some(id),
            DecodeError::NameTooLong { id, .. } => Some(id),
            DecodeError::CountMismatch { id, .. } => Some(id),
            DecodeError::InvalidLabel { id, .. } => Some(id),
        }
    }

    /// Whether the message ended before its contents did.  A
    /// `CountMismatch` is a truncation detected before reading the
    /// section.
    pub fn is_truncation(self) -> bool {
        matches!(
            self,
            DecodeError::Truncated { .. } | DecodeError::CountMismatch { .. }
        )
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::Truncated { offset, .. } => {
                write!(f, "message truncated at offset {offset}")
            }
            DecodeError::InvalidPointer { offset, target, .. } => {
                write!(
                    f,
                    "name pointer at offset {offset} to offset {target} does not point backwards"
                )
            }
            DecodeError::NameTooLong { offset, .. } => {
                write!(
                    f,
                    "name at offset {offset} is longer than {DOMAINNAME_MAX_LEN} octets"
                )
            }
            DecodeError::CountMismatch {
                section,
                declared,
                remaining,
                ..
            } => write!(
                f,
                "{section} section declares {declared} entries but only {remaining} octets remain"
            ),
            DecodeError::InvalidLabel { offset, octet, .. } => {
                write!(f, "invalid label length octet {octet:#04x} at offset {offset}")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// A buffer which will be consumed by the parsing process.  Reads are
/// big-endian and never go past the end of the octets: a read which
/// would returns `None` and leaves the position unchanged.
#[derive(Debug, Copy, Clone)]
pub struct ConsumableBuffer<'a> {
    octets: &'a [u8],
    position: usize,
}

impl<'a> ConsumableBuffer<'a> {
    pub fn new(octets: &'a [u8]) -> Self {
        Self {
            octets,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.octets.len().saturating_sub(self.position)
    }

    pub fn next_u8(&mut self) -> Option<u8> {
        self.next_array().map(u8::from_be_bytes)
    }

    pub fn next_u16(&mut self) -> Option<u16> {
        self.next_array().map(u16::from_be_bytes)
    }

    pub fn next_u32(&mut self) -> Option<u32> {
        self.next_array().map(u32::from_be_bytes)
    }

    pub fn next_i32(&mut self) -> Option<i32> {
        self.next_array().map(i32::from_be_bytes)
    }

    pub fn take(&mut self, size: usize) -> Option<&'a [u8]> {
        let end = self.position.checked_add(size)?;
        let slice = self.octets.get(self.position..end)?;
        self.position = end;
        Some(slice)
    }

    /// A new buffer over the same octets, starting at `position`.
    pub fn at_offset(&self, position: usize) -> ConsumableBuffer<'a> {
        Self {
            octets: self.octets,
            position,
        }
    }

    fn next_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.take(N)?.try_into().ok()
    }

    fn truncated(&self, id: Option<u16>) -> DecodeError {
        DecodeError::Truncated {
            id,
            offset: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::protocol::types::test_util::*;

    /// A response to an `abc.com` A IN query, with the answer name
    /// compressed to a pointer back at the question.
    #[rustfmt::skip]
    const ABC_COM_RESPONSE: [u8; 41] = [
        // header
        0x42, 0xe2, 0x85, 0x80, 0, 1, 0, 1, 0, 0, 0, 0,
        // QNAME
        3, b'a', b'b', b'c', 3, b'c', b'o', b'm', 0,
        // QTYPE, QCLASS
        0, 1, 0, 1,
        // NAME (pointer to offset 12)
        0xc0, 0x0c,
        // TYPE, CLASS
        0, 1, 0, 1,
        // TTL
        0, 0, 0, 0,
        // RDLENGTH
        0, 4,
        // RDATA
        192, 168, 0, 125,
    ];

    #[test]
    fn decodes_abc_com_response() {
        let message = decode(&ABC_COM_RESPONSE).unwrap();

        assert_eq!(0x42e2, message.header().id());
        assert_eq!(0x8580, message.header().flags());
        assert_eq!(1, message.header().question_count());
        assert_eq!(1, message.header().answer_count());
        assert_eq!(0, message.header().authority_count());
        assert_eq!(0, message.header().additional_count());

        assert_eq!(1, message.questions().len());
        let q = &message.questions()[0];
        assert_eq!(&domain("abc.com"), q.name());
        assert_eq!(1, u16::from(q.qtype()));
        assert_eq!(1, u16::from(q.qclass()));

        assert_eq!(1, message.answers().len());
        let rr = &message.answers()[0];
        assert_eq!(&domain("abc.com"), rr.name());
        assert_eq!(RecordType::A, rr.rtype());
        assert_eq!(RecordClass::IN, rr.rclass());
        assert_eq!(0, rr.ttl());
        assert_eq!(4, rr.rdlength());
        assert_eq!(Ok(Ipv4Addr::new(192, 168, 0, 125)), rr.ipv4_address());

        assert!(message.authority().is_empty());
        assert!(message.additional().is_empty());
    }

    #[test]
    fn header_needs_12_octets() {
        let mut buffer = ConsumableBuffer::new(&ABC_COM_RESPONSE[..11]);
        assert_eq!(
            Err(DecodeError::Truncated {
                id: Some(0x42e2),
                offset: 10
            }),
            Header::deserialise(&mut buffer)
        );

        let mut buffer = ConsumableBuffer::new(&ABC_COM_RESPONSE[..1]);
        assert_eq!(
            Err(DecodeError::Truncated { id: None, offset: 0 }),
            Header::deserialise(&mut buffer)
        );

        let mut buffer = ConsumableBuffer::new(&ABC_COM_RESPONSE);
        assert!(Header::deserialise(&mut buffer).is_ok());
        assert_eq!(HEADER_LEN, buffer.position());
    }

    #[test]
    fn name_reader_stops_after_pointer() {
        let mut buffer = ConsumableBuffer::new(&ABC_COM_RESPONSE).at_offset(25);
        let name = DomainName::deserialise(0, &mut buffer).unwrap();

        assert_eq!(domain("abc.com."), name);
        assert_eq!(27, buffer.position());
    }

    #[test]
    fn name_reader_stops_after_root() {
        let mut buffer = ConsumableBuffer::new(&ABC_COM_RESPONSE).at_offset(12);
        let name = DomainName::deserialise(0, &mut buffer).unwrap();

        assert_eq!(domain("abc.com."), name);
        assert_eq!(9, name.wire_len());
        assert_eq!(21, buffer.position());
    }

    #[test]
    fn name_reader_root() {
        let mut buffer = ConsumableBuffer::new(&[0, 99]);
        assert_eq!(
            Ok(DomainName::root_domain()),
            DomainName::deserialise(0, &mut buffer)
        );
        assert_eq!(1, buffer.position());
    }

    #[test]
    #[rustfmt::skip]
    fn name_reader_label_then_pointer() {
        let octets = [
            3, b'c', b'o', b'm', 0,
            3, b'w', b'w', b'w', 0xc0, 0,
        ];
        let mut buffer = ConsumableBuffer::new(&octets).at_offset(5);

        assert_eq!(
            Ok(domain("www.com.")),
            DomainName::deserialise(0, &mut buffer)
        );
        assert_eq!(octets.len(), buffer.position());
    }

    #[test]
    #[rustfmt::skip]
    fn name_reader_pointer_chain() {
        let octets = [
            3, b'c', b'o', b'm', 0,
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 0xc0, 0,
            3, b'w', b'w', b'w', 0xc0, 5,
        ];
        let mut buffer = ConsumableBuffer::new(&octets).at_offset(15);

        assert_eq!(
            Ok(domain("www.example.com.")),
            DomainName::deserialise(0, &mut buffer)
        );
        assert_eq!(octets.len(), buffer.position());
    }

    #[test]
    fn name_reader_rejects_self_pointer() {
        let octets = [0xc0, 0];
        assert_eq!(
            Err(DecodeError::InvalidPointer {
                id: 7,
                offset: 0,
                target: 0
            }),
            DomainName::deserialise(7, &mut ConsumableBuffer::new(&octets))
        );
    }

    #[test]
    fn name_reader_rejects_forward_pointer() {
        let octets = [0xc0, 2, 0];
        assert_eq!(
            Err(DecodeError::InvalidPointer {
                id: 7,
                offset: 0,
                target: 2
            }),
            DomainName::deserialise(7, &mut ConsumableBuffer::new(&octets))
        );
    }

    #[test]
    #[rustfmt::skip]
    fn name_reader_rejects_loop_through_later_hop() {
        // offset 2 points back to 0, which is a label followed by a
        // pointer forward to 2 again
        let octets = [
            1, b'a', 0xc0, 0x04, 0xc0, 0x00,
        ];
        let mut buffer = ConsumableBuffer::new(&octets).at_offset(4);

        assert_eq!(
            Err(DecodeError::InvalidPointer {
                id: 0,
                offset: 2,
                target: 4
            }),
            DomainName::deserialise(0, &mut buffer)
        );
    }

    #[test]
    fn name_reader_rejects_extended_label_types() {
        for octet in [0b0100_0000, 0b1000_0000, 0b1011_1111] {
            let octets = [octet, 0];
            assert_eq!(
                Err(DecodeError::InvalidLabel {
                    id: 0,
                    offset: 0,
                    octet
                }),
                DomainName::deserialise(0, &mut ConsumableBuffer::new(&octets))
            );
        }
    }

    #[test]
    fn name_reader_rejects_long_names() {
        let mut octets = Vec::new();
        for _ in 0..4 {
            octets.push(63);
            octets.extend_from_slice(&[b'x'; 63]);
        }
        octets.push(0);

        assert_eq!(
            Err(DecodeError::NameTooLong { id: 0, offset: 0 }),
            DomainName::deserialise(0, &mut ConsumableBuffer::new(&octets))
        );
    }

    #[test]
    fn name_reader_rejects_long_names_through_pointers() {
        // 3 full labels, then a pointer back to the same labels: every
        // hop goes backwards, but the name grows past the limit.
        let mut octets = Vec::new();
        for _ in 0..3 {
            octets.push(63);
            octets.extend_from_slice(&[b'x'; 63]);
        }
        octets.push(0);
        let start = octets.len();
        octets.extend_from_slice(&[63]);
        octets.extend_from_slice(&[b'y'; 63]);
        octets.extend_from_slice(&[0xc0, 0]);

        let mut buffer = ConsumableBuffer::new(&octets).at_offset(start);
        assert_eq!(
            Err(DecodeError::NameTooLong {
                id: 0,
                offset: start
            }),
            DomainName::deserialise(0, &mut buffer)
        );
    }

    #[test]
    fn name_reader_truncated_label() {
        let octets = [3, b'c', b'o'];
        assert_eq!(
            Err(DecodeError::Truncated {
                id: Some(0),
                offset: 1
            }),
            DomainName::deserialise(0, &mut ConsumableBuffer::new(&octets))
        );
    }

    #[test]
    fn name_reader_truncated_pointer() {
        let octets = [0xc0];
        assert_eq!(
            Err(DecodeError::Truncated {
                id: Some(0),
                offset: 1
            }),
            DomainName::deserialise(0, &mut ConsumableBuffer::new(&octets))
        );
    }

    #[test]
    fn record_rdlength_past_end_is_truncated() {
        let mut octets = ABC_COM_RESPONSE.to_vec();
        // claim 5 octets of RDATA with only 4 present
        octets[36] = 5;

        assert_eq!(
            Err(DecodeError::Truncated {
                id: Some(0x42e2),
                offset: 37
            }),
            decode(&octets)
        );
    }

    #[test]
    fn record_keeps_unknown_rdata_opaque() {
        #[rustfmt::skip]
        let octets = [
            0, 0x64, 0, 1, 0xff, 0xff, 0xff, 0xff, 0, 3, 1, 2, 3,
        ];
        // root name first
        let mut with_name = vec![0];
        with_name.extend_from_slice(&octets);

        let rr = ResourceRecord::deserialise(0, &mut ConsumableBuffer::new(&with_name)).unwrap();
        assert_eq!(RecordType::from(100), rr.rtype());
        assert_eq!(-1, rr.ttl());
        assert!(!rr.ttl_is_valid());
        assert_eq!(&[1, 2, 3][..], &rr.rdata()[..]);
    }

    #[test]
    fn count_mismatch_detected_before_reading() {
        let mut octets = ABC_COM_RESPONSE.to_vec();
        // claim 2 answers
        octets[7] = 2;

        assert_eq!(
            Err(DecodeError::CountMismatch {
                id: 0x42e2,
                section: Section::Answer,
                declared: 2,
                remaining: 16,
            }),
            decode(&octets)
        );
    }

    #[test]
    fn huge_counts_are_rejected_without_reading() {
        let mut octets = ABC_COM_RESPONSE.to_vec();
        octets[4] = 0xff;
        octets[5] = 0xff;

        let err = decode(&octets).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::CountMismatch {
                section: Section::Question,
                declared: 0xffff,
                ..
            }
        ));
        assert!(err.is_truncation());
        assert_eq!(Some(0x42e2), err.id());
    }

    #[test]
    fn trailing_octets_are_ignored() {
        let mut octets = ABC_COM_RESPONSE.to_vec();
        octets.extend_from_slice(&[1, 2, 3]);

        assert_eq!(decode(&ABC_COM_RESPONSE), decode(&octets));
    }

    #[test]
    fn truncation_at_every_offset() {
        for len in 0..ABC_COM_RESPONSE.len() {
            let err = decode(&ABC_COM_RESPONSE[..len]).unwrap_err();
            assert!(err.is_truncation(), "length {len}: {err:?}");
        }
    }

    #[test]
    fn count_mismatch_names_the_section_being_read() {
        assert_eq!(
            Err(DecodeError::CountMismatch {
                id: 0x42e2,
                section: Section::Answer,
                declared: 1,
                remaining: 0,
            }),
            decode(&ABC_COM_RESPONSE[..25])
        );
    }

    #[test]
    fn truncated_question_is_truncated() {
        for len in 17..=24 {
            assert!(
                matches!(
                    decode(&ABC_COM_RESPONSE[..len]),
                    Err(DecodeError::Truncated {
                        id: Some(0x42e2),
                        ..
                    })
                ),
                "length {len}"
            );
        }
    }

    #[test]
    fn name_reader_accepts_255_octet_name() {
        let mut octets = Vec::new();
        for _ in 0..3 {
            octets.push(63);
            octets.extend_from_slice(&[b'x'; 63]);
        }
        octets.push(61);
        octets.extend_from_slice(&[b'y'; 61]);
        octets.push(0);

        let mut buffer = ConsumableBuffer::new(&octets);
        let name = DomainName::deserialise(0, &mut buffer).unwrap();
        assert_eq!(DOMAINNAME_MAX_LEN, name.wire_len());
        assert_eq!(DOMAINNAME_MAX_LEN, buffer.position());
    }

    #[test]
    fn consumable_buffer_does_not_move_on_failure() {
        let mut buffer = ConsumableBuffer::new(&[1, 2, 3]);
        assert_eq!(None, buffer.next_u32());
        assert_eq!(0, buffer.position());
        assert_eq!(Some(0x0102), buffer.next_u16());
        assert_eq!(None, buffer.take(2));
        assert_eq!(Some(3), buffer.next_u8());
        assert_eq!(0, buffer.remaining());
        assert_eq!(None, buffer.next_u8());
    }
}
