//! Decoding of DNS messages in the RFC 1035 wire format.
//!
//! ```
//! let octets = [
//!     0x42, 0xe2, 0x81, 0x80, 0, 1, 0, 0, 0, 0, 0, 0, // header
//!     3, b'a', b'b', b'c', 3, b'c', b'o', b'm', 0, 0, 1, 0, 1, // question
//! ];
//! let message = dns_types::protocol::decode(&octets).unwrap();
//! assert_eq!(0x42e2, message.header().id());
//! assert_eq!("abc.com.", message.questions()[0].name().to_dotted_string());
//! ```

pub mod protocol;
