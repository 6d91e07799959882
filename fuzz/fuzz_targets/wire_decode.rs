#![no_main]
use libfuzzer_sys::fuzz_target;

use dns_types::protocol::decode;

fuzz_target!(|data: &[u8]| {
    if let Err(error) = decode(data) {
        if data.len() >= 2 {
            assert_eq!(Some(u16::from_be_bytes([data[0], data[1]])), error.id());
        }
    }
});
