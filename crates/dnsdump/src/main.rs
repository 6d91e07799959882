use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{stdin, Read};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use dns_types::protocol::decode;
use dns_types::protocol::types::{Header, Message, ResourceRecord};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum InputFormat {
    /// The message octets, as received
    Raw,
    /// Hexadecimal digits, whitespace is ignored
    Hex,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Plain,
    Json,
}

// the doc comments for this struct turn into the CLI help text
#[derive(Parser)]
/// Decode a DNS message and print its contents.
///
/// Log output is controlled by the RUST_LOG environment variable.
struct Args {
    /// File to read the message from, stdin if not given
    #[clap(value_parser)]
    path: Option<PathBuf>,

    /// How the message is encoded
    #[clap(short, long, value_enum, default_value_t = InputFormat::Raw, env = "DNSDUMP_FORMAT")]
    format: InputFormat,

    /// Format of log messages written to stderr
    #[clap(long, value_enum, default_value_t = LogFormat::Plain, env = "DNSDUMP_LOG_FORMAT")]
    log_format: LogFormat,
}

fn begin_logging(format: LogFormat) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Plain => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}

fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let digits = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(16).and_then(|d| u8::try_from(d).ok()))
        .collect::<Option<Vec<u8>>>()?;

    if digits.len() % 2 != 0 {
        return None;
    }

    Some(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}

fn reserved_note(is_reserved: bool) -> &'static str {
    if is_reserved {
        " (reserved)"
    } else {
        ""
    }
}

fn record_note(rr: &ResourceRecord) -> Option<&'static str> {
    if rr.rtype().is_pseudo() {
        Some("pseudo-record")
    } else if rr.is_unknown() {
        Some("unknown type or class")
    } else {
        None
    }
}

fn print_header(header: &Header) {
    println!(";; HEADER");
    println!("Transaction ID: {:#06x}", header.id());
    println!("Flags: {:016b}", header.flags());
    println!(
        "opcode: {}{}, rcode: {}{}, qr: {}, aa: {}, tc: {}, rd: {}, ra: {}",
        header.opcode(),
        reserved_note(header.opcode().is_reserved()),
        header.rcode(),
        reserved_note(header.rcode().is_reserved()),
        u8::from(header.is_response()),
        u8::from(header.is_authoritative()),
        u8::from(header.is_truncated()),
        u8::from(header.recursion_desired()),
        u8::from(header.recursion_available()),
    );
    println!(
        "Questions: {}, Answers: {}, Authority: {}, Additional: {}",
        header.question_count(),
        header.answer_count(),
        header.authority_count(),
        header.additional_count(),
    );
}

fn print_section(heading: &str, rrs: &[ResourceRecord]) {
    if rrs.is_empty() {
        return;
    }

    println!("\n;; {heading}");
    for rr in rrs {
        let rdata = match rr.interpret() {
            Ok(rdata) => rdata.to_string(),
            Err(err) => format!("; {err}"),
        };
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            rr.name(),
            rr.ttl(),
            rr.rclass(),
            rr.rtype(),
            rr.rdlength(),
            rdata
        );
        if let Some(note) = record_note(rr) {
            println!("; {note}");
        }
    }
}

fn print_message(message: &Message) {
    print_header(message.header());

    if !message.questions().is_empty() {
        println!("\n;; QUESTION");
        for question in message.questions() {
            println!(
                "{}\t{}\t{}",
                question.name(),
                question.qclass(),
                question.qtype()
            );
            if question.is_unknown() {
                println!("; unknown type or class");
            }
        }
    }

    print_section("ANSWER", message.answers());
    print_section("AUTHORITY", message.authority());
    print_section("ADDITIONAL", message.additional());
}

fn main() {
    let args = Args::parse();
    begin_logging(args.log_format);

    let read = match &args.path {
        Some(path) => fs::read(path),
        None => {
            let mut buf = Vec::new();
            stdin().read_to_end(&mut buf).map(|_| buf)
        }
    };
    let mut octets = match read {
        Ok(os) => os,
        Err(err) => {
            eprintln!("error reading message: {err}");
            process::exit(1);
        }
    };

    if args.format == InputFormat::Hex {
        match std::str::from_utf8(&octets).ok().and_then(parse_hex) {
            Some(os) => octets = os,
            None => {
                eprintln!("error reading message: not a hex string");
                process::exit(1);
            }
        }
    }

    tracing::debug!(length = %octets.len(), "decoding message");

    match decode(&octets) {
        Ok(message) => print_message(&message),
        Err(err) => {
            match err.id() {
                Some(id) => eprintln!("error decoding message {id:#06x}: {err}"),
                None => eprintln!("error decoding message: {err}"),
            }
            process::exit(1);
        }
    }
}
