// RFC 2047 encoded-word decoding for mail-generated ticket summaries
//
// Tickets created from inbound mail keep subjects like
// "=?utf-8?Q?Sicherung_f=C3=BCr_Exchange?=". Only Q-encoding is decoded;
// B-encoded words are left as-is.

use regex::{Captures, Regex};
use std::sync::OnceLock;

fn encoded_word() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"=\?([A-Za-z0-9_\-]+)\?([QqBb])\?([^?]*)\?=").expect("static regex is valid")
    })
}

/// Decode all Q-encoded words in `text`
pub fn decode_encoded_words(text: &str) -> String {
    if !text.contains("=?") {
        return text.to_string();
    }

    encoded_word()
        .replace_all(text, |caps: &Captures<'_>| {
            let charset = caps[1].to_ascii_lowercase();
            let encoding = &caps[2];
            if !encoding.eq_ignore_ascii_case("q") {
                return caps[0].to_string();
            }
            let bytes = decode_q(&caps[3]);
            if charset == "utf-8" || charset == "utf8" {
                String::from_utf8_lossy(&bytes).into_owned()
            } else {
                // Latin-1 and friends: bytes map 1:1 onto code points
                bytes.iter().map(|&b| b as char).collect()
            }
        })
        .into_owned()
}

fn decode_q(payload: &str) -> Vec<u8> {
    let raw = payload.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'_' => {
                out.push(b' ');
                i += 1;
            }
            b'=' if i + 2 < raw.len() => {
                match hex::decode(&raw[i + 1..i + 3]) {
                    Ok(decoded) => out.extend_from_slice(&decoded),
                    Err(_) => out.extend_from_slice(&raw[i..i + 3]),
                }
                i += 3;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    out
}
