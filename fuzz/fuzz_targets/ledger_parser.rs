#![no_main]

use libfuzzer_sys::fuzz_target;
use rolemine::ledger::{decode_encoded_words, TicketLedger};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Must never panic; malformed records are counted, not fatal
        if let Ok(ledger) = TicketLedger::from_json_str(input) {
            let stats = ledger.stats();
            assert_eq!(stats.records_read - stats.records_skipped, ledger.len());
        }
        let _ = decode_encoded_words(input);
    }
});
