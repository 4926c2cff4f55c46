//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Feeds arbitrary bytes to `CiteConfig::parse()` to find panics or hangs in
//! TOML parsing and keyword/level validation.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Only the absence of panics matters here.
        let _ = citecompass_config::CiteConfig::parse(s);
    }
});
