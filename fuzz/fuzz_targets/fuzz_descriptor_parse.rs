#![no_main]

use libfuzzer_sys::fuzz_target;

// Goal: the descriptor parser never panics or hangs on arbitrary input;
// malformed XML is always a structured error.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let _ = gwtkit_module::parse_descriptor(text);
});
