#![no_main]

use libfuzzer_sys::fuzz_target;

fn assert_safe_slice(text: &str, start: usize, end: usize) {
    assert!(start <= end, "invalid range: {start} > {end}");
    assert!(
        end <= text.len(),
        "range end out of bounds: {end} > {}",
        text.len()
    );
    assert!(
        text.is_char_boundary(start),
        "range start not on a char boundary: {start}"
    );
    assert!(
        text.is_char_boundary(end),
        "range end not on a char boundary: {end}"
    );
    let _ = &text[start..end];
}

// Goal: never panic / never hang on malformed input, and always return spans
// that are safe to slice in the original UTF-8 input.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let parsed = gwtkit_i18n::parse(text);
    for entry in &parsed.entries {
        assert_safe_slice(text, entry.key_span.start, entry.key_span.end);
        assert_safe_slice(text, entry.value_span.start, entry.value_span.end);
    }
});
