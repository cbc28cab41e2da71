// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.


/// Helper for converting the numeric suffix of a command word to an integer.
///
/// Only plain digit strings below `max` are accepted, so `"01"` and `"1"` give
/// the same code while `"1.5"`, `"-1"` or `""` give `None`.
pub fn code_number(suffix: &str, max: u16) -> Option<u16> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // leading zeros must not overflow the integer parse
    let digits = suffix.trim_start_matches('0');
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse::<u16>().ok().filter(|&n| n < max)
}

#[cfg(test)]
mod tests {
    use super::code_number;

    #[test]
    fn test_code_number() {
        assert_eq!(code_number("00", 100), Some(0));
        assert_eq!(code_number("0", 100), Some(0));
        assert_eq!(code_number("01", 100), Some(1));
        assert_eq!(code_number("054", 100), Some(54));
        assert_eq!(code_number("99", 100), Some(99));
        assert_eq!(code_number("100", 100), None);
        assert_eq!(code_number("0000000000017", 100), Some(17));
        assert_eq!(code_number("", 100), None);
        assert_eq!(code_number("1.5", 100), None);
        assert_eq!(code_number("-1", 100), None);
        assert_eq!(code_number("X", 100), None);
        assert_eq!(code_number("99999999", 100), None);
    }
}
