//! Reversible base-36 short-link tokens.
//!
//! A token is the recipe identifier written in base 36 over `0-9a-z`. This is
//! a pure bijective encoding, not a random short-code generator: every
//! identifier has exactly one token and every token decodes back to exactly
//! one identifier.

use crate::domain::Error;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const BASE: u64 = 36;

/// Encode a numeric identifier as a base-36 token.
///
/// Zero encodes as `"0"`; all other values have a non-zero leading digit and
/// no padding.
pub fn encode(id: u64) -> String {
    if id == 0 {
        return "0".to_owned();
    }
    let mut digits = Vec::new();
    let mut rest = id;
    while rest > 0 {
        digits.push(ALPHABET[(rest % BASE) as usize]);
        rest /= BASE;
    }
    digits.reverse();
    // The alphabet is ASCII, so the bytes are valid UTF-8.
    String::from_utf8(digits).unwrap_or_default()
}

/// Decode a base-36 token back into a numeric identifier.
///
/// Fails with [`Error::MalformedToken`] on an empty token, any character
/// outside `0-9a-z` (uppercase included), or a value that overflows `u64`.
pub fn decode(token: &str) -> Result<u64, Error> {
    if token.is_empty() {
        return Err(malformed(token));
    }
    let mut value: u64 = 0;
    for byte in token.bytes() {
        let digit = match byte {
            b'0'..=b'9' => u64::from(byte - b'0'),
            b'a'..=b'z' => u64::from(byte - b'a') + 10,
            _ => return Err(malformed(token)),
        };
        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| malformed(token))?;
    }
    Ok(value)
}

fn malformed(token: &str) -> Error {
    Error::MalformedToken {
        token: token.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(1, "1")]
    #[case(10, "a")]
    #[case(35, "z")]
    #[case(36, "10")]
    #[case(1_295, "zz")]
    #[case(1_296, "100")]
    #[case(u64::MAX, "3w5e11264sgsf")]
    fn encodes_known_values(#[case] id: u64, #[case] token: &str) {
        assert_eq!(encode(id), token);
    }

    #[rstest]
    fn round_trips_sampled_identifiers() {
        for id in (0..10_000u64)
            .chain([u64::from(u32::MAX), u64::MAX - 1, u64::MAX])
        {
            assert_eq!(decode(&encode(id)).expect("round trip"), id);
        }
    }

    #[rstest]
    fn tokens_stay_inside_the_alphabet() {
        for id in [0u64, 7, 36, 999_999, u64::MAX] {
            assert!(encode(id)
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
        }
    }

    #[rstest]
    #[case("")]
    #[case("ABC")]
    #[case("1a!")]
    #[case("with space")]
    #[case("ñ")]
    fn rejects_out_of_alphabet_tokens(#[case] token: &str) {
        let error = decode(token).expect_err("malformed");
        assert_eq!(error.code(), "malformed_token");
    }

    #[rstest]
    fn rejects_overflowing_tokens() {
        // One digit longer than the encoding of u64::MAX.
        let error = decode("3w5e11264sgsf0").expect_err("overflow");
        assert_eq!(error.code(), "malformed_token");
    }

    #[rstest]
    fn leading_zeros_decode_but_are_never_produced() {
        assert_eq!(decode("007").expect("decodes"), 7);
        assert_eq!(encode(7), "7");
    }
}
