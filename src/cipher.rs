//! Caesar cipher used by the `decode_caesar` tool
//!
//! Only ASCII letters are shifted; everything else passes through untouched.

const ALPHABET_LEN: i64 = 26;

/// Undo a Caesar shift of `shift` positions.
///
/// Total over all inputs: any shift, including negative or very large ones,
/// behaves like its modulo-26 equivalent.
pub fn decode(text: &str, shift: i64) -> String {
    text.chars().map(|c| rotate(c, -normalize(shift))).collect()
}

/// Apply a Caesar shift of `shift` positions.
#[cfg(test)]
pub fn encode(text: &str, shift: i64) -> String {
    text.chars().map(|c| rotate(c, normalize(shift))).collect()
}

fn normalize(shift: i64) -> i64 {
    shift.rem_euclid(ALPHABET_LEN)
}

fn rotate(c: char, offset: i64) -> char {
    let base = match c {
        'a'..='z' => b'a',
        'A'..='Z' => b'A',
        _ => return c,
    };
    let code = i64::from(u32::from(c) - u32::from(base));
    let shifted = (code + offset).rem_euclid(ALPHABET_LEN);
    // shifted is in 0..26, so the narrowing is lossless
    char::from(base + u8::try_from(shifted).unwrap_or(0))
}
