use soroban_sdk::String;

/// Largest raw (untrimmed) token accepted by [`normalize_token`].
pub const MAX_RAW_TOKEN_LEN: usize = 32;
/// Largest normalised token returned by [`normalize_token`].
pub const MAX_TOKEN_LEN: usize = 16;

/// A trimmed, upper-cased token held on the stack.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token {
    buf: [u8; MAX_TOKEN_LEN],
    len: usize,
}

impl Token {
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Copies `value` into an `N`-byte stack buffer and passes the populated
/// prefix to `f`. Returns `None` when the string is longer than `N`.
pub fn with_bytes<const N: usize, R>(value: &String, f: impl FnOnce(&[u8]) -> R) -> Option<R> {
    let len = value.len() as usize;
    if len > N {
        return None;
    }
    let mut buf = [0u8; N];
    value.copy_into_slice(&mut buf[..len]);
    Some(f(&buf[..len]))
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Trims surrounding ASCII whitespace and upper-cases `value`.
///
/// Returns `None` for empty tokens and for tokens that do not fit the
/// bounded buffers.
pub fn normalize_token(value: &String) -> Option<Token> {
    with_bytes::<MAX_RAW_TOKEN_LEN, _>(value, |raw| {
        let trimmed = trim_ascii(raw);
        if trimmed.is_empty() || trimmed.len() > MAX_TOKEN_LEN {
            return None;
        }
        let mut buf = [0u8; MAX_TOKEN_LEN];
        for (dst, src) in buf.iter_mut().zip(trimmed) {
            *dst = src.to_ascii_uppercase();
        }
        Some(Token {
            buf,
            len: trimmed.len(),
        })
    })
    .flatten()
}

/// True when every byte is graphic ASCII (or a plain space, if allowed).
pub fn is_printable_ascii(bytes: &[u8], allow_space: bool) -> bool {
    bytes
        .iter()
        .all(|b| b.is_ascii_graphic() || (allow_space && *b == b' '))
}

/// Length-bounded printable check for a `soroban_sdk::String`.
///
/// `N` is the maximum accepted byte length; empty strings are rejected.
pub fn is_bounded_printable<const N: usize>(value: &String, allow_space: bool) -> bool {
    if value.is_empty() {
        return false;
    }
    with_bytes::<N, _>(value, |bytes| is_printable_ascii(bytes, allow_space)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    #[test]
    fn normalize_token_trims_and_uppercases() {
        let env = Env::default();
        let token = normalize_token(&String::from_str(&env, "  rEaD ")).unwrap();
        assert_eq!(token.as_bytes(), b"READ");
    }

    #[test]
    fn normalize_token_rejects_blank_and_oversized() {
        let env = Env::default();
        assert!(normalize_token(&String::from_str(&env, "   ")).is_none());
        assert!(normalize_token(&String::from_str(&env, "")).is_none());
        assert!(normalize_token(&String::from_str(&env, "PERMISSION_THAT_IS_TOO_LONG")).is_none());
    }

    #[test]
    fn bounded_printable_checks_length_and_charset() {
        let env = Env::default();
        assert!(is_bounded_printable::<8>(&String::from_str(&env, "abc-123"), false));
        assert!(!is_bounded_printable::<8>(&String::from_str(&env, "abc 123"), false));
        assert!(is_bounded_printable::<8>(&String::from_str(&env, "abc 123"), true));
        assert!(!is_bounded_printable::<4>(&String::from_str(&env, "abcde"), false));
        assert!(!is_bounded_printable::<4>(&String::from_str(&env, ""), false));
    }
}
