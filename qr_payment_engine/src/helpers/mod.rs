//! Small helpers that don't belong to any one subsystem.

use rand::Rng;

/// Prefix carried by every generated payment code, so codes are recognisable in bank statements.
pub const PAYMENT_CODE_PREFIX: &str = "SEVQR";
/// Number of random characters appended to the prefix.
pub const PAYMENT_CODE_RANDOM_LEN: usize = 5;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a fresh payment code: the `SEVQR` prefix plus random uppercase alphanumerics.
///
/// The code ends up in the transfer memo the payer's banking app sends, and the match engine later looks for it
/// with a substring check, so the charset deliberately avoids characters that banks strip or mangle.
pub fn new_payment_code() -> String {
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(PAYMENT_CODE_PREFIX.len() + PAYMENT_CODE_RANDOM_LEN);
    code.push_str(PAYMENT_CODE_PREFIX);
    for _ in 0..PAYMENT_CODE_RANDOM_LEN {
        let i = rng.gen_range(0..CODE_CHARSET.len());
        code.push(CODE_CHARSET[i] as char);
    }
    code
}
