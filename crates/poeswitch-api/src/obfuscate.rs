// Login password obfuscation
//
// The firmware's login page mangles the password before POSTing it:
// every character is shifted down by the password length and preceded
// by one random alphanumeric noise character, with one extra noise
// character at the end. This is not encryption; it only has to match
// what the device expects.

use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::error::Error;

/// Encode a password for `/login.cgi` using the thread-local RNG.
pub fn encode(password: &str) -> Result<String, Error> {
    encode_with(password, &mut rand::thread_rng())
}

/// Encode a password with a caller-supplied noise source.
///
/// Output length is always `2 * chars + 1`. Fails if a shifted code point
/// falls below zero or into the surrogate range.
pub fn encode_with<R: Rng + ?Sized>(password: &str, rng: &mut R) -> Result<String, Error> {
    let chars: Vec<char> = password.chars().collect();
    let shift = u32::try_from(chars.len()).map_err(|_| unencodable())?;

    let mut out = String::with_capacity(chars.len() * 2 + 1);
    for c in &chars {
        out.push(noise(rng));
        let shifted = u32::from(*c)
            .checked_sub(shift)
            .and_then(char::from_u32)
            .ok_or_else(unencodable)?;
        out.push(shifted);
    }
    out.push(noise(rng));
    Ok(out)
}

fn noise<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(rng.sample(Alphanumeric))
}

fn unencodable() -> Error {
    Error::Authentication {
        message: "password contains characters the device cannot encode".into(),
    }
}
