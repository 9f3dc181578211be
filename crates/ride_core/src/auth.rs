//! Phone-based authentication, mocked end to end.
//!
//! Verification codes are generated and logged instead of sent over SMS,
//! and — per the demo contract — any 6-digit numeric code verifies
//! successfully. Tokens are opaque random strings, not real JWTs.

use rand::Rng;
use thiserror::Error;

use crate::ecs::{User, UserId};

/// Minimum digits a phone number must contain.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Verification codes are exactly this many digits.
pub const CODE_LENGTH: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("phone number must contain at least {MIN_PHONE_DIGITS} digits")]
    InvalidPhoneNumber,
    #[error("invalid verification code")]
    InvalidCode,
}

/// A code issued for a phone number, waiting to be verified.
#[derive(Debug, Clone)]
pub struct VerificationChallenge {
    pub phone_number: String,
    pub code: String,
}

/// An authenticated session: the signed-in user and an opaque token.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Requested profile changes; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
}

/// Checks that `phone` has at least [MIN_PHONE_DIGITS] digits. Separators
/// (spaces, dashes, dots, parentheses) and a leading `+` are tolerated.
pub fn validate_phone_number(phone: &str) -> Result<(), AuthError> {
    let cleaned = phone.trim().trim_start_matches('+');
    let mut digits = 0;
    for ch in cleaned.chars() {
        if ch.is_ascii_digit() {
            digits += 1;
        } else if !matches!(ch, ' ' | '-' | '.' | '(' | ')') {
            return Err(AuthError::InvalidPhoneNumber);
        }
    }
    if digits < MIN_PHONE_DIGITS {
        return Err(AuthError::InvalidPhoneNumber);
    }
    Ok(())
}

/// Issues a verification code for `phone`. The code is logged in place of
/// SMS delivery.
pub fn send_verification_code(
    phone: &str,
    rng: &mut impl Rng,
) -> Result<VerificationChallenge, AuthError> {
    validate_phone_number(phone)?;
    let code = rng.gen_range(100_000..1_000_000).to_string();
    log::info!("verification code for {phone}: {code}");
    Ok(VerificationChallenge {
        phone_number: phone.to_string(),
        code,
    })
}

/// Verifies `code` for `phone` and opens a session.
///
/// Per the mock contract, any 6-digit numeric code is accepted; the code is
/// not compared against the one issued by [send_verification_code].
pub fn verify_code(phone: &str, code: &str, rng: &mut impl Rng) -> Result<Session, AuthError> {
    validate_phone_number(phone)?;
    if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(AuthError::InvalidCode);
    }
    let user = User::new(UserId(format!("u{:06x}", rng.gen::<u32>())), phone);
    let token = format!("tok_{:016x}", rng.gen::<u64>());
    log::info!("phone {phone} verified, user {}", user.id);
    Ok(Session { user, token })
}

/// Applies the `Some` fields of `update` to `user`.
pub fn update_profile(user: &mut User, update: ProfileUpdate) {
    if let Some(name) = update.name {
        user.name = Some(name);
    }
    if let Some(email) = update.email {
        user.email = Some(email);
    }
    if let Some(photo) = update.photo {
        user.photo = Some(photo);
    }
}
