//! One-time password records.

use serde::{Deserialize, Serialize};

/// What an OTP was issued for. A code only verifies for its own purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Signup,
    PasswordReset,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Signup => "signup",
            OtpPurpose::PasswordReset => "password_reset",
        }
    }
}

/// Pending OTP stored in Firestore.
///
/// Deleted on successful verification; expired records are purged the next
/// time a code is issued for the same email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Document ID
    pub id: String,
    /// Normalized email the code was sent to
    pub email: String,
    /// Six ASCII digits
    pub otp: String,
    pub purpose: OtpPurpose,
    /// Issue time (RFC3339, nanosecond precision)
    pub created_at: String,
    #[serde(default)]
    pub verified: bool,
}
