//! Authenticated contact verification endpoints
//!
//! Every handler here runs behind `IdentityAuth` and acts on the caller's
//! own profile:
//! - `login`: create or refresh the profile
//! - `contact`: register a contact number
//! - `send_otp` / `resend_otp`: issue a challenge over SMS
//! - `verify_otp`: check a submitted code
//! - `otp_status`: provider delivery status of a sent message

pub mod contact;
pub mod login;
pub mod otp_status;
pub mod resend_otp;
pub mod send_otp;
pub mod verify_otp;
