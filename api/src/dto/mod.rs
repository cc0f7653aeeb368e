//! Data transfer objects for the HTTP API

pub mod otp;

pub use otp::{
    OtpStatusQuery, OtpStatusResponse, ProfileResponse, SendOtpResponse, UpdateContactRequest, VerifyOtpRequest,
    VerifyOtpResponse,
};
