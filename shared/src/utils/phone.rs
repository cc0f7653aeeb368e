//! Phone number string helpers shared by every layer

/// Keep only ASCII digits
pub fn digits_only(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Mask a phone number for logs, keeping the leading `+` and country
/// digits plus the last four digits (e.g. `+91******3210`)
pub fn mask_phone_number(phone: &str) -> String {
    let digits = digits_only(phone);
    if digits.len() < 7 {
        return "****".to_string();
    }
    let plus = if phone.trim_start().starts_with('+') { "+" } else { "" };
    let head = &digits[..2];
    let tail = &digits[digits.len() - 4..];
    format!("{}{}{}{}", plus, head, "*".repeat(digits.len() - 6), tail)
}
