//! CSS length normalization for image size hints.

/// Units passed through verbatim when the raw value ends with them.
const SUPPORTED_UNITS: [&str; 3] = ["%", "px", "rem"];

/// Value used when no usable size is present.
pub const AUTO: &str = "auto";

/// Normalize a raw size hint into a CSS length.
///
/// The first run of ASCII digits is the size. Without digits, or when the
/// size is zero, the result is `"auto"`. Values ending in `%`, `px` or `rem`
/// are returned unchanged; anything else becomes `<digits>px`, dropping
/// unrecognized units.
///
/// # Examples
///
/// ```
/// use enclave_renderer::normalize_size;
///
/// assert_eq!(normalize_size("100"), "100px");
/// assert_eq!(normalize_size("10rem"), "10rem");
/// assert_eq!(normalize_size("100em"), "100px");
/// assert_eq!(normalize_size(""), "auto");
/// ```
pub fn normalize_size(raw: &str) -> String {
    let Some(digits) = first_digit_run(raw) else {
        return AUTO.to_owned();
    };

    if digits.bytes().all(|b| b == b'0') {
        return AUTO.to_owned();
    }

    if SUPPORTED_UNITS.iter().any(|unit| raw.ends_with(unit)) {
        return raw.to_owned();
    }

    format!("{digits}px")
}

/// First contiguous run of ASCII digits in `s`.
fn first_digit_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}
