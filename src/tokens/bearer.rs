use thiserror::Error;

const SCHEME: &str = "Bearer";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BearerError {
    #[error("Missing Authorization header")]
    Missing,
    #[error("Authorization header must use the Bearer scheme")]
    MalformedScheme,
    #[error("Bearer token is empty")]
    Empty,
}

/// Strip an optional leading `Bearer` label and surrounding whitespace.
///
/// Used by logout, which also accepts a bare token string.
pub fn strip_scheme(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.get(..SCHEME.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(SCHEME) => {
            let rest = &trimmed[SCHEME.len()..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest.trim()
            } else {
                trimmed
            }
        }
        _ => trimmed,
    }
}

/// Strictly parse an `Authorization` header value of the form `Bearer <token>`.
///
/// The scheme name is matched case-insensitively (RFC 7235), the same way
/// [`strip_scheme`] matches it.
pub fn parse_authorization(header: Option<&str>) -> Result<&str, BearerError> {
    let header = header.ok_or(BearerError::Missing)?;

    let rest = header
        .get(..SCHEME.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(SCHEME))
        .map(|_| &header[SCHEME.len()..])
        .filter(|rest| rest.starts_with(' '))
        .ok_or(BearerError::MalformedScheme)?;

    let token = rest.trim();
    if token.is_empty() {
        return Err(BearerError::Empty);
    }
    Ok(token)
}
