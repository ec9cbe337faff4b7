/// Parse a dev server port.
///
/// Port 0 would let the OS pick a port, which defeats probing from a known
/// base, so it is rejected.
///
/// # Errors
///
/// Returns an error message if the value is not a number in `1..=65535`.
pub fn parse_port(s: &str) -> Result<u16, String> {
    let port: u16 = s
        .trim()
        .parse()
        .map_err(|_| format!("Port must be a number between 1 and 65535: '{}'", s))?;

    if port == 0 {
        return Err("Port cannot be 0".to_string());
    }

    Ok(port)
}

/// Parse a dev server host name or address.
///
/// # Errors
///
/// Returns an error message if the host is empty or contains whitespace or a
/// scheme (`http://`).
pub fn parse_host(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("Host cannot be empty".to_string());
    }

    if s.contains("://") {
        return Err(format!(
            "Host must not include a scheme, use 'localhost' rather than 'http://localhost': '{}'",
            s
        ));
    }

    if s.chars().any(char::is_whitespace) {
        return Err(format!("Host cannot contain whitespace: '{}'", s));
    }

    Ok(s.to_string())
}
