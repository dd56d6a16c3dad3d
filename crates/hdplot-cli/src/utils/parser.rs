use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid figure size '{0}'. Expected 'WIDTH,HEIGHT' in inches (e.g., '7,5').")]
    InvalidFigsize(String),

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Parses `W,H` into a positive width and height.
pub fn parse_figsize(s: &str) -> Result<(f64, f64), ParseError> {
    let invalid = || ParseError::InvalidFigsize(s.to_string());
    let (w, h) = s.split_once(',').ok_or_else(invalid)?;
    let w: f64 = w.trim().parse().map_err(|_| invalid())?;
    let h: f64 = h.trim().parse().map_err(|_| invalid())?;
    if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
        return Err(invalid());
    }
    Ok((w, h))
}

pub fn parse_key_value(s: &str) -> Result<(&str, &str), ParseError> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidKeyValue(s.to_string())),
    }
}

pub fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figsize_accepts_two_positive_numbers() {
        assert_eq!(parse_figsize("7,5"), Ok((7.0, 5.0)));
        assert_eq!(parse_figsize(" 3.5 , 10 "), Ok((3.5, 10.0)));
    }

    #[test]
    fn figsize_rejects_malformed_input() {
        for bad in ["7", "7x5", "a,b", "0,5", "-1,5", "7,5,1", "inf,2"] {
            assert_eq!(
                parse_figsize(bad),
                Err(ParseError::InvalidFigsize(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn key_value_splits_at_first_equals_sign() {
        assert_eq!(
            parse_key_value("output.filename=a=b"),
            Ok(("output.filename", "a=b"))
        );
        assert_eq!(parse_key_value("plot.show-n="), Ok(("plot.show-n", "")));
        assert!(parse_key_value("plot.show-n").is_err());
        assert!(parse_key_value("=true").is_err());
    }

    #[test]
    fn value_parsing_reports_the_key() {
        assert_eq!(parse_value::<u32>("output.dpi", "300"), Ok(300));
        assert_eq!(
            parse_value::<bool>("plot.show-n", "maybe"),
            Err(ParseError::InvalidValue {
                key: "plot.show-n".into(),
                value: "maybe".into(),
            })
        );
    }
}
