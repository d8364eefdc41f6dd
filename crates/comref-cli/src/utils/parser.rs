use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected exactly three numbers in '{input}', found {found}.")]
    ComponentCount { input: String, found: usize },

    #[error("Invalid number '{token}' in '{input}'.")]
    InvalidNumber { token: String, input: String },

    #[error("Invalid override '{0}'. Expected KEY=VALUE.")]
    InvalidAssignment(String),
}

/// Parses three whitespace- or comma-separated numbers, e.g. `"7.5 7.5 12.0"`.
pub fn parse_vec3(input: &str) -> Result<[f64; 3], ParseError> {
    let tokens: Vec<&str> = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.len() != 3 {
        return Err(ParseError::ComponentCount {
            input: input.to_string(),
            found: tokens.len(),
        });
    }

    let mut values = [0.0; 3];
    for (value, token) in values.iter_mut().zip(&tokens) {
        *value = token.parse().map_err(|_| ParseError::InvalidNumber {
            token: token.to_string(),
            input: input.to_string(),
        })?;
    }
    Ok(values)
}

/// Splits a `--set` override into its key and raw value.
pub fn parse_assignment(kv_pair: &str) -> Result<(&str, &str), ParseError> {
    match kv_pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidAssignment(kv_pair.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_vec3_accepts_whitespace_separated_numbers() {
        assert_eq!(parse_vec3("7.5 7.5  12"), Ok([7.5, 7.5, 12.0]));
        assert_eq!(parse_vec3("\t1e1\n2 3 "), Ok([10.0, 2.0, 3.0]));
    }

    #[test]
    fn parse_vec3_accepts_commas() {
        assert_eq!(parse_vec3("1.0, 2.0, 3.0"), Ok([1.0, 2.0, 3.0]));
    }

    #[test]
    fn parse_vec3_rejects_wrong_component_count() {
        assert_eq!(
            parse_vec3("1.0 2.0"),
            Err(ParseError::ComponentCount {
                input: "1.0 2.0".to_string(),
                found: 2
            })
        );
        assert!(matches!(
            parse_vec3("1 2 3 4"),
            Err(ParseError::ComponentCount { found: 4, .. })
        ));
    }

    #[test]
    fn parse_vec3_rejects_non_numbers() {
        assert_eq!(
            parse_vec3("1.0 two 3.0"),
            Err(ParseError::InvalidNumber {
                token: "two".to_string(),
                input: "1.0 two 3.0".to_string()
            })
        );
    }

    #[test]
    fn parse_assignment_splits_on_first_equals_sign() {
        assert_eq!(
            parse_assignment("pull.cylinder.cutoff=1.5"),
            Ok(("pull.cylinder.cutoff", "1.5"))
        );
        assert_eq!(parse_assignment("a=b=c"), Ok(("a", "b=c")));
    }

    #[test]
    fn parse_assignment_rejects_missing_key_or_value_separator() {
        assert!(parse_assignment("pull.history-depth").is_err());
        assert!(parse_assignment("=3").is_err());
    }
}
