use std::num::ParseIntError;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseCountError {
    Empty,
    InvalidNumber(ParseIntError),
}

/// Parses a seeders/leechers cell as a plain base-10 count.
pub fn parse_count(input: &str) -> Result<u32, ParseCountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseCountError::Empty);
    }
    input
        .parse::<u32>()
        .map_err(ParseCountError::InvalidNumber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_values() {
        assert_eq!(parse_count("0").unwrap(), 0);
        assert_eq!(parse_count(" 42\n").unwrap(), 42);
        assert_eq!(parse_count("").unwrap_err(), ParseCountError::Empty);
        assert!(matches!(
            parse_count("1.2K").unwrap_err(),
            ParseCountError::InvalidNumber(_)
        ));
        assert!(matches!(
            parse_count("-3").unwrap_err(),
            ParseCountError::InvalidNumber(_)
        ));
        assert!(matches!(
            parse_count("1,024").unwrap_err(),
            ParseCountError::InvalidNumber(_)
        ));
    }
}
