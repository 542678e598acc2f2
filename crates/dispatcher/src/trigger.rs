//! Trigger payload parsing.

use courier_common::error::DispatchError;

/// Parse a trigger message body into a notification id.
///
/// The body is the UTF-8 decimal text of the id; surrounding whitespace is
/// tolerated. Anything else is a `MalformedTrigger`, which is logged and
/// never redelivered.
pub fn parse_trigger(body: &str) -> Result<i32, DispatchError> {
    body.trim()
        .parse::<i32>()
        .map_err(|_| DispatchError::MalformedTrigger(body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_decimal_id() {
        assert_eq!(parse_trigger("42").unwrap(), 42);
    }

    #[test]
    fn test_tolerates_surrounding_whitespace() {
        assert_eq!(parse_trigger("  7\n").unwrap(), 7);
    }

    #[test]
    fn test_rejects_non_integer_body() {
        let err = parse_trigger("not-a-number").unwrap_err();
        assert!(matches!(err, DispatchError::MalformedTrigger(_)));
    }

    #[test]
    fn test_rejects_empty_body() {
        assert!(matches!(
            parse_trigger(""),
            Err(DispatchError::MalformedTrigger(_))
        ));
    }

    #[test]
    fn test_rejects_trailing_garbage() {
        assert!(matches!(
            parse_trigger("42abc"),
            Err(DispatchError::MalformedTrigger(_))
        ));
    }

    #[test]
    fn test_malformed_error_carries_original_body() {
        match parse_trigger("12.5") {
            Err(DispatchError::MalformedTrigger(body)) => assert_eq!(body, "12.5"),
            other => panic!("expected MalformedTrigger, got {other:?}"),
        }
    }
}
