//! Anti-spam heuristics
//!
//! Two cheap checks run before validation: a honeypot field invisible to
//! humans, and a minimum time between form load and submission. Both are
//! resolved with a fake success response so bots get no signal that they
//! were detected. Neither is a security boundary.

/// Minimum milliseconds between form load and submission.
pub const MIN_FILL_MILLIS: i64 = 3000;

/// A non-empty value in the decoy `fax_number` field means a bot filled
/// every input it could find.
pub fn honeypot_tripped(fax_number: Option<&str>) -> bool {
    fax_number.is_some_and(|value| !value.is_empty())
}

/// Submission arrived less than [`MIN_FILL_MILLIS`] after the client-supplied
/// form load timestamp. An absent or unparseable timestamp passes the check.
pub fn submitted_too_fast(form_load_millis: Option<i64>, now_millis: i64) -> bool {
    form_load_millis.is_some_and(|loaded| now_millis - loaded < MIN_FILL_MILLIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_honeypot() {
        assert!(honeypot_tripped(Some("555-0100")));
        assert!(!honeypot_tripped(Some("")));
        assert!(!honeypot_tripped(None));
    }

    #[test]
    fn test_too_fast() {
        let now = 1_000_000;
        assert!(submitted_too_fast(Some(now - 100), now));
        assert!(submitted_too_fast(Some(now - 2999), now));
        assert!(!submitted_too_fast(Some(now - 3000), now));
        assert!(!submitted_too_fast(Some(now - 60_000), now));
    }

    #[test]
    fn test_missing_timestamp_passes() {
        assert!(!submitted_too_fast(None, 1_000_000));
    }
}
