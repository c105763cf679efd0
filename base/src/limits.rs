//! Size limits applied while reading definition documents
//!
//! The value codec walks values with an explicit stack and the JSON backend parses
//! without a recursion limit, so JSON documents nest as deep as memory allows. The YAML
//! backend stops at a fixed nesting depth, which YAML output is checked against.

/// Default maximum size of a definition document accepted by the reader (10MB)
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Length of an ISO 639-1 language code
pub const LANGUAGE_CODE_LENGTH: usize = 2;

/// Deepest container nesting the YAML parser reads back, counting the root mapping
/// (serde_yaml's recursion limit)
pub const YAML_MAX_NESTING_DEPTH: usize = 128;

/// Maximum number of fractional second digits kept by the duration codec (nanoseconds)
pub const MAX_FRACTION_DIGITS: usize = 9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_are_positive() {
        assert!(DEFAULT_MAX_DOCUMENT_BYTES > 0);
        assert_eq!(LANGUAGE_CODE_LENGTH, 2);
    }

    #[test]
    fn test_reasonable_limits() {
        assert!(
            DEFAULT_MAX_DOCUMENT_BYTES <= 64 * 1024 * 1024,
            "DEFAULT_MAX_DOCUMENT_BYTES should keep whole-document reads bounded"
        );
        assert_eq!(
            MAX_FRACTION_DIGITS, 9,
            "fractional seconds are stored as nanoseconds"
        );
    }
}
