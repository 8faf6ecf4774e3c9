use thiserror::Error;

use crate::models::{Measurement, NamePolicy, ParseMeasurementError};
use crate::utils::constants::FIELD_SEPARATOR;

/// A line split into station name bytes and parsed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedLine<'a> {
    pub name: &'a [u8],
    pub value: Measurement,
}

/// Why a line was skipped. Never fatal to a scan.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRejection {
    #[error("no ';' separator")]
    MissingSeparator,

    #[error("empty station name")]
    EmptyName,

    #[error("station name rejected by name policy")]
    NamePolicy,

    #[error("malformed value: {0}")]
    MalformedValue(#[from] ParseMeasurementError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LineDecoder {
    policy: NamePolicy,
}

impl LineDecoder {
    pub fn new(policy: NamePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> NamePolicy {
        self.policy
    }

    /// Split on the first `;`, apply the name policy, parse the value.
    ///
    /// `line` must not include its terminator.
    pub fn decode<'a>(&self, line: &'a [u8]) -> Result<DecodedLine<'a>, LineRejection> {
        let separator = line
            .iter()
            .position(|&b| b == FIELD_SEPARATOR)
            .ok_or(LineRejection::MissingSeparator)?;
        let (name, value) = (&line[..separator], &line[separator + 1..]);

        if name.is_empty() {
            return Err(LineRejection::EmptyName);
        }
        if !self.policy.accepts(name) {
            return Err(LineRejection::NamePolicy);
        }

        let value = Measurement::parse(value)?;
        Ok(DecodedLine { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_line() {
        let decoder = LineDecoder::default();
        let line = decoder.decode(b"Tokyo;10.0").unwrap();
        assert_eq!(line.name, b"Tokyo");
        assert_eq!(line.value, Measurement::from_tenths(100));

        let line = decoder.decode("São Paulo;-2.5".as_bytes()).unwrap();
        assert_eq!(line.name, "São Paulo".as_bytes());
        assert_eq!(line.value, Measurement::from_tenths(-25));
    }

    #[test]
    fn test_missing_separator() {
        let decoder = LineDecoder::default();
        assert_eq!(decoder.decode(b"Tokyo 10.0"), Err(LineRejection::MissingSeparator));
    }

    #[test]
    fn test_splits_on_first_separator() {
        let decoder = LineDecoder::default();
        assert_eq!(
            decoder.decode(b"Tokyo;1.0;2.0"),
            Err(LineRejection::MalformedValue(ParseMeasurementError::InvalidDigit(b'.')))
        );
    }

    #[test]
    fn test_name_policy_applies_uniformly() {
        let strict = LineDecoder::new(NamePolicy::UppercaseInitial);
        assert_eq!(strict.decode(b"okyo;10.0"), Err(LineRejection::NamePolicy));
        assert_eq!(strict.decode(b"0.0\nTokyo;1.0"), Err(LineRejection::NamePolicy));
        assert_eq!(strict.decode(b";10.0"), Err(LineRejection::EmptyName));

        let lenient = LineDecoder::new(NamePolicy::Any);
        assert_eq!(lenient.decode(b"okyo;10.0").unwrap().name, b"okyo");
        assert_eq!(lenient.decode(b";10.0"), Err(LineRejection::EmptyName));
    }

    #[test]
    fn test_malformed_value() {
        let decoder = LineDecoder::default();
        assert_eq!(
            decoder.decode(b"Tokyo;10"),
            Err(LineRejection::MalformedValue(ParseMeasurementError::MissingDecimalPoint))
        );
        assert_eq!(
            decoder.decode(b"Tokyo;"),
            Err(LineRejection::MalformedValue(ParseMeasurementError::Empty))
        );
    }
}
