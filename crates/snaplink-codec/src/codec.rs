use crate::alphabet::{Alphabet, BASE};
use crate::error::CodecError;
use snaplink_core::ShortCode;
use std::num::NonZeroU32;

pub type Result<T> = std::result::Result<T, CodecError>;

const RADIX: u128 = BASE as u128;

/// Bijective base-62 conversion between integers and short codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codec {
    alphabet: Alphabet,
}

impl Codec {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    /// Creates a codec over the alphabet permuted by `secret_key`, or the
    /// default alphabet when no key is configured.
    pub fn with_secret_key(secret_key: Option<&str>) -> Self {
        Self::new(Alphabet::from_secret_key(secret_key))
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Encodes `value` in base 62.
    ///
    /// With `pad_up = Some(n)` the value is offset by `62^(n-1)` first, which
    /// guarantees at least `n` characters. Negative values are rejected.
    pub fn encode<V>(&self, value: V, pad_up: Option<NonZeroU32>) -> Result<ShortCode>
    where
        V: TryInto<u128>,
    {
        let value: u128 = value.try_into().map_err(|_| {
            CodecError::InvalidInput("value must be a non-negative integer".to_string())
        })?;
        let mut remaining = value
            .checked_add(pad_offset(pad_up)?)
            .ok_or(CodecError::Overflow)?;

        if remaining == 0 {
            return Ok(ShortCode::new_unchecked(self.alphabet.symbol(0).to_string()));
        }

        let mut reversed = Vec::new();
        while remaining > 0 {
            reversed.push(self.alphabet.symbol((remaining % RADIX) as usize));
            remaining /= RADIX;
        }

        let code: String = reversed.into_iter().rev().collect();
        Ok(ShortCode::new_unchecked(code))
    }

    /// Decodes a short code back to its integer value.
    ///
    /// The pad-up offset is not removed; use [`Codec::decode_padded`] when the
    /// code was produced with padding.
    pub fn decode(&self, code: &str) -> Result<u128> {
        if code.is_empty() {
            return Err(CodecError::InvalidInput(
                "code cannot be empty".to_string(),
            ));
        }

        code.chars()
            .enumerate()
            .try_fold(0u128, |acc, (position, character)| {
                let digit = self
                    .alphabet
                    .digit(character)
                    .ok_or(CodecError::InvalidCharacter {
                        character,
                        position,
                    })?;
                acc.checked_mul(RADIX)
                    .and_then(|shifted| shifted.checked_add(u128::from(digit)))
                    .ok_or(CodecError::Overflow)
            })
    }

    /// Decodes a code produced by `encode(value, pad_up)` back to `value`.
    pub fn decode_padded(&self, code: &str, pad_up: Option<NonZeroU32>) -> Result<u128> {
        let value = self.decode(code)?;
        let offset = pad_offset(pad_up)?;
        value.checked_sub(offset).ok_or_else(|| {
            CodecError::InvalidInput(format!(
                "code '{}' is smaller than its pad-up offset {}",
                code, offset
            ))
        })
    }
}

fn pad_offset(pad_up: Option<NonZeroU32>) -> Result<u128> {
    match pad_up {
        None => Ok(0),
        Some(length) => RADIX
            .checked_pow(length.get() - 1)
            .ok_or(CodecError::Overflow),
    }
}

/// Encodes `value` with an alphabet derived from `secret_key`.
pub fn encode<V>(
    value: V,
    pad_up: Option<NonZeroU32>,
    secret_key: Option<&str>,
) -> Result<ShortCode>
where
    V: TryInto<u128>,
{
    Codec::with_secret_key(secret_key).encode(value, pad_up)
}

/// Decodes `code` with an alphabet derived from `secret_key`.
pub fn decode(code: &str, secret_key: Option<&str>) -> Result<u128> {
    Codec::with_secret_key(secret_key).decode(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(n: u32) -> Option<NonZeroU32> {
        NonZeroU32::new(n)
    }

    #[test]
    fn encode_one_is_b() {
        assert_eq!(encode(1u64, None, None).unwrap().as_str(), "b");
        assert_eq!(decode("b", None).unwrap(), 1);
    }

    #[test]
    fn encode_known_vectors() {
        let codec = Codec::default();
        assert_eq!(codec.encode(0u64, None).unwrap().as_str(), "a");
        assert_eq!(codec.encode(61u64, None).unwrap().as_str(), "Z");
        assert_eq!(codec.encode(62u64, None).unwrap().as_str(), "ba");
        assert_eq!(codec.encode(12345u64, None).unwrap().as_str(), "dnh");
        assert_eq!(codec.encode(u64::MAX, None).unwrap().as_str(), "vYGrAbgkr8p");
    }

    #[test]
    fn encode_with_secret_key() {
        let codec = Codec::with_secret_key(Some("s3cret"));
        assert_eq!(codec.encode(1u64, None).unwrap().as_str(), "8");
        assert_eq!(codec.encode(12345u64, None).unwrap().as_str(), "Uok");
        assert_eq!(codec.decode("Uok").unwrap(), 12345);
    }

    #[test]
    fn pad_up_offsets_by_power_of_base() {
        let codec = Codec::default();
        // 1 + 62^2
        let code = codec.encode(1u64, pad(3)).unwrap();
        assert_eq!(code.as_str(), "bab");
        assert_eq!(codec.decode(code.as_str()).unwrap(), 3845);
        assert_eq!(codec.decode_padded(code.as_str(), pad(3)).unwrap(), 1);
    }

    #[test]
    fn pad_up_guarantees_minimum_length() {
        let codec = Codec::default();
        for length in 1..=12 {
            let code = codec.encode(0u64, pad(length)).unwrap();
            assert!(code.as_str().len() >= length as usize, "pad {length}: {code}");
        }
    }

    #[test]
    fn round_trip_with_padding_and_key() {
        let codecs = [Codec::default(), Codec::with_secret_key(Some("s3cret"))];
        let values = [0u64, 1, 61, 62, 63, 3843, 3844, 1_000_000, u32::MAX as u64, u64::MAX];

        for codec in &codecs {
            for &value in &values {
                for length in [0, 1, 2, 5, 10] {
                    let code = codec.encode(value, pad(length)).unwrap();
                    let decoded = codec.decode_padded(code.as_str(), pad(length)).unwrap();
                    assert_eq!(decoded, u128::from(value), "value {value} pad {length}");
                }
            }
        }
    }

    #[test]
    fn negative_value_is_invalid_input() {
        let err = Codec::default().encode(-1i64, None).unwrap_err();
        assert!(matches!(err, CodecError::InvalidInput(_)));
    }

    #[test]
    fn signed_non_negative_value_is_accepted() {
        assert_eq!(Codec::default().encode(1i64, None).unwrap().as_str(), "b");
    }

    #[test]
    fn decode_rejects_characters_outside_alphabet() {
        let err = Codec::default().decode("ab_c").unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidCharacter {
                character: '_',
                position: 2
            }
        );
    }

    #[test]
    fn decode_rejects_empty_code() {
        assert!(matches!(
            Codec::default().decode(""),
            Err(CodecError::InvalidInput(_))
        ));
    }

    #[test]
    fn decode_reports_overflow_instead_of_losing_precision() {
        let too_long = "Z".repeat(30);
        assert_eq!(Codec::default().decode(&too_long), Err(CodecError::Overflow));
    }

    #[test]
    fn large_values_round_trip_exactly() {
        let codec = Codec::default();
        let value = u128::MAX;
        let code = codec.encode(value, None).unwrap();
        assert_eq!(codec.decode(code.as_str()).unwrap(), value);
    }

    #[test]
    fn pad_offset_overflow_is_reported() {
        let err = Codec::default().encode(0u64, pad(40)).unwrap_err();
        assert_eq!(err, CodecError::Overflow);
    }

    #[test]
    fn decode_padded_rejects_code_below_offset() {
        let err = Codec::default().decode_padded("b", pad(3)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidInput(_)));
    }
}
