//! PESEL construction and validation.
//!
//! A PESEL is the 11-digit Polish national identification number. The first
//! six digits encode the birth date (with the century folded into the month
//! field), digits 7-10 are a serial whose last digit encodes sex (even for
//! women, odd for men), and digit 11 is a weighted checksum.

use rand::Rng;
use thiserror::Error;
use time::{Date, Month};

use crate::models::Sex;

/// Weights applied to the first ten digits when computing the check digit.
const CHECKSUM_WEIGHTS: [u32; 10] = [1, 3, 7, 9, 1, 3, 7, 9, 1, 3];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeselError {
    #[error("PESEL must be exactly 11 digits, got {0}")]
    InvalidLength(usize),
    #[error("PESEL may contain only ASCII digits")]
    NonDigit,
    #[error("PESEL checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error("PESEL encodes an impossible birth date")]
    InvalidBirthDate,
    #[error("birth year {0} is outside the PESEL-encodable range 1800-2299")]
    UnsupportedYear(i32),
}

/// Generates a checksum-valid PESEL for the given birth date and sex.
///
/// The four-digit serial is random apart from its last digit, which carries
/// the sex parity. Distinct donors born on the same day can therefore
/// collide; callers that need uniqueness retry with a fresh draw.
pub fn generate(birth_date: Date, sex: Sex, rng: &mut impl Rng) -> Result<String, PeselError> {
    let year = birth_date.year();
    let month_offset = century_month_offset(year)?;

    let mut digits = [0u32; 11];
    let yy = (year % 100) as u32;
    let mm = u8::from(birth_date.month()) as u32 + month_offset;
    let dd = birth_date.day() as u32;

    digits[0] = yy / 10;
    digits[1] = yy % 10;
    digits[2] = mm / 10;
    digits[3] = mm % 10;
    digits[4] = dd / 10;
    digits[5] = dd % 10;
    digits[6] = rng.gen_range(0..10);
    digits[7] = rng.gen_range(0..10);
    digits[8] = rng.gen_range(0..10);
    digits[9] = match sex {
        Sex::Female => rng.gen_range(0..5) * 2,
        Sex::Male => rng.gen_range(0..5) * 2 + 1,
    };
    digits[10] = check_digit(&digits[..10]);

    Ok(digits.iter().map(|d| char::from_digit(*d, 10).unwrap()).collect())
}

/// Validates length, digit content, checksum, and the encoded birth date.
pub fn validate(pesel: &str) -> Result<(), PeselError> {
    let digits = parse_digits(pesel)?;

    let expected = check_digit(&digits[..10]);
    if digits[10] != expected {
        return Err(PeselError::ChecksumMismatch {
            expected,
            actual: digits[10],
        });
    }

    decode_birth_date(&digits)?;
    Ok(())
}

/// Decodes the birth date out of a PESEL. Does not verify the checksum.
pub fn birth_date(pesel: &str) -> Result<Date, PeselError> {
    let digits = parse_digits(pesel)?;
    decode_birth_date(&digits)
}

/// Decodes the sex encoded in a PESEL. Does not verify the checksum.
pub fn sex(pesel: &str) -> Result<Sex, PeselError> {
    let digits = parse_digits(pesel)?;
    if digits[9] % 2 == 0 {
        Ok(Sex::Female)
    } else {
        Ok(Sex::Male)
    }
}

fn century_month_offset(year: i32) -> Result<u32, PeselError> {
    match year {
        1800..=1899 => Ok(80),
        1900..=1999 => Ok(0),
        2000..=2099 => Ok(20),
        2100..=2199 => Ok(40),
        2200..=2299 => Ok(60),
        other => Err(PeselError::UnsupportedYear(other)),
    }
}

fn check_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip(CHECKSUM_WEIGHTS.iter())
        .map(|(d, w)| d * w)
        .sum();
    (10 - sum % 10) % 10
}

fn parse_digits(pesel: &str) -> Result<[u32; 11], PeselError> {
    if pesel.len() != 11 {
        return Err(PeselError::InvalidLength(pesel.len()));
    }

    let mut digits = [0u32; 11];
    for (i, c) in pesel.chars().enumerate() {
        digits[i] = c.to_digit(10).ok_or(PeselError::NonDigit)?;
    }
    Ok(digits)
}

fn decode_birth_date(digits: &[u32; 11]) -> Result<Date, PeselError> {
    let yy = (digits[0] * 10 + digits[1]) as i32;
    let mm = digits[2] * 10 + digits[3];
    let dd = (digits[4] * 10 + digits[5]) as u8;

    let (century, month) = match mm {
        1..=12 => (1900, mm),
        21..=32 => (2000, mm - 20),
        41..=52 => (2100, mm - 40),
        61..=72 => (2200, mm - 60),
        81..=92 => (1800, mm - 80),
        _ => return Err(PeselError::InvalidBirthDate),
    };

    let month = Month::try_from(month as u8).map_err(|_| PeselError::InvalidBirthDate)?;
    Date::from_calendar_date(century + yy, month, dd).map_err(|_| PeselError::InvalidBirthDate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn date(year: i32, month: u8, day: u8) -> Date {
        Date::from_calendar_date(year, Month::try_from(month).unwrap(), day).unwrap()
    }

    #[test]
    fn generated_pesel_is_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let pesel = generate(date(1987, 6, 15), Sex::Female, &mut rng).unwrap();
            assert_eq!(pesel.len(), 11);
            validate(&pesel).unwrap();
        }
    }

    #[test]
    fn birth_date_round_trips_across_centuries() {
        let mut rng = StdRng::seed_from_u64(7);
        for d in [date(1999, 12, 31), date(2004, 1, 1), date(1850, 3, 9)] {
            let pesel = generate(d, Sex::Male, &mut rng).unwrap();
            assert_eq!(birth_date(&pesel).unwrap(), d);
        }
    }

    #[test]
    fn sex_digit_parity() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let female = generate(date(1990, 2, 2), Sex::Female, &mut rng).unwrap();
            assert_eq!(sex(&female).unwrap(), Sex::Female);
            let male = generate(date(1990, 2, 2), Sex::Male, &mut rng).unwrap();
            assert_eq!(sex(&male).unwrap(), Sex::Male);
        }
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut rng = StdRng::seed_from_u64(7);
        let pesel = generate(date(1970, 10, 20), Sex::Male, &mut rng).unwrap();

        // Flip the check digit
        let mut chars: Vec<char> = pesel.chars().collect();
        let last = chars[10].to_digit(10).unwrap();
        chars[10] = char::from_digit((last + 1) % 10, 10).unwrap();
        let tampered: String = chars.into_iter().collect();

        assert!(matches!(
            validate(&tampered),
            Err(PeselError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(validate("123"), Err(PeselError::InvalidLength(3)));
        assert_eq!(validate("1234567890a"), Err(PeselError::NonDigit));
    }

    #[test]
    fn rejects_impossible_dates() {
        // Month field 13 belongs to no century window
        assert!(matches!(
            birth_date("99130112345"),
            Err(PeselError::InvalidBirthDate)
        ));
    }

    #[test]
    fn rejects_unencodable_year() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            generate(date(1750, 1, 1), Sex::Male, &mut rng),
            Err(PeselError::UnsupportedYear(1750))
        ));
    }
}
