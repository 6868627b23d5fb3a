//! Lexical checks and canonical forms of the XSD datatypes.

use crate::vocab::xsd;
use oxsdatatypes::{
    Boolean, Date, DateTime, DayTimeDuration, Decimal, Double, Duration, Float, GDay, GMonth,
    GMonthDay, GYear, GYearMonth, Time, YearMonthDuration,
};
use std::fmt;
use std::str::FromStr;

/// Checks `value` against the lexical space of `datatype` and returns its canonical form.
///
/// Returns `None` if the datatype is not known: its values are then accepted as is.
pub fn canonical_form(value: &str, datatype: &str) -> Option<Result<String, String>> {
    Some(match datatype {
        xsd::STRING => Ok(value.into()),
        xsd::BOOLEAN => parse_and_format::<Boolean>(value),
        xsd::DECIMAL => parse_and_format::<Decimal>(value),
        xsd::DOUBLE => parse_and_format::<Double>(value),
        xsd::FLOAT => parse_and_format::<Float>(value),
        xsd::DATE => parse_and_format::<Date>(value),
        xsd::DATE_TIME => parse_and_format::<DateTime>(value),
        xsd::TIME => parse_and_format::<Time>(value),
        xsd::G_YEAR => parse_and_format::<GYear>(value),
        xsd::G_YEAR_MONTH => parse_and_format::<GYearMonth>(value),
        xsd::G_MONTH => parse_and_format::<GMonth>(value),
        xsd::G_MONTH_DAY => parse_and_format::<GMonthDay>(value),
        xsd::G_DAY => parse_and_format::<GDay>(value),
        xsd::DURATION => parse_and_format::<Duration>(value),
        xsd::DAY_TIME_DURATION => parse_and_format::<DayTimeDuration>(value),
        xsd::YEAR_MONTH_DURATION => parse_and_format::<YearMonthDuration>(value),
        xsd::INTEGER => integer(value, None, None),
        xsd::LONG => integer(value, Some(i64::MIN.into()), Some(i64::MAX.into())),
        xsd::INT => integer(value, Some(i32::MIN.into()), Some(i32::MAX.into())),
        xsd::SHORT => integer(value, Some(i16::MIN.into()), Some(i16::MAX.into())),
        xsd::BYTE => integer(value, Some(i8::MIN.into()), Some(i8::MAX.into())),
        xsd::UNSIGNED_LONG => integer(value, Some(0), Some(u64::MAX.into())),
        xsd::UNSIGNED_INT => integer(value, Some(0), Some(u32::MAX.into())),
        xsd::UNSIGNED_SHORT => integer(value, Some(0), Some(u16::MAX.into())),
        xsd::UNSIGNED_BYTE => integer(value, Some(0), Some(u8::MAX.into())),
        xsd::NON_NEGATIVE_INTEGER => integer(value, Some(0), None),
        xsd::POSITIVE_INTEGER => integer(value, Some(1), None),
        xsd::NON_POSITIVE_INTEGER => integer(value, None, Some(0)),
        xsd::NEGATIVE_INTEGER => integer(value, None, Some(-1)),
        _ => return None,
    })
}

fn parse_and_format<T: FromStr + fmt::Display>(value: &str) -> Result<String, String>
where
    T::Err: fmt::Display,
{
    T::from_str(value)
        .map(|v| v.to_string())
        .map_err(|e| e.to_string())
}

/// Integers are not bounded in XSD so they are handled on their lexical form.
fn integer(value: &str, min: Option<i128>, max: Option<i128>) -> Result<String, String> {
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
        return Err("an integer must be a sequence of digits with an optional sign".into());
    }
    let digits = digits.trim_start_matches('0');
    let canonical = if digits.is_empty() {
        "0".to_owned()
    } else if negative {
        format!("-{digits}")
    } else {
        digits.to_owned()
    };
    let out_of_range = match canonical.parse::<i128>() {
        Ok(v) => min.is_some_and(|min| v < min) || max.is_some_and(|max| v > max),
        Err(_) => {
            if negative {
                min.is_some()
            } else {
                max.is_some()
            }
        }
    };
    if out_of_range {
        return Err("the value is outside of the datatype range".into());
    }
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_datatype() {
        assert_eq!(canonical_form("foo", "http://example.com/dt"), None);
    }

    #[test]
    fn test_integer() {
        assert_eq!(
            canonical_form("+0032", xsd::INTEGER),
            Some(Ok("32".into()))
        );
        assert_eq!(canonical_form("-000", xsd::INTEGER), Some(Ok("0".into())));
        assert_eq!(
            canonical_form("123456789012345678901234567890123456789012", xsd::INTEGER),
            Some(Ok("123456789012345678901234567890123456789012".into()))
        );
        assert!(matches!(canonical_form("1.0", xsd::INTEGER), Some(Err(_))));
        assert!(matches!(canonical_form("", xsd::INTEGER), Some(Err(_))));
        assert!(matches!(canonical_form("-", xsd::INTEGER), Some(Err(_))));
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(canonical_form("127", xsd::BYTE), Some(Ok("127".into())));
        assert!(matches!(canonical_form("128", xsd::BYTE), Some(Err(_))));
        assert!(matches!(canonical_form("-1", xsd::UNSIGNED_INT), Some(Err(_))));
        assert!(matches!(canonical_form("0", xsd::POSITIVE_INTEGER), Some(Err(_))));
        assert!(matches!(canonical_form("0", xsd::NEGATIVE_INTEGER), Some(Err(_))));
        assert_eq!(
            canonical_form("18446744073709551615", xsd::UNSIGNED_LONG),
            Some(Ok("18446744073709551615".into()))
        );
        assert!(matches!(
            canonical_form("18446744073709551616", xsd::UNSIGNED_LONG),
            Some(Err(_))
        ));
        assert!(matches!(
            canonical_form("999999999999999999999999999999999999999999", xsd::NON_NEGATIVE_INTEGER),
            Some(Ok(_))
        ));
    }

    #[test]
    fn test_other_datatypes() {
        assert_eq!(canonical_form("1", xsd::BOOLEAN), Some(Ok("true".into())));
        assert!(matches!(canonical_form("yes", xsd::BOOLEAN), Some(Err(_))));
        assert_eq!(
            canonical_form("2020-01-01", xsd::DATE),
            Some(Ok("2020-01-01".into()))
        );
        assert!(matches!(canonical_form("2020-13-01", xsd::DATE), Some(Err(_))));
        assert!(matches!(canonical_form("abc", xsd::DECIMAL), Some(Err(_))));
        assert_eq!(canonical_form(" a ", xsd::STRING), Some(Ok(" a ".into())));
    }
}
