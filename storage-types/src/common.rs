//! Byte-size parsing and formatting shared across the workspace

use num_format::{Locale, ToFormattedString};
use thiserror::Error;

/// Errors produced while converting human size specifications
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("invalid size specification: '{0}'")]
    InvalidSizeSpecification(String),
}

/// Convert a size specification such as `10G`, `512m` or `4096` into bytes.
///
/// Upper-case suffixes use the decimal ladder (`K` = 10^3 .. `E` = 10^18),
/// lower-case suffixes the binary ladder (`k` = 2^10 .. `e` = 2^60).
/// `B`/`b` and a missing suffix both mean plain bytes.
pub fn parse_size(spec: &str) -> Result<u64, UnitError> {
    let spec = spec.trim();
    let invalid = || UnitError::InvalidSizeSpecification(spec.to_string());

    let (digits, multiplier) = match spec.char_indices().last() {
        Some((index, unit)) if unit.is_ascii_alphabetic() => {
            (&spec[..index], unit_multiplier(unit).ok_or_else(invalid)?)
        }
        Some(_) => (spec, 1),
        None => return Err(invalid()),
    };

    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }

    let value: u64 = digits.parse().map_err(|_| invalid())?;
    value.checked_mul(multiplier).ok_or_else(invalid)
}

fn unit_multiplier(unit: char) -> Option<u64> {
    let (base, power): (u64, u32) = match unit {
        'E' => (1000, 6),
        'P' => (1000, 5),
        'T' => (1000, 4),
        'G' => (1000, 3),
        'M' => (1000, 2),
        'K' => (1000, 1),
        'B' | 'b' => (1, 0),
        'e' => (1024, 6),
        'p' => (1024, 5),
        't' => (1024, 4),
        'g' => (1024, 3),
        'm' => (1024, 2),
        'k' => (1024, 1),
        _ => return None,
    };
    Some(base.pow(power))
}

/// Convert bytes to human-readable format (e.g., "1.50 GiB")
pub fn bytes_to_pretty(bytes: u64, add_bytes: bool) -> String {
    let mut steps = 0;
    let mut val: f64 = bytes as f64;

    while val > 1024. && steps < 6 {
        val /= 1024.;
        steps += 1;
    }

    let unit = match steps {
        0 => "B",
        1 => "KiB",
        2 => "MiB",
        3 => "GiB",
        4 => "TiB",
        5 => "PiB",
        _ => "EiB",
    };

    if add_bytes {
        let bytes_str = bytes.to_formatted_string(&Locale::en);
        format!("{:.2} {} ({} bytes)", val, unit, bytes_str)
    } else {
        format!("{:.2} {}", val, unit)
    }
}
