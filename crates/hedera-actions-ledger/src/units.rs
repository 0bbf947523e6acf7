//! Amount conversions.
//!
//! HBAR amounts move as tinybars (10^8 per HBAR). Fungible token amounts move
//! in the token's smallest unit; a display amount is `units / 10^decimals`.

use crate::error::LedgerError;

pub const TINYBARS_PER_HBAR: i64 = 100_000_000;

/// Highest decimals value a token may declare.
pub const MAX_DECIMALS: u32 = 18;

/// Convert a whole-HBAR amount to tinybars, rounding to the nearest tinybar.
pub fn hbar_to_tinybars(hbar: f64) -> Result<i64, LedgerError> {
  if !hbar.is_finite() {
    return Err(LedgerError::invalid_amount(format!("{} is not a finite HBAR amount", hbar)));
  }

  let tinybars = (hbar * TINYBARS_PER_HBAR as f64).round();
  if tinybars.abs() >= i64::MAX as f64 {
    return Err(LedgerError::invalid_amount(format!("{} HBAR is out of range", hbar)));
  }
  Ok(tinybars as i64)
}

/// Render tinybars as an HBAR decimal string without trailing zeros,
/// e.g. `150000000` → `"1.5"`.
pub fn format_tinybars(tinybars: i64) -> String {
  let sign = if tinybars < 0 { "-" } else { "" };
  let abs = tinybars.unsigned_abs();
  let per_hbar = TINYBARS_PER_HBAR as u64;
  let whole = abs / per_hbar;
  let frac = abs % per_hbar;

  if frac == 0 {
    format!("{}{}", sign, whole)
  } else {
    let frac = format!("{:08}", frac);
    format!("{}{}.{}", sign, whole, frac.trim_end_matches('0'))
  }
}

/// Convert a whole-token amount to smallest units: `round(amount * 10^decimals)`.
pub fn to_smallest_unit(amount: f64, decimals: u32) -> Result<u64, LedgerError> {
  if !amount.is_finite() || amount < 0.0 {
    return Err(LedgerError::invalid_amount(format!(
      "{} is not a non-negative token amount",
      amount
    )));
  }
  if decimals > MAX_DECIMALS {
    return Err(LedgerError::invalid_amount(format!(
      "decimals {} exceeds {}",
      decimals, MAX_DECIMALS
    )));
  }

  let units = (amount * 10f64.powi(decimals as i32)).round();
  if units >= u64::MAX as f64 {
    return Err(LedgerError::invalid_amount(format!(
      "{} with {} decimals is out of range",
      amount, decimals
    )));
  }
  Ok(units as u64)
}

/// Convert smallest units back to a whole-token amount.
pub fn from_smallest_unit(units: u64, decimals: u32) -> f64 {
  units as f64 / 10f64.powi(decimals as i32)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_smallest_unit_round_trip() {
    for amount in [0.0, 1.0, 0.5, 100_000.0] {
      for decimals in [0, 2, 8] {
        let units = to_smallest_unit(amount, decimals).unwrap();
        let back = from_smallest_unit(units, decimals);
        // 0.5 with 0 decimals rounds to a whole unit
        let tolerance = 0.5 / 10f64.powi(decimals as i32) + f64::EPSILON;
        assert!(
          (back - amount).abs() <= tolerance,
          "amount={} decimals={} units={} back={}",
          amount,
          decimals,
          units,
          back
        );
      }
    }
  }

  #[test]
  fn test_smallest_unit_rounds_to_nearest() {
    assert_eq!(to_smallest_unit(1.005, 2).unwrap(), 100);
    assert_eq!(to_smallest_unit(12.345678, 2).unwrap(), 1235);
    assert_eq!(to_smallest_unit(100.0, 2).unwrap(), 10_000);
    assert_eq!(to_smallest_unit(0.00000001, 8).unwrap(), 1);
  }

  #[test]
  fn test_smallest_unit_rejects_invalid() {
    assert!(to_smallest_unit(-1.0, 2).is_err());
    assert!(to_smallest_unit(f64::NAN, 2).is_err());
    assert!(to_smallest_unit(1.0, 19).is_err());
    assert!(to_smallest_unit(1e30, 8).is_err());
  }

  #[test]
  fn test_hbar_conversion() {
    assert_eq!(hbar_to_tinybars(1.0).unwrap(), 100_000_000);
    assert_eq!(hbar_to_tinybars(0.5).unwrap(), 50_000_000);
    assert_eq!(hbar_to_tinybars(0.0).unwrap(), 0);
    assert!(hbar_to_tinybars(f64::INFINITY).is_err());
  }

  #[test]
  fn test_format_tinybars() {
    assert_eq!(format_tinybars(0), "0");
    assert_eq!(format_tinybars(100_000_000), "1");
    assert_eq!(format_tinybars(150_000_000), "1.5");
    assert_eq!(format_tinybars(1), "0.00000001");
    assert_eq!(format_tinybars(-250_000_000), "-2.5");
  }
}
