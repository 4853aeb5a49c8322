use std::time::Duration;

use clap::Parser;

use crate::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
  /// Tick rate, i.e. number of ticks per second
  #[arg(short, long, value_name = "FLOAT", value_parser = parse_rate)]
  pub tick_rate: Option<f64>,

  /// Frame rate, i.e. number of frames per second
  #[arg(short, long, value_name = "FLOAT", value_parser = parse_rate)]
  pub frame_rate: Option<f64>,
}

fn parse_rate(value: &str) -> Result<f64, String> {
  let rate: f64 = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
  if is_valid_rate(rate) { Ok(rate) } else { Err(format!("rate must be a finite number above zero, got {value}")) }
}

/// Rates are per second and become timer periods, which must be non-zero and fit in a `Duration`.
pub fn is_valid_rate(rate: f64) -> bool {
  rate.is_finite() && rate > 0.0 && Duration::try_from_secs_f64(1.0 / rate).is_ok_and(|period| !period.is_zero())
}
