extern crate getopts;

use crate::dothat;
use crate::result;
use crate::tfl;

pub const DEFAULT_COLUMNS: usize = 16;
pub const DEFAULT_ROWS: usize = 3;
pub const DEFAULT_ATTEMPTS: usize = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub stop_id: String,
    pub columns: usize,
    pub rows: usize,
    pub attempts: usize,
    pub timeout: std::time::Duration,
    pub api_url: String,
    pub skip_display: bool,
    pub interval: Option<std::time::Duration>,
    pub log_dir: Option<String>,
}

pub enum Parsed {
    Run(Config),
    Help(String),
}

fn options() -> getopts::Options {
    let mut opts = getopts::Options::new();
    opts.optflag("d", "skip-display", "render to the log instead of the LCD");
    opts.optopt("i", "interval", "keep polling, pausing this long between updates", "SECONDS");
    opts.optopt("", "columns", "display width in characters (default 16)", "N");
    opts.optopt("", "rows", "display height in characters (default 3)", "N");
    opts.optopt("", "attempts", "fetch attempts on network errors (default 3)", "N");
    opts.optopt("", "timeout", "per-attempt fetch timeout (default 4)", "SECONDS");
    opts.optopt("", "api-url", "arrivals API root", "URL");
    opts.optopt("", "log-dir", "also write log files here", "DIR");
    opts.optflag("h", "help", "print this help");
    return opts;
}

pub fn usage(program: &str) -> String {
    return options().usage(&format!("Usage: {} [options] STOP_ID", program));
}

fn parse_number<T: std::str::FromStr>(matches: &getopts::Matches, name: &str, default: T) -> result::BusDashResult<T> {
    match matches.opt_str(name) {
        None => return Ok(default),
        Some(raw) => {
            return raw.trim().parse::<T>().map_err(|_| result::BusDashError::ConfigError(
                format!("--{} expects a number, got '{}'", name, raw)));
        }
    }
}

fn at_least_one(name: &str, value: usize) -> result::BusDashResult<usize> {
    if value == 0 {
        return Err(result::BusDashError::ConfigError(format!("--{} must be at least 1", name)));
    }
    return Ok(value);
}

// The HAT can't show more than it has; anything bigger would overwrite rows
// or cut off the time label.
fn check_fits_lcd(columns: usize, rows: usize) -> result::BusDashResult<()> {
    if columns > dothat::COLUMNS || rows > dothat::ROWS {
        return Err(result::BusDashError::ConfigError(format!(
            "{}x{} doesn't fit the {}x{} LCD (use --skip-display for bigger)",
            columns, rows, dothat::COLUMNS, dothat::ROWS)));
    }
    return Ok(());
}

impl Config {
    /// Parses everything after the program name.
    pub fn from_args(program: &str, args: &[String]) -> result::BusDashResult<Parsed> {
        let matches = options().parse(args)
            .map_err(|err| result::BusDashError::ConfigError(err.to_string()))?;

        if matches.opt_present("help") {
            return Ok(Parsed::Help(usage(program)));
        }

        let stop_id = match matches.free.as_slice() {
            [stop_id] if !stop_id.trim().is_empty() => stop_id.trim().to_string(),
            [] => return Err(result::BusDashError::ConfigError("missing STOP_ID".to_string())),
            _ => return Err(result::BusDashError::ConfigError(
                format!("expected exactly one STOP_ID, got {:?}", matches.free))),
        };

        let interval = match matches.opt_str("interval") {
            None => None,
            Some(_) => Some(std::time::Duration::from_secs(
                at_least_one("interval", parse_number(&matches, "interval", 0)?)? as u64)),
        };

        let skip_display = matches.opt_present("skip-display");
        let columns = at_least_one("columns", parse_number(&matches, "columns", DEFAULT_COLUMNS)?)?;
        let rows = at_least_one("rows", parse_number(&matches, "rows", DEFAULT_ROWS)?)?;
        if !skip_display {
            check_fits_lcd(columns, rows)?;
        }

        return Ok(Parsed::Run(Config{
            stop_id: stop_id,
            columns: columns,
            rows: rows,
            attempts: at_least_one("attempts", parse_number(&matches, "attempts", DEFAULT_ATTEMPTS)?)?,
            timeout: std::time::Duration::from_secs(
                at_least_one("timeout", parse_number(&matches, "timeout", DEFAULT_TIMEOUT_SECS as usize)?)? as u64),
            api_url: matches.opt_str("api-url").unwrap_or(tfl::DEFAULT_API_URL.to_string()),
            skip_display: skip_display,
            interval: interval,
            log_dir: matches.opt_str("log-dir"),
        }));
    }
}
