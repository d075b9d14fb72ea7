use std::convert::Infallible;
use std::ffi::OsString;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const BIN_NAME: &str = "input-sender";

struct Flag {
    name: &'static str,
    takes_value: bool,
}

/// Every argument the sender understands. Anything else on the command line
/// is dropped before clap sees it.
const FLAGS: &[Flag] = &[
    Flag { name: "--base-url", takes_value: true },
    Flag { name: "--n", takes_value: true },
    Flag { name: "--sleep-ms", takes_value: true },
    Flag { name: "--check-health", takes_value: false },
    Flag { name: "--help", takes_value: false },
    Flag { name: "-h", takes_value: false },
    Flag { name: "--version", takes_value: false },
    Flag { name: "-V", takes_value: false },
];

/// Push synthetic sensor readings to an ingest server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[clap(name = BIN_NAME, version, args_override_self = true)]
pub struct RunConfig {
    /// Target server's base URL
    #[clap(long, env = "INPUT_SENDER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    /// Number of payloads to send
    #[clap(long, env = "INPUT_SENDER_N", default_value = "3", value_parser = lenient_u64)]
    pub n: u64,
    /// Delay in milliseconds after each successful send
    #[clap(long, env = "INPUT_SENDER_SLEEP_MS", default_value = "200", value_parser = lenient_u64)]
    pub sleep_ms: u64,
    /// Call GET /health before sending anything
    #[clap(long, env = "INPUT_SENDER_CHECK_HEALTH")]
    pub check_health: bool,
}

impl RunConfig {
    /// Builds a config from arguments that exclude the program name.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let retained = retain_known(args.into_iter().map(Into::into));
        Self::try_parse_from(std::iter::once(BIN_NAME.to_string()).chain(retained))
    }

    /// Same as `from_args`, for raw OS arguments. Arguments that aren't
    /// UTF-8 are converted lossily so they keep their position, and unknown
    /// ones are dropped like any other.
    pub fn from_os_args<I>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = OsString>,
    {
        Self::from_args(args.into_iter().map(|a| a.to_string_lossy().into_owned()))
    }

    /// Parses the process arguments. `--help` and `--version` print and exit
    /// here; any other clap error is returned to the caller.
    pub fn from_env_args() -> Result<Self, clap::Error> {
        match Self::from_os_args(std::env::args_os().skip(1)) {
            Err(e) if !e.use_stderr() => e.exit(),
            other => other,
        }
    }

    pub fn sleep(&self) -> Duration {
        Duration::from_millis(self.sleep_ms)
    }
}

/// Keeps recognized flags in order. A value flag takes the next argument as
/// its value no matter what it looks like, and is re-emitted as `--flag=value`
/// so clap cannot mistake the value for another flag. A value flag at the end
/// of the line gets an empty value: a count of 0, or an empty base URL that
/// fails on the first request.
pub fn retain_known<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let Some(flag) = FLAGS.iter().find(|f| f.name == arg) else {
            tracing::debug!(%arg, "ignoring unrecognized argument");
            continue;
        };
        if !flag.takes_value {
            out.push(arg);
            continue;
        }
        match args.next() {
            Some(value) => out.push(format!("{}={}", flag.name, value)),
            None => {
                tracing::debug!(flag = flag.name, "flag has no value");
                out.push(format!("{}=", flag.name));
            }
        }
    }
    out
}

/// Numbers that don't parse, or aren't positive, become 0. A fractional value
/// rounds up, so `--n 2.5` sends three payloads.
fn lenient_u64(raw: &str) -> Result<u64, Infallible> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<u64>() {
        return Ok(v);
    }
    match parse_number(trimmed) {
        Some(v) if v > 0.0 => Ok(v.ceil() as u64), // saturating cast
        Some(v) => {
            tracing::warn!(value = raw, parsed = v, "not a positive number, treating as 0");
            Ok(0)
        }
        None => {
            tracing::warn!(value = raw, "not a number, treating as 0");
            Ok(0)
        }
    }
}

/// Decimal parse that only takes `Infinity` as a word. `f64::from_str` also
/// accepts `inf` and `nan` in any case, which are not numbers here.
fn parse_number(s: &str) -> Option<f64> {
    let unsigned = s.trim_start_matches(['+', '-']);
    let starts_with_letter = unsigned
        .chars()
        .next()
        .map_or(true, |c| c.is_ascii_alphabetic());
    if starts_with_letter && unsigned != "Infinity" {
        return None;
    }
    s.parse::<f64>().ok()
}
