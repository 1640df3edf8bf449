use std::env;
use std::str::FromStr;

/// Reads `name` from the environment and parses it, falling back to `default`
/// when the variable is unset or does not parse.
pub fn parsable_env_var<T: FromStr>(name: &str, default: T) -> T {
    parse_or(env::var(name).ok(), default)
}

/// Parses an already looked-up value with the same fallback rule.
pub fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
