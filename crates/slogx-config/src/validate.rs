//! Field checks and parsing helpers shared by the builders and the loader.

use std::net::IpAddr;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};
use crate::model::Config;

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn validate_config(config: &Config) -> ConfigResult<()> {
    if config.port == 0 {
        return Err(invalid("port", Some("0".to_string()), "must be non-zero"));
    }
    if config.service_name.trim().is_empty() {
        return Err(invalid(
            "service_name",
            Some(config.service_name.clone()),
            "must not be blank",
        ));
    }
    if config.session_queue_capacity == 0 {
        return Err(invalid(
            "session_queue_capacity",
            Some("0".to_string()),
            "must be greater than zero",
        ));
    }
    if config.max_batch == 0 {
        return Err(invalid(
            "max_batch",
            Some("0".to_string()),
            "must be greater than zero",
        ));
    }
    Ok(())
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn parse_bool(field: &'static str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(field, Some(value.to_string()), "expected a boolean")),
    }
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn parse_number<T: FromStr>(field: &'static str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(field, Some(value.to_string()), "expected an unsigned integer"))
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn parse_bind_addr(value: &str) -> ConfigResult<IpAddr> {
    IpAddr::from_str(value.trim())
        .map_err(|_| invalid("bind_addr", Some(value.to_string()), "expected an IP address"))
}

const fn invalid(field: &'static str, value: Option<String>, reason: &'static str) -> ConfigError {
    ConfigError::InvalidField {
        field,
        value,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("is_dev", "TRUE").expect("true parses"));
        assert!(parse_bool("is_dev", " 1 ").expect("1 parses"));
        assert!(!parse_bool("is_dev", "off").expect("off parses"));
        assert!(parse_bool("is_dev", "maybe").is_err());
    }

    #[test]
    fn parse_number_rejects_negative_and_text() {
        assert_eq!(parse_number::<u16>("port", "9000").expect("parses"), 9000);
        assert!(parse_number::<u16>("port", "-1").is_err());
        assert!(parse_number::<u16>("port", "70000").is_err());
        assert!(parse_number::<usize>("max_batch", "many").is_err());
    }

    #[test]
    fn parse_bind_addr_validates_format() {
        assert!(parse_bind_addr("0.0.0.0").is_ok());
        assert!(parse_bind_addr("::1").is_ok());
        let err = parse_bind_addr("localhost").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "bind_addr",
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_zero_port_and_blank_service() {
        let zero_port = Config::new(true).with_port(0);
        assert!(matches!(
            validate_config(&zero_port),
            Err(ConfigError::InvalidField { field: "port", .. })
        ));

        let blank = Config::new(true).with_service_name("   ");
        assert!(matches!(
            validate_config(&blank),
            Err(ConfigError::InvalidField {
                field: "service_name",
                ..
            })
        ));

        let no_queue = Config::new(true).with_session_queue_capacity(0);
        assert!(validate_config(&no_queue).is_err());
    }
}
