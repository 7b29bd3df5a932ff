// Script-variable scraping
//
// Status pages are small JavaScript files of the form
// `var name = 'value';` or `var name = [a, b, c];`. Each endpoint has a
// fixed set of variables; a missing one means the response is malformed,
// unless the body is the login form, which means the session is gone.

use std::sync::LazyLock;

use regex::Regex;

use crate::bits::int_to_bool_list;
use crate::error::Error;
use crate::models::{LinkReport, PortStateReport, PowerReport, SystemReport};

static LOGIN_FORM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"action\s*=\s*["']/?login\.cgi["']"#).expect("valid regex"));

static PORT_POE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"portPoE\s?=\s?'(\d+)';").expect("valid regex"));
static PORT_POWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"port_power\s?=\s?\[([\s\d+.,]+)\]").expect("valid regex"));

static FIRMWARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sys_fmw_ver\s?=\s?'([^']+)';").expect("valid regex"));
static MODEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"model_name\s?=\s?'([^']+)';").expect("valid regex"));
static MAC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sys_MAC\s?=\s?'([^']+)';").expect("valid regex"));
static DEVICE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sys_dev_name\s?=\s?'([^']+)';").expect("valid regex"));
static LED_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sys_led_state\s?=\s?'([^']+)';").expect("valid regex"));
static UPTIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"system_uptime\s?=\s?'([^']+)';").expect("valid regex"));

static LINK_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"portstatus\s?=\s?\[([^\]]+)\];").expect("valid regex"));
static LINK_SPEED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bspeed\s?=\s?\[([^\]]+)\];").expect("valid regex"));

pub(crate) const PORT_STATE_ENDPOINT: &str = "port_state_data.js";
pub(crate) const POWER_ENDPOINT: &str = "poe_data.js";
pub(crate) const SYSTEM_ENDPOINT: &str = "system_data.js";
pub(crate) const LINK_ENDPOINT: &str = "link_data.js";

/// Return capture group 1 of every match of `pattern` in `body`.
pub fn extract(pattern: &Regex, body: &str) -> Vec<String> {
    pattern
        .captures_iter(body)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Whether the body is the device's login form.
pub fn is_login_page(body: &str) -> bool {
    LOGIN_FORM.is_match(body)
}

/// First capture of a required variable, or the appropriate failure.
fn required(
    pattern: &Regex,
    body: &str,
    endpoint: &'static str,
    field: &'static str,
) -> Result<String, Error> {
    extract(pattern, body)
        .into_iter()
        .next()
        .ok_or_else(|| missing(body, endpoint, field))
}

fn missing(body: &str, endpoint: &'static str, field: &'static str) -> Error {
    if is_login_page(body) {
        Error::LoginRequired
    } else {
        Error::MalformedResponse { endpoint, field }
    }
}

/// Split a `[a, 'b', c]` list body into trimmed, unquoted items.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().trim_matches(['\'', '"']).trim().to_owned())
        .collect()
}

pub fn parse_port_state(body: &str) -> Result<PortStateReport, Error> {
    let raw = required(&PORT_POE, body, PORT_STATE_ENDPOINT, "portPoE")?;
    let mask: u32 = raw.parse().map_err(|_| Error::MalformedResponse {
        endpoint: PORT_STATE_ENDPOINT,
        field: "portPoE",
    })?;
    Ok(PortStateReport {
        poe_enabled: int_to_bool_list(mask),
    })
}

pub fn parse_power(body: &str) -> Result<PowerReport, Error> {
    let raw = required(&PORT_POWER, body, POWER_ENDPOINT, "port_power")?;
    let watts = split_list(&raw)
        .iter()
        .map(|v| v.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| Error::MalformedResponse {
            endpoint: POWER_ENDPOINT,
            field: "port_power",
        })?;
    Ok(PowerReport { watts })
}

pub fn parse_system_info(body: &str) -> Result<SystemReport, Error> {
    let firmware_version = required(&FIRMWARE, body, SYSTEM_ENDPOINT, "sys_fmw_ver")?;
    let model = required(&MODEL, body, SYSTEM_ENDPOINT, "model_name")?;
    let mac_address = required(&MAC, body, SYSTEM_ENDPOINT, "sys_MAC")?;
    let name = required(&DEVICE_NAME, body, SYSTEM_ENDPOINT, "sys_dev_name")?;
    let led = required(&LED_STATE, body, SYSTEM_ENDPOINT, "sys_led_state")?;
    let uptime = required(&UPTIME, body, SYSTEM_ENDPOINT, "system_uptime")?;

    let uptime_secs = uptime.trim().parse().map_err(|_| Error::MalformedResponse {
        endpoint: SYSTEM_ENDPOINT,
        field: "system_uptime",
    })?;

    Ok(SystemReport {
        firmware_version,
        model,
        mac_address,
        name,
        led_eco_on: led == "1",
        uptime_secs,
    })
}

pub fn parse_link_info(body: &str) -> Result<LinkReport, Error> {
    let status = required(&LINK_STATUS, body, LINK_ENDPOINT, "portstatus")?;
    let speed = required(&LINK_SPEED, body, LINK_ENDPOINT, "speed")?;
    Ok(LinkReport {
        link_up: split_list(&status).iter().map(|s| s == "Up").collect(),
        speeds: split_list(&speed),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const LOGIN_BODY: &str = r#"<html><form name="login" method="post" action="login.cgi">
        <input type="password" name="password"></form></html>"#;

    #[test]
    fn extract_returns_every_capture() {
        let re = Regex::new(r"v(\d)").unwrap();
        assert_eq!(extract(&re, "v1 v2 x v3"), vec!["1", "2", "3"]);
        assert!(extract(&re, "nothing").is_empty());
    }

    #[test]
    fn port_state_five_is_ports_zero_and_two() {
        let report = parse_port_state("var portPoE = '5';").unwrap();
        assert_eq!(report.poe_enabled, vec![true, false, true, false]);
    }

    #[test]
    fn power_list_in_index_order() {
        let report = parse_power("var port_power = [1.2, 0.0, 3.4]").unwrap();
        assert_eq!(report.watts, vec![1.2, 0.0, 3.4]);
    }

    #[test]
    fn system_info_fields() {
        let body = "var sys_fmw_ver = 'V2.00(ABKN.1)C0';\n\
                    var model_name = 'GS1200-5HP v2';\n\
                    var sys_MAC = 'BC:CF:4F:00:11:22';\n\
                    var sys_dev_name = 'garage';\n\
                    var sys_led_state = '1';\n\
                    var system_uptime = '86400';\n";
        let report = parse_system_info(body).unwrap();
        assert_eq!(
            report,
            SystemReport {
                firmware_version: "V2.00(ABKN.1)C0".into(),
                model: "GS1200-5HP v2".into(),
                mac_address: "BC:CF:4F:00:11:22".into(),
                name: "garage".into(),
                led_eco_on: true,
                uptime_secs: 86_400,
            }
        );
    }

    #[test]
    fn led_state_other_than_one_is_off() {
        let body = "sys_fmw_ver = 'x'; model_name = 'm'; sys_MAC = 'a'; \
                    sys_dev_name = 'n'; sys_led_state = '0'; system_uptime = '5';";
        assert!(!parse_system_info(body).unwrap().led_eco_on);
    }

    #[test]
    fn link_info_lists() {
        let body = "var portstatus = ['Up','Down','Up','Down','Down'];\n\
                    var speed = ['1000M','','100M','',''];\n";
        let report = parse_link_info(body).unwrap();
        assert_eq!(report.link_up, vec![true, false, true, false, false]);
        assert_eq!(report.speeds, vec!["1000M", "", "100M", "", ""]);
    }

    #[test]
    fn link_lists_on_one_line_stay_separate() {
        let body = "var portstatus = ['Up','Down']; var speed = ['1000M',''];";
        let report = parse_link_info(body).unwrap();
        assert_eq!(report.link_up, vec![true, false]);
        assert_eq!(report.speeds, vec!["1000M", ""]);
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = parse_port_state("var something = '1';").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedResponse {
                endpoint: PORT_STATE_ENDPOINT,
                field: "portPoE"
            }
        ));
    }

    #[test]
    fn unparseable_power_is_malformed() {
        let err = parse_power("port_power = [1.2, 3.4.5]").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { field: "port_power", .. }));
    }

    #[test]
    fn login_form_reports_login_required() {
        assert!(is_login_page(LOGIN_BODY));
        assert!(matches!(parse_power(LOGIN_BODY), Err(Error::LoginRequired)));
        assert!(matches!(parse_link_info(LOGIN_BODY), Err(Error::LoginRequired)));
    }
}
