//! Reservation sources: CSV files and router configuration dumps.
//!
//! Every reader yields `DhcpReservation`s with the implied flags already set,
//! ready for `Session::upload_reservations`.

use std::io::Read;

use regex::{Captures, Regex};
use serde::Deserialize;
use unifi_ng_api::DhcpReservation;

use crate::cli::ImportFormat;
use crate::error::CliError;

/// EdgeRouter: `static-mapping <name> { ip-address <ip> mac-address <mac> }`.
const EDGEROUTER_PATTERN: &str = r"(?i)static-mapping\s+(?P<name>[a-zA-Z0-9\s\-_\.]+)[\W\w]+?(?P<fixed_ip>(?:[0-9]{1,3}\.?){4})[\W\w]+?(?P<mac>(?:[0-9a-fA-Fx]{2}:?){6})";

/// OPNsense: `<staticmap>` with `<mac>`, `<ipaddr>`, `<hostname>`, `<descr>`.
const OPNSENSE_PATTERN: &str = r"(?i)<staticmap>[\W\w]+?(?P<mac>(?:[0-9a-fA-Fx]{2}:?){6})[\W\w]+?(?P<fixed_ip>(?:[0-9]{1,3}\.?){4})[\W\w]+?<hostname>(?P<name>.+?)</hostname>[\W\w]+?<descr>(?P<note>.+?)</descr>";

// ── CSV ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ReservationRow {
    #[serde(default)]
    mac: Option<String>,
    #[serde(default)]
    fixed_ip: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    local_dns_record: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Read `mac, fixed_ip, name, local_dns_record, note` columns. Empty cells and
/// unknown columns are ignored; a row without a MAC is an error.
pub fn reservations_from_csv<R: Read>(reader: R) -> Result<Vec<DhcpReservation>, CliError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut out = Vec::new();
    for (i, row) in csv.deserialize::<ReservationRow>().enumerate() {
        let row = row?;
        let Some(mac) = non_empty(row.mac) else {
            return Err(CliError::Validation {
                field: "mac".into(),
                reason: format!("row {} has no MAC address", i + 1),
            });
        };

        let mut reservation = DhcpReservation::new(mac);
        reservation.fixed_ip = non_empty(row.fixed_ip);
        reservation.name = non_empty(row.name);
        reservation.local_dns_record = non_empty(row.local_dns_record);
        reservation.note = non_empty(row.note);
        reservation.apply_implied_flags();
        out.push(reservation);
    }
    Ok(out)
}

// ── Router configs ───────────────────────────────────────────────────

fn compile(pattern: &str) -> Result<Regex, CliError> {
    Regex::new(pattern).map_err(|e| CliError::Validation {
        field: "pattern".into(),
        reason: e.to_string(),
    })
}

fn capture(caps: &Captures<'_>, group: &str) -> Option<String> {
    caps.name(group)
        .map(|m| m.as_str().trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn from_captures(caps: &Captures<'_>) -> Option<DhcpReservation> {
    let mut reservation = DhcpReservation::new(capture(caps, "mac")?);
    reservation.fixed_ip = capture(caps, "fixed_ip");
    reservation.name = capture(caps, "name");
    reservation.note = capture(caps, "note");
    reservation.apply_implied_flags();
    Some(reservation)
}

/// Extract static mappings from an EdgeRouter configuration.
pub fn reservations_from_edgerouter(text: &str) -> Result<Vec<DhcpReservation>, CliError> {
    let re = compile(EDGEROUTER_PATTERN)?;
    Ok(re
        .captures_iter(text)
        .filter_map(|c| from_captures(&c))
        .collect())
}

/// Extract static maps from an OPNsense `config.xml`.
pub fn reservations_from_opnsense(text: &str) -> Result<Vec<DhcpReservation>, CliError> {
    let re = compile(OPNSENSE_PATTERN)?;
    Ok(re
        .captures_iter(text)
        .filter_map(|c| from_captures(&c))
        .collect())
}

/// Read reservations in the given format.
pub fn read_reservations(text: &str, format: ImportFormat) -> Result<Vec<DhcpReservation>, CliError> {
    match format {
        ImportFormat::Csv => reservations_from_csv(text.as_bytes()),
        ImportFormat::Edgerouter => reservations_from_edgerouter(text),
        ImportFormat::Opnsense => reservations_from_opnsense(text),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn csv_ignores_empty_cells_and_extra_columns() {
        let data = "\
mac,fixed_ip,name,local_dns_record,note,vlan
7b:58:09:58:6e:c3,192.168.1.123,Test Two,,,20
aa:bb:cc:dd:ee:ff,,,nas.home.arpa,storage,
";
        let records = reservations_from_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].mac, "7b:58:09:58:6e:c3");
        assert_eq!(records[0].fixed_ip.as_deref(), Some("192.168.1.123"));
        assert_eq!(records[0].use_fixedip, Some(true));
        assert_eq!(records[0].local_dns_record, None);
        assert_eq!(records[0].local_dns_record_enabled, None);

        assert_eq!(records[1].fixed_ip, None);
        assert_eq!(records[1].use_fixedip, None);
        assert_eq!(records[1].local_dns_record_enabled, Some(true));
        assert_eq!(records[1].note.as_deref(), Some("storage"));
    }

    #[test]
    fn csv_with_missing_columns() {
        let data = "mac,name\naa:bb:cc:dd:ee:01,printer\n";
        let records = reservations_from_csv(data.as_bytes()).unwrap();
        assert_eq!(records[0].name.as_deref(), Some("printer"));
        assert_eq!(records[0].fixed_ip, None);
    }

    #[test]
    fn csv_row_without_mac_is_rejected() {
        let data = "mac,name\n,printer\n";
        assert!(matches!(
            reservations_from_csv(data.as_bytes()),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn edgerouter_static_mappings() {
        let config = r"
service {
    dhcp-server {
        shared-network-name LAN {
            subnet 192.168.1.0/24 {
                static-mapping printer {
                    ip-address 192.168.1.20
                    mac-address 00:11:22:33:44:55
                }
                static-mapping nas-01 {
                    ip-address 192.168.1.21
                    mac-address AA:BB:CC:DD:EE:FF
                }
            }
        }
    }
}";
        let records = reservations_from_edgerouter(config).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_deref(), Some("printer"));
        assert_eq!(records[0].fixed_ip.as_deref(), Some("192.168.1.20"));
        assert_eq!(records[0].mac, "00:11:22:33:44:55");
        assert_eq!(records[0].use_fixedip, Some(true));
        assert_eq!(records[1].name.as_deref(), Some("nas-01"));
        assert_eq!(records[1].mac, "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn opnsense_static_maps() {
        let config = r"
<dhcpd>
  <lan>
    <staticmap>
      <mac>00:11:22:33:44:66</mac>
      <ipaddr>10.0.0.50</ipaddr>
      <hostname>camera-front</hostname>
      <descr>Front door camera</descr>
    </staticmap>
  </lan>
</dhcpd>";
        let records = reservations_from_opnsense(config).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mac, "00:11:22:33:44:66");
        assert_eq!(records[0].fixed_ip.as_deref(), Some("10.0.0.50"));
        assert_eq!(records[0].name.as_deref(), Some("camera-front"));
        assert_eq!(records[0].note.as_deref(), Some("Front door camera"));
    }
}
