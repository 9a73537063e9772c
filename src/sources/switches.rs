//! Management-network switch discovery.
//!
//! The discovery service is the authoritative map of management switches
//! and their port wiring. Each discovered switch becomes a MgmtSwitch
//! record; each port becomes a connector record whose xname is synthesized
//! from the switch id and the trailing port number of the interface name.

use serde::Deserialize;
use tracing::warn;

use crate::error::{CaptureError, CaptureResult};
use crate::model::{
    Class, ExtraProperties, HardwareRecord, HardwareType, Inventory, MgmtSwitchProperties,
    SwitchConnectorProperties,
};
use crate::sources::http_client;
use crate::xname::Xname;

const SERVICE: &str = "switch discovery";

/// Client for the switch-discovery service.
pub struct SwitchClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl SwitchClient {
    pub fn new(base: impl Into<String>, token: impl Into<String>) -> CaptureResult<Self> {
        Ok(Self {
            http: http_client()?,
            base: base.into(),
            token: token.into(),
        })
    }

    /// Fetch the discovered switch/port map. Single attempt, no retry.
    pub async fn fetch_port_map(&self) -> CaptureResult<PortMap> {
        let url = format!("{}/admin/port_xname_map", self.base);
        let map = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(map)
    }
}

/// Discovery query result.
#[derive(Debug, Clone, Deserialize)]
pub struct PortMap {
    #[serde(default)]
    pub switches: Vec<SwitchEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwitchEntry {
    pub id: String,
    pub address: String,
    #[serde(rename = "snmpUser")]
    pub snmp_user: String,
    #[serde(rename = "snmpAuthPassword")]
    pub snmp_auth_password: String,
    #[serde(rename = "snmpAuthProtocol")]
    pub snmp_auth_protocol: String,
    #[serde(rename = "snmpPrivPassword")]
    pub snmp_priv_password: String,
    #[serde(rename = "snmpPrivProtocol")]
    pub snmp_priv_protocol: String,
    #[serde(default)]
    pub ports: Vec<PortEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortEntry {
    #[serde(rename = "ifName")]
    pub if_name: String,
    #[serde(rename = "peerID")]
    pub peer_id: String,
}

/// Normalize the discovery result.
///
/// An empty switch map is fatal: the inventory would be silently
/// incomplete without the authoritative switch wiring.
pub fn normalize(map: &PortMap) -> CaptureResult<Inventory> {
    if map.switches.is_empty() {
        return Err(CaptureError::UpstreamUnavailable {
            service: SERVICE.to_string(),
        });
    }

    let mut records = Inventory::new();
    for switch in &map.switches {
        let xname = match Xname::parse(&switch.id) {
            Ok(xname) => xname,
            Err(err) => {
                warn!(identifier = %switch.id, %err, "skipping switch with malformed identifier");
                continue;
            }
        };

        records.insert(
            switch.id.clone(),
            HardwareRecord {
                xname: switch.id.clone(),
                parent: xname.parent_str(),
                class: Class::River,
                hw_type: HardwareType::MgmtSwitch,
                extra: ExtraProperties::MgmtSwitch(MgmtSwitchProperties {
                    ip6_addr: super::bmc::DHCPV6.to_string(),
                    ip4_addr: switch.address.clone(),
                    snmp_username: switch.snmp_user.clone(),
                    snmp_auth_password: switch.snmp_auth_password.clone(),
                    snmp_auth_protocol: switch.snmp_auth_protocol.clone(),
                    snmp_priv_password: switch.snmp_priv_password.clone(),
                    snmp_priv_protocol: switch.snmp_priv_protocol.clone(),
                    model: String::new(),
                }),
            },
        );

        for port in &switch.ports {
            let Some(number) = trailing_number(&port.if_name) else {
                warn!(
                    switch = %switch.id,
                    if_name = %port.if_name,
                    "skipping port with no trailing port number"
                );
                continue;
            };

            let connector = format!("{}j{number}", switch.id);
            records.insert(
                connector.clone(),
                HardwareRecord {
                    xname: connector,
                    parent: switch.id.clone(),
                    class: Class::River,
                    hw_type: HardwareType::MgmtSwitchConnector,
                    extra: ExtraProperties::SwitchConnector(SwitchConnectorProperties {
                        node_nics: vec![port.peer_id.clone()],
                        vendor_name: port.if_name.clone(),
                    }),
                },
            );
        }
    }
    Ok(records)
}

/// Trailing numeric run of an interface name (`"eth1/1/5"` → `"5"`).
fn trailing_number(if_name: &str) -> Option<&str> {
    let digits = if_name
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits == 0 {
        None
    } else {
        Some(&if_name[if_name.len() - digits..])
    }
}
