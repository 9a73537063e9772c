//! Node-BMC credential file: River node controllers with addressing and
//! access credentials.
//!
//! Credentials pass through verbatim, so the normalized output must be
//! treated as sensitive.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::{CaptureError, CaptureResult};
use crate::model::{
    Class, ExtraProperties, HardwareRecord, HardwareType, Inventory, NodeBmcProperties,
};
use crate::xname::Xname;

const SOURCE: &str = "node-BMC data";

pub const HSN_NETWORK: &str = "HSN";
pub const DHCPV6: &str = "DHCPv6";

/// One entry of the credential file.
#[derive(Debug, Clone, Deserialize)]
pub struct BmcDescriptor {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Password")]
    pub password: String,
}

/// Read and normalize the credential file.
pub fn load(path: &Path) -> CaptureResult<Inventory> {
    let raw = fs::read_to_string(path)?;
    let descriptors: Vec<BmcDescriptor> =
        serde_json::from_str(&raw).map_err(|err| CaptureError::InvalidSourceData {
            source: SOURCE.to_string(),
            reason: err.to_string(),
        })?;
    if descriptors.is_empty() {
        return Err(CaptureError::InvalidSourceData {
            source: SOURCE.to_string(),
            reason: "no BMC entries listed".to_string(),
        });
    }
    Ok(normalize(&descriptors))
}

/// One NodeBMC record per descriptor, always River class.
pub fn normalize(descriptors: &[BmcDescriptor]) -> Inventory {
    let mut records = Inventory::new();
    for descriptor in descriptors {
        let xname = match Xname::parse(&descriptor.id) {
            Ok(xname) => xname,
            Err(err) => {
                warn!(identifier = %descriptor.id, %err, "skipping BMC with malformed identifier");
                continue;
            }
        };

        records.insert(
            descriptor.id.clone(),
            HardwareRecord {
                xname: descriptor.id.clone(),
                parent: xname.parent_str(),
                class: Class::River,
                hw_type: HardwareType::NodeBmc,
                extra: ExtraProperties::NodeBmc(NodeBmcProperties {
                    network: HSN_NETWORK.to_string(),
                    ip6_addr: DHCPV6.to_string(),
                    ip4_addr: descriptor.ip_address.clone(),
                    username: descriptor.user.clone(),
                    password: descriptor.password.clone(),
                }),
            },
        );
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors(json: &str) -> Vec<BmcDescriptor> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_bmc_record_shape() {
        let records = normalize(&descriptors(
            r#"[{"ID": "x9c0s1b0", "IPAddress": "10.4.0.5", "User": "root", "Password": "initial0"}]"#,
        ));

        assert_eq!(records.len(), 1);
        let bmc = &records["x9c0s1b0"];
        assert_eq!(bmc.parent, "x9c0s1");
        assert_eq!(bmc.class, Class::River);
        assert_eq!(bmc.hw_type, HardwareType::NodeBmc);
        assert_eq!(
            bmc.extra,
            ExtraProperties::NodeBmc(NodeBmcProperties {
                network: "HSN".to_string(),
                ip6_addr: "DHCPv6".to_string(),
                ip4_addr: "10.4.0.5".to_string(),
                username: "root".to_string(),
                password: "initial0".to_string(),
            })
        );
    }

    #[test]
    fn test_malformed_id_skipped_siblings_kept() {
        let records = normalize(&descriptors(
            r#"[
                {"ID": "not-an-xname", "IPAddress": "10.4.0.5", "User": "root", "Password": "a"},
                {"ID": "x9c0s2b0", "IPAddress": "10.4.0.6", "User": "root", "Password": "b"}
            ]"#,
        ));

        assert_eq!(records.len(), 1);
        assert!(records.contains_key("x9c0s2b0"));
    }
}
