//! Cabinet/network descriptor file: the Mountain-fleet description.
//!
//! The file maps rack numbers to network descriptors. Each rack becomes
//! one Cabinet record carrying its hardware-management-network base
//! address and the fixed MAC-prefix convention.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::{CaptureError, CaptureResult};
use crate::model::{
    CabinetProperties, Class, ExtraProperties, HardwareRecord, HardwareType, Inventory,
};
use crate::xname::Xname;

const SOURCE: &str = "cabinet descriptor";

pub const HMN_NETWORK: &str = "HMN";
pub const CABINET_MAC_PREFIX: &str = "02";

/// Root object of the descriptor file.
#[derive(Debug, Clone, Deserialize)]
pub struct CabinetFile {
    pub cabinets: BTreeMap<String, CabinetNetwork>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CabinetNetwork {
    /// IPv4 base address of the cabinet on the hardware management network.
    pub ip: String,
}

/// Read and normalize the descriptor file.
pub fn load(path: &Path) -> CaptureResult<Inventory> {
    let raw = fs::read_to_string(path)?;
    let file: CabinetFile =
        serde_json::from_str(&raw).map_err(|err| CaptureError::InvalidSourceData {
            source: SOURCE.to_string(),
            reason: err.to_string(),
        })?;
    if file.cabinets.is_empty() {
        return Err(CaptureError::InvalidSourceData {
            source: SOURCE.to_string(),
            reason: "no cabinets listed".to_string(),
        });
    }
    Ok(normalize(&file))
}

/// One Cabinet record per rack. This source only describes the
/// Mountain-class fleet, so every record is Mountain.
pub fn normalize(file: &CabinetFile) -> Inventory {
    let mut records = Inventory::new();
    for (rack, network) in &file.cabinets {
        let name = format!("x{rack}");
        let xname = match Xname::parse(&name) {
            Ok(xname) => xname,
            Err(err) => {
                warn!(identifier = %name, %err, "skipping cabinet with malformed rack number");
                continue;
            }
        };

        records.insert(
            name.clone(),
            HardwareRecord {
                xname: name,
                parent: xname.parent_str(),
                class: Class::Mountain,
                hw_type: HardwareType::Cabinet,
                extra: ExtraProperties::Cabinet(CabinetProperties {
                    network: HMN_NETWORK.to_string(),
                    ip4_base: network.ip.clone(),
                    mac_prefix: CABINET_MAC_PREFIX.to_string(),
                }),
            },
        );
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn descriptor(json: &str) -> CabinetFile {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_rack_becomes_mountain_cabinet() {
        let records = normalize(&descriptor(r#"{"cabinets": {"9": {"ip": "10.1.0.0"}}}"#));

        assert_eq!(records.len(), 1);
        let cab = &records["x9"];
        assert_eq!(cab.xname, "x9");
        assert_eq!(cab.parent, "");
        assert_eq!(cab.class, Class::Mountain);
        assert_eq!(cab.hw_type, HardwareType::Cabinet);
        assert_eq!(
            cab.extra,
            ExtraProperties::Cabinet(CabinetProperties {
                network: "HMN".to_string(),
                ip4_base: "10.1.0.0".to_string(),
                mac_prefix: "02".to_string(),
            })
        );
    }

    #[test]
    fn test_malformed_rack_skipped_siblings_kept() {
        let records = normalize(&descriptor(
            r#"{"cabinets": {"9": {"ip": "10.1.0.0"}, "bogus": {"ip": "10.2.0.0"}}}"#,
        ));

        assert_eq!(records.len(), 1);
        assert!(records.contains_key("x9"));
    }

    #[test]
    fn test_load_rejects_empty_descriptor() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cabinets": {{}}}}"#).unwrap();

        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidSourceData { .. }));
    }

    #[test]
    fn test_load_rejects_wrong_structure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"racks": []}}"#).unwrap();

        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidSourceData { .. }));
    }
}
