//! Canonical inventory records and their registry wire shape.
//!
//! Every source normalizer produces [`HardwareRecord`]s; the merge engine
//! folds them into an [`Inventory`] keyed by xname. Field spellings here
//! match the system-layout registry's schema exactly (PascalCase keys,
//! `comptype_*` machine tags), so serializing a record yields the body the
//! registry expects.

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Hardware generation/class. A node takes the class of its nearest known
/// ancestor cabinet; River is the default when no ancestor is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Class {
    River,
    Mountain,
}

/// Structural role of a record. Fixed per normalizer, never user-settable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareType {
    Cabinet,
    NodeBmc,
    MgmtSwitch,
    MgmtSwitchConnector,
    Node,
}

impl HardwareType {
    /// Machine type tag as the registry spells it.
    pub fn machine_tag(&self) -> &'static str {
        match self {
            HardwareType::Cabinet => "comptype_cabinet",
            HardwareType::NodeBmc => "comptype_ncard",
            HardwareType::MgmtSwitch => "comptype_mgmt_switch",
            HardwareType::MgmtSwitchConnector => "comptype_mgmt_switch_connector",
            HardwareType::Node => "comptype_node",
        }
    }

    /// Human-readable type tag paired with [`machine_tag`](Self::machine_tag).
    pub fn type_string(&self) -> &'static str {
        match self {
            HardwareType::Cabinet => "Cabinet",
            HardwareType::NodeBmc => "NodeBMC",
            HardwareType::MgmtSwitch => "MgmtSwitch",
            HardwareType::MgmtSwitchConnector => "MgmtSwitchConnector",
            HardwareType::Node => "Node",
        }
    }
}

/// Open attribute bag; the variant is fixed by the record's type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtraProperties {
    Cabinet(CabinetProperties),
    NodeBmc(NodeBmcProperties),
    MgmtSwitch(MgmtSwitchProperties),
    SwitchConnector(SwitchConnectorProperties),
    Node(NodeProperties),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CabinetProperties {
    #[serde(rename = "Network")]
    pub network: String,
    #[serde(rename = "IP4Base")]
    pub ip4_base: String,
    #[serde(rename = "MACprefix")]
    pub mac_prefix: String,
}

/// Credentials are carried verbatim; serialized output is sensitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeBmcProperties {
    #[serde(rename = "Network")]
    pub network: String,
    #[serde(rename = "IP6addr")]
    pub ip6_addr: String,
    #[serde(rename = "IP4addr")]
    pub ip4_addr: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MgmtSwitchProperties {
    #[serde(rename = "IP6addr")]
    pub ip6_addr: String,
    #[serde(rename = "IP4addr")]
    pub ip4_addr: String,
    #[serde(rename = "SNMPUsername")]
    pub snmp_username: String,
    #[serde(rename = "SNMPAuthPassword")]
    pub snmp_auth_password: String,
    #[serde(rename = "SNMPAuthProtocol")]
    pub snmp_auth_protocol: String,
    #[serde(rename = "SNMPPrivPassword")]
    pub snmp_priv_password: String,
    #[serde(rename = "SNMPPrivProtocol")]
    pub snmp_priv_protocol: String,
    #[serde(rename = "Model")]
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchConnectorProperties {
    /// Peer identifiers on the far side of this connector.
    #[serde(rename = "NodeNics")]
    pub node_nics: Vec<String>,
    /// Raw interface name as the switch reported it.
    #[serde(rename = "VendorName")]
    pub vendor_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeProperties {
    /// Management pseudo-children synthesized from BMC records carry no NID.
    #[serde(rename = "NID", skip_serializing_if = "Option::is_none")]
    pub nid: Option<i64>,
    #[serde(rename = "Role")]
    pub role: String,
}

/// The canonical unit of inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct HardwareRecord {
    /// Hierarchical physical-location identifier; globally unique key.
    pub xname: String,
    /// Xname of the immediate ancestor; empty string is the system root.
    pub parent: String,
    pub class: Class,
    pub hw_type: HardwareType,
    pub extra: ExtraProperties,
}

impl Serialize for HardwareRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("HardwareRecord", 6)?;
        record.serialize_field("Xname", &self.xname)?;
        record.serialize_field("Parent", &self.parent)?;
        record.serialize_field("Class", &self.class)?;
        record.serialize_field("Type", self.hw_type.machine_tag())?;
        record.serialize_field("TypeString", self.hw_type.type_string())?;
        record.serialize_field("ExtraProperties", &self.extra)?;
        record.end()
    }
}

/// The merged inventory, keyed by xname. A `BTreeMap` keeps iteration and
/// serialization order deterministic across runs.
pub type Inventory = BTreeMap<String, HardwareRecord>;
