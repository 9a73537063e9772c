//! Node-role service: node-identifier-to-NID mappings with role and class
//! resolution.
//!
//! This is the only normalizer with cross-source dependencies. It runs
//! after the cabinet and switch sets have been merged, reading that map
//! as its class context, and consults the node-BMC record set to decide
//! which nodes are management nodes.

use serde::Deserialize;
use tracing::warn;

use crate::error::{CaptureError, CaptureResult};
use crate::model::{
    Class, ExtraProperties, HardwareRecord, HardwareType, Inventory, NodeProperties,
};
use crate::sources::http_client;
use crate::xname::Xname;

const SERVICE: &str = "node-role service";

pub const ROLE_COMPUTE: &str = "Compute";
pub const ROLE_MANAGEMENT: &str = "Management";

/// Client for the node-role service.
pub struct NodeRoleClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl NodeRoleClient {
    pub fn new(base: impl Into<String>, token: impl Into<String>) -> CaptureResult<Self> {
        Ok(Self {
            http: http_client()?,
            base: base.into(),
            token: token.into(),
        })
    }

    /// Fetch the node map defaults. Single attempt, no retry.
    pub async fn fetch_node_maps(&self) -> CaptureResult<NodeMaps> {
        let url = format!("{}/Defaults/NodeMaps", self.base);
        let maps = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(maps)
    }
}

/// Node-role query result.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeMaps {
    #[serde(rename = "NodeMaps", default)]
    pub node_maps: Vec<NodeMapEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeMapEntry {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "NID")]
    pub nid: i64,
    /// Explicit role annotation; wins over membership-based inference.
    #[serde(rename = "Role", default)]
    pub role: Option<String>,
}

/// Normalize the node-role query against already-merged context.
///
/// `context` is the partially merged inventory (cabinets and switches),
/// consulted read-only for ancestor-cabinet class lookup. `management_bmcs`
/// is the node-BMC record set; its xnames identify management nodes.
///
/// Two passes feed one map, later entries overwriting earlier ones:
/// first every BMC gets a synthesized management pseudo-child (`<bmc>n0`),
/// then every query entry gets a node record with resolved role and class.
pub fn normalize(
    maps: &NodeMaps,
    context: &Inventory,
    management_bmcs: &Inventory,
) -> CaptureResult<Inventory> {
    if maps.node_maps.is_empty() {
        return Err(CaptureError::UpstreamUnavailable {
            service: SERVICE.to_string(),
        });
    }

    let mut records = Inventory::new();

    for bmc_xname in management_bmcs.keys() {
        let bmc = match Xname::parse(bmc_xname) {
            Ok(xname) => xname,
            Err(err) => {
                warn!(identifier = %bmc_xname, %err, "skipping management node for malformed BMC");
                continue;
            }
        };

        let node_name = format!("{bmc_xname}n0");
        records.insert(
            node_name.clone(),
            HardwareRecord {
                xname: node_name,
                parent: bmc_xname.clone(),
                class: ancestor_class(&bmc, context),
                hw_type: HardwareType::Node,
                extra: ExtraProperties::Node(NodeProperties {
                    nid: None,
                    role: ROLE_MANAGEMENT.to_string(),
                }),
            },
        );
    }

    for entry in &maps.node_maps {
        let xname = match Xname::parse(&entry.id) {
            Ok(xname) => xname,
            Err(err) => {
                warn!(identifier = %entry.id, %err, "skipping node with malformed identifier");
                continue;
            }
        };

        let known_management = management_bmcs.contains_key(&entry.id)
            || management_bmcs.contains_key(&xname.parent_str());
        let role = entry.role.clone().unwrap_or_else(|| {
            if known_management {
                ROLE_MANAGEMENT.to_string()
            } else {
                ROLE_COMPUTE.to_string()
            }
        });

        records.insert(
            entry.id.clone(),
            HardwareRecord {
                xname: entry.id.clone(),
                parent: xname.parent_str(),
                class: ancestor_class(&xname, context),
                hw_type: HardwareType::Node,
                extra: ExtraProperties::Node(NodeProperties {
                    nid: Some(entry.nid),
                    role,
                }),
            },
        );
    }

    Ok(records)
}

/// Class of the nearest ancestor cabinet recorded in the context map,
/// defaulting to River when the cabinet is unknown.
fn ancestor_class(xname: &Xname, context: &Inventory) -> Class {
    context
        .get(&xname.cabinet().to_string())
        .map(|cabinet| cabinet.class)
        .unwrap_or(Class::River)
}
