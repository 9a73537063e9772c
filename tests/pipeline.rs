//! End-to-end reconciliation scenario: four sources normalized and folded
//! into one inventory, exercised without any network traffic.

use inventory_capture::merge;
use inventory_capture::model::{Class, ExtraProperties, HardwareType, Inventory};
use inventory_capture::sources::{bmc, cabinet, noderole, switches};

fn cabinets() -> Inventory {
    let file: cabinet::CabinetFile =
        serde_json::from_str(r#"{"cabinets": {"9": {"ip": "10.1.0.0"}}}"#).unwrap();
    cabinet::normalize(&file)
}

fn bmcs() -> Inventory {
    let descriptors: Vec<bmc::BmcDescriptor> = serde_json::from_str(
        r#"[{"ID": "x9c0s1b0", "IPAddress": "10.4.0.5", "User": "root", "Password": "initial0"}]"#,
    )
    .unwrap();
    bmc::normalize(&descriptors)
}

fn switch_records() -> Inventory {
    let map: switches::PortMap = serde_json::from_str(
        r#"{
        "switches": [{
            "id": "x9c0w1",
            "address": "10.5.0.9",
            "snmpUser": "snmp",
            "snmpAuthPassword": "authpw",
            "snmpAuthProtocol": "MD5",
            "snmpPrivPassword": "privpw",
            "snmpPrivProtocol": "DES",
            "ports": [{"ifName": "eth1/1/5", "peerID": "x9c0s1b0"}]
        }]
    }"#,
    )
    .unwrap();
    switches::normalize(&map).unwrap()
}

fn node_maps() -> noderole::NodeMaps {
    serde_json::from_str(
        r#"{"NodeMaps": [
            {"ID": "x9c0s1b0n0", "NID": 1},
            {"ID": "x9c0s2b0n0", "NID": 4},
            {"ID": "x1c0s0b0n0", "NID": 7, "Role": "Application"}
        ]}"#,
    )
    .unwrap()
}

fn build_inventory() -> Inventory {
    let cabinets = cabinets();
    let bmcs = bmcs();
    let switch_records = switch_records();

    let context = merge::fold([
        ("cabinets", cabinets.clone()),
        ("switches", switch_records.clone()),
    ]);
    let nodes = noderole::normalize(&node_maps(), &context, &bmcs).unwrap();

    merge::fold([
        ("cabinets", cabinets),
        ("switches", switch_records),
        ("node-role", nodes),
        ("node-bmcs", bmcs),
    ])
}

#[test]
fn full_inventory_shape() {
    let inventory = build_inventory();

    // Cabinet, switch, connector, BMC, and three nodes.
    assert_eq!(inventory.len(), 7);

    assert_eq!(inventory["x9"].hw_type, HardwareType::Cabinet);
    assert_eq!(inventory["x9"].class, Class::Mountain);
    assert_eq!(inventory["x9"].parent, "");

    assert_eq!(inventory["x9c0w1"].hw_type, HardwareType::MgmtSwitch);
    assert_eq!(inventory["x9c0w1"].parent, "x9c0");

    assert_eq!(
        inventory["x9c0w1j5"].hw_type,
        HardwareType::MgmtSwitchConnector
    );
    assert_eq!(inventory["x9c0w1j5"].parent, "x9c0w1");

    // The BMC record keeps its NodeBMC shape even though the node-role
    // pass synthesized a child under it.
    assert_eq!(inventory["x9c0s1b0"].hw_type, HardwareType::NodeBmc);
    assert_eq!(inventory["x9c0s1b0"].class, Class::River);
}

#[test]
fn node_roles_and_classes_resolved_across_sources() {
    let inventory = build_inventory();

    let role = |xname: &str| match &inventory[xname].extra {
        ExtraProperties::Node(props) => (props.nid, props.role.clone()),
        other => panic!("expected node properties for {xname}, got {other:?}"),
    };

    // Known management BMC parent: Management, even with no explicit role,
    // and the pass-one pseudo-child was overwritten by the NID record.
    assert_eq!(role("x9c0s1b0n0"), (Some(1), "Management".to_string()));

    // No management signal: Compute, class inherited from cabinet x9.
    assert_eq!(role("x9c0s2b0n0"), (Some(4), "Compute".to_string()));
    assert_eq!(inventory["x9c0s2b0n0"].class, Class::Mountain);

    // Explicit role wins; unknown cabinet x1 defaults to River.
    assert_eq!(role("x1c0s0b0n0"), (Some(7), "Application".to_string()));
    assert_eq!(inventory["x1c0s0b0n0"].class, Class::River);
}

#[test]
fn rebuild_from_same_snapshot_is_byte_identical() {
    let first = serde_json::to_string(&build_inventory()).unwrap();
    let second = serde_json::to_string(&build_inventory()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn parents_are_derivable_and_present_where_expected() {
    let inventory = build_inventory();

    for (xname, record) in &inventory {
        assert_eq!(record.xname, *xname);
        assert_eq!(
            inventory_capture::xname::parent_of(xname).unwrap(),
            record.parent,
            "parent of {xname} should be syntactically derivable"
        );
    }
}
