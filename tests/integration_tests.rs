use mcsm::domain::{LoaderKind, MemoryLimits, ServerInstance};
use std::path::PathBuf;

fn instance(loader: &str, version: &str) -> ServerInstance {
    ServerInstance::new(
        "mc".to_string(),
        "docker.io/itzg/minecraft-server".to_string(),
        LoaderKind::from_arg(loader),
        version.to_string(),
        MemoryLimits {
            init: "6G".to_string(),
            max: "6G".to_string(),
        },
        PathBuf::from("/home/steve/Desktop/ServerData"),
        "/data".to_string(),
    )
}

#[test]
fn test_instance_to_spec_conversion() {
    let inst = instance("Forge", "1.18.2");
    let spec = inst.to_spec();

    assert_eq!(spec.name, "mc");
    assert_eq!(spec.image, "docker.io/itzg/minecraft-server");
    assert_eq!(
        spec.env,
        &[
            "EULA=TRUE".to_string(),
            "TYPE=FORGE".to_string(),
            "VERSION=1.18.2".to_string(),
            "INIT_MEMORY=6G".to_string(),
            "MAX_MEMORY=6G".to_string(),
        ]
    );
    assert_eq!(
        spec.binds,
        &["/home/steve/Desktop/ServerData:/data".to_string()]
    );
}

#[test]
fn test_loader_resolution_feeds_type_variable() {
    for (input, expected) in [
        ("fabric", "TYPE=FABRIC"),
        ("FORGE", "TYPE=FORGE"),
        ("vanilla", "TYPE=VANILLA"),
        ("bukkit", "TYPE=VANILLA"),
    ] {
        let inst = instance(input, "1.20.1");
        assert!(
            inst.env().contains(&expected.to_string()),
            "{input} should produce {expected}"
        );
    }
}
