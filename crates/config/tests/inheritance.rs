use rigger_config::{Manifest, ManifestLoader};
use rigger_core::{Error, ErrorKind};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_no_ancestors_returns_manifest_unchanged() {
    let manifest = Manifest::from_yaml_str("name: solo\nsecrets: [A]\n").unwrap();
    let resolved = manifest.resolve_inheritance("/nonexistent").unwrap();
    assert_eq!(resolved, manifest);
}

#[test]
fn test_child_wins_over_later_ancestor_over_earlier() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "a.yaml",
        r#"
name: a
secrets:
  - {name: SHARED, key: from-a}
  - {name: ONLY_A, key: a}
env:
  LEVEL: a
  FROM_A: "1"
"#,
    );
    write(
        dir.path(),
        "b.yaml",
        r#"
name: b
secrets:
  - {name: SHARED, key: from-b}
  - {name: ONLY_B, key: b}
env:
  LEVEL: b
"#,
    );

    let child = Manifest::from_yaml_str(
        r#"
name: child
inherits: [a.yaml, "", b.yaml]
secrets:
  - {name: ONLY_B, key: child}
env:
  LEVEL: child
"#,
    )
    .unwrap();
    let original = child.clone();

    let resolved = child.resolve_inheritance(dir.path()).unwrap();

    assert_eq!(child, original);
    assert_eq!(resolved.name, "child");
    assert_eq!(resolved.inherits, child.inherits);
    assert_eq!(resolved.secret("SHARED").unwrap().storage_key(), "from-b");
    assert_eq!(resolved.secret("ONLY_A").unwrap().storage_key(), "a");
    assert_eq!(resolved.secret("ONLY_B").unwrap().storage_key(), "child");
    assert_eq!(resolved.env["LEVEL"], "child");
    assert_eq!(resolved.env["FROM_A"], "1");

    let order: Vec<_> = resolved.secrets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(order, vec!["SHARED", "ONLY_A", "ONLY_B"]);
}

#[test]
fn test_nested_ancestors_resolve_relative_to_their_own_dir() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "shared/root.yaml", "vaults:\n  - {name: main, uri: 'sops://./root.env'}\n");
    write(
        dir.path(),
        "shared/base.yaml",
        "inherits: [root.yaml]\nsecrets: [BASE]\n",
    );
    write(
        dir.path(),
        "app/rigger.yaml",
        "inherits: [../shared/base.yaml]\nsecrets: [APP]\n",
    );

    let resolved = Manifest::load_resolved(dir.path().join("app/rigger.yaml")).unwrap();

    assert_eq!(resolved.vaults[0].name, "main");
    let order: Vec<_> = resolved.secrets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(order, vec!["BASE", "APP"]);
}

#[test]
fn test_cycle_is_validation_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.yaml", "inherits: [b.yaml]\n");
    write(dir.path(), "b.yaml", "inherits: [a.yaml]\n");

    let err = Manifest::load_resolved(dir.path().join("a.yaml")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("a.yaml"));
}

#[test]
fn test_malformed_ancestor_is_structural_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "broken.yaml", "secrets: [oops\n");

    let child = Manifest::from_yaml_str("inherits: [broken.yaml]\n").unwrap();
    let err = child.resolve_inheritance(dir.path()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Structural);
    assert!(err.to_string().contains("broken.yaml"));
}

#[test]
fn test_missing_ancestor_is_not_found() {
    let dir = TempDir::new().unwrap();
    let child = Manifest::from_yaml_str("inherits: [gone.yaml]\n").unwrap();

    let err = child.resolve_inheritance(dir.path()).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_loader_resolves_inheritance_by_default() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "base.yaml", "env:\n  REGION: eu\n");
    write(dir.path(), "rigger.yaml", "inherits: [base.yaml]\nenv:\n  APP: shop\n");

    let loaded = ManifestLoader::new().directory(dir.path()).load().unwrap();
    assert_eq!(loaded.manifest.env["REGION"], "eu");

    let raw = ManifestLoader::new()
        .directory(dir.path())
        .resolve_inheritance(false)
        .load()
        .unwrap();
    assert!(!raw.manifest.env.contains_key("REGION"));
}
