use rigger::output::OutputFormat;
use rigger::{Commands, ResolveArgs};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn manifest(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("rigger.yaml");
    fs::write(&path, content).unwrap();
    path
}

fn run(command: Commands, resolve: &ResolveArgs) -> eyre::Result<String> {
    let mut out = Vec::new();
    command.execute(resolve, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_env_prints_shell_exports() {
    let dir = TempDir::new().unwrap();
    let resolve = ResolveArgs {
        file: Some(manifest(
            &dir,
            "env:\n  GREETING: hello world\n  TARGET: ${GREETING:-x}!\n",
        )),
        ..ResolveArgs::default()
    };

    let output = run(
        Commands::Env {
            format: OutputFormat::Shell,
        },
        &resolve,
    )
    .unwrap();

    assert_eq!(
        output,
        "export GREETING='hello world'\nexport TARGET='hello world!'\n"
    );
}

#[test]
fn test_env_prints_json() {
    let dir = TempDir::new().unwrap();
    let resolve = ResolveArgs {
        file: Some(manifest(&dir, "env:\n  PORT: \"8080\"\n")),
        ..ResolveArgs::default()
    };

    let output = run(
        Commands::Env {
            format: OutputFormat::Json,
        },
        &resolve,
    )
    .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["PORT"], "8080");
}

#[test]
fn test_lenient_flag() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, "env:\n  URL: http://${RIGGER_TEST_UNSET_HOST}/\n");
    let command = || Commands::Env {
        format: OutputFormat::Shell,
    };

    let strict = ResolveArgs {
        file: Some(path.clone()),
        ..ResolveArgs::default()
    };
    let err = run(command(), &strict).unwrap_err();
    assert!(format!("{err:?}").contains("RIGGER_TEST_UNSET_HOST"));

    let lenient = ResolveArgs {
        file: Some(path),
        lenient: true,
        ..ResolveArgs::default()
    };
    assert_eq!(run(command(), &lenient).unwrap(), "export URL=http:///\n");
}

#[test]
fn test_missing_manifest_is_reported() {
    let dir = TempDir::new().unwrap();
    let resolve = ResolveArgs {
        file: Some(dir.path().join("absent.yaml")),
        ..ResolveArgs::default()
    };

    let err = run(
        Commands::Secrets {
            format: OutputFormat::Shell,
            names: true,
        },
        &resolve,
    )
    .unwrap_err();

    let core = err.downcast_ref::<rigger_core::Error>().unwrap();
    assert_eq!(core.kind(), rigger_core::ErrorKind::NotFound);
}

#[test]
fn test_secrets_without_declarations_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let resolve = ResolveArgs {
        file: Some(manifest(&dir, "name: empty\n")),
        ..ResolveArgs::default()
    };

    let output = run(
        Commands::Secrets {
            format: OutputFormat::Shell,
            names: false,
        },
        &resolve,
    )
    .unwrap();
    assert!(output.is_empty());
}
