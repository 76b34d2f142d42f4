use proptest::prelude::*;
use rigger_config::{Manifest, Secret, Vault};

fn arb_secret() -> impl Strategy<Value = Secret> {
    ("[A-E]", "[a-z]{1,4}", any::<bool>()).prop_map(|(name, key, gen)| Secret {
        key: Some(key),
        gen,
        ..Secret::new(name)
    })
}

fn arb_manifest() -> impl Strategy<Value = Manifest> {
    (
        prop::collection::vec(arb_secret(), 0..5),
        prop::collection::vec(("[v-z]", "[a-z]{1,3}"), 0..3),
        prop::collection::vec(("[A-D]", "[a-z0-9]{0,3}"), 0..4),
        prop::collection::vec("[a-c]\\.yaml", 0..3),
    )
        .prop_map(|(secrets, vaults, env, files)| {
            let mut manifest = Manifest::default();
            // Declared names are unique within one document
            manifest.merge_secrets(&secrets);
            let vaults: Vec<Vault> = vaults
                .into_iter()
                .map(|(name, file)| Vault::new(name, format!("sops://./{file}.env")))
                .collect();
            manifest.merge_vaults(&vaults);
            manifest.env = env.into_iter().collect();
            for file in files {
                if !manifest.files.contains(&file) {
                    manifest.files.push(file);
                }
            }
            manifest
        })
}

fn key_of(manifest: &Manifest, name: &str) -> Option<String> {
    manifest.secret(name).map(|s| s.storage_key().to_string())
}

proptest! {
    #[test]
    fn merge_is_idempotent(base in arb_manifest(), other in arb_manifest()) {
        let mut once = base.clone();
        once.merge(&other);

        let mut twice = once.clone();
        twice.merge(&other);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn chain_merge_matches_precedence(a in arb_manifest(), b in arb_manifest(), c in arb_manifest()) {
        let mut merged = a.clone();
        merged.merge(&b);
        merged.merge(&c);

        for name in ["A", "B", "C", "D", "E"] {
            let expected = key_of(&c, name)
                .or_else(|| key_of(&b, name))
                .or_else(|| key_of(&a, name));
            prop_assert_eq!(key_of(&merged, name), expected);
        }
    }

    #[test]
    fn prepend_merge_keeps_declared_entries(declared in arb_manifest(), defaults in arb_manifest()) {
        let mut layered = declared.clone();
        layered.prepend_merge_secrets(&defaults.secrets);

        for secret in &declared.secrets {
            prop_assert_eq!(layered.secret(&secret.name), Some(secret));
        }
        for secret in &defaults.secrets {
            prop_assert!(layered.secret(&secret.name).is_some());
        }
    }
}
