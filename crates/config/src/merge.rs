//! Right-biased merging of manifests
//!
//! `dest.merge(&src)` overlays `src` onto `dest`: named entities from `src`
//! replace same-named ones in place, new ones are appended. The prepend
//! variants layer defaults *beneath* what `dest` already declares.

use crate::manifest::{Dns, Manifest, Secret, Vault};
use rigger_core::constants::DNS_DRIVER_NONE;

trait Named {
    fn name(&self) -> &str;
}

impl Named for Secret {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Vault {
    fn name(&self) -> &str {
        &self.name
    }
}

fn merge_named<T: Named + Clone>(dest: &mut Vec<T>, src: &[T]) {
    for item in src {
        match dest.iter_mut().find(|existing| existing.name() == item.name()) {
            Some(existing) => *existing = item.clone(),
            None => dest.push(item.clone()),
        }
    }
}

fn prepend_named<T: Named + Clone>(dest: &mut Vec<T>, defaults: &[T]) {
    if defaults.is_empty() {
        return;
    }

    let mut layered = defaults.to_vec();
    for item in dest.drain(..) {
        match layered.iter_mut().find(|existing| existing.name() == item.name()) {
            Some(existing) => *existing = item,
            None => layered.push(item),
        }
    }
    *dest = layered;
}

impl Manifest {
    /// Overlay `src` onto this manifest; `src` wins on conflicts.
    ///
    /// `inherits` is left as it is on `self`.
    pub fn merge(&mut self, src: &Manifest) {
        if !src.name.is_empty() {
            self.name = src.name.clone();
        }

        if let Some(compose) = &src.compose {
            self.compose = Some(compose.clone());
        }

        if let Some(ssh) = &src.ssh {
            self.ssh = Some(ssh.clone());
        }

        self.merge_secrets(&src.secrets);
        self.merge_vaults(&src.vaults);

        for (key, value) in &src.env {
            self.env.insert(key.clone(), value.clone());
        }

        if let Some(src_dns) = &src.dns {
            match &mut self.dns {
                None => self.dns = Some(src_dns.clone()),
                Some(dns) => merge_dns(dns, src_dns),
            }
        }

        for file in &src.files {
            if !self.files.contains(file) {
                self.files.push(file.clone());
            }
        }

        if let Some(src_hooks) = &src.hooks {
            let hooks = self.hooks.get_or_insert_with(Default::default);
            for (list, src_list) in hooks.lists_mut().into_iter().zip(src_hooks.lists()) {
                if !src_list.is_empty() {
                    list.clone_from(src_list);
                }
            }
        }
    }

    /// Overlay secrets by name
    pub fn merge_secrets(&mut self, secrets: &[Secret]) {
        merge_named(&mut self.secrets, secrets);
    }

    /// Overlay vaults by name
    pub fn merge_vaults(&mut self, vaults: &[Vault]) {
        merge_named(&mut self.vaults, vaults);
    }

    /// Layer default secrets beneath the declared ones
    pub fn prepend_merge_secrets(&mut self, defaults: &[Secret]) {
        prepend_named(&mut self.secrets, defaults);
    }

    /// Layer default vaults beneath the declared ones
    pub fn prepend_merge_vaults(&mut self, defaults: &[Vault]) {
        prepend_named(&mut self.vaults, defaults);
    }
}

fn merge_dns(dns: &mut Dns, src: &Dns) {
    if src.driver == DNS_DRIVER_NONE {
        dns.driver = DNS_DRIVER_NONE.to_string();
        dns.env.clear();
        dns.zone.clear();
    } else if let Some(reference) = src.use_.as_ref().filter(|u| !u.is_empty()) {
        dns.use_ = Some(reference.clone());
        dns.driver.clear();
        dns.env.clear();
        if !src.zone.is_empty() {
            dns.zone = src.zone.clone();
        }
    } else {
        if !src.driver.is_empty() {
            dns.driver = src.driver.clone();
        }
        if !src.zone.is_empty() {
            dns.zone = src.zone.clone();
        }
        for (key, value) in &src.env {
            dns.env.insert(key.clone(), value.clone());
        }
    }
}
