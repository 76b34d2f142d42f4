use indexmap::IndexMap;
use rigger_core::Result;

/// A secret store backing one declared vault
///
/// Methods take `&mut self` because reads may populate a lazy cache.
/// Missing keys surface as [`rigger_core::Error::SecretNotFound`].
pub trait SecretVault: Send {
    /// Declared name of the vault
    fn name(&self) -> &str;

    fn get_secret_value(&mut self, key: &str) -> Result<String>;

    /// Store a value; persisted before this returns
    fn set_secret_value(&mut self, key: &str, value: &str) -> Result<()>;

    /// Store several values with a single persist
    fn batch_set_secret_values(&mut self, values: &IndexMap<String, String>) -> Result<()>;

    fn delete_secret(&mut self, key: &str) -> Result<()>;

    fn list_secret_names(&mut self) -> Result<Vec<String>>;

    /// Fetch several keys; any missing key fails the whole batch
    fn batch_get_secret_values(&mut self, keys: &[String]) -> Result<IndexMap<String, String>> {
        let mut values = IndexMap::with_capacity(keys.len());
        for key in keys {
            let value = self.get_secret_value(key)?;
            values.insert(key.clone(), value);
        }
        Ok(values)
    }

    /// Fetch `source → target` pairs, keyed by target in the result
    fn map_secret_values(
        &mut self,
        query: &IndexMap<String, String>,
    ) -> Result<IndexMap<String, String>> {
        let keys: Vec<String> = query.keys().cloned().collect();
        let mut found = self.batch_get_secret_values(&keys)?;

        let mut mapped = IndexMap::with_capacity(query.len());
        for (source, target) in query {
            if let Some(value) = found.shift_remove(source) {
                mapped.insert(target.clone(), value);
            }
        }
        Ok(mapped)
    }
}
