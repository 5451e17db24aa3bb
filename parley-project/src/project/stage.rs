//! Stage overlays.
//!
//! A stage is a partial configuration under `[stages.<name>]`. Selecting it
//! deep-merges the overlay over the root table: nested tables merge key by
//! key, every other value replaces what the root declared.

/// Merge `overlay` into `base`, recursing into tables present on both sides.
pub(crate) fn merge_tables(base: &mut toml::Table, overlay: &toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_tables_recurses_and_replaces() {
        let mut base: toml::Table = toml::from_str(
            r#"
            [project]
            name = "my-app"
            endpoint = "http://localhost:3000"

            [locales]
            en = ["en-US", "en-GB"]
            "#,
        )
        .unwrap();
        let overlay: toml::Table = toml::from_str(
            r#"
            [project]
            endpoint = "https://prod.example.com"

            [locales]
            en = ["en-US"]
            "#,
        )
        .unwrap();

        merge_tables(&mut base, &overlay);

        assert_eq!(base["project"]["name"].as_str(), Some("my-app"));
        assert_eq!(
            base["project"]["endpoint"].as_str(),
            Some("https://prod.example.com")
        );
        assert_eq!(base["locales"]["en"].as_array().map(Vec::len), Some(1));
    }
}
