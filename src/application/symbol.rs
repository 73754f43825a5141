//! Symbol normalization.
//!
//! Maps the free-text symbol in an alert to the name the broker uses.
//! Aliases are uppercased and trimmed at this boundary, on both insert and
//! lookup; canonical names are stored as given since broker suffixes are
//! case-sensitive (`NAS100.cash`).

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::info;

use crate::domain::DomainError;

/// Built-in alias table.
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    // Metals
    ("GOLD", "XAUUSD"),
    ("XAU", "XAUUSD"),
    ("XAUUSD", "XAUUSD"),
    ("SILVER", "XAGUSD"),
    ("XAG", "XAGUSD"),
    // US indices
    ("SPX", "US500"),
    ("SPX500", "US500"),
    ("SP500", "US500"),
    ("ES", "US500"),
    ("NDX", "US100"),
    ("NAS100", "US100"),
    ("NASDAQ", "US100"),
    ("DJI", "US30"),
    ("DOW", "US30"),
    ("YM", "US30"),
    // European indices
    ("DAX", "GER40"),
    ("DE40", "GER40"),
    ("GER30", "GER40"),
    ("UKX", "UK100"),
    ("FTSE", "UK100"),
    // Energy
    ("OIL", "USOIL"),
    ("WTI", "USOIL"),
    ("CL", "USOIL"),
    ("BRENT", "UKOIL"),
    // Crypto
    ("BTC", "BTCUSD"),
    ("BTCUSDT", "BTCUSD"),
    ("ETH", "ETHUSD"),
    ("ETHUSDT", "ETHUSD"),
];

/// Uppercase and trim an alias.
fn alias_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[derive(Debug, Default)]
struct Table {
    entries: HashMap<String, String>,
    /// Aliases added through [`SymbolNormalizer::add_mapping`].
    custom: HashMap<String, String>,
}

/// Runtime-extendable symbol alias table.
#[derive(Debug)]
pub struct SymbolNormalizer {
    table: RwLock<Table>,
}

impl SymbolNormalizer {
    /// Create a normalizer seeded with the built-in aliases.
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(std::iter::empty::<(String, String)>())
    }

    /// Create a normalizer with the built-in aliases plus `extra`.
    ///
    /// `extra` entries win over built-ins with the same alias. They are not
    /// reported as custom mappings.
    pub fn with_defaults<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut entries: HashMap<String, String> = DEFAULT_MAPPINGS
            .iter()
            .map(|(alias, canonical)| ((*alias).to_string(), (*canonical).to_string()))
            .collect();
        for (alias, canonical) in extra {
            entries.insert(alias_key(alias.as_ref()), canonical.into());
        }

        Self {
            table: RwLock::new(Table {
                entries,
                custom: HashMap::new(),
            }),
        }
    }

    /// Canonical symbol for `raw`.
    ///
    /// A miss returns the trimmed, uppercased input.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        let key = alias_key(raw);
        let table = self.table.read();
        match table.entries.get(&key) {
            Some(canonical) => canonical.clone(),
            None => key,
        }
    }

    /// Insert or overwrite `alias -> canonical`.
    ///
    /// Both must be non-empty after trimming. Returns the table size after
    /// the insert.
    pub fn add_mapping(&self, alias: &str, canonical: &str) -> Result<usize, DomainError> {
        let key = alias_key(alias);
        if key.is_empty() {
            return Err(DomainError::EmptyMappingField { field: "alias" });
        }
        let canonical = canonical.trim();
        if canonical.is_empty() {
            return Err(DomainError::EmptyMappingField { field: "canonical" });
        }

        let count = {
            let mut table = self.table.write();
            table.entries.insert(key.clone(), canonical.to_string());
            table.custom.insert(key.clone(), canonical.to_string());
            table.entries.len()
        };

        info!(alias = %key, canonical, count, "Symbol mapping added");
        Ok(count)
    }

    /// Full current table, sorted by alias.
    #[must_use]
    pub fn list_mappings(&self) -> BTreeMap<String, String> {
        let table = self.table.read();
        table
            .entries
            .iter()
            .map(|(alias, canonical)| (alias.clone(), canonical.clone()))
            .collect()
    }

    /// Mappings added at runtime, sorted by alias.
    #[must_use]
    pub fn custom_mappings(&self) -> BTreeMap<String, String> {
        let table = self.table.read();
        table
            .custom
            .iter()
            .map(|(alias, canonical)| (alias.clone(), canonical.clone()))
            .collect()
    }

    /// Re-apply persisted custom mappings. Blank entries are skipped.
    pub fn restore_custom<'a, I>(&self, mappings: I) -> usize
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut table = self.table.write();
        let mut restored = 0;
        for (alias, canonical) in mappings {
            let key = alias_key(alias);
            let canonical = canonical.trim();
            if key.is_empty() || canonical.is_empty() {
                continue;
            }
            table.entries.insert(key.clone(), canonical.to_string());
            table.custom.insert(key, canonical.to_string());
            restored += 1;
        }
        restored
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.read().entries.is_empty()
    }
}

impl Default for SymbolNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_case_and_whitespace_insensitive() {
        let symbols = SymbolNormalizer::new();
        let expected = symbols.normalize("SPX");
        assert_eq!(expected, "US500");
        assert_eq!(symbols.normalize("spx"), expected);
        assert_eq!(symbols.normalize("Spx"), expected);
        assert_eq!(symbols.normalize(" SPX "), expected);
    }

    #[test]
    fn test_normalize_miss_passes_through_uppercased() {
        let symbols = SymbolNormalizer::new();
        assert_eq!(symbols.normalize("xyzabc"), "XYZABC");
        assert_eq!(symbols.normalize("  eurusd\t"), "EURUSD");
    }

    #[test]
    fn test_gold_maps_to_xauusd() {
        let symbols = SymbolNormalizer::new();
        assert_eq!(symbols.normalize("gold"), "XAUUSD");
    }

    #[test]
    fn test_add_mapping_then_normalize() {
        let symbols = SymbolNormalizer::new();
        symbols.add_mapping("nq", "NAS100.cash").unwrap();
        assert_eq!(symbols.normalize("NQ"), "NAS100.cash");
        assert_eq!(symbols.normalize(" nq "), "NAS100.cash");
    }

    #[test]
    fn test_add_mapping_overwrites_builtin() {
        let symbols = SymbolNormalizer::new();
        let before = symbols.len();
        let count = symbols.add_mapping("Gold", "GOLD.m").unwrap();

        assert_eq!(count, before);
        assert_eq!(symbols.normalize("gold"), "GOLD.m");
    }

    #[test]
    fn test_add_mapping_rejects_blank_fields() {
        let symbols = SymbolNormalizer::new();
        let before = symbols.list_mappings();

        assert_eq!(
            symbols.add_mapping("  ", "US500"),
            Err(DomainError::EmptyMappingField { field: "alias" })
        );
        assert_eq!(
            symbols.add_mapping("spx", ""),
            Err(DomainError::EmptyMappingField { field: "canonical" })
        );
        assert_eq!(symbols.list_mappings(), before);
    }

    #[test]
    fn test_add_mapping_returns_new_count() {
        let symbols = SymbolNormalizer::new();
        let before = symbols.len();
        assert_eq!(symbols.add_mapping("nq", "NAS100.cash"), Ok(before + 1));
    }

    #[test]
    fn test_list_mappings_is_uppercase_keyed() {
        let symbols = SymbolNormalizer::new();
        symbols.add_mapping("mnq", "US100.m").unwrap();

        let mappings = symbols.list_mappings();
        assert_eq!(mappings.get("MNQ").map(String::as_str), Some("US100.m"));
        assert!(mappings.keys().all(|k| *k == k.to_uppercase()));
    }

    #[test]
    fn test_extra_defaults_are_not_custom() {
        let symbols = SymbolNormalizer::with_defaults([("us tech", "USTEC")]);
        assert_eq!(symbols.normalize("US TECH"), "USTEC");
        assert!(symbols.custom_mappings().is_empty());
    }

    #[test]
    fn test_custom_mappings_tracks_runtime_inserts() {
        let symbols = SymbolNormalizer::new();
        symbols.add_mapping("nq", "NAS100.cash").unwrap();

        let custom = symbols.custom_mappings();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom["NQ"], "NAS100.cash");
    }

    #[test]
    fn test_restore_custom_skips_blank_entries() {
        let symbols = SymbolNormalizer::new();
        let persisted: BTreeMap<String, String> = [
            ("nq".to_string(), "NAS100.cash".to_string()),
            ("".to_string(), "X".to_string()),
            ("es".to_string(), " ".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(symbols.restore_custom(&persisted), 1);
        assert_eq!(symbols.normalize("nq"), "NAS100.cash");
        assert_eq!(symbols.normalize("es"), "US500");
    }

    #[test]
    fn test_new_normalizer_has_builtins() {
        let symbols = SymbolNormalizer::new();
        assert!(!symbols.is_empty());
        assert_eq!(symbols.len(), symbols.list_mappings().len());
    }

    #[test]
    fn test_concurrent_add_and_normalize_see_old_or_new() {
        use std::sync::Arc;

        let symbols = Arc::new(SymbolNormalizer::new());
        let mut handles = Vec::new();

        for _ in 0..4 {
            let symbols = Arc::clone(&symbols);
            handles.push(std::thread::spawn(move || {
                for _ in 0..500 {
                    let seen = symbols.normalize("nq");
                    assert!(seen == "NQ" || seen == "NAS100.cash", "torn read: {seen}");
                    let listed = symbols.list_mappings();
                    if let Some(canonical) = listed.get("NQ") {
                        assert_eq!(canonical, "NAS100.cash");
                    }
                }
            }));
        }
        for i in 0..200 {
            symbols.add_mapping("nq", "NAS100.cash").unwrap();
            symbols.add_mapping(&format!("ALIAS{i}"), "US500").unwrap();
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(symbols.normalize("NQ"), "NAS100.cash");
        assert_eq!(symbols.custom_mappings().len(), 201);
    }
}
