//! Component C: the table ignore policy. A table with no semantic content
//! to downstream consumers is skipped entirely — it is never introspected,
//! copied, or referenced in a foreign key.

const SYSTEM_TABLES: &[&str] = &["dtproperties", "sysdiagrams", "systranschemas"];

const CHANGE_TRACKING_CATALOGS: &[&str] = &[
    "change_tables",
    "ddl_history",
    "lsn_time_mapping",
    "captured_columns",
    "index_columns",
    "comandos",
];

/// Returns `true` if the table named `raw_name` should be skipped.
///
/// Matching is case-insensitive against the trimmed name, per the data
/// model invariant that source catalogs sometimes return padded names.
pub fn is_ignored(raw_name: &str) -> bool {
    let name = raw_name.trim().to_lowercase();

    SYSTEM_TABLES.contains(&name.as_str())
        || CHANGE_TRACKING_CATALOGS.contains(&name.as_str())
        || name.ends_with("_ct")
        || name.contains("_ct_")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_system_tables_are_ignored() {
        for name in ["dtproperties", "sysdiagrams", "systranschemas"] {
            assert!(is_ignored(name), "{name} should be ignored");
        }
    }

    #[test]
    fn test_change_tracking_catalogs_are_ignored() {
        for name in [
            "change_tables",
            "ddl_history",
            "lsn_time_mapping",
            "captured_columns",
            "index_columns",
            "comandos",
        ] {
            assert!(is_ignored(name), "{name} should be ignored");
        }
    }

    #[test]
    fn test_ct_suffix_and_infix_are_ignored() {
        assert!(is_ignored("orders_ct"));
        assert!(is_ignored("orders_ct_history"));
        assert!(!is_ignored("concat"));
        assert!(!is_ignored("cts"));
    }

    #[test]
    fn test_matching_is_case_insensitive_and_trims_whitespace() {
        assert!(is_ignored("  Orders_CT  "));
        assert!(is_ignored("SysDiagrams"));
    }

    #[test]
    fn test_ordinary_table_is_not_ignored() {
        assert!(!is_ignored("orders"));
        assert!(!is_ignored("customers"));
    }
}
