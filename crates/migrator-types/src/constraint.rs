//! Deterministic constraint-name derivation, shared by the primary-key and
//! foreign-key install paths. Names are truncated to 63 bytes, Postgres's
//! identifier length limit; per spec §9 this is a known, accepted collision
//! risk for very long table/column names rather than something this
//! migrator works around with a hash suffix.

const MAX_IDENTIFIER_LEN: usize = 63;

/// `pk_<namespace>_<table>`, truncated to 63 bytes.
pub fn primary_key_name(namespace: &str, table: &str) -> String {
    truncate(&format!("pk_{namespace}_{table}"))
}

/// `fk_<origin_table>_<origin_column>_<referenced_table>`, truncated to 63
/// bytes.
pub fn foreign_key_name(origin_table: &str, origin_column: &str, referenced_table: &str) -> String {
    truncate(&format!("fk_{origin_table}_{origin_column}_{referenced_table}"))
}

fn truncate(name: &str) -> String {
    if name.len() <= MAX_IDENTIFIER_LEN {
        return name.to_string();
    }
    // Truncate on a char boundary so we never split a multi-byte UTF-8
    // sequence; identifiers are ASCII in practice but this keeps the
    // function total for arbitrary input.
    let mut end = MAX_IDENTIFIER_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_primary_key_name_format() {
        assert_eq!(primary_key_name("tenant_a", "orders"), "pk_tenant_a_orders");
    }

    #[test]
    fn test_foreign_key_name_format() {
        assert_eq!(
            foreign_key_name("orders", "customer_id", "customers"),
            "fk_orders_customer_id_customers"
        );
    }

    #[test]
    fn test_names_longer_than_63_bytes_are_truncated() {
        let long_table = "a".repeat(100);
        let name = primary_key_name("ns", &long_table);
        assert_eq!(name.len(), 63);
        assert!(name.starts_with("pk_ns_aaa"));
    }

    #[test]
    fn test_truncation_never_splits_a_utf8_char_boundary() {
        let name = "é".repeat(40);
        let pk = primary_key_name("ns", &name);
        assert!(pk.len() <= MAX_IDENTIFIER_LEN);
        assert!(String::from_utf8(pk.into_bytes()).is_ok());
    }
}
