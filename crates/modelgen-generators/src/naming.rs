//! Identifier conversion for generated Rust code.

const RESERVED: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// `order_items` / `Order Items` / `orderItems` -> `OrderItems`.
pub fn to_pascal_case(name: &str) -> String {
    let snake = to_snake_case(name);
    let pascal: String = snake
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect();
    prefix_digit(pascal, "T")
}

/// `OrderItems` / `order-items` / `Order Items` -> `order_items`.
pub fn to_snake_case(name: &str) -> String {
    let mut result = String::new();
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() && prev_lower {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        } else {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_lower = false;
        }
    }
    let trimmed = result.trim_end_matches('_').to_string();
    prefix_digit(trimmed, "_")
}

/// Struct name for a table; names without any identifier characters fall
/// back to `Table`.
pub fn type_name(table: &str) -> String {
    let name = to_pascal_case(table);
    if name.is_empty() { "Table".to_string() } else { name }
}

/// Field name safe to emit in Rust source.
pub fn field_name(column: &str) -> String {
    let name = to_snake_case(column);
    let name = if name.is_empty() { "column".to_string() } else { name };
    if RESERVED.contains(&name.as_str()) {
        match name.as_str() {
            "self" | "Self" | "super" | "crate" => format!("{name}_"),
            _ => format!("r#{name}"),
        }
    } else {
        name
    }
}

/// Quote a SQL identifier unless it is a plain lower-case name.
pub fn quote_ident(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_lowercase() || first == '_')
        && name
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

fn prefix_digit(name: String, prefix: &str) -> String {
    if name.chars().next().is_some_and(|ch| ch.is_ascii_digit()) {
        format!("{prefix}{name}")
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_table_names_to_types() {
        assert_eq!(to_pascal_case("order_items"), "OrderItems");
        assert_eq!(to_pascal_case("OrderItems"), "OrderItems");
        assert_eq!(to_pascal_case("order items"), "OrderItems");
        assert_eq!(to_pascal_case("2fa_codes"), "T2faCodes");
        assert_eq!(type_name("!!"), "Table");
        assert_eq!(type_name("audit log"), "AuditLog");
    }

    #[test]
    fn converts_column_names_to_fields() {
        assert_eq!(field_name("userId"), "user_id");
        assert_eq!(field_name("Created At"), "created_at");
        assert_eq!(field_name("type"), "r#type");
        assert_eq!(field_name("self"), "self_");
        assert_eq!(field_name("2nd"), "_2nd");
    }

    #[test]
    fn quotes_only_when_needed() {
        assert_eq!(quote_ident("users"), "users");
        assert_eq!(quote_ident("Users"), "\"Users\"");
        assert_eq!(quote_ident("order items"), "\"order items\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
