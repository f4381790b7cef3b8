//! SQL identifier quoting and type-name utilities
//!
//! Every statement a migration step renders goes through these helpers, so
//! identifiers are always quoted and literals always escaped.

/// Double-quote an identifier, doubling any embedded `"`.
///
/// ```
/// use sw_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident(r#"odd"name"#), r#""odd""name""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    let mut quoted = String::with_capacity(ident.len() + 2);
    quoted.push('"');
    for ch in ident.chars() {
        if ch == '"' {
            quoted.push('"');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Quote each dot-separated part of a table name.
///
/// ```
/// use sw_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("ops.tasks"), r#""ops"."tasks""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    let parts: Vec<String> = name.split('.').map(quote_ident).collect();
    parts.join(".")
}

/// `(schema, table)` for a table name; unqualified names live in `main`.
pub fn split_qualified_name(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((schema, table)) => (schema, table),
        None => ("main", name),
    }
}

/// Escape text for use inside a single-quoted SQL literal.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Normalize a declared column type to the name the DuckDB catalog reports.
///
/// `information_schema.columns.data_type` reports canonical names
/// (`VARCHAR`, `INTEGER`, ...), while step definitions use whatever alias the
/// author wrote (`TEXT`, `INT`, ...). Parameterised types keep their arguments;
/// a bare `DECIMAL` takes DuckDB's default width of `(18,3)`. Array suffixes
/// are kept and the element type is normalized.
///
/// # Examples
/// ```
/// use sw_core::sql_utils::normalize_type;
/// assert_eq!(normalize_type("text"), "VARCHAR");
/// assert_eq!(normalize_type("decimal(18, 3)"), "DECIMAL(18,3)");
/// assert_eq!(normalize_type("text[]"), "VARCHAR[]");
/// ```
pub fn normalize_type(declared: &str) -> String {
    let compact = declared
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(", ", ",")
        .replace(" [", "[")
        .replace(" (", "(")
        .to_ascii_uppercase();

    let (element, suffix) = match compact.find('[') {
        Some(pos) => (&compact[..pos], &compact[pos..]),
        None => (compact.as_str(), ""),
    };
    format!("{}{suffix}", normalize_scalar(element))
}

fn normalize_scalar(compact: &str) -> String {
    let (base, args) = match compact.find('(') {
        Some(pos) => (&compact[..pos], &compact[pos..]),
        None => (compact, ""),
    };

    let canonical = match base {
        "VARCHAR" | "TEXT" | "STRING" | "CHAR" | "BPCHAR" | "NVARCHAR" => return "VARCHAR".to_string(),
        "DECIMAL" | "NUMERIC" if args.is_empty() => return "DECIMAL(18,3)".to_string(),
        "INT" | "INT4" | "SIGNED" => "INTEGER",
        "INT8" | "LONG" => "BIGINT",
        "INT2" | "SHORT" => "SMALLINT",
        "BOOL" | "LOGICAL" => "BOOLEAN",
        "FLOAT8" | "DOUBLE PRECISION" => "DOUBLE",
        "FLOAT4" | "REAL" => "FLOAT",
        "DATETIME" => "TIMESTAMP",
        "TIMESTAMPTZ" => "TIMESTAMP WITH TIME ZONE",
        "NUMERIC" => "DECIMAL",
        other => other,
    };
    format!("{canonical}{args}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("users"), r#""users""#);
        assert_eq!(quote_ident(r#"host "ai""#), r#""host ""ai""""#);
    }

    #[test]
    fn test_split_qualified_name() {
        assert_eq!(split_qualified_name("settings"), ("main", "settings"));
        assert_eq!(split_qualified_name("ops.tasks"), ("ops", "tasks"));
    }

    #[test]
    fn test_escape_sql_string() {
        assert_eq!(escape_sql_string("O'Brien's"), "O''Brien''s");
    }

    #[test]
    fn test_normalize_type_aliases() {
        assert_eq!(normalize_type("TEXT"), "VARCHAR");
        assert_eq!(normalize_type("varchar(255)"), "VARCHAR");
        assert_eq!(normalize_type("int"), "INTEGER");
        assert_eq!(normalize_type("bool"), "BOOLEAN");
        assert_eq!(normalize_type("double  precision"), "DOUBLE");
        assert_eq!(normalize_type("TIMESTAMP"), "TIMESTAMP");
    }

    #[test]
    fn test_normalize_type_keeps_arguments() {
        assert_eq!(normalize_type("numeric(10,2)"), "DECIMAL(10,2)");
    }

    #[test]
    fn test_normalize_type_bare_decimal_uses_default_width() {
        assert_eq!(normalize_type("DECIMAL"), "DECIMAL(18,3)");
        assert_eq!(normalize_type("numeric"), "DECIMAL(18,3)");
    }

    #[test]
    fn test_normalize_type_arrays() {
        assert_eq!(normalize_type("TEXT[]"), "VARCHAR[]");
        assert_eq!(normalize_type("int []"), "INTEGER[]");
        assert_eq!(normalize_type("decimal(10, 2)[]"), "DECIMAL(10,2)[]");
    }
}
