//! SQL identifier and literal helpers

/// Quote a SQL identifier, doubling embedded double quotes.
///
/// # Examples
/// ```
/// use dv_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote `name`, prefixing it with a quoted schema when one is given.
///
/// # Examples
/// ```
/// use dv_core::sql_utils::qualify;
/// assert_eq!(qualify(None, "drover_db_version"), r#""drover_db_version""#);
/// assert_eq!(qualify(Some("app"), "drover_db_version"), r#""app"."drover_db_version""#);
/// ```
pub fn qualify(schema: Option<&str>, name: &str) -> String {
    match schema {
        Some(s) => format!("{}.{}", quote_ident(s), quote_ident(name)),
        None => quote_ident(name),
    }
}

/// Quote a string literal, doubling embedded single quotes.
///
/// # Examples
/// ```
/// use dv_core::sql_utils::quote_literal;
/// assert_eq!(quote_literal("it's"), "'it''s'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
