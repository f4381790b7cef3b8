//! Foreign-key reference extraction
//!
//! Column and table constraints are free-form SQL fragments. The dependency
//! resolver needs the tables they point at, so `REFERENCES <name>` clauses
//! are pulled out with the sqlparser tokenizer rather than a full parse.

use sqlparser::dialect::DuckDbDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer};

/// Return every table named by a `REFERENCES` clause in `sql`, in order of
/// appearance.
///
/// Quoted identifiers keep their exact text; dotted names are rejoined with
/// `.`. Keywords inside string literals are not matched.
pub fn extract_references(sql: &str) -> Result<Vec<String>, String> {
    let dialect = DuckDbDialect {};
    let tokens = Tokenizer::new(&dialect, sql)
        .tokenize()
        .map_err(|e| e.to_string())?;

    let significant: Vec<&Token> = tokens
        .iter()
        .filter(|t| !matches!(t, Token::Whitespace(_)))
        .collect();

    let mut references = Vec::new();
    let mut i = 0;
    while i < significant.len() {
        let is_references =
            matches!(significant[i], Token::Word(w) if w.keyword == Keyword::REFERENCES);
        i += 1;
        if !is_references {
            continue;
        }

        let mut parts: Vec<String> = Vec::new();
        while let Some(Token::Word(word)) = significant.get(i) {
            parts.push(word.value.clone());
            i += 1;
            if matches!(significant.get(i), Some(Token::Period)) {
                i += 1;
            } else {
                break;
            }
        }
        if !parts.is_empty() {
            references.push(parts.join("."));
        }
    }

    Ok(references)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_column_reference() {
        let refs = extract_references("NOT NULL REFERENCES users(id)").unwrap();
        assert_eq!(refs, vec!["users"]);
    }

    #[test]
    fn test_table_constraint_reference() {
        let refs =
            extract_references("FOREIGN KEY (property_id) REFERENCES ops.properties (id)").unwrap();
        assert_eq!(refs, vec!["ops.properties"]);
    }

    #[test]
    fn test_quoted_reference() {
        let refs = extract_references(r#"REFERENCES "Users"("id")"#).unwrap();
        assert_eq!(refs, vec!["Users"]);
    }

    #[test]
    fn test_keyword_in_string_literal_is_ignored() {
        let refs = extract_references("DEFAULT 'REFERENCES users'").unwrap();
        assert!(refs.is_empty());
    }

    #[test]
    fn test_multiple_references() {
        let refs = extract_references(
            "FOREIGN KEY (a) REFERENCES users (id), FOREIGN KEY (b) REFERENCES properties (id)",
        )
        .unwrap();
        assert_eq!(refs, vec!["users", "properties"]);
    }

    #[test]
    fn test_no_references() {
        assert!(extract_references("PRIMARY KEY").unwrap().is_empty());
    }
}
