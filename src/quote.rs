//! Identifier quoting
//!
//! Table names cannot be bound as parameters, so the describe probe
//! interpolates them. Everything interpolated goes through an
//! [`IdentifierQuoter`] first.

/// Turns a raw identifier into a form that is safe to splice into SQL text
pub trait IdentifierQuoter {
    fn quote_name(&self, name: &str) -> String;
}

/// Oracle quoting rules
///
/// Names already wrapped in double quotes are returned unchanged. Anything
/// else is upper-cased to match catalog case folding, embedded double quotes
/// are doubled, and the result is wrapped in double quotes.
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleQuoter;

impl IdentifierQuoter for OracleQuoter {
    fn quote_name(&self, name: &str) -> String {
        if is_quoted(name) {
            return name.to_string();
        }

        let escaped = name.to_uppercase().replace('"', "\"\"");
        format!("\"{}\"", escaped)
    }
}

/// A name counts as quoted only if the inner text has no lone `"`
fn is_quoted(name: &str) -> bool {
    if name.len() < 2 || !name.starts_with('"') || !name.ends_with('"') {
        return false;
    }

    let inner = &name[1..name.len() - 1];
    !inner.replace("\"\"", "").contains('"')
}
