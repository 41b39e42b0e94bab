//! # Repository Module
//!
//! SQLite repository implementations for the mini-market POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  store.list_active_products(Some("milk"))                      │
//! │       ▼                                                                 │
//! │  impl Store for Database (store.rs)                                    │
//! │       │                                                                 │
//! │       │  db.products().list_active(Some("milk"))                       │
//! │       ▼                                                                 │
//! │  ProductRepository / StudentRepository / SaleRepository                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product insert, lookup, search, stock
//! - [`StudentRepository`](student::StudentRepository) - Student insert and search
//! - [`SaleRepository`](sale::SaleRepository) - Transactional sale commit and history

pub mod product;
pub mod sale;
pub mod student;

/// Builds a `LIKE` pattern that matches `query` as a literal substring of
/// a folded column.
///
/// The query is case folded with [`fold_case`]; `%`, `_` and the escape
/// character itself are escaped with `\`, so the SQL must say
/// `<column>_folded LIKE ?n ESCAPE '\'`.
///
/// ## Example
/// ```text
/// "Milk"  → "%milk%"
/// "50%"   → "%50\%%"
/// "a_b"   → "%a\_b%"
/// ```
pub(crate) fn like_pattern(query: &str) -> String {
    let query = fold_case(query);
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Unicode lowercase form used for every case-insensitive comparison.
///
/// SQLite stores it in the `*_folded` columns; the memory store applies it
/// on the fly, so both stores match the same rows for the same query.
pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{fold_case, like_pattern};

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("milk"), "%milk%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }

    #[test]
    fn test_fold_case_is_unicode_aware() {
        assert_eq!(fold_case("ÁGUA Mineral"), "água mineral");
        assert_eq!(like_pattern("ÁGUA"), "%água%");
    }
}
