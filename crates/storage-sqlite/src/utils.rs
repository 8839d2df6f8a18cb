//! Helpers for building SQLite queries.

/// SQLite caps statement parameters (SQLITE_MAX_VARIABLE_NUMBER); IN lists are
/// split into chunks of this size, leaving room for the other binds.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits `items` into slices no longer than [`SQLITE_MAX_PARAMS_CHUNK`].
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Escapes `%`, `_` and `\` and wraps the fragment for a `LIKE ... ESCAPE '\'` match.
pub fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
