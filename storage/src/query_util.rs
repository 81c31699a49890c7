//! Helpers for building dynamic SQL with `sqlx::QueryBuilder`.

use sqlx::{QueryBuilder, Sqlite};

/// Ids bound per `IN (...)` list. SQLite caps bound parameters per statement (32766 on
/// current builds, 999 on old ones), so id lists are sent in chunks of this size.
pub(crate) const ID_BATCH_SIZE: usize = 500;

/// Appends `(?, ?, ...)` with one bind per id. Callers must not pass an empty slice or
/// more than [`ID_BATCH_SIZE`] ids.
pub(crate) fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[String]) {
    builder.push("(");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(")");
}
