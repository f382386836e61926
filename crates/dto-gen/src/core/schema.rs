use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::os::raw::c_int;
use std::ptr;

use rusqlite::{ffi, Connection};

use crate::core::types::{ColumnDescriptor, TypeRef, DYNAMIC_TYPE};
use crate::error::{AppError, AppResult};

/// Reads the column schema of a query without fetching any rows. The
/// statement is only prepared; SQLite exposes name, declared type, and
/// origin-column metadata at that point.
pub fn read_query_schema(conn: &Connection, sql: &str) -> AppResult<Vec<ColumnDescriptor>> {
    let stmt = conn.prepare(sql)?;
    let metas: Vec<(String, Option<String>)> = stmt
        .columns()
        .iter()
        .map(|c| (c.name().to_string(), c.decl_type().map(str::to_string)))
        .collect();
    let origins = origin_columns(conn, sql, metas.len())?;

    // PRAGMA table_info is cached per origin table within one probe.
    let mut not_null_cache: HashMap<String, HashMap<String, bool>> = HashMap::new();
    let mut columns = Vec::with_capacity(metas.len());

    for ((name, decl_type), origin) in metas.into_iter().zip(origins) {
        let ty = map_decl_type(decl_type.as_deref());
        let allows_null = match origin {
            Some((table, origin)) => {
                if !not_null_cache.contains_key(&table) {
                    let info = table_not_null(conn, &table)?;
                    not_null_cache.insert(table.clone(), info);
                }
                let not_null = not_null_cache
                    .get(&table)
                    .and_then(|m| m.get(&origin))
                    .copied()
                    .unwrap_or(false);
                !not_null
            }
            // Expressions and literals have no origin; SQLite may return NULL.
            None => true,
        };
        columns.push(ColumnDescriptor {
            name,
            ty,
            allows_null,
        });
    }
    Ok(columns)
}

/// Maps a declared column type to a Rust type by SQLite affinity rules.
/// Columns without a declared type get the dynamic JSON value type.
pub(crate) fn map_decl_type(decl: Option<&str>) -> TypeRef {
    let Some(decl) = decl else {
        return TypeRef::simple(DYNAMIC_TYPE);
    };
    let upper = decl.to_ascii_uppercase();
    if upper.contains("BOOL") {
        TypeRef::simple("bool")
    } else if upper.contains("INT") {
        TypeRef::simple("i64")
    } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
        TypeRef::simple("String")
    } else if upper.contains("BLOB") {
        TypeRef::generic("Vec", vec![TypeRef::simple("u8")])
    } else if upper.contains("REAL")
        || upper.contains("FLOA")
        || upper.contains("DOUB")
        || upper.contains("DEC")
        || upper.contains("NUMERIC")
    {
        TypeRef::simple("f64")
    } else {
        TypeRef::simple(DYNAMIC_TYPE)
    }
}

/// Origin (table, column) per result column, `None` where the column does
/// not map straight back to a table column. rusqlite exposes no statement
/// handle, so the statement is re-prepared through the ffi layer for the
/// metadata calls.
fn origin_columns(
    conn: &Connection,
    sql: &str,
    count: usize,
) -> AppResult<Vec<Option<(String, String)>>> {
    let c_sql = CString::new(sql)
        .map_err(|_| AppError::SqlError("query contains an interior NUL byte".into()))?;

    // SAFETY: the connection handle stays valid for the lifetime of `conn`;
    // the raw statement is prepared and finalized within this call, and the
    // metadata strings are copied out before finalize.
    unsafe {
        let db = conn.handle();
        let mut raw: *mut ffi::sqlite3_stmt = ptr::null_mut();
        let rc = ffi::sqlite3_prepare_v2(db, c_sql.as_ptr(), -1, &mut raw, ptr::null_mut());
        if rc != ffi::SQLITE_OK || raw.is_null() {
            // The query already prepared through rusqlite, so this is
            // unexpected; report rather than guess at origins.
            return Err(AppError::SqlError(format!(
                "failed to re-prepare query for column metadata (code {rc})"
            )));
        }

        let raw_count = ffi::sqlite3_column_count(raw) as usize;
        let mut out = Vec::with_capacity(count);
        for i in 0..count.min(raw_count) {
            let table = ffi::sqlite3_column_table_name(raw, i as c_int);
            let origin = ffi::sqlite3_column_origin_name(raw, i as c_int);
            let pair = if table.is_null() || origin.is_null() {
                None
            } else {
                match (
                    CStr::from_ptr(table).to_str(),
                    CStr::from_ptr(origin).to_str(),
                ) {
                    (Ok(t), Ok(o)) => Some((t.to_string(), o.to_string())),
                    _ => None,
                }
            };
            out.push(pair);
        }
        out.resize(count, None);

        ffi::sqlite3_finalize(raw);
        Ok(out)
    }
}

/// NOT NULL flags per column of a table. Only a single-column INTEGER
/// PRIMARY KEY is a rowid alias (and thus never null); an INTEGER member
/// of a composite key still accepts NULL.
fn table_not_null(conn: &Connection, table: &str) -> AppResult<HashMap<String, bool>> {
    // Table name comes from SQLite itself, but it is interpolated into a
    // pragma, so keep the identifier guard anyway.
    if !is_safe_identifier(table) {
        return Ok(HashMap::new());
    }

    let sql = format!("PRAGMA table_info({table})");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            let name: String = row.get("name")?;
            let decl: Option<String> = row.get("type")?;
            let not_null: bool = row.get("notnull")?;
            let pk: i64 = row.get("pk")?;
            Ok((name, decl, not_null, pk))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let pk_columns = rows.iter().filter(|(_, _, _, pk)| *pk > 0).count();
    let mut map = HashMap::with_capacity(rows.len());
    for (name, decl, not_null, pk) in rows {
        let rowid_alias = pk_columns == 1
            && pk > 0
            && decl
                .map(|d| d.eq_ignore_ascii_case("INTEGER"))
                .unwrap_or(false);
        map.insert(name, not_null || rowid_alias);
    }
    Ok(map)
}

pub(crate) fn is_safe_identifier(s: &str) -> bool {
    // Minimal safe subset: [A-Za-z_][A-Za-z0-9_]*
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
