use std::collections::HashSet;

use crate::core::types::{ColumnDescriptor, FieldDecl, StructDecl};
use crate::trace::TraceSink;

/// Maps query columns onto struct fields, downgrading anomalous columns to
/// warnings. Warnings go both to the struct comments and to the injected
/// trace sink.
pub struct Mapper<'a> {
    traces: &'a mut dyn TraceSink,
}

impl<'a> Mapper<'a> {
    pub fn new(traces: &'a mut dyn TraceSink) -> Self {
        Self { traces }
    }

    /// Emits one field per usable column, in column order, and returns the
    /// number of distinct fields produced.
    ///
    /// Policy per column: nullable value types get `Option`-wrapped; empty
    /// and duplicate names are skipped; names that are not plain
    /// identifiers are kept but flagged; names not starting with an
    /// uppercase letter get the `r#` escape prefix. Warnings accumulated
    /// since the last emitted field are referenced from the next one.
    pub fn emit_members(&mut self, columns: &[ColumnDescriptor], target: &mut StructDecl) -> usize {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut warning_number = 0u32;
        let mut pending: Vec<u32> = Vec::new();

        for (i, col) in columns.iter().enumerate() {
            let ty = if col.allows_null && !col.ty.is_nullable() {
                col.ty.clone().optional()
            } else {
                col.ty.clone()
            };

            let Some(first) = col.name.chars().next() else {
                warning_number += 1;
                pending.push(warning_number);
                self.warn(
                    target,
                    format!(
                        "WARNING {warning_number}: column without name at index {i} (type: {}) !",
                        ty.render()
                    ),
                );
                continue;
            };

            if seen.contains(col.name.as_str()) {
                warning_number += 1;
                pending.push(warning_number);
                self.warn(
                    target,
                    format!(
                        "WARNING {warning_number}: duplicate column name ignored: {} (type: {}, index: {i}).",
                        col.name,
                        ty.render()
                    ),
                );
                continue;
            }

            if first.is_ascii_digit() || !col.name.chars().all(is_allowed_name_char) {
                warning_number += 1;
                pending.push(warning_number);
                self.warn(
                    target,
                    format!(
                        "WARNING {warning_number}: invalid column name: {} (type: {}, index: {i}).",
                        col.name,
                        ty.render()
                    ),
                );
                // Warning only: the field is still emitted, escaped below.
            }

            seen.insert(col.name.as_str());
            let name = if first.is_uppercase() {
                col.name.clone()
            } else {
                format!("r#{}", col.name)
            };
            target.fields.push(FieldDecl {
                name,
                ty,
                source_index: i,
                warning_refs: std::mem::take(&mut pending),
            });
        }

        seen.len()
    }

    fn warn(&mut self, target: &mut StructDecl, msg: String) {
        self.traces.write_line(&msg);
        target.comments.push(msg);
    }
}

/// Allowed set after case folding: a-z, 0-9, underscore.
fn is_allowed_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
