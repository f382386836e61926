use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::types::StructDecl;
use crate::error::AppResult;

/// A renderable source file: one struct, its diagnostic comments, and an
/// optional wrapping module.
pub struct CompileUnit {
    pub namespace: Option<String>,
    pub header: String,
    pub decl: StructDecl,
}

impl CompileUnit {
    pub fn new(namespace: Option<String>, header: impl Into<String>, decl: StructDecl) -> Self {
        Self {
            namespace,
            header: header.into(),
            decl,
        }
    }

    /// Renders the unit as Rust source text.
    pub fn render(&self) -> String {
        let mut body = String::new();
        for comment in &self.decl.comments {
            let _ = writeln!(body, "// {comment}");
        }
        // Column names are carried over verbatim, casing included.
        let _ = writeln!(body, "#[allow(non_snake_case)]");
        let _ = writeln!(body, "#[derive(Debug, Clone, PartialEq)]");
        let _ = writeln!(body, "pub struct {} {{", self.decl.name);
        for field in &self.decl.fields {
            let mut line = format!(
                "    pub {}: {}, // index: {}",
                field.name,
                field.ty.render(),
                field.source_index
            );
            if !field.warning_refs.is_empty() {
                let refs: Vec<String> = field.warning_refs.iter().map(u32::to_string).collect();
                let _ = write!(line, " - see warning(s) {}", refs.join(", "));
            }
            let _ = writeln!(body, "{line}");
        }
        let _ = writeln!(body, "}}");

        let mut out = String::new();
        let _ = writeln!(out, "// {}", self.header);
        out.push('\n');
        match &self.namespace {
            Some(ns) => {
                let _ = writeln!(out, "pub mod {ns} {{");
                for line in body.lines() {
                    if line.is_empty() {
                        out.push('\n');
                    } else {
                        let _ = writeln!(out, "    {line}");
                    }
                }
                let _ = writeln!(out, "}}");
            }
            None => out.push_str(&body),
        }
        out
    }

    /// Writes `{struct name}.rs` into `out_dir` and returns the path.
    pub fn write_to(&self, out_dir: &Path) -> AppResult<PathBuf> {
        let path = out_dir.join(format!("{}.rs", self.decl.name));
        fs::write(&path, self.render())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FieldDecl, TypeRef};

    fn sample_decl() -> StructDecl {
        let mut decl = StructDecl::new("Person");
        decl.comments
            .push("WARNING 1: duplicate column name ignored: Id (type: String, index: 2).".into());
        decl.fields.push(FieldDecl {
            name: "Id".into(),
            ty: TypeRef::simple("i64"),
            source_index: 0,
            warning_refs: Vec::new(),
        });
        decl.fields.push(FieldDecl {
            name: "r#name".into(),
            ty: TypeRef::simple("String").optional(),
            source_index: 1,
            warning_refs: vec![1],
        });
        decl
    }

    #[test]
    fn renders_struct_with_comments_and_indices() {
        let unit = CompileUnit::new(None, "Generated struct from query: SELECT 1", sample_decl());
        let src = unit.render();

        assert!(src.starts_with("// Generated struct from query: SELECT 1\n"));
        assert!(src.contains("// WARNING 1: duplicate column name ignored"));
        assert!(src.contains("#[allow(non_snake_case)]"));
        assert!(src.contains("pub struct Person {"));
        assert!(src.contains("    pub Id: i64, // index: 0\n"));
        assert!(src.contains("    pub r#name: Option<String>, // index: 1 - see warning(s) 1\n"));
    }

    #[test]
    fn namespace_nests_the_struct() {
        let unit = CompileUnit::new(Some("dto".into()), "h", sample_decl());
        let src = unit.render();
        assert!(src.contains("pub mod dto {\n"));
        assert!(src.contains("    pub struct Person {"));
        assert!(src.ends_with("}\n"));
    }

    #[test]
    fn writes_file_named_after_struct() {
        let dir = tempfile::tempdir().unwrap();
        let unit = CompileUnit::new(None, "h", sample_decl());
        let path = unit.write_to(dir.path()).unwrap();
        assert!(path.ends_with("Person.rs"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, unit.render());
    }
}
