/// Type used for columns whose declared type is unknown (expressions,
/// literals). It can represent SQL NULL by itself, so it is never wrapped
/// in `Option`.
pub const DYNAMIC_TYPE: &str = "serde_json::Value";

/// A Rust type reference, possibly parameterized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Wraps the type as `Option<self>`.
    pub fn optional(self) -> Self {
        TypeRef::generic("Option", vec![self])
    }

    /// True when the type can already represent SQL NULL.
    pub fn is_nullable(&self) -> bool {
        self.name == "Option" || self.name == DYNAMIC_TYPE
    }

    /// Renders `Outer<Arg1,Arg2,...>` recursively; bare name when not generic.
    pub fn render(&self) -> String {
        if self.args.is_empty() {
            return self.name.clone();
        }
        let args: Vec<String> = self.args.iter().map(TypeRef::render).collect();
        format!("{}<{}>", self.name, args.join(","))
    }
}

/// One column of a query result, in query position order.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    pub name: String,
    pub ty: TypeRef,
    pub allows_null: bool,
}

/// One generated struct field. `name` already carries the escape prefix
/// when one applies.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeRef,
    pub source_index: usize,
    pub warning_refs: Vec<u32>,
}

/// Abstract description of the generated struct, handed to the serializer.
#[derive(Debug, Clone, Default)]
pub struct StructDecl {
    pub name: String,
    pub comments: Vec<String>,
    pub fields: Vec<FieldDecl>,
}

impl StructDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comments: Vec::new(),
            fields: Vec::new(),
        }
    }
}
