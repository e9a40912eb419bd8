//! Go source emission via the Emit trait.
//!
//! Output follows gofmt layout: tab indentation, aligned struct columns,
//! one blank line between top-level declarations.

use super::ast::{
    GoConst, GoDecl, GoEnum, GoField, GoFile, GoInterface, GoMarker, GoMethod, GoParam, GoStruct,
    GoType,
};

/// First line of every generated file.
pub const HEADER: &str = "// Code generated by typemux. DO NOT EDIT.";

/// Trait for emitting Go code from AST nodes.
pub trait Emit {
    /// Go source for the node.
    fn emit(&self) -> String;
}

impl Emit for GoType {
    fn emit(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Pointer(inner) => format!("*{}", inner.emit()),
            Self::Slice(inner) => format!("[]{}", inner.emit()),
            Self::Map { key, value } => format!("map[{}]{}", key.emit(), value.emit()),
            Self::Chan(inner) => format!("chan {}", inner.emit()),
        }
    }
}

fn comment_lines(doc: &[String], indent: &str) -> String {
    doc.iter()
        .map(|line| {
            if line.is_empty() {
                format!("{indent}//\n")
            } else {
                format!("{indent}// {line}\n")
            }
        })
        .collect()
}

fn preamble(doc: &[String], directives: &[String]) -> String {
    let mut out = comment_lines(doc, "");
    for directive in directives {
        out.push_str(directive);
        out.push('\n');
    }
    out
}

/// Column widths of a struct body: names, and types of tagged fields.
fn columns(fields: &[GoField]) -> (usize, usize) {
    let name = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let ty = fields
        .iter()
        .filter(|f| f.tag.is_some())
        .map(|f| f.ty.emit().len())
        .max()
        .unwrap_or(0);
    (name, ty)
}

impl Emit for GoStruct {
    fn emit(&self) -> String {
        let mut out = preamble(&self.doc, &self.directives);
        if self.fields.is_empty() {
            out.push_str(&format!("type {} struct{{}}", self.name));
            return out;
        }
        out.push_str(&format!("type {} struct {{\n", self.name));
        let (name_width, type_width) = columns(&self.fields);
        for field in &self.fields {
            out.push_str(&comment_lines(&field.doc, "\t"));
            let ty = field.ty.emit();
            match &field.tag {
                Some(tag) => out.push_str(&format!(
                    "\t{:name_width$} {ty:type_width$} `{tag}`\n",
                    field.name
                )),
                None => out.push_str(&format!("\t{:name_width$} {ty}\n", field.name)),
            }
        }
        out.push('}');
        out
    }
}

impl Emit for GoConst {
    fn emit(&self) -> String {
        comment_lines(&self.doc, "\t")
    }
}

impl Emit for GoEnum {
    fn emit(&self) -> String {
        let mut out = preamble(&self.doc, &self.directives);
        out.push_str(&format!("type {} int", self.name));
        if self.consts.is_empty() {
            return out;
        }
        out.push_str("\n\nconst (\n");
        let width = self.consts.iter().map(|c| c.name.len()).max().unwrap_or(0);
        for (i, constant) in self.consts.iter().enumerate() {
            out.push_str(&constant.emit());
            if self.iota {
                if i == 0 {
                    out.push_str(&format!("\t{} {} = iota\n", constant.name, self.name));
                } else {
                    out.push_str(&format!("\t{}\n", constant.name));
                }
            } else {
                out.push_str(&format!(
                    "\t{:width$} {} = {}\n",
                    constant.name,
                    self.name,
                    constant.value.unwrap_or_default()
                ));
            }
        }
        out.push(')');
        out
    }
}

impl Emit for GoParam {
    fn emit(&self) -> String {
        format!("{} {}", self.name, self.ty.emit())
    }
}

impl Emit for GoMethod {
    fn emit(&self) -> String {
        let params = self
            .params
            .iter()
            .map(Emit::emit)
            .collect::<Vec<_>>()
            .join(", ");
        let results = match self.results.as_slice() {
            [] => String::new(),
            [single] => format!(" {}", single.emit()),
            many => format!(
                " ({})",
                many.iter().map(Emit::emit).collect::<Vec<_>>().join(", ")
            ),
        };
        format!("{}({params}){results}", self.name)
    }
}

impl Emit for GoInterface {
    fn emit(&self) -> String {
        let mut out = preamble(&self.doc, &self.directives);
        out.push_str(&format!("type {} interface {{\n", self.name));
        for method in &self.methods {
            out.push_str(&comment_lines(&method.doc, "\t"));
            out.push_str(&format!("\t{}\n", method.emit()));
        }
        out.push('}');
        out
    }
}

impl Emit for GoMarker {
    fn emit(&self) -> String {
        format!("func ({}) {}() {{}}", self.receiver, self.method)
    }
}

impl Emit for GoDecl {
    fn emit(&self) -> String {
        match self {
            Self::Struct(s) => s.emit(),
            Self::Enum(e) => e.emit(),
            Self::Interface(i) => i.emit(),
            Self::Marker(m) => m.emit(),
        }
    }
}

impl Emit for GoFile {
    fn emit(&self) -> String {
        let mut out = format!("{HEADER}\n\npackage {}\n", self.package);
        if !self.imports.is_empty() {
            out.push_str("\nimport (\n");
            for import in &self.imports {
                out.push_str(&format!("\t\"{import}\"\n"));
            }
            out.push_str(")\n");
        }
        for decl in &self.decls {
            out.push('\n');
            out.push_str(&decl.emit());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_type_expressions() {
        let ty = GoType::Map {
            key: Box::new(GoType::named("string")),
            value: Box::new(GoType::named("User").pointer().slice()),
        };
        assert_eq!(ty.emit(), "map[string][]*User");
        assert_eq!(GoType::named("Event").pointer().chan().emit(), "chan *Event");
    }

    #[test]
    fn test_struct_columns_align() {
        let s = GoStruct {
            name: "User".to_string(),
            doc: vec!["User account.".to_string()],
            directives: vec![],
            fields: vec![
                GoField {
                    name: "Id".to_string(),
                    ty: GoType::named("string"),
                    tag: Some("json:\"id\"".to_string()),
                    doc: vec![],
                },
                GoField {
                    name: "Nickname".to_string(),
                    ty: GoType::named("string").pointer(),
                    tag: Some("json:\"nickname,omitempty\"".to_string()),
                    doc: vec![],
                },
            ],
        };
        assert_eq!(
            s.emit(),
            "// User account.\ntype User struct {\n\tId       string  `json:\"id\"`\n\tNickname *string `json:\"nickname,omitempty\"`\n}"
        );
    }

    #[test]
    fn test_enum_forms() {
        let consts = |values: [Option<u32>; 2]| {
            vec![
                GoConst {
                    name: "StatusActive".to_string(),
                    value: values[0],
                    doc: vec![],
                },
                GoConst {
                    name: "StatusGone".to_string(),
                    value: values[1],
                    doc: vec![],
                },
            ]
        };
        let iota = GoEnum {
            name: "Status".to_string(),
            doc: vec![],
            directives: vec![],
            iota: true,
            consts: consts([None, None]),
        };
        assert_eq!(
            iota.emit(),
            "type Status int\n\nconst (\n\tStatusActive Status = iota\n\tStatusGone\n)"
        );
        let explicit = GoEnum {
            iota: false,
            consts: consts([Some(1), Some(5)]),
            ..iota
        };
        assert_eq!(
            explicit.emit(),
            "type Status int\n\nconst (\n\tStatusActive Status = 1\n\tStatusGone   Status = 5\n)"
        );
    }
}
