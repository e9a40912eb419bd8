//! Typed-struct backend (Go).
//!
//! Builds a [`GoFile`] AST from the lowering and emits it. Maps, lists and
//! streams are native in Go, so the only synthesized types rendered are the
//! request and response structs of fields with arguments.

pub mod ast;
pub mod emit;

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use tracing::debug;
use typemux_common::naming::{to_pascal_case, unqualified_name};
use typemux_common::{Field, FieldType, Format, Primitive, Schema, TypeDef, TypeKind};

use self::ast::{
    GoConst, GoDecl, GoEnum, GoField, GoFile, GoInterface, GoMarker, GoMethod, GoParam, GoStruct,
    GoType,
};
use self::emit::Emit;
use super::{Backend, Rendered, doc_lines, visible_fields};
use crate::config::GoConfig;
use crate::error::GenerateError;
use crate::lower::{DeclKind, DeclRef, ElementId, Lowering};
use crate::rules::Numbering;

const FORMAT: Format = Format::Go;
const DEFAULT_PACKAGE: &str = "api";
const TIME_IMPORT: &str = "time";

/// Go keywords, which cannot be used as package names.
pub static GO_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "chan",
        "const",
        "continue",
        "default",
        "defer",
        "else",
        "fallthrough",
        "for",
        "func",
        "go",
        "goto",
        "if",
        "import",
        "interface",
        "map",
        "package",
        "range",
        "return",
        "select",
        "struct",
        "switch",
        "type",
        "var",
    ]
    .into_iter()
    .collect()
});

/// Renders the schema as Go.
#[derive(Debug, Clone)]
pub struct GoBackend {
    config: GoConfig,
}

impl GoBackend {
    /// A backend using the `go` config section.
    pub const fn new(config: GoConfig) -> Self {
        Self { config }
    }
}

impl Backend for GoBackend {
    fn format(&self) -> Format {
        FORMAT
    }

    fn render(&self, lowering: &Lowering<'_>) -> Result<Rendered, GenerateError> {
        let mut builder = Builder {
            lowering,
            config: &self.config,
            imports: BTreeSet::new(),
        };
        let file = builder.file()?;
        debug!(package = %file.package, decls = file.decls.len(), "built go file");
        Ok(Rendered::single(file.emit()))
    }
}

/// Go package name: config, then the `package = "x"` annotation, then the
/// last namespace segment.
pub fn package_name(config: &GoConfig, schema: &Schema) -> String {
    let raw = config
        .package_name
        .clone()
        .or_else(|| {
            schema
                .annotations
                .options(FORMAT)
                .iter()
                .find_map(|option| package_option(option))
        })
        .or_else(|| schema.default_namespace().map(|ns| unqualified_name(ns).to_string()));
    sanitize_package(raw.as_deref().unwrap_or(DEFAULT_PACKAGE))
}

fn package_option(option: &str) -> Option<String> {
    let (key, value) = option.split_once('=')?;
    (key.trim() == "package").then(|| value.trim().trim_matches('"').to_string())
}

fn sanitize_package(raw: &str) -> String {
    let name: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    if name.is_empty() {
        DEFAULT_PACKAGE.to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("pkg{name}")
    } else if GO_KEYWORDS.contains(name.as_str()) {
        format!("{name}pkg")
    } else {
        name
    }
}

/// `ACTIVE` -> `Active`, `IN_PROGRESS` -> `InProgress`, `inStock` -> `InStock`.
fn const_suffix(value: &str) -> String {
    if value.chars().any(char::is_lowercase) {
        to_pascal_case(value)
    } else {
        to_pascal_case(&value.to_lowercase())
    }
}

const fn decl(kind: DeclKind, index: usize) -> DeclRef {
    DeclRef { kind, index }
}

fn doc(text: Option<&str>) -> Vec<String> {
    doc_lines(text).into_iter().map(str::to_string).collect()
}

struct Builder<'a, 's> {
    lowering: &'a Lowering<'s>,
    config: &'a GoConfig,
    imports: BTreeSet<&'static str>,
}

impl Builder<'_, '_> {
    fn file(&mut self) -> Result<GoFile, GenerateError> {
        let schema = self.lowering.schema();
        let mut decls = Vec::new();

        for index in 0..schema.enums.len() {
            decls.push(GoDecl::Enum(self.enumeration(index)?));
        }
        for (index, ty) in schema.types.iter().enumerate() {
            let name = self.lowering.decl_name(decl(DeclKind::Type, index), FORMAT);
            decls.push(GoDecl::Struct(self.structure(ty, name, Some(index))?));
        }
        for args in self.lowering.argument_types() {
            decls.push(GoDecl::Struct(self.structure(&args.request, &args.request.name, None)?));
            if let Some(response) = &args.response {
                decls.push(GoDecl::Struct(self.structure(response, &response.name, None)?));
            }
        }
        for index in 0..schema.unions.len() {
            decls.extend(self.union(index)?);
        }
        for index in 0..schema.services.len() {
            decls.push(GoDecl::Interface(self.service(index)?));
        }

        Ok(GoFile {
            package: package_name(self.config, schema),
            imports: self.imports.iter().map(|i| (*i).to_string()).collect(),
            decls,
        })
    }

    fn enumeration(&self, index: usize) -> Result<GoEnum, GenerateError> {
        let e = &self.lowering.schema().enums[index];
        let r = decl(DeclKind::Enum, index);
        let name = self.lowering.decl_name(r, FORMAT);
        let iota = e.values.iter().all(|v| v.number.is_none());

        let mut numbering = Numbering::new(&e.name, 0);
        let mut consts = Vec::with_capacity(e.values.len());
        for (vi, value) in e.values.iter().enumerate() {
            let number = numbering.assign(&value.name, value.number)?;
            let overrides = self.lowering.overrides(ElementId::EnumValue(index, vi));
            consts.push(GoConst {
                name: overrides
                    .name(FORMAT)
                    .map_or_else(|| format!("{name}{}", const_suffix(&value.name)), str::to_string),
                value: (!iota).then_some(number),
                doc: doc(value.doc.for_format(FORMAT)),
            });
        }

        Ok(GoEnum {
            name: name.to_string(),
            doc: doc(e.doc.for_format(FORMAT)),
            directives: self.lowering.overrides(r.element()).options(FORMAT).to_vec(),
            iota,
            consts,
        })
    }

    /// A declared Type (`index` set) or a synthesized one.
    fn structure(
        &mut self,
        ty: &TypeDef,
        name: &str,
        index: Option<usize>,
    ) -> Result<GoStruct, GenerateError> {
        let ns = self.lowering.schema().namespace_of(ty);
        let mut fields = Vec::with_capacity(ty.fields.len());
        for (fi, field) in visible_fields(&ty.name, &ty.fields, FORMAT)? {
            let path = format!("{}.{}", ty.name, field.name);
            let overrides = index.map(|ti| self.lowering.overrides(ElementId::Field(ti, fi)));
            let go_name = overrides
                .and_then(|o| o.name(FORMAT))
                .map_or_else(|| to_pascal_case(&field.name), str::to_string);
            let extra_tags = overrides.map(|o| o.options(FORMAT)).unwrap_or_default();
            fields.push(self.field(field, go_name, extra_tags, ns, &path)?);
        }

        Ok(GoStruct {
            name: name.to_string(),
            doc: doc(ty.doc.for_format(FORMAT)),
            directives: index
                .map(|ti| self.lowering.overrides(ElementId::Type(ti)).options(FORMAT).to_vec())
                .unwrap_or_default(),
            fields,
        })
    }

    fn field(
        &mut self,
        field: &Field,
        name: String,
        extra_tags: &[String],
        ns: Option<&str>,
        path: &str,
    ) -> Result<GoField, GenerateError> {
        let mut ty = self.go_type(&field.ty, ns, path)?;
        let optional = field.ty.optional;
        if optional && !ty.is_nilable() {
            ty = ty.pointer();
        }

        let mut tags = Vec::new();
        if self.config.json_tags {
            let omit = if optional || (ty.is_nilable() && !field.is_non_null()) {
                ",omitempty"
            } else {
                ""
            };
            tags.push(format!("json:\"{}{omit}\"", field.name));
        }
        tags.extend(extra_tags.iter().cloned());

        let mut doc = doc(field.doc.for_format(FORMAT));
        if let Some(dep) = &field.deprecated {
            if !doc.is_empty() {
                doc.push(String::new());
            }
            doc.push(format!("Deprecated: {}", dep.reason_or_default()));
        }

        Ok(GoField {
            name,
            ty,
            tag: (!tags.is_empty()).then(|| tags.join(" ")),
            doc,
        })
    }

    fn go_type(&mut self, ty: &FieldType, ns: Option<&str>, path: &str) -> Result<GoType, GenerateError> {
        Ok(match &ty.kind {
            TypeKind::Primitive { name } => self.primitive(*name),
            TypeKind::Reference { name } => {
                let r = self.lowering.resolve(name, ns, path)?;
                GoType::named(self.lowering.decl_name(r, FORMAT))
            }
            TypeKind::Array { items } => self.go_type(items, ns, path)?.slice(),
            TypeKind::Map { key, value } => GoType::Map {
                key: Box::new(self.go_type(key, ns, path)?),
                value: Box::new(self.go_type(value, ns, path)?),
            },
        })
    }

    fn primitive(&mut self, p: Primitive) -> GoType {
        match p {
            Primitive::Timestamp => {
                self.imports.insert(TIME_IMPORT);
                GoType::named("time.Time")
            }
            Primitive::Bytes => GoType::named("byte").slice(),
            other => GoType::named(other.as_str()),
        }
    }

    /// Sealed interface, one wrapper struct per option, and the marker methods.
    fn union(&self, index: usize) -> Result<Vec<GoDecl>, GenerateError> {
        let schema = self.lowering.schema();
        let union = &schema.unions[index];
        let ns = schema.namespace_of(union);
        let r = decl(DeclKind::Union, index);
        let name = self.lowering.decl_name(r, FORMAT);
        let marker = format!("is{name}");

        let mut decls = vec![GoDecl::Interface(GoInterface {
            name: name.to_string(),
            doc: doc(union.doc.for_format(FORMAT)),
            directives: self.lowering.overrides(r.element()).options(FORMAT).to_vec(),
            methods: vec![GoMethod {
                name: marker.clone(),
                params: vec![],
                results: vec![],
                doc: vec![],
            }],
        })];

        for option in &union.options {
            let target = self
                .lowering
                .resolve(option, ns, &format!("{}.{option}", union.name))?;
            let option_name = self.lowering.decl_name(target, FORMAT);
            let wrapper = format!("{name}{option_name}");
            decls.push(GoDecl::Struct(GoStruct {
                name: wrapper.clone(),
                doc: vec![],
                directives: vec![],
                fields: vec![GoField {
                    name: "Value".to_string(),
                    ty: GoType::named(option_name).pointer(),
                    tag: self.config.json_tags.then(|| "json:\"value\"".to_string()),
                    doc: vec![],
                }],
            }));
            decls.push(GoDecl::Marker(GoMarker {
                receiver: wrapper,
                method: marker.clone(),
            }));
        }
        Ok(decls)
    }

    fn service(&self, index: usize) -> Result<GoInterface, GenerateError> {
        let schema = self.lowering.schema();
        let service = &schema.services[index];
        let ns = schema.namespace_of(service);
        let r = decl(DeclKind::Service, index);

        let mut methods = Vec::with_capacity(service.methods.len());
        for (mi, method) in service.methods.iter().enumerate() {
            let path = format!("{}.{}", service.name, method.name);
            let input = self.lowering.resolve(&method.input, ns, &path)?;
            let output = self.lowering.resolve(&method.output, ns, &path)?;
            let input = GoType::named(self.lowering.decl_name(input, FORMAT)).pointer();
            let output = GoType::named(self.lowering.decl_name(output, FORMAT)).pointer();
            let error = GoType::named("error");

            let mut params = vec![GoParam {
                name: "input".to_string(),
                ty: if method.input_stream { input.chan() } else { input },
            }];
            let results = if method.output_stream {
                params.push(GoParam {
                    name: "stream".to_string(),
                    ty: output.chan(),
                });
                vec![error]
            } else {
                vec![output, error]
            };

            let overrides = self.lowering.overrides(ElementId::Method(index, mi));
            methods.push(GoMethod {
                name: overrides.name(FORMAT).unwrap_or(&method.name).to_string(),
                params,
                results,
                doc: doc(method.doc.for_format(FORMAT)),
            });
        }

        Ok(GoInterface {
            name: self.lowering.decl_name(r, FORMAT).to_string(),
            doc: doc(service.doc.for_format(FORMAT)),
            directives: self.lowering.overrides(r.element()).options(FORMAT).to_vec(),
            methods,
        })
    }
}
