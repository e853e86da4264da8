// Infrastructure implementations for actdiff.

use crate::domain::ast::{Assignment, ChangeRecord, FileUnit, MethodDecl, TypeDecl, VarDecl};
use crate::ports::ReportSink;
use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::visit::Visit;
use syn::{Attribute, ImplItem, Item, Pat, TraitItem, Type};

pub mod project_loader;

/// Attribute name marking a method as an externally visible action.
pub const ACTION_MARKER: &str = "action";
/// Attribute name marking a binding whose mutations are of interest.
pub const VARIABLE_MARKER: &str = "variable";

pub struct SynUnitParser;

impl SynUnitParser {
    /// Parse one file's source into a FileUnit. The syn error is returned
    /// unchanged so the loader owns the skip-on-failure policy.
    pub fn parse_unit(path: &str, src: &str) -> syn::Result<FileUnit> {
        let ast = syn::parse_file(src)?;
        let mut types = Vec::new();
        Self::lower_items(&ast.items, src, &mut types);
        Ok(FileUnit {
            path: path.to_string(),
            types,
        })
    }

    /// Lower top-level items into TypeDecls, recursing into inline modules.
    /// Structs contribute member variables, impl blocks and traits
    /// contribute methods; same-named declarations merge first-seen.
    fn lower_items(items: &[Item], src: &str, types: &mut Vec<TypeDecl>) {
        for item in items {
            match item {
                Item::Struct(s) => {
                    let decl = type_entry(types, s.ident.to_string());
                    for field in &s.fields {
                        if let Some(ident) = &field.ident {
                            decl.members.push(VarDecl {
                                name: ident.to_string(),
                                is_tracked: has_marker(&field.attrs, VARIABLE_MARKER),
                            });
                        }
                    }
                }
                Item::Impl(imp) => {
                    if let Type::Path(tp) = &*imp.self_ty {
                        if let Some(segment) = tp.path.segments.last() {
                            let decl = type_entry(types, segment.ident.to_string());
                            for impl_item in &imp.items {
                                if let ImplItem::Fn(method) = impl_item {
                                    decl.methods.push(Self::lower_method(
                                        method.sig.ident.to_string(),
                                        &method.attrs,
                                        &method.block.stmts,
                                        src,
                                    ));
                                }
                            }
                        }
                    }
                }
                Item::Trait(tr) => {
                    let decl = type_entry(types, tr.ident.to_string());
                    for trait_item in &tr.items {
                        if let TraitItem::Fn(method) = trait_item {
                            // Only default-bodied trait methods have
                            // anything to diff.
                            if let Some(block) = &method.default {
                                decl.methods.push(Self::lower_method(
                                    method.sig.ident.to_string(),
                                    &method.attrs,
                                    &block.stmts,
                                    src,
                                ));
                            }
                        }
                    }
                }
                Item::Mod(module) => {
                    if let Some((_, content)) = &module.content {
                        Self::lower_items(content, src, types);
                    }
                }
                _ => {}
            }
        }
    }

    fn lower_method(
        name: String,
        attrs: &[Attribute],
        stmts: &[syn::Stmt],
        src: &str,
    ) -> MethodDecl {
        let mut collector = BodyCollector {
            src,
            locals: Vec::new(),
            assignments: Vec::new(),
        };
        for stmt in stmts {
            collector.visit_stmt(stmt);
        }
        MethodDecl {
            name,
            is_action: has_marker(attrs, ACTION_MARKER),
            locals: collector.locals,
            assignments: collector.assignments,
        }
    }
}

/// Find or create the TypeDecl entry for `name`, preserving first-seen order.
fn type_entry(types: &mut Vec<TypeDecl>, name: String) -> &mut TypeDecl {
    let pos = match types.iter().position(|t| t.name == name) {
        Some(pos) => pos,
        None => {
            types.push(TypeDecl {
                name,
                methods: Vec::new(),
                members: Vec::new(),
            });
            types.len() - 1
        }
    };
    &mut types[pos]
}

fn has_marker(attrs: &[Attribute], marker: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(marker))
}

/// Slice the exact source text a span covers. Byte offsets come from the
/// proc-macro2 span-locations feature; an out-of-range span yields "".
fn snippet(src: &str, span: Span) -> String {
    src.get(span.byte_range()).unwrap_or_default().to_string()
}

/// Collects every local binding and assignment expression in a method body,
/// in traversal order, including nested blocks and closures.
struct BodyCollector<'a> {
    src: &'a str,
    locals: Vec<VarDecl>,
    assignments: Vec<Assignment>,
}

impl<'ast> Visit<'ast> for BodyCollector<'_> {
    fn visit_local(&mut self, local: &'ast syn::Local) {
        if let Some(name) = binding_name(&local.pat) {
            self.locals.push(VarDecl {
                name,
                is_tracked: has_marker(&local.attrs, VARIABLE_MARKER),
            });
        }
        syn::visit::visit_local(self, local);
    }

    fn visit_expr_assign(&mut self, assign: &'ast syn::ExprAssign) {
        self.assignments.push(Assignment {
            target: snippet(self.src, assign.left.span()),
            text: snippet(self.src, assign.span()),
        });
        syn::visit::visit_expr_assign(self, assign);
    }

    // Compound assignments (`x += 1`) parse as binary expressions with an
    // *Assign operator; they count as assignments to their left side.
    fn visit_expr_binary(&mut self, binary: &'ast syn::ExprBinary) {
        if is_compound_assign(&binary.op) {
            self.assignments.push(Assignment {
                target: snippet(self.src, binary.left.span()),
                text: snippet(self.src, binary.span()),
            });
        }
        syn::visit::visit_expr_binary(self, binary);
    }
}

fn is_compound_assign(op: &syn::BinOp) -> bool {
    use syn::BinOp::*;
    matches!(
        op,
        AddAssign(_)
            | SubAssign(_)
            | MulAssign(_)
            | DivAssign(_)
            | RemAssign(_)
            | BitXorAssign(_)
            | BitAndAssign(_)
            | BitOrAssign(_)
            | ShlAssign(_)
            | ShrAssign(_)
    )
}

/// The simple name a `let` pattern binds, if it binds exactly one.
/// Destructuring patterns are not tracked-variable candidates.
fn binding_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(ident) => Some(ident.ident.to_string()),
        Pat::Type(pt) => binding_name(&pt.pat),
        _ => None,
    }
}

pub struct TextReportWriter;

impl ReportSink for TextReportWriter {
    /// Serialize records one per line, newline-terminated, creating or
    /// truncating the destination.
    fn write(&self, records: &[ChangeRecord], path: &str) -> std::io::Result<()> {
        let mut content = String::new();
        for record in records {
            content.push_str(&record.render());
            content.push('\n');
        }
        std::fs::write(path, content)
    }
}
