//! Comparison Pipeline Core
//!
//! Aligns two loaded source trees positionally, matches types and methods by
//! simple name, and extracts tracked-variable assignment changes from method
//! pairs that carry the action marker on both sides.

use crate::domain::ast::{ChangeRecord, FileUnit, MethodDecl, SourceTree, TypeDecl};

/// Pair the files of two trees positionally: the i-th unit of `before` with
/// the i-th unit of `after`. Trees of different lengths are truncated to the
/// shorter one; that is not an error. This is correct only when both trees
/// enumerate files in identical relative order and count.
pub fn align<'a>(
    before: &'a SourceTree,
    after: &'a SourceTree,
) -> impl Iterator<Item = (&'a FileUnit, &'a FileUnit)> {
    before.units.iter().zip(after.units.iter())
}

/// First type in `unit` with the given simple name. First occurrence wins;
/// later same-named declarations are never considered.
fn find_type<'a>(unit: &'a FileUnit, name: &str) -> Option<&'a TypeDecl> {
    unit.types.iter().find(|t| t.name == name)
}

/// First method in `decl` with the given simple name. Same collision policy
/// as `find_type`; there is no arity or signature disambiguation.
fn find_method<'a>(decl: &'a TypeDecl, name: &str) -> Option<&'a MethodDecl> {
    decl.methods.iter().find(|m| m.name == name)
}

/// Match the types of an aligned file pair by simple name.
/// Types without a counterpart on the other side are dropped silently.
pub fn match_types<'a>(
    before: &'a FileUnit,
    after: &'a FileUnit,
) -> Vec<(&'a TypeDecl, &'a TypeDecl)> {
    before
        .types
        .iter()
        .filter_map(|a| find_type(after, &a.name).map(|b| (a, b)))
        .collect()
}

/// Match the methods of a matched type pair by simple name.
/// Unmatched methods are dropped silently.
pub fn match_methods<'a>(
    before: &'a TypeDecl,
    after: &'a TypeDecl,
) -> Vec<(&'a MethodDecl, &'a MethodDecl)> {
    before
        .methods
        .iter()
        .filter_map(|a| find_method(after, &a.name).map(|b| (a, b)))
        .collect()
}

/// Action filter plus variable-assignment extractor.
///
/// Returns `None` unless both sides carry the action marker. Otherwise scans
/// the before-side body only: for every tracked binding, in declaration
/// order, every assignment whose target text equals the binding's name
/// exactly is recorded. String equality means a qualified target such as
/// `self.x` never matches a tracked variable named `x`.
///
/// A qualifying pair always yields a record, even when no tracked assignment
/// was found; consumers rely on one record per action method.
pub fn extract_change(before: &MethodDecl, after: &MethodDecl) -> Option<ChangeRecord> {
    if !(before.is_action && after.is_action) {
        return None;
    }

    let mut changes = Vec::new();
    for var in before.locals.iter().filter(|v| v.is_tracked) {
        for assign in &before.assignments {
            if assign.target == var.name {
                changes.push(assign.text.clone());
            }
        }
    }

    Some(ChangeRecord {
        method: before.name.clone(),
        changes,
    })
}

/// Run the whole pipeline over two loaded trees. Records come out in file
/// order, then type order within a file, then method order within a type.
pub fn compare_trees(before: &SourceTree, after: &SourceTree) -> Vec<ChangeRecord> {
    let mut records = Vec::new();
    for (unit_a, unit_b) in align(before, after) {
        for (type_a, type_b) in match_types(unit_a, unit_b) {
            for (method_a, method_b) in match_methods(type_a, type_b) {
                if let Some(record) = extract_change(method_a, method_b) {
                    records.push(record);
                }
            }
        }
    }
    records
}
