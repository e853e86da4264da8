// Source-tree data model for actdiff.
// Parsed code is lowered into these shapes before any comparison runs.

use serde::{Deserialize, Serialize};

/// The ordered set of parsed files from one project root.
/// A unit's position in `units` is its identity for alignment purposes;
/// paths are carried for diagnostics only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTree {
    pub units: Vec<FileUnit>,
}

/// One parsed source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUnit {
    pub path: String,
    pub types: Vec<TypeDecl>,
}

/// A named type declaration with its methods and member variables.
/// Same-named declarations within one file (a struct plus its impl blocks,
/// for instance) are merged into a single entry in first-seen order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub methods: Vec<MethodDecl>,
    pub members: Vec<VarDecl>,
}

/// A method lowered to exactly the two queries the differ needs:
/// declared bindings and assignment expressions, both in body order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    /// Whether the method carries the action marker.
    pub is_action: bool,
    pub locals: Vec<VarDecl>,
    pub assignments: Vec<Assignment>,
}

/// A variable declaration: a local binding in a method body or a struct field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    /// Whether the declaration carries the tracked-variable marker.
    pub is_tracked: bool,
}

/// One assignment expression with its exact source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Exact source text of the target, e.g. "state" or "self.state".
    /// Target matching downstream is plain string equality, so a qualified
    /// target never matches a tracked variable's bare name.
    pub target: String,
    /// Exact source text of the whole assignment expression.
    pub text: String,
}

/// One reportable unit: a modified action method and the tracked-variable
/// assignment snippets found in its before-side body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub method: String,
    pub changes: Vec<String>,
}

impl ChangeRecord {
    /// Render the single-line report form. Every snippet is followed by
    /// `"; "`, including the last one; a record with no snippets renders
    /// with an empty changes field.
    pub fn render(&self) -> String {
        let mut line = format!("Action method modified: {}, Changes: ", self.method);
        for change in &self.changes {
            line.push_str(change);
            line.push_str("; ");
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_trailing_separator() {
        let record = ChangeRecord {
            method: "handle".to_string(),
            changes: vec!["x = 1".to_string(), "x = f(y)".to_string()],
        };
        assert_eq!(
            record.render(),
            "Action method modified: handle, Changes: x = 1; x = f(y); "
        );
    }

    #[test]
    fn test_render_empty_changes() {
        let record = ChangeRecord {
            method: "reset".to_string(),
            changes: vec![],
        };
        assert_eq!(record.render(), "Action method modified: reset, Changes: ");
    }
}
