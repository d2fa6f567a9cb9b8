//! Generated-output verification.
//!
//! Parses a generated module as JSX and checks its import bindings: each is
//! declared once, and every one (other than `React`, which the JSX runtime
//! needs implicitly) is referenced somewhere in the program.

use oxc_allocator::Allocator;
use oxc_ast::ast::{IdentifierReference, ImportDeclarationSpecifier, Statement};
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, TranspileError};

const IMPLICIT_BINDINGS: &[&str] = &["React"];

struct ReferenceCollector {
    names: HashSet<String>,
}

impl<'a> Visit<'a> for ReferenceCollector {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        self.names.insert(ident.name.to_string());
    }
}

/// Parse `code` and fail with `InvalidOutput` on syntax errors, repeated or
/// unused imports.
pub fn verify_component(path: &Path, code: &str) -> Result<()> {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(true).with_jsx(true);
    let ret = Parser::new(&allocator, code, source_type).parse();

    if !ret.errors.is_empty() {
        return Err(TranspileError::InvalidOutput {
            path: path.to_path_buf(),
            messages: ret.errors.iter().map(|e| e.to_string()).collect(),
        });
    }

    let mut imported = Vec::new();
    for stmt in &ret.program.body {
        if let Statement::ImportDeclaration(import_decl) = stmt {
            if let Some(specifiers) = &import_decl.specifiers {
                for specifier in specifiers {
                    let local = match specifier {
                        ImportDeclarationSpecifier::ImportSpecifier(s) => &s.local,
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => &s.local,
                    };
                    imported.push(local.name.to_string());
                }
            }
        }
    }

    let mut collector = ReferenceCollector {
        names: HashSet::new(),
    };
    collector.visit_program(&ret.program);

    let mut seen = HashSet::new();
    let mut messages: Vec<String> = imported
        .iter()
        .filter(|name| !seen.insert(name.as_str()))
        .map(|name| format!("import '{}' is declared more than once", name))
        .collect();
    messages.extend(
        imported
            .iter()
            .filter(|name| !IMPLICIT_BINDINGS.contains(&name.as_str()))
            .filter(|name| !collector.names.contains(*name))
            .map(|name| format!("import '{}' is never referenced", name)),
    );

    if messages.is_empty() {
        Ok(())
    } else {
        Err(TranspileError::InvalidOutput {
            path: path.to_path_buf(),
            messages,
        })
    }
}
