//! Name resolution diagnostics

use base::span::Span;

use crate::{
    psi::{visit, Psi, PsiElement, PsiVisitor},
    util::diag,
};

/// A name with no visible declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub name: String,
    pub span: Span,
}

impl diag::Diagnostic for UnresolvedReference {
    fn code(&self) -> &'static str {
        "W0100"
    }

    fn severity(&self) -> diag::Severity {
        diag::Severity::Warning
    }

    fn msg(&self) -> String {
        format!("unresolved reference `{}`", self.name)
    }

    fn reason(&self) -> String {
        "not found in this scope".to_string()
    }

    fn span(&self) -> Span {
        self.span
    }
}

/// Collects references under `root` that resolve to nothing. Names in `builtins` are skipped.
pub fn unresolved_references(root: &dyn PsiElement, builtins: &[&str]) -> Vec<UnresolvedReference> {
    struct Collector<'a> {
        builtins: &'a [&'a str],
        diags: Vec<UnresolvedReference>,
    }

    impl<'a> PsiVisitor for Collector<'a> {
        fn visit_element(&mut self, element: &Psi) {
            let rf = match element.reference() {
                Some(rf) => rf,
                None => return,
            };

            let name = rf.canonical_text();
            if self.builtins.contains(&name.as_str()) || rf.resolve().is_some() {
                return;
            }

            self.diags.push(UnresolvedReference {
                name,
                span: Span::from_rowan_range(rf.absolute_range()),
            });
        }
    }

    let mut collector = Collector {
        builtins,
        diags: vec![],
    };
    visit::walk(root, &mut collector);
    collector.diags
}
