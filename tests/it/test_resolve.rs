//! Tests for scope walks and name resolution

use psi::{
    psi::PsiNode,
    resolve::{self, resolve_diag},
    syntax::SyntaxKind,
};

use crate::util;

fn resolved(src: &str, name: &str, nth: usize) -> Option<String> {
    let (_m, _id, file) = util::load(src);
    let place = util::find(&file, name, nth);
    assert_eq!(place.kind(), SyntaxKind::Path, "not a path: {place:?}");
    let rf = place.reference()?;
    rf.resolve().map(|decl| decl.text())
}

#[test]
fn params_from_proc_body() {
    let src = "(proc f (a b) (g a b))";
    // `a` in the body
    assert_eq!(resolved(src, "a", 1).as_deref(), Some("a"));

    let (_m, _id, file) = util::load(src);
    let a = util::find(&file, "a", 1);
    let result = resolve::resolve(&a, "a").unwrap();
    assert_eq!(result.element.kind(), SyntaxKind::Param);
    assert_eq!(result.scope.unwrap().kind(), SyntaxKind::DefProc);
}

#[test]
fn earlier_lets() {
    let src = "(let x 1)\n(f x)";
    assert_eq!(resolved(src, "x", 1).as_deref(), Some("(let x 1)"));

    // not visible in its own value nor before it
    let src = "(f y)\n(let y y)";
    assert_eq!(resolved(src, "y", 0), None);
    assert_eq!(resolved(src, "y", 2), None);
}

#[test]
fn procs_are_hoisted() {
    let src = "(main)\n(proc main () (main))";
    assert_eq!(
        resolved(src, "main", 0).as_deref(),
        Some("(proc main () (main))")
    );
    // recursion
    let (_m, _id, file) = util::load(src);
    let inner = util::find(&file, "main", 2);
    assert_eq!(inner.kind(), SyntaxKind::Path);
    assert_eq!(
        inner.reference().unwrap().resolve().unwrap().kind(),
        SyntaxKind::DefProc
    );
}

#[test]
fn nested_procs_are_hoisted_in_their_body() {
    let src = "(proc outer () (proc inner (n) (inner n)) (inner 1))";

    // recursion from its own body
    assert_eq!(
        resolved(src, "inner", 1).as_deref(),
        Some("(proc inner (n) (inner n))")
    );
    // later sibling form
    assert_eq!(
        resolved(src, "inner", 2).as_deref(),
        Some("(proc inner (n) (inner n))")
    );

    let (_m, _id, file) = util::load(src);
    assert!(resolve_diag::unresolved_references(&file, &[]).is_empty());
}

#[test]
fn shadowing() {
    let src = "(let x 1)\n(proc f (x) (do (let x 2) x))\n(g x)";
    let (_m, _id, file) = util::load(src);

    let paths = util::preorder(&file)
        .into_iter()
        .filter(|e| e.kind() == SyntaxKind::Path && e.text() == "x")
        .collect::<Vec<_>>();
    assert_eq!(paths.len(), 2);

    // innermost `let`
    let inner = paths[0].reference().unwrap().resolve().unwrap();
    assert_eq!(inner.text(), "(let x 2)");

    // top-level `let`
    let outer = paths[1].reference().unwrap().resolve().unwrap();
    assert_eq!(outer.text(), "(let x 1)");
}

#[test]
fn param_shadows_global() {
    let src = "(let x 1)\n(proc f (x) (g x))";
    let (_m, _id, file) = util::load(src);
    let x = util::preorder(&file)
        .into_iter()
        .find(|e| e.kind() == SyntaxKind::Path && e.text() == "x")
        .unwrap();

    let decl = x.reference().unwrap().resolve().unwrap();
    assert_eq!(decl.kind(), SyntaxKind::Param);
    assert!(x.reference().unwrap().is_reference_to(&*decl));
}

#[test]
fn variants_nearest_first() {
    let src = "(let x 1)\n(let y 2)\n(proc f (x z) (g w))\n(proc h ())";
    let (_m, _id, file) = util::load(src);

    let w = util::find(&file, "w", 0);
    let names = w
        .reference()
        .unwrap()
        .variants()
        .iter()
        .filter_map(|d| d.name())
        .collect::<Vec<_>>();

    // `x` is shadowed by the parameter
    assert_eq!(names, ["x", "z", "y", "f", "h"]);
}

#[test]
fn unresolved_diagnostics() {
    let src = "(let x 1)\n(print (f x y))";
    let (_m, _id, file) = util::load(src);

    let diags = resolve_diag::unresolved_references(&file, &["print"]);
    let names = diags.iter().map(|d| d.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["f", "y"]);

    let y = &diags[1];
    assert_eq!(y.span.slice(src), "y");
}

#[test]
fn proc_kind_is_a_decl() {
    assert!(psi::psi::DefProc::can_cast(SyntaxKind::DefProc));
    assert!(!psi::psi::DefProc::can_cast(SyntaxKind::Let));
}
