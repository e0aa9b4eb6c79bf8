//! Tests for structural edits of writable trees

use psi::{
    psi::{Block, Do, ElementFactory, PsiElement, PsiElementExt, PsiError},
    syntax::SyntaxKind,
};

use crate::util;

#[test]
fn add_to_file() {
    let (_m, _id, file) = util::load("(a)");
    let form = ElementFactory::form("(g 1)").unwrap();

    let added = file.add(&*form).unwrap();
    assert_eq!(file.text(), "(a)\n(g 1)");
    assert_eq!(added.text(), "(g 1)");
    assert!(added.is_valid());
    assert_eq!(added.parent().unwrap().kind(), SyntaxKind::ROOT);

    // the source is copied, not moved
    assert!(form.parent().is_none());
    assert_ne!(added, form);
}

#[test]
fn add_before_and_after() {
    let (_m, _id, file) = util::load("(a)\n(b)");
    let b = file.forms()[1].clone();
    let x = ElementFactory::form("(x)").unwrap();

    file.add_before(&*x, Some(&*b)).unwrap();
    assert_eq!(file.text(), "(a)\n(x)\n(b)");

    file.add_after(&*x, None).unwrap();
    assert_eq!(file.text(), "(x)\n(a)\n(x)\n(b)");

    file.add_after(&*x, Some(&*b)).unwrap();
    assert_eq!(file.text(), "(x)\n(a)\n(x)\n(b)\n(x)");

    file.add_before(&*x, None).unwrap();
    assert_eq!(file.text(), "(x)\n(a)\n(x)\n(b)\n(x)\n(x)");
}

#[test]
fn add_to_block() {
    let (_m, _id, file) = util::load("(do (a))");
    let do_ = file.find_child_by_kind::<Do>().unwrap();
    let body = do_.find_child_by_kind::<Block>().unwrap();

    let b = ElementFactory::form("b").unwrap();
    body.add(&*b).unwrap();
    assert_eq!(file.text(), "(do (a) b)");
    assert_eq!(body.forms().len(), 2);
}

#[test]
fn add_range() {
    let (_m, _id, file) = util::load("(a)\n(b)");
    let forms = file.forms();

    let first = file.add_range(&*forms[0], &*forms[1]).unwrap();
    assert_eq!(file.text(), "(a)\n(b)\n(a)\n(b)");
    assert_eq!(first.text(), "(a)");
    assert_ne!(first, forms[0]);
}

#[test]
fn delete_forms() {
    let (_m, _id, file) = util::load("(a)\n(b)\n(c)");
    let forms = file.forms();

    forms[1].check_delete().unwrap();
    forms[1].delete().unwrap();
    assert_eq!(file.text(), "(a)\n(c)");

    // a deleted form is invalid; its old siblings are not
    assert!(!forms[1].is_valid());
    assert!(forms[0].is_valid());
    assert!(forms[2].is_valid());

    forms[0].delete().unwrap();
    assert_eq!(file.text(), "(c)");

    // already detached
    assert!(matches!(
        forms[0].delete(),
        Err(PsiError::IncorrectOperation(_))
    ));
}

#[test]
fn delete_child_range() {
    let (_m, _id, file) = util::load("(a)\n(b)\n(c)");
    let forms = file.forms();

    file.delete_child_range(&*forms[0], &*forms[1]).unwrap();
    assert_eq!(file.text(), "(c)");
}

#[test]
fn replace_form() {
    let (_m, _id, file) = util::load("(let x 1)\n(f x)");
    let call = file.forms()[1].clone();
    let new = ElementFactory::form("(g x 2)").unwrap();

    let replaced = call.replace(&*new).unwrap();
    assert_eq!(file.text(), "(let x 1)\n(g x 2)");
    assert_eq!(replaced.kind(), SyntaxKind::Call);
    assert!(replaced.is_valid());
    assert!(!call.is_valid());

    // references of the new form resolve in the tree
    let x = util::find(&*replaced, "x", 0);
    assert_eq!(
        x.reference().unwrap().resolve().unwrap().text(),
        "(let x 1)"
    );
}

#[test]
fn read_only_files_reject_edits() {
    let manager = util::manager();
    let id = manager.add_file("ro.sx", "(a)", false);
    let file = manager.file(id).unwrap();
    let form = ElementFactory::form("(b)").unwrap();

    assert!(!file.is_writable());
    assert!(matches!(file.add(&*form), Err(PsiError::IncorrectOperation(_))));
    assert!(matches!(
        file.forms()[0].delete(),
        Err(PsiError::IncorrectOperation(_))
    ));
    assert_eq!(file.text(), "(a)");
}

#[test]
fn light_files_are_writable() {
    let manager = util::manager();
    let id = manager.add_light_file("scratch", "(a)");
    let file = manager.file(id).unwrap();

    assert!(file.is_writable());
    assert!(!file.is_physical());

    file.add(&*ElementFactory::form("(b)").unwrap()).unwrap();
    assert_eq!(file.text(), "(a)\n(b)");
}

#[test]
fn invalid_arguments() {
    let (_m, _id, file) = util::load("(proc f (a) a)\n(g)");
    let name = util::find(&file, "f", 0);
    assert_eq!(name.kind(), SyntaxKind::Name);

    // not a form
    assert!(matches!(file.check_add(&*name), Err(PsiError::IncorrectOperation(_))));

    // not a child
    let form = ElementFactory::form("(b)").unwrap();
    assert!(matches!(
        file.add_before(&*form, Some(&*name)),
        Err(PsiError::IncorrectOperation(_))
    ));

    // detached trees are not writable
    assert!(matches!(
        form.copy().delete(),
        Err(PsiError::IncorrectOperation(_))
    ));
}

#[test]
fn factory_rejects_bad_text() {
    assert!(ElementFactory::form("(f").is_err());
    assert!(ElementFactory::form("   ").is_err());
    assert!(ElementFactory::form("(a) (b)").is_err());

    let form = ElementFactory::form("(proc f () 1)").unwrap();
    assert_eq!(form.kind(), SyntaxKind::DefProc);
    assert!(form.parent().is_none());
}
