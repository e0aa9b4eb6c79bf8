//! Tests for the base element contract

use smallvec::smallvec;

use psi::{
    host::{FileStatus, SearchScope},
    psi::{
        Call, DefProc, ElementFactory, Let, Name, Path, Psi, PsiElement, PsiElementExt, PsiError,
        PsiNode, PsiVisitor,
    },
    resolve::{ResolveState, ScopeProcessor},
    syntax::SyntaxKind,
};

use crate::util;

const SRC: &str = "(proc add (a b) (+ a b))\n(let x 1)\n(add x 2)\n";

#[test]
fn mutation_is_unsupported_by_default() {
    let (_m, _id, file) = util::load(SRC);
    let path = util::find(&file, "+", 0);
    let lit = util::find(&file, "1", 0);
    let form = ElementFactory::form("(g)").unwrap();

    for e in [&path, &lit] {
        let type_name = e.type_name();
        let unsupported = |op| PsiError::UnsupportedOperation { type_name, op };

        assert_eq!(e.add(&*form).unwrap_err(), unsupported("add"));
        assert_eq!(e.check_add(&*form).unwrap_err(), unsupported("check_add"));
        assert_eq!(e.add_before(&*form, None).unwrap_err(), unsupported("add_before"));
        assert_eq!(e.add_after(&*form, None).unwrap_err(), unsupported("add_after"));
        assert_eq!(e.add_range(&*form, &*form).unwrap_err(), unsupported("add_range"));
        assert_eq!(e.delete().unwrap_err(), unsupported("delete"));
        assert_eq!(e.check_delete().unwrap_err(), unsupported("check_delete"));
        assert_eq!(e.replace(&*form).unwrap_err(), unsupported("replace"));
        assert_eq!(
            e.delete_child_range(&*form, &*form).unwrap_err(),
            unsupported("delete_child_range")
        );
    }

    assert_eq!(path.type_name(), "Path");
    assert_eq!(lit.type_name(), "Literal");

    // a call is a form but not a container
    let call = util::find(&file, "(add x 2)", 0);
    assert_eq!(
        call.add(&*form).unwrap_err(),
        PsiError::UnsupportedOperation {
            type_name: "Call",
            op: "add"
        }
    );
}

#[test]
fn validity_delegates_to_parent() {
    let (manager, id, file) = util::load(SRC);
    let a = util::find(&file, "a", 0);

    assert!(file.is_valid());
    assert!(a.is_valid());
    assert!(a.parent().unwrap().is_valid());

    let copy = a.copy();
    assert!(copy.parent().is_none());
    assert!(!copy.is_valid());
    assert!(!copy.is_physical());
    assert!(!copy.is_writable());

    manager.set_text(id, "(f)");
    assert!(!file.is_valid());
    assert!(!a.is_valid());
    assert!(manager.file(id).unwrap().is_valid());
}

#[test]
fn accept_children_in_sibling_order() {
    #[derive(Default)]
    struct Record(Vec<String>);

    impl PsiVisitor for Record {
        fn visit_element(&mut self, element: &Psi) {
            self.0.push(element.text());
        }
    }

    let (_m, _id, file) = util::load("(f a (g b) \"c\" d)");
    let call = file.forms()[0].clone();

    let mut v = Record::default();
    call.accept_children(&mut v);
    assert_eq!(v.0, ["f", "a", "(g b)", "\"c\"", "d"]);

    let mut v = Record::default();
    file.accept_children(&mut v);
    assert_eq!(v.0, ["(f a (g b) \"c\" d)"]);
}

#[test]
fn text_matches_is_reflexive() {
    let (_m, _id, file) = util::load(SRC);

    for e in util::preorder(&file) {
        assert!(e.text_matches_element(&*e), "{e:?}");
        assert!(e.text_matches(&e.text()));
    }

    let x = util::find(&file, "x", 0);
    assert!(!x.text_matches("X"));
}

#[test]
fn find_child_by_kind() {
    let (_m, _id, file) = util::load(SRC);
    let forms = file.forms();

    let proc = forms[0].clone().cast::<DefProc>().unwrap();
    let name = proc.find_child_by_kind::<Name>().unwrap();
    assert_eq!(name.text(), "add");
    assert!(proc.find_child_by_kind::<Let>().is_none());

    let call = forms[2].clone().cast::<Call>().unwrap();
    let paths = call
        .find_children_by_kind::<Path>()
        .into_iter()
        .map(|p| p.text())
        .collect::<Vec<_>>();
    assert_eq!(paths, ["add", "x"]);

    assert_eq!(file.find_not_null_child_by_kind::<Let>().text(), "(let x 1)");
    assert_eq!(Let::KIND, SyntaxKind::Let);
}

#[test]
#[should_panic(expected = "missing")]
fn find_not_null_child_panics() {
    let (_m, _id, file) = util::load("(f)");
    file.find_not_null_child_by_kind::<DefProc>();
}

#[test]
fn host_queries_fail_without_a_file() {
    let form = ElementFactory::form("(f x)").unwrap();
    let x = form.children()[1].clone();

    assert!(matches!(
        form.project(),
        Err(PsiError::InvalidElementAccess { kind: SyntaxKind::Call, .. })
    ));
    assert!(matches!(x.manager(), Err(PsiError::InvalidElementAccess { .. })));
    assert!(matches!(x.containing_file(), Err(PsiError::InvalidElementAccess { .. })));
    assert!(x.resolve_scope().is_err());

    // an unreachable manager
    let (manager, _id, file) = util::load(SRC);
    let x = util::find(&file, "x", 0);
    assert_eq!(x.project().unwrap().name(), "test");
    drop(manager);
    assert!(matches!(x.project(), Err(PsiError::InvalidElementAccess { .. })));
    assert!(!x.is_valid());
}

#[test]
fn process_declarations_default_continues() {
    struct Stop(usize);

    impl ScopeProcessor for Stop {
        fn execute(&mut self, _element: &Psi, _state: &ResolveState) -> bool {
            self.0 += 1;
            false
        }
    }

    let (_m, _id, file) = util::load(SRC);
    let call = util::find(&file, "(add x 2)", 0);
    let x = util::find(&*call, "x", 0);

    for e in [&call, &x] {
        let mut p = Stop(0);
        assert!(e.process_declarations(&mut p, &ResolveState::initial(), None, &x));
        assert_eq!(p.0, 0);
    }
}

#[test]
fn copy_is_detached() {
    let (_m, _id, file) = util::load(SRC);
    let proc = file.forms()[0].clone();
    let copy = proc.copy();

    assert_eq!(copy.kind(), SyntaxKind::DefProc);
    assert_eq!(copy.text(), proc.text());
    assert_ne!(copy, proc);
    assert!(copy.containing_file().is_err());
    assert!(copy.text_matches_element(&*proc));
}

#[test]
fn copy_is_another_element() {
    let (_m, _id, file) = util::load("(let x 1)\n(f x)");
    let let_ = file.forms()[0].clone();
    let copy = let_.copy();
    assert_ne!(copy, let_);

    let rf = util::find(&file, "x", 1).reference().unwrap();
    assert!(rf.is_reference_to(&*let_));
    assert!(!rf.is_reference_to(&*copy));

    let scope = SearchScope::Local(smallvec![let_.clone()]);
    assert!(scope.contains(&*util::find(&*let_, "x", 0)));
    assert!(!scope.contains(&*util::find(&*copy, "x", 0)));

    // forms of a copied file are not forms of the original
    let form = file.copy().children()[0].clone();
    assert_ne!(form, let_);
    let err = file.delete_child_range(&*form, &*form).unwrap_err();
    assert!(matches!(err, PsiError::IncorrectOperation(_)), "{err:?}");
}

#[test]
fn declarations() {
    let (_m, _id, file) = util::load(SRC);
    let forms = file.forms();

    let proc = &forms[0];
    assert_eq!(proc.name().as_deref(), Some("add"));
    assert_eq!(u32::from(proc.text_offset()), 6);

    let presentation = proc.presentation().unwrap();
    assert_eq!(presentation.presentable_text, "add(a b)");
    assert_eq!(presentation.location.as_deref(), Some("main.sx"));

    let let_ = &forms[1];
    assert_eq!(let_.name().as_deref(), Some("x"));
    assert_eq!(let_.presentation().unwrap().presentable_text, "x");

    assert_eq!(forms[2].name(), None);
    assert_eq!(file.name().as_deref(), Some("main.sx"));
}

#[test]
fn references() {
    let (_m, _id, file) = util::load(SRC);
    let call = util::find(&file, "(add x 2)", 0);

    let refs = call.references();
    let names = refs.iter().map(|r| r.canonical_text()).collect::<Vec<_>>();
    assert_eq!(names, ["add", "x"]);

    let x = util::find(&*call, "x", 0);
    let rf = x.reference().unwrap();
    assert_eq!(rf.element(), &x);
    assert_eq!(u32::from(rf.range_in_element().start()), 0);
    assert_eq!(rf.absolute_range(), x.text_range());
}

#[test]
fn find_reference_at_offset() {
    let (offset, text) = util::try_extract_offset("(let x 1)\n(f x$0)").unwrap();
    let (_m, _id, file) = util::load(&text);

    // the end of a name is inclusive
    let rf = file.find_reference_at(offset).unwrap();
    assert_eq!(rf.canonical_text(), "x");
    assert_eq!(rf.resolve().unwrap().text(), "(let x 1)");

    let call = util::find(&file, "(f x)", 0);
    let rf = call.find_reference_at(1.into()).unwrap();
    assert_eq!(rf.canonical_text(), "f");

    // `(` of the call
    assert!(call.find_reference_at(0.into()).is_none());
    // out of the element
    assert!(call.find_reference_at(100.into()).is_none());
}

#[test]
fn file_status() {
    let (manager, _id, file) = util::load(SRC);
    let x = util::find(&file, "x", 0);
    assert_eq!(x.file_status(), FileStatus::NotChanged);

    let vfile = file.virtual_file().unwrap();
    manager
        .project()
        .file_status_manager()
        .set_status(vfile, FileStatus::Modified);
    assert_eq!(x.file_status(), FileStatus::Modified);
    assert_eq!(file.file_status(), FileStatus::Modified);

    // light files are not physical
    let light = manager.add_light_file("scratch", "(f)");
    let light = manager.file(light).unwrap();
    assert!(!light.is_physical());
    assert_eq!(light.file_status(), FileStatus::NotChanged);
}

#[test]
fn navigation_element_is_self() {
    let (_m, _id, file) = util::load(SRC);
    let x = util::find(&file, "x", 0);

    assert_eq!(x.navigation_element(), x);
    assert_eq!(x.original_element(), x);
    assert_eq!(x.context(), x.parent());
    assert!(file.context().is_none());
    assert!(x.can_navigate());
}
