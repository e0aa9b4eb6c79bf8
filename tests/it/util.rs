//! Test utilities, including data-driven ones.

use std::{
    cell::RefCell,
    fmt::{self, Write},
    rc::Rc,
};

use rowan::TextSize;

use psi::{
    host::{FileId, NavigationTarget, Navigator, Project, PsiManager},
    psi::{visit, File, Psi, PsiElement, PsiVisitor},
};

pub const CURSOR_MARKER: &str = "$0";

/// Returns the offset of the first occurrence of `$0` marker and the copy of `text`
/// without the marker.
pub fn try_extract_offset(text: &str) -> Option<(TextSize, String)> {
    let cursor_pos = text.find(CURSOR_MARKER)?;
    let mut new_text = String::with_capacity(text.len() - CURSOR_MARKER.len());
    new_text.push_str(&text[..cursor_pos]);
    new_text.push_str(&text[cursor_pos + CURSOR_MARKER.len()..]);
    let cursor_pos = TextSize::from(cursor_pos as u32);
    Some((cursor_pos, new_text))
}

pub type TestResult<T = ()> = Result<T, TestError>;

/// Parsed test case
#[derive(Debug, Clone)]
pub struct Test {
    pub title: String,
    pub code: String,
    pub expected: String,
}

impl Test {
    pub fn result(self, output: &str) -> TestResult {
        // REMARK: trimmed
        if output.trim() == self.expected.trim() {
            Ok(())
        } else {
            Err(TestError {
                test: self.clone(),
                output: output.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestError {
    pub test: Test,
    pub output: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}
--- code:
{}
--- output:
{}
--- expected:
{}",
            self.test.title, self.test.code, self.output, self.test.expected,
        )
    }
}

pub fn run_tests(src: &str, runner: fn(Test) -> TestResult) {
    let tests = self::collect_tests(src);
    assert!(!tests.is_empty(), "no test case found");

    let errs = tests
        .into_iter()
        .filter_map(|t| runner(t).err())
        .collect::<Vec<_>>();

    if errs.is_empty() {
        return;
    }

    let mut s = String::new();
    writeln!(s, "Errors:").unwrap();
    for e in &errs {
        writeln!(s, "{}", e).unwrap();
        writeln!(s).unwrap();
    }

    panic!("{}", s);
}

/// Splits test cases delimited with 40 hyphens: `title + code`, `expected`, ..
pub fn collect_tests(src: &str) -> Vec<Test> {
    let mut chunks = {
        // 40 hyphens
        let delim = r#"----------------------------------------"#;
        src.split(delim)
    };

    let mut tests = vec![];
    while let Some(header) = chunks.next() {
        let expected = match chunks.next() {
            Some(block) => block,
            None => break,
        };

        let mut header = header
            .lines()
            .filter(|ln| !ln.starts_with("//"))
            .skip_while(|ln| ln.trim().is_empty());

        // first line: title
        let title = match header.next() {
            Some(t) => t,
            None => break,
        };

        // other lines: code
        let code = header.collect::<Vec<&str>>().join("\n");

        tests.push(Test {
            title: title.trim().to_string(),
            code: code.trim().to_string(),
            expected: expected.to_string(),
        });
    }

    tests
}

// ----------------------------------------
// Fixtures
// ----------------------------------------

pub fn manager() -> Rc<PsiManager> {
    PsiManager::new(Project::new("test", "/tmp/test"))
}

/// Manager with a writable physical file `main.sx`
pub fn load(text: &str) -> (Rc<PsiManager>, FileId, File) {
    let manager = self::manager();
    let id = manager.add_file("main.sx", text, true);
    let file = manager.file(id).unwrap();
    (manager, id, file)
}

/// Every element under `root` in preorder
pub fn preorder(root: &dyn PsiElement) -> Vec<Psi> {
    struct Collect(Vec<Psi>);

    impl PsiVisitor for Collect {
        fn visit_element(&mut self, element: &Psi) {
            self.0.push(element.clone());
        }
    }

    let mut v = Collect(vec![]);
    visit::walk(root, &mut v);
    v.0
}

/// The `nth` element in preorder whose text is `text`
pub fn find(root: &dyn PsiElement, text: &str, nth: usize) -> Psi {
    self::preorder(root)
        .into_iter()
        .filter(|e| e.text() == text)
        .nth(nth)
        .unwrap_or_else(|| panic!("no {nth}th element `{text}`"))
}

/// Navigator recording requests
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    pub log: Rc<RefCell<Vec<(NavigationTarget, bool)>>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, target: &NavigationTarget, request_focus: bool) {
        self.log.borrow_mut().push((target.clone(), request_focus));
    }
}
