//! Tests for `syntax` module.

use psi::syntax::{
    cst::{self, ParseError},
    parse_str, SyntaxElement, SyntaxKind, SyntaxNode,
};

use crate::util::{self, Test, TestError};

/// Runs tests defined in the test case files
#[test]
fn cst() {
    let src = include_str!("test_cases/cst.txt");
    util::run_tests(src, runner)
}

fn runner(test: Test) -> Result<(), TestError> {
    let (tks, errs) = cst::lex::from_str(&test.code);
    assert!(errs.is_empty(), "{:?}", errs);

    let (cst, errs) = cst::parse(&test.code, &tks);

    if !errs.is_empty() {
        let s = errs
            .iter()
            .map(|e| format!("- {}", e))
            .collect::<Vec<_>>()
            .join("\n");
        panic!("Parse error:\n{}\nsource: {}", s, test.code);
    }

    // root
    assert_eq!(format!("{:?}", cst), format!("ROOT@0..{}", test.code.len()));

    let cst_string = self::cst_display(&cst);
    test.result(&cst_string)
}

fn cst_display(cst: &SyntaxNode) -> String {
    let mut nest = 0;

    let repr = cst
        .children_with_tokens()
        .flat_map(|elem| match elem {
            SyntaxElement::Node(node) => node
                .preorder_with_tokens()
                .filter_map(|ev| match ev {
                    rowan::WalkEvent::Enter(node) => {
                        let last_nest = nest;
                        nest += 1;
                        Some((last_nest, node))
                    }
                    rowan::WalkEvent::Leave(_) => {
                        nest -= 1;
                        None
                    }
                })
                .collect::<Vec<_>>(),
            SyntaxElement::Token(_) => vec![(nest, elem)],
        })
        .map(|(nest, child)| {
            format!(
                "{}{:?}@{:?}",
                "    ".repeat(nest),
                child.kind(),
                child.text_range()
            )
        })
        .collect::<Vec<_>>();

    repr.join("\n")
}

#[test]
fn lossless() {
    let srcs = [
        "",
        "  ; only a comment\n",
        "(proc f (x) (g x)) (f 1)",
        "(let x) (do (1 2)",
        ")) \"unterminated",
        "(proc (a 1) )",
    ];

    for src in srcs {
        let (root, _errs) = parse_str(src);
        assert_eq!(root.text().to_string(), src);
        assert_eq!(root.kind(), SyntaxKind::ROOT);
    }
}

#[test]
fn keywords_and_numbers() {
    let (tks, errs) = cst::lex::from_str("true false nil -1 - x-1");
    assert!(errs.is_empty());

    let kinds = tks
        .iter()
        .filter(|tk| tk.kind != SyntaxKind::Ws)
        .map(|tk| tk.kind)
        .collect::<Vec<_>>();

    assert_eq!(
        kinds,
        [
            SyntaxKind::True,
            SyntaxKind::False,
            SyntaxKind::Nil,
            SyntaxKind::Num,
            SyntaxKind::Ident,
            SyntaxKind::Ident,
        ]
    );
}

#[test]
fn errors() {
    let (_, errs) = parse_str("(let x 1 2)");
    assert!(
        matches!(
            errs.as_slice(),
            [ParseError::WrongArity {
                form: "let",
                expected: 1,
                found: 2,
                ..
            }]
        ),
        "{errs:?}"
    );

    let (_, errs) = parse_str("(f x");
    assert!(matches!(errs.as_slice(), [ParseError::UnclosedParentheses { .. }]));

    let (_, errs) = parse_str("x)");
    assert!(matches!(errs.as_slice(), [ParseError::UnmatchedRParen { .. }]));

    let (_, errs) = parse_str("\"abc");
    assert!(matches!(errs.as_slice(), [ParseError::LexError { .. }]));
}
