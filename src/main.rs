//! Loads source files and reports their diagnostics and declarations

use std::{
    env, fs,
    io::{self, Write as _},
    process,
};

use base::ln::LineTable;
use camino::Utf8PathBuf;

use psi::{
    host::{FileId, Project, PsiManager},
    psi::{PsiElement, PsiNode},
    resolve::resolve_diag,
    util::diag::{self, Diagnostic},
};

/// Names callable without a declaration
const BUILTINS: &[&str] = &["+", "-", "*", "/", "=", "<", ">", "<=", ">=", "not", "print"];

fn main() {
    env_logger::init();

    let paths = env::args().skip(1).map(Utf8PathBuf::from).collect::<Vec<_>>();
    if paths.is_empty() {
        eprintln!("usage: psi <file>...");
        process::exit(2);
    }

    let base_dir = env::current_dir()
        .ok()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .unwrap_or_default();
    let manager = PsiManager::new(Project::new("cli", base_dir));

    let mut ids = vec![];
    for path in paths {
        match fs::read_to_string(&path) {
            Ok(text) => ids.push(manager.add_file(path, text, false)),
            Err(err) => {
                eprintln!("can't open file {path}: {err}");
                process::exit(1);
            }
        }
    }

    let out = io::stdout();
    let mut out = out.lock();

    let mut any_error = false;
    for id in ids {
        match self::report_file(&mut out, &manager, id) {
            Ok(error) => any_error |= error,
            Err(err) => {
                log::error!("failed to write output: {err}");
                process::exit(1);
            }
        }
    }

    if out.flush().is_err() || any_error {
        process::exit(1);
    }
}

/// Prints diagnostics and declarations of a file. Returns true on any error.
fn report_file(out: &mut impl io::Write, manager: &PsiManager, id: FileId) -> io::Result<bool> {
    let (file, text) = match (manager.file(id), manager.text(id)) {
        (Some(file), Some(text)) => (file, text),
        _ => return Ok(false),
    };

    let name = file.name().unwrap_or_default();
    let ln_tbl = LineTable::new(&text);

    let parse_errs = manager.parse_errors(id);
    let unresolved = resolve_diag::unresolved_references(&file, BUILTINS);

    let mut any_error = false;
    any_error |= self::print_diagnostics(out, &parse_errs, &name, &text, &ln_tbl)?;
    any_error |= self::print_diagnostics(out, &unresolved, &name, &text, &ln_tbl)?;

    writeln!(out, "{name}:")?;
    for form in file.forms() {
        let decl = match form.kind() {
            k if psi::psi::DefProc::can_cast(k) || psi::psi::Let::can_cast(k) => form,
            _ => continue,
        };

        if let Some(presentation) = decl.presentation() {
            let ln_col = ln_tbl.line_column(decl.text_offset().into());
            writeln!(
                out,
                "  {:?} {} ({}:{})",
                decl.kind(),
                presentation.presentable_text,
                ln_col.line1(),
                ln_col.column1()
            )?;
        }
    }

    Ok(any_error)
}

fn print_diagnostics(
    out: &mut impl io::Write,
    diags: &[impl Diagnostic],
    src_file: &str,
    src_text: &str,
    ln_tbl: &LineTable,
) -> io::Result<bool> {
    let mut any_error = false;

    for d in diags {
        any_error |= d.severity() == diag::Severity::Error;
        writeln!(out, "{}", diag::line(d, src_file, src_text, ln_tbl))?;
    }

    Ok(any_error)
}
