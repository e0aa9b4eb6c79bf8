use crate::{
    psi::{Psi, PsiError, RawElement, Result},
    syntax,
};

/// Builds detached elements from source text
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementFactory;

impl ElementFactory {
    /// Parses `text` as a single form. The result has no file and is mutable, ready to be added
    /// to a writable tree.
    pub fn form(text: &str) -> Result<Psi> {
        let (root, errs) = syntax::parse_str(text);

        if let Some(err) = errs.first() {
            return Err(PsiError::incorrect(format!(
                "cannot create a form from `{}`: {}",
                text,
                err.simple_message()
            )));
        }

        let root = root.clone_for_update();
        let mut forms = root.children().filter(|n| n.kind().is_form());

        let form = match forms.next() {
            Some(x) => x,
            None => return Err(PsiError::incorrect(format!("no form in `{text}`"))),
        };
        if forms.next().is_some() {
            return Err(PsiError::incorrect(format!(
                "more than one form in `{text}`"
            )));
        }

        form.detach();
        Ok(Psi::from_raw(RawElement::detached(form)))
    }
}
