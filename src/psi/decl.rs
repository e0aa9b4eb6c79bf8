//! Declarations: procedures, `let` bindings and parameters

use itertools::Itertools;
use rowan::TextSize;

use crate::{
    psi::{
        mutate, nodes::base_methods, Block, DefProc, Let, Name, Param, Params, Psi, PsiElement,
        PsiElementExt, PsiVisitor, RawElement, Result,
    },
    resolve::{ResolveState, ScopeProcessor},
    syntax::SyntaxKind,
};

/// Plain data a UI shows for an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPresentation {
    pub presentable_text: String,
    /// Name of the containing file
    pub location: Option<String>,
}

impl ItemPresentation {
    fn new(element: &dyn PsiElement, presentable_text: String) -> Self {
        let location = element.containing_file().ok().and_then(|f| f.name());
        Self {
            presentable_text,
            location,
        }
    }
}

fn name_of(name: Option<Name>) -> Option<String> {
    name?.ident().map(|tk| tk.text().to_string())
}

fn name_offset(element: &dyn PsiElement, name: Option<Name>) -> TextSize {
    name.map_or_else(|| element.text_range().start(), |n| n.text_range().start())
}

impl DefProc {
    pub fn name_node(&self) -> Option<Name> {
        self.find_child_by_kind()
    }

    pub fn params(&self) -> Vec<Param> {
        self.find_child_by_kind::<Params>()
            .map(|ps| ps.params())
            .unwrap_or_default()
    }

    pub fn body(&self) -> Option<Block> {
        self.find_child_by_kind()
    }
}

impl PsiElement for DefProc {
    base_methods!(DefProc);

    fn name(&self) -> Option<String> {
        self::name_of(self.name_node())
    }

    fn text_offset(&self) -> TextSize {
        self::name_offset(self, self.name_node())
    }

    /// `name(param param..)`
    fn presentation(&self) -> Option<ItemPresentation> {
        let name = self.name()?;
        let params = self.params().iter().filter_map(|p| p.name()).join(" ");
        Some(ItemPresentation::new(self, format!("{name}({params})")))
    }

    fn accept(&self, visitor: &mut dyn PsiVisitor) {
        visitor.visit_proc(self);
    }

    /// Offers itself to a sibling scan, and its parameters to a walk coming up from the body
    fn process_declarations(
        &self,
        processor: &mut dyn ScopeProcessor,
        state: &ResolveState,
        last_parent: Option<&Psi>,
        _place: &Psi,
    ) -> bool {
        match last_parent {
            None => processor.execute(&self.to_psi(), state),
            Some(lp) if lp.kind() == SyntaxKind::Body => {
                let state = state.with_scope(self.to_psi());
                self.params()
                    .iter()
                    .all(|param| processor.execute(&param.to_psi(), &state))
            }
            Some(_) => true,
        }
    }

    fn check_delete(&self) -> Result<()> {
        mutate::check_delete(self)
    }

    fn delete(&self) -> Result<()> {
        mutate::delete(self)
    }

    fn replace(&self, new_element: &dyn PsiElement) -> Result<Psi> {
        mutate::replace(self, new_element)
    }
}

impl Let {
    pub fn name_node(&self) -> Option<Name> {
        self.find_child_by_kind()
    }

    /// The bound form
    pub fn value(&self) -> Option<Psi> {
        self.raw.children().find(|c| c.kind().is_form())
    }
}

impl PsiElement for Let {
    base_methods!(Let);

    fn name(&self) -> Option<String> {
        self::name_of(self.name_node())
    }

    fn text_offset(&self) -> TextSize {
        self::name_offset(self, self.name_node())
    }

    fn presentation(&self) -> Option<ItemPresentation> {
        Some(ItemPresentation::new(self, self.name()?))
    }

    fn accept(&self, visitor: &mut dyn PsiVisitor) {
        visitor.visit_let(self);
    }

    /// Visible to the forms that follow it, not to its own value
    fn process_declarations(
        &self,
        processor: &mut dyn ScopeProcessor,
        state: &ResolveState,
        last_parent: Option<&Psi>,
        _place: &Psi,
    ) -> bool {
        match last_parent {
            None => processor.execute(&self.to_psi(), state),
            Some(_) => true,
        }
    }

    fn check_delete(&self) -> Result<()> {
        mutate::check_delete(self)
    }

    fn delete(&self) -> Result<()> {
        mutate::delete(self)
    }

    fn replace(&self, new_element: &dyn PsiElement) -> Result<Psi> {
        mutate::replace(self, new_element)
    }
}

impl Param {
    /// Procedure declaring this parameter
    pub fn proc(&self) -> Option<DefProc> {
        self.parent()?.parent()?.cast()
    }
}

impl PsiElement for Param {
    base_methods!(Param);

    fn name(&self) -> Option<String> {
        self.raw
            .syntax()
            .first_token()
            .map(|tk| tk.text().to_string())
    }
}
