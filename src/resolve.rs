/*!
Name resolution by walking scopes up from a place

[`tree_walk_up`] asks each element from the place up to the file root to
[`process_declarations`](crate::psi::PsiElement::process_declarations), passing the child it came
up from. Scopes offer declarations nearest first, and the processor stops the walk when it's
satisfied.
*/

pub mod resolve_diag;

use rustc_hash::FxHashSet;

use crate::psi::Psi;

/// Consumer of the declarations offered during a scope walk
pub trait ScopeProcessor {
    /// Returns `false` to stop the walk
    fn execute(&mut self, element: &Psi, state: &ResolveState) -> bool;
}

/// Context carried along a scope walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveState {
    scope: Option<Psi>,
}

impl ResolveState {
    pub fn initial() -> Self {
        Self::default()
    }

    /// State for declarations owned by `scope`, e.g., parameters of a procedure
    pub fn with_scope(&self, scope: Psi) -> Self {
        Self { scope: Some(scope) }
    }

    pub fn scope(&self) -> Option<&Psi> {
        self.scope.as_ref()
    }
}

/// A declaration found for a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveResult {
    pub element: Psi,
    /// Element owning the declaration, if it's not the declaration itself
    pub scope: Option<Psi>,
}

/// Walks up from `place` until `max_scope` (inclusive) or the root. Returns `false` if the
/// processor stopped the walk.
pub fn tree_walk_up(
    processor: &mut dyn ScopeProcessor,
    place: &Psi,
    max_scope: Option<&Psi>,
    state: &ResolveState,
) -> bool {
    let mut last_parent = place.clone();
    let mut scope = Some(place.clone());

    while let Some(s) = scope {
        log::trace!("walk: {:?} from {:?}", s.kind(), last_parent.kind());

        if !s.process_declarations(processor, state, Some(&last_parent), place) {
            return false;
        }
        if max_scope == Some(&s) {
            break;
        }

        scope = s.context();
        last_parent = s;
    }

    true
}

/// Stops at the first declaration with the given name
#[derive(Debug)]
pub struct NameResolver<'a> {
    name: &'a str,
    result: Option<ResolveResult>,
}

impl<'a> NameResolver<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name, result: None }
    }

    pub fn into_result(self) -> Option<ResolveResult> {
        self.result
    }
}

impl<'a> ScopeProcessor for NameResolver<'a> {
    fn execute(&mut self, element: &Psi, state: &ResolveState) -> bool {
        if element.name().as_deref() != Some(self.name) {
            return true;
        }

        self.result = Some(ResolveResult {
            element: element.clone(),
            scope: state.scope().cloned(),
        });
        false
    }
}

/// Collects every visible declaration. Shadowed ones are skipped.
#[derive(Debug, Default)]
pub struct DeclCollector {
    seen: FxHashSet<String>,
    decls: Vec<Psi>,
}

impl DeclCollector {
    pub fn into_decls(self) -> Vec<Psi> {
        self.decls
    }
}

impl ScopeProcessor for DeclCollector {
    fn execute(&mut self, element: &Psi, _state: &ResolveState) -> bool {
        if let Some(name) = element.name() {
            if self.seen.insert(name) {
                self.decls.push(element.clone());
            }
        }
        true
    }
}

/// Nearest declaration of `name` visible from `place`
pub fn resolve(place: &Psi, name: &str) -> Option<ResolveResult> {
    let mut resolver = NameResolver::new(name);
    self::tree_walk_up(&mut resolver, place, None, &ResolveState::initial());

    let result = resolver.into_result();
    log::trace!(
        "resolve `{}`: {:?}",
        name,
        result.as_ref().map(|r| r.element.kind())
    );
    result
}

/// Declarations visible from `place`, nearest first
pub fn visible_declarations(place: &Psi) -> Vec<Psi> {
    let mut collector = DeclCollector::default();
    self::tree_walk_up(&mut collector, place, None, &ResolveState::initial());
    collector.into_decls()
}
