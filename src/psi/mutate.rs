//! Structural mutation shared by the variants that support it
//!
//! Only trees of writable files are mutable [`rowan`] trees, so every operation checks
//! [`PsiElement::is_writable`] before touching the tree.

use rowan::GreenNodeBuilder;

use crate::{
    psi::{Psi, PsiElement, PsiError, Result},
    syntax::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken},
};

/// Element holding a sequence of forms
pub(crate) trait Container: PsiElement {
    /// Trivia inserted between adjacent forms
    const SEPARATOR: &'static str;
}

/// Insertion point among the children of a container
enum Position {
    Start,
    End,
    Before(SyntaxNode),
    After(SyntaxNode),
}

fn ensure_writable(element: &dyn PsiElement) -> Result<()> {
    if element.is_writable() {
        Ok(())
    } else {
        Err(PsiError::incorrect(format!(
            "cannot modify read-only {}",
            element.type_name()
        )))
    }
}

fn ensure_form(element: &dyn PsiElement) -> Result<()> {
    if element.kind().is_form() {
        Ok(())
    } else {
        Err(PsiError::incorrect(format!(
            "{} is not a form",
            element.type_name()
        )))
    }
}

fn ensure_child(container: &dyn PsiElement, child: &dyn PsiElement) -> Result<()> {
    if child.raw().is_child_of(container.raw()) {
        Ok(())
    } else {
        Err(PsiError::incorrect(format!(
            "{} is not a child of {}",
            child.type_name(),
            container.type_name()
        )))
    }
}

/// Writes the edited tree of the element back to its file
fn commit(element: &dyn PsiElement) {
    let ctx = match element.raw().ctx() {
        Some(ctx) => ctx,
        None => return,
    };
    if let Some(manager) = ctx.manager.upgrade() {
        manager.commit_tree(ctx.file);
    }
}

/// Detached, mutable duplicate ready to be attached to another tree
fn detached_copy(element: &dyn PsiElement) -> SyntaxNode {
    element.syntax().clone_subtree().clone_for_update()
}

/// Detached, mutable whitespace token
fn ws_token(text: &str) -> SyntaxToken {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(SyntaxKind::ROOT.into());
    builder.token(SyntaxKind::Ws.into(), text);
    builder.finish_node();

    let root = SyntaxNode::new_root(builder.finish()).clone_for_update();
    let tk = match root.first_token() {
        Some(tk) => tk,
        None => unreachable!("the root was built with a token"),
    };
    tk.detach();
    tk
}

/// Siblings `first..=last` as a list of nodes
fn sibling_range(first: &dyn PsiElement, last: &dyn PsiElement) -> Result<Vec<SyntaxNode>> {
    let (first, last) = (first.syntax(), last.syntax());

    if first.parent().is_none() || first.parent() != last.parent() || first.index() > last.index() {
        return Err(PsiError::incorrect("not a sibling range"));
    }

    let mut nodes = vec![];
    for node in first.siblings(rowan::Direction::Next) {
        let is_last = node == *last;
        nodes.push(node);
        if is_last {
            break;
        }
    }

    Ok(nodes)
}

/// Splices `nodes` into the container with separators. Returns the inserted elements.
fn insert<C: Container>(container: &C, position: Position, nodes: Vec<SyntaxNode>) -> Vec<Psi> {
    let syn = container.syntax();
    let len = syn.children_with_tokens().count();

    let (index, sep_before) = match position {
        Position::Start => (0, false),
        Position::End => (len, true),
        Position::Before(anchor) => (anchor.index(), false),
        Position::After(anchor) => (anchor.index() + 1, true),
    };

    let sep_before = sep_before && index > 0;
    let sep_after = !sep_before && index < len;

    let mut elems: Vec<SyntaxElement> = vec![];
    for (i, node) in nodes.iter().enumerate() {
        if sep_before || i > 0 {
            elems.push(ws_token(C::SEPARATOR).into());
        }
        elems.push(node.clone().into());
    }
    if sep_after && !nodes.is_empty() {
        elems.push(ws_token(C::SEPARATOR).into());
    }

    log::debug!(
        "{}: inserting {} node(s) at {}",
        container.type_name(),
        nodes.len(),
        index
    );
    syn.splice_children(index..index, elems);
    self::commit(container);

    // nodes of mutable trees keep their identity when attached
    nodes.into_iter().map(|n| container.raw().wrap(n)).collect()
}

fn insert_copies<C: Container>(
    container: &C,
    position: Position,
    elements: &[&dyn PsiElement],
) -> Result<Psi> {
    for element in elements {
        check_add(container, *element)?;
    }

    let nodes = elements.iter().map(|e| self::detached_copy(*e)).collect();
    self::insert(container, position, nodes)
        .into_iter()
        .next()
        .ok_or_else(|| PsiError::incorrect("nothing to add"))
}

fn anchor_position(
    container: &dyn PsiElement,
    anchor: Option<&dyn PsiElement>,
    before: bool,
) -> Result<Position> {
    Ok(match (anchor, before) {
        (Some(anchor), true) => {
            self::ensure_child(container, anchor)?;
            Position::Before(anchor.syntax().clone())
        }
        (Some(anchor), false) => {
            self::ensure_child(container, anchor)?;
            Position::After(anchor.syntax().clone())
        }
        (None, true) => Position::End,
        (None, false) => Position::Start,
    })
}

pub(crate) fn check_add<C: Container>(container: &C, element: &dyn PsiElement) -> Result<()> {
    self::ensure_writable(container)?;
    self::ensure_form(element)
}

pub(crate) fn add<C: Container>(container: &C, element: &dyn PsiElement) -> Result<Psi> {
    self::insert_copies(container, Position::End, &[element])
}

pub(crate) fn add_before<C: Container>(
    container: &C,
    element: &dyn PsiElement,
    anchor: Option<&dyn PsiElement>,
) -> Result<Psi> {
    let position = self::anchor_position(container, anchor, true)?;
    self::insert_copies(container, position, &[element])
}

pub(crate) fn add_after<C: Container>(
    container: &C,
    element: &dyn PsiElement,
    anchor: Option<&dyn PsiElement>,
) -> Result<Psi> {
    let position = self::anchor_position(container, anchor, false)?;
    self::insert_copies(container, position, &[element])
}

fn add_range_at<C: Container>(
    container: &C,
    first: &dyn PsiElement,
    last: &dyn PsiElement,
    position: Position,
) -> Result<Psi> {
    let range = self::sibling_range(first, last)?;
    let elements = range
        .into_iter()
        .map(|node| first.raw().wrap(node))
        .filter(|psi| psi.kind().is_form())
        .collect::<Vec<_>>();
    let elements = elements.iter().map(|psi| &**psi).collect::<Vec<_>>();
    self::insert_copies(container, position, &elements)
}

pub(crate) fn add_range_before<C: Container>(
    container: &C,
    first: &dyn PsiElement,
    last: &dyn PsiElement,
    anchor: Option<&dyn PsiElement>,
) -> Result<Psi> {
    let position = self::anchor_position(container, anchor, true)?;
    self::add_range_at(container, first, last, position)
}

pub(crate) fn add_range_after<C: Container>(
    container: &C,
    first: &dyn PsiElement,
    last: &dyn PsiElement,
    anchor: Option<&dyn PsiElement>,
) -> Result<Psi> {
    let position = self::anchor_position(container, anchor, false)?;
    self::add_range_at(container, first, last, position)
}

/// Removes children `start..end` (indices with tokens) and one adjacent separator
fn remove_children(parent: &SyntaxNode, start: usize, end: usize) {
    let children = parent.children_with_tokens().collect::<Vec<_>>();
    let is_ws = |i: usize| {
        children
            .get(i)
            .map_or(false, |e| e.kind() == SyntaxKind::Ws)
    };

    let (start, end) = if start > 0 && is_ws(start - 1) {
        (start - 1, end)
    } else if is_ws(end) {
        (start, end + 1)
    } else {
        (start, end)
    };

    parent.splice_children(start..end, vec![]);
}

pub(crate) fn delete_child_range<C: Container>(
    container: &C,
    first: &dyn PsiElement,
    last: &dyn PsiElement,
) -> Result<()> {
    self::ensure_writable(container)?;
    self::ensure_child(container, first)?;
    self::ensure_child(container, last)?;

    let (start, end) = (first.syntax().index(), last.syntax().index());
    if start > end {
        return Err(PsiError::incorrect("not a sibling range"));
    }

    log::debug!(
        "{}: deleting children {}..={}",
        container.type_name(),
        start,
        end
    );
    self::remove_children(container.syntax(), start, end + 1);
    self::commit(container);
    Ok(())
}

pub(crate) fn check_delete(element: &dyn PsiElement) -> Result<()> {
    if element.syntax().parent().is_none() {
        return Err(PsiError::incorrect(format!(
            "{} is not attached to a tree",
            element.type_name()
        )));
    }
    self::ensure_writable(element)
}

pub(crate) fn delete(element: &dyn PsiElement) -> Result<()> {
    self::check_delete(element)?;

    let syn = element.syntax();
    if let Some(parent) = syn.parent() {
        log::debug!("deleting {}", element.type_name());
        self::remove_children(&parent, syn.index(), syn.index() + 1);
        self::commit(element);
    }

    Ok(())
}

pub(crate) fn replace(element: &dyn PsiElement, new_element: &dyn PsiElement) -> Result<Psi> {
    self::check_delete(element)?;
    self::ensure_form(new_element)?;

    let syn = element.syntax();
    let parent = match syn.parent() {
        Some(parent) => parent,
        None => return Err(PsiError::incorrect("cannot replace a detached element")),
    };

    let node = self::detached_copy(new_element);
    let index = syn.index();
    log::debug!(
        "replacing {} with {}",
        element.type_name(),
        new_element.type_name()
    );
    parent.splice_children(index..index + 1, vec![node.clone().into()]);
    self::commit(element);

    Ok(element.raw().wrap(node))
}
