//! Expression evaluation against searchable documents.

use std::{borrow::Cow, collections::BTreeSet, iter};

use tally_query::Expr;

use crate::document::{Field, SearchableDocument};

/// Lower-cases `text` only when lower-casing changes some character.
///
/// Titlecase letters such as `ǅ` are not upper-case but still fold.
fn fold(text: &str) -> Cow<'_, str> {
    if text.chars().any(|c| c.to_lowercase().ne(iter::once(c))) {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}

/// Evaluates `expr` against `doc`.
///
/// A term matches when it is a case-insensitive substring of any fragment in the document.
/// Callers evaluating one expression against many documents should pass an expression
/// produced by [`Expr::fold_case`] so that terms are not re-folded per document.
pub fn evaluate(expr: &Expr, doc: &SearchableDocument<'_>) -> bool {
    match expr {
        Expr::MatchAll => true,
        Expr::Term(text) => doc.contains(&fold(text)),
        Expr::And(left, right) => evaluate(left, doc) && evaluate(right, doc),
        Expr::Or(left, right) => evaluate(left, doc) || evaluate(right, doc),
        Expr::Not(inner) => !evaluate(inner, doc),
    }
}

/// Returns the fields whose fragments contain any non-negated term of `expr`.
///
/// Used to explain why a transaction matched. Empty terms name no field.
pub fn matched_fields(expr: &Expr, doc: &SearchableDocument<'_>) -> BTreeSet<Field> {
    let mut fields = BTreeSet::new();

    for term in expr.terms() {
        let needle = fold(term);
        if needle.is_empty() {
            continue;
        }
        fields.extend(
            doc.fragments()
                .iter()
                .filter(|fragment| fragment.contains(&needle))
                .map(|fragment| fragment.field),
        );
    }

    fields
}
