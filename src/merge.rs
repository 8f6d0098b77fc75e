//! Type merging
//!
//! Combines two structural descriptions of the same named element into one
//! description consistent with both. Merging only generalizes: occurrence
//! bounds widen, leaf types climb the lattice, attribute requiredness can only
//! be lost. The merge is commutative and associative in the occurrence bounds;
//! child ordering keeps the first-seen order of the left-hand side.

use crate::error::Anomaly;
use crate::model::{AttributeSpec, ComplexSpec, ElementKind, ElementSpec};

/// Merge an observed element spec into an existing one.
///
/// With no existing spec the observation becomes the baseline. A simple/
/// complex kind conflict is resolved in favor of the complex side and recorded
/// as a non-fatal [`Anomaly::TypeConflict`]; the simple side then counts as an
/// observation with no children and no attributes, so the surviving children
/// become optional.
pub fn merge_element(
    existing: Option<ElementSpec>,
    observed: ElementSpec,
    anomalies: &mut Vec<Anomaly>,
) -> ElementSpec {
    let Some(existing) = existing else {
        return observed;
    };

    let name = existing.name;
    let occurs = existing.occurs.merge(observed.occurs);
    let recursive = existing.recursive || observed.recursive;

    // A truncated back-reference carries no content observation; keep the
    // other side's kind untouched.
    if existing.recursive && matches!(existing.kind, ElementKind::Complex(ref c) if c.is_empty()) {
        return ElementSpec {
            name,
            occurs,
            kind: observed.kind,
            recursive,
        };
    }
    if observed.recursive && matches!(observed.kind, ElementKind::Complex(ref c) if c.is_empty()) {
        return ElementSpec {
            name,
            occurs,
            kind: existing.kind,
            recursive,
        };
    }

    let kind = match (existing.kind, observed.kind) {
        (ElementKind::Simple(a), ElementKind::Simple(b)) => ElementKind::Simple(a.widen(b)),
        (ElementKind::Complex(a), ElementKind::Complex(b)) => {
            ElementKind::Complex(merge_complex(a, b, anomalies))
        }
        (ElementKind::Simple(_), ElementKind::Complex(content))
        | (ElementKind::Complex(content), ElementKind::Simple(_)) => {
            anomalies.push(Anomaly::TypeConflict {
                element: name.clone(),
            });
            ElementKind::Complex(demote_to_optional(content))
        }
    };

    ElementSpec {
        name,
        occurs,
        kind,
        recursive,
    }
}

/// Merge two content models of the same element name.
///
/// Children and attributes present on both sides are merged pairwise; a child
/// present on only one side keeps its spec with its minimum forced to zero,
/// and an attribute present on only one side loses its required flag.
pub fn merge_complex(
    mut left: ComplexSpec,
    right: ComplexSpec,
    anomalies: &mut Vec<Anomaly>,
) -> ComplexSpec {
    let mut seen_in_right: Vec<String> = Vec::with_capacity(right.children.len());

    for child in right.children {
        seen_in_right.push(child.name.clone());
        match left.children.iter().position(|c| c.name == child.name) {
            Some(idx) => {
                let existing = left.children.remove(idx);
                let merged = merge_element(Some(existing), child, anomalies);
                left.children.insert(idx, merged);
            }
            None => {
                // The left side never saw this child.
                let mut child = child;
                child.occurs.observe_absent();
                left.children.push(child);
            }
        }
    }
    for child in &mut left.children {
        if !seen_in_right.iter().any(|n| n == &child.name) {
            child.occurs.observe_absent();
        }
    }

    let mut seen_attrs: Vec<String> = Vec::with_capacity(right.attributes.len());
    for attr in right.attributes {
        seen_attrs.push(attr.name.clone());
        match left.attributes.iter_mut().find(|a| a.name == attr.name) {
            Some(existing) => {
                existing.required = existing.required && attr.required;
                existing.leaf = existing.leaf.widen(attr.leaf);
            }
            None => {
                left.attributes.push(AttributeSpec {
                    required: false,
                    ..attr
                });
            }
        }
    }
    for attr in &mut left.attributes {
        if !seen_attrs.iter().any(|n| n == &attr.name) {
            attr.required = false;
        }
    }

    left
}

/// Apply the effect of merging with an observation that had no content at
/// all: every child becomes optional and every attribute loses its required
/// flag.
fn demote_to_optional(mut content: ComplexSpec) -> ComplexSpec {
    for child in &mut content.children {
        child.occurs.observe_absent();
    }
    for attr in &mut content.attributes {
        attr.required = false;
    }
    content
}
