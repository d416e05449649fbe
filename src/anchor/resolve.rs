//! Selector resolution
//!
//! Re-locates the marker element a [`TextQuoteSelector`] designates inside a
//! (possibly re-fetched) annotated document. Matching relaxes in stages and
//! each stage runs only when the previous one failed to converge on exactly
//! one candidate:
//!
//! 1. exact flattened-text equality, cheapest and most precise;
//! 2. prefix/suffix context windows, narrowing ties without the false
//!    negatives whitespace drift would cause;
//! 3. whitespace-insensitive comparison, trading precision for recall — and
//!    only when strict matching found *nothing*, so a wrong near-duplicate
//!    is never silently picked over an ambiguous exact duplicate set.

use tracing::debug;

use crate::error::{AnchorError, Result};
use crate::selector::{Marker, TextQuoteSelector};
use crate::tree::{collect, DocTree, NodeId, TextMap};

/// Find the unique marker element the selector designates.
///
/// Returns [`AnchorError::NotFound`] when no stage converges, or
/// [`AnchorError::Ambiguous`] when exact matching finds several candidates
/// and context cannot narrow them to one.
pub fn resolve(tree: &DocTree, root: NodeId, selector: &TextQuoteSelector) -> Result<NodeId> {
    if selector.exact_match.is_empty() {
        return Err(AnchorError::NotFound {
            selector: selector.clone(),
        });
    }

    let markers = Marker::find_all(tree, root, &selector.types);
    debug!(markers = markers.len(), exact = %selector.exact_match, "resolving selector");

    let exact: Vec<NodeId> = markers
        .iter()
        .copied()
        .filter(|&m| collect(tree, m) == selector.exact_match)
        .collect();
    debug!(candidates = exact.len(), "exact stage");

    match exact.len() {
        1 => return Ok(exact[0]),
        0 => {}
        _ => {
            if selector.prefix.is_some() || selector.suffix.is_some() {
                let map = TextMap::build(tree, root);
                let narrowed: Vec<NodeId> = exact
                    .iter()
                    .copied()
                    .filter(|&m| context_matches(&map, m, selector))
                    .collect();
                debug!(candidates = narrowed.len(), "context stage");
                if narrowed.len() == 1 {
                    return Ok(narrowed[0]);
                }
                return Err(AnchorError::Ambiguous {
                    selector: selector.clone(),
                    count: if narrowed.is_empty() {
                        exact.len()
                    } else {
                        narrowed.len()
                    },
                });
            }
            return Err(AnchorError::Ambiguous {
                selector: selector.clone(),
                count: exact.len(),
            });
        }
    }

    // Strict matching found nothing: tolerate whitespace drift between the
    // capture and resolution renderings.
    let wanted = strip_whitespace(&selector.exact_match);
    let loose: Vec<NodeId> = markers
        .iter()
        .copied()
        .filter(|&m| strip_whitespace(&collect(tree, m)) == wanted)
        .collect();
    debug!(candidates = loose.len(), "loose stage");

    if loose.len() == 1 {
        return Ok(loose[0]);
    }
    Err(AnchorError::NotFound {
        selector: selector.clone(),
    })
}

/// Does the text around the candidate end with the prefix and start with the
/// suffix? A missing constraint always passes.
fn context_matches(map: &TextMap, candidate: NodeId, selector: &TextQuoteSelector) -> bool {
    let Some((start, end)) = map.interval(candidate) else {
        return false;
    };
    if let Some(prefix) = &selector.prefix {
        if !map.slice(0, start).ends_with(prefix.as_str()) {
            return false;
        }
    }
    if let Some(suffix) = &selector.suffix {
        if !map.slice(end, map.char_len()).starts_with(suffix.as_str()) {
            return false;
        }
    }
    true
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
