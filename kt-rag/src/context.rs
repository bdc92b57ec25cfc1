//! Context assembly from query matches and from the full corpus.

use std::collections::HashSet;

use crate::document::{QueryMatch, StoredDocument};

/// Build a context string from similarity matches.
///
/// Matches arrive ordered by descending similarity; only the first match
/// per source document is kept, so a document that matched with several
/// chunks contributes one block (its highest-ranked chunk). Blocks keep
/// similarity order and are separated by blank lines.
pub fn build_context(matches: &[QueryMatch]) -> String {
    let mut seen_docs = HashSet::new();
    let mut parts = Vec::new();

    for m in matches {
        if seen_docs.insert(m.metadata.doc_id.as_str()) {
            parts.push(format!("From {}:\n{}", m.metadata.filename, m.metadata.snippet));
        }
    }

    parts.join("\n\n")
}

/// Build the full-corpus fallback context for a team.
///
/// Concatenates every document's full content in arrival order, each under
/// a header and followed by its stored summary when present. Imprecise and
/// potentially large, but it keeps questions answerable when the vector
/// backend is down; the assistant bounds the total length before handing it
/// to generation.
pub fn fallback_context(documents: &[StoredDocument]) -> String {
    let mut context = String::new();
    for doc in documents {
        context.push_str(&format!("\n\n--- Document: {} ---\n", doc.filename));
        context.push_str(&doc.content);
        if let Some(summary) = &doc.summary {
            context.push_str(&format!("\nSummary: {summary}\n"));
        }
    }
    context
}
