use serde::{Deserialize, Serialize};

use crate::words::count_words;

/// Where the inserted text of a change came from.
///
/// Only an explicit paste tag counts as pasted. Everything else the host
/// reports, programmatic edits included, counts as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Typed,
    Pasted,
}

/// One change record: the text inserted at some position.
/// Deletions carry an empty `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    #[serde(default)]
    pub text: String,
}

impl Change {
    pub fn typed(text: impl Into<String>) -> Self {
        Change {
            kind: ChangeKind::Typed,
            text: text.into(),
        }
    }

    pub fn pasted(text: impl Into<String>) -> Self {
        Change {
            kind: ChangeKind::Pasted,
            text: text.into(),
        }
    }
}

/// One edit transaction as delivered by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default = "default_doc_changed")]
    pub doc_changed: bool,
    #[serde(default)]
    pub changes: Vec<Change>,
}

fn default_doc_changed() -> bool {
    true
}

impl Transaction {
    pub fn new(changes: Vec<Change>) -> Self {
        Transaction {
            doc_changed: true,
            changes,
        }
    }
}

/// Words contributed by one transaction, split by provenance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditCounts {
    pub typed: u64,
    pub pasted: u64,
}

impl EditCounts {
    pub fn is_empty(&self) -> bool {
        self.typed == 0 && self.pasted == 0
    }
}

/// Sums the words in each change into the typed or pasted bucket.
///
/// Each record is judged on its own tag, so a multi-cursor edit where one
/// cursor pastes and another types lands in both buckets. Returns `None`
/// when the transaction adds no words at all.
pub fn classify(tx: &Transaction) -> Option<EditCounts> {
    let mut counts = EditCounts::default();

    for change in &tx.changes {
        if change.text.is_empty() {
            continue;
        }
        let words = count_words(&change.text);
        match change.kind {
            ChangeKind::Typed => counts.typed += words,
            ChangeKind::Pasted => counts.pasted += words,
        }
    }

    if counts.is_empty() {
        None
    } else {
        Some(counts)
    }
}
