//! Domain classification: which annotation types count as discourse objects.
//!
//! The hypergraph substrate only knows *structural* categories (a node, a
//! binary edge, a grouping hyperedge). Whether a given element is an EDU, a
//! CDU, or a discourse relation instance additionally depends on its domain
//! type label, and that taxonomy varies by corpus. [`DomainTags`] carries
//! the taxonomy as injected configuration; the graph builder consults it
//! once per element and stores the verdict as a [`Kind`] discriminator, so
//! algorithms never re-derive classification at each call site.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Structural-plus-domain classification of a graph element, computed once
/// when the graph is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Elementary discourse unit: an EDU-typed span annotation.
    Edu,
    /// Complex discourse unit: a CDU-typed grouping annotation.
    Cdu,
    /// Discourse relation instance: a relation with a known relation label.
    Relation,
    /// Anything else (turns, dialogues, unregistered types, ...).
    Other,
}

impl Kind {
    /// Human-readable label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::Edu => "edu",
            Kind::Cdu => "cdu",
            Kind::Relation => "relation",
            Kind::Other => "other",
        }
    }
}

/// The domain type taxonomy: which unit types are EDUs, which schema types
/// are CDUs, which relation labels exist, and which of those subordinate.
///
/// Build one with the `with_*` methods, or start from [`DomainTags::stac`]
/// for the STAC multiparty-chat conventions.
///
/// # Example
///
/// ```rust
/// use discograph::DomainTags;
///
/// let tags = DomainTags::new()
///     .with_edu_type("Segment")
///     .with_cdu_type("Complex_discourse_unit")
///     .with_relation_type("Elaboration", true)
///     .with_relation_type("Contrast", false);
///
/// assert!(tags.is_subordinating("Elaboration"));
/// assert!(!tags.is_subordinating("Contrast"));
/// assert!(tags.is_relation_type("Contrast"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainTags {
    edu_types: HashSet<String>,
    cdu_types: HashSet<String>,
    relation_types: HashSet<String>,
    subordinating: HashSet<String>,
}

/// Unit types the STAC corpus treats as elementary discourse units.
/// `Segment` is the discourse-side type; the rest are dialogue acts from
/// the unit-level annotation pass.
const STAC_EDU_TYPES: &[&str] = &["Segment", "Offer", "Counteroffer", "Accept", "Refusal", "Other"];

/// The single STAC schema type denoting a complex discourse unit.
const STAC_CDU_TYPES: &[&str] = &["Complex_discourse_unit"];

/// STAC relation labels that subordinate their target.
const STAC_SUBORDINATING: &[&str] = &[
    "Explanation",
    "Background",
    "Elaboration",
    "Correction",
    "Q-Elab",
    "Comment",
    "Question-answer_pair",
    "Clarification_question",
    "Acknowledgement",
];

/// STAC relation labels that coordinate.
const STAC_COORDINATING: &[&str] = &[
    "Result",
    "Narration",
    "Continuation",
    "Contrast",
    "Parallel",
    "Conditional",
    "Alternation",
];

static STAC: Lazy<DomainTags> = Lazy::new(|| {
    let mut tags = DomainTags::new();
    for t in STAC_EDU_TYPES {
        tags = tags.with_edu_type(*t);
    }
    for t in STAC_CDU_TYPES {
        tags = tags.with_cdu_type(*t);
    }
    for t in STAC_SUBORDINATING {
        tags = tags.with_relation_type(*t, true);
    }
    for t in STAC_COORDINATING {
        tags = tags.with_relation_type(*t, false);
    }
    tags
});

impl DomainTags {
    /// Create an empty taxonomy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The STAC conventions: `Segment` EDUs, `Complex_discourse_unit`
    /// CDUs, and the fixed subordinating/coordinating relation inventory.
    #[must_use]
    pub fn stac() -> Self {
        STAC.clone()
    }

    /// Register a unit type as elementary discourse unit.
    #[must_use]
    pub fn with_edu_type(mut self, label: impl Into<String>) -> Self {
        self.edu_types.insert(label.into());
        self
    }

    /// Register a schema type as complex discourse unit.
    #[must_use]
    pub fn with_cdu_type(mut self, label: impl Into<String>) -> Self {
        self.cdu_types.insert(label.into());
        self
    }

    /// Register a relation label, marking whether it subordinates.
    #[must_use]
    pub fn with_relation_type(mut self, label: impl Into<String>, subordinating: bool) -> Self {
        let label = label.into();
        if subordinating {
            self.subordinating.insert(label.clone());
        }
        self.relation_types.insert(label);
        self
    }

    /// Is this unit type an EDU?
    #[must_use]
    pub fn is_edu_type(&self, label: &str) -> bool {
        self.edu_types.contains(label)
    }

    /// Is this schema type a CDU?
    #[must_use]
    pub fn is_cdu_type(&self, label: &str) -> bool {
        self.cdu_types.contains(label)
    }

    /// Is this a known discourse relation label?
    #[must_use]
    pub fn is_relation_type(&self, label: &str) -> bool {
        self.relation_types.contains(label)
    }

    /// Does this relation label subordinate its target?
    #[must_use]
    pub fn is_subordinating(&self, label: &str) -> bool {
        self.subordinating.contains(label)
    }
}
