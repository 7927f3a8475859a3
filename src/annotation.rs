//! Annotation layer: units, relations, schemas, and the documents that own them.
//!
//! This is the "source of truth" layer that a corpus loader populates and
//! that downstream consumers read back. The graph layer
//! ([`crate::graph::DiscourseGraph`]) is built *from* a document and keeps
//! its own copy, so transforms such as CDU elimination rewrite both layers
//! in lockstep without touching the caller's data.
//!
//! Three annotation shapes exist:
//!
//! - [`Unit`]: a typed span of text (EDUs, but also turns, dialogues, ...)
//! - [`Relation`]: a directed, typed link between two annotations
//! - [`Schema`]: a typed grouping of annotations (CDUs, among others)
//!
//! Annotations reference each other by local id (`"e1"`, `"r3"`, `"c2"`).
//! Nothing here parses a corpus file format; documents are built in memory.

use crate::span::TextSpan;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A typed annotation over a contiguous span of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Local id, unique within the document (e.g. `"e1"`).
    pub id: String,
    /// Domain type label (e.g. `"Segment"`, `"Turn"`).
    pub unit_type: String,
    /// Character span this unit covers.
    pub span: TextSpan,
    /// Free-form feature annotations (e.g. `Emitter` on a turn).
    #[serde(default)]
    pub features: HashMap<String, String>,
}

impl Unit {
    /// Create a unit annotation.
    #[must_use]
    pub fn new(id: impl Into<String>, unit_type: impl Into<String>, span: TextSpan) -> Self {
        Self {
            id: id.into(),
            unit_type: unit_type.into(),
            span,
            features: HashMap::new(),
        }
    }

    /// Attach a feature key/value pair.
    #[must_use]
    pub fn with_feature(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.features.insert(key.into(), value.into());
        self
    }
}

/// The id-pair descriptor a relation carries: which annotation it points
/// from and which it points to.
///
/// Kept separately from [`Relation::source`]/[`Relation::target`] because
/// graph contraction recomputes it from the *replacement* endpoints when a
/// relation is redirected away from an eliminated CDU.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelSpan {
    /// Local id of the source annotation.
    pub source: String,
    /// Local id of the target annotation.
    pub target: String,
}

impl RelSpan {
    /// Create a relation span descriptor.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A directed, typed link between exactly two annotations.
///
/// Endpoint 0 (`source`) is the governor; endpoint 1 (`target`) is the
/// dependent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Local id, unique within the document (e.g. `"r1"`).
    pub id: String,
    /// Relation type label (e.g. `"Elaboration"`).
    pub rel_type: String,
    /// Local id of the source annotation.
    pub source: String,
    /// Local id of the target annotation.
    pub target: String,
    /// Source/target id-pair descriptor; recomputed on contraction.
    pub span: RelSpan,
    /// Free-form feature annotations.
    #[serde(default)]
    pub features: HashMap<String, String>,
}

impl Relation {
    /// Create a relation between two annotations, identified by local id.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        rel_type: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: id.into(),
            rel_type: rel_type.into(),
            span: RelSpan::new(source.clone(), target.clone()),
            source,
            target,
            features: HashMap::new(),
        }
    }

    /// Attach a feature key/value pair.
    #[must_use]
    pub fn with_feature(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.features.insert(key.into(), value.into());
        self
    }
}

/// A typed grouping of annotations, referenced by local id.
///
/// A schema whose type is CDU-classified groups discourse units so that
/// they can act as a single argument to a relation. Members may be units,
/// relations, or other schemas; an empty member list is an annotation
/// error that the algorithms tolerate rather than reject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Local id, unique within the document (e.g. `"c1"`).
    pub id: String,
    /// Domain type label (e.g. `"Complex_discourse_unit"`).
    pub schema_type: String,
    /// Local ids of the member annotations.
    pub members: Vec<String>,
    /// Free-form feature annotations.
    #[serde(default)]
    pub features: HashMap<String, String>,
}

impl Schema {
    /// Create a schema grouping the given member annotations.
    #[must_use]
    pub fn new<I, S>(id: impl Into<String>, schema_type: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            schema_type: schema_type.into(),
            members: members.into_iter().map(Into::into).collect(),
            features: HashMap::new(),
        }
    }
}

/// An annotated document: the flat collections a corpus loader fills in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Span annotations.
    #[serde(default)]
    pub units: Vec<Unit>,
    /// Directed links.
    #[serde(default)]
    pub relations: Vec<Relation>,
    /// Grouping annotations.
    #[serde(default)]
    pub schemas: Vec<Schema>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit annotation.
    #[must_use]
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    /// Add a relation annotation.
    #[must_use]
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Add a schema annotation.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Look up a unit by local id.
    #[must_use]
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Look up a relation by local id.
    #[must_use]
    pub fn relation(&self, id: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.id == id)
    }

    /// Look up a schema by local id.
    #[must_use]
    pub fn schema(&self, id: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.id == id)
    }
}
