//! # discograph
//!
//! Discourse structure as a hypergraph.
//!
//! An annotated dialogue is modelled with elementary discourse units
//! (EDUs) as nodes, discourse relations as directed binary edges, and
//! complex discourse units (CDUs) — groups of units acting as a single
//! argument to a relation — as hyperedges with a mirrored node identity.
//! On top of that substrate the crate implements the three algorithms a
//! discourse-structure toolchain actually needs:
//!
//! - **Head inference**: which member represents a CDU, resolved
//!   recursively through nested CDUs ([`DiscourseGraph::cdu_head`],
//!   [`DiscourseGraph::recursive_cdu_heads`]).
//! - **Graph contraction**: a derived graph with every CDU eliminated and
//!   every relation redirected to the CDU's recursive head, mirrored onto
//!   the backing annotation document ([`DiscourseGraph::without_cdus`]).
//! - **Right-frontier checking**: which relation instances attach to
//!   units no longer open on the dominance spine
//!   ([`DiscourseGraph::right_frontier_violations`]).
//!
//! The domain taxonomy (what counts as an EDU, a CDU, a subordinating
//! relation) is injected as a [`DomainTags`] value; [`DomainTags::stac`]
//! ships the STAC multiparty-chat conventions.
//!
//! ## Quick start
//!
//! ```rust
//! use discograph::{DiscourseGraph, Document, DomainTags, Relation, Schema, TextSpan, Unit};
//!
//! let tags = DomainTags::new()
//!     .with_edu_type("Segment")
//!     .with_cdu_type("Complex_discourse_unit")
//!     .with_relation_type("Elaboration", true)
//!     .with_relation_type("Contrast", false);
//!
//! let doc = Document::new()
//!     .with_unit(Unit::new("e1", "Segment", TextSpan::new(0, 5)))
//!     .with_unit(Unit::new("e2", "Segment", TextSpan::new(6, 10)))
//!     .with_relation(Relation::new("r1", "Elaboration", "e1", "e2"))
//!     .with_schema(Schema::new("c1", "Complex_discourse_unit", ["e1", "e2"]));
//!
//! let graph = DiscourseGraph::from_document(doc, tags)?;
//!
//! // e1 heads c1: it is the only member nothing else points to
//! let heads = graph.recursive_cdu_heads(false)?;
//! assert_eq!(heads.len(), 1);
//!
//! // contract away the CDU; the result contains elementary units only
//! let flat = graph.without_cdus(false)?;
//! assert_eq!(flat.cdus().count(), 0);
//! assert!(flat.doc().schemas.is_empty());
//! # Ok::<(), discograph::Error>(())
//! ```
//!
//! ## Design notes
//!
//! - All operations are pure functions of an immutable snapshot;
//!   contraction deep-copies the graph and its document before rewriting,
//!   so the caller's data is never mutated.
//! - A CDU's two identities (mirror node and membership hyperedge) travel
//!   together in a [`DuRef`], and all algorithms accept either form.
//! - Malformed-but-survivable annotations (an empty CDU) degrade to
//!   `None`/omission; ambiguity and structural inconsistency are typed
//!   errors ([`Error`]).

#![warn(missing_docs)]

mod annotation;
mod classify;
mod error;
pub mod graph;
mod span;

pub use annotation::{Document, RelSpan, Relation, Schema, Unit};
pub use classify::{DomainTags, Kind};
pub use error::{Error, Result};
pub use graph::{AnnRef, DiscourseGraph, DuRef, EdgeId, NodeId};
pub use span::TextSpan;

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use discograph::prelude::*;
    //!
    //! let doc = Document::new().with_unit(Unit::new("e1", "Segment", TextSpan::new(0, 4)));
    //! let graph = DiscourseGraph::from_document(doc, DomainTags::stac()).unwrap();
    //! assert_eq!(graph.edus().count(), 1);
    //! ```
    pub use crate::annotation::{Document, RelSpan, Relation, Schema, Unit};
    pub use crate::classify::{DomainTags, Kind};
    pub use crate::error::{Error, Result};
    pub use crate::graph::{AnnRef, DiscourseGraph, DuRef, EdgeId, NodeId};
    pub use crate::span::TextSpan;
}
