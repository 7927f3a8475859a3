//! Hypergraph view of an annotated document.
//!
//! EDUs are nodes, discourse relations are binary edges, and CDUs are
//! grouping hyperedges. Every relation and every schema additionally gets a
//! *mirror node*, so that a CDU (or even a relation) can itself be the
//! endpoint of a further relation or the member of another CDU. The mirror
//! mapping is a bijection: both identities denote the same semantic object.
//!
//! ```text
//!   Document                      DiscourseGraph
//!   ────────                      ──────────────
//!   Unit   "e1" ───────────────▶  node(Edu)
//!   Unit   "e2" ───────────────▶  node(Edu)
//!   Relation "r1" e1→e2 ───────▶  edge(Relation) + mirror node
//!   Schema "c1" {e1,e2} ───────▶  hyperedge(Cdu) + mirror node
//! ```
//!
//! The graph owns its own copy of the document, so derived transforms
//! (notably [`DiscourseGraph::without_cdus`]) can rewrite both layers
//! without mutating anything the caller holds.
//!
//! Identifiers ([`NodeId`], [`EdgeId`]) are arena indices scoped to the
//! graph that produced them.

mod contract;
mod frontier;
mod head;

use crate::annotation::{Document, Relation, Schema, Unit};
use crate::classify::{DomainTags, Kind};
use crate::error::{Error, Result};
use crate::span::TextSpan;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Identifier of a node, scoped to the graph that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Identifier of an edge or hyperedge, scoped to the graph that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

/// A discourse unit reference carrying a CDU's two identities.
///
/// A CDU can be named either by its mirror node or by its membership
/// hyperedge; algorithms must treat the two as interchangeable. Carrying
/// both in one tagged value avoids identity juggling at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuRef {
    /// An elementary (or otherwise plain) unit, by node.
    Unit(NodeId),
    /// A complex discourse unit, by both of its identities.
    Cdu {
        /// The CDU's mirror node.
        node: NodeId,
        /// The CDU's membership hyperedge.
        edge: EdgeId,
    },
}

impl DuRef {
    /// The node-form identity of this unit.
    #[must_use]
    pub fn node(&self) -> NodeId {
        match *self {
            DuRef::Unit(n) => n,
            DuRef::Cdu { node, .. } => node,
        }
    }

    /// The edge-form identity, if this unit is a CDU.
    #[must_use]
    pub fn edge(&self) -> Option<EdgeId> {
        match *self {
            DuRef::Unit(_) => None,
            DuRef::Cdu { edge, .. } => Some(edge),
        }
    }
}

/// A borrowed view of the annotation behind a graph element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnnRef<'a> {
    /// A span annotation.
    Unit(&'a Unit),
    /// A directed link annotation.
    Relation(&'a Relation),
    /// A grouping annotation.
    Schema(&'a Schema),
}

impl<'a> AnnRef<'a> {
    /// The annotation's local id.
    #[must_use]
    pub fn local_id(&self) -> &'a str {
        match self {
            AnnRef::Unit(u) => &u.id,
            AnnRef::Relation(r) => &r.id,
            AnnRef::Schema(s) => &s.id,
        }
    }

    /// The annotation's domain type label.
    #[must_use]
    pub fn type_label(&self) -> &'a str {
        match self {
            AnnRef::Unit(u) => &u.unit_type,
            AnnRef::Relation(r) => &r.rel_type,
            AnnRef::Schema(s) => &s.schema_type,
        }
    }
}

/// Which document collection an element's annotation lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnnIdx {
    Unit(usize),
    Relation(usize),
    Schema(usize),
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    kind: Kind,
    ann: AnnIdx,
    /// Mirror hyperedge, present for relation and schema nodes.
    mirror: Option<EdgeId>,
}

#[derive(Debug, Clone, PartialEq)]
enum EdgePayload {
    /// Binary link: endpoint 0 is the source, endpoint 1 the target.
    Relation { source: NodeId, target: NodeId },
    /// Unordered membership hyperedge.
    Schema { members: Vec<NodeId> },
}

#[derive(Debug, Clone, PartialEq)]
struct Edge {
    kind: Kind,
    ann: AnnIdx,
    mirror: NodeId,
    payload: EdgePayload,
    /// Free-form attributes, preserved verbatim when contraction deletes
    /// and recreates an edge.
    properties: HashMap<String, Value>,
}

/// A discourse hypergraph over an annotated document.
///
/// Built once from a [`Document`] plus a [`DomainTags`] taxonomy; all
/// queries are pure functions of the snapshot taken at build time. Arena
/// slots are tombstoned on deletion, so identifiers stay stable across
/// contraction.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscourseGraph {
    pub(crate) doc: Document,
    pub(crate) tags: DomainTags,
    nodes: Vec<Option<Node>>,
    edges: Vec<Option<Edge>>,
    by_id: HashMap<String, NodeId>,
}

impl DiscourseGraph {
    /// Build a hypergraph from a document.
    ///
    /// The graph takes ownership of (a copy of) the document; the caller's
    /// data is never mutated by any later transform.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateId`] if two annotations share a local id;
    /// [`Error::DanglingReference`] if a relation endpoint or schema member
    /// names an id that does not exist.
    pub fn from_document(doc: Document, tags: DomainTags) -> Result<Self> {
        let mut nodes: Vec<Option<Node>> = Vec::new();
        let mut by_id: HashMap<String, NodeId> = HashMap::new();

        fn add_node(
            id: &str,
            node: Node,
            by_id: &mut HashMap<String, NodeId>,
            nodes: &mut Vec<Option<Node>>,
        ) -> Result<NodeId> {
            let nid = NodeId(nodes.len());
            if by_id.insert(id.to_owned(), nid).is_some() {
                return Err(Error::duplicate_id(id));
            }
            nodes.push(Some(node));
            Ok(nid)
        }

        for (i, u) in doc.units.iter().enumerate() {
            let kind = if tags.is_edu_type(&u.unit_type) {
                Kind::Edu
            } else {
                Kind::Other
            };
            add_node(
                &u.id,
                Node {
                    kind,
                    ann: AnnIdx::Unit(i),
                    mirror: None,
                },
                &mut by_id,
                &mut nodes,
            )?;
        }
        for (i, r) in doc.relations.iter().enumerate() {
            let kind = if tags.is_relation_type(&r.rel_type) {
                Kind::Relation
            } else {
                Kind::Other
            };
            add_node(
                &r.id,
                Node {
                    kind,
                    ann: AnnIdx::Relation(i),
                    mirror: None,
                },
                &mut by_id,
                &mut nodes,
            )?;
        }
        for (i, s) in doc.schemas.iter().enumerate() {
            let kind = if tags.is_cdu_type(&s.schema_type) {
                Kind::Cdu
            } else {
                Kind::Other
            };
            add_node(
                &s.id,
                Node {
                    kind,
                    ann: AnnIdx::Schema(i),
                    mirror: None,
                },
                &mut by_id,
                &mut nodes,
            )?;
        }

        // Second pass: edges, now that every endpoint id resolves.
        let mut edges: Vec<Option<Edge>> = Vec::new();
        let resolve = |referer: &str, referent: &str| -> Result<NodeId> {
            by_id
                .get(referent)
                .copied()
                .ok_or_else(|| Error::dangling_reference(referer, referent))
        };

        for (i, r) in doc.relations.iter().enumerate() {
            let source = resolve(&r.id, &r.source)?;
            let target = resolve(&r.id, &r.target)?;
            let mirror = by_id[&r.id];
            let eid = EdgeId(edges.len());
            let kind = nodes[mirror.0].as_ref().map_or(Kind::Other, |n| n.kind);
            let mut properties = HashMap::new();
            properties.insert("type".to_owned(), Value::String(r.rel_type.clone()));
            edges.push(Some(Edge {
                kind,
                ann: AnnIdx::Relation(i),
                mirror,
                payload: EdgePayload::Relation { source, target },
                properties,
            }));
            if let Some(n) = nodes[mirror.0].as_mut() {
                n.mirror = Some(eid);
            }
        }
        for (i, s) in doc.schemas.iter().enumerate() {
            let members = s
                .members
                .iter()
                .map(|m| resolve(&s.id, m))
                .collect::<Result<Vec<_>>>()?;
            let mirror = by_id[&s.id];
            let eid = EdgeId(edges.len());
            let kind = nodes[mirror.0].as_ref().map_or(Kind::Other, |n| n.kind);
            let mut properties = HashMap::new();
            properties.insert("type".to_owned(), Value::String(s.schema_type.clone()));
            edges.push(Some(Edge {
                kind,
                ann: AnnIdx::Schema(i),
                mirror,
                payload: EdgePayload::Schema { members },
                properties,
            }));
            if let Some(n) = nodes[mirror.0].as_mut() {
                n.mirror = Some(eid);
            }
        }

        Ok(Self {
            doc,
            tags,
            nodes,
            edges,
            by_id,
        })
    }

    /// The taxonomy this graph was classified with.
    #[must_use]
    pub fn tags(&self) -> &DomainTags {
        &self.tags
    }

    /// The document backing this graph.
    #[must_use]
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    // ------------------------------------------------------------------
    // element iteration
    // ------------------------------------------------------------------

    /// All live nodes.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| NodeId(i)))
    }

    /// All live edges and hyperedges.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| EdgeId(i)))
    }

    /// Nodes classified as elementary discourse units.
    pub fn edus(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().filter(move |&n| self.kind(n) == Kind::Edu)
    }

    /// Hyperedges classified as complex discourse units.
    pub fn cdus(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges().filter(move |&e| self.edge_kind(e) == Kind::Cdu)
    }

    /// Edges classified as discourse relation instances.
    pub fn relations(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges()
            .filter(move |&e| self.edge_kind(e) == Kind::Relation)
    }

    // ------------------------------------------------------------------
    // classification
    // ------------------------------------------------------------------

    /// Classification of a node. Deleted nodes report [`Kind::Other`].
    #[must_use]
    pub fn kind(&self, n: NodeId) -> Kind {
        self.nodes
            .get(n.0)
            .and_then(Option::as_ref)
            .map_or(Kind::Other, |node| node.kind)
    }

    /// Classification of an edge. Deleted edges report [`Kind::Other`].
    #[must_use]
    pub fn edge_kind(&self, e: EdgeId) -> Kind {
        self.edges
            .get(e.0)
            .and_then(Option::as_ref)
            .map_or(Kind::Other, |edge| edge.kind)
    }

    /// Is this node an elementary discourse unit?
    #[must_use]
    pub fn is_edu(&self, n: NodeId) -> bool {
        self.kind(n) == Kind::Edu
    }

    /// Is this node the mirror of a complex discourse unit?
    #[must_use]
    pub fn is_cdu(&self, n: NodeId) -> bool {
        self.kind(n) == Kind::Cdu
    }

    /// Is this edge a discourse relation instance?
    #[must_use]
    pub fn is_relation(&self, e: EdgeId) -> bool {
        self.edge_kind(e) == Kind::Relation
    }

    // ------------------------------------------------------------------
    // connection
    // ------------------------------------------------------------------

    /// Source and target of a binary relation edge, in that order.
    #[must_use]
    pub fn endpoints(&self, e: EdgeId) -> Option<(NodeId, NodeId)> {
        let edge = self.edges.get(e.0)?.as_ref()?;
        match edge.payload {
            EdgePayload::Relation { source, target } => Some((source, target)),
            EdgePayload::Schema { .. } => None,
        }
    }

    /// Endpoint list of an edge: `[source, target]` for a relation, the
    /// member list for a hyperedge.
    #[must_use]
    pub fn links(&self, e: EdgeId) -> Vec<NodeId> {
        match self.edges.get(e.0).and_then(Option::as_ref) {
            Some(edge) => match &edge.payload {
                EdgePayload::Relation { source, target } => vec![*source, *target],
                EdgePayload::Schema { members } => members.clone(),
            },
            None => Vec::new(),
        }
    }

    /// Members of a hyperedge. Empty for relations and deleted edges.
    #[must_use]
    pub fn members(&self, e: EdgeId) -> &[NodeId] {
        match self.edges.get(e.0).and_then(Option::as_ref) {
            Some(Edge {
                payload: EdgePayload::Schema { members },
                ..
            }) => members,
            _ => &[],
        }
    }

    /// Transitive member closure of a hyperedge: members, members of
    /// member CDUs, and so on. Each node appears once; safe on cyclic
    /// membership.
    #[must_use]
    pub fn members_deep(&self, e: EdgeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect_members(e, &mut out, &mut seen);
        out
    }

    fn collect_members(&self, e: EdgeId, out: &mut Vec<NodeId>, seen: &mut HashSet<NodeId>) {
        for &m in self.members(e) {
            if !seen.insert(m) {
                continue;
            }
            out.push(m);
            if let Some(sub) = self.mirror_edge(m) {
                if self.edge_kind(sub) == Kind::Cdu {
                    self.collect_members(sub, out, seen);
                }
            }
        }
    }

    /// Edges and hyperedges incident to a node: relations it is an
    /// endpoint of, plus hyperedges it is a member of.
    #[must_use]
    pub fn incident(&self, n: NodeId) -> Vec<EdgeId> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let edge = slot.as_ref()?;
                let touches = match &edge.payload {
                    EdgePayload::Relation { source, target } => *source == n || *target == n,
                    EdgePayload::Schema { members } => members.contains(&n),
                };
                touches.then_some(EdgeId(i))
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // mirror mapping
    // ------------------------------------------------------------------

    /// The mirror node of an edge or hyperedge.
    #[must_use]
    pub fn mirror_node(&self, e: EdgeId) -> Option<NodeId> {
        self.edges
            .get(e.0)
            .and_then(Option::as_ref)
            .map(|edge| edge.mirror)
    }

    /// The mirror edge of a node, if the node stands for a relation or a
    /// schema.
    #[must_use]
    pub fn mirror_edge(&self, n: NodeId) -> Option<EdgeId> {
        self.nodes
            .get(n.0)
            .and_then(Option::as_ref)
            .and_then(|node| node.mirror)
    }

    /// Both identities of a CDU hyperedge as a [`DuRef`].
    #[must_use]
    pub fn cdu_ref(&self, e: EdgeId) -> Option<DuRef> {
        let node = self.mirror_node(e)?;
        (self.edge_kind(e) == Kind::Cdu).then_some(DuRef::Cdu { node, edge: e })
    }

    /// Normalize a unit reference to the edge-form of a CDU, if it is one.
    pub(crate) fn as_cdu_edge(&self, du: DuRef) -> Option<EdgeId> {
        match du {
            DuRef::Cdu { edge, .. } => Some(edge),
            DuRef::Unit(n) => match self.mirror_edge(n) {
                Some(e) if self.edge_kind(e) == Kind::Cdu => Some(e),
                _ => None,
            },
        }
    }

    /// Wrap a node as a [`DuRef`], attaching the edge identity when the
    /// node mirrors a CDU.
    pub(crate) fn du_ref_of_node(&self, n: NodeId) -> DuRef {
        match self.mirror_edge(n) {
            Some(e) if self.edge_kind(e) == Kind::Cdu => DuRef::Cdu { node: n, edge: e },
            _ => DuRef::Unit(n),
        }
    }

    // ------------------------------------------------------------------
    // annotation access
    // ------------------------------------------------------------------

    /// Look up a node by its annotation's local id.
    #[must_use]
    pub fn node_of(&self, id: &str) -> Option<NodeId> {
        let n = self.by_id.get(id).copied()?;
        self.nodes.get(n.0).and_then(Option::as_ref).map(|_| n)
    }

    /// Look up the edge-form of a relation or schema by local id.
    #[must_use]
    pub fn edge_of(&self, id: &str) -> Option<EdgeId> {
        self.mirror_edge(self.node_of(id)?)
    }

    /// Look up a discourse unit by local id, as a [`DuRef`].
    #[must_use]
    pub fn du(&self, id: &str) -> Option<DuRef> {
        Some(self.du_ref_of_node(self.node_of(id)?))
    }

    /// The annotation behind a node.
    #[must_use]
    pub fn annotation(&self, n: NodeId) -> Option<AnnRef<'_>> {
        let node = self.nodes.get(n.0)?.as_ref()?;
        Some(self.resolve_ann(node.ann))
    }

    /// The annotation behind an edge.
    #[must_use]
    pub fn edge_annotation(&self, e: EdgeId) -> Option<AnnRef<'_>> {
        let edge = self.edges.get(e.0)?.as_ref()?;
        Some(self.resolve_ann(edge.ann))
    }

    /// Free-form attributes of an edge.
    #[must_use]
    pub fn edge_properties(&self, e: EdgeId) -> Option<&HashMap<String, Value>> {
        self.edges
            .get(e.0)
            .and_then(Option::as_ref)
            .map(|edge| &edge.properties)
    }

    fn resolve_ann(&self, ann: AnnIdx) -> AnnRef<'_> {
        match ann {
            AnnIdx::Unit(i) => AnnRef::Unit(&self.doc.units[i]),
            AnnIdx::Relation(i) => AnnRef::Relation(&self.doc.relations[i]),
            AnnIdx::Schema(i) => AnnRef::Schema(&self.doc.schemas[i]),
        }
    }

    pub(crate) fn node_label(&self, n: NodeId) -> String {
        self.annotation(n)
            .map_or_else(String::new, |a| a.local_id().to_owned())
    }

    pub(crate) fn edge_label(&self, e: EdgeId) -> String {
        self.edge_annotation(e)
            .map_or_else(String::new, |a| a.local_id().to_owned())
    }

    /// Text span of a node: a unit's own span, or for relation and schema
    /// nodes the merge of the spans of everything they connect. `None` for
    /// a memberless schema (an empty CDU has no position in the text).
    #[must_use]
    pub fn span_of(&self, n: NodeId) -> Option<TextSpan> {
        self.span_of_inner(n, &mut HashSet::new())
    }

    fn span_of_inner(&self, n: NodeId, visited: &mut HashSet<NodeId>) -> Option<TextSpan> {
        if !visited.insert(n) {
            return None;
        }
        let node = self.nodes.get(n.0)?.as_ref()?;
        match node.ann {
            AnnIdx::Unit(i) => Some(self.doc.units[i].span),
            AnnIdx::Relation(_) | AnnIdx::Schema(_) => {
                let e = node.mirror?;
                self.links(e)
                    .into_iter()
                    .filter_map(|k| self.span_of_inner(k, visited))
                    .reduce(|a, b| a.merge(&b))
            }
        }
    }

    // ------------------------------------------------------------------
    // mutation (contraction only)
    // ------------------------------------------------------------------

    /// Replace a relation edge's endpoints in place, preserving its
    /// identifier, annotation link, and attributes.
    pub(crate) fn rewrite_relation(&mut self, e: EdgeId, source: NodeId, target: NodeId) {
        if let Some(mut edge) = self.edges[e.0].take() {
            edge.payload = EdgePayload::Relation { source, target };
            self.edges[e.0] = Some(edge);
        }
    }

    /// Delete a CDU hyperedge together with its mirror node.
    pub(crate) fn remove_cdu(&mut self, e: EdgeId) {
        let Some(mirror) = self.mirror_node(e) else {
            return;
        };
        let id = self.edge_label(e);
        self.by_id.remove(&id);
        self.nodes[mirror.0] = None;
        self.edges[e.0] = None;
    }
}
