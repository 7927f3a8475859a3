//! CDU elimination: contract a graph down to elementary units.
//!
//! Produces a derived graph in which every relation endpoint that named a
//! CDU names that CDU's recursive head instead, and the CDUs themselves
//! are gone. Both layers are rewritten: the hypergraph, and the backing
//! annotation document that downstream consumers read independently.

use super::{AnnIdx, DiscourseGraph, EdgeId, NodeId};
use crate::annotation::RelSpan;
use crate::classify::Kind;
use crate::error::{Error, Result};
use std::collections::HashMap;

impl DiscourseGraph {
    /// A copy of this graph with all CDUs removed.
    ///
    /// Relation edges touching a CDU get the CDU endpoint replaced by its
    /// recursive head (identifier and attributes preserved); every CDU
    /// hyperedge and mirror node is then deleted; and the same
    /// endpoint substitution is applied to the annotation-layer relations,
    /// whose [`RelSpan`] descriptors are recomputed from the replacement
    /// ids. CDU schemas are dropped from the document. The input graph is
    /// never mutated.
    ///
    /// # Errors
    ///
    /// Head resolution errors propagate ([`Error::MultiheadedCdu`],
    /// [`Error::CyclicHeads`]); additionally, a relation endpoint that is
    /// a CDU with no resolvable head is fatal ([`Error::UnresolvedHead`])
    /// rather than a silently dangling endpoint.
    pub fn without_cdus(&self, sloppy: bool) -> Result<DiscourseGraph> {
        let mut g2 = self.clone();
        let heads = g2.recursive_cdu_heads(sloppy)?;

        // annotation-level twin of the head map: schema id -> head id
        let mut anno_heads: HashMap<String, String> = HashMap::new();
        for (&cdu, &head) in &heads {
            anno_heads.insert(g2.edge_label(cdu), g2.node_label(head));
        }

        // replace all links to/from CDUs with links to/from their heads
        let rels: Vec<EdgeId> = g2.relations().collect();
        for e in rels {
            let Some((src, tgt)) = g2.endpoints(e) else {
                continue;
            };
            if g2.kind(src) != Kind::Cdu && g2.kind(tgt) != Kind::Cdu {
                continue;
            }
            let src2 = g2.head_endpoint(&heads, e, src)?;
            let tgt2 = g2.head_endpoint(&heads, e, tgt)?;
            g2.rewrite_relation(e, src2, tgt2);
        }

        // now that everything points away from them, drop the CDUs
        let cdus: Vec<EdgeId> = g2.cdus().collect();
        for c in cdus {
            g2.remove_cdu(c);
        }

        g2.rewrite_relation_annotations(&anno_heads);
        g2.drop_cdu_schemas();
        Ok(g2)
    }

    /// Substitute a relation endpoint: CDU endpoints map to their
    /// recursive head, anything else passes through.
    fn head_endpoint(
        &self,
        heads: &HashMap<EdgeId, NodeId>,
        relation: EdgeId,
        endpoint: NodeId,
    ) -> Result<NodeId> {
        if self.kind(endpoint) != Kind::Cdu {
            return Ok(endpoint);
        }
        let cdu = self
            .mirror_edge(endpoint)
            .ok_or_else(|| Error::not_a_cdu(self.node_label(endpoint)))?;
        heads.get(&cdu).copied().ok_or_else(|| {
            Error::unresolved_head(self.edge_label(relation), self.edge_label(cdu))
        })
    }

    /// Mirror the endpoint substitution on the annotation layer, which is
    /// an independent source of truth for downstream consumers.
    fn rewrite_relation_annotations(&mut self, anno_heads: &HashMap<String, String>) {
        let tags = &self.tags;
        for r in &mut self.doc.relations {
            if !tags.is_relation_type(&r.rel_type) {
                continue;
            }
            if let Some(src) = anno_heads.get(&r.source) {
                r.source = src.clone();
            }
            if let Some(tgt) = anno_heads.get(&r.target) {
                r.target = tgt.clone();
            }
            r.span = RelSpan::new(r.source.clone(), r.target.clone());
        }
    }

    /// Drop CDU schemas from the document. Compacting the schema table
    /// shifts the positions of every schema after a dropped one, so the
    /// surviving nodes and hyperedges that index into it are rewritten to
    /// the post-compaction positions.
    fn drop_cdu_schemas(&mut self) {
        let tags = &self.tags;
        let mut remap: Vec<Option<usize>> = Vec::with_capacity(self.doc.schemas.len());
        let mut next = 0;
        for s in &self.doc.schemas {
            if tags.is_cdu_type(&s.schema_type) {
                remap.push(None);
            } else {
                remap.push(Some(next));
                next += 1;
            }
        }
        self.doc
            .schemas
            .retain(|s| !tags.is_cdu_type(&s.schema_type));

        for node in self.nodes.iter_mut().flatten() {
            if let AnnIdx::Schema(i) = &mut node.ann {
                if let Some(j) = remap[*i] {
                    *i = j;
                }
            }
        }
        for edge in self.edges.iter_mut().flatten() {
            if let AnnIdx::Schema(i) = &mut edge.ann {
                if let Some(j) = remap[*i] {
                    *i = j;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Document, Relation, Schema, Unit};
    use crate::classify::DomainTags;
    use crate::graph::AnnRef;
    use crate::span::TextSpan;

    fn tags() -> DomainTags {
        DomainTags::new()
            .with_edu_type("Segment")
            .with_cdu_type("Complex_discourse_unit")
            .with_relation_type("Elaboration", true)
            .with_relation_type("Narration", false)
    }

    fn nested_doc() -> Document {
        // c1 = {e1, e2}, headed at e1; c2 = {c1, e3}, headed at c1;
        // r2 attaches c1 to e3, r3 attaches e4 to c2.
        Document::new()
            .with_unit(Unit::new("e1", "Segment", TextSpan::new(0, 5)))
            .with_unit(Unit::new("e2", "Segment", TextSpan::new(6, 10)))
            .with_unit(Unit::new("e3", "Segment", TextSpan::new(11, 15)))
            .with_unit(Unit::new("e4", "Segment", TextSpan::new(16, 20)))
            .with_relation(Relation::new("r1", "Elaboration", "e1", "e2"))
            .with_relation(Relation::new("r2", "Elaboration", "c1", "e3"))
            .with_relation(Relation::new("r3", "Narration", "e4", "c2"))
            .with_schema(Schema::new("c1", "Complex_discourse_unit", ["e1", "e2"]))
            .with_schema(Schema::new("c2", "Complex_discourse_unit", ["c1", "e3"]))
    }

    #[test]
    fn test_contraction_leaves_no_cdus() {
        let g = DiscourseGraph::from_document(nested_doc(), tags()).unwrap();
        let flat = g.without_cdus(false).unwrap();

        assert_eq!(flat.cdus().count(), 0);
        assert!(flat.nodes().all(|n| flat.kind(n) != Kind::Cdu));
        assert!(flat.doc().schemas.is_empty());
        assert!(flat.node_of("c1").is_none());
    }

    #[test]
    fn test_contraction_redirects_endpoints_to_heads() {
        let g = DiscourseGraph::from_document(nested_doc(), tags()).unwrap();
        let flat = g.without_cdus(false).unwrap();

        let e1 = flat.node_of("e1").unwrap();
        let e3 = flat.node_of("e3").unwrap();
        let e4 = flat.node_of("e4").unwrap();

        // r2: c1 -> e3 becomes e1 -> e3
        assert_eq!(flat.endpoints(flat.edge_of("r2").unwrap()), Some((e1, e3)));
        // r3: e4 -> c2 becomes e4 -> e1 (c2's recursive head is e1 via c1)
        assert_eq!(flat.endpoints(flat.edge_of("r3").unwrap()), Some((e4, e1)));
        // every endpoint is now a non-CDU unit
        for e in flat.relations() {
            let (s, t) = flat.endpoints(e).unwrap();
            assert_ne!(flat.kind(s), Kind::Cdu);
            assert_ne!(flat.kind(t), Kind::Cdu);
        }
    }

    #[test]
    fn test_contraction_preserves_relation_count_and_attributes() {
        let g = DiscourseGraph::from_document(nested_doc(), tags()).unwrap();
        let flat = g.without_cdus(false).unwrap();

        assert_eq!(g.relations().count(), flat.relations().count());
        let r2 = flat.edge_of("r2").unwrap();
        assert_eq!(
            flat.edge_properties(r2).unwrap().get("type"),
            Some(&serde_json::Value::String("Elaboration".into()))
        );
    }

    #[test]
    fn test_contraction_rewrites_annotation_layer() {
        let g = DiscourseGraph::from_document(nested_doc(), tags()).unwrap();
        let flat = g.without_cdus(false).unwrap();

        let r2 = flat.doc().relation("r2").unwrap();
        assert_eq!(r2.source, "e1");
        assert_eq!(r2.target, "e3");
        assert_eq!(r2.span, RelSpan::new("e1", "e3"));

        let r3 = flat.doc().relation("r3").unwrap();
        assert_eq!(r3.target, "e1");
        assert_eq!(r3.span, RelSpan::new("e4", "e1"));
    }

    #[test]
    fn test_contraction_keeps_non_cdu_schemas_resolvable() {
        // an anaphora schema sits after both CDUs in the schema table, so
        // dropping them shifts its position
        let doc = nested_doc().with_schema(Schema::new("a1", "Anaphora", ["e1", "e3"]));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();
        let flat = g.without_cdus(false).unwrap();

        assert_eq!(flat.doc().schemas.len(), 1);

        let n = flat.node_of("a1").unwrap();
        match flat.annotation(n) {
            Some(AnnRef::Schema(s)) => {
                assert_eq!(s.id, "a1");
                assert_eq!(s.schema_type, "Anaphora");
            }
            other => panic!("expected the anaphora schema, got {other:?}"),
        }

        let e = flat.edge_of("a1").unwrap();
        assert_eq!(
            flat.edge_annotation(e).map(|a| a.local_id().to_owned()),
            Some("a1".to_owned())
        );
        assert_eq!(
            flat.members(e),
            [flat.node_of("e1").unwrap(), flat.node_of("e3").unwrap()]
        );
    }

    #[test]
    fn test_contraction_does_not_touch_the_input() {
        let g = DiscourseGraph::from_document(nested_doc(), tags()).unwrap();
        let before = g.clone();
        let _ = g.without_cdus(false).unwrap();
        assert_eq!(g, before);
    }

    #[test]
    fn test_headless_cdu_endpoint_is_fatal() {
        let doc = Document::new()
            .with_unit(Unit::new("e1", "Segment", TextSpan::new(0, 5)))
            .with_relation(Relation::new("r1", "Elaboration", "e1", "c1"))
            .with_schema(Schema::new(
                "c1",
                "Complex_discourse_unit",
                Vec::<String>::new(),
            ));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();
        assert_eq!(
            g.without_cdus(false).unwrap_err(),
            Error::unresolved_head("r1", "c1")
        );
    }

    #[test]
    fn test_cdu_free_graph_round_trips() {
        let doc = Document::new()
            .with_unit(Unit::new("e1", "Segment", TextSpan::new(0, 5)))
            .with_unit(Unit::new("e2", "Segment", TextSpan::new(6, 10)))
            .with_relation(Relation::new("r1", "Narration", "e1", "e2"));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();
        let flat = g.without_cdus(false).unwrap();
        assert_eq!(flat, g);
    }

    #[test]
    fn test_ambiguity_propagates_through_contraction() {
        let doc = Document::new()
            .with_unit(Unit::new("e1", "Segment", TextSpan::new(0, 5)))
            .with_unit(Unit::new("e2", "Segment", TextSpan::new(6, 10)))
            .with_schema(Schema::new("c1", "Complex_discourse_unit", ["e1", "e2"]));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();
        assert_eq!(
            g.without_cdus(false).unwrap_err(),
            Error::multiheaded_cdu("c1")
        );
        // sloppy resolution unblocks it
        assert!(g.without_cdus(true).is_ok());
    }
}
