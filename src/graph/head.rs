//! Head inference for complex discourse units.
//!
//! The head of a CDU is the one member no other member points to: the unit
//! that represents the group when the group itself takes part in further
//! relations. Nested CDUs make this recursive, since a CDU's head may
//! itself be a CDU.

use super::{DiscourseGraph, DuRef, EdgeId, NodeId};
use crate::classify::Kind;
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};

impl DiscourseGraph {
    /// The head of a CDU: the only member that is not pointed to by any
    /// other member of the same CDU.
    ///
    /// Accepts either identity of the CDU (node-form or edge-form). The
    /// returned head is in edge-carrying form when it is itself a CDU.
    ///
    /// Corner cases:
    ///
    /// - a CDU with no members (annotation error) yields `Ok(None)`;
    /// - a CDU with several heads (annotation error) yields
    ///   [`Error::MultiheadedCdu`], unless `sloppy` is set, in which case
    ///   the textually first (then widest) candidate wins.
    ///
    /// # Errors
    ///
    /// [`Error::NotACdu`] if `cdu` does not name a CDU;
    /// [`Error::MultiheadedCdu`] on ambiguity without `sloppy`.
    pub fn cdu_head(&self, cdu: DuRef, sloppy: bool) -> Result<Option<DuRef>> {
        let hyperedge = self
            .as_cdu_edge(cdu)
            .ok_or_else(|| Error::not_a_cdu(self.node_label(cdu.node())))?;

        let members = self.members(hyperedge).to_vec();
        let mut candidates = Vec::new();
        for &m in &members {
            if self.kind(m) == Kind::Relation {
                continue;
            }
            let pointed_to = self.incident(m).into_iter().any(|l| {
                l != hyperedge
                    && self.is_relation(l)
                    && matches!(
                        self.endpoints(l),
                        Some((src, tgt)) if tgt == m && src != m && members.contains(&src)
                    )
            });
            if !pointed_to {
                candidates.push(m);
            }
        }

        if candidates.is_empty() {
            return Ok(None);
        }
        if candidates.len() > 1 && !sloppy {
            return Err(Error::multiheaded_cdu(self.edge_label(hyperedge)));
        }
        let first = self.sorted_first_widest(&candidates)[0];
        Ok(Some(self.du_ref_of_node(first)))
    }

    /// Resolve every CDU in the graph to its recursive head: the non-CDU
    /// node reached by following [`DiscourseGraph::cdu_head`] through any
    /// nested CDUs.
    ///
    /// CDUs with no resolvable head anywhere along the chain are omitted
    /// from the map rather than reported as errors. Results are memoized
    /// within this call, so shared sub-structure is resolved once.
    ///
    /// # Errors
    ///
    /// [`Error::MultiheadedCdu`] on an ambiguous CDU without `sloppy`;
    /// [`Error::CyclicHeads`] if a head chain loops.
    pub fn recursive_cdu_heads(&self, sloppy: bool) -> Result<HashMap<EdgeId, NodeId>> {
        let mut cache = HashMap::new();
        let cdus: Vec<EdgeId> = self.cdus().collect();
        for c in cdus {
            let mut visited = HashSet::new();
            self.resolve_head(c, sloppy, &mut cache, &mut visited)?;
        }
        Ok(cache)
    }

    fn resolve_head(
        &self,
        cdu: EdgeId,
        sloppy: bool,
        cache: &mut HashMap<EdgeId, NodeId>,
        visited: &mut HashSet<EdgeId>,
    ) -> Result<Option<NodeId>> {
        if let Some(&h) = cache.get(&cdu) {
            return Ok(Some(h));
        }
        if !visited.insert(cdu) {
            return Err(Error::cyclic_heads(self.edge_label(cdu)));
        }
        let Some(du) = self.cdu_ref(cdu) else {
            return Ok(None);
        };
        let head = match self.cdu_head(du, sloppy)? {
            None => None,
            Some(DuRef::Cdu { edge, .. }) => self.resolve_head(edge, sloppy, cache, visited)?,
            Some(DuRef::Unit(n)) => Some(n),
        };
        if let Some(h) = head {
            cache.insert(cdu, h);
        }
        Ok(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Document, Relation, Schema, Unit};
    use crate::classify::DomainTags;
    use crate::span::TextSpan;

    fn tags() -> DomainTags {
        DomainTags::new()
            .with_edu_type("Segment")
            .with_cdu_type("Complex_discourse_unit")
            .with_relation_type("Elaboration", true)
            .with_relation_type("Narration", false)
    }

    fn three_edus() -> Document {
        Document::new()
            .with_unit(Unit::new("e1", "Segment", TextSpan::new(0, 5)))
            .with_unit(Unit::new("e2", "Segment", TextSpan::new(6, 10)))
            .with_unit(Unit::new("e3", "Segment", TextSpan::new(11, 15)))
    }

    #[test]
    fn test_single_candidate_head() {
        // c1 = {e1, e2} with an internal subordination e1 -> e2: e1 is the
        // only member nothing else points to.
        let doc = three_edus()
            .with_relation(Relation::new("r1", "Elaboration", "e1", "e2"))
            .with_schema(Schema::new("c1", "Complex_discourse_unit", ["e1", "e2"]));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();
        let head = g.cdu_head(g.du("c1").unwrap(), false).unwrap().unwrap();
        assert_eq!(head, DuRef::Unit(g.node_of("e1").unwrap()));

        // repeated calls are deterministic
        let again = g.cdu_head(g.du("c1").unwrap(), false).unwrap().unwrap();
        assert_eq!(head, again);
    }

    #[test]
    fn test_relation_from_outside_does_not_disqualify() {
        // e3 -> e2 comes from outside the CDU, so e2 stays a candidate and
        // the CDU is ambiguous.
        let doc = three_edus()
            .with_relation(Relation::new("r1", "Elaboration", "e3", "e2"))
            .with_schema(Schema::new("c1", "Complex_discourse_unit", ["e1", "e2"]));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();
        let err = g.cdu_head(g.du("c1").unwrap(), false).unwrap_err();
        assert_eq!(err, Error::multiheaded_cdu("c1"));
    }

    #[test]
    fn test_empty_cdu_has_no_head() {
        let doc = Document::new().with_schema(Schema::new(
            "c1",
            "Complex_discourse_unit",
            Vec::<String>::new(),
        ));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();
        assert_eq!(g.cdu_head(g.du("c1").unwrap(), false).unwrap(), None);
        // and the recursive map simply omits it
        assert!(g.recursive_cdu_heads(false).unwrap().is_empty());
    }

    #[test]
    fn test_multihead_sloppy_takes_first_widest() {
        // members listed out of textual order; sloppy resolution is
        // positional, not list-positional
        let doc = three_edus().with_schema(Schema::new(
            "c1",
            "Complex_discourse_unit",
            ["e2", "e1"],
        ));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();

        assert_eq!(
            g.cdu_head(g.du("c1").unwrap(), false).unwrap_err(),
            Error::multiheaded_cdu("c1")
        );
        let head = g.cdu_head(g.du("c1").unwrap(), true).unwrap().unwrap();
        assert_eq!(head, DuRef::Unit(g.node_of("e1").unwrap()));
    }

    #[test]
    fn test_relation_members_are_not_candidates() {
        // STAC annotators sometimes put the internal relation itself into
        // the schema; it must never become the head.
        let doc = three_edus()
            .with_relation(Relation::new("r1", "Elaboration", "e1", "e2"))
            .with_schema(Schema::new(
                "c1",
                "Complex_discourse_unit",
                ["e1", "e2", "r1"],
            ));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();
        let head = g.cdu_head(g.du("c1").unwrap(), false).unwrap().unwrap();
        assert_eq!(head, DuRef::Unit(g.node_of("e1").unwrap()));
    }

    #[test]
    fn test_head_of_nested_cdu_is_edge_form() {
        let doc = three_edus()
            .with_relation(Relation::new("r1", "Elaboration", "e1", "e2"))
            .with_relation(Relation::new("r2", "Elaboration", "c1", "e3"))
            .with_schema(Schema::new("c1", "Complex_discourse_unit", ["e1", "e2"]))
            .with_schema(Schema::new("c2", "Complex_discourse_unit", ["c1", "e3"]));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();

        // within c2, the relation c1 -> e3 disqualifies e3; the head is the
        // nested CDU, returned with its edge identity attached
        let head = g.cdu_head(g.du("c2").unwrap(), false).unwrap().unwrap();
        assert_eq!(head, g.du("c1").unwrap());
        assert!(head.edge().is_some());
    }

    #[test]
    fn test_recursive_heads_follow_nested_chains() {
        let doc = three_edus()
            .with_relation(Relation::new("r1", "Elaboration", "e1", "e2"))
            .with_relation(Relation::new("r2", "Elaboration", "c1", "e3"))
            .with_schema(Schema::new("c1", "Complex_discourse_unit", ["e1", "e2"]))
            .with_schema(Schema::new("c2", "Complex_discourse_unit", ["c1", "e3"]));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();

        let heads = g.recursive_cdu_heads(false).unwrap();
        let e1 = g.node_of("e1").unwrap();
        assert_eq!(heads.len(), 2);
        assert_eq!(heads[&g.edge_of("c1").unwrap()], e1);
        assert_eq!(heads[&g.edge_of("c2").unwrap()], e1);
    }

    #[test]
    fn test_headless_member_cdu_propagates_omission() {
        // c2's head is c1, but c1 is empty, so neither resolves.
        let doc = three_edus()
            .with_schema(Schema::new(
                "c1",
                "Complex_discourse_unit",
                Vec::<String>::new(),
            ))
            .with_schema(Schema::new("c2", "Complex_discourse_unit", ["c1"]));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();
        assert!(g.recursive_cdu_heads(false).unwrap().is_empty());
    }

    #[test]
    fn test_cyclic_head_chain_is_detected() {
        // c1 contains c2 and c2 contains c1: each resolves its head to the
        // other, forever. The guard reports a cycle instead of spinning.
        let doc = Document::new()
            .with_schema(Schema::new("c1", "Complex_discourse_unit", ["c2"]))
            .with_schema(Schema::new("c2", "Complex_discourse_unit", ["c1"]));
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();
        let err = g.recursive_cdu_heads(false).unwrap_err();
        assert!(matches!(err, Error::CyclicHeads { .. }));
    }

    #[test]
    fn test_not_a_cdu() {
        let doc = three_edus();
        let g = DiscourseGraph::from_document(doc, tags()).unwrap();
        let err = g.cdu_head(g.du("e1").unwrap(), false).unwrap_err();
        assert_eq!(err, Error::not_a_cdu("e1"));
    }
}
