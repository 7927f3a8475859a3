//! Canonical unit ordering and the right-frontier constraint checker.
//!
//! Discourse units are ordered left-to-right by starting position, widest
//! span first on a tie, so a CDU sorts just before its leftmost member.
//! The same ordering doubles as the tie-break for sloppy head resolution.
//!
//! The right-frontier constraint says a new attachment may only target a
//! unit still "open" along the dominance spine of what came before: the
//! chain obtained by repeatedly following, from the most recent unit, the
//! nearest predecessor that subordinates it or contains it in a CDU.
//! Incoming relations whose source is not on that chain are violations —
//! either annotation errors or deliberately non-tree-shaped discourse.

use super::{DiscourseGraph, EdgeId, NodeId};
use crate::classify::Kind;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

impl DiscourseGraph {
    /// Stable sort of nodes by starting position, widest first on a tie.
    /// Nodes without a text span (empty CDUs) sort last.
    #[must_use]
    pub fn sorted_first_widest(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        let mut out = nodes.to_vec();
        out.sort_by_key(|&n| match self.span_of(n) {
            Some(span) => (0u8, span.char_start, Reverse(span.char_end)),
            None => (1u8, 0, Reverse(0)),
        });
        out
    }

    /// The graph's interesting discourse units — EDUs plus CDUs with at
    /// least one member — in canonical first-widest order.
    #[must_use]
    pub fn first_widest_dus(&self) -> Vec<NodeId> {
        let dus: Vec<NodeId> = self
            .nodes()
            .filter(|&n| match self.kind(n) {
                Kind::Edu => true,
                Kind::Cdu => self
                    .mirror_edge(n)
                    .is_some_and(|e| !self.members(e).is_empty()),
                _ => false,
            })
            .collect();
        self.sorted_first_widest(&dus)
    }

    /// For each unit in `order`, the nearest unit (by position in `order`)
    /// that either points to it with a subordinating relation or includes
    /// it as a CDU member; `None` when no such unit exists.
    fn frontier_points(&self, order: &[NodeId]) -> HashMap<NodeId, Option<NodeId>> {
        let position: HashMap<NodeId, usize> =
            order.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        let pos = |n: NodeId| position.get(&n).map_or(-1, |&i| i as i64);

        let mut points = HashMap::new();
        for &n1 in order {
            let mut candidates: Vec<NodeId> = Vec::new();
            for l in self.incident(n1) {
                match self.edge_kind(l) {
                    Kind::Relation => {
                        let Some((src, tgt)) = self.endpoints(l) else {
                            continue;
                        };
                        let Some(ann) = self.edge_annotation(l) else {
                            continue;
                        };
                        if tgt == n1 && self.tags.is_subordinating(ann.type_label()) {
                            candidates.push(src);
                        }
                    }
                    Kind::Cdu => {
                        if let Some(cdu_node) = self.mirror_node(l) {
                            candidates.push(cdu_node);
                        }
                    }
                    _ => {}
                }
            }
            points.insert(n1, candidates.into_iter().max_by_key(|&n2| pos(n2)));
        }
        points
    }

    /// The frontier chain: `last`, its frontier point, that point's point,
    /// and so on. A visited guard terminates degenerate cyclic point maps.
    fn right_frontier_chain(
        &self,
        points: &HashMap<NodeId, Option<NodeId>>,
        last: NodeId,
    ) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(last);
        while let Some(n) = current {
            if !seen.insert(n) {
                break;
            }
            chain.push(n);
            current = points.get(&n).copied().flatten();
        }
        chain
    }

    /// Relation instances that break the right-frontier constraint,
    /// grouped by the unit they attach from.
    ///
    /// Walks the canonical unit sequence pairwise; for each unit, every
    /// incoming relation whose source does not lie on the frontier chain
    /// of the preceding unit is recorded against that source. Fewer than
    /// two units means vacuously no violations. Repeated offenses
    /// accumulate, they are not deduplicated.
    #[must_use]
    pub fn right_frontier_violations(&self) -> HashMap<NodeId, Vec<EdgeId>> {
        let order = self.first_widest_dus();
        let mut violations: HashMap<NodeId, Vec<EdgeId>> = HashMap::new();
        if order.len() < 2 {
            return violations;
        }

        let points = self.frontier_points(&order);
        for pair in order.windows(2) {
            let (last, n1) = (pair[0], pair[1]);
            let chain = self.right_frontier_chain(&points, last);
            for l in self.incident(n1) {
                if !self.is_relation(l) {
                    continue;
                }
                let Some((n2, tgt)) = self.endpoints(l) else {
                    continue;
                };
                if tgt != n1 {
                    continue;
                }
                if !chain.contains(&n2) {
                    violations.entry(n2).or_default().push(l);
                }
            }
        }
        violations
    }
}
