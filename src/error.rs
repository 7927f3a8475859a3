//! Error types for discograph.

use thiserror::Error;

/// Result type for discograph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for discograph operations.
///
/// Tolerable annotation defects (a CDU with no members, a CDU with no
/// resolvable head) are *not* errors: they surface as `None` results or as
/// omissions from a head map, and callers decide. Errors are reserved for
/// ambiguity the caller must resolve explicitly and for structural
/// inconsistencies that would otherwise corrupt a derived graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A CDU has several head candidates and sloppy resolution was not
    /// requested. A data-quality problem requiring human review.
    #[error("CDU {cdu} has more than one head candidate")]
    MultiheadedCdu {
        /// Local id of the offending CDU.
        cdu: String,
    },

    /// A CDU's head chain loops back on itself.
    #[error("CDU {cdu} participates in a cyclic head chain")]
    CyclicHeads {
        /// Local id of the CDU at which the cycle was detected.
        cdu: String,
    },

    /// During contraction, a relation endpoint is a CDU with no resolvable
    /// head. Fatal: the alternative is a dangling endpoint in the result.
    #[error("relation {relation} points at CDU {cdu}, which has no resolvable head")]
    UnresolvedHead {
        /// Local id of the relation being rewritten.
        relation: String,
        /// Local id of the headless CDU endpoint.
        cdu: String,
    },

    /// An annotation references a local id that does not exist in the
    /// document.
    #[error("annotation {referer} references unknown id {referent}")]
    DanglingReference {
        /// Local id of the referring annotation.
        referer: String,
        /// The id that could not be resolved.
        referent: String,
    },

    /// Two annotations share a local id.
    #[error("duplicate annotation id: {id}")]
    DuplicateId {
        /// The repeated local id.
        id: String,
    },

    /// A CDU operation was invoked on something that is not a CDU.
    #[error("{id} is not a complex discourse unit")]
    NotACdu {
        /// Local id of the offending annotation.
        id: String,
    },
}

impl Error {
    /// Create a multi-headed CDU error.
    pub fn multiheaded_cdu(cdu: impl Into<String>) -> Self {
        Error::MultiheadedCdu { cdu: cdu.into() }
    }

    /// Create a cyclic head chain error.
    pub fn cyclic_heads(cdu: impl Into<String>) -> Self {
        Error::CyclicHeads { cdu: cdu.into() }
    }

    /// Create an unresolved head error.
    pub fn unresolved_head(relation: impl Into<String>, cdu: impl Into<String>) -> Self {
        Error::UnresolvedHead {
            relation: relation.into(),
            cdu: cdu.into(),
        }
    }

    /// Create a dangling reference error.
    pub fn dangling_reference(referer: impl Into<String>, referent: impl Into<String>) -> Self {
        Error::DanglingReference {
            referer: referer.into(),
            referent: referent.into(),
        }
    }

    /// Create a duplicate id error.
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Error::DuplicateId { id: id.into() }
    }

    /// Create a not-a-CDU error.
    pub fn not_a_cdu(id: impl Into<String>) -> Self {
        Error::NotACdu { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = Error::multiheaded_cdu("c3");
        assert_eq!(e.to_string(), "CDU c3 has more than one head candidate");

        let e = Error::unresolved_head("r1", "c2");
        assert_eq!(
            e.to_string(),
            "relation r1 points at CDU c2, which has no resolvable head"
        );
    }

    #[test]
    fn test_carries_offending_ids() {
        match Error::dangling_reference("c1", "e9") {
            Error::DanglingReference { referer, referent } => {
                assert_eq!(referer, "c1");
                assert_eq!(referent, "e9");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
