//! Set arcs. Set domains are bound pairs (required ⊆ possible); these arcs
//! move values between the pair on both sides of the union, intersection,
//! difference, subset, and membership relations.

mod difference;
mod intersection;
mod member;
mod subset;
mod union;

pub use difference::SetDifferenceArc;
pub use intersection::SetIntersectionArc;
pub use member::MemberArc;
pub use member::NotMemberArc;
pub use subset::SubsetArc;
pub use union::SetUnionArc;

use itertools::Itertools;

use super::ReadDomains;
use crate::domains::DomainValue;
use crate::nodes::SetNodeId;

/// The candidate universe of a set arc: every value still possible in any of
/// the given sets, deduplicated under the tolerance.
pub(crate) fn candidate_values<T: DomainValue, D: ReadDomains<T> + ?Sized>(
    domains: &D,
    sets: &[SetNodeId],
) -> Vec<T> {
    let tolerance = domains.tolerance();
    sets.iter()
        .flat_map(|&set| domains.possible_values(set))
        .sorted_by(|a, b| a.total_cmp(*b))
        .dedup_by(|a, b| a.eq_within(*b, tolerance))
        .collect()
}
