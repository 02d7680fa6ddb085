//! Constraints over generic (indexed) nodes. A generic constraint fans out to
//! arcs over the member nodes: elementwise relations become one binary arc per
//! flat index, and weighted sums become a single linear arc.

use itertools::Itertools;

use super::numeric::relation_truth;
use super::Constraint;
use crate::arcs::boolean::Tribool;
use crate::arcs::numeric::BinaryRelationArc;
use crate::arcs::numeric::LinearArc;
use crate::arcs::numeric::NumOperand;
use crate::arcs::ArcBuilder;
use crate::arcs::ArcOperator;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::ConstraintOperationError;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;
use crate::nodes::GenericNode;
use crate::nodes::NodeId;

/// The constraint `a[i] op b[i]` for every multi-index `i` of two generic
/// nodes of the same shape.
#[derive(Debug, Clone)]
pub struct ElementwiseConstraint {
    pairs: Vec<(NodeId, NodeId)>,
    op: ArcOperator,
}

/// Relates two generic nodes elementwise. The nodes must have the same shape.
pub fn element(
    a: &GenericNode,
    op: ArcOperator,
    b: &GenericNode,
) -> Result<ElementwiseConstraint, ConstraintOperationError> {
    if !a.same_shape(b) {
        return Err(ConstraintOperationError::IndexMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(ElementwiseConstraint {
        pairs: a
            .nodes()
            .iter()
            .copied()
            .zip_eq(b.nodes().iter().copied())
            .collect(),
        op,
    })
}

impl<T: DomainValue> Constraint<T> for ElementwiseConstraint {
    fn truth(&self, domains: &dyn ReadDomains<T>) -> Tribool {
        let tolerance = domains.tolerance();
        let mut all_true = true;
        for &(a, b) in &self.pairs {
            let pair = relation_truth(
                self.op,
                (domains.min(a), domains.max(a)),
                (domains.min(b), domains.max(b)),
                tolerance,
            );
            match pair {
                // One falsified element falsifies the conjunction.
                Tribool::False => return Tribool::False,
                Tribool::Undetermined => all_true = false,
                Tribool::True => {}
            }
        }
        if all_true {
            Tribool::True
        } else {
            Tribool::Undetermined
        }
    }

    fn variables(&self) -> Vec<Watch> {
        self.pairs
            .iter()
            .flat_map(|&(a, b)| {
                [
                    Watch::Scalar(a, DomainEvents::ANY),
                    Watch::Scalar(b, DomainEvents::ANY),
                ]
            })
            .collect()
    }

    fn compile(&self, builder: &mut dyn ArcBuilder<T>) -> Result<(), ConstraintOperationError> {
        for &(a, b) in &self.pairs {
            builder.post_arc(Box::new(BinaryRelationArc::new(
                NumOperand::Node(a),
                self.op,
                NumOperand::Node(b),
            )));
        }
        Ok(())
    }

    fn opposite(&self) -> Option<Box<dyn Constraint<T>>> {
        // The complement of a conjunction over indices is a disjunction,
        // which has no arc form here; only single-element constraints invert.
        if self.pairs.len() != 1 {
            return None;
        }
        Some(Box::new(ElementwiseConstraint {
            pairs: self.pairs.clone(),
            op: self.op.negate(),
        }))
    }
}

/// The constraint `sum(weights[i] * generic[i]) op rhs` over the flattened
/// members of a generic node.
#[derive(Debug, Clone)]
pub struct WeightedSumConstraint<T> {
    terms: Vec<(T, NodeId)>,
    op: ArcOperator,
    rhs: T,
}

/// Builds a weighted sum over a generic node. The weight slice must match the
/// node's flattened length.
pub fn weighted_sum<T: DomainValue>(
    generic: &GenericNode,
    weights: &[T],
    op: ArcOperator,
    rhs: T,
) -> Result<WeightedSumConstraint<T>, ConstraintOperationError> {
    if weights.len() != generic.len() {
        return Err(ConstraintOperationError::IndexMismatch {
            expected: generic.len(),
            found: weights.len(),
        });
    }
    Ok(WeightedSumConstraint {
        terms: weights
            .iter()
            .copied()
            .zip_eq(generic.nodes().iter().copied())
            .collect(),
        op,
        rhs,
    })
}

impl<T: DomainValue> Constraint<T> for WeightedSumConstraint<T> {
    fn truth(&self, domains: &dyn ReadDomains<T>) -> Tribool {
        let mut lower = T::zero();
        let mut upper = T::zero();
        for &(weight, node) in &self.terms {
            let a = weight.mul_sat(domains.min(node));
            let b = weight.mul_sat(domains.max(node));
            lower = lower.add_sat(a.min_by_order(b));
            upper = upper.add_sat(a.max_by_order(b));
        }
        relation_truth(
            self.op,
            (lower, upper),
            (self.rhs, self.rhs),
            domains.tolerance(),
        )
    }

    fn variables(&self) -> Vec<Watch> {
        self.terms
            .iter()
            .map(|&(_, node)| Watch::Scalar(node, DomainEvents::BOUNDS))
            .collect()
    }

    fn compile(&self, builder: &mut dyn ArcBuilder<T>) -> Result<(), ConstraintOperationError> {
        builder.post_arc(Box::new(LinearArc::new(
            self.terms.clone(),
            self.op,
            self.rhs,
        )));
        Ok(())
    }

    fn opposite(&self) -> Option<Box<dyn Constraint<T>>> {
        Some(Box::new(WeightedSumConstraint {
            terms: self.terms.clone(),
            op: self.op.negate(),
            rhs: self.rhs,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::GenericIndex;
    use crate::test_engine::TestEngine;

    #[test]
    fn elementwise_relation_fans_out_per_index() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let a = engine.new_generic("a", vec![GenericIndex::new("i", 3)], 0, 10);
        let b = engine.new_generic("b", vec![GenericIndex::new("i", 3)], 4, 6);

        let constraint = element(&a, ArcOperator::Leq, &b).expect("same shape");
        engine.post(&constraint).expect("compiles");
        engine.propagate().expect("satisfiable");

        for &node in a.nodes() {
            assert_eq!(engine.upper_bound(node), 6);
        }
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let a = engine.new_generic("a", vec![GenericIndex::new("i", 3)], 0, 10);
        let b = engine.new_generic("b", vec![GenericIndex::new("i", 4)], 0, 10);

        assert!(element(&a, ArcOperator::Eq, &b).is_err());
    }

    #[test]
    fn weighted_sum_tightens_the_members() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let xs = engine.new_generic("x", vec![GenericIndex::new("i", 2)], 0, 10);

        // 2*x0 + 3*x1 <= 12
        let constraint =
            weighted_sum(&xs, &[2, 3], ArcOperator::Leq, 12).expect("matching weights");
        engine.post(&constraint).expect("compiles");
        engine.propagate().expect("satisfiable");

        assert_eq!(engine.upper_bound(xs.nodes()[0]), 6);
        assert_eq!(engine.upper_bound(xs.nodes()[1]), 4);
    }

    #[test]
    fn weighted_sum_truth_over_fixed_members() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let xs = engine.new_generic("x", vec![GenericIndex::new("i", 2)], 2, 2);

        let holds = weighted_sum(&xs, &[1, 1], ArcOperator::Eq, 4).expect("matching weights");
        let fails = weighted_sum(&xs, &[1, 1], ArcOperator::Gt, 4).expect("matching weights");

        assert_eq!(engine.truth(&holds), Tribool::True);
        assert_eq!(engine.truth(&fails), Tribool::False);
    }
}
