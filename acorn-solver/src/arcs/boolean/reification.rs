use super::Tribool;
use crate::arcs::Arc;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropagationFailure;
use crate::basic_types::PropagationStatus;
use crate::constraints::Constraint;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;
use crate::nodes::BoolNode;

/// An arc maintaining the equivalence `b <-> c` between a boolean node and a
/// constraint.
///
/// While `b` is undetermined, the arc evaluates the truth of `c` against the
/// current domains and binds `b` once the truth is determined. Once `b` is
/// bound, the arc compiles `c` (or its opposite) into fresh arcs; these are
/// queued on the context and installed by the running algorithm, so the arc
/// store is never mutated mid-propagation.
pub struct ReificationArc<T: DomainValue> {
    bool_node: BoolNode,
    constraint: Box<dyn Constraint<T>>,
    opposite: Box<dyn Constraint<T>>,
    posted: bool,
}

impl<T: DomainValue> ReificationArc<T> {
    /// Fails with [`ConstraintOperationError::NotReifiable`] if the constraint
    /// has no postable opposite.
    pub fn new(
        bool_node: BoolNode,
        constraint: Box<dyn Constraint<T>>,
    ) -> Result<Self, ConstraintOperationError> {
        constraint.validate()?;
        let opposite = constraint
            .opposite()
            .ok_or(ConstraintOperationError::NotReifiable(
                "the constraint has no postable opposite",
            ))?;
        Ok(ReificationArc {
            bool_node,
            constraint,
            opposite,
            posted: false,
        })
    }

    fn post(
        &mut self,
        context: &mut PropagationContext<'_, T>,
        negated: bool,
    ) -> PropagationStatus {
        let constraint: &dyn Constraint<T> = if negated {
            self.opposite.as_ref()
        } else {
            self.constraint.as_ref()
        };
        match constraint.compile(context) {
            Ok(()) => {
                self.posted = true;
                Ok(())
            }
            Err(ConstraintOperationError::Infeasible(failure)) => Err(failure),
            Err(_) => Err(PropagationFailure::for_variable("Reification")),
        }
    }
}

impl<T: DomainValue> std::fmt::Debug for ReificationArc<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReificationArc")
            .field("bool_node", &self.bool_node)
            .field("constraint", &self.constraint)
            .field("posted", &self.posted)
            .finish()
    }
}

impl<T: DomainValue> Arc<T> for ReificationArc<T> {
    fn name(&self) -> &str {
        "Reification"
    }

    fn watches(&self) -> Vec<Watch> {
        let mut watches = self.constraint.variables();
        watches.push(Watch::Scalar(self.bool_node.node(), DomainEvents::ASSIGN));
        watches
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        if self.posted {
            return Ok(());
        }
        match context.tribool(self.bool_node) {
            Tribool::True => self.post(context, false),
            Tribool::False => self.post(context, true),
            Tribool::Undetermined => match self.constraint.truth(context) {
                Tribool::True => context.bind_bool(self.bool_node, true),
                Tribool::False => context.bind_bool(self.bool_node, false),
                Tribool::Undetermined => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcs::ArcOperator;
    use crate::constraints::NumExpr;
    use crate::constraints::RelationConstraint;
    use crate::test_engine::TestEngine;

    #[test]
    fn truth_of_the_constraint_binds_the_boolean() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(5, 10);
        let b = engine.new_bool();
        let constraint =
            RelationConstraint::new(NumExpr::var(x), ArcOperator::Geq, NumExpr::constant(3));
        let _ = engine.add_arc(ReificationArc::new(b, Box::new(constraint)).expect("reifiable"));

        engine.propagate().expect("no empty domains");

        assert_eq!(engine.tribool(b), Tribool::True);
    }

    #[test]
    fn binding_the_boolean_posts_the_constraint() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(0, 10);
        let b = engine.new_bool();
        let constraint =
            RelationConstraint::new(NumExpr::var(x), ArcOperator::Leq, NumExpr::constant(4));
        let _ = engine.add_arc(ReificationArc::new(b, Box::new(constraint)).expect("reifiable"));

        engine.bind_bool(b, true).expect("consistent");
        engine.propagate().expect("no empty domains");

        assert_eq!(engine.upper_bound(x), 4);
    }

    #[test]
    fn falsifying_the_boolean_posts_the_opposite() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(0, 10);
        let b = engine.new_bool();
        let constraint =
            RelationConstraint::new(NumExpr::var(x), ArcOperator::Leq, NumExpr::constant(4));
        let _ = engine.add_arc(ReificationArc::new(b, Box::new(constraint)).expect("reifiable"));

        engine.bind_bool(b, false).expect("consistent");
        engine.propagate().expect("no empty domains");

        // not (x <= 4) is x >= 5
        assert_eq!(engine.lower_bound(x), 5);
    }
}
