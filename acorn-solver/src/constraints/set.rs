use super::Constraint;
use crate::arcs::boolean::Tribool;
use crate::arcs::set::candidate_values;
use crate::arcs::set::MemberArc;
use crate::arcs::set::NotMemberArc;
use crate::arcs::set::SetDifferenceArc;
use crate::arcs::set::SetIntersectionArc;
use crate::arcs::set::SetUnionArc;
use crate::arcs::set::SubsetArc;
use crate::arcs::ArcBuilder;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::ConstraintOperationError;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;
use crate::domains::SetDomain;
use crate::domains::SetDomainEvents;
use crate::nodes::NodeId;
use crate::nodes::SetNodeId;

/// A set expression tree over set nodes. Compiling a compound expression
/// materializes an anonymous set node over the union of the operands'
/// possible values and posts the defining arc onto it.
#[derive(Debug, Clone)]
pub enum SetExpr {
    Var(SetNodeId),
    Union(Box<SetExpr>, Box<SetExpr>),
    Intersection(Box<SetExpr>, Box<SetExpr>),
    Difference(Box<SetExpr>, Box<SetExpr>),
}

impl SetExpr {
    pub fn var(set: SetNodeId) -> Self {
        SetExpr::Var(set)
    }

    pub fn union(self, other: SetExpr) -> Self {
        SetExpr::Union(Box::new(self), Box::new(other))
    }

    pub fn intersection(self, other: SetExpr) -> Self {
        SetExpr::Intersection(Box::new(self), Box::new(other))
    }

    pub fn difference(self, other: SetExpr) -> Self {
        SetExpr::Difference(Box::new(self), Box::new(other))
    }

    fn collect_variables(&self, into: &mut Vec<Watch>) {
        match self {
            SetExpr::Var(set) => into.push(Watch::Set(*set, SetDomainEvents::ANY)),
            SetExpr::Union(a, b) | SetExpr::Intersection(a, b) | SetExpr::Difference(a, b) => {
                a.collect_variables(into);
                b.collect_variables(into);
            }
        }
    }

    fn lower<T: DomainValue>(&self, builder: &mut dyn ArcBuilder<T>) -> SetNodeId {
        match self {
            SetExpr::Var(set) => *set,
            compound => {
                let (a, b) = match compound {
                    SetExpr::Union(a, b)
                    | SetExpr::Intersection(a, b)
                    | SetExpr::Difference(a, b) => (a.lower(builder), b.lower(builder)),
                    // Var is handled above.
                    SetExpr::Var(_) => unreachable!(),
                };
                let universe = candidate_values(&*builder as &dyn ReadDomains<T>, &[a, b]);
                let node = builder.build_set_node(SetDomain::new(universe, builder.tolerance()));
                match compound {
                    SetExpr::Union(_, _) => {
                        builder.post_arc(Box::new(SetUnionArc::new(a, b, node)))
                    }
                    SetExpr::Intersection(_, _) => {
                        builder.post_arc(Box::new(SetIntersectionArc::new(a, b, node)))
                    }
                    SetExpr::Difference(_, _) => {
                        builder.post_arc(Box::new(SetDifferenceArc::new(a, b, node)))
                    }
                    SetExpr::Var(_) => unreachable!(),
                }
                node
            }
        }
    }

    fn as_var(&self) -> Option<SetNodeId> {
        match self {
            SetExpr::Var(set) => Some(*set),
            _ => None,
        }
    }
}

/// A constraint over set expressions: containment, equality, or scalar
/// membership.
#[derive(Debug, Clone)]
pub enum SetConstraint {
    Subset(SetExpr, SetExpr),
    Eq(SetExpr, SetExpr),
    Member(NodeId, SetExpr),
    NotMember(NodeId, SetExpr),
}

/// The truth of `a ⊆ b` between two set variables.
fn subset_truth<T: DomainValue>(
    domains: &dyn ReadDomains<T>,
    a: SetNodeId,
    b: SetNodeId,
) -> Tribool {
    if domains
        .required_values(a)
        .into_iter()
        .any(|value| !domains.is_possible(b, value))
    {
        return Tribool::False;
    }
    if domains
        .possible_values(a)
        .into_iter()
        .all(|value| domains.is_required(b, value))
    {
        return Tribool::True;
    }
    Tribool::Undetermined
}

impl<T: DomainValue> Constraint<T> for SetConstraint {
    fn truth(&self, domains: &dyn ReadDomains<T>) -> Tribool {
        // Truth is only decided for plain set variables; a compound operand
        // has no node to inspect before compilation.
        match self {
            SetConstraint::Subset(a, b) => match (a.as_var(), b.as_var()) {
                (Some(a), Some(b)) => subset_truth(domains, a, b),
                _ => Tribool::Undetermined,
            },
            SetConstraint::Eq(a, b) => match (a.as_var(), b.as_var()) {
                (Some(a), Some(b)) => {
                    match (subset_truth(domains, a, b), subset_truth(domains, b, a)) {
                        (Tribool::True, Tribool::True) => Tribool::True,
                        (Tribool::False, _) | (_, Tribool::False) => Tribool::False,
                        _ => Tribool::Undetermined,
                    }
                }
                _ => Tribool::Undetermined,
            },
            SetConstraint::Member(x, s) => match s.as_var() {
                Some(s) if domains.is_bound(*x) => {
                    let value = domains.min(*x);
                    if domains.is_required(s, value) {
                        Tribool::True
                    } else if !domains.is_possible(s, value) {
                        Tribool::False
                    } else {
                        Tribool::Undetermined
                    }
                }
                _ => Tribool::Undetermined,
            },
            SetConstraint::NotMember(x, s) => {
                let member = SetConstraint::Member(*x, s.clone());
                Constraint::<T>::truth(&member, domains).negate()
            }
        }
    }

    fn variables(&self) -> Vec<Watch> {
        let mut watches = Vec::new();
        match self {
            SetConstraint::Subset(a, b) | SetConstraint::Eq(a, b) => {
                a.collect_variables(&mut watches);
                b.collect_variables(&mut watches);
            }
            SetConstraint::Member(x, s) | SetConstraint::NotMember(x, s) => {
                watches.push(Watch::Scalar(*x, DomainEvents::ANY));
                s.collect_variables(&mut watches);
            }
        }
        watches
    }

    fn compile(&self, builder: &mut dyn ArcBuilder<T>) -> Result<(), ConstraintOperationError> {
        match self {
            SetConstraint::Subset(a, b) => {
                let a = a.lower(builder);
                let b = b.lower(builder);
                builder.post_arc(Box::new(SubsetArc::new(a, b)));
            }
            SetConstraint::Eq(a, b) => {
                let a = a.lower(builder);
                let b = b.lower(builder);
                builder.post_arc(Box::new(SubsetArc::new(a, b)));
                builder.post_arc(Box::new(SubsetArc::new(b, a)));
            }
            SetConstraint::Member(x, s) => {
                let s = s.lower(builder);
                builder.post_arc(Box::new(MemberArc::new(*x, s)));
            }
            SetConstraint::NotMember(x, s) => {
                let s = s.lower(builder);
                builder.post_arc(Box::new(NotMemberArc::new(*x, s)));
            }
        }
        Ok(())
    }

    fn opposite(&self) -> Option<Box<dyn Constraint<T>>> {
        // Containment has no single-arc complement, so only membership is
        // negatable.
        match self {
            SetConstraint::Member(x, s) => {
                Some(Box::new(SetConstraint::NotMember(*x, s.clone())))
            }
            SetConstraint::NotMember(x, s) => {
                Some(Box::new(SetConstraint::Member(*x, s.clone())))
            }
            SetConstraint::Subset(_, _) | SetConstraint::Eq(_, _) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_engine::TestEngine;

    #[test]
    fn union_expression_collects_required_values() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let a = engine.new_set(vec![1, 2]);
        let b = engine.new_set(vec![2, 3]);
        let c = engine.new_set(vec![1, 2, 3, 4]);
        engine.require(a, 1).expect("possible");
        engine.require(b, 3).expect("possible");

        let constraint = SetConstraint::Eq(
            SetExpr::var(a).union(SetExpr::var(b)),
            SetExpr::var(c),
        );
        engine.post(&constraint).expect("compiles");
        engine.propagate().expect("satisfiable");

        assert!(engine.is_required(c, 1));
        assert!(engine.is_required(c, 3));
        assert!(!engine.is_possible(c, 4));
    }

    #[test]
    fn membership_prunes_the_scalar() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(0, 10);
        let s = engine.new_set(vec![2, 4, 6]);

        engine
            .post(&SetConstraint::Member(x, SetExpr::var(s)))
            .expect("compiles");
        engine.propagate().expect("satisfiable");

        assert_eq!(engine.lower_bound(x), 2);
        assert_eq!(engine.upper_bound(x), 6);
    }

    #[test]
    fn membership_truth_and_opposite() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(3, 3);
        let s = engine.new_set(vec![1, 2, 3]);

        let member = SetConstraint::Member(x, SetExpr::var(s));
        assert_eq!(engine.truth(&member), Tribool::Undetermined);

        let opposite = Constraint::<i32>::opposite(&member).expect("negatable");
        engine.post_boxed(opposite).expect("compiles");
        engine.propagate().expect("satisfiable");

        assert!(!engine.is_possible(s, 3));
        assert_eq!(engine.truth(&member), Tribool::False);
    }

    #[test]
    fn subset_truth_over_bound_sets() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let a = engine.new_set(vec![1, 2]);
        let b = engine.new_set(vec![1, 2, 3]);
        engine.require(a, 1).expect("possible");
        engine.exclude(a, 2).expect("not required");
        engine.require(b, 1).expect("possible");
        engine.require(b, 2).expect("possible");
        engine.require(b, 3).expect("possible");

        let constraint = SetConstraint::Subset(SetExpr::var(a), SetExpr::var(b));
        assert_eq!(engine.truth(&constraint), Tribool::True);
    }
}
