use super::Constraint;
use crate::arcs::boolean::result_of;
use crate::arcs::boolean::BoolArc;
use crate::arcs::boolean::BoolOperand;
use crate::arcs::boolean::BoolOperator;
use crate::arcs::boolean::Tribool;
use crate::arcs::ArcBuilder;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::ConstraintOperationError;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;
use crate::nodes::BoolNode;

/// A boolean expression tree over boolean nodes and constants.
///
/// Negation is free at the leaves through node polarity; `Not` over a compound
/// expression pushes inward when the constraint is negated, so an opposite
/// constraint never needs a dedicated negation arc either.
#[derive(Debug, Clone)]
pub enum BoolExpr {
    Var(BoolNode),
    Const(bool),
    Not(Box<BoolExpr>),
    And(Box<BoolExpr>, Box<BoolExpr>),
    Or(Box<BoolExpr>, Box<BoolExpr>),
    Xor(Box<BoolExpr>, Box<BoolExpr>),
    Implies(Box<BoolExpr>, Box<BoolExpr>),
    Iff(Box<BoolExpr>, Box<BoolExpr>),
}

impl BoolExpr {
    pub fn var(node: BoolNode) -> Self {
        BoolExpr::Var(node)
    }

    pub fn constant(value: bool) -> Self {
        BoolExpr::Const(value)
    }

    pub fn not(self) -> Self {
        BoolExpr::Not(Box::new(self))
    }

    pub fn and(self, other: BoolExpr) -> Self {
        BoolExpr::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: BoolExpr) -> Self {
        BoolExpr::Or(Box::new(self), Box::new(other))
    }

    pub fn xor(self, other: BoolExpr) -> Self {
        BoolExpr::Xor(Box::new(self), Box::new(other))
    }

    pub fn implies(self, other: BoolExpr) -> Self {
        BoolExpr::Implies(Box::new(self), Box::new(other))
    }

    pub fn iff(self, other: BoolExpr) -> Self {
        BoolExpr::Iff(Box::new(self), Box::new(other))
    }

    fn truth<T: DomainValue>(&self, domains: &dyn ReadDomains<T>) -> Tribool {
        match self {
            BoolExpr::Var(node) => domains.tribool(*node),
            BoolExpr::Const(value) => Tribool::from_bool(*value),
            BoolExpr::Not(x) => x.truth(domains).negate(),
            BoolExpr::And(x, y) => {
                result_of(BoolOperator::And, x.truth(domains), y.truth(domains))
            }
            BoolExpr::Or(x, y) => result_of(BoolOperator::Or, x.truth(domains), y.truth(domains)),
            BoolExpr::Xor(x, y) => {
                result_of(BoolOperator::Xor, x.truth(domains), y.truth(domains))
            }
            BoolExpr::Implies(x, y) => {
                result_of(BoolOperator::Implies, x.truth(domains), y.truth(domains))
            }
            BoolExpr::Iff(x, y) => result_of(BoolOperator::Eq, x.truth(domains), y.truth(domains)),
        }
    }

    fn collect_variables(&self, into: &mut Vec<Watch>) {
        match self {
            BoolExpr::Var(node) => into.push(Watch::Scalar(node.node(), DomainEvents::ASSIGN)),
            BoolExpr::Const(_) => {}
            BoolExpr::Not(x) => x.collect_variables(into),
            BoolExpr::And(x, y)
            | BoolExpr::Or(x, y)
            | BoolExpr::Xor(x, y)
            | BoolExpr::Implies(x, y)
            | BoolExpr::Iff(x, y) => {
                x.collect_variables(into);
                y.collect_variables(into);
            }
        }
    }

    /// The negation of the expression, with `Not` pushed to the leaves.
    fn negated(&self) -> BoolExpr {
        match self {
            BoolExpr::Var(node) => BoolExpr::Var(!*node),
            BoolExpr::Const(value) => BoolExpr::Const(!value),
            BoolExpr::Not(x) => (**x).clone(),
            BoolExpr::And(x, y) => BoolExpr::Or(Box::new(x.negated()), Box::new(y.negated())),
            BoolExpr::Or(x, y) => BoolExpr::And(Box::new(x.negated()), Box::new(y.negated())),
            BoolExpr::Xor(x, y) => BoolExpr::Iff(x.clone(), y.clone()),
            BoolExpr::Iff(x, y) => BoolExpr::Xor(x.clone(), y.clone()),
            BoolExpr::Implies(x, y) => {
                BoolExpr::And(x.clone(), Box::new(y.negated()))
            }
        }
    }

    /// Lowers the expression to an operand, materializing an anonymous
    /// boolean node for every binary operation. Negation lowers to the flipped
    /// polarity of the inner operand.
    fn lower<T: DomainValue>(&self, builder: &mut dyn ArcBuilder<T>) -> BoolOperand {
        match self {
            BoolExpr::Var(node) => BoolOperand::Node(*node),
            BoolExpr::Const(value) => BoolOperand::Const(*value),
            BoolExpr::Not(x) => match x.lower(builder) {
                BoolOperand::Node(node) => BoolOperand::Node(!node),
                BoolOperand::Const(value) => BoolOperand::Const(!value),
            },
            binary => {
                let (op, x, y) = match binary {
                    BoolExpr::And(x, y) => (BoolOperator::And, x, y),
                    BoolExpr::Or(x, y) => (BoolOperator::Or, x, y),
                    BoolExpr::Xor(x, y) => (BoolOperator::Xor, x, y),
                    BoolExpr::Implies(x, y) => (BoolOperator::Implies, x, y),
                    BoolExpr::Iff(x, y) => (BoolOperator::Eq, x, y),
                    // Leaves and Not are handled above.
                    _ => unreachable!(),
                };
                let x = x.lower(builder);
                let y = y.lower(builder);
                let z = builder.build_bool();
                builder.post_arc(Box::new(BoolArc::new(
                    op,
                    x,
                    Some(y),
                    BoolOperand::Node(z),
                )));
                BoolOperand::Node(z)
            }
        }
    }
}

/// The constraint requiring a boolean expression to hold.
#[derive(Debug, Clone)]
pub struct BoolConstraint {
    expr: BoolExpr,
}

impl BoolConstraint {
    pub fn new(expr: BoolExpr) -> Self {
        BoolConstraint { expr }
    }
}

impl<T: DomainValue> Constraint<T> for BoolConstraint {
    fn truth(&self, domains: &dyn ReadDomains<T>) -> Tribool {
        self.expr.truth(domains)
    }

    fn variables(&self) -> Vec<Watch> {
        let mut watches = Vec::new();
        self.expr.collect_variables(&mut watches);
        watches
    }

    fn compile(&self, builder: &mut dyn ArcBuilder<T>) -> Result<(), ConstraintOperationError> {
        let operand = self.expr.lower(builder);
        builder.post_arc(Box::new(BoolArc::force(operand)));
        Ok(())
    }

    fn opposite(&self) -> Option<Box<dyn Constraint<T>>> {
        Some(Box::new(BoolConstraint {
            expr: self.expr.negated(),
        }))
    }
}
