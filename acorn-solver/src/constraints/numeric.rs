use super::Constraint;
use crate::arcs::boolean::Tribool;
use crate::arcs::numeric::trig_image;
use crate::arcs::numeric::AbsArc;
use crate::arcs::numeric::BinaryRelationArc;
use crate::arcs::numeric::DiffArc;
use crate::arcs::numeric::NegArc;
use crate::arcs::numeric::NumOperand;
use crate::arcs::numeric::PowerArc;
use crate::arcs::numeric::ProductArc;
use crate::arcs::numeric::QuotientArc;
use crate::arcs::numeric::SumArc;
use crate::arcs::numeric::TrigArc;
use crate::arcs::numeric::TrigFunction;
use crate::arcs::ArcBuilder;
use crate::arcs::ArcOperator;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::ConstraintOperationError;
use crate::domains::interval_ops;
use crate::domains::Domain;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;
use crate::nodes::NodeId;

/// A numeric expression tree over variables and constants.
///
/// Compiling a relation between two expressions lowers every inner operation
/// onto a fresh intermediate node via an `Eq` arc; the top-level operation is
/// mapped directly onto one arc carrying the relation's operator.
#[derive(Debug, Clone)]
pub enum NumExpr<T> {
    Var(NodeId),
    Const(T),
    Add(Box<NumExpr<T>>, Box<NumExpr<T>>),
    Sub(Box<NumExpr<T>>, Box<NumExpr<T>>),
    Mul(Box<NumExpr<T>>, Box<NumExpr<T>>),
    Div(Box<NumExpr<T>>, Box<NumExpr<T>>),
    Neg(Box<NumExpr<T>>),
    Abs(Box<NumExpr<T>>),
    Pow(Box<NumExpr<T>>, u32),
    Trig(TrigFunction, Box<NumExpr<T>>),
}

impl<T: DomainValue> NumExpr<T> {
    pub fn var(node: NodeId) -> Self {
        NumExpr::Var(node)
    }

    pub fn constant(value: T) -> Self {
        NumExpr::Const(value)
    }

    pub fn add(self, other: NumExpr<T>) -> Self {
        NumExpr::Add(Box::new(self), Box::new(other))
    }

    pub fn sub(self, other: NumExpr<T>) -> Self {
        NumExpr::Sub(Box::new(self), Box::new(other))
    }

    pub fn mul(self, other: NumExpr<T>) -> Self {
        NumExpr::Mul(Box::new(self), Box::new(other))
    }

    pub fn div(self, other: NumExpr<T>) -> Self {
        NumExpr::Div(Box::new(self), Box::new(other))
    }

    pub fn neg(self) -> Self {
        NumExpr::Neg(Box::new(self))
    }

    pub fn abs(self) -> Self {
        NumExpr::Abs(Box::new(self))
    }

    pub fn pow(self, exponent: u32) -> Self {
        NumExpr::Pow(Box::new(self), exponent)
    }

    pub fn sin(self) -> Self {
        NumExpr::Trig(TrigFunction::Sin, Box::new(self))
    }

    pub fn cos(self) -> Self {
        NumExpr::Trig(TrigFunction::Cos, Box::new(self))
    }

    pub fn tan(self) -> Self {
        NumExpr::Trig(TrigFunction::Tan, Box::new(self))
    }

    pub fn eq(self, other: NumExpr<T>) -> RelationConstraint<T> {
        RelationConstraint::new(self, ArcOperator::Eq, other)
    }

    pub fn neq(self, other: NumExpr<T>) -> RelationConstraint<T> {
        RelationConstraint::new(self, ArcOperator::Neq, other)
    }

    pub fn lt(self, other: NumExpr<T>) -> RelationConstraint<T> {
        RelationConstraint::new(self, ArcOperator::Lt, other)
    }

    pub fn leq(self, other: NumExpr<T>) -> RelationConstraint<T> {
        RelationConstraint::new(self, ArcOperator::Leq, other)
    }

    pub fn gt(self, other: NumExpr<T>) -> RelationConstraint<T> {
        RelationConstraint::new(self, ArcOperator::Gt, other)
    }

    pub fn geq(self, other: NumExpr<T>) -> RelationConstraint<T> {
        RelationConstraint::new(self, ArcOperator::Geq, other)
    }

    fn collect_variables(&self, into: &mut Vec<Watch>) {
        match self {
            NumExpr::Var(node) => into.push(Watch::Scalar(*node, DomainEvents::ANY)),
            NumExpr::Const(_) => {}
            NumExpr::Add(x, y)
            | NumExpr::Sub(x, y)
            | NumExpr::Mul(x, y)
            | NumExpr::Div(x, y) => {
                x.collect_variables(into);
                y.collect_variables(into);
            }
            NumExpr::Neg(x) | NumExpr::Abs(x) | NumExpr::Pow(x, _) | NumExpr::Trig(_, x) => {
                x.collect_variables(into);
            }
        }
    }

    fn validate(&self) -> Result<(), ConstraintOperationError> {
        match self {
            NumExpr::Var(_) | NumExpr::Const(_) => Ok(()),
            NumExpr::Add(x, y)
            | NumExpr::Sub(x, y)
            | NumExpr::Mul(x, y)
            | NumExpr::Div(x, y) => {
                x.validate()?;
                y.validate()
            }
            NumExpr::Neg(x) | NumExpr::Abs(x) => x.validate(),
            NumExpr::Pow(x, exponent) => {
                if *exponent == 0 {
                    return Err(ConstraintOperationError::UnsupportedOperation(
                        "power expressions require a positive exponent",
                    ));
                }
                x.validate()
            }
            NumExpr::Trig(_, x) => {
                if T::INTEGRAL {
                    return Err(ConstraintOperationError::UnsupportedOperation(
                        "trigonometric expressions require a fractional value type",
                    ));
                }
                x.validate()
            }
        }
    }

    /// The current value range of the expression under interval evaluation.
    fn range(&self, domains: &dyn ReadDomains<T>) -> (T, T) {
        let full = (T::min_value(), T::max_value());
        match self {
            NumExpr::Var(node) => (domains.min(*node), domains.max(*node)),
            NumExpr::Const(value) => (*value, *value),
            NumExpr::Add(x, y) => {
                let (xl, xh) = x.range(domains);
                let (yl, yh) = y.range(domains);
                interval_ops::add_bounds(xl, xh, yl, yh)
            }
            NumExpr::Sub(x, y) => {
                let (xl, xh) = x.range(domains);
                let (yl, yh) = y.range(domains);
                interval_ops::sub_bounds(xl, xh, yl, yh)
            }
            NumExpr::Mul(x, y) => {
                let (xl, xh) = x.range(domains);
                let (yl, yh) = y.range(domains);
                interval_ops::mul_bounds(xl, xh, yl, yh)
            }
            NumExpr::Div(x, y) => {
                let (xl, xh) = x.range(domains);
                let (yl, yh) = y.range(domains);
                interval_ops::div_bounds(xl, xh, yl, yh, false, domains.tolerance())
                    .unwrap_or(full)
            }
            NumExpr::Neg(x) => {
                let (xl, xh) = x.range(domains);
                (xh.neg_sat(), xl.neg_sat())
            }
            NumExpr::Abs(x) => {
                let (xl, xh) = x.range(domains);
                let zero = T::zero();
                if zero.leq_within(xl, domains.tolerance()) {
                    (xl, xh)
                } else if xh.leq_within(zero, domains.tolerance()) {
                    (xh.neg_sat(), xl.neg_sat())
                } else {
                    (zero, xl.neg_sat().max_by_order(xh))
                }
            }
            NumExpr::Pow(x, exponent) => {
                let (xl, xh) = x.range(domains);
                let pow = |value: T| {
                    let mut result = T::one();
                    for _ in 0..*exponent {
                        result = result.mul_sat(value);
                    }
                    result
                };
                let zero = T::zero();
                if exponent % 2 == 1 || zero.leq_within(xl, domains.tolerance()) {
                    (pow(xl), pow(xh))
                } else if xh.leq_within(zero, domains.tolerance()) {
                    (pow(xh), pow(xl))
                } else {
                    (zero, pow(xl.neg_sat().max_by_order(xh)))
                }
            }
            NumExpr::Trig(function, x) => {
                let (xl, xh) = x.range(domains);
                match trig_image(*function, xl.to_f64(), xh.to_f64()) {
                    Some((lo, hi)) => (T::from_f64_down(lo), T::from_f64_up(hi)),
                    None => full,
                }
            }
        }
    }

    /// Lowers the expression to an operand, materializing an anonymous node
    /// for every compound operation.
    fn lower(
        &self,
        builder: &mut dyn ArcBuilder<T>,
    ) -> Result<NumOperand<T>, ConstraintOperationError> {
        match self {
            NumExpr::Var(node) => Ok(NumOperand::Node(*node)),
            NumExpr::Const(value) => Ok(NumOperand::Const(*value)),
            compound => {
                let (lo, hi) = compound.range(&*builder);
                let node = builder.build_node(Domain::interval(lo, hi, builder.tolerance()));
                compound.post_onto(ArcOperator::Eq, NumOperand::Node(node), builder)?;
                Ok(NumOperand::Node(node))
            }
        }
    }

    /// Posts the arc maintaining `self op target`.
    fn post_onto(
        &self,
        op: ArcOperator,
        target: NumOperand<T>,
        builder: &mut dyn ArcBuilder<T>,
    ) -> Result<(), ConstraintOperationError> {
        match self {
            NumExpr::Var(_) | NumExpr::Const(_) => {
                let operand = self.lower(builder)?;
                builder.post_arc(Box::new(BinaryRelationArc::new(operand, op, target)));
            }
            NumExpr::Add(x, y) => {
                let x = x.lower(builder)?;
                let y = y.lower(builder)?;
                builder.post_arc(Box::new(SumArc::new(x, y, op, target)));
            }
            NumExpr::Sub(x, y) => {
                let x = x.lower(builder)?;
                let y = y.lower(builder)?;
                builder.post_arc(Box::new(DiffArc::new(x, y, op, target)));
            }
            NumExpr::Mul(x, y) => {
                let x = x.lower(builder)?;
                let y = y.lower(builder)?;
                builder.post_arc(Box::new(ProductArc::new(x, y, op, target)));
            }
            NumExpr::Div(x, y) => {
                let x = x.lower(builder)?;
                let y = y.lower(builder)?;
                builder.post_arc(Box::new(QuotientArc::new(x, y, op, target)));
            }
            NumExpr::Neg(x) => {
                let x = x.lower(builder)?;
                builder.post_arc(Box::new(NegArc::new(x, op, target)));
            }
            NumExpr::Abs(x) => {
                let x = x.lower(builder)?;
                builder.post_arc(Box::new(AbsArc::new(x, op, target)));
            }
            NumExpr::Pow(x, exponent) => {
                if *exponent == 0 {
                    return Err(ConstraintOperationError::UnsupportedOperation(
                        "power expressions require a positive exponent",
                    ));
                }
                let x = x.lower(builder)?;
                builder.post_arc(Box::new(PowerArc::new(x, *exponent, op, target)));
            }
            NumExpr::Trig(function, x) => {
                let x = x.lower(builder)?;
                builder.post_arc(Box::new(TrigArc::new(*function, x, op, target)?));
            }
        }
        Ok(())
    }
}

/// The constraint `lhs op rhs` between two numeric expressions.
#[derive(Debug, Clone)]
pub struct RelationConstraint<T> {
    lhs: NumExpr<T>,
    op: ArcOperator,
    rhs: NumExpr<T>,
}

impl<T: DomainValue> RelationConstraint<T> {
    pub fn new(lhs: NumExpr<T>, op: ArcOperator, rhs: NumExpr<T>) -> Self {
        RelationConstraint { lhs, op, rhs }
    }
}

/// The truth of `left op right` over value ranges: true when every pair
/// satisfies the relation, false when none does.
pub(crate) fn relation_truth<T: DomainValue>(
    op: ArcOperator,
    left: (T, T),
    right: (T, T),
    tolerance: T,
) -> Tribool {
    let (ll, lh) = left;
    let (rl, rh) = right;
    match op {
        ArcOperator::Eq => {
            if ll.eq_within(lh, tolerance) && rl.eq_within(rh, tolerance) && ll.eq_within(rl, tolerance) {
                Tribool::True
            } else if lh.lt_within(rl, tolerance) || rh.lt_within(ll, tolerance) {
                Tribool::False
            } else {
                Tribool::Undetermined
            }
        }
        ArcOperator::Neq => relation_truth(ArcOperator::Eq, left, right, tolerance).negate(),
        ArcOperator::Lt => {
            if lh.lt_within(rl, tolerance) {
                Tribool::True
            } else if rh.leq_within(ll, tolerance) {
                Tribool::False
            } else {
                Tribool::Undetermined
            }
        }
        ArcOperator::Leq => {
            if lh.leq_within(rl, tolerance) {
                Tribool::True
            } else if rh.lt_within(ll, tolerance) {
                Tribool::False
            } else {
                Tribool::Undetermined
            }
        }
        ArcOperator::Gt => relation_truth(ArcOperator::Lt, right, left, tolerance),
        ArcOperator::Geq => relation_truth(ArcOperator::Leq, right, left, tolerance),
    }
}

impl<T: DomainValue> Constraint<T> for RelationConstraint<T> {
    fn truth(&self, domains: &dyn ReadDomains<T>) -> Tribool {
        relation_truth(
            self.op,
            self.lhs.range(domains),
            self.rhs.range(domains),
            domains.tolerance(),
        )
    }

    fn variables(&self) -> Vec<Watch> {
        let mut watches = Vec::new();
        self.lhs.collect_variables(&mut watches);
        self.rhs.collect_variables(&mut watches);
        watches
    }

    fn compile(&self, builder: &mut dyn ArcBuilder<T>) -> Result<(), ConstraintOperationError> {
        self.validate()?;
        let target = self.rhs.lower(builder)?;
        self.lhs.post_onto(self.op, target, builder)
    }

    fn opposite(&self) -> Option<Box<dyn Constraint<T>>> {
        Some(Box::new(RelationConstraint {
            lhs: self.lhs.clone(),
            op: self.op.negate(),
            rhs: self.rhs.clone(),
        }))
    }

    fn validate(&self) -> Result<(), ConstraintOperationError> {
        self.lhs.validate()?;
        self.rhs.validate()
    }
}
