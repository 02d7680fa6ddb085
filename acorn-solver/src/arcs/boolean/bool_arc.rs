use super::infer_left;
use super::infer_right;
use super::result_of;
use super::BoolOperator;
use super::Tribool;
use crate::acorn_assert_simple;
use crate::arcs::Arc;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationFailure;
use crate::basic_types::PropagationStatus;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;
use crate::nodes::BoolNode;

/// An operand of a boolean arc: either a boolean node or a constant.
#[derive(Clone, Copy, Debug)]
pub enum BoolOperand {
    Node(BoolNode),
    Const(bool),
}

impl BoolOperand {
    fn read<T: DomainValue>(self, domains: &dyn ReadDomains<T>) -> Tribool {
        match self {
            BoolOperand::Node(node) => domains.tribool(node),
            BoolOperand::Const(value) => Tribool::from_bool(value),
        }
    }
}

/// An arc maintaining `x op y = z` over three-valued boolean operands (`x op
/// = z` for the unary `Not`). A value is inferred for an operand only when
/// the other operands are determined and the operator pins it.
#[derive(Debug)]
pub struct BoolArc {
    op: BoolOperator,
    x: BoolOperand,
    y: Option<BoolOperand>,
    z: BoolOperand,
}

impl BoolArc {
    pub fn new(op: BoolOperator, x: BoolOperand, y: Option<BoolOperand>, z: BoolOperand) -> Self {
        acorn_assert_simple!(
            op.is_unary() == y.is_none(),
            "boolean arc arity does not match its operator"
        );
        BoolArc { op, x, y, z }
    }

    /// The arc forcing `operand` to be true.
    pub fn force(operand: BoolOperand) -> Self {
        BoolArc::new(
            BoolOperator::Eq,
            operand,
            Some(BoolOperand::Const(true)),
            BoolOperand::Const(true),
        )
    }

    fn bind<T: DomainValue>(
        &self,
        context: &mut PropagationContext<'_, T>,
        operand: BoolOperand,
        value: bool,
    ) -> PropagationStatus {
        match operand {
            BoolOperand::Node(node) => context.bind_bool(node, value),
            BoolOperand::Const(constant) => {
                if constant == value {
                    Ok(())
                } else {
                    Err(PropagationFailure::for_variable(Arc::<T>::name(self)))
                }
            }
        }
    }
}

impl<T: DomainValue> Arc<T> for BoolArc {
    fn name(&self) -> &str {
        match self.op {
            BoolOperator::And => "BoolAnd",
            BoolOperator::Or => "BoolOr",
            BoolOperator::Xor => "BoolXor",
            BoolOperator::Implies => "BoolImplies",
            BoolOperator::Eq => "BoolEq",
            BoolOperator::Not => "BoolNot",
        }
    }

    fn watches(&self) -> Vec<Watch> {
        [Some(self.x), self.y, Some(self.z)]
            .into_iter()
            .flatten()
            .filter_map(|operand| match operand {
                BoolOperand::Node(node) => Some(Watch::Scalar(node.node(), DomainEvents::ASSIGN)),
                BoolOperand::Const(_) => None,
            })
            .collect()
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        // Inferring one operand can enable inferring another, so iterate to a
        // local fixpoint; with three operands this terminates quickly.
        loop {
            let x = self.x.read(context);
            let y = self.y.map_or(Tribool::Undetermined, |y| y.read(context));
            let z = self.z.read(context);

            let mut changed = false;

            if z.as_bool().is_none() {
                if let Some(result) = result_of(self.op, x, y).as_bool() {
                    self.bind(context, self.z, result)?;
                    changed = true;
                }
            }

            if let Some(result) = self.z.read(context).as_bool() {
                if x.as_bool().is_none() {
                    if let Some(value) = infer_left(self.op, result, y).as_bool() {
                        self.bind(context, self.x, value)?;
                        changed = true;
                    }
                }
                if let Some(y_operand) = self.y {
                    if y.as_bool().is_none() {
                        if let Some(value) = infer_right(self.op, result, x).as_bool() {
                            self.bind(context, y_operand, value)?;
                            changed = true;
                        }
                    }
                }
            }

            if !changed {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_engine::TestEngine;

    #[test]
    fn and_of_true_operands_determines_the_result() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_bool();
        let y = engine.new_bool();
        let z = engine.new_bool();
        let _ = engine.add_arc(BoolArc::new(
            BoolOperator::And,
            BoolOperand::Node(x),
            Some(BoolOperand::Node(y)),
            BoolOperand::Node(z),
        ));

        engine.bind_bool(x, true).expect("consistent");
        engine.bind_bool(y, true).expect("consistent");
        engine.propagate().expect("no empty domains");

        assert_eq!(engine.tribool(z), Tribool::True);
    }

    #[test]
    fn and_result_false_with_one_true_operand_forces_the_other() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_bool();
        let y = engine.new_bool();
        let z = engine.new_bool();
        let _ = engine.add_arc(BoolArc::new(
            BoolOperator::And,
            BoolOperand::Node(x),
            Some(BoolOperand::Node(y)),
            BoolOperand::Node(z),
        ));

        engine.bind_bool(z, false).expect("consistent");
        engine.bind_bool(x, true).expect("consistent");
        engine.propagate().expect("no empty domains");

        assert_eq!(engine.tribool(y), Tribool::False);
    }

    #[test]
    fn implication_is_asymmetric() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_bool();
        let y = engine.new_bool();
        let _ = engine.add_arc(BoolArc::new(
            BoolOperator::Implies,
            BoolOperand::Node(x),
            Some(BoolOperand::Node(y)),
            BoolOperand::Const(true),
        ));

        // A false conclusion forces a false premise.
        engine.bind_bool(y, false).expect("consistent");
        engine.propagate().expect("no empty domains");

        assert_eq!(engine.tribool(x), Tribool::False);
    }

    #[test]
    fn negated_views_propagate_through_polarity() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_bool();
        let z = engine.new_bool();
        let _ = engine.add_arc(BoolArc::new(
            BoolOperator::Not,
            BoolOperand::Node(x),
            None,
            BoolOperand::Node(z),
        ));

        engine.bind_bool(x, true).expect("consistent");
        engine.propagate().expect("no empty domains");

        assert_eq!(engine.tribool(z), Tribool::False);
        assert_eq!(engine.tribool(!z), Tribool::True);
    }

    #[test]
    fn contradicting_a_constant_operand_fails() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_bool();
        let _ = engine.add_arc(BoolArc::force(BoolOperand::Node(x)));

        engine.bind_bool(x, false).expect("consistent");
        assert!(engine.propagate().is_err());
    }

    #[test]
    fn chained_inference_reaches_a_local_fixpoint_in_one_call() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_bool();
        let y = engine.new_bool();
        let z = engine.new_bool();
        // x or y = z, with z false: both operands follow in a single
        // propagation of the arc.
        let _ = engine.add_arc(BoolArc::new(
            BoolOperator::Or,
            BoolOperand::Node(x),
            Some(BoolOperand::Node(y)),
            BoolOperand::Node(z),
        ));

        engine.bind_bool(z, false).expect("consistent");
        engine.propagate().expect("no empty domains");

        assert_eq!(engine.tribool(x), Tribool::False);
        assert_eq!(engine.tribool(y), Tribool::False);
    }
}
