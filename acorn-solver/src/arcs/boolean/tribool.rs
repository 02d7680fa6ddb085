//! Three-valued boolean logic. The propagation rules are pure functions over
//! the [`Tribool`] variant and the operator tag, which keeps the full rule set
//! exhaustively testable: every operator has at most 27 input combinations.

/// The state of a boolean-valued node: determined true, determined false, or
/// not yet determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tribool {
    True,
    False,
    Undetermined,
}

impl Tribool {
    pub fn from_bool(value: bool) -> Tribool {
        if value {
            Tribool::True
        } else {
            Tribool::False
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Tribool::True => Some(true),
            Tribool::False => Some(false),
            Tribool::Undetermined => None,
        }
    }

    pub fn is_determined(self) -> bool {
        self != Tribool::Undetermined
    }

    pub fn negate(self) -> Tribool {
        match self {
            Tribool::True => Tribool::False,
            Tribool::False => Tribool::True,
            Tribool::Undetermined => Tribool::Undetermined,
        }
    }
}

/// The logical operator of a boolean arc. `Not` is unary; the remaining
/// operators are binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoolOperator {
    And,
    Or,
    Xor,
    Implies,
    Eq,
    Not,
}

impl BoolOperator {
    pub fn is_unary(self) -> bool {
        self == BoolOperator::Not
    }

    pub fn evaluate(self, x: bool, y: bool) -> bool {
        match self {
            BoolOperator::And => x && y,
            BoolOperator::Or => x || y,
            BoolOperator::Xor => x != y,
            BoolOperator::Implies => !x || y,
            BoolOperator::Eq => x == y,
            BoolOperator::Not => !x,
        }
    }
}

/// The result of `x op y`, determined only when the operands pin it.
pub fn result_of(op: BoolOperator, x: Tribool, y: Tribool) -> Tribool {
    use Tribool::*;

    match op {
        BoolOperator::Not => x.negate(),
        BoolOperator::And => match (x, y) {
            (False, _) | (_, False) => False,
            (True, True) => True,
            _ => Undetermined,
        },
        BoolOperator::Or => match (x, y) {
            (True, _) | (_, True) => True,
            (False, False) => False,
            _ => Undetermined,
        },
        BoolOperator::Xor => match (x.as_bool(), y.as_bool()) {
            (Some(x), Some(y)) => Tribool::from_bool(x != y),
            _ => Undetermined,
        },
        BoolOperator::Eq => match (x.as_bool(), y.as_bool()) {
            (Some(x), Some(y)) => Tribool::from_bool(x == y),
            _ => Undetermined,
        },
        BoolOperator::Implies => match (x, y) {
            (False, _) | (_, True) => True,
            (True, False) => False,
            _ => Undetermined,
        },
    }
}

/// Infers the left operand of `x op y = result`, given the determined result
/// and the state of the right operand.
pub fn infer_left(op: BoolOperator, result: bool, right: Tribool) -> Tribool {
    use Tribool::*;

    match op {
        BoolOperator::Not => Tribool::from_bool(!result),
        BoolOperator::And => {
            if result {
                True
            } else if right == True {
                False
            } else {
                Undetermined
            }
        }
        BoolOperator::Or => {
            if !result {
                False
            } else if right == False {
                True
            } else {
                Undetermined
            }
        }
        BoolOperator::Xor => match right.as_bool() {
            Some(right) => Tribool::from_bool(result != right),
            None => Undetermined,
        },
        BoolOperator::Eq => match right.as_bool() {
            Some(right) => Tribool::from_bool(result == right),
            None => Undetermined,
        },
        BoolOperator::Implies => {
            if !result {
                True
            } else if right == False {
                False
            } else {
                Undetermined
            }
        }
    }
}

/// Infers the right operand of `x op y = result`, given the determined result
/// and the state of the left operand.
pub fn infer_right(op: BoolOperator, result: bool, left: Tribool) -> Tribool {
    use Tribool::*;

    match op {
        // The unary operator has no right operand to infer.
        BoolOperator::Not => Undetermined,
        BoolOperator::And | BoolOperator::Or | BoolOperator::Xor | BoolOperator::Eq => {
            infer_left(op, result, left)
        }
        BoolOperator::Implies => {
            if !result {
                False
            } else if left == True {
                True
            } else {
                Undetermined
            }
        }
    }
}
