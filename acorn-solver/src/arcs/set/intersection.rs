use super::candidate_values;
use crate::arcs::Arc;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationStatus;
use crate::domains::DomainValue;
use crate::domains::SetDomainEvents;
use crate::nodes::SetNodeId;

/// An arc maintaining `a ∩ b = c`.
#[derive(Debug)]
pub struct SetIntersectionArc {
    a: SetNodeId,
    b: SetNodeId,
    c: SetNodeId,
}

impl SetIntersectionArc {
    pub fn new(a: SetNodeId, b: SetNodeId, c: SetNodeId) -> Self {
        SetIntersectionArc { a, b, c }
    }
}

impl<T: DomainValue> Arc<T> for SetIntersectionArc {
    fn name(&self) -> &str {
        "SetIntersection"
    }

    fn watches(&self) -> Vec<Watch> {
        vec![
            Watch::Set(self.a, SetDomainEvents::ANY),
            Watch::Set(self.b, SetDomainEvents::ANY),
            Watch::Set(self.c, SetDomainEvents::ANY),
        ]
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        for value in candidate_values(context, &[self.a, self.b, self.c]) {
            if context.is_required(self.a, value) && context.is_required(self.b, value) {
                context.require(self.c, value)?;
            }
            if !context.is_possible(self.a, value) || !context.is_possible(self.b, value) {
                context.exclude(self.c, value)?;
            }
            if context.is_required(self.c, value) {
                context.require(self.a, value)?;
                context.require(self.b, value)?;
            }
            if !context.is_possible(self.c, value) {
                // Both operands holding the value would put it in the
                // intersection.
                if context.is_required(self.a, value) {
                    context.exclude(self.b, value)?;
                }
                if context.is_required(self.b, value) {
                    context.exclude(self.a, value)?;
                }
            }
        }
        Ok(())
    }
}
