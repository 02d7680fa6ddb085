use super::candidate_values;
use crate::arcs::Arc;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationStatus;
use crate::domains::DomainValue;
use crate::domains::SetDomainEvents;
use crate::nodes::SetNodeId;

/// An arc maintaining `a ∪ b = c`.
#[derive(Debug)]
pub struct SetUnionArc {
    a: SetNodeId,
    b: SetNodeId,
    c: SetNodeId,
}

impl SetUnionArc {
    pub fn new(a: SetNodeId, b: SetNodeId, c: SetNodeId) -> Self {
        SetUnionArc { a, b, c }
    }
}

impl<T: DomainValue> Arc<T> for SetUnionArc {
    fn name(&self) -> &str {
        "SetUnion"
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
            if context.is_required(self.a, value) || context.is_required(self.b, value) {
                context.require(self.c, value)?;
            }
            if !context.is_possible(self.c, value) {
                context.exclude(self.a, value)?;
                context.exclude(self.b, value)?;
            }
            if !context.is_possible(self.a, value) && !context.is_possible(self.b, value) {
                context.exclude(self.c, value)?;
            }
            if context.is_required(self.c, value) {
                // The value must come from somewhere.
                if !context.is_possible(self.a, value) {
                    context.require(self.b, value)?;
                }
                if !context.is_possible(self.b, value) {
                    context.require(self.a, value)?;
                }
            }
        }
        Ok(())
    }
}
