use super::candidate_values;
use crate::arcs::Arc;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationStatus;
use crate::domains::DomainValue;
use crate::domains::SetDomainEvents;
use crate::nodes::SetNodeId;

/// An arc maintaining `a ⊆ b`.
#[derive(Debug)]
pub struct SubsetArc {
    a: SetNodeId,
    b: SetNodeId,
}

impl SubsetArc {
    pub fn new(a: SetNodeId, b: SetNodeId) -> Self {
        SubsetArc { a, b }
    }
}

impl<T: DomainValue> Arc<T> for SubsetArc {
    fn name(&self) -> &str {
        "Subset"
    }

    fn watches(&self) -> Vec<Watch> {
        vec![
            Watch::Set(self.a, SetDomainEvents::ANY),
            Watch::Set(self.b, SetDomainEvents::ANY),
        ]
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        for value in candidate_values(context, &[self.a, self.b]) {
            if context.is_required(self.a, value) {
                context.require(self.b, value)?;
            }
            if !context.is_possible(self.b, value) {
                context.exclude(self.a, value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_engine::TestEngine;

    #[test]
    fn subset_members_flow_up_and_exclusions_flow_down() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let a = engine.new_set(vec![1, 2, 3]);
        let b = engine.new_set(vec![1, 2]);
        let _ = engine.add_arc(SubsetArc::new(a, b));

        engine.require(a, 1).expect("consistent");
        engine.propagate().expect("no empty domains");

        assert!(engine.is_required(b, 1));
        // 3 has no home in the superset.
        assert!(!engine.is_possible(a, 3));
    }
}
