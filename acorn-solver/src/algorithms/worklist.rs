use std::collections::VecDeque;

use super::AlgorithmStrength;
use super::PropagationAlgorithm;
use crate::arcs::ArcId;
use crate::basic_types::PropagationStatus;
use crate::containers::StorageKey;
use crate::domains::DomainValue;
use crate::graph::ChangeBatch;
use crate::graph::NodeArcGraph;

/// The production fixpoint driver (AC-3): a FIFO of dirty arcs with an
/// enqueued flag per arc.
///
/// After each arc evaluation the node deltas are drained and every watcher
/// whose event mask intersects the delta is enqueued, including the arc that
/// was just run if it changed a node it watches. Arcs posted during the
/// evaluation (reification) are installed and enqueued before the next pop.
#[derive(Debug, Default)]
pub struct WorklistPropagator {
    strength: AlgorithmStrength,
    queue: VecDeque<ArcId>,
    enqueued: Vec<bool>,
}

impl WorklistPropagator {
    pub fn new(strength: AlgorithmStrength) -> Self {
        WorklistPropagator {
            strength,
            queue: VecDeque::new(),
            enqueued: Vec::new(),
        }
    }

    fn enqueue(&mut self, arc: ArcId) {
        if arc.index() >= self.enqueued.len() {
            self.enqueued.resize(arc.index() + 1, false);
        }
        if !self.enqueued[arc.index()] {
            self.enqueued[arc.index()] = true;
            self.queue.push_back(arc);
        }
    }

    fn enqueue_dependents<T: DomainValue>(
        &mut self,
        graph: &NodeArcGraph<T>,
        batch: &ChangeBatch,
    ) {
        let mut wake = Vec::new();
        for &(node, events) in &batch.scalars {
            for &(arc, mask) in graph.scalar_watchers(node) {
                if mask.intersects(events) {
                    wake.push(arc);
                }
            }
        }
        for &(set, events) in &batch.sets {
            for &(arc, mask) in graph.set_watchers(set) {
                if mask.intersects(events) {
                    wake.push(arc);
                }
            }
        }
        for arc in wake {
            self.enqueue(arc);
        }
    }
}

impl<T: DomainValue> PropagationAlgorithm<T> for WorklistPropagator {
    fn propagate(&mut self, graph: &mut NodeArcGraph<T>) -> PropagationStatus {
        for arc in graph.drain_fresh() {
            self.enqueue(arc);
        }
        let batch = graph.drain_changes();
        self.enqueue_dependents(graph, &batch);

        let mut evaluations = 0u64;
        while let Some(arc) = self.queue.pop_front() {
            self.enqueued[arc.index()] = false;
            evaluations += 1;
            if let Err(failure) = graph.propagate_arc(arc, self.strength) {
                log::debug!("propagation failed at {:?} after {evaluations} evaluations", arc);
                // The queue must not leak into an unrelated later run.
                self.queue.clear();
                self.enqueued.fill(false);
                return Err(failure);
            }
            for installed in graph.install_pending() {
                self.enqueue(installed);
            }
            let batch = graph.drain_changes();
            self.enqueue_dependents(graph, &batch);
        }
        log::debug!("fixpoint reached after {evaluations} arc evaluations");
        Ok(())
    }
}
