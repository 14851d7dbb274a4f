use proptest::prelude::*;
use triage_queue::NewPatient;

/// Strategy for generating valid triage levels
pub fn urgency_level_strategy() -> impl Strategy<Value = i64> {
    1i64..=5
}

/// Strategy for generating intakes that pass validation
pub fn valid_intake_strategy() -> impl Strategy<Value = NewPatient> {
    (
        "[A-Z][a-z]{1,12}",
        0i64..=120,
        urgency_level_strategy(),
        "[a-z]{3,20}( [a-z]{3,10}){0,3}",
    )
        .prop_map(|(name, age, level, symptoms)| NewPatient::new(name, age, level, symptoms))
}

/// One step of a random workload against the queue
#[derive(Debug, Clone)]
pub enum QueueOp {
    Add(i64),
    /// Treat the head of the waiting queue, if any
    TreatHead,
    /// Target the n-th registered patient (modulo the count)
    Treat(usize),
    Discharge(usize),
    Staff(u32),
}

pub fn queue_op_strategy() -> impl Strategy<Value = QueueOp> {
    prop_oneof![
        4 => urgency_level_strategy().prop_map(QueueOp::Add),
        2 => Just(QueueOp::TreatHead),
        2 => any::<usize>().prop_map(QueueOp::Treat),
        3 => any::<usize>().prop_map(QueueOp::Discharge),
        1 => (1u32..=8).prop_map(QueueOp::Staff),
    ]
}

pub fn queue_ops_strategy() -> impl Strategy<Value = Vec<QueueOp>> {
    prop::collection::vec(queue_op_strategy(), 1..60)
}
