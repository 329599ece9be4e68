//! Property-based checks: the queue against a plain FIFO reference model,
//! and the timestamp arithmetic against integer nanosecond math.

mod common;

use common::{init_test_logging, test_proptest_config};
use handover::lab::{self, Handoff, LabFiber};
use handover::{Events, Timespec, WaitQueue};
use proptest::prelude::*;

const NAMES: [&str; 8] = ["w0", "w1", "w2", "w3", "w4", "w5", "w6", "w7"];

#[derive(Debug, Clone)]
enum Op {
    Push { name: usize, alive: bool },
    Flush,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..NAMES.len(), any::<bool>()).prop_map(|(name, alive)| Op::Push { name, alive }),
        1 => Just(Op::Flush),
    ]
}

proptest! {
    #![proptest_config(test_proptest_config(256))]

    #[test]
    fn queue_drains_like_a_fifo_model(ops in proptest::collection::vec(op_strategy(), 0..48)) {
        init_test_logging();
        let _ = lab::take_handoffs();
        let queue = WaitQueue::new();
        let mut model: Vec<(usize, bool)> = Vec::new();

        for op in ops {
            match op {
                Op::Push { name, alive } => {
                    let fiber = LabFiber::new(NAMES[name]);
                    if !alive {
                        fiber.kill();
                    }
                    queue.push(fiber);
                    model.push((name, alive));
                }
                Op::Flush => {
                    let count = queue.flush().expect("echo scripts never raise");
                    prop_assert_eq!(count, model.len());
                    prop_assert!(queue.is_empty());

                    let expected: Vec<Handoff> = model
                        .iter()
                        .filter(|(_, alive)| *alive)
                        .map(|(name, _)| Handoff::Transfer {
                            to: NAMES[*name],
                            value: Events::NONE,
                        })
                        .collect();
                    prop_assert_eq!(lab::take_handoffs(), expected);
                    model.clear();
                }
            }
        }

        prop_assert_eq!(queue.len(), model.len());
    }

    #[test]
    fn elapsed_matches_integer_nanosecond_math(
        start_secs in -1_000_000i64..1_000_000,
        start_nanos in 0u32..1_000_000_000,
        stop_secs in -1_000_000i64..1_000_000,
        stop_nanos in 0u32..1_000_000_000,
    ) {
        let start = Timespec::new(start_secs, start_nanos);
        let stop = Timespec::new(stop_secs, stop_nanos);
        let span = stop.duration_since(start);

        prop_assert!(span.subsec_nanos() < 1_000_000_000);

        let to_nanos = |t: Timespec| i128::from(t.secs()) * 1_000_000_000 + i128::from(t.subsec_nanos());
        prop_assert_eq!(to_nanos(span), to_nanos(stop) - to_nanos(start));
    }
}
