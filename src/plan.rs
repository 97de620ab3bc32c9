// src/plan.rs
use crate::TransferRecord;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum Operation {
    MoveToken {
        asset_id: u64,
        from: Uuid,
        to: Uuid,
    },
    RecordTransfer {
        record: TransferRecord,
    },
}

/// An ordered set of writes the adapter must apply as a unit.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    operations: Vec<Operation>,
}

impl ExecutionPlan {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    pub fn add(&mut self, op: Operation) {
        self.operations.push(op);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// `(asset_id, expected_holder)` pairs the adapter must lock and verify
    /// before applying any operation.
    pub fn required_holds(&self) -> Vec<(u64, Uuid)> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                Operation::MoveToken { asset_id, from, .. } => Some((*asset_id, *from)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_holds_name_the_moved_tokens() {
        let from = Uuid::now_v7();
        let to = Uuid::now_v7();

        let mut plan = ExecutionPlan::new();
        plan.add(Operation::MoveToken {
            asset_id: 3,
            from,
            to,
        });
        plan.add(Operation::RecordTransfer {
            record: TransferRecord::new(3, from, to),
        });

        assert_eq!(plan.required_holds(), vec![(3, from)]);
    }
}
