use crate::types::{ShardOperationalState, ShardTargetState};

/// Whether a shard in `current` state has reached what `target` asks of it.
pub fn satisfies(current: ShardOperationalState, target: ShardTargetState) -> bool {
    match target {
        ShardTargetState::MayDisappear => matches!(
            current,
            ShardOperationalState::MayDisappear
                | ShardOperationalState::Drained
                | ShardOperationalState::Provisioning
                | ShardOperationalState::MigratingData
        ),
        ShardTargetState::Drained => current == ShardOperationalState::Drained,
    }
}

#[cfg(test)]
mod tests {
    use super::satisfies;
    use crate::types::{ShardOperationalState, ShardTargetState};

    #[test]
    fn exhaustive_over_all_pairs() {
        for current in ShardOperationalState::ALL {
            let may_disappear = matches!(
                current,
                ShardOperationalState::MayDisappear
                    | ShardOperationalState::Drained
                    | ShardOperationalState::Provisioning
                    | ShardOperationalState::MigratingData
            );
            assert_eq!(
                satisfies(current, ShardTargetState::MayDisappear),
                may_disappear,
                "{current} vs MAY_DISAPPEAR"
            );
            assert_eq!(
                satisfies(current, ShardTargetState::Drained),
                current == ShardOperationalState::Drained,
                "{current} vs DRAINED"
            );
        }
    }

    #[test]
    fn migrating_data_only_satisfies_may_disappear() {
        assert!(satisfies(
            ShardOperationalState::MigratingData,
            ShardTargetState::MayDisappear
        ));
        assert!(!satisfies(
            ShardOperationalState::MigratingData,
            ShardTargetState::Drained
        ));
    }
}
