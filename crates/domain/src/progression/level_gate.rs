//! Level gating: which subclass levels a character has unlocked.

use serde::Serialize;

use crate::entities::Subclass;
use crate::value_objects::CharacterLevel;

/// Block levels unlocked at `level`, ascending.
pub fn available_levels(subclass: &Subclass, level: CharacterLevel) -> Vec<u8> {
    LevelGate::partition(subclass, level).available
}

/// Block levels still locked at `level`, ascending.
pub fn locked_levels(subclass: &Subclass, level: CharacterLevel) -> Vec<u8> {
    LevelGate::partition(subclass, level).locked
}

/// Available/locked split of a subclass's levels for one character level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelGate {
    pub character_level: CharacterLevel,
    pub available: Vec<u8>,
    pub locked: Vec<u8>,
}

impl LevelGate {
    pub fn partition(subclass: &Subclass, level: CharacterLevel) -> Self {
        let mut levels: Vec<u8> = subclass.level_numbers().collect();
        levels.sort_unstable();
        levels.dedup();

        let (available, locked): (Vec<u8>, Vec<u8>) =
            levels.into_iter().partition(|l| level.unlocks(*l));

        Self {
            character_level: level,
            available,
            locked,
        }
    }

    /// Lowest locked level, i.e. the next level that will unlock something.
    pub fn next_unlock(&self) -> Option<u8> {
        self.locked.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::LevelBlock;

    fn subclass_with_levels(levels: &[u8]) -> Subclass {
        Subclass::new(
            "Charms",
            "",
            levels.iter().map(|l| LevelBlock::new(*l)).collect(),
        )
        .expect("valid subclass")
    }

    fn level(l: u8) -> CharacterLevel {
        CharacterLevel::new(l).expect("valid level")
    }

    #[test]
    fn splits_non_contiguous_levels() {
        let subclass = subclass_with_levels(&[14, 1, 9, 6, 18, 10]);
        assert_eq!(available_levels(&subclass, level(9)), vec![1, 6, 9]);
        assert_eq!(locked_levels(&subclass, level(9)), vec![10, 14, 18]);
    }

    #[test]
    fn level_one_character_sees_only_first_block() {
        let subclass = subclass_with_levels(&[1, 6, 10]);
        let gate = LevelGate::partition(&subclass, level(1));
        assert_eq!(gate.available, vec![1]);
        assert_eq!(gate.locked, vec![6, 10]);
        assert_eq!(gate.next_unlock(), Some(6));
    }

    #[test]
    fn max_level_unlocks_everything() {
        let subclass = subclass_with_levels(&[1, 6, 10, 14, 18]);
        let gate = LevelGate::partition(&subclass, level(20));
        assert_eq!(gate.available, vec![1, 6, 10, 14, 18]);
        assert!(gate.locked.is_empty());
        assert_eq!(gate.next_unlock(), None);
    }

    #[test]
    fn subclass_starting_above_level_is_fully_locked() {
        let subclass = subclass_with_levels(&[3, 7]);
        assert!(available_levels(&subclass, level(2)).is_empty());
        assert_eq!(locked_levels(&subclass, level(2)), vec![3, 7]);
    }

    #[test]
    fn partition_is_exact_for_every_level() {
        let subclass = subclass_with_levels(&[1, 6, 9, 10, 14, 18]);
        let all: Vec<u8> = subclass.level_numbers().collect();

        for l in 1..=20 {
            let gate = LevelGate::partition(&subclass, level(l));

            let mut union: Vec<u8> = gate.available.iter().chain(&gate.locked).copied().collect();
            union.sort_unstable();
            assert_eq!(union, all, "union mismatch at level {}", l);

            if let (Some(max_avail), Some(min_locked)) =
                (gate.available.last(), gate.locked.first())
            {
                assert!(*max_avail <= l && l < *min_locked, "boundary broken at {}", l);
            }
        }
    }
}
