//! Copy-on-write item edits.
//!
//! Every helper takes an item and returns an edited copy. Auto items are
//! returned unchanged. In [`EditMode::Client`] the result is always left
//! in `spec`, and lock/confidence edits are ignored.

use estimator_types::item::{ItemKind, LineItem};
use estimator_types::pricing::{Confidence, LockState, ResolutionLevel};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    /// The studio editing its own estimate.
    #[default]
    Studio,
    /// A client exploring options; nothing they touch becomes truth.
    Client,
}

impl FromStr for EditMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "studio" => Ok(EditMode::Studio),
            "client" => Ok(EditMode::Client),
            other => Err(format!("unknown edit mode '{other}' (expected studio or client)")),
        }
    }
}

/// Set resolution, clamped to the item's minimum (default 1) and to 7.
pub fn set_resolution(item: &LineItem, level: u8, mode: EditMode) -> LineItem {
    edit(item, mode, |next| {
        let min = next.min_resolution.unwrap_or(ResolutionLevel::MIN).get();
        let clamped = level.max(min).clamp(ResolutionLevel::MIN.get(), ResolutionLevel::MAX.get());
        next.resolution = ResolutionLevel(clamped);
    })
}

pub fn set_confidence(item: &LineItem, confidence: Confidence, mode: EditMode) -> LineItem {
    if mode == EditMode::Client {
        return item.clone();
    }
    edit(item, mode, |next| next.confidence = confidence)
}

/// Change an instance count by `delta`, never going below zero.
///
/// Items other than instances are returned unchanged.
pub fn adjust_count(item: &LineItem, delta: i64, mode: EditMode) -> LineItem {
    if !matches!(item.kind, ItemKind::Instance { .. }) {
        return item.clone();
    }
    edit(item, mode, |next| {
        if let ItemKind::Instance { count, .. } = &mut next.kind {
            let adjusted = i64::from(*count).saturating_add(delta).max(0);
            *count = u32::try_from(adjusted).unwrap_or(u32::MAX);
        }
    })
}

/// Set an instance count outright.
pub fn set_count(item: &LineItem, value: u32, mode: EditMode) -> LineItem {
    match &item.kind {
        ItemKind::Instance { count, .. } => {
            adjust_count(item, i64::from(value) - i64::from(*count), mode)
        }
        _ => item.clone(),
    }
}

pub fn set_lock(item: &LineItem, lock: LockState, mode: EditMode) -> LineItem {
    if mode == EditMode::Client {
        return item.clone();
    }
    edit(item, mode, |next| next.lock_state = lock)
}

pub fn toggle_lock(item: &LineItem, mode: EditMode) -> LineItem {
    let flipped = match item.lock_state {
        LockState::Truth => LockState::Spec,
        LockState::Spec => LockState::Truth,
    };
    set_lock(item, flipped, mode)
}

/// Lock or unlock every stored item; studio only.
pub fn set_all_locks(items: &[LineItem], lock: LockState, mode: EditMode) -> Vec<LineItem> {
    items.iter().map(|item| set_lock(item, lock, mode)).collect()
}

fn edit(item: &LineItem, mode: EditMode, apply: impl FnOnce(&mut LineItem)) -> LineItem {
    if item.is_auto() {
        return item.clone();
    }
    let mut next = item.clone();
    apply(&mut next);
    if mode == EditMode::Client {
        next.lock_state = LockState::Spec;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohesion::debt_item;
    use crate::test_support::{instance, template};
    use estimator_types::pricing::{CohesionTag, Complexity};
    use estimator_types::quote::CohesionAssessment;

    fn auto_item() -> LineItem {
        debt_item(&CohesionAssessment {
            enabled: true,
            max_core_resolution: ResolutionLevel(6),
            core_floor: ResolutionLevel(4),
            utility_floor: ResolutionLevel(2),
            mismatches: vec![],
            debt_total: 50.0,
        })
        .expect("debt item")
    }

    #[test]
    fn resolution_is_clamped_to_minimum_and_range() {
        let mut item = template("li-a", CohesionTag::Core, 4, &[]);
        item.min_resolution = Some(ResolutionLevel(3));

        assert_eq!(set_resolution(&item, 1, EditMode::Studio).resolution, ResolutionLevel(3));
        assert_eq!(set_resolution(&item, 9, EditMode::Studio).resolution, ResolutionLevel(7));
        assert_eq!(set_resolution(&item, 5, EditMode::Studio).resolution, ResolutionLevel(5));

        item.min_resolution = None;
        assert_eq!(set_resolution(&item, 0, EditMode::Studio).resolution, ResolutionLevel(1));
        assert_eq!(item.resolution, ResolutionLevel(4), "original untouched");
    }

    #[test]
    fn client_edits_always_leave_spec() {
        let mut item = template("li-a", CohesionTag::Core, 4, &[]);
        item.lock_state = LockState::Truth;

        let edited = set_resolution(&item, 6, EditMode::Client);
        assert_eq!(edited.resolution, ResolutionLevel(6));
        assert_eq!(edited.lock_state, LockState::Spec);

        assert_eq!(set_lock(&item, LockState::Truth, EditMode::Client), item);
        assert_eq!(toggle_lock(&item, EditMode::Client), item);
        assert_eq!(set_confidence(&item, Confidence::Low, EditMode::Client), item);
    }

    #[test]
    fn studio_lock_toggles() {
        let item = template("li-a", CohesionTag::Core, 4, &[]);
        let locked = toggle_lock(&item, EditMode::Studio);
        assert_eq!(locked.lock_state, LockState::Truth);
        assert_eq!(toggle_lock(&locked, EditMode::Studio).lock_state, LockState::Spec);
        assert_eq!(
            set_confidence(&item, Confidence::Medium, EditMode::Studio).confidence,
            Confidence::Medium
        );
    }

    #[test]
    fn count_never_goes_negative() {
        let item = instance("li-pages", 1, 3.2, Complexity::Standard);
        let count = |i: &LineItem| match i.kind {
            ItemKind::Instance { count, .. } => count,
            _ => unreachable!(),
        };

        assert_eq!(count(&adjust_count(&item, -5, EditMode::Studio)), 0);
        assert_eq!(count(&adjust_count(&item, 2, EditMode::Studio)), 3);
        assert_eq!(count(&set_count(&item, 12, EditMode::Studio)), 12);

        let template = template("li-a", CohesionTag::Core, 4, &[]);
        assert_eq!(adjust_count(&template, 3, EditMode::Studio), template);
    }

    #[test]
    fn auto_items_are_never_edited() {
        let auto = auto_item();
        assert_eq!(set_resolution(&auto, 1, EditMode::Studio), auto);
        assert_eq!(toggle_lock(&auto, EditMode::Studio), auto);

        let all = set_all_locks(
            &[template("li-a", CohesionTag::Core, 4, &[]), auto.clone()],
            LockState::Truth,
            EditMode::Studio,
        );
        assert_eq!(all[0].lock_state, LockState::Truth);
        assert_eq!(all[1], auto);
    }

    #[test]
    fn edit_mode_parses() {
        assert_eq!("Client".parse::<EditMode>(), Ok(EditMode::Client));
        assert!("guest".parse::<EditMode>().is_err());
    }
}
