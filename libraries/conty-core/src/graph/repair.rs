//! Missing home transition repair
//!
//! Some packs flag `control_settings.home` on a stage but omit the home
//! transition. The menu that led to the stage can usually be recovered:
//!
//! 1. find the action listing the stage as an option,
//! 2. find the wheel menu stage (not a story) whose ok transition targets
//!    that action,
//! 3. take the last multi-option action listing that menu stage: going home
//!    means going back to it, pre-selecting the menu stage.
//!
//! Repairs only touch the in-memory graph of the current session.

use super::{StageGraph, StageGraphQuery, StageId};
use crate::types::Transition;
use tracing::debug;

/// Result of a repair attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Stage has no home control or already has a home transition
    NotNeeded,

    /// A home transition was synthesized
    Repaired(Transition),

    /// The pattern did not match; home stays unavailable for this stage
    Unavailable,
}

/// Work out the home transition a stage should have, without mutating
pub fn find_missing_home<G: StageGraphQuery + ?Sized>(graph: &G, id: StageId) -> RepairOutcome {
    let stage = graph.stage(id);
    if !stage.control_settings.home || stage.home_transition.is_some() {
        return RepairOutcome::NotNeeded;
    }

    let Some(action) = graph.arena().action_listing(&stage.uuid) else {
        return RepairOutcome::Unavailable;
    };

    let Some(menu) = graph.arena().ids().find(|&candidate| {
        let candidate_stage = graph.stage(candidate);
        !graph.is_story(candidate)
            && candidate_stage.control_settings.wheel
            && candidate_stage
                .ok_transition
                .as_ref()
                .and_then(Transition::action_id)
                == Some(action.id.as_str())
    }) else {
        return RepairOutcome::Unavailable;
    };

    let menu_uuid = &graph.stage(menu).uuid;
    graph
        .actions()
        .iter()
        .rev()
        .filter(|back| back.options.len() > 1)
        .find_map(|back| {
            back.position_of(menu_uuid)
                .map(|index| Transition::action(back.id.clone(), Some(index)))
        })
        .map_or(RepairOutcome::Unavailable, RepairOutcome::Repaired)
}

impl StageGraph {
    /// Synthesize a missing home transition in place
    ///
    /// Returns what happened; `Unavailable` leaves the stage untouched.
    pub fn repair_missing_home(&mut self, id: StageId) -> RepairOutcome {
        let outcome = find_missing_home(self, id);
        match &outcome {
            RepairOutcome::Repaired(transition) => {
                debug!(stage = %self.stage(id).uuid, ?transition, "Synthesized home transition");
                self.arena_mut().set_home_transition(id, transition.clone());
            }
            RepairOutcome::Unavailable => {
                debug!(stage = %self.stage(id).uuid, "Home transition missing and not recoverable");
            }
            RepairOutcome::NotNeeded => {}
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::StudioGraph;
    use crate::types::{Action, Stage, StageType};

    /// start -> menu[q1, q2]; q1 -> tale1, q2 -> tale2; tales lack home
    fn pack(wheel: bool) -> StageGraph {
        let mut start = Stage::new("start");
        start.is_start = true;
        start.ok_transition = Some(Transition::action("menu", None));

        let mut q1 = Stage::new("q1");
        q1.control_settings.wheel = wheel;
        q1.ok_transition = Some(Transition::action("to-tale1", Some(0)));

        let mut q2 = Stage::new("q2");
        q2.control_settings.wheel = wheel;
        q2.ok_transition = Some(Transition::action("to-tale2", Some(0)));

        let tale = |uuid: &str| {
            let mut stage = Stage::new(uuid);
            stage.stage_type = StageType::Story;
            stage.audio = Some(format!("{uuid}.mp3"));
            stage.control_settings.home = true;
            stage
        };

        StudioGraph::new(
            vec![start, q1, q2, tale("tale1"), tale("tale2")],
            vec![
                Action::new("menu", ["q1", "q2"]),
                Action::new("to-tale1", ["tale1"]),
                Action::new("to-tale2", ["tale2"]),
            ],
        )
        .into()
    }

    #[test]
    fn repairs_back_to_originating_menu_option() {
        let mut graph = pack(true);
        let tale2 = graph.stage_id("tale2").unwrap();

        let outcome = graph.repair_missing_home(tale2);
        assert_eq!(
            outcome,
            RepairOutcome::Repaired(Transition::action("menu", Some(1)))
        );
        assert!(graph.can_go_home(tale2));

        let home = graph.home_from(tale2).unwrap();
        let uuids: Vec<&str> = home.iter().map(|&id| graph.stage(id).uuid.as_str()).collect();
        assert_eq!(uuids, vec!["q1", "q2"]);
    }

    #[test]
    fn existing_home_is_left_alone() {
        let mut graph = pack(true);
        let q1 = graph.stage_id("q1").unwrap();
        assert_eq!(graph.repair_missing_home(q1), RepairOutcome::NotNeeded);
    }

    #[test]
    fn no_wheel_menu_means_unavailable() {
        let mut graph = pack(false);
        let tale1 = graph.stage_id("tale1").unwrap();
        assert_eq!(graph.repair_missing_home(tale1), RepairOutcome::Unavailable);
        assert!(graph.stage(tale1).home_transition.is_none());
        assert!(!graph.can_go_home(tale1));
    }

    #[test]
    fn repair_is_idempotent() {
        let mut graph = pack(true);
        let tale1 = graph.stage_id("tale1").unwrap();
        assert!(matches!(
            graph.repair_missing_home(tale1),
            RepairOutcome::Repaired(_)
        ));
        assert_eq!(graph.repair_missing_home(tale1), RepairOutcome::NotNeeded);
    }
}
