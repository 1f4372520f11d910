use super::pack_id;
use crate::error::Result;
use conty_core::graph::{find_missing_home, RepairOutcome, StageGraphQuery};
use conty_core::{LoadedPack, PackKind, Transition};
use conty_storage::load_pack_folder;
use std::fmt;
use std::path::Path;
use tracing::info;

/// Outcome of the home repair for one stage lacking its home transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeRepair {
    pub stage: String,
    pub outcome: RepairOutcome,
}

/// Structure summary of a pack
#[derive(Debug, Clone)]
pub struct InspectReport {
    pub id: String,
    pub kind: PackKind,
    pub title: String,
    pub description: Option<String>,
    pub stages: usize,
    pub actions: usize,
    pub start: String,
    pub story_stages: usize,
    pub podcast: bool,
    pub home_repairs: Vec<HomeRepair>,
}

pub async fn inspect(folder: &Path) -> Result<InspectReport> {
    let id = pack_id(folder)?;
    let LoadedPack { pack, graph } = load_pack_folder(&id, folder).await?;
    let start = graph.start()?;

    let home_repairs: Vec<HomeRepair> = graph
        .arena()
        .ids()
        .filter(|&stage| {
            let stage = graph.stage(stage);
            stage.control_settings.home && stage.home_transition.is_none()
        })
        .map(|stage| HomeRepair {
            stage: graph.stage(stage).uuid.clone(),
            outcome: find_missing_home(&graph, stage),
        })
        .collect();
    info!(pack = %id, missing_home = home_repairs.len(), "Inspected pack");

    Ok(InspectReport {
        title: pack.title().to_string(),
        description: pack.metadata.description.clone(),
        id,
        kind: pack.kind,
        stages: graph.stages().len(),
        actions: graph.actions().len(),
        start: graph.stage(start).uuid.clone(),
        story_stages: graph.playing_stories().len(),
        podcast: graph.supports_podcast(),
        home_repairs,
    })
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.id)?;
        if let Some(description) = &self.description {
            writeln!(f, "  {description}")?;
        }
        writeln!(f, "  schema:  {:?}", self.kind)?;
        writeln!(f, "  stages:  {} ({} stories)", self.stages, self.story_stages)?;
        writeln!(f, "  actions: {}", self.actions)?;
        writeln!(f, "  start:   {}", self.start)?;
        writeln!(f, "  podcast: {}", if self.podcast { "yes" } else { "no" })?;

        if self.home_repairs.is_empty() {
            return Ok(());
        }
        writeln!(f, "  missing home transitions:")?;
        for repair in &self.home_repairs {
            match &repair.outcome {
                RepairOutcome::Repaired(Transition::Action {
                    action_id,
                    option_index,
                }) => {
                    let index = option_index.map_or_else(|| "-".to_string(), |i| i.to_string());
                    writeln!(f, "    {}: repaired -> {action_id}[{index}]", repair.stage)?;
                }
                RepairOutcome::Repaired(Transition::Stage { uuid }) => {
                    writeln!(f, "    {}: repaired -> {uuid}", repair.stage)?;
                }
                RepairOutcome::Unavailable => {
                    writeln!(f, "    {}: not repairable", repair.stage)?;
                }
                RepairOutcome::NotNeeded => {}
            }
        }
        Ok(())
    }
}
