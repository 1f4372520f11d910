//! Depth-first path enumeration

use conty_core::graph::{map_of_stages_for_option, StageGraphQuery, StageId};
use conty_core::GraphIntegrityError;
use tracing::debug;

/// Every linear path from `start` to a terminal, looping or story-ending
/// point
///
/// Each path is simple (no stage twice), so its length never exceeds the
/// stage count and the walk terminates on cyclic graphs.
pub fn collect_paths<G: StageGraphQuery + ?Sized>(graph: &G, start: StageId) -> Vec<Vec<StageId>> {
    let mut paths = Vec::new();
    let mut path = vec![start];
    walk(graph, &mut path, graph.is_story(start), &mut paths);
    paths
}

fn walk<G: StageGraphQuery + ?Sized>(
    graph: &G,
    path: &mut Vec<StageId>,
    in_story: bool,
    paths: &mut Vec<Vec<StageId>>,
) {
    let Some(&current) = path.last() else {
        return;
    };

    let candidates = match candidates_from(graph, current) {
        Ok(candidates) => candidates,
        Err(err) => {
            // drop the corrupt edge, keep what was reached so far
            debug!(stage = %graph.stage(current).uuid, %err, "Dangling reference while extracting");
            paths.push(path.clone());
            return;
        }
    };

    if candidates.is_empty() {
        paths.push(path.clone());
        return;
    }

    if in_story && (candidates.len() > 1 || !graph.is_story(candidates[0])) {
        paths.push(path.clone());
        return;
    }

    for candidate in candidates {
        if path.contains(&candidate) {
            paths.push(path.clone());
            continue;
        }
        path.push(candidate);
        walk(graph, path, in_story || graph.is_story(candidate), paths);
        path.pop();
    }
}

fn candidates_from<G: StageGraphQuery + ?Sized>(
    graph: &G,
    id: StageId,
) -> Result<Vec<StageId>, GraphIntegrityError> {
    let next = graph.next_from(id)?;
    let option_index = graph
        .stage(id)
        .ok_transition
        .as_ref()
        .and_then(|transition| transition.option_index());
    Ok(map_of_stages_for_option(graph, next, option_index))
}
