//! Results persistence module

use anyhow::{Context, Result};
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::cluster::metrics::{calculate_density, identify_central_members, modularity};
use crate::community::{Community, CommunitySet};
use crate::graph::{EntryGraph, NodeId, ProjectionGraph};

/// How many central members to list per community
const CENTRAL_MEMBERS: usize = 5;

/// Save a detection result to the specified directory
pub fn save_results(
    result: &CommunitySet,
    store: &EntryGraph,
    projection: &ProjectionGraph,
    output_dir: impl AsRef<Path>,
) -> Result<()> {
    let output_dir = output_dir.as_ref();
    log::info!("Saving {} communities to {}", result.len(), output_dir.display());

    // Ensure output directory exists
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let groups: Vec<Vec<NodeId>> = result
        .communities()
        .iter()
        .map(|community| member_ids(community, store))
        .collect();

    save_summary(result, projection, &groups, output_dir)?;
    save_communities(result, store, projection, &groups, output_dir)?;
    save_partition(result, output_dir.join("partition.json"))?;
    write_file(output_dir.join("communities.txt"), &(result.to_lines().join("\n") + "\n"))?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Ids of the members that are still live categories of `store`
fn member_ids(community: &Community, store: &EntryGraph) -> Vec<NodeId> {
    community
        .members()
        .iter()
        .filter_map(|category| store.category_number(category))
        .collect()
}

fn write_file(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Save summary information
fn save_summary(
    result: &CommunitySet,
    projection: &ProjectionGraph,
    groups: &[Vec<NodeId>],
    output_dir: &Path,
) -> Result<()> {
    log::info!("Saving summary information");

    let sizes: Vec<usize> = result.communities().iter().map(Community::len).collect();
    let count = if sizes.is_empty() { 1.0 } else { sizes.len() as f64 };

    let summary = json!({
        "name": result.name(),
        "algorithm": result.algorithm().name(),
        "p": result.p(),
        "cover": result.cover(),
        "filters": result.filters().to_string(),
        "modified": result.is_modified(),
        "graph_stats": {
            "vertex_count": projection.vertex_count(),
            "edge_count": projection.edge_count(),
            "total_weight": projection.total_weight(),
        },
        "community_stats": {
            "community_count": result.len(),
            "total_members": sizes.iter().sum::<usize>(),
            "largest_community_size": sizes.iter().max().copied().unwrap_or(0),
            "smallest_community_size": sizes.iter().min().copied().unwrap_or(0),
            "avg_community_size": sizes.iter().sum::<usize>() as f64 / count,
            "avg_density": groups.iter().map(|g| calculate_density(projection, g)).sum::<f64>() / count,
            "modularity": modularity(projection, groups),
        }
    });

    write_file(output_dir.join("summary.json"), &to_string_pretty(&summary)?)
}

/// Save individual community information
fn save_communities(
    result: &CommunitySet,
    store: &EntryGraph,
    projection: &ProjectionGraph,
    groups: &[Vec<NodeId>],
    output_dir: &Path,
) -> Result<()> {
    log::info!("Saving individual community information");

    let communities_dir = output_dir.join("communities");
    fs::create_dir_all(&communities_dir)
        .with_context(|| format!("creating {}", communities_dir.display()))?;

    let mut overview = Vec::with_capacity(result.len());
    for (position, (community, ids)) in result.communities().iter().zip(groups).enumerate() {
        let density = calculate_density(projection, ids);
        let central: Vec<&str> = identify_central_members(projection, ids, CENTRAL_MEMBERS)
            .into_iter()
            .filter_map(|id| store.category_name(id))
            .collect();

        let community_json = json!({
            "index": community.index(),
            "name": community.name(),
            "size": community.len(),
            "density": density,
            "central_members": central,
            "members": community.member_names(),
        });
        write_file(
            communities_dir.join(format!("community_{position}.json")),
            &to_string_pretty(&community_json)?,
        )?;

        overview.push(json!({
            "index": community.index(),
            "name": community.name(),
            "size": community.len(),
            "density": density,
        }));
    }

    write_file(
        output_dir.join("all_communities.json"),
        &to_string_pretty(&json!({ "communities": overview }))?,
    )
}

/// Write the full result so it can be loaded back for comparison
pub fn save_partition(result: &CommunitySet, path: impl AsRef<Path>) -> Result<()> {
    write_file(path, &to_string_pretty(result)?)
}

/// Load a result written by [`save_partition`]
pub fn load_partition(path: impl AsRef<Path>) -> Result<CommunitySet> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let result = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(result)
}
