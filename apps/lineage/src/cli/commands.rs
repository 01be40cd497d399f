//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::loader::LoadedCorpus;
use crate::render::{GraphView, dot, markdown};
use crate::report::{ChainReport, DescendantsReport, ProfileSummary, ResolutionReport, StatusReport};
use lineage_core::{Category, Explorer, LineageError, MatchRule, Profile, Termination};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Print a report as pretty JSON.
fn print_json<T: Serialize>(report: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(report).unwrap_or_default()
    );
}

/// Validate output path (parent directory must exist).
fn validate_output_path(path: &Path) -> Result<PathBuf, LineageError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        LineageError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(LineageError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| LineageError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Human-readable description of a match rule.
#[must_use]
pub fn describe_rule(rule: MatchRule) -> String {
    match rule {
        MatchRule::Unique => "unique name".to_string(),
        MatchRule::SameDirectory => "same directory".to_string(),
        MatchRule::SharedPrefix(n) => format!("longest shared path ({n} segments)"),
        MatchRule::TrustedLibrary => "trusted library".to_string(),
        MatchRule::FirstLoaded => "first loaded".to_string(),
    }
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show corpus status.
pub fn cmd_status(
    corpus: &LoadedCorpus,
    input_dir: &Path,
    json_mode: bool,
    verbose: bool,
) -> Result<(), LineageError> {
    let metrics = corpus.explorer.metrics();

    if json_mode {
        print_json(&StatusReport {
            input_dir: input_dir.to_string_lossy().into_owned(),
            files_seen: corpus.files_seen,
            skipped: corpus.skipped.len(),
            filtered: corpus.filtered,
            metrics,
        });
        return Ok(());
    }

    println!("Lineage Corpus Status");
    println!("=====================");
    println!("Input:    {}", input_dir.display());
    println!("Files:    {}", corpus.files_seen);
    println!("Skipped:  {}", corpus.skipped.len());
    println!("Filtered: {}", corpus.filtered);
    println!();
    println!(
        "Profiles: {} (system {}, user {})",
        metrics.profiles, metrics.system_profiles, metrics.user_profiles
    );
    for (category, count) in &metrics.per_category {
        println!("  {:<9} {}", format!("{category}:"), count);
    }
    println!();
    println!("Duplicated names: {}", metrics.duplicated_names);
    println!("Dangling parents: {}", metrics.dangling_parents);
    println!("Cyclic chains:    {}", metrics.cyclic_chains);
    println!("Longest chain:    {}", metrics.longest_chain);

    if verbose && !corpus.skipped.is_empty() {
        println!();
        println!("Skipped files:");
        for (origin, err) in &corpus.skipped {
            println!("  {origin}: {err}");
        }
    }

    Ok(())
}

// =============================================================================
// RESOLVE COMMAND
// =============================================================================

/// Resolve one name and explain the decision.
pub fn cmd_resolve(
    explorer: &Explorer,
    json_mode: bool,
    name: &str,
    from: Option<&str>,
) -> Result<(), LineageError> {
    let resolution = explorer.resolve(name, from);
    if let Some(r) = &resolution {
        tracing::debug!(
            rule = ?r.rule,
            candidates = r.candidates,
            "Resolved '{}' to {}",
            name,
            r.profile.origin_location
        );
    }

    if json_mode {
        print_json(&ResolutionReport::new(name, from, resolution.as_ref()));
        return Ok(());
    }

    match resolution {
        Some(r) => {
            println!("{} -> {}", name, r.profile.store_key);
            println!("  Origin:     {}", r.profile.origin_location);
            println!("  Category:   {}", r.profile.category);
            println!("  Rule:       {}", describe_rule(r.rule));
            println!("  Candidates: {}", r.candidates);
        }
        None => println!("Profile '{}' not found", name),
    }

    Ok(())
}

// =============================================================================
// CHAIN COMMAND
// =============================================================================

/// Show the inheritance chain, specific to root.
pub fn cmd_chain(explorer: &Explorer, json_mode: bool, name: &str) -> Result<(), LineageError> {
    let chain = explorer.chain(name);

    if json_mode {
        print_json(&ChainReport::new(name, &chain));
        return Ok(());
    }

    if chain.is_empty() {
        println!("Profile '{}' not found", name);
        return Ok(());
    }

    println!("Inheritance chain for '{}':", name);
    for (depth, link) in chain.links().iter().enumerate() {
        println!("  {}. {}  ({})", depth, link.store_key, link.origin_location);
    }

    match chain.termination() {
        Termination::Root | Termination::Unresolved => {}
        Termination::DanglingParent(parent) => {
            println!("  Parent '{}' not found; chain truncated", parent);
        }
        Termination::Cycle(id) => {
            let key = explorer
                .store()
                .get(*id)
                .map_or("?", |p| p.store_key.as_str());
            println!("  Cycle back to '{}'; chain stopped", key);
        }
    }

    Ok(())
}

// =============================================================================
// DESCENDANTS COMMAND
// =============================================================================

/// List every profile inheriting from `name`.
pub fn cmd_descendants(
    explorer: &Explorer,
    json_mode: bool,
    name: &str,
) -> Result<(), LineageError> {
    let descendants = explorer.descendants(name);

    if json_mode {
        print_json(&DescendantsReport {
            name: name.to_string(),
            descendants: descendants.iter().map(|p| ProfileSummary::from(*p)).collect(),
        });
        return Ok(());
    }

    println!("Descendants of '{}' ({}):", name, descendants.len());
    for profile in descendants {
        println!("  - {}  ({})", profile.store_key, profile.origin_location);
    }

    Ok(())
}

// =============================================================================
// COMPARE COMMAND
// =============================================================================

/// Compare declared settings along a chain.
pub fn cmd_compare(explorer: &Explorer, json_mode: bool, name: &str) -> Result<(), LineageError> {
    let table = explorer.comparison(name)?;

    if json_mode {
        print_json(&table);
        return Ok(());
    }

    print!(
        "{}",
        markdown::comparison_table(&table, explorer.setting_policy())
    );
    Ok(())
}

// =============================================================================
// EFFECTIVE COMMAND
// =============================================================================

/// Show effective settings of one or more profiles of one category.
pub fn cmd_effective(
    explorer: &Explorer,
    json_mode: bool,
    names: &[String],
) -> Result<(), LineageError> {
    let matrix = explorer.effective_matrix(names)?;

    if json_mode {
        print_json(&matrix);
        return Ok(());
    }

    print!(
        "{}",
        markdown::effective_table(&matrix, explorer.setting_policy())
    );
    Ok(())
}

// =============================================================================
// GRAPH COMMAND
// =============================================================================

/// Pick the profiles to draw.
///
/// A target wins: its chain and descendants. Otherwise, with `user_only`,
/// branches containing user profiles, else every loaded profile.
/// `categories` narrows the user branches; `None` means filament only.
pub fn graph_view<'a>(
    explorer: &'a Explorer,
    target: Option<&str>,
    user_only: bool,
    categories: Option<&BTreeSet<Category>>,
) -> Result<GraphView<'a>, LineageError> {
    let nodes: Vec<&Profile> = match target {
        Some(name) => explorer
            .family(name)
            .ok_or_else(|| LineageError::ProfileNotFound(name.to_string()))?,
        None if user_only => {
            let filament = BTreeSet::from([Category::Filament]);
            explorer.user_branches(categories.unwrap_or(&filament))
        }
        None => explorer.store().iter().collect(),
    };

    Ok(GraphView::build(explorer, nodes))
}

/// Render the inheritance graph.
pub fn cmd_graph(
    explorer: &Explorer,
    json_mode: bool,
    target: Option<&str>,
    user_only: bool,
    categories: Option<&BTreeSet<Category>>,
    output: Option<&Path>,
) -> Result<(), LineageError> {
    let view = graph_view(explorer, target, user_only, categories)?;
    tracing::info!(
        nodes = view.nodes.len(),
        edges = view.edges.len(),
        "Built inheritance graph"
    );

    if json_mode {
        print_json(&view.to_report());
        return Ok(());
    }

    let source = dot::render(&view);
    match output {
        Some(path) => {
            let path = PathBuf::from(dot::with_dot_extension(&path.to_string_lossy()));
            let validated = validate_output_path(&path)?;
            std::fs::write(&validated, source)
                .map_err(|e| LineageError::IoError(format!("Write file: {}", e)))?;
            println!("Graph written to {}", validated.display());
            println!(
                "Render with: dot -Tpng {} -o {}",
                validated.display(),
                validated.with_extension("png").display()
            );
        }
        None => print!("{}", source),
    }

    Ok(())
}
