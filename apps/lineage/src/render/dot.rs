//! # Graphviz DOT
//!
//! Nodes show the display name, the first `filament_vendor` and the file
//! name. System profiles are light blue, user profiles light yellow.
//! Edges point from parent to child.

use super::GraphView;
use lineage_core::{Profile, ProfileId};
use serde_json::Value;

/// Extension appended to output files that lack it.
pub const DOT_EXTENSION: &str = "dot";

const SYSTEM_FILL: &str = "lightblue";
const USER_FILL: &str = "lightyellow";

/// Render a graph as DOT source.
#[must_use]
pub fn render(view: &GraphView<'_>) -> String {
    let mut out = String::from("digraph profiles {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    size=\"12,10\";\n");
    out.push_str("    node [shape=box, style=\"rounded,filled\", fontname=\"Arial\"];\n");

    for profile in &view.nodes {
        let fill = if profile.is_system_provided {
            SYSTEM_FILL
        } else {
            USER_FILL
        };
        out.push_str(&format!(
            "    {} [label=\"{}\", fillcolor={}];\n",
            node_id(profile.id),
            label(profile),
            fill
        ));
    }

    for (parent, child) in &view.edges {
        out.push_str(&format!(
            "    {} -> {} [arrowhead=vee];\n",
            node_id(*parent),
            node_id(*child)
        ));
    }

    out.push_str("}\n");
    out
}

/// `name` with `.dot` appended unless it already ends in it.
#[must_use]
pub fn with_dot_extension(name: &str) -> String {
    let has_extension = std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOT_EXTENSION));
    if has_extension {
        name.to_string()
    } else {
        format!("{name}.{DOT_EXTENSION}")
    }
}

fn node_id(id: ProfileId) -> String {
    format!("p{}", id.0)
}

fn label(profile: &Profile) -> String {
    let mut parts = vec![escape(&profile.display_name)];
    if let Some(vendor) = first_vendor(profile) {
        parts.push(format!("Vendor: {}", escape(vendor)));
    }
    parts.push(format!("File: {}", escape(profile.file_name())));
    parts.join("\\n")
}

fn first_vendor(profile: &Profile) -> Option<&str> {
    let vendor = match profile.attribute("filament_vendor")? {
        Value::Array(items) => items.first().and_then(Value::as_str),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    };
    vendor.filter(|v| !v.trim().is_empty())
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_core::Category;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn profile(id: u32, name: &str, system: bool, vendor: Option<Value>) -> Profile {
        let mut attributes = BTreeMap::new();
        if let Some(v) = vendor {
            attributes.insert("filament_vendor".to_string(), v);
        }
        Profile {
            id: ProfileId(id),
            store_key: name.to_string(),
            display_name: name.to_string(),
            parent_name: None,
            origin_location: format!("system/V/filament/{name}.json"),
            is_system_provided: system,
            category: Category::Filament,
            attributes,
        }
    }

    #[test]
    fn nodes_and_edges() {
        let base = profile(0, "PLA", true, Some(json!(["Generic"])));
        let mine = profile(1, "My \"PLA\"", false, None);
        let view = GraphView {
            nodes: vec![&base, &mine],
            edges: vec![(ProfileId(0), ProfileId(1))],
        };

        let dot = render(&view);
        assert!(dot.starts_with("digraph profiles {"));
        assert!(dot.contains("p0 [label=\"PLA\\nVendor: Generic\\nFile: PLA.json\", fillcolor=lightblue];"));
        assert!(dot.contains("My \\\"PLA\\\""));
        assert!(dot.contains("fillcolor=lightyellow"));
        assert!(dot.contains("p0 -> p1 [arrowhead=vee];"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn dot_extension_is_appended_once() {
        assert_eq!(with_dot_extension("graph"), "graph.dot");
        assert_eq!(with_dot_extension("graph.dot"), "graph.dot");
        assert_eq!(with_dot_extension("graph.gv"), "graph.gv.dot");
    }
}
