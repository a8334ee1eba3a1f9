use anyhow::Result;
use libcanopy::hkt::{Forest, Hkt};

/// Render the forest as an indented bullet list, one line per node, with
/// branch trees nested under the node they refine.
pub fn tree_lines(forest: &Forest) -> String {
    let mut lines: Vec<String> = Vec::new();
    for root in forest.roots() {
        push_hkt_lines(forest, root, 0, &mut lines);
    }
    lines.join("\n")
}

fn push_hkt_lines(forest: &Forest, hkt: &Hkt, depth: usize, lines: &mut Vec<String>) {
    for node in forest.nodes_of(hkt) {
        lines.push(format!(
            "{}- {} (#{} sources)",
            "  ".repeat(depth),
            forest.node_label(node),
            node.source_ids.len()
        ));
        for child in forest.children_of(node.node_id) {
            push_hkt_lines(forest, child, depth + 1, lines);
        }
    }
}

/// Render the forest as the JSON document downstream tools consume.
pub fn json_document(forest: &Forest) -> Result<String> {
    let document = forest.to_document();
    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use libcanopy::builder::{BuildParams, TreeBuilder};
    use libcanopy::hkt::Forest;
    use libcanopy::source::Source;

    use super::{json_document, tree_lines};

    fn sample_forest() -> Forest {
        let params = BuildParams {
            minimum_threshold_against_max_word_count: 0.6,
            ..BuildParams::default()
        };
        TreeBuilder::new(params)
            .build(vec![
                Source::new(1, vec!["grid", "storm"]),
                Source::new(2, vec!["grid", "storm"]),
                Source::new(3, vec!["grid", "flood"]),
                Source::new(4, vec!["grid", "flood"]),
            ])
            .unwrap()
    }

    #[test]
    fn test_tree_rendering_nests_branches() {
        let rendered = tree_lines(&sample_forest());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(vec![
            "- grid (#4 sources)",
            "  - storm (#2 sources)",
            "  - flood (#2 sources)",
        ], lines);
    }

    #[test]
    fn test_json_rendering_parses_back() {
        let rendered = json_document(&sample_forest()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert!(value.get("stats").is_some());
        assert!(value.get("hkts").is_some());
        assert!(value.get("word_dict").is_some());
    }
}
