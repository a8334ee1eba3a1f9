use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hkt::{BuildStats, Forest};
use crate::{HktId, NodeId, SourceId, WordId};

/// Serialized form of one node. Set-valued fields come out as sorted arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDoc {
    pub node_id: NodeId,
    pub word_ids: Vec<WordId>,
    pub source_ids: Vec<SourceId>,
    pub top_words: Vec<WordId>,
}

/// Serialized form of one tree, nodes inlined in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HktDoc {
    pub hkt_id: HktId,
    pub parent_node_id: NodeId,
    pub nodes: Vec<NodeDoc>,
}

/// The interchange document downstream tools consume: run statistics, every
/// tree keyed by id, and the word dictionary. Integer keys serialize as JSON
/// object keys, i.e. strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestDoc {
    pub stats: BuildStats,
    pub hkts: BTreeMap<HktId, HktDoc>,
    pub word_dict: BTreeMap<WordId, String>,
}

impl Forest {
    /// Flatten the forest into its interchange document.
    pub fn to_document(&self) -> ForestDoc {
        let hkts = self
            .hkts
            .values()
            .map(|hkt| {
                let nodes = self
                    .nodes_of(hkt)
                    .map(|node| NodeDoc {
                        node_id: node.node_id,
                        word_ids: node.word_ids.iter().copied().collect(),
                        source_ids: node.source_ids.iter().copied().collect(),
                        top_words: node.top_words.clone(),
                    })
                    .collect();
                (
                    hkt.hkt_id,
                    HktDoc {
                        hkt_id: hkt.hkt_id,
                        parent_node_id: hkt.parent_node_id,
                        nodes,
                    },
                )
            })
            .collect();
        ForestDoc {
            stats: self.stats.clone(),
            hkts,
            word_dict: self.words.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ForestDoc;
    use crate::builder::{BuildParams, TreeBuilder};
    use crate::hkt::Forest;
    use crate::source::Source;

    fn sample_forest() -> Forest {
        TreeBuilder::new(BuildParams::default())
            .build(vec![
                Source::new(1, vec!["a", "b"]),
                Source::new(2, vec!["a", "b"]),
                Source::new(3, vec!["a", "c"]),
            ])
            .unwrap()
    }

    #[test]
    fn test_document_round_trip() {
        let document = sample_forest().to_document();

        let raw = serde_json::to_string_pretty(&document).unwrap();
        let reparsed: ForestDoc = serde_json::from_str(&raw).unwrap();

        assert_eq!(document, reparsed);
    }

    #[test]
    fn test_document_shape() {
        let document = sample_forest().to_document();
        let value = serde_json::to_value(&document).unwrap();

        // tree and word keys are stringified ids
        let hkts = value.get("hkts").unwrap().as_object().unwrap();
        assert!(hkts.contains_key("1"));
        let word_dict = value.get("word_dict").unwrap().as_object().unwrap();
        assert_eq!("a", word_dict.get("1").unwrap().as_str().unwrap());

        let root = hkts.get("1").unwrap();
        assert_eq!(1, root.get("hkt_id").unwrap().as_u64().unwrap());
        assert_eq!(0, root.get("parent_node_id").unwrap().as_u64().unwrap());
        let nodes = root.get("nodes").unwrap().as_array().unwrap();
        let first = nodes.first().unwrap();
        for field in ["node_id", "word_ids", "source_ids", "top_words"] {
            assert!(first.get(field).is_some());
        }

        let stats = value.get("stats").unwrap();
        for field in [
            "number_loaded",
            "number_accepted_sources",
            "number_of_words",
            "update_source_word_relation_db",
            "number_of_hkts",
            "number_of_nodes",
        ] {
            assert!(stats.get(field).is_some());
        }
    }

    #[test]
    fn test_nodes_keep_creation_order() {
        let document = sample_forest().to_document();

        let root = document.hkts.get(&1).unwrap();
        let ids: Vec<u32> = root.nodes.iter().map(|n| n.node_id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, ids);
        assert!(!ids.is_empty());
    }
}
