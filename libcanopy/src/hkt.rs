use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{HktId, NodeId, SourceId, WordId};

/// Sentinel word id marking the catch-all node of a tree.
pub const REFUGE_WORD_ID: WordId = -1;

/// A cluster of words that co-occur across a shared set of sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub node_id: NodeId,
    pub hkt_id: HktId,
    pub word_ids: BTreeSet<WordId>,
    pub source_ids: BTreeSet<SourceId>,
    /// up to ten word ids used for display, strongest first
    pub top_words: Vec<WordId>,
}

impl Node {
    /// True for the catch-all node holding sources no word cluster covered.
    pub fn is_refuge(&self) -> bool {
        self.word_ids.contains(&REFUGE_WORD_ID)
    }
}

/// One hierarchical knowledge tree: the ordered run of nodes produced by a
/// single clustering pass over one scope of sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Hkt {
    pub hkt_id: HktId,
    /// id of the node this tree refines, or 0 for a root tree
    pub parent_node_id: NodeId,
    /// words that passed the frequency-ratio gate, minus the seed word
    pub expected_words: Vec<WordId>,
    /// member nodes in creation order
    pub node_ids: Vec<NodeId>,
}

impl Hkt {
    pub fn is_root(&self) -> bool {
        self.parent_node_id == 0
    }
}

/// Summary counters reported by a build run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub number_loaded: usize,
    pub number_accepted_sources: usize,
    pub number_of_words: usize,
    pub update_source_word_relation_db: usize,
    pub number_of_hkts: usize,
    pub number_of_nodes: usize,
}

/// The complete output of a build: every tree, node and interned word, plus
/// the run statistics. Nothing in here is mutated once the build returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    pub hkts: BTreeMap<HktId, Hkt>,
    pub nodes: BTreeMap<NodeId, Node>,
    pub words: BTreeMap<WordId, String>,
    pub stats: BuildStats,
}

impl Forest {
    /// Trees that are not a branch of any node.
    pub fn roots(&self) -> impl Iterator<Item = &Hkt> {
        self.hkts.values().filter(|hkt| hkt.is_root())
    }

    /// The branch trees hanging off `node_id`, in creation order.
    pub fn children_of(&self, node_id: NodeId) -> Vec<&Hkt> {
        self.hkts
            .values()
            .filter(|hkt| hkt.parent_node_id == node_id)
            .collect()
    }

    /// The nodes of one tree, in creation order.
    pub fn nodes_of<'a>(&'a self, hkt: &'a Hkt) -> impl Iterator<Item = &'a Node> {
        hkt.node_ids.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Display label of a node: its words joined by spaces, or `<refuge>`
    /// for the catch-all node.
    pub fn node_label(&self, node: &Node) -> String {
        let names: Vec<&str> = node
            .word_ids
            .iter()
            .filter(|id| **id > 0)
            .filter_map(|id| self.words.get(id).map(String::as_str))
            .collect();
        if names.is_empty() {
            String::from("<refuge>")
        } else {
            names.join(" ")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::{Forest, Node, REFUGE_WORD_ID};

    fn node(node_id: u32, word_ids: Vec<i32>) -> Node {
        Node {
            node_id,
            hkt_id: 1,
            word_ids: word_ids.into_iter().collect(),
            source_ids: BTreeSet::from([1]),
            top_words: Vec::new(),
        }
    }

    #[test]
    fn test_node_label() {
        let forest = Forest {
            words: BTreeMap::from([(1, "grid".to_string()), (2, "blackout".to_string())]),
            ..Forest::default()
        };

        assert_eq!("grid blackout", forest.node_label(&node(1, vec![1, 2])));
        assert_eq!("<refuge>", forest.node_label(&node(2, vec![REFUGE_WORD_ID])));
    }

    #[test]
    fn test_refuge_detection() {
        assert!(node(1, vec![REFUGE_WORD_ID]).is_refuge());
        assert!(!node(2, vec![1, 2]).is_refuge());
    }
}
