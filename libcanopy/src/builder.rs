use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info};

use crate::errors::BuildError;
use crate::hkt::{BuildStats, Forest, Hkt, Node, REFUGE_WORD_ID};
use crate::source::Source;
use crate::table::WordRankTable;
use crate::vocab;
use crate::{HktId, NodeId, SourceId, WordId};

/// Display words collected per node before the list stops growing.
const TOP_WORDS: usize = 10;

/// Tuning thresholds for one build run. The defaults reproduce the most
/// permissive clustering: every word is eligible, words merge into a node
/// once they share half of its sources, and every multi-source node grows
/// a branch.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildParams {
    /// fraction of the top word's source count a word must reach to be
    /// treated as an expected word of the current tree, in [0, 1]
    pub minimum_threshold_against_max_word_count: f64,
    /// fraction of a node's sources an expected word must share before it
    /// is folded into that node instead of starting its own, in [0, 1]
    pub similarity_threshold: f64,
    /// a word must appear in at least this many sources to be interned
    pub minimum_sources_important: usize,
    /// a node must hold more than this many sources to grow a branch
    pub minimum_sources_branch: usize,
}

impl Default for BuildParams {
    fn default() -> Self {
        BuildParams {
            minimum_threshold_against_max_word_count: 0.0,
            similarity_threshold: 0.5,
            minimum_sources_important: 1,
            minimum_sources_branch: 1,
        }
    }
}

impl BuildParams {
    fn validate(&self) -> Result<(), BuildError> {
        if !(0.0..=1.0).contains(&self.minimum_threshold_against_max_word_count) {
            return Err(BuildError::InvalidParameter {
                param: "minimum_threshold_against_max_word_count",
                value: self.minimum_threshold_against_max_word_count.to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(BuildError::InvalidParameter {
                param: "similarity_threshold",
                value: self.similarity_threshold.to_string(),
            });
        }
        if self.minimum_sources_important < 1 {
            return Err(BuildError::InvalidParameter {
                param: "minimum_sources_important",
                value: self.minimum_sources_important.to_string(),
            });
        }
        if self.minimum_sources_branch < 1 {
            return Err(BuildError::InvalidParameter {
                param: "minimum_sources_branch",
                value: self.minimum_sources_branch.to_string(),
            });
        }
        Ok(())
    }
}

/// Clusters a stream of sources into a forest of knowledge trees.
///
/// The builder is single-shot: `build` consumes it and hands back the
/// finished [`Forest`]. All ids are assigned in creation order, so the same
/// input always produces the same forest.
pub struct TreeBuilder {
    params: BuildParams,
    hkts: BTreeMap<HktId, Hkt>,
    nodes: BTreeMap<NodeId, Node>,
    words: BTreeMap<WordId, String>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        TreeBuilder::new(BuildParams::default())
    }
}

impl TreeBuilder {
    pub fn new(params: BuildParams) -> Self {
        TreeBuilder {
            params,
            hkts: BTreeMap::new(),
            nodes: BTreeMap::new(),
            words: BTreeMap::new(),
        }
    }

    /// Run the full clustering pass over `input` and return the forest.
    ///
    /// The stream is indexed by source id before anything else happens, so
    /// the order sources arrive in never changes the result.
    pub fn build(mut self, input: Vec<Source>) -> Result<Forest, BuildError> {
        self.params.validate()?;

        let mut sources: BTreeMap<SourceId, Source> = BTreeMap::new();
        for source in input {
            if source.source_id == 0 {
                return Err(BuildError::InvalidSource {
                    source_id: 0,
                    reason: "source ids must be positive",
                });
            }
            let id = source.source_id;
            if sources.insert(id, source).is_some() {
                return Err(BuildError::InvalidSource {
                    source_id: id,
                    reason: "duplicate source id",
                });
            }
        }

        let vocabulary = vocab::index_sources(&sources, self.params.minimum_sources_important);
        self.words = vocabulary.words;
        let relation_rows = vocabulary.relation.len();

        let main = WordRankTable::from_relation(vocabulary.relation);
        let mut working = main.clone();
        let scope: BTreeSet<SourceId> = sources.keys().copied().collect();

        info!(
            "clustering {} sources across {} ranked rows",
            sources.len(),
            main.len()
        );

        if let Some(hkt) = self.create_hkt(&mut working, 0, &scope)? {
            let hkt_id = hkt.hkt_id;
            self.hkts.insert(hkt_id, hkt);
            self.create_branches(hkt_id, &main)?;
        }

        let stats = BuildStats {
            number_loaded: sources.len(),
            number_accepted_sources: sources.len(),
            number_of_words: vocabulary.distinct_words,
            update_source_word_relation_db: relation_rows,
            number_of_hkts: self.hkts.len(),
            number_of_nodes: self.nodes.len(),
        };
        info!(
            "built {} trees holding {} nodes",
            stats.number_of_hkts, stats.number_of_nodes
        );

        let forest = Forest {
            hkts: self.hkts,
            nodes: self.nodes,
            words: self.words,
            stats,
        };
        verify_forest(&forest)?;
        Ok(forest)
    }

    /// Words eligible for the tree currently being built: walked in rank
    /// order, a word qualifies while its source count holds up against the
    /// top word's. The walk stops at the first entry below the cutoff.
    fn expected_words(&self, table: &WordRankTable) -> Vec<WordId> {
        let maximum = match table.first() {
            Some(row) => row.word_no_of_sources,
            None => return Vec::new(),
        };
        if maximum == 0 {
            return Vec::new();
        }

        let mut expected: Vec<WordId> = Vec::new();
        let mut seen: BTreeSet<WordId> = BTreeSet::new();
        for row in table.iter() {
            let ratio = row.word_no_of_sources as f64 / maximum as f64;
            if ratio < self.params.minimum_threshold_against_max_word_count {
                break;
            }
            if seen.insert(row.word_id) {
                expected.push(row.word_id);
            }
        }
        expected
    }

    /// Build one tree over `scope`, consuming the processed words out of
    /// `working`. Returns `None` when no word qualifies.
    ///
    /// The first (most shared) word seeds the tree; every other expected
    /// word either folds into the node whose sources it overlaps most, or
    /// opens a node of its own. Sources left uncovered at the end are
    /// gathered into a refuge node.
    fn create_hkt(
        &mut self,
        working: &mut WordRankTable,
        parent_node_id: NodeId,
        scope: &BTreeSet<SourceId>,
    ) -> Result<Option<Hkt>, BuildError> {
        let mut expected = self.expected_words(working);
        if expected.is_empty() {
            return Ok(None);
        }
        let seed_word = match working.first() {
            Some(row) => row.word_id,
            None => return Ok(None),
        };

        let hkt_id = self.hkts.len() as HktId + 1;
        let mut node_ids: Vec<NodeId> = Vec::new();

        let seed_sources = working.sources_of(seed_word);
        node_ids.push(self.alloc_node(hkt_id, seed_word, seed_sources));
        working.remove_word(seed_word);
        expected.retain(|&word| word != seed_word);

        for &word_id in &expected {
            let word_sources = working.sources_of(word_id);

            let mut best: Option<(NodeId, f64)> = None;
            for &node_id in &node_ids {
                let node = self.node(node_id)?;
                if node.source_ids.is_empty() {
                    continue;
                }
                let shared = node.source_ids.intersection(&word_sources).count();
                let score = shared as f64 / node.source_ids.len() as f64;
                if score >= self.params.similarity_threshold
                    && best.map_or(true, |(_, high)| score > high)
                {
                    best = Some((node_id, score));
                }
            }

            match best {
                Some((node_id, _)) => {
                    let node = self.node_mut(node_id)?;
                    node.word_ids.insert(word_id);
                    node.source_ids.extend(word_sources);
                }
                None => {
                    node_ids.push(self.alloc_node(hkt_id, word_id, word_sources));
                }
            }
            working.remove_word(word_id);
        }

        let mut covered: BTreeSet<SourceId> = BTreeSet::new();
        for &node_id in &node_ids {
            covered.extend(self.node(node_id)?.source_ids.iter().copied());
        }
        let refuge: BTreeSet<SourceId> = scope.difference(&covered).copied().collect();
        if !refuge.is_empty() {
            debug!(
                "tree {}: {} sources fell through to the refuge node",
                hkt_id,
                refuge.len()
            );
            covered.extend(refuge.iter().copied());
            node_ids.push(self.alloc_node(hkt_id, REFUGE_WORD_ID, refuge));
        }

        if !scope.is_subset(&covered) {
            return Err(BuildError::InvariantViolation(format!(
                "tree {} dropped {} of its {} sources",
                hkt_id,
                scope.difference(&covered).count(),
                scope.len()
            )));
        }

        Ok(Some(Hkt {
            hkt_id,
            parent_node_id,
            expected_words: expected,
            node_ids,
        }))
    }

    /// Grow a branch tree under every node of `hkt_id` that holds enough
    /// sources. Each branch re-ranks the parent table restricted to the
    /// node's sources; non-refuge nodes also drop the words they already
    /// claimed, refuge nodes keep the whole vocabulary.
    fn create_branches(&mut self, hkt_id: HktId, main: &WordRankTable) -> Result<(), BuildError> {
        let node_ids = match self.hkts.get(&hkt_id) {
            Some(hkt) => hkt.node_ids.clone(),
            None => {
                return Err(BuildError::InvariantViolation(format!(
                    "tree {} missing from the tree index",
                    hkt_id
                )))
            }
        };

        for node_id in node_ids {
            let (node_sources, node_words, refuge) = {
                let node = self.node(node_id)?;
                (
                    node.source_ids.clone(),
                    node.word_ids.clone(),
                    node.is_refuge(),
                )
            };
            if node_sources.len() <= self.params.minimum_sources_branch {
                continue;
            }

            let mut local = if refuge {
                main.restrict(&node_sources, None)
            } else {
                main.restrict(&node_sources, Some(&node_words))
            };
            local.recount();
            local.rank();

            if local.is_empty() {
                continue;
            }

            self.push_top_words(node_id, &local)?;

            let mut working = local.clone();
            if let Some(child) = self.create_hkt(&mut working, node_id, &node_sources)? {
                let child_id = child.hkt_id;
                debug!("node {} branched into tree {}", node_id, child_id);
                self.hkts.insert(child_id, child);
                // recurse only while unprocessed words remain in the branch
                if !working.is_empty() {
                    self.create_branches(child_id, &local)?;
                }
            }
        }
        Ok(())
    }

    /// Collect up to ten display words for a node: its own words first,
    /// then the strongest remaining words of its branch scope. The refuge
    /// node gets none.
    fn push_top_words(
        &mut self,
        node_id: NodeId,
        local: &WordRankTable,
    ) -> Result<(), BuildError> {
        let node = self.node_mut(node_id)?;
        if node.is_refuge() {
            return Ok(());
        }
        let own: Vec<WordId> = node.word_ids.iter().copied().collect();
        node.top_words.extend(own);
        for row in local.iter() {
            if !node.top_words.contains(&row.word_id) {
                node.top_words.push(row.word_id);
            }
            if node.top_words.len() >= TOP_WORDS {
                break;
            }
        }
        Ok(())
    }

    fn alloc_node(
        &mut self,
        hkt_id: HktId,
        word_id: WordId,
        source_ids: BTreeSet<SourceId>,
    ) -> NodeId {
        let node_id = self.nodes.len() as NodeId + 1;
        self.nodes.insert(
            node_id,
            Node {
                node_id,
                hkt_id,
                word_ids: BTreeSet::from([word_id]),
                source_ids,
                top_words: Vec::new(),
            },
        );
        node_id
    }

    fn node(&self, node_id: NodeId) -> Result<&Node, BuildError> {
        self.nodes.get(&node_id).ok_or_else(|| {
            BuildError::InvariantViolation(format!("node {} missing from the node index", node_id))
        })
    }

    fn node_mut(&mut self, node_id: NodeId) -> Result<&mut Node, BuildError> {
        self.nodes.get_mut(&node_id).ok_or_else(|| {
            BuildError::InvariantViolation(format!("node {} missing from the node index", node_id))
        })
    }
}

/// Structural checks run on every finished forest. A failure here is a
/// defect in the builder, never a property of the input.
fn verify_forest(forest: &Forest) -> Result<(), BuildError> {
    let hkt_count = forest.hkts.len() as HktId;
    if !forest.hkts.keys().copied().eq(1..=hkt_count) {
        return Err(BuildError::InvariantViolation(
            "tree ids are not contiguous from 1".to_string(),
        ));
    }
    let node_count = forest.nodes.len() as NodeId;
    if !forest.nodes.keys().copied().eq(1..=node_count) {
        return Err(BuildError::InvariantViolation(
            "node ids are not contiguous from 1".to_string(),
        ));
    }

    let mut member_nodes = 0usize;
    for hkt in forest.hkts.values() {
        if hkt.parent_node_id != 0 && !forest.nodes.contains_key(&hkt.parent_node_id) {
            return Err(BuildError::InvariantViolation(format!(
                "tree {} hangs off unknown node {}",
                hkt.hkt_id, hkt.parent_node_id
            )));
        }
        for node_id in &hkt.node_ids {
            member_nodes += 1;
            match forest.nodes.get(node_id) {
                Some(node) if node.hkt_id == hkt.hkt_id => {}
                Some(node) => {
                    return Err(BuildError::InvariantViolation(format!(
                        "node {} claims tree {} but sits in tree {}",
                        node_id, node.hkt_id, hkt.hkt_id
                    )))
                }
                None => {
                    return Err(BuildError::InvariantViolation(format!(
                        "tree {} lists unknown node {}",
                        hkt.hkt_id, node_id
                    )))
                }
            }
        }
    }
    if member_nodes != forest.nodes.len() {
        return Err(BuildError::InvariantViolation(format!(
            "{} nodes indexed but {} listed across trees",
            forest.nodes.len(),
            member_nodes
        )));
    }

    for node in forest.nodes.values() {
        if node.is_refuge() {
            if node.word_ids.len() != 1 || node.source_ids.is_empty() {
                return Err(BuildError::InvariantViolation(format!(
                    "refuge node {} is malformed",
                    node.node_id
                )));
            }
        } else {
            for &word_id in &node.word_ids {
                if word_id <= 0 || !forest.words.contains_key(&word_id) {
                    return Err(BuildError::InvariantViolation(format!(
                        "node {} holds unknown word id {}",
                        node.node_id, word_id
                    )));
                }
            }
        }
    }

    Ok(())
}
