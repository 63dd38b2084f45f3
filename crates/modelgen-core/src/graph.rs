use std::collections::{BTreeMap, BTreeSet};

use crate::constraints::{Constraint, ForeignKey};
use crate::model::MetadataModel;

/// FK dependency ordering of the tables in a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyOrder {
    /// Table keys, referenced tables before the tables referencing them.
    /// Falls back to model order when the graph has a cycle.
    pub order: Vec<String>,
    /// Keys of the tables left over by the sort when a cycle exists.
    pub cycle: Option<Vec<String>>,
}

/// Sort model tables so that every FK target precedes its referrers.
///
/// Self references are ignored and references to tables outside the model do
/// not create edges. Ties are broken alphabetically so the result is stable.
pub fn dependency_order(model: &MetadataModel) -> DependencyOrder {
    let graph = build_adjacency(model);

    match toposort(&graph) {
        Ok(order) => DependencyOrder { order, cycle: None },
        Err(cycle) => DependencyOrder {
            order: model.tables.keys().cloned().collect(),
            cycle: Some(cycle),
        },
    }
}

fn build_adjacency(model: &MetadataModel) -> BTreeMap<String, BTreeSet<String>> {
    let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (table_key, table) in &model.tables {
        graph.entry(table_key.clone()).or_default();

        for constraint in &table.constraints {
            if let Constraint::ForeignKey(fk) = constraint {
                let Some(referenced) = resolve_reference(model, fk) else {
                    continue;
                };
                if &referenced == table_key {
                    continue;
                }
                graph
                    .entry(referenced)
                    .or_default()
                    .insert(table_key.clone());
            }
        }
    }

    graph
}

fn resolve_reference(model: &MetadataModel, fk: &ForeignKey) -> Option<String> {
    let qualified = fk.referenced_key();
    if model.tables.contains_key(&qualified) {
        return Some(qualified);
    }
    model
        .tables
        .iter()
        .find(|(_, table)| table.name == fk.referenced_table)
        .map(|(key, _)| key.clone())
}

fn toposort(graph: &BTreeMap<String, BTreeSet<String>>) -> Result<Vec<String>, Vec<String>> {
    let mut indegree: BTreeMap<String, usize> = BTreeMap::new();

    for node in graph.keys() {
        indegree.entry(node.clone()).or_insert(0);
    }

    for targets in graph.values() {
        for target in targets {
            *indegree.entry(target.clone()).or_insert(0) += 1;
        }
    }

    let mut ready: BTreeSet<String> = indegree
        .iter()
        .filter_map(|(node, count)| (*count == 0).then(|| node.clone()))
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(node) = ready.pop_first() {
        order.push(node.clone());

        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(target.clone());
                    }
                }
            }
        }
    }

    if order.len() == graph.len() {
        Ok(order)
    } else {
        let cycle_nodes: Vec<String> = indegree
            .into_iter()
            .filter_map(|(node, count)| (count > 0).then_some(node))
            .collect();
        Err(cycle_nodes)
    }
}
