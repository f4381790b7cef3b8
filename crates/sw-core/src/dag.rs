//! Dependency resolution for migration steps
//!
//! Builds a directed graph from declared and derived dependencies, rejects
//! cycles, and produces the ordered list of transactional scopes a run
//! executes. Ordering is deterministic: among steps whose dependencies are
//! satisfied, the one declared first runs first.

use crate::error::{CoreError, CoreResult};
use crate::step::{MigrationStep, StepKind};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

/// One transactional unit: a single step, or every step of a declared group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Group label, `None` for a standalone step
    pub group: Option<String>,

    /// Indices into the resolved step slice, in execution order
    pub steps: Vec<usize>,
}

impl Scope {
    /// Whether this scope is a declared atomic group.
    pub fn is_group(&self) -> bool {
        self.group.is_some()
    }
}

/// A validated, ordered plan for a batch of steps.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    scopes: Vec<Scope>,

    /// Direct dependencies (declared and derived) of each step, by index
    dependencies: Vec<Vec<usize>>,
}

impl ExecutionPlan {
    /// Resolve `steps` into ordered scopes.
    ///
    /// Fails before anything runs if two steps share a name, a step is
    /// malformed, a dependency names an unknown step, or the dependency
    /// relation (including group membership) contains a cycle.
    pub fn resolve(steps: &[MigrationStep]) -> CoreResult<Self> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            step.validate()?;
            if index.insert(step.name.as_str(), i).is_some() {
                return Err(CoreError::DuplicateStep {
                    name: step.name.to_string(),
                });
            }
        }

        let edges = collect_edges(steps, &index)?;

        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(steps.len(), edges.len());
        let nodes: Vec<NodeIndex> = (0..steps.len()).map(|i| graph.add_node(i)).collect();
        for &(dep, dependent) in &edges {
            graph.add_edge(nodes[dep], nodes[dependent], ());
        }
        check_cycles(&graph, steps, |n| vec![graph[n]])?;

        let mut dependencies = vec![Vec::new(); steps.len()];
        for &(dep, dependent) in &edges {
            dependencies[dependent].push(dep);
        }

        let scopes = build_scopes(steps, &graph)?;
        Ok(Self {
            scopes,
            dependencies,
        })
    }

    /// Scopes in execution order.
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Direct dependencies of the step at `step`.
    pub fn dependencies(&self, step: usize) -> &[usize] {
        self.dependencies
            .get(step)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every step index in execution order.
    pub fn order(&self) -> Vec<usize> {
        self.scopes
            .iter()
            .flat_map(|s| s.steps.iter().copied())
            .collect()
    }

    /// Number of steps in the plan.
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Whether the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Human-readable rendering of the resolved order.
    pub fn describe(&self, steps: &[MigrationStep]) -> String {
        let mut out = String::new();
        let mut position = 1;
        for scope in &self.scopes {
            if let Some(group) = &scope.group {
                out.push_str(&format!("group {group}:\n"));
            }
            for &i in &scope.steps {
                let indent = if scope.is_group() { "  " } else { "" };
                let step = &steps[i];
                out.push_str(&format!("{indent}{position:>3}. {step}"));
                let deps = self.dependencies(i);
                if !deps.is_empty() {
                    let names: Vec<&str> = deps.iter().map(|&d| steps[d].name.as_str()).collect();
                    out.push_str(&format!(" <- {}", names.join(", ")));
                }
                out.push('\n');
                position += 1;
            }
        }
        out
    }
}

/// Gather `(dependency, dependent)` pairs from explicit `depends_on` lists
/// plus edges derived from table references within the batch.
fn collect_edges(
    steps: &[MigrationStep],
    index: &HashMap<&str, usize>,
) -> CoreResult<Vec<(usize, usize)>> {
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut edges = Vec::new();

    for (i, step) in steps.iter().enumerate() {
        for dep in &step.depends_on {
            let &d = index
                .get(dep.as_str())
                .ok_or_else(|| CoreError::UnknownDependency {
                    step: step.name.to_string(),
                    dependency: dep.to_string(),
                })?;
            if seen.insert((d, i)) {
                edges.push((d, i));
            }
        }
    }

    let creators: Vec<(usize, &MigrationStep)> = steps
        .iter()
        .enumerate()
        .filter(|(_, s)| matches!(s.kind, StepKind::CreateTable(_)))
        .collect();

    for (i, step) in steps.iter().enumerate() {
        let needed = match &step.kind {
            StepKind::CreateTable(_) => step.referenced_tables()?,
            StepKind::AddColumn(_) | StepKind::SeedRow(_) => vec![step.target_table().clone()],
        };
        for table in &needed {
            for &(c, creator) in &creators {
                if c != i && creator.target_table().same_relation(table) && seen.insert((c, i)) {
                    log::debug!(
                        "Step '{}' depends on '{}' through table {}",
                        step.name,
                        creator.name,
                        table
                    );
                    edges.push((c, i));
                }
            }
        }
    }

    Ok(edges)
}

/// Reject the graph if any strongly connected component is a cycle,
/// reporting every participating step in declaration order.
fn check_cycles<N, E>(
    graph: &DiGraph<N, E>,
    steps: &[MigrationStep],
    members: impl Fn(NodeIndex) -> Vec<usize>,
) -> CoreResult<()> {
    let mut cyclic: BTreeSet<usize> = BTreeSet::new();
    for component in tarjan_scc(graph) {
        let is_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|&n| graph.contains_edge(n, n));
        if is_cycle {
            for node in component {
                cyclic.extend(members(node));
            }
        }
    }

    if cyclic.is_empty() {
        Ok(())
    } else {
        Err(CoreError::DependencyCycle {
            steps: cyclic.into_iter().map(|i| steps[i].name.to_string()).collect(),
        })
    }
}

/// Group steps into scopes and order both the scopes and their members.
fn build_scopes(steps: &[MigrationStep], step_graph: &DiGraph<usize, ()>) -> CoreResult<Vec<Scope>> {
    let mut scope_members: Vec<Vec<usize>> = Vec::new();
    let mut scope_labels: Vec<Option<String>> = Vec::new();
    let mut scope_of = vec![0usize; steps.len()];
    let mut by_label: HashMap<&str, usize> = HashMap::new();

    for (i, step) in steps.iter().enumerate() {
        let scope = match step.group.as_deref() {
            Some(label) => *by_label.entry(label).or_insert_with(|| {
                scope_members.push(Vec::new());
                scope_labels.push(Some(label.to_string()));
                scope_members.len() - 1
            }),
            None => {
                scope_members.push(Vec::new());
                scope_labels.push(None);
                scope_members.len() - 1
            }
        };
        scope_members[scope].push(i);
        scope_of[i] = scope;
    }

    let mut scope_graph: DiGraph<usize, ()> = DiGraph::new();
    let scope_nodes: Vec<NodeIndex> = (0..scope_members.len())
        .map(|s| scope_graph.add_node(s))
        .collect();
    for edge in step_graph.raw_edges() {
        let from = scope_of[step_graph[edge.source()]];
        let to = scope_of[step_graph[edge.target()]];
        if from != to && !scope_graph.contains_edge(scope_nodes[from], scope_nodes[to]) {
            scope_graph.add_edge(scope_nodes[from], scope_nodes[to], ());
        }
    }
    check_cycles(&scope_graph, steps, |n| {
        scope_members[scope_graph[n]].clone()
    })?;

    // Members are pushed in declaration order, so the first is the earliest.
    let scope_order = kahn_order(&scope_graph, |n| scope_members[scope_graph[n]][0]);

    let mut scopes = Vec::with_capacity(scope_order.len());
    for node in scope_order {
        let s = scope_graph[node];
        let members = &scope_members[s];
        let steps_in_order = if members.len() == 1 {
            members.clone()
        } else {
            let mut inner: DiGraph<usize, ()> = DiGraph::new();
            let local: HashMap<usize, NodeIndex> =
                members.iter().map(|&m| (m, inner.add_node(m))).collect();
            for edge in step_graph.raw_edges() {
                let a = step_graph[edge.source()];
                let b = step_graph[edge.target()];
                if let (Some(&na), Some(&nb)) = (local.get(&a), local.get(&b)) {
                    inner.add_edge(na, nb, ());
                }
            }
            kahn_order(&inner, |n| inner[n])
                .into_iter()
                .map(|n| inner[n])
                .collect()
        };
        scopes.push(Scope {
            group: scope_labels[s].clone(),
            steps: steps_in_order,
        });
    }
    Ok(scopes)
}

/// Kahn's algorithm over an acyclic graph, always emitting the ready node
/// with the smallest `key` next.
fn kahn_order(graph: &DiGraph<usize, ()>, key: impl Fn(NodeIndex) -> usize) -> Vec<NodeIndex> {
    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|n| {
            graph
                .neighbors_directed(n, petgraph::Direction::Incoming)
                .count()
        })
        .collect();

    let mut ready: BinaryHeap<Reverse<(usize, NodeIndex)>> = graph
        .node_indices()
        .filter(|n| in_degree[n.index()] == 0)
        .map(|n| Reverse((key(n), n)))
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(Reverse((_, node))) = ready.pop() {
        order.push(node);
        for next in graph.neighbors_directed(node, petgraph::Direction::Outgoing) {
            in_degree[next.index()] -= 1;
            if in_degree[next.index()] == 0 {
                ready.push(Reverse((key(next), next)));
            }
        }
    }
    order
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
