use indexmap::{IndexMap, IndexSet};
use zodgen_core::ir::{AdditionalPolicy, ComponentTable, SchemaNode};

/// Direct references between named shapes: `owner -> {targets}`.
///
/// Append-only for the lifetime of one compilation; iteration follows the
/// order in which edges were first recorded.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: IndexMap<String, IndexSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The static reference graph of a component table, one edge per
    /// `$ref` written in each component's own schema.
    pub fn from_components(components: &ComponentTable) -> Self {
        let mut graph = Self::new();
        for (name, component) in components {
            let mut targets = IndexSet::new();
            collect_refs(&component.node, &mut targets);
            for target in &targets {
                graph.record(name, target);
            }
        }
        graph
    }

    /// Record that `owner` references `target`.
    pub fn record(&mut self, owner: &str, target: &str) {
        self.edges
            .entry(owner.to_string())
            .or_default()
            .insert(target.to_string());
    }

    /// Direct dependencies of `owner`, in first-seen order.
    pub fn dependencies_of(&self, owner: &str) -> Vec<String> {
        self.edges
            .get(owner)
            .map(|deps| deps.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Every cycle reachable in the graph, found by DFS with a recursion stack.
    /// Each cycle is reported once, starting from the shape first entered.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut visited = IndexSet::new();
        let mut path = Vec::new();
        let mut cycles = Vec::new();

        for owner in self.edges.keys() {
            if !visited.contains(owner.as_str()) {
                self.visit(owner, &mut visited, &mut path, &mut cycles);
            }
        }
        cycles
    }

    fn visit<'a>(
        &'a self,
        node: &'a str,
        visited: &mut IndexSet<&'a str>,
        path: &mut Vec<&'a str>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        visited.insert(node);
        path.push(node);

        if let Some(deps) = self.edges.get(node) {
            for dep in deps {
                if let Some(start) = path.iter().position(|n| *n == dep.as_str()) {
                    cycles.push(path[start..].iter().map(|n| n.to_string()).collect());
                } else if !visited.contains(dep.as_str()) {
                    self.visit(dep, visited, path, cycles);
                }
            }
        }

        path.pop();
    }

    /// Strongly connected groups of shapes that can reach themselves
    /// (Tarjan). Shapes on no cycle belong to no group.
    pub fn cycle_groups(&self) -> CycleGroups {
        let mut search = SccSearch::default();
        for owner in self.edges.keys() {
            if !search.index.contains_key(owner.as_str()) {
                self.strong_connect(owner, &mut search);
            }
        }
        search.groups
    }

    fn strong_connect<'a>(&'a self, node: &'a str, search: &mut SccSearch<'a>) {
        let index = search.next;
        search.next += 1;
        search.index.insert(node, index);
        search.low.insert(node, index);
        search.stack.push(node);
        search.on_stack.insert(node);

        for dep in self.edges.get(node).into_iter().flatten() {
            let dep = dep.as_str();
            let reached = if !search.index.contains_key(dep) {
                self.strong_connect(dep, search);
                search.low[dep]
            } else if search.on_stack.contains(dep) {
                search.index[dep]
            } else {
                continue;
            };
            if reached < search.low[node] {
                search.low.insert(node, reached);
            }
        }

        if search.low[node] != index {
            return;
        }
        let mut members = Vec::new();
        while let Some(member) = search.stack.pop() {
            search.on_stack.swap_remove(member);
            members.push(member);
            if member == node {
                break;
            }
        }
        let self_loop = self.edges.get(node).is_some_and(|deps| deps.contains(node));
        if members.len() > 1 || self_loop {
            search.groups.push(members);
        }
    }
}

#[derive(Default)]
struct SccSearch<'a> {
    next: usize,
    index: IndexMap<&'a str, usize>,
    low: IndexMap<&'a str, usize>,
    stack: Vec<&'a str>,
    on_stack: IndexSet<&'a str>,
    groups: CycleGroups,
}

/// Which shapes sit on a common reference cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleGroups {
    group_of: IndexMap<String, usize>,
    count: usize,
}

impl CycleGroups {
    fn push(&mut self, members: Vec<&str>) {
        for member in members {
            self.group_of.insert(member.to_string(), self.count);
        }
        self.count += 1;
    }

    /// True when `a` and `b` can each reach the other through references.
    pub fn shared(&self, a: &str, b: &str) -> bool {
        match (self.group_of.get(a), self.group_of.get(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Collect every shape name referenced by `node`, without following references.
pub fn collect_refs(node: &SchemaNode, out: &mut IndexSet<String>) {
    match node {
        SchemaNode::Ref(name) => {
            out.insert(name.clone());
        }
        SchemaNode::Composition(composition) => {
            for member in &composition.members {
                collect_refs(member, out);
            }
        }
        SchemaNode::Array(array) => {
            if let Some(items) = &array.items {
                collect_refs(items, out);
            }
        }
        SchemaNode::Object(object) => {
            for prop in object.properties.values() {
                collect_refs(prop, out);
            }
            if let AdditionalPolicy::Typed(values) = &object.additional_properties {
                collect_refs(values, out);
            }
        }
        SchemaNode::Nullable(inner) => collect_refs(inner, out),
        SchemaNode::String(_)
        | SchemaNode::Number(_)
        | SchemaNode::Boolean
        | SchemaNode::Null
        | SchemaNode::Literal(_)
        | SchemaNode::Unknown => {}
    }
}
