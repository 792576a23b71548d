//! Static service dependency graph

use faultline_core::{Error, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// Service id to the service ids it depends on, validated acyclic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    dependencies: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build the graph, rejecting dependency cycles
    pub fn new(dependencies: &HashMap<String, Vec<String>>) -> Result<Self> {
        let dependencies: BTreeMap<String, Vec<String>> = dependencies
            .iter()
            .map(|(service, deps)| (service.clone(), deps.clone()))
            .collect();
        check_acyclic(&dependencies)?;
        Ok(Self { dependencies })
    }

    pub fn dependencies_of(&self, service: &str) -> &[String] {
        self.dependencies
            .get(service)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Failed services ordered so every service follows its dependencies
    ///
    /// Depth-first post-order over the failed services in name order. The walk
    /// passes through healthy services so a failed transitive dependency is
    /// still emitted first, but only failed services appear in the output.
    pub fn recovery_order(&self, failed: &BTreeSet<String>) -> Vec<String> {
        let mut visited = BTreeSet::new();
        let mut order = Vec::with_capacity(failed.len());
        for service in failed {
            self.visit(service, failed, &mut visited, &mut order);
        }
        order
    }

    fn visit<'a>(
        &'a self,
        service: &'a str,
        failed: &BTreeSet<String>,
        visited: &mut BTreeSet<&'a str>,
        order: &mut Vec<String>,
    ) {
        if !visited.insert(service) {
            return;
        }
        for dependency in self.dependencies_of(service) {
            self.visit(dependency, failed, visited, order);
        }
        if failed.contains(service) {
            order.push(service.to_string());
        }
    }

    /// Split an ordered service list into groups with no dependency path
    /// between them, each keeping the input order
    pub fn independent_groups(&self, ordered: &[String]) -> Vec<Vec<String>> {
        let mut components = UnionFind::default();
        for (service, deps) in &self.dependencies {
            for dep in deps {
                components.union(service, dep);
            }
        }

        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        for service in ordered {
            let root = components.find(service);
            match groups.iter_mut().find(|(r, _)| *r == root) {
                Some((_, members)) => members.push(service.clone()),
                None => groups.push((root, vec![service.clone()])),
            }
        }
        groups.into_iter().map(|(_, members)| members).collect()
    }
}

/// Kahn's algorithm: whatever never reaches in-degree zero sits on a cycle
fn check_acyclic(dependencies: &BTreeMap<String, Vec<String>>) -> Result<()> {
    let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (service, deps) in dependencies {
        in_degree.entry(service.as_str()).or_insert(0);
        for dep in deps {
            in_degree.entry(dep.as_str()).or_insert(0);
            *in_degree.entry(service.as_str()).or_insert(0) += 1;
            dependents.entry(dep.as_str()).or_default().push(service.as_str());
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(service, _)| *service)
        .collect();
    let mut processed = 0;

    while let Some(service) = queue.pop_front() {
        processed += 1;
        for &dependent in dependents.get(service).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(dependent);
                }
            }
        }
    }

    if processed == in_degree.len() {
        return Ok(());
    }

    let cyclic: Vec<&str> = in_degree
        .iter()
        .filter(|(_, &degree)| degree > 0)
        .map(|(service, _)| *service)
        .collect();
    Err(Error::configuration(format!(
        "Circular dependency detected between services: {}",
        cyclic.join(", ")
    )))
}

#[derive(Debug, Default)]
struct UnionFind {
    parent: HashMap<String, String>,
}

impl UnionFind {
    fn find(&mut self, node: &str) -> String {
        let mut root = node.to_string();
        while let Some(parent) = self.parent.get(&root) {
            if *parent == root {
                break;
            }
            root = parent.clone();
        }

        // Path compression
        let mut current = node.to_string();
        while current != root {
            let next = self
                .parent
                .insert(current.clone(), root.clone())
                .unwrap_or_else(|| root.clone());
            current = next;
        }
        root
    }

    fn union(&mut self, a: &str, b: &str) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            // Smaller name becomes the root so grouping is deterministic
            let (root, child) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent.insert(child, root);
        }
    }
}
