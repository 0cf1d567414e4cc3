//! Relationship clustering for auto layout.

use std::collections::{HashMap, VecDeque};

use crate::schema::{Relationship, Table};

/// A cluster of table indices in visiting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub members: Vec<usize>,
    /// Sum of the members' relationship degrees.
    pub connectivity: usize,
}

/// Breadth-first clusters over the relationship graph.
///
/// Seeds and neighbors are visited by degree, highest first, ties in
/// declaration order. A group stops growing at `max_size` tables; the rest
/// of its component seeds later groups. Groups come out sorted by
/// connectivity, highest first. Self-references and endpoints naming
/// missing tables add no adjacency.
pub fn group_tables(tables: &[Table], relationships: &[Relationship], max_size: usize) -> Vec<Group> {
    let max_size = max_size.max(1);
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, table) in tables.iter().enumerate() {
        index.entry(table.name.as_str()).or_insert(i);
    }

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); tables.len()];
    let mut degree = vec![0usize; tables.len()];
    for rel in relationships {
        let (Some(&a), Some(&b)) = (
            index.get(rel.from.table.as_str()),
            index.get(rel.to.table.as_str()),
        ) else {
            continue;
        };
        if a == b {
            continue;
        }
        degree[a] += 1;
        degree[b] += 1;
        adjacency[a].push(b);
        adjacency[b].push(a);
    }

    let by_degree = |list: &mut Vec<usize>| {
        list.sort_by(|&x, &y| degree[y].cmp(&degree[x]).then(x.cmp(&y)));
        list.dedup();
    };
    for neighbors in &mut adjacency {
        by_degree(neighbors);
    }
    let mut seeds: Vec<usize> = (0..tables.len()).collect();
    by_degree(&mut seeds);

    let mut visited = vec![false; tables.len()];
    let mut groups = Vec::new();
    for seed in seeds {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut members = vec![seed];
        let mut queue = VecDeque::from([seed]);

        while let Some(current) = queue.pop_front() {
            for &next in &adjacency[current] {
                if members.len() >= max_size {
                    break;
                }
                if !visited[next] {
                    visited[next] = true;
                    members.push(next);
                    queue.push_back(next);
                }
            }
        }

        let connectivity = members.iter().map(|&m| degree[m]).sum();
        groups.push(Group {
            members,
            connectivity,
        });
    }

    groups.sort_by(|a, b| b.connectivity.cmp(&a.connectivity));
    groups
}
