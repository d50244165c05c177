use crate::graph::geo::haversine_m;
use crate::graph::{Coord, UndirectedGraph};
use crate::Result;
use ordered_float::OrderedFloat;
use rand::prelude::*;

/// Generates a road-like grid of `rows * cols` coordinates starting at `origin`
/// and spaced `step` degrees apart. Each vertex is connected to its 4
/// neighbours with the great-circle length of the segment as weight.
pub fn generate_coordinate_grid(
    origin: Coord,
    rows: usize,
    cols: usize,
    step: f64,
) -> Result<UndirectedGraph<Coord, OrderedFloat<f64>>> {
    let mut graph = UndirectedGraph::with_capacity(rows * cols);

    let mut points = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            points.push(Coord::new(
                origin.lat() + i as f64 * step,
                origin.lng() + j as f64 * step,
            )?);
        }
    }

    for i in 0..rows {
        for j in 0..cols {
            let current = points[i * cols + j];
            graph.add_vertex(current);
            if j + 1 < cols {
                let east = points[i * cols + j + 1];
                graph.add_edge(current, east, OrderedFloat(haversine_m(&current, &east)))?;
            }
            if i + 1 < rows {
                let north = points[(i + 1) * cols + j];
                graph.add_edge(current, north, OrderedFloat(haversine_m(&current, &north)))?;
            }
        }
    }

    Ok(graph)
}

/// Generates a random geometric graph of `n` coordinates scattered in a
/// `span`-degree square around `center`. Points within `radius_m` metres of
/// each other are connected with their great-circle distance as weight.
pub fn generate_geometric<R: Rng>(
    rng: &mut R,
    center: Coord,
    n: usize,
    span: f64,
    radius_m: f64,
) -> Result<UndirectedGraph<Coord, OrderedFloat<f64>>> {
    let mut graph = UndirectedGraph::with_capacity(n);
    let half = span / 2.0;

    let mut points = Vec::with_capacity(n);
    for _ in 0..n {
        let p = Coord::new(
            center.lat() + rng.gen_range(-half..=half),
            center.lng() + rng.gen_range(-half..=half),
        )?;
        graph.add_vertex(p);
        points.push(p);
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let d = haversine_m(&points[i], &points[j]);
            if d <= radius_m {
                graph.add_edge(points[i], points[j], OrderedFloat(d))?;
            }
        }
    }

    Ok(graph)
}

/// Generates a random graph over identifiers `v0..v{n-1}` with about
/// `edge_factor * n` edges and integer weights in `1..=max_weight`.
/// Self edges and parallel edges are allowed.
pub fn generate_named<R: Rng>(
    rng: &mut R,
    n: usize,
    edge_factor: f64,
    max_weight: u64,
) -> Result<UndirectedGraph<String, u64>> {
    let mut graph = UndirectedGraph::with_capacity(n);
    for i in 0..n {
        graph.add_vertex(format!("v{}", i));
    }
    if n == 0 {
        return Ok(graph);
    }

    let num_edges = (edge_factor * n as f64) as usize;
    for _ in 0..num_edges {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        let weight = rng.gen_range(1..=max_weight.max(1));
        graph.add_edge(format!("v{}", u), format!("v{}", v), weight)?;
    }

    Ok(graph)
}
