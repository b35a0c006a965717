//! CELF-IM: weighted influence maximization under the Independent Cascade
//! model.
//!
//! Selects up to `k` seed nodes of a directed edge-weighted graph that
//! maximize the expected sum of node values activated by an Independent
//! Cascade diffusion. Spread is estimated by Monte Carlo simulation; seeds
//! are chosen by the lazy-greedy CELF procedure, which exploits
//! submodularity of expected spread to skip re-evaluating stale marginal
//! gains.
//!
//! Reference: Leskovec et al., "Cost-effective Outbreak Detection in
//! Networks" (2007).

pub mod cascade;
pub mod celf;
pub mod gexf;
pub mod graph;
pub mod rng;

pub use cascade::{estimate_spread, simulate_cascade, ActivationScratch};
pub use celf::{select, SelectConfig, Selection, SelectionStep};
pub use graph::{Edge, Graph, GraphBuilder, NodeId};
