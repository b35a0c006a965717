//! Lazy-greedy CELF seed selection.
//!
//! Expected influence under the Independent Cascade model is monotone and
//! submodular, so marginal gains can only shrink as the seed set grows. The
//! driver keeps a max-heap of `(candidate, last-known gain, seed-set size
//! at estimation)` and only re-estimates the popped top against the current
//! seed set; if the refreshed entry still tops the heap it is the true
//! argmax and is committed without touching any other candidate.
//!
//! Phase 1 (one estimate per candidate) dominates runtime and is fanned out
//! across worker threads, each draining a private heap into the shared one
//! behind a mutex. Phase 2 is sequential: every re-estimate depends on the
//! seed set committed so far.

use crate::cascade::estimate_spread;
use crate::graph::{Graph, NodeId};
use crate::rng::SeedSchedule;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Configuration for a selection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectConfig {
    /// Number of seeds to select.
    pub k: usize,
    /// Monte Carlo rollouts per spread estimate.
    pub mc_rounds: u32,
    /// Explicit master seed. `None` seeds every stream from OS entropy,
    /// trading reproducibility for run-to-run independence.
    pub master_seed: Option<u64>,
    /// Cap on the candidates entering Phase 1, keeping the top scorers by
    /// `value * (out_degree + 1)`. `None` considers every eligible node.
    pub max_candidates: Option<usize>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            k: 10,
            mc_rounds: 1000,
            master_seed: None,
            max_candidates: None,
        }
    }
}

/// A candidate with its last-known marginal gain.
///
/// `iteration_computed` is the seed-set size the gain was estimated
/// against; the entry is fresh only while that still matches. A plain
/// `(node, gain)` queue without the stamp would commit stale gains.
#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    node: NodeId,
    gain: f64,
    iteration_computed: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    /// Max-order by gain; equal gains break toward the smaller node ID so
    /// runs are reproducible under a fixed seed schedule.
    fn cmp(&self, other: &Self) -> Ordering {
        self.gain
            .total_cmp(&other.gain)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// One committed seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionStep {
    pub node: NodeId,
    pub external_id: String,
    pub value: f64,
    pub marginal_gain: f64,
    /// Running total of committed gains after this step.
    pub total_reach: f64,
}

/// Result of a selection run, in commit order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    pub seeds: Vec<NodeId>,
    pub steps: Vec<SelectionStep>,
    /// Estimated expected weighted spread of the full seed set.
    pub expected_reach: f64,
}

/// Select up to `config.k` seeds maximizing expected weighted spread.
///
/// Returns fewer than `k` seeds (with a warning) when the candidate heap
/// runs dry first; the truncated prefix is still a valid greedy selection.
pub fn select(graph: &Graph, config: &SelectConfig) -> Selection {
    let schedule = SeedSchedule::new(config.master_seed);
    let candidates = candidate_pool(graph, config.max_candidates);

    if config.k == 0 {
        return Selection {
            seeds: Vec::new(),
            steps: Vec::new(),
            expected_reach: 0.0,
        };
    }

    info!(
        candidates = candidates.len(),
        k = config.k,
        mc_rounds = config.mc_rounds,
        "initializing CELF heap"
    );
    let mut heap = initial_gains(graph, &candidates, config.mc_rounds, &schedule);

    let mut seeds: Vec<NodeId> = Vec::with_capacity(config.k.min(candidates.len()));
    let mut in_seed_set = vec![false; graph.node_count()];
    let mut steps = Vec::with_capacity(config.k.min(candidates.len()));
    let mut current_val = 0.0;

    while seeds.len() < config.k {
        let Some(top) = heap.pop() else { break };
        if in_seed_set[top.node as usize] {
            continue;
        }

        if top.iteration_computed == seeds.len() {
            // Fresh: the recorded gain was estimated against exactly this
            // seed set, so submodularity makes it the true argmax.
            seeds.push(top.node);
            in_seed_set[top.node as usize] = true;
            current_val += top.gain;
            debug!(
                node = graph.external_id(top.node),
                gain = top.gain,
                total = current_val,
                "committed seed"
            );
            steps.push(SelectionStep {
                node: top.node,
                external_id: graph.external_id(top.node).to_string(),
                value: graph.value(top.node),
                marginal_gain: top.gain,
                total_reach: current_val,
            });
        } else {
            // Stale: re-estimate against the current seed set and re-queue.
            // A Monte Carlo estimate can dip below zero; it is pushed
            // unchanged and simply sinks in the heap.
            let mut trial = Vec::with_capacity(seeds.len() + 1);
            trial.extend_from_slice(&seeds);
            trial.push(top.node);
            let mut rng = schedule.rng_for(top.node, seeds.len());
            let gain = estimate_spread(graph, &trial, config.mc_rounds, &mut rng) - current_val;
            heap.push(HeapEntry {
                node: top.node,
                gain,
                iteration_computed: seeds.len(),
            });
        }
    }

    if seeds.len() < config.k {
        warn!(
            selected = seeds.len(),
            requested = config.k,
            "candidate heap exhausted before k seeds"
        );
    }

    Selection {
        seeds,
        steps,
        expected_reach: current_val,
    }
}

/// The eligible candidates entering Phase 1, ascending by node ID.
///
/// With a cap, keeps the top scorers by the `value * (out_degree + 1)`
/// heuristic; ties go to the smaller node ID.
fn candidate_pool(graph: &Graph, cap: Option<usize>) -> Vec<NodeId> {
    let mut eligible = graph.eligible_nodes();
    if let Some(m) = cap {
        if m < eligible.len() {
            let score = |u: NodeId| graph.value(u) * (graph.out_degree(u) + 1) as f64;
            eligible.sort_by(|&a, &b| score(b).total_cmp(&score(a)).then_with(|| a.cmp(&b)));
            eligible.truncate(m);
            eligible.sort_unstable();
        }
    }
    eligible
}

/// Phase 1: estimate the singleton spread of every candidate in parallel.
///
/// Workers take contiguous chunks of the candidate range, push results into
/// a private heap, and drain it into the shared heap under the mutex once
/// their chunk is done. The rayon join barrier guarantees all entries are
/// merged before Phase 2 starts.
fn initial_gains(
    graph: &Graph,
    candidates: &[NodeId],
    mc_rounds: u32,
    schedule: &SeedSchedule,
) -> BinaryHeap<HeapEntry> {
    let shared = Mutex::new(BinaryHeap::with_capacity(candidates.len()));
    let chunk = (candidates.len() / rayon::current_num_threads()).max(1);

    candidates.par_chunks(chunk).for_each(|part| {
        let mut local = BinaryHeap::with_capacity(part.len());
        for &node in part {
            let mut rng = schedule.rng_for(node, 0);
            let gain = estimate_spread(graph, &[node], mc_rounds, &mut rng);
            local.push(HeapEntry {
                node,
                gain,
                iteration_computed: 0,
            });
        }
        let mut heap = shared.lock().expect("phase-1 merge mutex poisoned");
        heap.append(&mut local);
    });

    shared
        .into_inner()
        .expect("phase-1 merge mutex poisoned")
}
