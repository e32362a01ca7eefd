/// Every graph should implement `GraphNodeOrder` and `GraphEdgeOrder`.
///
/// Generates a test module `$env` for graph type `$graph` constructed with `$config` that checks
/// the listed capability traits against a reference model fed with the same random writes.
macro_rules! test_graph_ops {
    ($env:ident, $graph:ident, $config:expr, ($($trait:ident),*)) => {
        #[cfg(test)]
        mod $env {
            use crate::{prelude::*, testing::test_graph_ops};
            use fxhash::FxHashMap;
            use itertools::Itertools;
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;

            const WEIGHTS: [Weight; 4] = [0.25, 0.5, 1.0, 2.0];

            fn config() -> GraphConfig {
                $config
            }

            /// Expected weights keyed by identifier pairs; undirected keys are ordered
            type Reference = FxHashMap<(String, String), Weight>;

            fn key(a: String, b: String) -> (String, String) {
                if !config().directed && b < a { (b, a) } else { (a, b) }
            }

            /// Applies at most `m_ub` random writes on nodes `n0..n{n-1}` to a new graph and the
            /// reference model
            fn random_graph<R: Rng>(rng: &mut R, n: NumNodes, m_ub: NumEdges) -> ($graph, Reference) {
                let config = config();
                let mut graph = <$graph>::with_config(config);
                let mut reference = Reference::default();

                for _ in 0..m_ub {
                    let u = rng.random_range(0..n);
                    let v = rng.random_range(0..n);
                    let w = WEIGHTS[rng.random_range(0..WEIGHTS.len())];
                    let reduction = match rng.random_range(0..3) {
                        0 => None,
                        1 => Some(Reduction::Min),
                        _ => Some(Reduction::Max),
                    };

                    let (a, b) = (format!("n{u}"), format!("n{v}"));
                    graph.add_edge_with(&a, &b, w, reduction).unwrap();

                    if u == v && !config.self_loops {
                        continue;
                    }

                    let w = config.effective_weight(w);
                    reference
                        .entry(key(a, b))
                        .and_modify(|old| {
                            *old = reduction.map_or(w, |r| r.reduce(*old, w));
                        })
                        .or_insert(w);
                }

                (graph, reference)
            }

            $(
                test_graph_ops!($graph: $trait);
            )*
        }
    };
    ($graph:ident: GraphNew) => {
        #[test]
        fn graph_new() {
            let graph = <$graph>::with_config(config());

            assert_eq!(graph.config(), config());
            assert_eq!(graph.number_of_nodes(), 0);
            assert_eq!(graph.number_of_edges(), 0);
            assert!(graph.is_empty());
            assert!(graph.vertices().collect_vec().is_empty());

            let mut graph = graph;
            for n in 1..20 {
                assert_eq!(graph.add_id(&format!("n{n}")).unwrap(), n - 1);
                assert_eq!(graph.number_of_nodes(), n);
                assert_eq!(graph.construct_row(n - 1), vec![NO_EDGE; n as usize]);
            }
            assert!(graph.has_no_edges());
        }
    };
    ($graph:ident: WeightedAdjacency) => {
        #[test]
        fn test_weighted_adjacency() {
            let rng = &mut Pcg64Mcg::seed_from_u64(3);

            for n in [10 as NumNodes, 20, 50] {
                for m_ub in [n * 2, n * 5, n * 10] {
                    for _ in 0..5 {
                        let (graph, _) = random_graph(rng, n, m_ub as NumEdges);
                        let dense = graph.to_dense_matrix(NO_EDGE);

                        assert_eq!(dense.shape(), (graph.len(), graph.len()));
                        assert_eq!(graph.edges(false).count(), graph.number_of_entries());
                        if graph.is_undirected() {
                            assert!(dense.is_symmetric());
                            assert_eq!(
                                graph.edges(true).count(),
                                graph.number_of_edges() as usize
                            );
                        } else {
                            assert_eq!(graph.number_of_entries(), graph.number_of_edges() as usize);
                        }

                        for u in graph.vertices() {
                            assert_eq!(graph.construct_row(u).as_slice(), dense.row(u as usize));
                            assert_eq!(graph.degree_of(u) as usize, graph.neighbors_of(u).count());
                            assert!(graph.neighbors_of(u).all(|(v, w)| graph.weight_of(u, v) == Some(w)));
                        }

                        let ids = graph.idmap().ids().iter().rev().collect_vec();
                        let rows = graph.rows_of(&ids).unwrap();
                        for (i, id) in ids.iter().enumerate() {
                            assert_eq!(rows.row(i), graph.row_of(id).unwrap().as_slice());
                        }

                        let ordered = graph.ordered_edges(false).collect_vec();
                        assert!(ordered.windows(2).all(|w| w[0].edge() < w[1].edge()));
                    }
                }
            }
        }
    };
    ($graph:ident: GraphEdgeEditing) => {
        #[test]
        fn test_edge_editing() {
            let rng = &mut Pcg64Mcg::seed_from_u64(5);

            for n in [5 as NumNodes, 10, 30] {
                for m_ub in [n, n * 4, n * 8] {
                    for _ in 0..5 {
                        let (graph, reference) = random_graph(rng, n, m_ub as NumEdges);

                        assert_eq!(graph.number_of_edges() as usize, reference.len());

                        let entries: usize = reference
                            .keys()
                            .map(|(a, b)| if graph.is_undirected() && a != b { 2 } else { 1 })
                            .sum();
                        assert_eq!(graph.number_of_entries(), entries);

                        for ((a, b), &w) in &reference {
                            assert_eq!(graph.get_edge(a, b).unwrap(), w);
                            if graph.is_undirected() {
                                assert_eq!(graph.get_edge(b, a).unwrap(), w);
                            }
                        }

                        for WeightedEdge(Edge(u, v), w) in graph.edges(false) {
                            let k = key(graph.id_of(u).to_string(), graph.id_of(v).to_string());
                            assert_eq!(reference.get(&k), Some(&w));
                        }
                    }
                }
            }
        }
    };
    ($graph:ident: DirectedWeightedAdjacency) => {
        #[test]
        fn test_directed_weighted_adjacency() {
            assert!(config().directed);

            let rng = &mut Pcg64Mcg::seed_from_u64(7);

            for n in [10 as NumNodes, 20, 50] {
                for m_ub in [n * 2, n * 5, n * 10] {
                    for _ in 0..5 {
                        let (graph, _) = random_graph(rng, n, m_ub as NumEdges);

                        let in_degrees: NumNodes = graph.vertices().map(|v| graph.in_degree_of(v)).sum();
                        assert_eq!(in_degrees as usize, graph.number_of_entries());

                        for WeightedEdge(Edge(u, v), w) in graph.edges(false) {
                            assert!(graph.in_neighbors_of(v).contains(&(u, w)));
                        }

                        for v in graph.vertices() {
                            for (u, w) in graph.in_neighbors_of(v) {
                                assert_eq!(graph.weight_of(u, v), Some(w));
                            }
                            assert_eq!(graph.out_degree_of(v), graph.degree_of(v));
                        }
                    }
                }
            }
        }
    };
}

pub(crate) use test_graph_ops;

/// Counts `WARN` events emitted while a closure runs on the current thread
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct WarningCounter(std::sync::Arc<std::sync::atomic::AtomicUsize>);

#[cfg(test)]
impl WarningCounter {
    /// Runs `f` with a subscriber that records warnings into `self`
    pub(crate) fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        use tracing_subscriber::layer::SubscriberExt;

        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::with_default(subscriber, f)
    }

    /// Returns the number of warnings recorded so far
    pub(crate) fn count(&self) -> usize {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarningCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _: tracing_subscriber::layer::Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }
}
