#[cfg(test)]
mod tests {
    use traffix_core::loading::EdgeRecord;
    use traffix_core::metrics::LatencyStatus;
    use traffix_core::routing::RoutingMode;
    use traffix_core::visual::FlowCategory;
    use traffix_core::{CONGESTION_CEILING, CONGESTION_FLOOR, Error, TrafficEngine};

    fn record(from: &str, to: &str, congestion: f64) -> EdgeRecord {
        EdgeRecord {
            from: from.to_string(),
            to: to.to_string(),
            congestion,
            free_flow_time: 10.0,
        }
    }

    fn corridor_engine(congestion: f64) -> TrafficEngine {
        let mut engine = TrafficEngine::with_seed(7);
        engine
            .load_graph(
                &[],
                &[record("A", "B", congestion), record("B", "C", congestion)],
            )
            .unwrap();
        engine
    }

    #[test]
    fn queries_before_load_are_invalid_state() {
        let engine = TrafficEngine::with_seed(1);
        assert!(matches!(engine.get_metrics(), Err(Error::InvalidState(_))));
        assert!(matches!(
            engine.find_path("A", "B", RoutingMode::Current),
            Err(Error::InvalidState(_))
        ));
        assert!(matches!(
            engine.classify_edge("A", "B"),
            Err(Error::InvalidState(_))
        ));

        let mut engine = engine;
        assert!(matches!(
            engine.start_simulation(),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn failed_load_keeps_the_previous_network() {
        let mut engine = corridor_engine(40.0);
        let nodes = vec!["A".to_string()];
        let err = engine.load_graph(&nodes, &[record("A", "Z", 30.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        // old graph still answers
        assert!(engine.find_path("A", "C", RoutingMode::Current).is_ok());
    }

    #[test]
    fn peak_tick_raises_congestion_and_optimized_raises_it_less() {
        let mut current = corridor_engine(20.0);
        current.seek(9.0).unwrap();
        current.start_simulation().unwrap();
        current.tick().unwrap();

        let mut optimized = corridor_engine(20.0);
        optimized.set_mode(RoutingMode::Optimized);
        optimized.seek(9.0).unwrap();
        optimized.start_simulation().unwrap();
        optimized.tick().unwrap();

        let total = |e: &TrafficEngine| {
            e.edge_records()
                .unwrap()
                .iter()
                .map(|r| r.congestion)
                .sum::<f64>()
        };

        let grown = total(&current);
        assert!(grown > 40.0, "peak tick must grow congestion, got {grown}");
        assert!(grown <= 2.0 * CONGESTION_CEILING);

        let damped = total(&optimized);
        assert!(damped > 40.0);
        assert!(damped < grown);
    }

    #[test]
    fn off_peak_ticks_decay_to_the_floor() {
        let mut engine = corridor_engine(90.0);
        engine.seek(2.0).unwrap();
        engine.start_simulation().unwrap();

        let mut previous = 2.0 * 90.0;
        for _ in 0..300 {
            engine.seek(2.0).unwrap();
            engine.tick().unwrap();
            let now: f64 = engine
                .edge_records()
                .unwrap()
                .iter()
                .map(|r| r.congestion)
                .sum();
            assert!(now <= previous);
            previous = now;
        }
        for record in engine.edge_records().unwrap() {
            assert_eq!(record.congestion, CONGESTION_FLOOR);
        }
    }

    #[test]
    fn metrics_are_stable_between_ticks() {
        let mut engine = corridor_engine(60.0);
        engine.start_simulation().unwrap();
        engine.tick().unwrap();

        let first = engine.get_metrics().unwrap();
        let second = engine.get_metrics().unwrap();
        assert_eq!(first.nash_cost.to_bits(), second.nash_cost.to_bits());
        assert_eq!(
            first.price_of_anarchy.to_bits(),
            second.price_of_anarchy.to_bits()
        );
        assert_eq!(
            first.latency_minutes.to_bits(),
            second.latency_minutes.to_bits()
        );
    }

    #[test]
    fn pausing_halts_ticks_but_keeps_state_queryable() {
        let mut engine = corridor_engine(50.0);
        engine.start_simulation().unwrap();
        engine.tick().unwrap();
        let hour_after_tick = engine.simulated_hour();

        engine.pause_simulation();
        let before = engine.edge_records().unwrap();
        engine.tick().unwrap();

        assert_eq!(engine.simulated_hour(), hour_after_tick);
        let after = engine.edge_records().unwrap();
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.congestion, a.congestion);
        }
        assert!(engine.get_metrics().is_ok());
        assert!(engine.find_path("A", "C", RoutingMode::Current).is_ok());
    }

    #[test]
    fn route_to_self_is_free_and_edgeless_graphs_have_no_routes() {
        let engine = corridor_engine(30.0);
        let path = engine.find_path("B", "B", RoutingMode::Current).unwrap();
        assert_eq!(path.nodes, vec!["B"]);
        assert_eq!(path.total_cost, 0.0);

        let mut edgeless = TrafficEngine::with_seed(3);
        let nodes = vec!["A".to_string(), "B".to_string()];
        edgeless.load_graph(&nodes, &[]).unwrap();
        assert!(matches!(
            edgeless.find_path("A", "B", RoutingMode::Current),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn classify_edge_follows_the_active_mode() {
        let mut engine = TrafficEngine::with_seed(5);
        engine.load_graph(&[], &[record("A", "B", 60.0)]).unwrap();

        let state = engine.classify_edge("A", "B").unwrap();
        assert_eq!(state.category, FlowCategory::Congestion);

        engine.set_mode(RoutingMode::Optimized);
        let state = engine.classify_edge("A", "B").unwrap();
        assert_eq!(state.category, FlowCategory::FreeFlow);

        assert!(matches!(
            engine.classify_edge("A", "Z"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn speed_multiplier_scales_simulated_time_only() {
        let mut engine = corridor_engine(40.0);
        engine.start_simulation().unwrap();
        engine.set_speed(10).unwrap();
        assert!(engine.set_speed(3).is_err());

        engine.tick().unwrap();
        assert!((engine.simulated_hour() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn congestion_never_leaves_its_bounds_over_long_runs() {
        let mut engine = corridor_engine(50.0);
        engine.start_simulation().unwrap();
        engine.set_speed(10).unwrap();

        for _ in 0..1000 {
            engine.tick().unwrap();
            for record in engine.edge_records().unwrap() {
                assert!(record.congestion >= CONGESTION_FLOOR);
                assert!(record.congestion <= CONGESTION_CEILING);
            }
        }
    }

    #[test]
    fn fixed_seed_runs_are_reproducible() {
        let run = || {
            let mut engine = corridor_engine(42.0);
            engine.seek(9.0).unwrap();
            engine.start_simulation().unwrap();
            for _ in 0..50 {
                engine.tick().unwrap();
            }
            engine
                .edge_records()
                .unwrap()
                .iter()
                .map(|r| r.congestion.to_bits())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn dashboard_metrics_hang_together() {
        let mut engine = TrafficEngine::with_seed(9);
        engine
            .load_graph(
                &[],
                &[
                    record("Andheri East", "Andheri West", 88.0),
                    record("Andheri West", "Bandra", 35.0),
                    record("Bandra", "Andheri East", 62.0),
                ],
            )
            .unwrap();

        let metrics = engine.get_metrics().unwrap();
        assert!(metrics.price_of_anarchy >= 1.0);
        assert!(metrics.total_throughput > 0.0);
        assert!(matches!(
            metrics.latency_status,
            LatencyStatus::Normal | LatencyStatus::Moderate | LatencyStatus::Critical
        ));

        let worst = engine.bottleneck().unwrap().unwrap();
        assert_eq!(worst.from, "Andheri East");
        assert_eq!(worst.congestion, 88.0);

        let display = engine.display_edges().unwrap();
        assert_eq!(display.len(), 3);
    }
}
