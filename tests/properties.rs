use polylife::{
    Adjacency, BoundsPolicy, Config, Coord, Delta, Error, Generation, GridStore, RuleTable,
    TileShape, geometry::{self, PLANE},
};
use std::collections::{BTreeSet, HashSet};

const SHAPES: [TileShape; 3] = [TileShape::Square, TileShape::Hexagon, TileShape::Triangle];
const ADJACENCIES: [Adjacency; 2] = [Adjacency::Moore, Adjacency::VonNeumann];

fn live_set(store: &GridStore) -> BTreeSet<Coord> {
    store.live_cells().collect()
}

/// A deterministic scatter of cells, dense enough to keep things busy
fn scatter(width: i32, height: i32) -> Vec<Coord> {
    (0..height)
        .flat_map(|row| (0..width).map(move |col| Coord::new(col, row)))
        .filter(|c| (c.col * 31 + c.row * 17 + c.col * c.row) % 3 == 0)
        .collect()
}

/// A rule that is legal for every shape and adjacency
fn small_rule() -> RuleTable {
    RuleTable::new([2], [1, 2])
}

#[test]
fn neighbor_tables_are_well_formed() {
    for shape in SHAPES {
        for adjacency in ADJACENCIES {
            let max = geometry::max_neighbors(shape, adjacency) as usize;
            for row in -4..4 {
                for col in -4..4 {
                    let c = Coord::new(col, row);
                    let all: Vec<_> = geometry::neighbors(c, shape, adjacency).collect();
                    let unique: HashSet<_> = all.iter().collect();

                    assert!(!all.is_empty());
                    assert_eq!(all.len(), max);
                    assert_eq!(unique.len(), all.len());
                }
            }
        }
    }
}

#[test]
fn snapshot_round_trip_for_every_layout() {
    for shape in SHAPES {
        for adjacency in ADJACENCIES {
            let config = Config::new(shape, 24, 24)
                .with_adjacency(adjacency)
                .with_bounds(BoundsPolicy::Wrap)
                .with_rules(small_rule());
            let mut store = GridStore::new(config.clone()).unwrap();
            store.seed(scatter(24, 24)).unwrap();
            for _ in 0..3 {
                store.step().unwrap();
            }

            let wire = store.export_snapshot().to_json().unwrap();
            let mut copy = GridStore::new(config).unwrap();
            copy.import_snapshot(&Generation::from_json(&wire).unwrap()).unwrap();

            assert_eq!(live_set(&copy), live_set(&store), "{shape} {adjacency}");
            assert_eq!(copy.generation(), store.generation());
        }
    }
}

#[test]
fn empty_grid_yields_empty_delta() {
    let rules = [
        RuleTable::conway(),
        RuleTable::high_life(),
        RuleTable::day_and_night(),
        RuleTable::seeds(),
        RuleTable::brians_brain(),
    ];
    for rule in rules {
        let mut store = GridStore::new(Config::new(TileShape::Square, 16, 16)).unwrap();
        let delta = store.step_with(&rule).unwrap();

        assert!(delta.is_empty(), "{rule}");
        assert!(live_set(&store).is_empty());
    }
}

#[test]
fn glider_returns_translated() {
    let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)].map(Coord::from);
    let mut store = GridStore::new(Config::new(TileShape::Square, 32, 32)).unwrap();
    store.seed(glider).unwrap();

    let mut deltas: Vec<Delta> = Vec::new();
    for _ in 0..4 {
        deltas.push(store.step().unwrap());
    }

    let expected: BTreeSet<_> = glider.iter().map(|&c| c + Coord::one()).collect();
    assert_eq!(live_set(&store), expected);

    // the deltas chain, and replaying them reproduces the glider exactly
    let mut replay = GridStore::new(Config::new(TileShape::Square, 32, 32)).unwrap();
    replay.seed(glider).unwrap();
    for (i, delta) in deltas.iter().enumerate() {
        assert_eq!(delta.from, i as u64);
        assert_eq!(delta.to, i as u64 + 1);
        replay.import_delta(delta).unwrap();
    }
    assert_eq!(live_set(&replay), expected);
}

#[test]
fn block_is_a_still_life() {
    let block = [(5, 5), (6, 5), (5, 6), (6, 6)].map(Coord::from);
    let mut store = GridStore::new(Config::new(TileShape::Square, 16, 16)).unwrap();
    store.seed(block).unwrap();

    assert!(store.step().unwrap().is_empty());
    assert_eq!(live_set(&store), block.into_iter().collect::<BTreeSet<_>>());
}

#[test]
fn duplicate_delta_is_stale() {
    let mut leader = GridStore::new(Config::new(TileShape::Hexagon, 20, 20).with_rules(small_rule())).unwrap();
    leader.seed(scatter(20, 20)).unwrap();
    let mut follower = leader.clone();

    let delta = leader.step().unwrap();
    follower.import_delta(&delta).unwrap();
    let err = follower.import_delta(&delta).unwrap_err();

    assert!(matches!(err, Error::StaleDelta { expected: 1, found: 0 }));
    assert_eq!(live_set(&follower), live_set(&leader));
}

#[test]
fn impossible_survival_count_is_rejected() {
    let config = Config::new(TileShape::Square, 16, 16).with_rules(RuleTable::new([3], [9]));
    let mut store = GridStore::new(config).unwrap();
    store.seed([(1, 1), (2, 1), (3, 1)].map(Coord::from)).unwrap();
    let before = live_set(&store);

    let err = store.step().unwrap_err();
    assert!(matches!(err, Error::InvalidRuleTable { count: 9, max: 8, .. }));
    assert_eq!(store.generation(), 0);
    assert_eq!(live_set(&store), before);
}

#[test]
fn peers_stay_in_sync_over_json() {
    for shape in SHAPES {
        let config = Config::new(shape, 30, 30)
            .with_bounds(BoundsPolicy::Clip)
            .with_rules(small_rule());
        let mut server = GridStore::new(config.clone()).unwrap();
        server.seed(scatter(30, 30)).unwrap();

        let mut client = GridStore::new(config).unwrap();
        let snapshot = server.export_snapshot().to_json().unwrap();
        client.import_snapshot(&Generation::from_json(snapshot).unwrap()).unwrap();

        for _ in 0..10 {
            let delta = server.step().unwrap();
            let wire = server.export_delta(delta.from, delta.to).unwrap().to_json().unwrap();
            client.import_delta(&Delta::from_json(wire).unwrap()).unwrap();
        }

        assert_eq!(client.generation(), 10);
        assert_eq!(client.sorted_cells(), server.sorted_cells(), "{shape}");
    }
}

#[test]
fn read_phase_sees_only_previous_generation() {
    // a single cell under B1/S: if writes leaked into reads, births would
    // cascade outward instead of forming exactly one ring
    let config = Config::new(TileShape::Square, 16, 16).with_rules(RuleTable::new([1], []));
    let mut store = GridStore::new(config).unwrap();
    store.seed([Coord::new(5, 5)]).unwrap();

    let delta = store.step().unwrap();
    assert_eq!(delta.added.len(), 8);
    assert_eq!(delta.removed, vec![Coord::new(5, 5)]);
}

#[test]
fn extreme_coordinates_never_overflow() {
    for shape in SHAPES {
        let config = Config::new(shape, 0, 0).with_rules(small_rule());
        let mut store = GridStore::new(config).unwrap();

        for c in [(i32::MAX, 0), (0, i32::MIN), (i32::MIN, i32::MAX)] {
            let err = store.seed([Coord::from(c)]).unwrap_err();
            assert!(matches!(err, Error::OutOfBoundsCoordinate { .. }), "{shape} {c:?}");
        }

        let (lo, hi) = (*PLANE.start(), *PLANE.end());
        store.seed([(hi, hi), (hi - 1, hi), (lo, lo), (lo + 1, lo)].map(Coord::from)).unwrap();
        for _ in 0..3 {
            store.step().unwrap();
        }
        assert_eq!(store.generation(), 3);
    }
}

#[test]
fn rule_swap_keeps_snapshots_importable() {
    let config = Config::new(TileShape::Hexagon, 16, 16).with_rules(RuleTable::brians_brain());
    let mut store = GridStore::new(config).unwrap();
    store.seed(scatter(16, 16)).unwrap();
    store.step().unwrap();
    store.set_rules(RuleTable::new([2], [3]));

    let mut copy = GridStore::new(store.config().clone()).unwrap();
    copy.import_snapshot(&store.export_snapshot()).unwrap();
    assert_eq!(copy.sorted_cells(), store.sorted_cells());
}

#[test]
fn wide_rules_survive_json() {
    let config = Config::new(TileShape::Triangle, 12, 12).with_rules(RuleTable::new([10], [12]));
    let json = serde_json::to_string(&config).unwrap();

    assert_eq!(serde_json::from_str::<Config>(&json).unwrap(), config);
}
