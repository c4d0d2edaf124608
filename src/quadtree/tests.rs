use super::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::collections::HashSet;

fn world() -> Rect {
    Rect::new(Point::new(0.0, 0.0), 128.0, 128.0)
}

fn random_entries(rng: &mut impl Rng, len: usize) -> Vec<Entry> {
    (0..len)
        .map(|i| {
            let p = Point::new(rng.gen_range(0.0, 128.0), rng.gen_range(0.0, 128.0));
            (p, BoidId(i))
        })
        .collect()
}

fn ids(found: &[&Entry]) -> Vec<usize> {
    let mut ids = found.iter().map(|(_, id)| id.0).collect::<Vec<_>>();
    ids.sort();
    ids
}

#[test]
fn insertions() {
    let mut table = Quadtree::new(world(), 1);

    table.insert(Point::new(16.0, 32.0), BoidId(123)).unwrap();

    assert_eq!(table.len(), 1);
    assert!(table.is_leaf());
}

#[test]
fn insert_outside_bounds_is_rejected() {
    let mut table = Quadtree::new(world(), 4);

    let p = Point::new(128.5, 3.0);
    assert_eq!(table.insert(p, BoidId(0)), Err(p));
    assert!(table.is_empty());

    // the bounds are closed
    table.insert(Point::new(128.0, 128.0), BoidId(1)).unwrap();
    table.insert(Point::new(0.0, 0.0), BoidId(2)).unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn full_leaf_subdivides() {
    let mut table = Quadtree::new(world(), 1);

    table.insert(Point::new(10.0, 10.0), BoidId(0)).unwrap();
    table.insert(Point::new(100.0, 100.0), BoidId(1)).unwrap();

    assert!(!table.is_leaf());
    assert!(table.entries().is_empty());
    let [nw, ne, sw, se] = table.children().expect("children");
    assert_eq!(nw.entries(), &[(Point::new(10.0, 10.0), BoidId(0))]);
    assert!(ne.is_empty());
    assert!(sw.is_empty());
    assert_eq!(se.entries(), &[(Point::new(100.0, 100.0), BoidId(1))]);

    // further inserts go straight to the children
    table.insert(Point::new(100.0, 10.0), BoidId(2)).unwrap();
    assert!(table.entries().is_empty());
    assert_eq!(table.children().unwrap()[1].len(), 1);
}

#[test]
fn subdivide_is_idempotent() {
    let mut table = Quadtree::new(world(), 2);
    table.insert(Point::new(10.0, 10.0), BoidId(0)).unwrap();
    table.insert(Point::new(70.0, 10.0), BoidId(1)).unwrap();

    table.subdivide();
    let before = table.node_count();
    table.subdivide();

    assert_eq!(table.node_count(), before);
    assert_eq!(table.node_count(), 5);
    assert_eq!(table.len(), 2);
}

#[test]
fn subdivide_moves_entries_to_first_matching_child() {
    let mut table = Quadtree::new(world(), 3);
    // on the edge shared by all four quadrants
    table.insert(Point::new(64.0, 64.0), BoidId(0)).unwrap();
    // on the edge between ne and se
    table.insert(Point::new(100.0, 64.0), BoidId(1)).unwrap();
    table.insert(Point::new(20.0, 90.0), BoidId(2)).unwrap();

    table.subdivide();

    let [nw, ne, sw, se] = table.children().unwrap();
    assert!(table.entries().is_empty());
    assert_eq!(ids(&nw.iter().collect::<Vec<_>>()), vec![0]);
    assert_eq!(ids(&ne.iter().collect::<Vec<_>>()), vec![1]);
    assert_eq!(ids(&sw.iter().collect::<Vec<_>>()), vec![2]);
    assert!(se.is_empty());
}

#[test]
fn partition_invariants_hold() {
    let mut rng = SmallRng::seed_from_u64(0xdeadbeef);
    let entries = random_entries(&mut rng, 1000);
    let table = Quadtree::from_iterator(world(), 4, entries.iter().cloned());

    assert_eq!(table.len(), entries.len());

    for node in table.nodes() {
        match node.children() {
            Some(children) => {
                assert!(node.entries().is_empty(), "internal nodes hold no entries");
                let quadrants = node.bounds().quadrants();
                for (child, quadrant) in children.iter().zip(quadrants.iter()) {
                    assert_eq!(child.bounds(), quadrant);
                    assert_eq!(child.level(), node.level() + 1);
                }
                let area: f64 = children
                    .iter()
                    .map(|c| c.bounds().width * c.bounds().height)
                    .sum();
                let parent = node.bounds().width * node.bounds().height;
                assert!((area - parent).abs() < 1e-9);
            }
            None => {
                assert!(node.entries().len() <= node.capacity());
                for (p, _) in node.entries() {
                    assert!(node.bounds().contains(p));
                }
            }
        }
    }

    // every entry lives in exactly one leaf
    let found = table.iter().map(|(_, id)| *id).collect::<Vec<_>>();
    let unique = found.iter().collect::<HashSet<_>>();
    assert_eq!(found.len(), entries.len());
    assert_eq!(unique.len(), entries.len());
}

#[test]
fn test_range_query_all() {
    let mut rng = SmallRng::seed_from_u64(42);
    let entries = random_entries(&mut rng, 256);
    let table = Quadtree::from_iterator(world(), 1, entries);

    let mut res = Vec::new();
    let everything = Circle::new(Point::new(64.0, 64.0), 1000.0);
    table.query_range(&everything, &mut res);

    assert_eq!(res.len(), 256);
    assert_eq!(ids(&res), (0..256).collect::<Vec<_>>(), "There were duplicates in the output!");
}

#[test]
fn range_query_matches_brute_force() {
    let mut rng = SmallRng::seed_from_u64(7);
    let entries = random_entries(&mut rng, 512);
    let table = Quadtree::from_iterator(world(), 2, entries.iter().cloned());

    let mut res = Vec::new();
    for _ in 0..64 {
        let circle = Circle::new(
            Point::new(rng.gen_range(-20.0, 148.0), rng.gen_range(-20.0, 148.0)),
            rng.gen_range(1.0, 40.0),
        );

        res.clear();
        table.query_range(&circle, &mut res);

        let expected = entries
            .iter()
            .filter(|(p, _)| p.sq_distance(&circle.center) < circle.radius * circle.radius)
            .map(|(_, id)| id.0)
            .collect::<Vec<_>>();
        assert_eq!(ids(&res), expected, "{:?}", circle);
    }
}

#[test]
fn range_query_excludes_the_rim() {
    let mut table = Quadtree::new(world(), 1);
    table.insert(Point::new(10.0, 10.0), BoidId(0)).unwrap();
    table.insert(Point::new(20.0, 10.0), BoidId(1)).unwrap();

    let mut res = Vec::new();
    table.query_range(&Circle::new(Point::new(10.0, 10.0), 10.0), &mut res);

    assert_eq!(ids(&res), vec![0]);
}

#[test]
fn range_queries_are_not_deduplicated() {
    let mut table = Quadtree::new(world(), 1);
    table.insert(Point::new(10.0, 10.0), BoidId(0)).unwrap();
    table.insert(Point::new(90.0, 90.0), BoidId(1)).unwrap();

    let circle = Circle::new(Point::new(12.0, 12.0), 5.0);
    let mut res = Vec::new();
    table.query_ranges(&[circle, circle], &mut res);

    assert_eq!(ids(&res), vec![0, 0]);
}

#[test]
fn coincident_entries_stop_at_max_depth() {
    let mut table = Quadtree::new(world(), 1);
    for i in 0..10 {
        table.insert(Point::new(33.0, 33.0), BoidId(i)).unwrap();
    }

    assert_eq!(table.len(), 10);
    assert_eq!(table.depth(), MAX_DEPTH);

    let mut res = Vec::new();
    table.query_range(&Circle::new(Point::new(33.0, 33.0), 1.0), &mut res);
    assert_eq!(res.len(), 10);
}

#[test]
fn nodes_walk_pre_order() {
    let mut table = Quadtree::new(world(), 1);
    table.insert(Point::new(10.0, 10.0), BoidId(0)).unwrap();
    table.insert(Point::new(100.0, 100.0), BoidId(1)).unwrap();

    let origins = table
        .nodes()
        .map(|node| node.bounds().origin)
        .collect::<Vec<_>>();

    assert_eq!(
        origins,
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(64.0, 0.0),
            Point::new(0.0, 64.0),
            Point::new(64.0, 64.0),
        ]
    );
    assert_eq!(table.depth(), 1);
}
