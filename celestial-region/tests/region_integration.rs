use celestial_region::pixel::ang2pix;
use celestial_region::{
    predicate, Geometry, IntersectionFold, MergeStrategy, PixelRangeSet, RangeSet, RasterConfig,
    RegionAccumulator, RegionUnion, SetOperation, UnionFold,
};
use proptest::prelude::*;

const STRATEGIES: [MergeStrategy; 3] = [
    MergeStrategy::Sweep,
    MergeStrategy::SearchFirst,
    MergeStrategy::SearchSecond,
];

fn range_set() -> impl Strategy<Value = RangeSet> {
    prop::collection::vec((0u64..10_000, 1u64..200), 0..40)
        .prop_map(|ivs| ivs.into_iter().map(|(a, len)| a..a + len).collect())
}

fn region(begin: u64, end: u64) -> Geometry {
    Geometry::region(PixelRangeSet::from_pixel_range(29, begin, end).unwrap())
}

// --- Concrete scenarios ---

#[test]
fn overlapping_adds_merge_into_one_interval() {
    let mut r = RangeSet::new();
    r.add(10, 20);
    r.add(15, 25);
    assert_eq!(r.as_slice(), &[10, 25]);
    assert_eq!(r.nranges(), 1);
}

#[test]
fn order_three_pixel_ranges_combine() {
    let mut a = PixelRangeSet::new();
    a.add_pixel_range(3, 10, 90).unwrap();
    let mut b = PixelRangeSet::new();
    b.add_pixel_range(3, 20, 40).unwrap();

    let inter = a.intersection(&b);
    let union = a.union(&b);
    assert_eq!(inter.to_order_ranges(3, false).unwrap(), RangeSet::from_range(20, 40));
    assert_eq!(union.to_order_ranges(3, false).unwrap(), RangeSet::from_range(10, 90));
    assert_eq!(inter, PixelRangeSet::from_pixel_range(3, 20, 40).unwrap());
}

#[test]
fn circle_complement_is_antipodal() {
    let c = Geometry::circle(10.0, 20.0, 30.0).unwrap();
    assert_eq!(
        c.complement().unwrap(),
        Geometry::circle(190.0, -20.0, 150.0).unwrap()
    );
}

#[test]
fn square_complement_reverses_vertices() {
    let square = Geometry::polygon_from_flat(&[10.0, 10.0, 20.0, 10.0, 20.0, 20.0, 10.0, 20.0])
        .unwrap();
    assert!(square.area() > 0.0);
    let comp = square.complement().unwrap();
    match comp {
        Geometry::Polygon(poly) => assert_eq!(
            poly.vertices(),
            &[(10.0, 20.0), (20.0, 20.0), (20.0, 10.0), (10.0, 10.0)]
        ),
        other => panic!("expected a polygon, got {}", other),
    }
}

#[test]
fn point_in_order_three_region() {
    let region = Geometry::region(PixelRangeSet::from_pixel_range(3, 40, 750).unwrap());
    let point = Geometry::point(-4.0, 0.0).unwrap();
    let pix = ang2pix(3, -4.0, 0.0).unwrap();
    let inside = predicate::contains(&point, &region, &RasterConfig::default()).unwrap();
    assert_eq!(inside, (40..750).contains(&pix));

    let excluding = PixelRangeSet::full_sky().difference(&PixelRangeSet::from_pixel(3, pix).unwrap());
    let outside =
        predicate::contains(&point, &Geometry::region(excluding), &RasterConfig::default())
            .unwrap();
    assert!(!outside);
}

#[test]
fn union_partials_agree_in_every_grouping() {
    let inputs = [region(10, 30), region(40, 60), region(50, 70)];
    let expected = region(10, 30)
        .as_region()
        .unwrap()
        .union(region(40, 70).as_region().unwrap());

    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for order in orders {
        for split in 0..=3 {
            let mut left = RegionUnion::new();
            let mut right = RegionUnion::new();
            for (n, &i) in order.iter().enumerate() {
                let target = if n < split { &mut left } else { &mut right };
                target.accumulate(Some(&inputs[i])).unwrap();
            }
            right.merge(left);
            assert_eq!(right.finalize(), Some(Geometry::region(expected.clone())));
        }
    }
}

// --- Pixel order shift ---

#[test]
fn pixel_survives_degrade_at_its_order() {
    for order in [0u8, 3, 10, 17, 29] {
        let npix = 12u64 << (2 * order as u32);
        for pix in [0, npix / 3, npix - 1] {
            let set = PixelRangeSet::from_pixel(order, pix).unwrap();
            assert_eq!(set.degraded_to_order(order, true).unwrap(), set);
            assert_eq!(set.degraded_to_order(order, false).unwrap(), set);
            assert_eq!(
                set.to_order_ranges(order, false).unwrap(),
                RangeSet::from_range(pix, pix + 1)
            );
        }
    }
}

// --- Aggregation ---

#[test]
fn accumulators_fold_rasterized_shapes() {
    let config = RasterConfig::at_order(7);
    let a = Geometry::circle(30.0, 10.0, 3.0).unwrap().to_region_with(&config).unwrap();
    let b = Geometry::circle(32.0, 10.0, 3.0).unwrap().to_region_with(&config).unwrap();

    let mut union = RegionAccumulator::<UnionFold>::new();
    let mut inter = RegionAccumulator::<IntersectionFold>::new();
    for g in [&a, &b] {
        union.accumulate(Some(g)).unwrap();
        inter.accumulate(Some(g)).unwrap();
    }
    let union = union.finalize().unwrap();
    let inter = inter.finalize().unwrap();

    assert!(predicate::contains(&a, &union, &config).unwrap());
    assert!(predicate::contains(&b, &union, &config).unwrap());
    assert!(predicate::contains(&inter, &a, &config).unwrap());
    assert!(predicate::contains(&inter, &b, &config).unwrap());

    let both = Geometry::point(31.0, 10.0).unwrap();
    assert!(predicate::contains(&both, &inter, &config).unwrap());
}

// --- Algebra laws ---

proptest! {
    #[test]
    fn union_and_intersection_commute(a in range_set(), b in range_set()) {
        prop_assert_eq!(a.union(&b), b.union(&a));
        prop_assert_eq!(a.intersection(&b), b.intersection(&a));
    }

    #[test]
    fn idempotence_and_annihilation(a in range_set()) {
        prop_assert_eq!(a.union(&a), a.clone());
        prop_assert!(a.intersection(&RangeSet::new()).is_empty());
        prop_assert!(a.difference(&a).is_empty());
    }

    #[test]
    fn inclusion_exclusion(a in range_set(), b in range_set()) {
        prop_assert_eq!(
            a.union(&b).nval() + a.intersection(&b).nval(),
            a.nval() + b.nval()
        );
    }

    #[test]
    fn strategies_agree(a in range_set(), b in range_set()) {
        for op in [SetOperation::Union, SetOperation::Intersection, SetOperation::Difference] {
            let expected = a.combine(&b, op);
            for strategy in STRATEGIES {
                prop_assert_eq!(a.combine_with(&b, op, strategy), expected.clone());
            }
        }
        for strategy in STRATEGIES {
            prop_assert_eq!(a.contains_all_with(&b, strategy), a.contains_all(&b));
            prop_assert_eq!(a.overlaps_with(&b, strategy), a.overlaps(&b));
        }
    }

    #[test]
    fn compressed_round_trip(a in range_set()) {
        let back = RangeSet::from_compressed(&a.to_compressed()).unwrap();
        prop_assert_eq!(back.as_slice(), a.as_slice());
    }

    #[test]
    fn containment_implies_overlap(a in range_set(), lo in 0u64..10_500, len in 1u64..300) {
        if a.contains_range(lo, lo + len) {
            prop_assert!(a.overlaps_range(lo, lo + len));
        }
        prop_assert_eq!(a.contains(lo), a.iiv(lo).rem_euclid(2) == 0);
    }

    #[test]
    fn region_complement_is_involution(a in range_set()) {
        let region = PixelRangeSet::from_range_set(a).unwrap();
        prop_assert_eq!(region.complement().complement(), region.clone());
        prop_assert!(!region.overlaps(&region.complement()));
    }

    #[test]
    fn uniq_round_trip(a in range_set()) {
        let region = PixelRangeSet::from_range_set(a).unwrap();
        prop_assert_eq!(PixelRangeSet::from_uniq(&region.to_uniq()).unwrap(), region);
    }
}
