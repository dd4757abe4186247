use proptest::prelude::*;
use yagikit_core::BoomProfile;

fn rod() -> BoomProfile {
    BoomProfile::new(1130.0, 19.5, 16.0).unwrap()
}

#[test]
fn test_radius_at_reflector_lies_between_tip_and_base() {
    let boom = rod();
    let r = boom.radius_at(72.53).unwrap();
    assert!(r > boom.tip_radius());
    assert!(r < boom.base_radius());
}

proptest! {
    #[test]
    fn radius_decreases_along_boom(a in 0.0f64..1130.0, b in 0.0f64..1130.0) {
        let boom = rod();
        let (near, far) = if a < b { (a, b) } else { (b, a) };
        prop_assume!(far - near > 1e-6);
        prop_assert!(boom.radius_at(near).unwrap() > boom.radius_at(far).unwrap());
    }

    #[test]
    fn radius_stays_within_bounds(pos in 0.0f64..=1130.0) {
        let boom = rod();
        let r = boom.radius_at(pos).unwrap();
        prop_assert!(r <= boom.base_radius() + 1e-12);
        prop_assert!(r >= boom.tip_radius() - 1e-12);
    }
}
