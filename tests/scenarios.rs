use sketchbook::bloom::{MembershipFilter, Status};
use sketchbook::hyperloglog::CardinalityEstimator;
use sketchbook::Error;

fn existing_passwords() -> MembershipFilter {
    let _ = env_logger::try_init();
    let mut filter = MembershipFilter::new(1000, 3).unwrap();
    for password in &["password123", "admin123", "qwerty123"] {
        filter.add(*password);
    }
    filter
}

#[test]
fn test_password_membership() {
    let filter = existing_passwords();

    assert!(filter.contains("password123"));
    assert!(filter.contains("admin123"));
    assert!(filter.contains("qwerty123"));
    assert!(!filter.contains(""));
    assert!(!filter.contains(None));
}

#[test]
fn test_password_uniqueness() {
    let filter = existing_passwords();
    let candidates = vec![
        Some("password123"),
        Some("newpassword"),
        Some("admin123"),
        Some("guest"),
        Some(""),
        None,
    ];

    let results = filter.classify(candidates.clone());

    let items = results.iter().map(|c| c.item).collect::<Vec<_>>();
    assert_eq!(items, candidates);
    assert_eq!(results[0].status, Status::PossiblyPresent);
    assert_eq!(results[2].status, Status::PossiblyPresent);
    assert_eq!(results[4].status, Status::Invalid);
    assert_eq!(results[5].status, Status::Invalid);

    // "newpassword" and "guest" are unique unless all three of their bits collide.
    for result in &[results[1], results[3]] {
        assert_ne!(result.status, Status::Invalid);
        if result.status == Status::PossiblyPresent {
            assert!(filter.contains(result.item));
        }
    }
}

#[test]
fn test_invalid_parameters() {
    assert!(matches!(
        MembershipFilter::new(0, 3),
        Err(Error::InvalidParameter { .. })
    ));
    assert!(matches!(
        MembershipFilter::new(1000, 0),
        Err(Error::InvalidParameter { .. })
    ));
    assert!(matches!(
        CardinalityEstimator::new(0),
        Err(Error::InvalidParameter { .. })
    ));
}

#[test]
fn test_registers_fill_as_items_arrive() {
    let _ = env_logger::try_init();
    let mut estimator = CardinalityEstimator::new(10).unwrap();
    let threshold = 2.5 * estimator.register_count() as f64;
    let tolerance = 4.0 * estimator.standard_error();

    let mut nonzero = 0;
    for i in 1..=20_000usize {
        estimator.add(&format!("192.168.{}.{}", i / 256, i % 256));

        let filled = estimator.register_count() - estimator.zero_registers();
        assert!(filled >= nonzero);
        nonzero = filled;

        let estimate = estimator.count();
        if i as f64 > 2.0 * threshold && i % 1000 == 0 {
            let error = (estimate - i as f64).abs() / i as f64;
            assert!(error < tolerance, "relative error {} at {}", error, i);
        }
    }
}

#[test]
fn test_empty_estimator() {
    let estimator = CardinalityEstimator::new(14).unwrap();
    assert_eq!(estimator.zero_registers(), estimator.register_count());
    assert_eq!(estimator.count(), 0.0);
}

#[test]
fn test_determinism() {
    let build = || {
        let mut filter = MembershipFilter::new(512, 4).unwrap();
        let mut estimator = CardinalityEstimator::new(8).unwrap();
        for i in 0..300 {
            let item = format!("client-{}", i);
            filter.add(&item);
            estimator.add(&item);
        }
        (filter, estimator)
    };

    let (first_filter, first_estimator) = build();
    let (second_filter, second_estimator) = build();

    assert_eq!(first_filter, second_filter);
    assert_eq!(first_estimator.registers(), second_estimator.registers());
    assert_eq!(
        first_estimator.count().to_bits(),
        second_estimator.count().to_bits()
    );
}
