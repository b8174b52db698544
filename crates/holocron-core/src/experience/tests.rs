use super::*;

fn config() -> ExperienceConfig {
    ExperienceConfig::default()
}

#[test]
fn test_new_tracker() {
    let tracker = ExperienceTracker::new(&config());
    assert_eq!(tracker.level(), 1);
    assert_eq!(tracker.experience(), 0.0);
    assert_eq!(tracker.threshold(), 100.0);
}

#[test]
fn test_burst_of_250_reaches_level_two() {
    let mut tracker = ExperienceTracker::new(&config());

    let ups = tracker.add_experience(250.0, 1.0, &config());

    // 250 - 100 = 150, and 150 < 200 so the loop stops at level 2
    assert_eq!(ups.gained(), 1);
    assert_eq!(tracker.level(), 2);
    assert_eq!(tracker.experience(), 150.0);
    assert_eq!(tracker.threshold(), 200.0);
}

#[test]
fn test_multiple_level_ups_in_one_call() {
    let mut tracker = ExperienceTracker::new(&config());

    // 100 + 200 + 300 = 600 -> level 4 with 50 left over
    let ups = tracker.add_experience(650.0, 1.0, &config());

    assert_eq!(ups.from, 1);
    assert_eq!(ups.to, 4);
    assert_eq!(ups.levels().collect::<Vec<_>>(), vec![2, 3, 4]);
    assert_eq!(tracker.experience(), 50.0);
    assert!(tracker.experience() < tracker.threshold());
}

#[test]
fn test_multiplier_applies() {
    let mut tracker = ExperienceTracker::new(&config());
    tracker.add_experience(40.0, 2.5, &config());
    assert_eq!(tracker.level(), 2);
    assert_eq!(tracker.experience(), 0.0);
}

#[test]
fn test_negative_and_nan_gain_ignored() {
    let mut tracker = ExperienceTracker::new(&config());
    tracker.add_experience(50.0, 1.0, &config());

    tracker.add_experience(-500.0, 1.0, &config());
    tracker.add_experience(f32::NAN, 1.0, &config());
    tracker.add_experience(10.0, f32::INFINITY, &config());

    assert_eq!(tracker.level(), 1);
    assert_eq!(tracker.experience(), 50.0);
}

#[test]
fn test_invariant_after_many_gains() {
    let mut tracker = ExperienceTracker::new(&config());
    let mut crossings = 0;

    for i in 0..200 {
        let ups = tracker.add_experience((i % 37) as f32 * 13.0, 1.0, &config());
        crossings += ups.gained();
        assert!(tracker.experience() < tracker.threshold());
    }

    assert_eq!(tracker.level(), 1 + crossings);
}

#[test]
fn test_force_level_up() {
    let mut tracker = ExperienceTracker::new(&config());
    tracker.add_experience(60.0, 1.0, &config());

    let ups = tracker.force_level_up(3, &config());

    assert_eq!(ups.gained(), 3);
    assert_eq!(tracker.level(), 4);
    assert_eq!(tracker.threshold(), 400.0);
    assert_eq!(tracker.experience(), 60.0);
}

#[test]
fn test_reset() {
    let mut tracker = ExperienceTracker::new(&config());
    tracker.add_experience(1000.0, 1.0, &config());

    tracker.reset(&config());

    assert_eq!(tracker.level(), 1);
    assert_eq!(tracker.experience(), 0.0);
    assert_eq!(tracker.threshold(), 100.0);
}

#[test]
fn test_normalize_partial_record() {
    let mut tracker: ExperienceTracker = serde_json::from_str(r#"{"level": 0}"#).unwrap();
    assert!(tracker.normalize(&config()));
    assert_eq!(tracker.level(), 1);
    assert_eq!(tracker.threshold(), 100.0);
    assert!(!tracker.normalize(&config()));
}

#[test]
fn test_huge_gain_levels_in_one_step() {
    let mut tracker = ExperienceTracker::new(&config());

    // 100 * n * (n + 1) / 2 <= 1e12 first fails past n = 141_420
    let ups = tracker.add_experience(1.0e12, 1.0, &config());

    assert_eq!(ups.gained(), 141_420);
    assert_eq!(tracker.level(), 141_421);
    assert!(tracker.experience() < tracker.threshold());
}

#[test]
fn test_oversized_gain_stops_at_max_level() {
    let mut tracker = ExperienceTracker::new(&config());

    let ups = tracker.add_experience(1.0e21, 1.0, &config());

    assert_eq!(tracker.level(), u32::MAX);
    assert_eq!(ups.gained(), u32::MAX - 1);
    assert!(tracker.experience() < tracker.threshold());

    // Nothing left to climb
    let again = tracker.add_experience(f32::MAX, 1.0, &config());
    assert_eq!(again.gained(), 0);
    assert_eq!(again.levels().count(), 0);
    assert!(tracker.experience() < tracker.threshold());
}

#[test]
fn test_force_level_up_saturates() {
    let mut tracker = ExperienceTracker::new(&config());

    let ups = tracker.force_level_up(u32::MAX, &config());

    assert_eq!(tracker.level(), u32::MAX);
    assert_eq!(ups.gained(), u32::MAX - 1);
}
