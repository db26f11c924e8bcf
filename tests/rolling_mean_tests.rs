use ma_signal_board::indicator::rolling::RollingMean;

#[test]
fn partial_window_averages_what_it_has() {
    let mut ma = RollingMean::new(3);
    assert_eq!(ma.push(Some(1.0)), Some(1.0));
    assert_eq!(ma.push(Some(2.0)), Some(1.5));

    let v = ma.push(Some(3.0)).unwrap();
    assert!((v - 2.0).abs() < f64::EPSILON);

    let v = ma.push(Some(4.0)).unwrap();
    assert!((v - 3.0).abs() < f64::EPSILON);
}

#[test]
fn single_window_passes_values_through() {
    let mut ma = RollingMean::new(1);
    assert_eq!(ma.push(Some(42.0)), Some(42.0));
    assert_eq!(ma.push(Some(99.0)), Some(99.0));
    assert_eq!(ma.push(None), None);
    assert_eq!(ma.push(Some(7.5)), Some(7.5));
}

#[test]
fn undefined_values_are_skipped() {
    let mut ma = RollingMean::new(3);
    ma.push(Some(10.0));
    assert_eq!(ma.push(None), Some(10.0));
    assert_eq!(ma.push(Some(20.0)), Some(15.0));
    // window is now [None, 20, 30]
    assert_eq!(ma.push(Some(30.0)), Some(25.0));
}

#[test]
fn window_of_only_undefined_values_is_undefined() {
    let mut ma = RollingMean::new(2);
    assert_eq!(ma.value(), None);
    ma.push(Some(5.0));
    ma.push(None);
    assert_eq!(ma.push(None), None);
    assert_eq!(ma.push(Some(8.0)), Some(8.0));
}

#[test]
fn no_drift_after_many_pushes() {
    let mut ma = RollingMean::new(10);
    let mut naive_buf: Vec<f64> = Vec::new();

    for i in 0..10_000u64 {
        let val = (i as f64) * 0.1 + 0.01;
        ma.push(Some(val));
        naive_buf.push(val);
        if naive_buf.len() > 10 {
            naive_buf.remove(0);
        }

        let ring_avg = ma.value().unwrap();
        let naive_avg: f64 = naive_buf.iter().sum::<f64>() / naive_buf.len() as f64;
        assert!(
            (ring_avg - naive_avg).abs() < 1e-8,
            "Drift at i={}: ring={} naive={}",
            i,
            ring_avg,
            naive_avg
        );
    }
}

#[test]
fn equal_prefixes_give_identical_means() {
    // Two windows that have not filled yet see the same values in the same order.
    let mut short = RollingMean::new(20);
    let mut long = RollingMean::new(50);
    for i in 0..20 {
        let v = Some(100.0 + i as f64 * 0.37);
        assert_eq!(short.push(v), long.push(v));
    }
}

#[test]
fn repeated_value_is_returned_exactly_after_varied_history() {
    let mut ma = RollingMean::new(20);
    for i in 0..200 {
        ma.push(Some(50.0 + (i as f64 * 0.7).cos() * 13.1));
    }
    for _ in 0..20 {
        ma.push(Some(129.93));
    }
    assert_eq!(ma.value(), Some(129.93));

    // Undefined slots do not break a constant window.
    ma.push(None);
    assert_eq!(ma.value(), Some(129.93));
}
