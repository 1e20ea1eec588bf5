use super::*;

#[test]
fn fast_job_returns_its_value() {
    let v = run_with_timeout("sum", Duration::from_secs(5), || Ok(2 + 2)).unwrap();
    assert_eq!(v, 4);
}

#[test]
fn job_error_is_passed_through() {
    let err = run_with_timeout::<(), _>("fail", Duration::from_secs(5), || {
        Err(QrCraftError::upload("denied"))
    })
    .unwrap_err();
    assert!(matches!(err, QrCraftError::Upload(_)));
}

#[test]
fn slow_job_times_out() {
    let err = run_with_timeout("sleepy", Duration::from_millis(20), || {
        std::thread::sleep(Duration::from_millis(500));
        Ok(())
    })
    .unwrap_err();
    match err {
        QrCraftError::Timeout { operation, after } => {
            assert_eq!(operation, "sleepy");
            assert_eq!(after, Duration::from_millis(20));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn panicking_job_is_an_error_not_a_hang() {
    let err = run_with_timeout::<(), _>("boom", Duration::from_secs(5), || panic!("boom"))
        .unwrap_err();
    assert!(matches!(err, QrCraftError::Other(_)));
}
