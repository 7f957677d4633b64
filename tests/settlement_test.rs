use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use voltline::application::services::settlement::{
    already_settled, default_commission_rate, entries_for, split,
};
use voltline::domain::{CustomerId, ElectricianId, Job, TransactionKind, WalletTransaction};

fn sample_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

#[test]
fn given_no_override_when_reading_default_rate_then_fifteen_percent() {
    assert_eq!(default_commission_rate(), dec!(0.15));
}

#[test]
fn given_thirty_at_fifteen_percent_when_splitting_then_exact_legs() {
    let split = split(dec!(30.00), dec!(0.15));

    assert_eq!(split.earning, dec!(25.50));
    assert_eq!(split.commission, dec!(4.50));
}

#[test]
fn given_midpoint_cents_when_splitting_then_both_legs_round_half_up() {
    // 0.10 * 0.15 = 0.015 and 0.10 * 0.85 = 0.085: both sit on the
    // midpoint and both round away from zero.
    let split = split(dec!(0.10), dec!(0.15));

    assert_eq!(split.commission, dec!(0.02));
    assert_eq!(split.earning, dec!(0.09));
}

#[test]
fn given_independent_rounding_when_summing_legs_then_drift_from_total_is_kept() {
    let split = split(dec!(0.10), dec!(0.15));

    // A cent of drift against the 0.10 total is accepted rather than
    // silently adjusting one leg.
    assert_eq!(split.earning + split.commission, dec!(0.11));
}

#[test]
fn given_uneven_total_when_splitting_then_two_decimal_places() {
    let split = split(dec!(99.99), dec!(0.15));

    assert_eq!(split.commission, dec!(15.00));
    assert_eq!(split.earning, dec!(84.99));
    assert_eq!(split.earning + split.commission, dec!(99.99));
}

#[test]
fn given_completed_job_when_building_entries_then_both_legs_tagged_with_job() {
    let mut job = Job::new(
        CustomerId::new("cust-1"),
        "Install ceiling fan",
        dec!(30.00),
        sample_time(),
    );
    let electrician = ElectricianId::new("elec-1");
    job.electrician_id = Some(electrician.clone());

    let split = split(job.total_price(), dec!(0.15));
    let [earning, commission] = entries_for(&job, &electrician, split, sample_time());

    assert_eq!(earning.kind, TransactionKind::Earning);
    assert_eq!(earning.amount, dec!(25.50));
    assert_eq!(earning.job_id, Some(job.id));
    assert_eq!(earning.electrician_id, electrician);
    assert!(earning.description.contains(&job.id.to_string()));

    assert_eq!(commission.kind, TransactionKind::Commission);
    assert_eq!(commission.amount, dec!(4.50));
    assert_eq!(commission.job_id, Some(job.id));
    assert!(commission.description.contains(&job.id.to_string()));
}

#[test]
fn given_prior_earning_when_checking_then_already_settled() {
    let entry = WalletTransaction::new(
        ElectricianId::new("elec-1"),
        Some(voltline::domain::JobId::new()),
        TransactionKind::Earning,
        dec!(25.50),
        "Earnings",
        sample_time(),
    );

    assert!(already_settled(std::slice::from_ref(&entry)));
}

#[test]
fn given_only_bonus_entries_when_checking_then_not_settled() {
    let entry = WalletTransaction::new(
        ElectricianId::new("elec-1"),
        None,
        TransactionKind::Bonus,
        dec!(10.00),
        "Referral bonus",
        sample_time(),
    );

    assert!(!already_settled(std::slice::from_ref(&entry)));
    assert!(!already_settled(&[]));
}
