mod helpers;

use chrono::Duration;
use rust_decimal_macros::dec;

use helpers::{TEST_OFFER_TTL_SECS, TestContext};
use voltline::application::services::{DispatchError, TransitionError};
use voltline::domain::{Actor, ElectricianId, JobStatus};

#[tokio::test]
async fn given_available_worker_when_job_broadcasts_then_poll_surfaces_offer() {
    let ctx = TestContext::new();
    let worker = ElectricianId::new("elec-1");

    let idle = ctx
        .dispatch
        .go_available(worker.clone(), "Sam Voltsen".to_string())
        .await
        .unwrap();
    assert!(idle.is_none());

    let job = ctx.broadcast_job("cust-1", dec!(180.00)).await;

    let offer = ctx.dispatch.current_offer(&worker).await.unwrap().unwrap();
    assert_eq!(offer.job_id, job.id);
    assert_eq!(offer.description, "Replace breaker panel");
    assert_eq!(offer.total_price, dec!(180.00));
    assert_eq!(offer.seconds_remaining, TEST_OFFER_TTL_SECS);
    assert_eq!(
        offer.expires_at,
        offer.offered_at + Duration::seconds(TEST_OFFER_TTL_SECS)
    );
}

#[tokio::test]
async fn given_no_session_when_polling_then_not_available() {
    let ctx = TestContext::new();

    let result = ctx
        .dispatch
        .current_offer(&ElectricianId::new("ghost"))
        .await;

    assert!(matches!(result, Err(DispatchError::NotAvailable)));
}

#[tokio::test]
async fn given_one_job_when_two_workers_available_then_second_waits() {
    let ctx = TestContext::new();
    let job = ctx.broadcast_job("cust-1", dec!(180.00)).await;

    let first = ctx
        .dispatch
        .go_available(ElectricianId::new("elec-1"), "Sam Voltsen".to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.job_id, job.id);

    let second = ctx
        .dispatch
        .go_available(ElectricianId::new("elec-2"), "Kai Ampere".to_string())
        .await
        .unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn given_live_offer_when_accepted_then_job_bound_and_slot_cleared() {
    let ctx = TestContext::new();
    let worker = ElectricianId::new("elec-1");
    let job = ctx.broadcast_job("cust-1", dec!(180.00)).await;
    ctx.dispatch
        .go_available(worker.clone(), "Sam Voltsen".to_string())
        .await
        .unwrap()
        .unwrap();

    let accepted = ctx.dispatch.accept_offer(&worker).await.unwrap();

    assert_eq!(accepted.id, job.id);
    assert_eq!(accepted.status, JobStatus::Accepted);
    assert_eq!(accepted.electrician_id, Some(worker.clone()));
    assert_eq!(accepted.electrician_name.as_deref(), Some("Sam Voltsen"));

    // Slot is free again and nothing else is in broadcast.
    let next = ctx.dispatch.current_offer(&worker).await.unwrap();
    assert!(next.is_none());
}

#[tokio::test]
async fn given_elapsed_countdown_when_accepting_then_offer_expired() {
    let ctx = TestContext::new();
    let holder = ElectricianId::new("elec-1");
    let rival = ElectricianId::new("elec-2");
    let job = ctx.broadcast_job("cust-1", dec!(180.00)).await;
    ctx.dispatch
        .go_available(holder.clone(), "Sam Voltsen".to_string())
        .await
        .unwrap()
        .unwrap();

    ctx.clock.advance(Duration::seconds(TEST_OFFER_TTL_SECS + 1));

    // Past the deadline the job is offerable to someone else.
    let rebound = ctx
        .dispatch
        .go_available(rival.clone(), "Kai Ampere".to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rebound.job_id, job.id);

    let late = ctx.dispatch.accept_offer(&holder).await;
    assert!(matches!(late, Err(DispatchError::OfferExpired)));

    // The rival now holds a live offer, so the first worker gets nothing.
    let next = ctx.dispatch.current_offer(&holder).await.unwrap();
    assert!(next.is_none());
}

#[tokio::test]
async fn given_job_won_elsewhere_when_accepting_then_lifecycle_rejection_clears_slot() {
    let ctx = TestContext::new();
    let holder = ElectricianId::new("elec-1");
    let job = ctx.broadcast_job("cust-1", dec!(180.00)).await;
    ctx.dispatch
        .go_available(holder.clone(), "Sam Voltsen".to_string())
        .await
        .unwrap()
        .unwrap();

    // A competing worker lands the accept first.
    ctx.lifecycle
        .accept_job(job.id, ElectricianId::new("elec-2"), "Kai Ampere".to_string())
        .await
        .unwrap();

    let result = ctx.dispatch.accept_offer(&holder).await;
    assert!(matches!(
        result,
        Err(DispatchError::Lifecycle(
            TransitionError::InvalidTransition { .. }
        ))
    ));

    let next = ctx.dispatch.current_offer(&holder).await.unwrap();
    assert!(next.is_none());
}

#[tokio::test]
async fn given_declined_offer_when_other_worker_polls_then_job_reoffered() {
    let ctx = TestContext::new();
    let first = ElectricianId::new("elec-1");
    let job = ctx.broadcast_job("cust-1", dec!(180.00)).await;
    ctx.dispatch
        .go_available(first.clone(), "Sam Voltsen".to_string())
        .await
        .unwrap()
        .unwrap();

    ctx.dispatch.decline_offer(&first).await.unwrap();
    assert!(matches!(
        ctx.dispatch.decline_offer(&first).await,
        Err(DispatchError::NoActiveOffer)
    ));

    let rebound = ctx
        .dispatch
        .go_available(ElectricianId::new("elec-2"), "Kai Ampere".to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rebound.job_id, job.id);

    // Declines never touch the job itself.
    let fresh = ctx.lifecycle.get_job(job.id).await.unwrap();
    assert_eq!(fresh.status, JobStatus::Broadcast);
    assert_eq!(fresh.timeline.len(), 2);
}

#[tokio::test]
async fn given_worker_offline_when_holding_offer_then_job_released() {
    let ctx = TestContext::new();
    let holder = ElectricianId::new("elec-1");
    let job = ctx.broadcast_job("cust-1", dec!(180.00)).await;
    ctx.dispatch
        .go_available(holder.clone(), "Sam Voltsen".to_string())
        .await
        .unwrap()
        .unwrap();

    ctx.dispatch.go_offline(&holder).await;

    assert!(matches!(
        ctx.dispatch.current_offer(&holder).await,
        Err(DispatchError::NotAvailable)
    ));

    let rebound = ctx
        .dispatch
        .go_available(ElectricianId::new("elec-2"), "Kai Ampere".to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rebound.job_id, job.id);
}

#[tokio::test]
async fn given_live_offer_when_reannouncing_then_same_offer_returned() {
    let ctx = TestContext::new();
    let worker = ElectricianId::new("elec-1");
    ctx.broadcast_job("cust-1", dec!(180.00)).await;

    let first = ctx
        .dispatch
        .go_available(worker.clone(), "Sam Voltsen".to_string())
        .await
        .unwrap()
        .unwrap();

    ctx.clock.advance(Duration::seconds(10));

    let second = ctx
        .dispatch
        .go_available(worker.clone(), "Sam Voltsen".to_string())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(second.job_id, first.job_id);
    assert_eq!(second.expires_at, first.expires_at);
    assert_eq!(second.seconds_remaining, TEST_OFFER_TTL_SECS - 10);
}

#[tokio::test]
async fn given_two_broadcast_jobs_when_offering_then_oldest_first() {
    let ctx = TestContext::new();
    let worker = ElectricianId::new("elec-1");
    let older = ctx.broadcast_job("cust-1", dec!(100.00)).await;
    ctx.clock.advance(Duration::seconds(5));
    let newer = ctx.broadcast_job("cust-2", dec!(200.00)).await;

    let offer = ctx
        .dispatch
        .go_available(worker.clone(), "Sam Voltsen".to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(offer.job_id, older.id);

    ctx.dispatch.accept_offer(&worker).await.unwrap();

    let next = ctx.dispatch.current_offer(&worker).await.unwrap().unwrap();
    assert_eq!(next.job_id, newer.id);
}

#[tokio::test]
async fn given_no_offer_when_accepting_then_distinct_errors() {
    let ctx = TestContext::new();
    let worker = ElectricianId::new("elec-1");

    assert!(matches!(
        ctx.dispatch.accept_offer(&worker).await,
        Err(DispatchError::NotAvailable)
    ));

    ctx.dispatch
        .go_available(worker.clone(), "Sam Voltsen".to_string())
        .await
        .unwrap();

    assert!(matches!(
        ctx.dispatch.accept_offer(&worker).await,
        Err(DispatchError::NoActiveOffer)
    ));
}

#[tokio::test]
async fn given_job_cancelled_while_offered_when_polling_then_slot_cleared() {
    let ctx = TestContext::new();
    let worker = ElectricianId::new("elec-1");
    let job = ctx.broadcast_job("cust-1", dec!(180.00)).await;
    ctx.dispatch
        .go_available(worker.clone(), "Sam Voltsen".to_string())
        .await
        .unwrap()
        .unwrap();

    ctx.lifecycle
        .cancel(job.id, Actor::customer("cust-1"), None)
        .await
        .unwrap();

    let next = ctx.dispatch.current_offer(&worker).await.unwrap();
    assert!(next.is_none());
}
