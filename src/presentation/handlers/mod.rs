mod dispatch;
mod error;
mod health;
mod jobs;
mod wallet;

pub use dispatch::{
    accept_offer_handler, availability_handler, current_offer_handler, decline_offer_handler,
    go_offline_handler,
};
pub use error::ErrorResponse;
pub use health::health_handler;
pub use jobs::{
    add_on_handler, cancel_job_handler, create_job_handler, get_job_handler, job_timeline_handler,
    list_jobs_handler, transition_job_handler,
};
pub use wallet::wallet_handler;
