use std::sync::Arc;

use crate::application::ports::LedgerRepository;
use crate::application::services::{DispatchService, LifecycleService};

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<LifecycleService>,
    pub dispatch: Arc<DispatchService>,
    pub ledger: Arc<dyn LedgerRepository>,
}
