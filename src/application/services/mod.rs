mod dispatch_service;
mod lifecycle_service;
pub mod settlement;

pub use dispatch_service::{ActiveOffer, DispatchError, DispatchService, OfferView};
pub use lifecycle_service::{LifecycleService, TransitionError};
