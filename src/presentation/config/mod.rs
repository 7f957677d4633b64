mod settings;

pub use settings::{
    DatabaseSettings, Environment, LoggingSettings, MarketplaceSettings, ServerSettings, Settings,
};
