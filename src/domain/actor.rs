use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category of principal requesting a transition. Authentication happens
/// upstream; the lifecycle controller only checks authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Customer,
    Electrician,
    Admin,
    System,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Customer => "customer",
            ActorRole::Electrician => "electrician",
            ActorRole::Admin => "admin",
            ActorRole::System => "system",
        }
    }
}

impl FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(ActorRole::Customer),
            "electrician" => Ok(ActorRole::Electrician),
            "admin" => Ok(ActorRole::Admin),
            "system" => Ok(ActorRole::System),
            _ => Err(format!("Invalid actor role: {}", s)),
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated principal, as handed over by the identity layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub role: ActorRole,
    pub id: String,
}

impl Actor {
    pub fn new(role: ActorRole, id: impl Into<String>) -> Self {
        Self {
            role,
            id: id.into(),
        }
    }

    pub fn customer(id: impl Into<String>) -> Self {
        Self::new(ActorRole::Customer, id)
    }

    pub fn electrician(id: impl Into<String>) -> Self {
        Self::new(ActorRole::Electrician, id)
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self::new(ActorRole::Admin, id)
    }

    pub fn system() -> Self {
        Self::new(ActorRole::System, "system")
    }
}
