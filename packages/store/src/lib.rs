pub mod backend;
pub mod config;
pub mod error;
pub mod injury;
pub mod listeners;
pub mod memory;
pub mod models;
pub mod session;

pub use backend::{AuthChangeEvent, AuthEvent, AuthProvider, DataService};
pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use injury::{InjuryReport, BODY_PARTS, INJURY_TYPES};
pub use listeners::{Listeners, Subscription};
pub use memory::{MemoryAuth, MemoryData};
pub use models::{
    Appointment, Injury, InjuryStatus, NewInjury, NewProfile, PractitionerName, Profile,
    ProfileChanges, Registration, Role, Session, Severity, User,
};
pub use session::{validate_credentials, SessionState, SessionStore, MIN_PASSWORD_LEN};
