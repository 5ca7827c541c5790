//! Client core for the GreenLink club manager: the session/navigation
//! controller, its REST collaborators and the session storage port.

pub mod api;
pub mod controller;
pub mod error;
pub mod forms;
pub mod state;
pub mod store;

pub use api::{ClubApi, HttpClubApi, DEFAULT_BASE_URL};
pub use controller::{ControllerEvent, Mutation, SessionController};
pub use error::{ControllerError, ErrorCategory};
pub use forms::{ClubForm, LoginForm, PlayerForm, SignupForm, TeamForm};
pub use state::{Action, NavState, Screen, Tab, TransitionError};
pub use store::{MemorySessionStore, SessionStore, CLUB_KEY, SESSION_KEY};
