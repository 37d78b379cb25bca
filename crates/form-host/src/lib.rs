#![allow(missing_docs)]

pub mod controller;
pub mod events;
pub mod persist;
pub mod state;
pub mod transport;

pub use controller::{ControllerOptions, FormButton, FormController, HostError, SubmitOutcome};
pub use events::{EventVerdict, FormEvent, FormObserver};
pub use persist::{MemoryStore, PersistenceStore};
pub use state::{FormState, Phase};
pub use transport::{SchemaTransport, SubmissionTransport, TransportError};
