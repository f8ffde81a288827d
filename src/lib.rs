//! Transys: finite state transitions on top of a reducer store
//!
//! Transys compiles a declarative transition table into a single pure
//! update function, and augments a store running that function with
//! transition requests and transition subscriptions.
//!
//! # Core Concepts
//!
//! - **State**: opaque, comparable tokens via the `State` trait
//! - **Transition table**: ordered rules, each a `from`/`to` guard plus an
//!   optional action; every matching rule runs, in order
//! - **Record**: the reserved `systemState` plus an arbitrary payload
//! - **Store**: holds the record and replaces it once per dispatched event
//!
//! # Example
//!
//! ```rust
//! use transys::{compile, enhance, state_enum, InitialRecord, Store, TransitionRule};
//! use transys::core::{Event, SystemRecord};
//!
//! state_enum! {
//!     enum Switch {
//!         On,
//!         Off,
//!     }
//! }
//!
//! type Record = SystemRecord<Switch, u32>;
//!
//! let reducer = compile(
//!     Switch::all(),
//!     [
//!         TransitionRule::any()
//!             .to(Switch::On)
//!             .action(|r: Record, _: &Event<Switch>| r.map_payload(|count| count + 1)),
//!         TransitionRule::any().from(Switch::On).to(Switch::Off),
//!     ],
//!     InitialRecord::new(Switch::Off, 0),
//! )
//! .unwrap();
//!
//! let store = enhance(Store::new(reducer));
//! store.transition_to(Switch::On).unwrap();
//! store.transition_from_to(Switch::On, Switch::Off).unwrap();
//!
//! let record = store.get_state();
//! assert_eq!(record.system_state, Switch::Off);
//! assert_eq!(record.payload, 1);
//! ```

pub mod builder;
pub mod compiler;
pub mod config;
pub mod core;
pub mod error;
pub mod store;

// Re-export commonly used types
pub use compiler::{compile, Reduction, TransitionReducer, TransitionRule};
pub use crate::core::{Event, InitialRecord, State, SystemRecord, TransitionGuard};
pub use error::{ConfigError, TransitionError};
pub use store::{enhance, Store, TransitionStore};
