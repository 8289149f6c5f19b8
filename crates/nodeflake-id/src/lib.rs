//! Structured 128-bit identifiers.
//!
//! An [`Identifier`] packs three fields, highest first:
//!
//! ```text
//! | node (16) | time_epoch (52) | random (60) |
//! ```
//!
//! `node` names the generating instance, `time_epoch` counts milliseconds
//! since the generator's start epoch and `random` is redrawn from a seeded
//! engine on every call.
//!
//! ```no_run
//! use nodeflake_id::{GeneratorSettings, IdentifierGenerator};
//!
//! let settings = GeneratorSettings::builder().node_id(Some(0x1A2B)).build();
//! let generator = IdentifierGenerator::new(settings)?;
//! let (id, pretty) = generator.generate(true)?;
//! assert_eq!(id.node(), 0x1A2B);
//! println!("{pretty}"); // e.g. 1a2b-0019a3c5e2f10-6cc7763222724a2
//! # Ok::<(), nodeflake_id::Error>(())
//! ```

mod clock;
pub mod entropy;
pub mod error;
mod generator;
pub mod identifier;

pub use clock::{Clock, SystemClock};
pub use entropy::{EntropySource, SeededEntropy};
pub use error::{Error, Result};
pub use generator::{default_node, GeneratorSettings, IdentifierGenerator};
pub use identifier::Identifier;
