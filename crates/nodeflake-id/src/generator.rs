use crate::{
    clock::{Clock, SystemClock},
    entropy::{EntropySource, SeededEntropy},
    error::{Error, Result},
    identifier::{Identifier, MAX_NODE, MAX_RANDOM, MAX_TIME_EPOCH, RANDOM_BITS},
};
use jiff::Timestamp;
use std::sync::Mutex;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

/// Configures an [`IdentifierGenerator`] instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct GeneratorSettings {
    /// Node embedded in every identifier, in the range `[0, 65535]`.
    ///
    /// `None` falls back to [`default_node`]. Larger values are rejected
    /// rather than truncated.
    #[builder(default)]
    pub node_id: Option<u32>,
    /// Zero point for the 52-bit millisecond time field.
    #[builder(default = Timestamp::UNIX_EPOCH)]
    pub start_epoch: Timestamp,
    /// Fixed seed for the random field.
    ///
    /// Only for tests and reproductions: two generators with the same seed
    /// produce the same random sequence. `None` seeds from the OS.
    #[builder(default)]
    pub seed: Option<u64>,
}

/// Node used when none is configured: the low 16 bits of the process id.
pub fn default_node() -> u16 {
    (std::process::id() & u32::from(MAX_NODE)) as u16
}

struct GeneratorState<E> {
    entropy: E,
    last_time_epoch: Option<u64>,
}

/// Produces node/time/random identifiers.
///
/// Safe to share between threads: the entropy draw and the time bookkeeping
/// run under one lock.
pub struct IdentifierGenerator<C: Clock = SystemClock, E: EntropySource = SeededEntropy> {
    start_epoch: Timestamp,
    node: u16,
    clock: C,
    state: Mutex<GeneratorState<E>>,
}

impl IdentifierGenerator<SystemClock, SeededEntropy> {
    /// Creates a generator backed by the system clock and an OS-seeded engine.
    ///
    /// Fails with [`Error::EntropyUnavailable`] when the OS cannot provide a
    /// seed. Ignoring that error and seeding by other means gives up the
    /// uniqueness guarantee of the random field.
    pub fn new(settings: GeneratorSettings) -> Result<Self> {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> IdentifierGenerator<C, SeededEntropy> {
    fn with_clock(settings: GeneratorSettings, clock: C) -> Result<Self> {
        let entropy = match settings.seed {
            Some(seed) => {
                warn!(seed, "identifier generator uses a fixed seed; identifiers are predictable");
                SeededEntropy::from_seed(seed)
            }
            None => SeededEntropy::from_os()?,
        };
        Self::with_parts(settings, clock, entropy)
    }
}

impl<C: Clock, E: EntropySource> IdentifierGenerator<C, E> {
    /// Creates a generator from an explicit clock and entropy source.
    ///
    /// `settings.seed` is ignored here, the given `entropy` is used as is.
    pub fn with_parts(settings: GeneratorSettings, clock: C, entropy: E) -> Result<Self> {
        let node = match settings.node_id {
            Some(node_id) => u16::try_from(node_id).map_err(|_| Error::InvalidNodeId {
                node_id,
                max_node_id: MAX_NODE,
            })?,
            None => default_node(),
        };

        let now = clock.now();
        if settings.start_epoch > now {
            return Err(Error::EpochAhead {
                epoch: settings.start_epoch,
                now,
            });
        }

        debug!(node, start_epoch = %settings.start_epoch, "identifier generator ready");

        Ok(Self {
            start_epoch: settings.start_epoch,
            node,
            clock,
            state: Mutex::new(GeneratorState {
                entropy,
                last_time_epoch: None,
            }),
        })
    }

    pub fn node(&self) -> u16 {
        self.node
    }

    pub fn start_epoch(&self) -> Timestamp {
        self.start_epoch
    }

    /// Generates the next identifier.
    ///
    /// The time field never decreases across calls: if the clock steps back,
    /// the last issued value is reused and only the random field changes.
    pub fn next_id(&self) -> Result<Identifier> {
        let mut state = self.state.lock().map_err(|_| Error::StatePoisoned)?;

        let mut time_epoch = self.elapsed_millis();
        if let Some(last) = state.last_time_epoch {
            if time_epoch < last {
                warn!(
                    last,
                    now = time_epoch,
                    "clock moved backwards; reusing last time epoch"
                );
                time_epoch = last;
            }
        }

        let random = state.entropy.next_bits(RANDOM_BITS);
        debug_assert!(
            random <= MAX_RANDOM,
            "entropy source returned {random:#x} for a {RANDOM_BITS}-bit draw"
        );

        state.last_time_epoch = Some(time_epoch);

        Ok(Identifier::masked(self.node, time_epoch, random))
    }

    /// Generates the next identifier along with its formatted string.
    pub fn generate(&self, pretty: bool) -> Result<(Identifier, String)> {
        let id = self.next_id()?;
        let formatted = id.format(pretty);
        Ok((id, formatted))
    }

    /// Milliseconds since the start epoch, truncated to the time field width.
    fn elapsed_millis(&self) -> u64 {
        let elapsed = self.clock.now().as_millisecond() - self.start_epoch.as_millisecond();
        // the clock may have been set back behind the start epoch after construction
        elapsed.max(0) as u64 & MAX_TIME_EPOCH
    }
}
