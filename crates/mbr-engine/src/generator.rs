//! The per-event driver.
//!
//! [`EventGenerator`] is built once from a [`GenerationConfig`] and is
//! immutable afterwards: every generation call borrows it shared and
//! takes the random stream and the statistics explicitly, so one
//! generator serves any number of threads.

use mbr_core::{Event, GenerateError, ParticleArena, ProcessKind, RandomStream, RetryTally};
use mbr_fragment::{FireballFragmenter, FragmenterParams};
use mbr_xsec::{ConfigError, CrossSectionModel, CrossSectionTable, GenerationConfig};

use crate::assembler::EventAssembler;
use crate::double_diffractive::DoubleDiffractiveGenerator;
use crate::elastic::ElasticGenerator;
use crate::hard_core::HardCoreGenerator;
use crate::metrics::GenerationStats;
use crate::selector::ProcessSelector;
use crate::single_diffractive::SingleDiffractiveGenerator;

/// Initial arena capacity; a typical Tevatron event has fewer records.
const ARENA_CAPACITY: usize = 128;

/// Minimum-bias event generator.
#[derive(Clone, Debug)]
pub struct EventGenerator {
    config: GenerationConfig,
    table: CrossSectionTable,
    selector: ProcessSelector,
    fragmenter: FireballFragmenter,
    hard_core: HardCoreGenerator,
    double_diffractive: DoubleDiffractiveGenerator,
    single_diffractive: SingleDiffractiveGenerator,
    elastic: ElasticGenerator,
    assembler: EventAssembler,
}

impl EventGenerator {
    /// Validate `config`, compute its cross-section table, and build the
    /// process generators.
    pub fn new(config: GenerationConfig) -> Result<Self, ConfigError> {
        let table = CrossSectionModel::initialize(&config)?;
        let w = &table.window;
        let fragmenter = FireballFragmenter::new(FragmenterParams {
            multiplicity_scale: config.multiplicity_scale,
            leading_charged_fraction: w.leading_charged_fraction,
        });
        Ok(Self {
            selector: ProcessSelector::new(&table),
            fragmenter,
            hard_core: HardCoreGenerator::new(w.sqrt_s),
            double_diffractive: DoubleDiffractiveGenerator::new(&config, &table),
            single_diffractive: SingleDiffractiveGenerator::new(&config, &table),
            elastic: ElasticGenerator::new(w.beam_momentum, w.elastic_slope),
            assembler: EventAssembler::new(config.lab_boost),
            table,
            config,
        })
    }

    /// The configuration this generator was built from.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// The cross-section table computed at construction.
    pub fn table(&self) -> &CrossSectionTable {
        &self.table
    }

    /// The process selector.
    pub fn selector(&self) -> &ProcessSelector {
        &self.selector
    }

    /// Generate one event with a single attempt.
    ///
    /// The attempt is recorded in `stats` whether or not it succeeds.
    /// An abandoned event is logged at debug level and returned as the
    /// error; nothing of it is emitted.
    pub fn generate<R: RandomStream + ?Sized>(
        &self,
        rng: &mut R,
        stats: &mut GenerationStats,
    ) -> Result<Event, GenerateError> {
        let process = self.selector.select(rng);
        self.generate_process(process, rng, stats)
    }

    /// Generate one event of a given `process`, bypassing selection.
    pub fn generate_process<R: RandomStream + ?Sized>(
        &self,
        process: ProcessKind,
        rng: &mut R,
        stats: &mut GenerationStats,
    ) -> Result<Event, GenerateError> {
        let mut arena = ParticleArena::with_capacity(ARENA_CAPACITY);
        let mut tally = RetryTally::default();
        let result = match process {
            ProcessKind::HardCore => self.hard_core.generate(&self.fragmenter, &mut arena, rng, &mut tally),
            ProcessKind::DoubleDiffractive => {
                self.double_diffractive
                    .generate(&self.fragmenter, &mut arena, rng, &mut tally)
            }
            ProcessKind::SingleDiffractive => {
                self.single_diffractive
                    .generate(&self.fragmenter, &mut arena, rng, &mut tally)
            }
            ProcessKind::Elastic => {
                self.elastic.generate(&mut arena, rng);
                Ok(())
            }
        };
        stats.record(process, &tally, result.is_ok());

        match result {
            Ok(()) => Ok(self.assembler.assemble(&mut arena, process)),
            Err(e) => {
                tracing::debug!("Abandoned {} event: {}", process, e);
                let rate = stats.abandonment_rate();
                if rate > self.config.abandonment_warn_rate {
                    tracing::warn!(
                        "Abandonment rate {:.4} above {:.4} after {} attempts",
                        rate,
                        self.config.abandonment_warn_rate,
                        stats.attempted
                    );
                }
                Err(e)
            }
        }
    }

    /// Generate one event, regenerating abandoned ones up to
    /// `max_event_attempts` times. Returns the last error when every
    /// attempt was abandoned.
    pub fn next_event<R: RandomStream + ?Sized>(
        &self,
        rng: &mut R,
        stats: &mut GenerationStats,
    ) -> Result<Event, GenerateError> {
        let mut attempt = 1;
        loop {
            match self.generate(rng, stats) {
                Ok(event) => return Ok(event),
                Err(e) if attempt >= self.config.max_event_attempts => return Err(e),
                Err(_) => attempt += 1,
            }
        }
    }
}
