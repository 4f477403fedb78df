// Load/unload lifecycle: parse into the store, report, then tear down unconditionally.
use crate::core::error::{Error, ErrorKind};
use crate::core::parse::{ParseSummary, parse_and_store};
use crate::core::store::{Store, StoreOptions};
use crate::report::ReportSink;

/// Name of the configuration value a host supplies at load time.
pub const PARAMETER_NAME: &str = "int_str";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecycleState {
    Uninitialized,
    Loaded,
    Unloaded,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LoadOutcome {
    pub summary: ParseSummary,
    /// Entry lines handed to the sink during the reporting pass.
    pub reported: usize,
}

#[derive(Debug)]
pub struct Lifecycle {
    state: LifecycleState,
    store: Store,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            store: Store::with_options(options),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Runs one load attempt.
    ///
    /// The reporting pass and teardown run whether or not parsing succeeds, so the
    /// store is always empty when this returns. Only valid once, from
    /// `Uninitialized`.
    pub fn load(
        &mut self,
        config: Option<&str>,
        sink: &mut dyn ReportSink,
    ) -> Result<LoadOutcome, Error> {
        match self.state {
            LifecycleState::Uninitialized => {}
            LifecycleState::Loaded => {
                return Err(Error::new(ErrorKind::Usage).with_message("already loaded"));
            }
            LifecycleState::Unloaded => {
                return Err(Error::new(ErrorKind::Usage).with_message("already unloaded"));
            }
        }
        self.state = LifecycleState::Loaded;

        let Some(config) = config else {
            sink.missing_input(PARAMETER_NAME);
            // Nothing was allocated; clearing is a no-op kept for symmetry with the parse path.
            self.store.clear();
            return Err(Error::new(ErrorKind::MissingInput)
                .with_message(format!("missing '{PARAMETER_NAME}' parameter")));
        };

        tracing::debug!(len = config.len(), "load starting");
        let parsed = parse_and_store(config, &mut self.store);
        if let Err(err) = &parsed {
            tracing::debug!(error = %err, stored = self.store.len(), "parse stopped early");
        }

        let reported = self.report(sink);

        sink.cleanup();
        self.store.clear();

        parsed.map(|summary| LoadOutcome { summary, reported })
    }

    /// Ends the lifecycle. The store is already empty after `load`, so this only
    /// records the transition.
    pub fn unload(&mut self) {
        if self.state != LifecycleState::Loaded {
            tracing::debug!(state = ?self.state, "unload without a successful load transition");
        }
        self.state = LifecycleState::Unloaded;
    }

    fn report(&self, sink: &mut dyn ReportSink) -> usize {
        let mut reported = 0;
        for value in &self.store {
            sink.entry(value);
            reported += 1;
        }
        reported
    }
}

#[cfg(test)]
mod tests {
    use super::{Lifecycle, LifecycleState};
    use crate::core::error::ErrorKind;
    use crate::core::store::StoreOptions;
    use crate::report::{MemorySink, ReportLine};

    #[test]
    fn load_reports_in_order_then_cleans_up() {
        let mut lifecycle = Lifecycle::new();
        let mut sink = MemorySink::new();

        let outcome = lifecycle.load(Some("1,2,3"), &mut sink).expect("load");
        assert_eq!(outcome.reported, 3);
        assert_eq!(outcome.summary.stored, 3);
        assert_eq!(
            sink.lines(),
            &[
                ReportLine::Entry { value: 1 },
                ReportLine::Entry { value: 2 },
                ReportLine::Entry { value: 3 },
                ReportLine::Cleanup,
            ]
        );
        assert!(lifecycle.store().is_empty());
        assert_eq!(lifecycle.state(), LifecycleState::Loaded);
    }

    #[test]
    fn malformed_token_still_reports_prefix_and_tears_down() {
        let mut lifecycle = Lifecycle::new();
        let mut sink = MemorySink::new();

        let err = lifecycle.load(Some("5,abc,6"), &mut sink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert_eq!(err.token(), Some("abc"));
        assert_eq!(sink.entries(), vec![5]);
        assert_eq!(sink.lines().last(), Some(&ReportLine::Cleanup));
        assert!(lifecycle.store().is_empty());
    }

    #[test]
    fn allocation_failure_reports_prefix_and_tears_down() {
        let mut lifecycle = Lifecycle::with_options(StoreOptions::new().with_max_entries(1));
        let mut sink = MemorySink::new();

        let err = lifecycle.load(Some("8,9"), &mut sink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Allocation);
        assert_eq!(sink.entries(), vec![8]);
        assert!(lifecycle.store().is_empty());
    }

    #[test]
    fn missing_config_fails_without_entries() {
        let mut lifecycle = Lifecycle::new();
        let mut sink = MemorySink::new();

        let err = lifecycle.load(None, &mut sink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingInput);
        assert_eq!(
            sink.lines(),
            &[ReportLine::MissingInput {
                parameter: "int_str".to_string()
            }]
        );
        assert!(lifecycle.store().is_empty());
    }

    #[test]
    fn empty_config_is_distinct_from_missing() {
        let mut lifecycle = Lifecycle::new();
        let mut sink = MemorySink::new();

        let outcome = lifecycle.load(Some(""), &mut sink).expect("load");
        assert_eq!(outcome.reported, 0);
        assert_eq!(sink.lines(), &[ReportLine::Cleanup]);
    }

    #[test]
    fn mixed_bases_are_reported_as_decimal_values() {
        let mut lifecycle = Lifecycle::new();
        let mut sink = MemorySink::new();

        lifecycle.load(Some("0x1F,017,9"), &mut sink).expect("load");
        assert_eq!(sink.entries(), vec![31, 15, 9]);
    }

    #[test]
    fn second_load_is_rejected() {
        let mut lifecycle = Lifecycle::new();
        let mut sink = MemorySink::new();
        lifecycle.load(Some("1"), &mut sink).expect("load");

        let err = lifecycle.load(Some("2"), &mut sink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(sink.entries(), vec![1]);
    }

    #[test]
    fn unload_is_terminal() {
        let mut lifecycle = Lifecycle::new();
        let mut sink = MemorySink::new();
        lifecycle.load(Some("1"), &mut sink).expect("load");

        lifecycle.unload();
        assert_eq!(lifecycle.state(), LifecycleState::Unloaded);
        lifecycle.unload();
        assert_eq!(lifecycle.state(), LifecycleState::Unloaded);

        let err = lifecycle.load(Some("1"), &mut sink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }
}
