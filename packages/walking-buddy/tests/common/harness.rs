//! Test harness wiring a workflow to mock dependencies.

use std::sync::Arc;

use test_context::AsyncTestContext;
use walking_buddy::kernel::{MockLocationProvider, MockMapSurface, MockMatchService};
use walking_buddy::{BuddyWorkflow, Coordinate};

/// Self location used throughout the scenarios.
pub fn waterloo() -> Coordinate {
    Coordinate::new(43.4731, -80.5267).unwrap()
}

/// A workflow plus handles onto every mock it was built from.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     ctx.located().await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub location: Arc<MockLocationProvider>,
    pub matcher: Arc<MockMatchService>,
    pub map: MockMapSurface,
    pub workflow: BuddyWorkflow<MockMapSurface>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self::new()
    }

    async fn teardown(self) {}
}

impl TestHarness {
    pub fn new() -> Self {
        let location = Arc::new(MockLocationProvider::new());
        let matcher = Arc::new(MockMatchService::new());
        let map = MockMapSurface::new();
        let workflow = BuddyWorkflow::new(location.clone(), map.clone(), matcher.clone());

        Self {
            location,
            matcher,
            map,
            workflow,
        }
    }

    /// Acquire the Waterloo fix and set the destination.
    pub async fn located(&self) {
        self.location.push(Ok(waterloo()));
        self.workflow.acquire_location().await;
        self.workflow.set_destination("Waterloo Station");
    }

    pub fn buddy_count(&self) -> usize {
        self.workflow.with_markers(|m| m.buddy_count())
    }

    /// Labels of the buddy markers currently on the map, in placement order
    pub fn buddy_labels(&self) -> Vec<String> {
        self.map
            .live_labels()
            .into_iter()
            .filter(|label| label != walking_buddy::domains::buddies::SELF_MARKER_LABEL)
            .collect()
    }
}
