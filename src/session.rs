use crate::navigation::{NavigationInput, NavigationState, RateLimiter};
use crate::ordering::OrderedStack;
use crate::surface::RenderingSurface;
use crate::transport::{InstanceFetcher, InstanceLoadError, InstancePath, load_instance};

/// One viewing session: the ordered stack, the navigation state and the
/// collaborators needed to show the current instance.
///
/// A session is built once per series selection and discarded when the user
/// picks another series; nothing in it survives a new resolution pass.
pub struct ViewSession<F, S>
where
    F: InstanceFetcher,
    S: RenderingSurface,
{
    study: String,
    series: String,
    stack: OrderedStack,
    navigation: NavigationState,
    limiter: RateLimiter,
    transport: F,
    surface: S,
}

impl<F, S> ViewSession<F, S>
where
    F: InstanceFetcher,
    S: RenderingSurface,
{
    /// Create a session over a resolved, non-empty stack and enable the
    /// rendering surface.
    pub fn new(
        study: impl Into<String>,
        series: impl Into<String>,
        stack: OrderedStack,
        transport: F,
        mut surface: S,
    ) -> Self {
        surface.enable();
        let navigation = NavigationState::new(stack.len());
        Self {
            study: study.into(),
            series: series.into(),
            stack,
            navigation,
            limiter: RateLimiter::default(),
            transport,
            surface,
        }
    }

    pub fn current_index(&self) -> usize {
        self.navigation.index()
    }

    pub fn current_id(&self) -> &str {
        self.stack.id_at(self.navigation.index())
    }

    pub fn stack(&self) -> &OrderedStack {
        &self.stack
    }

    /// Handle one navigation event. Returns `Ok(false)` when the event was
    /// dropped by the rate limiter.
    ///
    /// A load failure is non-fatal: the transition itself has already been
    /// applied, so the caller can report the error and keep navigating past
    /// the unrendered position.
    pub async fn handle_input(
        &mut self,
        input: NavigationInput,
    ) -> Result<bool, InstanceLoadError> {
        if !self.limiter.admit() {
            return Ok(false);
        }

        match input {
            NavigationInput::Step(direction) => {
                self.navigation.step(direction);
            }
            NavigationInput::Reverse => {
                self.stack.reverse();
                self.navigation.remap_reversed();
                self.surface.reset_view();
            }
        }

        self.show_current().await?;
        Ok(true)
    }

    /// Load and display the instance at the current position. Also used for
    /// the initial display right after resolution.
    pub async fn show_current(&mut self) -> Result<(), InstanceLoadError> {
        let id = self.current_id().to_string();
        let path = InstancePath {
            study: self.study.clone(),
            series: self.series.clone(),
            instance: id.clone(),
        };

        let image = load_instance(&self.transport, &self.surface, &path).await?;

        // A newer navigation event may have moved the stack while this load
        // was in flight; only the most recently requested image may win the
        // display.
        if self.current_id() == id {
            self.surface.display(image);
            self.surface
                .set_position_indicator(self.navigation.index() + 1, self.stack.len());
        }
        Ok(())
    }
}
