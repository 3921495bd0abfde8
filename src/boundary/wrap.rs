//! Guarded components
//!
//! [`Guarded`] pairs a component with a dedicated [`FaultBoundary`] so
//! callers compose fault isolation instead of hand-wiring a boundary at
//! every call site.

use ratatui::layout::Rect;
use ratatui::Frame;

use super::{FaultBoundary, FaultReport, FaultState};

/// A renderable screen region.
pub trait Component {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect);
}

/// A component wrapped in its own fault boundary.
pub struct Guarded<C> {
    boundary: FaultBoundary,
    inner: C,
}

impl<C: Component> Guarded<C> {
    /// Wrap `inner`, naming the boundary `Guarded<TypeName>` so fault logs
    /// and traces identify the wrapped component.
    pub fn new(inner: C) -> Self {
        Self {
            boundary: FaultBoundary::new(format!("Guarded<{}>", short_type_name::<C>())),
            inner,
        }
    }

    pub fn with_fallback(
        mut self,
        fallback: impl FnMut(&mut Frame<'_>, Rect, &FaultState) + 'static,
    ) -> Self {
        self.boundary = self.boundary.with_fallback(fallback);
        self
    }

    pub fn with_fault_handler(mut self, handler: impl FnMut(&FaultReport) + 'static) -> Self {
        self.boundary = self.boundary.with_fault_handler(handler);
        self
    }

    pub fn with_navigate_home(mut self, navigate: impl FnMut() + 'static) -> Self {
        self.boundary = self.boundary.with_navigate_home(navigate);
        self
    }

    pub fn boundary(&self) -> &FaultBoundary {
        &self.boundary
    }

    pub fn boundary_mut(&mut self) -> &mut FaultBoundary {
        &mut self.boundary
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }
}

impl<C: Component> Component for Guarded<C> {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let Self { boundary, inner } = self;
        boundary.render_child(frame, area, |frame, area| inner.render(frame, area));
    }
}

/// Last path segment of a type name, generic parameters stripped.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let outer = full.split('<').next().unwrap_or(full);
    outer.rsplit("::").next().unwrap_or(outer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::widgets::Paragraph;
    use ratatui::Terminal;

    struct ChatPanel {
        rendered: u32,
        explode: bool,
    }

    impl Component for ChatPanel {
        fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
            self.rendered += 1;
            if self.explode {
                panic!("chat panel exploded");
            }
            frame.render_widget(Paragraph::new("chat"), area);
        }
    }

    #[test]
    fn boundary_name_identifies_the_wrapped_component() {
        let guarded = Guarded::new(ChatPanel {
            rendered: 0,
            explode: false,
        });
        assert_eq!(guarded.boundary().child_name(), "Guarded<ChatPanel>");
    }

    #[test]
    fn failure_is_contained_and_retry_restores_rendering() {
        let mut guarded = Guarded::new(ChatPanel {
            rendered: 0,
            explode: true,
        });

        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                let area = frame.area();
                guarded.render(frame, area);
            })
            .unwrap();
        assert!(guarded.boundary().is_failed());
        assert_eq!(guarded.inner().rendered, 1);

        // While failed, the child is not called again.
        terminal
            .draw(|frame| {
                let area = frame.area();
                guarded.render(frame, area);
            })
            .unwrap();
        assert_eq!(guarded.inner().rendered, 1);

        guarded.boundary_mut().retry();
        guarded.inner_mut().explode = false;
        terminal
            .draw(|frame| {
                let area = frame.area();
                guarded.render(frame, area);
            })
            .unwrap();
        assert!(!guarded.boundary().is_failed());
        assert_eq!(guarded.inner().rendered, 2);
    }

    #[test]
    fn short_type_names_drop_paths_and_generics() {
        assert_eq!(short_type_name::<ChatPanel>(), "ChatPanel");
        assert_eq!(short_type_name::<Vec<ChatPanel>>(), "Vec");
    }
}
