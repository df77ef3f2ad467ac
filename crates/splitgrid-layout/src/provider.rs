#![forbid(unsafe_code)]

//! Pane provider: the layout facade a consumer holds.
//!
//! A [`PaneProvider`] owns one layout store, the container's pixel spans and
//! the layout direction. Splitters are activated against it and their input
//! events are dispatched through it, so every splitter in a subtree shares
//! one view of the track values.
//!
//! # Modes
//!
//! The mode is fixed at construction. Supplying any controlled values makes
//! the provider controlled; supplying defaults for an axis that also has
//! controlled values is rejected.
//!
//! # Failure Modes
//!
//! A splitter that fails to activate is reported to the caller and logged;
//! the provider and every other splitter keep working.

use serde::{Deserialize, Serialize};
use splitgrid_core::SplitterInput;
use tracing::{debug, warn};

use crate::drag::{Direction, DragContext, DragTransition, DragTuning, SplitterDrag};
use crate::error::LayoutError;
use crate::query::{LayoutQuery, PaneSpans};
use crate::splitter::{Splitter, SplitterConfig};
use crate::store::{ChangeHandler, ControlledStore, LayoutMode, LayoutStore, UncontrolledStore};
use crate::tracks::{Axis, TrackValues, validate_values};
use crate::units::Unit;

/// Declarative provider description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneProviderConfig {
    pub total_panes_width: f64,
    pub total_panes_height: f64,
    pub default_rows: Option<TrackValues>,
    pub default_columns: Option<TrackValues>,
    pub rows: Option<TrackValues>,
    pub columns: Option<TrackValues>,
    pub direction: Direction,
    pub tuning: Option<DragTuning>,
}

impl PaneProviderConfig {
    /// Controlled when any controlled values are supplied.
    #[must_use]
    pub fn mode(&self) -> LayoutMode {
        if self.rows.is_some() || self.columns.is_some() {
            LayoutMode::Controlled
        } else {
            LayoutMode::Uncontrolled
        }
    }

    fn check_modes(&self) -> Result<(), LayoutError> {
        if self.mode() == LayoutMode::Uncontrolled {
            return Ok(());
        }
        if self.default_rows.is_some() {
            return Err(LayoutError::ConflictingModes { axis: Axis::Rows });
        }
        if self.default_columns.is_some() {
            return Err(LayoutError::ConflictingModes {
                axis: Axis::Columns,
            });
        }
        Ok(())
    }
}

/// Layout facade shared by every splitter in a pane subtree.
pub struct PaneProvider {
    store: Box<dyn LayoutStore>,
    spans: PaneSpans,
    direction: Direction,
    tuning: DragTuning,
}

impl PaneProvider {
    /// Provider that owns its values, starting from `default_rows` and
    /// `default_columns`.
    pub fn uncontrolled(
        total_panes_width: f64,
        total_panes_height: f64,
        default_rows: TrackValues,
        default_columns: TrackValues,
    ) -> Result<Self, LayoutError> {
        let store = UncontrolledStore::new(default_rows, default_columns)?;
        Self::with_store(Box::new(store), total_panes_width, total_panes_height)
    }

    /// Provider that mirrors consumer-owned values and reports every change
    /// through `on_change` as `(rows, columns)`.
    pub fn controlled(
        total_panes_width: f64,
        total_panes_height: f64,
        rows: TrackValues,
        columns: TrackValues,
        on_change: Option<ChangeHandler>,
    ) -> Result<Self, LayoutError> {
        let store = ControlledStore::new(rows, columns, on_change)?;
        Self::with_store(Box::new(store), total_panes_width, total_panes_height)
    }

    /// Build from a declarative config. `on_change` is only used by
    /// controlled configs.
    pub fn from_config(
        config: &PaneProviderConfig,
        on_change: Option<ChangeHandler>,
    ) -> Result<Self, LayoutError> {
        config.check_modes()?;
        let provider = match config.mode() {
            LayoutMode::Controlled => Self::controlled(
                config.total_panes_width,
                config.total_panes_height,
                config.rows.clone().unwrap_or_default(),
                config.columns.clone().unwrap_or_default(),
                on_change,
            )?,
            LayoutMode::Uncontrolled => Self::uncontrolled(
                config.total_panes_width,
                config.total_panes_height,
                config.default_rows.clone().unwrap_or_default(),
                config.default_columns.clone().unwrap_or_default(),
            )?,
        };
        Ok(provider
            .with_direction(config.direction)
            .with_tuning(config.tuning.unwrap_or_default()))
    }

    /// Provider over a caller-supplied store.
    pub fn with_store(
        store: Box<dyn LayoutStore>,
        total_panes_width: f64,
        total_panes_height: f64,
    ) -> Result<Self, LayoutError> {
        Ok(Self {
            store,
            spans: PaneSpans::new(total_panes_width, total_panes_height)?,
            direction: Direction::default(),
            tuning: DragTuning::default(),
        })
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_tuning(mut self, tuning: DragTuning) -> Self {
        self.tuning = tuning;
        self
    }

    #[must_use]
    pub fn mode(&self) -> LayoutMode {
        self.store.mode()
    }

    #[must_use]
    pub const fn spans(&self) -> PaneSpans {
        self.spans
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub const fn tuning(&self) -> DragTuning {
        self.tuning
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn LayoutStore {
        self.store.as_ref()
    }

    /// Read-only view over the current layout.
    #[must_use]
    pub fn query(&self) -> LayoutQuery<'_> {
        LayoutQuery::new(self.store.as_ref(), self.spans)
    }

    pub fn layout_value(&self, axis: Axis, key: &str, unit: Unit) -> Result<f64, LayoutError> {
        self.query().layout_value(axis, key, unit)
    }

    pub fn grid_template_rows(&self, unit: Unit) -> Result<String, LayoutError> {
        self.query().grid_template_rows(unit)
    }

    pub fn grid_template_columns(&self, unit: Unit) -> Result<String, LayoutError> {
        self.query().grid_template_columns(unit)
    }

    pub fn set_total_panes_width(&mut self, width: f64) -> Result<(), LayoutError> {
        self.spans = PaneSpans::new(width, self.spans.height)?;
        Ok(())
    }

    pub fn set_total_panes_height(&mut self, height: f64) -> Result<(), LayoutError> {
        self.spans = PaneSpans::new(self.spans.width, height)?;
        Ok(())
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Push new consumer-owned values into a controlled provider.
    pub fn sync_controlled(
        &mut self,
        rows: TrackValues,
        columns: TrackValues,
    ) -> Result<(), LayoutError> {
        if self.store.mode() != LayoutMode::Controlled {
            return Err(LayoutError::ModeMismatch {
                expected: LayoutMode::Controlled,
            });
        }
        // Both maps are checked before either is stored.
        validate_values(Axis::Rows, &rows)?;
        validate_values(Axis::Columns, &columns)?;
        self.store.replace(Axis::Rows, rows)?;
        self.store.replace(Axis::Columns, columns)
    }

    /// Resolve `config` against this layout.
    pub fn activate(&self, config: &SplitterConfig) -> Result<SplitterDrag, LayoutError> {
        match Splitter::resolve(config, self.store.as_ref()) {
            Ok(splitter) => {
                debug!(
                    axis = %splitter.axis(),
                    key = splitter.key(),
                    polarity = ?splitter.polarity(),
                    mode = ?splitter.mode(),
                    ambient = splitter.environment().is_ambient(),
                    "splitter activated"
                );
                Ok(SplitterDrag::new(splitter))
            }
            Err(err) => {
                warn!(key = %config.layout_key, error = %err, "splitter activation failed");
                Err(err)
            }
        }
    }

    /// Drag context for the current spans, direction and tuning.
    #[must_use]
    pub fn drag_context(&self) -> DragContext {
        DragContext::new(self.spans)
            .with_direction(self.direction)
            .with_tuning(self.tuning)
    }

    /// Feed one input event to `drag`.
    pub fn dispatch(
        &mut self,
        drag: &mut SplitterDrag,
        input: &SplitterInput,
    ) -> Result<DragTransition, LayoutError> {
        let context = self.drag_context();
        drag.handle(self.store.as_mut(), &context, input)
    }
}

impl std::fmt::Debug for PaneProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaneProvider")
            .field("mode", &self.store.mode())
            .field("rows", self.store.tracks(Axis::Rows).values())
            .field("columns", self.store.tracks(Axis::Columns).values())
            .field("spans", &self.spans)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use splitgrid_core::Point;
    use tracing_test::traced_test;

    use super::*;
    use crate::drag::DragEffect;
    use crate::tracks::track_values;

    fn uncontrolled() -> PaneProvider {
        PaneProvider::uncontrolled(
            500.0,
            500.0,
            track_values([("c", 1.0), ("d", 1.0)]),
            track_values([("a", 1.0), ("b", 1.0)]),
        )
        .expect("valid provider")
    }

    #[test]
    fn resizing_the_container_rescales_pixels_only() {
        let mut provider = uncontrolled();
        provider.set_total_panes_width(1000.0).expect("valid width");
        assert_eq!(provider.layout_value(Axis::Columns, "a", Unit::Px), Ok(500.0));
        assert_eq!(provider.layout_value(Axis::Columns, "a", Unit::Fr), Ok(1.0));
        assert_eq!(provider.layout_value(Axis::Rows, "c", Unit::Px), Ok(250.0));
        assert!(provider.set_total_panes_height(-3.0).is_err());
        assert_eq!(provider.spans().height, 500.0);
    }

    #[test]
    fn dispatch_routes_through_the_store() {
        let mut provider = uncontrolled();
        let mut drag = provider
            .activate(&SplitterConfig::new("a", 0.0, 2.0))
            .expect("valid splitter");
        provider
            .dispatch(&mut drag, &SplitterInput::pointer_down(1, Point::new(250.0, 0.0)))
            .expect("down");
        let moved = provider
            .dispatch(&mut drag, &SplitterInput::pointer_move(1, Point::new(125.0, 0.0)))
            .expect("move");
        assert!(matches!(moved.effect, DragEffect::Resized { .. }));
        assert_eq!(
            provider.grid_template_columns(Unit::Fr).as_deref(),
            Ok("0.5fr 1.5fr")
        );
    }

    #[test]
    #[traced_test]
    fn failed_activation_is_isolated() {
        let mut provider = uncontrolled();
        let err = provider
            .activate(&SplitterConfig::new("nope", 0.0, 1.0))
            .expect_err("unknown key");
        assert!(err.is_configuration());
        assert!(logs_contain("splitter activation failed"));

        let mut healthy = provider
            .activate(&SplitterConfig::new("a", 0.0, 2.0))
            .expect("valid splitter");
        provider
            .dispatch(&mut healthy, &SplitterInput::key(splitgrid_core::NavigationKey::End))
            .expect("key");
        assert_eq!(provider.layout_value(Axis::Columns, "a", Unit::Fr), Ok(2.0));
    }

    #[test]
    fn sync_requires_controlled_mode() {
        let mut provider = uncontrolled();
        assert_eq!(
            provider.sync_controlled(TrackValues::default(), TrackValues::default()),
            Err(LayoutError::ModeMismatch {
                expected: LayoutMode::Controlled
            })
        );
    }

    #[test]
    fn controlled_provider_reports_and_waits_for_sync() {
        let calls = Rc::new(Cell::new(0_usize));
        let counter = Rc::clone(&calls);
        let mut provider = PaneProvider::controlled(
            500.0,
            500.0,
            track_values([("c", 1.0), ("d", 1.0)]),
            track_values([("a", 1.0), ("b", 1.0)]),
            Some(Box::new(move |_: &TrackValues, _: &TrackValues| {
                counter.set(counter.get() + 1);
            })),
        )
        .expect("valid provider");
        assert_eq!(provider.mode(), LayoutMode::Controlled);

        let mut drag = provider
            .activate(&SplitterConfig::new("a", 0.0, 2.0))
            .expect("valid splitter");
        provider
            .dispatch(&mut drag, &SplitterInput::key(splitgrid_core::NavigationKey::Home))
            .expect("key");
        assert_eq!(calls.get(), 1);
        assert_eq!(provider.layout_value(Axis::Columns, "a", Unit::Fr), Ok(1.0));

        provider
            .sync_controlled(
                track_values([("c", 1.0), ("d", 1.0)]),
                track_values([("a", 0.0), ("b", 2.0)]),
            )
            .expect("valid values");
        assert_eq!(provider.grid_template_columns(Unit::Fr).as_deref(), Ok("0fr 2fr"));
    }

    #[test]
    fn failed_sync_leaves_both_axes_untouched() {
        let mut provider = PaneProvider::controlled(
            500.0,
            500.0,
            track_values([("c", 1.0)]),
            track_values([("a", 1.0)]),
            None,
        )
        .expect("valid provider");
        let err = provider
            .sync_controlled(track_values([("c", 9.0)]), track_values([("a", -1.0)]))
            .expect_err("negative column");
        assert_eq!(
            err,
            LayoutError::InvalidTrackValue {
                axis: Axis::Columns,
                key: "a".into(),
                value: -1.0
            }
        );
        assert_eq!(provider.grid_template_rows(Unit::Fr).as_deref(), Ok("1fr"));
        assert_eq!(provider.grid_template_columns(Unit::Fr).as_deref(), Ok("1fr"));
        assert_eq!(provider.store().tracks(Axis::Rows).generation(), 0);
    }

    #[test]
    fn controlled_proposal_at_the_neighbor_cap_syncs_back() {
        let proposals: Rc<std::cell::RefCell<Vec<(TrackValues, TrackValues)>>> = Rc::default();
        let sink = Rc::clone(&proposals);
        let mut provider = PaneProvider::controlled(
            500.0,
            500.0,
            TrackValues::default(),
            track_values([("a", 1.0), ("b", 1.0)]),
            Some(Box::new(move |rows: &TrackValues, columns: &TrackValues| {
                sink.borrow_mut().push((rows.clone(), columns.clone()));
            })),
        )
        .expect("valid provider");
        let mut drag = provider
            .activate(&SplitterConfig::new("a", 0.0, 3.0))
            .expect("valid splitter");
        provider
            .dispatch(&mut drag, &SplitterInput::key(splitgrid_core::NavigationKey::End))
            .expect("key");

        let (rows, columns) = proposals.borrow_mut().pop().expect("one proposal");
        assert_eq!(columns, track_values([("a", 2.0), ("b", 0.0)]));
        provider
            .sync_controlled(rows, columns)
            .expect("proposal is a valid layout");
        assert_eq!(provider.grid_template_columns(Unit::Fr).as_deref(), Ok("2fr 0fr"));
    }

    #[test]
    fn config_mode_detection_and_conflicts() {
        let uncontrolled = PaneProviderConfig {
            total_panes_width: 100.0,
            total_panes_height: 100.0,
            default_columns: Some(track_values([("a", 1.0)])),
            ..PaneProviderConfig::default()
        };
        assert_eq!(uncontrolled.mode(), LayoutMode::Uncontrolled);

        let only_rows = PaneProviderConfig {
            rows: Some(track_values([("c", 1.0)])),
            ..PaneProviderConfig::default()
        };
        let provider = PaneProvider::from_config(&only_rows, None).expect("valid config");
        assert_eq!(provider.mode(), LayoutMode::Controlled);
        assert!(provider.store().tracks(Axis::Columns).is_empty());

        let mixed = PaneProviderConfig {
            rows: Some(track_values([("c", 1.0)])),
            default_rows: Some(track_values([("c", 1.0)])),
            ..PaneProviderConfig::default()
        };
        assert_eq!(
            PaneProvider::from_config(&mixed, None).expect_err("mixed modes"),
            LayoutError::ConflictingModes { axis: Axis::Rows }
        );

        let cross = PaneProviderConfig {
            rows: Some(track_values([("c", 1.0)])),
            default_columns: Some(track_values([("a", 1.0)])),
            ..PaneProviderConfig::default()
        };
        assert_eq!(
            PaneProvider::from_config(&cross, None).expect_err("mixed modes"),
            LayoutError::ConflictingModes {
                axis: Axis::Columns
            }
        );
    }
}
