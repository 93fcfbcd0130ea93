//! Pointer-driven rescheduling of timeline items.
//!
//! [`InteractionController`] owns at most one in-flight gesture. The host
//! forwards pointer events as method calls (`begin`, `update`, `commit` or
//! `release`, `cancel`) and applies the returned [`TimelineEvent`]s to its
//! store; the controller never mutates items itself.

use chrono::NaiveDate;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::TimelineConfig;
use crate::error::InteractionError;
use crate::model::{ItemId, ScheduledItem};
use crate::timeline::calendar::add_days;
use crate::timeline::geometry::TimelineGeometry;
use crate::timeline::mapper::CoordinateMapper;

/// What part of an item a gesture drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GestureKind {
    /// Shift the whole bar.
    Move,
    /// Drag the left handle.
    ResizeStart,
    /// Drag the right handle.
    ResizeEnd,
    /// Drag the progress handle along the bar.
    Progress,
}

/// State of one press-move-release interaction against a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    pub kind: GestureKind,
    pub item_id: ItemId,
    pub anchor_x: f32,
    pub original_start: NaiveDate,
    pub original_end: NaiveDate,
    pub tentative_start: NaiveDate,
    pub tentative_end: NaiveDate,
    pub original_progress: u8,
    pub tentative_progress: u8,
    /// Bar width when the gesture began; scales progress drags.
    pub bar_width: f32,
}

impl DragGesture {
    fn dates_changed(&self) -> bool {
        self.tentative_start != self.original_start || self.tentative_end != self.original_end
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Active(DragGesture),
}

/// Change requests handed to the external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEvent {
    DateChangeRequested {
        item_id: ItemId,
        start: NaiveDate,
        end: NaiveDate,
    },
    ProgressChangeRequested { item_id: ItemId, progress: u8 },
}

/// Drag/resize state machine: Idle, then Active for one gesture, then Idle.
///
/// A second `begin` while a gesture is active is rejected; callers must
/// `cancel` (or finish) the current gesture first.
#[derive(Debug, Clone)]
pub struct InteractionController {
    mapper: CoordinateMapper,
    click_threshold_px: f32,
    state: GestureState,
}

impl InteractionController {
    pub fn new(mapper: CoordinateMapper, config: &TimelineConfig) -> Self {
        Self {
            mapper,
            click_threshold_px: config.click_threshold_px,
            state: GestureState::Idle,
        }
    }

    /// Re-target the controller after the schema was rebuilt. An active
    /// gesture survives only if the zoom and column width are unchanged.
    pub fn set_mapper(&mut self, mapper: CoordinateMapper) {
        let same_scale = mapper.zoom() == self.mapper.zoom()
            && mapper.column_width() == self.mapper.column_width();
        if !same_scale && self.cancel() {
            debug!("Cancelled gesture after a zoom or column width change");
        }
        self.mapper = mapper;
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, GestureState::Active(_))
    }

    pub fn gesture(&self) -> Option<&DragGesture> {
        match &self.state {
            GestureState::Active(gesture) => Some(gesture),
            GestureState::Idle => None,
        }
    }

    /// Tentative dates of `item_id` while it is being dragged, for
    /// optimistic rendering.
    pub fn preview(&self, item_id: ItemId) -> Option<(NaiveDate, NaiveDate)> {
        self.gesture()
            .filter(|gesture| gesture.item_id == item_id)
            .map(|gesture| (gesture.tentative_start, gesture.tentative_end))
    }

    /// Start a gesture on `item` with the pointer at `pointer_x`.
    pub fn begin(
        &mut self,
        kind: GestureKind,
        item: &ScheduledItem,
        pointer_x: f32,
    ) -> Result<(), InteractionError> {
        if let Some(active) = self.gesture() {
            warn!("Rejected {kind:?} on {}: gesture on {} in progress", item.id, active.item_id);
            return Err(InteractionError::GestureInProgress {
                active: active.item_id,
            });
        }
        let Some((start, end)) = item.schedule() else {
            warn!("Rejected {kind:?} on unscheduled item {}", item.id);
            return Err(InteractionError::Unscheduled(item.id));
        };

        let bar_width = TimelineGeometry::new(&self.mapper).task_bar_rect(item).width;
        debug!("Begin {kind:?} on {} ({start} to {end}) at x={pointer_x:.1}", item.id);

        self.state = GestureState::Active(DragGesture {
            kind,
            item_id: item.id,
            anchor_x: pointer_x,
            original_start: start,
            original_end: end,
            tentative_start: start,
            tentative_end: end,
            original_progress: item.progress.min(100),
            tentative_progress: item.progress.min(100),
            bar_width,
        });
        Ok(())
    }

    /// Apply the pointer position to the active gesture and return the
    /// tentative dates, or `None` when idle.
    ///
    /// The offset from the anchor is quantized to whole drag steps of the
    /// current zoom and always applied to the original dates, so repeated
    /// calls with the same position give the same result.
    pub fn update(&mut self, pointer_x: f32) -> Option<(NaiveDate, NaiveDate)> {
        let step = self.mapper.zoom().drag_step();
        let step_width = self.mapper.drag_step_width();
        let GestureState::Active(gesture) = &mut self.state else {
            return None;
        };

        let delta_px = pointer_x - gesture.anchor_x;
        if !delta_px.is_finite() {
            return Some((gesture.tentative_start, gesture.tentative_end));
        }
        let delta = (delta_px / step_width).round() as i64;

        match gesture.kind {
            // A shift past the calendar limits keeps the previous tentative
            // dates, so a runaway drag never collapses the item's duration.
            GestureKind::Move => {
                let shifted = step
                    .unit
                    .checked_add(gesture.original_start, delta)
                    .zip(step.unit.checked_add(gesture.original_end, delta));
                match shifted {
                    Some((start, end)) => {
                        gesture.tentative_start = start;
                        gesture.tentative_end = end;
                    }
                    None => debug!(
                        "Ignoring move of {} by {delta} {:?}: out of calendar",
                        gesture.item_id, step.unit
                    ),
                }
            }
            GestureKind::ResizeStart => {
                // Returning to the original date is always allowed, which
                // matters for single-day items whose start equals their end.
                if let Some(start) = step
                    .unit
                    .checked_add(gesture.original_start, delta)
                    .filter(|start| *start < gesture.tentative_end || *start == gesture.original_start)
                {
                    gesture.tentative_start = start;
                }
            }
            GestureKind::ResizeEnd => {
                if let Some(end) = step
                    .unit
                    .checked_add(gesture.original_end, delta)
                    .filter(|end| *end > gesture.tentative_start || *end == gesture.original_end)
                {
                    gesture.tentative_end = end;
                }
            }
            GestureKind::Progress => {
                if gesture.bar_width > 0.0 {
                    let progress = f32::from(gesture.original_progress)
                        + delta_px / gesture.bar_width * 100.0;
                    gesture.tentative_progress = progress.clamp(0.0, 100.0).round() as u8;
                }
            }
        }

        trace!(
            "{:?} {} at x={pointer_x:.1}: {delta} {:?} steps, {} to {}",
            gesture.kind,
            gesture.item_id,
            step.unit,
            gesture.tentative_start,
            gesture.tentative_end
        );
        Some((gesture.tentative_start, gesture.tentative_end))
    }

    /// Finish the gesture. Emits a single event if the tentative values
    /// differ from the item's dates (or progress), nothing otherwise.
    pub fn commit(&mut self) -> Option<TimelineEvent> {
        let GestureState::Active(gesture) = std::mem::take(&mut self.state) else {
            return None;
        };

        let event = match gesture.kind {
            GestureKind::Progress if gesture.tentative_progress != gesture.original_progress => {
                Some(TimelineEvent::ProgressChangeRequested {
                    item_id: gesture.item_id,
                    progress: gesture.tentative_progress,
                })
            }
            GestureKind::Progress => None,
            _ if gesture.dates_changed() => Some(TimelineEvent::DateChangeRequested {
                item_id: gesture.item_id,
                start: gesture.tentative_start,
                end: gesture.tentative_end,
            }),
            _ => None,
        };

        debug!("Commit {:?} on {}: {event:?}", gesture.kind, gesture.item_id);
        event
    }

    /// Pointer release at `pointer_x`: a final `update` followed by
    /// `commit`. Travel below the click threshold is a click and commits
    /// nothing.
    pub fn release(&mut self, pointer_x: f32) -> Option<TimelineEvent> {
        let travel = (pointer_x - self.gesture()?.anchor_x).abs();
        if travel < self.click_threshold_px {
            self.cancel();
            return None;
        }
        self.update(pointer_x);
        self.commit()
    }

    /// Drop the active gesture without emitting anything. Returns whether a
    /// gesture was active.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            GestureState::Active(gesture) => {
                debug!("Cancel {:?} on {}", gesture.kind, gesture.item_id);
                true
            }
            GestureState::Idle => false,
        }
    }

    /// Give an unscheduled item initial dates from a click at `click_x`: it
    /// starts on the clicked day and lasts one unit of the current zoom.
    pub fn schedule_at(
        &self,
        item: &ScheduledItem,
        click_x: f32,
    ) -> Result<TimelineEvent, InteractionError> {
        if let Some(active) = self.gesture() {
            return Err(InteractionError::GestureInProgress {
                active: active.item_id,
            });
        }
        if item.is_scheduled() {
            return Err(InteractionError::AlreadyScheduled(item.id));
        }

        let start = self.mapper.pixel_to_date(click_x);
        let end = add_days(self.mapper.zoom().unit().add(start, 1), -1).max(start);
        debug!("Schedule {} from click at x={click_x:.1}: {start} to {end}", item.id);

        Ok(TimelineEvent::DateChangeRequested {
            item_id: item.id,
            start,
            end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DateRange, ZoomLevel};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn controller(zoom: ZoomLevel, width: f32) -> InteractionController {
        let range = DateRange::new(ymd(2024, 1, 1), ymd(2024, 12, 31));
        InteractionController::new(CoordinateMapper::new(range, width, zoom), &TimelineConfig::default())
    }

    fn task() -> ScheduledItem {
        ScheduledItem::new("Design", ymd(2024, 3, 4), ymd(2024, 3, 8))
    }

    #[test]
    fn move_shifts_both_dates_by_whole_days() {
        let mut ctl = controller(ZoomLevel::Day, 40.0);
        let item = task();
        ctl.begin(GestureKind::Move, &item, 100.0).unwrap();

        assert_eq!(ctl.update(159.0), Some((ymd(2024, 3, 5), ymd(2024, 3, 9))));
        assert_eq!(ctl.update(15.0), Some((ymd(2024, 3, 2), ymd(2024, 3, 6))));
        assert_eq!(
            ctl.commit(),
            Some(TimelineEvent::DateChangeRequested {
                item_id: item.id,
                start: ymd(2024, 3, 2),
                end: ymd(2024, 3, 6),
            })
        );
        assert!(!ctl.is_active());
    }

    #[test]
    fn week_view_drags_in_days() {
        let mut ctl = controller(ZoomLevel::Week, 70.0);
        let item = task();
        ctl.begin(GestureKind::Move, &item, 0.0).unwrap();
        assert_eq!(ctl.update(31.0), Some((ymd(2024, 3, 7), ymd(2024, 3, 11))));
    }

    #[test]
    fn quarter_view_drags_in_months() {
        let mut ctl = controller(ZoomLevel::Quarter, 120.0);
        let item = ScheduledItem::new("t", ymd(2024, 1, 31), ymd(2024, 2, 15));
        ctl.begin(GestureKind::Move, &item, 0.0).unwrap();
        assert_eq!(ctl.update(41.0), Some((ymd(2024, 2, 29), ymd(2024, 3, 15))));
    }

    #[test]
    fn resize_start_never_crosses_end() {
        let mut ctl = controller(ZoomLevel::Day, 40.0);
        let item = task();
        ctl.begin(GestureKind::ResizeStart, &item, 0.0).unwrap();

        // Four days would put the start on the end date: refused.
        assert_eq!(ctl.update(160.0), Some((ymd(2024, 3, 4), ymd(2024, 3, 8))));
        assert_eq!(ctl.update(120.0), Some((ymd(2024, 3, 7), ymd(2024, 3, 8))));
        for x in [160.0, 200.0, 4000.0] {
            let (start, end) = ctl.update(x).unwrap();
            assert!(start < end, "{start} >= {end}");
        }
        assert_eq!(ctl.gesture().unwrap().tentative_start, ymd(2024, 3, 7));
        assert_eq!(ctl.update(-80.0), Some((ymd(2024, 3, 2), ymd(2024, 3, 8))));
    }

    #[test]
    fn resize_end_never_crosses_start() {
        let mut ctl = controller(ZoomLevel::Day, 40.0);
        let item = task();
        ctl.begin(GestureKind::ResizeEnd, &item, 0.0).unwrap();

        assert_eq!(ctl.update(-160.0), Some((ymd(2024, 3, 4), ymd(2024, 3, 8))));
        assert_eq!(ctl.update(-120.0), Some((ymd(2024, 3, 4), ymd(2024, 3, 5))));
        assert_eq!(ctl.update(-1000.0), Some((ymd(2024, 3, 4), ymd(2024, 3, 5))));
        assert_eq!(ctl.update(80.0), Some((ymd(2024, 3, 4), ymd(2024, 3, 10))));
    }

    #[test]
    fn single_day_item_can_return_to_its_origin() {
        let mut ctl = controller(ZoomLevel::Day, 40.0);
        let item = ScheduledItem::new("t", ymd(2024, 3, 4), ymd(2024, 3, 4));
        ctl.begin(GestureKind::ResizeStart, &item, 0.0).unwrap();

        assert_eq!(ctl.update(-80.0), Some((ymd(2024, 3, 2), ymd(2024, 3, 4))));
        assert_eq!(ctl.update(40.0), Some((ymd(2024, 3, 2), ymd(2024, 3, 4))));
        assert_eq!(ctl.update(0.0), Some((ymd(2024, 3, 4), ymd(2024, 3, 4))));
        assert_eq!(ctl.commit(), None);
    }

    #[test]
    fn update_is_idempotent() {
        let mut ctl = controller(ZoomLevel::Month, 80.0);
        let item = task();
        ctl.begin(GestureKind::Move, &item, 10.0).unwrap();

        // 85px over ~18.4px weekly steps rounds to five weeks.
        let first = ctl.update(95.0);
        let second = ctl.update(95.0);
        assert_eq!(first, second);
        assert_eq!(first, Some((ymd(2024, 4, 8), ymd(2024, 4, 12))));
    }

    #[test]
    fn unchanged_gesture_commits_nothing() {
        let mut ctl = controller(ZoomLevel::Day, 40.0);
        let item = task();
        ctl.begin(GestureKind::Move, &item, 100.0).unwrap();
        ctl.update(140.0);
        ctl.update(105.0);
        assert_eq!(ctl.commit(), None);
        assert_eq!(ctl.commit(), None);
    }

    #[test]
    fn cancel_discards() {
        let mut ctl = controller(ZoomLevel::Day, 40.0);
        let item = task();
        ctl.begin(GestureKind::Move, &item, 0.0).unwrap();
        ctl.update(400.0);
        assert_eq!(ctl.preview(item.id), Some((ymd(2024, 3, 14), ymd(2024, 3, 18))));
        assert!(ctl.cancel());
        assert!(!ctl.cancel());
        assert_eq!(ctl.commit(), None);
        assert_eq!(ctl.preview(item.id), None);
        assert_eq!(ctl.state(), &GestureState::Idle);
    }

    #[test]
    fn begin_rejections() {
        let mut ctl = controller(ZoomLevel::Day, 40.0);
        let item = task();
        let unscheduled = ScheduledItem::unscheduled("later");

        assert_eq!(
            ctl.begin(GestureKind::ResizeEnd, &unscheduled, 0.0),
            Err(InteractionError::Unscheduled(unscheduled.id))
        );
        ctl.begin(GestureKind::Move, &item, 0.0).unwrap();
        assert_eq!(
            ctl.begin(GestureKind::Move, &task(), 0.0),
            Err(InteractionError::GestureInProgress { active: item.id })
        );
        assert_eq!(ctl.gesture().unwrap().item_id, item.id);
    }

    #[test]
    fn release_below_threshold_is_a_click() {
        let mut ctl = controller(ZoomLevel::Day, 40.0);
        let item = task();
        ctl.begin(GestureKind::Move, &item, 100.0).unwrap();
        assert_eq!(ctl.release(102.0), None);
        assert!(!ctl.is_active());

        ctl.begin(GestureKind::ResizeEnd, &item, 100.0).unwrap();
        assert_eq!(
            ctl.release(180.0),
            Some(TimelineEvent::DateChangeRequested {
                item_id: item.id,
                start: ymd(2024, 3, 4),
                end: ymd(2024, 3, 10),
            })
        );
    }

    #[test]
    fn progress_drag() {
        let mut ctl = controller(ZoomLevel::Day, 40.0);
        let mut item = task();
        item.progress = 20;
        // Five day bar, 200px wide.
        ctl.begin(GestureKind::Progress, &item, 0.0).unwrap();
        ctl.update(50.0);
        assert_eq!(ctl.gesture().unwrap().tentative_progress, 45);
        ctl.update(5000.0);
        assert_eq!(ctl.gesture().unwrap().tentative_progress, 100);
        assert_eq!(
            ctl.commit(),
            Some(TimelineEvent::ProgressChangeRequested { item_id: item.id, progress: 100 })
        );
    }

    #[test]
    fn click_schedules_one_zoom_unit() {
        let item = ScheduledItem::unscheduled("later");

        let day = controller(ZoomLevel::Day, 40.0);
        assert_eq!(
            day.schedule_at(&item, 41.0),
            Ok(TimelineEvent::DateChangeRequested {
                item_id: item.id,
                start: ymd(2024, 1, 2),
                end: ymd(2024, 1, 2),
            })
        );

        let month = controller(ZoomLevel::Month, 62.0);
        assert_eq!(
            month.schedule_at(&item, 62.0 + 30.0),
            Ok(TimelineEvent::DateChangeRequested {
                item_id: item.id,
                start: ymd(2024, 2, 15),
                end: ymd(2024, 3, 14),
            })
        );

        let scheduled = task();
        assert_eq!(
            day.schedule_at(&scheduled, 0.0),
            Err(InteractionError::AlreadyScheduled(scheduled.id))
        );
    }

    #[test]
    fn scale_change_cancels_gesture() {
        let mut ctl = controller(ZoomLevel::Day, 40.0);
        let item = task();
        ctl.begin(GestureKind::Move, &item, 0.0).unwrap();

        let same = ctl.mapper().clone();
        ctl.set_mapper(same);
        assert!(ctl.is_active());

        let range = ctl.mapper().range();
        ctl.set_mapper(CoordinateMapper::new(range, 60.0, ZoomLevel::Week));
        assert!(!ctl.is_active());
    }

    #[test]
    fn runaway_drag_keeps_last_representable_dates() {
        let mut ctl = controller(ZoomLevel::Day, 40.0);
        let item = task();
        ctl.begin(GestureKind::Move, &item, 0.0).unwrap();

        assert_eq!(ctl.update(80.0), Some((ymd(2024, 3, 6), ymd(2024, 3, 10))));
        assert_eq!(ctl.update(1e12), Some((ymd(2024, 3, 6), ymd(2024, 3, 10))));
        assert_eq!(ctl.update(-1e12), Some((ymd(2024, 3, 6), ymd(2024, 3, 10))));
        assert_eq!(
            ctl.commit(),
            Some(TimelineEvent::DateChangeRequested {
                item_id: item.id,
                start: ymd(2024, 3, 6),
                end: ymd(2024, 3, 10),
            })
        );

        ctl.begin(GestureKind::ResizeEnd, &item, 0.0).unwrap();
        assert_eq!(ctl.update(1e12), Some((ymd(2024, 3, 4), ymd(2024, 3, 8))));
        assert_eq!(ctl.commit(), None);
    }
}
