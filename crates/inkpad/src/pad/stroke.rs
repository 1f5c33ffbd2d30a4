//! Stroke lifecycle: sampling entry points and point commitment.

use glam::Vec2;
use tracing::debug;

use crate::events::PadEvent;
use crate::options::{resolve_style, StyleOverride};
use crate::point::{InputSample, InvalidPointError, Point};
use crate::store::PointRecord;

use super::InkPad;

impl InkPad {
    /// Open a new stroke at `sample`.
    ///
    /// Emits a cancelable [`PadEvent::StrokeBegin`]; when a subscriber
    /// vetoes it nothing is mutated. The opening sample is processed
    /// unthrottled.
    pub fn begin_stroke(&mut self, sample: InputSample) -> Result<(), InvalidPointError> {
        self.begin_stroke_with(sample, None)
    }

    /// Open a new stroke with per-stroke style overrides.
    pub fn begin_stroke_with(
        &mut self,
        sample: InputSample,
        overrides: Option<&StyleOverride>,
    ) -> Result<(), InvalidPointError> {
        // Validate before any mutation so a rejected sample is side-effect
        // free.
        Point::from_sample(&sample)?;

        if !self.events.dispatch(&PadEvent::StrokeBegin {
            x: sample.x,
            y: sample.y,
        }) {
            debug!("begin_stroke: canceled by subscriber");
            return Ok(());
        }

        let style = resolve_style(overrides, &self.options);
        self.store.open_group(style);
        self.state.reset(&style);
        self.throttle.reset();
        self.drawing = true;
        debug!(
            "begin_stroke: opened group {} at ({:.1}, {:.1})",
            self.store.len(),
            sample.x,
            sample.y
        );

        self.process_sample(sample)
    }

    /// Feed a movement sample into the open stroke.
    ///
    /// Without an open stroke this behaves as an implicit
    /// [`begin_stroke`](Self::begin_stroke). Samples pass through the
    /// trailing throttle: bursts inside the configured window collapse into
    /// one pending sample, processed once the window elapses or the stroke
    /// ends.
    pub fn update_stroke(&mut self, sample: InputSample) -> Result<(), InvalidPointError> {
        if !self.drawing {
            return self.begin_stroke(sample);
        }
        Point::from_sample(&sample)?;

        let (released, current) = self.throttle.invoke(sample);
        if let Some(released) = released {
            self.process_sample(released)?;
        }
        if let Some(current) = current {
            self.process_sample(current)?;
        }
        Ok(())
    }

    /// Close the open stroke with a terminal sample.
    ///
    /// A no-op when no stroke is open. Any pending throttled sample and the
    /// terminal sample are both processed, so the last input position is
    /// never dropped.
    pub fn end_stroke(&mut self, sample: InputSample) -> Result<(), InvalidPointError> {
        if !self.drawing {
            return Ok(());
        }
        Point::from_sample(&sample)?;

        if let Some(pending) = self.throttle.flush() {
            self.process_sample(pending)?;
        }
        self.process_sample(sample)?;
        self.drawing = false;

        let (x, y) = self
            .store
            .last_point()
            .map(|record| (record.x, record.y))
            .unwrap_or((sample.x, sample.y));
        self.events.dispatch(&PadEvent::StrokeEnd { x, y });
        debug!("end_stroke: closed at ({:.1}, {:.1})", x, y);
        Ok(())
    }

    /// Run one sample through filter, solve, draw, and record.
    fn process_sample(&mut self, sample: InputSample) -> Result<(), InvalidPointError> {
        let point = Point::from_sample(&sample)?;

        let style = match self.store.last_group() {
            Some(group) => group.style,
            None => {
                debug!("process_sample: no open group, ignoring");
                return Ok(());
            }
        };

        let last = self.store.last_point().copied();
        let dropped = last.is_some_and(|record| {
            let distance = point.pos().distance(Vec2::new(record.x, record.y));
            distance <= self.options.min_distance
        });

        if !dropped {
            let segment = self.state.add_point(point, &style);
            if last.is_some() {
                if let Some(segment) = segment {
                    self.rasterizer.draw_curve(&segment, &style);
                }
            } else {
                // The very first committed point of a stroke renders as a
                // dot; later points extend it with curve segments.
                self.rasterizer.draw_dot(&PointRecord::from(point), &style);
            }
            self.store.push_point(PointRecord::from(point));
        }

        if let Some(record) = self.store.last_point() {
            let event = PadEvent::StrokeUpdate {
                x: record.x,
                y: record.y,
            };
            self.events.dispatch(&event);
        }
        Ok(())
    }
}
