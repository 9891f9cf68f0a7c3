use std::cell::Cell;
use std::rc::Rc;

use crate::{
    foundation::core::{ElementId, Viewport},
    foundation::error::ScrollyteResult,
    foundation::events::Subscription,
    frames::sequence::FrameSequence,
    render::FrameRGBA,
    scroll::region::{LayoutSource, RegionHandle, RegionId, RegionSpec},
    scroll::scheduler::{RemeasureReport, Scheduler},
    scroll::smoothing::{
        ElementTree, InputDisposition, ScrollInput, SmoothScroll, SmoothingConfig,
    },
};

/// Something that turns region progress into pixels on its own surface.
pub trait Consumer {
    fn name(&self) -> &str;

    /// Draw the current state; implementations skip the draw when nothing visible changed.
    fn render(&mut self) -> ScrollyteResult<()>;

    /// Force the next `render` to redraw.
    fn invalidate(&mut self);

    fn resize(&mut self, viewport: Viewport) -> ScrollyteResult<()>;

    fn snapshot(&self) -> Option<FrameRGBA>;
}

/// Progress of one region after a tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RegionProgress {
    pub id: RegionId,
    pub trigger: ElementId,
    /// Normalized written progress.
    pub progress: f64,
}

/// Summary of one [`Stage::tick`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub scroll: f64,
    pub velocity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remeasured: Option<RemeasureReport>,
    pub regions: Vec<RegionProgress>,
}

/// One page's scroll pipeline: smoothing, scheduler and the consumers they drive.
///
/// Every tick runs the same order: pending re-measurement (followed by new scroll bounds),
/// smoothing, region progress, consumer rendering. Layout-affecting events (sequence ready,
/// resize, explicit requests) only mark re-measurement as pending, so it always completes
/// before the smoothing layer sees the new document height.
pub struct Stage {
    smoothing: SmoothScroll,
    scheduler: Scheduler,
    consumers: Vec<Box<dyn Consumer>>,
    viewport: Viewport,
    remeasure_pending: Rc<Cell<bool>>,
    ticks: u64,
}

impl Stage {
    pub fn new(viewport: Viewport, smoothing: SmoothingConfig) -> ScrollyteResult<Self> {
        Ok(Self {
            smoothing: SmoothScroll::new(smoothing)?,
            scheduler: Scheduler::new(),
            consumers: Vec::new(),
            viewport,
            remeasure_pending: Rc::new(Cell::new(true)),
            ticks: 0,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn smoothing(&self) -> &SmoothScroll {
        &self.smoothing
    }

    pub fn smoothing_mut(&mut self) -> &mut SmoothScroll {
        &mut self.smoothing
    }

    pub fn register(&mut self, spec: RegionSpec) -> ScrollyteResult<RegionHandle> {
        let handle = self.scheduler.register(spec)?;
        self.remeasure_pending.set(true);
        Ok(handle)
    }

    pub fn unregister(&mut self, id: RegionId) -> bool {
        self.scheduler.unregister(id)
    }

    /// Attach a consumer, sized to the current viewport.
    pub fn add_consumer(&mut self, mut consumer: Box<dyn Consumer>) -> ScrollyteResult<()> {
        consumer.resize(self.viewport)?;
        tracing::debug!(consumer = consumer.name(), "consumer attached");
        self.consumers.push(consumer);
        Ok(())
    }

    /// Names of the attached consumers, in render order.
    pub fn consumer_names(&self) -> Vec<&str> {
        self.consumers.iter().map(|c| c.name()).collect()
    }

    /// Re-measure once `sequence` becomes ready.
    ///
    /// The watch lasts as long as the returned subscription; drop it once the sequence is ready
    /// or torn down.
    pub fn watch_sequence(&self, sequence: &FrameSequence) -> Subscription {
        let pending = Rc::clone(&self.remeasure_pending);
        sequence.on_ready(move |ev| {
            tracing::debug!(sequence = %ev.label, "sequence ready; re-measure scheduled");
            pending.set(true);
        })
    }

    pub fn request_remeasure(&mut self) {
        self.remeasure_pending.set(true);
    }

    pub fn remeasure_pending(&self) -> bool {
        self.remeasure_pending.get() || self.scheduler.needs_remeasure()
    }

    pub fn resize(&mut self, viewport: Viewport) -> ScrollyteResult<()> {
        self.viewport = viewport;
        for c in &mut self.consumers {
            c.resize(viewport)?;
        }
        self.remeasure_pending.set(true);
        Ok(())
    }

    pub fn input(&mut self, input: &ScrollInput, tree: &dyn ElementTree) -> InputDisposition {
        self.smoothing.on_input(input, tree)
    }

    /// Run one frame of the pipeline.
    pub fn tick(&mut self, dt: f64, layout: &dyn LayoutSource) -> ScrollyteResult<TickReport> {
        let remeasured = self.apply_pending(layout)?;
        let scroll = self.smoothing.tick(dt);
        self.scheduler.update(scroll, dt);
        self.render()?;

        self.ticks += 1;
        Ok(TickReport {
            tick: self.ticks,
            scroll,
            velocity: self.smoothing.velocity(),
            remeasured,
            regions: self.region_progress(),
        })
    }

    /// Jump to `scroll` and write every region's target progress without scrub lag.
    pub fn settle_at(&mut self, scroll: f64, layout: &dyn LayoutSource) -> ScrollyteResult<()> {
        self.apply_pending(layout)?;
        self.smoothing.jump_to(scroll);
        let at = self.smoothing.position();
        self.scheduler.update(at, 0.0);
        self.scheduler.settle(at);
        self.render()
    }

    /// Read back every consumer surface that supports it.
    pub fn snapshots(&self) -> Vec<(String, FrameRGBA)> {
        self.consumers
            .iter()
            .filter_map(|c| c.snapshot().map(|f| (c.name().to_owned(), f)))
            .collect()
    }

    fn apply_pending(
        &mut self,
        layout: &dyn LayoutSource,
    ) -> ScrollyteResult<Option<RemeasureReport>> {
        if !self.remeasure_pending.replace(false) && !self.scheduler.needs_remeasure() {
            return Ok(None);
        }
        let report = self.scheduler.remeasure(layout, self.viewport)?;
        self.smoothing
            .set_bounds(self.scheduler.document_height(), self.viewport.height);
        for c in &mut self.consumers {
            c.invalidate();
        }
        Ok(Some(report))
    }

    fn render(&mut self) -> ScrollyteResult<()> {
        for c in &mut self.consumers {
            c.render()?;
        }
        Ok(())
    }

    fn region_progress(&self) -> Vec<RegionProgress> {
        self.scheduler
            .statuses()
            .into_iter()
            .map(|s| RegionProgress {
                id: s.id,
                trigger: s.trigger,
                progress: s.progress,
            })
            .collect()
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("viewport", &self.viewport)
            .field("regions", &self.scheduler.len())
            .field("consumers", &self.consumer_names())
            .field("scroll", &self.smoothing.position())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/unit/stage.rs"]
mod tests;
