use crate::{
    animation::progress::ProgressHandle,
    foundation::core::{ElementId, Viewport},
    foundation::error::ScrollyteResult,
    foundation::events::{Listeners, Subscription},
    scroll::region::{
        LayoutSource, RegionEvent, RegionHandle, RegionId, RegionSpec, ResolvedRange, Zone,
        zone_transition,
    },
};

// Scrubbed progress closer than this (normalized) to its target snaps onto it.
const SCRUB_SNAP: f64 = 1e-4;

#[derive(Debug)]
struct Region {
    id: RegionId,
    spec: RegionSpec,
    progress: ProgressHandle,
    range: Option<ResolvedRange>,
    // Normalized progress as last written (lags the target while scrubbing).
    current: f64,
    zone: Zone,
}

/// Outcome of one re-measurement pass.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct RemeasureReport {
    pub measured: usize,
    /// Regions whose trigger element was missing.
    pub skipped: Vec<RegionId>,
    pub total_spacer: f64,
    pub document_height: f64,
}

/// Row of the region table.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RegionStatus {
    pub id: RegionId,
    pub trigger: ElementId,
    pub priority: i32,
    pub pin: bool,
    pub range: Option<ResolvedRange>,
    /// Normalized written progress.
    pub progress: f64,
    pub zone: Zone,
}

/// Binds regions to scroll ranges and writes their progress.
///
/// Regions live in one list ordered by `(priority, registration order)`; re-measurement walks
/// it front to back so every region sees the spacers of the pinned regions settled before it.
#[derive(Debug, Default)]
pub struct Scheduler {
    regions: Vec<Region>,
    next_id: u64,
    events: Listeners<RegionEvent>,
    dirty: bool,
    base_height: f64,
    total_spacer: f64,
    passes: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a region. Its progress starts at 0; a re-measurement is requested.
    pub fn register(&mut self, spec: RegionSpec) -> ScrollyteResult<RegionHandle> {
        spec.validate()?;
        let id = RegionId(self.next_id);
        self.next_id += 1;
        let progress = ProgressHandle::new(spec.span);

        let at = self
            .regions
            .partition_point(|r| r.spec.priority <= spec.priority);
        tracing::debug!(
            region = %id,
            trigger = %spec.trigger,
            priority = spec.priority,
            "region registered"
        );
        self.regions.insert(
            at,
            Region {
                id,
                spec,
                progress: progress.clone(),
                range: None,
                current: 0.0,
                zone: Zone::Before,
            },
        );
        self.dirty = true;
        Ok(RegionHandle { id, progress })
    }

    /// Remove a region; its spacer is released immediately. Returns `false` for unknown ids.
    pub fn unregister(&mut self, id: RegionId) -> bool {
        let Some(pos) = self.regions.iter().position(|r| r.id == id) else {
            return false;
        };
        let removed = self.regions.remove(pos);
        if let Some(range) = removed.range {
            self.total_spacer -= range.spacer;
        }
        self.dirty = true;
        tracing::debug!(region = %id, "region unregistered");
        true
    }

    /// Subscribe to boundary events.
    pub fn on_event(&self, f: impl FnMut(&RegionEvent) + 'static) -> Subscription {
        self.events.subscribe(f)
    }

    /// Mark the layout as changed; the next [`Scheduler::needs_remeasure`] returns `true`.
    pub fn request_remeasure(&mut self) {
        self.dirty = true;
    }

    pub fn needs_remeasure(&self) -> bool {
        self.dirty
    }

    /// Number of completed re-measurement passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Resolve every region's range, strictly in ascending priority order.
    ///
    /// A pinned region's spacer shifts every later-measured region whose trigger sits at or
    /// below the pinned trigger. Regions whose trigger is missing are skipped (unpinned, no
    /// spacer) and retried next pass. Running twice on the same layout yields the same ranges.
    #[tracing::instrument(skip_all, fields(regions = self.regions.len()))]
    pub fn remeasure(
        &mut self,
        layout: &dyn LayoutSource,
        viewport: Viewport,
    ) -> ScrollyteResult<RemeasureReport> {
        // (natural trigger top, spacer) of pinned regions settled so far in this pass.
        let mut pins: Vec<(f64, f64)> = Vec::new();
        let mut report = RemeasureReport::default();

        for region in &mut self.regions {
            let Some(bx) = layout.element_box(&region.spec.trigger) else {
                tracing::warn!(
                    region = %region.id,
                    trigger = %region.spec.trigger,
                    "trigger element missing; region skipped this pass"
                );
                region.range = None;
                report.skipped.push(region.id);
                continue;
            };

            let shift: f64 = pins
                .iter()
                .filter(|(top, _)| *top <= bx.top)
                .map(|(_, spacer)| spacer)
                .sum();
            let top = bx.top + shift;
            let start = region
                .spec
                .start
                .resolve(top, bx.height, viewport.height, None)?;
            let end = region
                .spec
                .end
                .resolve(top, bx.height, viewport.height, Some(start))?
                .max(start);
            let spacer = if region.spec.pin { end - start } else { 0.0 };
            if region.spec.pin {
                pins.push((bx.top, spacer));
            }

            region.range = Some(ResolvedRange {
                trigger_top: top,
                start,
                end,
                spacer,
            });
            report.measured += 1;
        }

        self.total_spacer = pins.iter().map(|(_, s)| s).sum();
        self.base_height = layout.document_height().max(0.0);
        self.dirty = false;
        self.passes += 1;

        report.total_spacer = self.total_spacer;
        report.document_height = self.document_height();
        tracing::debug!(
            measured = report.measured,
            skipped = report.skipped.len(),
            document_height = report.document_height,
            "regions measured"
        );
        Ok(report)
    }

    /// Write every measured region's progress for virtual scroll offset `scroll`.
    ///
    /// Unscrubbed regions take the target directly; scrubbed ones approach it with an
    /// exponential lag of their time constant over `dt` seconds. Boundary events are emitted
    /// after all regions are written.
    pub fn update(&mut self, scroll: f64, dt: f64) {
        let mut fired = Vec::new();
        for region in &mut self.regions {
            let Some(range) = region.range else {
                continue;
            };
            let target = range.progress_at(scroll);
            region.current = match region.spec.scrub {
                Some(lag) if dt > 0.0 => {
                    let k = 1.0 - (-dt / lag).exp();
                    let next = region.current + (target - region.current) * k;
                    if (target - next).abs() < SCRUB_SNAP {
                        target
                    } else {
                        next
                    }
                }
                Some(_) => region.current,
                None => target,
            };
            region.progress.set(region.current * region.spec.span);

            let zone = range.zone_at(scroll);
            for kind in zone_transition(region.zone, zone) {
                fired.push(RegionEvent {
                    region: region.id,
                    kind: *kind,
                });
            }
            region.zone = zone;
        }
        for ev in &fired {
            tracing::debug!(region = %ev.region, kind = ?ev.kind, "region boundary");
            self.events.emit(ev);
        }
    }

    /// Jump every scrubbed region to its target without lag.
    pub fn settle(&mut self, scroll: f64) {
        for region in &mut self.regions {
            if let Some(range) = region.range {
                region.current = range.progress_at(scroll);
                region.progress.set(region.current * region.spec.span);
            }
        }
    }

    /// Translation applied to a pinned region's content at `scroll`: 0 before the start, the
    /// distance scrolled inside the range, and the full spacer after the end.
    pub fn pin_offset(&self, id: RegionId, scroll: f64) -> Option<f64> {
        let region = self.regions.iter().find(|r| r.id == id)?;
        let range = region.range?;
        if !region.spec.pin {
            return Some(0.0);
        }
        Some((scroll - range.start).clamp(0.0, range.spacer))
    }

    pub fn range(&self, id: RegionId) -> Option<ResolvedRange> {
        self.regions.iter().find(|r| r.id == id)?.range
    }

    pub fn progress(&self, id: RegionId) -> Option<ProgressHandle> {
        self.regions
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.progress.clone())
    }

    /// Sum of all pin spacers from the last pass (minus unregistered regions).
    pub fn total_spacer(&self) -> f64 {
        self.total_spacer
    }

    /// Natural document height plus all pin spacers.
    pub fn document_height(&self) -> f64 {
        self.base_height + self.total_spacer
    }

    /// Regions in measurement order.
    pub fn statuses(&self) -> Vec<RegionStatus> {
        self.regions
            .iter()
            .map(|r| RegionStatus {
                id: r.id,
                trigger: r.spec.trigger.clone(),
                priority: r.spec.priority,
                pin: r.spec.pin,
                range: r.range,
                progress: r.current,
                zone: r.zone,
            })
            .collect()
    }

    /// Region ids in measurement order.
    pub fn order(&self) -> Vec<RegionId> {
        self.regions.iter().map(|r| r.id).collect()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/scheduler.rs"]
mod tests;
