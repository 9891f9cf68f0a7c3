use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    assets::loader::AssetLoader,
    foundation::core::{ElementId, Viewport},
    foundation::error::{ScrollyteError, ScrollyteResult},
    frames::player::FramePlayer,
    frames::sequence::FrameSequence,
    morph::phases::MorphTimeline,
    morph::section::MorphSection,
    render::Surface,
    scene::model::{ConsumerDef, ElementDef, PageDef, SectionDef},
    scroll::region::{ElementBox, LayoutSource, RegionHandle, RegionSpec},
    scroll::smoothing::ElementTree,
    stage::Stage,
};

/// A parsed page description.
#[derive(Debug, Clone)]
pub struct Page {
    def: PageDef,
}

impl Page {
    /// Parse a page from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ScrollyteResult<Self> {
        let def: PageDef = serde_json::from_reader(r)
            .map_err(|e| ScrollyteError::serde(format!("parse page JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a page from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ScrollyteResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ScrollyteError::validation(format!("open page JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn from_def(def: PageDef) -> Self {
        Self { def }
    }

    pub fn def(&self) -> &PageDef {
        &self.def
    }

    /// Check the page for structural problems before building it.
    pub fn validate(&self) -> ScrollyteResult<()> {
        let def = &self.def;
        Viewport::new(def.viewport.width, def.viewport.height)?;
        def.smoothing.validate()?;

        let mut ids = HashSet::new();
        for el in &def.elements {
            if !ids.insert(&el.id) {
                return Err(ScrollyteError::validation(format!(
                    "duplicate element id '{}'",
                    el.id
                )));
            }
            if !el.top.is_finite() || !el.height.is_finite() || el.height < 0.0 {
                return Err(ScrollyteError::validation(format!(
                    "element '{}' needs a finite top and a height >= 0",
                    el.id
                )));
            }
        }
        for el in &def.elements {
            if let Some(parent) = &el.parent
                && !ids.contains(parent)
            {
                return Err(ScrollyteError::validation(format!(
                    "element '{}' has unknown parent '{parent}'",
                    el.id
                )));
            }
        }

        let mut names = HashSet::new();
        for section in &def.sections {
            if !names.insert(section.name.as_str()) {
                return Err(ScrollyteError::validation(format!(
                    "duplicate section name '{}'",
                    section.name
                )));
            }
            if section.region.is_none() && section.preset.is_none() {
                return Err(ScrollyteError::validation(format!(
                    "section '{}' needs a region or a preset",
                    section.name
                )));
            }
            region_for(section, None).validate()?;
            match &section.consumer {
                ConsumerDef::Frames { frames, .. } => frames.manifest().validate()?,
                ConsumerDef::Morph { morph } => {
                    MorphTimeline::new(morph)?;
                }
                ConsumerDef::None => {}
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> StaticLayout {
        StaticLayout::from_elements(&self.def.elements, self.def.document_height)
    }

    /// Assemble a [`Stage`]: register every section's region, create and load its frame
    /// sequence, and attach a consumer drawing onto a surface from `make_surface`.
    ///
    /// Sections are registered in page order; measurement order comes from their priorities.
    pub fn build<S, F>(
        &self,
        loader: &dyn AssetLoader,
        mut make_surface: F,
    ) -> ScrollyteResult<BuiltPage>
    where
        S: Surface + 'static,
        F: FnMut(&SectionDef, Viewport) -> ScrollyteResult<S>,
    {
        self.validate()?;
        let viewport = Viewport::new(self.def.viewport.width, self.def.viewport.height)?;
        let mut stage = Stage::new(viewport, self.def.smoothing.clone())?;
        let mut sections = Vec::with_capacity(self.def.sections.len());

        for section in &self.def.sections {
            let built = match &section.consumer {
                ConsumerDef::None => {
                    let region = stage.register(region_for(section, None))?;
                    BuiltSection {
                        name: section.name.clone(),
                        region,
                        sequence: None,
                    }
                }
                ConsumerDef::Frames { frames, player } => {
                    let sequence = FrameSequence::new(&section.name, &frames.manifest())?;
                    let span = sequence.len().saturating_sub(1) as f64;
                    let region = stage.register(region_for(section, Some(span)))?;
                    let watch = stage.watch_sequence(&sequence);
                    sequence.load_with(loader)?;
                    drop(watch);
                    tracing::debug!(
                        section = %section.name,
                        loaded = sequence.loaded_count(),
                        errored = sequence.errored_count(),
                        "frame sequence loaded"
                    );
                    let surface = make_surface(section, viewport)?;
                    stage.add_consumer(Box::new(FramePlayer::new(
                        &section.name,
                        sequence.clone(),
                        region.progress.clone(),
                        *player,
                        surface,
                    )))?;
                    BuiltSection {
                        name: section.name.clone(),
                        region,
                        sequence: Some(sequence),
                    }
                }
                ConsumerDef::Morph { morph } => {
                    let region = stage.register(region_for(section, None))?;
                    let surface = make_surface(section, viewport)?;
                    stage.add_consumer(Box::new(MorphSection::new(
                        &section.name,
                        MorphTimeline::new(morph)?,
                        region.progress.clone(),
                        surface,
                    )))?;
                    BuiltSection {
                        name: section.name.clone(),
                        region,
                        sequence: None,
                    }
                }
            };
            sections.push(built);
        }

        Ok(BuiltPage {
            stage,
            layout: self.layout(),
            sections,
        })
    }
}

/// Region spec of `section`; `span` overrides the progress range (frame sequences).
fn region_for(section: &SectionDef, span: Option<f64>) -> RegionSpec {
    let spec = match (&section.region, section.preset) {
        (Some(region), _) => region.clone(),
        (None, preset) => {
            let trigger = section
                .trigger
                .clone()
                .unwrap_or_else(|| ElementId::new(section.name.as_str()));
            match preset {
                Some(preset) => preset.spec(trigger, 1.0),
                None => RegionSpec::new(trigger),
            }
        }
    };
    match span {
        Some(span) => spec.span(span),
        None => spec,
    }
}

/// Result of [`Page::build`].
#[derive(Debug)]
pub struct BuiltPage {
    pub stage: Stage,
    pub layout: StaticLayout,
    pub sections: Vec<BuiltSection>,
}

impl BuiltPage {
    pub fn section(&self, name: &str) -> Option<&BuiltSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

#[derive(Debug)]
pub struct BuiltSection {
    pub name: String,
    pub region: RegionHandle,
    pub sequence: Option<FrameSequence>,
}

/// Fixed element boxes and parent links, as read from a page description.
#[derive(Clone, Debug, Default)]
pub struct StaticLayout {
    boxes: HashMap<ElementId, ElementBox>,
    parents: HashMap<ElementId, ElementId>,
    document_height: Option<f64>,
}

impl StaticLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: &[ElementDef], document_height: Option<f64>) -> Self {
        let mut layout = Self {
            document_height,
            ..Self::default()
        };
        for el in elements {
            layout.set_box(
                el.id.clone(),
                ElementBox {
                    top: el.top,
                    height: el.height,
                },
            );
            if let Some(parent) = &el.parent {
                layout.parents.insert(el.id.clone(), parent.clone());
            }
        }
        layout
    }

    pub fn with_box(mut self, id: impl Into<ElementId>, top: f64, height: f64) -> Self {
        self.set_box(id.into(), ElementBox { top, height });
        self
    }

    pub fn with_parent(mut self, child: impl Into<ElementId>, parent: impl Into<ElementId>) -> Self {
        self.parents.insert(child.into(), parent.into());
        self
    }

    pub fn set_box(&mut self, id: ElementId, bx: ElementBox) {
        self.boxes.insert(id, bx);
    }

    pub fn remove(&mut self, id: &ElementId) -> Option<ElementBox> {
        self.boxes.remove(id)
    }
}

impl LayoutSource for StaticLayout {
    fn element_box(&self, id: &ElementId) -> Option<ElementBox> {
        self.boxes.get(id).copied()
    }

    fn document_height(&self) -> f64 {
        self.document_height.unwrap_or_else(|| {
            self.boxes
                .values()
                .map(|b| b.top + b.height)
                .fold(0.0, f64::max)
        })
    }
}

impl ElementTree for StaticLayout {
    fn parent(&self, id: &ElementId) -> Option<ElementId> {
        self.parents.get(id).cloned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/page.rs"]
mod tests;
