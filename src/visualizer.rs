use image::RgbaImage;

use crate::cloud::CloudRequest;
use crate::error::CloudError;
use crate::geometry::Point;
use crate::render::{CloudRenderer, Color, PlacedTag, TextMeasurer};

/// Placed tags for one request, before rasterization.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudLayout {
    pub center: Point,
    pub background: Color,
    /// Heaviest word first.
    pub tags: Vec<PlacedTag>,
}

/// validate -> size -> place (heaviest first) -> render.
pub struct Visualizer<'a> {
    measurer: &'a dyn TextMeasurer,
    renderer: &'a dyn CloudRenderer,
}

impl<'a> Visualizer<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer, renderer: &'a dyn CloudRenderer) -> Self {
        Self { measurer, renderer }
    }

    /// Validate and place every word without drawing anything.
    pub fn layout_cloud(&self, request: CloudRequest) -> Result<CloudLayout, CloudError> {
        let mut prepared = request.prepare(self.measurer)?;
        tracing::info!(
            "Laying out {} words around {:?}",
            prepared.words.len(),
            prepared.layouter.center()
        );

        let mut tags = Vec::with_capacity(prepared.words.len());
        for (i, word) in prepared.words.iter().enumerate() {
            let rect = prepared.layouter.place_next_rectangle(word.size)?;
            tags.push(PlacedTag {
                rect,
                text: word.entry.text.clone(),
                font_family: prepared.font_family.clone(),
                font_size: word.font_size,
                brush: prepared.brush_for(i),
                fill: prepared.fill_for(i),
            });
        }

        Ok(CloudLayout {
            center: prepared.layouter.center(),
            background: prepared.background,
            tags,
        })
    }

    pub fn get_cloud_visualization(&self, request: CloudRequest) -> Result<RgbaImage, CloudError> {
        let layout = self.layout_cloud(request)?;
        Ok(self.renderer.draw_cloud(layout.background, &layout.tags)?)
    }
}
