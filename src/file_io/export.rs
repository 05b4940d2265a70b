//! Exports: The annotation manifest (JSON), and the annotated alignment as an image. Images are
//! drawn onto an SVG document, which we either save directly or rasterize to PNG.

use std::{fs, io::Cursor, path::Path};

use chrono::{SecondsFormat, Utc};
use eframe::egui::{Color32, Pos2, Rect, Vec2};
use image::{ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg};
use serde::{Deserialize, Serialize};
use svg::{
    node::element::{Rectangle, Text},
    Document, Node,
};

use crate::{
    annotation::Annotation,
    color_scheme::{ColorScheme, Theme},
    coords::CoordMapper,
    error::{MsaError, MsaResult},
    fasta::AlignmentSet,
    render::{render, DrawSurface},
    util::color_to_hex,
};

pub const MANIFEST_FILE: &str = "msa_annotations.json";
pub const IMAGE_FILE: &str = "msa_annotated_multirow.png";
pub const SVG_FILE: &str = "msa_annotated_multirow.svg";

const FONT_FAMILY: &str = "monospace";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceSummary {
    pub name: String,
    pub length: usize,
}

/// Everything needed to re-create the annotations against the same file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub filename: String,
    pub sequences: Vec<SequenceSummary>,
    pub annotations: Vec<Annotation>,
    pub line_length: usize,
    /// ISO-8601, UTC, with milliseconds.
    pub created: String,
}

impl Manifest {
    pub fn new(
        file_name: &str,
        alignment: &AlignmentSet,
        annotations: &[Annotation],
        line_length: usize,
    ) -> Self {
        Self {
            filename: file_name.to_owned(),
            sequences: alignment
                .sequences()
                .iter()
                .map(|s| SequenceSummary {
                    name: s.name.clone(),
                    length: s.len(),
                })
                .collect(),
            annotations: annotations.to_vec(),
            line_length,
            created: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Serialize as pretty JSON.
pub fn export_manifest(manifest: &Manifest) -> MsaResult<String> {
    Ok(serde_json::to_string_pretty(manifest)?)
}

pub fn import_manifest(text: &str) -> MsaResult<Manifest> {
    Ok(serde_json::from_str(text)?)
}

pub fn save_manifest(path: &Path, manifest: &Manifest) -> MsaResult<()> {
    fs::write(path, export_manifest(manifest)?)?;
    log::info!(
        "Exported {} annotations to {path:?}",
        manifest.annotations.len()
    );
    Ok(())
}

fn to_hex(color: Color32) -> (String, f32) {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    (color_to_hex((r, g, b)), a as f32 / 255.)
}

/// Draws onto an SVG document, in canvas pixel units.
pub struct SvgSurface {
    doc: Document,
    size: Vec2,
}

impl SvgSurface {
    pub fn new(size: Vec2) -> Self {
        let doc = Document::new()
            .set("viewBox", (0., 0., size.x, size.y))
            .set("width", size.x)
            .set("height", size.y);

        Self { doc, size }
    }

    pub fn finish(self) -> String {
        self.doc.to_string()
    }

    fn rect_element(rect: Rect) -> Rectangle {
        Rectangle::new()
            .set("x", rect.min.x)
            .set("y", rect.min.y)
            .set("width", rect.width())
            .set("height", rect.height())
    }
}

impl DrawSurface for SvgSurface {
    fn clear(&mut self, color: Color32) {
        let (fill, _) = to_hex(color);
        self.doc.append(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", self.size.x)
                .set("height", self.size.y)
                .set("fill", fill),
        );
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        let (fill, opacity) = to_hex(color);
        let mut el = Self::rect_element(rect).set("fill", fill);
        if opacity < 1. {
            el = el.set("fill-opacity", opacity);
        }
        self.doc.append(el);
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color32) {
        let (stroke, _) = to_hex(color);
        self.doc.append(
            Self::rect_element(rect)
                .set("fill", "none")
                .set("stroke", stroke)
                .set("stroke-width", width),
        );
    }

    fn dashed_rect(&mut self, rect: Rect, width: f32, color: Color32, dash: f32, gap: f32) {
        let (stroke, _) = to_hex(color);
        self.doc.append(
            Self::rect_element(rect)
                .set("fill", "none")
                .set("stroke", stroke)
                .set("stroke-width", width)
                .set("stroke-dasharray", format!("{dash} {gap}")),
        );
    }

    fn text(&mut self, pos: Pos2, text: &str, size: f32, color: Color32) {
        let (fill, _) = to_hex(color);
        self.doc.append(
            Text::new(text)
                .set("x", pos.x)
                .set("y", pos.y)
                .set("font-family", FONT_FAMILY)
                .set("font-size", size)
                .set("fill", fill),
        );
    }
}

/// Draw the annotated alignment as an SVG document. The live selection is not included.
pub fn render_svg(
    alignment: &AlignmentSet,
    mapper: &CoordMapper,
    annotations: &[Annotation],
    scheme: ColorScheme,
    theme: &Theme,
    size: Vec2,
) -> String {
    let mut surface = SvgSurface::new(size);
    render(
        &mut surface,
        alignment,
        mapper,
        annotations,
        None,
        scheme,
        theme,
    );
    surface.finish()
}

/// Rasterize an SVG document, and encode it as PNG.
pub fn svg_to_png(svg: &str) -> MsaResult<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| MsaError::Export(e.to_string()))?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| MsaError::Export(format!("Invalid image size: {width} x {height}")))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    // The background is opaque, so premultiplied and straight alpha agree.
    let img = RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| MsaError::Export("Failed to create image buffer".to_owned()))?;

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| MsaError::Export(e.to_string()))?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::*;
    use crate::{
        annotation::{AnnotationKind, AnnotationMode, AnnotationStyle},
        fasta::parse,
        layout::LayoutConfig,
    };

    fn sample() -> (AlignmentSet, Vec<Annotation>) {
        let aln = parse(">alpha\nACGTACGT\n>beta\nACG\n").unwrap();
        let annotations = vec![
            Annotation {
                id: 1,
                kind: AnnotationKind::Region {
                    start_pos: 1,
                    end_pos: 4,
                    start_seq: 0,
                    end_seq: 1,
                },
                mode: AnnotationMode::Fill,
                style: AnnotationStyle::default(),
            },
            Annotation {
                id: 2,
                kind: AnnotationKind::Residue {
                    position: 6,
                    sequence: 1,
                },
                mode: AnnotationMode::Border,
                style: AnnotationStyle::default(),
            },
        ];
        (aln, annotations)
    }

    #[test]
    fn manifest_json_layout() {
        let (aln, annotations) = sample();
        let manifest = Manifest::new("test.fasta", &aln, &annotations, 60);
        let json: Value = serde_json::from_str(&export_manifest(&manifest).unwrap()).unwrap();

        assert_eq!(json["filename"], "test.fasta");
        assert_eq!(json["lineLength"], 60);
        assert_eq!(json["sequences"][1]["name"], "beta");
        assert_eq!(json["sequences"][1]["length"], 8);

        let region = &json["annotations"][0];
        assert_eq!(region["type"], "region");
        assert_eq!(region["startPos"], 1);
        assert_eq!(region["endSeq"], 1);
        assert_eq!(region["mode"], "fill");
        assert_eq!(region["color"], "#FF6B6B");
        assert_eq!(json["annotations"][1]["type"], "residue");
        assert_eq!(json["annotations"][1]["borderWidth"], 2.);

        let created = json["created"].as_str().unwrap();
        assert!(created.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
    }

    #[test]
    fn manifest_imports() {
        let (aln, annotations) = sample();
        let manifest = Manifest::new("test.fasta", &aln, &annotations, 55);

        let imported = import_manifest(&export_manifest(&manifest).unwrap()).unwrap();
        assert_eq!(imported, manifest);

        assert!(matches!(import_manifest("{"), Err(MsaError::Json(_))));
    }

    #[test]
    fn svg_contains_alignment_and_annotations() {
        let (aln, annotations) = sample();
        let mapper = CoordMapper::new(aln.alignment_len(), aln.len(), LayoutConfig::default());
        let size = mapper.layout.canvas_size(800.);

        let svg = render_svg(
            &aln,
            &mapper,
            &annotations,
            ColorScheme::Nucleotides,
            &Theme::default(),
            size,
        );

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("alpha"));
        assert!(svg.contains("1-8"));
        assert!(svg.contains("fill-opacity"));
        assert!(svg.contains("stroke=\"#FF6B6B\""));
        assert!(!svg.contains("stroke-dasharray"));
    }

    #[test]
    fn png_has_canvas_dimensions() {
        let (aln, annotations) = sample();
        let mapper = CoordMapper::new(aln.alignment_len(), aln.len(), LayoutConfig::default());
        let size = vec2(800., 600.);

        let svg = render_svg(
            &aln,
            &mapper,
            &annotations,
            ColorScheme::None,
            &Theme::default(),
            size,
        );
        let png = svg_to_png(&svg).unwrap();

        let img = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!((img.width(), img.height()), (800, 600));
    }
}
