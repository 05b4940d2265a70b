//! The scrollable alignment canvas: Drawing via egui shapes, and drag selection.

use eframe::{
    egui::{
        pos2, Align2, Color32, Context, FontFamily, FontId, Frame, Pos2, Rect, ScrollArea,
        Sense, Shape, Stroke, Ui, Vec2,
    },
    emath::RectTransform,
};

use crate::{
    coords::CoordMapper,
    gui::{input::SCROLL_STEP, theme::BACKGROUND_COLOR},
    render::{render, DrawSurface},
    state::State,
};

/// Draws into a list of shapes, in screen space.
pub struct EguiSurface<'a> {
    ctx: &'a Context,
    to_screen: RectTransform,
    /// The visible part of the canvas, in screen space. Shapes entirely outside it are skipped.
    visible: Rect,
    pub shapes: Vec<Shape>,
}

impl<'a> EguiSurface<'a> {
    pub fn new(ctx: &'a Context, to_screen: RectTransform, visible: Rect) -> Self {
        Self {
            ctx,
            to_screen,
            visible,
            shapes: Vec::new(),
        }
    }

    fn screen_rect(&self, rect: Rect) -> Option<Rect> {
        let rect = self.to_screen.transform_rect(rect);
        rect.intersects(self.visible).then_some(rect)
    }
}

impl DrawSurface for EguiSurface<'_> {
    fn clear(&mut self, color: Color32) {
        self.shapes
            .push(Shape::rect_filled(*self.to_screen.to(), 0., color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        if let Some(rect) = self.screen_rect(rect) {
            self.shapes.push(Shape::rect_filled(rect, 0., color));
        }
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color32) {
        if let Some(rect) = self.screen_rect(rect) {
            self.shapes
                .push(Shape::rect_stroke(rect, 0., Stroke::new(width, color)));
        }
    }

    fn dashed_rect(&mut self, rect: Rect, width: f32, color: Color32, dash: f32, gap: f32) {
        let Some(rect) = self.screen_rect(rect) else {
            return;
        };

        let points = [
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
            rect.left_top(),
        ];
        self.shapes.extend(Shape::dashed_line(
            &points,
            Stroke::new(width, color),
            dash,
            gap,
        ));
    }

    fn text(&mut self, pos: Pos2, text: &str, size: f32, color: Color32) {
        let pos = self.to_screen * pos;
        // Rough bounds; enough to skip text far off-screen.
        let bounds = Rect::from_min_max(
            pos2(pos.x, pos.y - size),
            pos2(pos.x + size * text.len() as f32, pos.y),
        );
        if !bounds.intersects(self.visible) {
            return;
        }

        let shape = self.ctx.fonts(|fonts| {
            Shape::text(
                fonts,
                pos,
                Align2::LEFT_BOTTOM,
                text,
                FontId::new(size, FontFamily::Monospace),
                color,
            )
        });
        self.shapes.push(shape);
    }
}

/// Handle dragging, clicking, and hovering on the canvas. `to_canvas` converts a screen position.
fn handle_pointer(
    state: &mut State,
    response: &eframe::egui::Response,
    to_canvas: impl Fn(Pos2) -> Pos2,
) {
    state.ui.cursor_pos = response.hover_pos().map(&to_canvas);

    let Some(pos) = response.interact_pointer_pos().map(&to_canvas) else {
        return;
    };

    if response.drag_started() {
        // Drags only register past a movement threshold; anchor at where the button went down.
        let origin = response
            .ctx
            .input(|i| i.pointer.press_origin())
            .map(&to_canvas)
            .unwrap_or(pos);
        state.begin_drag(origin);
        state.update_drag(pos);
    } else if response.dragged() {
        state.update_drag(pos);
    }

    if response.drag_stopped() {
        state.end_drag(pos);
    } else if response.clicked() {
        // A click without movement selects a single cell.
        state.begin_drag(pos);
        state.end_drag(pos);
    }
}

pub fn canvas(state: &mut State, ui: &mut Ui) {
    state.ui.canvas_width_avail = ui.available_width();
    let canvas_size = state.canvas_size();

    let mut area = ScrollArea::both().id_salt("msa_canvas");
    if state.ui.scroll_pending {
        area = area.vertical_scroll_offset(state.ui.scroll_offset);
        state.ui.scroll_pending = false;
    }

    let output = area.show(ui, |ui| {
        Frame::canvas(ui.style())
            .fill(BACKGROUND_COLOR)
            .show(ui, |ui| {
                let (response, _painter) = ui.allocate_painter(canvas_size, Sense::click_and_drag());

                let to_screen = RectTransform::from_to(
                    Rect::from_min_size(Pos2::ZERO, response.rect.size()),
                    response.rect,
                );

                let viewport = ui.clip_rect();
                let scroll: Vec2 = viewport.min - response.rect.min;
                handle_pointer(state, &response, |p| {
                    CoordMapper::viewport_to_canvas((p - viewport.min).to_pos2(), scroll)
                });

                let Some(alignment) = &state.alignment else {
                    return;
                };

                let mut surface = EguiSurface::new(ui.ctx(), to_screen, viewport);
                render(
                    &mut surface,
                    alignment,
                    &state.mapper,
                    state.annotations.list(),
                    state.ui.selection,
                    state.ui.color_scheme,
                    &state.ui.theme,
                );

                ui.painter().extend(surface.shapes);
            });
    });

    state.ui.scroll_offset = output.state.offset.y;
    state.ui.viewport_height = output.inner_rect.height();
}

/// Up/down buttons, for long alignments.
pub fn scroll_controls(state: &mut State, ui: &mut Ui) {
    ui.horizontal(|ui| {
        if ui.button("⏶").on_hover_text("Scroll up").clicked() {
            state.scroll_by(-SCROLL_STEP, state.ui.viewport_height);
        }
        ui.label(format!("Scroll: {}%", state.scroll_percent()));
        if ui.button("⏷").on_hover_text("Scroll down").clicked() {
            state.scroll_by(SCROLL_STEP, state.ui.viewport_height);
        }
    });
}


#[cfg(test)]
mod tests {
    use eframe::egui::{
        pos2, vec2, CentralPanel, Event, Modifiers, PointerButton, RawInput, Rect,
    };

    use super::*;

    fn frame(ctx: &Context, state: &mut State, time: f64, events: Vec<Event>) {
        let input = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(1_200., 900.))),
            time: Some(time),
            events,
            ..Default::default()
        };

        let _ = ctx.run(input, |ctx| {
            CentralPanel::default().show(ctx, |ui| canvas(state, ui));
        });
    }

    fn button(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn drag_selection_starts_at_press() {
        let ctx = Context::default();
        let mut state = State::default();
        state.load_sample().unwrap();

        let press = pos2(400., 300.);
        let release = press + vec2(80., 0.);

        frame(&ctx, &mut state, 0., vec![]);
        frame(&ctx, &mut state, 0.1, vec![Event::PointerMoved(press)]);
        frame(&ctx, &mut state, 0.2, vec![button(press, true)]);
        frame(&ctx, &mut state, 0.3, vec![Event::PointerMoved(release)]);
        frame(&ctx, &mut state, 0.4, vec![button(release, false)]);

        let selection = state.ui.selection.unwrap();
        assert!((selection.width() - 80.).abs() < 0.01, "{selection:?}");
        assert_eq!(selection.height(), 0.);
        assert!(state.ui.drag_start.is_none());
    }
}
