use iced::widget::canvas::{self, Path, Stroke};
use iced::widget::container;
use iced::{Color, Element, Length, Point, Rectangle, Size, Theme, mouse};
use trimline_engine::{CollapseKind, Edge, Intent, TimelineView};

const TRACK_HEIGHT: f32 = 88.0;
const DETAIL_HEIGHT: f32 = 28.0;
const STRIP_TOP: f32 = DETAIL_HEIGHT + 6.0;

/// Pointer input from the timeline canvas, in track pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineInput {
    Pressed { x: f64, width: f64 },
    Moved { x: f64, width: f64 },
    Released,
}

/// Converts an absolute cursor x coordinate into track space.
///
/// Positions left of the track are negative and positions past its right
/// edge exceed the width; overshoot gestures rely on both.
pub fn track_x(cursor_x: f32, bounds_x: f32) -> f64 {
    f64::from(cursor_x - bounds_x)
}

/// Blend score of the handle on `edge` of segment `index`.
fn handle_blend(blends: &[f64], index: usize, edge: Edge) -> f64 {
    let pair = match edge {
        Edge::Start => index.checked_sub(1),
        Edge::End => Some(index),
    };
    pair.and_then(|pair| blends.get(pair)).copied().unwrap_or(0.0)
}

/// Handle colour, shifting from white towards amber as handles converge.
fn handle_color(blend: f64) -> Color {
    let t = blend.clamp(0.0, 1.0) as f32;
    Color::from_rgb(1.0, 1.0 - 0.25 * t, 1.0 - 0.8 * t)
}

const DELETE_COLOR: Color = Color::from_rgb(232.0 / 255.0, 84.0 / 255.0, 72.0 / 255.0);
const MERGE_COLOR: Color = Color::from_rgb(96.0 / 255.0, 200.0 / 255.0, 120.0 / 255.0);

/// Carpet colour for a live intent, or for the collapse it turned into.
fn carpet_color(intent: Option<&Intent>, collapsing: Option<&CollapseKind>) -> Color {
    match (intent, collapsing) {
        (Some(Intent::Delete(_)), _) | (None, Some(CollapseKind::Delete { .. })) => DELETE_COLOR,
        (Some(Intent::Merge(_)), _) | (None, Some(CollapseKind::Merge { .. })) => MERGE_COLOR,
        (None, None) => Color::from_rgb8(200, 200, 210),
    }
}

fn with_alpha(color: Color, alpha: f64) -> Color {
    Color {
        a: alpha.clamp(0.0, 1.0) as f32,
        ..color
    }
}

#[derive(Debug, Default)]
struct TimelineState {
    dragging: bool,
}

struct TimelineProgram<'a, Message> {
    view: TimelineView<'a, Color>,
    playhead: f64,
    on_input: fn(TimelineInput) -> Message,
}

impl<Message> canvas::Program<Message> for TimelineProgram<'_, Message> {
    type State = TimelineState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if self.view.geometry.duration <= 0.0 {
            return (canvas::event::Status::Ignored, None);
        }

        let width = f64::from(bounds.width);
        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (canvas::event::Status::Ignored, None);
                };
                state.dragging = true;
                let input = TimelineInput::Pressed {
                    x: f64::from(position.x),
                    width,
                };
                (canvas::event::Status::Captured, Some((self.on_input)(input)))
            }
            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) if state.dragging => {
                let input = TimelineInput::Moved {
                    x: track_x(position.x, bounds.x),
                    width,
                };
                (canvas::event::Status::Captured, Some((self.on_input)(input)))
            }
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
                if state.dragging =>
            {
                state.dragging = false;
                (
                    canvas::event::Status::Captured,
                    Some((self.on_input)(TimelineInput::Released)),
                )
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let background = Path::rectangle(Point::ORIGIN, frame.size());
        frame.fill(&background, Color::from_rgb8(22, 24, 29));

        let strip_height = (bounds.height - STRIP_TOP - 6.0).max(1.0);
        if !self.view.thumbnails.is_empty() {
            let swatch_width = bounds.width / self.view.thumbnails.len() as f32;
            for (index, color) in self.view.thumbnails.iter().enumerate() {
                frame.fill_rectangle(
                    Point::new(index as f32 * swatch_width, STRIP_TOP),
                    Size::new(swatch_width, strip_height),
                    with_alpha(*color, 0.35),
                );
            }
        }

        for (index, strip) in self.view.segments.iter().enumerate() {
            let fill = if strip.active {
                Color::from_rgb8(55, 110, 188)
            } else {
                Color::from_rgb8(90, 94, 104)
            };
            frame.fill_rectangle(
                Point::new(strip.x as f32, STRIP_TOP),
                Size::new((strip.width as f32).max(1.0), strip_height),
                with_alpha(fill, 0.8 * strip.opacity),
            );
            for (edge, x) in [(Edge::Start, strip.x), (Edge::End, strip.x + strip.width)] {
                let line = Path::line(
                    Point::new(x as f32, STRIP_TOP),
                    Point::new(x as f32, STRIP_TOP + strip_height),
                );
                let color = handle_color(handle_blend(&self.view.blends, index, edge));
                frame.stroke(
                    &line,
                    Stroke::default()
                        .with_width(3.0)
                        .with_color(with_alpha(color, strip.opacity)),
                );
            }
        }

        if let Some(carpet) = self.view.carpet {
            frame.fill_rectangle(
                Point::new(carpet.left_px as f32, STRIP_TOP),
                Size::new(carpet.width_px as f32, strip_height),
                with_alpha(
                    carpet_color(self.view.intent.as_ref(), self.view.collapsing.as_ref()),
                    0.6 * carpet.opacity,
                ),
            );
        }
        if let Some(intent) = &self.view.intent {
            let x = intent.overshoot().cursor_px as f32;
            let line = Path::line(
                Point::new(x, STRIP_TOP),
                Point::new(x, STRIP_TOP + strip_height),
            );
            frame.stroke(
                &line,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(carpet_color(Some(intent), None)),
            );
        }

        if let Some(detail) = &self.view.detail {
            frame.fill_rectangle(
                Point::ORIGIN,
                Size::new(bounds.width, DETAIL_HEIGHT),
                Color::from_rgb8(34, 37, 44),
            );
            if let Some(thumbnails) = detail.thumbnails.filter(|thumbnails| !thumbnails.is_empty()) {
                let swatch_width = bounds.width / thumbnails.len() as f32;
                for (index, color) in thumbnails.iter().enumerate() {
                    frame.fill_rectangle(
                        Point::new(index as f32 * swatch_width, 2.0),
                        Size::new(swatch_width, DETAIL_HEIGHT - 4.0),
                        with_alpha(*color, 0.7),
                    );
                }
            }
            let x = detail.handle_x as f32;
            let line = Path::line(Point::new(x, 0.0), Point::new(x, DETAIL_HEIGHT));
            frame.stroke(
                &line,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(Color::from_rgb8(255, 210, 90)),
            );
        }

        let x = self.view.geometry.time_to_px(self.playhead) as f32;
        let line = Path::line(Point::new(x, STRIP_TOP), Point::new(x, bounds.height));
        frame.stroke(
            &line,
            Stroke::default()
                .with_width(2.0)
                .with_color(Color::from_rgb8(255, 94, 77)),
        );

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.dragging {
            mouse::Interaction::Grabbing
        } else if self.view.geometry.duration > 0.0 && cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::None
        }
    }
}

/// Renders the interactive timeline canvas.
pub fn view<'a, Message>(
    view: TimelineView<'a, Color>,
    playhead: f64,
    on_input: fn(TimelineInput) -> Message,
) -> Element<'a, Message>
where
    Message: 'a,
{
    container(
        canvas::Canvas::new(TimelineProgram {
            view,
            playhead,
            on_input,
        })
        .width(Length::Fill)
        .height(Length::Fixed(TRACK_HEIGHT)),
    )
    .width(Length::Fill)
    .into()
}
