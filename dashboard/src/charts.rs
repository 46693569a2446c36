use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Point, Rectangle, Renderer, Theme,
};
use std::f32::consts::PI;
use vibecore::aggregate::{radar_axes, DashboardSummary, DistributionSlice, ScorePoint};
use vibecore::analysis::Sentiment;

use crate::Message;

const BACKGROUND: Color = Color::from_rgb(0.05, 0.05, 0.07);
const GRID: Color = Color::from_rgb(0.25, 0.25, 0.3);
pub const ACCENT: Color = Color::from_rgb(0.75, 0.52, 0.99);

pub fn sentiment_color(sentiment: Sentiment) -> Color {
    match sentiment {
        Sentiment::Positive => Color::from_rgb(0.29, 0.87, 0.5),
        Sentiment::Negative => Color::from_rgb(0.97, 0.44, 0.44),
        Sentiment::Neutral => Color::from_rgb(0.64, 0.64, 0.64),
    }
}

/// Ring chart of the sentiment distribution. The selected slice is drawn at
/// full strength and the rest dimmed.
#[derive(Clone)]
pub struct DonutChart {
    slices: Vec<DistributionSlice>,
    selected: Option<Sentiment>,
}

impl DonutChart {
    pub fn new(slices: &[DistributionSlice], selected: Option<Sentiment>) -> Self {
        Self {
            slices: slices.to_vec(),
            selected,
        }
    }
}

impl canvas::Program<Message> for DonutChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);

        let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        let outer = bounds.width.min(bounds.height) / 2.0 - 12.0;
        let inner = outer * 0.6;
        let total: usize = self.slices.iter().map(|slice| slice.value).sum();

        if total == 0 || outer <= 0.0 {
            let ring = Path::new(|builder| builder.circle(center, outer.max(1.0)));
            frame.stroke(&ring, Stroke::default().with_color(GRID).with_width(2.0));
            return vec![frame.into_geometry()];
        }

        let mut start = -PI / 2.0;
        for slice in &self.slices {
            if slice.value == 0 {
                continue;
            }
            let sweep = slice.value as f32 / total as f32 * 2.0 * PI;
            let sentiment = slice.sentiment().unwrap_or(Sentiment::Neutral);
            let mut color = sentiment_color(sentiment);
            if self.selected.is_some_and(|selected| selected != sentiment) {
                color.a = 0.3;
            }
            let wedge = ring_segment(center, inner, outer, start, sweep);
            frame.fill(&wedge, color);
            start += sweep;
        }

        vec![frame.into_geometry()]
    }
}

/// Polygonal ring segment from `start` sweeping `sweep` radians.
fn ring_segment(center: Point, inner: f32, outer: f32, start: f32, sweep: f32) -> Path {
    let steps = ((sweep / (2.0 * PI)) * 96.0).ceil().max(2.0) as usize;
    let at = |radius: f32, angle: f32| {
        Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    };
    Path::new(|builder| {
        builder.move_to(at(outer, start));
        for step in 1..=steps {
            let angle = start + sweep * step as f32 / steps as f32;
            builder.line_to(at(outer, angle));
        }
        for step in (0..=steps).rev() {
            let angle = start + sweep * step as f32 / steps as f32;
            builder.line_to(at(inner, angle));
        }
        builder.close();
    })
}

/// One bar per result, height = confidence percent.
#[derive(Clone)]
pub struct ConfidenceBars {
    scores: Vec<ScorePoint>,
}

impl ConfidenceBars {
    pub fn new(scores: &[ScorePoint]) -> Self {
        Self {
            scores: scores.to_vec(),
        }
    }
}

impl canvas::Program<Message> for ConfidenceBars {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);

        for quarter in 1..=4 {
            let y = bounds.height - bounds.height * quarter as f32 / 4.0;
            let line = Path::line(Point::new(0.0, y), Point::new(bounds.width, y));
            frame.stroke(&line, Stroke::default().with_color(GRID).with_width(1.0));
        }

        if !self.scores.is_empty() {
            let slot = bounds.width / self.scores.len() as f32;
            let bar_width = (slot * 0.7).max(1.0);
            for (idx, point) in self.scores.iter().enumerate() {
                let value = (point.confidence / 100.0).clamp(0.0, 1.0) as f32;
                let height = value * bounds.height;
                let x = idx as f32 * slot + (slot - bar_width) / 2.0;
                frame.fill_rectangle(
                    Point::new(x, bounds.height - height),
                    iced::Size::new(bar_width, height),
                    ACCENT,
                );
            }
        }

        vec![frame.into_geometry()]
    }
}

/// Four-axis radar of the sentiment shares and average confidence.
#[derive(Clone)]
pub struct RadarChart {
    values: [f32; 4],
}

impl RadarChart {
    pub fn new(summary: &DashboardSummary) -> Self {
        let axes = radar_axes(summary);
        let mut values = [0.0; 4];
        for (slot, axis) in values.iter_mut().zip(axes.iter()) {
            *slot = (axis.value / axis.full_mark).clamp(0.0, 1.0) as f32;
        }
        Self { values }
    }
}

impl canvas::Program<Message> for RadarChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);

        let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        let radius = bounds.width.min(bounds.height) / 2.0 - 12.0;
        let count = self.values.len();
        let vertex = |idx: usize, scale: f32| {
            let angle = -PI / 2.0 + idx as f32 * 2.0 * PI / count as f32;
            Point::new(
                center.x + radius * scale * angle.cos(),
                center.y + radius * scale * angle.sin(),
            )
        };

        for ring in 1..=4 {
            let scale = ring as f32 / 4.0;
            let grid = Path::new(|builder| {
                builder.move_to(vertex(0, scale));
                for idx in 1..count {
                    builder.line_to(vertex(idx, scale));
                }
                builder.close();
            });
            frame.stroke(&grid, Stroke::default().with_color(GRID).with_width(1.0));
        }

        let spokes = Path::new(|builder| {
            for idx in 0..count {
                builder.move_to(center);
                builder.line_to(vertex(idx, 1.0));
            }
        });
        frame.stroke(&spokes, Stroke::default().with_color(GRID).with_width(1.0));

        let shape = Path::new(|builder| {
            builder.move_to(vertex(0, self.values[0]));
            for (idx, value) in self.values.iter().enumerate().skip(1) {
                builder.line_to(vertex(idx, *value));
            }
            builder.close();
        });
        frame.fill(&shape, Color { a: 0.4, ..ACCENT });
        frame.stroke(&shape, Stroke::default().with_color(ACCENT).with_width(2.0));

        vec![frame.into_geometry()]
    }
}
