//! Visualization utilities for rrt_planning
//!
//! Collects obstacles, tree edges and paths as plot layers and renders them
//! with gnuplot. The planners never depend on this module.

use gnuplot::{Figure, Caption, Color, PointSymbol, PointSize, LineWidth, AxesCommon, AutoOption, PlotOption};
use crate::common::{Point2D, Path2D, RectObstacle, RrtError, RrtResult, SamplingBasedPlanner};

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00AA00";
    pub const BLUE: &str = "#0000FF";
    pub const GRAY: &str = "#B0B0B0";
    pub const PURPLE: &str = "#BF00FF";
    pub const GOLD: &str = "#E0B000";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const TREE: &str = GRAY;
    pub const RRT: &str = GOLD;
    pub const RRT_STAR: &str = GREEN;
    pub const RRT_CONNECT: &str = PURPLE;
    pub const RRT_OPTIMIZED: &str = RED;
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            color: colors::RED.to_string(),
            line_width: 2.0,
            caption: "Path".to_string(),
        }
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }
}

#[derive(Debug, Clone)]
enum Layer {
    Lines {
        x: Vec<f64>,
        y: Vec<f64>,
        color: String,
        width: f64,
        caption: Option<String>,
    },
    Points {
        x: Vec<f64>,
        y: Vec<f64>,
        style: PointStyle,
    },
}

/// Flatten disjoint segments into one polyline, separated by NaN breaks
fn segments_to_xy<I>(segments: I) -> (Vec<f64>, Vec<f64>)
where
    I: IntoIterator<Item = (Point2D, Point2D)>,
{
    let mut x = Vec::new();
    let mut y = Vec::new();
    for (a, b) in segments {
        x.extend_from_slice(&[a.x, b.x, f64::NAN]);
        y.extend_from_slice(&[a.y, b.y, f64::NAN]);
    }
    (x, y)
}

/// Main visualizer struct
pub struct Visualizer {
    layers: Vec<Layer>,
    title: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            title: String::new(),
            x_range: None,
            y_range: None,
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Number of layers queued for rendering
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Plot rectangle outlines
    pub fn plot_obstacles(&mut self, obstacles: &[RectObstacle]) -> &mut Self {
        let (x, y) = segments_to_xy(obstacles.iter().flat_map(|o| o.edges().to_vec()));
        self.layers.push(Layer::Lines {
            x,
            y,
            color: colors::OBSTACLE.to_string(),
            width: 1.5,
            caption: Some("Obstacles".to_string()),
        });
        self
    }

    /// Plot tree edges as thin uncaptioned segments
    pub fn plot_tree(&mut self, edges: &[(Point2D, Point2D)], color: &str) -> &mut Self {
        let (x, y) = segments_to_xy(edges.iter().copied());
        self.layers.push(Layer::Lines {
            x,
            y,
            color: color.to_string(),
            width: 0.5,
            caption: None,
        });
        self
    }

    pub fn plot_path(&mut self, path: &Path2D, style: &PathStyle) -> &mut Self {
        self.layers.push(Layer::Lines {
            x: path.x_coords(),
            y: path.y_coords(),
            color: style.color.clone(),
            width: style.line_width,
            caption: Some(style.caption.clone()),
        });
        self
    }

    pub fn plot_point(&mut self, point: Point2D, style: &PointStyle) -> &mut Self {
        self.layers.push(Layer::Points {
            x: vec![point.x],
            y: vec![point.y],
            style: style.clone(),
        });
        self
    }

    pub fn plot_start(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::START, "Start").with_size(1.5))
    }

    pub fn plot_goal(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::GOAL, "Goal").with_size(1.5))
    }

    /// Tree edges (optional) and resulting path of a planner
    pub fn plot_planner(&mut self, planner: &dyn SamplingBasedPlanner, color: &str, with_tree: bool) -> &mut Self {
        if with_tree {
            self.plot_tree(&planner.tree_edges(), colors::TREE);
        }
        if !planner.path().is_empty() {
            let caption = format!("{} ({:.1})", planner.name(), planner.path_distance());
            self.plot_path(planner.path(), &PathStyle::new(color, &caption));
        }
        self
    }

    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> RrtResult<()> {
        let mut figure = self.render();
        figure.save_to_png(path, width, height).map_err(|e| RrtError::VisualizationError(e.to_string()))
    }

    fn render(&self) -> Figure {
        let mut figure = Figure::new();
        let axes = figure.axes2d();

        for layer in &self.layers {
            match layer {
                Layer::Lines { x, y, color, width, caption } => {
                    let mut options: Vec<PlotOption<&str>> = vec![Color(color.as_str()), LineWidth(*width)];
                    if let Some(caption) = caption {
                        options.push(Caption(caption.as_str()));
                    }
                    axes.lines(x, y, &options);
                }
                Layer::Points { x, y, style } => {
                    axes.points(x, y, &[
                        Caption(style.caption.as_str()),
                        Color(style.color.as_str()),
                        PointSymbol(style.symbol),
                        PointSize(style.size),
                    ]);
                }
            }
        }

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label("X", &[]);
        axes.set_y_label("Y", &[]);
        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        axes.set_aspect_ratio(AutoOption::Fix(1.0));

        figure
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_to_xy_breaks_between_segments() {
        let (x, y) = segments_to_xy(vec![
            (Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)),
            (Point2D::new(2.0, 2.0), Point2D::new(3.0, 3.0)),
        ]);
        assert_eq!(x.len(), 6);
        assert_eq!(y.len(), 6);
        assert!(x[2].is_nan() && y[5].is_nan());
        assert_eq!(x[3], 2.0);
    }

    #[test]
    fn test_visualizer_collects_layers() {
        let mut vis = Visualizer::new();
        vis.set_title("RRT")
            .plot_obstacles(&[RectObstacle::new(0.0, 0.0, 10.0, 10.0)])
            .plot_start(Point2D::new(1.0, 1.0))
            .plot_goal(Point2D::new(9.0, 9.0))
            .plot_path(&Path2D::from_xy(&[1.0, 9.0], &[1.0, 9.0]), &PathStyle::default());
        assert_eq!(vis.layer_count(), 4);
    }

    #[test]
    fn test_path_style() {
        let style = PathStyle::new(colors::RED, "Test Path")
            .with_line_width(3.0);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.color, colors::RED);
    }
}
