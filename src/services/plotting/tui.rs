//! Use the tui crate to draw plots directly on the terminal
use super::{DataPlottingService, DataSeries, Plot, SeriesStyle};
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::Error;
use log::warn;
use std::cmp::max;
use std::io;
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Chart, Dataset, GraphType},
    Terminal,
};

/// Colors of the series drawn after the first one, repeated if there are more
static SERIES_COLORS: [Color; 3] = [Color::Red, Color::Red, Color::Yellow];

/// Draws plots on the terminal the program runs in
#[derive(Debug)]
pub struct TerminalPlotter {
    /// number of labels on the x axis
    x_ticks: usize,
    /// color of the first data series
    line_color: Color,
}

impl Default for TerminalPlotter {
    fn default() -> Self {
        TerminalPlotter {
            x_ticks: 5,
            line_color: Color::Cyan,
        }
    }
}

impl FromServiceConfig for TerminalPlotter {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error> {
        let mut base = Self::default();
        for key in config.parameters() {
            match key.as_ref() {
                "x_ticks" => {
                    if let Some(val) = config.get_parameter_as_i64(key) {
                        base.x_ticks = max(val?, 1) as usize;
                    }
                }
                "line_color" => {
                    if let Some(val) = config.get_parameter_as_string(key) {
                        base.line_color = parse_color(&val?)?;
                    }
                }
                _ => warn!(
                    "unknown configuration parameter for TerminalPlotter: {}={:?}",
                    key,
                    config.get_parameter(key)
                ),
            }
        }
        Ok(base)
    }
}

fn parse_color(name: &str) -> Result<Color, Error> {
    match name.to_ascii_lowercase().as_str() {
        "cyan" => Ok(Color::Cyan),
        "red" => Ok(Color::Red),
        "green" => Ok(Color::Green),
        "yellow" => Ok(Color::Yellow),
        "blue" => Ok(Color::Blue),
        "magenta" => Ok(Color::Magenta),
        "white" => Ok(Color::White),
        "gray" | "grey" => Ok(Color::Gray),
        _ => Err(Error::InvalidConfigurationValue(format!(
            "invalid value for tui.line_color, unknown color: {}",
            name
        ))),
    }
}

fn graph_type(series: &DataSeries) -> GraphType {
    match series.style() {
        SeriesStyle::Line => GraphType::Line,
        SeriesStyle::Points => GraphType::Scatter,
    }
}

/// Axis bounds covering every point of every series, always including 0
fn plot_bounds(plot: &Plot) -> ([f64; 2], [f64; 2]) {
    let mut x_min = 0f64;
    let mut x_max = 1f64;
    let mut y_min = 0f64;
    let mut y_max = 1f64;
    for series in plot.series() {
        for (x, y) in series {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    ([x_min, x_max], [y_min, y_max * 1.1])
}

impl DataPlottingService for TerminalPlotter {
    fn plot(&self, plots: &[&Plot]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        terminal.clear()?;
        terminal.draw(|f| {
            let constraints = vec![Constraint::Ratio(1, plots.len() as u32); plots.len()];
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints(constraints)
                .split(f.size());
            let y_nticks = max(2, 7 - plots.len().min(5)); // reduce ticks if less vertical space
            for (chunk, plot) in chunks.into_iter().zip(plots) {
                let datasets = plot
                    .series()
                    .iter()
                    .enumerate()
                    .map(|(i, s)| {
                        let color = if i == 0 {
                            self.line_color
                        } else {
                            SERIES_COLORS[(i - 1) % SERIES_COLORS.len()]
                        };
                        Dataset::default()
                            .name(s.name())
                            .marker(symbols::Marker::Braille)
                            .graph_type(graph_type(s))
                            .style(Style::default().fg(color))
                            .data(s.data())
                    })
                    .collect();
                let ([x_min, x_max], [y_min, y_max]) = plot_bounds(plot);
                let x_ticks = self.x_ticks;
                let chart = Chart::new(datasets)
                    .block(Block::default().title(plot.title()))
                    .x_axis(
                        Axis::default()
                            .title(Span::styled(plot.x(), Style::default().fg(Color::Red)))
                            .style(Style::default().fg(Color::White))
                            .bounds([x_min, x_max])
                            .labels(
                                (0..=x_ticks)
                                    .map(|n| {
                                        Span::from(format!(
                                            "{:.1}",
                                            x_min + (x_max - x_min) * (n as f64 / x_ticks as f64)
                                        ))
                                    })
                                    .collect(),
                            ),
                    )
                    .y_axis(
                        Axis::default()
                            .title(Span::styled(plot.y(), Style::default().fg(Color::Red)))
                            .style(Style::default().fg(Color::White))
                            .bounds([y_min, y_max])
                            .labels(
                                (0..=y_nticks)
                                    .map(|n| {
                                        Span::from(format!(
                                            "{:.2}",
                                            y_min + (y_max - y_min) * (n as f64 / y_nticks as f64)
                                        ))
                                    })
                                    .collect(),
                            ),
                    );
                f.render_widget(chart, chunk);
            }
        })?;

        // we plot to the terminal so there isn't anything to return
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_parameters() {
        let yaml = "handler: tui\nconfiguration:\n  x_ticks: 8\n  line_color: Yellow\n";
        let cfg: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
        let plotter = TerminalPlotter::from_config(&cfg).unwrap();
        assert_eq!(plotter.x_ticks, 8);
        assert_eq!(plotter.line_color, Color::Yellow);
    }

    #[test]
    fn unknown_color_is_rejected() {
        let yaml = "handler: tui\nconfiguration:\n  line_color: ultraviolet\n";
        let cfg: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            TerminalPlotter::from_config(&cfg),
            Err(Error::InvalidConfigurationValue(_))
        ));
    }

    #[test]
    fn graph_type_follows_series_style() {
        let data = vec![(0.0, 0.0), (10.0, 0.0)];
        assert_eq!(graph_type(&DataSeries::points("tp", &data)), GraphType::Scatter);
        assert_eq!(graph_type(&DataSeries::new("zone", &data)), GraphType::Line);
    }

    #[test]
    fn bounds_cover_all_series() {
        let weights = vec![(0.0, 0.0), (50.0, 0.9), (120.0, 0.0)];
        let marker = vec![(-5.0, 0.0), (-5.0, 2.0)];
        let mut plot = Plot::new("t".to_string(), "x".to_string(), "y".to_string());
        plot.add_series(DataSeries::new("w", &weights));
        plot.add_series(DataSeries::new("m", &marker));
        let (x, y) = plot_bounds(&plot);
        assert_eq!(x, [-5.0, 120.0]);
        assert_eq!(y[0], 0.0);
        assert!((y[1] - 2.2).abs() < 1e-9);
    }
}
