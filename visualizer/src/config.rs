use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use log::debug;
use pathgrid::{
    grid::{REFERENCE_END, REFERENCE_SIZE, REFERENCE_START},
    util::{load_img, MazeResponse},
    GraphRequest, Grid, Point,
};

/// Everything the visualizer can be told, from a JSON file and the command line.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old files
pub struct Settings {
    /// Side of the empty grid used when no grid file is given
    pub grid_size: usize,
    pub start: Point,
    pub end: Point,
    /// Text, image or maze-service JSON file to load the grid from
    pub grid: Option<PathBuf>,
    pub algorithm: String,
    /// Second algorithm to run side by side on a copy of the grid
    pub compare_with: Option<String>,
    pub step_delay_ms: u64,
    pub path_delay_ms: u64,
    pub animate: bool,
    /// Weighted graph query to answer instead of running on a grid
    pub graph: Option<PathBuf>,
    pub graph_algorithm: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: REFERENCE_SIZE,
            start: REFERENCE_START,
            end: REFERENCE_END,
            grid: None,
            algorithm: "bfs".to_owned(),
            compare_with: None,
            step_delay_ms: 5,
            path_delay_ms: 10,
            animate: true,
            graph: None,
            graph_algorithm: "dijkstra".to_owned(),
        }
    }
}

pub const USAGE: &str = "\
usage: visualizer [options]

  --config <file>       read settings from a JSON file
  --grid <file>         load the grid (.txt layout, .json maze response, .png image)
  --algorithm <name>    bfs, dfs, astar, dijkstra or greedy
  --compare <name>      run a second algorithm side by side
  --size <n>            side of the empty grid when no grid file is given
  --start <x,y>         start marker for generated and image grids
  --end <x,y>           end marker for generated and image grids
  --no-animate          only print the result
  --graph <file>        answer a weighted graph query ({\"graph\", \"start\", \"end\"} JSON)
  --graph-algorithm <n> algorithm for --graph, default dijkstra
";

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings from the command line, starting from `--config` if present.
    /// Returns `None` when help was requested.
    pub fn from_args(args: &[String]) -> anyhow::Result<Option<Self>> {
        let mut settings = match option_value(args, "--config") {
            Some(path) => Self::load(Path::new(path))?,
            None => Self::default(),
        };

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            let mut value = || {
                args.next()
                    .ok_or_else(|| anyhow!("missing value for {}", arg))
            };
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "--config" => {
                    value()?;
                }
                "--grid" => settings.grid = Some(PathBuf::from(value()?)),
                "--algorithm" => settings.algorithm = value()?.clone(),
                "--compare" => settings.compare_with = Some(value()?.clone()),
                "--size" => {
                    settings.grid_size = value()?.parse().context("--size expects a number")?
                }
                "--start" => settings.start = parse_point(value()?)?,
                "--end" => settings.end = parse_point(value()?)?,
                "--no-animate" => settings.animate = false,
                "--graph" => settings.graph = Some(PathBuf::from(value()?)),
                "--graph-algorithm" => settings.graph_algorithm = value()?.clone(),
                other => bail!("unknown argument `{}`\n\n{}", other, USAGE),
            }
        }

        Ok(Some(settings))
    }

    /// Build the grid the settings describe
    pub fn load_grid(&self) -> anyhow::Result<Grid> {
        let Some(path) = &self.grid else {
            return Grid::new(self.grid_size, self.grid_size, self.start, self.end)
                .context("building the empty grid");
        };

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let grid = match extension.as_deref() {
            Some("json") => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let response: MazeResponse = serde_json::from_str(&text)
                    .with_context(|| format!("parsing maze response {}", path.display()))?;
                debug!(
                    "maze generated by `{}` in {}ms",
                    response.algorithm, response.execution_time
                );
                response.into_grid(self.start, self.end)?
            }
            Some("png" | "jpg" | "jpeg" | "bmp" | "gif") => load_img(path, self.start, self.end)
                .with_context(|| format!("loading image {}", path.display()))?,
            _ => std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?
                .parse::<Grid>()
                .with_context(|| format!("parsing grid {}", path.display()))?,
        };

        Ok(grid)
    }
}

/// Read the weighted graph query named by `--graph`
pub fn load_graph_request(path: &Path) -> anyhow::Result<GraphRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading graph query {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing graph query {}", path.display()))
}

fn option_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_point(s: &str) -> anyhow::Result<Point> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected a point as x,y, got `{}`", s))?;
    Ok(Point::new(
        x.trim().parse().context("invalid x coordinate")?,
        y.trim().parse().context("invalid y coordinate")?,
    ))
}
