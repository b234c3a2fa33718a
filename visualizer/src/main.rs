use std::{io::Write, path::Path, thread, time::Duration};

use anyhow::{bail, Context};
use log::{info, warn};
use pathgrid::{Algorithm, Comparison, GraphAlgorithm, Grid, Panel, RunEvent, RunReport};

mod config;
mod render;

use config::{Settings, USAGE};
use render::{side_by_side, Canvas, CLEAR_SCREEN};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(settings) = Settings::from_args(&args)? else {
        print!("{}", USAGE);
        return Ok(());
    };

    if let Some(path) = &settings.graph {
        return run_graph(&settings, path);
    }

    let grid = settings.load_grid()?;
    info!(
        "grid {}x{} with {} walls, start {} end {}",
        grid.columns(),
        grid.rows(),
        grid.wall_count(),
        grid.start(),
        grid.end()
    );

    let primary: Algorithm = settings.algorithm.parse()?;
    let reports = match &settings.compare_with {
        Some(name) => compare(&settings, grid, primary, name.parse()?)?,
        None => vec![run_single(&settings, grid, primary)?],
    };

    for report in &reports {
        if report.found() {
            info!("{}", render::status_line(report));
        } else {
            warn!("{}", render::status_line(report));
        }
    }

    let json = match reports.as_slice() {
        [report] => serde_json::to_string_pretty(report)?,
        all => serde_json::to_string_pretty(all)?,
    };
    println!("{}", json);

    Ok(())
}

fn run_graph(settings: &Settings, path: &Path) -> anyhow::Result<()> {
    let algorithm: GraphAlgorithm = settings.graph_algorithm.parse()?;
    let request = config::load_graph_request(path)?;
    info!(
        "graph with {} nodes, {} from {} to {}",
        request.graph.node_count(),
        algorithm,
        request.start,
        request.end
    );

    let nodes = request.solve(algorithm)?;
    if nodes.is_empty() {
        warn!("{}: no path found", algorithm);
    } else {
        info!("{}: path of {} nodes", algorithm, nodes.len());
    }

    let json = serde_json::json!({
        "algorithm": algorithm.slug(),
        "path": nodes,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn run_single(settings: &Settings, grid: Grid, algorithm: Algorithm) -> anyhow::Result<RunReport> {
    let mut panel = Panel::new(grid);
    let mut canvas = Canvas::new(algorithm.to_string());
    panel.start_run(algorithm)?;

    let report = loop {
        let Some(event) = panel.step() else {
            bail!("{} stopped without a report", algorithm.name());
        };
        let changed = canvas.apply(&event);
        if let RunEvent::Finished(report) = event {
            break report;
        }
        if settings.animate && changed {
            show(settings, &canvas.frame(panel.grid()).to_string())?;
            pause(settings.step_delay_ms);
        }
    };

    for &p in report.path.iter().flatten() {
        canvas.mark_path(p);
        if settings.animate {
            show(settings, &canvas.frame(panel.grid()).to_string())?;
            pause(settings.path_delay_ms);
        }
    }
    show(settings, &canvas.frame(panel.grid()).to_string())?;

    Ok(report)
}

fn compare(
    settings: &Settings,
    grid: Grid,
    left: Algorithm,
    right: Algorithm,
) -> anyhow::Result<Vec<RunReport>> {
    let mut comparison = Comparison::mirrored(grid);
    let mut canvases = [Canvas::new(left.to_string()), Canvas::new(right.to_string())];
    let draw = |comparison: &Comparison, canvases: &[Canvas; 2]| {
        side_by_side(
            &canvases[0].frame(comparison.left().grid()),
            &canvases[1].frame(comparison.right().grid()),
        )
    };

    comparison.start(left, right)?;

    let mut finished = [None, None];
    while comparison.is_running() {
        let mut changed = false;
        for ((event, canvas), report) in comparison
            .step()
            .into_iter()
            .zip(&mut canvases)
            .zip(&mut finished)
        {
            let Some(event) = event else { continue };
            changed |= canvas.apply(&event);
            if let RunEvent::Finished(r) = event {
                *report = Some(r);
            }
        }
        if settings.animate && changed {
            show(settings, &draw(&comparison, &canvases))?;
            pause(settings.step_delay_ms);
        }
    }

    let reports = finished
        .into_iter()
        .map(|r| r.context("comparison run stopped without a report"))
        .collect::<anyhow::Result<Vec<_>>>()?;

    // both paths are drawn together, the shorter one simply stops growing
    let longest = reports.iter().map(|r| r.path_length).max().unwrap_or(0);
    for i in 0..longest {
        for (canvas, report) in canvases.iter_mut().zip(&reports) {
            if let Some(&p) = report.path.as_ref().and_then(|path| path.get(i)) {
                canvas.mark_path(p);
            }
        }
        if settings.animate {
            show(settings, &draw(&comparison, &canvases))?;
            pause(settings.path_delay_ms);
        }
    }
    show(settings, &draw(&comparison, &canvases))?;

    Ok(reports)
}

fn show(settings: &Settings, frame: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    if settings.animate {
        write!(stdout, "{}", CLEAR_SCREEN)?;
    }
    write!(stdout, "{}", frame)?;
    stdout.flush()?;
    Ok(())
}

fn pause(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}
