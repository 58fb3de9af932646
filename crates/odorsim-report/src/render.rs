//! Figure rendering using plotters (SVG output)
//!
//! Renders into an in-memory string; writing it anywhere is the caller's job.

use crate::figure::{Figure, HeatmapPanel, HeatmapStyle, Panel, PanelKind, ScatterPanel};
use crate::overlay::GridLine;
use anyhow::{bail, Result};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters_svg::SVGBackend;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Pixels per typographic point at the 100 dpi the figure sizes assume.
const PX_PER_POINT: f64 = 100.0 / 72.0;

/// Margin reserved for figure-level labels.
const SUP_LABEL_MARGIN: i32 = 30;

/// Render `figure` to an SVG document.
pub fn to_svg(figure: &Figure) -> Result<String> {
    if figure.panels.len() != figure.n_rows * figure.n_cols {
        bail!(
            "figure has {} panels for a {}x{} grid",
            figure.panels.len(),
            figure.n_rows,
            figure.n_cols
        );
    }
    if figure.width_ratios.len() != figure.n_cols {
        bail!(
            "figure has {} width ratios for {} columns",
            figure.width_ratios.len(),
            figure.n_cols
        );
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, figure.size).into_drawing_area();
        root.fill(&WHITE)?;
        let (width, height) = figure.size;

        let bottom = if figure.sup_xlabel.is_some() { SUP_LABEL_MARGIN } else { 5 };
        let left = if figure.sup_ylabel.is_some() { SUP_LABEL_MARGIN } else { 5 };
        if let Some(label) = &figure.sup_xlabel {
            root.draw(&Text::new(
                label.clone(),
                (width as i32 / 2 - 80, height as i32 - SUP_LABEL_MARGIN + 8),
                ("sans-serif", 16).into_font().color(&BLACK),
            ))?;
        }
        if let Some(label) = &figure.sup_ylabel {
            root.draw(&Text::new(
                label.clone(),
                (6, height as i32 / 2 + 80),
                ("sans-serif", 16)
                    .into_font()
                    .transform(FontTransform::Rotate270)
                    .color(&BLACK),
            ))?;
        }

        let grid = root.margin(5, bottom, left, 5);
        let rows = grid.split_evenly((figure.n_rows, 1));
        for (r, row_area) in rows.iter().enumerate() {
            let cells = split_by_ratios(row_area, &figure.width_ratios);
            for (c, cell) in cells.iter().enumerate() {
                draw_panel(cell, figure.panel(r, c))?;
            }
        }

        root.present()?;
    }
    debug!(
        "rendered {}x{} figure ({} panels) to {} bytes of SVG",
        figure.n_rows,
        figure.n_cols,
        figure.n_drawn(),
        svg.len()
    );
    Ok(svg)
}

/// Split an area horizontally into columns proportional to `ratios`.
fn split_by_ratios<'a>(area: &Area<'a>, ratios: &[f64]) -> Vec<Area<'a>> {
    let (width, _) = area.dim_in_pixel();
    let total: f64 = ratios.iter().sum();
    let mut out = Vec::with_capacity(ratios.len());
    let mut rest = area.clone();
    for ratio in &ratios[..ratios.len().saturating_sub(1)] {
        let px = (width as f64 * ratio / total).round() as i32;
        let (left, right) = rest.split_horizontally(px);
        out.push(left);
        rest = right;
    }
    out.push(rest);
    out
}

fn draw_panel(area: &Area<'_>, panel: &Panel) -> Result<()> {
    match &panel.kind {
        PanelKind::Blank => Ok(()),
        PanelKind::Heatmap(heatmap) => draw_heatmap(area, panel, heatmap),
        PanelKind::Scatter(scatter) => draw_scatter(area, panel, scatter),
    }
}

fn draw_heatmap(area: &Area<'_>, panel: &Panel, heatmap: &HeatmapPanel) -> Result<()> {
    let n = heatmap.matrix.nrows();
    if n == 0 {
        return Ok(());
    }
    let area = if heatmap.style.colorbar {
        let (w, _) = area.dim_in_pixel();
        let (matrix_area, bar_area) = area.split_horizontally((w as f64 * 0.88) as i32);
        draw_colorbar(&bar_area, &heatmap.style)?;
        matrix_area
    } else {
        area.clone()
    };
    let area = if heatmap.style.square {
        square_inset(&area)
    } else {
        area
    };
    let side = n as f64;

    let mut builder = ChartBuilder::on(&area);
    builder.margin(4);
    if let Some(title) = &panel.title {
        builder.caption(title, ("sans-serif", 14));
    }
    builder
        .x_label_area_size(if panel.x_label.is_some() { 18 } else { 0 })
        .y_label_area_size(if panel.y_label.is_some() { 18 } else { 0 });
    let mut chart = builder.build_cartesian_2d(0f64..side, 0f64..side)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh().x_labels(0).y_labels(0);
        if let Some(label) = &panel.x_label {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &panel.y_label {
            mesh.y_desc(label.as_str());
        }
        mesh.draw()?;
    }

    // Row 0 at the top, as in a matrix printout
    let style = heatmap.style;
    chart.draw_series(heatmap.matrix.indexed_iter().map(|((i, j), &v)| {
        let color = style.colormap.sample_range(v, style.vmin, style.vmax);
        let top = side - i as f64;
        Rectangle::new(
            [(j as f64, top - 1.0), (j as f64 + 1.0, top)],
            color.filled(),
        )
    }))?;

    for line in heatmap
        .overlay
        .iter()
        .filter(|l| l.position >= 0.0 && l.position <= side)
    {
        let p = line.position;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(p, 0.0), (p, side)],
            line_style(line),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, side - p), (side, side - p)],
            line_style(line),
        )))?;
    }
    Ok(())
}

fn draw_scatter(area: &Area<'_>, panel: &Panel, scatter: &ScatterPanel) -> Result<()> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(8).x_label_area_size(24).y_label_area_size(36);
    if let Some(title) = &panel.title {
        builder.caption(title, ("sans-serif", 14));
    }
    let (x0, x1) = scatter.x_range;
    let (y0, y1) = scatter.y_range;
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(5)
        .y_labels(5)
        .draw()?;

    let marker = scatter.marker;
    let gray = gray_level(marker.edge_gray);
    let edge = ShapeStyle {
        color: RGBColor(gray, gray, gray).mix(marker.alpha),
        filled: marker.filled,
        stroke_width: stroke_px(marker.line_width),
    };
    let radius = ((marker.size.sqrt() / 2.0) * PX_PER_POINT).round().max(1.0) as i32;
    chart.draw_series(
        scatter
            .x
            .iter()
            .zip(scatter.y.iter())
            .map(|(&x, &y)| Circle::new((x, y), radius, edge)),
    )?;
    Ok(())
}

/// Vertical color scale, vmin at the bottom.
fn draw_colorbar(area: &Area<'_>, style: &HeatmapStyle) -> Result<()> {
    const STEPS: usize = 64;
    let mut chart = ChartBuilder::on(area)
        .margin(4)
        .y_label_area_size(28)
        .build_cartesian_2d(0f64..1f64, style.vmin..style.vmax)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_labels(4)
        .draw()?;
    let step = (style.vmax - style.vmin) / STEPS as f64;
    chart.draw_series((0..STEPS).map(|k| {
        let lo = style.vmin + k as f64 * step;
        let color = style.colormap.sample_range(lo + step / 2.0, style.vmin, style.vmax);
        Rectangle::new([(0.0, lo), (1.0, lo + step)], color.filled())
    }))?;
    Ok(())
}

/// Largest centered square inside `area`.
fn square_inset<'a>(area: &Area<'a>) -> Area<'a> {
    let (w, h) = area.dim_in_pixel();
    let side = w.min(h) as i32;
    let dx = (w as i32 - side) / 2;
    let dy = (h as i32 - side) / 2;
    area.margin(dy, dy, dx, dx)
}

fn line_style(line: &GridLine) -> ShapeStyle {
    let gray = gray_level(line.gray);
    ShapeStyle {
        color: RGBColor(gray, gray, gray).to_rgba(),
        filled: false,
        stroke_width: overlay_stroke_px(line.width),
    }
}

fn gray_level(level: f64) -> u8 {
    (level.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// SVG strokes are whole pixels.
fn stroke_px(width_pt: f64) -> u32 {
    ((width_pt * PX_PER_POINT).round() as u32).max(1)
}

/// Overlay hairlines are doubled so 0.1pt and 0.5pt land on 1px and 2px.
fn overlay_stroke_px(width_pt: f64) -> u32 {
    ((width_pt * 2.0 * PX_PER_POINT).ceil() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::Colormap;
    use crate::figure::MarkerStyle;
    use crate::overlay::{overlay_lines, OverlayStyle};
    use ndarray::{array, Array2};
    use odorsim_core::OdorSetGrouping;

    #[test]
    fn test_stroke_widths() {
        assert_eq!(overlay_stroke_px(0.1), 1);
        assert_eq!(overlay_stroke_px(0.5), 2);
        assert_eq!(stroke_px(1.5), 2);
        assert_eq!(stroke_px(0.0), 1);
    }

    #[test]
    fn test_heatmap_svg() {
        let mut fig = Figure::grid(1, 1, (300, 300));
        fig.panel_mut(0, 0).kind = PanelKind::Heatmap(HeatmapPanel {
            matrix: Array2::from_shape_fn((22, 22), |(i, j)| (i as f64 - j as f64).abs() / 22.0),
            style: HeatmapStyle {
                vmin: 0.2,
                vmax: 1.1,
                colormap: Colormap::Rocket,
                square: true,
                colorbar: false,
            },
            overlay: overlay_lines(OdorSetGrouping::Tiled, &OverlayStyle::default()),
        });
        fig.panel_mut(0, 0).title = Some("L2".into());
        let svg = to_svg(&fig).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<rect"));
        assert!(svg.contains("L2"));
    }

    #[test]
    fn test_colorbar_adds_scale() {
        let mut fig = Figure::grid(1, 1, (300, 300));
        let style = HeatmapStyle {
            vmin: 0.0,
            vmax: 1.5,
            colormap: Colormap::InfernoR,
            square: true,
            colorbar: true,
        };
        fig.panel_mut(0, 0).kind = PanelKind::Heatmap(HeatmapPanel {
            matrix: Array2::from_elem((4, 4), 0.5),
            style,
            overlay: Vec::new(),
        });
        let with_bar = to_svg(&fig).unwrap();

        if let PanelKind::Heatmap(h) = &mut fig.panel_mut(0, 0).kind {
            h.style.colorbar = false;
        }
        let without_bar = to_svg(&fig).unwrap();
        assert!(with_bar.matches("<rect").count() >= without_bar.matches("<rect").count() + 64);
    }

    #[test]
    fn test_scatter_svg() {
        let mut fig = Figure::grid(1, 1, (400, 300));
        fig.panel_mut(0, 0).kind = PanelKind::Scatter(ScatterPanel {
            x: array![0.1, 0.5, 0.9],
            y: array![0.4, 0.8, 1.2],
            x_range: (0.0, 1.1),
            y_range: (0.0, 1.5),
            marker: MarkerStyle::default(),
        });
        fig.sup_xlabel = Some("Neural distance (1-r)".into());
        let svg = to_svg(&fig).unwrap();
        assert!(svg.contains("<circle"));
        assert!(svg.contains("Neural distance"));
    }

    #[test]
    fn test_inconsistent_figure_rejected() {
        let mut fig = Figure::grid(1, 2, (200, 100));
        fig.width_ratios.pop();
        assert!(to_svg(&fig).is_err());
    }
}
