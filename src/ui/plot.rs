use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, PlotUi, Points};

use product_lens::charts::Figure;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Figure plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected figure in the central panel.
pub fn figure_plot(ui: &mut Ui, state: &AppState) {
    let figure = state.figure;
    let (x_label, y_label) = figure.axis_labels();

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(figure.title());
    });

    Plot::new(("figure_plot", figure.title()))
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| match figure {
            Figure::PriceDistribution => price_distribution(plot_ui, state),
            Figure::RatingDistribution => rating_distribution(plot_ui, state),
            Figure::ReviewsVsRating => reviews_vs_rating(plot_ui, state),
        });
}

fn price_distribution(plot_ui: &mut PlotUi, state: &AppState) {
    let price = &state.charts.price;

    let bars: Vec<Bar> = price
        .bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.2} – {:.2}", bin.start, bin.end))
        })
        .collect();
    plot_ui.bar_chart(
        BarChart::new(bars)
            .color(Color32::from_rgb(70, 130, 180))
            .name("price"),
    );

    if !price.density.is_empty() {
        let line = Line::new(PlotPoints::new(price.density.clone()))
            .color(Color32::from_rgb(25, 60, 110))
            .width(2.0)
            .name("KDE");
        plot_ui.line(line);
    }
}

/// One bar per rating category, placed at 0, 1, 2, … in rating order.
fn rating_distribution(plot_ui: &mut PlotUi, state: &AppState) {
    let bars: Vec<Bar> = state
        .charts
        .ratings
        .iter()
        .enumerate()
        .map(|(i, (rating, count))| {
            Bar::new(i as f64, *count as f64)
                .width(0.8)
                .fill(state.rating_colors.color_for(rating))
                .name(format!("rating {rating}"))
        })
        .collect();
    plot_ui.bar_chart(BarChart::new(bars).name("count"));
}

fn reviews_vs_rating(plot_ui: &mut PlotUi, state: &AppState) {
    let points = Points::new(PlotPoints::new(state.charts.reviews_vs_rating.clone()))
        .radius(3.0)
        .color(Color32::from_rgb(70, 130, 180))
        .name("products");
    plot_ui.points(points);
}
