//! Inline SVG candlestick charts.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use stockdash_core::dashboard::PriceHistoryPoint;

use super::theme::Palette;

const WIDTH: f64 = 320.0;
const HEIGHT: f64 = 180.0;
const PAD_X: f64 = 8.0;
const PAD_TOP: f64 = 10.0;
const PAD_BOTTOM: f64 = 22.0;
/// Share of each day's slot taken by the candle body.
const BODY_RATIO: f64 = 0.6;

struct PlotCandle {
    x: f64,
    half_w: f64,
    y_open: f64,
    y_close: f64,
    y_high: f64,
    y_low: f64,
    up: bool,
    label: String,
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn layout(points: &[PriceHistoryPoint]) -> Vec<PlotCandle> {
    let low = points.iter().map(|p| p.low).min().unwrap_or_default();
    let high = points.iter().map(|p| p.high).max().unwrap_or_default();
    let (low, high) = (to_f64(low), to_f64(high));
    let plot_h = HEIGHT - PAD_TOP - PAD_BOTTOM;
    let range = high - low;

    let y = |value: Decimal| {
        if range <= f64::EPSILON {
            PAD_TOP + plot_h / 2.0
        } else {
            PAD_TOP + (high - to_f64(value)) / range * plot_h
        }
    };

    let slot = (WIDTH - 2.0 * PAD_X) / points.len().max(1) as f64;
    points
        .iter()
        .enumerate()
        .map(|(i, p)| PlotCandle {
            x: PAD_X + slot * (i as f64 + 0.5),
            half_w: slot * BODY_RATIO / 2.0,
            y_open: y(p.open),
            y_close: y(p.close),
            y_high: y(p.high),
            y_low: y(p.low),
            up: p.is_up(),
            label: p.date.format("%m/%d").to_string(),
        })
        .collect()
}

/// Renders one candle per point. An empty series renders a placeholder.
pub fn candlestick_svg(points: &[PriceHistoryPoint], palette: &Palette) -> String {
    let mut svg = format!(
        r#"<svg class="chart" viewBox="0 0 {w} {h}" role="img" aria-label="Daily price candles" xmlns="http://www.w3.org/2000/svg"><rect width="{w}" height="{h}" fill="{bg}"/>"#,
        w = WIDTH,
        h = HEIGHT,
        bg = palette.chart_background,
    );

    if points.is_empty() {
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="12" fill="{}">No trading days in range</text></svg>"#,
            WIDTH / 2.0,
            HEIGHT / 2.0,
            palette.muted_text,
        ));
        return svg;
    }

    for c in layout(points) {
        let color = if c.up {
            palette.candle_up
        } else {
            palette.candle_down
        };
        let body_top = c.y_open.min(c.y_close);
        let body_h = (c.y_open - c.y_close).abs().max(1.0);

        svg.push_str(&format!(
            r#"<line x1="{x:.1}" y1="{hi:.1}" x2="{x:.1}" y2="{lo:.1}" stroke="{color}" stroke-width="1"/>"#,
            x = c.x,
            hi = c.y_high,
            lo = c.y_low,
            color = color,
        ));
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            c.x - c.half_w,
            body_top,
            c.half_w * 2.0,
            body_h,
            color,
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="9" fill="{}">{}</text>"#,
            c.x,
            HEIGHT - 6.0,
            palette.muted_text,
            c.label,
        ));
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Theme;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn point(day: u32, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> PriceHistoryPoint {
        PriceHistoryPoint {
            date: NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
            open,
            high,
            low,
            close,
        }
    }

    #[test]
    fn test_one_candle_per_point() {
        let points = vec![
            point(16, dec!(100), dec!(110), dec!(95), dec!(105)),
            point(17, dec!(105), dec!(106), dec!(98), dec!(99)),
        ];
        let palette = Theme::Light.palette();
        let svg = candlestick_svg(&points, palette);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<line").count(), 2);
        // background plus two bodies
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains(palette.candle_up));
        assert!(svg.contains(palette.candle_down));
        assert!(svg.contains("10/16"));
    }

    #[test]
    fn test_high_maps_to_top_and_low_to_bottom() {
        let points = vec![
            point(16, dec!(100), dec!(110), dec!(90), dec!(105)),
            point(17, dec!(100), dec!(100), dec!(100), dec!(100)),
        ];
        let candles = layout(&points);
        assert!((candles[0].y_high - PAD_TOP).abs() < 1e-9);
        assert!((candles[0].y_low - (HEIGHT - PAD_BOTTOM)).abs() < 1e-9);
        assert!(candles[0].x < candles[1].x);
    }

    #[test]
    fn test_flat_series_is_centered() {
        let points = vec![point(16, dec!(50), dec!(50), dec!(50), dec!(50))];
        let candles = layout(&points);
        let mid = PAD_TOP + (HEIGHT - PAD_TOP - PAD_BOTTOM) / 2.0;
        assert!((candles[0].y_close - mid).abs() < 1e-9);
    }

    #[test]
    fn test_empty_series_placeholder() {
        let svg = candlestick_svg(&[], Theme::Dark.palette());
        assert!(svg.contains("No trading days in range"));
        assert!(!svg.contains("<line"));
    }
}
