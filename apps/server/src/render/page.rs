use rust_decimal::Decimal;
use stockdash_core::dashboard::{HistoryOutcome, HoldingReport, PortfolioSnapshot};
use stockdash_core::utils::format::format_currency;

use super::chart::candlestick_svg;
use super::escape_html;
use super::theme::{Palette, Theme};

const PAGE_TITLE: &str = "Stock Portfolio P&amp;L";

#[derive(Debug, Clone, Copy, Default)]
pub struct PageOptions {
    pub theme: Theme,
    /// Reload the page when the server publishes a newer snapshot.
    pub live_reload: bool,
}

fn styles(palette: &Palette, columns: usize) -> String {
    format!(
        r#"
        :root {{
            --bg: {bg};
            --text: {text};
            --muted: {muted};
            --panel: {panel};
            --border: {border};
            --purchase: {purchase};
            --profit: {profit};
            --valuation: {valuation};
            --up: {up};
            --down: {down};
            --error: {error};
        }}
        body {{ margin: 0; padding: 24px; background: var(--bg); color: var(--text); font-family: system-ui, sans-serif; }}
        header {{ display: flex; justify-content: space-between; align-items: baseline; }}
        header a {{ color: var(--muted); }}
        .total {{ font-size: 28px; margin: 4px 0; }}
        .total.purchase {{ color: var(--purchase); }}
        .total.profit {{ color: var(--profit); }}
        .total.valuation {{ color: var(--valuation); }}
        .meta {{ color: var(--muted); font-size: 13px; }}
        hr {{ border: 0; border-top: 1px solid var(--border); margin: 20px 0; }}
        .holdings {{ display: grid; gap: 16px; grid-template-columns: repeat({columns}, minmax(0, 1fr)); }}
        @media (max-width: 720px) {{ .holdings {{ grid-template-columns: minmax(0, 1fr); }} }}
        .panel {{ background: var(--panel); border: 1px solid var(--border); border-radius: 12px; padding: 15px; }}
        .panel h3 {{ margin-top: 0; }}
        .panel dl {{ display: grid; grid-template-columns: auto 1fr; gap: 4px 12px; font-size: 18px; }}
        .panel dd {{ margin: 0; text-align: right; }}
        .gain {{ color: var(--up); }}
        .loss {{ color: var(--down); }}
        .error {{ color: var(--error); font-weight: 600; }}
        .chart {{ width: 100%; height: auto; border-radius: 8px; margin-top: 8px; }}
"#,
        bg = palette.background,
        text = palette.text,
        muted = palette.muted_text,
        panel = palette.panel_background,
        border = palette.border,
        purchase = palette.purchase_accent,
        profit = palette.profit_accent,
        valuation = palette.valuation_accent,
        up = palette.candle_up,
        down = palette.candle_down,
        error = palette.error,
        columns = columns,
    )
}

fn sign_class(value: Decimal) -> &'static str {
    if value.is_sign_negative() && !value.is_zero() {
        "loss"
    } else if value.is_zero() {
        ""
    } else {
        "gain"
    }
}

fn error_notice(message: &str) -> String {
    format!(r#"<p class="error" role="alert">{}</p>"#, escape_html(message))
}

fn render_panel(report: &HoldingReport, currency: &str, palette: &Palette) -> String {
    let figures = report.figures();
    let money = |value: Decimal| escape_html(&format_currency(value, currency));

    let mut html = format!(
        r#"<article class="panel" id="holding-{code}" data-symbol="{symbol}"><h3>{name} ({code})</h3><dl><dt>Purchase price</dt><dd>{purchase_price}</dd><dt>Current price</dt><dd>{current_price}</dd><dt>Price difference</dt><dd class="{diff_class}">{price_difference}</dd><dt>Valuation</dt><dd>{valuation}</dd><dt>Profit/loss</dt><dd class="{pl_class}">{profit_loss}</dd></dl>"#,
        code = report.holding.security_code,
        symbol = escape_html(&report.symbol),
        name = escape_html(&report.company_name),
        purchase_price = money(report.holding.purchase_price),
        current_price = money(figures.current_price),
        diff_class = sign_class(figures.price_difference),
        price_difference = money(figures.price_difference),
        valuation = money(figures.valuation),
        pl_class = sign_class(figures.profit_loss),
        profit_loss = money(figures.profit_loss),
    );

    if let Some(failure) = report.outcome.failure() {
        html.push_str(&error_notice(&failure.to_string()));
    }

    match &report.history {
        HistoryOutcome::Loaded { points } => html.push_str(&candlestick_svg(points, palette)),
        HistoryOutcome::Failed(failure) => html.push_str(&error_notice(&failure.to_string())),
    }

    html.push_str("</article>");
    html
}

fn live_reload_script(version: u64) -> String {
    format!(
        r#"<script>
        (function () {{
            var shown = {version};
            var source = new EventSource("/api/v1/events/stream");
            source.addEventListener("portfolio:refresh-complete", function (e) {{
                var data = JSON.parse(e.data || "null");
                if (data && data.version > shown) {{ window.location.reload(); }}
            }});
        }})();
    </script>"#,
        version = version
    )
}

/// Renders the whole dashboard: title, totals, then one panel per holding.
pub fn render_dashboard(snapshot: &PortfolioSnapshot, options: &PageOptions) -> String {
    let palette = options.theme.palette();
    let currency = snapshot.currency.as_str();
    let totals = &snapshot.totals;
    let columns = snapshot.holdings.len().max(1);

    let panels: String = snapshot
        .holdings
        .iter()
        .map(|report| render_panel(report, currency, palette))
        .collect();

    let script = if options.live_reload {
        live_reload_script(snapshot.version)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en" data-theme="{theme}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{styles}</style>
</head>
<body>
    <header>
        <h1>{title}</h1>
        <a class="theme-toggle" href="/?theme={toggle}">{toggle} theme</a>
    </header>
    <section class="totals">
        <h2>Current Position</h2>
        <div class="total purchase">Total purchase amount: {total_purchase}</div>
        <div class="total profit">Total profit/loss: {total_profit_loss}</div>
        <div class="total valuation">Total valuation: {total_valuation}</div>
        <p class="meta">Snapshot {version}, generated {generated_at}</p>
    </section>
    <hr>
    <section class="holdings">{panels}</section>
    {script}
</body>
</html>
"#,
        theme = options.theme,
        title = PAGE_TITLE,
        styles = styles(palette, columns),
        toggle = options.theme.toggled(),
        total_purchase = escape_html(&format_currency(totals.total_purchase_amount, currency)),
        total_profit_loss = escape_html(&format_currency(totals.total_profit_loss, currency)),
        total_valuation = escape_html(&format_currency(totals.total_valuation, currency)),
        version = snapshot.version,
        generated_at = snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        panels = panels,
        script = script,
    )
}
