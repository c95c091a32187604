use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Local, NaiveDate};

use crate::models::{ChartSeries, StatsSnapshot, Trade};

/// Compute the full dashboard snapshot from the raw trade list.
///
/// One pass over the input, recomputed wholesale on every refresh. `now` is
/// captured once by the caller so "today" and "this month" stay consistent
/// across the run even if it straddles a day boundary.
///
/// A trade whose `created_time` does not parse is skipped with a warning;
/// one bad row must not blank the whole dashboard.
pub fn compute_snapshot(trades: &[Trade], now: DateTime<Local>) -> StatsSnapshot {
    let today = now.date_naive();
    let current_month = now.month();
    let current_year = now.year();

    let mut closed_count: u32 = 0;
    let mut today_closed: u32 = 0;
    let mut total_profit = 0.0;
    let mut total_loss = 0.0;
    let mut total_pnl = 0.0;

    let mut day_totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut category_totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut account_totals: BTreeMap<String, f64> = BTreeMap::new();

    // Cumulative realized PnL keyed by HH:MM; zero-padded 24-hour labels
    // sort lexicographically in chronological order.
    let mut intraday: BTreeMap<String, f64> = BTreeMap::new();
    let mut cumulative_pnl = 0.0;

    for trade in trades {
        let created = match trade.created_at_local() {
            Ok(dt) => dt,
            Err(e) => {
                log::warn!("Skipping trade {}: {}", trade.id, e);
                continue;
            }
        };
        let trade_date = created.date_naive();
        let is_today = trade_date == today;

        let realized = trade.realized_pnl();
        if let Some(pnl) = realized {
            closed_count += 1;
            total_pnl += pnl;

            if is_today {
                today_closed += 1;
            }

            if pnl > 0.0 {
                total_profit += pnl;
            } else {
                total_loss += pnl.abs();
            }
        }

        // Open and break-even trades still contribute a zero addend, so the
        // group labels show up on the charts.
        let contribution = realized.unwrap_or(0.0);

        // Day-level rollup; no card surfaces it, kept in step with the rest
        // of the grouping so the daily equity chart can be wired up later.
        *day_totals.entry(trade_date).or_insert(0.0) += contribution;

        *category_totals
            .entry(trade.category_label().to_string())
            .or_insert(0.0) += contribution;

        if created.month() == current_month && created.year() == current_year {
            *account_totals
                .entry(trade.account_label().to_string())
                .or_insert(0.0) += contribution;
        }

        if let Some(pnl) = realized {
            if is_today {
                cumulative_pnl += pnl;
                // Trades landing on the same minute collapse to one point;
                // the running total at the latest of them wins.
                intraday.insert(created.format("%H:%M").to_string(), cumulative_pnl);
            }
        }
    }

    let drawdown = max_drawdown(intraday.values().copied());

    StatsSnapshot {
        total_trades: closed_count,
        today_closed_trades: today_closed,
        total_profit: format!("{:.2}", total_profit),
        total_loss: format!("{:.2}", total_loss),
        total_pnl: format!("{:.2}", total_pnl),
        drawdown: format!("{:.2}", drawdown),
        daily_chart: series_from(intraday),
        category_bar: series_from(category_totals),
        account_bar: series_from(account_totals),
    }
}

/// Max percentage decline from the running peak of a cumulative series.
///
/// The peak starts at zero; while it stays there the decline is zero rather
/// than a division by zero, so an all-negative day reports 0.00 instead of
/// NaN.
fn max_drawdown(cumulative: impl Iterator<Item = f64>) -> f64 {
    let mut peak = 0.0f64;
    let mut max_decline = 0.0f64;

    for value in cumulative {
        peak = peak.max(value);
        if peak != 0.0 {
            let decline = (peak - value) / peak * 100.0;
            max_decline = max_decline.max(decline);
        }
    }

    max_decline
}

fn series_from(totals: BTreeMap<String, f64>) -> ChartSeries {
    let mut labels = Vec::with_capacity(totals.len());
    let mut values = Vec::with_capacity(totals.len());
    for (label, value) in totals {
        labels.push(label);
        values.push(value);
    }
    ChartSeries { labels, values }
}
