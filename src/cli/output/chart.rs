use crate::{query::DailyTotal, utils::time::format_date};

const BAR: char = '█';

/// Draws a horizontal bar per day. The longest day takes `width` characters and the rest are
/// scaled against it.
pub fn render_chart(days: &[DailyTotal], width: usize) -> Vec<String> {
    let max = days
        .iter()
        .map(|v| v.total_hours)
        .fold(0., f64::max);

    days.iter()
        .map(|day| {
            let length = if max > 0. {
                (day.total_hours / max * width as f64).round() as usize
            } else {
                0
            };
            format!(
                "{} |{} {:.2}",
                format_date(day.date),
                BAR.to_string().repeat(length),
                day.total_hours
            )
        })
        .collect()
}
