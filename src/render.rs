use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fmt::Write as _;
use std::io::{self, Write};

use crate::dates::Clock;
use crate::settings::Settings;
use crate::stats::{rolling_window, Summary, WindowPoint};
use crate::store::{DayCounters, StatsStore};

// Width of the text bars, in cells
const BAR_CELLS: u64 = 30;
const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Everything a dashboard view shows, computed in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub today: DayCounters,
    pub count_pastes: bool,
    pub total: u64,
    pub goal: u64,
    pub percent: u64,
    pub streak: u64,
    pub week: Vec<WindowPoint>,
    pub month: Vec<WindowPoint>,
}

impl Dashboard {
    pub fn compute(store: &StatsStore, clock: &impl Clock, settings: &Settings) -> Self {
        let summary = Summary::compute(store, clock, settings);
        Dashboard {
            today: summary.today,
            count_pastes: settings.count_pastes,
            total: summary.total,
            goal: summary.goal,
            percent: summary.percent,
            streak: summary.streak,
            week: rolling_window(store, clock, 7, settings),
            month: rolling_window(store, clock, 30, settings),
        }
    }

    pub fn streak_label(&self) -> String {
        let plural = if self.streak == 1 { "" } else { "s" };
        format!("{} day{} in a row", self.streak, plural)
    }

    pub fn goal_label(&self) -> String {
        format!("{}% of {} word goal", self.percent, self.goal)
    }
}

// Largest value in a window, never below 1 so scaling can't divide by zero
fn window_max(points: &[WindowPoint]) -> u64 {
    points.iter().map(|p| p.value).max().unwrap_or(0).max(1)
}

// Scales `value` onto 0..=cells. Widened to u128 so huge stored counters
// can't overflow the multiply.
fn scale(value: u64, max: u64, cells: u64) -> u64 {
    let scaled = value as u128 * cells as u128 / max.max(1) as u128;
    scaled.min(cells as u128) as u64
}

fn bar_cells(value: u64, max: u64) -> u64 {
    scale(value, max, BAR_CELLS)
}

fn goal_bar(percent: u64) -> String {
    let filled = (percent.min(100) * BAR_CELLS / 100) as usize;
    let empty = BAR_CELLS as usize - filled;
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}

/// One character per day, scaled to the busiest day in the window.
pub fn sparkline(points: &[WindowPoint]) -> String {
    let max = window_max(points);
    let top = (SPARK_CHARS.len() - 1) as u64;
    points
        .iter()
        .map(|p| SPARK_CHARS[scale(p.value, max, top) as usize])
        .collect()
}

/// Plain-text dashboard, for pipes and logs.
pub fn render_text(dash: &Dashboard) -> String {
    let mut out = String::new();

    // writeln! into a String can't fail, hence the ignored results
    let _ = writeln!(out, "Writer Statistics");
    let _ = writeln!(out);
    let _ = writeln!(out, "Today");
    let _ = writeln!(out, "  typed  {:>6}", dash.today.typed);
    if dash.count_pastes {
        let _ = writeln!(out, "  pasted {:>6}", dash.today.pasted);
    }
    let _ = writeln!(out, "  total  {:>6}", dash.total);
    let _ = writeln!(out, "  {} {}", goal_bar(dash.percent), dash.goal_label());
    let _ = writeln!(out);
    let _ = writeln!(out, "Streak");
    let _ = writeln!(out, "  {}", dash.streak_label());
    let _ = writeln!(out);
    let _ = writeln!(out, "Last 7 Days");

    let max = window_max(&dash.week);
    for point in &dash.week {
        let cells = bar_cells(point.value, max) as usize;
        let mut line = format!(
            "  {:>5} {}{}",
            point.label,
            "█".repeat(cells),
            "░".repeat(BAR_CELLS as usize - cells)
        );
        // Only non-zero days get a number
        if point.value > 0 {
            let _ = write!(line, " {}", point.value);
        }
        let _ = writeln!(out, "{}", line);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Last 30 Days");
    let _ = writeln!(out, "  {}", sparkline(&dash.month));

    out
}

/// 7-day bar chart as SVG markup.
pub fn week_svg(points: &[WindowPoint]) -> String {
    let svg_width = 280.0;
    let svg_height = 140.0;
    let bar_width = 28.0;
    let chart_height = 100.0;
    let n = points.len() as f64;
    let bar_gap = (svg_width - n * bar_width) / (n + 1.0);
    let max = window_max(points) as f64;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" viewBox="0 0 {} {}" class="writer-stats-bar-chart">"#,
        svg_width, svg_height
    );
    for (i, point) in points.iter().enumerate() {
        let x = bar_gap + i as f64 * (bar_width + bar_gap);
        let h = point.value as f64 / max * chart_height;
        let y = chart_height - h;
        let mid = x + bar_width / 2.0;
        let _ = write!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="3" class="writer-stats-bar"/>"#,
            x,
            y,
            bar_width,
            h.max(2.0)
        );
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" class="writer-stats-bar-label">{}</text>"#,
            mid,
            chart_height + 14.0,
            point.label
        );
        if point.value > 0 {
            let _ = write!(
                svg,
                r#"<text x="{}" y="{}" text-anchor="middle" class="writer-stats-bar-value">{}</text>"#,
                mid,
                y - 4.0,
                point.value
            );
        }
    }
    svg.push_str("</svg>");
    svg
}

/// 30-day trend line as SVG markup: a filled area under a polyline.
pub fn month_svg(points: &[WindowPoint]) -> String {
    let width = 280.0;
    let height = 60.0;
    let inset = 4.0;
    let max = window_max(points) as f64;
    let steps = (points.len().max(2) - 1) as f64;

    let line = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = i as f64 / steps * (width - 2.0 * inset) + inset;
            let y = height - inset - (p.value as f64 / max * (height - 2.0 * inset));
            format!("{},{}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ");

    // Close the area along the baseline
    let fill = format!(
        "{},{} {} {},{}",
        inset,
        height - inset,
        line,
        width - inset,
        height - inset
    );

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" viewBox="0 0 {} {}" class="writer-stats-sparkline">"#,
        width, height
    );
    let _ = write!(svg, r#"<polygon points="{}" class="writer-stats-spark-fill"/>"#, fill);
    let _ = write!(
        svg,
        r#"<polyline points="{}" fill="none" class="writer-stats-spark-line"/>"#,
        line
    );
    svg.push_str("</svg>");
    svg
}

/// Full-screen terminal dashboard. Waits for a key press, then restores
/// the terminal.
pub fn show_dashboard(dash: &Dashboard) -> io::Result<()> {
    let mut stdout = io::stdout();

    // Raw mode so a single key press ends the view
    terminal::enable_raw_mode()?;
    if let Err(e) = execute!(stdout, EnterAlternateScreen, Clear(ClearType::All), Hide) {
        let _ = terminal::disable_raw_mode();
        return Err(e);
    }

    let result = draw_dashboard(&mut stdout, dash).and_then(|_| {
        // Block until a key arrives; ignore resizes and mouse events
        loop {
            if let Event::Key(_) = event::read()? {
                return Ok(());
            }
        }
    });

    // Restore the terminal even if drawing failed
    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn draw_stat(stdout: &mut io::Stdout, row: u16, label: &str, value: u64, color: Color) -> io::Result<()> {
    execute!(
        stdout,
        MoveTo(2, row),
        Print(label),
        MoveTo(20, row),
        SetForegroundColor(color),
        Print(value),
        ResetColor
    )
}

fn draw_dashboard(stdout: &mut io::Stdout, dash: &Dashboard) -> io::Result<()> {
    execute!(
        stdout,
        MoveTo(2, 1),
        SetForegroundColor(Color::Cyan),
        Print("Writer Statistics"),
        ResetColor
    )?;

    let mut row = 3;
    draw_stat(stdout, row, "Typed:", dash.today.typed, Color::Green)?;
    row += 1;
    if dash.count_pastes {
        draw_stat(stdout, row, "Pasted:", dash.today.pasted, Color::Magenta)?;
        row += 1;
    }
    draw_stat(stdout, row, "Total:", dash.total, Color::Blue)?;
    row += 1;

    // Same thresholds as the goal colouring in the status bar
    let goal_color = if dash.percent >= 100 {
        Color::Green
    } else if dash.percent >= 75 {
        Color::Yellow
    } else {
        Color::White
    };
    execute!(
        stdout,
        MoveTo(2, row),
        SetForegroundColor(goal_color),
        Print(goal_bar(dash.percent)),
        ResetColor,
        Print(" "),
        Print(dash.goal_label())
    )?;
    row += 2;

    execute!(
        stdout,
        MoveTo(2, row),
        Print("Current Streak:"),
        MoveTo(20, row),
        SetForegroundColor(if dash.streak > 0 { Color::Yellow } else { Color::DarkGrey }),
        Print(dash.streak_label()),
        ResetColor
    )?;
    row += 2;

    execute!(
        stdout,
        MoveTo(2, row),
        SetForegroundColor(Color::Cyan),
        Print("Last 7 Days:"),
        ResetColor
    )?;
    row += 1;

    let max = window_max(&dash.week);
    for point in &dash.week {
        let cells = bar_cells(point.value, max) as usize;
        execute!(
            stdout,
            MoveTo(2, row),
            Print(format!("{:>5}", point.label)),
            MoveTo(8, row),
            SetForegroundColor(Color::Green),
            Print("█".repeat(cells)),
            SetForegroundColor(Color::DarkGrey),
            Print("░".repeat(BAR_CELLS as usize - cells)),
            ResetColor
        )?;
        if point.value > 0 {
            execute!(stdout, MoveTo(40, row), Print(point.value))?;
        }
        row += 1;
    }
    row += 1;

    execute!(
        stdout,
        MoveTo(2, row),
        SetForegroundColor(Color::Cyan),
        Print("Last 30 Days:"),
        ResetColor,
        MoveTo(2, row + 1),
        SetForegroundColor(Color::Green),
        Print(sparkline(&dash.month)),
        ResetColor,
        MoveTo(2, row + 3),
        SetForegroundColor(Color::DarkGrey),
        Print("Press any key to exit"),
        ResetColor
    )?;

    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::{date_key_offset, ManualClock};
    use chrono::NaiveDate;

    fn sample() -> Dashboard {
        let clock = ManualClock::new(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        let mut store = StatsStore::new();
        store.increment(&date_key_offset(&clock, 0), 200, 50);
        store.increment(&date_key_offset(&clock, 1), 100, 0);
        Dashboard::compute(&store, &clock, &Settings::default())
    }

    #[test]
    fn dashboard_collects_windows_and_summary() {
        let dash = sample();
        assert_eq!(dash.total, 250);
        assert_eq!(dash.percent, 50);
        assert_eq!(dash.streak, 2);
        assert_eq!(dash.week.len(), 7);
        assert_eq!(dash.month.len(), 30);
        assert_eq!(dash.week.last().unwrap().value, 250);
    }

    #[test]
    fn labels_pluralise() {
        let mut dash = sample();
        assert_eq!(dash.streak_label(), "2 days in a row");
        dash.streak = 1;
        assert_eq!(dash.streak_label(), "1 day in a row");
        assert_eq!(dash.goal_label(), "50% of 500 word goal");
    }

    #[test]
    fn text_dashboard_hides_pasted_when_not_counted() {
        let mut dash = sample();
        let text = render_text(&dash);
        assert!(text.contains("pasted"));
        assert!(text.contains("3/7"));
        assert!(text.contains("2 days in a row"));

        dash.count_pastes = false;
        assert!(!render_text(&dash).contains("pasted"));
    }

    #[test]
    fn sparkline_scales_to_busiest_day() {
        let points: Vec<WindowPoint> = [0, 7, 14]
            .iter()
            .map(|&value| WindowPoint {
                key: String::new(),
                label: String::new(),
                value,
            })
            .collect();
        assert_eq!(sparkline(&points), "▁▄█");
    }

    #[test]
    fn week_svg_draws_one_bar_per_day() {
        let dash = sample();
        let svg = week_svg(&dash.week);
        assert_eq!(svg.matches("<rect").count(), 7);
        // values only on days with words
        assert_eq!(svg.matches("writer-stats-bar-value").count(), 2);
        assert!(svg.contains(r#"x="10.5" y="100" width="28" height="2""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn month_svg_spans_the_inset_width() {
        let dash = sample();
        let svg = month_svg(&dash.month);
        assert!(svg.contains("<polyline"));
        assert!(svg.contains(r#"points="4,56 4,56"#));
        assert!(svg.contains("276,4"));
    }

    #[test]
    fn huge_counters_render_without_overflow() {
        let clock = ManualClock::new(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        let mut store = StatsStore::new();
        store.increment(&date_key_offset(&clock, 0), 1_000_000_000_000_000_000, 0);
        store.increment(&date_key_offset(&clock, 1), u64::MAX, 5);
        store.increment(&date_key_offset(&clock, 2), 500_000_000_000_000_000, 0);
        let dash = Dashboard::compute(&store, &clock, &Settings::default());

        let text = render_text(&dash);
        assert!(text.contains(&"█".repeat(30)));
        assert!(sparkline(&dash.month).contains('█'));
        assert_eq!(bar_cells(u64::MAX, u64::MAX), 30);
        assert_eq!(bar_cells(u64::MAX / 2, u64::MAX), 14);
        assert!(week_svg(&dash.week).ends_with("</svg>"));
    }
}
