//! Terminal rendering for the CLI
//!
//! Render functions build strings so they can be checked without a terminal;
//! [`DisplayManager`] owns the spinner and does the printing.

use crate::compare::ComparisonRow;
use crate::news::{is_deal, Article, NewsFeed, SavedArticle};
use crate::product::ProductRecord;
use crate::summarizer::ArticleSummary;
use crate::tracker::TrackedProduct;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::time::Duration;

const RULE_WIDTH: usize = 60;

/// Spinner and message output for one CLI run
pub struct DisplayManager {
    current_bar: Option<ProgressBar>,
    update_interval: Duration,
    show_progress: bool,
}

impl DisplayManager {
    pub fn new(show_progress: bool) -> Self {
        DisplayManager {
            current_bar: None,
            update_interval: Duration::from_millis(100),
            show_progress,
        }
    }

    /// Start a spinner for a long backend call
    pub fn start_spinner(&mut self, message: &str) -> ProgressBar {
        self.finish_current();

        let pb = if self.show_progress {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(self.update_interval);

        self.current_bar = Some(pb.clone());
        pb
    }

    pub fn finish_current(&mut self) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
    }

    pub fn show_error(&mut self, error: &str) {
        self.finish_current();
        eprintln!("{} {}", "✗".red().bold(), error.red());
    }

    pub fn show_success(&mut self, message: &str) {
        self.finish_current();
        println!("{} {}", "✓".green().bold(), message);
    }

    pub fn show_info(&self, info: &str) {
        println!("{} {}", "→".cyan(), info);
    }

    pub fn print(&mut self, block: &str) {
        self.finish_current();
        println!("{}", block);
    }
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title.bold().cyan());
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH).cyan());
}

/// `₹68,499`, or "unavailable" for the 0 sentinel
pub fn format_price(price: f64) -> String {
    if price <= 0.0 || !price.is_finite() {
        return "unavailable".to_string();
    }
    let whole = price.round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("₹{}", grouped)
}

fn format_score(value: f64, scale: u32) -> String {
    if value <= 0.0 {
        "unavailable".dimmed().to_string()
    } else if scale == 5 {
        format!("{:.1}/5", value)
    } else {
        format!("{:.0}/100", value)
    }
}

/// Full product card
pub fn render_product(record: &ProductRecord) -> String {
    let mut out = String::new();
    let identity = &record.identity;
    let ratings = &record.ratings;

    let _ = writeln!(out, "{}", identity.title.bold());
    let _ = writeln!(
        out,
        "  Amazon   {}  {}",
        format_price(identity.amazon_price).green(),
        identity.amazon_url.dimmed()
    );
    let _ = writeln!(
        out,
        "  Flipkart {}  {}",
        format_price(identity.flipkart_price).green(),
        identity.flipkart_url.dimmed()
    );

    section(&mut out, "Ratings");
    let _ = writeln!(out, "  User        {}", format_score(ratings.user_rating, 5));
    let _ = writeln!(out, "  Expert      {}", format_score(ratings.expert_rating, 5));
    for sub in record.sub_ratings() {
        let _ = writeln!(out, "  {:<11} {}", sub.specification_name, format_score(sub.rating, 100));
    }
    let _ = writeln!(out, "  Overall     {}", format_score(ratings.overall, 100));
    let _ = writeln!(out, "  Value       {}", format_score(ratings.value_for_money, 100));

    section(&mut out, "Specifications");
    for line in &record.detail.specifications {
        let _ = writeln!(out, "  {} {}", "•".cyan(), line);
    }

    section(&mut out, "Quick take");
    for line in &record.detail.quick_takes {
        let _ = writeln!(out, "  {} {}", "•".cyan(), line);
    }

    section(&mut out, "Verdict");
    for (i, line) in record.detail.verdict.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", (i + 1).to_string().cyan(), line);
    }

    let tags: Vec<String> = record.tags.iter().map(|t| format!("#{}", t)).collect();
    let _ = write!(out, "\n{}", tags.join(" ").magenta());
    out
}

/// Comparison table, one column per product
pub fn render_comparison(products: &[ProductRecord], rows: &[ComparisonRow]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<24}", "");
    for product in products {
        let _ = write!(out, " {:<28}", truncate(&product.identity.title, 28).bold());
    }
    out.push('\n');

    for row in rows {
        let best = row.best_index();
        let _ = write!(out, "{:<24}", row.label);
        for (i, value) in row.values.iter().enumerate() {
            // only the price row is lower-is-better
            let cell = match value {
                Some(v) if row.lower_is_better => format_price(*v),
                Some(v) => format!("{:.1}", v),
                None => "unavailable".to_string(),
            };
            let cell = format!("{:<28}", cell);
            if best == Some(i) {
                let _ = write!(out, " {}", cell.green().bold());
            } else {
                let _ = write!(out, " {}", cell);
            }
        }
        out.push('\n');
    }
    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

fn render_article(out: &mut String, article: &Article) {
    let marker = if is_deal(article) {
        " Special Deal ".on_red().white().bold().to_string()
    } else {
        String::new()
    };
    let _ = writeln!(out, "  {} {}{}", "•".cyan(), article.title.bold(), marker);
    if !article.source.name.is_empty() {
        let _ = writeln!(out, "    {}", article.source.name.dimmed());
    }
    let _ = writeln!(out, "    {}", article.url.blue());
}

/// News screen: banners first, then the story list
pub fn render_feed(feed: &NewsFeed) -> String {
    let mut out = String::new();
    if !feed.banners.is_empty() {
        section(&mut out, "Featured");
        for article in &feed.banners {
            render_article(&mut out, article);
        }
    }
    section(&mut out, "Latest");
    if feed.stories.is_empty() {
        let _ = writeln!(out, "  {}", "No news available".dimmed());
    }
    for article in &feed.stories {
        render_article(&mut out, article);
    }
    out
}

/// Flat article list (used for filtered views)
pub fn render_articles(title: &str, articles: &[Article]) -> String {
    let mut out = String::new();
    section(&mut out, title);
    if articles.is_empty() {
        let _ = writeln!(out, "  {}", "Nothing matched".dimmed());
    }
    for article in articles {
        render_article(&mut out, article);
    }
    out
}

/// Saved articles with the id `news unsave` takes
pub fn render_saved(saved: &[SavedArticle]) -> String {
    let mut out = String::new();
    section(&mut out, "Saved articles");
    if saved.is_empty() {
        let _ = writeln!(out, "  {}", "No saved articles".dimmed());
    }
    for entry in saved {
        render_article(&mut out, &entry.article);
        let _ = writeln!(
            out,
            "    {} {}",
            entry.saved_at.format("%Y-%m-%d").to_string().dimmed(),
            entry.id().dimmed()
        );
    }
    out
}

pub fn render_summary(title: &str, summary: &ArticleSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title.bold());
    section(&mut out, "Takeaways");
    for (i, point) in summary.takeaways.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", (i + 1).to_string().cyan(), point);
    }
    section(&mut out, "Summary");
    let _ = writeln!(out, "{}", summary.summary);
    section(&mut out, "Conclusion");
    let _ = write!(out, "{}", summary.conclusion);
    out
}

/// Tracked products with their change since tracking started
pub fn render_tracked(products: &[TrackedProduct]) -> String {
    let mut out = String::new();
    section(&mut out, "Tracked prices");
    if products.is_empty() {
        let _ = writeln!(out, "  {}", "Not tracking anything yet".dimmed());
    }
    for product in products {
        let change = product.price_change_percent();
        let change_text = format!("{:.2}%", change.abs());
        let change_text = if change < 0.0 {
            format!("↓ {}", change_text).green()
        } else if change > 0.0 {
            format!("↑ {}", change_text).red()
        } else {
            change_text.dimmed()
        };
        let _ = writeln!(out, "  {} {}", "•".cyan(), product.title.bold());
        let _ = writeln!(
            out,
            "    {} → {}  {}",
            format_price(product.old_price),
            format_price(product.new_price),
            change_text
        );
        let _ = writeln!(
            out,
            "    {} {}",
            product.tracked_at.format("%Y-%m-%d").to_string().dimmed(),
            product.url.blue()
        );
    }
    out
}
