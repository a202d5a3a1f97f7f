//! Gadget Advisor - CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use gadget_advisor::{
    advisor::{intro_message, AdvisorBot},
    cli::{
        display::{
            render_articles, render_comparison, render_feed, render_product, render_saved,
            render_summary, render_tracked,
        },
        join_query, Args, ChatInput, Commands, DisplayManager, InputHandler, NewsCommand,
        SummarizeArgs, TrackCommand, Verbosity,
    },
    compare::{comparison_rows, CompareList},
    config::Config,
    gemini::{GeminiClient, GenerativeBackend},
    news::{
        arrange_news, filter_by_keywords, find_by_url, is_deal, NewsClient, NewsTab,
        SavedArticleStore,
    },
    product::{ProductQuery, ProductSearch},
    summarizer::{ArticleSource, ArticleSummarizer},
    tracker::{refresh_prices, top_price_drops, TrackedProduct, TrackerStore},
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbosity: Verbosity) {
    // RUST_LOG wins over -v/-q
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn backend(config: &Config) -> Result<Arc<dyn GenerativeBackend>> {
    if config.gemini.api_key.trim().is_empty() {
        anyhow::bail!(
            "No Gemini API key configured. Set GEMINI_API_KEY or gemini.api_key in the config file."
        );
    }
    let client = GeminiClient::with_config(&config.gemini).context("Failed to create Gemini client")?;
    Ok(Arc::new(client))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbosity());

    let config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    debug!(model = %config.gemini.model, "configuration loaded");

    let mut display = DisplayManager::new(args.verbosity().show_progress());

    match &args.command {
        Commands::Search { query } => run_search(&config, &mut display, &join_query(query)).await,
        Commands::Compare { queries } => run_compare(&config, &mut display, queries).await,
        Commands::Summarize(summarize) => run_summarize(&config, &mut display, summarize).await,
        Commands::Chat => run_chat(&config, &mut display).await,
        Commands::News {
            action: Some(action),
            ..
        } => run_saved_news(&config, &mut display, action).await,
        Commands::News {
            action: None,
            global,
            deals,
            keywords,
        } => run_news(&config, &mut display, *global, *deals, keywords).await,
        Commands::Track { action } => run_track(&config, &mut display, action).await,
        Commands::Config { init } => show_config(&args, &config, *init),
    }
}

async fn run_search(config: &Config, display: &mut DisplayManager, raw: &str) -> Result<ExitCode> {
    let query = ProductQuery::new(raw).context("Please enter a product name")?;
    let search = ProductSearch::new(backend(config)?, config.search.clone());

    display.start_spinner(&format!("Looking up {}", query));
    match search.search(&query).await {
        Ok(record) => {
            display.print(&render_product(&record));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            display.show_error(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_compare(
    config: &Config,
    display: &mut DisplayManager,
    queries: &[String],
) -> Result<ExitCode> {
    let search = ProductSearch::new(backend(config)?, config.search.clone());
    let mut list = CompareList::new();

    for raw in queries {
        let query = ProductQuery::new(raw).context("Please enter a product name")?;
        display.start_spinner(&format!("Looking up {}", query));
        match search.search(&query).await {
            Ok(record) => list.add(record)?,
            Err(e) => display.show_error(&format!("{}: {}", query, e)),
        }
    }
    display.finish_current();

    if !list.is_full() {
        display.show_error("Need two products to compare.");
        return Ok(ExitCode::FAILURE);
    }

    let rows = comparison_rows(list.products());
    display.print(&render_comparison(list.products(), &rows));
    Ok(ExitCode::SUCCESS)
}

async fn run_summarize(
    config: &Config,
    display: &mut DisplayManager,
    args: &SummarizeArgs,
) -> Result<ExitCode> {
    let summarizer = ArticleSummarizer::new(backend(config)?);
    let article = ArticleSource {
        title: args.title.clone(),
        description: args.description.clone(),
        url: args.url.clone(),
    };

    display.start_spinner("Summarizing article");
    match summarizer.summarize(&article).await {
        Ok(summary) => {
            display.print(&render_summary(&article.title, &summary));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "summarization failed");
            display.show_error("Unable to summarize this article right now. Please try again later.");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_chat(config: &Config, display: &mut DisplayManager) -> Result<ExitCode> {
    let mut bot = AdvisorBot::new(backend(config)?);
    let history_file = config.state_dir().join("chat_history");
    let mut input = InputHandler::with_history(history_file)?;

    println!("{} {}", "advisor>".magenta().bold(), intro_message(&mut rand::thread_rng()));
    println!("{}", "Type /reset to start over, /exit to quit.".dimmed());

    loop {
        match input.read()? {
            ChatInput::Exit => break,
            ChatInput::Blank => continue,
            ChatInput::Reset => {
                bot.reset();
                display.show_info("Conversation cleared.");
            }
            ChatInput::Message(message) => {
                display.start_spinner("Thinking");
                let reply = bot.reply_or_apology(&message).await;
                display.finish_current();
                println!("{} {}", "advisor>".magenta().bold(), reply);
            }
        }
    }

    if let Err(e) = input.save_history() {
        debug!(error = %e, "chat history not saved");
    }
    Ok(ExitCode::SUCCESS)
}

fn news_tab(global: bool) -> NewsTab {
    if global {
        NewsTab::Global
    } else {
        NewsTab::Local
    }
}

async fn run_news(
    config: &Config,
    display: &mut DisplayManager,
    global: bool,
    deals_only: bool,
    keywords: &[String],
) -> Result<ExitCode> {
    let client = NewsClient::with_config(&config.news)?;

    display.start_spinner("Fetching headlines");
    let articles = match client.fetch(news_tab(global)).await {
        Ok(articles) => articles,
        Err(e) => {
            error!(error = %e, "news fetch failed");
            display.show_error("Failed to load news. Please try again.");
            return Ok(ExitCode::FAILURE);
        }
    };

    let block = if deals_only || !keywords.is_empty() {
        let mut picked = filter_by_keywords(&articles, keywords);
        if deals_only {
            picked.retain(is_deal);
        }
        render_articles(if deals_only { "Deals" } else { "Matching stories" }, &picked)
    } else {
        render_feed(&arrange_news(articles, &mut rand::thread_rng()))
    };
    display.print(&block);
    Ok(ExitCode::SUCCESS)
}

async fn run_saved_news(
    config: &Config,
    display: &mut DisplayManager,
    action: &NewsCommand,
) -> Result<ExitCode> {
    let store =
        SavedArticleStore::open(&config.state_dir()).context("Failed to open saved articles")?;

    match action {
        NewsCommand::Save { url, global } => {
            let client = NewsClient::with_config(&config.news)?;
            display.start_spinner("Fetching headlines");
            let articles = match client.fetch(news_tab(*global)).await {
                Ok(articles) => articles,
                Err(e) => {
                    error!(error = %e, "news fetch failed");
                    display.show_error("Failed to load news. Please try again.");
                    return Ok(ExitCode::FAILURE);
                }
            };

            match find_by_url(&articles, url) {
                Some(article) => {
                    let title = article.title.clone();
                    store.save(article.clone())?;
                    display.show_success(&format!("Saved {}", title));
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    display.show_error("That article is not in the current headlines.");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        NewsCommand::Saved => {
            display.print(&render_saved(&store.list()?));
            Ok(ExitCode::SUCCESS)
        }
        NewsCommand::Unsave { id } => {
            if store.remove(id)? {
                display.show_success("Removed from saved articles");
                Ok(ExitCode::SUCCESS)
            } else {
                display.show_error(&format!("No saved article with id {}", id));
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

async fn run_track(
    config: &Config,
    display: &mut DisplayManager,
    action: &TrackCommand,
) -> Result<ExitCode> {
    let store = TrackerStore::open(&config.state_dir()).context("Failed to open tracker store")?;

    match action {
        TrackCommand::Add { query } => {
            let query = ProductQuery::new(&join_query(query)).context("Please enter a product name")?;
            let search = ProductSearch::new(backend(config)?, config.search.clone());

            display.start_spinner(&format!("Looking up {}", query));
            let record = match search.search(&query).await {
                Ok(record) => record,
                Err(e) => {
                    display.show_error(&e.to_string());
                    return Ok(ExitCode::FAILURE);
                }
            };

            match TrackedProduct::from_record(&record) {
                Some(product) => {
                    let title = product.title.clone();
                    store.add(product)?;
                    display.show_success(&format!("Tracking {}", title));
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    display.show_error("No price is available for this product, so it can't be tracked.");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        TrackCommand::List { top } => {
            let products = store.list()?;
            let products = match top {
                Some(n) => top_price_drops(&products, *n),
                None => products,
            };
            display.print(&render_tracked(&products));
            Ok(ExitCode::SUCCESS)
        }
        TrackCommand::Remove { title } => {
            if store.remove(title)? {
                display.show_success(&format!("Stopped tracking {}", title));
                Ok(ExitCode::SUCCESS)
            } else {
                display.show_error(&format!("Not tracking {}", title));
                Ok(ExitCode::FAILURE)
            }
        }
        TrackCommand::Refresh => {
            let search = ProductSearch::new(backend(config)?, config.search.clone());
            display.start_spinner("Refreshing prices");
            let report = refresh_prices(&store, &search).await?;
            display.finish_current();

            for (title, e) in &report.failed {
                display.show_error(&format!("{}: {}", title, e));
            }
            display.show_success(&format!("Updated {} product(s)", report.updated.len()));
            display.print(&render_tracked(&store.list()?));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn mask(key: &str) -> String {
    if key.is_empty() {
        "(not set)".to_string()
    } else {
        format!("{}…", key.chars().take(4).collect::<String>())
    }
}

fn show_config(args: &Args, config: &Config, init: bool) -> Result<ExitCode> {
    let path = args.config.clone().or_else(Config::default_path);

    if init {
        let path = path.context("Could not determine a config file location")?;
        // environment keys stay out of the file
        let stored = Config::load_stored(args.config.as_deref()).context("Failed to load configuration")?;
        stored.save(&path).context("Failed to write configuration")?;
        println!("{} Wrote {}", "✓".green().bold(), path.display());
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Gadget Advisor Configuration".bold().cyan());
    println!("{}", "-".repeat(60).cyan());
    if let Some(path) = &path {
        println!("File:            {}", path.display());
    }
    println!("Gemini model:    {}", config.gemini.model);
    println!("Gemini endpoint: {}", config.gemini.base_url);
    println!("Gemini key:      {}", mask(&config.gemini.api_key));
    println!("Timeout:         {}s", config.gemini.request_timeout_secs);
    println!("Max attempts:    {}", config.search.max_attempts());
    println!("Zero policy:     {:?}", config.search.zero_policy);
    println!("News host:       {}", config.news.host);
    println!("News key:        {}", mask(&config.news.api_key));
    println!("State dir:       {}", config.state_dir().display());
    Ok(ExitCode::SUCCESS)
}
