//! widget-runner: headless host for the affiliate widget.
//!
//! Usage:
//!   widget-runner render [--category security] [--limit 3]
//!   widget-runner relevant --crime inbrott [--location Södermalm]
//!   widget-runner seasonal [--month 6]
//!   widget-runner click --product yale-doorman
//!   widget-runner convert --product yale-doorman --value 299
//!   widget-runner stats
//!   widget-runner --ipc-mode
//!
//! Common flags: --db run.db  --config widget.json  --data-dir ./data

use affiliate_core::{
    analytics::{AnalyticsReporter, LogReporter, StoreReporter},
    catalog::{Catalog, Product},
    config::WidgetConfig,
    render::Page,
    store::WidgetStore,
    tracker::TrackingStats,
    AffiliateWidget,
};
use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};

const CONTAINER_ID: &str = "affiliate-products";

/// Flags that consume the following argument as their value.
const VALUE_FLAGS: [&str; 10] = [
    "--db",
    "--config",
    "--data-dir",
    "--category",
    "--limit",
    "--crime",
    "--location",
    "--month",
    "--product",
    "--value",
];

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Render {
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        limit: Option<usize>,
    },
    Relevant {
        crime_type: String,
        #[serde(default)]
        location: String,
    },
    Seasonal {
        #[serde(default)]
        month: Option<u32>,
    },
    Click {
        product_id: String,
    },
    Conversion {
        product_id: String,
        value: f64,
    },
    Stats,
    Quit,
}

#[derive(serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcReply<'a> {
    Rendered { cards: usize, html: String },
    Products { products: Vec<&'a Product> },
    Clicked { product_id: String, href: Option<String> },
    Stats { stats: TrackingStats },
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag(&args, "--db").unwrap_or(":memory:");
    let config_path = flag(&args, "--config");
    let data_dir = flag(&args, "--data-dir");

    let config = match config_path {
        Some(path) => WidgetConfig::load_or_default(path)?,
        None => WidgetConfig::default(),
    };
    let catalog = match data_dir {
        Some(dir) => Catalog::load(dir)?,
        None => Catalog::builtin(),
    };

    // For :memory: use SQLite shared-memory URI so the tracker's storage
    // and the event-log reporter share one in-memory database.
    let db_effective: String = if db == ":memory:" {
        format!("file:widget_{}?mode=memory&cache=shared", unix_secs())
    } else {
        db.to_string()
    };
    let store = WidgetStore::open(&db_effective)?;
    store.migrate()?;
    let reporter = build_reporter(&store, args.iter().any(|a| a == "--log-events"))?;

    let mut widget = AffiliateWidget::open(config, catalog, Some(Box::new(store)), Some(reporter));

    if ipc_mode {
        return run_ipc_loop(&mut widget);
    }

    let command = command_name(&args).unwrap_or("stats");
    run_command(&mut widget, command, &args)
}

fn build_reporter(store: &WidgetStore, log_only: bool) -> Result<Box<dyn AnalyticsReporter>> {
    if log_only {
        return Ok(Box::new(LogReporter));
    }
    Ok(Box::new(StoreReporter::new(store.reopen()?)))
}

fn run_command(widget: &mut AffiliateWidget, command: &str, args: &[String]) -> Result<()> {
    match command {
        "render" => {
            let mut page = Page::new();
            page.add_container(CONTAINER_ID);
            let limit = flag(args, "--limit").and_then(|v| v.parse().ok());
            widget.render(&mut page, CONTAINER_ID, category_filter(flag(args, "--category")), limit);
            if let Some(container) = page.container(CONTAINER_ID) {
                println!("{}", container.html);
            }
        }
        "relevant" => {
            let crime = flag(args, "--crime").unwrap_or_default();
            let location = flag(args, "--location").unwrap_or_default();
            print_products(&widget.relevant_products(crime, location));
        }
        "seasonal" => {
            let products = match flag(args, "--month").and_then(|v| v.parse().ok()) {
                Some(month) => widget.seasonal_products_at(month),
                None => widget.seasonal_products(),
            };
            print_products(&products);
        }
        "click" => {
            let product_id = flag(args, "--product").unwrap_or_default();
            let Some(category) = widget.catalog().find(product_id).map(|p| p.category.clone()) else {
                anyhow::bail!("Unknown product: {product_id}");
            };
            widget.tracker_mut().track_click(product_id, &category);
            print_stats(&widget.stats());
        }
        "convert" => {
            let product_id = flag(args, "--product").unwrap_or_default();
            let value = conversion_value(flag(args, "--value"))?;
            widget.track_conversion(product_id, value);
            print_stats(&widget.stats());
        }
        "stats" => print_stats(&widget.stats()),
        other => anyhow::bail!("Unknown command: {other}"),
    }
    Ok(())
}

fn run_ipc_loop(widget: &mut AffiliateWidget) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut page = Page::new();
    page.add_container(CONTAINER_ID);

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let reply = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Render { category, limit } => {
                let cards = widget
                    .render(&mut page, CONTAINER_ID, category_filter(category.as_deref()), limit)
                    .unwrap_or(0);
                let html = page
                    .container(CONTAINER_ID)
                    .map(|c| c.html.clone())
                    .unwrap_or_default();
                serde_json::to_string(&IpcReply::Rendered { cards, html })?
            }
            IpcCommand::Relevant { crime_type, location } => {
                let products = widget.relevant_products(&crime_type, &location);
                serde_json::to_string(&IpcReply::Products { products })?
            }
            IpcCommand::Seasonal { month } => {
                let products = match month {
                    Some(m) => widget.seasonal_products_at(m),
                    None => widget.seasonal_products(),
                };
                serde_json::to_string(&IpcReply::Products { products })?
            }
            IpcCommand::Click { product_id } => {
                let href = widget.activate(&page, CONTAINER_ID, &product_id);
                if href.is_none() {
                    log::warn!("No rendered link for {product_id}; render first");
                }
                serde_json::to_string(&IpcReply::Clicked { product_id, href })?
            }
            IpcCommand::Conversion { product_id, value } => {
                widget.track_conversion(&product_id, value);
                serde_json::to_string(&IpcReply::Stats { stats: widget.stats() })?
            }
            IpcCommand::Stats => {
                serde_json::to_string(&IpcReply::Stats { stats: widget.stats() })?
            }
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_products(products: &[&Product]) {
    for p in products {
        println!("  {:<24} {:<32} {:<20} {} {}", p.id, p.name, p.price, p.stars(), p.rating);
    }
}

fn print_stats(stats: &TrackingStats) {
    println!("=== AFFILIATE STATS ===");
    println!("  total clicks:      {}", stats.total_clicks);
    println!("  total conversions: {}", stats.total_conversions);
    println!("  total revenue:     {:.2}", stats.total_revenue);
    for (id, clicks) in &stats.clicks_by_product {
        let conversions = stats.conversions_by_product.get(id).copied().unwrap_or(0);
        println!("  {id:<24} clicks={clicks:<5} conversions={conversions}");
    }
}

/// First argument that is neither a flag nor a flag's value.
fn command_name(args: &[String]) -> Option<&str> {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            rest.next();
        } else if !arg.starts_with("--") {
            return Some(arg.as_str());
        }
    }
    None
}

/// An empty category means "all categories", as on the page.
fn category_filter(category: Option<&str>) -> Option<&str> {
    category.filter(|c| !c.is_empty())
}

fn conversion_value(raw: Option<&str>) -> Result<f64> {
    let Some(raw) = raw else {
        anyhow::bail!("Missing --value");
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => anyhow::bail!("Invalid --value: {raw}"),
    }
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn unix_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn command_found_after_leading_flags() {
        assert_eq!(command_name(&args(&["widget-runner", "--db", "run.db", "render"])), Some("render"));
        assert_eq!(command_name(&args(&["widget-runner", "--log-events", "stats"])), Some("stats"));
        assert_eq!(command_name(&args(&["widget-runner", "click", "--product", "yale-doorman"])), Some("click"));
        assert_eq!(command_name(&args(&["widget-runner", "--db", "run.db"])), None);
    }

    #[test]
    fn empty_category_renders_everything() {
        assert_eq!(category_filter(Some("")), None);
        assert_eq!(category_filter(None), None);
        assert_eq!(category_filter(Some("legal")), Some("legal"));
    }

    #[test]
    fn bad_conversion_values_are_rejected() {
        assert!(conversion_value(None).is_err());
        assert!(conversion_value(Some("29,9")).is_err());
        assert!(conversion_value(Some("NaN")).is_err());
        assert_eq!(conversion_value(Some("29.9")).unwrap(), 29.9);
        assert_eq!(conversion_value(Some("-10")).unwrap(), -10.0);
    }
}
