use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use covid_tracker::api::{BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_HISTORY_DAYS};
use covid_tracker::present::{derive_counters, derive_graph, derive_map_overlay, derive_table};
use covid_tracker::rank::{TieOrder, rank_by};
use covid_tracker::{Applied, Client, Dashboard, Metric, Region, Slot, StatsSource};
use covid_tracker::{storage, viz};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "covid",
    version,
    about = "Fetch, rank & chart COVID-19 statistics from disease.sh"
)]
struct Cli {
    /// Base URL of the statistics API.
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    api_base: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the three counters for worldwide or one country.
    Summary(SummaryArgs),
    /// List selectable countries (code and name).
    Countries,
    /// Print countries ranked by a metric (and optionally save them).
    Table(TableArgs),
    /// Print the map circle overlay for a metric.
    Map(MapArgs),
    /// Print (and optionally plot) daily new values.
    Graph(GraphArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// "worldwide" or an ISO2 country code (e.g., FR)
    #[arg(short, long, default_value = "worldwide")]
    region: String,
    /// Metric marked as active (cases, recovered, deaths)
    #[arg(short, long, default_value = "cases")]
    metric: Metric,
}

#[derive(Args, Debug)]
struct TableArgs {
    /// Metric to rank by (cases, recovered, deaths)
    #[arg(short, long, default_value = "cases")]
    metric: Metric,
    /// Put the later of two equal records first instead of keeping upstream order.
    #[arg(long, default_value_t = false)]
    later_first: bool,
    /// Only print the first N rows.
    #[arg(short = 'n', long)]
    limit: Option<usize>,
    /// Save ranked records to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct MapArgs {
    /// Metric driving circle size and colour (cases, recovered, deaths)
    #[arg(short, long, default_value = "cases")]
    metric: Metric,
    /// Emit JSON instead of one line per circle.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct GraphArgs {
    /// Metric to chart (cases, recovered, deaths)
    #[arg(short, long, default_value = "cases")]
    metric: Metric,
    /// "worldwide" or an ISO2 country code
    #[arg(short, long, default_value = "worldwide")]
    region: String,
    /// Days of history to request.
    #[arg(long, default_value_t = DEFAULT_HISTORY_DAYS)]
    days: u32,
    /// Create a chart at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let client = Client::with_base_url(&cli.api_base).context("build http client")?;
    match cli.cmd {
        Command::Summary(args) => cmd_summary(&client, args),
        Command::Countries => cmd_countries(&client),
        Command::Table(args) => cmd_table(&client, args),
        Command::Map(args) => cmd_map(&client, args),
        Command::Graph(args) => cmd_graph(&client, args),
    }
}

fn cmd_summary(client: &Client, args: SummaryArgs) -> Result<()> {
    let mut dash = Dashboard::new();
    dash.set_metric(args.metric);
    let region = Region::parse(&args.region);
    if dash.select_and_fetch(client, region.clone()) != Applied::Updated {
        bail!(
            "could not load {}: {}",
            region,
            dash.notice_for(Slot::Detail).unwrap_or("unknown error")
        );
    }

    println!("{}", region_title(&dash, &region));
    for c in derive_counters(dash.counter_totals(), args.metric) {
        let marker = if c.active { "*" } else { " " };
        println!("{marker} {:<18} {:>8} today  {:>8} total", c.title, c.delta, c.total);
    }
    let vp = dash.viewport();
    println!(
        "map: center {:.4}, {:.4} zoom {}",
        vp.center.lat, vp.center.lng, vp.zoom
    );
    Ok(())
}

fn region_title(dash: &Dashboard, region: &Region) -> String {
    match dash.store().detail() {
        Some(covid_tracker::RegionDetail::Country(c)) => {
            format!("{} ({})", c.region_name, c.region_code)
        }
        _ => match region {
            Region::Worldwide => "Worldwide".to_string(),
            Region::Country(code) => code.clone(),
        },
    }
}

fn cmd_countries(client: &Client) -> Result<()> {
    let mut store = covid_tracker::store::SnapshotStore::new();
    store.refresh_countries(client)?;
    println!("worldwide\tWorldwide");
    for opt in store.options() {
        println!("{}\t{}", opt.code, opt.name);
    }
    Ok(())
}

fn cmd_table(client: &Client, args: TableArgs) -> Result<()> {
    let countries = client.countries()?;
    let ties = if args.later_first {
        TieOrder::LaterFirst
    } else {
        TieOrder::Stable
    };
    let ranked = rank_by(&countries, args.metric, ties);

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&ranked, path)?,
            "json" => storage::save_json(&ranked, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", ranked.len(), path.display());
    }

    let limit = args.limit.unwrap_or(ranked.len());
    if args.metric == Metric::Cases {
        for (i, row) in derive_table(&ranked).iter().take(limit).enumerate() {
            println!("{:>4}  {:<32} {:>14}", i + 1, row.name, row.cases);
        }
    } else {
        for (i, r) in ranked.iter().take(limit).enumerate() {
            println!(
                "{:>4}  {:<32} {:>14}",
                i + 1,
                r.region_name,
                covid_tracker::format::format_count(r.value(args.metric))
            );
        }
    }
    Ok(())
}

fn cmd_map(client: &Client, args: MapArgs) -> Result<()> {
    let countries = client.countries()?;
    let overlay = derive_map_overlay(&countries, args.metric);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&overlay)?);
        return Ok(());
    }
    for c in &overlay {
        println!(
            "{}\t{:.4}\t{:.4}\tr={:.0}m\t{}\t{}",
            c.region_code, c.center.lat, c.center.lng, c.radius, c.color, c.popup.name
        );
    }
    Ok(())
}

fn cmd_graph(client: &Client, args: GraphArgs) -> Result<()> {
    let region = Region::parse(&args.region);
    let history = client.history(&region, args.days)?;
    let points = derive_graph(&history, args.metric);

    if let Some(plot_path) = args.plot.as_ref() {
        viz::plot_daily(&points, args.metric, plot_path, args.width, args.height)?;
        eprintln!("Wrote plot to {}", plot_path.display());
    }

    for p in &points {
        println!("{}\t{}", p.date, p.value);
    }
    Ok(())
}
