use anyhow::{Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use energy_mix::budget::{self, DEFAULT_NEEDED_ENERGY, UnitPrices, parse_price_pair};
use energy_mix::dataset::DEFAULT_TOP_N;
use energy_mix::format::{fmt_opt, format_number, format_share};
use energy_mix::mix::DEFAULT_MIN_SHARE;
use energy_mix::models::{FIVE_CATEGORIES, FOUR_CATEGORIES};
use energy_mix::view::DEFAULT_YEAR;
use energy_mix::{Category, CategorySet, Dataset, KoreaData, Metric, MixConfig, MixOutcome};
use energy_mix::{stats, storage};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "emix",
    version,
    about = "Simulate energy-mix budgets & explore electricity data"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Adjust an energy mix (and optionally price it, save it, export it).
    Mix(MixArgs),
    /// Rank countries by electricity consumption (and optionally print stats).
    Countries(CountriesArgs),
    /// Show South Korea's actual mix, energy balance and sector savings for a year.
    Korea(KoreaArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Layout {
    /// fossil, nuclear, renewable, hydro
    Four,
    /// nuclear, fossil, renewable, hydro, other
    Five,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MetricArg {
    Generation,
    Consumption,
    TradeBalance,
    Imports,
    SelfSufficiency,
}

impl From<MetricArg> for Metric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::Generation => Metric::NetGeneration,
            MetricArg::Consumption => Metric::NetConsumption,
            MetricArg::TradeBalance => Metric::TradeBalance,
            MetricArg::Imports => Metric::Imports,
            MetricArg::SelfSufficiency => Metric::SelfSufficiency,
        }
    }
}

#[derive(Args, Debug)]
struct MixArgs {
    /// Starting shares separated by comma or semicolon (e.g., fossil=40,nuclear=30,renewable=25,hydro=5).
    /// Defaults to the five-category Korea mix.
    #[arg(short, long, conflicts_with_all = ["from", "layout"])]
    shares: Option<String>,
    /// Start from an even split over a preset layout.
    #[arg(long, value_enum, conflicts_with = "from")]
    layout: Option<Layout>,
    /// Start from a mix saved with --save (its floor and lock limit are kept).
    #[arg(long)]
    from: Option<PathBuf>,
    /// Floor every category keeps (percent).
    #[arg(long, default_value_t = DEFAULT_MIN_SHARE)]
    min_share: f64,
    /// Maximum number of locked categories (default: category count - 1).
    /// Once this many categories are locked no slider moves, so 0 freezes the whole mix.
    #[arg(long)]
    max_locked: Option<usize>,
    /// Operation applied in order: set:<category>=<value>, lock:<category>, unlock:<category>. Repeatable.
    #[arg(long = "op")]
    ops: Vec<String>,
    /// Needed energy (1000 toe).
    #[arg(short, long, default_value_t = DEFAULT_NEEDED_ENERGY)]
    amount: f64,
    /// Unit price table (JSON object keyed by category; Korean labels accepted).
    #[arg(long)]
    prices: Option<PathBuf>,
    /// Unit price override as category=price (million KRW per 1000 toe). Repeatable.
    #[arg(long = "price")]
    price: Vec<String>,
    /// Locale for number formatting (en, de, fr, es, it, pt, nl, ko).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Save the budget estimate to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Save the resulting mix (shares, locks, config) as JSON for a later --from.
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CountriesArgs {
    /// Global electricity dataset (JSON keyed by country name).
    #[arg(short, long)]
    data: PathBuf,
    /// Year to rank.
    #[arg(short, long, default_value_t = DEFAULT_YEAR)]
    year: i32,
    /// Number of countries to list.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,
    /// List every country instead of the top N.
    #[arg(long, default_value_t = false, conflicts_with = "top")]
    all: bool,
    /// Print summary statistics of --metric to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
    /// Metric used by --stats.
    #[arg(long, value_enum, default_value_t = MetricArg::Consumption)]
    metric: MetricArg,
    /// Break --stats down by region.
    #[arg(long, default_value_t = false)]
    by_region: bool,
    /// Locale for number formatting.
    #[arg(long, default_value = "en")]
    locale: String,
    /// Save the ranking to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct KoreaArgs {
    /// Directory holding the south_korea_*.json series.
    #[arg(short, long)]
    dir: PathBuf,
    /// Year of the actual mix and balance.
    #[arg(short, long, default_value_t = DEFAULT_YEAR)]
    year: i32,
    /// Locale for number formatting.
    #[arg(long, default_value = "en")]
    locale: String,
    /// Save the year's actual mix as JSON, usable with `emix mix --from`.
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Set(Category, f64),
    Lock(Category),
    Unlock(Category),
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_shares(s: &str) -> Result<Vec<(Category, f64)>> {
    parse_list(s)
        .iter()
        .map(|pair| {
            let (k, v) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("expected category=share, got {:?}", pair))?;
            let share = v
                .trim()
                .parse::<f64>()
                .map_err(|e| anyhow!("invalid share {:?}: {}", v, e))?;
            Ok((k.parse::<Category>()?, share))
        })
        .collect()
}

fn parse_op(s: &str) -> Result<Op> {
    let (verb, rest) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("invalid --op {:?}, expected set:<category>=<value>, lock:<category> or unlock:<category>", s))?;
    match verb.trim().to_ascii_lowercase().as_str() {
        "set" => {
            let (k, v) = rest
                .split_once('=')
                .ok_or_else(|| anyhow!("invalid --op {:?}, expected set:<category>=<value>", s))?;
            let value = v
                .trim()
                .parse::<f64>()
                .map_err(|e| anyhow!("invalid value in --op {:?}: {}", s, e))?;
            Ok(Op::Set(k.parse()?, value))
        }
        "lock" => Ok(Op::Lock(rest.parse()?)),
        "unlock" => Ok(Op::Unlock(rest.parse()?)),
        other => bail!("unknown --op verb: {}", other),
    }
}

fn output_format(format: Option<&OutFormat>, path: &Path) -> String {
    match format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Mix(args) => cmd_mix(args),
        Command::Countries(args) => cmd_countries(args),
        Command::Korea(args) => cmd_korea(args),
    }
}

fn initial_mix(args: &MixArgs) -> Result<CategorySet> {
    if let Some(path) = args.from.as_ref() {
        return storage::load_mix_json(path);
    }
    let mut config = MixConfig::default().with_min_share(args.min_share);
    if let Some(n) = args.max_locked {
        config = config.with_max_locked(n);
    }
    let mix = match (&args.shares, args.layout) {
        (Some(s), _) => CategorySet::new(parse_shares(s)?, config)?,
        (None, Some(Layout::Four)) => CategorySet::even(&FOUR_CATEGORIES, config)?,
        (None, Some(Layout::Five)) => CategorySet::even(&FIVE_CATEGORIES, config)?,
        (None, None) => {
            let defaults = CategorySet::default();
            CategorySet::new(defaults.shares(), config)?
        }
    };
    Ok(mix)
}

fn cmd_mix(args: MixArgs) -> Result<()> {
    let mut mix = initial_mix(&args)?;

    for raw in &args.ops {
        let op = parse_op(raw)?;
        let outcome = match op {
            Op::Set(c, v) => mix.set_share(c, v)?,
            Op::Lock(c) => mix.set_locked(c, true)?,
            Op::Unlock(c) => mix.set_locked(c, false)?,
        };
        if let MixOutcome::Unchanged(reason) = outcome {
            eprintln!("No change for {}: {}", raw, reason);
        }
    }

    for slot in mix.iter() {
        println!(
            "{:<10} {:>7}{}",
            slot.category.key(),
            format_share(slot.share),
            if slot.locked { "  [locked]" } else { "" }
        );
    }
    println!("{:<10} {:>7}", "total", format_share(mix.total()));

    let mut prices = match args.prices.as_ref() {
        Some(p) => UnitPrices::load(p)?,
        None => UnitPrices::new(),
    };
    for pair in &args.price {
        let (c, p) = parse_price_pair(pair)?;
        prices.insert(c, p);
    }

    let estimate = budget::estimate(&mix, args.amount, &prices);
    if !prices.is_empty() {
        println!();
        for row in &estimate.rows {
            println!(
                "{:<10} energy={} price={} cost={}",
                row.category.key(),
                format_number(row.energy, 1, &args.locale),
                row.unit_price
                    .map(|p| format_number(p, 2, &args.locale))
                    .unwrap_or_else(|| "NA".to_string()),
                format_number(row.cost, 2, &args.locale),
            );
        }
        println!(
            "Needed energy budget: {} 억 KRW",
            format_number(estimate.total_eok(), 2, &args.locale)
        );
    }

    if let Some(path) = args.out.as_ref() {
        match output_format(args.format.as_ref(), path).as_str() {
            "csv" => storage::save_estimate_csv(&estimate, path)?,
            "json" => storage::save_estimate_json(&estimate, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved estimate to {}", path.display());
    }

    if let Some(path) = args.save.as_ref() {
        storage::save_mix_json(&mix, path)?;
        eprintln!("Saved mix to {}", path.display());
    }

    Ok(())
}

fn cmd_countries(args: CountriesArgs) -> Result<()> {
    let ds = Dataset::load(&args.data)?;
    let limit = if args.all { None } else { Some(args.top) };
    let rows = ds.consumption_ranking(args.year, limit);
    if rows.is_empty() {
        eprintln!("No countries with generation and consumption data in {}", args.year);
    }

    for r in &rows {
        println!(
            "{:>3}. {:<32} consumption={} generation={} self-sufficiency={}",
            r.rank,
            r.country,
            format_number(r.consumption, 1, &args.locale),
            format_number(r.generation, 1, &args.locale),
            r.self_sufficiency
                .map(|v| format!("{:.1}%", v))
                .unwrap_or_else(|| "N/A".to_string()),
        );
    }

    if let Some(path) = args.out.as_ref() {
        match output_format(args.format.as_ref(), path).as_str() {
            "csv" => storage::save_ranking_csv(&rows, path)?,
            "json" => storage::save_ranking_json(&rows, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", rows.len(), path.display());
    }

    if args.stats {
        let metric: Metric = args.metric.into();
        let summaries = if args.by_region {
            stats::grouped_by_region(&ds, metric, args.year)
        } else {
            vec![stats::metric_summary(&ds, metric, args.year)]
        };
        for s in summaries {
            println!(
                "{} • {} {}  count={} missing={}  min={} max={} mean={} median={}",
                s.key.region,
                s.key.metric,
                s.year,
                s.count,
                s.missing,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median)
            );
        }
    }

    Ok(())
}

fn cmd_korea(args: KoreaArgs) -> Result<()> {
    let data = KoreaData::load_dir(&args.dir)?;
    let num = |v: Option<f64>| {
        v.map(|x| format_number(x, 1, &args.locale))
            .unwrap_or_else(|| "N/A".to_string())
    };

    match data.production_for(args.year) {
        Some(production) => {
            println!("Actual mix {}:", args.year);
            for (c, share) in production.shares() {
                println!(
                    "{:<10} {:>7}  ({})",
                    c.key(),
                    format_share(share),
                    num(Some(production.amount(c)))
                );
            }
            if let Some(path) = args.save.as_ref() {
                storage::save_mix_json(&production.to_mix(MixConfig::default())?, path)?;
                eprintln!("Saved mix to {}", path.display());
            }
        }
        None => eprintln!("No production data for {}", args.year),
    }

    if let Some(b) = data.balance_for(args.year) {
        println!();
        println!(
            "Balance {}: production={} net_imports={} consumption={}",
            args.year,
            num(b.production),
            num(b.net_imports),
            num(b.consumption)
        );
    }

    let reductions = data.reductions();
    if !reductions.is_empty() {
        println!();
        for r in &reductions {
            println!(
                "{:<16} usage={} after={} reducible={} rate={}",
                r.sector,
                num(Some(r.usage)),
                num(Some(r.after_reduction)),
                num(Some(r.reduction)),
                r.reduction_rate
                    .map(format_share)
                    .unwrap_or_else(|| "N/A".to_string())
            );
        }
    }

    Ok(())
}
