mod supplier;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{Dataset, ItemCatalog, UserId};
use neighbors::{ActiveUserRatings, SimilarityMode, SimilarityScore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use recommender::{Recommendation, Recommender, RecommenderConfig, collect_active_ratings};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use supplier::{PromptSupplier, RandomSupplier, sample_items};

/// cf-recs - user-based collaborative filtering on MovieLens 100k
#[derive(Parser)]
#[command(name = "cf-recs")]
#[command(about = "Recommend movies from the tastes of similar users", long_about = None)]
struct Cli {
    /// Path to the MovieLens 100k directory (u.data, u.item)
    #[arg(short, long, default_value = "data/ml-100k")]
    data_dir: PathBuf,

    /// JSON file with recommender settings; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Raw,
    MeanCentered,
}

impl From<Mode> for SimilarityMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Raw => SimilarityMode::RawPearson,
            Mode::MeanCentered => SimilarityMode::MeanCentered,
        }
    }
}

#[derive(clap::Args)]
struct QueryArgs {
    /// Number of neighbors
    #[arg(short)]
    k: Option<usize>,

    /// Similarity and prediction formulas
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Lowest expected rating to recommend
    #[arg(long)]
    min_rating: Option<f64>,

    /// Longest recommendation list
    #[arg(long, conflicts_with = "unbounded")]
    max_items: Option<usize>,

    /// Return every qualifying item
    #[arg(long)]
    unbounded: bool,

    /// Number of items the active user rates
    #[arg(long)]
    ratings: Option<usize>,

    /// Seed for item sampling and random ratings
    #[arg(long, default_value = "89")]
    seed: u64,
}

impl QueryArgs {
    fn apply(&self, mut config: RecommenderConfig) -> Result<RecommenderConfig> {
        if let Some(k) = self.k {
            config = config.with_neighborhood_size(k);
        }
        if let Some(mode) = self.mode {
            config = config.with_mode(mode.into());
        }
        if let Some(min_rating) = self.min_rating {
            config = config.with_min_rating(min_rating);
        }
        if self.unbounded {
            config = config.with_max_items(None);
        } else if let Some(max_items) = self.max_items {
            config = config.with_max_items(Some(max_items));
        }
        if let Some(count) = self.ratings {
            config = config.with_ratings_to_collect(count);
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rate a few movies and get recommendations
    Recommend {
        #[command(flatten)]
        query: QueryArgs,

        /// Rate the sampled movies randomly instead of asking
        #[arg(long)]
        random: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a population user's rating profile
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Run independent random queries concurrently and report latency
    Benchmark {
        #[command(flatten)]
        query: QueryArgs,

        /// Number of queries
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RecommenderConfig::from_json_file(path)?,
        None => RecommenderConfig::default(),
    };

    eprintln!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let dataset = Dataset::load_from_dir(&cli.data_dir)
        .context("Failed to load MovieLens dataset")?;
    eprintln!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    match cli.command {
        Commands::Recommend {
            query,
            random,
            json,
        } => handle_recommend(dataset, query.apply(config)?, query.seed, random, json)?,
        Commands::User { user_id } => handle_user(&dataset, user_id)?,
        Commands::Benchmark { query, requests } => {
            handle_benchmark(dataset, query.apply(config)?, query.seed, requests).await?
        }
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    dataset: Dataset,
    config: RecommenderConfig,
    seed: u64,
    random: bool,
    json: bool,
) -> Result<()> {
    let Dataset {
        population,
        catalog,
    } = dataset;

    let mut rng = StdRng::seed_from_u64(seed);
    let item_ids = sample_items(&catalog, config.ratings_to_collect, &mut rng);

    let active = if random {
        let mut supplier = RandomSupplier::new(seed);
        collect_active_ratings(&mut supplier, &item_ids, config.active_user_id)?
    } else {
        println!(
            "{}",
            format!("Please rate {} movies:", item_ids.len()).bold().blue()
        );
        let mut supplier = PromptSupplier::new(&catalog, io::stdin().lock(), io::stdout());
        collect_active_ratings(&mut supplier, &item_ids, config.active_user_id)?
    };

    let recommender = Recommender::new(Arc::new(population), config);
    let recommendation = recommender.recommend_for(&active)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
        return Ok(());
    }

    if random {
        print_active_ratings(&catalog, &active);
    }
    print_neighborhood(&recommendation.neighbors);
    print_recommendations(&catalog, &recommendation);
    Ok(())
}

/// Handle the 'user' command
fn handle_user(dataset: &Dataset, user_id: UserId) -> Result<()> {
    let ratings = dataset.population.user_ratings(user_id);
    if ratings.is_empty() {
        return Err(anyhow!("User {} not found", user_id));
    }

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    println!("{}Number of ratings: {}", "• ".cyan(), ratings.len());
    if let Some(mean) = dataset.population.user_mean(user_id) {
        println!("{}Average rating: {:.2}", "• ".cyan(), mean);
    }

    let mut top_rated: Vec<_> = ratings.iter().collect();
    top_rated.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.item_id.cmp(&b.item_id)));
    println!("Top rated movies:");
    for rating in top_rated.iter().take(10) {
        if let Some(item) = dataset.catalog.get_item(rating.item_id) {
            println!("  - {} (Rating: {})", item.title, rating.rating);
        }
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    dataset: Dataset,
    config: RecommenderConfig,
    seed: u64,
    requests: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }

    let Dataset {
        population,
        catalog,
    } = dataset;

    // Active ids start past every population user so no query collides
    let first_id = population
        .user_ids()
        .last()
        .map_or(config.active_user_id, |&max| config.active_user_id.max(max + 1));

    let mut rng = StdRng::seed_from_u64(seed);
    let mut supplier = RandomSupplier::new(seed);
    let actives = (0..requests)
        .map(|i| {
            let item_ids = sample_items(&catalog, config.ratings_to_collect, &mut rng);
            collect_active_ratings(&mut supplier, &item_ids, first_id + i as UserId)
        })
        .collect::<Result<Vec<ActiveUserRatings>>>()?;

    let recommender = Recommender::new(Arc::new(population), config);

    let start = Instant::now();
    let results = recommender.recommend_batch(actives).await?;
    let total_time = start.elapsed();

    let mut timings: Vec<Duration> = results
        .iter()
        .map(|r| Duration::from_secs_f64(r.elapsed_ms / 1000.0))
        .collect();
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;
    let throughput = requests as f64 / total_time.as_secs_f64();
    let empty = results.iter().filter(|r| r.items.is_empty()).count();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} with no recommendations)", requests, empty);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn print_active_ratings(catalog: &ItemCatalog, active: &ActiveUserRatings) {
    println!("{}", "Your ratings:".bold().blue());
    for entry in active.entries() {
        let title = catalog
            .get_item(entry.item_id)
            .map_or("unknown item", |item| item.title.as_str());
        println!("  {} {}", entry.rating.to_string().yellow(), title);
    }
}

fn print_neighborhood(neighbors: &[SimilarityScore]) {
    println!("{}", "Your closest users:".bold().blue());
    if neighbors.is_empty() {
        println!("  {}", "nobody shares enough rated movies with you".dimmed());
    }
    for (rank, neighbor) in neighbors.iter().enumerate() {
        println!(
            "{}. user {} (correlation {:.3})",
            (rank + 1).to_string().green(),
            neighbor.user_id,
            neighbor.correlation
        );
    }
}

fn print_recommendations(catalog: &ItemCatalog, recommendation: &Recommendation) {
    println!(
        "{}",
        format!("Movie Recommendations ({}):", recommendation.mode)
            .bold()
            .blue()
    );
    if recommendation.items.is_empty() {
        println!("  {}", "no movie passed the filters".dimmed());
    }
    for (rank, prediction) in recommendation.items.iter().enumerate() {
        let Some(item) = catalog.get_item(prediction.item_id) else {
            println!(
                "{}. item {} - Expected rating: {:.2}",
                (rank + 1).to_string().green(),
                prediction.item_id,
                prediction.expected_rating
            );
            continue;
        };
        let genres = item
            .genres
            .iter()
            .map(|g| format!("{:?}", g))
            .collect::<Vec<_>>()
            .join(", ");
        // 100k titles usually end with the year already
        let year = match item.year {
            Some(year) if !item.title.contains(&year.to_string()) => format!(" ({})", year),
            _ => String::new(),
        };
        println!(
            "{}. {}{} [{}] - Expected rating: {:.2}",
            (rank + 1).to_string().green(),
            item.title,
            year,
            genres,
            prediction.expected_rating
        );
    }
}
