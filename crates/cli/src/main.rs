use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::Catalog;
use pipeline::filters::{GenreFilter, TitlePrefixFilter};
use pipeline::{CatalogBuilder, CategoryKind, CategoryTable, FilterPipeline};
use rand::Rng;
use sources::{
    Candidate, CatalogSource, SimilaritySource, TagOverlapEvaluator, TitleMatcher,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// ReelRecs - content-based movie recommendations
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Content-based movie recommendations from TF-IDF tag similarity", long_about = None)]
struct Cli {
    /// Directory holding the built artifacts
    #[arg(short, long, default_value = "artifacts", global = true)]
    artifacts_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the catalog artifacts from the TMDB CSV exports
    Build {
        /// Movies export (title, overview, genres, keywords)
        #[arg(long)]
        movies: PathBuf,

        /// Credits export (movie_id, title, cast, crew)
        #[arg(long)]
        credits: PathBuf,

        /// Output directory (defaults to --artifacts-dir), replaced as a whole
        #[arg(long)]
        out: Option<PathBuf>,

        /// Vocabulary size of the TF-IDF model
        #[arg(long, default_value = "5000")]
        max_features: usize,
    },

    /// Recommend movies similar to a title
    Recommend {
        /// Exact movie title
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Suggest catalog titles close to a (misspelled) title
    Suggest {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Browse the catalog by first letter, genre, mood or age group
    Browse(BrowseArgs),

    /// Evaluate recommendations by tag overlap
    Evaluate {
        /// Recommendations checked per sampled movie
        #[arg(long, default_value = "10")]
        top_k: usize,

        /// Movies sampled from the catalog
        #[arg(long, default_value = "100")]
        samples: usize,

        /// Shared tags needed for a recommendation to count as relevant
        #[arg(long, default_value = "5")]
        min_overlap: usize,

        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Run benchmark to test recommendation latency
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "1000")]
        requests: usize,
    },
}

#[derive(Args)]
struct BrowseArgs {
    #[command(flatten)]
    target: BrowseTarget,

    /// JSON file replacing the built-in mood / age-group tables
    #[arg(long)]
    categories: Option<PathBuf>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct BrowseTarget {
    /// Titles starting with this letter (case-insensitive)
    #[arg(long)]
    letter: Option<String>,

    #[arg(long)]
    genre: Option<String>,

    /// Mood label, e.g. happy, sad, excited, relaxed
    #[arg(long)]
    emotion: Option<String>,

    /// Age group label, e.g. kids, teens, adults, all
    #[arg(long)]
    age_group: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Build {
            movies,
            credits,
            out,
            max_features,
        } => handle_build(
            &movies,
            &credits,
            out.as_deref().unwrap_or(&cli.artifacts_dir),
            max_features,
        )?,
        Commands::Recommend { title, limit } => {
            handle_recommend(load_catalog(&cli.artifacts_dir)?, &title, limit)
        }
        Commands::Suggest { title, limit } => {
            handle_suggest(load_catalog(&cli.artifacts_dir)?, &title, limit)
        }
        Commands::Browse(args) => handle_browse(load_catalog(&cli.artifacts_dir)?, args)?,
        Commands::Evaluate {
            top_k,
            samples,
            min_overlap,
            seed,
        } => {
            let evaluator = TagOverlapEvaluator::new(load_catalog(&cli.artifacts_dir)?)
                .with_top_k(top_k)
                .with_max_samples(samples)
                .with_min_overlap(min_overlap)
                .with_seed(seed);
            handle_evaluate(evaluator)
        }
        Commands::Benchmark { requests } => {
            handle_benchmark(load_catalog(&cli.artifacts_dir)?, requests).await?
        }
    }

    Ok(())
}

fn load_catalog(dir: &Path) -> Result<Arc<Catalog>> {
    println!("Loading catalog from {}...", dir.display());
    let start = Instant::now();
    let catalog = Catalog::load_from_dir(dir)
        .with_context(|| format!("Failed to load artifacts from {}", dir.display()))?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );
    Ok(Arc::new(catalog))
}

/// Handle the 'build' command
fn handle_build(movies: &Path, credits: &Path, out: &Path, max_features: usize) -> Result<()> {
    let start = Instant::now();
    let catalog = CatalogBuilder::new()
        .with_max_features(max_features)
        .build_from_csv(movies, credits)
        .context("Failed to build catalog")?;
    catalog
        .save_to_dir(out)
        .with_context(|| format!("Failed to write artifacts to {}", out.display()))?;

    println!(
        "{} Built {} movies ({} terms, {} genres) into {} in {:?}",
        "✓".green(),
        catalog.len(),
        catalog.vectorizer().vocabulary.len(),
        catalog.genres().len(),
        out.display(),
        start.elapsed()
    );
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(catalog: Arc<Catalog>, title: &str, limit: usize) {
    let recommendations = SimilaritySource::new(catalog.clone()).recommend(title, limit);
    if !recommendations.is_empty() {
        print_candidates(&format!("Movies similar to '{}':", title), &recommendations);
        return;
    }

    println!("{}", format!("'{}' is not in the catalog.", title).yellow());
    handle_suggest(catalog, title, 5);
}

/// Handle the 'suggest' command
fn handle_suggest(catalog: Arc<Catalog>, title: &str, limit: usize) {
    let suggestions = TitleMatcher::new(catalog).suggest_close(title, limit);
    println!("{}", "Did you mean:".bold().blue());
    for (rank, suggestion) in suggestions.iter().enumerate() {
        println!(
            "{}. {} ({})",
            (rank + 1).to_string().green(),
            suggestion.title,
            suggestion.score
        );
    }
}

/// Handle the 'browse' command
fn handle_browse(catalog: Arc<Catalog>, args: BrowseArgs) -> Result<()> {
    let categories = match &args.categories {
        Some(path) => CategoryTable::from_json_file(path)
            .with_context(|| format!("Failed to load category table {}", path.display()))?,
        None => CategoryTable::default(),
    };

    let target = &args.target;
    let (heading, filters) = if let Some(letter) = &target.letter {
        (
            format!("Titles starting with '{}':", letter),
            FilterPipeline::new().add_filter(TitlePrefixFilter::new(letter)),
        )
    } else if let Some(genre) = &target.genre {
        (
            format!("{} movies:", genre),
            FilterPipeline::new().add_filter(GenreFilter::new([genre])),
        )
    } else if let Some(emotion) = &target.emotion {
        let genres = categories.genres_for(CategoryKind::Emotion, emotion);
        (
            format!("Movies for a {} mood ({}):", emotion, genres.join(", ")),
            FilterPipeline::new().add_filter(GenreFilter::new(genres)),
        )
    } else if let Some(age_group) = &target.age_group {
        let genres = categories.genres_for(CategoryKind::AgeGroup, age_group);
        (
            format!("Movies for {} ({}):", age_group, genres.join(", ")),
            FilterPipeline::new().add_filter(GenreFilter::new(genres)),
        )
    } else {
        bail!("one of --letter, --genre, --emotion or --age-group is required");
    };

    let movies = filters.apply(CatalogSource::new(catalog.clone()).all_candidates(), &catalog)?;
    println!("{}", heading.bold().blue());
    for candidate in &movies {
        let genres = catalog
            .get(candidate.row)
            .map(|m| m.genres.join(", "))
            .unwrap_or_default();
        println!("  - {} [{}]", candidate.title, genres);
    }
    println!("{} movies", movies.len());
    Ok(())
}

/// Handle the 'evaluate' command
fn handle_evaluate(evaluator: TagOverlapEvaluator) {
    let start = Instant::now();
    let report = evaluator.evaluate();

    println!("{}", "Tag overlap evaluation:".bold().blue());
    println!("{}Samples evaluated: {}", "• ".cyan(), report.evaluated);
    println!("{}Precision: {:.4}", "• ".cyan(), report.precision);
    println!("{}Recall: {:.4}", "• ".cyan(), report.recall);
    println!("{}F1: {:.4}", "• ".cyan(), report.f1);
    info!("Evaluation finished in {:?}", start.elapsed());
}

/// Handle the 'benchmark' command
async fn handle_benchmark(catalog: Arc<Catalog>, requests: usize) -> Result<()> {
    if catalog.is_empty() || requests == 0 {
        bail!("benchmark needs a non-empty catalog and at least one request");
    }
    let source = SimilaritySource::new(catalog.clone());

    // Random catalog titles, so every request hits the matrix
    let mut rng = rand::rng();
    let titles: Vec<String> = (0..requests)
        .filter_map(|_| catalog.get(rng.random_range(0..catalog.len())))
        .map(|movie| movie.title.clone())
        .collect();

    let wall_clock = Instant::now();
    let mut handles = vec![];
    for title in titles {
        let source = source.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            source.recommend(&title, 30);
            start.elapsed()
        }));
    }

    let mut timings = vec![];
    for handle in handles {
        timings.push(handle.await.context("Benchmark task panicked")?);
    }
    let wall_time = wall_clock.elapsed();

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| {
        let index = ((timings.len() as f32 * p) as usize).min(timings.len() - 1);
        timings[index]
    };
    let throughput = timings.len() as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {}", timings.len());
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print ranked candidates
fn print_candidates(heading: &str, candidates: &[Candidate]) {
    println!("{}", heading.bold().blue());
    for (rank, candidate) in candidates.iter().enumerate() {
        println!(
            "{}. {} - Score: {:.3}",
            (rank + 1).to_string().green(),
            candidate.title,
            candidate.score
        );
    }
}
