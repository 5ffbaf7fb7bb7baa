use article_api::config::Settings;
use article_api::{db, seed};
use clap::Parser;
use log::info;

/// Populates the articles table with generated data.
#[derive(Parser, Debug)]
#[command(name = "seed", version)]
struct Args {
    /// Number of articles to insert
    #[arg(short, long, default_value_t = seed::DEFAULT_COUNT)]
    count: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::from_env()?;
    article_api::init_logging();
    let pool = db::create_connection_pool(&settings)?;
    for version in db::run_migrations(&pool)? {
        info!("applied migration {}", version);
    }
    let mut conn = pool.get()?;
    let articles = seed::seed_articles(&mut conn, args.count, &mut rand::thread_rng())?;
    info!(
        "seeded {} articles into {}",
        articles.len(),
        settings.database_url
    );
    Ok(())
}
