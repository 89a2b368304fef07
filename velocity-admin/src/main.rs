use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use velocity_server::db::repositories::{CategoryRepository, ProfileRepository, SeedRepository};
use velocity_server::db::{is_unique_violation, Database};
use velocity_types::{Seed, SubscriptionTier};

/// Velocity database utility
///
/// Creates the schema, loads the demo catalogue and adjusts accounts without
/// going through the HTTP API.
#[derive(Parser, Debug)]
#[command(name = "velocity-admin")]
#[command(about = "Operator tools for the Velocity database", long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, env = "DATABASE_PATH", default_value = "./velocity.db")]
    database: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create any missing tables
    Init,
    /// Load demo categories, accounts, seeds and trends (idempotent)
    DemoData,
    /// Change the subscription tier of an existing account
    SetTier {
        email: String,
        /// free, pro or business
        tier: String,
    },
    /// List seeds with their trend counts
    Seeds,
    /// Add an admin seed (no owner, no cap)
    AddSeed {
        term: String,
        /// Category slug, e.g. health
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Pause an active seed or resume a paused one
    ToggleSeed { id: i64 },
    /// Delete a seed
    DeleteSeed { id: i64 },
    /// List accounts and their tiers
    Users,
    /// Print row counts for every table
    Check,
}

const TABLES: [&str; 7] = [
    "profiles",
    "sessions",
    "categories",
    "seeds",
    "trends",
    "trend_metrics",
    "user_saved_trends",
];

/// Open the database. Only `init` and `demo-data` may create a new file.
fn open_database(path: &str, create: bool) -> Result<Database> {
    if !create && !std::path::Path::new(path).exists() {
        anyhow::bail!("Database file not found: {} (run `velocity-admin init` first)", path);
    }
    Database::new(path).with_context(|| format!("Failed to open database {}", path))
}

fn set_tier(db: &Database, email: &str, tier: &str) -> Result<SubscriptionTier> {
    let tier = SubscriptionTier::parse(tier)
        .with_context(|| format!("Unknown tier '{}' (expected free, pro or business)", tier))?;

    let profiles = ProfileRepository::new(db.pool.clone());
    if !profiles.set_tier(email, tier)? {
        anyhow::bail!("No account with email {}", email);
    }
    Ok(tier)
}

fn add_seed(db: &Database, term: &str, category: Option<&str>) -> Result<Seed> {
    let term = term.trim();
    if term.is_empty() {
        anyhow::bail!("Invalid term");
    }

    let category_id = match category {
        Some(slug) => Some(
            CategoryRepository::new(db.pool.clone())
                .get_by_slug(slug)?
                .with_context(|| format!("Unknown category '{}'", slug))?
                .id,
        ),
        None => None,
    };

    match SeedRepository::new(db.pool.clone()).create(term, category_id, None) {
        Ok(seed) => Ok(seed),
        Err(e) if is_unique_violation(&e) => anyhow::bail!("This seed already exists"),
        Err(e) => Err(e),
    }
}

fn toggle_seed(db: &Database, id: i64) -> Result<Seed> {
    let repo = SeedRepository::new(db.pool.clone());
    let seed = repo
        .get(id)?
        .with_context(|| format!("No seed with id {}", id))?;
    repo.set_active(id, !seed.is_active)?
        .with_context(|| format!("No seed with id {}", id))
}

fn delete_seed(db: &Database, id: i64) -> Result<()> {
    if !SeedRepository::new(db.pool.clone()).delete(id)? {
        anyhow::bail!("No seed with id {}", id);
    }
    Ok(())
}

/// Row count per table, in schema order
fn table_counts(db: &Database) -> Result<Vec<(&'static str, i64)>> {
    let conn = db.connection()?;
    let mut counts = Vec::with_capacity(TABLES.len());
    for table in TABLES {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .with_context(|| format!("Failed to count {}", table))?;
        counts.push((table, count));
    }
    Ok(counts)
}

fn print_seeds(db: &Database) -> Result<()> {
    let seeds = SeedRepository::new(db.pool.clone()).list_with_counts(None)?;
    if seeds.is_empty() {
        println!("No seeds.");
        return Ok(());
    }

    println!("{:<5} {:<32} {:<16} {:<8} {:>6}", "ID", "TERM", "CATEGORY", "ACTIVE", "TRENDS");
    for entry in seeds {
        let category = entry
            .category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        println!(
            "{:<5} {:<32} {:<16} {:<8} {:>6}",
            entry.seed.id,
            entry.seed.term,
            category,
            if entry.seed.is_active { "yes" } else { "no" },
            entry.trend_count
        );
    }
    Ok(())
}

fn print_users(db: &Database) -> Result<()> {
    let profiles = ProfileRepository::new(db.pool.clone()).list_all()?;
    println!("{:<36} {:<32} {:<10}", "ID", "EMAIL", "TIER");
    for profile in profiles {
        println!(
            "{:<36} {:<32} {:<10}",
            profile.id,
            profile.email,
            profile.subscription_tier.as_str()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    let args = Args::parse();

    println!("Database: {}", args.database);

    match args.command {
        Command::Init => {
            let db = open_database(&args.database, true)?;
            db.initialize()?;
            println!("Schema ready.");
        }
        Command::DemoData => {
            let db = open_database(&args.database, true)?;
            db.initialize()?;
            db.seed_demo_data()?;
            println!("Demo data loaded.");
        }
        Command::SetTier { email, tier } => {
            let db = open_database(&args.database, false)?;
            let tier = set_tier(&db, &email, &tier)?;
            println!("{} is now on the {} plan.", email, tier.details().name);
        }
        Command::Seeds => print_seeds(&open_database(&args.database, false)?)?,
        Command::AddSeed { term, category } => {
            let db = open_database(&args.database, false)?;
            let seed = add_seed(&db, &term, category.as_deref())?;
            println!("Added seed {} '{}'.", seed.id, seed.term);
        }
        Command::ToggleSeed { id } => {
            let db = open_database(&args.database, false)?;
            let seed = toggle_seed(&db, id)?;
            let state = if seed.is_active { "resumed" } else { "paused" };
            println!("Seed {} '{}' {}.", seed.id, seed.term, state);
        }
        Command::DeleteSeed { id } => {
            delete_seed(&open_database(&args.database, false)?, id)?;
            println!("Deleted seed {}.", id);
        }
        Command::Users => print_users(&open_database(&args.database, false)?)?,
        Command::Check => {
            let db = open_database(&args.database, false)?;
            println!();
            for (table, count) in table_counts(&db)? {
                println!("{:<20} {:>8}", table, count);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_db() -> Database {
        let db = Database::in_memory().expect("Failed to create in-memory database");
        db.initialize().expect("Failed to initialize database");
        db.seed_demo_data().expect("Failed to load demo data");
        db
    }

    #[test]
    fn test_set_tier_updates_account() {
        let db = demo_db();
        let tier = set_tier(&db, "demo@velocity.app", "Business").unwrap();
        assert_eq!(tier, SubscriptionTier::Business);

        let profile = ProfileRepository::new(db.pool.clone())
            .get_by_email("demo@velocity.app")
            .unwrap()
            .unwrap();
        assert_eq!(profile.subscription_tier, SubscriptionTier::Business);
    }

    #[test]
    fn test_set_tier_rejects_unknown_tier() {
        let db = demo_db();
        let err = set_tier(&db, "demo@velocity.app", "platinum").unwrap_err();
        assert!(err.to_string().contains("Unknown tier"));
    }

    #[test]
    fn test_set_tier_rejects_unknown_email() {
        let db = demo_db();
        let err = set_tier(&db, "nobody@velocity.app", "pro").unwrap_err();
        assert_eq!(err.to_string(), "No account with email nobody@velocity.app");
    }

    #[test]
    fn test_add_seed_with_category() {
        let db = demo_db();
        let seed = add_seed(&db, "  Sauna Blankets ", Some("health")).unwrap();
        assert_eq!(seed.term, "Sauna Blankets");
        assert_eq!(seed.category_id, Some(2));
        assert!(seed.added_by_user_id.is_none());
        assert!(seed.is_active);
    }

    #[test]
    fn test_add_seed_rejects_bad_input() {
        let db = demo_db();
        assert_eq!(add_seed(&db, "   ", None).unwrap_err().to_string(), "Invalid term");
        assert_eq!(
            add_seed(&db, "biohacking", None).unwrap_err().to_string(),
            "This seed already exists"
        );
        assert!(add_seed(&db, "Sauna", Some("gardening"))
            .unwrap_err()
            .to_string()
            .contains("Unknown category"));
    }

    #[test]
    fn test_toggle_seed_flips_state() {
        let db = demo_db();
        assert!(!toggle_seed(&db, 1).unwrap().is_active);
        assert!(toggle_seed(&db, 1).unwrap().is_active);
        assert_eq!(toggle_seed(&db, 999).unwrap_err().to_string(), "No seed with id 999");
    }

    #[test]
    fn test_delete_seed() {
        let db = demo_db();
        delete_seed(&db, 2).unwrap();
        assert!(SeedRepository::new(db.pool.clone()).get(2).unwrap().is_none());
        assert_eq!(delete_seed(&db, 2).unwrap_err().to_string(), "No seed with id 2");
    }

    #[test]
    fn test_table_counts_cover_demo_data() {
        let db = demo_db();
        let counts: std::collections::HashMap<_, _> = table_counts(&db).unwrap().into_iter().collect();

        assert_eq!(counts.len(), TABLES.len());
        assert_eq!(counts["categories"], 6);
        assert_eq!(counts["profiles"], 4);
        assert_eq!(counts["seeds"], 2);
        assert_eq!(counts["trends"], 22);
        assert_eq!(counts["trend_metrics"], 22 * 12);
        assert_eq!(counts["sessions"], 0);
    }

    #[test]
    fn test_open_database_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");
        let path = path.to_str().unwrap();

        assert!(open_database(path, false).is_err());

        let db = open_database(path, true).unwrap();
        db.initialize().unwrap();
        assert!(open_database(path, false).is_ok());
    }
}
