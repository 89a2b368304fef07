/// SQL schema for the Velocity database
/// Creates all tables with proper constraints, foreign keys, and indexes
pub const SCHEMA: &str = r#"
-- Profiles: one row per authenticated account
CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    email TEXT UNIQUE NOT NULL COLLATE NOCASE,
    subscription_tier TEXT NOT NULL DEFAULT 'free'
        CHECK(subscription_tier IN ('free', 'pro', 'business')),
    billing_customer_id TEXT,
    api_key TEXT UNIQUE,
    created_at TEXT NOT NULL
);

-- Categories lookup table
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT UNIQUE NOT NULL
);

-- Seeds: discovery keywords consumed by the external scraper
CREATE TABLE IF NOT EXISTS seeds (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    term TEXT UNIQUE NOT NULL COLLATE NOCASE,
    category_id INTEGER,
    is_active INTEGER NOT NULL DEFAULT 1,
    last_scraped_at TEXT,
    added_by_user_id TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE SET NULL,
    FOREIGN KEY (added_by_user_id) REFERENCES profiles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_seeds_added_by ON seeds(added_by_user_id);
CREATE INDEX IF NOT EXISTS idx_seeds_created_at ON seeds(created_at DESC);

-- Trends produced by the scraping pipeline
CREATE TABLE IF NOT EXISTS trends (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT UNIQUE NOT NULL,
    description TEXT,
    category_id INTEGER,
    status TEXT NOT NULL DEFAULT 'discovered'
        CHECK(status IN ('discovered', 'regular', 'exploding', 'peaked')),
    current_volume INTEGER NOT NULL DEFAULT 0,
    growth_percentage REAL NOT NULL DEFAULT 0,
    source TEXT NOT NULL DEFAULT 'manual'
        CHECK(source IN ('manual', 'seed_expansion', 'user_request')),
    last_fetched_at TEXT,
    added_at TEXT NOT NULL,
    velocity_score INTEGER,
    forecast_status TEXT CHECK(forecast_status IN ('bullish', 'bearish', 'neutral')),
    prediction_confidence REAL,
    seed_id INTEGER,
    top_regions TEXT NOT NULL DEFAULT '[]',
    is_breakout INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE SET NULL,
    FOREIGN KEY (seed_id) REFERENCES seeds(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_trends_status ON trends(status);
CREATE INDEX IF NOT EXISTS idx_trends_category ON trends(category_id);
CREATE INDEX IF NOT EXISTS idx_trends_seed ON trends(seed_id);
CREATE INDEX IF NOT EXISTS idx_trends_added_at ON trends(added_at DESC);

-- Append-only search volume history
CREATE TABLE IF NOT EXISTS trend_metrics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    trend_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    search_volume INTEGER NOT NULL,
    UNIQUE (trend_id, date),
    FOREIGN KEY (trend_id) REFERENCES trends(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_trend_metrics_trend ON trend_metrics(trend_id, date);

-- Bookmarked trends per user
CREATE TABLE IF NOT EXISTS user_saved_trends (
    user_id TEXT NOT NULL,
    trend_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, trend_id),
    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE,
    FOREIGN KEY (trend_id) REFERENCES trends(id) ON DELETE CASCADE
);

-- Sessions for the thin login layer
CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
"#;

/// Demo catalogue: categories, a profile per tier, trends and a couple of seeds.
/// Metrics are generated separately so their dates track the current month.
pub const DEMO_DATA: &str = r#"
INSERT OR IGNORE INTO categories (id, name, slug) VALUES
    (1, 'SaaS', 'saas'),
    (2, 'Health', 'health'),
    (3, 'Finance', 'finance'),
    (4, 'Consumer', 'consumer'),
    (5, 'AI & Tech', 'ai-tech'),
    (6, 'Crypto', 'crypto');

INSERT OR IGNORE INTO profiles (id, email, subscription_tier, created_at) VALUES
    ('550e8400-e29b-41d4-a716-446655440000', 'admin@velocity.com', 'business', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now')),
    ('550e8400-e29b-41d4-a716-446655440001', 'demo@velocity.app', 'free', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now')),
    ('550e8400-e29b-41d4-a716-446655440002', 'hunter@velocity.app', 'pro', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now')),
    ('550e8400-e29b-41d4-a716-446655440003', 'empire@velocity.app', 'business', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now'));

INSERT OR IGNORE INTO seeds (id, term, category_id, is_active, added_by_user_id, created_at) VALUES
    (1, 'Biohacking', 2, 1, NULL, strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-30 days')),
    (2, 'Mechanical Keyboards', 4, 1, '550e8400-e29b-41d4-a716-446655440002', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-10 days'));

INSERT OR IGNORE INTO trends (id, name, slug, description, category_id, status, current_volume, growth_percentage, source, added_at, velocity_score, forecast_status, prediction_confidence, seed_id, top_regions, is_breakout) VALUES
    (1, 'AI Agents', 'ai-agents', 'Autonomous AI systems that can perform complex tasks independently', 5, 'exploding', 45200, 892, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-1 days'), 95, 'bullish', 0.92, NULL, '["USA","CHN","GBR"]', 1),
    (2, 'Mushroom Coffee', 'mushroom-coffee', 'Coffee blended with functional mushrooms like lions mane and chaga', 2, 'exploding', 28400, 534, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-2 days'), 87, 'bullish', 0.85, NULL, '["USA","CAN","AUS"]', 1),
    (3, 'Micro-SaaS', 'micro-saas', 'Small, profitable software businesses run by solo founders or tiny teams', 1, 'exploding', 18700, 412, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-3 days'), 78, 'bullish', 0.81, NULL, '["USA","GBR","IND"]', 0),
    (4, 'Sleep Optimization', 'sleep-optimization', 'Tech and techniques for improving sleep quality and recovery', 2, 'exploding', 32100, 287, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-4 days'), 72, 'bullish', 0.75, NULL, '["USA","GBR","DEU"]', 0),
    (5, 'Creator Economy Tools', 'creator-economy-tools', 'Software helping content creators monetize and manage their businesses', 1, 'exploding', 24500, 356, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-5 days'), 76, 'bullish', 0.79, NULL, '["USA","GBR","CAN"]', 0),
    (6, 'Vertical SaaS', 'vertical-saas', 'Industry-specific software solutions for niche markets', 1, 'exploding', 15800, 245, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-6 days'), 68, 'bullish', 0.72, NULL, '["USA","GBR","CAN"]', 0),
    (7, 'Cold Plunge', 'cold-plunge', 'Cold water immersion therapy for recovery and wellness', 2, 'peaked', 41200, 89, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-7 days'), 45, 'neutral', 0.68, NULL, '["USA","GBR","CAN"]', 0),
    (8, 'BNPL Services', 'bnpl-services', 'Buy Now Pay Later financing options for consumer purchases', 3, 'regular', 67300, 45, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-8 days'), 32, 'neutral', 0.55, NULL, '["USA","GBR","CAN"]', 0),
    (9, 'Electric Bikes', 'electric-bikes', 'Battery-powered bicycles for commuting and recreation', 4, 'regular', 89400, 67, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-9 days'), 38, 'neutral', 0.62, NULL, '["USA","GBR","CAN"]', 0),
    (10, 'RAG Systems', 'rag-systems', 'Retrieval Augmented Generation for enhanced AI responses', 5, 'exploding', 12400, 1247, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-10 days'), 98, 'bullish', 0.95, NULL, '["USA","GBR","CAN"]', 0),
    (11, 'Peptides', 'peptides', 'Short chains of amino acids used for health and performance', 2, 'exploding', 38900, 478, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-11 days'), 84, 'bullish', 0.87, NULL, '["USA","GBR","CAN"]', 0),
    (12, 'Revenue Operations', 'revenue-operations', 'Unified approach to sales, marketing, and customer success', 1, 'exploding', 21300, 312, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-12 days'), 74, 'bullish', 0.78, NULL, '["USA","GBR","CAN"]', 0),
    (13, 'Digital Twins', 'digital-twins', 'Virtual replicas of physical systems for simulation and analysis', 5, 'exploding', 16700, 234, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-13 days'), 66, 'bullish', 0.71, NULL, '["USA","GBR","CAN"]', 0),
    (14, 'Fractional Executives', 'fractional-executives', 'Part-time C-level executives for growing companies', 1, 'exploding', 8900, 567, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-14 days'), 82, 'bullish', 0.84, NULL, '["USA","GBR","CAN"]', 0),
    (15, 'Continuous Glucose Monitors', 'continuous-glucose-monitors', 'Wearable devices for real-time blood sugar tracking', 2, 'exploding', 29800, 389, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-15 days'), 79, 'bullish', 0.82, NULL, '["USA","GBR","CAN"]', 0),
    (16, 'AI Companions', 'ai-companions', 'AI-powered virtual companions for conversation and support', 5, 'exploding', 34600, 723, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-16 days'), 91, 'bullish', 0.89, NULL, '["USA","GBR","CAN"]', 0),
    (17, 'Embedded Finance', 'embedded-finance', 'Financial services integrated into non-financial platforms', 3, 'exploding', 11200, 298, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-17 days'), 71, 'bullish', 0.76, NULL, '["USA","GBR","CAN"]', 0),
    (18, 'Red Light Therapy', 'red-light-therapy', 'Light therapy devices for skin health and recovery', 2, 'peaked', 52100, 124, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-18 days'), 48, 'neutral', 0.65, NULL, '["USA","GBR","CAN"]', 0),
    (19, 'DeFi Yield', 'defi-yield', 'Decentralized finance protocols for earning passive income', 6, 'regular', 19800, -12, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-19 days'), 18, 'bearish', 0.72, NULL, '["USA","GBR","CAN"]', 0),
    (20, 'Autonomous Vehicles', 'autonomous-vehicles', 'Self-driving cars and transportation technology', 5, 'regular', 78500, 34, 'manual', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-20 days'), 28, 'neutral', 0.58, NULL, '["USA","GBR","CAN"]', 0),
    (21, 'Nootropic Gummies', 'nootropic-gummies', NULL, 2, 'discovered', 900, 40, 'seed_expansion', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-2 days'), NULL, NULL, NULL, 1, '[]', 0),
    (22, 'Low Profile Switches', 'low-profile-switches', 'Slim mechanical key switches for laptops and travel boards', 4, 'regular', 6400, 156, 'seed_expansion', strftime('%Y-%m-%dT%H:%M:%S.000000Z', 'now', '-4 days'), 61, 'bullish', 0.7, 2, '["USA","JPN","KOR"]', 0);
"#;
