use axum::{extract::State, http::header, response::IntoResponse};
use chrono::{DateTime, Utc};

use super::ApiResult;
use crate::db::repositories::{CategoryRepository, TrendRepository};
use crate::state::AppState;

struct SitemapUrl {
    loc: String,
    last_modified: DateTime<Utc>,
    change_frequency: &'static str,
    priority: f32,
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn render_sitemap(urls: &[SitemapUrl]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for url in urls {
        xml.push_str(&format!(
            "<url>\n<loc>{}</loc>\n<lastmod>{}</lastmod>\n<changefreq>{}</changefreq>\n<priority>{:.1}</priority>\n</url>\n",
            xml_escape(&url.loc),
            url.last_modified.to_rfc3339(),
            url.change_frequency,
            url.priority
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// GET /sitemap.xml
pub async fn sitemap(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let base_url = state.settings.site.url.trim_end_matches('/').to_string();
    let pool = state.db.pool.clone();
    let now = Utc::now();

    let mut urls = vec![
        SitemapUrl {
            loc: base_url.clone(),
            last_modified: now,
            change_frequency: "daily",
            priority: 1.0,
        },
        SitemapUrl {
            loc: format!("{}/pricing", base_url),
            last_modified: now,
            change_frequency: "monthly",
            priority: 0.5,
        },
    ];

    urls.extend(
        TrendRepository::new(pool.clone())
            .sitemap_entries()?
            .into_iter()
            .map(|(slug, added_at)| SitemapUrl {
                loc: format!("{}/trend/{}", base_url, slug),
                last_modified: added_at,
                change_frequency: "daily",
                priority: 0.8,
            }),
    );

    urls.extend(
        CategoryRepository::new(pool)
            .list()?
            .into_iter()
            .map(|category| SitemapUrl {
                loc: format!("{}/category/{}", base_url, category.slug),
                last_modified: now,
                change_frequency: "daily",
                priority: 0.7,
            }),
    );

    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_sitemap(&urls),
    ))
}

pub async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_sitemap_escapes_locations() {
        let xml = render_sitemap(&[SitemapUrl {
            loc: "https://example.com/trend/a&b".to_string(),
            last_modified: Utc::now(),
            change_frequency: "daily",
            priority: 0.8,
        }]);
        assert!(xml.contains("<loc>https://example.com/trend/a&amp;b</loc>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert!(xml.ends_with("</urlset>\n"));
    }
}
